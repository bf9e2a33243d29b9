use thiserror::Error;

/// Errors that can occur when creating REIDs out of foreign data.
#[derive(Debug, Error, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Error {
    /// The REID body is too short.
    #[error("string is too short")]
    TooShort,
    /// The REID body is too long.
    #[error("string is too long")]
    TooLong,
    /// The REID body contains a character outside the base32 alphabet.
    #[error("string contains an invalid character")]
    InvalidChar,
    /// The prefix is empty or contains the delimiter.
    #[error("invalid prefix")]
    InvalidPrefix,
    /// The prefix exceeds [`MAX_PREFIX_LEN`](crate::MAX_PREFIX_LEN) characters.
    #[error("prefix is too long")]
    PrefixTooLong,
    /// The character is not one of the supported delimiters.
    #[error("unsupported delimiter")]
    InvalidDelimiter,
    /// The given timestamp does not fit into 56 bits.
    #[error("timestamp is too large")]
    TimestampOutOfRange,
    /// The given randomness does not fit into 48 bits.
    #[error("randomness is too large")]
    RandomnessOutOfRange,
    /// The stored checksum does not match the payload.
    #[error("checksum mismatch")]
    ChecksumMismatch,
}

/// Coarse classification of an [`Error`].
///
/// Garbage input and corrupted input are told apart so that callers can
/// log or alert on them differently.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input is structurally invalid.
    Format,
    /// The input decodes, but its checksum does not match.
    Checksum,
}

impl Error {
    /// Returns the kind of this error.
    ///
    /// # Example
    ///
    /// ```
    /// use reid::{Error, ErrorKind};
    ///
    /// assert_eq!(Error::InvalidChar.kind(), ErrorKind::Format);
    /// assert_eq!(Error::ChecksumMismatch.kind(), ErrorKind::Checksum);
    /// ```
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::ChecksumMismatch => ErrorKind::Checksum,
            _ => ErrorKind::Format,
        }
    }

    /// Returns true if the input was structurally invalid.
    #[must_use]
    pub const fn is_format_error(self) -> bool {
        matches!(self.kind(), ErrorKind::Format)
    }

    /// Returns true if the input failed the checksum test.
    #[must_use]
    pub const fn is_checksum_error(self) -> bool {
        matches!(self.kind(), ErrorKind::Checksum)
    }
}
