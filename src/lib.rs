//! # Compact, Sortable and Tamper-Evident Identifiers
//!
//! This crate provides REIDs: identifiers suitable as database keys and as public tokens.
//! A REID packs a microsecond timestamp, 48 bits of cryptographically secure randomness
//! and a CRC-16 checksum into 15 bytes, and renders them as 24 human-typeable base32 symbols.
//! An optional prefix tells what kind of thing a REID identifies, e.g. `pk_0R52860Y800028T5CY4TQ0ZS`.
//!
//! ## Generating REIDs
//!
//! REIDs are generated using the [`generate()`] function:
//!
//! ```
//! # fn main() -> Result<(), reid::Error> {
//! let bare = reid::generate(None)?;
//! let prefixed = reid::generate(Some("pk"))?;
//!
//! assert_eq!(bare.to_string().len(), 24);
//! assert_eq!(prefixed.to_string().len(), 2 + 1 + 24);
//! # Ok(()) }
//! ```
//!
//! Generation can only fail if the prefix is rejected: it must not be longer than
//! [`MAX_PREFIX_LEN`] characters and must not contain the delimiter.
//!
//! ## Parsing and validating REIDs
//!
//! REIDs implement the [`std::str::FromStr`] trait and can be parsed with [`str::parse()`] method:
//!
//! ```
//! # use std::error::Error;
//! # fn main() -> Result<(), Box<dyn Error>> {
//! use reid::Reid;
//!
//! // cspell:disable-next-line
//! let id: Reid = "pk_0R52860Y800028T5CY4TQ0ZS".parse()?;
//!
//! assert_eq!(id.prefix(), Some("pk"));
//! assert_eq!(id.timestamp(), 1_700_000_000_000_000);
//! # Ok(()) }
//! ```
//!
//! Parsing is lenient about the way people type: lowercase letters are accepted,
//! `O` is read as `0`, and `I` and `L` are read as `1`. After that, the checksum is verified,
//! so a mistyped or tampered REID is detected:
//!
//! ```
//! use reid::{Error, ErrorKind};
//!
//! // cspell:disable-next-line
//! assert!(reid::validate("pk_0r52860y800028t5cy4tqozs").is_ok());
//!
//! // cspell:disable-next-line
//! let err = reid::validate("pk_0R52860Y800028T5CY4TQ0ZT").unwrap_err();
//! assert_eq!(err, Error::ChecksumMismatch);
//! assert_eq!(err.kind(), ErrorKind::Checksum);
//!
//! let err = reid::validate("pk_0R52860Y800028T5CY4TQ0Z!").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::Format);
//! ```
//!
//! ## Delimiters
//!
//! Prefix and body are joined with `_` by default. The supported alternatives are `-`, `/`, `\` and `.`.
//! Either change the process-wide delimiter with [`set_delimiter()`], or use a [`Codec`]
//! which carries its own delimiter:
//!
//! ```
//! use reid::{Codec, Delimiter};
//!
//! let codec = Codec::new(Delimiter::Hyphen);
//! let id = codec.generate(Some("prefix")).unwrap();
//!
//! assert!(id.to_string().starts_with("prefix-"));
//! ```
//!
//! ## Guarantees
//!
//! A REID is structurally valid and tamper-evident; it is *not* guaranteed to be globally unique.
//! Two REIDs generated within the same microsecond collide with a probability of 2<sup>-48</sup>.
//! There is no coordination between processes and no collision detection.
//!
//! ## Feature Flags
//!
//! - **`serde`**: Provides support for serialization and deserialization via `Serde`, optional.
//! - **`tracing`**: Emits trace spans for generating and parsing, and a debug event on checksum mismatches, optional.
//!

pub mod base32;
mod checksum;
mod codec;
mod delimiter;
mod error;
mod generator;
mod reid;
#[cfg(feature = "serde")]
mod serde;
mod util;

use std::borrow::Cow;

pub use codec::Codec;
pub use delimiter::{delimiter, set_delimiter, Delimiter};
pub use error::{Error, ErrorKind};
pub use generator::{set_entropy_source, EntropySource, EntropySourceHandle, STANDARD_ENTROPY_SOURCE};
pub use reid::Reid;

/// Length of the binary form of a REID in bytes.
pub const BYTE_LEN: usize = 15;

/// Length of the body of a REID in characters.
pub const BODY_LEN: usize = 24;

/// Maximum length of a prefix in characters.
pub const MAX_PREFIX_LEN: usize = 23;

const PAYLOAD_LEN: usize = 13;

const TIMESTAMP_BYTES: usize = 7;
const TIMESTAMP_BITS: u32 = 56;
const TIMESTAMP_MAX: u64 = (1 << TIMESTAMP_BITS) - 1;

const RANDOM_BYTES: usize = 6;
const RANDOM_BITS: u32 = 48;
const RANDOM_MAX: u64 = (1 << RANDOM_BITS) - 1;

// Text longer than this is taken as prefixed. Must stay `> 23`, not `>= 24`.
const PREFIX_THRESHOLD: usize = 23;

/// Generates a new REID using the process-wide delimiter.
///
/// # Errors
///
/// Fails if the prefix is longer than [`MAX_PREFIX_LEN`] characters
/// or contains the delimiter. An empty prefix is the same as no prefix.
///
/// # Example
///
/// ```
/// use reid::Error;
///
/// assert!(reid::generate(Some("12345678901234567890123")).is_ok());
/// assert_eq!(reid::generate(Some("1234567890123456789012345")), Err(Error::PrefixTooLong));
/// ```
pub fn generate(prefix: Option<&str>) -> Result<Reid, Error> {
    Codec::current().generate(prefix)
}

/// Parses and validates a REID using the process-wide delimiter.
///
/// See [`Codec::parse`] for details.
///
/// # Errors
///
/// Fails with a format error if the text is malformed,
/// or with [`Error::ChecksumMismatch`] if the checksum does not match.
pub fn parse(text: &str) -> Result<Reid, Error> {
    Codec::current().parse(text)
}

/// Canonicalizes a REID string using the process-wide delimiter.
///
/// See [`Codec::canonicalize`] for details.
///
/// # Errors
///
/// Fails if the text is malformed. The checksum is not checked.
///
/// # Example
///
/// ```
// cspell:disable-next-line
/// let s = "olixjazthsfjzt7wd6j8ir92";
///
// cspell:disable-next-line
/// assert_eq!(reid::canonicalize(s), Ok("011XJAZTHSFJZT7WD6J81R92".into()));
/// ```
pub fn canonicalize(text: &str) -> Result<Cow<'_, str>, Error> {
    Codec::current().canonicalize(text)
}

/// Checks a REID string for validity using the process-wide delimiter.
///
/// # Errors
///
/// If the REID string is not valid, an appropriate error is returned.
///
/// # Example
///
/// ```
/// use reid::Error;
///
/// // cspell:disable-next-line
/// assert!(reid::validate("00000000000g0000oooo302c").is_ok());
/// // cspell:disable-next-line
/// assert_eq!(reid::validate("00000000000G00000000302D"), Err(Error::ChecksumMismatch));
///
/// assert_eq!(reid::validate("12345678901234567890123."), Err(Error::InvalidChar));
/// assert_eq!(reid::validate("xxxxxxxxxxxxxxxxxxxxxx"), Err(Error::TooShort));
/// assert_eq!(reid::validate("xxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"), Err(Error::TooLong));
/// ```
pub fn validate(text: &str) -> Result<(), Error> {
    Codec::current().validate(text)
}

/// Parses the input if it looks like a REID, otherwise generates a new REID with the input as prefix.
///
/// See [`Codec::resolve`] for details.
///
/// # Errors
///
/// Same as [`parse()`] for input which looks like a REID.
pub fn resolve(input: &str) -> Result<Reid, Error> {
    Codec::current().resolve(input)
}

#[cfg(test)]
mod tests;
