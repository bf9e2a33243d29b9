use std::{
    fmt::{self, Write as _},
    str::FromStr,
    time::{Duration, SystemTime},
};

use crate::{
    base32, checksum, util, Delimiter, Error, BODY_LEN, BYTE_LEN, PAYLOAD_LEN, RANDOM_BYTES, RANDOM_MAX, TIMESTAMP_BYTES,
    TIMESTAMP_MAX,
};

/// A compact, sortable and tamper-evident identifier.
///
/// A `Reid` consists of a 15 byte binary form and an optional prefix:
///
/// - 56 bits timestamp (microseconds since the Unix epoch),
/// - 48 bits of cryptographically secure randomness,
/// - 16 bits CRC-16/CCITT checksum over the 104 bits before.
///
/// The binary form is rendered as 24 base32 symbols, the _body_. If a prefix is set,
/// it is joined to the body with a delimiter:
///
/// ```
/// # fn main() -> Result<(), reid::Error> {
/// let id = reid::generate(Some("pk"))?;
///
/// assert_eq!(id.prefix(), Some("pk"));
/// assert_eq!(id.to_string(), format!("pk_{}", id.body()));
/// # Ok(()) }
/// ```
///
/// REIDs are ordered by their binary form first, so they sort by creation time.
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reid {
    bytes: [u8; BYTE_LEN],
    prefix: Option<Box<str>>,
    delimiter: Delimiter,
}

impl Reid {
    pub(crate) const fn from_raw(bytes: [u8; BYTE_LEN], prefix: Option<Box<str>>, delimiter: Delimiter) -> Self {
        Self {
            bytes,
            prefix,
            delimiter,
        }
    }

    /// Creates a `Reid` without prefix from its binary form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChecksumMismatch`] if the last two bytes are not the checksum of the first 13 bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use reid::{Error, Reid};
    ///
    /// let id = Reid::from_parts(1, 1).unwrap();
    /// assert_eq!(Reid::from_bytes(id.to_bytes()), Ok(id));
    ///
    /// assert_eq!(Reid::from_bytes([0; 15]), Err(Error::ChecksumMismatch));
    /// ```
    pub fn from_bytes(bytes: [u8; BYTE_LEN]) -> Result<Self, Error> {
        if checksum::verify(&bytes) {
            Ok(Self::from_raw(bytes, None, Delimiter::default()))
        } else {
            Err(Error::ChecksumMismatch)
        }
    }

    /// Creates a `Reid` without prefix from a timestamp and randomness.
    ///
    /// The checksum is computed.
    ///
    /// # Errors
    ///
    /// Fails if the timestamp does not fit into 56 bits, or the randomness does not fit into 48 bits.
    ///
    /// # Example
    ///
    /// ```
    /// use reid::{Error, Reid};
    ///
    /// let id = Reid::from_parts(1_700_000_000_000_000, 0x0123_4567_89AB).unwrap();
    ///
    /// // cspell:disable-next-line
    /// assert_eq!(id.to_string(), "0R52860Y800028T5CY4TQ0ZS");
    ///
    /// assert_eq!(Reid::from_parts(1 << 56, 0), Err(Error::TimestampOutOfRange));
    /// assert_eq!(Reid::from_parts(0, 1 << 48), Err(Error::RandomnessOutOfRange));
    /// ```
    pub fn from_parts(timestamp: u64, randomness: u64) -> Result<Self, Error> {
        if timestamp > TIMESTAMP_MAX {
            return Err(Error::TimestampOutOfRange);
        }
        if randomness > RANDOM_MAX {
            return Err(Error::RandomnessOutOfRange);
        }

        let mut bytes = [0; BYTE_LEN];
        bytes[..TIMESTAMP_BYTES].copy_from_slice(&timestamp.to_be_bytes()[8 - TIMESTAMP_BYTES..]);
        bytes[TIMESTAMP_BYTES..PAYLOAD_LEN].copy_from_slice(&randomness.to_be_bytes()[8 - RANDOM_BYTES..]);
        checksum::seal(&mut bytes);

        Ok(Self::from_raw(bytes, None, Delimiter::default()))
    }

    /// Returns the binary form.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; BYTE_LEN] {
        self.bytes
    }

    /// Returns a reference to the binary form.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; BYTE_LEN] {
        &self.bytes
    }

    /// Returns the timestamp part of a `Reid`.
    ///
    /// The timestamp is measured in microseconds since the Unix epoch (1. January 1970),
    /// truncated to 56 bits.
    ///
    /// # Example
    ///
    /// ```
    /// let id = reid::generate(None).unwrap();
    ///
    /// assert!(id.timestamp() > 1_704_067_200_000_000); // 1st January 2024
    /// ```
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        let mut be = [0; 8];
        be[8 - TIMESTAMP_BYTES..].copy_from_slice(&self.bytes[..TIMESTAMP_BYTES]);
        u64::from_be_bytes(be)
    }

    /// Returns the random part of a `Reid`.
    ///
    /// The randomness of a `Reid` is limited to 48 bits.
    #[must_use]
    pub fn randomness(&self) -> u64 {
        let mut be = [0; 8];
        be[8 - RANDOM_BYTES..].copy_from_slice(&self.bytes[TIMESTAMP_BYTES..PAYLOAD_LEN]);
        u64::from_be_bytes(be)
    }

    /// Returns the stored checksum.
    #[must_use]
    pub const fn checksum(&self) -> u16 {
        checksum::stored_checksum(&self.bytes)
    }

    /// Returns the timestamp part of a `Reid` as a `SystemTime`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::SystemTime;
    ///
    /// let id = reid::generate(None).unwrap();
    ///
    /// assert!(id.datetime() <= SystemTime::now());
    /// ```
    #[must_use]
    pub fn datetime(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_micros(self.timestamp())
    }

    /// Returns the prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the delimiter used to join prefix and body.
    #[must_use]
    pub const fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Returns the canonical 24 symbol body, without prefix and delimiter.
    #[must_use]
    pub fn body(&self) -> String {
        base32::encode_fixed(&self.bytes).iter().map(|&b| char::from(b)).collect()
    }

    /// Returns this `Reid` with a different prefix.
    ///
    /// An empty prefix removes the prefix.
    ///
    /// # Errors
    ///
    /// Fails if the prefix is too long or contains the delimiter.
    ///
    /// # Example
    ///
    /// ```
    /// use reid::Error;
    ///
    /// let id = reid::generate(Some("pk")).unwrap();
    /// let sk = id.clone().with_prefix("sk").unwrap();
    ///
    /// assert_eq!(sk.prefix(), Some("sk"));
    /// assert_eq!(sk.body(), id.body());
    ///
    /// assert_eq!(id.with_prefix("a_b"), Err(Error::InvalidPrefix));
    /// ```
    pub fn with_prefix(self, prefix: &str) -> Result<Self, Error> {
        let prefix = util::check_prefix(Some(prefix), self.delimiter)?;
        Ok(Self { prefix, ..self })
    }

    /// Returns this `Reid` without prefix.
    #[must_use]
    pub fn without_prefix(self) -> Self {
        Self { prefix: None, ..self }
    }

    /// Returns this `Reid` rendered with a different delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrefix`] if the prefix contains the new delimiter.
    ///
    /// # Example
    ///
    /// ```
    /// use reid::Delimiter;
    ///
    /// let id = reid::generate(Some("pk")).unwrap();
    /// let dotted = id.clone().with_delimiter(Delimiter::Dot).unwrap();
    ///
    /// assert_eq!(dotted.to_string(), format!("pk.{}", id.body()));
    /// ```
    pub fn with_delimiter(self, delimiter: Delimiter) -> Result<Self, Error> {
        let prefix = util::check_prefix(self.prefix(), delimiter)?;
        Ok(Self {
            prefix,
            delimiter,
            ..self
        })
    }

    /// Converts a `Reid` into a `String`.
    ///
    /// In contrast to the `ToString` trait, this method doesn't panic if allocation fails.
    #[must_use]
    pub fn try_to_string(&self) -> Option<String> {
        let len = self.prefix.as_ref().map_or(0, |prefix| prefix.len() + 1) + BODY_LEN;

        let mut s = String::new();
        s.try_reserve_exact(len).ok()?;
        write!(s, "{self}").ok()?;

        Some(s)
    }
}

impl fmt::Display for Reid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(prefix) = &self.prefix {
            f.write_str(prefix)?;
            f.write_char(self.delimiter.as_char())?;
        }
        for &b in &base32::encode_fixed(&self.bytes) {
            f.write_char(char::from(b))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Reid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        util::debug_reid("Reid", self, f)
    }
}

impl FromStr for Reid {
    type Err = Error;

    /// Parses a `Reid` using the process-wide delimiter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}

impl From<Reid> for [u8; BYTE_LEN] {
    fn from(id: Reid) -> Self {
        id.bytes
    }
}

impl TryFrom<[u8; BYTE_LEN]> for Reid {
    type Error = Error;

    fn try_from(bytes: [u8; BYTE_LEN]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}
