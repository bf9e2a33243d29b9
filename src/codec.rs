use std::borrow::Cow;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{base32, checksum, generator, util, Delimiter, EntropySource, Error, Reid, PREFIX_THRESHOLD};

/// Generates and parses REIDs with an explicit delimiter.
///
/// The free functions of this crate use the process-wide delimiter
/// (see [`set_delimiter`](crate::set_delimiter)). A `Codec` carries its own
/// delimiter instead, so differently configured codecs can be used side by side
/// without touching global state.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), reid::Error> {
/// use reid::{Codec, Delimiter};
///
/// let codec = Codec::new(Delimiter::Hyphen);
///
/// let id = codec.generate(Some("pk"))?;
/// let s = id.to_string();
///
/// assert!(s.starts_with("pk-"));
/// assert_eq!(codec.parse(&s)?, id);
/// # Ok(()) }
/// ```
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Codec {
    delimiter: Delimiter,
}

impl Codec {
    /// Creates a codec using the given delimiter.
    #[must_use]
    pub const fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    /// Creates a codec using the current process-wide delimiter.
    #[must_use]
    pub fn current() -> Self {
        Self::new(crate::delimiter())
    }

    /// Returns the delimiter of this codec.
    #[must_use]
    pub const fn delimiter(self) -> Delimiter {
        self.delimiter
    }

    /// Generates a new REID, optionally with a prefix.
    ///
    /// An empty prefix is the same as no prefix.
    ///
    /// # Errors
    ///
    /// Generation itself cannot fail, only the prefix is checked:
    ///
    /// - [`Error::PrefixTooLong`] if it is longer than [`MAX_PREFIX_LEN`](crate::MAX_PREFIX_LEN) characters,
    /// - [`Error::InvalidPrefix`] if it contains the delimiter.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(delimiter = %self.delimiter)))]
    pub fn generate(&self, prefix: Option<&str>) -> Result<Reid, Error> {
        let prefix = util::check_prefix(prefix, self.delimiter)?;
        Ok(Reid::from_raw(generator::generate(), prefix, self.delimiter))
    }

    /// Generates a new REID using an explicit entropy source.
    ///
    /// # Errors
    ///
    /// Same as [`Codec::generate`].
    pub fn generate_from<S: EntropySource + ?Sized>(&self, source: &mut S, prefix: Option<&str>) -> Result<Reid, Error> {
        let prefix = util::check_prefix(prefix, self.delimiter)?;
        Ok(Reid::from_raw(generator::generate_from(source), prefix, self.delimiter))
    }

    /// Parses and validates a REID.
    ///
    /// If the text contains the delimiter or is longer than 23 characters, everything before the
    /// last delimiter is taken as the prefix. The body is normalized before it is validated:
    /// it is converted into uppercase, `O` becomes `0`, `I` and `L` become `1`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPrefix`] if the prefix in front of the delimiter is empty,
    /// - [`Error::TooShort`] or [`Error::TooLong`] if the body has not 24 characters,
    /// - [`Error::InvalidChar`] if the body contains characters outside the base32 alphabet,
    /// - [`Error::ChecksumMismatch`] if the body is well formed, but its checksum does not match.
    ///
    /// # Example
    ///
    /// ```
    /// use reid::{Codec, Error};
    ///
    /// let codec = Codec::default();
    ///
    /// // cspell:disable-next-line
    /// let id = codec.parse("pk_0r52860y800028t5cy4tqozs").unwrap();
    /// assert_eq!(id.prefix(), Some("pk"));
    /// // cspell:disable-next-line
    /// assert_eq!(id.to_string(), "pk_0R52860Y800028T5CY4TQ0ZS");
    ///
    /// // cspell:disable-next-line
    /// assert_eq!(codec.parse("pk_0R52860Y800028T5CY4TQ0ZT"), Err(Error::ChecksumMismatch));
    /// assert_eq!(codec.parse("12345678901234567890123."), Err(Error::InvalidChar));
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self), fields(delimiter = %self.delimiter), err))]
    pub fn parse(&self, text: &str) -> Result<Reid, Error> {
        let (prefix, body) = self.split(text)?;

        let body = base32::normalize(body);
        let bytes = base32::decode_fixed(util::as_array(body.as_bytes())?)?;

        if !checksum::verify(&bytes) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                stored = checksum::stored_checksum(&bytes),
                computed = checksum::payload_checksum(&bytes),
                "checksum mismatch"
            );
            return Err(Error::ChecksumMismatch);
        }

        Ok(Reid::from_raw(bytes, prefix.map(Into::into), self.delimiter))
    }

    /// Canonicalizes a REID string.
    ///
    /// The body is normalized and checked for the correct length and valid characters.
    /// The prefix is kept as it is. The checksum is *not* checked, see [`Codec::validate`] for that.
    ///
    /// If the input is already in canonical form, it returns a borrowed version of the input string
    /// without allocating a new `String`.
    ///
    /// # Errors
    ///
    /// Same as [`Codec::parse`], except for [`Error::ChecksumMismatch`].
    ///
    /// # Example
    ///
    /// ```
    /// use reid::Codec;
    ///
    /// let codec = Codec::default();
    ///
    /// // cspell:disable-next-line
    /// let s = "pk_olixjazthsfjzt7wd6j8ir92";
    ///
    /// // cspell:disable-next-line
    /// assert_eq!(codec.canonicalize(s), Ok("pk_011XJAZTHSFJZT7WD6J81R92".into()));
    /// ```
    pub fn canonicalize<'a>(&self, text: &'a str) -> Result<Cow<'a, str>, Error> {
        let (prefix, body) = self.split(text)?;

        let normalized = base32::normalize(body);
        base32::decode_fixed(util::as_array(normalized.as_bytes())?)?;

        match (normalized, prefix) {
            (Cow::Borrowed(_), _) => Ok(text.into()),
            (Cow::Owned(body), None) => Ok(body.into()),
            (Cow::Owned(body), Some(prefix)) => Ok(format!("{prefix}{}{body}", self.delimiter).into()),
        }
    }

    /// Checks a REID string for validity, including its checksum.
    ///
    /// # Errors
    ///
    /// Same as [`Codec::parse`].
    pub fn validate(&self, text: &str) -> Result<(), Error> {
        self.parse(text).map(|_| ())
    }

    /// Parses the input if it looks like a REID, otherwise generates a new REID with the input as prefix.
    ///
    /// Input looks like a REID if it contains the delimiter or is longer than 23 characters.
    /// Empty input generates a new REID without prefix.
    ///
    /// # Errors
    ///
    /// Same as [`Codec::parse`] for input which looks like a REID.
    ///
    /// # Example
    ///
    /// ```
    /// use reid::Codec;
    ///
    /// let codec = Codec::default();
    ///
    /// let fresh = codec.resolve("pk").unwrap();
    /// assert_eq!(fresh.prefix(), Some("pk"));
    ///
    /// let parsed = codec.resolve(&fresh.to_string()).unwrap();
    /// assert_eq!(parsed, fresh);
    ///
    /// assert!(codec.resolve("1234567890123456789012345").unwrap_err().is_format_error());
    /// ```
    pub fn resolve(&self, input: &str) -> Result<Reid, Error> {
        if self.looks_like_reid(input) {
            self.parse(input)
        } else {
            self.generate(Some(input))
        }
    }

    /// Returns true if the text contains the delimiter or is longer than 23 characters.
    ///
    /// A bare body has exactly 24 characters and therefore always looks like a REID.
    #[must_use]
    pub fn looks_like_reid(&self, text: &str) -> bool {
        text.contains(self.delimiter.as_char()) || text.chars().count() > PREFIX_THRESHOLD
    }

    fn split<'a>(&self, text: &'a str) -> Result<(Option<&'a str>, &'a str), Error> {
        if !self.looks_like_reid(text) {
            return Ok((None, text));
        }
        match text.rsplit_once(self.delimiter.as_char()) {
            Some(("", _)) => Err(Error::InvalidPrefix),
            Some((prefix, body)) => Ok((Some(prefix), body)),
            None => Ok((None, text)),
        }
    }
}

impl From<Delimiter> for Codec {
    fn from(delimiter: Delimiter) -> Self {
        Self::new(delimiter)
    }
}
