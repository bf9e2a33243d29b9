use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU8, Ordering},
};

use crate::Error;

/// Separator between the prefix and the body of a REID.
///
/// Only a small set of URL and filename friendly characters is supported.
/// The delimiter never influences the binary form of a REID, only how
/// prefix and body are joined and split.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Delimiter {
    /// `_`, the default.
    #[default]
    Underscore,
    /// `-`
    Hyphen,
    /// `/`
    Slash,
    /// `\`
    Backslash,
    /// `.`
    Dot,
}

impl Delimiter {
    /// All supported delimiters.
    pub const ALL: [Self; 5] = [Self::Underscore, Self::Hyphen, Self::Slash, Self::Backslash, Self::Dot];

    /// Returns the delimiter as a `char`.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.as_ascii() as char
    }

    const fn as_ascii(self) -> u8 {
        match self {
            Self::Underscore => b'_',
            Self::Hyphen => b'-',
            Self::Slash => b'/',
            Self::Backslash => b'\\',
            Self::Dot => b'.',
        }
    }

    const fn from_ascii(ascii: u8) -> Option<Self> {
        match ascii {
            b'_' => Some(Self::Underscore),
            b'-' => Some(Self::Hyphen),
            b'/' => Some(Self::Slash),
            b'\\' => Some(Self::Backslash),
            b'.' => Some(Self::Dot),
            _ => None,
        }
    }
}

impl TryFrom<char> for Delimiter {
    type Error = Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        u8::try_from(c)
            .ok()
            .and_then(Self::from_ascii)
            .ok_or(Error::InvalidDelimiter)
    }
}

impl FromStr for Delimiter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.try_into(),
            _ => Err(Error::InvalidDelimiter),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

static DELIMITER: AtomicU8 = AtomicU8::new(b'_');

/// Sets the process-wide delimiter.
///
/// Sets a new delimiter and returns the previously set one. Only calls made
/// afterwards are affected: already created REIDs keep the delimiter they were
/// created or parsed with.
///
/// Code which needs different delimiters at the same time should use a
/// [`Codec`](crate::Codec) instead.
///
/// # Example
///
/// ```
/// use reid::Delimiter;
///
/// let previous = reid::set_delimiter(Delimiter::Hyphen);
/// assert_eq!(reid::delimiter(), Delimiter::Hyphen);
///
/// reid::set_delimiter(previous);
/// ```
pub fn set_delimiter(delimiter: Delimiter) -> Delimiter {
    let previous = DELIMITER.swap(delimiter.as_ascii(), Ordering::Relaxed);
    Delimiter::from_ascii(previous).unwrap_or_default()
}

/// Returns the process-wide delimiter.
#[must_use]
pub fn delimiter() -> Delimiter {
    Delimiter::from_ascii(DELIMITER.load(Ordering::Relaxed)).unwrap_or_default()
}
