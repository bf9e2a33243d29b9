use std::{fmt::Formatter, time::SystemTime};

use crate::{Delimiter, Error, Reid, BODY_LEN, MAX_PREFIX_LEN};

pub fn as_array(bytes: &[u8]) -> Result<&[u8; BODY_LEN], Error> {
    use std::cmp::Ordering;

    match bytes.len().cmp(&BODY_LEN) {
        Ordering::Equal => bytes.try_into().map_err(|_| Error::InvalidChar),
        Ordering::Less => Err(Error::TooShort),
        Ordering::Greater => Err(Error::TooLong),
    }
}

/// Checks a prefix to be stored into a REID.
///
/// An absent or empty prefix means "no prefix".
pub fn check_prefix(prefix: Option<&str>, delimiter: Delimiter) -> Result<Option<Box<str>>, Error> {
    match prefix {
        None | Some("") => Ok(None),
        Some(prefix) if prefix.chars().count() > MAX_PREFIX_LEN => Err(Error::PrefixTooLong),
        Some(prefix) if prefix.contains(delimiter.as_char()) => Err(Error::InvalidPrefix),
        Some(prefix) => Ok(Some(prefix.into())),
    }
}

pub fn debug_reid(name: &str, reid: &Reid, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
    struct Timestamp(SystemTime);
    impl std::fmt::Debug for Timestamp {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
            write!(f, "\"{ts}\"", ts = timestamp_to_string(self.0))
        }
    }

    struct Randomness(u64);
    impl std::fmt::Debug for Randomness {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
            write!(f, "\"{:012X}\"", self.0)
        }
    }

    f.debug_struct(name)
        .field("string", &reid.to_string())
        .field("timestamp", &Timestamp(reid.datetime()))
        .field("randomness", &Randomness(reid.randomness()))
        .finish()
}

/// Formats as ISO-8601 in UTC with microsecond precision.
fn timestamp_to_string(time: SystemTime) -> String {
    let since_epoch = time.duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let (secs, micros) = (since_epoch.as_secs(), since_epoch.subsec_micros());

    let (days, secs_of_day) = (secs / 86_400, secs % 86_400);
    let (hours, minutes, seconds) = (secs_of_day / 3600, secs_of_day / 60 % 60, secs_of_day % 60);

    // Civil date from days since 1970-01-01. Eras are 400 years long and start on March 1st,
    // so leap days fall on the last day of a (shifted) year.
    let z = days + 719_468;
    let (era, day_of_era) = (z / 146_097, z % 146_097);
    let year_of_era = (day_of_era - day_of_era / 1460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;

    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 { shifted_month + 3 } else { shifted_month - 9 };
    let year = era * 400 + year_of_era + u64::from(month <= 2);

    format!("{year:04}-{month:02}-{day:02}T{hours:02}:{minutes:02}:{seconds:02}.{micros:06}Z")
}
