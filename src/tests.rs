use std::sync::{Mutex, MutexGuard};

use proptest::prelude::*;
use regex::Regex;

use crate::*;

/// Serializes tests which touch process-wide state, i.e. the delimiter or the entropy source.
pub(crate) fn serial() -> MutexGuard<'static, ()> {
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| {
        LOCK.clear_poison();
        poisoned.into_inner()
    })
}

struct DelimiterRestorer(Delimiter);

impl DelimiterRestorer {
    fn set(delimiter: Delimiter) -> Self {
        Self(set_delimiter(delimiter))
    }
}

impl Drop for DelimiterRestorer {
    fn drop(&mut self) {
        set_delimiter(self.0);
    }
}

#[test]
fn test_sizeof() {
    assert_eq!(size_of::<Error>(), 1);
    assert_eq!(size_of::<Delimiter>(), 1);
    assert_eq!(size_of::<Codec>(), 1);
}

#[test]
const fn test_send_sync() {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}

    assert_send::<Reid>();
    assert_sync::<Reid>();

    assert_send::<Codec>();
    assert_sync::<Codec>();

    assert_send::<Error>();
    assert_sync::<Error>();

    assert_send::<EntropySourceHandle>();
}

#[test]
fn test_string_length() {
    let _serial = serial();

    assert_eq!(generate(None).unwrap().to_string().len(), 24);
    assert_eq!(generate(Some("prefix")).unwrap().to_string().len(), 31);
}

#[test]
fn test_uniques() {
    let _serial = serial();

    let id1 = generate(None).unwrap();
    let id2 = generate(None).unwrap();
    let id3 = generate(None).unwrap();

    assert_ne!(id1, id2);
    assert_ne!(id2, id3);
    assert_ne!(id3, id1);
}

#[test]
#[cfg_attr(miri, ignore)] // miri execution is to slow
fn test_timestamp() {
    let _serial = serial();

    let id1 = generate(None).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(1));
    let id2 = generate(None).unwrap();

    assert!(id1.timestamp() < id2.timestamp());
    assert!(id1 < id2);
}

#[test]
fn test_set_delimiter() {
    let _serial = serial();
    let _restore = DelimiterRestorer::set(Delimiter::Hyphen);

    let re = Regex::new("^prefix-[A-Z0-9]+$").unwrap();

    let id = generate(Some("prefix")).unwrap();
    let s = id.to_string();
    assert!(re.is_match(&s), "{s}");
    assert_eq!(parse(&s), Ok(id));

    // `_` is an ordinary prefix character now.
    let id = generate(Some("pk_live")).unwrap();
    assert!(id.to_string().starts_with("pk_live-"));
    assert_eq!(generate(Some("pk-live")), Err(Error::InvalidPrefix));
}

#[test]
fn test_set_delimiter_affects_new_reids_only() {
    let _serial = serial();

    let underscore = generate(Some("pk")).unwrap();

    let _restore = DelimiterRestorer::set(Delimiter::Slash);
    let slash = generate(Some("pk")).unwrap();

    assert!(underscore.to_string().starts_with("pk_"));
    assert!(slash.to_string().starts_with("pk/"));

    assert_eq!(parse(&slash.to_string()), Ok(slash));
    assert_eq!(parse(&underscore.to_string()), Err(Error::TooLong));
}

#[test]
fn test_prefix_boundaries() {
    let _serial = serial();

    let s23 = "12345678901234567890123";
    let s25 = "1234567890123456789012345";

    assert!(generate(Some(s23)).is_ok());
    assert_eq!(generate(Some(s25)), Err(Error::PrefixTooLong));

    // Too short for a body, but taken as one anyway.
    assert_eq!(resolve(s25), Err(Error::TooLong));
    assert_eq!(resolve(s23).unwrap().prefix(), Some(s23));
}

#[test]
fn test_format_vs_checksum_errors() {
    let _serial = serial();

    assert_eq!(validate("12345678901234567890123.").map_err(Error::kind), Err(ErrorKind::Format));

    let id = generate(Some("pk")).unwrap();
    let mut s = id.to_string();
    let last = s.pop().unwrap();
    s.push(if last == '0' { '1' } else { '0' });

    assert_eq!(validate(&s).map_err(Error::kind), Err(ErrorKind::Checksum));
}

#[test]
fn test_case_and_confusables() {
    let _serial = serial();

    let id = generate(Some("Pk")).unwrap();
    let s = id.to_string();

    let lower = format!("Pk_{}", id.body().to_lowercase());
    assert_eq!(parse(&lower), Ok(id.clone()));
    assert_eq!(canonicalize(&lower), Ok(s.as_str().into()));

    let confused = s.replace('0', "o").replace('1', "l");
    assert_eq!(parse(&confused), Ok(id));
}

#[test]
fn test_debug_fmt() {
    let id = Reid::from_parts(1_700_000_000_000_000, 0x0123_4567_89AB).unwrap();

    assert_eq!(
        format!("{id:?}"),
        r#"Reid { string: "0R52860Y800028T5CY4TQ0ZS", timestamp: "2023-11-14T22:13:20.000000Z", randomness: "0123456789AB" }"# // cspell:disable-line
    );
}

fn body_strategy() -> impl Strategy<Value = String> {
    "[0-9A-HJKMNPQRSTV-Za-hjkmnpqrstv-zOoIiLl]{24}"
}

proptest! {
    #[test]
    fn prop_canonicalize_is_idempotent(body in body_strategy()) {
        let codec = Codec::default();

        let once = codec.canonicalize(&body).unwrap().into_owned();
        let twice = codec.canonicalize(&once).unwrap();

        prop_assert!(matches!(twice, std::borrow::Cow::Borrowed(_)));
        prop_assert_eq!(twice, once.as_str());
        let canonical = Regex::new("^[0-9A-HJKMNP-TV-Z]{24}$").unwrap();
        prop_assert!(canonical.is_match(&once));
    }

    #[test]
    fn prop_roundtrip(timestamp in 0..=TIMESTAMP_MAX, randomness in 0..=RANDOM_MAX, prefix in "[a-z]{0,23}") {
        let codec = Codec::new(Delimiter::Dot);

        let id = Reid::from_parts(timestamp, randomness)
            .and_then(|id| id.with_delimiter(Delimiter::Dot))
            .and_then(|id| id.with_prefix(&prefix))
            .unwrap();
        let s = id.to_string();
        let parsed = codec.parse(&s).unwrap();

        prop_assert_eq!(parsed.timestamp(), timestamp);
        prop_assert_eq!(parsed.randomness(), randomness);
        prop_assert_eq!(parsed.to_string(), s);
    }

    #[test]
    fn prop_single_symbol_change_is_detected(
        timestamp in 0..=TIMESTAMP_MAX,
        randomness in 0..=RANDOM_MAX,
        position in 0..BODY_LEN,
        replacement in 0..32usize,
    ) {
        const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

        let codec = Codec::default();
        let mut body = Reid::from_parts(timestamp, randomness).unwrap().body().into_bytes();

        prop_assume!(body[position] != ALPHABET[replacement]);
        body[position] = ALPHABET[replacement];

        let tampered = String::from_utf8(body).unwrap();
        prop_assert_eq!(codec.validate(&tampered), Err(Error::ChecksumMismatch));
    }
}
