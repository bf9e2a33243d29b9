//! Crockford-style base32 codec.
//!
//! The alphabet consists of the digits `0`-`9` followed by the uppercase
//! letters without `I`, `L`, `O` and `U`. Bit groups are taken from the most
//! significant end of the buffer, and no padding characters are ever emitted.
//!
//! [`encode`] and [`decode`] work on buffers of any length. [`normalize`] is the
//! lenient first phase applied to user typed input; [`decode`] itself only
//! accepts canonical symbols.

use std::borrow::Cow;

use crate::{Error, BODY_LEN, BYTE_LEN};

// cspell:disable-next-line
const ALPHABET: [u8; 32] = *b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const BITS_PER_SYMBOL: usize = 5;
const NO_VALUE: u8 = 0xFF;

#[allow(clippy::cast_possible_truncation)]
const DECODE: [u8; 256] = {
    let mut table = [NO_VALUE; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encodes a byte buffer as base32.
///
/// The buffer is read as one big-endian bit string and sliced into 5-bit groups.
/// If its bit length is not a multiple of five, the last group is padded with zero bits on the right,
/// so the leftover bits keep their position: `[0xFF]` encodes as `ZW`, not as `Z7`.
/// Encoders which read the short tail as a number of its own produce different text for such buffers.
///
/// When `max_bits` is given, only the symbols covering the first `max_bits` bits are emitted.
/// Values larger than the bit length of the buffer are ignored.
///
/// # Example
///
/// ```
/// use reid::base32;
///
/// // cspell:disable-next-line
/// assert_eq!(base32::encode(b"hello", None), "D1JPRV3F");
/// assert_eq!(base32::encode(&[0xFF], None), "ZW");
/// assert_eq!(base32::encode(&[0xFF], Some(5)), "Z");
/// ```
#[must_use]
pub fn encode(bytes: &[u8], max_bits: Option<usize>) -> String {
    let total_bits = bytes.len() * 8;
    let bits = max_bits.map_or(total_bits, |max| max.min(total_bits));
    let symbols = bits.div_ceil(BITS_PER_SYMBOL);

    let mut encoded = String::with_capacity(symbols);
    let mut acc = 0_u16;
    let mut pending = 0;

    for &byte in bytes {
        acc = (acc << 8) | u16::from(byte);
        pending += 8;

        while pending >= BITS_PER_SYMBOL {
            if encoded.len() == symbols {
                return encoded;
            }
            pending -= BITS_PER_SYMBOL;
            encoded.push(symbol(acc >> pending));
        }

        acc &= (1 << pending) - 1;
    }

    if pending > 0 && encoded.len() < symbols {
        encoded.push(symbol(acc << (BITS_PER_SYMBOL - pending)));
    }

    encoded
}

/// Decodes a base32 string into bytes.
///
/// Every symbol contributes 5 bits; the final partial byte is padded with zero bits,
/// so `ceil(len * 5 / 8)` bytes are returned.
///
/// # Errors
///
/// Returns [`Error::InvalidChar`] if the string contains a character outside the alphabet.
/// No normalization happens here: lowercase letters and the ambiguous letters `I`, `L`, `O` are rejected.
/// Use [`normalize()`] first for user typed input.
///
/// # Example
///
/// ```
/// use reid::{base32, Error};
///
/// // cspell:disable-next-line
/// assert_eq!(base32::decode("D1JPRV3F"), Ok(b"hello".to_vec()));
/// assert_eq!(base32::decode("ZW"), Ok(vec![0xFF, 0x00]));
/// assert_eq!(base32::decode("O0"), Err(Error::InvalidChar));
/// ```
#[allow(clippy::cast_possible_truncation)]
pub fn decode(text: &str) -> Result<Vec<u8>, Error> {
    let mut decoded = Vec::with_capacity((text.len() * BITS_PER_SYMBOL).div_ceil(8));
    let mut acc = 0_u16;
    let mut pending = 0;

    for byte in text.bytes() {
        acc = (acc << BITS_PER_SYMBOL) | u16::from(value(byte)?);
        pending += BITS_PER_SYMBOL;

        if pending >= 8 {
            pending -= 8;
            decoded.push((acc >> pending) as u8);
            acc &= (1 << pending) - 1;
        }
    }

    if pending > 0 {
        decoded.push((acc << (8 - pending)) as u8);
    }

    Ok(decoded)
}

/// Normalizes user typed base32 text.
///
/// Letters are converted into uppercase, `O` is replaced by `0`, and `I` and `L` are replaced by `1`.
/// Nothing is rejected here; every other character is passed through unchanged.
///
/// If the input is already normalized, it is returned borrowed without allocating a new `String`.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use reid::base32;
///
/// // cspell:disable-next-line
/// assert_eq!(base32::normalize("olixj"), "011XJ");
/// assert!(matches!(base32::normalize("011XJ"), Cow::Borrowed(_)));
/// ```
#[must_use]
pub fn normalize(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| normalize_char(c) == c) {
        text.into()
    } else {
        text.chars().map(normalize_char).collect::<String>().into()
    }
}

/// Encodes the binary form of a REID into its 24 symbol body.
pub fn encode_fixed(bytes: &[u8; BYTE_LEN]) -> [u8; BODY_LEN] {
    let mut be = [0; 16];
    be[1..].copy_from_slice(bytes);
    let mut n = u128::from_be_bytes(be);

    let mut buffer = [0; BODY_LEN];
    for byte in buffer.iter_mut().rev() {
        *byte = ALPHABET[(n & 0x1F) as usize];
        n >>= BITS_PER_SYMBOL;
    }
    buffer
}

/// Decodes a 24 symbol body into the binary form of a REID.
///
/// # Errors
///
/// Returns [`Error::InvalidChar`] for symbols outside the alphabet. The input must already be normalized.
pub fn decode_fixed(ascii_bytes: &[u8; BODY_LEN]) -> Result<[u8; BYTE_LEN], Error> {
    let mut n = 0_u128;
    for &byte in ascii_bytes {
        n = (n << BITS_PER_SYMBOL) | u128::from(value(byte)?);
    }

    let mut bytes = [0; BYTE_LEN];
    bytes.copy_from_slice(&n.to_be_bytes()[1..]);
    Ok(bytes)
}

fn symbol(bits: u16) -> char {
    char::from(ALPHABET[usize::from(bits & 0x1F)])
}

fn value(ascii: u8) -> Result<u8, Error> {
    match DECODE[usize::from(ascii)] {
        NO_VALUE => Err(Error::InvalidChar),
        value => Ok(value),
    }
}

const fn normalize_char(c: char) -> char {
    match c {
        'o' | 'O' => '0',
        'i' | 'I' | 'l' | 'L' => '1',
        other => other.to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(&[], None), "");
        assert_eq!(encode(&[0x00, 0x01], None), "000G");
        assert_eq!(encode(&[0xDE, 0xAD, 0xBE, 0xEF], None), "VTPVXVR");
        assert_eq!(encode(&[0xFF; 5], None), "ZZZZZZZZ");
    }

    #[test]
    fn test_encode_pads_tail_on_the_right() {
        assert_eq!(encode(&[0xFF], None), "ZW");
        assert_eq!(encode(&[0x01], None), "04");
        assert_eq!(encode(&[0xFF, 0xFF, 0xFF], None), "ZZZZY");

        // Tail bits keep their weight, so the tail decodes back to the same byte.
        assert_eq!(decode("ZW"), Ok(vec![0xFF, 0x00]));
        assert_ne!(encode(&[0xFF], None), "Z7");
    }

    #[test]
    fn test_encode_max_bits() {
        assert_eq!(encode(&[0xFF, 0xFF], Some(10)), "ZZ");
        assert_eq!(encode(&[0xFF, 0xFF], Some(11)), "ZZZ");
        assert_eq!(encode(&[0xFF, 0xFF], Some(0)), "");
        assert_eq!(encode(&[0xFF, 0xFF], Some(1000)), "ZZZG");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(""), Ok(vec![]));
        assert_eq!(decode("000G"), Ok(vec![0x00, 0x01, 0x00]));
        assert_eq!(decode("VTPVXVR"), Ok(vec![0xDE, 0xAD, 0xBE, 0xEF, 0x00]));
        assert_eq!(decode("ZZZZZZZZ"), Ok(vec![0xFF; 5]));
    }

    #[test]
    fn test_decode_rejects_non_canonical() {
        for text in ["u", "U", "i", "I", "l", "L", "o", "O", "a", "_", "-", " ", "é", "00000.00"] {
            assert_eq!(decode(text), Err(Error::InvalidChar), "{text:?}");
        }
    }

    #[test]
    fn test_decode_then_encode_is_lossless() {
        // cspell:disable-next-line
        for text in ["0", "Z", "ZW", "7", "0123456789ABCDEFGHJKMNPQRSTVWXYZ", "SMA11TXT", "Q9"] {
            let bytes = decode(text).unwrap();
            assert_eq!(encode(&bytes, Some(text.len() * 5)), text);
        }
    }

    #[test]
    fn test_alphabet_order() {
        let all: Vec<u8> = (0..32).collect();
        let text: String = all.iter().map(|&v| symbol(u16::from(v))).collect();
        // cspell:disable-next-line
        assert_eq!(text, "0123456789ABCDEFGHJKMNPQRSTVWXYZ");

        for (i, &c) in ALPHABET.iter().enumerate() {
            assert_eq!(usize::from(DECODE[usize::from(c)]), i);
        }
    }

    #[test]
    fn test_fixed_matches_generic() {
        let samples = [
            [0x00; BYTE_LEN],
            [0xFF; BYTE_LEN],
            *b"\x06\x0a\x24\x18\x1e\x40\x00\x01\x23\x45\x67\x89\xab\x83\xf9",
        ];
        for bytes in samples {
            let fixed = encode_fixed(&bytes);
            assert_eq!(fixed.as_slice(), encode(&bytes, None).as_bytes());
            assert_eq!(decode_fixed(&fixed), Ok(bytes));
            assert_eq!(decode(&encode(&bytes, None)).as_deref(), Ok(bytes.as_slice()));
        }
    }

    #[test]
    fn test_decode_fixed_invalid() {
        let mut body = [b'0'; BODY_LEN];
        body[23] = b'U';
        assert_eq!(decode_fixed(&body), Err(Error::InvalidChar));
    }

    #[test]
    fn test_normalize() {
        // cspell:disable-next-line
        let src = "0abcdefghijklmnopqrstvwxyz";
        // cspell:disable-next-line
        let exp = "0ABCDEFGH1JK1MN0PQRSTVWXYZ";

        let n1 = normalize(src);
        assert!(matches!(n1, Cow::Owned(_)));
        assert_eq!(n1, exp);

        let n2 = normalize(&n1);
        assert!(matches!(n2, Cow::Borrowed(_)));
        assert_eq!(n2, exp);

        assert_eq!(normalize("oooOOO000"), "000000000");
        // cspell:disable-next-line
        assert_eq!(normalize("iiIIllLL11"), "1111111111");
        assert_eq!(normalize("u.é"), "U.é");
    }
}
