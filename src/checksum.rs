use crc::{Crc, CRC_16_IBM_3740};

use crate::{BYTE_LEN, PAYLOAD_LEN};

// CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, unreflected, no final xor.
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

pub fn checksum(payload: &[u8]) -> u16 {
    CRC16.checksum(payload)
}

/// Computes the checksum over the payload of a binary REID.
pub fn payload_checksum(bytes: &[u8; BYTE_LEN]) -> u16 {
    checksum(&bytes[..PAYLOAD_LEN])
}

/// Returns the checksum stored in a binary REID.
pub const fn stored_checksum(bytes: &[u8; BYTE_LEN]) -> u16 {
    u16::from_be_bytes([bytes[PAYLOAD_LEN], bytes[PAYLOAD_LEN + 1]])
}

pub fn seal(bytes: &mut [u8; BYTE_LEN]) {
    let crc = payload_checksum(bytes);
    bytes[PAYLOAD_LEN..].copy_from_slice(&crc.to_be_bytes());
}

pub fn verify(bytes: &[u8; BYTE_LEN]) -> bool {
    payload_checksum(bytes) == stored_checksum(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(checksum(b"123456789"), 0x29B1);
        assert_eq!(checksum(&[0; PAYLOAD_LEN]), 0x280C);
    }

    #[test]
    fn test_seal_and_verify() {
        let mut bytes = *b"\x06\x0a\x24\x18\x1e\x40\x00\x01\x23\x45\x67\x89\xab\x00\x00";
        assert!(!verify(&bytes));

        seal(&mut bytes);
        assert_eq!(stored_checksum(&bytes), 0x83F9);
        assert!(verify(&bytes));

        bytes[7] ^= 0x01;
        assert!(!verify(&bytes));
    }
}
