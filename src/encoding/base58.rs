//! Base58 and Base58Check
//!
//! Bytes are read as one big-endian integer and written in base 58. Each leading
//! zero byte becomes a leading `'1'`. Base58Check appends the first four bytes of
//! `hash256(payload)` before encoding.

use super::hash::hash256;
use crate::error::{Error, Result};
use log::debug;
use num_bigint::BigUint;

pub const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Address version byte for mainnet P2PKH
pub const MAINNET_VERSION: u8 = 0x00;
/// Address version byte for testnet P2PKH
pub const TESTNET_VERSION: u8 = 0x6f;

const CHECKSUM_LEN: usize = 4;

pub fn encode_base58(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();
    let mut out = "1".repeat(zeros);

    let rest = &data[zeros..];
    if !rest.is_empty() {
        let digits = BigUint::from_bytes_be(rest).to_radix_be(58);
        out.extend(digits.iter().map(|&d| ALPHABET[d as usize] as char));
    }
    out
}

pub fn decode_base58(s: &str) -> Result<Vec<u8>> {
    let digits = s
        .chars()
        .map(|c| {
            ALPHABET
                .iter()
                .position(|&a| a as char == c)
                .map(|d| d as u8)
                .ok_or(Error::InvalidBase58Character(c))
        })
        .collect::<Result<Vec<u8>>>()?;

    let zeros = digits.iter().take_while(|&&d| d == 0).count();
    let mut out = vec![0u8; zeros];

    let rest = &digits[zeros..];
    if !rest.is_empty() {
        // Digits are all < 58, so the conversion cannot fail
        let value = BigUint::from_radix_be(rest, 58)
            .ok_or_else(|| Error::MalformedBase58("digit out of range".to_string()))?;
        out.extend(value.to_bytes_be());
    }
    Ok(out)
}

pub fn encode_base58_check(payload: &[u8]) -> String {
    let mut data = payload.to_vec();
    data.extend_from_slice(&hash256(payload)[..CHECKSUM_LEN]);
    encode_base58(&data)
}

/// Decode and verify a Base58Check string, returning the payload without checksum
pub fn decode_base58_check(s: &str) -> Result<Vec<u8>> {
    let mut data = decode_base58(s)?;
    if data.len() < CHECKSUM_LEN {
        return Err(Error::MalformedBase58(format!(
            "{} bytes is too short for a checksum",
            data.len()
        )));
    }
    let checksum = data.split_off(data.len() - CHECKSUM_LEN);
    if hash256(&data)[..CHECKSUM_LEN] != checksum[..] {
        debug!("base58check checksum mismatch for {}", s);
        return Err(Error::ChecksumMismatch);
    }
    Ok(data)
}

/// Split a P2PKH address into its version byte and 20-byte hash
pub fn decode_address(s: &str) -> Result<(u8, [u8; 20])> {
    let payload = decode_base58_check(s)?;
    let (&version, hash) = payload
        .split_first()
        .ok_or_else(|| Error::InvalidAddress("empty payload".to_string()))?;
    if version != MAINNET_VERSION && version != TESTNET_VERSION {
        return Err(Error::InvalidAddress(format!(
            "unknown version byte 0x{:02x}",
            version
        )));
    }
    let hash: [u8; 20] = hash.try_into().map_err(|_| {
        Error::InvalidAddress(format!("expected 20-byte hash, found {}", hash.len()))
    })?;
    Ok((version, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_vectors() {
        let cases = [
            ("61", "2g"),
            ("626262", "a3gV"),
            ("636363", "aPEr"),
            ("516b6fcd0f", "ABnLTmg"),
            ("00", "1"),
            ("0000ff", "115Q"),
            (
                "00eb15231dfceb60925886b67d065299925915aeb172c06647",
                "1NS17iag9jJgTHD1VXjvLCEnZuQ3rJDE9L",
            ),
        ];
        for (hex_in, expected) in cases {
            let bytes = hex::decode(hex_in).unwrap();
            assert_eq!(encode_base58(&bytes), expected);
            assert_eq!(decode_base58(expected).unwrap(), bytes);
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode_base58(&[]), "");
        assert_eq!(decode_base58("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            decode_base58("abc0"),
            Err(Error::InvalidBase58Character('0'))
        );
        assert_eq!(decode_base58("Il"), Err(Error::InvalidBase58Character('I')));
    }

    #[test]
    fn test_check_round_trip() {
        let encoded = encode_base58_check(b"hello");
        assert_eq!(encoded, "2L5B5yqsVG8Vt");
        assert_eq!(decode_base58_check(&encoded).unwrap(), b"hello");
    }

    #[test]
    fn test_check_detects_corruption() {
        assert_eq!(
            decode_base58_check("2L5B5yqsVG8Vu"),
            Err(Error::ChecksumMismatch)
        );
    }

    #[test]
    fn test_check_too_short() {
        assert!(matches!(
            decode_base58_check("2g"),
            Err(Error::MalformedBase58(_))
        ));
    }

    #[test]
    fn test_decode_address() {
        let (version, hash) = decode_address("1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH").unwrap();
        assert_eq!(version, MAINNET_VERSION);
        assert_eq!(hex::encode(hash), "751e76e8199196d454941c45d1b3a323f1433bd6");

        let (version, _) = decode_address("mrCDrCybB6J1vRfbwM5hemdJz73FwDBC8r").unwrap();
        assert_eq!(version, TESTNET_VERSION);

        assert!(matches!(
            decode_address(&encode_base58_check(b"hello")),
            Err(Error::InvalidAddress(_))
        ));
    }
}
