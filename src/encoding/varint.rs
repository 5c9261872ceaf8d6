//! Variable-length integers used as length prefixes
//!
//! | value            | encoding          |
//! |------------------|-------------------|
//! | < 0xfd           | 1 byte            |
//! | ≤ 0xffff         | 0xfd + u16 LE     |
//! | ≤ 0xffff_ffff    | 0xfe + u32 LE     |
//! | otherwise        | 0xff + u64 LE     |

use crate::error::{Error, Result};

pub fn encode_varint(value: u64) -> Vec<u8> {
    if value < 0xfd {
        vec![value as u8]
    } else if value <= 0xffff {
        let mut out = vec![0xfd];
        out.extend_from_slice(&(value as u16).to_le_bytes());
        out
    } else if value <= 0xffff_ffff {
        let mut out = vec![0xfe];
        out.extend_from_slice(&(value as u32).to_le_bytes());
        out
    } else {
        let mut out = vec![0xff];
        out.extend_from_slice(&value.to_le_bytes());
        out
    }
}

/// Read a varint from the front of `input`, advancing it past the bytes consumed
pub fn read_varint(input: &mut &[u8]) -> Result<u64> {
    let (&prefix, rest) = input
        .split_first()
        .ok_or_else(|| Error::MalformedVarint("empty input".to_string()))?;
    let width = match prefix {
        0xfd => 2,
        0xfe => 4,
        0xff => 8,
        _ => {
            *input = rest;
            return Ok(prefix as u64);
        }
    };
    if rest.len() < width {
        return Err(Error::MalformedVarint(format!(
            "expected {} bytes after prefix 0x{:02x}, found {}",
            width,
            prefix,
            rest.len()
        )));
    }
    let mut buf = [0u8; 8];
    buf[..width].copy_from_slice(&rest[..width]);
    *input = &rest[width..];
    Ok(u64::from_le_bytes(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_boundaries() {
        assert_eq!(encode_varint(0), vec![0x00]);
        assert_eq!(encode_varint(0xfc), vec![0xfc]);
        assert_eq!(encode_varint(0xfd), vec![0xfd, 0xfd, 0x00]);
        assert_eq!(encode_varint(0xffff), vec![0xfd, 0xff, 0xff]);
        assert_eq!(encode_varint(0x10000), vec![0xfe, 0x00, 0x00, 0x01, 0x00]);
        assert_eq!(
            encode_varint(0x1_0000_0000),
            vec![0xff, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_read_advances_input() {
        let bytes = [0xfd, 0x2c, 0x01, 0x6a, 0x05];
        let mut input = &bytes[..];
        assert_eq!(read_varint(&mut input).unwrap(), 300);
        assert_eq!(read_varint(&mut input).unwrap(), 0x6a);
        assert_eq!(input, &[0x05]);
    }

    #[test]
    fn test_read_every_width() {
        for value in [0u64, 0xfc, 0xfd, 0x1234, 0xffff, 0x10000, 0xdead_beef, u64::MAX] {
            let encoded = encode_varint(value);
            let mut input = &encoded[..];
            assert_eq!(read_varint(&mut input).unwrap(), value);
            assert!(input.is_empty());
        }
    }

    #[test]
    fn test_read_truncated() {
        let mut empty: &[u8] = &[];
        assert!(matches!(
            read_varint(&mut empty),
            Err(Error::MalformedVarint(_))
        ));
        let mut short: &[u8] = &[0xfe, 0x01, 0x02];
        assert!(matches!(
            read_varint(&mut short),
            Err(Error::MalformedVarint(_))
        ));
    }
}
