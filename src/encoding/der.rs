//! DER encoding of ECDSA signatures
//!
//! ```text
//! 0x30 <len> 0x02 <rlen> <r> 0x02 <slen> <s>
//! ```
//!
//! Integers are big-endian and minimal, with a `0x00` pad when the leading byte
//! has its high bit set.

use crate::ecdsa::Signature;
use crate::error::{Error, Result};
use log::debug;
use num_bigint::BigUint;

const SEQUENCE: u8 = 0x30;
const INTEGER: u8 = 0x02;

fn encode_integer(value: &BigUint, out: &mut Vec<u8>) {
    let mut bytes = value.to_bytes_be();
    if bytes[0] & 0x80 != 0 {
        bytes.insert(0, 0x00);
    }
    out.push(INTEGER);
    out.push(bytes.len() as u8);
    out.extend_from_slice(&bytes);
}

fn malformed(reason: impl Into<String>) -> Error {
    let reason = reason.into();
    debug!("rejecting DER signature: {}", reason);
    Error::MalformedSignature(reason)
}

/// Read one `0x02 <len> <bytes>` element, returning the integer and the remainder
fn read_integer(input: &[u8]) -> Result<(BigUint, &[u8])> {
    match input {
        [INTEGER, len, rest @ ..] => {
            let len = *len as usize;
            if len == 0 {
                return Err(malformed("zero-length integer"));
            }
            if rest.len() < len {
                return Err(malformed(format!(
                    "integer declares {} bytes, {} available",
                    len,
                    rest.len()
                )));
            }
            let (bytes, rest) = rest.split_at(len);
            Ok((BigUint::from_bytes_be(bytes), rest))
        }
        [marker, ..] if *marker != INTEGER => {
            Err(malformed(format!("expected integer marker, found 0x{:02x}", marker)))
        }
        _ => Err(malformed("truncated integer")),
    }
}

impl Signature {
    /// DER encoding of (r, s)
    pub fn der(&self) -> Vec<u8> {
        let mut body = Vec::with_capacity(70);
        encode_integer(self.r.value(), &mut body);
        encode_integer(self.s.value(), &mut body);

        let mut out = Vec::with_capacity(body.len() + 2);
        out.push(SEQUENCE);
        out.push(body.len() as u8);
        out.extend_from_slice(&body);
        out
    }

    /// Parse a DER signature, requiring every declared length to match exactly
    pub fn parse_der(data: &[u8]) -> Result<Signature> {
        let body = match data {
            [SEQUENCE, len, body @ ..] => {
                if *len as usize != body.len() {
                    return Err(malformed(format!(
                        "sequence declares {} bytes, {} present",
                        len,
                        body.len()
                    )));
                }
                body
            }
            [marker, ..] if *marker != SEQUENCE => {
                return Err(malformed(format!(
                    "expected sequence marker, found 0x{:02x}",
                    marker
                )))
            }
            _ => return Err(malformed("truncated sequence header")),
        };

        let (r, rest) = read_integer(body)?;
        let (s, rest) = read_integer(rest)?;
        if !rest.is_empty() {
            return Err(malformed(format!("{} trailing bytes", rest.len())));
        }

        Signature::new(r, s).map_err(|_| malformed("integer not below the group order"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_int(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    fn sample() -> Signature {
        Signature::new(
            hex_int("37206a0610995c58074999cb9767b87af4c4978db68c06e8e6e81d282047a7c6"),
            hex_int("8ca63759c1157ebeaec0d03cecca119fc9a75bf8e6d0fa65c841c8e2738cdaec"),
        )
        .unwrap()
    }

    const SAMPLE_DER: &str = concat!(
        "3045022037206a0610995c58074999cb9767b87af4c4978db68c06e8e6e81d282047a7c6",
        "0221008ca63759c1157ebeaec0d03cecca119fc9a75bf8e6d0fa65c841c8e2738cdaec",
    );

    #[test]
    fn test_der_known_vector() {
        assert_eq!(hex::encode(sample().der()), SAMPLE_DER);
    }

    #[test]
    fn test_parse_known_vector() {
        let parsed = Signature::parse_der(&hex::decode(SAMPLE_DER).unwrap()).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_small_values_padding() {
        let sig = Signature::new(BigUint::from(1u8), BigUint::from(0x80u8)).unwrap();
        assert_eq!(hex::encode(sig.der()), "300702010102020080");
        assert_eq!(Signature::parse_der(&sig.der()).unwrap(), sig);
    }

    #[test]
    fn test_rejects_bad_markers() {
        let mut bytes = hex::decode(SAMPLE_DER).unwrap();
        bytes[0] = 0x31;
        assert!(matches!(
            Signature::parse_der(&bytes),
            Err(Error::MalformedSignature(_))
        ));

        let mut bytes = hex::decode(SAMPLE_DER).unwrap();
        bytes[2] = 0x03;
        assert!(matches!(
            Signature::parse_der(&bytes),
            Err(Error::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let mut bytes = hex::decode(SAMPLE_DER).unwrap();
        bytes.push(0x00);
        assert!(Signature::parse_der(&bytes).is_err());

        let bytes = hex::decode(SAMPLE_DER).unwrap();
        assert!(Signature::parse_der(&bytes[..bytes.len() - 1]).is_err());

        let mut bytes = hex::decode(SAMPLE_DER).unwrap();
        bytes[3] = 0x21;
        assert!(Signature::parse_der(&bytes).is_err());
    }

    #[test]
    fn test_rejects_zero_length_integer() {
        let bytes = [0x30, 0x05, 0x02, 0x00, 0x02, 0x01, 0x01];
        assert_eq!(
            Signature::parse_der(&bytes),
            Err(Error::MalformedSignature("zero-length integer".to_string()))
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert!(Signature::parse_der(&[]).is_err());
        assert!(Signature::parse_der(&[0x30]).is_err());
    }
}
