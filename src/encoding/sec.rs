//! SEC public key encoding and P2PKH addresses
//!
//! - Uncompressed: `0x04 || x (32 bytes) || y (32 bytes)`
//! - Compressed: `0x02 || x` for even `y`, `0x03 || x` for odd `y`
//!
//! Compressed keys are expanded by solving y² = x³ + 7, which works because
//! p ≡ 3 (mod 4) gives the square root as a single exponentiation.

use super::base58::{encode_base58_check, MAINNET_VERSION, TESTNET_VERSION};
use super::hash::hash160;
use crate::elliptic_curve::{Coordinates, Point};
use crate::error::{Error, Result};
use crate::secp256k1;
use log::debug;
use num_bigint::BigUint;

const UNCOMPRESSED: u8 = 0x04;
const EVEN: u8 = 0x02;
const ODD: u8 = 0x03;

/// Left-pad a field value to 32 big-endian bytes
fn to_32_bytes(value: &BigUint) -> [u8; 32] {
    let bytes = value.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}

fn malformed(reason: String) -> Error {
    debug!("rejecting SEC key: {}", reason);
    Error::MalformedSec(reason)
}

impl Point {
    /// SEC encoding of a secp256k1 point
    ///
    /// # Errors
    /// [`Error::PointAtInfinity`] for the identity.
    pub fn sec(&self, compressed: bool) -> Result<Vec<u8>> {
        let (x, y) = match self.coordinates() {
            Coordinates::Infinity => return Err(Error::PointAtInfinity),
            Coordinates::Affine { x, y } => (x, y),
        };

        let mut out = Vec::with_capacity(65);
        if compressed {
            out.push(if y.is_even() { EVEN } else { ODD });
            out.extend_from_slice(&to_32_bytes(x.value()));
        } else {
            out.push(UNCOMPRESSED);
            out.extend_from_slice(&to_32_bytes(x.value()));
            out.extend_from_slice(&to_32_bytes(y.value()));
        }
        Ok(out)
    }

    /// Decode a SEC public key into a secp256k1 point
    pub fn parse_sec(data: &[u8]) -> Result<Point> {
        match (data.first(), data.len()) {
            (Some(&UNCOMPRESSED), 65) => {
                let x = BigUint::from_bytes_be(&data[1..33]);
                let y = BigUint::from_bytes_be(&data[33..65]);
                secp256k1::point(x, y)
            }
            (Some(&marker), 33) if marker == EVEN || marker == ODD => {
                let x = secp256k1::field_element(BigUint::from_bytes_be(&data[1..33]))?;
                let alpha = secp256k1::curve().rhs(&x);
                let beta = alpha.sqrt()?;
                let y = if beta.is_even() == (marker == EVEN) {
                    beta
                } else {
                    beta.negate()
                };
                secp256k1::curve().point(x, y)
            }
            (Some(&marker), len) => Err(malformed(format!(
                "marker 0x{:02x} with length {}",
                marker, len
            ))),
            (None, _) => Err(malformed("empty input".to_string())),
        }
    }

    /// Hash160 of the SEC encoding
    pub fn hash160(&self, compressed: bool) -> Result<[u8; 20]> {
        Ok(hash160(&self.sec(compressed)?))
    }

    /// Base58Check P2PKH address: version byte followed by hash160(sec)
    pub fn address(&self, compressed: bool, testnet: bool) -> Result<String> {
        let version = if testnet {
            TESTNET_VERSION
        } else {
            MAINNET_VERSION
        };
        let mut payload = vec![version];
        payload.extend_from_slice(&self.hash160(compressed)?);
        Ok(encode_base58_check(&payload))
    }
}
