//! Wire formats exchanged by keys, signatures and scripts
//!
//! - [`hash`]: SHA-256, RIPEMD-160 and their Bitcoin compositions
//! - [`base58`]: Base58 / Base58Check and address decoding
//! - [`der`]: DER signatures (`Signature::der`, `Signature::parse_der`)
//! - [`sec`]: SEC public keys and addresses (`Point::sec`, `Point::parse_sec`)
//! - [`varint`]: variable-length integers

pub mod base58;
pub mod der;
pub mod hash;
pub mod sec;
pub mod varint;

pub use base58::{
    decode_address, decode_base58, decode_base58_check, encode_base58, encode_base58_check,
};
pub use hash::{hash160, hash256, ripemd160, sha256};
pub use varint::{encode_varint, read_varint};
