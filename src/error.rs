//! Crate-wide error type
//!
//! Construction and parsing failures are reported through [`Error`]. Signature
//! verification and script evaluation never return an error for a "no" answer:
//! they report `false` / [`Outcome::Failure`](crate::script::Outcome) instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("value {value} is not an element of the field of order {order}")]
    InvalidElement { value: String, order: String },

    #[error("field elements belong to fields of different order")]
    OrderMismatch,

    #[error("points belong to different curves")]
    CurveMismatch,

    #[error("point ({x}, {y}) is not on the curve")]
    CurveMembership { x: String, y: String },

    #[error("square root requires (order + 1) % 4 == 0")]
    UnsupportedOrder,

    #[error("the point at infinity has no encoding")]
    PointAtInfinity,

    #[error("secret must lie in [1, n)")]
    InvalidSecretKey,

    #[error("nonce must lie in [1, n) and produce non-zero r and s")]
    InvalidNonce,

    #[error("malformed DER signature: {0}")]
    MalformedSignature(String),

    #[error("malformed SEC public key: {0}")]
    MalformedSec(String),

    #[error("malformed script: {0}")]
    MalformedScript(String),

    #[error("malformed varint: {0}")]
    MalformedVarint(String),

    #[error("malformed base58 payload: {0}")]
    MalformedBase58(String),

    #[error("invalid base58 character {0:?}")]
    InvalidBase58Character(char),

    #[error("base58 checksum mismatch")]
    ChecksumMismatch,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("unsupported opcode 0x{0:02x}")]
    UnsupportedOpcode(u8),

    #[error("stack underflow")]
    StackUnderflow,

    #[error("verification failed")]
    VerifyFailed,

    #[error("script number longer than {0} bytes")]
    NumberOverflow(usize),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
