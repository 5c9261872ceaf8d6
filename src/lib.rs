//! # scriptsig - secp256k1 primitives and a script interpreter
//!
//! Finite field arithmetic, the secp256k1 point group, ECDSA, the wire formats
//! those primitives are exchanged in, and a stack machine that authorizes
//! spends by checking signatures.
//!
//! ## Quick Start
//!
//! ```rust
//! use num_bigint::BigUint;
//! use scriptsig::{PrivateKey, Script};
//!
//! let key = PrivateKey::new(BigUint::from(12345u32)).unwrap();
//! let z = BigUint::from(0xcafeu32);
//!
//! // Unlocking script: <signature || hash type> <compressed sec>
//! let mut sig = key.sign(&z).der();
//! sig.push(0x01);
//! let sec = key.public_key().sec(true).unwrap();
//! let unlocking = Script::new(vec![sig.into(), sec.into()]);
//!
//! let locking = Script::p2pkh(&key.public_key().hash160(true).unwrap());
//! assert!((unlocking + locking).evaluate(&z));
//! ```
//!
//! ## Module Overview
//!
//! - [`field`] - Prime field arithmetic (F_p)
//! - [`elliptic_curve`] - Short Weierstrass curves and the point group law
//! - [`secp256k1`] - Curve parameters and generator
//! - [`ecdsa`] - Keys, signing and verification
//! - [`encoding`] - Hashes, Base58Check, DER, SEC, varints
//! - [`script`] - Script commands, bytecode and the interpreter
//! - [`serialization`] - JSON interchange
//! - [`error`] - Crate error type

pub mod ecdsa;
pub mod elliptic_curve;
pub mod encoding;
pub mod error;
pub mod field;
pub mod script;
pub mod secp256k1;
pub mod serialization;

// Re-export commonly used types for convenience
pub use ecdsa::{verify, PrivateKey, SNormalization, Signature};
pub use elliptic_curve::{Coordinates, EllipticCurve, Point};
pub use error::{Error, Result};
pub use field::FieldElement;
pub use script::{Command, Interpreter, Opcode, Outcome, Script, State};

pub use serialization::{
    SerializableFieldElement, SerializablePoint, SerializableSignature, SerializationFormat,
};
