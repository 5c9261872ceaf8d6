//! ECDSA over secp256k1
//!
//! A signature on digest z under secret e is a pair (r, s) where:
//! - R = k·G for a nonce k in [1, n), and r = R.x mod n
//! - s = (z + r·e) / k mod n
//!
//! Verification recomputes R' = (z/s)·G + (r/s)·P and compares its x-coordinate
//! with r. The nonce must never repeat across signatures made with the same key.

use crate::elliptic_curve::Point;
use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::secp256k1::{curve, generator, order};
use log::warn;
use num_bigint::BigUint;
use num_traits::Zero;
use rand::RngCore;
use std::fmt;

/// Policy for the `s` half of a freshly made signature
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SNormalization {
    /// Replace `s` with `n - s` whenever `s > n/2`
    #[default]
    LowS,
    /// Keep `s` exactly as computed
    Raw,
}

/// ECDSA signature (r, s), both elements of the scalar field mod n
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub r: FieldElement,
    pub s: FieldElement,
}

impl Signature {
    /// Build a signature from raw integers, rejecting values outside `0..n`
    pub fn new(r: BigUint, s: BigUint) -> Result<Self> {
        Ok(Signature {
            r: FieldElement::new(r, order().clone())?,
            s: FieldElement::new(s, order().clone())?,
        })
    }

    /// Whether `s` lies in the lower half of the scalar range
    pub fn is_low_s(&self) -> bool {
        self.s.value() <= &(order() >> 1usize)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:x}, {:x})", self.r.value(), self.s.value())
    }
}

/// Secret scalar together with its public point
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    secret: BigUint,
    public_key: Point,
}

impl PrivateKey {
    /// Create a key from a secret scalar
    ///
    /// # Arguments
    /// * `secret` - Secret e, must satisfy 1 <= e < n
    ///
    /// # Returns
    /// The key with its public point P = e·G
    pub fn new(secret: BigUint) -> Result<Self> {
        if secret.is_zero() || &secret >= order() {
            return Err(Error::InvalidSecretKey);
        }
        let public_key = generator().scalar_mul(&secret);
        Ok(PrivateKey { secret, public_key })
    }

    /// Generate a key from the thread-local CSPRNG
    pub fn random() -> Self {
        let secret = random_scalar();
        let public_key = generator().scalar_mul(&secret);
        PrivateKey { secret, public_key }
    }

    pub fn secret(&self) -> &BigUint {
        &self.secret
    }

    pub fn public_key(&self) -> &Point {
        &self.public_key
    }

    /// Sign digest `z` with a fresh random nonce and low-S normalization
    ///
    /// Nonces that yield r = 0 or s = 0 are discarded and redrawn.
    pub fn sign(&self, z: &BigUint) -> Signature {
        loop {
            let k = random_scalar();
            match self.sign_with_nonce(z, &k, SNormalization::LowS) {
                Ok(signature) => return signature,
                Err(e) => warn!("discarding nonce: {}", e),
            }
        }
    }

    /// Sign digest `z` with a caller-supplied nonce
    ///
    /// # Arguments
    /// * `z` - Message digest, reduced mod n
    /// * `k` - Nonce, must satisfy 1 <= k < n (never reuse!)
    /// * `normalization` - Policy applied to `s`
    ///
    /// # Errors
    /// [`Error::InvalidNonce`] if `k` is out of range or produces r = 0 or s = 0.
    pub fn sign_with_nonce(
        &self,
        z: &BigUint,
        k: &BigUint,
        normalization: SNormalization,
    ) -> Result<Signature> {
        let n = order();
        if k.is_zero() || k >= n {
            return Err(Error::InvalidNonce);
        }

        let big_r = generator().scalar_mul(k);
        let r_x = big_r.x().ok_or(Error::InvalidNonce)?;
        let r = FieldElement::reduce(r_x.value(), n);
        if r.is_zero() {
            return Err(Error::InvalidNonce);
        }

        let z = FieldElement::reduce(z, n);
        let e = FieldElement::reduce(&self.secret, n);
        let k = FieldElement::reduce(k, n);
        let mut s = &(&z + &(&r * &e)) / &k;
        if s.is_zero() {
            return Err(Error::InvalidNonce);
        }

        if normalization == SNormalization::LowS && s.value() > &(n >> 1usize) {
            s = s.negate();
        }

        Ok(Signature { r, s })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("secret", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Uniform scalar in [1, n) by rejection sampling 256-bit draws
fn random_scalar() -> BigUint {
    let n = order();
    let mut rng = rand::rng();
    let mut buf = [0u8; 32];
    loop {
        rng.fill_bytes(&mut buf);
        let k = BigUint::from_bytes_be(&buf);
        if !k.is_zero() && &k < n {
            return k;
        }
    }
}

/// Verify a signature on digest `z` against a public point
///
/// # Returns
/// True iff R' = u·G + v·P is not the identity and R'.x ≡ r (mod n). A
/// signature whose components are zero or not reduced mod n is rejected, as is
/// the identity point as a public key.
pub fn verify(z: &BigUint, signature: &Signature, public_key: &Point) -> bool {
    let n = order();
    let Signature { r, s } = signature;
    if r.order() != n || s.order() != n || r.is_zero() || s.is_zero() {
        return false;
    }
    if public_key.curve() != curve() || public_key.is_infinity() {
        return false;
    }

    let s_inv = s.inverse();
    let u = &FieldElement::reduce(z, n) * &s_inv;
    let v = r * &s_inv;

    let total = match generator()
        .scalar_mul(u.value())
        .add(&public_key.scalar_mul(v.value()))
    {
        Ok(point) => point,
        Err(_) => return false,
    };

    match total.x() {
        Some(x) => &(x.value() % n) == r.value(),
        None => false,
    }
}

impl Point {
    /// Verify `signature` on digest `z` with this point as the public key
    pub fn verify(&self, z: &BigUint, signature: &Signature) -> bool {
        verify(z, signature, self)
    }
}
