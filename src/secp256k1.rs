//! secp256k1 domain parameters
//!
//! y² = x³ + 7 over F_p with p = 2²⁵⁶ − 2³² − 977. The generator `G` has prime
//! order `n`. All values are built once on first access and shared read-only.

use crate::elliptic_curve::{EllipticCurve, Point};
use crate::error::Result;
use crate::field::FieldElement;
use num_bigint::BigUint;
use num_traits::One;
use once_cell::sync::Lazy;

#[rustfmt::skip]
const GX_BYTES: [u8; 32] = [
    0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac,
    0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b, 0x07,
    0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9,
    0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8, 0x17, 0x98,
];

#[rustfmt::skip]
const GY_BYTES: [u8; 32] = [
    0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65,
    0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11, 0x08, 0xa8,
    0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19,
    0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10, 0xd4, 0xb8,
];

#[rustfmt::skip]
const N_BYTES: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b,
    0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// Curve coefficient `b`
pub const B: u64 = 7;

static PRIME: Lazy<BigUint> = Lazy::new(|| {
    let one = BigUint::one();
    (&one << 256) - (&one << 32) - BigUint::from(977u32)
});

static ORDER: Lazy<BigUint> = Lazy::new(|| BigUint::from_bytes_be(&N_BYTES));

static CURVE: Lazy<EllipticCurve> = Lazy::new(|| EllipticCurve {
    a: FieldElement::zero(PRIME.clone()),
    b: FieldElement::reduce(&BigUint::from(B), &PRIME),
});

static GENERATOR: Lazy<Point> = Lazy::new(|| {
    Point::affine_unchecked(
        CURVE.clone(),
        FieldElement::reduce(&BigUint::from_bytes_be(&GX_BYTES), &PRIME),
        FieldElement::reduce(&BigUint::from_bytes_be(&GY_BYTES), &PRIME),
    )
});

/// Field prime p
pub fn prime() -> &'static BigUint {
    &PRIME
}

/// Order n of the generator
pub fn order() -> &'static BigUint {
    &ORDER
}

pub fn curve() -> &'static EllipticCurve {
    &CURVE
}

/// Generator point G
pub fn generator() -> &'static Point {
    &GENERATOR
}

/// Element of F_p
pub fn field_element(value: BigUint) -> Result<FieldElement> {
    FieldElement::new(value, PRIME.clone())
}

/// Point on secp256k1, validated against the curve equation
pub fn point(x: BigUint, y: BigUint) -> Result<Point> {
    CURVE.point(field_element(x)?, field_element(y)?)
}
