//! Prime field F_p arithmetic
//!
//! Elements carry their own order, so fields are chosen at runtime. The checked
//! methods report [`Error::OrderMismatch`]; the operator overloads treat a
//! mismatch as a programming error and panic.

use crate::error::{Error, Result};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Element of the prime field F_p
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldElement {
    value: BigUint,
    order: BigUint,
}

impl FieldElement {
    /// Create a field element, rejecting values outside `0..order`
    pub fn new(value: BigUint, order: BigUint) -> Result<Self> {
        if order < BigUint::from(2u8) || value >= order {
            return Err(Error::InvalidElement {
                value: value.to_str_radix(16),
                order: order.to_str_radix(16),
            });
        }
        Ok(FieldElement { value, order })
    }

    /// Create from u64 values
    pub fn from_u64(value: u64, order: u64) -> Result<Self> {
        Self::new(BigUint::from(value), BigUint::from(order))
    }

    /// Reduce an arbitrary integer into the field of the given order
    ///
    /// # Panics
    /// Panics if `order` is zero.
    pub fn reduce(value: &BigUint, order: &BigUint) -> Self {
        FieldElement {
            value: value % order,
            order: order.clone(),
        }
    }

    pub fn zero(order: BigUint) -> Self {
        FieldElement {
            value: BigUint::zero(),
            order,
        }
    }

    pub fn one(order: BigUint) -> Self {
        FieldElement {
            value: BigUint::one(),
            order,
        }
    }

    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn order(&self) -> &BigUint {
        &self.order
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Parity of the underlying integer
    pub fn is_even(&self) -> bool {
        self.value.is_even()
    }

    fn same_order(&self, other: &Self) -> Result<()> {
        if self.order != other.order {
            return Err(Error::OrderMismatch);
        }
        Ok(())
    }

    fn with_value(&self, value: BigUint) -> Self {
        FieldElement {
            value,
            order: self.order.clone(),
        }
    }

    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.same_order(other)?;
        Ok(self.with_value((&self.value + &other.value) % &self.order))
    }

    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.same_order(other)?;
        self.checked_add(&other.negate())
    }

    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        self.same_order(other)?;
        Ok(self.with_value((&self.value * &other.value) % &self.order))
    }

    pub fn checked_div(&self, other: &Self) -> Result<Self> {
        self.same_order(other)?;
        self.checked_mul(&other.inverse())
    }

    /// Additive inverse: order - value (zero maps to zero)
    pub fn negate(&self) -> Self {
        if self.value.is_zero() {
            return self.clone();
        }
        self.with_value(&self.order - &self.value)
    }

    /// Multiply by a plain integer
    pub fn mul_scalar(&self, k: u64) -> Self {
        self.with_value((&self.value * BigUint::from(k)) % &self.order)
    }

    /// Exponentiation with the exponent reduced modulo (order - 1)
    ///
    /// For prime order x^(p-1) = 1, so any exponent (negative ones included)
    /// can be brought into `0..p-1` first.
    pub fn pow(&self, exponent: &BigInt) -> Self {
        if self.value.is_zero() {
            return if exponent.is_zero() {
                Self::one(self.order.clone())
            } else {
                self.clone()
            };
        }
        let group_order = BigInt::from(&self.order - 1u8);
        let reduced = exponent.mod_floor(&group_order);
        // mod_floor with a positive modulus never yields a negative result
        let e = reduced.magnitude();
        self.with_value(self.value.modpow(e, &self.order))
    }

    /// Convenience wrapper around [`pow`](Self::pow) for unsigned exponents
    pub fn pow_u64(&self, exponent: u64) -> Self {
        self.pow(&BigInt::from(exponent))
    }

    /// Multiplicative inverse a^(p-2); zero maps to zero
    pub fn inverse(&self) -> Self {
        let e = BigInt::from(self.order.clone()) - 2;
        self.pow(&e)
    }

    /// Square root for primes with p ≡ 3 (mod 4)
    ///
    /// Returns a^((p+1)/4). The result squares back to `a` only when `a` is a
    /// quadratic residue; callers that need certainty must check.
    pub fn sqrt(&self) -> Result<Self> {
        let order_plus_one = &self.order + 1u8;
        if !(&order_plus_one % 4u8).is_zero() {
            return Err(Error::UnsupportedOrder);
        }
        let e = BigInt::from(order_plus_one / 4u8);
        Ok(self.pow(&e))
    }
}

fn expect_same_order(result: Result<FieldElement>, op: &str) -> FieldElement {
    match result {
        Ok(v) => v,
        Err(_) => panic!("Cannot {} field elements with different orders", op),
    }
}

impl Add for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        expect_same_order(self.checked_add(other), "add")
    }
}

impl Add for FieldElement {
    type Output = FieldElement;

    fn add(self, other: FieldElement) -> FieldElement {
        &self + &other
    }
}

impl Sub for &FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        expect_same_order(self.checked_sub(other), "subtract")
    }
}

impl Sub for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: FieldElement) -> FieldElement {
        &self - &other
    }
}

impl Mul for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        expect_same_order(self.checked_mul(other), "multiply")
    }
}

impl Mul for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: FieldElement) -> FieldElement {
        &self * &other
    }
}

// a / b = a * b^(p-2)
#[allow(clippy::suspicious_arithmetic_impl)]
impl Div for &FieldElement {
    type Output = FieldElement;

    fn div(self, other: &FieldElement) -> FieldElement {
        expect_same_order(self.checked_div(other), "divide")
    }
}

impl Div for FieldElement {
    type Output = FieldElement;

    fn div(self, other: FieldElement) -> FieldElement {
        &self / &other
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        self.negate()
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        self.negate()
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:x} (mod {:x})", self.value, self.order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(value: u64, order: u64) -> FieldElement {
        FieldElement::from_u64(value, order).unwrap()
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(matches!(
            FieldElement::from_u64(19, 19),
            Err(Error::InvalidElement { .. })
        ));
        assert!(matches!(
            FieldElement::from_u64(0, 1),
            Err(Error::InvalidElement { .. })
        ));
        assert!(FieldElement::from_u64(18, 19).is_ok());
    }

    #[test]
    fn test_field_arithmetic() {
        // Work in F_7
        let a = fe(3, 7);
        let b = fe(5, 7);

        // 3 + 5 = 8 ≡ 1 (mod 7)
        assert_eq!(&a + &b, fe(1, 7));
        // 3 - 5 = -2 ≡ 5 (mod 7)
        assert_eq!(&a - &b, fe(5, 7));
        // 3 * 5 = 15 ≡ 1 (mod 7)
        assert_eq!(&a * &b, fe(1, 7));
        // 3^(-1) ≡ 5 (mod 7)
        assert_eq!(a.inverse(), fe(5, 7));
        // 3 / 5 = 3 * 3 = 9 ≡ 2 (mod 7)
        assert_eq!(&a / &b, fe(2, 7));
    }

    #[test]
    fn test_divide_in_f19() {
        // 7^-1 = 11 (mod 19), so 2 / 7 = 22 ≡ 3
        assert_eq!(fe(2, 19) / fe(7, 19), fe(3, 19));
    }

    #[test]
    fn test_power_reduces_exponent() {
        // 2^10 ≡ 1 (mod 11) by Fermat's little theorem
        assert_eq!(fe(2, 11).pow_u64(10), fe(1, 11));
        // 2^5 = 32 ≡ 10 (mod 11)
        assert_eq!(fe(2, 11).pow_u64(5), fe(10, 11));
        // exponent 58 reduces to 2 when order - 1 = 56
        assert_eq!(fe(46, 57).pow_u64(58), fe(46, 57) * fe(46, 57));
    }

    #[test]
    fn test_negative_exponent() {
        // 17^-3 = (17^3)^-1 in F_31
        let a = fe(17, 31);
        let expected = a.pow_u64(3).inverse();
        assert_eq!(a.pow(&BigInt::from(-3)), expected);
        assert_eq!(a.pow(&BigInt::from(-1)), a.inverse());
    }

    #[test]
    fn test_zero_base() {
        let zero = FieldElement::zero(BigUint::from(13u8));
        assert_eq!(zero.pow_u64(12), zero);
        assert_eq!(zero.pow_u64(0), FieldElement::one(BigUint::from(13u8)));
        assert_eq!(zero.inverse(), zero);
    }

    #[test]
    fn test_identities() {
        let order = 31u64;
        for v in 0..order {
            let a = fe(v, order);
            let zero = FieldElement::zero(BigUint::from(order));
            assert_eq!(&a + &zero, a);
            for w in [0, 1, 7, 30] {
                let b = fe(w, order);
                assert_eq!(&(&a - &b) + &b, a);
            }
            if v != 0 {
                assert_eq!(&a * &a.inverse(), FieldElement::one(BigUint::from(order)));
            }
        }
    }

    #[test]
    fn test_negate() {
        assert_eq!(fe(3, 7).negate(), fe(4, 7));
        assert_eq!(-fe(0, 7), fe(0, 7));
    }

    #[test]
    fn test_mul_scalar() {
        assert_eq!(fe(5, 7).mul_scalar(3), fe(1, 7));
    }

    #[test]
    fn test_sqrt() {
        // 31 + 1 = 32 is divisible by 4
        for v in 1..31u64 {
            let a = fe(v, 31);
            let square = &a * &a;
            let root = square.sqrt().unwrap();
            assert!(root == a || root == a.negate());
        }
        assert_eq!(fe(4, 13).sqrt(), Err(Error::UnsupportedOrder));
    }

    #[test]
    fn test_checked_order_mismatch() {
        let a = fe(3, 7);
        let b = fe(3, 11);
        assert_eq!(a.checked_add(&b), Err(Error::OrderMismatch));
        assert_eq!(a.checked_mul(&b), Err(Error::OrderMismatch));
        assert_eq!(a.checked_sub(&b), Err(Error::OrderMismatch));
        assert_eq!(a.checked_div(&b), Err(Error::OrderMismatch));
    }

    #[test]
    #[should_panic(expected = "Cannot add field elements with different orders")]
    fn test_operator_order_mismatch_panics() {
        let _ = fe(3, 7) + fe(3, 11);
    }

    #[test]
    fn test_equality_is_structural() {
        assert_ne!(fe(3, 7), fe(3, 11));
        assert_eq!(fe(3, 7), fe(3, 7));
    }
}
