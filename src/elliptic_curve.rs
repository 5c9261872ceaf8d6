//! Elliptic curves in short Weierstrass form: y² = x³ + ax + b
//!
//! Implements the chord-tangent law over [`FieldElement`] coordinates:
//! - For distinct points P, Q the line through them meets the curve at -R, so P + Q = R
//! - For P = Q the tangent at P meets the curve at -R, so 2P = R
//! - The point at infinity O is the identity element
//!
//! Every [`Point`] carries its curve coefficients, so points from different curves
//! are rejected at runtime with [`Error::CurveMismatch`].

use crate::error::{Error, Result};
use crate::field::FieldElement;
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;

/// Curve coefficients `a` and `b`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EllipticCurve {
    pub a: FieldElement,
    pub b: FieldElement,
}

impl EllipticCurve {
    /// # Errors
    /// [`Error::OrderMismatch`] if `a` and `b` live in different fields.
    pub fn new(a: FieldElement, b: FieldElement) -> Result<Self> {
        if a.order() != b.order() {
            return Err(Error::OrderMismatch);
        }
        Ok(Self { a, b })
    }

    /// Order of the underlying field
    pub fn field_order(&self) -> &BigUint {
        self.a.order()
    }

    /// Right-hand side of the curve equation: x³ + ax + b
    pub fn rhs(&self, x: &FieldElement) -> FieldElement {
        let x_cubed = x.pow_u64(3);
        &(&x_cubed + &(&self.a * x)) + &self.b
    }

    pub fn contains(&self, x: &FieldElement, y: &FieldElement) -> bool {
        y * y == self.rhs(x)
    }

    pub fn infinity(&self) -> Point {
        Point {
            curve: self.clone(),
            coordinates: Coordinates::Infinity,
        }
    }

    /// Build an affine point, validating curve membership
    pub fn point(&self, x: FieldElement, y: FieldElement) -> Result<Point> {
        if x.order() != self.field_order() || y.order() != self.field_order() {
            return Err(Error::OrderMismatch);
        }
        if !self.contains(&x, &y) {
            return Err(Error::CurveMembership {
                x: x.value().to_str_radix(16),
                y: y.value().to_str_radix(16),
            });
        }
        Ok(Point {
            curve: self.clone(),
            coordinates: Coordinates::Affine { x, y },
        })
    }
}

/// Location of a point on its curve
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Coordinates {
    /// The point at infinity (identity element)
    Infinity,
    /// A point with affine coordinates (x, y)
    Affine { x: FieldElement, y: FieldElement },
}

/// A point on an elliptic curve, including the point at infinity
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    curve: EllipticCurve,
    coordinates: Coordinates,
}

impl Point {
    /// Create a point from optional coordinates and the curve coefficients
    ///
    /// Both coordinates absent yields the identity without any curve check.
    pub fn new(
        x: Option<FieldElement>,
        y: Option<FieldElement>,
        a: FieldElement,
        b: FieldElement,
    ) -> Result<Self> {
        let curve = EllipticCurve::new(a, b)?;
        match (x, y) {
            (None, None) => Ok(curve.infinity()),
            (Some(x), Some(y)) => curve.point(x, y),
            (Some(x), None) => Err(Error::CurveMembership {
                x: x.value().to_str_radix(16),
                y: "none".to_string(),
            }),
            (None, Some(y)) => Err(Error::CurveMembership {
                x: "none".to_string(),
                y: y.value().to_str_radix(16),
            }),
        }
    }

    /// Affine point on a known-good curve without the membership check
    pub(crate) fn affine_unchecked(curve: EllipticCurve, x: FieldElement, y: FieldElement) -> Self {
        Point {
            curve,
            coordinates: Coordinates::Affine { x, y },
        }
    }

    pub fn curve(&self) -> &EllipticCurve {
        &self.curve
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn is_infinity(&self) -> bool {
        matches!(self.coordinates, Coordinates::Infinity)
    }

    pub fn x(&self) -> Option<&FieldElement> {
        match &self.coordinates {
            Coordinates::Infinity => None,
            Coordinates::Affine { x, .. } => Some(x),
        }
    }

    pub fn y(&self) -> Option<&FieldElement> {
        match &self.coordinates {
            Coordinates::Infinity => None,
            Coordinates::Affine { y, .. } => Some(y),
        }
    }

    pub fn is_on_curve(&self) -> bool {
        match &self.coordinates {
            Coordinates::Infinity => true,
            Coordinates::Affine { x, y } => self.curve.contains(x, y),
        }
    }

    /// -P = (x, -y)
    pub fn negate(&self) -> Point {
        match &self.coordinates {
            Coordinates::Infinity => self.clone(),
            Coordinates::Affine { x, y } => Point {
                curve: self.curve.clone(),
                coordinates: Coordinates::Affine {
                    x: x.clone(),
                    y: y.negate(),
                },
            },
        }
    }

    /// Add two points on the same curve
    ///
    /// For distinct points:
    /// - slope m = (y2 - y1) / (x2 - x1)
    ///
    /// For P = Q (point doubling):
    /// - slope m = (3x1^2 + a) / (2y1)
    ///
    /// Then x3 = m^2 - x1 - x2 and y3 = m(x3 - x1) + y1, and the sum is the
    /// reflection (x3, -y3).
    pub fn add(&self, other: &Point) -> Result<Point> {
        if self.curve != other.curve {
            return Err(Error::CurveMismatch);
        }

        let (x1, y1, x2, y2) = match (&self.coordinates, &other.coordinates) {
            (Coordinates::Infinity, _) => return Ok(other.clone()),
            (_, Coordinates::Infinity) => return Ok(self.clone()),
            (Coordinates::Affine { x: x1, y: y1 }, Coordinates::Affine { x: x2, y: y2 }) => {
                (x1, y1, x2, y2)
            }
        };

        // Vertical line: P + (-P) = O
        if x1 == x2 && (y1 + y2).is_zero() {
            return Ok(self.curve.infinity());
        }

        let slope = if x1 == x2 && y1 == y2 {
            // Tangent is vertical when y = 0, so 2P = O
            if y1.is_zero() {
                return Ok(self.curve.infinity());
            }
            let numerator = &(x1 * x1).mul_scalar(3) + &self.curve.a;
            let denominator = y1.mul_scalar(2);
            &numerator / &denominator
        } else {
            &(y2 - y1) / &(x2 - x1)
        };

        let x3 = &(&(&slope * &slope) - x1) - x2;
        let y3 = &(&slope * &(&x3 - x1)) + y1;

        Ok(Point {
            curve: self.curve.clone(),
            coordinates: Coordinates::Affine {
                x: x3,
                y: y3.negate(),
            },
        })
    }

    pub fn double(&self) -> Point {
        // Same curve by construction
        match self.add(self) {
            Ok(p) => p,
            Err(_) => unreachable!("a point always shares its own curve"),
        }
    }

    /// Scalar multiplication using the double-and-add algorithm
    ///
    /// Walks the bits of `k` from least to most significant, doubling an
    /// accumulator each step and adding it to the result when the bit is set.
    /// Costs O(log k) group operations; `k = 0` gives the identity.
    pub fn scalar_mul(&self, k: &BigUint) -> Point {
        let mut result = self.curve.infinity();
        if k.is_zero() {
            return result;
        }

        let mut current = self.clone();
        for i in 0..k.bits() {
            if k.bit(i) {
                result = result.add_same_curve(&current);
            }
            current = current.double();
        }
        result
    }

    fn add_same_curve(&self, other: &Point) -> Point {
        match self.add(other) {
            Ok(p) => p,
            Err(_) => unreachable!("scalar multiples share the base point's curve"),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.coordinates {
            Coordinates::Infinity => write!(f, "Point(infinity)"),
            Coordinates::Affine { x, y } => write!(
                f,
                "Point({:x}, {:x})_{:x}_{:x} over F_{:x}",
                x.value(),
                y.value(),
                self.curve.a.value(),
                self.curve.b.value(),
                self.curve.field_order()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe(value: u64, order: u64) -> FieldElement {
        FieldElement::from_u64(value, order).unwrap()
    }

    // y^2 = x^3 + 2x + 2 over F_17, group order 19
    fn curve_f17() -> EllipticCurve {
        EllipticCurve::new(fe(2, 17), fe(2, 17)).unwrap()
    }

    // y^2 = x^3 + 7 over F_223
    fn curve_f223() -> EllipticCurve {
        EllipticCurve::new(fe(0, 223), fe(7, 223)).unwrap()
    }

    fn p223(x: u64, y: u64) -> Point {
        curve_f223().point(fe(x, 223), fe(y, 223)).unwrap()
    }

    #[test]
    fn test_point_at_infinity() {
        let inf = curve_f17().infinity();
        assert!(inf.is_infinity());
        assert!(inf.is_on_curve());
        assert!(inf.x().is_none() && inf.y().is_none());
    }

    #[test]
    fn test_new_both_absent_is_identity() {
        let p = Point::new(None, None, fe(5, 17), fe(7, 17)).unwrap();
        assert!(p.is_infinity());
    }

    #[test]
    fn test_new_one_coordinate_absent_fails() {
        let r = Point::new(Some(fe(5, 17)), None, fe(2, 17), fe(2, 17));
        assert!(matches!(r, Err(Error::CurveMembership { .. })));
    }

    #[test]
    fn test_points_on_curve_f223() {
        let curve = curve_f223();
        for (x, y) in [(192, 105), (17, 56), (1, 193)] {
            assert!(curve.point(fe(x, 223), fe(y, 223)).is_ok());
        }
        for (x, y) in [(200, 119), (42, 99)] {
            assert!(matches!(
                curve.point(fe(x, 223), fe(y, 223)),
                Err(Error::CurveMembership { .. })
            ));
        }
    }

    #[test]
    fn test_coordinate_order_mismatch() {
        let curve = curve_f223();
        assert_eq!(
            curve.point(fe(5, 17), fe(1, 17)),
            Err(Error::OrderMismatch)
        );
    }

    #[test]
    fn test_point_addition_f223() {
        assert_eq!(p223(170, 142).add(&p223(60, 139)).unwrap(), p223(220, 181));
        assert_eq!(p223(47, 71).add(&p223(17, 56)).unwrap(), p223(215, 68));
        assert_eq!(p223(143, 98).add(&p223(76, 66)).unwrap(), p223(47, 71));
    }

    #[test]
    fn test_doubling_matches_known_value() {
        let p = curve_f17().point(fe(5, 17), fe(1, 17)).unwrap();
        let expected = curve_f17().point(fe(6, 17), fe(3, 17)).unwrap();
        assert_eq!(p.double(), expected);
        assert_eq!(p.add(&p).unwrap(), expected);
    }

    #[test]
    fn test_identity_element() {
        let p = curve_f17().point(fe(5, 17), fe(1, 17)).unwrap();
        let inf = curve_f17().infinity();
        assert_eq!(p.add(&inf).unwrap(), p);
        assert_eq!(inf.add(&p).unwrap(), p);
    }

    #[test]
    fn test_inverse_element() {
        let p = curve_f17().point(fe(5, 17), fe(1, 17)).unwrap();
        let neg = p.negate();
        assert!(neg.is_on_curve());
        assert!(p.add(&neg).unwrap().is_infinity());
    }

    #[test]
    fn test_curve_mismatch() {
        let p = curve_f17().point(fe(5, 17), fe(1, 17)).unwrap();
        let other = EllipticCurve::new(fe(0, 17), fe(7, 17)).unwrap().infinity();
        assert_eq!(p.add(&other), Err(Error::CurveMismatch));
    }

    #[test]
    fn test_scalar_multiplication() {
        let p = curve_f17().point(fe(5, 17), fe(1, 17)).unwrap();

        assert!(p.scalar_mul(&BigUint::from(0u8)).is_infinity());
        assert_eq!(p.scalar_mul(&BigUint::from(1u8)), p);
        assert_eq!(p.scalar_mul(&BigUint::from(2u8)), p.add(&p).unwrap());

        let mut acc = curve_f17().infinity();
        for k in 1..=40u32 {
            acc = acc.add(&p).unwrap();
            assert_eq!(p.scalar_mul(&BigUint::from(k)), acc, "k = {}", k);
        }
    }

    #[test]
    fn test_group_order_f17() {
        let p = curve_f17().point(fe(5, 17), fe(1, 17)).unwrap();
        assert!(p.scalar_mul(&BigUint::from(19u8)).is_infinity());
        assert_eq!(p.scalar_mul(&BigUint::from(18u8)), p.negate());
    }

    #[test]
    fn test_group_order_f223() {
        let p = p223(47, 71);
        assert_eq!(p.scalar_mul(&BigUint::from(2u8)), p223(36, 111));
        assert_eq!(p.scalar_mul(&BigUint::from(20u8)), p223(47, 152));
        assert!(p.scalar_mul(&BigUint::from(21u8)).is_infinity());

        let q = p223(15, 86);
        assert!(q.scalar_mul(&BigUint::from(7u8)).is_infinity());
    }

    #[test]
    fn test_associativity() {
        let curve = curve_f17();
        let p1 = curve.point(fe(5, 17), fe(1, 17)).unwrap();
        let p2 = curve.point(fe(6, 17), fe(3, 17)).unwrap();
        let p3 = curve.point(fe(10, 17), fe(6, 17)).unwrap();

        let left = p1.add(&p2).unwrap().add(&p3).unwrap();
        let right = p1.add(&p2.add(&p3).unwrap()).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn test_doubling_y_zero_gives_infinity() {
        // x = -1 is a root of x^3 + 2x + 3
        let curve = EllipticCurve::new(fe(2, 97), fe(3, 97)).unwrap();
        let root = (0..97u64)
            .map(|x| fe(x, 97))
            .find(|x| curve.rhs(x).is_zero())
            .expect("curve has a two-torsion point");
        let p = curve.point(root, fe(0, 97)).unwrap();
        assert!(p.double().is_infinity());
    }
}
