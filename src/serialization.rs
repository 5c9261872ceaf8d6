//! JSON interchange for field elements, points and signatures
//!
//! Integers are written as strings in base 10 or base 16, chosen per value by
//! [`SerializationFormat`]. Deserialized values are validated again on the way
//! back into domain types.

use crate::ecdsa::Signature;
use crate::elliptic_curve::{Coordinates, EllipticCurve, Point};
use crate::error::{Error, Result};
use crate::field::FieldElement;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

// ==================== Serialization Format Enum ====================

/// Format for serializing numeric values
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SerializationFormat {
    #[serde(rename = "base10")]
    #[default]
    Base10,
    #[serde(rename = "base16")]
    Base16,
}

impl SerializationFormat {
    fn radix(self) -> u32 {
        match self {
            SerializationFormat::Base10 => 10,
            SerializationFormat::Base16 => 16,
        }
    }

    /// Convert BigUint to string in this format
    pub fn encode(&self, value: &BigUint) -> String {
        value.to_str_radix(self.radix())
    }

    /// Parse string in this format to BigUint; base 16 accepts a `0x` prefix
    pub fn decode(&self, s: &str) -> Result<BigUint> {
        let digits = match self {
            SerializationFormat::Base16 => s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .unwrap_or(s),
            SerializationFormat::Base10 => s,
        };
        BigUint::parse_bytes(digits.as_bytes(), self.radix())
            .ok_or_else(|| Error::Serialization(format!("invalid {:?} integer {:?}", self, s)))
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::Serialization(format!("JSON serialization error: {}", e)))
}

fn from_json<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T> {
    serde_json::from_str(json)
        .map_err(|e| Error::Serialization(format!("JSON deserialization error: {}", e)))
}

// ==================== Field Element Serialization ====================

/// Serializable representation of a field element
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SerializableFieldElement {
    pub value: String,
    pub order: String,
    #[serde(default)]
    pub format: SerializationFormat,
}

impl SerializableFieldElement {
    pub fn from_field_element(elem: &FieldElement, format: SerializationFormat) -> Self {
        SerializableFieldElement {
            value: format.encode(elem.value()),
            order: format.encode(elem.order()),
            format,
        }
    }

    pub fn to_field_element(&self) -> Result<FieldElement> {
        let value = self.format.decode(&self.value)?;
        let order = self.format.decode(&self.order)?;
        FieldElement::new(value, order)
    }

    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json)
    }
}

// ==================== Point Serialization ====================

/// Serializable representation of a curve point together with its curve
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SerializablePoint {
    pub a: String,
    pub b: String,
    pub order: String,
    /// `None` for the point at infinity
    pub coordinates: Option<SerializableCoordinates>,
    #[serde(default)]
    pub format: SerializationFormat,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SerializableCoordinates {
    pub x: String,
    pub y: String,
}

impl SerializablePoint {
    pub fn from_point(point: &Point, format: SerializationFormat) -> Self {
        let curve = point.curve();
        let coordinates = match point.coordinates() {
            Coordinates::Infinity => None,
            Coordinates::Affine { x, y } => Some(SerializableCoordinates {
                x: format.encode(x.value()),
                y: format.encode(y.value()),
            }),
        };
        SerializablePoint {
            a: format.encode(curve.a.value()),
            b: format.encode(curve.b.value()),
            order: format.encode(curve.field_order()),
            coordinates,
            format,
        }
    }

    /// Rebuild the point, re-checking curve membership
    pub fn to_point(&self) -> Result<Point> {
        let order = self.format.decode(&self.order)?;
        let element = |s: &str| -> Result<FieldElement> {
            FieldElement::new(self.format.decode(s)?, order.clone())
        };
        let curve = EllipticCurve::new(element(&self.a)?, element(&self.b)?)?;
        match &self.coordinates {
            None => Ok(curve.infinity()),
            Some(c) => curve.point(element(&c.x)?, element(&c.y)?),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json)
    }
}

// ==================== Signature Serialization ====================

/// Serializable ECDSA signature; `der` carries the hex DER encoding alongside
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SerializableSignature {
    pub r: String,
    pub s: String,
    pub der: String,
    #[serde(default)]
    pub format: SerializationFormat,
}

impl SerializableSignature {
    pub fn from_signature(signature: &Signature, format: SerializationFormat) -> Self {
        SerializableSignature {
            r: format.encode(signature.r.value()),
            s: format.encode(signature.s.value()),
            der: hex::encode(signature.der()),
            format,
        }
    }

    /// Rebuild from `r` and `s`, rejecting a `der` field that disagrees
    pub fn to_signature(&self) -> Result<Signature> {
        let signature = Signature::new(self.format.decode(&self.r)?, self.format.decode(&self.s)?)?;
        let der = hex::decode(&self.der)
            .map_err(|e| Error::Serialization(format!("invalid DER hex: {}", e)))?;
        if der != signature.der() {
            return Err(Error::Serialization(
                "DER field does not match r and s".to_string(),
            ));
        }
        Ok(signature)
    }

    pub fn to_json(&self) -> Result<String> {
        to_json(self)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json)
    }
}
