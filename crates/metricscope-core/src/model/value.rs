//! Metric values.
//!
//! `MetricValue` hides its representation; consumers reach the concrete
//! number only through [`MetricValue::visit`].

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

/// A single measurement: integer counter or floating-point gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValue(Repr);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Repr {
    Int(i64),
    Float(f64),
}

/// Receives the concrete representation of a [`MetricValue`].
pub trait ValueVisitor {
    type Output;

    fn visit_i64(self, v: i64) -> Self::Output;
    fn visit_f64(self, v: f64) -> Self::Output;
}

impl MetricValue {
    /// Dispatch to the visitor method matching the stored representation.
    pub fn visit<V: ValueVisitor>(&self, visitor: V) -> V::Output {
        match self.0 {
            Repr::Int(v) => visitor.visit_i64(v),
            Repr::Float(v) => visitor.visit_f64(v),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue(Repr::Int(v))
    }
}

impl From<i32> for MetricValue {
    fn from(v: i32) -> Self {
        MetricValue(Repr::Int(v.into()))
    }
}

impl From<u32> for MetricValue {
    fn from(v: u32) -> Self {
        MetricValue(Repr::Int(v.into()))
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue(Repr::Float(v))
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Repr::Int(v) => write!(f, "{v}"),
            Repr::Float(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Repr::Int(v) => serializer.serialize_i64(v),
            Repr::Float(v) => serializer.serialize_f64(v),
        }
    }
}

struct MetricValueVisitor;

impl<'de> Visitor<'de> for MetricValueVisitor {
    type Value = MetricValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or floating point number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MetricValue, E> {
        Ok(MetricValue::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MetricValue, E> {
        // Counters above i64::MAX decode as floats.
        Ok(match i64::try_from(v) {
            Ok(i) => MetricValue::from(i),
            Err(_) => MetricValue::from(v as f64),
        })
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MetricValue, E> {
        Ok(MetricValue::from(v))
    }
}

impl<'de> Deserialize<'de> for MetricValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MetricValueVisitor)
    }
}
