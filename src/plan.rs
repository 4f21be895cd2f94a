//! Plan cost data model: provider records, blend weights and the coalesced
//! result.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Marker rendered in place of a value when no provider supplied one.
pub const NO_DATA: &str = "no data";

/// The plan cost fields reported by every provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Deductible,
    StopLoss,
    OopMax,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Deductible, Field::StopLoss, Field::OopMax];

    /// Wire name of the field in provider payloads.
    pub fn key(self) -> &'static str {
        match self {
            Field::Deductible => "deductible",
            Field::StopLoss => "stop_loss",
            Field::OopMax => "oop_max",
        }
    }

    /// Human-readable label used on the rendered page.
    pub fn label(self) -> &'static str {
        match self {
            Field::Deductible => "Deductible",
            Field::StopLoss => "Stop Loss",
            Field::OopMax => "OOP Max",
        }
    }
}

/// A single provider's answer for one member.
///
/// Missing fields stay `None` and are left out of that field's statistics.
/// Keys other than the three known fields are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct PlanRecord {
    pub deductible: Option<f64>,
    pub stop_loss: Option<f64>,
    pub oop_max: Option<f64>,
}

impl PlanRecord {
    pub fn new(deductible: f64, stop_loss: f64, oop_max: f64) -> Self {
        Self {
            deductible: Some(deductible),
            stop_loss: Some(stop_loss),
            oop_max: Some(oop_max),
        }
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        match field {
            Field::Deductible => self.deductible,
            Field::StopLoss => self.stop_loss,
            Field::OopMax => self.oop_max,
        }
    }
}

/// A [`PlanRecord`] together with the query URL that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedRecord {
    pub url: String,
    pub record: PlanRecord,
}

/// Blend weights for mode and median. The mean weight is whatever is left.
///
/// Weights are not validated: negative values or a sum above
/// one are accepted and simply flow through the arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Weights {
    pub mode: f64,
    pub median: f64,
}

impl Weights {
    pub fn new(mode: f64, median: f64) -> Self {
        Self { mode, median }
    }

    pub fn mean(&self) -> f64 {
        1.0 - self.mode - self.median
    }
}

/// One coalesced field value: a truncated integer, or no data at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanValue {
    Value(i64),
    NoData,
}

impl fmt::Display for PlanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanValue::Value(v) => write!(f, "{v}"),
            PlanValue::NoData => f.write_str(NO_DATA),
        }
    }
}

impl Serialize for PlanValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PlanValue::Value(v) => serializer.serialize_i64(*v),
            PlanValue::NoData => serializer.serialize_str(NO_DATA),
        }
    }
}

/// The coalesced result. Always carries all three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanInfo {
    pub deductible: PlanValue,
    pub stop_loss: PlanValue,
    pub oop_max: PlanValue,
}

impl PlanInfo {
    pub fn no_data() -> Self {
        Self {
            deductible: PlanValue::NoData,
            stop_loss: PlanValue::NoData,
            oop_max: PlanValue::NoData,
        }
    }

    pub fn get(&self, field: Field) -> PlanValue {
        match field {
            Field::Deductible => self.deductible,
            Field::StopLoss => self.stop_loss,
            Field::OopMax => self.oop_max,
        }
    }

    pub fn set(&mut self, field: Field, value: PlanValue) {
        match field {
            Field::Deductible => self.deductible = value,
            Field::StopLoss => self.stop_loss = value,
            Field::OopMax => self.oop_max = value,
        }
    }

    pub fn is_no_data(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f) == PlanValue::NoData)
    }
}
