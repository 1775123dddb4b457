//! The self-describing parameter tree and the rate-unit context used to interpret/emit `A`.

use crate::error::{Error, Result};
use crate::units::{EnergyUnit, PressureUnit};
use std::collections::BTreeMap;
use std::convert::TryFrom;

/// A node of the recursive parameter tree. Mirrors the shape of a parsed YAML document closely
/// enough that [`ParamNode::from_yaml`]/[`ParamNode::to_yaml`] are close to lossless.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamNode {
    /// A numeric scalar, already resolved to SI or to whatever unit the caller requested.
    Number(f64),
    /// A string scalar (used for equation text, species names, etc).
    String(String),
    /// A boolean scalar.
    Bool(bool),
    /// A homogeneous sequence of nodes.
    Seq(Vec<ParamNode>),
    /// A mapping from string keys to nodes. Stored sorted by key so that two semantically equal
    /// trees compare equal regardless of the order keys were inserted in.
    Map(BTreeMap<String, ParamNode>),
}

impl ParamNode {
    /// Builds an empty map node.
    #[must_use]
    pub fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Looks up `key` in a map node; returns `None` for non-map nodes or a missing key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Looks up `key`, returning an `invalid-parameter` error if it is missing.
    pub fn require(&self, key: &str) -> Result<&Self> {
        self.get(key)
            .ok_or_else(|| Error::invalid_parameter(format!("missing required key '{key}'")))
    }

    /// Inserts `value` at `key`, creating the map if `self` is not already one. Panics if `self`
    /// holds a non-map, non-default value, which would indicate a programming error in this crate.
    pub fn insert(&mut self, key: impl Into<String>, value: Self) {
        match self {
            Self::Map(map) => {
                map.insert(key.into(), value);
            }
            _ => unreachable!("insert called on a non-map ParamNode"),
        }
    }

    /// Interprets this node as a bare number.
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            _ => Err(Error::invalid_parameter("expected a number")),
        }
    }

    /// Interprets this node as a bare string.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(s) => Ok(s),
            _ => Err(Error::invalid_parameter("expected a string")),
        }
    }

    /// Interprets this node as a bare boolean.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(Error::invalid_parameter("expected a boolean")),
        }
    }

    /// Interprets this node as a sequence.
    pub fn as_seq(&self) -> Result<&[Self]> {
        match self {
            Self::Seq(s) => Ok(s),
            _ => Err(Error::invalid_parameter("expected a sequence")),
        }
    }

    /// Parses this node as a pressure quantity: either a bare number (SI Pascals) or a string
    /// literal with an inline unit suffix such as `"0.01 atm"`.
    pub fn as_pressure_pa(&self) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::String(s) => {
                let (value, unit) = crate::units::split_inline_unit(s)?;
                let unit = unit.map_or(Ok(PressureUnit::Pascal), PressureUnit::parse)?;
                Ok(value * unit.to_pascal())
            }
            _ => Err(Error::invalid_parameter("expected a pressure scalar")),
        }
    }

    /// Parses this node as a molar activation energy in E/R (Kelvin), falling back to
    /// `default_unit` when the literal carries no inline unit suffix.
    pub fn as_activation_energy_er(&self, default_unit: EnergyUnit) -> Result<f64> {
        match self {
            Self::Number(n) => Ok(crate::units::activation_energy_to_er(*n, default_unit)),
            Self::String(s) => {
                let (value, unit) = crate::units::split_inline_unit(s)?;
                let unit = unit.map_or(Ok(default_unit), EnergyUnit::parse)?;
                Ok(crate::units::activation_energy_to_er(value, unit))
            }
            _ => Err(Error::invalid_parameter("expected an activation energy scalar")),
        }
    }

    /// Structural equality up to numeric normalization: numbers compare with relative tolerance
    /// `1e-12`, everything else must match exactly. Used by the round-trip property tests.
    #[must_use]
    pub fn approx_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                float_cmp::approx_eq!(f64, *a, *b, epsilon = 1e-12, ulps = 4)
                    || (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.approx_eq(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.approx_eq(w)))
            }
            _ => false,
        }
    }

    /// Parses a [`ParamNode`] tree out of a `serde_yaml::Value`. Numbers, strings, and booleans
    /// map directly; sequences and mappings recurse. Mapping keys that are not plain strings are
    /// rejected, matching the configuration documents this crate is meant to consume.
    pub fn from_yaml(value: &serde_yaml::Value) -> Result<Self> {
        match value {
            serde_yaml::Value::Number(n) => Ok(Self::Number(n.as_f64().ok_or_else(|| {
                Error::invalid_parameter(format!("numeric literal '{n}' does not fit in f64"))
            })?)),
            serde_yaml::Value::String(s) => Ok(Self::String(s.clone())),
            serde_yaml::Value::Bool(b) => Ok(Self::Bool(*b)),
            serde_yaml::Value::Sequence(seq) => {
                seq.iter().map(Self::from_yaml).collect::<Result<_>>().map(Self::Seq)
            }
            serde_yaml::Value::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    let key = k.as_str().ok_or_else(|| {
                        Error::invalid_parameter("mapping keys must be strings")
                    })?;
                    out.insert(key.to_string(), Self::from_yaml(v)?);
                }
                Ok(Self::Map(out))
            }
            serde_yaml::Value::Null => Ok(Self::Map(BTreeMap::new())),
            serde_yaml::Value::Tagged(t) => Self::from_yaml(&t.value),
        }
    }

    /// Serializes this node back into a `serde_yaml::Value`, preserving the same precision the
    /// underlying `f64` carries (round-trips to within one ulp through `serde_yaml`'s writer).
    #[must_use]
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            Self::Number(n) => serde_yaml::Value::Number((*n).into()),
            Self::String(s) => serde_yaml::Value::String(s.clone()),
            Self::Bool(b) => serde_yaml::Value::Bool(*b),
            Self::Seq(seq) => serde_yaml::Value::Sequence(seq.iter().map(Self::to_yaml).collect()),
            Self::Map(map) => {
                let mut out = serde_yaml::Mapping::new();
                for (k, v) in map {
                    out.insert(serde_yaml::Value::String(k.clone()), v.to_yaml());
                }
                serde_yaml::Value::Mapping(out)
            }
        }
    }

    /// Parses a YAML-formatted document directly into a [`ParamNode`].
    pub fn from_yaml_str(doc: &str) -> Result<Self> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(doc).map_err(|e| Error::invalid_parameter(e.to_string()))?;
        Self::from_yaml(&value)
    }
}

/// Quantity (amount-of-substance) unit a caller's rate constant literal is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUnit {
    /// SI mole; the crate's internal canonical quantity unit.
    Mole,
    /// Kilomole (1 kmol = 1000 mol); Cantera's traditional default.
    Kilomole,
}

impl QuantityUnit {
    /// Number of SI moles in one of this unit.
    #[must_use]
    pub const fn moles_per_unit(self) -> f64 {
        match self {
            Self::Mole => 1.0,
            Self::Kilomole => 1000.0,
        }
    }
}

/// The rate-unit context a caller configures or requests `A` in: the quantity unit and the
/// reaction order (number of reactant concentration factors), which together fix how `A`'s
/// numeric value scales relative to the crate's internal SI (mole-based) storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateUnits {
    /// Quantity unit the literal `A` is expressed in (mol or kmol).
    pub quantity: QuantityUnit,
    /// Reaction order: number of reactant concentration factors the rate law multiplies.
    pub order: i32,
}

impl RateUnits {
    /// The conventional default for this crate: kmol-based, bimolecular.
    #[must_use]
    pub const fn bimolecular_kmol() -> Self {
        Self {
            quantity: QuantityUnit::Kilomole,
            order: 2,
        }
    }

    /// Converts a literal `A` value (expressed in these rate units) into the crate's canonical
    /// SI (mole-based) representation.
    #[must_use]
    pub fn to_si(&self, a_literal: f64) -> f64 {
        let factor = self.quantity.moles_per_unit();
        a_literal * factor.powi(1 - self.order)
    }

    /// Converts a canonical SI `A` value back into these rate units.
    #[must_use]
    pub fn from_si(&self, a_si: f64) -> f64 {
        let factor = self.quantity.moles_per_unit();
        a_si * factor.powi(self.order - 1)
    }
}

impl TryFrom<i32> for RateUnits {
    type Error = Error;

    /// Builds a kmol-based [`RateUnits`] for the given reaction `order`.
    fn try_from(order: i32) -> Result<Self> {
        Ok(Self {
            quantity: QuantityUnit::Kilomole,
            order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_units_round_trip() {
        let units = RateUnits::bimolecular_kmol();
        let si = units.to_si(38.7);
        let back = units.from_si(si);
        assert!((back - 38.7).abs() < 1e-12);
    }

    #[test]
    fn pressure_literal_with_suffix() {
        let node = ParamNode::String("0.01 atm".to_string());
        let pa = node.as_pressure_pa().unwrap();
        assert!((pa - 0.01 * 101_325.0).abs() < 1e-9);
    }

    #[test]
    fn approx_eq_tolerates_tiny_relative_error() {
        let a = ParamNode::Number(1.0);
        let b = ParamNode::Number(1.0 + 1e-13);
        assert!(a.approx_eq(&b));
        let c = ParamNode::Number(1.1);
        assert!(!a.approx_eq(&c));
    }

    #[test]
    fn yaml_round_trip_map() {
        let doc = "a: 1.5\nb: true\nc: [1, 2, 3]\n";
        let node = ParamNode::from_yaml_str(doc).unwrap();
        let back = ParamNode::from_yaml(&node.to_yaml()).unwrap();
        assert!(node.approx_eq(&back));
    }
}
