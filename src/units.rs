//! Dimensional units: exponent vectors over base dimensions, SI conversion factors, and the
//! small vocabulary of unit spellings this crate accepts (pressure, energy/quantity, rate units).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The universal gas constant, J/(mol·K). Every activation energy this crate stores is divided by
/// this constant, so the result carries units of temperature ("E/R").
pub const GAS_CONSTANT: f64 = 8.314_462_618;

/// Exponent vector over the base dimensions {mass, length, time, quantity, temperature, current}.
/// Two quantities are dimensionally compatible when their `Dimension`s are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    /// Exponent of mass (kg).
    pub mass: i8,
    /// Exponent of length (m).
    pub length: i8,
    /// Exponent of time (s).
    pub time: i8,
    /// Exponent of quantity (mol).
    pub quantity: i8,
    /// Exponent of temperature (K).
    pub temperature: i8,
    /// Exponent of current (A).
    pub current: i8,
}

impl Dimension {
    /// The dimensionless unit (all exponents zero).
    pub const DIMENSIONLESS: Self = Self {
        mass: 0,
        length: 0,
        time: 0,
        quantity: 0,
        temperature: 0,
        current: 0,
    };

    /// Pressure: mass · length^-1 · time^-2.
    pub const PRESSURE: Self = Self {
        mass: 1,
        length: -1,
        time: -2,
        quantity: 0,
        temperature: 0,
        current: 0,
    };

    /// Molar energy: mass · length^2 · time^-2 · quantity^-1.
    pub const MOLAR_ENERGY: Self = Self {
        mass: 1,
        length: 2,
        time: -2,
        quantity: -1,
        temperature: 0,
        current: 0,
    };

    /// The rate-unit dimension for a reaction of the given `order` (number of reactant
    /// concentration factors), using seconds as the time base: a rate constant multiplies
    /// `order` concentrations (quantity · length^-3 each) and one inverse time to give a
    /// concentration-per-time, so its own dimension is
    /// `(quantity · length^-3)^(1 - order) · time^-1`.
    #[must_use]
    pub fn rate_unit(order: i32) -> Self {
        let order = i8::try_from(order).unwrap_or(i8::MAX);
        Self {
            mass: 0,
            length: -3 * (1 - order),
            time: -1,
            quantity: 1 - order,
            temperature: 0,
            current: 0,
        }
    }
}

/// A unit system attached to a parameter-tree node: how scalars without an inline suffix should be
/// interpreted, plus the rate-unit context (order-dependent) used to normalize `A`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitSystem {
    /// Default activation-energy unit, e.g. `cal/mol` or `J/mol`.
    pub activation_energy: EnergyUnit,
    /// Default pressure unit for Plog/Chebyshev pressure ranges.
    pub pressure: PressureUnit,
}

impl Default for UnitSystem {
    fn default() -> Self {
        Self {
            activation_energy: EnergyUnit::JoulePerMole,
            pressure: PressureUnit::Pascal,
        }
    }
}

/// Units of molar activation energy this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyUnit {
    /// J/mol.
    JoulePerMole,
    /// cal/mol.
    CaloriePerMole,
    /// kJ/mol.
    KilojoulePerMole,
    /// kcal/mol.
    KilocaloriePerMole,
}

impl EnergyUnit {
    /// Conversion factor from this unit to J/mol.
    #[must_use]
    pub const fn to_joule_per_mole(self) -> f64 {
        match self {
            Self::JoulePerMole => 1.0,
            Self::CaloriePerMole => 4.184,
            Self::KilojoulePerMole => 1000.0,
            Self::KilocaloriePerMole => 4184.0,
        }
    }

    /// Parses the handful of spellings this crate accepts (case-sensitive, as they appear in
    /// configuration documents): `"J/mol"`, `"cal/mol"`, `"kJ/mol"`, `"kcal/mol"`.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "J/mol" => Ok(Self::JoulePerMole),
            "cal/mol" => Ok(Self::CaloriePerMole),
            "kJ/mol" => Ok(Self::KilojoulePerMole),
            "kcal/mol" => Ok(Self::KilocaloriePerMole),
            other => Err(Error::unit_mismatch(format!(
                "unrecognized activation-energy unit '{other}'"
            ))),
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::JoulePerMole => "J/mol",
            Self::CaloriePerMole => "cal/mol",
            Self::KilojoulePerMole => "kJ/mol",
            Self::KilocaloriePerMole => "kcal/mol",
        })
    }
}

/// Units of pressure this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureUnit {
    /// Pa.
    Pascal,
    /// atm.
    Atmosphere,
    /// bar.
    Bar,
    /// torr.
    Torr,
}

impl PressureUnit {
    /// Conversion factor from this unit to Pa.
    #[must_use]
    pub const fn to_pascal(self) -> f64 {
        match self {
            Self::Pascal => 1.0,
            Self::Atmosphere => 101_325.0,
            Self::Bar => 100_000.0,
            Self::Torr => 101_325.0 / 760.0,
        }
    }

    /// Parses the handful of spellings this crate accepts: `"Pa"`, `"atm"`, `"bar"`, `"torr"`.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Pa" => Ok(Self::Pascal),
            "atm" => Ok(Self::Atmosphere),
            "bar" => Ok(Self::Bar),
            "torr" => Ok(Self::Torr),
            other => Err(Error::unit_mismatch(format!(
                "unrecognized pressure unit '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PressureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pascal => "Pa",
            Self::Atmosphere => "atm",
            Self::Bar => "bar",
            Self::Torr => "torr",
        })
    }
}

/// Splits a scalar that may carry an inline unit suffix, e.g. `"0.01 atm"` -> `(0.01, Some("atm"))`,
/// `"6260 cal/mol"` -> `(6260.0, Some("cal/mol"))`, `"1.5"` -> `(1.5, None)`.
pub fn split_inline_unit(literal: &str) -> Result<(f64, Option<&str>)> {
    let literal = literal.trim();
    match literal.find(|c: char| c.is_ascii_alphabetic()) {
        None => literal
            .parse::<f64>()
            .map(|v| (v, None))
            .map_err(|e| Error::invalid_parameter(format!("bad numeric literal '{literal}': {e}"))),
        Some(idx) => {
            let (num, unit) = literal.split_at(idx);
            let num = num.trim();
            let unit = unit.trim();
            num.parse::<f64>()
                .map(|v| (v, Some(unit)))
                .map_err(|e| Error::invalid_parameter(format!("bad numeric literal '{num}': {e}")))
        }
    }
}

/// Converts an activation energy in the given literal (number + optional inline unit, falling
/// back to `default_unit`) into E/R (Kelvin).
pub fn activation_energy_to_er(value: f64, unit: EnergyUnit) -> f64 {
    value * unit.to_joule_per_mole() / GAS_CONSTANT
}

/// Converts E/R (Kelvin) back into an activation energy expressed in `unit`.
pub fn er_to_activation_energy(er: f64, unit: EnergyUnit) -> f64 {
    er * GAS_CONSTANT / unit.to_joule_per_mole()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn energy_round_trip() {
        let er = activation_energy_to_er(6260.0, EnergyUnit::CaloriePerMole);
        let back = er_to_activation_energy(er, EnergyUnit::CaloriePerMole);
        assert!(approx_eq!(f64, back, 6260.0, epsilon = 1e-9));
    }

    #[test]
    fn cal_and_joule_agree() {
        let er_cal = activation_energy_to_er(6260.0, EnergyUnit::CaloriePerMole);
        let er_j = activation_energy_to_er(6260.0 * 4.184, EnergyUnit::JoulePerMole);
        assert!(approx_eq!(f64, er_cal, er_j, epsilon = 1e-12));
    }

    #[test]
    fn split_inline_unit_parses_suffix() {
        assert_eq!(split_inline_unit("0.01 atm").unwrap(), (0.01, Some("atm")));
        assert_eq!(split_inline_unit("6260cal/mol").unwrap(), (6260.0, Some("cal/mol")));
        assert_eq!(split_inline_unit("1.5").unwrap(), (1.5, None));
    }

    #[test]
    fn rate_unit_dimension_for_bimolecular() {
        let dim = Dimension::rate_unit(2);
        assert_eq!(dim.length, 3);
        assert_eq!(dim.quantity, -1);
        assert_eq!(dim.time, -1);
    }
}
