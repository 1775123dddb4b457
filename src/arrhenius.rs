//! The modified Arrhenius primitive, shared by every rate-law variant that needs a `k(T)`.

use crate::error::Result;
use crate::param::{ParamNode, RateUnits};
use crate::shared_data::ThermoState;
use crate::units::{er_to_activation_energy, EnergyUnit, UnitSystem};
use serde::{Deserialize, Serialize};

/// A single modified-Arrhenius triple `(A, b, E/R)`. `A` is stored in the crate's canonical SI
/// (mole-based) units, `b` is dimensionless, and `E/R` always has units of temperature (Kelvin)
/// regardless of what energy unit the caller configured it with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrhenius {
    /// Pre-exponential factor, SI rate units.
    pub a: f64,
    /// Temperature exponent.
    pub b: f64,
    /// Activation energy divided by the gas constant, in Kelvin.
    pub e_over_r: f64,
}

impl Default for Arrhenius {
    fn default() -> Self {
        Self::UNSET
    }
}

impl Arrhenius {
    /// The unset sentinel: `A = NaN` so that [`Arrhenius::eval`] returns `NaN` until configured,
    /// per this crate's "evaluation never throws" error policy.
    pub const UNSET: Self = Self {
        a: f64::NAN,
        b: 0.0,
        e_over_r: 0.0,
    };

    /// Builds a triple from an activation energy already expressed in energy/quantity units,
    /// dividing by the gas constant at ingest.
    #[must_use]
    pub fn from_energy(a: f64, b: f64, activation_energy: f64, unit: EnergyUnit) -> Self {
        Self {
            a,
            b,
            e_over_r: crate::units::activation_energy_to_er(activation_energy, unit),
        }
    }

    /// Builds a triple directly from already-normalized `(A, b, E/R)` storage.
    #[must_use]
    pub const fn from_normalized(a: f64, b: f64, e_over_r: f64) -> Self {
        Self { a, b, e_over_r }
    }

    /// Returns `true` if this triple has never been configured.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.a.is_nan()
    }

    /// Evaluates `k(T) = A * exp(b * logT - (E/R) / T)` from the shared per-call logarithms.
    #[must_use]
    pub fn eval(&self, state: &ThermoState) -> f64 {
        self.a * (self.b.mul_add(state.log_t, -self.e_over_r * state.recip_t)).exp()
    }

    /// Configures this triple from a parameter node shaped `{A, b, Ea}`, interpreting `A` in
    /// `rate_units` and `Ea` in the node's own unit suffix or `unit_system.activation_energy`.
    pub fn set_parameters(
        &mut self,
        node: &ParamNode,
        rate_units: RateUnits,
        unit_system: UnitSystem,
    ) -> Result<()> {
        let a_literal = node.require("A")?.as_number()?;
        let b = node.require("b")?.as_number()?;
        let e_over_r = node
            .require("Ea")?
            .as_activation_energy_er(unit_system.activation_energy)?;

        self.a = rate_units.to_si(a_literal);
        self.b = b;
        self.e_over_r = e_over_r;
        Ok(())
    }

    /// Emits `{A, b, Ea}` with `A` expressed in `rate_units` and `Ea` expressed in
    /// `unit_system.activation_energy`.
    #[must_use]
    pub fn get_parameters(&self, rate_units: RateUnits, unit_system: UnitSystem) -> ParamNode {
        let mut map = ParamNode::empty_map();
        map.insert("A", ParamNode::Number(rate_units.from_si(self.a)));
        map.insert("b", ParamNode::Number(self.b));
        map.insert(
            "Ea",
            ParamNode::Number(er_to_activation_energy(
                self.e_over_r,
                unit_system.activation_energy,
            )),
        );
        map
    }
}
