//! The elementary Arrhenius rate-law variant.

use crate::arrhenius::Arrhenius;
use crate::error::{Error, Result};
use crate::link::EvaluatorLink;
use crate::multi_rate::MultiRate;
use crate::param::{ParamNode, RateUnits};
use crate::rate::Rate;
use crate::shared_data::ThermoState;
use crate::units::UnitSystem;
use std::rc::Rc;
use std::cell::RefCell;

/// `k(T) = A T^b exp(-E/RT)`, configured from a node's `rate-constant: {A, b, Ea}` and an
/// optional `negative-A` flag.
#[derive(Clone, Default)]
pub struct ArrheniusRate {
    triple: Arrhenius,
    allow_negative_a: bool,
    link: EvaluatorLink<Self>,
}

impl ArrheniusRate {
    /// Builds a rate directly from an already-assembled [`Arrhenius`] triple.
    #[must_use]
    pub fn from_triple(triple: Arrhenius) -> Self {
        Self {
            triple,
            allow_negative_a: false,
            link: EvaluatorLink::default(),
        }
    }

    /// Returns the current `(A, b, E/R)` triple, all in SI.
    #[must_use]
    pub const fn triple(&self) -> Arrhenius {
        self.triple
    }

    /// Whether this rate's configuration permits a negative pre-exponential factor.
    #[must_use]
    pub const fn allow_negative_a(&self) -> bool {
        self.allow_negative_a
    }

    /// Attaches this rate to `evaluator` at `index`.
    pub fn link_evaluator(&mut self, evaluator: &Rc<RefCell<MultiRate<Self>>>, index: usize) {
        self.link.link(evaluator, index);
    }

    /// Detaches this rate from whatever evaluator it was linked to, if any.
    pub fn release_evaluator(&mut self) {
        self.link.release();
    }

    /// The index this rate is linked at.
    pub fn index(&self) -> Result<usize> {
        self.link.index()
    }

    /// Sets the pre-exponential factor (SI), propagating the change to the linked evaluator copy.
    pub fn set_pre_exponential_factor(&mut self, a: f64) {
        self.triple.a = a;
        self.link.propagate(self.clone());
    }

    /// Sets the temperature exponent, propagating the change to the linked evaluator copy.
    pub fn set_temperature_exponent(&mut self, b: f64) {
        self.triple.b = b;
        self.link.propagate(self.clone());
    }

    /// Sets `E/R` directly (Kelvin), propagating the change to the linked evaluator copy.
    pub fn set_activation_energy_er(&mut self, e_over_r: f64) {
        self.triple.e_over_r = e_over_r;
        self.link.propagate(self.clone());
    }

    /// Allows or forbids a negative pre-exponential factor at validation time.
    pub fn set_allow_negative_a(&mut self, allow: bool) {
        self.allow_negative_a = allow;
        self.link.propagate(self.clone());
    }
}

impl Rate for ArrheniusRate {
    fn set_parameters(
        &mut self,
        node: &ParamNode,
        rate_units: RateUnits,
        unit_system: UnitSystem,
    ) -> Result<()> {
        if let Some(negative_a) = node.get("negative-A") {
            self.allow_negative_a = negative_a.as_bool()?;
        }
        if let Some(rate_constant) = node.get("rate-constant") {
            self.triple
                .set_parameters(rate_constant, rate_units, unit_system)?;
        }
        Ok(())
    }

    fn get_parameters(&self, rate_units: RateUnits, unit_system: UnitSystem) -> ParamNode {
        let mut map = ParamNode::empty_map();
        if self.allow_negative_a {
            map.insert("negative-A", ParamNode::Bool(true));
        }
        if !self.triple.is_unset() {
            map.insert(
                "rate-constant",
                self.triple.get_parameters(rate_units, unit_system),
            );
        }
        map
    }

    fn validate(&self, equation: &str) -> Result<()> {
        if !self.allow_negative_a && !self.triple.is_unset() && self.triple.a < 0.0 {
            return Err(Error::invalid_parameter_in(
                equation,
                format!(
                    "negative pre-exponential factor {} with negative-A not set",
                    self.triple.a
                ),
            ));
        }
        Ok(())
    }

    fn eval(&self, state: &ThermoState) -> f64 {
        self.triple.eval(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_a_rejected_by_default() {
        let rate = ArrheniusRate::from_triple(Arrhenius::from_normalized(-1.0, 0.0, 0.0));
        assert!(rate.validate("R1").is_err());
    }

    #[test]
    fn negative_a_allowed_when_flagged() {
        let mut rate = ArrheniusRate::from_triple(Arrhenius::from_normalized(-1.0, 0.0, 0.0));
        rate.set_allow_negative_a(true);
        assert!(rate.validate("R1").is_ok());
    }

    #[test]
    fn get_parameters_omits_unset_rate_constant() {
        let rate = ArrheniusRate::default();
        let node = rate.get_parameters(RateUnits::bimolecular_kmol(), UnitSystem::default());
        assert!(node.get("rate-constant").is_none());
    }

    #[test]
    fn mutator_on_linked_rate_updates_evaluator_copy() {
        let evaluator = Rc::new(RefCell::new(MultiRate::<ArrheniusRate>::new()));
        let mut rate = ArrheniusRate::from_triple(Arrhenius::from_normalized(10.0, 0.0, 0.0));
        let index = evaluator.borrow_mut().add(rate.clone());
        rate.link_evaluator(&evaluator, index);

        rate.set_pre_exponential_factor(20.0);

        assert!((evaluator.borrow().rate(index).triple().a - 20.0).abs() < 1e-12);
    }
}
