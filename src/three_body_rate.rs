//! The three-body rate-law variant: an Arrhenius `k(T)` scaled by an effective third-body
//! concentration.

use crate::arrhenius::Arrhenius;
use crate::error::{Error, Result};
use crate::link::EvaluatorLink;
use crate::multi_rate::MultiRate;
use crate::param::{ParamNode, RateUnits};
use crate::rate::Rate;
use crate::shared_data::ThermoState;
use crate::units::UnitSystem;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// `k_eff(T, [X]) = k(T) * [M]`, where `[M] = sum_s efficiency_s * [X_s]` (default efficiency
/// `1.0` for species not listed).
#[derive(Clone, Default)]
pub struct ThreeBodyRate {
    triple: Arrhenius,
    allow_negative_a: bool,
    efficiencies: FxHashMap<String, f64>,
    link: EvaluatorLink<Self>,
}

impl ThreeBodyRate {
    /// Builds a rate directly from a triple and an efficiency map.
    #[must_use]
    pub fn new(triple: Arrhenius, efficiencies: FxHashMap<String, f64>) -> Self {
        Self {
            triple,
            allow_negative_a: false,
            efficiencies,
            link: EvaluatorLink::default(),
        }
    }

    /// The underlying Arrhenius `k(T)`, ignoring the third-body factor.
    #[must_use]
    pub const fn triple(&self) -> Arrhenius {
        self.triple
    }

    /// The current efficiency map.
    #[must_use]
    pub fn efficiencies(&self) -> &FxHashMap<String, f64> {
        &self.efficiencies
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

    /// Sets the pre-exponential factor, propagating to the linked evaluator copy.
    pub fn set_pre_exponential_factor(&mut self, a: f64) {
        self.triple.a = a;
        self.link.propagate(self.clone());
    }

    /// Sets the efficiency of a single species, propagating to the linked evaluator copy.
    pub fn set_efficiency(&mut self, species: impl Into<String>, efficiency: f64) {
        self.efficiencies.insert(species.into(), efficiency);
        self.link.propagate(self.clone());
    }

    /// Evaluates `k_eff` given the shared state directly (bypassing the `Rate` trait import).
    #[must_use]
    pub fn eval_with_state(&self, state: &ThermoState) -> f64 {
        self.triple.eval(state) * state.effective_third_body(&self.efficiencies)
    }
}

impl Rate for ThreeBodyRate {
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
        if let Some(efficiencies) = node.get("efficiencies") {
            let crate::param::ParamNode::Map(map) = efficiencies else {
                return Err(Error::invalid_parameter("efficiencies must be a mapping"));
            };
            for (species, value) in map {
                self.efficiencies.insert(species.clone(), value.as_number()?);
            }
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
        if !self.efficiencies.is_empty() {
            let mut eff = ParamNode::empty_map();
            for (species, value) in &self.efficiencies {
                eff.insert(species.clone(), ParamNode::Number(*value));
            }
            map.insert("efficiencies", eff);
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
        self.eval_with_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_2_worked_example() {
        // A=1.2e11, b=-1, Ea=0, efficiencies {AR:0.83, H2:2.4, H2O:15.4}; [AR]=[H2]=[H2O]=1.
        let mut eff = FxHashMap::default();
        eff.insert("AR".to_string(), 0.83);
        eff.insert("H2".to_string(), 2.4);
        eff.insert("H2O".to_string(), 15.4);

        let rate = ThreeBodyRate::new(Arrhenius::from_normalized(1.2e11, -1.0, 0.0), eff);

        let mut conc = FxHashMap::default();
        conc.insert("AR".to_string(), 1.0);
        conc.insert("H2".to_string(), 1.0);
        conc.insert("H2O".to_string(), 1.0);
        let state = ThermoState::new(1000.0, 101_325.0, conc);

        let k = rate.eval_with_state(&state);
        let expected = 1.2e11 * 1000_f64.powi(-1) * 18.63;
        assert!((k - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn missing_species_default_to_unit_efficiency() {
        let rate = ThreeBodyRate::new(
            Arrhenius::from_normalized(1.0, 0.0, 0.0),
            FxHashMap::default(),
        );
        let mut conc = FxHashMap::default();
        conc.insert("N2".to_string(), 2.0);
        let state = ThermoState::new(500.0, 1.0, conc);
        assert!((rate.eval_with_state(&state) - 2.0).abs() < 1e-12);
    }
}
