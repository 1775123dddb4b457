//! The Lindemann/Troe pressure-dependent falloff rate-law variant.

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

/// The four Troe blending-function coefficients `(A, T3, T1, T2)`. `T2` is optional in the
/// source formula (its term drops out when absent); here that's represented as `f64::INFINITY`,
/// which makes `exp(-T2/T)` vanish exactly as the "T2 finite ? ... : 0" ternary intends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TroeParams {
    /// Weighting between the two main exponential terms.
    pub a: f64,
    /// First characteristic temperature.
    pub t3: f64,
    /// Second characteristic temperature.
    pub t1: f64,
    /// Third characteristic temperature; `f64::INFINITY` means "absent".
    pub t2: f64,
}

impl TroeParams {
    /// `Fcent(T) = (1-A) exp(-T/T3) + A exp(-T/T1) + exp(-T2/T)` (the last term vanishing when
    /// `T2` is infinite).
    #[must_use]
    pub fn f_cent(&self, temperature: f64) -> f64 {
        (1.0 - self.a) * (-temperature / self.t3).exp()
            + self.a * (-temperature / self.t1).exp()
            + (-self.t2 / temperature).exp()
    }
}

/// Low- and high-pressure Arrhenius limits, efficiencies, and optional Troe blending. With no
/// Troe parameters this reduces to the Lindemann form (`F = 1`).
#[derive(Clone, Default)]
pub struct FalloffRate {
    k0: Arrhenius,
    k_inf: Arrhenius,
    efficiencies: FxHashMap<String, f64>,
    troe: Option<TroeParams>,
    link: EvaluatorLink<Self>,
}

impl FalloffRate {
    /// Builds a rate directly from its low-/high-pressure limits.
    #[must_use]
    pub fn new(
        k0: Arrhenius,
        k_inf: Arrhenius,
        efficiencies: FxHashMap<String, f64>,
        troe: Option<TroeParams>,
    ) -> Self {
        Self {
            k0,
            k_inf,
            efficiencies,
            troe,
            link: EvaluatorLink::default(),
        }
    }

    /// The low-pressure limit `k0(T)`.
    #[must_use]
    pub const fn k0(&self) -> Arrhenius {
        self.k0
    }

    /// The high-pressure limit `k_inf(T)`.
    #[must_use]
    pub const fn k_inf(&self) -> Arrhenius {
        self.k_inf
    }

    /// The current Troe parameters, if configured (`None` means Lindemann).
    #[must_use]
    pub const fn troe(&self) -> Option<TroeParams> {
        self.troe
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

    /// Replaces the Troe parameters, propagating to the linked evaluator copy.
    pub fn set_troe_params(&mut self, troe: Option<TroeParams>) {
        self.troe = troe;
        self.link.propagate(self.clone());
    }

    /// Sets the efficiency of a single species, propagating to the linked evaluator copy.
    pub fn set_efficiency(&mut self, species: impl Into<String>, efficiency: f64) {
        self.efficiencies.insert(species.into(), efficiency);
        self.link.propagate(self.clone());
    }

    fn f_cent_or_unity(&self, temperature: f64) -> f64 {
        self.troe.map_or(1.0, |troe| troe.f_cent(temperature))
    }

    /// Evaluates `k` from the shared state and a precomputed `Fcent` value (or `1.0` for
    /// Lindemann, where the Troe blending collapses to `F = 1`).
    fn eval_from_f_cent(&self, state: &ThermoState, f_cent: f64) -> f64 {
        let m = state.effective_third_body(&self.efficiencies);
        let k0 = self.k0.eval(state);
        let k_inf = self.k_inf.eval(state);
        let pr = k0 * m / k_inf;

        let f = if self.troe.is_some() {
            let log_pr = pr.log10();
            let log_f_cent = f_cent.log10();
            let c = -0.4 - 0.67 * log_f_cent;
            let n = 0.75 - 1.27 * log_f_cent;
            let f1 = (log_pr + c) / (n - 0.14 * (log_pr + c));
            10f64.powf(log_f_cent / (1.0 + f1 * f1))
        } else {
            1.0
        };

        k_inf * (pr / (1.0 + pr)) * f
    }
}

impl Rate for FalloffRate {
    fn set_parameters(
        &mut self,
        node: &ParamNode,
        rate_units: RateUnits,
        unit_system: UnitSystem,
    ) -> Result<()> {
        if let Some(low) = node.get("low-P-rate-constant") {
            self.k0.set_parameters(low, rate_units, unit_system)?;
        }
        if let Some(high) = node.get("high-P-rate-constant") {
            self.k_inf.set_parameters(high, rate_units, unit_system)?;
        }
        if let Some(troe) = node.get("Troe") {
            self.troe = Some(TroeParams {
                a: troe.require("A")?.as_number()?,
                t3: troe.require("T3")?.as_number()?,
                t1: troe.require("T1")?.as_number()?,
                t2: troe
                    .get("T2")
                    .map(crate::param::ParamNode::as_number)
                    .transpose()?
                    .unwrap_or(f64::INFINITY),
            });
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
        if !self.k0.is_unset() {
            map.insert(
                "low-P-rate-constant",
                self.k0.get_parameters(rate_units, unit_system),
            );
        }
        if !self.k_inf.is_unset() {
            map.insert(
                "high-P-rate-constant",
                self.k_inf.get_parameters(rate_units, unit_system),
            );
        }
        if let Some(troe) = self.troe {
            let mut troe_node = ParamNode::empty_map();
            troe_node.insert("A", ParamNode::Number(troe.a));
            troe_node.insert("T3", ParamNode::Number(troe.t3));
            troe_node.insert("T1", ParamNode::Number(troe.t1));
            if troe.t2.is_finite() {
                troe_node.insert("T2", ParamNode::Number(troe.t2));
            }
            map.insert("Troe", troe_node);
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
        if !self.k0.is_unset() && self.k0.a < 0.0 {
            return Err(Error::invalid_parameter_in(
                equation,
                "negative low-pressure pre-exponential factor",
            ));
        }
        if !self.k_inf.is_unset() && self.k_inf.a < 0.0 {
            return Err(Error::invalid_parameter_in(
                equation,
                "negative high-pressure pre-exponential factor",
            ));
        }
        Ok(())
    }

    fn eval(&self, state: &ThermoState) -> f64 {
        self.eval_from_f_cent(state, self.f_cent_or_unity(state.temperature))
    }

    fn precompute(&self, state: &ThermoState) -> f64 {
        self.f_cent_or_unity(state.temperature)
    }

    fn eval_with_cache(&self, state: &ThermoState, cached: f64) -> f64 {
        self.eval_from_f_cent(state, cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction_3() -> FalloffRate {
        FalloffRate::new(
            Arrhenius::from_normalized(1e12, 0.0, 0.0),
            Arrhenius::from_normalized(1e13, 0.0, 0.0),
            FxHashMap::default(),
            Some(TroeParams {
                a: 0.7346,
                t3: 94.0,
                t1: 1756.0,
                t2: 5182.0,
            }),
        )
    }

    #[test]
    fn reaction_3_worked_example() {
        let rate = reaction_3();
        let mut conc = FxHashMap::default();
        conc.insert("M".to_string(), 1.0);
        let state = ThermoState::new(1000.0, 101_325.0, conc);
        let k = rate.eval(&state);

        let f_cent = 0.2654 * (-1000.0_f64 / 94.0).exp()
            + 0.7346 * (-1000.0_f64 / 1756.0).exp()
            + (-5182.0_f64 / 1000.0).exp();
        let pr = 1e12 * 1.0 / 1e13; // [M] = 1 mol/m^3, no efficiencies listed so weight defaults to 1
        let log_pr = pr.log10();
        let log_f_cent = f_cent.log10();
        let c = -0.4 - 0.67 * log_f_cent;
        let n = 0.75 - 1.27 * log_f_cent;
        let f1 = (log_pr + c) / (n - 0.14 * (log_pr + c));
        let f = 10f64.powf(log_f_cent / (1.0 + f1 * f1));
        let expected = 1e13 * (pr / (1.0 + pr)) * f;

        assert!((k - expected).abs() <= 1e-10 * expected.abs().max(1.0));
    }

    #[test]
    fn precompute_and_eval_with_cache_match_plain_eval() {
        let rate = reaction_3();
        let mut conc = FxHashMap::default();
        conc.insert("N2".to_string(), 5.0);
        let state = ThermoState::new(1000.0, 101_325.0, conc);

        let direct = rate.eval(&state);
        let cached = rate.precompute(&state);
        let via_cache = rate.eval_with_cache(&state, cached);
        assert!((direct - via_cache).abs() < 1e-12);
    }

    #[test]
    fn lindemann_limit_has_unit_blending_factor() {
        let rate = FalloffRate::new(
            Arrhenius::from_normalized(1.0, 0.0, 0.0),
            Arrhenius::from_normalized(1.0, 0.0, 0.0),
            FxHashMap::default(),
            None,
        );
        let mut conc = FxHashMap::default();
        conc.insert("M".to_string(), 1.0);
        let state = ThermoState::new(1000.0, 101_325.0, conc);
        let k = rate.eval(&state);
        // Pr = k0*[M]/kinf = 1, F = 1 => k = kinf * Pr/(1+Pr) = 0.5
        assert!((k - 0.5).abs() < 1e-12);
    }

    #[test]
    fn falloff_limits_as_m_grows() {
        let rate = FalloffRate::new(
            Arrhenius::from_normalized(2.0, 0.0, 0.0),
            Arrhenius::from_normalized(10.0, 0.0, 0.0),
            FxHashMap::default(),
            None,
        );
        let mut small = FxHashMap::default();
        small.insert("M".to_string(), 1e-6);
        let low_m_state = ThermoState::new(1000.0, 1.0, small);
        // as [M] -> 0, k -> k0*[M]
        let k_low = rate.eval(&low_m_state);
        assert!((k_low - 2.0 * 1e-6).abs() / (2.0 * 1e-6) < 1e-3);

        let mut large = FxHashMap::default();
        large.insert("M".to_string(), 1e9);
        let high_m_state = ThermoState::new(1000.0, 1.0, large);
        // as [M] -> inf, k -> k_inf
        let k_high = rate.eval(&high_m_state);
        assert!((k_high - 10.0).abs() / 10.0 < 1e-6);
    }
}
