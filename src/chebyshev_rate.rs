//! The bivariate Chebyshev rate-law variant.

use crate::error::{Error, Result};
use crate::link::EvaluatorLink;
use crate::multi_rate::MultiRate;
use crate::param::{ParamNode, RateUnits};
use crate::rate::Rate;
use crate::shared_data::ThermoState;
use crate::units::UnitSystem;
use ndarray::Array2;
use std::cell::RefCell;
use std::rc::Rc;

/// Clenshaw's recurrence for `sum_n c[n] * T_n(x)`, where `T_n` is the `n`-th Chebyshev
/// polynomial of the first kind. Avoids ever forming the individual `T_n(x)` explicitly.
fn clenshaw(coeffs: &[f64], x: f64) -> f64 {
    let mut b_k1 = 0.0;
    let mut b_k2 = 0.0;
    for &c in coeffs.iter().skip(1).rev() {
        let b_k = 2.0f64.mul_add(x * b_k1, c - b_k2);
        b_k2 = b_k1;
        b_k1 = b_k;
    }
    coeffs[0] + x * b_k1 - b_k2
}

/// Linearly maps `value` into `[-1, 1]` given its domain endpoints, clamping if out of range.
fn normalize_clamped(value: f64, min: f64, max: f64) -> f64 {
    ((2.0 * value - min - max) / (max - min)).clamp(-1.0, 1.0)
}

/// `log10 k = sum_ij C_ij T_i(T-tilde) T_j(P-tilde)`, with `T-tilde` and `P-tilde` normalized
/// reciprocal-temperature and log-pressure coordinates, each clamped to `[-1, 1]` outside the
/// tabulated domain.
#[derive(Clone)]
pub struct ChebyshevRate {
    t_min: f64,
    t_max: f64,
    p_min: f64,
    p_max: f64,
    coeffs: Array2<f64>,
    link: EvaluatorLink<Self>,
}

impl Default for ChebyshevRate {
    fn default() -> Self {
        Self {
            t_min: f64::NAN,
            t_max: f64::NAN,
            p_min: f64::NAN,
            p_max: f64::NAN,
            coeffs: Array2::zeros((0, 0)),
            link: EvaluatorLink::default(),
        }
    }
}

impl ChebyshevRate {
    /// Builds a rate directly from its domain and coefficient matrix (rows indexed by the
    /// temperature polynomial order, columns by the pressure polynomial order).
    #[must_use]
    pub fn new(t_min: f64, t_max: f64, p_min: f64, p_max: f64, coeffs: Array2<f64>) -> Self {
        Self {
            t_min,
            t_max,
            p_min,
            p_max,
            coeffs,
            link: EvaluatorLink::default(),
        }
    }

    /// Returns `true` if the coefficient matrix has never been configured.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The coefficient matrix, `C[i][j]`.
    #[must_use]
    pub fn coeffs(&self) -> &Array2<f64> {
        &self.coeffs
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

    /// Rescales the coefficient matrix as if `A` were expressed in a different rate-unit system,
    /// adding `log10(factor)` to `C[0][0]` (the only place a uniform multiplicative rescale of
    /// `k` can be absorbed in a log10-expansion).
    pub fn rescale_a(&mut self, factor: f64) {
        if let Some(c00) = self.coeffs.get_mut((0, 0)) {
            *c00 += factor.log10();
        }
        self.link.propagate(self.clone());
    }

    /// Evaluates `log10 k` at the normalized, clamped coordinates.
    fn log10_k_at(&self, t_tilde: f64, p_tilde: f64) -> f64 {
        let (nt, np) = self.coeffs.dim();
        // phi_i(t_tilde) * phi_j(p_tilde) summed via Clenshaw along each axis: build the
        // row-reduced vector r_i = sum_j C_ij phi_j(p_tilde) first, then Clenshaw that in t_tilde.
        let mut row_reduced = vec![0.0; nt];
        for (i, reduced) in row_reduced.iter_mut().enumerate() {
            let row: Vec<f64> = (0..np).map(|j| self.coeffs[(i, j)]).collect();
            *reduced = if row.is_empty() { 0.0 } else { clenshaw(&row, p_tilde) };
        }
        if row_reduced.is_empty() {
            f64::NAN
        } else {
            clenshaw(&row_reduced, t_tilde)
        }
    }

    /// Evaluates `k(T, P)` directly, clamping `(T, P)` to the tabulated domain.
    #[must_use]
    pub fn eval_at(&self, temperature: f64, pressure_pa: f64) -> f64 {
        if self.is_unset() {
            return f64::NAN;
        }

        let recip_t = temperature.recip();
        let recip_t_min = self.t_min.recip();
        let recip_t_max = self.t_max.recip();
        // T is normalized in reciprocal space: T=Tmin maps to -1, T=Tmax maps to +1, since
        // 1/T decreases as T increases.
        let t_tilde = normalize_clamped(recip_t, recip_t_min, recip_t_max);

        let log_p = pressure_pa.ln();
        let p_tilde = normalize_clamped(log_p, self.p_min.ln(), self.p_max.ln());

        if temperature < self.t_min
            || temperature > self.t_max
            || pressure_pa < self.p_min
            || pressure_pa > self.p_max
        {
            log::debug!(
                "Chebyshev evaluation at T={temperature}, P={pressure_pa} clamped to domain \
                 [{},{}]x[{},{}]",
                self.t_min,
                self.t_max,
                self.p_min,
                self.p_max
            );
        }

        10f64.powf(self.log10_k_at(t_tilde, p_tilde))
    }
}

impl Rate for ChebyshevRate {
    fn set_parameters(
        &mut self,
        node: &ParamNode,
        rate_units: RateUnits,
        _unit_system: UnitSystem,
    ) -> Result<()> {
        if let Some(t_range) = node.get("temperature-range") {
            let seq = t_range.as_seq()?;
            if seq.len() != 2 {
                return Err(Error::invalid_parameter("temperature-range requires [Tmin, Tmax]"));
            }
            self.t_min = seq[0].as_number()?;
            self.t_max = seq[1].as_number()?;
        }
        if let Some(p_range) = node.get("pressure-range") {
            let seq = p_range.as_seq()?;
            if seq.len() != 2 {
                return Err(Error::invalid_parameter("pressure-range requires [Pmin, Pmax]"));
            }
            self.p_min = seq[0].as_pressure_pa()?;
            self.p_max = seq[1].as_pressure_pa()?;
        }
        if let Some(data) = node.get("data") {
            let rows = data.as_seq()?;
            let nt = rows.len();
            let np = if nt == 0 { 0 } else { rows[0].as_seq()?.len() };
            let mut coeffs = Array2::zeros((nt, np));
            for (i, row) in rows.iter().enumerate() {
                let row = row.as_seq()?;
                if row.len() != np {
                    return Err(Error::invalid_parameter("Chebyshev data rows must be equal length"));
                }
                for (j, value) in row.iter().enumerate() {
                    coeffs[(i, j)] = value.as_number()?;
                }
            }
            // The literal data is expressed assuming `A` is in `rate_units`; rescale C_00 so
            // internal storage matches the crate's SI semantics (see `rescale_a`).
            if let Some(c00) = coeffs.get_mut((0, 0)) {
                *c00 += rate_units.to_si(1.0).log10();
            }
            self.coeffs = coeffs;
        }
        Ok(())
    }

    fn get_parameters(&self, rate_units: RateUnits, _unit_system: UnitSystem) -> ParamNode {
        let mut map = ParamNode::empty_map();
        if self.t_min.is_finite() && self.t_max.is_finite() {
            map.insert(
                "temperature-range",
                ParamNode::Seq(vec![ParamNode::Number(self.t_min), ParamNode::Number(self.t_max)]),
            );
        }
        if self.p_min.is_finite() && self.p_max.is_finite() {
            map.insert(
                "pressure-range",
                ParamNode::Seq(vec![ParamNode::Number(self.p_min), ParamNode::Number(self.p_max)]),
            );
        }
        if !self.is_unset() {
            // Undo the SI rescale applied at ingest so the emitted literal matches what a caller
            // configured under `rate_units` would expect to read back.
            let mut emitted = self.coeffs.clone();
            if let Some(c00) = emitted.get_mut((0, 0)) {
                *c00 -= rate_units.to_si(1.0).log10();
            }
            let rows = emitted
                .rows()
                .into_iter()
                .map(|row| ParamNode::Seq(row.iter().map(|&v| ParamNode::Number(v)).collect()))
                .collect();
            map.insert("data", ParamNode::Seq(rows));
        }
        map
    }

    fn validate(&self, equation: &str) -> Result<()> {
        if !self.is_unset() && (self.t_min >= self.t_max || self.p_min >= self.p_max) {
            return Err(Error::invalid_parameter_in(
                equation,
                "Chebyshev domain requires Tmin < Tmax and Pmin < Pmax",
            ));
        }
        Ok(())
    }

    fn eval(&self, state: &ThermoState) -> f64 {
        self.eval_at(state.temperature, state.pressure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction_5() -> ChebyshevRate {
        // A small, made-up-but-deterministic 2x2 coefficient matrix for testing the recurrence
        // and domain clamping; not claimed to model any real reaction.
        let coeffs = Array2::from_shape_vec((2, 2), vec![1.0, 0.2, -0.3, 0.05]).unwrap();
        ChebyshevRate::new(300.0, 2500.0, 1000.0, 1.0e7, coeffs)
    }

    #[test]
    fn matches_direct_double_sum_inside_domain() {
        let rate = reaction_5();
        let k = rate.eval_at(1000.0, 101_325.0);

        let recip_t_min = 1.0 / 300.0;
        let recip_t_max = 1.0 / 2500.0;
        let t_tilde = ((2.0 / 1000.0 - recip_t_min - recip_t_max) / (recip_t_max - recip_t_min))
            .clamp(-1.0, 1.0);
        let p_tilde = ((2.0 * 101_325.0_f64.ln() - 1000.0_f64.ln() - 1.0e7_f64.ln())
            / (1.0e7_f64.ln() - 1000.0_f64.ln()))
        .clamp(-1.0, 1.0);

        let phi = |n: u32, x: f64| (f64::from(n) * x.acos()).cos();
        let coeffs = [[1.0, 0.2], [-0.3, 0.05]];
        let mut expected_log10_k = 0.0;
        for (i, row) in coeffs.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                expected_log10_k += c * phi(i as u32, t_tilde) * phi(j as u32, p_tilde);
            }
        }
        let expected = 10f64.powf(expected_log10_k);

        assert!((k - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn clamps_outside_temperature_and_pressure_domain() {
        let rate = reaction_5();
        let at_low_t = rate.eval_at(300.0, 101_325.0);
        let below_low_t = rate.eval_at(100.0, 101_325.0);
        assert!((at_low_t - below_low_t).abs() / at_low_t.abs() < 1e-9);
    }

    #[test]
    fn domain_requires_monotone_bounds() {
        let coeffs = Array2::from_shape_vec((1, 1), vec![0.0]).unwrap();
        let rate = ChebyshevRate::new(2500.0, 300.0, 1000.0, 1.0e7, coeffs);
        assert!(rate.validate("R5").is_err());
    }

    #[test]
    fn set_then_get_parameters_round_trips_through_rate_units_rescale() {
        let node = ParamNode::from_yaml_str(
            "temperature-range: [300.0, 2500.0]\n\
             pressure-range: [1000.0, 10000000.0]\n\
             data:\n  - [1.0, 0.2]\n  - [-0.3, 0.05]\n",
        )
        .unwrap();
        let units = RateUnits::bimolecular_kmol();

        let mut rate = ChebyshevRate::default();
        rate.set_parameters(&node, units, UnitSystem::default()).unwrap();

        let round_tripped = rate.get_parameters(units, UnitSystem::default());
        assert!(node.approx_eq(&round_tripped));
    }
}
