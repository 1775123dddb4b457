//! The logarithmic-pressure-interpolation (Plog) rate-law variant.

use crate::arrhenius::Arrhenius;
use crate::error::{Error, Result};
use crate::link::EvaluatorLink;
use crate::multi_rate::MultiRate;
use crate::param::{ParamNode, RateUnits};
use crate::rate::Rate;
use crate::shared_data::ThermoState;
use crate::units::UnitSystem;
use std::cell::RefCell;
use std::rc::Rc;

/// One tabulated pressure point: `log(P)` and the Arrhenius triple active there. Entries sharing
/// the same `log_p` are summed (in `k`-space) before interpolation, per the Plog spec.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PlogPoint {
    log_p: f64,
    triple: Arrhenius,
}

/// Ordered-by-pressure table of Arrhenius triples, interpolated logarithmically in `P`.
#[derive(Clone, Default)]
pub struct PlogRate {
    // Stored with strictly increasing `log_p` after duplicate pressures are summed into one
    // "group" log-k at that pressure (see `rebuild_groups`).
    points: Vec<PlogPoint>,
    // The distinct, sorted `log_p` table, built once here rather than per-`eval_at` call (see
    // SPEC_FULL §4.7/§5: this is the "Plog cached log P table" precomputed off the hot path).
    distinct_log_ps: Vec<f64>,
    link: EvaluatorLink<Self>,
}

impl PlogRate {
    /// Builds a rate directly from `(P, Arrhenius)` pairs; `pressures_pa` need not be sorted or
    /// deduplicated, both of which are handled internally.
    #[must_use]
    pub fn new(entries: Vec<(f64, Arrhenius)>) -> Self {
        let mut rate = Self {
            points: Vec::new(),
            distinct_log_ps: Vec::new(),
            link: EvaluatorLink::default(),
        };
        rate.set_entries(entries);
        rate
    }

    /// Replaces the full pressure table, propagating the change to the linked evaluator copy.
    pub fn set_entries(&mut self, mut entries: Vec<(f64, Arrhenius)>) {
        entries.sort_by(|(p1, _), (p2, _)| {
            p1.partial_cmp(p2).unwrap_or(std::cmp::Ordering::Equal)
        });
        self.points = entries
            .into_iter()
            .map(|(p, triple)| PlogPoint {
                log_p: p.ln(),
                triple,
            })
            .collect();
        self.distinct_log_ps = self.points.iter().map(|p| p.log_p).collect();
        self.distinct_log_ps.dedup();
        self.link.propagate(self.clone());
    }

    /// The number of distinct tabulated pressures (after sorting; duplicates remain distinct
    /// entries whose `k`s are summed at evaluation time).
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no entries have been configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
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

    /// log(k) summed over every triple sharing exactly `log_p`, at the given state.
    fn log_k_at_group(&self, log_p: f64, state: &ThermoState) -> f64 {
        let k: f64 = self
            .points
            .iter()
            .filter(|p| p.log_p == log_p)
            .map(|p| p.triple.eval(state))
            .sum();
        k.ln()
    }

    /// Evaluates `k(T, P)` by locating the bracketing tabulated pressures and interpolating
    /// `log k` linearly in `log P`, clamping to the nearest endpoint outside the table's range.
    #[must_use]
    pub fn eval_at(&self, state: &ThermoState, pressure_pa: f64) -> f64 {
        if self.points.is_empty() {
            return f64::NAN;
        }

        let log_p = pressure_pa.ln();
        let first = self.points.first().unwrap().log_p;
        let last = self.points.last().unwrap().log_p;

        if log_p <= first {
            log::debug!("Plog evaluation at P={pressure_pa} clamped to lower tabulated pressure");
            return self.log_k_at_group(first, state).exp();
        }
        if log_p >= last {
            log::debug!("Plog evaluation at P={pressure_pa} clamped to upper tabulated pressure");
            return self.log_k_at_group(last, state).exp();
        }

        // Binary search for the first distinct group whose log_p is >= log_p, against the table
        // cached in `set_entries` rather than rebuilt on every call.
        let upper_idx = self.distinct_log_ps.partition_point(|&lp| lp < log_p);
        let (lo, hi) = (
            self.distinct_log_ps[upper_idx - 1],
            self.distinct_log_ps[upper_idx],
        );

        if (log_p - lo).abs() < 1e-15 {
            return self.log_k_at_group(lo, state).exp();
        }

        let log_k_lo = self.log_k_at_group(lo, state);
        let log_k_hi = self.log_k_at_group(hi, state);
        let frac = (log_p - lo) / (hi - lo);
        (log_k_lo + (log_k_hi - log_k_lo) * frac).exp()
    }
}

impl Rate for PlogRate {
    fn set_parameters(
        &mut self,
        node: &ParamNode,
        rate_units: RateUnits,
        unit_system: UnitSystem,
    ) -> Result<()> {
        if let Some(entries) = node.get("rate-constants") {
            let mut parsed = Vec::new();
            for entry in entries.as_seq()? {
                let pressure_pa = entry.require("P")?.as_pressure_pa()?;
                if !pressure_pa.is_finite() || pressure_pa <= 0.0 {
                    return Err(Error::invalid_parameter(format!(
                        "pressure-dependent-Arrhenius entry has non-positive or non-finite P \
                         ({pressure_pa})"
                    )));
                }
                let mut triple = Arrhenius::UNSET;
                triple.set_parameters(entry, rate_units, unit_system)?;
                parsed.push((pressure_pa, triple));
            }
            if parsed.is_empty() {
                return Err(Error::invalid_parameter(
                    "pressure-dependent-Arrhenius requires at least one rate-constants entry",
                ));
            }
            self.set_entries(parsed);
        }
        Ok(())
    }

    fn get_parameters(&self, rate_units: RateUnits, unit_system: UnitSystem) -> ParamNode {
        let seq = self
            .points
            .iter()
            .map(|point| {
                let mut entry = point.triple.get_parameters(rate_units, unit_system);
                entry.insert("P", ParamNode::Number(point.log_p.exp()));
                entry
            })
            .collect();
        let mut map = ParamNode::empty_map();
        map.insert("rate-constants", ParamNode::Seq(seq));
        map
    }

    fn validate(&self, equation: &str) -> Result<()> {
        if self.points.is_empty() {
            return Err(Error::invalid_parameter_in(
                equation,
                "pressure-dependent-Arrhenius requires at least one rate-constants entry",
            ));
        }
        Ok(())
    }

    fn eval(&self, state: &ThermoState) -> f64 {
        self.eval_at(state, state.pressure)
    }
}
