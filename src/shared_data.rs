//! The per-evaluation shared-data bundle broadcast to every rate in a batch.

use rustc_hash::FxHashMap;

/// Immutable view of temperature, pressure, and composition for one evaluation call. Built once
/// by the caller per (T, P, [X]) and passed to every [`crate::multi_rate::MultiRate::update`] /
/// [`crate::rate::Rate::eval`] in that pass. `Clone` and safe to hand to independent threads
/// evaluating different [`crate::multi_rate::MultiRate`]s in parallel.
#[derive(Debug, Clone)]
pub struct ThermoState {
    /// Temperature, Kelvin.
    pub temperature: f64,
    /// `ln(T)`.
    pub log_t: f64,
    /// `1/T`.
    pub recip_t: f64,
    /// Pressure, Pascal. `NaN` if this state was built without a pressure (pure Arrhenius batch).
    pub pressure: f64,
    /// `log10(P)`, only meaningful when `pressure` is finite and positive.
    pub log10_p: f64,
    /// Per-species concentration, mol/m^3.
    pub concentrations: FxHashMap<String, f64>,
}

impl ThermoState {
    /// Builds a state from temperature alone (no pressure, no composition); sufficient for plain
    /// Arrhenius rates.
    #[must_use]
    pub fn from_temperature(temperature: f64) -> Self {
        Self {
            temperature,
            log_t: temperature.ln(),
            recip_t: temperature.recip(),
            pressure: f64::NAN,
            log10_p: f64::NAN,
            concentrations: FxHashMap::default(),
        }
    }

    /// Builds a full state with temperature, pressure, and per-species concentrations (mol/m^3).
    #[must_use]
    pub fn new(temperature: f64, pressure: f64, concentrations: FxHashMap<String, f64>) -> Self {
        Self {
            temperature,
            log_t: temperature.ln(),
            recip_t: temperature.recip(),
            pressure,
            log10_p: pressure.log10(),
            concentrations,
        }
    }

    /// Sums per-species concentrations weighted by `efficiencies` (default weight `1.0` for any
    /// species not present in the map), giving the effective third-body concentration `[M]`.
    #[must_use]
    pub fn effective_third_body(&self, efficiencies: &FxHashMap<String, f64>) -> f64 {
        self.concentrations
            .iter()
            .map(|(species, conc)| conc * efficiencies.get(species).copied().unwrap_or(1.0))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_third_body_matches_worked_example() {
        let mut conc = FxHashMap::default();
        conc.insert("AR".to_string(), 1.0);
        conc.insert("H2".to_string(), 1.0);
        conc.insert("H2O".to_string(), 1.0);
        let state = ThermoState::new(1000.0, 101_325.0, conc);

        let mut eff = FxHashMap::default();
        eff.insert("AR".to_string(), 0.83);
        eff.insert("H2".to_string(), 2.4);
        eff.insert("H2O".to_string(), 15.4);

        let m = state.effective_third_body(&eff);
        assert!((m - 18.63).abs() < 1e-12);
    }
}
