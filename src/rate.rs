//! The `Rate` contract every rate-law variant implements, and the tagged union over all six.

use crate::error::Result;
use crate::param::{ParamNode, RateUnits};
use crate::shared_data::ThermoState;
use crate::units::UnitSystem;
use enum_dispatch::enum_dispatch;

use crate::arrhenius_rate::ArrheniusRate;
use crate::chebyshev_rate::ChebyshevRate;
use crate::custom_rate::CustomRate;
use crate::falloff_rate::FalloffRate;
use crate::plog_rate::PlogRate;
use crate::three_body_rate::ThreeBodyRate;

/// The contract every rate-law variant implements: configure/round-trip through the parameter
/// tree, validate, and evaluate. Implemented by each concrete variant struct and dispatched
/// statically over [`RateEnum`] by `enum_dispatch`, and also used as the trait bound for
/// [`crate::multi_rate::MultiRate`], which is generic over exactly one variant at a time.
#[enum_dispatch]
pub trait Rate {
    /// Configures this rate from a parameter node, interpreting `A` in `rate_units` and energies
    /// in `unit_system`. Leaves the rate in whatever state it was in for any subkey the node
    /// doesn't supply (most variants treat a missing top-level key as "not yet configured"
    /// rather than an error; callers finish configuration before calling `validate`).
    fn set_parameters(
        &mut self,
        node: &ParamNode,
        rate_units: RateUnits,
        unit_system: UnitSystem,
    ) -> Result<()>;

    /// Emits this rate's parameters as a node, with `A` expressed in `rate_units` and energies in
    /// `unit_system`.
    fn get_parameters(&self, rate_units: RateUnits, unit_system: UnitSystem) -> ParamNode;

    /// Checks domain and sign-convention invariants, tagging any failure with `equation` for
    /// diagnostic context. Called once configuration of a whole reaction network is complete, not
    /// as part of `set_parameters`, so partially configured networks can be assembled first.
    fn validate(&self, equation: &str) -> Result<()>;

    /// Evaluates `k` at the given shared thermodynamic state. Never errors: an unconfigured rate
    /// evaluates to `NaN` so that a batch evaluation can proceed uniformly.
    fn eval(&self, state: &ThermoState) -> f64;

    /// Computes a per-rate scalar that depends only on the shared state (e.g. Troe's `Fcent`),
    /// cached once per `update` and replayed by every subsequent `eval_with_cache` call. Variants
    /// with nothing to precompute return `0.0`, which `eval_with_cache`'s default ignores.
    fn precompute(&self, state: &ThermoState) -> f64 {
        let _ = state;
        0.0
    }

    /// Evaluates `k` using a value previously produced by `precompute`, instead of recomputing it.
    /// The default ignores `cached` and falls back to a plain [`Rate::eval`].
    fn eval_with_cache(&self, state: &ThermoState, cached: f64) -> f64 {
        let _ = cached;
        self.eval(state)
    }
}

/// Tagged union over the six rate-law variants this crate supports.
#[enum_dispatch(Rate)]
#[derive(Clone)]
pub enum RateEnum {
    /// Elementary Arrhenius.
    ArrheniusRate,
    /// Three-body with per-species efficiencies.
    ThreeBodyRate,
    /// Lindemann/Troe pressure-dependent falloff.
    FalloffRate,
    /// Logarithmic-pressure interpolation.
    PlogRate,
    /// Bivariate Chebyshev expansion.
    ChebyshevRate,
    /// User-supplied function of temperature.
    CustomRate,
}

/// Dispatches on a parameter node's `type` key to build the right [`RateEnum`] variant and
/// configure it. Absence of `type` means elementary Arrhenius, per the configuration format.
pub fn rate_from_node(
    node: &ParamNode,
    rate_units: RateUnits,
    unit_system: UnitSystem,
) -> Result<RateEnum> {
    let type_tag = match node.get("type") {
        Some(t) => t.as_str()?,
        None => "arrhenius",
    };

    let mut rate: RateEnum = match type_tag {
        "arrhenius" => ArrheniusRate::default().into(),
        "three-body" => ThreeBodyRate::default().into(),
        "falloff" => FalloffRate::default().into(),
        "pressure-dependent-Arrhenius" => PlogRate::default().into(),
        "Chebyshev" => ChebyshevRate::default().into(),
        other => {
            return Err(crate::error::Error::invalid_parameter(format!(
                "unrecognized rate type '{other}'"
            )))
        }
    };

    rate.set_parameters(node, rate_units, unit_system)?;
    Ok(rate)
}
