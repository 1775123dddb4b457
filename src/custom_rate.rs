//! The custom variant: a user-supplied function of temperature, outside the parameter-tree
//! round-trip surface.

use crate::error::{Error, Result};
use crate::link::EvaluatorLink;
use crate::multi_rate::MultiRate;
use crate::param::{ParamNode, RateUnits};
use crate::rate::Rate;
use crate::shared_data::ThermoState;
use crate::units::UnitSystem;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A rate whose `k(T)` is supplied directly as a closure rather than built from tabulated
/// coefficients. Has no parameter-tree representation: `get_parameters` always emits an empty
/// map, and `set_parameters` rejects any attempt to configure it that way.
#[derive(Clone, Default)]
pub struct CustomRate {
    function: Option<Rc<dyn Fn(f64) -> f64>>,
    link: EvaluatorLink<Self>,
}

impl fmt::Debug for CustomRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRate")
            .field("function", &self.function.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl CustomRate {
    /// Builds a rate directly from a rate function.
    #[must_use]
    pub fn new(function: Rc<dyn Fn(f64) -> f64>) -> Self {
        Self {
            function: Some(function),
            link: EvaluatorLink::default(),
        }
    }

    /// Returns `true` if no function has been supplied yet.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.function.is_none()
    }

    /// Replaces the rate function, propagating the change to the linked evaluator copy.
    pub fn set_rate_function(&mut self, function: Rc<dyn Fn(f64) -> f64>) {
        self.function = Some(function);
        self.link.propagate(self.clone());
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
}

impl Rate for CustomRate {
    /// Always fails: a custom rate has no parameter-tree representation.
    fn set_parameters(
        &mut self,
        _node: &ParamNode,
        _rate_units: RateUnits,
        _unit_system: UnitSystem,
    ) -> Result<()> {
        Err(Error::invalid_parameter(
            "custom rate functions cannot be configured from a parameter tree",
        ))
    }

    /// Always empty: a custom rate is not round-tripped.
    fn get_parameters(&self, _rate_units: RateUnits, _unit_system: UnitSystem) -> ParamNode {
        ParamNode::empty_map()
    }

    fn validate(&self, _equation: &str) -> Result<()> {
        Ok(())
    }

    fn eval(&self, state: &ThermoState) -> f64 {
        self.function
            .as_ref()
            .map_or(f64::NAN, |f| f(state.temperature))
    }
}
