#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

//! Reaction-rate evaluation core for gas-phase chemical kinetics: Arrhenius, three-body,
//! Lindemann/Troe falloff, Plog, Chebyshev, and custom rate laws, plus a batched evaluator for
//! tight per-step loops over a whole mechanism.
//!
//! A rate-law variant is configured from a self-describing [`param::ParamNode`] tree (produced by
//! parsing a YAML configuration document), evaluated at a shared [`shared_data::ThermoState`], and
//! optionally linked into a [`multi_rate::MultiRate`] batch so that later mutations on the handle
//! stay observably in sync with the evaluator's copy.

pub mod arrhenius;
pub mod arrhenius_rate;
pub mod chebyshev_rate;
pub mod custom_rate;
pub mod error;
pub mod falloff_rate;
pub mod link;
pub mod multi_rate;
pub mod param;
pub mod plog_rate;
pub mod rate;
pub mod shared_data;
pub mod three_body_rate;
pub mod units;

pub use error::{Error, Result};
pub use param::{ParamNode, QuantityUnit, RateUnits};
pub use rate::{rate_from_node, Rate, RateEnum};
pub use shared_data::ThermoState;
pub use units::UnitSystem;
