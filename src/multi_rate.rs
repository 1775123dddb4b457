//! The batched evaluator: a dense, homogeneous collection of one rate-law variant.

use crate::rate::Rate;
use crate::shared_data::ThermoState;
use itertools::izip;

/// Owns a dense sequence of rates of exactly one variant, plus the shared-data bundle from the
/// most recent [`MultiRate::update`] call and a per-rate precomputed-value cache aligned with it.
/// A `MultiRate<ArrheniusRate>` and a `MultiRate<PlogRate>` are unrelated types: callers keep one
/// `MultiRate` instance per variant they use, which is what lets [`MultiRate::eval`] be a tight,
/// monomorphic loop with no per-rate virtual dispatch.
pub struct MultiRate<T> {
    rates: Vec<T>,
    state: Option<ThermoState>,
    cache: Vec<f64>,
}

impl<T> Default for MultiRate<T> {
    fn default() -> Self {
        Self {
            rates: Vec::new(),
            state: None,
            cache: Vec::new(),
        }
    }
}

impl<T> MultiRate<T> {
    /// Builds an empty evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `rate`, returning the index it was stored at.
    pub fn add(&mut self, rate: T) -> usize {
        self.rates.push(rate);
        self.rates.len() - 1
    }

    /// Swaps the rate stored at `index` for `rate`. Used by [`crate::link::EvaluatorLink`] to
    /// propagate a mutation made on a linked rate handle.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds, which would indicate a stale link; the evaluator is
    /// the sole owner of valid indices, so this should be unreachable via the public API.
    pub fn replace(&mut self, index: usize, rate: T) {
        self.rates[index] = rate;
    }

    /// Returns the rate stored at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[must_use]
    pub fn rate(&self, index: usize) -> &T {
        &self.rates[index]
    }

    /// Number of rates currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns `true` if no rates have been added yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl<T: Rate + Clone> MultiRate<T> {
    /// Pre-computes any per-rate intermediates that depend only on the shared state (see
    /// [`Rate::precompute`]) and caches the state itself for the subsequent [`MultiRate::eval`]
    /// call(s). Reuses the cache vector's existing allocation.
    pub fn update(&mut self, state: ThermoState) {
        self.cache.clear();
        self.cache
            .extend(self.rates.iter().map(|rate| rate.precompute(&state)));
        self.state = Some(state);
    }

    /// Writes `k` for every rate, in index order, into `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out.len()` does not match [`MultiRate::len`], or if called before `update`.
    pub fn eval(&self, out: &mut [f64]) {
        let state = self
            .state
            .as_ref()
            .expect("MultiRate::update must be called before MultiRate::eval");
        assert_eq!(out.len(), self.rates.len(), "output slice length mismatch");

        for (k, rate, cached) in izip!(out, &self.rates, &self.cache) {
            *k = rate.eval_with_cache(state, *cached);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrhenius::Arrhenius;
    use crate::arrhenius_rate::ArrheniusRate;

    #[test]
    fn generic_storage_works_without_rate_bound() {
        let mut multi: MultiRate<f64> = MultiRate::new();
        let idx = multi.add(1.0);
        assert_eq!(*multi.rate(idx), 1.0);
        multi.replace(idx, 2.0);
        assert_eq!(*multi.rate(idx), 2.0);
        assert_eq!(multi.len(), 1);
    }

    #[test]
    fn eval_writes_k_for_every_rate_in_order() {
        let mut multi: MultiRate<ArrheniusRate> = MultiRate::new();
        multi.add(ArrheniusRate::from_triple(Arrhenius::from_normalized(1.0, 0.0, 0.0)));
        multi.add(ArrheniusRate::from_triple(Arrhenius::from_normalized(2.0, 0.0, 0.0)));

        multi.update(ThermoState::from_temperature(1000.0));
        let mut out = vec![0.0; 2];
        multi.eval(&mut out);

        assert!((out[0] - 1.0).abs() < 1e-12);
        assert!((out[1] - 2.0).abs() < 1e-12);
    }
}
