//! The non-owning back-reference from a rate handle to the [`crate::multi_rate::MultiRate`] it
//! has been linked into.

use crate::error::{Error, Result};
use crate::multi_rate::MultiRate;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Embedded in every concrete rate-variant struct. Tracks the `(evaluator, index)` pair a rate
/// was linked to, as a weak observer: the evaluator owns the authoritative copy, this is just
/// enough information for a mutator on the rate handle to find and update it.
pub struct EvaluatorLink<T> {
    target: Option<(Weak<RefCell<MultiRate<T>>>, usize)>,
}

impl<T> Default for EvaluatorLink<T> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<T> Clone for EvaluatorLink<T> {
    /// Linking is part of an evaluator's bookkeeping, not a rate's own data: cloning a rate
    /// handle (e.g. to hand a snapshot to the evaluator) carries the link along so that the
    /// clone stored inside the evaluator can itself be re-linked if ever read back out.
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<T> EvaluatorLink<T> {
    /// Records that this rate now lives at `index` inside `evaluator`.
    pub fn link(&mut self, evaluator: &Rc<RefCell<MultiRate<T>>>, index: usize) {
        self.target = Some((Rc::downgrade(evaluator), index));
    }

    /// Clears the link. Idempotent: calling this on an already-unlinked rate is a no-op.
    pub fn release(&mut self) {
        self.target = None;
    }

    /// Returns `true` if this rate is currently linked to a live evaluator.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.target
            .as_ref()
            .is_some_and(|(weak, _)| weak.strong_count() > 0)
    }

    /// The index this rate was linked at. Fails with `invalid-state` if unlinked.
    pub fn index(&self) -> Result<usize> {
        self.target
            .as_ref()
            .map(|(_, idx)| *idx)
            .ok_or_else(|| Error::invalid_state("rate is not linked to an evaluator"))
    }

    /// Pushes `snapshot` into the linked evaluator's copy at this rate's index. A no-op if the
    /// rate is unlinked or the evaluator has since been dropped.
    pub fn propagate(&self, snapshot: T) {
        if let Some((weak, index)) = &self.target {
            if let Some(evaluator) = weak.upgrade() {
                evaluator.borrow_mut().replace(*index, snapshot);
            }
        }
    }
}
