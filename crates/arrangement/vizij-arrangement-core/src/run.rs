//! Completion handles for scheduling runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ids::RunId;
use crate::routine::{Step, Task};

#[derive(Debug)]
struct RunState {
    id: RunId,
    complete: AtomicBool,
    stopped: AtomicBool,
}

/// Handle to one execution of an arrangement's active plans.
///
/// Clones observe the same run. As a [`Task`] it stays pending until the run
/// completes or is stopped; stopping the owning routine stops the run.
#[derive(Clone, Debug)]
pub struct RunHandle {
    state: Arc<RunState>,
}

impl RunHandle {
    pub(crate) fn new(id: RunId) -> Self {
        Self {
            state: Arc::new(RunState {
                id,
                complete: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// Handle for a run with nothing to do.
    pub(crate) fn finished(id: RunId) -> Self {
        let handle = Self::new(id);
        handle.mark_complete();
        handle
    }

    #[inline]
    pub fn id(&self) -> RunId {
        self.state.id
    }

    pub fn is_complete(&self) -> bool {
        self.state.complete.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        self.state.stopped.load(Ordering::Acquire)
    }

    /// Completed or stopped.
    pub fn is_finished(&self) -> bool {
        self.is_complete() || self.is_stopped()
    }

    /// Request cancellation. The arrangement drops the run's plans on its next tick.
    pub fn stop(&self) {
        if !self.is_complete() {
            self.state.stopped.store(true, Ordering::Release);
        }
    }

    pub(crate) fn mark_complete(&self) {
        self.state.complete.store(true, Ordering::Release);
    }

    pub(crate) fn same_run(&self, other: &RunHandle) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl<C> Task<C> for RunHandle {
    fn step(&mut self, _cx: &mut C) -> Step<C> {
        if self.is_finished() {
            Step::Done
        } else {
            Step::Pending
        }
    }

    fn stop(&mut self) {
        RunHandle::stop(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_after_completion_is_ignored() {
        let h = RunHandle::finished(RunId(1));
        h.stop();
        assert!(h.is_complete());
        assert!(!h.is_stopped());
    }

    #[test]
    fn clones_observe_stop() {
        let h = RunHandle::new(RunId(2));
        let other = h.clone();
        other.stop();
        assert!(h.is_stopped());
        assert!(h.same_run(&other));
    }
}
