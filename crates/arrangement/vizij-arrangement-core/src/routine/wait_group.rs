//! Counting join primitive.

use std::cell::Cell;
use std::rc::Rc;

use super::{Step, Task};

/// Shared counter of outstanding work. Clones share the same count.
///
/// `leave` floors at zero, so unbalanced leaves are absorbed.
#[derive(Clone, Debug, Default)]
pub struct WaitGroup {
    count: Rc<Cell<usize>>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&self) {
        self.count.set(self.count.get() + 1);
    }

    pub fn leave(&self) {
        self.count.set(self.count.get().saturating_sub(1));
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count.get()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count.get() == 0
    }

    /// Task that completes once the group is empty.
    pub fn wait(&self) -> WaitForGroup {
        WaitForGroup {
            group: self.clone(),
        }
    }

    /// Wrap `task` so it joins this group when it starts and leaves on natural completion.
    pub fn track<C>(&self, task: impl Task<C> + 'static) -> Tracked<C> {
        Tracked {
            inner: Box::new(task),
            group: self.clone(),
            joined: false,
        }
    }
}

pub struct WaitForGroup {
    group: WaitGroup,
}

impl<C> Task<C> for WaitForGroup {
    fn step(&mut self, _cx: &mut C) -> Step<C> {
        if self.group.is_empty() {
            Step::Done
        } else {
            Step::Pending
        }
    }
}

/// Task wrapper that keeps a [`WaitGroup`] joined while the task runs.
///
/// Stopping the wrapper does not leave the group.
pub struct Tracked<C> {
    inner: Box<dyn Task<C>>,
    group: WaitGroup,
    joined: bool,
}

impl<C> Task<C> for Tracked<C> {
    fn step(&mut self, cx: &mut C) -> Step<C> {
        if !self.joined {
            self.group.join();
            self.joined = true;
        }
        match self.inner.step(cx) {
            Step::Done => {
                self.group.leave();
                Step::Done
            }
            other => other,
        }
    }

    fn stop(&mut self) {
        self.inner.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::super::{task_fn, Routine};
    use super::*;

    #[test]
    fn clones_share_count() {
        let a = WaitGroup::new();
        let b = a.clone();
        a.join();
        assert_eq!(b.count(), 1);
        b.leave();
        assert!(a.is_empty());
    }

    #[test]
    fn tracked_joins_on_first_step() {
        let group = WaitGroup::new();
        let mut r: Routine<()> = Routine::new(group.track(task_fn(|_: &mut ()| Step::Pending)));
        assert!(group.is_empty());
        r.advance(&mut ());
        assert_eq!(group.count(), 1);
    }
}
