//! Cooperative routines.
//!
//! A [`Routine`] drives a [`Task`] one step per external advance. A task may
//! yield a child task; the routine then advances the child until it completes
//! before stepping the parent again. Nothing runs in the background: all work
//! happens inside `advance`, on the caller's thread.
//!
//! The context `C` is handed to every step so tasks can reach shared state
//! (an arrangement, a clock) without owning it.

pub mod tasks;
pub mod wait_group;

pub use tasks::{task_fn, Delay, FnTask, Sequence, TickClock, WaitUntil};
pub use wait_group::{Tracked, WaitForGroup, WaitGroup};

/// Outcome of a single task step.
pub enum Step<C> {
    /// Not finished; step again next advance.
    Pending,
    /// Run this child to completion before stepping again.
    Yield(Box<dyn Task<C>>),
    Done,
}

impl<C> Step<C> {
    pub fn yield_task(task: impl Task<C> + 'static) -> Self {
        Step::Yield(Box::new(task))
    }
}

impl<C> std::fmt::Debug for Step<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Pending => f.write_str("Pending"),
            Step::Yield(_) => f.write_str("Yield(..)"),
            Step::Done => f.write_str("Done"),
        }
    }
}

/// A suspendable unit of work.
pub trait Task<C> {
    fn step(&mut self, cx: &mut C) -> Step<C>;

    /// Called once when the owning routine is stopped before completing.
    fn stop(&mut self) {}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoutineState {
    Running,
    Complete,
    Stopped,
}

/// Drives a task and at most one active child routine.
pub struct Routine<C> {
    task: Box<dyn Task<C>>,
    child: Option<Box<Routine<C>>>,
    state: RoutineState,
}

impl<C> Routine<C> {
    pub fn new(task: impl Task<C> + 'static) -> Self {
        Self::from_box(Box::new(task))
    }

    pub fn from_box(task: Box<dyn Task<C>>) -> Self {
        Self {
            task,
            child: None,
            state: RoutineState::Running,
        }
    }

    #[inline]
    pub fn state(&self) -> RoutineState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == RoutineState::Running
    }

    /// Advance one step. Returns false once the routine is complete or stopped.
    ///
    /// A freshly yielded child is advanced in the same call. If that first
    /// advance already completes it, the parent resumes on the next call.
    /// A child that completes on a later call hands control back to the
    /// parent within that same call.
    pub fn advance(&mut self, cx: &mut C) -> bool {
        if self.state != RoutineState::Running {
            return false;
        }
        if let Some(child) = self.child.as_mut() {
            if child.advance(cx) {
                return true;
            }
            self.child = None;
        }
        match self.task.step(cx) {
            Step::Pending => true,
            Step::Yield(task) => {
                let mut child = Routine::from_box(task);
                if child.advance(cx) {
                    self.child = Some(Box::new(child));
                }
                true
            }
            Step::Done => {
                self.state = RoutineState::Complete;
                false
            }
        }
    }

    /// Force the terminal state, stopping any active child first.
    pub fn stop(&mut self) {
        if self.state != RoutineState::Running {
            return;
        }
        if let Some(mut child) = self.child.take() {
            child.stop();
        }
        self.task.stop();
        self.state = RoutineState::Stopped;
    }
}

impl<C> Task<C> for Routine<C> {
    fn step(&mut self, cx: &mut C) -> Step<C> {
        if self.advance(cx) {
            Step::Pending
        } else {
            Step::Done
        }
    }

    fn stop(&mut self) {
        Routine::stop(self);
    }
}

/// Advances several routines side by side; complete once all of them are.
pub struct ConcurrentRoutine<C> {
    children: Vec<Routine<C>>,
    state: RoutineState,
}

impl<C> ConcurrentRoutine<C> {
    pub fn new(children: Vec<Routine<C>>) -> Self {
        Self {
            children,
            state: RoutineState::Running,
        }
    }

    #[inline]
    pub fn state(&self) -> RoutineState {
        self.state
    }

    pub fn children(&self) -> &[Routine<C>] {
        &self.children
    }

    /// Advance every child once. Returns false once every child has finished.
    pub fn advance(&mut self, cx: &mut C) -> bool {
        if self.state != RoutineState::Running {
            return false;
        }
        let mut any_running = false;
        for child in &mut self.children {
            any_running |= child.advance(cx);
        }
        if !any_running {
            self.state = RoutineState::Complete;
        }
        any_running
    }

    pub fn stop(&mut self) {
        if self.state != RoutineState::Running {
            return;
        }
        for child in &mut self.children {
            child.stop();
        }
        self.state = RoutineState::Stopped;
    }
}

impl<C> Task<C> for ConcurrentRoutine<C> {
    fn step(&mut self, cx: &mut C) -> Step<C> {
        if self.advance(cx) {
            Step::Pending
        } else {
            Step::Done
        }
    }

    fn stop(&mut self) {
        ConcurrentRoutine::stop(self);
    }
}
