//! Building-block tasks.

use std::collections::VecDeque;

use super::{Step, Task};

/// Contexts that know how much time the current advance covers.
pub trait TickClock {
    fn delta_seconds(&self) -> f32;
}

/// Task backed by a closure.
pub struct FnTask<F>(F);

pub fn task_fn<C, F>(f: F) -> FnTask<F>
where
    F: FnMut(&mut C) -> Step<C>,
{
    FnTask(f)
}

impl<C, F> Task<C> for FnTask<F>
where
    F: FnMut(&mut C) -> Step<C>,
{
    fn step(&mut self, cx: &mut C) -> Step<C> {
        (self.0)(cx)
    }
}

/// Runs tasks one after another by yielding each as a child.
pub struct Sequence<C> {
    queue: VecDeque<Box<dyn Task<C>>>,
}

impl<C> Sequence<C> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn then(mut self, task: impl Task<C> + 'static) -> Self {
        self.queue.push_back(Box::new(task));
        self
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<C> Default for Sequence<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Task<C> for Sequence<C> {
    fn step(&mut self, _cx: &mut C) -> Step<C> {
        match self.queue.pop_front() {
            Some(task) => Step::Yield(task),
            None => Step::Done,
        }
    }
}

/// Waits for an amount of context time to pass.
#[derive(Clone, Debug)]
pub struct Delay {
    remaining: f32,
}

impl Delay {
    pub fn seconds(seconds: f32) -> Self {
        Self { remaining: seconds }
    }
}

impl<C: TickClock> Task<C> for Delay {
    fn step(&mut self, cx: &mut C) -> Step<C> {
        self.remaining -= cx.delta_seconds();
        if self.remaining <= 0.0 {
            Step::Done
        } else {
            Step::Pending
        }
    }
}

/// Pending until the predicate holds.
pub struct WaitUntil<F>(F);

impl<F> WaitUntil<F> {
    pub fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<C, F> Task<C> for WaitUntil<F>
where
    F: FnMut(&C) -> bool,
{
    fn step(&mut self, cx: &mut C) -> Step<C> {
        if (self.0)(cx) {
            Step::Done
        } else {
            Step::Pending
        }
    }
}
