//! Output contracts from the arrangement tick.
//!
//! Notifications also reach the host synchronously through
//! [`crate::ElementHost`]; the report carries the same events so adapters can
//! forward them after the tick.

use serde::{Deserialize, Serialize};

use crate::ids::RunId;

/// Discrete signals emitted while driving movement plans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ArrangeEvent<K> {
    ArrangeStarted { element: K, elapsed: f32 },
    ArrangeEnded { element: K, elapsed: f32 },
    RunFinished { run: RunId },
    RunStopped { run: RunId },
}

/// Result of one [`crate::Arrangement::tick`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickReport<K> {
    #[serde(default)]
    pub events: Vec<ArrangeEvent<K>>,
    /// Plans still active after this tick.
    pub remaining: usize,
    /// Elapsed run time after this tick (zero once the run finishes).
    pub elapsed: f32,
}

impl<K> Default for TickReport<K> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            remaining: 0,
            elapsed: 0.0,
        }
    }
}

impl<K> TickReport<K> {
    #[inline]
    pub fn push_event(&mut self, event: ArrangeEvent<K>) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
