//! Movement plans: timed transitions of one element between two transforms.
//!
//! Plans are values. Every "mutation" below returns a new plan so a plan held
//! by the active set is only ever replaced whole.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::element::ElementTransform;
use crate::interp::interpolate_transform;

/// Tolerance used when deciding whether a plan moves anything.
pub const NOOP_TOLERANCE: f32 = 1e-4;

/// Floor for timing denominators.
pub const TIME_EPSILON: f32 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementPlan<K> {
    pub element: K,
    pub start_time: f32,
    pub end_time: f32,
    pub start: ElementTransform,
    pub end: ElementTransform,
    /// Full turns about Z added on top of the start→end rotation.
    pub extra_rotation_windings: i32,
    pub easing: Easing,
    pub is_started: bool,
    pub is_ended: bool,
}

/// Snapshot `live` as the start state and build a plan towards `target`.
///
/// `end_time` is raised to `start_time` if it lies before it.
pub fn create_plan<K>(
    element: K,
    live: ElementTransform,
    target: ElementTransform,
    start_time: f32,
    end_time: f32,
    extra_rotation_windings: i32,
    easing: Easing,
) -> MovementPlan<K> {
    if end_time < start_time {
        warn!("create_plan: end time {end_time} precedes start time {start_time}; clamped");
    }
    MovementPlan {
        element,
        start_time,
        end_time: end_time.max(start_time),
        start: live,
        end: target,
        extra_rotation_windings,
        easing,
        is_started: false,
        is_ended: false,
    }
}

impl<K: Copy> MovementPlan<K> {
    /// Plan that holds `transform` in place for zero time.
    pub fn hold(element: K, transform: ElementTransform) -> Self {
        create_plan(element, transform, transform, 0.0, 0.0, 0, Easing::Linear)
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.end_time - self.start_time
    }

    /// Straight-line distance between start and end positions.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.start.position.distance(self.end.position)
    }

    /// True when playing the plan would not change the element.
    pub fn is_noop(&self) -> bool {
        self.extra_rotation_windings == 0 && self.start.approx_eq(&self.end, NOOP_TOLERANCE)
    }

    pub fn with_window(&self, start_time: f32, end_time: f32) -> Self {
        Self {
            start_time,
            end_time: end_time.max(start_time),
            ..*self
        }
    }

    /// Shift the whole window by `offset`.
    pub fn delayed(&self, offset: f32) -> Self {
        self.with_window(self.start_time + offset, self.end_time + offset)
    }

    pub fn with_end(&self, end: ElementTransform) -> Self {
        Self { end, ..*self }
    }

    pub fn with_easing(&self, easing: Easing) -> Self {
        Self { easing, ..*self }
    }

    pub fn started(&self) -> Self {
        Self {
            is_started: true,
            ..*self
        }
    }

    pub fn ended(&self) -> Self {
        Self {
            is_ended: true,
            ..*self
        }
    }

    /// Linear progress at `elapsed`, clamped to [0,1]. Zero-length plans jump to 1.
    pub fn progress(&self, elapsed: f32) -> f32 {
        let duration = self.duration();
        if duration <= TIME_EPSILON {
            return if elapsed >= self.start_time { 1.0 } else { 0.0 };
        }
        ((elapsed - self.start_time) / duration).clamp(0.0, 1.0)
    }

    /// Transform at `elapsed` with the plan's easing applied.
    pub fn sample(&self, elapsed: f32) -> ElementTransform {
        let eased = self.easing.ease(self.progress(elapsed));
        interpolate_transform(&self.start, &self.end, eased, self.extra_rotation_windings)
    }
}
