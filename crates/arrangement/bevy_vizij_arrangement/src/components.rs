use bevy::prelude::*;
use vizij_arrangement_core::ElementMetrics;

/// Marker for the entity arranged elements are parented under when they join.
#[derive(Component, Debug, Default)]
pub struct ArrangementRoot;

/// Layout metrics of an arranged entity. Entities without it use the defaults.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct ArrangeMetrics(pub ElementMetrics);
