//! Bevy adapter for `vizij-arrangement-core`.
//!
//! The core owns placement and movement timing; this crate feeds it Bevy's
//! frame clock and lets it read and write `Transform` components.

use bevy::prelude::*;
use vizij_arrangement_core::{ArrangeEvent, Arrangement, LayoutConfig};

pub mod components;
pub mod systems;

pub use components::{ArrangeMetrics, ArrangementRoot};
pub use systems::{tick_arrangement_system, BevyHost};

/// The arrangement driven by [`tick_arrangement_system`]. Elements are entities.
#[derive(Resource)]
pub struct ArrangementResource(pub Arrangement<Entity>);

/// Core notifications re-emitted as Bevy events after each tick.
#[derive(Event, Clone, Debug, PartialEq)]
pub struct ArrangeEventMessage(pub ArrangeEvent<Entity>);

#[derive(Default)]
pub struct VizijArrangementPlugin {
    pub config: LayoutConfig,
}

impl Plugin for VizijArrangementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ArrangeEventMessage>()
            .add_systems(Update, tick_arrangement_system);

        match Arrangement::new(self.config.clone()) {
            Ok(arrangement) => {
                app.insert_resource(ArrangementResource(arrangement));
            }
            Err(err) => {
                log::error!("VizijArrangementPlugin: invalid layout config: {err}");
            }
        }
    }
}
