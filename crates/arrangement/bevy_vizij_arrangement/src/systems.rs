use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use vizij_arrangement_core::glam;
use vizij_arrangement_core::{ElementHost, ElementMetrics, ElementTransform};

use crate::components::{ArrangeMetrics, ArrangementRoot};
use crate::{ArrangeEventMessage, ArrangementResource};

/// `ElementHost` over the ECS: element keys are entities, transforms are their
/// local `Transform`.
#[derive(SystemParam)]
pub struct BevyHost<'w, 's> {
    transforms: Query<'w, 's, &'static mut Transform>,
    metrics: Query<'w, 's, &'static ArrangeMetrics>,
    roots: Query<'w, 's, Entity, With<ArrangementRoot>>,
    commands: Commands<'w, 's>,
}

fn to_core(t: &Transform) -> ElementTransform {
    ElementTransform {
        position: glam::Vec3::from_array(t.translation.to_array()),
        rotation: glam::Quat::from_array(t.rotation.to_array()),
        scale: glam::Vec3::from_array(t.scale.to_array()),
    }
}

fn write_back(src: &ElementTransform, dst: &mut Transform) {
    dst.translation = Vec3::from_array(src.position.to_array());
    dst.rotation = Quat::from_array(src.rotation.to_array()).normalize();
    dst.scale = Vec3::from_array(src.scale.to_array());
}

impl ElementHost<Entity> for BevyHost<'_, '_> {
    fn transform(&self, key: Entity) -> Option<ElementTransform> {
        self.transforms.get(key).ok().map(to_core)
    }

    fn set_transform(&mut self, key: Entity, transform: ElementTransform) {
        if let Ok(mut tf) = self.transforms.get_mut(key) {
            write_back(&transform, &mut tf);
        }
    }

    fn metrics(&self, key: Entity) -> ElementMetrics {
        self.metrics.get(key).map(|m| m.0).unwrap_or_default()
    }

    fn attach(&mut self, key: Entity) {
        // Arrangement space is the root's local space.
        match self.roots.get_single() {
            Ok(root) => {
                self.commands.entity(root).add_child(key);
            }
            Err(_) => log::debug!("attach {key:?}: no single ArrangementRoot, left unparented"),
        }
    }

    fn detach(&mut self, key: Entity) {
        if let Some(mut entity) = self.commands.get_entity(key) {
            entity.remove_parent();
        }
    }
}

/// Advance the arrangement by the frame delta and forward its notifications.
pub fn tick_arrangement_system(
    time: Res<Time>,
    arrangement: Option<ResMut<ArrangementResource>>,
    mut host: BevyHost,
    mut events: EventWriter<ArrangeEventMessage>,
) {
    let Some(mut arrangement) = arrangement else {
        return;
    };
    let report = arrangement.0.tick(time.delta_seconds(), &mut host);
    for event in report.events {
        events.send(ArrangeEventMessage(event));
    }
}
