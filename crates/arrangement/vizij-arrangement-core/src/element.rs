//! Element capability surface.
//!
//! Elements live outside the core. The arrangement refers to them by key and
//! reaches their transforms and layout metrics through an [`ElementHost`]
//! passed into each call that needs them.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Local transform of an element in the arrangement's coordinate space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for ElementTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ElementTransform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Component-wise comparison within `eps`. Rotations compare by angle so
    /// `q` and `-q` are treated as equal.
    pub fn approx_eq(&self, other: &Self, eps: f32) -> bool {
        self.position.abs_diff_eq(other.position, eps)
            && self.scale.abs_diff_eq(other.scale, eps)
            && self.rotation.dot(other.rotation).abs() >= 1.0 - eps
    }
}

/// Read-only layout metrics of an element.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementMetrics {
    /// Multiplier applied to the arrangement's base element size.
    pub size_multiplier: f32,
    /// Anchor inside the element footprint, (0,0) bottom-left to (1,1) top-right.
    pub pivot: Vec2,
    /// Extra offset added after placement.
    pub arrangement_offset: Vec3,
}

impl Default for ElementMetrics {
    fn default() -> Self {
        Self {
            size_multiplier: 1.0,
            pivot: Vec2::splat(0.5),
            arrangement_offset: Vec3::ZERO,
        }
    }
}

/// Host-side access to elements keyed by `K`.
///
/// `attach`/`detach` are called when membership changes so the host can move
/// the element under (or out of) its managed container. `arrange_started` and
/// `arrange_ended` fire synchronously from [`crate::Arrangement::tick`] in plan
/// order.
pub trait ElementHost<K> {
    fn transform(&self, key: K) -> Option<ElementTransform>;
    fn set_transform(&mut self, key: K, transform: ElementTransform);
    fn metrics(&self, key: K) -> ElementMetrics;

    fn attach(&mut self, _key: K) {}
    fn detach(&mut self, _key: K) {}
    fn arrange_started(&mut self, _key: K) {}
    fn arrange_ended(&mut self, _key: K) {}
}
