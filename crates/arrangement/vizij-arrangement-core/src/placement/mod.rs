//! Placement calculation.
//!
//! A strategy maps ordered element metrics plus a [`LayoutConfig`] to one pose
//! per element. Output order always matches input order and identical inputs
//! produce bit-identical outputs.

pub mod linear;
pub mod spline;

use std::fmt;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::element::{ElementMetrics, ElementTransform};

pub use linear::LinearPlacement;
pub use spline::{CatmullRom, SplineConfig, SplinePlacement, SplineSpacing};

/// Depth step between consecutive elements. Later elements sit in front.
pub const Z_OFFSET: f32 = 0.01;

/// Position and rotation produced by a strategy for one element.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Target position and rotation for an element under the current configuration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement<K> {
    pub element: K,
    pub position: Vec3,
    pub rotation: Quat,
}

impl<K> Placement<K> {
    /// Target transform keeping the given scale.
    pub fn to_transform(&self, scale: Vec3) -> ElementTransform {
        ElementTransform {
            position: self.position,
            rotation: self.rotation,
            scale,
        }
    }
}

/// Pluggable placement algorithm.
pub trait PlacementStrategy: fmt::Debug + Send + Sync {
    /// One pose per entry of `elements`, in the same order.
    fn poses(&self, elements: &[ElementMetrics], cfg: &LayoutConfig) -> Vec<Pose>;
}

/// Compute placements for keyed elements with the given strategy.
pub fn calculate<K: Copy>(
    strategy: &dyn PlacementStrategy,
    elements: &[(K, ElementMetrics)],
    cfg: &LayoutConfig,
) -> Vec<Placement<K>> {
    let metrics: Vec<ElementMetrics> = elements.iter().map(|(_, m)| *m).collect();
    let poses = strategy.poses(&metrics, cfg);
    elements
        .iter()
        .zip(poses)
        .map(|((key, _), pose)| Placement {
            element: *key,
            position: pose.position,
            rotation: pose.rotation,
        })
        .collect()
}
