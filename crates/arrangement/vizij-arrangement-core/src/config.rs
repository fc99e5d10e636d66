//! Layout configuration read by the placement strategies.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ArrangementError, Result};

/// Horizontal anchoring of the laid-out run relative to the arrangement origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Configuration for a single arrangement.
///
/// Strategies read this fresh on every recompute; the arrangement never caches
/// derived spacing between calls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub alignment: Alignment,
    /// Lay elements out in the negative direction on both axes.
    pub inverted: bool,
    /// Maximum extent per axis. Zero means unbounded on that axis.
    pub max_size: Vec2,
    /// Preferred gap between elements as a fraction of `base_element_size`.
    pub preferred_spacing_ratio: f32,
    /// Footprint of an element with a size multiplier of 1.
    pub base_element_size: Vec2,
    /// Offset added to every odd-indexed element.
    pub odd_element_stagger: Vec2,
    /// Snap depth to the target as soon as a movement starts instead of interpolating it.
    pub update_z_instantly: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            alignment: Alignment::Center,
            inverted: false,
            max_size: Vec2::ZERO,
            preferred_spacing_ratio: 0.0,
            base_element_size: Vec2::ONE,
            odd_element_stagger: Vec2::ZERO,
            update_z_instantly: false,
        }
    }
}

impl LayoutConfig {
    /// Reject configurations no placement can be computed from.
    pub fn validate(&self) -> Result<()> {
        let size = self.base_element_size;
        if size.x < 0.0 || size.y < 0.0 {
            return Err(ArrangementError::NegativeElementSize {
                x: size.x,
                y: size.y,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON layout description.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: LayoutConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Per-axis extent limit with unbounded axes mapped to infinity.
    #[inline]
    pub fn effective_max_size(&self) -> Vec2 {
        let axis = |v: f32| if v == 0.0 { f32::INFINITY } else { v };
        Vec2::new(axis(self.max_size.x), axis(self.max_size.y))
    }

    /// Sign applied to element offsets.
    #[inline]
    pub fn direction(&self) -> f32 {
        if self.inverted {
            -1.0
        } else {
            1.0
        }
    }
}
