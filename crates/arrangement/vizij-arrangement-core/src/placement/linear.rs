//! Default strategy: elements in a straight run along the base size axes.

use glam::{Quat, Vec2, Vec3};

use super::{PlacementStrategy, Pose, Z_OFFSET};
use crate::config::{Alignment, LayoutConfig};
use crate::element::ElementMetrics;

#[derive(Copy, Clone, Debug, Default)]
pub struct LinearPlacement;

/// Per-axis spacing for `count` elements totalling `total_size`.
///
/// The preferred spacing is clamped so the run never exceeds the configured
/// maximum extent; the clamp may go negative and make elements overlap.
pub fn spacing_for(cfg: &LayoutConfig, total_size: Vec2, count: usize) -> Vec2 {
    if count <= 1 {
        return Vec2::ZERO;
    }
    let gaps = (count - 1) as f32;
    let max_spacing = (cfg.effective_max_size() - total_size) / gaps;
    let preferred = cfg.base_element_size * cfg.preferred_spacing_ratio;
    max_spacing.min(preferred)
}

impl PlacementStrategy for LinearPlacement {
    fn poses(&self, elements: &[ElementMetrics], cfg: &LayoutConfig) -> Vec<Pose> {
        let count = elements.len();
        let base = cfg.base_element_size;
        let weight_sum: f32 = elements.iter().map(|e| e.size_multiplier).sum();
        let total_size = base * weight_sum;
        let spacing = spacing_for(cfg, total_size, count);
        let extent = total_size + spacing * count.saturating_sub(1) as f32;

        let alignment_offset = match cfg.alignment {
            Alignment::Left => Vec2::ZERO,
            Alignment::Center => extent / 2.0,
            Alignment::Right => extent,
        };
        let direction = cfg.direction();
        let pivot_shift = if cfg.inverted { Vec2::ONE } else { Vec2::ZERO };

        let mut weighted_index_sum = 0.0f32;
        let mut poses = Vec::with_capacity(count);
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                weighted_index_sum += elements[i - 1].size_multiplier;
            }
            let mut start = base * weighted_index_sum + spacing * i as f32 - alignment_offset;
            if i % 2 == 1 {
                start += cfg.odd_element_stagger;
            }
            start *= direction;

            let footprint = base * element.size_multiplier;
            let anchor = start + footprint * (element.pivot - pivot_shift);
            let position =
                Vec3::new(anchor.x, anchor.y, Z_OFFSET * i as f32) + element.arrangement_offset;
            poses.push(Pose {
                position,
                rotation: Quat::IDENTITY,
            });
        }
        poses
    }
}
