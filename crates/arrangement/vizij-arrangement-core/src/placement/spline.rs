//! Curve-following strategy.
//!
//! Elements are distributed along a Catmull-Rom curve by arc length and turned
//! to follow its tangent. Spacing is either even across the whole curve or the
//! layout's preferred spacing, compressed when the run would not fit.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::{PlacementStrategy, Pose, Z_OFFSET};
use crate::config::{Alignment, LayoutConfig};
use crate::element::ElementMetrics;
use crate::error::{ArrangementError, Result};

const MIN_LENGTH: f32 = 1e-6;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplineSpacing {
    /// Spread elements over the full curve regardless of their size.
    #[default]
    Even,
    /// Use element footprints and the preferred spacing ratio.
    Preferred,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineConfig {
    /// Control points the curve passes through (at least two).
    pub points: Vec<Vec3>,
    /// Arc-length table resolution per curve segment.
    pub samples_per_segment: usize,
    pub spacing: SplineSpacing,
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            samples_per_segment: 32,
            spacing: SplineSpacing::Even,
        }
    }
}

/// Uniform Catmull-Rom curve with a cumulative arc-length table.
#[derive(Clone, Debug)]
pub struct CatmullRom {
    points: Vec<Vec3>,
    /// (parameter, cumulative length) pairs, parameter in [0,1].
    table: Vec<(f32, f32)>,
}

impl CatmullRom {
    pub fn new(points: Vec<Vec3>, samples_per_segment: usize) -> Result<Self> {
        if points.len() < 2 {
            return Err(ArrangementError::InvalidSpline {
                reason: format!("need at least 2 control points, got {}", points.len()),
            });
        }
        let mut curve = Self {
            points,
            table: Vec::new(),
        };
        let samples = curve.segments() * samples_per_segment.max(1);
        let mut table = Vec::with_capacity(samples + 1);
        let mut prev = curve.point(0.0);
        let mut length = 0.0f32;
        table.push((0.0, 0.0));
        for i in 1..=samples {
            let u = i as f32 / samples as f32;
            let p = curve.point(u);
            length += p.distance(prev);
            table.push((u, length));
            prev = p;
        }
        if length < MIN_LENGTH {
            return Err(ArrangementError::InvalidSpline {
                reason: "curve has zero length".into(),
            });
        }
        curve.table = table;
        Ok(curve)
    }

    #[inline]
    fn segments(&self) -> usize {
        self.points.len() - 1
    }

    /// Control points around segment `seg`, clamping at the ends.
    fn segment_points(&self, seg: usize) -> [Vec3; 4] {
        let last = self.points.len() - 1;
        let at = |i: isize| self.points[i.clamp(0, last as isize) as usize];
        let s = seg as isize;
        [at(s - 1), at(s), at(s + 1), at(s + 2)]
    }

    fn locate(&self, u: f32) -> (usize, f32) {
        let scaled = u.clamp(0.0, 1.0) * self.segments() as f32;
        let seg = (scaled.floor() as usize).min(self.segments() - 1);
        (seg, scaled - seg as f32)
    }

    /// Position at global parameter `u` in [0,1].
    pub fn point(&self, u: f32) -> Vec3 {
        let (seg, t) = self.locate(u);
        let [p0, p1, p2, p3] = self.segment_points(seg);
        let t2 = t * t;
        let t3 = t2 * t;
        0.5 * ((2.0 * p1)
            + (p2 - p0) * t
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
            + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
    }

    /// Unnormalized derivative at global parameter `u`.
    pub fn tangent(&self, u: f32) -> Vec3 {
        let (seg, t) = self.locate(u);
        let [p0, p1, p2, p3] = self.segment_points(seg);
        let t2 = t * t;
        0.5 * ((p2 - p0)
            + 2.0 * (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t
            + 3.0 * (3.0 * p1 - p0 - 3.0 * p2 + p3) * t2)
    }

    pub fn length(&self) -> f32 {
        self.table.last().map(|(_, l)| *l).unwrap_or(0.0)
    }

    /// Curve parameter at the given fraction of total arc length.
    pub fn param_at_fraction(&self, fraction: f32) -> f32 {
        let target = fraction.clamp(0.0, 1.0) * self.length();
        let idx = self.table.partition_point(|(_, l)| *l < target);
        if idx == 0 {
            return 0.0;
        }
        if idx >= self.table.len() {
            return 1.0;
        }
        let (u0, l0) = self.table[idx - 1];
        let (u1, l1) = self.table[idx];
        let span = (l1 - l0).max(MIN_LENGTH);
        u0 + (u1 - u0) * ((target - l0) / span)
    }
}

#[derive(Clone, Debug)]
pub struct SplinePlacement {
    curve: CatmullRom,
    spacing: SplineSpacing,
}

impl SplinePlacement {
    pub fn new(cfg: SplineConfig) -> Result<Self> {
        Ok(Self {
            curve: CatmullRom::new(cfg.points, cfg.samples_per_segment)?,
            spacing: cfg.spacing,
        })
    }

    pub fn curve(&self) -> &CatmullRom {
        &self.curve
    }

    fn even_fractions(count: usize, alignment: Alignment) -> Vec<f32> {
        match count {
            0 => Vec::new(),
            1 => vec![match alignment {
                Alignment::Left => 0.0,
                Alignment::Center => 0.5,
                Alignment::Right => 1.0,
            }],
            n => (0..n).map(|i| i as f32 / (n - 1) as f32).collect(),
        }
    }

    fn preferred_fractions(&self, elements: &[ElementMetrics], cfg: &LayoutConfig) -> Vec<f32> {
        let length = self.curve.length();
        let base = cfg.base_element_size.x;
        let sizes: Vec<f32> = elements.iter().map(|e| base * e.size_multiplier).collect();
        let total: f32 = sizes.iter().sum();
        let gaps = elements.len().saturating_sub(1) as f32;
        let mut spacing = cfg.preferred_spacing_ratio * base;
        if gaps > 0.0 && total + spacing * gaps > length {
            spacing = (length - total) / gaps;
        }
        let extent = total + spacing * gaps;
        let offset = match cfg.alignment {
            Alignment::Left => 0.0,
            Alignment::Center => (length - extent) / 2.0,
            Alignment::Right => length - extent,
        };

        let mut cursor = offset;
        elements
            .iter()
            .zip(&sizes)
            .map(|(element, size)| {
                let along = cursor + size * element.pivot.x;
                cursor += size + spacing;
                along / length
            })
            .collect()
    }
}

impl PlacementStrategy for SplinePlacement {
    fn poses(&self, elements: &[ElementMetrics], cfg: &LayoutConfig) -> Vec<Pose> {
        let mut fractions = match self.spacing {
            SplineSpacing::Even => Self::even_fractions(elements.len(), cfg.alignment),
            SplineSpacing::Preferred => self.preferred_fractions(elements, cfg),
        };
        if cfg.inverted {
            for f in &mut fractions {
                *f = 1.0 - *f;
            }
        }

        elements
            .iter()
            .zip(fractions)
            .enumerate()
            .map(|(i, (element, fraction))| {
                let u = self.curve.param_at_fraction(fraction);
                let mut position = self.curve.point(u) + element.arrangement_offset;
                position.z += Z_OFFSET * i as f32;
                let tangent = self.curve.tangent(u);
                let angle = tangent.y.atan2(tangent.x);
                Pose {
                    position,
                    rotation: Quat::from_rotation_z(angle),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(len: f32) -> SplinePlacement {
        SplinePlacement::new(SplineConfig {
            points: vec![Vec3::ZERO, Vec3::new(len, 0.0, 0.0)],
            ..Default::default()
        })
        .expect("valid spline")
    }

    #[test]
    fn rejects_single_point() {
        let err = SplinePlacement::new(SplineConfig {
            points: vec![Vec3::ZERO],
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ArrangementError::InvalidSpline { .. }));
    }

    #[test]
    fn catmull_rom_passes_through_control_points() {
        let pts = vec![
            Vec3::ZERO,
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        let curve = CatmullRom::new(pts.clone(), 16).unwrap();
        assert!(curve.point(0.0).abs_diff_eq(pts[0], 1e-5));
        assert!(curve.point(0.5).abs_diff_eq(pts[1], 1e-5));
        assert!(curve.point(1.0).abs_diff_eq(pts[2], 1e-5));
    }

    #[test]
    fn even_spacing_spans_the_curve() {
        let strategy = straight(3.0);
        let poses = strategy.poses(&[ElementMetrics::default(); 4], &LayoutConfig::default());
        let xs: Vec<f32> = poses.iter().map(|p| p.position.x).collect();
        for (x, expected) in xs.iter().zip([0.0, 1.0, 2.0, 3.0]) {
            assert!((x - expected).abs() < 1e-2, "{xs:?}");
        }
    }

    #[test]
    fn rotation_follows_tangent() {
        let strategy = SplinePlacement::new(SplineConfig {
            points: vec![Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)],
            ..Default::default()
        })
        .unwrap();
        let poses = strategy.poses(&[ElementMetrics::default()], &LayoutConfig::default());
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(poses[0].rotation.dot(expected).abs() > 1.0 - 1e-4);
    }

    #[test]
    fn preferred_spacing_is_centered() {
        let strategy = SplinePlacement::new(SplineConfig {
            points: vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
            spacing: SplineSpacing::Preferred,
            ..Default::default()
        })
        .unwrap();
        let cfg = LayoutConfig {
            preferred_spacing_ratio: 1.0,
            ..Default::default()
        };
        // two unit elements, one unit gap: run of 3 centered on a 10 long curve
        let poses = strategy.poses(&[ElementMetrics::default(); 2], &cfg);
        assert!((poses[0].position.x - 4.0).abs() < 1e-2);
        assert!((poses[1].position.x - 6.0).abs() < 1e-2);
    }

    #[test]
    fn preferred_spacing_compresses_to_fit() {
        let strategy = SplinePlacement::new(SplineConfig {
            points: vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)],
            spacing: SplineSpacing::Preferred,
            ..Default::default()
        })
        .unwrap();
        let cfg = LayoutConfig {
            alignment: Alignment::Left,
            preferred_spacing_ratio: 2.0,
            ..Default::default()
        };
        let poses = strategy.poses(&[ElementMetrics::default(); 3], &cfg);
        // 3 units of elements on 4 units of curve leaves 0.5 per gap
        assert!((poses[0].position.x - 0.5).abs() < 1e-2);
        assert!((poses[2].position.x - 3.5).abs() < 1e-2);
    }
}
