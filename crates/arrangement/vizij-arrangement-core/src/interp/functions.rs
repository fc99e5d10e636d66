//! Interpolation helpers:
//! - rotation_with_windings (slerp plus extra Z turns)
//! - interpolate_transform (full TRS blend at eased progress)

use std::f32::consts::TAU;

use glam::Quat;

use crate::element::ElementTransform;

/// Spherical interpolation from `a` to `b` with `windings` full turns about Z
/// distributed over `t`. At `t == 1` the extra turns cancel out and the result
/// equals `b` up to sign.
#[inline]
pub fn rotation_with_windings(a: Quat, b: Quat, t: f32, windings: i32) -> Quat {
    let base = a.slerp(b, t);
    if windings == 0 {
        return base;
    }
    let spin = Quat::from_rotation_z(TAU * windings as f32 * t);
    (spin * base).normalize()
}

/// Blend two transforms at eased progress `t`.
pub fn interpolate_transform(
    start: &ElementTransform,
    end: &ElementTransform,
    t: f32,
    windings: i32,
) -> ElementTransform {
    ElementTransform {
        position: start.position.lerp(end.position, t),
        rotation: rotation_with_windings(start.rotation, end.rotation, t, windings),
        scale: start.scale.lerp(end.scale, t),
    }
}
