//! Interpolation helpers.
//!
//! Position and scale lerp on eased progress; rotation slerps between the
//! endpoints and adds whole turns about Z for multi-spin movements.

pub mod functions;

pub use functions::{interpolate_transform, rotation_with_windings};
