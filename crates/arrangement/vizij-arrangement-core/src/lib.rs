//! Vizij Arrangement Core (engine-agnostic)
//!
//! Lays out an ordered set of elements (linear run or along a spline), plans
//! timed movements towards those placements under several timing policies,
//! and drives the movements from an external per-frame tick. Hosts supply
//! element transforms through [`ElementHost`]; cooperative [`routine`]s let
//! callers sequence and await runs without threads.

pub mod arrangement;
pub mod config;
pub mod easing;
pub mod element;
pub mod error;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod placement;
pub mod plan;
pub mod routine;
pub mod run;
pub mod scheduler;

pub use glam;

// Re-exports for consumers (adapters)
pub use arrangement::{Arrangement, ArrangementSnapshot, MoveStyle};
pub use config::{Alignment, LayoutConfig};
pub use easing::{ease, Easing};
pub use element::{ElementHost, ElementMetrics, ElementTransform};
pub use error::{ArrangementError, Result};
pub use ids::RunId;
pub use outputs::{ArrangeEvent, TickReport};
pub use placement::{
    calculate, LinearPlacement, Placement, PlacementStrategy, Pose, SplineConfig,
    SplinePlacement, SplineSpacing, Z_OFFSET,
};
pub use plan::{create_plan, MovementPlan};
pub use routine::{
    ConcurrentRoutine, Routine, RoutineState, Step, Task, TickClock, WaitGroup,
};
pub use run::RunHandle;
pub use scheduler::{
    ease_timings, muss, schedule_accelerating, schedule_serial, schedule_simultaneous,
    AcceleratingCfg, MussCfg, SerialCfg, SimultaneousCfg,
};
