//! Multi-touch gesture recognition engine.
//!
//! Touch samples flow: recorder (per-finger polyline reduction, multi-finger group fusion,
//! group-terminal classification) → event queue (dual-lane buffering, merge-coalescing,
//! reflection fan-out) → binding matcher.

pub mod binding;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod model;
pub mod queue;
pub mod recorder;

pub use binding::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use geometry::*;
pub use model::*;
pub use queue::*;
pub use recorder::{compute_group_id, compute_touch_id, GestureRecorder};
