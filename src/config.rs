//! Tunable constants as a configuration surface, replacing the original source's compile-time
//! constants and weak-linkage override hook.

use std::sync::Arc;

use crate::geometry::GesturePoint;

/// Default squared-pixel-distance below which a new sample is dropped as coincident.
pub const DEFAULT_THRESHOLD_SQ: i64 = 256;
/// Default percent-difference threshold separating pinch/pinch-out from "no pinch".
pub const DEFAULT_PINCH_THRESHOLD_PERCENT: f64 = 0.4;
/// Default cap on a single finger's directional polyline.
pub const DEFAULT_MAX_GESTURE_DETAIL_SIZE: usize = 128;
/// Default merge window, in milliseconds, within which duplicate gesture-end events coalesce.
pub const DEFAULT_MERGE_DELAY_MS: u32 = 200;
/// Default per-lane ring buffer capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// A function mapping `(device_id, starting_point)` to the 32 high bits of a `GestureGroupID`,
/// partitioning gestures into independent regions. Defaults to `0` (single universe).
pub type RegionIdFn = Arc<dyn Fn(u32, GesturePoint) -> u32 + Send + Sync>;

/// Tunables for a [`crate::engine::GestureEngine`].
#[derive(Clone)]
pub struct GestureEngineConfig {
    pub threshold_sq: i64,
    pub pinch_threshold_percent: f64,
    pub max_gesture_detail_size: usize,
    pub merge_delay_ms: u32,
    pub queue_capacity: usize,
    pub region_id_fn: RegionIdFn,
}

impl std::fmt::Debug for GestureEngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureEngineConfig")
            .field("threshold_sq", &self.threshold_sq)
            .field("pinch_threshold_percent", &self.pinch_threshold_percent)
            .field("max_gesture_detail_size", &self.max_gesture_detail_size)
            .field("merge_delay_ms", &self.merge_delay_ms)
            .field("queue_capacity", &self.queue_capacity)
            .field("region_id_fn", &"<fn>")
            .finish()
    }
}

impl Default for GestureEngineConfig {
    fn default() -> Self {
        GestureEngineConfig {
            threshold_sq: DEFAULT_THRESHOLD_SQ,
            pinch_threshold_percent: DEFAULT_PINCH_THRESHOLD_PERCENT,
            max_gesture_detail_size: DEFAULT_MAX_GESTURE_DETAIL_SIZE,
            merge_delay_ms: DEFAULT_MERGE_DELAY_MS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            region_id_fn: Arc::new(|_device_id, _starting_point| 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_constants() {
        let cfg = GestureEngineConfig::default();
        assert_eq!(cfg.threshold_sq, 256);
        assert_eq!(cfg.pinch_threshold_percent, 0.4);
        assert_eq!(cfg.max_gesture_detail_size, 128);
        assert_eq!(cfg.merge_delay_ms, 200);
        assert_eq!(cfg.queue_capacity, 1024);
        assert_eq!((cfg.region_id_fn)(5, GesturePoint::new(1, 1)), 0);
    }

    #[test]
    fn region_id_fn_is_overridable() {
        let mut cfg = GestureEngineConfig::default();
        cfg.region_id_fn = Arc::new(|device_id, _| device_id * 10);
        assert_eq!((cfg.region_id_fn)(3, GesturePoint::new(0, 0)), 30);
    }
}
