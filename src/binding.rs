//! Binding matcher (§4.4): decides whether a produced [`GestureEvent`] satisfies a
//! user-registered pattern.

use crate::geometry::TransformMask;
use crate::model::{GestureDetail, GestureEvent, GestureMask};

/// An inclusive `[min, max]` range over a flag field. `max == 0` is a wildcard-or-exact
/// shorthand: `min == 0` matches anything, otherwise the field must equal `min` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlagRange {
    pub min: u32,
    pub max: u32,
}

impl FlagRange {
    pub fn exact(value: u32) -> Self {
        FlagRange { min: value, max: value }
    }

    pub fn any() -> Self {
        FlagRange { min: 0, max: 0 }
    }

    pub fn between(min: u32, max: u32) -> Self {
        FlagRange { min, max }
    }

    /// `contains(min, max, value)` from the original source: `max == 0` degrades to an
    /// exact-or-wildcard test on `min`; otherwise a normal inclusive range, with `min == 0`
    /// widened to "no lower bound".
    pub fn contains(self, value: u32) -> bool {
        if self.max == 0 {
            self.min == 0 || self.min == value
        } else {
            (self.min == 0 || self.min <= value) && value <= self.max
        }
    }
}

/// A registered pattern matched against completed [`GestureEvent`]s.
///
/// `region_id`/`device_id` of `0` are wildcards. An empty `detail` is a wildcard on shape. All
/// other fields use [`FlagRange::contains`] semantics, except `mask` (subset test) and
/// `reflection_mask` (exact equality).
#[derive(Debug, Clone, Default)]
pub struct GestureBinding {
    pub region_id: u32,
    pub device_id: u32,
    pub detail: GestureDetail,
    pub mask: GestureMask,
    pub reflection_mask: Option<TransformMask>,
    pub avg_sq_distance: FlagRange,
    pub duration_ms: FlagRange,
    pub fingers: FlagRange,
    pub total_sq_distance: FlagRange,
}

impl GestureBinding {
    pub fn new() -> Self {
        GestureBinding::default()
    }

    /// `matchesGestureFlags` + `matchesGestureEvent` combined: region/device filters, the four
    /// range fields, the mask subset test (`mask == 0` in the original widens to `GestureEndMask`;
    /// here `GestureMask::NONE` widens to `GestureMask::GESTURE_END`), exact `reflection_mask`
    /// equality, and detail equality (empty `detail` is a wildcard).
    pub fn matches(&self, event: &GestureEvent) -> bool {
        if self.region_id != 0 && self.region_id != event.region_id() {
            return false;
        }
        if self.device_id != 0 && self.device_id != event.device_id() {
            return false;
        }
        let flags = &event.flags;
        if !self.avg_sq_distance.contains(flags.avg_sq_distance as u32) {
            return false;
        }
        if !self.duration_ms.contains(flags.duration_ms) {
            return false;
        }
        if !self.fingers.contains(flags.fingers) {
            return false;
        }
        if !self.total_sq_distance.contains(flags.total_sq_distance as u32) {
            return false;
        }
        let effective_mask = if self.mask == GestureMask::NONE {
            GestureMask::GESTURE_END
        } else {
            self.mask
        };
        if effective_mask & flags.mask != flags.mask {
            return false;
        }
        if self.reflection_mask != flags.reflection_mask {
            return false;
        }
        if !self.detail.is_empty() && self.detail != event.detail {
            return false;
        }
        true
    }
}
