//! Data model: detail sequences, masks, flags, and the touch/gesture event types that cross the
//! recorder/queue/matcher boundaries.

use crate::geometry::{GesturePoint, GestureType, TransformMask};

/// A bounded ordered sequence of direction tags describing a gesture's shape.
///
/// The bound itself (`MAX_GESTURE_DETAIL_SIZE`) is enforced by the recorder, not this type;
/// `GestureDetail` is a thin, comparable wrapper so two details can be compared for equality by
/// value, as the classifier and matcher both require.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GestureDetail(pub Vec<GestureType>);

impl GestureDetail {
    pub fn new() -> Self {
        GestureDetail(Vec::new())
    }

    pub fn single(t: GestureType) -> Self {
        GestureDetail(vec![t])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, t: GestureType) {
        self.0.push(t);
    }

    pub fn as_slice(&self) -> &[GestureType] {
        &self.0
    }

    /// Applies `reflection(mask, _)` pointwise, returning a new detail.
    pub fn transformed(&self, mask: TransformMask) -> GestureDetail {
        GestureDetail(crate::geometry::transform_detail(&self.0, mask))
    }
}

impl From<Vec<GestureType>> for GestureDetail {
    fn from(v: Vec<GestureType>) -> Self {
        GestureDetail(v)
    }
}

/// Bit positions for `GestureMask`. `GestureEnd` marks the group-terminal event; the rest mark
/// per-touch lifecycle transitions.
pub mod mask_bits {
    pub const GESTURE_END: u8 = 1 << 0;
    pub const TOUCH_END: u8 = 1 << 1;
    pub const TOUCH_START: u8 = 1 << 2;
    pub const TOUCH_HOLD: u8 = 1 << 3;
    pub const TOUCH_MOTION: u8 = 1 << 4;
    pub const TOUCH_CANCEL: u8 = 1 << 5;
}

/// A bitset over `{GestureEnd, TouchEnd, TouchStart, TouchHold, TouchMotion, TouchCancel}`, used
/// both to stamp events and to filter deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct GestureMask(pub u8);

impl GestureMask {
    pub const NONE: GestureMask = GestureMask(0);
    pub const GESTURE_END: GestureMask = GestureMask(mask_bits::GESTURE_END);
    pub const TOUCH_END: GestureMask = GestureMask(mask_bits::TOUCH_END);
    pub const TOUCH_START: GestureMask = GestureMask(mask_bits::TOUCH_START);
    pub const TOUCH_HOLD: GestureMask = GestureMask(mask_bits::TOUCH_HOLD);
    pub const TOUCH_MOTION: GestureMask = GestureMask(mask_bits::TOUCH_MOTION);
    pub const TOUCH_CANCEL: GestureMask = GestureMask(mask_bits::TOUCH_CANCEL);

    /// Every bit set; the default `listenForGestureEvents` mask.
    pub const ALL: GestureMask = GestureMask(
        mask_bits::GESTURE_END
            | mask_bits::TOUCH_END
            | mask_bits::TOUCH_START
            | mask_bits::TOUCH_HOLD
            | mask_bits::TOUCH_MOTION
            | mask_bits::TOUCH_CANCEL,
    );

    pub fn contains(self, other: GestureMask) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_gesture_end(self) -> bool {
        self.0 & mask_bits::GESTURE_END != 0
    }

    /// A human-readable name, matching `getGestureMaskString`'s single-bit cases; falls back to
    /// `"UNKNOWN"` for combined or empty masks.
    pub fn name(self) -> &'static str {
        match self.0 {
            mask_bits::GESTURE_END => "GestureEndMask",
            mask_bits::TOUCH_END => "TouchEndMask",
            mask_bits::TOUCH_START => "TouchStartMask",
            mask_bits::TOUCH_HOLD => "TouchHoldMask",
            mask_bits::TOUCH_MOTION => "TouchMotionMask",
            mask_bits::TOUCH_CANCEL => "TouchCancelMask",
            _ => "UNKNOWN",
        }
    }
}

impl std::ops::BitOr for GestureMask {
    type Output = GestureMask;
    fn bitor(self, rhs: GestureMask) -> GestureMask {
        GestureMask(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for GestureMask {
    type Output = GestureMask;
    fn bitand(self, rhs: GestureMask) -> GestureMask {
        GestureMask(self.0 & rhs.0)
    }
}

/// Per-event and per-binding-range fields. `count` tracks how many duplicate gesture-end events
/// have been merged into this one (starts at 1).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureFlags {
    pub total_sq_distance: f64,
    pub avg_sq_displacement: f64,
    pub avg_sq_distance: f64,
    pub duration_ms: u32,
    pub fingers: u32,
    pub reflection_mask: Option<TransformMask>,
    pub mask: GestureMask,
    pub count: u32,
}

impl GestureFlags {
    pub fn new(mask: GestureMask, fingers: u32) -> Self {
        GestureFlags {
            mask,
            fingers,
            count: 1,
            ..Default::default()
        }
    }
}

/// A single raw touch sample from the input boundary. `(device_id, seat)` is the unique key of
/// one finger track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchEvent {
    pub device_id: u32,
    pub seat: i32,
    pub point: GesturePoint,
    pub percent_point: GesturePoint,
    pub time_ms: u32,
}

impl TouchEvent {
    pub fn new(device_id: u32, seat: i32, point: GesturePoint, time_ms: u32) -> Self {
        TouchEvent {
            device_id,
            seat,
            point,
            percent_point: point,
            time_ms,
        }
    }

    pub fn with_percent_point(mut self, percent_point: GesturePoint) -> Self {
        self.percent_point = percent_point;
        self
    }
}

/// A gesture event produced by the recorder and carried through the queue to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    /// Monotonic, strictly increasing across all emitted events; the canonical delivery order.
    pub seq: u64,
    pub group_id: u64,
    pub detail: GestureDetail,
    pub flags: GestureFlags,
    pub time_ms: u32,
    pub end_point: GesturePoint,
    pub end_percent_point: GesturePoint,
}

impl GestureEvent {
    pub fn new(seq: u64, group_id: u64, mask: GestureMask, fingers: u32, time_ms: u32) -> Self {
        GestureEvent {
            seq,
            group_id,
            detail: GestureDetail::new(),
            flags: GestureFlags::new(mask, fingers),
            time_ms,
            end_point: GesturePoint::default(),
            end_percent_point: GesturePoint::default(),
        }
    }

    pub fn with_detail(mut self, detail: GestureDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_end_point(mut self, end_point: GesturePoint, end_percent_point: GesturePoint) -> Self {
        self.end_point = end_point;
        self.end_percent_point = end_percent_point;
        self
    }

    pub fn with_flags(mut self, flags: GestureFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The region id embedded in the high 32 bits of `group_id`.
    pub fn region_id(&self) -> u32 {
        (self.group_id >> 32) as u32
    }

    /// The device id embedded in the low 32 bits of `group_id`.
    pub fn device_id(&self) -> u32 {
        self.group_id as u32
    }

    /// Two events are mergeable duplicates iff they share group, detail, finger count, and mask
    /// (the merge rule in §4.3 of the design does not consider `seq` or exact timing here; the
    /// queue applies the time window separately).
    pub fn is_duplicate_of(&self, other: &GestureEvent) -> bool {
        self.group_id == other.group_id
            && self.detail == other.detail
            && self.flags.fingers == other.flags.fingers
            && self.flags.mask == other.flags.mask
    }

    /// Human-readable rendering: `"<MaskName>: Fingers <n> duration <ms>ms <dir> <dir> ..."`.
    pub fn dump(&self) -> String {
        let mut s = format!(
            "{}: Fingers {} duration {}ms",
            self.flags.mask.name(),
            self.flags.fingers,
            self.flags.duration_ms
        );
        for t in self.detail.as_slice() {
            s.push(' ');
            s.push_str(gesture_type_name(*t));
        }
        s
    }
}

/// Name used by `GestureEvent::dump`, matching `getGestureTypeString`.
pub fn gesture_type_name(t: GestureType) -> &'static str {
    match t {
        GestureType::None => "NONE",
        GestureType::NorthWest => "NORTH_WEST",
        GestureType::West => "WEST",
        GestureType::SouthWest => "SOUTH_WEST",
        GestureType::North => "NORTH",
        GestureType::South => "SOUTH",
        GestureType::NorthEast => "NORTH_EAST",
        GestureType::East => "EAST",
        GestureType::SouthEast => "SOUTH_EAST",
        GestureType::Pinch => "PINCH",
        GestureType::PinchOut => "PINCH_OUT",
        GestureType::Tap => "TAP",
        GestureType::TooLarge => "TOO_LARGE",
        GestureType::Unknown => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_name_single_bit() {
        assert_eq!(GestureMask::GESTURE_END.name(), "GestureEndMask");
        assert_eq!(GestureMask::TOUCH_MOTION.name(), "TouchMotionMask");
    }

    #[test]
    fn mask_name_unknown_for_combined() {
        let combined = GestureMask::TOUCH_START | GestureMask::TOUCH_END;
        assert_eq!(combined.name(), "UNKNOWN");
    }

    #[test]
    fn mask_contains() {
        let all = GestureMask::ALL;
        assert!(all.contains(GestureMask::TOUCH_CANCEL));
        assert!(!GestureMask::TOUCH_START.contains(GestureMask::TOUCH_END));
    }

    #[test]
    fn group_id_splits_region_and_device() {
        let group_id = (7u64 << 32) | 42u64;
        let event = GestureEvent::new(1, group_id, GestureMask::GESTURE_END, 1, 0);
        assert_eq!(event.region_id(), 7);
        assert_eq!(event.device_id(), 42);
    }

    #[test]
    fn dump_format() {
        let mut event = GestureEvent::new(1, 0, GestureMask::TOUCH_END, 1, 500);
        event.flags.duration_ms = 500;
        event.detail = GestureDetail::single(GestureType::Tap);
        assert_eq!(event.dump(), "TouchEndMask: Fingers 1 duration 500ms TAP");
    }

    #[test]
    fn duplicate_detection_ignores_seq_and_time() {
        let a = GestureEvent::new(1, 5, GestureMask::GESTURE_END, 2, 100)
            .with_detail(GestureDetail::single(GestureType::East));
        let b = GestureEvent::new(2, 5, GestureMask::GESTURE_END, 2, 150)
            .with_detail(GestureDetail::single(GestureType::East));
        assert!(a.is_duplicate_of(&b));
    }
}
