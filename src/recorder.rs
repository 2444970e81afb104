//! Stateful store of currently-active multi-finger gestures.
//!
//! Consumes `start_gesture`/`continue_gesture`/`end_gesture`/`cancel_gesture` calls keyed by
//! `(device_id, seat)`, maintains per-finger polyline state and per-group aggregate counters, and
//! produces [`GestureEvent`]s at touch lifecycle transitions and at group completion.
//!
//! The original source represents groups and fingers as intrusive linked lists for O(1) removal
//! on the hot path; this store is single-threaded (the recorder is never touched by the queue's
//! consumer thread), so it uses owned hash maps keyed by `GestureGroupID`/`TouchID` instead.

use std::collections::HashMap;

use crate::config::GestureEngineConfig;
use crate::error::{GestureError, GestureResult};
use crate::geometry::{get_line_type, mirror_x, mirror_y, opposite, rot90, rot270, GesturePoint, GestureType, TransformMask};
use crate::model::{GestureDetail, GestureEvent, GestureFlags, GestureMask, TouchEvent};

type TouchId = u64;
type GroupId = u64;
type GestureKey = u64;

/// `TouchID = (deviceID << 32) | seat`.
pub fn compute_touch_id(device_id: u32, seat: i32) -> TouchId {
    ((device_id as u64) << 32) | (seat as u32 as u64)
}

/// `GestureGroupID = (regionID << 32) | deviceID`.
pub fn compute_group_id(region_id: u32, device_id: u32) -> GroupId {
    ((region_id as u64) << 32) | (device_id as u64)
}

#[derive(Debug, Clone)]
struct Gesture {
    group_id: GroupId,
    finished: bool,
    info: Vec<GestureType>,
    first_point: GesturePoint,
    first_percent_point: GesturePoint,
    last_point: GesturePoint,
    last_percent_point: GesturePoint,
    last_dir: Option<GestureType>,
    num_points: u32,
    start_time_ms: u32,
    total_sq_distance: f64,
    truncated: bool,
}

impl Gesture {
    fn new(group_id: GroupId, point: GesturePoint, percent_point: GesturePoint, time_ms: u32) -> Self {
        Gesture {
            group_id,
            finished: false,
            info: Vec::new(),
            first_point: point,
            first_percent_point: percent_point,
            last_point: point,
            last_percent_point: percent_point,
            last_dir: None,
            num_points: 1,
            start_time_ms: time_ms,
            total_sq_distance: 0.0,
            truncated: false,
        }
    }
}

#[derive(Debug, Clone)]
struct GestureGroup {
    id: GroupId,
    active_count: u32,
    finished_count: u32,
    #[allow(dead_code)]
    sys_name: String,
    #[allow(dead_code)]
    name: String,
    finger_ids: Vec<GestureKey>,
}

const NAME_LEN_LIMIT: usize = 63;

impl GestureGroup {
    fn new(id: GroupId, sys_name: &str, name: &str) -> Self {
        GestureGroup {
            id,
            active_count: 0,
            finished_count: 0,
            sys_name: sys_name.chars().take(NAME_LEN_LIMIT).collect(),
            name: name.chars().take(NAME_LEN_LIMIT).collect(),
            finger_ids: Vec::new(),
        }
    }

    fn width(&self) -> u32 {
        self.active_count + self.finished_count
    }
}

/// The stateful gesture recorder: one owned context, per §9 of the design ("model as one owned
/// context passed to public entry points").
pub struct GestureRecorder {
    config: GestureEngineConfig,
    groups: HashMap<GroupId, GestureGroup>,
    gestures: HashMap<GestureKey, Gesture>,
    /// The single live (unfinished) gesture for a given touch id, if any. A touch id may have a
    /// *finished* gesture lingering in `gestures` (awaiting its group's terminal classification)
    /// at the same time a new live one exists here after the seat is reused.
    live_by_touch: HashMap<TouchId, GestureKey>,
    next_gesture_key: GestureKey,
    seq_counter: u64,
}

impl GestureRecorder {
    pub fn new(config: GestureEngineConfig) -> Self {
        GestureRecorder {
            config,
            groups: HashMap::new(),
            gestures: HashMap::new(),
            live_by_touch: HashMap::new(),
            next_gesture_key: 0,
            seq_counter: 0,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq_counter += 1;
        self.seq_counter
    }

    pub fn start_gesture(
        &mut self,
        touch: TouchEvent,
        sys_name: &str,
        name: &str,
    ) -> GestureResult<GestureEvent> {
        let touch_id = compute_touch_id(touch.device_id, touch.seat);
        if self.live_by_touch.contains_key(&touch_id) {
            return Err(GestureError::DuplicateTouch {
                device_id: touch.device_id,
                seat: touch.seat,
            });
        }
        let region_id = (self.config.region_id_fn)(touch.device_id, touch.point);
        let group_id = compute_group_id(region_id, touch.device_id);
        let group = self
            .groups
            .entry(group_id)
            .or_insert_with(|| GestureGroup::new(group_id, sys_name, name));

        let key = self.next_gesture_key;
        self.next_gesture_key += 1;
        group.active_count += 1;
        group.finger_ids.push(key);
        let fingers = group.width();

        self.gestures.insert(
            key,
            Gesture::new(group_id, touch.point, touch.percent_point, touch.time_ms),
        );
        self.live_by_touch.insert(touch_id, key);

        tracing::trace!(
            device_id = touch.device_id,
            seat = touch.seat,
            group_id,
            fingers,
            "start_gesture"
        );
        Ok(self.per_finger_event(key, GestureMask::TOUCH_START, fingers, touch.time_ms))
    }

    pub fn continue_gesture(&mut self, touch: TouchEvent) -> Option<GestureEvent> {
        let touch_id = compute_touch_id(touch.device_id, touch.seat);
        let key = match self.live_by_touch.get(&touch_id) {
            Some(&k) => k,
            None => {
                tracing::warn!(
                    device_id = touch.device_id,
                    seat = touch.seat,
                    "continue_gesture for unknown touch, ignoring"
                );
                return None;
            }
        };
        if self.gestures[&key].truncated {
            return None;
        }
        let group_id = self.gestures[&key].group_id;
        let fingers = self.groups[&group_id].width();

        let distance = self.gestures[&key].last_point.distance_squared(touch.point);
        if distance < self.config.threshold_sq {
            return Some(self.per_finger_event(key, GestureMask::TOUCH_HOLD, fingers, touch.time_ms));
        }

        let mut new_point_added = true;
        {
            let gesture = self.gestures.get_mut(&key).unwrap();
            gesture.total_sq_distance += distance as f64;
            let dir = get_line_type(gesture.last_point, touch.point);
            if Some(dir) != gesture.last_dir {
                if gesture.info.len() == self.config.max_gesture_detail_size {
                    gesture.truncated = true;
                    new_point_added = false;
                } else {
                    gesture.info.push(dir);
                    gesture.last_dir = Some(dir);
                }
            }
            if new_point_added {
                gesture.num_points += 1;
                gesture.last_point = touch.point;
                gesture.last_percent_point = touch.percent_point;
            }
        }
        let mask = if new_point_added {
            GestureMask::TOUCH_MOTION
        } else {
            GestureMask::TOUCH_HOLD
        };
        Some(self.per_finger_event(key, mask, fingers, touch.time_ms))
    }

    pub fn cancel_gesture(&mut self, touch: TouchEvent) -> Option<GestureEvent> {
        let touch_id = compute_touch_id(touch.device_id, touch.seat);
        let key = self.live_by_touch.remove(&touch_id)?;
        let group_id = self.gestures[&key].group_id;
        let fingers = self.groups[&group_id].width();
        let event = self.per_finger_event(key, GestureMask::TOUCH_CANCEL, fingers, touch.time_ms);

        if self.groups[&group_id].active_count == 1 {
            self.destroy_group(group_id);
        } else {
            let group = self.groups.get_mut(&group_id).unwrap();
            group.active_count -= 1;
            group.finger_ids.retain(|k| *k != key);
            self.gestures.remove(&key);
        }
        tracing::trace!(device_id = touch.device_id, seat = touch.seat, "cancel_gesture");
        Some(event)
    }

    pub fn end_gesture(&mut self, touch: TouchEvent) -> Vec<GestureEvent> {
        let touch_id = compute_touch_id(touch.device_id, touch.seat);
        let key = match self.live_by_touch.get(&touch_id) {
            Some(&k) => k,
            None => return Vec::new(),
        };
        let group_id = self.gestures[&key].group_id;
        {
            let gesture = self.gestures.get_mut(&key).unwrap();
            if gesture.num_points == 1 && gesture.info.is_empty() {
                gesture.info.push(GestureType::Tap);
            }
        }
        let fingers = self.groups[&group_id].width();
        let mut events = vec![self.per_finger_event(key, GestureMask::TOUCH_END, fingers, touch.time_ms)];

        self.live_by_touch.remove(&touch_id);
        if let Some(g) = self.gestures.get_mut(&key) {
            g.finished = true;
        }
        let active_after = {
            let group = self.groups.get_mut(&group_id).unwrap();
            group.active_count -= 1;
            group.finished_count += 1;
            group.active_count
        };

        tracing::trace!(
            device_id = touch.device_id,
            seat = touch.seat,
            terminal = active_after == 0,
            "end_gesture"
        );
        if active_after == 0 {
            events.push(self.classify_group_terminal(group_id, touch.time_ms));
            self.destroy_group(group_id);
        }
        events
    }

    fn destroy_group(&mut self, group_id: GroupId) {
        if let Some(group) = self.groups.remove(&group_id) {
            for key in group.finger_ids {
                self.gestures.remove(&key);
            }
        }
    }

    /// Per-touch event construction (§4.2.1): `detail` is `[Tap]` whenever the finger has only
    /// ever recorded one point, else the recorded polyline, matching every non-terminal mask.
    fn per_finger_event(
        &mut self,
        key: GestureKey,
        mask: GestureMask,
        fingers: u32,
        time_ms: u32,
    ) -> GestureEvent {
        let (group_id, detail, end_point, end_percent_point, flags) = {
            let gesture = &self.gestures[&key];
            let detail = if gesture.num_points == 1 {
                GestureDetail::single(GestureType::Tap)
            } else {
                GestureDetail::from(gesture.info.clone())
            };
            let mut flags = GestureFlags::new(mask, fingers);
            flags.avg_sq_displacement = gesture.first_point.distance_squared(gesture.last_point) as f64;
            flags.avg_sq_distance = gesture.total_sq_distance;
            flags.total_sq_distance = gesture.total_sq_distance;
            flags.duration_ms = time_ms.saturating_sub(gesture.start_time_ms);
            (gesture.group_id, detail, gesture.last_point, gesture.last_percent_point, flags)
        };
        let seq = self.next_seq();
        GestureEvent::new(seq, group_id, mask, fingers, time_ms)
            .with_detail(detail)
            .with_flags(flags)
            .with_end_point(end_point, end_percent_point)
    }

    /// The group-terminal classifier (§4.2.2): aggregates per-finger flags, then tries reflection
    /// match, then pinch detection, then falls back to `Unknown`.
    fn classify_group_terminal(&mut self, group_id: GroupId, time_ms: u32) -> GestureEvent {
        let fingers_count = self.groups[&group_id].width();
        let pinch_threshold_percent = self.config.pinch_threshold_percent;
        let finger_keys = self.groups[&group_id].finger_ids.clone();

        // Scoped so the borrow of `self.gestures` through `fingers` ends before `self.next_seq()`
        // needs `&mut self` below.
        let (detail, reflection_mask, mut flags) = {
            let fingers: Vec<&Gesture> = finger_keys.iter().map(|k| &self.gestures[k]).collect();

            let mut flags = GestureFlags::new(GestureMask::GESTURE_END, fingers_count);
            let mut min_start = u32::MAX;
            for g in &fingers {
                flags.total_sq_distance += g.total_sq_distance;
                flags.avg_sq_displacement += g.first_point.distance_squared(g.last_point) as f64;
                flags.avg_sq_distance += g.total_sq_distance;
                min_start = min_start.min(g.start_time_ms);
            }
            flags.avg_sq_displacement /= fingers_count as f64;
            flags.avg_sq_distance /= fingers_count as f64;
            flags.duration_ms = time_ms.saturating_sub(min_start);

            let classification = reflection_match(&fingers, fingers_count)
                .or_else(|| pinch_detect(&fingers, fingers_count, pinch_threshold_percent));
            let (detail, reflection_mask) = classification
                .unwrap_or_else(|| (GestureDetail::single(GestureType::Unknown), None));
            (detail, reflection_mask, flags)
        };
        flags.reflection_mask = reflection_mask;

        tracing::debug!(group_id, fingers = fingers_count, ?reflection_mask, "group terminal classified");

        let seq = self.next_seq();
        GestureEvent::new(seq, group_id, GestureMask::GESTURE_END, fingers_count, time_ms)
            .with_detail(detail)
            .with_flags(flags)
    }
}

/// Step 1 of §4.2.2: reflection match. Picks the first (earliest-started) finger's `info` as
/// reference and checks whether every finger's info is either identical or a pointwise transform
/// of it.
fn reflection_match(fingers: &[&Gesture], fingers_count: u32) -> Option<(GestureDetail, Option<TransformMask>)> {
    let reference = &fingers[0].info;
    let n = reference.len();
    if fingers.iter().any(|g| g.info.len() != n) {
        return None;
    }

    let mut same_count: u32 = 0;
    // indices: 0 = Mirrored (opposite), 1 = MirroredX, 2 = MirroredY, 3 = Rotate90 (or Rotate270)
    let mut reflection_counts = [0u32; 4];
    for g in fingers {
        if g.info == *reference {
            same_count += 1;
            continue;
        }
        for i in 0..n {
            let r = reference[i];
            let c = g.info[i];
            if opposite(r) == c {
                reflection_counts[0] += 1;
            }
            if mirror_x(r) == c {
                reflection_counts[1] += 1;
            }
            if mirror_y(r) == c {
                reflection_counts[2] += 1;
            }
            if rot90(r) == c || rot270(r) == c {
                reflection_counts[3] += 1;
            }
        }
    }

    if same_count == fingers_count {
        return Some((GestureDetail::from(reference.clone()), None));
    }
    if n == 0 {
        return None;
    }
    let masks = [
        TransformMask::Mirrored,
        TransformMask::MirroredX,
        TransformMask::MirroredY,
        TransformMask::Rotate90,
    ];
    for (i, &mask) in masks.iter().enumerate() {
        if same_count + reflection_counts[i] / (n as u32) == fingers_count {
            return Some((GestureDetail::from(reference.clone()), Some(mask)));
        }
    }
    None
}

/// Step 2 of §4.2.2: pinch detection, only reachable once reflection match has failed.
fn pinch_detect(
    fingers: &[&Gesture],
    fingers_count: u32,
    pinch_threshold_percent: f64,
) -> Option<(GestureDetail, Option<TransformMask>)> {
    if fingers_count <= 1 {
        return None;
    }
    let n = fingers_count as i64;
    let (mut sx, mut sy, mut ex, mut ey) = (0i64, 0i64, 0i64, 0i64);
    for g in fingers {
        sx += g.first_point.x as i64;
        sy += g.first_point.y as i64;
        ex += g.last_point.x as i64;
        ey += g.last_point.y as i64;
    }
    let avg_start = GesturePoint::new((sx / n) as i32, (sy / n) as i32);
    let avg_end = GesturePoint::new((ex / n) as i32, (ey / n) as i32);

    let mut ref_idx = 0usize;
    let mut ref_dist = -1i64;
    for (i, g) in fingers.iter().enumerate() {
        let dist = g.last_point.distance_squared(avg_end) + g.first_point.distance_squared(avg_start);
        if dist > ref_dist {
            ref_dist = dist;
            ref_idx = i;
        }
    }
    let reference = fingers[ref_idx];

    let mut avg_start_dis = 0.0;
    let mut avg_end_dis = 0.0;
    for g in fingers {
        avg_end_dis += g.last_point.distance_squared(reference.last_point) as f64;
        avg_start_dis += g.first_point.distance_squared(reference.first_point) as f64;
    }
    avg_end_dis /= (fingers_count - 1) as f64;
    avg_start_dis /= (fingers_count - 1) as f64;
    let percent_diff = (avg_start_dis - avg_end_dis) * 2.0 / (avg_start_dis + avg_end_dis);

    if percent_diff > pinch_threshold_percent {
        Some((GestureDetail::single(GestureType::Pinch), None))
    } else if percent_diff < -pinch_threshold_percent {
        Some((GestureDetail::single(GestureType::PinchOut), None))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(device_id: u32, seat: i32, x: i32, y: i32, t: u32) -> TouchEvent {
        TouchEvent::new(device_id, seat, GesturePoint::new(x, y), t)
    }

    fn recorder() -> GestureRecorder {
        GestureRecorder::new(GestureEngineConfig::default())
    }

    #[test]
    fn single_finger_tap_sequence() {
        let mut r = recorder();
        let start = r.start_gesture(touch(1, 0, 0, 0, 0), "sys", "dev").unwrap();
        assert_eq!(start.flags.mask, GestureMask::TOUCH_START);
        assert_eq!(start.flags.fingers, 1);
        assert_eq!(start.detail, GestureDetail::single(GestureType::Tap));

        let events = r.end_gesture(touch(1, 0, 0, 0, 10));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].flags.mask, GestureMask::TOUCH_END);
        assert_eq!(events[0].detail, GestureDetail::single(GestureType::Tap));
        assert_eq!(events[0].flags.fingers, 1);
        assert_eq!(events[1].flags.mask, GestureMask::GESTURE_END);
        assert_eq!(events[1].flags.fingers, 1);
        assert_eq!(events[1].detail, GestureDetail::single(GestureType::Tap));
    }

    #[test]
    fn n_finger_tap_at_single_point() {
        let mut r = recorder();
        for seat in 0..4 {
            r.start_gesture(touch(2, seat, 50, 50, 0), "sys", "dev").unwrap();
        }
        let mut terminal = None;
        for seat in 0..4 {
            let events = r.end_gesture(touch(2, seat, 50, 50, 5));
            if events.len() == 2 {
                terminal = Some(events[1].clone());
            }
        }
        let terminal = terminal.expect("group should terminate on last finger's end");
        assert_eq!(terminal.flags.fingers, 4);
        assert_eq!(terminal.detail, GestureDetail::single(GestureType::Tap));
    }

    #[test]
    fn reusing_seat_increments_finger_count() {
        let mut r = recorder();
        r.start_gesture(touch(3, 0, 0, 0, 0), "sys", "dev").unwrap();
        r.start_gesture(touch(3, 1, 10, 10, 0), "sys", "dev").unwrap();
        let ended = r.end_gesture(touch(3, 0, 0, 0, 5));
        assert_eq!(ended.len(), 1, "group should not terminate, seat 1 is still active");

        let restarted = r.start_gesture(touch(3, 0, 0, 0, 6), "sys", "dev").unwrap();
        assert_eq!(restarted.flags.fingers, 3);
    }

    #[test]
    fn cancel_then_restart_resets_finger_count() {
        let mut r = recorder();
        r.start_gesture(touch(4, 0, 0, 0, 0), "sys", "dev").unwrap();
        let cancelled = r.cancel_gesture(touch(4, 0, 0, 0, 1));
        assert!(cancelled.is_some());

        let restarted = r.start_gesture(touch(4, 0, 0, 0, 2), "sys", "dev").unwrap();
        assert_eq!(restarted.flags.fingers, 1);
    }

    #[test]
    fn cancel_emits_no_gesture_end() {
        let mut r = recorder();
        r.start_gesture(touch(9, 0, 0, 0, 0), "sys", "dev").unwrap();
        let event = r.cancel_gesture(touch(9, 0, 0, 0, 1)).unwrap();
        assert_eq!(event.flags.mask, GestureMask::TOUCH_CANCEL);
    }

    #[test]
    fn straight_line_classifies_south_east() {
        let mut r = recorder();
        r.start_gesture(touch(5, 0, 0, 0, 0), "sys", "dev").unwrap();
        let motion = r.continue_gesture(touch(5, 0, 160, 160, 5)).unwrap();
        assert_eq!(motion.flags.mask, GestureMask::TOUCH_MOTION);
        let events = r.end_gesture(touch(5, 0, 160, 160, 10));
        assert_eq!(events[1].detail, GestureDetail::single(GestureType::SouthEast));
    }

    #[test]
    fn coincident_point_emits_hold_and_does_not_advance_detail() {
        let mut r = recorder();
        r.start_gesture(touch(6, 0, 0, 0, 0), "sys", "dev").unwrap();
        let hold = r.continue_gesture(touch(6, 0, 2, 2, 1)).unwrap();
        assert_eq!(hold.flags.mask, GestureMask::TOUCH_HOLD);
        assert_eq!(hold.detail, GestureDetail::single(GestureType::Tap));
    }

    fn drive_loop(r: &mut GestureRecorder, device_id: u32, seat: i32, points: &[(i32, i32)]) {
        r.start_gesture(touch(device_id, seat, points[0].0, points[0].1, 0), "sys", "dev")
            .unwrap();
        for (i, p) in points.iter().enumerate().skip(1) {
            r.continue_gesture(touch(device_id, seat, p.0, p.1, i as u32));
        }
    }

    #[test]
    fn identical_rectangular_loops_have_no_reflection() {
        let mut r = recorder();
        let loop_pts = [(0, 0), (100, 0), (100, 100), (0, 100), (0, 0)];
        drive_loop(&mut r, 10, 0, &loop_pts);
        drive_loop(&mut r, 10, 1, &loop_pts);

        let last = *loop_pts.last().unwrap();
        r.end_gesture(touch(10, 0, last.0, last.1, 20));
        let events = r.end_gesture(touch(10, 1, last.0, last.1, 21));
        let terminal = &events[1];
        assert_eq!(terminal.flags.reflection_mask, None);
        assert_eq!(
            terminal.detail,
            GestureDetail::from(vec![
                GestureType::East,
                GestureType::South,
                GestureType::West,
                GestureType::North,
            ])
        );
    }

    #[test]
    fn x_mirrored_loops_detected() {
        let mut r = recorder();
        drive_loop(&mut r, 11, 0, &[(0, 0), (100, 0), (100, 100)]);
        drive_loop(&mut r, 11, 1, &[(800, 800), (700, 800), (700, 900)]);

        r.end_gesture(touch(11, 0, 100, 100, 20));
        let events = r.end_gesture(touch(11, 1, 700, 900, 21));
        let terminal = &events[1];
        assert_eq!(terminal.flags.reflection_mask, Some(TransformMask::MirroredX));
        assert_eq!(
            terminal.detail,
            GestureDetail::from(vec![GestureType::East, GestureType::South])
        );
    }

    #[test]
    fn four_fingers_radially_inward_is_pinch() {
        let mut r = recorder();
        let starts = [(-100, -100), (100, -100), (100, 100), (-100, 100)];
        let ends = [(-10, -10), (10, -10), (10, 10), (-10, 10)];
        for seat in 0..4 {
            r.start_gesture(
                touch(12, seat, starts[seat as usize].0, starts[seat as usize].1, 0),
                "sys",
                "dev",
            )
            .unwrap();
        }
        for seat in 0..4 {
            r.continue_gesture(touch(
                12,
                seat,
                ends[seat as usize].0,
                ends[seat as usize].1,
                5,
            ));
        }
        let mut terminal = None;
        for seat in 0..4 {
            let events = r.end_gesture(touch(
                12,
                seat,
                ends[seat as usize].0,
                ends[seat as usize].1,
                10,
            ));
            if events.len() == 2 {
                terminal = Some(events[1].clone());
            }
        }
        assert_eq!(terminal.unwrap().detail, GestureDetail::single(GestureType::Pinch));
    }

    #[test]
    fn four_fingers_radially_outward_is_pinch_out() {
        let mut r = recorder();
        let starts = [(-10, -10), (10, -10), (10, 10), (-10, 10)];
        let ends = [(-100, -100), (100, -100), (100, 100), (-100, 100)];
        for seat in 0..4 {
            r.start_gesture(
                touch(13, seat, starts[seat as usize].0, starts[seat as usize].1, 0),
                "sys",
                "dev",
            )
            .unwrap();
        }
        for seat in 0..4 {
            r.continue_gesture(touch(
                13,
                seat,
                ends[seat as usize].0,
                ends[seat as usize].1,
                5,
            ));
        }
        let mut terminal = None;
        for seat in 0..4 {
            let events = r.end_gesture(touch(
                13,
                seat,
                ends[seat as usize].0,
                ends[seat as usize].1,
                10,
            ));
            if events.len() == 2 {
                terminal = Some(events[1].clone());
            }
        }
        assert_eq!(terminal.unwrap().detail, GestureDetail::single(GestureType::PinchOut));
    }

    #[test]
    fn four_unrelated_sequences_are_unknown() {
        let mut r = recorder();
        // Each finger loops out from the origin and back, so first == last for all of them
        // (pinch's percent-difference is 0/0 and fails to trigger), via four different,
        // non-reflective direction pairs.
        drive_loop(&mut r, 14, 0, &[(0, 0), (1000, 0), (0, 0)]);
        drive_loop(&mut r, 14, 1, &[(0, 0), (0, 1000), (0, 0)]);
        drive_loop(&mut r, 14, 2, &[(0, 0), (1000, 1000), (0, 0)]);
        drive_loop(&mut r, 14, 3, &[(0, 0), (-1000, 1000), (0, 0)]);

        let mut terminal = None;
        for seat in 0..4 {
            let events = r.end_gesture(touch(14, seat, 0, 0, 20));
            if events.len() == 2 {
                terminal = Some(events[1].clone());
            }
        }
        assert_eq!(terminal.unwrap().detail, GestureDetail::single(GestureType::Unknown));
    }

    #[test]
    fn duplicate_start_is_rejected() {
        let mut r = recorder();
        r.start_gesture(touch(20, 0, 0, 0, 0), "sys", "dev").unwrap();
        let err = r.start_gesture(touch(20, 0, 0, 0, 1), "sys", "dev").unwrap_err();
        assert!(err.is_duplicate_touch());
    }

    #[test]
    fn continue_for_unknown_touch_is_ignored() {
        let mut r = recorder();
        assert!(r.continue_gesture(touch(30, 0, 1, 1, 0)).is_none());
    }
}
