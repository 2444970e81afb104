//! Two-lane event queue and merge rule (§4.3).
//!
//! One lane carries per-touch lifecycle events, the other carries group-terminal
//! (`GestureEndMask`) events. A consumer calling [`EventQueue::get_next_gesture`] always prefers
//! whichever lane's head has the smaller `seq`, and on popping a terminal event greedily folds in
//! any immediately-following duplicate within the merge window, incrementing its `count`.
//!
//! The original C++ reference blocks the consumer thread for up to `GESTURE_MERGE_DELAY_TIME` to
//! give a racing producer a chance to enqueue a duplicate before delivery. This store instead
//! merges only against what is already enqueued at call time (no real-time sleep), which keeps
//! merge-window tests deterministic; see DESIGN.md.
//!
//! Reflection fan-out happens here, at enqueue time, not at dequeue: when an event carries a
//! `reflection_mask`, a second event is synthesized immediately, with `Rotate90`/`Rotate270`
//! swapped and its detail transformed, and both are pushed together.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::config::GestureEngineConfig;
use crate::geometry::TransformMask;
use crate::model::{GestureEvent, GestureMask};

/// A direct-dispatch callback registered via [`EventQueue::register_event_handler`], invoked at
/// enqueue time instead of the event being queued for later pull-based delivery.
pub type EventHandler = Arc<dyn Fn(GestureEvent) + Send + Sync>;

struct Lanes {
    gesture: VecDeque<GestureEvent>,
    touch: VecDeque<GestureEvent>,
    select_mask: GestureMask,
    handler: Option<EventHandler>,
}

/// Single-producer/single-consumer event queue. See the concurrency contract in §5: multiple
/// producers or multiple consumers are a caller error, not something this type guards against.
pub struct EventQueue {
    state: Mutex<Lanes>,
    cond: Condvar,
    capacity: usize,
    merge_delay_ms: u32,
}

impl EventQueue {
    pub fn new(config: &GestureEngineConfig) -> Self {
        EventQueue {
            state: Mutex::new(Lanes {
                gesture: VecDeque::new(),
                touch: VecDeque::new(),
                select_mask: GestureMask::ALL,
                handler: None,
            }),
            cond: Condvar::new(),
            capacity: config.queue_capacity,
            merge_delay_ms: config.merge_delay_ms,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Lanes> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Restricts which events are accepted at enqueue time; events whose mask is not a subset of
    /// `mask` are dropped.
    pub fn listen_for_gesture_events(&self, mask: GestureMask) {
        self.lock().select_mask = mask;
    }

    /// Registers (or clears, with `None`) a direct-dispatch callback. While set, `enqueue` calls
    /// it immediately instead of pushing into either lane.
    pub fn register_event_handler(&self, handler: Option<EventHandler>) {
        self.lock().handler = handler;
    }

    pub fn enqueue(&self, event: GestureEvent) {
        let companion = event.flags.reflection_mask.map(|mask| {
            let swapped = match mask {
                TransformMask::Rotate90 => TransformMask::Rotate270,
                TransformMask::Rotate270 => TransformMask::Rotate90,
                other => other,
            };
            let mut mirrored = event.clone();
            mirrored.flags.reflection_mask = Some(swapped);
            mirrored.detail = mirrored.detail.transformed(swapped);
            mirrored
        });

        let mut state = self.lock();
        if !state.select_mask.contains(event.flags.mask) {
            return;
        }
        if let Some(handler) = state.handler.clone() {
            drop(state);
            handler(event);
            if let Some(c) = companion {
                handler(c);
            }
            return;
        }
        push_lane(&mut state, event, self.capacity);
        if let Some(c) = companion {
            push_lane(&mut state, c, self.capacity);
        }
        drop(state);
        self.cond.notify_one();
    }

    /// Non-blocking delivery (`getNextGesture`): `None` if both lanes are empty.
    pub fn get_next_gesture(&self) -> Option<GestureEvent> {
        let mut state = self.lock();
        if state.gesture.is_empty() && state.touch.is_empty() {
            return None;
        }
        let take_gesture = state.touch.is_empty()
            || (!state.gesture.is_empty()
                && state.gesture.front().unwrap().seq < state.touch.front().unwrap().seq);
        if !take_gesture {
            return state.touch.pop_front();
        }

        let mut event = state.gesture.pop_front().unwrap();
        while let Some(head) = state.gesture.front() {
            let within_window = head.time_ms.saturating_sub(event.time_ms) < self.merge_delay_ms;
            if within_window && head.is_duplicate_of(&event) {
                state.gesture.pop_front();
                event.flags.count += 1;
            } else {
                break;
            }
        }
        Some(event)
    }

    /// Blocking delivery (`waitForNextGesture`): sleeps on the enqueue signal until a lane is
    /// non-empty, then delegates to [`Self::get_next_gesture`].
    pub fn wait_for_next_gesture(&self) -> GestureEvent {
        let mut state = self.lock();
        while state.gesture.is_empty() && state.touch.is_empty() {
            state = self.cond.wait(state).unwrap_or_else(|e| e.into_inner());
        }
        drop(state);
        self.get_next_gesture()
            .expect("queue was observed non-empty under lock")
    }

    pub fn is_ready(&self) -> bool {
        let state = self.lock();
        !state.gesture.is_empty() || !state.touch.is_empty()
    }

    pub fn len(&self) -> usize {
        let state = self.lock();
        state.gesture.len() + state.touch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn push_lane(state: &mut Lanes, event: GestureEvent, capacity: usize) {
    let lane = if event.flags.mask.is_gesture_end() {
        &mut state.gesture
    } else {
        &mut state.touch
    };
    if lane.len() >= capacity {
        tracing::warn!(group_id = event.group_id, mask = ?event.flags.mask, "event queue lane full, dropping event");
        return;
    }
    lane.push_back(event);
}
