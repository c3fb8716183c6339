//! Dual-range slider: two handles over a bounded track, driven by pointer events.
//!
//! The slider is a state machine with no rendering of its own. A host feeds it
//! pointer positions in its own coordinate space (pixels, terminal columns)
//! together with the rendered [`Track`] geometry, and drains changes once per
//! frame with [`DualRangeSlider::on_frame`]. Every pair handed out satisfies
//! `low <= high` and sits on the domain's step grid.
//!
//! Ordering contract: moves are applied in arrival order and only the latest
//! pair within a frame is delivered. Intermediate pairs are dropped on purpose.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::range::{Domain, RangePair};

/// One of the two thumbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handle {
    Low,
    High,
}

/// Identity of the pointer that owns a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// Rendered track geometry, in the same units as pointer x positions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Track {
    pub left: f64,
    pub width: f64,
}

impl Track {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Track position (0..=1) of a pointer x. A degenerate track maps to 0.
    pub fn fraction_at(&self, x: f64) -> f64 {
        if !(self.width.is_finite() && self.width > 0.0) || !x.is_finite() {
            return 0.0;
        }
        ((x - self.left) / self.width).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct DualRangeSlider {
    domain: Domain,
    low: f64,
    high: f64,
    single_value: bool,
    track: Track,
    active: Option<Handle>,
    captured: Option<PointerId>,
    pending: Option<RangePair>,
}

impl DualRangeSlider {
    pub fn new(domain: Domain, values: RangePair) -> Self {
        let mut slider = Self {
            domain,
            low: domain.min(),
            high: domain.max(),
            single_value: false,
            track: Track::default(),
            active: None,
            captured: None,
            pending: None,
        };
        slider.set_values(values);
        slider
    }

    /// Both handles move together and report `low == high`.
    pub fn single_value(mut self, enabled: bool) -> Self {
        self.single_value = enabled;
        if enabled {
            self.high = self.low;
        }
        self
    }

    pub fn is_single_value(&self) -> bool {
        self.single_value
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn pair(&self) -> RangePair {
        RangePair::sorted(self.low, self.high)
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn set_track(&mut self, track: Track) {
        self.track = track;
    }

    /// Handle being dragged, if a gesture is in progress.
    pub fn active_handle(&self) -> Option<Handle> {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.captured.is_some()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Overwrite both handles from the host (e.g. after a text edit).
    ///
    /// Values are snapped and ordered; any change queued for the next frame is
    /// discarded because the host already knows the new pair.
    pub fn set_values(&mut self, values: RangePair) {
        let low = self.domain.snap(values.low());
        let high = self.domain.snap(values.high());
        let pair = RangePair::sorted(low, high);
        self.low = pair.low();
        self.high = if self.single_value { pair.low() } else { pair.high() };
        self.pending = None;
    }

    /// Domain value under pointer `x`: interpolate across the track, then snap.
    pub fn value_at(&self, x: f64) -> f64 {
        let fraction = self.track.fraction_at(x);
        self.domain.snap(self.domain.value_at_fraction(fraction))
    }

    /// Track fraction (0..=1) at which a handle is drawn.
    pub fn fraction(&self, handle: Handle) -> f64 {
        match handle {
            Handle::Low => self.domain.fraction_of(self.low),
            Handle::High => self.domain.fraction_of(self.high),
        }
    }

    /// Nearest handle to `value`; ties favour `Low`, including a collapsed pair.
    pub fn nearest_handle(&self, value: f64) -> Handle {
        if (value - self.low).abs() <= (value - self.high).abs() {
            Handle::Low
        } else {
            Handle::High
        }
    }

    /// Start a gesture: capture the pointer, pick a handle, move it under the pointer.
    ///
    /// A second pointer going down while another owns the gesture is ignored.
    pub fn pointer_down(&mut self, pointer: PointerId, x: f64) {
        if self.captured.is_some() {
            trace!(?pointer, "pointer down ignored, gesture already captured");
            return;
        }
        let value = self.value_at(x);
        let handle = if self.single_value {
            Handle::Low
        } else {
            self.nearest_handle(value)
        };
        trace!(?pointer, x, value, ?handle, "pointer down");
        self.captured = Some(pointer);
        self.active = Some(handle);
        self.move_active(value);
    }

    /// Continue a gesture. Moves from pointers other than the captured one are ignored.
    pub fn pointer_move(&mut self, pointer: PointerId, x: f64) {
        if self.captured != Some(pointer) {
            return;
        }
        let value = self.value_at(x);
        trace!(?pointer, x, value, "pointer move");
        self.move_active(value);
    }

    /// End a gesture: release capture and flush the pending change, if any.
    pub fn pointer_up(&mut self, pointer: PointerId) -> Option<RangePair> {
        self.end_gesture(pointer, "pointer up")
    }

    /// Interrupted gesture. Handled exactly like [`pointer_up`](Self::pointer_up).
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Option<RangePair> {
        self.end_gesture(pointer, "pointer cancel")
    }

    /// Deliver the latest change queued since the previous frame.
    pub fn on_frame(&mut self) -> Option<RangePair> {
        let change = self.pending.take();
        if let Some(pair) = change {
            debug!(low = pair.low(), high = pair.high(), "slider change");
        }
        change
    }

    /// Move a handle by whole steps (keyboard control). Queues a change like a drag.
    pub fn nudge(&mut self, handle: Handle, steps: i32) {
        let current = match handle {
            Handle::Low => self.low,
            Handle::High => self.high,
        };
        let target = self.domain.snap(current + f64::from(steps) * self.domain.step());
        let (low, high) = self.candidate(handle, target);
        self.commit(low, high);
    }

    fn end_gesture(&mut self, pointer: PointerId, what: &str) -> Option<RangePair> {
        if self.captured != Some(pointer) {
            return None;
        }
        trace!(?pointer, "{what}");
        self.captured = None;
        self.active = None;
        self.on_frame()
    }

    fn move_active(&mut self, value: f64) {
        let Some(handle) = self.active else {
            return;
        };
        let (low, high) = self.candidate(handle, value);
        self.commit(low, high);
    }

    /// Candidate pair for moving `handle` to `value`, clamped against the other handle.
    fn candidate(&self, handle: Handle, value: f64) -> (f64, f64) {
        if self.single_value {
            return (value, value);
        }
        match handle {
            Handle::Low => (value.min(self.high), self.high),
            Handle::High => (self.low, value.max(self.low)),
        }
    }

    fn commit(&mut self, low: f64, high: f64) {
        if low == self.low && high == self.high {
            return;
        }
        self.low = low;
        self.high = high;
        self.pending = Some(RangePair::sorted(low, high));
    }
}
