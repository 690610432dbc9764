//! Side drawer with animated open/close, drag-to-resize and collapse.
//!
//! The drawer never runs a width animation and a drag at the same time: drag
//! requests are refused while animating and animation requests are refused
//! while dragging.

use crate::easing::{ease_out_back, ease_out_quart, progress};
use crate::timers::TimerQueue;
use log::debug;

pub const OPEN_SECS: f64 = 0.4;
pub const CLOSE_SECS: f64 = 0.3;

/// Pause after the open animation before other animations may start.
pub const SETTLE_SECS: f64 = 0.05;

pub const RESIZE_DEBOUNCE_SECS: f64 = 0.15;

/// Hard bounds of the width, animated or not.
pub const MAX_WIDTH: f32 = 1000.0;

/// Lower bound while dragging and of the computed target.
pub const MIN_WIDTH: f32 = 320.0;

/// Lower bound of the computed target on narrow viewports.
pub const NARROW_MIN_WIDTH: f32 = 280.0;

/// Viewports narrower than this count as mobile.
pub const NARROW_VIEWPORT: f32 = 768.0;

const TARGET_FRACTION: f64 = 0.3;
const TARGET_CAP: f32 = 800.0;

/// Width the open animation starts from, so the panel is visible on the first frame.
const OPEN_START_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DrawerState {
    pub width: f32,
    pub is_dragging: bool,
    pub is_animating: bool,
    pub is_collapsed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerEvent {
    /// The open animation finished and settled.
    Opened,
    /// The close animation finished; the owner should unmount.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawerTimer {
    Settle,
    Resize,
}

#[derive(Debug, Clone, Copy)]
enum Tween {
    Opening { start: f64, from: f32, to: f32 },
    Closing { start: f64, from: f32 },
}

#[derive(Debug, Clone, Copy)]
struct DragAnchor {
    pointer_x: f32,
    width: f32,
}

/// Width the drawer opens to on a viewport of the given width.
pub fn target_width_for(viewport_width: f32) -> f32 {
    let min = if viewport_width < NARROW_VIEWPORT {
        NARROW_MIN_WIDTH
    } else {
        MIN_WIDTH
    };
    ((f64::from(viewport_width) * TARGET_FRACTION) as f32)
        .min(TARGET_CAP)
        .max(min)
        .min(MAX_WIDTH)
}

pub struct Drawer {
    side: Side,
    state: DrawerState,
    is_open: bool,
    explicit_width: Option<f32>,
    viewport_width: f32,
    /// A resize landed while busy and still has to be applied
    resize_deferred: bool,
    /// An explicit width landed while busy and still has to be applied
    explicit_deferred: bool,
    tween: Option<Tween>,
    drag: Option<DragAnchor>,
    timers: TimerQueue<DrawerTimer>,
    events: Vec<DrawerEvent>,
}

impl Drawer {
    pub fn new(side: Side, viewport_width: f32) -> Self {
        Self {
            side,
            state: DrawerState::default(),
            is_open: false,
            explicit_width: None,
            viewport_width,
            resize_deferred: false,
            explicit_deferred: false,
            tween: None,
            drag: None,
            timers: TimerQueue::new(),
            events: Vec::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    pub fn width(&self) -> f32 {
        self.state.width
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_idle(&self) -> bool {
        !self.state.is_animating && !self.state.is_dragging
    }

    /// True while a tween, drag or timer still needs frames.
    pub fn has_pending_work(&self) -> bool {
        !self.is_idle() || !self.timers.is_empty()
    }

    pub fn is_narrow(&self) -> bool {
        self.viewport_width < NARROW_VIEWPORT
    }

    /// Width the drawer animates to right now.
    pub fn target_width(&self) -> f32 {
        self.explicit_width
            .unwrap_or_else(|| target_width_for(self.viewport_width))
            .clamp(0.0, MAX_WIDTH)
    }

    /// Mounts the drawer open; the open animation starts right away.
    pub fn open(&mut self, now: f64) -> bool {
        if self.is_open {
            return false;
        }
        self.is_open = true;
        self.reconcile(now);
        true
    }

    /// Plays the close animation; `Closed` is raised at its end.
    pub fn request_close(&mut self, now: f64) -> bool {
        if !self.is_open || !self.is_idle() {
            debug!("Drawer close ignored: busy");
            return false;
        }

        self.state.is_animating = true;
        self.tween = Some(Tween::Closing {
            start: now,
            from: self.state.width,
        });
        true
    }

    /// Overrides the computed target. `None` goes back to following the viewport.
    pub fn set_explicit_width(&mut self, width: Option<f32>, now: f64) {
        self.explicit_width = width;
        self.reconcile(now);
    }

    /// Collapsing hides the panel but keeps it mounted; expanding replays the open animation.
    pub fn set_collapsed(&mut self, collapsed: bool, now: f64) -> bool {
        if collapsed == self.state.is_collapsed {
            return false;
        }

        if collapsed {
            if !self.is_open || !self.is_idle() {
                return false;
            }
            self.state.is_collapsed = true;
            self.state.width = 0.0;
        } else {
            self.state.is_collapsed = false;
            self.reconcile(now);
        }
        true
    }

    /// Records a new viewport width; the target is recomputed after a debounce.
    pub fn set_viewport_width(&mut self, width: f32, now: f64) {
        if (width - self.viewport_width).abs() < f32::EPSILON {
            return;
        }
        self.viewport_width = width;
        self.timers.schedule(DrawerTimer::Resize, now, RESIZE_DEBOUNCE_SECS);
    }

    pub fn begin_drag(&mut self, pointer_x: f32) -> bool {
        if !self.is_open || self.state.is_collapsed || !self.is_idle() {
            debug!("Drawer drag ignored: busy");
            return false;
        }

        self.drag = Some(DragAnchor {
            pointer_x,
            width: self.state.width,
        });
        self.state.is_dragging = true;
        true
    }

    pub fn drag_to(&mut self, pointer_x: f32) {
        let Some(anchor) = self.drag else {
            return;
        };

        let delta = match self.side {
            Side::Right => anchor.pointer_x - pointer_x,
            Side::Left => pointer_x - anchor.pointer_x,
        };
        self.state.width = (anchor.width + delta).clamp(MIN_WIDTH, MAX_WIDTH);
    }

    /// Ends the drag and applies anything that arrived while it ran.
    pub fn end_drag(&mut self) {
        if self.drag.take().is_none() {
            return;
        }
        self.state.is_dragging = false;
        self.apply_deferred();
    }

    /// Advances animations and timers; returns what finished this frame.
    pub fn tick(&mut self, now: f64) -> Vec<DrawerEvent> {
        self.advance_tween(now);

        for timer in self.timers.due(now) {
            match timer {
                DrawerTimer::Settle => {
                    self.state.is_animating = false;
                    self.events.push(DrawerEvent::Opened);
                    self.apply_deferred();
                }
                DrawerTimer::Resize => self.apply_resize(),
            }
        }

        std::mem::take(&mut self.events)
    }

    /// Cancels every pending frame and timer.
    pub fn teardown(&mut self) {
        self.tween = None;
        self.drag = None;
        self.timers.clear();
        self.resize_deferred = false;
        self.explicit_deferred = false;
        self.state.is_dragging = false;
        self.state.is_animating = false;
    }

    /// Re-derives width from the current inputs. Safe to call any number of times.
    fn reconcile(&mut self, now: f64) {
        if !self.is_open || self.state.is_collapsed {
            return;
        }
        if !self.is_idle() {
            self.explicit_deferred = true;
            return;
        }

        if self.state.width == 0.0 {
            self.start_open(now);
        } else if let Some(width) = self.explicit_width {
            self.state.width = width.clamp(0.0, MAX_WIDTH);
        }
    }

    /// Runs once the drawer turns idle: an explicit width first, then a held-back resize.
    fn apply_deferred(&mut self) {
        if std::mem::take(&mut self.explicit_deferred)
            && let Some(width) = self.explicit_width
        {
            self.state.width = width.clamp(0.0, MAX_WIDTH);
        }
        if self.resize_deferred {
            self.apply_resize();
        }
    }

    fn start_open(&mut self, now: f64) {
        self.state.is_animating = true;
        self.state.width = OPEN_START_WIDTH;
        self.tween = Some(Tween::Opening {
            start: now,
            from: OPEN_START_WIDTH,
            to: self.target_width(),
        });
    }

    fn advance_tween(&mut self, now: f64) {
        let Some(tween) = self.tween else {
            return;
        };

        match tween {
            Tween::Opening { start, from, to } => {
                let t = progress(start, OPEN_SECS, now);
                let width = f64::from(from) + f64::from(to - from) * ease_out_back(t);
                self.state.width = (width as f32).clamp(0.0, MAX_WIDTH);
                if t >= 1.0 {
                    self.state.width = to;
                    self.tween = None;
                    self.timers.schedule(DrawerTimer::Settle, now, SETTLE_SECS);
                }
            }
            Tween::Closing { start, from } => {
                let t = progress(start, CLOSE_SECS, now);
                let width = f64::from(from) * (1.0 - ease_out_quart(t));
                self.state.width = (width as f32).max(0.0);
                if t >= 1.0 {
                    self.state.width = 0.0;
                    self.tween = None;
                    self.state.is_animating = false;
                    self.state.is_collapsed = false;
                    self.is_open = false;
                    self.resize_deferred = false;
                    self.explicit_deferred = false;
                    self.timers.clear();
                    self.events.push(DrawerEvent::Closed);
                }
            }
        }
    }

    fn apply_resize(&mut self) {
        if !self.is_open || self.state.is_collapsed {
            self.resize_deferred = false;
            return;
        }
        if !self.is_idle() {
            self.resize_deferred = true;
            return;
        }

        self.resize_deferred = false;
        if self.explicit_width.is_none() {
            self.state.width = target_width_for(self.viewport_width);
        }
    }
}
