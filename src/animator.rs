//! Scripted camera flights over a [`MapWidget`].
//!
//! A flight is a queue of [`Step`]s executed in order from `tick`. Steps that
//! take time (holds and zoom steps) park the queue until their completion
//! signal arrives: a deadline passing, or the widget acknowledging a zoom
//! level. Only one flight runs at a time and requests that arrive mid-flight
//! are dropped, not queued.

use crate::geo::{LatLng, LatLngBounds, US_WIDTH_DEG};
use crate::map_view::MapLoadError;
use crate::style::StyleSet;
use crate::widget::{GestureHandling, MAX_ZOOM, MapEvent, MapOptions, MapWidget};
use log::{debug, error, info};
use std::collections::VecDeque;
use thiserror::Error;

/// Time spent admiring the origin before the intro flight leaves.
pub const ORIGIN_HOLD_SECS: f64 = 2.0;

/// Delay before each single-level zoom step is issued.
pub const ZOOM_STEP_DELAY_SECS: f64 = 0.08;

/// A zoom step not acknowledged within this window aborts the flight.
pub const ZOOM_ACK_TIMEOUT_SECS: f64 = 2.0;

/// Pause once fully zoomed out.
pub const ZOOMED_OUT_PAUSE_SECS: f64 = 0.5;

/// Time allowed for `pan_to` to land.
pub const PAN_SETTLE_SECS: f64 = 1.5;

/// Padding around the origin/destination box, in pixels.
pub const FIT_PADDING: f32 = 100.0;

/// Most zoomed-out level for trips longer than a third of the US.
pub const LONG_DISTANCE_MIN_ZOOM: u8 = 5;

pub const SHORT_DISTANCE_MIN_ZOOM: u8 = 6;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationError {
    #[error("map has no center")]
    MissingCenter,
    #[error("map has no zoom level")]
    MissingZoom,
    #[error("zoom level {0} was never acknowledged")]
    ZoomStalled(u8),
}

/// One instruction of a flight script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Hold(f64),
    Options(MapOptions),
    Center(LatLng),
    /// Immediate zoom, no stepping.
    JumpZoom(u8),
    /// Walks one level at a time to the target, waiting for each acknowledgement.
    StepZoom(u8),
    FitBounds(LatLngBounds),
    PanTo(LatLng),
    /// Drops a marker, or bounces the one already standing there.
    DropMarker(LatLng),
}

/// Deepest zoom-out for a trip between `from` and `to`.
pub fn min_zoom_for(from: LatLng, to: LatLng) -> u8 {
    if from.longitude_span(&to) > US_WIDTH_DEG / 3.0 {
        LONG_DISTANCE_MIN_ZOOM
    } else {
        SHORT_DISTANCE_MIN_ZOOM
    }
}

/// Level at which the labels switch to the minimal style on the way out.
pub fn midpoint_zoom(current: u8, min: u8) -> u8 {
    ((u16::from(current) + u16::from(min)) / 2) as u8
}

/// Zoom-out, cross-country hop and zoom-in shared by both flights.
fn cruise(from: LatLng, current_zoom: u8, destination: LatLng) -> Vec<Step> {
    let min = min_zoom_for(from, destination);
    vec![
        Step::StepZoom(midpoint_zoom(current_zoom, min)),
        Step::Options(MapOptions::styles(StyleSet::Minimal)),
        Step::StepZoom(min),
        Step::Hold(ZOOMED_OUT_PAUSE_SECS),
        Step::FitBounds(LatLngBounds::from_points(from, destination)),
        Step::PanTo(destination),
        Step::Hold(PAN_SETTLE_SECS),
        Step::Options(MapOptions::styles(StyleSet::RoadVisible)),
        Step::StepZoom(MAX_ZOOM),
        Step::Options(MapOptions::gestures(GestureHandling::Cooperative)),
        Step::DropMarker(destination),
    ]
}

/// The first flight after the map loads, starting with a hold over the origin.
pub fn intro_script(origin: LatLng, destination: LatLng) -> VecDeque<Step> {
    let mut steps = VecDeque::from(vec![
        Step::Center(origin),
        Step::JumpZoom(MAX_ZOOM),
        Step::Options(MapOptions {
            styles: Some(StyleSet::Initial),
            gesture_handling: Some(GestureHandling::None),
        }),
        Step::Hold(ORIGIN_HOLD_SECS),
    ]);
    steps.extend(cruise(origin, MAX_ZOOM, destination));
    steps
}

/// Later flights: straight from wherever the camera is.
pub fn travel_script(from: LatLng, current_zoom: u8, destination: LatLng) -> VecDeque<Step> {
    let mut steps = VecDeque::from(vec![Step::Options(MapOptions::gestures(
        GestureHandling::None,
    ))]);
    steps.extend(cruise(from, current_zoom, destination));
    steps
}

/// What a destination request turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelOutcome {
    /// A flight is now running.
    Started,
    /// Same place as last time; the marker bounced.
    Bounced,
    /// The map is not loaded yet; the destination waits for the intro.
    Deferred,
    /// Dropped: a flight is running, the intro is pending, or the map is gone.
    Ignored,
    /// The flight could not start.
    Aborted,
}

/// Snapshot for rendering and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapAnimationState {
    pub current_zoom: Option<u8>,
    pub current_style_set: StyleSet,
    pub last_visited: Option<LatLng>,
    pub is_animating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Waiting {
    Nothing,
    Until(f64),
    ZoomDelay { target: u8, next: u8, until: f64 },
    ZoomAck { target: u8, level: u8, deadline: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlightKind {
    Intro,
    Travel,
}

struct Flight {
    kind: FlightKind,
    destination: LatLng,
    steps: VecDeque<Step>,
    waiting: Waiting,
}

enum FlightProgress {
    Running,
    Finished,
}

fn step_toward(level: u8, target: u8) -> u8 {
    if level < target { level + 1 } else { level - 1 }
}

impl Flight {
    fn run<W: MapWidget>(
        &mut self,
        widget: &mut W,
        style_set: &mut StyleSet,
        events: &[MapEvent],
        now: f64,
    ) -> Result<FlightProgress, AnimationError> {
        loop {
            match self.waiting {
                Waiting::Until(until) => {
                    if now < until {
                        return Ok(FlightProgress::Running);
                    }
                    self.waiting = Waiting::Nothing;
                }
                Waiting::ZoomDelay {
                    target,
                    next,
                    until,
                } => {
                    if now < until {
                        return Ok(FlightProgress::Running);
                    }
                    widget.set_zoom(next);
                    self.waiting = Waiting::ZoomAck {
                        target,
                        level: next,
                        deadline: now + ZOOM_ACK_TIMEOUT_SECS,
                    };
                    // Events in hand predate this zoom; the ack comes next frame at the earliest.
                    return Ok(FlightProgress::Running);
                }
                Waiting::ZoomAck {
                    target,
                    level,
                    deadline,
                } => {
                    if events.contains(&MapEvent::ZoomChanged(level)) {
                        self.waiting = if level == target {
                            Waiting::Nothing
                        } else {
                            Waiting::ZoomDelay {
                                target,
                                next: step_toward(level, target),
                                until: now + ZOOM_STEP_DELAY_SECS,
                            }
                        };
                    } else if now >= deadline {
                        return Err(AnimationError::ZoomStalled(level));
                    } else {
                        return Ok(FlightProgress::Running);
                    }
                }
                Waiting::Nothing => {
                    let Some(step) = self.steps.pop_front() else {
                        return Ok(FlightProgress::Finished);
                    };
                    self.apply(step, widget, style_set, now)?;
                }
            }
        }
    }

    fn apply<W: MapWidget>(
        &mut self,
        step: Step,
        widget: &mut W,
        style_set: &mut StyleSet,
        now: f64,
    ) -> Result<(), AnimationError> {
        match step {
            Step::Hold(secs) => self.waiting = Waiting::Until(now + secs),
            Step::Options(options) => {
                widget.set_options(options);
                if let Some(styles) = options.styles {
                    *style_set = styles;
                }
            }
            Step::Center(center) => widget.set_center(center),
            Step::JumpZoom(zoom) => widget.set_zoom(zoom),
            Step::StepZoom(target) => {
                let current = widget.zoom().ok_or(AnimationError::MissingZoom)?;
                if current != target {
                    self.waiting = Waiting::ZoomDelay {
                        target,
                        next: step_toward(current, target),
                        until: now + ZOOM_STEP_DELAY_SECS,
                    };
                }
            }
            Step::FitBounds(bounds) => widget.fit_bounds(bounds, FIT_PADDING),
            Step::PanTo(center) => {
                widget.center().ok_or(AnimationError::MissingCenter)?;
                widget.pan_to(center);
            }
            Step::DropMarker(at) => {
                if widget.marker() == Some(at) {
                    widget.bounce_marker();
                } else {
                    widget.place_marker(at);
                }
            }
        }
        Ok(())
    }
}

/// Owns the map widget and runs at most one flight on it at a time.
pub struct MapAnimator<W> {
    origin: LatLng,
    widget: Option<W>,
    is_loading: bool,
    load_failed: bool,
    /// Latest requested destination, kept for the intro if the map is not up yet
    destination: Option<LatLng>,
    intro_done: bool,
    last_visited: Option<LatLng>,
    style_set: StyleSet,
    flight: Option<Flight>,
}

impl<W: MapWidget> MapAnimator<W> {
    pub fn new(origin: LatLng) -> Self {
        Self {
            origin,
            widget: None,
            is_loading: false,
            load_failed: false,
            destination: None,
            intro_done: false,
            last_visited: None,
            style_set: StyleSet::Initial,
            flight: None,
        }
    }

    /// Marks the widget as being built elsewhere.
    pub fn begin_loading(&mut self) {
        if self.widget.is_none() && !self.load_failed {
            self.is_loading = true;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn is_attached(&self) -> bool {
        self.widget.is_some()
    }

    /// Hands over a freshly built widget, or the reason there is none. Failures are not retried.
    pub fn attach(&mut self, widget: Result<W, MapLoadError>) {
        self.is_loading = false;

        let mut widget = match widget {
            Ok(widget) => widget,
            Err(err) => {
                error!("Error initializing map: {err}");
                self.load_failed = true;
                return;
            }
        };

        widget.set_center(self.origin);
        widget.set_options(MapOptions {
            styles: Some(StyleSet::Initial),
            gesture_handling: Some(GestureHandling::None),
        });
        self.style_set = StyleSet::Initial;
        self.widget = Some(widget);
        info!("Map attached");

        if let Some(destination) = self.destination {
            self.start(FlightKind::Intro, destination);
        }
    }

    /// Unmounts the widget and forgets all flight state, so the next attach replays the intro.
    pub fn detach(&mut self) {
        if self.widget.is_some() {
            info!("Map detached");
        }
        self.widget = None;
        self.flight = None;
        self.is_loading = false;
        self.load_failed = false;
        self.destination = None;
        self.intro_done = false;
        self.last_visited = None;
        self.style_set = StyleSet::Initial;
    }

    /// Requests a trip to `destination`.
    pub fn set_destination(&mut self, destination: LatLng) -> TravelOutcome {
        if self.widget.is_none() {
            if self.load_failed {
                return TravelOutcome::Ignored;
            }
            self.destination = Some(destination);
            return TravelOutcome::Deferred;
        }

        if self.flight.is_some() {
            debug!("Travel to {destination:?} ignored: flight in progress");
            return TravelOutcome::Ignored;
        }

        if !self.intro_done {
            self.destination = Some(destination);
            return self.start(FlightKind::Intro, destination);
        }

        if self.last_visited == Some(destination) {
            if let Some(widget) = &mut self.widget {
                widget.bounce_marker();
            }
            return TravelOutcome::Bounced;
        }

        self.destination = Some(destination);
        self.start(FlightKind::Travel, destination)
    }

    fn start(&mut self, kind: FlightKind, destination: LatLng) -> TravelOutcome {
        let Some(widget) = &self.widget else {
            return TravelOutcome::Ignored;
        };

        let steps = match kind {
            FlightKind::Intro => intro_script(self.origin, destination),
            FlightKind::Travel => {
                let camera = widget
                    .center()
                    .ok_or(AnimationError::MissingCenter)
                    .and_then(|from| Ok((from, widget.zoom().ok_or(AnimationError::MissingZoom)?)));
                match camera {
                    Ok((from, zoom)) => travel_script(from, zoom, destination),
                    Err(err) => {
                        error!("Animation error: {err}");
                        return TravelOutcome::Aborted;
                    }
                }
            }
        };

        info!("Starting {kind:?} flight to {destination:?}");
        self.flight = Some(Flight {
            kind,
            destination,
            steps,
            waiting: Waiting::Nothing,
        });
        TravelOutcome::Started
    }

    /// Advances the widget and the running flight to `now` (seconds).
    pub fn tick(&mut self, now: f64) {
        let Some(widget) = &mut self.widget else {
            return;
        };

        widget.tick(now);
        let events = widget.take_events();

        let Some(flight) = &mut self.flight else {
            return;
        };

        match flight.run(widget, &mut self.style_set, &events, now) {
            Ok(FlightProgress::Running) => {}
            Ok(FlightProgress::Finished) => {
                info!("{:?} flight to {:?} complete", flight.kind, flight.destination);
                self.last_visited = Some(flight.destination);
                self.intro_done = true;
                self.flight = None;
            }
            Err(err) => {
                error!("Animation error: {err}");
                self.intro_done = true;
                self.flight = None;
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    pub fn state(&self) -> MapAnimationState {
        MapAnimationState {
            current_zoom: self.widget.as_ref().and_then(|widget| widget.zoom()),
            current_style_set: self.style_set,
            last_visited: self.last_visited,
            is_animating: self.is_animating(),
        }
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    /// Mutable access for painting and user gestures.
    pub fn widget_mut(&mut self) -> Option<&mut W> {
        self.widget.as_mut()
    }
}
