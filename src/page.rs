//! Page-level state machine tying the drawer, the job list and the map destination together.

use crate::drawer::{Drawer, DrawerEvent, Side};
use crate::easing::progress;
use crate::geo::LatLng;
use crate::signal::Signal;
use crate::timers::TimerQueue;
use crate::{JobEntry, Project, Resume};
use log::{debug, info};

/// Delay between the drawer starting to open and the map appearing.
pub const SHOW_MAP_DELAY_SECS: f64 = 0.05;

/// Delay between the drawer closing and the map disappearing.
pub const HIDE_MAP_DELAY_SECS: f64 = 0.3;

/// Fade-out time of the detail panel before its content is swapped.
pub const DETAIL_SWAP_SECS: f64 = 0.3;

pub const DETAIL_FADE_IN_SECS: f64 = 0.3;

/// First link of the mobile auto-collapse chain: open animation plus settle.
pub const COLLAPSE_ARM_SECS: f64 = 0.45;

/// Second link: how long the opened drawer stays up before folding into a tab.
pub const COLLAPSE_DELAY_SECS: f64 = 2.5;

/// Retry interval when the drawer is busy as the collapse fires.
pub const COLLAPSE_RETRY_SECS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    DrawerClosed,
    DrawerOpen,
    JobSelected(usize),
    Collapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageTimer {
    ShowMap,
    HideMap,
    SwapDetail,
    CollapseArm,
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DetailFade {
    Hidden,
    FadingIn { since: f64 },
    FadingOut { since: f64 },
}

pub struct PageController {
    resume: Resume,
    drawer: Drawer,
    /// Highlighted entry in the job list
    selected: Option<usize>,
    /// Entry whose detail panel is showing
    detail: Option<usize>,
    /// Entry the detail panel switches to once faded out
    pending_detail: Option<usize>,
    detail_fade: DetailFade,
    map_visible: bool,
    hero_visible: bool,
    active_project: Option<usize>,
    destination: Signal<Option<LatLng>>,
    timers: TimerQueue<PageTimer>,
}

impl PageController {
    pub fn new(resume: Resume, viewport_width: f32) -> Self {
        Self {
            resume,
            drawer: Drawer::new(Side::Right, viewport_width),
            selected: None,
            detail: None,
            pending_detail: None,
            detail_fade: DetailFade::Hidden,
            map_visible: false,
            hero_visible: true,
            active_project: None,
            destination: Signal::new(None),
            timers: TimerQueue::new(),
        }
    }

    pub fn resume(&self) -> &Resume {
        &self.resume
    }

    pub fn drawer(&self) -> &Drawer {
        &self.drawer
    }

    pub fn state(&self) -> PageState {
        if !self.drawer.is_open() {
            PageState::DrawerClosed
        } else if self.drawer.state().is_collapsed {
            PageState::Collapsed
        } else if let Some(index) = self.selected {
            PageState::JobSelected(index)
        } else {
            PageState::DrawerOpen
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Job whose detail panel is showing (it lags `selected` during a swap).
    pub fn detail_job(&self) -> Option<&JobEntry> {
        self.detail.and_then(|index| self.resume.job(index))
    }

    pub fn detail_opacity(&self, now: f64) -> f32 {
        match self.detail_fade {
            DetailFade::Hidden => 0.0,
            DetailFade::FadingIn { since } => progress(since, DETAIL_FADE_IN_SECS, now) as f32,
            DetailFade::FadingOut { since } => 1.0 - progress(since, DETAIL_SWAP_SECS, now) as f32,
        }
    }

    pub fn map_visible(&self) -> bool {
        self.map_visible
    }

    pub fn hero_visible(&self) -> bool {
        self.hero_visible
    }

    /// Coordinate the map should travel to. Every write is a travel request.
    pub fn destination(&self) -> &Signal<Option<LatLng>> {
        &self.destination
    }

    /// True while anything on the page still changes without input.
    pub fn needs_frames(&self, now: f64) -> bool {
        let fading = match self.detail_fade {
            DetailFade::Hidden => false,
            DetailFade::FadingIn { since } => now - since < DETAIL_FADE_IN_SECS,
            DetailFade::FadingOut { .. } => true,
        };
        fading || !self.timers.is_empty() || self.drawer.has_pending_work()
    }

    /// Résumé button: opens the drawer and shows the first job.
    pub fn open_drawer(&mut self, now: f64) -> bool {
        if !self.drawer.open(now) {
            return false;
        }
        info!("Drawer opened");

        self.hero_visible = false;
        self.timers.cancel(PageTimer::HideMap);
        self.timers.schedule(PageTimer::ShowMap, now, SHOW_MAP_DELAY_SECS);

        if !self.resume.jobs.is_empty() {
            self.show_detail(0, now);
        }

        if self.drawer.is_narrow() {
            self.timers.schedule(PageTimer::CollapseArm, now, COLLAPSE_ARM_SECS);
        }
        true
    }

    /// Close button: the rest of the teardown happens when the drawer reports `Closed`.
    pub fn close_drawer(&mut self, now: f64) -> bool {
        if !self.drawer.request_close(now) {
            return false;
        }
        self.timers.cancel(PageTimer::CollapseArm);
        self.timers.cancel(PageTimer::Collapse);
        true
    }

    pub fn select_job(&mut self, index: usize, now: f64) -> bool {
        if !self.drawer.is_open() || self.resume.job(index).is_none() {
            return false;
        }

        match self.detail {
            Some(shown) if shown == index && self.pending_detail.is_none() => {
                self.selected = Some(index);
                self.publish(index);
            }
            Some(_) => {
                self.selected = Some(index);
                self.pending_detail = Some(index);
                if !matches!(self.detail_fade, DetailFade::FadingOut { .. }) {
                    self.detail_fade = DetailFade::FadingOut { since: now };
                }
                self.timers.schedule(PageTimer::SwapDetail, now, DETAIL_SWAP_SECS);
            }
            None => self.show_detail(index, now),
        }
        true
    }

    pub fn select_job_by_key(&mut self, key: &str, now: f64) -> bool {
        match self.resume.job_index(key) {
            Some(index) => self.select_job(index, now),
            None => false,
        }
    }

    pub fn select_next(&mut self, now: f64) -> bool {
        let next = match self.selected {
            Some(index) => self.resume.next_index(index),
            None => (!self.resume.jobs.is_empty()).then_some(0),
        };
        next.is_some_and(|index| self.select_job(index, now))
    }

    pub fn select_previous(&mut self, now: f64) -> bool {
        let previous = match self.selected {
            Some(index) => self.resume.previous_index(index),
            None => self.resume.jobs.len().checked_sub(1),
        };
        previous.is_some_and(|index| self.select_job(index, now))
    }

    /// Tab affordance on mobile: brings the collapsed drawer back.
    pub fn expand_tab(&mut self, now: f64) -> bool {
        self.drawer.set_collapsed(false, now)
    }

    pub fn set_viewport_width(&mut self, width: f32, now: f64) {
        self.drawer.set_viewport_width(width, now);
        if !self.drawer.is_narrow() && self.drawer.state().is_collapsed {
            self.expand_tab(now);
        }
    }

    pub fn begin_drag(&mut self, pointer_x: f32) -> bool {
        self.drawer.begin_drag(pointer_x)
    }

    pub fn drag_to(&mut self, pointer_x: f32) {
        self.drawer.drag_to(pointer_x);
    }

    pub fn end_drag(&mut self) {
        self.drawer.end_drag();
    }

    pub fn active_project(&self) -> Option<&Project> {
        self.active_project.and_then(|index| self.resume.projects.get(index))
    }

    pub fn open_project(&mut self, index: usize) -> bool {
        if index >= self.resume.projects.len() {
            return false;
        }
        self.active_project = Some(index);
        true
    }

    pub fn close_project(&mut self) {
        self.active_project = None;
    }

    pub fn tick(&mut self, now: f64) {
        for event in self.drawer.tick(now) {
            match event {
                DrawerEvent::Opened => debug!("Drawer settled"),
                DrawerEvent::Closed => self.on_drawer_closed(now),
            }
        }

        for timer in self.timers.due(now) {
            match timer {
                PageTimer::ShowMap => self.map_visible = true,
                PageTimer::HideMap => self.map_visible = false,
                PageTimer::SwapDetail => {
                    if let Some(index) = self.pending_detail.take() {
                        self.show_detail(index, now);
                    }
                }
                PageTimer::CollapseArm => {
                    self.timers.schedule(PageTimer::Collapse, now, COLLAPSE_DELAY_SECS);
                }
                PageTimer::Collapse => self.auto_collapse(now),
            }
        }
    }

    fn show_detail(&mut self, index: usize, now: f64) {
        self.selected = Some(index);
        self.detail = Some(index);
        self.detail_fade = DetailFade::FadingIn { since: now };
        self.publish(index);
    }

    fn publish(&mut self, index: usize) {
        if let Some(job) = self.resume.job(index) {
            debug!("Requesting map travel to {}", job.key);
            self.destination.set(Some(job.coordinates));
        }
    }

    fn on_drawer_closed(&mut self, now: f64) {
        info!("Drawer closed");
        self.selected = None;
        self.detail = None;
        self.pending_detail = None;
        self.detail_fade = DetailFade::Hidden;
        self.hero_visible = true;
        self.drawer.teardown();

        self.timers.cancel(PageTimer::ShowMap);
        self.timers.cancel(PageTimer::SwapDetail);
        self.timers.cancel(PageTimer::CollapseArm);
        self.timers.cancel(PageTimer::Collapse);
        self.timers.schedule(PageTimer::HideMap, now, HIDE_MAP_DELAY_SECS);
    }

    fn auto_collapse(&mut self, now: f64) {
        if !self.drawer.is_open() || !self.drawer.is_narrow() {
            return;
        }
        if !self.drawer.set_collapsed(true, now) && !self.drawer.state().is_collapsed {
            self.timers.schedule(PageTimer::Collapse, now, COLLAPSE_RETRY_SECS);
        }
    }
}
