//! Drives the page controller, the animator and the map view together with a
//! simulated clock, the same way the app wires them up each frame.

use folio::animator::{MapAnimator, TravelOutcome};
use folio::map_view::{MapLoadError, MapView};
use folio::page::{PageController, PageState};
use folio::signal::Observer;
use folio::widget::{GestureHandling, MAX_ZOOM, MapWidget};
use folio::{Atlas, JobEntry, LatLng, Owner, Resume, StyleSet};
use std::sync::Arc;

const FRAME: f64 = 1.0 / 60.0;

const ORIGIN: LatLng = LatLng::new(41.0437, -74.2156);
const ATLANTA: LatLng = LatLng::new(33.749, -84.388);
const ALPHARETTA: LatLng = LatLng::new(34.0598, -84.2456);

fn job(key: &str, coordinates: LatLng) -> JobEntry {
    JobEntry {
        key: key.to_owned(),
        name: key.to_owned(),
        years: "2020 - 2024".to_owned(),
        description: String::new(),
        coordinates,
        logo_asset: format!("logos/{key}.svg"),
        city_image_asset: format!("cities/{key}.svg"),
    }
}

fn resume() -> Resume {
    Resume {
        owner: Owner {
            name: "Doug".into(),
            headline: "Engineer".into(),
            blurb: String::new(),
        },
        origin: ORIGIN,
        jobs: vec![job("rallyhere", ATLANTA), job("hirez", ALPHARETTA)],
        projects: Vec::new(),
    }
}

fn atlas() -> Arc<Atlas> {
    Arc::new(Atlas {
        land: vec![vec![
            LatLng::new(49.0, -124.0),
            LatLng::new(49.0, -67.0),
            LatLng::new(25.0, -80.0),
            LatLng::new(32.0, -117.0),
        ]],
        ..Default::default()
    })
}

struct Harness {
    now: f64,
    page: PageController,
    animator: MapAnimator<MapView>,
    destination: Observer,
    atlas: Option<Arc<Atlas>>,
    outcomes: Vec<TravelOutcome>,
}

impl Harness {
    fn new(viewport_width: f32, atlas: Option<Arc<Atlas>>) -> Self {
        let resume = resume();
        let animator = MapAnimator::new(resume.origin);
        let page = PageController::new(resume, viewport_width);
        let destination = Observer::following(page.destination());
        Self {
            now: 0.0,
            page,
            animator,
            destination,
            atlas,
            outcomes: Vec::new(),
        }
    }

    fn frame(&mut self) {
        self.now += FRAME;
        self.page.tick(self.now);

        if self.page.map_visible() {
            if !self.animator.is_attached() && !self.animator.load_failed() {
                self.animator.begin_loading();
                let widget = match &self.atlas {
                    Some(atlas) => MapView::new(Arc::clone(atlas), ORIGIN, MAX_ZOOM),
                    None => Err(MapLoadError::AtlasUnavailable("missing".into())),
                };
                self.animator.attach(widget);
            }
        } else if self.animator.is_attached() {
            self.animator.detach();
        }

        if let Some(&Some(destination)) = self.destination.changed(self.page.destination()) {
            let outcome = self.animator.set_destination(destination);
            self.outcomes.push(outcome);
        }

        self.animator.tick(self.now);
    }

    fn run_for(&mut self, secs: f64) {
        let until = self.now + secs;
        while self.now < until {
            self.frame();
        }
    }

    fn view(&self) -> &MapView {
        self.animator.widget().expect("map should be attached")
    }
}

#[test]
fn test_open_flies_to_first_job_and_close_hides_map() {
    let mut h = Harness::new(1280.0, Some(atlas()));

    assert!(h.page.open_drawer(h.now));
    assert_eq!(h.page.state(), PageState::JobSelected(0));
    assert_eq!(h.page.detail_job().map(|job| job.key.as_str()), Some("rallyhere"));

    h.run_for(0.2);
    assert!(h.page.map_visible());
    assert!(h.animator.is_attached());
    assert!(h.animator.is_animating());

    h.run_for(30.0);
    let state = h.animator.state();
    assert!(!state.is_animating);
    assert_eq!(state.last_visited, Some(ATLANTA));
    assert_eq!(state.current_zoom, Some(MAX_ZOOM));
    assert_eq!(state.current_style_set, StyleSet::RoadVisible);
    assert_eq!(h.view().marker(), Some(ATLANTA));
    assert_eq!(h.view().gesture_handling(), GestureHandling::Cooperative);

    // One request, deferred until the map came up and then flown as the intro
    assert_eq!(h.outcomes, vec![TravelOutcome::Deferred]);
    assert_eq!(h.page.destination().version(), 1);

    assert!(h.page.close_drawer(h.now));
    h.run_for(0.35);
    assert_eq!(h.page.state(), PageState::DrawerClosed);
    assert_eq!(h.page.selected(), None);
    assert!(h.page.map_visible());

    h.run_for(0.35);
    assert!(!h.page.map_visible());
    assert!(!h.animator.is_attached());
}

#[test]
fn test_reselecting_visited_job_bounces_marker() {
    let mut h = Harness::new(1280.0, Some(atlas()));
    h.page.open_drawer(h.now);
    h.run_for(30.0);

    assert!(h.page.select_job(0, h.now));
    h.run_for(0.1);
    assert_eq!(h.outcomes.last(), Some(&TravelOutcome::Bounced));
    assert!(!h.animator.is_animating());
    assert_eq!(h.view().marker(), Some(ATLANTA));
}

#[test]
fn test_selection_during_flight_is_dropped_then_honored_later() {
    let mut h = Harness::new(1280.0, Some(atlas()));
    h.page.open_drawer(h.now);
    h.run_for(1.0);
    assert!(h.animator.is_animating());

    assert!(h.page.select_job(1, h.now));
    h.run_for(0.5);
    assert_eq!(h.page.detail_job().map(|job| job.key.as_str()), Some("hirez"));
    assert_eq!(h.outcomes.last(), Some(&TravelOutcome::Ignored));

    h.run_for(30.0);
    assert_eq!(h.animator.state().last_visited, Some(ATLANTA));

    // Same key again once the map is idle: a normal trip
    assert!(h.page.select_job(1, h.now));
    h.run_for(0.1);
    assert_eq!(h.outcomes.last(), Some(&TravelOutcome::Started));
    assert!(h.animator.is_animating());

    h.run_for(30.0);
    assert_eq!(h.animator.state().last_visited, Some(ALPHARETTA));
    assert_eq!(h.view().marker(), Some(ALPHARETTA));
    let center = h.view().center().expect("map view always has a center");
    assert!((center.lat - ALPHARETTA.lat).abs() < 1e-6);
    assert!((center.lng - ALPHARETTA.lng).abs() < 1e-6);
}

#[test]
fn test_map_failure_leaves_page_working() {
    let mut h = Harness::new(1280.0, None);
    h.page.open_drawer(h.now);
    h.run_for(1.0);

    assert!(h.animator.load_failed());
    assert!(!h.animator.is_attached());
    assert!(!h.animator.is_loading());

    assert!(h.page.select_job(1, h.now));
    h.run_for(1.0);
    assert_eq!(h.page.state(), PageState::JobSelected(1));
    assert_eq!(h.outcomes.last(), Some(&TravelOutcome::Ignored));
}

#[test]
fn test_reopening_replays_intro() {
    let mut h = Harness::new(1280.0, Some(atlas()));
    h.page.open_drawer(h.now);
    h.run_for(30.0);
    h.page.close_drawer(h.now);
    h.run_for(1.0);
    assert!(!h.animator.is_attached());

    h.page.open_drawer(h.now);
    h.run_for(0.2);
    assert!(h.animator.is_animating());
    assert_eq!(h.view().marker(), None);

    h.run_for(30.0);
    assert_eq!(h.view().marker(), Some(ATLANTA));
}

#[test]
fn test_narrow_window_collapses_after_open() {
    let mut h = Harness::new(375.0, Some(atlas()));
    h.page.open_drawer(h.now);
    h.run_for(2.0);
    assert_eq!(h.page.state(), PageState::JobSelected(0));

    h.run_for(2.0);
    assert_eq!(h.page.state(), PageState::Collapsed);
    assert!(h.page.map_visible());

    assert!(h.page.expand_tab(h.now));
    h.run_for(1.0);
    assert_eq!(h.page.state(), PageState::JobSelected(0));
}
