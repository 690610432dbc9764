#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod assets;
mod colors;
mod constants;
mod map_canvas;
mod ui;

use assets::{ContentLoadState, LoadedContent, register_images, spawn_content_loader};
use clap::Parser;
use constants::DEFAULT_WINDOW_SIZE;
use eframe::egui;
use folio::animator::MapAnimator;
use folio::map_view::{MapLoadError, MapView};
use folio::page::PageController;
use folio::signal::Observer;
use folio::widget::MAX_ZOOM;
use folio::{Atlas, Resume};
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

/// Career map portfolio.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Resume file (.ron or .json) to show instead of the bundled one
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Initial window width
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE[0])]
    width: f32,

    /// Initial window height
    #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE[1])]
    height: f32,
}

/// Main application state: the page controller plus the map it drives.
pub struct PortfolioApp {
    content: ContentLoadState,
    atlas: Option<Result<Arc<Atlas>, String>>,
    page: PageController,
    animator: MapAnimator<MapView>,
    destination: Observer,
}

impl PortfolioApp {
    fn new(cc: &eframe::CreationContext<'_>, args: Args) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let page = PageController::new(Resume::default(), args.width);
        let destination = Observer::following(page.destination());

        Self {
            content: spawn_content_loader(&cc.egui_ctx, args.resume),
            atlas: None,
            animator: MapAnimator::new(page.resume().origin),
            page,
            destination,
        }
    }

    /// Picks up the background load once it lands.
    fn poll_content(&mut self, ctx: &egui::Context) {
        let ContentLoadState::Loading(rx) = &self.content else {
            return;
        };

        let content = match rx.try_recv() {
            Ok(content) => content,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                log::error!("Content loader exited without a result");
                LoadedContent {
                    resume: Ok(Resume::default()),
                    atlas: Err(assets::AtlasError::NotFound),
                }
            }
        };
        self.content = ContentLoadState::Ready;

        let resume = content.resume.unwrap_or_else(|err| {
            log::error!("Failed to load resume: {err}");
            Resume::default()
        });
        log::info!("Loaded resume with {} jobs", resume.jobs.len());
        register_images(ctx, &resume);

        self.atlas = Some(content.atlas.map_err(|err| err.to_string()));
        let width = viewport_width(ctx);
        self.animator = MapAnimator::new(resume.origin);
        self.page = PageController::new(resume, width);
        self.destination = Observer::following(self.page.destination());
    }

    fn is_loading(&self) -> bool {
        matches!(self.content, ContentLoadState::Loading(_))
    }

    /// Mounts the map when the page shows it and unmounts it when hidden.
    fn sync_map(&mut self) {
        if self.page.map_visible() {
            if !self.animator.is_attached()
                && !self.animator.is_loading()
                && !self.animator.load_failed()
            {
                self.animator.begin_loading();
                self.animator.attach(self.build_map());
            }
        } else if self.animator.is_attached() {
            self.animator.detach();
        }

        if let Some(&Some(destination)) = self.destination.changed(self.page.destination()) {
            self.animator.set_destination(destination);
        }
    }

    fn build_map(&self) -> Result<MapView, MapLoadError> {
        let atlas = match &self.atlas {
            Some(Ok(atlas)) => Arc::clone(atlas),
            Some(Err(err)) => return Err(MapLoadError::AtlasUnavailable(err.clone())),
            None => return Err(MapLoadError::AtlasUnavailable("still loading".into())),
        };
        MapView::new(atlas, self.page.resume().origin, MAX_ZOOM)
    }

    fn needs_repaint(&self, now: f64) -> bool {
        self.page.needs_frames(now)
            || self.animator.is_animating()
            || self.animator.widget().is_some_and(MapView::is_moving)
    }
}

/// Width the drawer lays itself out against, inside any safe-area insets.
fn viewport_width(ctx: &egui::Context) -> f32 {
    ctx.content_rect().width()
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_content(ctx);

        let now = ctx.input(|i| i.time);
        self.page.set_viewport_width(viewport_width(ctx), now);
        self.handle_keyboard_input(ctx, now);

        self.page.tick(now);
        self.sync_map();
        self.animator.tick(now);

        self.show_central_panel(ctx, now);
        self.show_drawer(ctx, now);
        self.show_collapsed_tab(ctx, now);
        self.show_project_modal(ctx);

        if self.needs_repaint(now) {
            ctx.request_repaint();
        }
    }
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Folio",
        options,
        Box::new(|cc| Ok(Box::new(PortfolioApp::new(cc, args)))),
    )
}
