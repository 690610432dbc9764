//! UI rendering methods for the portfolio application.

use crate::PortfolioApp;
use crate::assets::image_uri;
use crate::colors;
use crate::constants::{
    CITY_IMAGE_HEIGHT, COLLAPSED_TAB_SIZE, DRAG_HANDLE_WIDTH, LAYER_FADE_SECS, LOGO_HEIGHT,
};
use crate::map_canvas::show_map;
use eframe::egui;
use folio::drawer::Side;
use folio::page::PageState;

/// Something the drawer UI asked for, applied once painting is done.
enum DrawerAction {
    Close,
    Select(usize),
    Next,
    Previous,
    OpenProject(usize),
}

impl PortfolioApp {
    /// Escape closes the open project, then the drawer. Arrow keys walk the job list.
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context, now: f64) {
        let (escape, next, previous) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::ArrowUp),
            )
        });

        // The modal handles its own Escape
        if self.page.active_project().is_some() {
            return;
        }
        if escape {
            self.page.close_drawer(now);
        }
        if next {
            self.page.select_next(now);
        }
        if previous {
            self.page.select_previous(now);
        }
    }

    /// Renders the map layer with the hero text on top.
    pub fn show_central_panel(&mut self, ctx: &egui::Context, now: f64) {
        let map_opacity = ctx.animate_bool_with_time(
            egui::Id::new("map_layer"),
            self.page.map_visible(),
            LAYER_FADE_SECS,
        );

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                if let Some(view) = self.animator.widget_mut() {
                    show_map(ui, view, map_opacity);
                } else if self.page.map_visible() && !self.animator.load_failed() {
                    ui.centered_and_justified(|ui| ui.spinner());
                }
            });

        self.show_hero(ctx, now);
    }

    fn show_hero(&mut self, ctx: &egui::Context, now: f64) {
        let opacity = ctx.animate_bool_with_time(
            egui::Id::new("hero"),
            self.page.hero_visible(),
            LAYER_FADE_SECS,
        );
        if opacity <= 0.0 {
            return;
        }

        egui::Area::new(egui::Id::new("hero"))
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .interactable(self.page.hero_visible())
            .show(ctx, |ui| {
                ui.set_opacity(opacity);
                ui.vertical_centered(|ui| {
                    if self.is_loading() {
                        ui.spinner();
                        return;
                    }

                    let owner = &self.page.resume().owner;
                    if !owner.name.is_empty() {
                        let greeting = format!("Hello, I'm {}.", owner.name);
                        ui.heading(egui::RichText::new(greeting).size(40.0).strong());
                    }
                    ui.label(egui::RichText::new(&owner.headline).size(18.0));
                    if !owner.blurb.is_empty() {
                        ui.add_space(8.0);
                        ui.label(&owner.blurb);
                    }

                    if !self.page.resume().jobs.is_empty() {
                        ui.add_space(16.0);
                        if ui.button(egui::RichText::new("Résumé").size(18.0)).clicked() {
                            self.page.open_drawer(now);
                        }
                    }
                });
            });
    }

    /// Renders the drawer panel and its resize handle.
    pub fn show_drawer(&mut self, ctx: &egui::Context, now: f64) {
        let drawer = self.page.drawer();
        let width = drawer.width();
        if !drawer.is_open() || width <= 0.0 {
            return;
        }

        let screen = ctx.content_rect();
        let side = drawer.side();
        let left = match side {
            Side::Right => screen.right() - width,
            Side::Left => screen.left(),
        };
        let margin = 12.0;
        let mut actions = Vec::new();

        egui::Area::new(egui::Id::new("drawer"))
            .fixed_pos(egui::pos2(left, screen.top()))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(ui.visuals().panel_fill)
                    .inner_margin(margin)
                    .show(ui, |ui| {
                        ui.set_width((width - 2.0 * margin).max(0.0));
                        ui.set_min_height(screen.height() - 2.0 * margin);
                        self.show_drawer_content(ui, now, &mut actions);
                    });
            });

        let edge = match side {
            Side::Right => left,
            Side::Left => left + width,
        };
        self.show_drag_handle(ctx, screen, edge);

        for action in actions {
            match action {
                DrawerAction::Close => {
                    self.page.close_drawer(now);
                }
                DrawerAction::Select(index) => {
                    self.page.select_job(index, now);
                }
                DrawerAction::Next => {
                    self.page.select_next(now);
                }
                DrawerAction::Previous => {
                    self.page.select_previous(now);
                }
                DrawerAction::OpenProject(index) => {
                    self.page.open_project(index);
                }
            }
        }
    }

    fn show_drawer_content(&self, ui: &mut egui::Ui, now: f64, actions: &mut Vec<DrawerAction>) {
        let resume = self.page.resume();

        ui.horizontal(|ui| {
            ui.strong("Experience");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Close (Esc)").clicked() {
                    actions.push(DrawerAction::Close);
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, job) in resume.jobs.iter().enumerate() {
                let label = format!("{}  ·  {}", job.name, job.years);
                if ui
                    .selectable_label(self.page.selected() == Some(index), label)
                    .clicked()
                {
                    actions.push(DrawerAction::Select(index));
                }
            }

            ui.add_space(12.0);

            if let Some(job) = self.page.detail_job() {
                ui.scope(|ui| {
                    ui.set_opacity(self.page.detail_opacity(now));
                    ui.add(egui::Image::new(image_uri(&job.logo_asset)).max_height(LOGO_HEIGHT));
                    ui.heading(&job.name);
                    ui.weak(&job.years);
                    ui.add_space(6.0);
                    ui.label(&job.description);
                    ui.add_space(6.0);
                    ui.add(
                        egui::Image::new(image_uri(&job.city_image_asset))
                            .max_height(CITY_IMAGE_HEIGHT)
                            .corner_radius(4.0),
                    );
                });

                ui.horizontal(|ui| {
                    if ui.button("‹ Previous").clicked() {
                        actions.push(DrawerAction::Previous);
                    }
                    if ui.button("Next ›").clicked() {
                        actions.push(DrawerAction::Next);
                    }
                });
            }

            if !resume.projects.is_empty() {
                ui.add_space(12.0);
                ui.strong("Projects");
                ui.separator();
                for (index, project) in resume.projects.iter().enumerate() {
                    if ui
                        .link(&project.title)
                        .on_hover_text(&project.role)
                        .clicked()
                    {
                        actions.push(DrawerAction::OpenProject(index));
                    }
                }
            }
        });
    }

    /// Thin strip on the drawer's inner edge that resizes it by drag.
    fn show_drag_handle(&mut self, ctx: &egui::Context, screen: egui::Rect, edge: f32) {
        egui::Area::new(egui::Id::new("drawer_handle"))
            .fixed_pos(egui::pos2(edge - DRAG_HANDLE_WIDTH / 2.0, screen.top()))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                let (rect, response) = ui.allocate_exact_size(
                    egui::vec2(DRAG_HANDLE_WIDTH, screen.height()),
                    egui::Sense::drag(),
                );
                let response = response.on_hover_cursor(egui::CursorIcon::ResizeHorizontal);
                let pointer_x = response.interact_pointer_pos().map(|pos| pos.x);

                if response.drag_started()
                    && let Some(x) = pointer_x
                {
                    self.page.begin_drag(x);
                }
                if response.dragged()
                    && let Some(x) = pointer_x
                {
                    self.page.drag_to(x);
                }
                if response.drag_stopped() {
                    self.page.end_drag();
                }

                let color = if self.page.drawer().state().is_dragging {
                    colors::DRAG_HANDLE_ACTIVE
                } else {
                    colors::DRAG_HANDLE
                };
                let grip = egui::Rect::from_center_size(rect.center(), egui::vec2(3.0, 48.0));
                ui.painter().rect_filled(grip, 2.0, color);
            });
    }

    /// Tab that brings the collapsed drawer back on narrow windows.
    pub fn show_collapsed_tab(&mut self, ctx: &egui::Context, now: f64) {
        if self.page.state() != PageState::Collapsed {
            return;
        }

        egui::Area::new(egui::Id::new("collapsed_tab"))
            .anchor(egui::Align2::RIGHT_CENTER, egui::vec2(0.0, 0.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    if ui
                        .add_sized(COLLAPSED_TAB_SIZE, egui::Button::new("‹"))
                        .on_hover_text("Show résumé")
                        .clicked()
                    {
                        self.page.expand_tab(now);
                    }
                });
            });
    }

    /// Renders the project detail modal. Escape or a backdrop click closes it.
    pub fn show_project_modal(&mut self, ctx: &egui::Context) {
        let Some(project) = self.page.active_project().cloned() else {
            return;
        };

        let mut close = false;
        let modal = egui::Modal::new(egui::Id::new("project_modal")).show(ctx, |ui| {
            ui.set_width(480.0);
            ui.heading(&project.title);
            ui.weak(&project.role);
            if !project.technologies.is_empty() {
                ui.label(project.technologies.join(" · "));
            }
            ui.add_space(8.0);
            ui.label(&project.description);
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                if ui.button("Visit site ↗").clicked()
                    && let Err(err) = open::that(&project.link)
                {
                    log::warn!("Failed to open {}: {err}", project.link);
                }
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        });

        if close || modal.should_close() {
            self.page.close_project();
        }
    }
}
