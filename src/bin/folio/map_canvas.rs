//! Painting and pointer input for the map layer.

use crate::colors;
use crate::constants::{GRATICULE_STEP_DEG, LABEL_CULL_MARGIN, MARKER_RADIUS};
use eframe::egui;
use folio::geo::MERCATOR_MAX_LAT;
use folio::map_view::MapView;
use folio::{ElementType, FeatureType, LatLng, Place};

/// Paints the whole map into the available space and feeds gestures back to the view.
pub fn show_map(ui: &mut egui::Ui, view: &mut MapView, opacity: f32) {
    let (viewport_rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    view.set_viewport_size(
        f64::from(viewport_rect.width()),
        f64::from(viewport_rect.height()),
    );

    handle_gestures(ui, view, viewport_rect, &response);

    let painter = ui.painter_at(viewport_rect);
    let fade = |color: egui::Color32| color.gamma_multiply(opacity);
    let to_screen = |point: LatLng| {
        let (x, y) = view.project(point);
        viewport_rect.center() + egui::vec2(x as f32, y as f32)
    };

    painter.rect_filled(viewport_rect, 0.0, fade(colors::MAP_BACKGROUND));
    draw_graticule(&painter, viewport_rect, &to_screen, fade(colors::GRATICULE));

    let atlas = view.atlas();
    let styles = view.styles();

    for ring in &atlas.land {
        let points: Vec<egui::Pos2> = ring.iter().copied().map(to_screen).collect();
        painter.add(egui::Shape::closed_line(
            points,
            egui::Stroke::new(1.5, fade(colors::COASTLINE)),
        ));
    }

    if styles.is_visible(FeatureType::Road, ElementType::Geometry) {
        for road in &atlas.roads {
            let points: Vec<egui::Pos2> = road.path.iter().copied().map(to_screen).collect();
            painter.add(egui::Shape::line(
                points,
                egui::Stroke::new(2.0, fade(colors::ROAD)),
            ));
        }
    }

    if styles.is_visible(FeatureType::Road, ElementType::Labels) {
        for road in &atlas.roads {
            let Some(&anchor) = road.path.get(road.path.len() / 2) else {
                continue;
            };
            let pos = to_screen(anchor);
            if viewport_rect.expand(LABEL_CULL_MARGIN).contains(pos) {
                draw_label(&painter, pos, &road.name, 11.0, fade(colors::ROAD_LABEL_TEXT), opacity);
            }
        }
    }

    for place in &atlas.places {
        if !styles.is_visible(place.feature, ElementType::Labels) {
            continue;
        }
        let pos = to_screen(place.position);
        if !viewport_rect.expand(LABEL_CULL_MARGIN).contains(pos) {
            continue;
        }
        draw_place(&painter, pos, place, opacity);
    }

    if let Some((position, lift)) = view.marker_lift() {
        let ground = to_screen(position);
        draw_marker(&painter, ground, lift as f32, opacity);
    }
}

fn handle_gestures(
    ui: &egui::Ui,
    view: &mut MapView,
    viewport_rect: egui::Rect,
    response: &egui::Response,
) {
    if response.dragged() {
        let delta = response.drag_delta();
        view.pan_by(f64::from(delta.x), f64::from(delta.y));
    }

    let hover_pos = ui.input(|i| i.pointer.hover_pos());
    let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
    if scroll_delta == 0.0 || !hover_pos.is_some_and(|p| viewport_rect.contains(p)) {
        return;
    }

    let modifier_held = ui.input(|i| i.modifiers.command || i.modifiers.ctrl);
    let steps = if scroll_delta > 0.0 { 1 } else { -1 };
    view.wheel_zoom(steps, modifier_held);
}

fn draw_graticule(
    painter: &egui::Painter,
    viewport_rect: egui::Rect,
    to_screen: &impl Fn(LatLng) -> egui::Pos2,
    color: egui::Color32,
) {
    let stroke = egui::Stroke::new(1.0, color);
    let max_lat = MERCATOR_MAX_LAT.floor();

    let mut lng = -180.0;
    while lng <= 180.0 {
        let x = to_screen(LatLng::new(0.0, lng)).x;
        if viewport_rect.x_range().contains(x) {
            painter.vline(x, viewport_rect.y_range(), stroke);
        }
        lng += GRATICULE_STEP_DEG;
    }

    let mut lat = -80.0;
    while lat <= max_lat {
        let y = to_screen(LatLng::new(lat, 0.0)).y;
        if viewport_rect.y_range().contains(y) {
            painter.hline(viewport_rect.x_range(), y, stroke);
        }
        lat += GRATICULE_STEP_DEG;
    }
}

fn draw_place(painter: &egui::Painter, pos: egui::Pos2, place: &Place, opacity: f32) {
    let size = match place.feature {
        FeatureType::Country => 18.0,
        FeatureType::Province => 13.0,
        _ => 11.0,
    };

    if place.feature == FeatureType::Locality {
        painter.circle_filled(pos, 2.5, colors::CITY_DOT.gamma_multiply(opacity));
        draw_label(
            painter,
            pos + egui::vec2(0.0, -10.0),
            &place.name,
            size,
            colors::LABEL_TEXT.gamma_multiply(opacity),
            opacity,
        );
    } else {
        draw_label(
            painter,
            pos,
            &place.name,
            size,
            colors::LABEL_TEXT.gamma_multiply(opacity),
            opacity,
        );
    }
}

fn draw_label(
    painter: &egui::Painter,
    pos: egui::Pos2,
    text: &str,
    size: f32,
    color: egui::Color32,
    opacity: f32,
) {
    let font_id = egui::FontId::proportional(size);

    // Shadow
    painter.text(
        pos + egui::vec2(1.0, 1.0),
        egui::Align2::CENTER_CENTER,
        text,
        font_id.clone(),
        colors::LABEL_SHADOW.gamma_multiply(opacity),
    );
    painter.text(pos, egui::Align2::CENTER_CENTER, text, font_id, color);
}

/// Pin with its head `lift` pixels above the ground point.
fn draw_marker(painter: &egui::Painter, ground: egui::Pos2, lift: f32, opacity: f32) {
    let shadow_radius = (MARKER_RADIUS - lift * 0.02).max(3.0);
    painter.add(egui::Shape::ellipse_filled(
        ground,
        egui::vec2(shadow_radius, shadow_radius * 0.4),
        colors::MARKER_SHADOW.gamma_multiply(opacity),
    ));

    let head = ground - egui::vec2(0.0, MARKER_RADIUS * 2.2 + lift);
    let stroke = egui::Stroke::new(1.5, colors::MARKER_STROKE.gamma_multiply(opacity));
    painter.line_segment([head, ground - egui::vec2(0.0, lift)], stroke);
    painter.circle(
        head,
        MARKER_RADIUS,
        colors::MARKER_FILL.gamma_multiply(opacity),
        stroke,
    );
    painter.circle_filled(head, MARKER_RADIUS * 0.35, egui::Color32::WHITE.gamma_multiply(opacity));
}
