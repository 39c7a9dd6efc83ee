//! Application style configuration

use eframe::egui;

const FONT_SIZE: f32 = 14.0;

/// Configure initial application styles
pub fn configure_styles(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    // Dark theme
    style.visuals = egui::Visuals::dark();

    // Rounding
    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.menu_corner_radius = egui::CornerRadius::same(4);
    style.visuals.widgets.inactive.corner_radius = egui::CornerRadius::same(3);
    style.visuals.widgets.hovered.corner_radius = egui::CornerRadius::same(3);
    style.visuals.widgets.active.corner_radius = egui::CornerRadius::same(3);

    // Spacing
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);
    style.spacing.button_padding = egui::vec2(6.0, 3.0);

    style.visuals.panel_fill = egui::Color32::from_rgb(30, 30, 34);
    style.visuals.selection.bg_fill = egui::Color32::from_rgb(140, 90, 30);

    for (text_style, size) in [
        (egui::TextStyle::Body, FONT_SIZE),
        (egui::TextStyle::Button, FONT_SIZE),
        (egui::TextStyle::Small, FONT_SIZE * 0.85),
        (egui::TextStyle::Heading, FONT_SIZE * 1.3),
    ] {
        style
            .text_styles
            .insert(text_style, egui::FontId::proportional(size));
    }
    style
        .text_styles
        .insert(egui::TextStyle::Monospace, egui::FontId::monospace(FONT_SIZE));

    ctx.set_style(style);
}
