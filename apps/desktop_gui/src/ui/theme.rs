//! Palette and visuals for the ballot screens.

use eframe::egui;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(37, 99, 235);
pub const SELECTED: egui::Color32 = egui::Color32::from_rgb(52, 211, 153);
pub const WARNING: egui::Color32 = egui::Color32::from_rgb(244, 63, 94);
pub const SUCCESS: egui::Color32 = egui::Color32::from_rgb(16, 185, 129);
pub const CARD_FILL: egui::Color32 = egui::Color32::from_rgb(30, 41, 59);
pub const APP_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(15, 23, 42);

pub fn lighten_color(c: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round().clamp(0.0, 255.0) as u8
    };
    egui::Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}

pub fn ballot_visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = APP_BACKGROUND;
    visuals.window_fill = APP_BACKGROUND;
    visuals.extreme_bg_color = egui::Color32::from_rgb(2, 6, 23);
    visuals.faint_bg_color = CARD_FILL;
    visuals.hyperlink_color = ACCENT;
    visuals.selection.bg_fill = ACCENT;
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.hovered.bg_fill = ACCENT.gamma_multiply(0.85);
    visuals.window_corner_radius = egui::CornerRadius::same(12);
    visuals
}
