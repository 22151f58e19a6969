//! Candidate card widget.

use eframe::egui;
use shared::domain::Candidate;

use crate::controller::reducer::CandidateCardState;
use crate::ui::theme;

pub const CARD_SIZE: egui::Vec2 = egui::vec2(200.0, 150.0);

/// Draws one candidate card. The returned response only reports clicks when
/// the card is enabled.
pub fn candidate_card(
    ui: &mut egui::Ui,
    candidate: &Candidate,
    state: CandidateCardState,
) -> egui::Response {
    let (fill, stroke) = if state.selected {
        (
            theme::lighten_color(theme::CARD_FILL, 0.08),
            egui::Stroke::new(2.0, theme::SELECTED),
        )
    } else {
        (
            theme::CARD_FILL,
            egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color),
        )
    };

    let inner = ui.add_enabled_ui(state.enabled, |ui| {
        egui::Frame::NONE
            .fill(fill)
            .stroke(stroke)
            .corner_radius(14.0)
            .inner_margin(egui::Margin::symmetric(12, 10))
            .show(ui, |ui| {
                ui.set_min_size(CARD_SIZE);
                ui.set_max_width(CARD_SIZE.x);
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new(&candidate.icon_glyph).size(36.0));
                    ui.label(
                        egui::RichText::new(&candidate.display_name)
                            .strong()
                            .size(17.0),
                    );
                    ui.label(
                        egui::RichText::new(candidate.symbol_label.to_uppercase())
                            .small()
                            .weak(),
                    );
                    if state.selected {
                        ui.label(egui::RichText::new("✔ Selected").color(theme::SELECTED));
                    }
                });
            })
            .response
    });

    let response = inner.inner.interact(egui::Sense::click());
    if state.enabled {
        response.on_hover_cursor(egui::CursorIcon::PointingHand)
    } else {
        response.on_hover_cursor(egui::CursorIcon::NotAllowed)
    }
}
