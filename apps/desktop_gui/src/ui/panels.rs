//! Secondary panels on the ballot screen: the required-selection warning and
//! the election assistant.

use eframe::egui;
use shared::domain::Candidate;

use crate::controller::reducer::AssistantPanelState;
use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantPanelAction {
    Ask,
    CopyResponse,
}

pub fn required_selection_warning(ui: &mut egui::Ui, required: Option<&Candidate>) {
    let (symbol, glyph) = required
        .map(|c| (c.symbol_label.as_str(), c.icon_glyph.as_str()))
        .unwrap_or(("required candidate", ""));

    egui::Frame::NONE
        .fill(theme::WARNING.gamma_multiply(0.12))
        .stroke(egui::Stroke::new(1.0, theme::WARNING.gamma_multiply(0.6)))
        .corner_radius(14.0)
        .inner_margin(egui::Margin::symmetric(20, 16))
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!("\"No {symbol}, No vote\""))
                        .italics()
                        .strong()
                        .size(30.0)
                        .color(theme::WARNING),
                );
                ui.label(
                    egui::RichText::new(format!(
                        "To confirm your vote you must select the {symbol} ({glyph})."
                    ))
                    .color(theme::lighten_color(theme::WARNING, 0.3)),
                );
            });
        });
}

pub fn assistant_panel(
    ui: &mut egui::Ui,
    panel: &mut AssistantPanelState,
    configured: bool,
) -> Option<AssistantPanelAction> {
    let mut action = None;

    egui::Frame::NONE
        .fill(theme::CARD_FILL)
        .stroke(egui::Stroke::new(1.0, theme::ACCENT.gamma_multiply(0.35)))
        .corner_radius(16.0)
        .inner_margin(egui::Margin::symmetric(16, 14))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new("🤖 AI Election Assistant")
                    .strong()
                    .size(18.0)
                    .color(theme::lighten_color(theme::ACCENT, 0.3)),
            );
            if !configured {
                ui.small(
                    egui::RichText::new("No assistant credential configured; answers are unavailable.")
                        .weak(),
                );
            }
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                let button_width = 110.0;
                let edit = egui::TextEdit::singleline(&mut panel.query)
                    .id_salt("assistant_query")
                    .hint_text("Ask about democratic voting...")
                    .desired_width(ui.available_width() - button_width - 8.0);
                let edit_resp = ui.add(edit);

                let enter_pressed = edit_resp.lost_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));

                let btn = egui::Button::new(egui::RichText::new(panel.ask_label()).strong())
                    .fill(theme::ACCENT)
                    .min_size(egui::vec2(button_width, 28.0));
                let clicked = ui.add_enabled(!panel.is_loading(), btn).clicked();

                if (clicked || enter_pressed) && !panel.is_loading() {
                    action = Some(AssistantPanelAction::Ask);
                }
            });

            if panel.is_loading() {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Waiting for the assistant...");
                });
            }

            if let Some(response) = panel.response() {
                ui.add_space(8.0);
                egui::Frame::NONE
                    .fill(egui::Color32::from_white_alpha(8))
                    .corner_radius(10.0)
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(response).italics());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("Copy").clicked() {
                                action = Some(AssistantPanelAction::CopyResponse);
                            }
                        });
                    });
            }
        });

    action
}
