use std::time::Duration;

use arboard::Clipboard;
use ballot_core::{BallotPhase, SelectionEngine};
use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{BallotConfig, Candidate};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{
    apply_ballot_action, candidate_card_state, submit_button_label, AssistantPanelState,
    BallotAction,
};
use crate::settings::Settings;
use crate::ui::panels::{self, AssistantPanelAction};
use crate::ui::{theme, widgets};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub ballot: BallotConfig,
    pub assistant_configured: bool,
}

impl StartupConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            ballot: settings.ballot.clone(),
            assistant_configured: settings.assistant_api_key.is_some(),
        }
    }
}

#[derive(Debug, Clone)]
struct StatusBanner {
    message: String,
}

pub struct BallotApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    candidates: Vec<Candidate>,
    engine: SelectionEngine,
    submitted_at: Option<DateTime<Local>>,

    assistant: AssistantPanelState,
    assistant_configured: bool,

    status: String,
    status_banner: Option<StatusBanner>,
    visuals_applied: bool,
}

impl BallotApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            engine: SelectionEngine::new(&startup.ballot),
            candidates: startup.ballot.candidates,
            submitted_at: None,
            assistant: AssistantPanelState::default(),
            assistant_configured: startup.assistant_configured,
            status: "Starting".to_string(),
            status_banner: None,
            visuals_applied: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::AssistantReplied { request_id, result } => {
                    if !self.assistant.finish(request_id, result) {
                        tracing::debug!(request_id, "dropping stale assistant reply");
                    }
                }
                UiEvent::Error(err) => self.show_error(err),
            }
        }
    }

    fn show_error(&mut self, err: UiError) {
        tracing::error!(context = ?err.context(), "{}", err.message());
        self.status_banner = Some(StatusBanner {
            message: format!("{} error: {}", err_label(err.category()), err.message()),
        });
    }

    fn apply(&mut self, action: BallotAction) {
        let transition = apply_ballot_action(&mut self.engine, action);
        if let Some(note) = transition.status_note() {
            self.status = note.to_string();
        }
        if transition.vote_accepted() {
            self.submitted_at = Some(Local::now());
        }
        if action == BallotAction::Reset {
            self.submitted_at = None;
        }
    }

    fn ask_assistant(&mut self) {
        let Some((request_id, query)) = self.assistant.begin_ask() else {
            return;
        };
        let queued = dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::AskAssistant { request_id, query },
            &mut self.status,
        );
        if !queued {
            self.assistant.abort(request_id);
            self.show_error(UiError::from_message(UiErrorContext::Assistant, self.status.clone()));
        }
    }

    fn copy_assistant_response(&mut self) {
        let Some(text) = self.assistant.response().map(str::to_string) else {
            return;
        };
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => self.status = "Answer copied to clipboard".to_string(),
            Err(err) => {
                tracing::warn!("clipboard unavailable: {err}");
                self.status = "Clipboard unavailable".to_string();
            }
        }
    }

    fn required_candidate(&self) -> Option<&Candidate> {
        let required = self.engine.required_candidate();
        self.candidates.iter().find(|c| c.id == required)
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(banner) = self.status_banner.clone() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.status_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(8.0);
        }
    }

    fn show_ballot_screen(&mut self, ctx: &egui::Context) {
        let mut pending: Vec<BallotAction> = Vec::new();
        let mut assistant_action = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("National Election").strong().size(44.0));
                    let remaining = self
                        .engine
                        .vote_limit()
                        .saturating_sub(self.engine.selection_count());
                    ui.label(
                        egui::RichText::new(format!(
                            "Cast up to {} votes · {remaining} remaining",
                            self.engine.vote_limit()
                        ))
                        .weak()
                        .size(18.0),
                    );
                });
                ui.add_space(20.0);

                self.show_status_banner(ui);

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = egui::vec2(16.0, 16.0);
                    for candidate in &self.candidates {
                        let state = candidate_card_state(&self.engine, candidate.id);
                        let response = widgets::candidate_card(ui, candidate, state);
                        if response.clicked() && state.enabled {
                            pending.push(BallotAction::Toggle(candidate.id));
                        }
                    }
                });

                ui.add_space(24.0);
                ui.vertical_centered(|ui| {
                    ui.set_max_width(560.0);

                    if self.engine.should_show_warning() {
                        panels::required_selection_warning(ui, self.required_candidate());
                        ui.add_space(16.0);
                    }

                    let submit = egui::Button::new(
                        egui::RichText::new(submit_button_label(&self.engine))
                            .strong()
                            .size(20.0),
                    )
                    .fill(theme::ACCENT)
                    .min_size(egui::vec2(ui.available_width(), 52.0));
                    if ui.add_enabled(self.engine.can_submit(), submit).clicked() {
                        pending.push(BallotAction::Submit);
                    }

                    ui.add_space(6.0);
                    ui.small(egui::RichText::new(&self.status).weak());
                    ui.add_space(24.0);

                    assistant_action = panels::assistant_panel(
                        ui,
                        &mut self.assistant,
                        self.assistant_configured,
                    );
                });
                ui.add_space(24.0);
            });
        });

        for action in pending {
            self.apply(action);
        }
        match assistant_action {
            Some(AssistantPanelAction::Ask) => self.ask_assistant(),
            Some(AssistantPanelAction::CopyResponse) => self.copy_assistant_response(),
            None => {}
        }
    }

    fn show_confirmation_screen(&mut self, ctx: &egui::Context) {
        let mut reset_requested = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            ui.add_space((avail.y * 0.18).clamp(18.0, 140.0));

            ui.vertical_centered(|ui| {
                ui.set_width(avail.x.clamp(360.0, 520.0));
                egui::Frame::NONE
                    .fill(theme::CARD_FILL)
                    .stroke(egui::Stroke::new(1.0, theme::SUCCESS.gamma_multiply(0.4)))
                    .corner_radius(24.0)
                    .inner_margin(egui::Margin::symmetric(32, 28))
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.label(egui::RichText::new("🗳").size(56.0));
                            ui.label(
                                egui::RichText::new("Vote recorded!")
                                    .strong()
                                    .size(34.0)
                                    .color(theme::SUCCESS),
                            );
                            ui.label(
                                egui::RichText::new(
                                    "Thank you for taking part in democracy. Your choice has been recorded.",
                                )
                                .weak(),
                            );
                            if let Some(at) = self.submitted_at {
                                ui.small(format!("Confirmed at {}", at.format("%H:%M:%S")));
                            }

                            ui.add_space(12.0);
                            for id in self.engine.selected() {
                                if let Some(candidate) = self.candidates.iter().find(|c| c.id == *id) {
                                    ui.label(format!(
                                        "{} {}",
                                        candidate.icon_glyph, candidate.display_name
                                    ));
                                }
                            }

                            ui.add_space(16.0);
                            if ui
                                .add(
                                    egui::Button::new("Start again")
                                        .min_size(egui::vec2(180.0, 40.0)),
                                )
                                .clicked()
                            {
                                reset_requested = true;
                            }
                        });
                    });
            });
        });

        if reset_requested {
            self.apply(BallotAction::Reset);
        }
    }
}

impl eframe::App for BallotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if !self.visuals_applied {
            ctx.set_visuals(theme::ballot_visuals());
            self.visuals_applied = true;
        }

        match self.engine.phase() {
            BallotPhase::Submitted => self.show_confirmation_screen(ctx),
            BallotPhase::Selecting { .. } => self.show_ballot_screen(ctx),
        }

        if self.assistant.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
