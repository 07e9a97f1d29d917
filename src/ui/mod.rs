// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Top-level egui application shell for the OTP vault.
//! Handles layout, screen switching, soft-keyboard emulation, and wiring to
//! the background command workers.

pub mod components;

use std::time::Duration;

use eframe::egui;

use crate::config::{AppConfig, SoftKeyboardConfig};
use crate::logic::keyboard::{KeyboardEvent, KeyboardNotification};
use crate::mvu::{self, AppModel, Command, CommandContext, Msg, Screen};
use crate::ui::components::{import, keyboard_inset, passwords};

/// Stateful egui application for browsing and importing OTP credentials.
pub struct OtpVaultApp {
    model: AppModel,
    inbox: Vec<Msg>,
    soft_keyboard: SoftKeyboardConfig,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl OtpVaultApp {
    /// Build the app from loaded settings.
    ///
    /// Spawns between two and four command workers (bounded by available
    /// parallelism) sharing one command queue, registers both screens for
    /// keyboard insets with the configured safe area, and queues an initial
    /// reload of the stored passwords.
    pub fn new(config: &AppConfig) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();
        let context = CommandContext::from(config);

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let context = context.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, &context);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        Self {
            model: AppModel::new(config.soft_keyboard.safe_area_bottom),
            inbox: vec![Msg::ReloadRequested],
            soft_keyboard: config.soft_keyboard.clone(),
            cmd_tx,
            msg_rx,
        }
    }
}

impl eframe::App for OtpVaultApp {
    /// Advances the model by one frame before anything is drawn.
    ///
    /// This method:
    /// - Drains messages produced by the command workers into the inbox and
    ///   decrements the pending command counter for each.
    /// - Feeds the UI clock to the model so running inset animations advance,
    ///   and, when soft-keyboard emulation is enabled, posts a keyboard
    ///   notification derived from whether a text field has focus.
    /// - Applies every queued message in arrival order, sending resulting
    ///   commands to the worker pool and counting them as pending.
    ///
    /// Messages produced by the views during [`Self::ui`] are queued and applied
    /// here on the next frame.
    fn logic(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        self.inbox.push(Msg::FrameTick(ctx.input(|i| i.time)));
        if self.soft_keyboard.enabled {
            let msg = self.soft_keyboard_msg(ctx);
            self.inbox.push(msg);
        }

        // Apply in arrival order.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }
    }

    /// Renders the frame from the current model.
    ///
    /// Lays out the top bar (navigation and theme switch), the error modal when
    /// an error is pending, the status bar, the bottom keyboard inset of the
    /// active screen, and finally the active screen in a scrollable central
    /// panel. Repaints continuously while an inset animates or messages are
    /// queued, and twice a second otherwise so TOTP countdowns stay current.
    fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        egui::Panel::top("top_bar").show_inside(ui, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                self.render_navigation(ui);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::widgets::global_theme_preference_switch(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ui.ctx());

        egui::Panel::bottom("status_panel")
            .resizable(false)
            .show_inside(ui, |ui| {
                self.render_status(ui);
            });

        if let Some(inset) = self.model.insets.get(&self.model.screen.id()) {
            keyboard_inset::view(ui, inset);
        }

        egui::CentralPanel::default().show_inside(ui, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| match self.model.screen {
                Screen::Vault => {
                    let now = unix_now();
                    let msgs = passwords::view(ui, &self.model.passwords, now);
                    self.inbox.extend(msgs.into_iter().map(Msg::Passwords));
                }
                Screen::Import => {
                    let msgs = import::view(ui, &self.model.import);
                    self.inbox.extend(msgs.into_iter().map(Msg::Import));
                }
            });
        });

        if self.model.insets.any_animating() || !self.inbox.is_empty() {
            ui.ctx().request_repaint();
        } else {
            // Keep TOTP countdowns and worker results flowing.
            ui.ctx().request_repaint_after(Duration::from_millis(500));
        }
    }
}

impl OtpVaultApp {
    /// Emulated keyboard notification for this frame.
    ///
    /// Posted every frame; the tracker collapses repeats into one transition.
    fn soft_keyboard_msg(&self, ctx: &egui::Context) -> Msg {
        let notification = if ctx.wants_keyboard_input() {
            KeyboardNotification::WillShow
        } else {
            KeyboardNotification::WillHide
        };

        let viewport = ctx.content_rect();
        let height = self.soft_keyboard.height;
        let end_frame = egui::Rect::from_min_size(
            egui::pos2(0.0, viewport.height() - height),
            egui::vec2(viewport.width(), height),
        );

        Msg::Keyboard {
            notification,
            event: KeyboardEvent {
                end_frame: Some(end_frame),
                animation_duration: Some(self.soft_keyboard.animation_duration),
                animation_curve: Some(self.soft_keyboard.animation_curve),
            },
        }
    }

    fn render_navigation(&mut self, ui: &mut egui::Ui) {
        match self.model.screen {
            Screen::Vault => {
                ui.heading("OTP Vault");
                ui.separator();
                let button = egui::Button::new(format!(
                    "{} Import archive",
                    egui_phosphor::regular::DOWNLOAD_SIMPLE
                ));
                if ui.add(button).clicked() {
                    self.inbox.push(Msg::Navigate(Screen::Import));
                }
            }
            Screen::Import => {
                let back = egui::Button::new(format!("{} Back", egui_phosphor::regular::ARROW_LEFT));
                if ui.add_enabled(!self.model.import.is_running(), back).clicked() {
                    self.inbox.push(Msg::Navigate(Screen::Vault));
                }
                ui.separator();
                ui.heading("Import");
            }
        }
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status message and stored count.
    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(format!("{} password(s)", self.model.passwords.len()))
                    .color(egui::Color32::from_gray(110)),
            );
            if let Some(text) = &self.model.status {
                ui.separator();
                ui.label(egui::RichText::new(text).color(egui::Color32::from_gray(68)));
            }
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                    "{} task(s) running in background",
                    self.model.pending_commands
                ));
            }
        });
    }
}

fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
