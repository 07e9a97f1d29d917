// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Vault list: stored credentials with their current codes.

use eframe::egui;

use crate::logic::otp;
use crate::models::password::Password;

/// UI model for the credential list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasswordsModel {
    passwords: Vec<Password>,
    filter: String,
}

/// Messages emitted by the list view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PasswordsMsg {
    FilterChanged(String),
    Loaded(Vec<Password>),
}

impl PasswordsModel {
    pub fn len(&self) -> usize {
        self.passwords.len()
    }

    /// Filtered credentials, pinned first, then by issuer and account.
    pub fn visible(&self) -> Vec<&Password> {
        let needle = self.filter.trim().to_lowercase();
        let mut visible: Vec<&Password> = self
            .passwords
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.issuer.to_lowercase().contains(&needle)
                    || p.account.to_lowercase().contains(&needle)
            })
            .collect();
        visible.sort_by_cached_key(|p| {
            (
                !p.pinned,
                p.issuer.to_lowercase(),
                p.account.to_lowercase(),
            )
        });
        visible
    }
}

pub fn update(model: &mut PasswordsModel, msg: PasswordsMsg) {
    match msg {
        PasswordsMsg::FilterChanged(text) => model.filter = text,
        PasswordsMsg::Loaded(passwords) => model.passwords = passwords,
    }
}

/// Render the list and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &PasswordsModel, unix_time: i64) -> Vec<PasswordsMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.label(egui_phosphor::regular::MAGNIFYING_GLASS);
        let mut filter = model.filter.clone();
        if ui
            .add(egui::TextEdit::singleline(&mut filter).hint_text("Search issuer or account"))
            .changed()
        {
            msgs.push(PasswordsMsg::FilterChanged(filter));
        }
    });
    ui.add_space(8.0);

    if model.passwords.is_empty() {
        ui.label(
            egui::RichText::new("No passwords yet. Import a Raivo OTP export to get started.")
                .italics()
                .color(egui::Color32::from_gray(110)),
        );
        return msgs;
    }

    let visible = model.visible();
    if visible.is_empty() {
        ui.label(
            egui::RichText::new("No passwords match the search.")
                .italics()
                .color(egui::Color32::from_gray(110)),
        );
        return msgs;
    }

    egui::Grid::new("passwords_grid")
        .num_columns(3)
        .striped(true)
        .spacing(egui::vec2(12.0, 8.0))
        .show(ui, |ui| {
            for password in visible {
                render_row(ui, password, unix_time);
                ui.end_row();
            }
        });

    msgs
}

fn render_row(ui: &mut egui::Ui, password: &Password, unix_time: i64) {
    ui.horizontal(|ui| {
        if password.pinned {
            ui.label(egui_phosphor::regular::PUSH_PIN)
                .on_hover_text("Pinned");
        }
        ui.label(password.display_name());
    });

    match otp::code_for(password, unix_time) {
        Ok(code) => {
            ui.label(egui::RichText::new(format_code(&code)).monospace().strong());
        }
        Err(err) => {
            ui.label(egui::RichText::new("invalid").color(egui::Color32::from_rgb(200, 60, 60)))
                .on_hover_text(err.to_string());
        }
    }

    match otp::seconds_remaining(password, unix_time) {
        Some(seconds) => ui.label(format!("{seconds}s")),
        None => ui.label(format!("#{}", password.counter)),
    };
}

/// Split a code in two halves for readability (`123 456`).
fn format_code(code: &str) -> String {
    if code.len() < 6 {
        return code.to_string();
    }
    let (head, tail) = code.split_at(code.len() / 2);
    format!("{head} {tail}")
}
