// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Import screen for Raivo OTP export archives, in MVU shape.

use std::path::PathBuf;

use eframe::egui;

/// UI model for the import form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportModel {
    archive: Option<PathBuf>,
    password: String,
    running: bool,
}

/// Messages emitted by the import view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportMsg {
    RequestPickArchive,
    ArchivePicked(Option<PathBuf>),
    PasswordChanged(String),
    Submit,
    Completed(Result<usize, String>),
}

/// Side effects requested by the import form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportCommand {
    PickArchive,
    RunImport { archive: PathBuf, password: String },
}

/// User-facing feedback surfaced to the status bar or error modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportEvent {
    pub message: String,
    pub is_error: bool,
    /// Whether stored passwords changed and should be reloaded.
    pub imported: bool,
}

impl ImportEvent {
    fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            imported: false,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            imported: false,
        }
    }
}

impl ImportModel {
    pub fn archive(&self) -> Option<&PathBuf> {
        self.archive.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn can_submit(&self) -> bool {
        !self.running && self.archive.is_some() && !self.password.is_empty()
    }
}

/// Apply a message to the model. Returns a feedback event when relevant.
pub fn update(
    model: &mut ImportModel,
    msg: ImportMsg,
    cmds: &mut Vec<ImportCommand>,
) -> Option<ImportEvent> {
    match msg {
        ImportMsg::RequestPickArchive => {
            cmds.push(ImportCommand::PickArchive);
            None
        }
        ImportMsg::ArchivePicked(Some(path)) => {
            model.archive = Some(path);
            None
        }
        ImportMsg::ArchivePicked(None) => Some(ImportEvent::info("No archive selected.")),
        ImportMsg::PasswordChanged(text) => {
            model.password = text;
            None
        }
        ImportMsg::Submit => {
            if model.running {
                return None;
            }
            let Some(archive) = model.archive.clone() else {
                return Some(ImportEvent::error("Please choose an export archive."));
            };
            if model.password.is_empty() {
                return Some(ImportEvent::error("Please enter the archive password."));
            }
            model.running = true;
            cmds.push(ImportCommand::RunImport {
                archive,
                password: model.password.clone(),
            });
            Some(ImportEvent::info("Importing archive..."))
        }
        ImportMsg::Completed(Ok(count)) => {
            *model = ImportModel::default();
            Some(ImportEvent {
                message: format!("Imported {count} password(s)."),
                is_error: false,
                imported: true,
            })
        }
        ImportMsg::Completed(Err(reason)) => {
            model.running = false;
            Some(ImportEvent::error(format!("Import failed:\n\n{reason}")))
        }
    }
}

/// Render the import form and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &ImportModel) -> Vec<ImportMsg> {
    let mut msgs = Vec::new();

    ui.heading("Import Raivo OTP export");
    ui.label(
        egui::RichText::new(
            "Choose the ZIP archive exported by Raivo OTP and enter the password it was exported with.",
        )
        .small()
        .color(egui::Color32::from_gray(110)),
    );
    ui.add_space(12.0);

    egui::Grid::new("import_grid")
        .num_columns(2)
        .spacing(egui::vec2(8.0, 10.0))
        .min_col_width(120.0)
        .show(ui, |ui| {
            ui.label("Archive");
            ui.horizontal(|ui| {
                let picked = model
                    .archive
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "No file selected".into());
                ui.label(picked);
                if ui
                    .add_enabled(
                        !model.running,
                        egui::Button::new(format!(
                            "{} Choose…",
                            egui_phosphor::regular::FOLDER_OPEN
                        )),
                    )
                    .clicked()
                {
                    msgs.push(ImportMsg::RequestPickArchive);
                }
            });
            ui.end_row();

            ui.label("Password");
            let mut password = model.password.clone();
            let response = ui.add_enabled(
                !model.running,
                egui::TextEdit::singleline(&mut password)
                    .password(true)
                    .hint_text("Archive password"),
            );
            if response.changed() {
                msgs.push(ImportMsg::PasswordChanged(password));
            }
            if response.lost_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter))
                && model.can_submit()
            {
                msgs.push(ImportMsg::Submit);
            }
            ui.end_row();
        });

    ui.add_space(12.0);
    ui.horizontal(|ui| {
        let button = egui::Button::new(format!(
            "{} Import",
            egui_phosphor::regular::DOWNLOAD_SIMPLE
        ));
        if ui
            .add_enabled(model.can_submit(), button)
            .on_disabled_hover_text("Choose an archive and enter its password")
            .clicked()
        {
            msgs.push(ImportMsg::Submit);
        }
        if model.running {
            ui.add(egui::Spinner::new().size(14.0));
        }
    });

    msgs
}
