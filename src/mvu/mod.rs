// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::logic::import::DataImport;
use crate::logic::keyboard::{KeyboardEvent, KeyboardInsetTracker, KeyboardNotification, ScreenId};
use crate::models::password::Password;
use crate::storage::{PasswordStore, SqliteStore};
use crate::ui::components::import::{self, ImportCommand, ImportModel, ImportMsg};
use crate::ui::components::keyboard_inset::ScreenInsets;
use crate::ui::components::passwords::{self, PasswordsModel, PasswordsMsg};

/// Screens the app can show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Vault,
    Import,
}

impl Screen {
    /// Identifier used for keyboard tracking.
    pub fn id(self) -> ScreenId {
        match self {
            Screen::Vault => ScreenId::new("vault"),
            Screen::Import => ScreenId::new("import"),
        }
    }
}

/// Top-level application state.
pub struct AppModel {
    /// Screen currently shown.
    pub screen: Screen,
    /// Stored credential list.
    pub passwords: PasswordsModel,
    /// Import form state.
    pub import: ImportModel,
    /// Keyboard visibility and listeners.
    pub keyboard: KeyboardInsetTracker,
    /// Per-screen keyboard insets.
    pub insets: ScreenInsets,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    /// Fresh model showing the vault, with its keyboard listeners attached.
    pub fn new(safe_area_bottom: f32) -> Self {
        let mut insets = ScreenInsets::default();
        insets.register(Screen::Vault.id(), safe_area_bottom);
        insets.register(Screen::Import.id(), safe_area_bottom);

        let mut keyboard = KeyboardInsetTracker::new();
        let vault = Screen::Vault.id();
        keyboard.attach(&vault, &vault);

        Self {
            screen: Screen::Vault,
            passwords: PasswordsModel::default(),
            import: ImportModel::default(),
            keyboard,
            insets,
            status: None,
            error: None,
            pending_commands: 0,
        }
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    Navigate(Screen),
    Keyboard {
        notification: KeyboardNotification,
        event: KeyboardEvent,
    },
    FrameTick(f64),
    DismissError,
    ReloadRequested,
    PasswordsLoaded(Result<Vec<Password>, String>),
    Passwords(PasswordsMsg),
    Import(ImportMsg),
}

/// Commands represent side-effects executed between frames.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    LoadPasswords,
    PickArchive,
    ImportArchive { archive: PathBuf, password: String },
}

/// Everything a worker needs to execute commands.
#[derive(Clone, Debug)]
pub struct CommandContext {
    pub database_path: PathBuf,
    pub cache_dir: PathBuf,
}

impl From<&AppConfig> for CommandContext {
    fn from(config: &AppConfig) -> Self {
        Self {
            database_path: config.database_path.clone(),
            cache_dir: config.cache_dir.clone(),
        }
    }
}

/// Update the application model and enqueue commands.
///
/// Component messages are delegated to their component `update`, and any
/// resulting component commands or events are lifted into app-level commands
/// and status/error messages. Navigation moves keyboard tracking to the new
/// screen, and a successful import reloads the vault and returns to it.
///
/// # Examples
///
/// ```ignore
/// let mut model = AppModel::default();
/// let mut cmds = Vec::new();
/// update(&mut model, Msg::ReloadRequested, &mut cmds);
/// assert_eq!(cmds, vec![Command::LoadPasswords]);
/// ```
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::Navigate(screen) => navigate(model, screen),
        Msg::Keyboard {
            notification,
            event,
        } => model.keyboard.post(notification, &event, &mut model.insets),
        Msg::FrameTick(now) => model.insets.tick(now),
        Msg::DismissError => model.error = None,
        Msg::ReloadRequested => cmds.push(Command::LoadPasswords),
        Msg::PasswordsLoaded(Ok(list)) => {
            passwords::update(&mut model.passwords, PasswordsMsg::Loaded(list));
        }
        Msg::PasswordsLoaded(Err(err)) => {
            surface_event(model, format!("Failed to load passwords:\n\n{err}"), true);
        }
        Msg::Passwords(m) => passwords::update(&mut model.passwords, m),
        Msg::Import(m) => {
            let mut import_cmds = Vec::new();
            if let Some(event) = import::update(&mut model.import, m, &mut import_cmds) {
                surface_event(model, event.message, event.is_error);
                if event.imported {
                    cmds.push(Command::LoadPasswords);
                    navigate(model, Screen::Vault);
                }
            }
            for c in import_cmds {
                match c {
                    ImportCommand::PickArchive => cmds.push(Command::PickArchive),
                    ImportCommand::RunImport { archive, password } => {
                        cmds.push(Command::ImportArchive { archive, password })
                    }
                }
            }
        }
    }
}

/// Shown when the local store cannot be opened or read; details go to the log.
pub const STORE_UNAVAILABLE: &str = "Could not open the password store.";

/// Execute a command synchronously and return a resulting message.
///
/// Runs on a worker thread. Opens the store per command so workers share no
/// connection. Store failures are logged and reported to the user as
/// [`STORE_UNAVAILABLE`]; import failures carry the [`ImportError`] message.
///
/// [`ImportError`]: crate::logic::import::ImportError
pub fn run_command(cmd: Command, ctx: &CommandContext) -> Msg {
    match cmd {
        Command::LoadPasswords => {
            let result = SqliteStore::open(&ctx.database_path).and_then(|store| store.list());
            Msg::PasswordsLoaded(result.map_err(|e| {
                tracing::error!("Could not load passwords: {e}");
                STORE_UNAVAILABLE.to_string()
            }))
        }
        Command::PickArchive => {
            let file = rfd::FileDialog::new()
                .set_title("Select Raivo OTP export archive")
                .add_filter("ZIP archive", &["zip"])
                .pick_file();
            Msg::Import(ImportMsg::ArchivePicked(file))
        }
        Command::ImportArchive { archive, password } => {
            let result = SqliteStore::open(&ctx.database_path)
                .map_err(|e| {
                    tracing::error!("Could not open password store: {e}");
                    STORE_UNAVAILABLE.to_string()
                })
                .and_then(|mut store| {
                    DataImport::new(&ctx.cache_dir)
                        .import_archive(&archive, &password, &mut store)
                        .map_err(|e| e.to_string())
                });
            Msg::Import(ImportMsg::Completed(result))
        }
    }
}

/// Switch screens, moving keyboard tracking along.
///
/// Leaving a screen detaches it, which reverts any inset it still carries.
fn navigate(model: &mut AppModel, screen: Screen) {
    if model.screen == screen {
        return;
    }

    let leaving = model.screen.id();
    if let Some(inset) = model.insets.get_mut(&leaving) {
        model.keyboard.detach(&leaving, &leaving, inset);
    }

    let entering = screen.id();
    model.keyboard.attach(&entering, &entering);
    model.screen = screen;
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::keyboard::InsetTarget;
    use eframe::egui::{Rect, pos2, vec2};
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::{AesMode, ZipWriter};

    fn show_event() -> KeyboardEvent {
        KeyboardEvent {
            end_frame: Some(Rect::from_min_size(pos2(0.0, 400.0), vec2(800.0, 280.0))),
            animation_duration: Some(0.25),
            animation_curve: Some(0),
        }
    }

    fn keyboard(notification: KeyboardNotification) -> Msg {
        Msg::Keyboard {
            notification,
            event: show_event(),
        }
    }

    fn context(tmp: &TempDir) -> CommandContext {
        CommandContext {
            database_path: tmp.path().join("vault.sqlite"),
            cache_dir: tmp.path().join("cache"),
        }
    }

    #[test]
    fn keyboard_show_applies_inset_to_current_screen() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, keyboard(KeyboardNotification::WillShow), &mut cmds);
        update(&mut model, Msg::FrameTick(10.0), &mut cmds);

        let vault = model.insets.get(&Screen::Vault.id()).unwrap();
        assert_eq!(vault.bottom_inset(), 280.0);
        assert_eq!(
            model.insets.get(&Screen::Import.id()).unwrap().bottom_inset(),
            0.0
        );
        assert!(cmds.is_empty());
    }

    #[test]
    fn navigating_away_reverts_inset_of_left_screen() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, keyboard(KeyboardNotification::WillShow), &mut cmds);
        update(&mut model, Msg::Navigate(Screen::Import), &mut cmds);

        let vault = model.insets.get(&Screen::Vault.id()).unwrap();
        assert_eq!(vault.bottom_inset(), 0.0);
        assert!(!model.keyboard.is_visible(&Screen::Vault.id()));

        // Only the import screen follows the keyboard now.
        update(&mut model, keyboard(KeyboardNotification::WillShow), &mut cmds);
        assert_eq!(
            model.insets.get(&Screen::Import.id()).unwrap().bottom_inset(),
            280.0
        );
        assert_eq!(
            model.insets.get(&Screen::Vault.id()).unwrap().bottom_inset(),
            0.0
        );
    }

    #[test]
    fn safe_area_is_taken_from_model_setup() {
        let mut model = AppModel::new(30.0);
        let mut cmds = Vec::new();

        update(&mut model, keyboard(KeyboardNotification::WillShow), &mut cmds);

        let vault = model.insets.get(&Screen::Vault.id()).unwrap();
        assert_eq!(vault.safe_area_bottom(), 30.0);
        assert_eq!(vault.bottom_inset(), 250.0);
    }

    #[test]
    fn import_submit_enqueues_import_command() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::Navigate(Screen::Import), &mut cmds);
        update(
            &mut model,
            Msg::Import(ImportMsg::ArchivePicked(Some(PathBuf::from("export.zip")))),
            &mut cmds,
        );
        update(
            &mut model,
            Msg::Import(ImportMsg::PasswordChanged("hunter2".into())),
            &mut cmds,
        );
        update(&mut model, Msg::Import(ImportMsg::Submit), &mut cmds);

        assert_eq!(
            cmds,
            vec![Command::ImportArchive {
                archive: PathBuf::from("export.zip"),
                password: "hunter2".into(),
            }]
        );
        assert_eq!(model.status.as_deref(), Some("Importing archive..."));
    }

    #[test]
    fn import_failure_sets_error_and_stays_on_import() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Screen::Import), &mut cmds);

        update(
            &mut model,
            Msg::Import(ImportMsg::Completed(Err("Password incorrect".into()))),
            &mut cmds,
        );

        assert!(model.error.as_deref().unwrap().contains("Password incorrect"));
        assert_eq!(model.screen, Screen::Import);
        assert!(cmds.is_empty());

        update(&mut model, Msg::DismissError, &mut cmds);
        assert!(model.error.is_none());
    }

    #[test]
    fn import_round_trip_through_worker_commands() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp);
        let archive = tmp.path().join("export.zip");
        {
            let mut zip = ZipWriter::new(File::create(&archive).unwrap());
            let options: FileOptions<'_, ()> =
                FileOptions::default().with_aes_encryption(AesMode::Aes256, "hunter2");
            zip.start_file("raivo-otp-export.json", options).unwrap();
            zip.write_all(
                br#"[{"issuer":"GitHub","account":"me","secret":"ABC123","algorithm":"SHA1","digits":"6","kind":"totp","timer":"30","counter":"0","pinned":"false","iconType":"none","iconValue":""}]"#,
            )
            .unwrap();
            zip.finish().unwrap();
        }

        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Screen::Import), &mut cmds);

        let msg = run_command(
            Command::ImportArchive {
                archive,
                password: "hunter2".into(),
            },
            &ctx,
        );
        update(&mut model, msg, &mut cmds);

        assert!(model.error.is_none());
        assert_eq!(model.status.as_deref(), Some("Imported 1 password(s)."));
        assert_eq!(model.screen, Screen::Vault);
        assert_eq!(cmds, vec![Command::LoadPasswords]);

        let msg = run_command(cmds.pop().unwrap(), &ctx);
        update(&mut model, msg, &mut cmds);

        assert_eq!(model.passwords.len(), 1);
        assert_eq!(model.passwords.visible()[0].issuer, "GitHub");
    }

    #[test]
    fn reload_requested_enqueues_load() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::ReloadRequested, &mut cmds);

        assert_eq!(cmds, vec![Command::LoadPasswords]);
    }

    #[test]
    fn load_from_unreachable_database_surfaces_error() {
        let tmp = TempDir::new().unwrap();
        // A directory where the database file should be cannot be opened.
        let ctx = CommandContext {
            database_path: tmp.path().to_path_buf(),
            cache_dir: tmp.path().join("cache"),
        };
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        let msg = run_command(Command::LoadPasswords, &ctx);
        update(&mut model, msg, &mut cmds);

        assert_eq!(
            model.error.as_deref(),
            Some(format!("Failed to load passwords:\n\n{STORE_UNAVAILABLE}").as_str())
        );
    }

    #[test]
    fn import_into_unreachable_database_reports_generic_message() {
        let tmp = TempDir::new().unwrap();
        let ctx = CommandContext {
            database_path: tmp.path().to_path_buf(),
            cache_dir: tmp.path().join("cache"),
        };

        let msg = run_command(
            Command::ImportArchive {
                archive: tmp.path().join("export.zip"),
                password: "hunter2".into(),
            },
            &ctx,
        );

        match msg {
            Msg::Import(ImportMsg::Completed(Err(reason))) => {
                assert_eq!(reason, STORE_UNAVAILABLE);
            }
            _ => panic!("expected a failed import"),
        }
    }
}
