// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

//! Application entry point wiring egui/eframe to launch the vault UI.

use eframe::egui;
use egui_phosphor::Variant;

use crate::config::AppConfig;
use crate::ui::OtpVaultApp;

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(config: AppConfig) -> eframe::Result<()> {
    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "OTP Vault",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(OtpVaultApp::new(&config)))
        }),
    )
}
