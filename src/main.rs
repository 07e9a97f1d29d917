// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 OTPVault contributors

mod app;
mod config;
mod logic;
mod models;
mod mvu;
mod storage;
mod ui;
mod utils;

fn main() -> anyhow::Result<()> {
    let config = config::AppConfig::load()?;
    utils::init_tracing(&config.log_filter);
    tracing::info!(database = %config.database_path.display(), "Starting OTP Vault");

    app::run(config).map_err(|err| anyhow::anyhow!("Failed to run the user interface: {err}"))
}
