use anyhow::Result;
use tracing::{error, info};

mod apps;
mod config;
mod error;
mod logging;
mod menu;
mod profile;
mod session;
mod ui;

use config::Config;
use profile::ProfileStore;
use session::Session;
use ui::TerminalConsole;

// ── Main application loop ─────────────────────────────────────────────────────

fn run(config: &Config) -> Result<()> {
    let store = ProfileStore::new(config.profile_dir());
    store.init()?;
    info!(profiles = %store.dir().display(), "profile store ready");

    let mut console = TerminalConsole::new(config);
    Session::new(&store, config, &mut console).run()
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init(&config)?;
    info!(base = %config.base.display(), "BradOS starting");

    let result = run(&config);
    match &result {
        Ok(()) => info!("BradOS stopped"),
        Err(e) => error!(error = %format!("{e:#}"), "BradOS aborted"),
    }
    result
}
