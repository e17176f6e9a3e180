//! `FabBanana` - Desktop studio client for the FabBanana image generation API
//!
//! Starts the logging system, loads configuration, spins up the studio
//! controller on a worker thread, and runs the Slint GUI event loop.

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![expect(
    missing_docs,
    reason = "Slint-generated code from include_modules! lacks doc comments"
)]
#![allow(clippy::unwrap_used)] // Slint-generated code from include_modules! uses .unwrap() extensively

// GUI module is only in the binary, not the library
mod gui;

use anyhow::{Context, Result};
use fabbanana::{
    api::ApiClient,
    config::ConfigManager,
    error::{FabBananaError, get_user_friendly_error},
    utils,
};
use fabbanana::controller::StudioController;
use gui::GuiController;
use parking_lot::Mutex;
use std::sync::{Arc, mpsc};
use tracing::{error, info};

// Include Slint-generated code
slint::include_modules!();

/// Main entry point for the application
///
/// Performs initialization including logging, configuration loading, HTTP
/// client construction, and controller/GUI startup.
fn main() -> Result<()> {
    utils::init_logging().context("Failed to initialize logging system")?;

    info!("FabBanana v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = ConfigManager::load().context("Failed to load application configuration")?;
    info!(
        "Configuration loaded (server: {}, timeout: {}s)",
        config.server.base_url, config.server.request_timeout_secs
    );

    let backend = match ApiClient::new(&config.server) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize HTTP client: {}", e);
            show_error(&get_user_friendly_error(&e));
            return Err(e.into());
        }
    };

    let config = Arc::new(Mutex::new(config));

    // GUI -> controller commands, controller -> GUI state snapshots
    let (command_sender, command_receiver) = mpsc::sync_channel(32);
    let (ui_sender, ui_receiver) = mpsc::sync_channel(64);

    let controller = StudioController::new(Box::new(backend), command_receiver, ui_sender);

    // Equivalent to the startup selection of the default mode: the first
    // snapshot the GUI renders carries the text-to-image defaults
    controller.send_initial_state();

    info!("Starting controller worker thread");
    let _controller_handle = controller.spawn_event_loop();

    let gui_controller = match GuiController::new(command_sender, ui_receiver, Arc::clone(&config))
        .context("Failed to initialize GUI")
    {
        Ok(gui_controller) => gui_controller,
        Err(e) => {
            error!("Failed to initialize GUI: {:#}", e);

            let error_message = if let Some(fab_error) = e.downcast_ref::<FabBananaError>() {
                get_user_friendly_error(fab_error)
            } else {
                format!("{e:#}")
            };
            show_error(&format!("Failed to initialize FabBanana:\n\n{error_message}"));
            return Err(e);
        }
    };

    gui_controller
        .run()
        .context("GUI event loop terminated with error")?;

    info!("FabBanana shutting down");

    Ok(())
}

/// Show a blocking error dialog for fatal startup problems
fn show_error(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("FabBanana")
        .set_description(message)
        .show();
}
