//! GUI controller
//!
//! Creates the main window, forwards user interaction to the studio
//! controller as commands, and renders the controller's state snapshots.
//! Snapshots are polled from the update channel on a Slint timer so all
//! widget access stays on the UI thread.

use crate::{MainWindow, ModeEntry};
use fabbanana::config::{AppConfig, ConfigManager};
use fabbanana::controller::{Command, OutputArtifact, UiUpdate};
use fabbanana::mode::Mode;
use parking_lot::Mutex;
use slint::{ComponentHandle, ModelRc, Rgba8Pixel, SharedPixelBuffer, VecModel};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, mpsc};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Interval at which controller snapshots are polled
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Slint GUI wrapper around the studio controller channels
pub struct GuiController {
    window: MainWindow,
    config: Arc<Mutex<AppConfig>>,
    // Kept alive for the lifetime of the window; dropping it stops polling
    _poll_timer: slint::Timer,
}

impl GuiController {
    /// Build the window, wire callbacks, and start polling for snapshots
    pub fn new(
        command_sender: mpsc::SyncSender<Command>,
        ui_receiver: mpsc::Receiver<UiUpdate>,
        config: Arc<Mutex<AppConfig>>,
    ) -> anyhow::Result<Self> {
        let window = MainWindow::new()?;

        // Latest finished artifact, shared between snapshot application and
        // the save callback
        let artifact: Rc<RefCell<Option<OutputArtifact>>> = Rc::new(RefCell::new(None));

        let entries: Vec<ModeEntry> = Mode::ALL
            .iter()
            .map(|mode| ModeEntry {
                label: mode.display_label().into(),
                mode: mode.wire_name().into(),
            })
            .collect();
        window.set_mode_model(ModelRc::new(VecModel::from(entries)));

        window.on_mode_clicked({
            let sender = command_sender.clone();
            move |mode_name| {
                let Some(mode) = Mode::from_wire_name(&mode_name) else {
                    warn!("Unknown mode clicked: {}", mode_name);
                    return;
                };
                send_command(&sender, Command::SelectMode(mode));
            }
        });

        window.on_prompt_edited({
            let sender = command_sender.clone();
            move |text| {
                send_command(&sender, Command::SetPrompt(text.to_string()));
            }
        });

        window.on_pick_primary({
            let sender = command_sender.clone();
            let weak = window.as_weak();
            move || {
                let Some(window) = weak.upgrade() else { return };
                let dialog = image_dialog();
                let paths = if window.get_primary_multi_select() {
                    dialog.pick_files().unwrap_or_default()
                } else {
                    dialog.pick_file().map(|p| vec![p]).unwrap_or_default()
                };
                if paths.is_empty() {
                    // Cancelled dialog: prior selection stays untouched
                    debug!("File selection cancelled");
                    return;
                }
                send_command(&sender, Command::SetPrimaryFiles(paths));
            }
        });

        window.on_pick_secondary({
            let sender = command_sender.clone();
            move || {
                if let Some(path) = image_dialog().pick_file() {
                    send_command(&sender, Command::SetSecondaryFile(path));
                }
            }
        });

        window.on_action_clicked({
            let sender = command_sender.clone();
            move || {
                send_command(&sender, Command::Submit);
            }
        });

        window.on_save_clicked({
            let artifact = Rc::clone(&artifact);
            let config = Arc::clone(&config);
            move || {
                let Some(artifact) = artifact.borrow().clone() else {
                    return;
                };
                save_artifact(&artifact, &config);
            }
        });

        // Poll controller snapshots onto the widgets
        let poll_timer = slint::Timer::default();
        poll_timer.start(slint::TimerMode::Repeated, POLL_INTERVAL, {
            let weak = window.as_weak();
            let artifact = Rc::clone(&artifact);
            move || {
                let Some(window) = weak.upgrade() else { return };
                while let Ok(update) = ui_receiver.try_recv() {
                    apply_update(&window, &artifact, update);
                }
            }
        });

        Ok(Self {
            window,
            config,
            _poll_timer: poll_timer,
        })
    }

    /// Restore window geometry, run the Slint event loop, persist geometry on exit
    pub fn run(&self) -> anyhow::Result<()> {
        {
            let state = self.config.lock().window_state.clone();
            self.window
                .window()
                .set_position(slint::PhysicalPosition::new(state.x, state.y));
            self.window
                .window()
                .set_size(slint::PhysicalSize::new(state.width, state.height));
        }

        info!("Starting GUI event loop");
        self.window.run()?;

        self.persist_window_state();
        Ok(())
    }

    /// Save the current window geometry into the configuration
    fn persist_window_state(&self) {
        let position = self.window.window().position();
        let size = self.window.window().size();

        let mut config = self.config.lock();
        config.window_state.x = position.x;
        config.window_state.y = position.y;
        config.window_state.width = size.width;
        config.window_state.height = size.height;
        let snapshot = config.clone();
        drop(config);

        if let Err(e) = ConfigManager::save(&snapshot) {
            warn!("Failed to save window state: {}", e);
        }
    }
}

/// Send a command, logging if the controller is gone
fn send_command(sender: &mpsc::SyncSender<Command>, command: Command) {
    if let Err(e) = sender.send(command) {
        warn!("Failed to send command to controller: {}", e);
    }
}

/// File dialog restricted to the image types the server accepts
fn image_dialog() -> rfd::FileDialog {
    rfd::FileDialog::new().add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp"])
}

/// Render one controller snapshot into the window
fn apply_update(
    window: &MainWindow,
    artifact: &Rc<RefCell<Option<OutputArtifact>>>,
    update: UiUpdate,
) {
    let spec = update.mode.spec();
    window.set_active_mode(update.mode.wire_name().into());
    window.set_action_label(spec.action_label.into());
    window.set_show_primary_upload(spec.requires_primary);
    window.set_show_secondary_upload(spec.requires_secondary);
    window.set_primary_upload_label(spec.primary_upload_label.into());
    window.set_secondary_upload_label(spec.secondary_upload_label.unwrap_or_default().into());
    window.set_primary_multi_select(spec.multi_select);

    window.set_busy(update.busy);
    window.set_status_text(update.status.into());
    window.set_placeholder_text(update.placeholder.unwrap_or_default().into());

    // Only overwrite the prompt when the controller changed it (mode
    // switch), never while the user is typing
    if window.get_prompt_text() != update.prompt.as_str() {
        window.set_prompt_text(update.prompt.into());
    }

    if let Some(notice) = update.notice {
        window.set_notice_text(notice.into());
    }

    render_preview(window, update.preview.as_deref().map(Vec::as_slice));

    window.set_can_save(update.output.is_some());
    *artifact.borrow_mut() = update.output;
}

/// Decode preview bytes and hand them to the window, falling back to the
/// placeholder when the bytes are not displayable
fn render_preview(window: &MainWindow, bytes: Option<&[u8]>) {
    let Some(data) = bytes else {
        window.set_has_preview(false);
        return;
    };

    match image::load_from_memory(data) {
        Ok(img) => {
            let rgba = img.into_rgba8();
            let buffer = SharedPixelBuffer::<Rgba8Pixel>::clone_from_slice(
                rgba.as_raw(),
                rgba.width(),
                rgba.height(),
            );
            window.set_preview_image(slint::Image::from_rgba8(buffer));
            window.set_has_preview(true);
        }
        Err(e) => {
            warn!("Failed to decode preview image: {}", e);
            window.set_has_preview(false);
            window.set_placeholder_text("Preview unavailable for this file".into());
        }
    }
}

/// Run the save dialog and write the artifact to disk
fn save_artifact(artifact: &OutputArtifact, config: &Arc<Mutex<AppConfig>>) {
    let mut dialog = rfd::FileDialog::new().set_file_name(&artifact.suggested_name);
    if let Some(dir) = config.lock().preferences.default_output_dir.clone() {
        dialog = dialog.set_directory(dir);
    }

    let Some(path) = dialog.save_file() else {
        return;
    };

    match std::fs::write(&path, artifact.bytes.as_slice()) {
        Ok(()) => {
            info!("Saved result to {}", path.display());

            let mut cfg = config.lock();
            if cfg.preferences.remember_output_dir {
                if let Some(parent) = path.parent() {
                    cfg.preferences.default_output_dir = Some(parent.to_path_buf());
                }
            }
            let snapshot = cfg.clone();
            drop(cfg);

            if let Err(e) = ConfigManager::save(&snapshot) {
                warn!("Failed to save configuration: {}", e);
            }
        }
        Err(e) => {
            warn!("Failed to save result to {}: {}", path.display(), e);
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("FabBanana")
                .set_description(format!("Could not save the file:\n\n{e}"))
                .show();
        }
    }
}
