//! Studio controller implementation
//!
//! This module implements the main application logic controller that owns
//! the session state and coordinates validation, submission, and batch
//! processing against the generation backend.

use crate::api::{ImageBackend, ProcessRequest, UploadImage};
use crate::archive::{BatchArchive, archive_filename};
use crate::error::{FabBananaError, Result, get_user_friendly_error};
use crate::mode::Mode;
use crate::utils::unix_timestamp_ms;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

/// Placeholder text shown in the preview area before any result exists
const IDLE_PLACEHOLDER: &str = "Your image will appear here";

/// Commands the GUI sends to the controller
#[derive(Debug, Clone)]
pub enum Command {
    /// Activate a mode, resetting the prompt to the mode's default
    SelectMode(Mode),
    /// Replace the prompt text
    SetPrompt(String),
    /// Replace the primary file selection (empty = cancelled dialog, no-op)
    SetPrimaryFiles(Vec<PathBuf>),
    /// Set the secondary file
    SetSecondaryFile(PathBuf),
    /// Validate the current state and submit
    Submit,
}

/// A finished result ready to be saved to disk
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    /// Artifact bytes (PNG for single results, zip for batch results)
    pub bytes: Arc<Vec<u8>>,
    /// Suggested filename, derived from mode and current timestamp
    pub suggested_name: String,
}

/// Snapshot of controller state for GUI rendering
///
/// The GUI is a pure render of the latest snapshot; it holds no state of
/// its own beyond the widgets.
#[derive(Debug, Clone)]
pub struct UiUpdate {
    /// Currently active mode
    pub mode: Mode,
    /// Current prompt text
    pub prompt: String,
    /// Whether a submission is in flight (loader shown, action disabled)
    pub busy: bool,
    /// Progress/status line
    pub status: String,
    /// Blocking, user-dismissable notice (validation or request failure)
    pub notice: Option<String>,
    /// Text shown in the preview area when no image is displayed
    pub placeholder: Option<String>,
    /// Raw bytes of the image shown in the preview area
    pub preview: Option<Arc<Vec<u8>>>,
    /// Finished artifact available for saving
    pub output: Option<OutputArtifact>,
    /// Number of selected primary files
    pub primary_count: usize,
    /// Filename of the selected secondary file
    pub secondary_name: Option<String>,
}

/// Session state owned by the controller
struct SessionState {
    mode: Mode,
    prompt: String,
    primary_files: Vec<PathBuf>,
    secondary_file: Option<PathBuf>,
    busy: bool,
    status: String,
    placeholder: Option<String>,
    preview: Option<Arc<Vec<u8>>>,
    output: Option<OutputArtifact>,
}

impl SessionState {
    fn new() -> Self {
        Self {
            mode: Mode::DEFAULT,
            prompt: Mode::DEFAULT.spec().prompt_default.to_string(),
            primary_files: Vec::new(),
            secondary_file: None,
            busy: false,
            status: "Ready".to_string(),
            placeholder: Some(IDLE_PLACEHOLDER.to_string()),
            preview: None,
            output: None,
        }
    }
}

/// Application logic controller
pub struct StudioController {
    /// Transport to the generation server
    backend: Box<dyn ImageBackend>,
    /// Session state
    state: SessionState,
    /// Command receiver from the GUI (taken when the event loop starts)
    command_receiver: Option<mpsc::Receiver<Command>>,
    /// State sender to the GUI
    ui_sender: mpsc::SyncSender<UiUpdate>,
}

impl StudioController {
    /// Create a new controller with the default mode active
    pub fn new(
        backend: Box<dyn ImageBackend>,
        command_receiver: mpsc::Receiver<Command>,
        ui_sender: mpsc::SyncSender<UiUpdate>,
    ) -> Self {
        Self {
            backend,
            state: SessionState::new(),
            command_receiver: Some(command_receiver),
            ui_sender,
        }
    }

    /// Send the initial state to the GUI
    ///
    /// Call once after initialization; equivalent to the startup selection
    /// of the default mode.
    pub fn send_initial_state(&self) {
        use tracing::info;

        info!("Sending initial state update to populate GUI");
        self.publish(None);
    }

    /// Run the command loop until the GUI side disconnects
    pub fn run(&mut self) {
        use tracing::{info, warn};

        let Some(receiver) = self.command_receiver.take() else {
            warn!("Command loop already running; run() call ignored");
            return;
        };

        info!("Entering controller command loop");
        while let Ok(command) = receiver.recv() {
            self.handle_command(command);
        }
        info!("Controller command loop exited (command channel disconnected)");
    }

    /// Spawn the command loop on a dedicated worker thread
    pub fn spawn_event_loop(mut self) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || self.run())
    }

    /// Dispatch a single command
    fn handle_command(&mut self, command: Command) {
        use tracing::{debug, info, warn};

        match command {
            Command::SelectMode(mode) => {
                info!("Mode selected: {}", mode);
                self.state.mode = mode;
                self.state.prompt = mode.spec().prompt_default.to_string();
                self.publish(None);
            }

            Command::SetPrompt(prompt) => {
                // Typing echo: mutate only, no snapshot, so the GUI text
                // field is never overwritten mid-edit
                debug!("Prompt updated ({} chars)", prompt.len());
                self.state.prompt = prompt;
            }

            Command::SetPrimaryFiles(paths) => {
                if paths.is_empty() {
                    // Cancelled picker: prior confirmed files stay untouched
                    debug!("Empty file selection ignored");
                    return;
                }
                self.set_primary_files(paths);
            }

            Command::SetSecondaryFile(path) => {
                let name = display_name(&path);
                info!("Secondary file selected: {}", name);
                self.state.secondary_file = Some(path);
                self.state.status = format!("\"{name}\" loaded as the second image");
                self.publish(None);
            }

            Command::Submit => {
                if self.state.busy {
                    warn!("Submission already in flight; Submit ignored");
                    return;
                }
                self.handle_submit();
            }
        }
    }

    /// Record a new primary selection and preview its first file
    fn set_primary_files(&mut self, paths: Vec<PathBuf>) {
        use tracing::{info, warn};

        info!("{} primary file(s) selected", paths.len());

        match std::fs::read(&paths[0]) {
            Ok(bytes) => {
                self.state.preview = Some(Arc::new(bytes));
                self.state.placeholder = None;
            }
            Err(e) => {
                warn!("Failed to read {} for preview: {}", paths[0].display(), e);
                self.state.preview = None;
                self.state.placeholder =
                    Some(format!("Could not preview {}", display_name(&paths[0])));
            }
        }

        self.state.status = format!("{} file(s) selected", paths.len());
        // A fresh selection invalidates any previous result
        self.state.output = None;
        self.state.primary_files = paths;
        self.publish(None);
    }

    /// Validate and run a submission
    ///
    /// Preconditions are checked in a fixed order; each failure publishes a
    /// blocking notice and aborts before any network call.
    fn handle_submit(&mut self) {
        let prompt = self.state.prompt.trim().to_string();
        if prompt.is_empty() {
            self.reject(&FabBananaError::EmptyPrompt);
            return;
        }

        if self.state.mode == Mode::Batch {
            self.run_batch(&prompt);
            return;
        }

        let spec = self.state.mode.spec();
        if spec.requires_primary && self.state.primary_files.is_empty() {
            self.reject(&FabBananaError::MissingPrimaryImage);
            return;
        }
        if spec.requires_secondary && self.state.secondary_file.is_none() {
            self.reject(&FabBananaError::MissingSecondaryImage);
            return;
        }

        self.enter_busy("Generating...");
        let result = self.submit_single(&prompt);
        self.finish_single(result);
    }

    /// Publish a validation failure without touching the rest of the state
    fn reject(&self, error: &FabBananaError) {
        use tracing::info;

        info!("Submission rejected: {}", error);
        self.publish(Some(get_user_friendly_error(error)));
    }

    /// Enter the busy state: loader on, stale preview/result hidden
    fn enter_busy(&mut self, status: &str) {
        self.state.busy = true;
        self.state.status = status.to_string();
        self.state.preview = None;
        self.state.placeholder = None;
        self.state.output = None;
        self.publish(None);
    }

    /// Build and send one non-batch request
    fn submit_single(&self, prompt: &str) -> Result<Vec<u8>> {
        let mode = self.state.mode;

        if mode == Mode::TextToImage {
            return self.backend.text_to_image(prompt);
        }

        let primary = UploadImage::from_path(&self.state.primary_files[0])?;
        let secondary = if mode.spec().requires_secondary {
            // Checked in handle_submit; outside its two modes a lingering
            // secondary selection is never sent
            let path = self
                .state
                .secondary_file
                .as_ref()
                .ok_or(FabBananaError::MissingSecondaryImage)?;
            Some(UploadImage::from_path(path)?)
        } else {
            None
        };

        let png = self.backend.process_image(&ProcessRequest {
            prompt,
            mode,
            primary: &primary,
            secondary: secondary.as_ref(),
        })?;

        // Reject payloads the preview could not display
        let _ = image::load_from_memory(&png)?;
        Ok(png)
    }

    /// Apply the outcome of a single submission and leave the busy state
    ///
    /// Cleanup (busy cleared, snapshot published) runs on every outcome.
    fn finish_single(&mut self, result: Result<Vec<u8>>) {
        use tracing::{error, info};

        let notice = match result {
            Ok(png) => {
                let suggested_name = self.state.mode.output_filename(unix_timestamp_ms());
                info!("Generation succeeded ({} bytes) -> {}", png.len(), suggested_name);

                let bytes = Arc::new(png);
                self.state.preview = Some(Arc::clone(&bytes));
                self.state.output = Some(OutputArtifact {
                    bytes,
                    suggested_name,
                });
                self.state.placeholder = None;
                self.state.status = "Finished".to_string();
                None
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                self.state.preview = None;
                self.state.output = None;
                self.state.placeholder = Some("Generation failed.".to_string());
                self.state.status = "Generation failed".to_string();
                Some(get_user_friendly_error(&e))
            }
        };

        self.state.busy = false;
        self.publish(notice);
    }

    /// Process every selected file sequentially and bundle successes
    ///
    /// A single item's failure is logged and counted, never surfaced
    /// individually, and never aborts the batch. Archive entries follow
    /// input order because the loop is strictly sequential.
    fn run_batch(&mut self, prompt: &str) {
        use tracing::{error, info, warn};

        if self.state.primary_files.is_empty() {
            self.reject(&FabBananaError::NoBatchFiles);
            return;
        }

        self.enter_busy("Starting batch...");

        let files = self.state.primary_files.clone();
        let total = files.len();
        let mut archive = BatchArchive::new();

        for (index, path) in files.iter().enumerate() {
            let name = display_name(path);
            self.state.status = format!("Processing {}/{}: {}", index + 1, total, name);
            self.publish(None);

            match self.process_batch_item(prompt, path) {
                Ok(png) => {
                    if let Err(e) = archive.add_image(&name, &png) {
                        warn!("Failed to archive result for {}: {}", name, e);
                    }
                }
                Err(e) => {
                    warn!("Batch item {} failed: {}", name, e);
                }
            }
        }

        let successes = archive.entry_count();
        info!("Batch finished: {} of {} images processed", successes, total);
        self.state.status = format!("{successes} of {total} images processed");

        let notice = if successes > 0 {
            match archive.finish() {
                Ok(bytes) => {
                    self.state.output = Some(OutputArtifact {
                        bytes: Arc::new(bytes),
                        suggested_name: archive_filename(unix_timestamp_ms()),
                    });
                    self.state.placeholder = Some("Batch finished.".to_string());
                    None
                }
                Err(e) => {
                    error!("Failed to serialize batch archive: {}", e);
                    self.state.placeholder = Some("Batch failed.".to_string());
                    Some(get_user_friendly_error(&e))
                }
            }
        } else {
            self.state.placeholder = Some("No images could be processed.".to_string());
            Some("No images could be processed.".to_string())
        };

        self.state.busy = false;
        self.publish(notice);
    }

    /// Submit one batch file as a prompt-driven edit
    fn process_batch_item(&self, prompt: &str, path: &Path) -> Result<Vec<u8>> {
        let upload = UploadImage::from_path(path)?;
        self.backend.process_image(&ProcessRequest {
            prompt,
            mode: Mode::Batch,
            primary: &upload,
            secondary: None,
        })
    }

    /// Send the current state snapshot to the GUI
    fn publish(&self, notice: Option<String>) {
        use tracing::warn;

        let update = UiUpdate {
            mode: self.state.mode,
            prompt: self.state.prompt.clone(),
            busy: self.state.busy,
            status: self.state.status.clone(),
            notice,
            placeholder: self.state.placeholder.clone(),
            preview: self.state.preview.clone(),
            output: self.state.output.clone(),
            primary_count: self.state.primary_files.len(),
            secondary_name: self.state.secondary_file.as_deref().map(display_name),
        };

        if let Err(e) = self.ui_sender.send(update) {
            warn!("Failed to send state update to GUI: {}", e);
        }
    }
}

/// Filename of a path for display and archive naming
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}
