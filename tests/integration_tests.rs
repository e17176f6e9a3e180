//! Integration tests for `FabBanana`
//!
//! Tests the full controller lifecycle over its command/state channels with
//! a stub backend: mode selection, validation, submission, batch
//! processing, and configuration persistence.

use fabbanana::api::{ImageBackend, ProcessRequest};
use fabbanana::config::AppConfig;
use fabbanana::controller::{Command, StudioController, UiUpdate};
use fabbanana::error::FabBananaError;
use fabbanana::mode::Mode;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};
use std::time::Duration;
use tempfile::TempDir;

/// A call observed by the stub backend
#[derive(Debug, Clone, PartialEq)]
enum RecordedCall {
    TextToImage {
        prompt: String,
    },
    ProcessImage {
        prompt: String,
        mode: Mode,
        primary_name: String,
        secondary_name: Option<String>,
    },
}

/// Backend stub recording calls and replaying queued responses
struct StubBackend {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    responses: Mutex<VecDeque<Result<Vec<u8>, FabBananaError>>>,
}

impl StubBackend {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responses: Mutex::new(VecDeque::new()),
        }
    }

    fn calls_handle(&self) -> Arc<Mutex<Vec<RecordedCall>>> {
        Arc::clone(&self.calls)
    }

    fn queue_response(&self, response: Result<Vec<u8>, FabBananaError>) {
        self.responses.lock().push_back(response);
    }

    fn next_response(&self) -> Result<Vec<u8>, FabBananaError> {
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(tiny_png()))
    }
}

impl ImageBackend for StubBackend {
    fn text_to_image(&self, prompt: &str) -> Result<Vec<u8>, FabBananaError> {
        self.calls.lock().push(RecordedCall::TextToImage {
            prompt: prompt.to_string(),
        });
        self.next_response()
    }

    fn process_image(&self, request: &ProcessRequest<'_>) -> Result<Vec<u8>, FabBananaError> {
        self.calls.lock().push(RecordedCall::ProcessImage {
            prompt: request.prompt.to_string(),
            mode: request.mode,
            primary_name: request.primary.file_name.clone(),
            secondary_name: request.secondary.map(|s| s.file_name.clone()),
        });
        self.next_response()
    }
}

/// A minimal valid PNG, since single results are decode-checked
fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 200, 0, 255]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

fn server_error() -> FabBananaError {
    FabBananaError::Api {
        status: 500,
        message: "backend exploded".to_string(),
    }
}

/// Running controller with its command/state channels
struct Harness {
    commands: mpsc::SyncSender<Command>,
    updates: mpsc::Receiver<UiUpdate>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl Harness {
    fn start(backend: StubBackend) -> Self {
        let (command_tx, command_rx) = mpsc::sync_channel(32);
        let (ui_tx, ui_rx) = mpsc::sync_channel(64);
        let controller = StudioController::new(Box::new(backend), command_rx, ui_tx);
        let handle = controller.spawn_event_loop();
        Self {
            commands: command_tx,
            updates: ui_rx,
            handle: Some(handle),
        }
    }

    fn send(&self, command: Command) {
        self.commands.send(command).unwrap();
    }

    /// Collect snapshots until the controller goes quiet, returning the last
    fn settle(&self) -> UiUpdate {
        let mut last = None;
        while let Ok(update) = self.updates.recv_timeout(Duration::from_millis(300)) {
            last = Some(update);
        }
        last.expect("expected at least one UI update")
    }

    /// Collect all snapshots until the controller goes quiet
    fn collect(&self) -> Vec<UiUpdate> {
        let mut all = Vec::new();
        while let Ok(update) = self.updates.recv_timeout(Duration::from_millis(300)) {
            all.push(update);
        }
        all
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        // Closing the command channel ends the controller loop
        let (dead_tx, _) = mpsc::sync_channel(1);
        let _ = std::mem::replace(&mut self.commands, dead_tx);
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

fn write_file(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, b"source-image-bytes").unwrap();
    path
}

/// Test that configuration can be saved and loaded correctly
#[test]
fn test_config_persistence_integration() {
    let test_dir = tempfile::tempdir().unwrap();

    // Create a config with some test data
    let mut config = AppConfig::default();
    config.server.base_url = "http://gen.example:9000".to_string();
    config.preferences.default_output_dir = Some(PathBuf::from("/tmp/output"));

    // Save the config
    let config_path = test_dir.path().join("config.json");
    let json = serde_json::to_string_pretty(&config).unwrap();
    std::fs::write(&config_path, json).unwrap();

    // Load the config back
    let loaded_json = std::fs::read_to_string(&config_path).unwrap();
    let loaded_config: AppConfig = serde_json::from_str(&loaded_json).unwrap();

    // Verify the data matches
    assert_eq!(loaded_config.server.base_url, "http://gen.example:9000");
    assert_eq!(
        loaded_config.preferences.default_output_dir,
        Some(PathBuf::from("/tmp/output"))
    );
}

/// Test that selecting each mode activates it exclusively and resets the
/// prompt to the mode's configured default
#[test]
fn test_mode_selection_sets_default_prompt() {
    let harness = Harness::start(StubBackend::new());

    for mode in Mode::ALL {
        harness.send(Command::SetPrompt("user edits".to_string()));
        harness.send(Command::SelectMode(mode));

        let update = harness.settle();
        assert_eq!(update.mode, mode);
        assert_eq!(update.prompt, mode.spec().prompt_default);
        assert!(!update.busy);
    }
}

/// Test that an empty or whitespace-only prompt never issues a network
/// call, for every mode
#[test]
fn test_empty_prompt_issues_no_network_call() {
    for mode in Mode::ALL {
        let backend = StubBackend::new();
        let calls = backend.calls_handle();
        let harness = Harness::start(backend);

        harness.send(Command::SelectMode(mode));
        harness.send(Command::SetPrompt("  \t  ".to_string()));
        harness.send(Command::Submit);

        let update = harness.settle();
        assert!(update.notice.is_some(), "{mode} must surface a notice");
        assert!(calls.lock().is_empty(), "{mode} must not call the backend");
    }
}

/// Test the worked example: mode=avatar, prompt="studio portrait", one file
/// uploaded, a successful response renders the preview and derives the
/// download filename from mode and timestamp
#[test]
fn test_avatar_submission_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let backend = StubBackend::new();
    let png = tiny_png();
    backend.queue_response(Ok(png.clone()));
    let calls = backend.calls_handle();
    let harness = Harness::start(backend);

    harness.send(Command::SelectMode(Mode::Avatar));
    harness.send(Command::SetPrompt("studio portrait".to_string()));
    harness.send(Command::SetPrimaryFiles(vec![write_file(&dir, "me.jpg")]));
    harness.send(Command::Submit);

    let update = harness.settle();
    assert!(!update.busy);
    assert_eq!(update.preview.as_deref(), Some(&png));

    let output = update.output.expect("expected a downloadable artifact");
    assert_eq!(*output.bytes, png, "download must carry the same bytes");
    assert!(output.suggested_name.starts_with("avatar_"));
    assert!(output.suggested_name.ends_with(".png"));

    assert_eq!(
        *calls.lock(),
        vec![RecordedCall::ProcessImage {
            prompt: "studio portrait".to_string(),
            mode: Mode::Avatar,
            primary_name: "me.jpg".to_string(),
            secondary_name: None,
        }]
    );
}

/// Test that text-to-image submits with no files attached
#[test]
fn test_text_to_image_requires_no_files() {
    let backend = StubBackend::new();
    let calls = backend.calls_handle();
    let harness = Harness::start(backend);

    harness.send(Command::SetPrompt("a banana lighthouse".to_string()));
    harness.send(Command::Submit);

    let update = harness.settle();
    assert!(update.notice.is_none());
    assert!(update.output.is_some());
    assert_eq!(
        *calls.lock(),
        vec![RecordedCall::TextToImage {
            prompt: "a banana lighthouse".to_string()
        }]
    );
}

/// Test that the two-image modes are blocked until both files are set
#[test]
fn test_watermark_requires_both_images() {
    let dir = tempfile::tempdir().unwrap();
    let backend = StubBackend::new();
    let calls = backend.calls_handle();
    let harness = Harness::start(backend);

    harness.send(Command::SelectMode(Mode::Watermark));
    harness.send(Command::Submit);
    let update = harness.settle();
    assert!(update.notice.is_some(), "missing primary must be rejected");

    harness.send(Command::SetPrimaryFiles(vec![write_file(&dir, "main.png")]));
    harness.send(Command::Submit);
    let update = harness.settle();
    assert!(update.notice.is_some(), "missing secondary must be rejected");
    assert!(calls.lock().is_empty());

    harness.send(Command::SetSecondaryFile(write_file(&dir, "logo.png")));
    harness.send(Command::Submit);
    let update = harness.settle();
    assert!(update.notice.is_none());
    assert_eq!(
        *calls.lock(),
        vec![RecordedCall::ProcessImage {
            prompt: Mode::Watermark.spec().prompt_default.to_string(),
            mode: Mode::Watermark,
            primary_name: "main.png".to_string(),
            secondary_name: Some("logo.png".to_string()),
        }]
    );
}

/// Test that a batch of N files with K successes produces an archive with
/// exactly K entries named `<stem>_processed.png` and reports "K of N"
#[test]
fn test_batch_partial_success_archive_contents() {
    let dir = tempfile::tempdir().unwrap();
    let backend = StubBackend::new();
    backend.queue_response(Ok(b"result-one".to_vec()));
    backend.queue_response(Err(server_error()));
    backend.queue_response(Ok(b"result-three".to_vec()));
    let harness = Harness::start(backend);

    harness.send(Command::SelectMode(Mode::Batch));
    harness.send(Command::SetPrimaryFiles(vec![
        write_file(&dir, "one.jpg"),
        write_file(&dir, "two.jpg"),
        write_file(&dir, "three.jpg"),
    ]));
    harness.send(Command::Submit);

    let updates = harness.collect();
    let last = updates.last().unwrap();
    assert!(!last.busy);
    assert_eq!(last.status, "2 of 3 images processed");
    assert!(
        last.notice.is_none(),
        "per-item failures must not surface individually"
    );

    // Progress lines name each file in order
    let statuses: Vec<&str> = updates.iter().map(|u| u.status.as_str()).collect();
    assert!(statuses.contains(&"Processing 1/3: one.jpg"));
    assert!(statuses.contains(&"Processing 2/3: two.jpg"));
    assert!(statuses.contains(&"Processing 3/3: three.jpg"));

    let output = last.output.clone().expect("expected a batch archive");
    assert!(output.suggested_name.starts_with("FabBanana_Batch_"));
    assert!(output.suggested_name.ends_with(".zip"));

    let mut zip = zip::ZipArchive::new(Cursor::new((*output.bytes).clone())).unwrap();
    assert_eq!(zip.len(), 2, "exactly K entries for K successes");
    assert_eq!(zip.by_index(0).unwrap().name(), "one_processed.png");
    assert_eq!(zip.by_index(1).unwrap().name(), "three_processed.png");

    use std::io::Read;
    let mut first = Vec::new();
    zip.by_index(0).unwrap().read_to_end(&mut first).unwrap();
    assert_eq!(first, b"result-one");
}

/// Test that a batch where every item fails produces no archive and reports
/// that no images could be processed
#[test]
fn test_batch_zero_successes_has_no_archive() {
    let dir = tempfile::tempdir().unwrap();
    let backend = StubBackend::new();
    backend.queue_response(Err(server_error()));
    backend.queue_response(Err(server_error()));
    let harness = Harness::start(backend);

    harness.send(Command::SelectMode(Mode::Batch));
    harness.send(Command::SetPrimaryFiles(vec![
        write_file(&dir, "a.jpg"),
        write_file(&dir, "b.jpg"),
    ]));
    harness.send(Command::Submit);

    let last = harness.settle();
    assert!(!last.busy, "busy must clear even when every item fails");
    assert_eq!(last.status, "0 of 2 images processed");
    assert!(last.output.is_none());
    assert_eq!(last.notice.as_deref(), Some("No images could be processed."));
}

/// Test the cleanup invariant: on request failure the loading state clears
/// and the action control is usable again
#[test]
fn test_failure_restores_idle_state() {
    let backend = StubBackend::new();
    backend.queue_response(Err(server_error()));
    backend.queue_response(Ok(tiny_png()));
    let harness = Harness::start(backend);

    harness.send(Command::SetPrompt("first try".to_string()));
    harness.send(Command::Submit);

    let updates = harness.collect();
    assert!(
        updates.iter().any(|u| u.busy),
        "a busy snapshot precedes the result"
    );
    let last = updates.last().unwrap();
    assert!(!last.busy, "busy must clear on failure");
    assert!(last.notice.is_some());
    assert_eq!(last.placeholder.as_deref(), Some("Generation failed."));

    // A second submission goes through: the controller was not left locked
    harness.send(Command::Submit);
    let last = harness.settle();
    assert!(!last.busy);
    assert!(last.output.is_some());
}

/// Test that a cancelled file dialog (empty selection) does not clear a
/// previously confirmed selection
#[test]
fn test_empty_selection_keeps_confirmed_files() {
    let dir = tempfile::tempdir().unwrap();
    let backend = StubBackend::new();
    let calls = backend.calls_handle();
    let harness = Harness::start(backend);

    harness.send(Command::SelectMode(Mode::Avatar));
    harness.send(Command::SetPrimaryFiles(vec![write_file(&dir, "kept.jpg")]));
    harness.send(Command::SetPrimaryFiles(Vec::new()));
    harness.send(Command::Submit);

    let update = harness.settle();
    assert!(update.notice.is_none(), "the kept file must still submit");
    assert_eq!(
        *calls.lock(),
        vec![RecordedCall::ProcessImage {
            prompt: Mode::Avatar.spec().prompt_default.to_string(),
            mode: Mode::Avatar,
            primary_name: "kept.jpg".to_string(),
            secondary_name: None,
        }]
    );
}
