//! Studio controller module
//!
//! This module implements the core application logic: session state, the
//! command handlers the GUI drives, and the submission/batch orchestration.
//!
//! # Overview
//!
//! The studio controller is the central coordinator that:
//! - **Receives commands** from the GUI (mode selection, file intake,
//!   prompt edits, submission)
//! - **Validates submissions** against the per-mode requirements before any
//!   network call is made
//! - **Submits requests** through the `ImageBackend` seam, strictly one at
//!   a time
//! - **Publishes state snapshots** to the GUI for display
//!
//! # Architecture
//!
//! - `StudioController`: owns the session state and the backend
//! - `Command`: the finite set of operations the GUI can request
//! - `UiUpdate`: state snapshot sent to the GUI for rendering
//! - **Event-driven design**: one worker thread drains the command channel
//!
//! # Event Flow
//!
//! ```text
//! GUI → Command → StudioController → ImageBackend (HTTP)
//!                       ↓
//!                   UiUpdate → GUI
//! ```
//!
//! # Busy Gating
//!
//! All submission work runs on the controller thread, so no two requests
//! ever overlap; the busy flag additionally rejects Submit commands queued
//! while a request is in flight and is cleared on every outcome, success or
//! failure.

pub mod studio_controller;

pub use studio_controller::{Command, OutputArtifact, StudioController, UiUpdate};
