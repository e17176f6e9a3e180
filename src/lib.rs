//! `FabBanana` - Desktop studio client for the FabBanana image generation API
//!
//! Lets the user pick a generation mode (text-to-image, uncropping, avatar,
//! watermark, product mockup, batch), attach up to two source images or a
//! multi-file batch, submit a prompt, and preview/save the generated
//! result. `StudioController` owns the session state on a worker thread,
//! `ApiClient` talks multipart HTTP to the generation server, and batch
//! results are bundled into an in-memory zip archive.
//!
//! # Architecture
//!
//! GUI events become `Command`s on a channel; the controller validates,
//! submits strictly one request at a time, and publishes `UiUpdate`
//! snapshots back for rendering.

// Module declarations
pub mod api;
pub mod archive;
pub mod config;
pub mod controller;
pub mod error;
pub mod mode;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use error::{FabBananaError, Result};
