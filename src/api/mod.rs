//! HTTP client for the FabBanana generation endpoints
//!
//! The server exposes two multipart endpoints: a text-only generation
//! endpoint and a shared image-processing endpoint. Both answer with JSON
//! carrying a base64-encoded PNG. The `ImageBackend` trait is the seam the
//! controller submits through, so controller behavior is testable without a
//! network.

pub mod client;

pub use client::{ApiClient, ImageBackend, ProcessRequest, UploadImage, decode_image_payload};
