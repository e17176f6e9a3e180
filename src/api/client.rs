//! Blocking HTTP client implementation
//!
//! Requests are multipart forms; responses are JSON. A non-success status
//! carries an optional JSON `{"error": ...}` body whose message is surfaced
//! to the user, falling back to a generic HTTP status message.

use crate::config::ServerConfig;
use crate::error::{FabBananaError, Result};
use crate::mode::{Endpoint, Mode};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// An image loaded from disk, ready to be attached to a multipart form
#[derive(Debug, Clone)]
pub struct UploadImage {
    /// Original filename, sent as the multipart part filename
    pub file_name: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl UploadImage {
    /// Read an upload from disk, deriving the part filename from the path
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { file_name, bytes })
    }
}

/// A single submission to the shared image-processing endpoint
#[derive(Debug)]
pub struct ProcessRequest<'a> {
    /// User prompt
    pub prompt: &'a str,
    /// Mode tag, sent explicitly so the server never infers the
    /// transformation from which optional parts are present
    pub mode: Mode,
    /// Main input image
    pub primary: &'a UploadImage,
    /// Auxiliary image (watermark or mockup background)
    pub secondary: Option<&'a UploadImage>,
}

/// Transport seam between the controller and the generation server
///
/// Both methods return the decoded PNG bytes of the generated image.
pub trait ImageBackend: Send {
    /// Generate an image from a prompt alone
    fn text_to_image(&self, prompt: &str) -> Result<Vec<u8>>;

    /// Transform one (or two) uploaded images according to the prompt
    fn process_image(&self, request: &ProcessRequest<'_>) -> Result<Vec<u8>>;
}

/// Success response body
#[derive(Debug, Deserialize)]
struct ImageResponse {
    /// Base64-encoded PNG
    image: String,
}

/// Error response body (all fields optional on the wire)
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// HTTP client for the FabBanana API
pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client from server settings
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("FabBanana/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                warn!("Failed to create HTTP client: {}", e);
                // Preserve error chain by wrapping the source error
                FabBananaError::ConfigError(Box::new(e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for an endpoint
    fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// POST a multipart form and decode the image payload from the response
    fn send_form(&self, endpoint: Endpoint, form: Form) -> Result<Vec<u8>> {
        let url = self.endpoint_url(endpoint);
        debug!("Submitting request to {}", url);

        let response = self.client.post(&url).multipart(form).send().map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            // Preserve error chain by wrapping the source error
            FabBananaError::RequestFailed(Box::new(e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FabBananaError::RequestFailed(Box::new(e)))?;

        if !status.is_success() {
            let message = error_message(status.as_u16(), &body);
            warn!("Server returned {}: {}", status, message);
            return Err(FabBananaError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let png = parse_image_response(&body)?;
        info!("Received {} byte image from {}", png.len(), url);
        Ok(png)
    }
}

impl ImageBackend for ApiClient {
    fn text_to_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let form = Form::new().text("prompt", prompt.to_string());
        self.send_form(Endpoint::TextToImage, form)
    }

    fn process_image(&self, request: &ProcessRequest<'_>) -> Result<Vec<u8>> {
        let mut form = Form::new()
            .text("prompt", request.prompt.to_string())
            .text("mode", request.mode.wire_name())
            .part(
                "image",
                Part::bytes(request.primary.bytes.clone())
                    .file_name(request.primary.file_name.clone()),
            );

        if let Some(secondary) = request.secondary {
            form = form.part(
                "image2",
                Part::bytes(secondary.bytes.clone()).file_name(secondary.file_name.clone()),
            );
        }

        self.send_form(Endpoint::ProcessImage, form)
    }
}

/// Parse a success body and decode its base64 PNG payload
fn parse_image_response(body: &str) -> Result<Vec<u8>> {
    let response: ImageResponse = serde_json::from_str(body)?;
    decode_image_payload(&response.image)
}

/// Decode a base64 image payload into raw PNG bytes
pub fn decode_image_payload(payload: &str) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(payload.trim())?)
}

/// Extract a user-facing message from a non-success response body
///
/// Prefers the JSON `error` field; falls back to a generic HTTP status
/// message when the body is absent or malformed.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_else(|| format!("HTTP error: {status}"))
}
