//! Generation modes and their per-mode configuration
//!
//! Every mode-dependent behavior (default prompt, required inputs, target
//! endpoint, control labels) lives in one total lookup table so that no code
//! path needs scattered membership checks and no mode can silently fall back
//! to generic behavior.

use std::fmt;

/// The selected image-generation/editing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Generate an image from the prompt alone
    TextToImage,
    /// Extend the primary image beyond its borders
    Uncropping,
    /// Turn the primary image into an avatar
    Avatar,
    /// Stamp the secondary image onto the primary image
    Watermark,
    /// Place the primary image into the secondary background scene
    ProductMockup,
    /// Apply the prompt to every selected file, bundling results into a zip
    Batch,
}

/// Target endpoint for a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Text-only generation endpoint
    TextToImage,
    /// Shared image-processing endpoint
    ProcessImage,
}

impl Endpoint {
    /// URL path of this endpoint, relative to the configured base URL
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::TextToImage => "/api/text-to-image",
            Endpoint::ProcessImage => "/api/process-image",
        }
    }
}

/// Static per-mode configuration
#[derive(Debug, Clone, Copy)]
pub struct ModeSpec {
    /// Prompt text the input is reset to when this mode is selected
    pub prompt_default: &'static str,
    /// Whether submission requires at least one primary file
    pub requires_primary: bool,
    /// Whether submission requires the secondary file
    pub requires_secondary: bool,
    /// Whether the primary file picker accepts multiple files
    pub multi_select: bool,
    /// Endpoint submissions are sent to
    pub endpoint: Endpoint,
    /// Label of the action button
    pub action_label: &'static str,
    /// Label of the primary upload control
    pub primary_upload_label: &'static str,
    /// Label of the secondary upload control, if the mode uses one
    pub secondary_upload_label: Option<&'static str>,
}

impl Mode {
    /// All modes, in display order
    pub const ALL: [Mode; 6] = [
        Mode::TextToImage,
        Mode::Uncropping,
        Mode::Avatar,
        Mode::Watermark,
        Mode::ProductMockup,
        Mode::Batch,
    ];

    /// Mode active at application startup
    pub const DEFAULT: Mode = Mode::TextToImage;

    /// Identifier used on the wire and in derived filenames
    pub fn wire_name(self) -> &'static str {
        match self {
            Mode::TextToImage => "text_to_image",
            Mode::Uncropping => "uncropping",
            Mode::Avatar => "avatar",
            Mode::Watermark => "watermark",
            Mode::ProductMockup => "product_mockup",
            Mode::Batch => "batch",
        }
    }

    /// Parse a wire identifier back into a mode
    pub fn from_wire_name(name: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.wire_name() == name)
    }

    /// Human-readable name shown on the mode controls
    pub fn display_label(self) -> &'static str {
        match self {
            Mode::TextToImage => "Text to Image",
            Mode::Uncropping => "Uncropping",
            Mode::Avatar => "Avatar",
            Mode::Watermark => "Watermark",
            Mode::ProductMockup => "Product Mockup",
            Mode::Batch => "Batch",
        }
    }

    /// Configuration for this mode
    ///
    /// The table is total over the enum: an unknown mode cannot exist, so
    /// nothing ever falls back to defaults.
    pub fn spec(self) -> &'static ModeSpec {
        match self {
            Mode::TextToImage => &ModeSpec {
                prompt_default: "A photorealistic banana astronaut floating above the Earth",
                requires_primary: false,
                requires_secondary: false,
                multi_select: false,
                endpoint: Endpoint::TextToImage,
                action_label: "Generate",
                primary_upload_label: "Upload image",
                secondary_upload_label: None,
            },
            Mode::Uncropping => &ModeSpec {
                prompt_default: "Extend the image beyond its borders, continuing the scene naturally",
                requires_primary: true,
                requires_secondary: false,
                multi_select: false,
                endpoint: Endpoint::ProcessImage,
                action_label: "Expand",
                primary_upload_label: "Upload image",
                secondary_upload_label: None,
            },
            Mode::Avatar => &ModeSpec {
                prompt_default: "Turn this photo into a friendly illustrated avatar on a plain background",
                requires_primary: true,
                requires_secondary: false,
                multi_select: false,
                endpoint: Endpoint::ProcessImage,
                action_label: "Create",
                primary_upload_label: "Upload photo",
                secondary_upload_label: None,
            },
            Mode::Watermark => &ModeSpec {
                prompt_default: "Place the second image as a subtle watermark in the bottom right corner",
                requires_primary: true,
                requires_secondary: true,
                multi_select: false,
                endpoint: Endpoint::ProcessImage,
                action_label: "Add",
                primary_upload_label: "Upload image",
                secondary_upload_label: Some("Load watermark"),
            },
            Mode::ProductMockup => &ModeSpec {
                prompt_default: "Place the product naturally into the background scene with matching lighting",
                requires_primary: true,
                requires_secondary: true,
                multi_select: false,
                endpoint: Endpoint::ProcessImage,
                action_label: "Create",
                primary_upload_label: "Upload product",
                secondary_upload_label: Some("Load background"),
            },
            Mode::Batch => &ModeSpec {
                prompt_default: "Apply a warm, cinematic color grade",
                requires_primary: true,
                requires_secondary: false,
                multi_select: true,
                endpoint: Endpoint::ProcessImage,
                action_label: "Start",
                primary_upload_label: "Select images",
                secondary_upload_label: None,
            },
        }
    }

    /// Suggested filename for a single-result download: `<mode>_<unixtime-ms>.png`
    pub fn output_filename(self, timestamp_ms: u128) -> String {
        format!("{}_{}.png", self.wire_name(), timestamp_ms)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
