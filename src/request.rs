//! Wire types for the `/generate-video` request body.
//!
//! Field names and casing match the downstream API exactly. Numeric defaults
//! are serialized literally: `endTime: 0` means "until the clip's natural
//! end" downstream, so the literal zero must survive into the body.

use serde::{Deserialize, Serialize};

/// One video clip on the composition timeline. Order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoClipRef {
    pub url: String,
    #[serde(default)]
    pub start_time: f64,
    /// 0 = play until the clip's natural end.
    #[serde(default)]
    pub end_time: f64,
}

/// One audio track mixed into the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioTrackRef {
    pub url: String,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default, rename = "loop")]
    pub looped: bool,
}

fn default_volume() -> f64 {
    1.0
}

/// Text overlay animation styles offered by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAnimation {
    #[default]
    None,
    FadeIn,
    SlideUp,
    SlideDown,
}

/// A text overlay rendered on top of the composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    pub text: String,
    #[serde(default = "default_font")]
    pub font: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Horizontal position as a percentage of the frame width.
    #[serde(default = "default_position")]
    pub position_x: f64,
    /// Vertical position as a percentage of the frame height.
    #[serde(default = "default_position")]
    pub position_y: f64,
    #[serde(default)]
    pub start_time: f64,
    /// 0 = show until the end of the video.
    #[serde(default)]
    pub end_time: f64,
    #[serde(default)]
    pub animation: TextAnimation,
}

fn default_font() -> String {
    "Arial".to_string()
}

fn default_color() -> String {
    "#FFFFFF".to_string()
}

fn default_position() -> f64 {
    50.0
}

/// Container format for the rendered video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Mp4,
    Webm,
    Avi,
}

/// Output resolutions offered by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "1920x1080")]
    FullHd,
    #[serde(rename = "1280x720")]
    Hd,
    #[serde(rename = "854x480")]
    Sd,
    #[serde(rename = "640x360")]
    Small,
}

/// Rendering settings for the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub resolution: Resolution,
}

/// Complete request body for `POST /generate-video`.
///
/// Constructed fresh per input item and never mutated afterwards. The
/// collections keep their input order; clip order determines timeline
/// composition downstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    pub video_urls: Vec<VideoClipRef>,
    pub audio_urls: Vec<AudioTrackRef>,
    pub text_overlays: Vec<TextOverlay>,
    /// Advanced template configuration, already parsed from the form's JSON
    /// text field.
    pub template_structure: serde_json::Value,
    pub output_settings: OutputSettings,
    /// Omitted from the body entirely when no webhook is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}
