//! Node descriptor for the Video Editor node.
//!
//! The host renders its configuration form from this metadata; the executor
//! reads the same field names and defaults at runtime, so the two surfaces
//! cannot drift apart.

use serde::Serialize;

use crate::credentials::CREDENTIAL_TYPE_NAME;

/// Node type identifier registered with the host.
pub const NODE_TYPE_NAME: &str = "videoEditor";

/// The single operation the node currently supports.
pub const OP_GENERATE_VIDEO: &str = "generateVideo";

// Form field names, shared with the executor.
pub const FIELD_OPERATION: &str = "operation";
pub const FIELD_VIDEO_URLS: &str = "videoUrls";
pub const FIELD_AUDIO_URLS: &str = "audioUrls";
pub const FIELD_TEXT_OVERLAYS: &str = "textOverlays";
pub const FIELD_TEMPLATE_STRUCTURE: &str = "templateStructure";
pub const FIELD_OUTPUT_FORMAT: &str = "outputFormat";
pub const FIELD_RESOLUTION: &str = "resolution";
pub const FIELD_WEBHOOK_URL: &str = "webhookUrl";

/// Default for the template-structure JSON text field.
pub const DEFAULT_TEMPLATE_STRUCTURE: &str = "{}";

/// Value type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    Color,
    /// Raw JSON text, parsed at execution time.
    Json,
    /// One value from a fixed option list.
    Options,
    /// Repeatable group of sub-fields, order-preserving.
    Collection,
}

/// One selectable value of an `Options` field.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyOption {
    pub name: &'static str,
    pub value: &'static str,
}

/// Declaration of a single form field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: &'static str,
    pub display_name: &'static str,
    pub kind: PropertyKind,
    pub default: &'static str,
    pub required: bool,
    pub description: &'static str,
    /// For `Options` fields: the allowed values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    /// For `Collection` fields: the per-entry sub-fields.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Property>,
}

impl Property {
    fn new(name: &'static str, display_name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            display_name,
            kind,
            default: "",
            required: false,
            description: "",
            options: Vec::new(),
            fields: Vec::new(),
        }
    }

    fn default_value(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn options(mut self, options: Vec<PropertyOption>) -> Self {
        self.options = options;
        self
    }

    fn fields(mut self, fields: Vec<Property>) -> Self {
        self.fields = fields;
        self
    }
}

/// Top-level node metadata the host's plugin registry consumes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub version: u32,
    pub credential_type: &'static str,
    pub properties: Vec<Property>,
}

impl NodeDescriptor {
    /// Builds the Video Editor node descriptor.
    pub fn video_editor() -> Self {
        Self {
            name: NODE_TYPE_NAME,
            display_name: "Video Editor",
            description: "Generate dynamic videos from templates",
            version: 1,
            credential_type: CREDENTIAL_TYPE_NAME,
            properties: vec![
                Property::new(FIELD_OPERATION, "Operation", PropertyKind::Options)
                    .default_value(OP_GENERATE_VIDEO)
                    .options(vec![PropertyOption {
                        name: "Generate Video",
                        value: OP_GENERATE_VIDEO,
                    }]),
                Property::new(FIELD_VIDEO_URLS, "Video URLs", PropertyKind::Collection)
                    .describe("Video clips composing the timeline, in order")
                    .fields(vec![
                        Property::new("url", "URL", PropertyKind::String)
                            .required()
                            .describe("URL of the video file"),
                        Property::new("startTime", "Start Time (seconds)", PropertyKind::Number)
                            .default_value("0"),
                        Property::new("endTime", "End Time (seconds)", PropertyKind::Number)
                            .default_value("0")
                            .describe("0 = full duration"),
                    ]),
                Property::new(FIELD_AUDIO_URLS, "Audio URLs", PropertyKind::Collection)
                    .describe("Audio tracks mixed into the output")
                    .fields(vec![
                        Property::new("url", "URL", PropertyKind::String)
                            .required()
                            .describe("URL of the audio file"),
                        Property::new("volume", "Volume", PropertyKind::Number)
                            .default_value("1")
                            .describe("Audio volume (0.0 to 1.0)"),
                        Property::new("loop", "Loop", PropertyKind::Boolean)
                            .default_value("false")
                            .describe("Loop the audio to fill the video duration"),
                    ]),
                Property::new(FIELD_TEXT_OVERLAYS, "Text Overlays", PropertyKind::Collection)
                    .fields(vec![
                        Property::new("text", "Text", PropertyKind::String).required(),
                        Property::new("font", "Font", PropertyKind::String)
                            .default_value("Arial"),
                        Property::new("color", "Color", PropertyKind::Color)
                            .default_value("#FFFFFF"),
                        Property::new("positionX", "Position X", PropertyKind::Number)
                            .default_value("50")
                            .describe("Horizontal position (percentage)"),
                        Property::new("positionY", "Position Y", PropertyKind::Number)
                            .default_value("50")
                            .describe("Vertical position (percentage)"),
                        Property::new("startTime", "Start Time (seconds)", PropertyKind::Number)
                            .default_value("0"),
                        Property::new("endTime", "End Time (seconds)", PropertyKind::Number)
                            .default_value("0")
                            .describe("0 = until end"),
                        Property::new("animation", "Animation", PropertyKind::Options)
                            .default_value("none")
                            .options(vec![
                                PropertyOption { name: "None", value: "none" },
                                PropertyOption { name: "Fade In", value: "fade-in" },
                                PropertyOption { name: "Slide Up", value: "slide-up" },
                                PropertyOption { name: "Slide Down", value: "slide-down" },
                            ]),
                    ]),
                Property::new(
                    FIELD_TEMPLATE_STRUCTURE,
                    "Template Structure (JSON)",
                    PropertyKind::Json,
                )
                .default_value(DEFAULT_TEMPLATE_STRUCTURE)
                .describe("Advanced template configuration as JSON"),
                Property::new(FIELD_OUTPUT_FORMAT, "Output Format", PropertyKind::Options)
                    .default_value("mp4")
                    .options(vec![
                        PropertyOption { name: "MP4", value: "mp4" },
                        PropertyOption { name: "WebM", value: "webm" },
                        PropertyOption { name: "AVI", value: "avi" },
                    ]),
                Property::new(FIELD_RESOLUTION, "Resolution", PropertyKind::Options)
                    .default_value("1920x1080")
                    .options(vec![
                        PropertyOption { name: "1920x1080 (Full HD)", value: "1920x1080" },
                        PropertyOption { name: "1280x720 (HD)", value: "1280x720" },
                        PropertyOption { name: "854x480 (SD)", value: "854x480" },
                        PropertyOption { name: "640x360", value: "640x360" },
                    ]),
                Property::new(FIELD_WEBHOOK_URL, "Webhook URL", PropertyKind::String)
                    .describe("URL to receive completion notification (optional)"),
            ],
        }
    }

    /// Looks up a declared property by field name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}
