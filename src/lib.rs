//! Video Editor node plugin
//!
//! A workflow-automation plugin exposing a "Video Editor" node and its
//! credential type. Per input item the node assembles one JSON request from
//! the configured form fields and issues one authenticated POST to a
//! video-generation API, pairing each response (or error record) with its
//! source item.
//!
//! The host owns credential storage, form rendering, and transport policy;
//! it reaches this crate through two seams: [`params::ParameterSource`] for
//! per-item field access and [`transport::AuthenticatedRequester`] for the
//! outbound call. [`transport::HttpTransport`] is a ready-made requester for
//! headless embedders.

pub mod credentials;
pub mod error;
pub mod executor;
pub mod params;
pub mod request;
pub mod schema;
pub mod transport;

pub use credentials::{CredentialField, CredentialTestRequest, VideoEditorApiCredential};
pub use error::{NodeError, NodeResult};
pub use executor::{ExecutionOutput, VideoEditorNode};
pub use params::{JsonParameterSource, ParameterSource};
pub use request::{
    AudioTrackRef, GenerateVideoRequest, OutputFormat, OutputSettings, Resolution, TextAnimation,
    TextOverlay, VideoClipRef,
};
pub use schema::NodeDescriptor;
pub use transport::{AuthenticatedRequester, HttpTransport};
