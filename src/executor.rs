//! Video Editor node executor.
//!
//! Processes a batch of input items sequentially: per item, reads the form
//! parameters, assembles one `GenerateVideoRequest`, issues one authenticated
//! POST, and pairs the response (or an error record, when continue-on-fail is
//! enabled) with the item that produced it.

use reqwest::Method;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{NodeError, NodeResult};
use crate::params::{read_collection, read_option, read_string, ParameterSource};
use crate::request::{
    AudioTrackRef, GenerateVideoRequest, OutputFormat, OutputSettings, Resolution, TextOverlay,
    VideoClipRef,
};
use crate::schema::{
    DEFAULT_TEMPLATE_STRUCTURE, FIELD_AUDIO_URLS, FIELD_OPERATION, FIELD_OUTPUT_FORMAT,
    FIELD_RESOLUTION, FIELD_TEMPLATE_STRUCTURE, FIELD_TEXT_OVERLAYS, FIELD_VIDEO_URLS,
    FIELD_WEBHOOK_URL, OP_GENERATE_VIDEO,
};
use crate::transport::AuthenticatedRequester;

/// Path of the generation endpoint under the credential's base URL.
const GENERATE_VIDEO_PATH: &str = "/generate-video";

/// One output record, paired with the input item that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutput {
    /// The API response on success, or `{"error": <message>}` when the item
    /// failed under continue-on-fail.
    pub json: serde_json::Value,
    /// Index of the input item this record belongs to.
    pub source_item: usize,
}

/// The Video Editor node.
pub struct VideoEditorNode {
    transport: Arc<dyn AuthenticatedRequester>,
    continue_on_fail: bool,
}

impl VideoEditorNode {
    pub fn new(transport: Arc<dyn AuthenticatedRequester>) -> Self {
        Self {
            transport,
            continue_on_fail: false,
        }
    }

    /// Per-item failures become error records instead of aborting the batch.
    pub fn with_continue_on_fail(mut self, continue_on_fail: bool) -> Self {
        self.continue_on_fail = continue_on_fail;
        self
    }

    /// Executes the node over a batch of `source.len()` items.
    ///
    /// Items are processed strictly in index order, one outbound call per
    /// item. With continue-on-fail the output always has one record per
    /// input item; otherwise the first failure aborts the batch and any
    /// outputs accumulated for earlier items are discarded.
    pub async fn execute(&self, source: &dyn ParameterSource) -> NodeResult<Vec<ExecutionOutput>> {
        let mut outputs = Vec::with_capacity(source.len());

        for i in 0..source.len() {
            match self.execute_item(source, i).await {
                Ok(response) => {
                    outputs.push(ExecutionOutput {
                        json: response,
                        source_item: i,
                    });
                }
                Err(err) => {
                    if !self.continue_on_fail {
                        return Err(err.for_item(i));
                    }
                    warn!(item = i, error = %err, "item failed, continuing");
                    outputs.push(ExecutionOutput {
                        json: json!({ "error": err.to_string() }),
                        source_item: i,
                    });
                }
            }
        }

        info!(items = source.len(), outputs = outputs.len(), "batch complete");
        Ok(outputs)
    }

    async fn execute_item(
        &self,
        source: &dyn ParameterSource,
        i: usize,
    ) -> NodeResult<serde_json::Value> {
        let operation = read_string(source, FIELD_OPERATION, i, OP_GENERATE_VIDEO)?;
        if operation != OP_GENERATE_VIDEO {
            return Err(NodeError::UnknownOperation(operation));
        }

        let request = build_generate_request(source, i)?;
        debug!(
            item = i,
            clips = request.video_urls.len(),
            audio = request.audio_urls.len(),
            overlays = request.text_overlays.len(),
            "submitting generation request"
        );

        let body = serde_json::to_value(&request)
            .map_err(|e| NodeError::Serialization(e.to_string()))?;

        self.transport
            .request_json(Method::POST, GENERATE_VIDEO_PATH, Some(body))
            .await
    }
}

/// Assembles the request body for item `i` from the form parameters.
///
/// Raises only validation errors; no network access happens here.
pub fn build_generate_request(
    source: &dyn ParameterSource,
    i: usize,
) -> NodeResult<GenerateVideoRequest> {
    let video_urls: Vec<VideoClipRef> = read_collection(source, FIELD_VIDEO_URLS, "videoUrl", i)?;
    let audio_urls: Vec<AudioTrackRef> = read_collection(source, FIELD_AUDIO_URLS, "audioUrl", i)?;
    let text_overlays: Vec<TextOverlay> =
        read_collection(source, FIELD_TEXT_OVERLAYS, "textOverlay", i)?;

    let template_text = read_string(
        source,
        FIELD_TEMPLATE_STRUCTURE,
        i,
        DEFAULT_TEMPLATE_STRUCTURE,
    )?;
    let template_structure = serde_json::from_str(&template_text)
        .map_err(|e| NodeError::invalid_parameter(FIELD_TEMPLATE_STRUCTURE, e.to_string()))?;

    let format: OutputFormat = read_option(source, FIELD_OUTPUT_FORMAT, i, OutputFormat::Mp4)?;
    let resolution: Resolution = read_option(source, FIELD_RESOLUTION, i, Resolution::FullHd)?;

    // A blank webhook URL is omitted from the body, not sent as "".
    let webhook_url = match read_string(source, FIELD_WEBHOOK_URL, i, "")? {
        url if url.is_empty() => None,
        url => Some(url),
    };

    Ok(GenerateVideoRequest {
        video_urls,
        audio_urls,
        text_overlays,
        template_structure,
        output_settings: OutputSettings { format, resolution },
        webhook_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::JsonParameterSource;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Transport double recording every request and replaying canned
    /// responses in call order.
    struct MockTransport {
        responses: Mutex<Vec<NodeResult<Value>>>,
        calls: Mutex<Vec<(Method, String, Option<Value>)>>,
    }

    impl MockTransport {
        fn new(responses: Vec<NodeResult<Value>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn accepted() -> Arc<Self> {
            Self::new(vec![Ok(
                json!({ "status": "processing", "jobId": "job-1" }),
            )])
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn request_body(&self, call: usize) -> Value {
            self.calls.lock().unwrap()[call].2.clone().unwrap()
        }
    }

    #[async_trait]
    impl AuthenticatedRequester for MockTransport {
        async fn request_json(
            &self,
            method: Method,
            path: &str,
            body: Option<Value>,
        ) -> NodeResult<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((method, path.to_string(), body));
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(json!({ "status": "processing", "jobId": "job-n" }))
            } else {
                responses.remove(0)
            }
        }
    }

    fn items(values: Vec<Value>) -> JsonParameterSource {
        JsonParameterSource::from_values(values)
    }

    fn generate_item() -> Value {
        json!({
            "operation": "generateVideo",
            "videoUrls": [{ "url": "a.mp4", "startTime": 0, "endTime": 5 }],
        })
    }

    #[tokio::test]
    async fn test_empty_batch_yields_empty_output() {
        let transport = MockTransport::accepted();
        let node = VideoEditorNode::new(transport.clone());
        let outputs = node.execute(&items(vec![])).await.unwrap();
        assert!(outputs.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_single_item_posts_to_generate_video() {
        let transport = MockTransport::accepted();
        let node = VideoEditorNode::new(transport.clone());

        let outputs = node.execute(&items(vec![generate_item()])).await.unwrap();

        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].source_item, 0);
        assert_eq!(outputs[0].json["jobId"], "job-1");

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Method::POST);
        assert_eq!(calls[0].1, "/generate-video");
    }

    #[tokio::test]
    async fn test_output_pairs_every_item_in_order() {
        let transport = MockTransport::new(vec![
            Ok(json!({ "jobId": "job-0" })),
            Ok(json!({ "jobId": "job-1" })),
            Ok(json!({ "jobId": "job-2" })),
        ]);
        let node = VideoEditorNode::new(transport.clone()).with_continue_on_fail(true);

        let batch = items(vec![generate_item(), generate_item(), generate_item()]);
        let outputs = node.execute(&batch).await.unwrap();

        assert_eq!(outputs.len(), 3);
        for (i, output) in outputs.iter().enumerate() {
            assert_eq!(output.source_item, i);
            assert_eq!(output.json["jobId"], format!("job-{i}"));
        }
    }

    #[tokio::test]
    async fn test_malformed_template_fails_before_network() {
        let transport = MockTransport::accepted();
        let node = VideoEditorNode::new(transport.clone());

        let batch = items(vec![json!({
            "operation": "generateVideo",
            "templateStructure": "not json",
        })]);
        let err = node.execute(&batch).await.unwrap_err();

        assert_eq!(transport.call_count(), 0);
        assert!(err.is_validation());
        match err {
            NodeError::Item { index, .. } => assert_eq!(index, 0),
            other => panic!("expected Item wrapper, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_template_object_reaches_body() {
        let transport = MockTransport::accepted();
        let node = VideoEditorNode::new(transport.clone());

        let batch = items(vec![json!({
            "operation": "generateVideo",
            "templateStructure": "{}",
        })]);
        node.execute(&batch).await.unwrap();

        let body = transport.request_body(0);
        assert_eq!(body["templateStructure"], json!({}));
    }

    #[tokio::test]
    async fn test_blank_webhook_omitted_non_blank_verbatim() {
        let transport = MockTransport::new(vec![Ok(json!({})), Ok(json!({}))]);
        let node = VideoEditorNode::new(transport.clone());

        let batch = items(vec![
            json!({ "operation": "generateVideo", "webhookUrl": "" }),
            json!({ "operation": "generateVideo", "webhookUrl": "https://hooks.example.com/x" }),
        ]);
        node.execute(&batch).await.unwrap();

        assert!(transport.request_body(0).get("webhookUrl").is_none());
        assert_eq!(
            transport.request_body(1)["webhookUrl"],
            "https://hooks.example.com/x"
        );
    }

    #[tokio::test]
    async fn test_clip_defaults_and_order_in_body() {
        let transport = MockTransport::accepted();
        let node = VideoEditorNode::new(transport.clone());

        let batch = items(vec![json!({
            "operation": "generateVideo",
            "videoUrls": [
                { "url": "a.mp4", "startTime": 0, "endTime": 5 },
                { "url": "b.mp4" },
            ],
        })]);
        node.execute(&batch).await.unwrap();

        let clips = transport.request_body(0)["videoUrls"].clone();
        let clips = clips.as_array().unwrap();
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0]["url"], "a.mp4");
        assert_eq!(clips[0]["endTime"], json!(5.0));
        assert_eq!(clips[1]["url"], "b.mp4");
        assert_eq!(clips[1]["startTime"], json!(0.0));
        assert_eq!(clips[1]["endTime"], json!(0.0));
    }

    #[tokio::test]
    async fn test_transport_failure_aborts_without_continue_on_fail() {
        let transport = MockTransport::new(vec![
            Ok(json!({ "jobId": "job-0" })),
            Err(NodeError::ApiError {
                status: 500,
                message: "render farm down".to_string(),
            }),
            Ok(json!({ "jobId": "job-2" })),
        ]);
        let node = VideoEditorNode::new(transport.clone());

        let batch = items(vec![generate_item(), generate_item(), generate_item()]);
        let err = node.execute(&batch).await.unwrap_err();

        // Item 2 was never attempted.
        assert_eq!(transport.call_count(), 2);
        match err {
            NodeError::Item { index, source } => {
                assert_eq!(index, 1);
                assert!(matches!(*source, NodeError::ApiError { status: 500, .. }));
            }
            other => panic!("expected Item wrapper, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_recorded_with_continue_on_fail() {
        let transport = MockTransport::new(vec![
            Ok(json!({ "jobId": "job-0" })),
            Err(NodeError::Network("connection reset".to_string())),
            Ok(json!({ "jobId": "job-2" })),
        ]);
        let node = VideoEditorNode::new(transport.clone()).with_continue_on_fail(true);

        let batch = items(vec![generate_item(), generate_item(), generate_item()]);
        let outputs = node.execute(&batch).await.unwrap();

        assert_eq!(outputs.len(), 3);
        assert_eq!(outputs[0].json["jobId"], "job-0");
        assert_eq!(outputs[1].source_item, 1);
        assert!(outputs[1].json["error"]
            .as_str()
            .unwrap()
            .contains("connection reset"));
        assert_eq!(outputs[2].json["jobId"], "job-2");
    }

    #[tokio::test]
    async fn test_unknown_operation_is_a_validation_error() {
        let transport = MockTransport::accepted();
        let node = VideoEditorNode::new(transport.clone()).with_continue_on_fail(true);

        let batch = items(vec![json!({ "operation": "deleteVideo" })]);
        let outputs = node.execute(&batch).await.unwrap();

        assert_eq!(transport.call_count(), 0);
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0].json["error"]
            .as_str()
            .unwrap()
            .contains("deleteVideo"));
    }

    #[tokio::test]
    async fn test_operation_defaults_to_generate_video() {
        let transport = MockTransport::accepted();
        let node = VideoEditorNode::new(transport.clone());

        let outputs = node.execute(&items(vec![json!({})])).await.unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(transport.call_count(), 1);
    }

    #[test]
    fn test_build_request_missing_clip_url() {
        let batch = items(vec![json!({
            "videoUrls": { "videoUrl": [{ "startTime": 3 }] },
        })]);
        let err = build_generate_request(&batch, 0).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_build_request_defaults() {
        let batch = items(vec![json!({})]);
        let request = build_generate_request(&batch, 0).unwrap();

        assert!(request.video_urls.is_empty());
        assert!(request.audio_urls.is_empty());
        assert!(request.text_overlays.is_empty());
        assert_eq!(request.template_structure, json!({}));
        assert_eq!(request.output_settings, OutputSettings::default());
        assert!(request.webhook_url.is_none());
    }
}
