//! Research Wire Adapter
//!
//! Decodes one line of the research backend's event stream into node
//! events. Data lines carry a JSON object whose top-level keys name the
//! pipeline nodes that just ran; everything else (heartbeats, SSE comment
//! and metadata lines, end markers) yields nothing.

use trust_recon_core::streaming::{AdapterError, NodeEvent, StreamAdapter};

/// Adapter for the backend's newline-delimited frame format.
#[derive(Debug, Default)]
pub struct NodeStreamAdapter;

impl NodeStreamAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StreamAdapter for NodeStreamAdapter {
    fn source_name(&self) -> &'static str {
        "research-backend"
    }

    fn adapt(&mut self, input: &str) -> Result<Vec<NodeEvent>, AdapterError> {
        let trimmed = input.trim();

        // Frames may arrive as "data: {...}" or as bare JSON objects.
        // SSE streams also carry event:, id:, retry:, and comment lines.
        let json_str = if let Some(rest) = trimmed.strip_prefix("data: ") {
            rest
        } else if trimmed.starts_with('{') {
            trimmed
        } else {
            // Skip heartbeats, comments, and non-data SSE lines
            return Ok(vec![]);
        };

        if json_str.is_empty() || json_str == "[DONE]" {
            return Ok(vec![]);
        }

        let value: serde_json::Value = serde_json::from_str(json_str)
            .map_err(|e| AdapterError::ParseError(e.to_string()))?;

        match value {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(node_name, payload)| NodeEvent::new(node_name, payload))
                .collect()),
            _ => Err(AdapterError::InvalidFormat(
                "frame payload is not a JSON object".to_string(),
            )),
        }
    }
}
