//! Streaming utilities for SSE parsing.
//!
//! A streamed response arrives as Server-Sent Events whose `data` field holds
//! one JSON event:
//!
//! ```text
//! event: response.output_text.delta
//! data: {"type":"response.output_text.delta","delta":"Hel","sequence_number":3}
//!
//! event: response.completed
//! data: {"type":"response.completed","response":{...}}
//!
//! data: [DONE]
//! ```
//!
//! Event framing (line splitting across chunk boundaries, multi-line `data`,
//! comments) is handled by `eventsource-stream`; this module only turns each
//! payload into a [`ResponseStreamEvent`].

use crate::types::ResponseStreamEvent;
use crate::{Error, Result};
use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;

/// A pinned, boxed stream of response events.
pub type ResponseEventStream = Pin<Box<dyn Stream<Item = Result<ResponseStreamEvent>> + Send>>;

/// Sentinel some servers send after the last event.
const DONE_SENTINEL: &str = "[DONE]";

/// Decode one SSE `data` payload.
///
/// Returns `None` for the `[DONE]` sentinel and for empty keep-alive payloads.
pub(crate) fn decode_event(data: &str) -> Option<Result<ResponseStreamEvent>> {
    let data = data.trim();
    if data.is_empty() || data == DONE_SENTINEL {
        return None;
    }

    Some(
        serde_json::from_str(data)
            .map_err(|e| Error::stream(format!("Failed to parse event: {}", e))),
    )
}

/// Parses a streaming HTTP response into a stream of [`ResponseStreamEvent`]s.
///
/// Each item is a `Result`: transport failures surface as [`Error::Stream`],
/// and so do payloads that are not valid event JSON. Consumers decide whether
/// to stop at the first error.
pub fn parse_sse_stream(body: reqwest::Response) -> ResponseEventStream {
    let stream = body
        .bytes_stream()
        .eventsource()
        .filter_map(|result| async move {
            match result {
                Ok(event) => decode_event(&event.data),
                Err(e) => Some(Err(Error::stream(format!("SSE stream error: {}", e)))),
            }
        });

    Box::pin(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EVENT_COMPLETED, EVENT_OUTPUT_TEXT_DELTA};

    #[test]
    fn test_decode_delta() {
        let event = decode_event(r#"{"type":"response.output_text.delta","delta":"Hi"}"#)
            .unwrap()
            .unwrap();
        assert_eq!(event.event_type, EVENT_OUTPUT_TEXT_DELTA);
        assert_eq!(event.delta.as_deref(), Some("Hi"));
    }

    #[test]
    fn test_decode_completed_with_response() {
        let event = decode_event(
            r#"{"type":"response.completed","response":{"id":"resp_1","status":"completed","output":[]}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(event.event_type, EVENT_COMPLETED);
        assert_eq!(event.response.unwrap().id, "resp_1");
    }

    #[test]
    fn test_decode_skips_sentinel_and_blank() {
        assert!(decode_event("[DONE]").is_none());
        assert!(decode_event("  ").is_none());
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_event("{not json").unwrap().unwrap_err();
        assert!(matches!(err, Error::Stream(_)));
    }
}
