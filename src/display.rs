//! Terminal output for the demos.
//!
//! Colours: yellow for warnings, red for errors, cyan for routing traces and
//! blue for echoed user turns. Renderers that tests inspect take a `color`
//! flag so their output can be checked without escape codes.

use crate::agent::TurnEvent;
use crate::router::RouteCategory;
use crate::types::{EVENT_COMPLETED, EVENT_OUTPUT_TEXT_DELTA, ITEM_WEB_SEARCH_CALL, ResponseObject};
use crate::utils::ResponseEventStream;
use crate::Result;
use colored::Colorize;
use futures::StreamExt;
use std::io::Write;

/// Print a warning in yellow.
pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

/// Print an error in red.
pub fn error(message: &str) {
    println!("{}", message.red());
}

/// Lines reporting a failed model selection: the specific cause, then
/// `summary` when one is given.
pub fn model_error_lines(err: &crate::Error, summary: Option<&str>) -> Vec<String> {
    let mut lines = vec![err.to_string()];
    lines.extend(summary.map(str::to_string));
    lines
}

/// Print [`model_error_lines`] in red.
pub fn model_error(err: &crate::Error, summary: Option<&str>) {
    for line in model_error_lines(err, summary) {
        error(&line);
    }
}

/// Print which agent a prompt was routed to, in cyan.
pub fn route_trace(prompt: &str, route: RouteCategory) {
    println!("{}", format!("[router] {} -> {}", prompt, route).cyan());
}

/// Echo a user prompt in blue.
pub fn user_echo(prompt: &str) {
    println!("{}", format!("User> {}", prompt).blue());
}

/// Write streamed output text as it arrives, ending the line on completion.
///
/// Returns the full text that was written.
pub async fn write_stream<W: Write>(mut stream: ResponseEventStream, out: &mut W) -> Result<String> {
    let mut text = String::new();
    while let Some(event) = stream.next().await {
        let event = event?;
        match event.event_type.as_str() {
            EVENT_OUTPUT_TEXT_DELTA => {
                if let Some(delta) = event.delta.filter(|d| !d.is_empty()) {
                    write!(out, "{}", delta).and_then(|_| out.flush()).map_err(io_error)?;
                    text.push_str(&delta);
                }
            }
            EVENT_COMPLETED => writeln!(out).map_err(io_error)?,
            _ => {}
        }
    }
    Ok(text)
}

/// [`write_stream`] to stdout.
pub async fn print_stream(stream: ResponseEventStream) -> Result<String> {
    let mut stdout = std::io::stdout();
    write_stream(stream, &mut stdout).await
}

fn io_error(e: std::io::Error) -> crate::Error {
    crate::Error::other(format!("failed to write output: {}", e))
}

/// Lines summarising a non-streamed response: the answer, then each output item.
pub fn response_lines(response: &ResponseObject) -> Vec<String> {
    let mut lines = Vec::new();

    let answer = response.output_text();
    if answer.is_empty() {
        lines.push("[responses] answer: (empty)".to_string());
    } else {
        lines.push(format!("[responses] answer: {}", answer));
    }

    lines.push("[responses] output items:".to_string());
    for item in &response.output {
        lines.push(format!(
            "- type={} status={}",
            item.item_type,
            item.status.as_deref().unwrap_or("None")
        ));
        if item.item_type == ITEM_WEB_SEARCH_CALL {
            lines.push(format!("  id={}", item.id.as_deref().unwrap_or("None")));
        }
    }

    lines
}

/// Print [`response_lines`] to stdout.
pub fn print_response(response: &ResponseObject) {
    for line in response_lines(response) {
        println!("{}", line);
    }
}

/// Renders agent turn events as terminal text.
#[derive(Debug, Clone, Copy)]
pub struct EventLogger {
    color: bool,
}

impl Default for EventLogger {
    fn default() -> Self {
        Self { color: true }
    }
}

impl EventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger that never emits escape codes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// One printable chunk per event, each ending in a newline.
    pub fn log(&self, events: &[TurnEvent]) -> Vec<String> {
        events.iter().map(|event| self.render(event)).collect()
    }

    fn render(&self, event: &TurnEvent) -> String {
        let (label, body) = match event {
            TurnEvent::Inference(text) => ("inference>", text.clone()),
            TurnEvent::ToolCall { name, arguments } => {
                ("tool_execution>", format!("Tool:{} Args:{}", name, arguments))
            }
            TurnEvent::ToolResult { name, result } => {
                ("tool_execution>", format!("Tool:{} Response:{}", name, result))
            }
        };

        if !self.color {
            return format!("{} {}\n", label, body);
        }
        match event {
            TurnEvent::Inference(_) => format!("{} {}\n", label.yellow(), body.yellow()),
            _ => format!("{} {}\n", label.green(), body.green()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseStreamEvent;
    use serde_json::json;

    fn event(value: serde_json::Value) -> Result<ResponseStreamEvent> {
        Ok(serde_json::from_value(value).unwrap())
    }

    #[tokio::test]
    async fn test_write_stream_prints_deltas_then_newline() {
        let events = vec![
            event(json!({"type": "response.created"})),
            event(json!({"type": "response.output_text.delta", "delta": "Hello"})),
            event(json!({"type": "response.output_text.delta", "delta": ""})),
            event(json!({"type": "response.output_text.delta", "delta": ", world"})),
            event(json!({"type": "response.completed"})),
        ];
        let stream: ResponseEventStream = Box::pin(futures::stream::iter(events));

        let mut out = Vec::new();
        let text = write_stream(stream, &mut out).await.unwrap();
        assert_eq!(text, "Hello, world");
        assert_eq!(String::from_utf8(out).unwrap(), "Hello, world\n");
    }

    #[tokio::test]
    async fn test_write_stream_stops_on_error() {
        let events = vec![
            event(json!({"type": "response.output_text.delta", "delta": "partial"})),
            Err(crate::Error::stream("connection reset")),
        ];
        let stream: ResponseEventStream = Box::pin(futures::stream::iter(events));

        let mut out = Vec::new();
        assert!(write_stream(stream, &mut out).await.is_err());
        assert_eq!(out, b"partial");
    }

    #[test]
    fn test_response_lines() {
        let response: ResponseObject = serde_json::from_value(json!({
            "id": "resp_1",
            "output": [
                {"type": "web_search_call", "id": "ws_1", "status": "completed"},
                {"type": "message", "status": "completed", "content": [
                    {"type": "output_text", "text": "An open server."}
                ]}
            ]
        }))
        .unwrap();

        assert_eq!(
            response_lines(&response),
            vec![
                "[responses] answer: An open server.",
                "[responses] output items:",
                "- type=web_search_call status=completed",
                "  id=ws_1",
                "- type=message status=completed",
            ]
        );
    }

    #[test]
    fn test_response_lines_empty_answer() {
        let response: ResponseObject = serde_json::from_value(json!({"id": "r", "output": []})).unwrap();
        assert_eq!(response_lines(&response)[0], "[responses] answer: (empty)");
    }

    #[test]
    fn test_model_error_lines_keep_the_cause() {
        let err = crate::Error::model_not_found("gpt-4o", vec!["llama3.2:3b".into()]);
        let lines = model_error_lines(&err, Some("No chat-capable model available."));
        assert_eq!(
            lines,
            vec![
                "Model `gpt-4o` not found. Available models:\n\n[\"llama3.2:3b\"]\n".to_string(),
                "No chat-capable model available.".to_string(),
            ]
        );

        let lines = model_error_lines(&crate::Error::NoModelsAvailable, None);
        assert_eq!(lines, vec!["No available models."]);
    }

    #[test]
    fn test_event_logger_plain() {
        let lines = EventLogger::plain().log(&[
            TurnEvent::ToolCall {
                name: "calculator".into(),
                arguments: json!({"x": 1}),
            },
            TurnEvent::ToolResult {
                name: "calculator".into(),
                result: json!({"result": 2}),
            },
            TurnEvent::Inference("The answer is 2.".into()),
        ]);
        assert_eq!(
            lines,
            vec![
                "tool_execution> Tool:calculator Args:{\"x\":1}\n",
                "tool_execution> Tool:calculator Response:{\"result\":2}\n",
                "inference> The answer is 2.\n",
            ]
        );
    }
}
