//! Agents: a model, standing instructions and a set of client tools, driven
//! over the Responses API.
//!
//! ## Turn flow
//!
//! ```text
//! create_turn(session, prompt)
//!     │
//!     ├─> POST /v1/responses  (conversation = session id, tools = function specs)
//!     │
//!     ├─> output text          → TurnEvent::Inference
//!     │
//!     ├─> function_call items? ── no ──> turn complete
//!     │        │
//!     │        yes
//!     │        ├─> run each tool locally        → TurnEvent::ToolCall / ToolResult
//!     │        └─> POST /v1/responses with function_call_output items
//!     │
//!     └─> repeat, at most max_tool_iterations tool rounds; further calls get
//!         an error output and a final request runs with tool_choice "none"
//! ```
//!
//! Conversation state lives on the server: each session is a conversation,
//! so follow-up requests only carry the new input items.
//!
//! A tool that fails, is unknown, or receives unparseable arguments does not
//! abort the turn. The failure is sent back to the model as a JSON error
//! payload and the model decides how to proceed.

use crate::client::StackClient;
use crate::tools::Tool;
use crate::types::{InputItem, OutputItem, ResponseRequest, ToolChoice};
use crate::{Error, Result};
use serde_json::{Value, json};

/// Default bound on tool rounds per turn.
pub const DEFAULT_MAX_TOOL_ITERATIONS: u32 = 5;

const TOOL_CHOICE_NONE: &str = "none";

/// A conversation bound to one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Server-side conversation id
    pub id: String,
    /// Name given at creation, stored as conversation metadata
    pub name: String,
}

/// Something that happened during a turn, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEvent {
    /// Text produced by the model
    Inference(String),
    /// The model asked for a tool
    ToolCall { name: String, arguments: Value },
    /// What the tool returned (or the error payload sent in its place)
    ToolResult { name: String, result: Value },
}

/// A model with instructions and client tools.
#[derive(Debug, Clone)]
pub struct Agent {
    client: StackClient,
    model: String,
    instructions: String,
    tools: Vec<Tool>,
    max_tool_iterations: u32,
}

impl Agent {
    pub fn new(client: StackClient, model: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_tool_iterations(mut self, iterations: u32) -> Self {
        self.max_tool_iterations = iterations;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get_tool(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Start a session backed by a new server-side conversation.
    pub async fn create_session(&self, name: &str) -> Result<Session> {
        let conversation = self
            .client
            .create_conversation(json!({ "name": name }))
            .await?;
        Ok(Session {
            id: conversation.id,
            name: name.to_string(),
        })
    }

    /// Run one user turn to completion and return what happened.
    ///
    /// When the model still asks for tools after `max_tool_iterations`
    /// rounds, those calls are answered with an error payload and one last
    /// request with `tool_choice: "none"` lets the model reply in text. Every
    /// `function_call` the conversation holds therefore has an output, and
    /// the session stays usable for later turns.
    pub async fn create_turn(&self, session: &Session, prompt: &str) -> Result<Vec<TurnEvent>> {
        let specs: Vec<_> = self.tools.iter().map(Tool::to_spec).collect();
        let mut events = Vec::new();
        let mut input = vec![InputItem::user(prompt)];
        let mut iteration = 0;
        let mut closing = false;

        loop {
            let mut builder = ResponseRequest::builder(&self.model)
                .instructions(&self.instructions)
                .input(std::mem::take(&mut input))
                .tools(specs.clone())
                .conversation(&session.id);
            if closing {
                builder = builder.tool_choice(ToolChoice::Mode(TOOL_CHOICE_NONE.to_string()));
            }
            let response = self.client.create_response(&builder.build()?).await?;

            let text = response.output_text();
            if !text.is_empty() {
                events.push(TurnEvent::Inference(text));
            }

            let calls: Vec<OutputItem> = response.function_calls().cloned().collect();
            if calls.is_empty() {
                return Ok(events);
            }
            if closing {
                log::warn!(
                    "model in session {} requested {} tool calls after tools were disabled",
                    session.id,
                    calls.len()
                );
                return Ok(events);
            }

            iteration += 1;
            if iteration > self.max_tool_iterations {
                log::warn!(
                    "stopping tool use in session {} after {} tool rounds",
                    session.id,
                    self.max_tool_iterations
                );
                let limit = Error::tool(format!(
                    "Tool round limit of {} reached; answer without tools",
                    self.max_tool_iterations
                ));
                for call in calls {
                    let payload = error_payload(&limit, call.name.as_deref().unwrap_or_default());
                    input.push(InputItem::function_output(call_id(call), payload.to_string()));
                }
                closing = true;
                continue;
            }

            for call in calls {
                let (name, arguments, output) = self.run_call(&call).await;
                events.push(TurnEvent::ToolCall {
                    name: name.clone(),
                    arguments,
                });

                input.push(InputItem::function_output(call_id(call), output.to_string()));
                events.push(TurnEvent::ToolResult { name, result: output });
            }
        }
    }

    /// Execute one function call item, converting every failure into a payload.
    async fn run_call(&self, call: &OutputItem) -> (String, Value, Value) {
        let name = call.name.clone().unwrap_or_default();
        let raw = call.arguments.as_deref().unwrap_or_default();

        let arguments = match parse_arguments(raw) {
            Ok(arguments) => arguments,
            Err(e) => {
                let payload = error_payload(&e, &name);
                return (name, Value::String(raw.to_string()), payload);
            }
        };

        let result = match self.get_tool(&name) {
            Some(tool) => tool.execute(arguments.clone()).await,
            None => Err(Error::tool(format!("Tool '{}' not found", name))),
        };

        let output = result.unwrap_or_else(|e| {
            log::warn!("tool {} failed: {}", name, e);
            error_payload(&e, &name)
        });
        (name, arguments, output)
    }
}

/// The id a `function_call_output` must reference.
fn call_id(call: OutputItem) -> String {
    call.call_id.or(call.id).unwrap_or_default()
}

fn parse_arguments(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(json!({}));
    }
    serde_json::from_str(raw)
        .map_err(|e| Error::invalid_input(format!("Failed to parse tool arguments: {}", e)))
}

fn error_payload(error: &Error, tool: &str) -> Value {
    json!({ "error": error.to_string(), "tool": tool })
}
