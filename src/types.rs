//! Wire types for the Responses, Conversations and Models endpoints

use crate::models::ModelRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stream event type carrying an incremental piece of output text.
pub const EVENT_OUTPUT_TEXT_DELTA: &str = "response.output_text.delta";

/// Stream event type marking the end of a response.
pub const EVENT_COMPLETED: &str = "response.completed";

/// Output item type of a server-side web search.
pub const ITEM_WEB_SEARCH_CALL: &str = "web_search_call";

/// Output item type of a client-side function call.
pub const ITEM_FUNCTION_CALL: &str = "function_call";

/// Include key that asks the server to return web search sources.
pub const INCLUDE_WEB_SEARCH_SOURCES: &str = "web_search_call.action.sources";

/// Body of `GET /v1/models`, which is either wrapped in `data` or a bare array
/// depending on the server release.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ModelListing {
    Wrapped { data: Vec<ModelRecord> },
    Bare(Vec<ModelRecord>),
}

impl ModelListing {
    pub(crate) fn into_records(self) -> Vec<ModelRecord> {
        match self {
            ModelListing::Wrapped { data } => data,
            ModelListing::Bare(records) => records,
        }
    }
}

/// One item of a response request's `input` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    Message { role: String, content: String },
    FunctionCallOutput { call_id: String, output: String },
}

impl InputItem {
    pub fn user(content: impl Into<String>) -> Self {
        InputItem::Message {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn function_output(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        InputItem::FunctionCallOutput {
            call_id: call_id.into(),
            output: output.into(),
        }
    }
}

/// A tool offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolSpec {
    /// Server-side web search
    WebSearch,
    /// Client-side function, executed by this process
    Function {
        name: String,
        description: String,
        parameters: Value,
    },
}

/// How the model should pick tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoice {
    /// `"auto"`, `"none"` or `"required"`
    Mode(String),
    /// Force a specific hosted tool, e.g. `{"type": "web_search"}`
    Hosted {
        #[serde(rename = "type")]
        tool_type: String,
    },
}

impl ToolChoice {
    pub fn hosted(tool_type: impl Into<String>) -> Self {
        ToolChoice::Hosted {
            tool_type: tool_type.into(),
        }
    }
}

/// Body of `POST /v1/responses`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRequest {
    pub model: String,

    pub input: Vec<InputItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation: Option<String>,

    pub stream: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl ResponseRequest {
    /// Create a new builder for ResponseRequest
    pub fn builder(model: impl Into<String>) -> ResponseRequestBuilder {
        ResponseRequestBuilder {
            model: model.into(),
            input: Vec::new(),
            instructions: None,
            tools: Vec::new(),
            tool_choice: None,
            include: Vec::new(),
            conversation: None,
            stream: false,
            max_output_tokens: None,
        }
    }
}

/// Builder for ResponseRequest
#[derive(Debug)]
pub struct ResponseRequestBuilder {
    model: String,
    input: Vec<InputItem>,
    instructions: Option<String>,
    tools: Vec<ToolSpec>,
    tool_choice: Option<ToolChoice>,
    include: Vec<String>,
    conversation: Option<String>,
    stream: bool,
    max_output_tokens: Option<u32>,
}

impl ResponseRequestBuilder {
    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.input.push(InputItem::user(content));
        self
    }

    pub fn input(mut self, items: Vec<InputItem>) -> Self {
        self.input.extend(items);
        self
    }

    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn tool(mut self, tool: ToolSpec) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    pub fn include(mut self, key: impl Into<String>) -> Self {
        self.include.push(key.into());
        self
    }

    pub fn conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation = Some(conversation_id.into());
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn build(self) -> crate::Result<ResponseRequest> {
        if self.model.is_empty() {
            return Err(crate::Error::invalid_input("model is required"));
        }
        if self.input.is_empty() {
            return Err(crate::Error::invalid_input("input must not be empty"));
        }

        Ok(ResponseRequest {
            model: self.model,
            input: self.input,
            instructions: self.instructions,
            tools: self.tools,
            tool_choice: self.tool_choice,
            include: self.include,
            conversation: self.conversation,
            stream: self.stream,
            max_output_tokens: self.max_output_tokens,
        })
    }
}

/// A content part of a message output item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputContent {
    #[serde(rename = "type")]
    pub content_type: String,

    #[serde(default)]
    pub text: Option<String>,
}

/// One item of a response's `output` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub item_type: String,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Vec<OutputContent>,

    /// Function call correlation id (function_call items)
    #[serde(default)]
    pub call_id: Option<String>,

    /// Function name (function_call items)
    #[serde(default)]
    pub name: Option<String>,

    /// JSON-encoded function arguments (function_call items)
    #[serde(default)]
    pub arguments: Option<String>,

    /// Search action details (web_search_call items)
    #[serde(default)]
    pub action: Option<Value>,
}

impl OutputItem {
    /// Concatenated `output_text` parts of this item.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|part| part.content_type == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

/// Body returned by `POST /v1/responses` when not streaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseObject {
    pub id: String,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub output: Vec<OutputItem>,

    #[serde(default)]
    pub error: Option<Value>,
}

impl ResponseObject {
    /// All assistant text of the response, joined in output order.
    pub fn output_text(&self) -> String {
        self.output
            .iter()
            .filter(|item| item.item_type == "message")
            .map(OutputItem::text)
            .collect()
    }

    /// Function call items the client is expected to execute.
    pub fn function_calls(&self) -> impl Iterator<Item = &OutputItem> {
        self.output
            .iter()
            .filter(|item| item.item_type == ITEM_FUNCTION_CALL)
    }
}

/// One server-sent event of a streamed response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseStreamEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub delta: Option<String>,

    #[serde(default)]
    pub sequence_number: Option<u64>,

    #[serde(default)]
    pub item: Option<OutputItem>,

    #[serde(default)]
    pub response: Option<ResponseObject>,
}

/// A server-side conversation, used to carry state across turns.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conversation {
    pub id: String,

    #[serde(default)]
    pub created_at: Option<i64>,

    #[serde(default)]
    pub metadata: Option<Value>,
}
