//! # Llama Stack Demos
//!
//! Building blocks for small command-line programs that talk to a running
//! Llama Stack server: list its models, pick one that can chat, call the
//! Responses API (plain, streamed, or with hosted web search), and route
//! prompts to specialised tool-using agents.
//!
//! ## Overview
//!
//! - **Model discovery**: read the server's model listing, tolerating the
//!   different field names servers use for identifiers and model types
//! - **Model resolution**: honour `--model-id` or `LLAMA_STACK_MODEL`, or pick
//!   the first model that answers a one-token chat probe
//! - **Responses API**: typed requests and responses, SSE streaming
//! - **Agents**: client-side tools executed locally across a bounded number of
//!   tool rounds, with sessions stored as server-side conversations
//! - **Routing**: keyword routing of prompts to general, research, math and
//!   finance agents
//!
//! ## Example
//!
//! ```rust,no_run
//! use llama_stack_demos::{DemoConfig, Selection, StackClient, resolve_model};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DemoConfig::from_env();
//!     let client = StackClient::connect("localhost", 8321, &config)?;
//!
//!     // First model that actually answers a chat request
//!     let model = resolve_model(&client, None, &config, Selection::FirstChatCapable).await?;
//!     println!("Using model: {}", model);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **client**: HTTP client for the server endpoints and the chat probe
//! - **models**: model descriptor reading and filtering
//! - **resolver**: model selection on top of any [`ModelService`]
//! - **router**: prompt routing
//! - **agent**: agents, sessions and the tool-calling turn loop
//! - **tools** / **builtin_tools**: tool definitions and the demo tools
//! - **types**: Responses API wire types
//! - **config**: environment-driven demo configuration
//! - **display**: coloured terminal output
//! - **error**: the crate error type
//! - **utils**: SSE decoding

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

/// Agents, sessions and the tool-calling turn loop.
mod agent;

/// HTTP client for the Llama Stack endpoints.
mod client;

/// Demo configuration read from the environment and `.env`.
mod config;

/// Error type and `Result` alias used across the crate.
mod error;

/// Model descriptor reading and model filters.
mod models;

/// Keyword-based prompt routing.
mod router;

/// Tool definition with JSON Schema normalisation.
mod tools;

/// Responses API request, response and event types.
mod types;

/// SSE decoding for streamed responses.
mod utils;

// ============================================================================
// PUBLIC EXPORTS
// ============================================================================

/// Calculator, ticker data and web search tools used by the delegation demo.
pub mod builtin_tools;

/// Coloured terminal output shared by the demo binaries.
pub mod display;

/// Model selection: availability checks and chat-capable model discovery.
pub mod resolver;

// --- Client ---

pub use client::{ProbeOutcome, StackClient};

// --- Configuration ---

pub use config::{
    BRAVE_KEY_ENV, DEFAULT_TIMEOUT_SECS, DemoConfig, DemoConfigBuilder, MODEL_ENV, SearchEngine,
    TAVILY_KEY_ENV, WebSearchCredential, base_url, init_demo_env,
};

// --- Error Handling ---

pub use error::{Error, Result};

// --- Models ---

pub use models::{LLM_TYPE, ModelRecord, language_model_ids, non_embedding_model_ids};
pub use resolver::{ModelService, Selection, resolve_model};

// --- Routing and Agents ---

pub use agent::{Agent, DEFAULT_MAX_TOOL_ITERATIONS, Session, TurnEvent};
pub use router::{RouteCategory, route_prompt};

// --- Tool System ---

pub use tools::{Tool, ToolBuilder, ToolHandler, tool};

// --- Responses API Types ---

pub use types::{
    Conversation, EVENT_COMPLETED, EVENT_OUTPUT_TEXT_DELTA, INCLUDE_WEB_SEARCH_SOURCES,
    ITEM_FUNCTION_CALL, ITEM_WEB_SEARCH_CALL, InputItem, OutputContent, OutputItem,
    ResponseObject, ResponseRequest, ResponseRequestBuilder, ResponseStreamEvent, ToolChoice,
    ToolSpec,
};
pub use utils::ResponseEventStream;

// ============================================================================
// CONVENIENCE PRELUDE
// ============================================================================

/// The types most demos need.
///
/// Import with `use llama_stack_demos::prelude::*;`.
pub mod prelude {
    pub use crate::{
        Agent, DemoConfig, Error, ProbeOutcome, ResponseRequest, Result, RouteCategory,
        Selection, Session, StackClient, Tool, TurnEvent, resolve_model, route_prompt, tool,
    };
}
