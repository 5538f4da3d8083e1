//! Error types for the Llama Stack demo client

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// API error from the Llama Stack server
    #[error("API error: {0}")]
    Api(String),

    /// Streaming error
    #[error("Streaming error: {0}")]
    Stream(String),

    /// Tool execution error
    #[error("Tool execution error: {0}")]
    Tool(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An explicitly requested model is not in the filtered model list
    #[error("Model `{model}` not found. Available models:\n\n{available:?}\n")]
    ModelNotFound {
        model: String,
        available: Vec<String>,
    },

    /// The server lists no usable language model
    #[error("No available models.")]
    NoModelsAvailable,

    /// Every listed model failed the chat probe
    #[error("No available chat-capable models.")]
    NoChatCapableModel,

    /// An explicitly requested model failed the chat probe
    #[error("Model `{0}` does not support chat. Choose a chat-capable model.")]
    NotChatCapable(String),

    /// Timeout error
    #[error("Request timeout")]
    Timeout,

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a new API error
    pub fn api(msg: impl Into<String>) -> Self {
        Error::Api(msg.into())
    }

    /// Create a new stream error
    pub fn stream(msg: impl Into<String>) -> Self {
        Error::Stream(msg.into())
    }

    /// Create a new tool error
    pub fn tool(msg: impl Into<String>) -> Self {
        Error::Tool(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a new model-not-found error
    pub fn model_not_found(model: impl Into<String>, available: Vec<String>) -> Self {
        Error::ModelNotFound {
            model: model.into(),
            available,
        }
    }

    /// Create a new other error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error means "no usable model", i.e. the demo should abort
    /// quietly after printing the message rather than report a failure.
    pub fn is_model_selection(&self) -> bool {
        matches!(
            self,
            Error::ModelNotFound { .. }
                | Error::NoModelsAvailable
                | Error::NoChatCapableModel
                | Error::NotChatCapable(_)
        )
    }
}
