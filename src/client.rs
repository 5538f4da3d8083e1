//! HTTP client for the Llama Stack server
//!
//! [`StackClient`] wraps one reusable `reqwest::Client` and exposes the handful
//! of endpoints the demos call. Every method issues a single request and
//! awaits it; nothing is retried or run concurrently.
//!
//! ## Endpoints
//!
//! ```text
//! GET  /v1/models              list_models()
//! POST /v1/chat/completions    probe_chat()          one-token capability probe
//! POST /v1/responses           create_response()     JSON body
//! POST /v1/responses           stream_response()     Server-Sent Events
//! POST /v1/conversations       create_conversation()
//! ```
//!
//! ## Error Handling
//!
//! Non-2xx statuses become [`Error::Api`] carrying the status and body text,
//! request timeouts become [`Error::Timeout`], and other transport failures
//! [`Error::Http`]. The chat probe is the exception: it never fails, it
//! reports a [`ProbeOutcome`] instead.
//!
//! # Example
//!
//! ```rust,no_run
//! use llama_stack_demos::{DemoConfig, ResponseRequest, StackClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DemoConfig::from_env();
//! let client = StackClient::connect("localhost", 8321, &config)?;
//!
//! let request = ResponseRequest::builder("llama3.2:3b")
//!     .user("What is Llama Stack?")
//!     .build()?;
//! let response = client.create_response(&request).await?;
//! println!("{}", response.output_text());
//! # Ok(())
//! # }
//! ```

use crate::config::{self, DemoConfig};
use crate::models::ModelRecord;
use crate::types::{Conversation, ModelListing, ResponseObject, ResponseRequest};
use crate::utils::{ResponseEventStream, parse_sse_stream};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

/// Content of the chat probe message.
const PROBE_CONTENT: &str = "ping";

/// Result of the chat capability probe.
///
/// The probe cannot tell a model that rejects chat apart from a server that is
/// briefly unreachable; the variants keep what was observed so it can be
/// logged, and [`ProbeOutcome::is_capable`] collapses them to one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered the probe successfully
    Capable,
    /// The server answered with a non-success status
    Rejected { status: u16 },
    /// The request did not complete
    Unreachable { reason: String },
}

impl ProbeOutcome {
    pub fn is_capable(&self) -> bool {
        matches!(self, ProbeOutcome::Capable)
    }
}

/// Client for a single Llama Stack server.
#[derive(Debug, Clone)]
pub struct StackClient {
    /// Server root, e.g. `http://localhost:8321`
    base_url: String,

    /// Reusable HTTP client configured with the request timeout
    http_client: reqwest::Client,
}

impl StackClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>, config: &DemoConfig) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "base URL must start with http:// or https://, got `{}`",
                base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Create a client for `http://{host}:{port}`.
    pub fn connect(host: &str, port: u16, config: &DemoConfig) -> Result<Self> {
        Self::new(config::base_url(host, port), config)
    }

    /// The server root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    /// List every model registered on the server.
    pub async fn list_models(&self) -> Result<Vec<ModelRecord>> {
        let response = self
            .http_client
            .get(self.endpoint("models"))
            .send()
            .await
            .map_err(map_transport)?;
        let response = check_status(response).await?;

        let listing: ModelListing = read_json(response).await?;
        let records = listing.into_records();
        log::debug!("server listed {} models", records.len());
        Ok(records)
    }

    /// Send a one-token chat request to find out whether `model` accepts chat input.
    ///
    /// Never returns an error: any failure is reported as a non-capable outcome.
    pub async fn probe_chat(&self, model: &str) -> ProbeOutcome {
        let body = json!({
            "model": model,
            "messages": [{"role": "user", "content": PROBE_CONTENT}],
            "max_tokens": 1,
        });

        let outcome = match self
            .http_client
            .post(self.endpoint("chat/completions"))
            .json(&body)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => ProbeOutcome::Capable,
            Ok(response) => ProbeOutcome::Rejected {
                status: response.status().as_u16(),
            },
            Err(e) => ProbeOutcome::Unreachable {
                reason: e.to_string(),
            },
        };

        log::debug!("chat probe for {}: {:?}", model, outcome);
        outcome
    }

    /// Create a response and wait for the complete result.
    pub async fn create_response(&self, request: &ResponseRequest) -> Result<ResponseObject> {
        if request.stream {
            return Err(Error::invalid_input(
                "create_response needs stream=false; use stream_response",
            ));
        }

        let response = self
            .http_client
            .post(self.endpoint("responses"))
            .json(request)
            .send()
            .await
            .map_err(map_transport)?;
        let response = check_status(response).await?;

        read_json(response).await
    }

    /// Create a response and receive it as a stream of events.
    ///
    /// The request is sent with `stream: true` regardless of the flag it carries.
    pub async fn stream_response(&self, request: &ResponseRequest) -> Result<ResponseEventStream> {
        let mut request = request.clone();
        request.stream = true;

        let response = self
            .http_client
            .post(self.endpoint("responses"))
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(map_transport)?;
        let response = check_status(response).await?;

        Ok(parse_sse_stream(response))
    }

    /// Create a server-side conversation with the given metadata.
    pub async fn create_conversation(&self, metadata: Value) -> Result<Conversation> {
        let response = self
            .http_client
            .post(self.endpoint("conversations"))
            .json(&json!({ "metadata": metadata }))
            .send()
            .await
            .map_err(map_transport)?;
        let response = check_status(response).await?;

        let conversation: Conversation = read_json(response).await?;
        log::debug!("created conversation {}", conversation.id);
        Ok(conversation)
    }
}

fn map_transport(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::Http(e)
    }
}

/// Read the body as text and decode it, so malformed payloads surface as
/// [`Error::Json`] rather than transport errors.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await.map_err(map_transport)?;
    Ok(serde_json::from_str(&body)?)
}

/// Turn a non-success status into [`Error::Api`], keeping the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_else(|e| {
        log::warn!("failed to read error response body: {}", e);
        "Unknown error (failed to read response body)".to_string()
    });
    Err(Error::api(format!("API error {}: {}", status, body)))
}
