//! Configuration helpers for the demos
//!
//! Everything the demos read from the process environment is gathered once
//! into a [`DemoConfig`] at start-up and passed down explicitly.

use std::env;

/// Environment variable holding the fallback model identifier.
pub const MODEL_ENV: &str = "LLAMA_STACK_MODEL";

/// Environment variable holding a Tavily search API key.
pub const TAVILY_KEY_ENV: &str = "TAVILY_SEARCH_API_KEY";

/// Environment variable holding a Brave search API key.
pub const BRAVE_KEY_ENV: &str = "BRAVE_SEARCH_API_KEY";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Supported web search engines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngine {
    Tavily,
    Brave,
}

impl SearchEngine {
    /// Name of the engine as used in logs and tool results
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Tavily => "tavily",
            SearchEngine::Brave => "brave",
        }
    }
}

/// A web search engine together with its API key
#[derive(Clone, PartialEq, Eq)]
pub struct WebSearchCredential {
    pub engine: SearchEngine,
    pub api_key: String,
}

impl std::fmt::Debug for WebSearchCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSearchCredential")
            .field("engine", &self.engine)
            .field("api_key", &"***")
            .finish()
    }
}

/// Process-wide settings for a demo run
#[derive(Debug, Clone)]
pub struct DemoConfig {
    /// Model used when no `--model-id` is given (`LLAMA_STACK_MODEL`)
    pub fallback_model: Option<String>,

    /// Credential for the web search tool; `None` disables the tool
    pub web_search: Option<WebSearchCredential>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            fallback_model: None,
            web_search: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DemoConfig {
    /// Create a new builder for DemoConfig
    pub fn builder() -> DemoConfigBuilder {
        DemoConfigBuilder::default()
    }

    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Tavily wins over Brave when both keys are set. A variable that is set
    /// counts as present even when empty, mirroring a plain membership test on
    /// the environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let web_search = if let Some(api_key) = lookup(TAVILY_KEY_ENV) {
            Some(WebSearchCredential {
                engine: SearchEngine::Tavily,
                api_key,
            })
        } else {
            lookup(BRAVE_KEY_ENV).map(|api_key| WebSearchCredential {
                engine: SearchEngine::Brave,
                api_key,
            })
        };

        Self {
            fallback_model: lookup(MODEL_ENV).filter(|m| !m.is_empty()),
            web_search,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Builder for DemoConfig
#[derive(Debug, Default)]
pub struct DemoConfigBuilder {
    fallback_model: Option<String>,
    web_search: Option<WebSearchCredential>,
    timeout: Option<u64>,
}

impl DemoConfigBuilder {
    pub fn fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = Some(model.into());
        self
    }

    pub fn web_search(mut self, engine: SearchEngine, api_key: impl Into<String>) -> Self {
        self.web_search = Some(WebSearchCredential {
            engine,
            api_key: api_key.into(),
        });
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> crate::Result<DemoConfig> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout == 0 {
            return Err(crate::Error::config("timeout must be greater than zero"));
        }

        Ok(DemoConfig {
            fallback_model: self.fallback_model,
            web_search: self.web_search,
            timeout,
        })
    }
}

/// Demo start-up: load `.env` from the working directory (or a parent) if
/// one exists, then initialise `env_logger`.
///
/// A missing `.env` is not an error; a malformed one is logged and ignored.
/// The order matters: a `RUST_LOG` defined in `.env` must be in the process
/// environment before the logger reads its filter. Calling this more than
/// once is harmless.
pub fn init_demo_env() {
    let loaded = dotenvy::dotenv();
    if env_logger::try_init().is_err() {
        log::debug!("logger already initialised");
    }
    report_dotenv(loaded);
}

fn report_dotenv(loaded: dotenvy::Result<std::path::PathBuf>) {
    match loaded {
        Ok(path) => log::debug!("loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("ignoring unreadable .env file: {}", e),
    }
}

/// Build the server base URL from a host and port.
pub fn base_url(host: &str, port: u16) -> String {
    format!("http://{}:{}", host, port)
}
