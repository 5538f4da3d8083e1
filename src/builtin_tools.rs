//! Client tools handed to the delegation agents: a calculator, yearly ticker
//! closes and web search.
//!
//! The tool handlers never return `Err`. Every failure (division by zero, an
//! invalid date or ticker symbol, a backend that is down or rejects the key)
//! comes back as a `{"success": false, "error": ...}` payload, so the turn
//! continues and the model sees the reason. [`WebSearchTool::search`] used
//! directly still reports failures as `Err`.

use crate::config::{SearchEngine, WebSearchCredential};
use crate::tools::{Tool, tool};
use crate::{Error, Result};
use chrono::{DateTime, Datelike, NaiveDate};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::time::Duration;

const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";
const BRAVE_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";

/// Results kept per search.
const SEARCH_RESULT_LIMIT: usize = 3;

/// Timeout for third-party tool backends.
const TOOL_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

fn tool_http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(TOOL_HTTP_TIMEOUT)
        .user_agent(concat!("llama-stack-demos/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::Http)
}

fn failure(message: impl Into<String>) -> Value {
    json!({"success": false, "error": message.into()})
}

/// Read a number that may arrive as a JSON number or a numeric string.
fn number_arg(args: &Value, key: &str) -> Option<f64> {
    match args.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Apply one arithmetic operation.
pub fn calculate(x: f64, y: f64, operation: &str) -> Value {
    let result = match operation {
        "add" => x + y,
        "subtract" => x - y,
        "multiply" => x * y,
        "divide" => {
            if y == 0.0 {
                return failure("Cannot divide by zero");
            }
            x / y
        }
        _ => return failure("Invalid operation"),
    };
    json!({"success": true, "result": result})
}

/// `calculator(x, y, operation)` with operation one of add, subtract,
/// multiply, divide.
pub fn calculator_tool() -> Tool {
    tool(
        "calculator",
        "Perform a basic arithmetic operation on two numbers. \
         operation must be one of: add, subtract, multiply, divide.",
    )
    .param("x", "number")
    .param("y", "number")
    .param("operation", "string")
    .build(|args| async move {
        let (Some(x), Some(y)) = (number_arg(&args, "x"), number_arg(&args, "y")) else {
            return Ok(failure("x and y must be numbers"));
        };
        let operation = args["operation"].as_str().unwrap_or_default();
        Ok(calculate(x, y, operation))
    })
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| Error::invalid_input(format!("invalid date `{}`: {}", value, e)))
}

fn day_start_epoch(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

/// Reduce a Yahoo chart payload to the last close of each calendar year.
pub fn yearly_closes(chart: &Value) -> Result<BTreeMap<i32, f64>> {
    let result = chart
        .pointer("/chart/result/0")
        .ok_or_else(|| Error::tool("chart response has no result"))?;
    let timestamps = result
        .get("timestamp")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::tool("chart response has no timestamps"))?;
    let closes = result
        .pointer("/indicators/quote/0/close")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::tool("chart response has no closing prices"))?;

    let mut yearly = BTreeMap::new();
    for (ts, close) in timestamps.iter().zip(closes) {
        // Holidays and halts show up as null closes.
        let (Some(ts), Some(close)) = (ts.as_i64(), close.as_f64()) else {
            continue;
        };
        if let Some(when) = DateTime::from_timestamp(ts, 0) {
            // Timestamps ascend, so the last write per year is the year's close.
            yearly.insert(when.year(), close);
        }
    }
    Ok(yearly)
}

/// `get_ticker_data(ticker_symbol, start?, end?)`: yearly closing prices.
pub fn ticker_data_tool() -> Result<Tool> {
    ticker_data_tool_at(YAHOO_CHART_URL)
}

/// [`ticker_data_tool`] against a different chart endpoint.
pub fn ticker_data_tool_at(chart_url: impl Into<String>) -> Result<Tool> {
    let chart_url = chart_url.into();
    let http = tool_http_client()?;

    Ok(tool(
        "get_ticker_data",
        "Get yearly closing prices for a stock ticker symbol. \
         Dates are YYYY-MM-DD; without dates the last five years are returned.",
    )
    .param("ticker_symbol", "string")
    .optional_param("start", "string", "First day to include (YYYY-MM-DD)")
    .optional_param("end", "string", "Last day to include (YYYY-MM-DD)")
    .build(move |args| {
        let http = http.clone();
        let chart_url = chart_url.clone();
        async move {
            Ok(fetch_ticker_data(&http, &chart_url, &args)
                .await
                .unwrap_or_else(|e| failure(e.to_string())))
        }
    }))
}

/// Whether `symbol` is safe to place in the chart URL path.
fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty()
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

async fn fetch_ticker_data(http: &reqwest::Client, chart_url: &str, args: &Value) -> Result<Value> {
    let Some(symbol) = args["ticker_symbol"].as_str().filter(|s| !s.is_empty()) else {
        return Ok(failure("ticker_symbol is required"));
    };
    if !is_valid_symbol(symbol) {
        return Ok(failure(format!("Invalid ticker symbol `{}`", symbol)));
    }
    let symbol = symbol.to_uppercase();

    let mut query: Vec<(&str, String)> = vec![("interval", "1d".to_string())];
    match (args["start"].as_str(), args["end"].as_str()) {
        (None, None) => query.push(("range", "5y".to_string())),
        (start, end) => {
            let start = start.map(parse_date).transpose()?;
            let end = end.map(parse_date).transpose()?;
            let period1 = start.map(day_start_epoch).unwrap_or(0);
            let period2 = end
                .and_then(|d| d.succ_opt())
                .map(day_start_epoch)
                .unwrap_or_else(|| chrono::Utc::now().timestamp());
            query.push(("period1", period1.to_string()));
            query.push(("period2", period2.to_string()));
        }
    }

    let url = format!("{}/{}", chart_url.trim_end_matches('/'), symbol);
    let response = http.get(&url).query(&query).send().await?;
    if !response.status().is_success() {
        log::warn!("ticker lookup for {} failed: {}", symbol, response.status());
        return Ok(failure(format!("No data for ticker {}", symbol)));
    }

    let chart: Value = response.json().await?;
    let yearly: Map<String, Value> = yearly_closes(&chart)?
        .into_iter()
        .map(|(year, close)| (year.to_string(), json!(close)))
        .collect();
    Ok(json!({
        "success": true,
        "ticker": symbol,
        "yearly_close": yearly
    }))
}

/// Web search over Tavily or Brave, exposed to agents as `web_search(query)`.
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    credential: WebSearchCredential,
    endpoint: String,
    http: reqwest::Client,
}

impl WebSearchTool {
    pub fn new(credential: WebSearchCredential) -> Result<Self> {
        let endpoint = match credential.engine {
            SearchEngine::Tavily => TAVILY_SEARCH_URL,
            SearchEngine::Brave => BRAVE_SEARCH_URL,
        };
        Self::with_endpoint(credential, endpoint)
    }

    /// Search against a different endpoint of the same engine.
    pub fn with_endpoint(credential: WebSearchCredential, endpoint: impl Into<String>) -> Result<Self> {
        Ok(Self {
            credential,
            endpoint: endpoint.into(),
            http: tool_http_client()?,
        })
    }

    pub fn engine(&self) -> SearchEngine {
        self.credential.engine
    }

    /// Run one search and return `{"query": ..., "top_k": [{title, url, content}]}`.
    pub async fn search(&self, query: &str) -> Result<Value> {
        let results = match self.credential.engine {
            SearchEngine::Tavily => self.search_tavily(query).await?,
            SearchEngine::Brave => self.search_brave(query).await?,
        };
        Ok(json!({"query": query, "top_k": results}))
    }

    async fn search_tavily(&self, query: &str) -> Result<Vec<Value>> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({
                "api_key": self.credential.api_key,
                "query": query,
                "search_depth": "basic",
                "max_results": SEARCH_RESULT_LIMIT,
            }))
            .send()
            .await?;
        let body = checked_json(response, "tavily").await?;
        Ok(collect_results(body.get("results"), "content"))
    }

    async fn search_brave(&self, query: &str) -> Result<Vec<Value>> {
        let count = SEARCH_RESULT_LIMIT.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .header("X-Subscription-Token", &self.credential.api_key)
            .header("Accept", "application/json")
            .query(&[("q", query), ("count", count.as_str())])
            .send()
            .await?;
        let body = checked_json(response, "brave").await?;
        Ok(collect_results(body.pointer("/web/results"), "description"))
    }

    /// Wrap the search as an agent tool.
    pub fn into_tool(self) -> Tool {
        tool(
            "web_search",
            "Search the web for up-to-date information. Returns the top results.",
        )
        .param("query", "string")
        .build(move |args| {
            let search = self.clone();
            async move {
                match args["query"].as_str().map(str::trim) {
                    Some(query) if !query.is_empty() => Ok(search
                        .search(query)
                        .await
                        .unwrap_or_else(|e| failure(e.to_string()))),
                    _ => Ok(failure("query is required")),
                }
            }
        })
    }
}

async fn checked_json(response: reqwest::Response, engine: &str) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::tool(format!("{} search failed ({}): {}", engine, status, body)));
    }
    Ok(response.json().await?)
}

fn collect_results(results: Option<&Value>, snippet_key: &str) -> Vec<Value> {
    results
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(SEARCH_RESULT_LIMIT)
                .map(|item| {
                    json!({
                        "title": item.get("title").cloned().unwrap_or(Value::Null),
                        "url": item.get("url").cloned().unwrap_or(Value::Null),
                        "content": item.get(snippet_key).cloned().unwrap_or(Value::Null),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
