//! Demo tools against mock backends: ticker chart data and both web search
//! engines.

use llama_stack_demos::builtin_tools::{WebSearchTool, ticker_data_tool_at};
use llama_stack_demos::{SearchEngine, WebSearchCredential};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chart_body() -> serde_json::Value {
    // 2022-12-30, 2023-06-30, 2023-12-29 at UTC midnight
    json!({"chart": {"result": [{
        "timestamp": [1672358400, 1688083200, 1703808000],
        "indicators": {"quote": [{"close": [88.23, 120.97, 140.93]}]}
    }]}})
}

#[tokio::test]
async fn test_ticker_default_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GOOG"))
        .and(query_param("range", "5y"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body()))
        .expect(1)
        .mount(&server)
        .await;

    let ticker = ticker_data_tool_at(server.uri()).unwrap();
    let out = ticker
        .execute(json!({"ticker_symbol": "goog"}))
        .await
        .unwrap();

    assert_eq!(out["success"], true);
    assert_eq!(out["ticker"], "GOOG");
    assert_eq!(out["yearly_close"]["2022"], 88.23);
    assert_eq!(out["yearly_close"]["2023"], 140.93);
}

#[tokio::test]
async fn test_ticker_explicit_dates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/GOOG"))
        // 2023-01-01 .. end of 2023-12-31
        .and(query_param("period1", "1672531200"))
        .and(query_param("period2", "1704067200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body()))
        .expect(1)
        .mount(&server)
        .await;

    let ticker = ticker_data_tool_at(server.uri()).unwrap();
    let out = ticker
        .execute(json!({"ticker_symbol": "GOOG", "start": "2023-01-01", "end": "2023-12-31"}))
        .await
        .unwrap();
    assert_eq!(out["success"], true);
}

#[tokio::test]
async fn test_ticker_unknown_symbol_is_a_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let ticker = ticker_data_tool_at(server.uri()).unwrap();
    let out = ticker
        .execute(json!({"ticker_symbol": "NOPE"}))
        .await
        .unwrap();
    assert_eq!(out["success"], false);

    let out = ticker.execute(json!({})).await.unwrap();
    assert_eq!(out["error"], "ticker_symbol is required");
}

#[tokio::test]
async fn test_ticker_failures_are_payloads() {
    // Nothing listens on port 1.
    let ticker = ticker_data_tool_at("http://127.0.0.1:1").unwrap();

    let out = ticker
        .execute(json!({"ticker_symbol": "GOOG", "start": "Jan 1st"}))
        .await
        .unwrap();
    assert_eq!(out["success"], false);
    assert!(out["error"].as_str().unwrap().contains("invalid date"));

    let out = ticker
        .execute(json!({"ticker_symbol": "GOOG"}))
        .await
        .unwrap();
    assert_eq!(out["success"], false);
}

#[tokio::test]
async fn test_ticker_malformed_chart_is_a_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"chart": {"result": []}})))
        .mount(&server)
        .await;

    let ticker = ticker_data_tool_at(server.uri()).unwrap();
    let out = ticker
        .execute(json!({"ticker_symbol": "GOOG"}))
        .await
        .unwrap();
    assert_eq!(out["success"], false);
}

#[tokio::test]
async fn test_ticker_symbol_never_reaches_url_unchecked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_body()))
        .expect(0)
        .mount(&server)
        .await;

    let ticker = ticker_data_tool_at(server.uri()).unwrap();
    for symbol in ["../../admin", "GOOG?range=max", "GOOG#x", "GO OG"] {
        let out = ticker
            .execute(json!({"ticker_symbol": symbol}))
            .await
            .unwrap();
        assert_eq!(out["success"], false, "{symbol}");
        assert!(out["error"].as_str().unwrap().contains("Invalid ticker symbol"));
    }
}

#[tokio::test]
async fn test_tavily_search() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"api_key": "tvly-key", "query": "llama stack"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "Llama Stack", "url": "https://example.com", "content": "A server."}
            ]
        })))
        .mount(&server)
        .await;

    let credential = WebSearchCredential {
        engine: SearchEngine::Tavily,
        api_key: "tvly-key".into(),
    };
    let search = WebSearchTool::with_endpoint(credential, format!("{}/search", server.uri())).unwrap();
    assert_eq!(search.engine(), SearchEngine::Tavily);

    let tool = search.into_tool();
    assert_eq!(tool.name(), "web_search");
    let out = tool.execute(json!({"query": "llama stack"})).await.unwrap();
    assert_eq!(out["query"], "llama stack");
    assert_eq!(out["top_k"][0]["title"], "Llama Stack");
    assert_eq!(out["top_k"][0]["content"], "A server.");
}

#[tokio::test]
async fn test_brave_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/res/v1/web/search"))
        .and(header("X-Subscription-Token", "brave-key"))
        .and(query_param("q", "llama stack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "web": {"results": [
                {"title": "Docs", "url": "https://example.com/docs", "description": "Reference."}
            ]}
        })))
        .mount(&server)
        .await;

    let credential = WebSearchCredential {
        engine: SearchEngine::Brave,
        api_key: "brave-key".into(),
    };
    let search =
        WebSearchTool::with_endpoint(credential, format!("{}/res/v1/web/search", server.uri())).unwrap();
    let out = search.search("llama stack").await.unwrap();
    assert_eq!(out["top_k"][0]["url"], "https://example.com/docs");
    assert_eq!(out["top_k"][0]["content"], "Reference.");
}

#[tokio::test]
async fn test_search_rejected_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let credential = WebSearchCredential {
        engine: SearchEngine::Tavily,
        api_key: "bad".into(),
    };
    let search = WebSearchTool::with_endpoint(credential, server.uri()).unwrap();
    let err = search.search("anything").await.unwrap_err();
    assert!(err.to_string().contains("401"));

    // Through the tool the same failure reaches the model as a payload.
    let out = search
        .into_tool()
        .execute(json!({"query": "anything"}))
        .await
        .unwrap();
    assert_eq!(out["success"], false);
    assert!(out["error"].as_str().unwrap().contains("401"));
}

#[tokio::test]
async fn test_empty_query_is_a_payload() {
    let credential = WebSearchCredential {
        engine: SearchEngine::Tavily,
        api_key: "k".into(),
    };
    let tool = WebSearchTool::with_endpoint(credential, "http://127.0.0.1:1")
        .unwrap()
        .into_tool();
    let out = tool.execute(json!({"query": "  "})).await.unwrap();
    assert_eq!(out["success"], false);
}
