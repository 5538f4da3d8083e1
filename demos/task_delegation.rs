//! Task delegation example
//!
//! Four agents share one model: a generalist, a researcher with web search, a
//! math agent with a calculator and a finance agent with ticker data. Each
//! prompt is routed by keyword to one of them and run as a turn in that
//! agent's session.
//!
//! ```text
//! cargo run --example task_delegation -- localhost 8321
//! RUST_LOG=llama_stack_demos=debug cargo run --example task_delegation -- localhost 8321
//! ```

use clap::Parser;
use llama_stack_demos::builtin_tools::{WebSearchTool, calculator_tool, ticker_data_tool};
use llama_stack_demos::display::{self, EventLogger};
use llama_stack_demos::resolver::ensure_chat_capable;
use llama_stack_demos::{
    Agent, DemoConfig, RouteCategory, Selection, Session, StackClient, Tool, init_demo_env,
    resolve_model, route_prompt,
};
use std::collections::HashMap;
use std::io::Write;

const USER_PROMPTS: [&str; 4] = [
    "Summarize what Llama Stack provides in one sentence.",
    "What is the closing price of GOOG for 2023?",
    "Calculate (45 * 18) / 6.",
    "Search for the latest Llama Stack release notes and summarize them.",
];

#[derive(Parser)]
#[command(name = "task_delegation")]
#[command(about = "Route prompts to specialised tool-using agents", long_about = None)]
struct Args {
    /// Server host
    host: String,

    /// Server port
    port: u16,

    /// Model to use (defaults to LLAMA_STACK_MODEL, then the first chat-capable model)
    #[arg(long)]
    model_id: Option<String>,
}

/// The web tool, or `None` with a warning when no search key is configured.
fn resolve_web_tool(config: &DemoConfig) -> anyhow::Result<Option<Tool>> {
    let Some(credential) = config.web_search.clone() else {
        display::warning(
            "Warning: TAVILY_SEARCH_API_KEY or BRAVE_SEARCH_API_KEY is not set; web tool disabled.",
        );
        return Ok(None);
    };
    log::debug!("web search via {}", credential.engine.as_str());
    Ok(Some(WebSearchTool::new(credential)?.into_tool()))
}

fn build_agents(
    client: &StackClient,
    model: &str,
    web_tool: Option<Tool>,
) -> anyhow::Result<HashMap<RouteCategory, Agent>> {
    let agent = |instructions: &str| Agent::new(client.clone(), model, instructions);

    let mut agents = HashMap::new();
    agents.insert(RouteCategory::General, agent("You are a helpful assistant."));
    agents.insert(
        RouteCategory::Research,
        agent("You are a research assistant. Use web search when helpful.")
            .with_tools(web_tool.into_iter().collect()),
    );
    agents.insert(
        RouteCategory::Math,
        agent("You are a math assistant. Use tools for calculations.")
            .with_tools(vec![calculator_tool()]),
    );
    agents.insert(
        RouteCategory::Finance,
        agent("You are a finance assistant. Use tools for ticker data.")
            .with_tools(vec![ticker_data_tool()?]),
    );
    Ok(agents)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_demo_env();
    let args = Args::parse();

    let config = DemoConfig::from_env();
    let client = StackClient::connect(&args.host, args.port, &config)?;

    // A named model must be listed and must also pass the chat probe.
    let named = args.model_id.as_deref().is_some_and(|m| !m.is_empty())
        || config.fallback_model.is_some();
    let resolved = match resolve_model(
        &client,
        args.model_id.as_deref(),
        &config,
        Selection::FirstChatCapable,
    )
    .await
    {
        Ok(model) if named => ensure_chat_capable(&client, &model).await.map(|_| model),
        other => other,
    };
    let model = match resolved {
        Ok(model) => model,
        Err(e) if e.is_model_selection() => {
            display::model_error(&e, None);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("using model {}", model);

    let web_tool = resolve_web_tool(&config)?;
    let web_available = web_tool.is_some();
    let agents = build_agents(&client, &model, web_tool)?;

    let mut sessions: HashMap<RouteCategory, Session> = HashMap::new();
    for route in RouteCategory::ALL {
        if let Some(agent) = agents.get(&route) {
            let session = agent
                .create_session(&format!("task-delegation-{}", route))
                .await?;
            sessions.insert(route, session);
        }
    }

    let logger = EventLogger::new();
    for prompt in USER_PROMPTS {
        let route = route_prompt(prompt, web_available);
        let (Some(agent), Some(session)) = (agents.get(&route), sessions.get(&route)) else {
            continue;
        };
        display::route_trace(prompt, route);

        let events = agent.create_turn(session, prompt).await?;
        let mut stdout = std::io::stdout();
        for printable in logger.log(&events) {
            print!("{}", printable);
            stdout.flush()?;
        }
    }

    Ok(())
}
