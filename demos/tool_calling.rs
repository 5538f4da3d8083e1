//! Tool calling with the Responses API
//!
//! Sends one non-streaming request with the server's hosted `web_search` tool
//! forced on, then prints the answer and every output item.
//!
//! ```text
//! cargo run --example tool_calling -- localhost 8321 --prompt "What is Llama Stack?"
//! ```

use clap::Parser;
use llama_stack_demos::{
    DemoConfig, INCLUDE_WEB_SEARCH_SOURCES, ResponseRequest, Selection, StackClient, ToolChoice,
    ToolSpec, display, init_demo_env, resolve_model,
};

const INSTRUCTIONS: &str = "Use web search to answer the question and provide a short, factual reply.";

#[derive(Parser)]
#[command(name = "tool_calling")]
#[command(about = "Answer a question with the hosted web search tool", long_about = None)]
struct Args {
    /// Server host
    host: String,

    /// Server port
    port: u16,

    /// Model to use (defaults to LLAMA_STACK_MODEL, then the first language model)
    #[arg(long)]
    model_id: Option<String>,

    /// Question to ask
    #[arg(long, default_value = "What is Llama Stack?")]
    prompt: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_demo_env();
    let args = Args::parse();

    let config = DemoConfig::from_env();
    let client = StackClient::connect(&args.host, args.port, &config)?;

    let model = match resolve_model(
        &client,
        args.model_id.as_deref(),
        &config,
        Selection::FirstLanguageModel,
    )
    .await
    {
        Ok(model) => model,
        Err(e) if e.is_model_selection() => {
            display::model_error(&e, None);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("Using model: {}", model);

    if config.web_search.is_none() {
        display::warning(
            "Warning: TAVILY_SEARCH_API_KEY or BRAVE_SEARCH_API_KEY is not set; web search may not work.",
        );
    }

    let request = ResponseRequest::builder(model)
        .instructions(INSTRUCTIONS)
        .user(args.prompt)
        .tool(ToolSpec::WebSearch)
        .tool_choice(ToolChoice::hosted("web_search"))
        .include(INCLUDE_WEB_SEARCH_SOURCES)
        .build()?;

    let response = client.create_response(&request).await?;
    display::print_response(&response);

    Ok(())
}
