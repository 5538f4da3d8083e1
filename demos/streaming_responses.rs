//! Streaming responses example
//!
//! Creates a conversation, then sends three related prompts in it and prints
//! each answer token by token as the server streams it.
//!
//! ```text
//! cargo run --example streaming_responses -- localhost 8321
//! ```

use clap::Parser;
use llama_stack_demos::{
    DemoConfig, ResponseRequest, Selection, StackClient, display, init_demo_env, resolve_model,
};
use serde_json::json;

const PROMPTS: [&str; 3] = [
    "We are discussing Llama Stack, a framework and server for running AI models and tools. In one sentence, describe it.",
    "Summarize the description in three short bullet points.",
    "Give one concrete use case in a single sentence.",
];

#[derive(Parser)]
#[command(name = "streaming_responses")]
#[command(about = "Stream a short multi-turn conversation", long_about = None)]
struct Args {
    /// Server host
    host: String,

    /// Server port
    port: u16,

    /// Model to use (defaults to LLAMA_STACK_MODEL, then the first chat-capable model)
    #[arg(long)]
    model_id: Option<String>,

    /// System instructions sent with every turn
    #[arg(
        long,
        default_value = "You are a helpful assistant. Answer directly and avoid refusing unless safety requires it."
    )]
    instructions: String,
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
        Selection::FirstChatCapable,
    )
    .await
    {
        Ok(model) => model,
        Err(e) if e.is_model_selection() => {
            display::model_error(&e, Some("No chat-capable model available."));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    println!("Using model: {}", model);

    let conversation = client
        .create_conversation(json!({ "name": "responses-demo" }))
        .await?;
    println!("Created conversation={}", conversation.id);

    for prompt in PROMPTS {
        display::user_echo(prompt);

        let request = ResponseRequest::builder(&model)
            .instructions(&args.instructions)
            .user(prompt)
            .conversation(&conversation.id)
            .build()?;
        let stream = client.stream_response(&request).await?;
        display::print_stream(stream).await?;
    }

    Ok(())
}
