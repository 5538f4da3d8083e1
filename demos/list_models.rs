//! List models example
//!
//! Prints every model the server reports with its type, and marks the ones the
//! other demos would consider: language models (`llm`) and, among those, the
//! ones that are not embedding models.
//!
//! ```text
//! cargo run --example list_models -- localhost 8321
//! ```

use clap::Parser;
use llama_stack_demos::{
    DemoConfig, StackClient, display, init_demo_env, language_model_ids, non_embedding_model_ids,
};

#[derive(Parser)]
#[command(name = "list_models")]
#[command(about = "List the models registered on a Llama Stack server", long_about = None)]
struct Args {
    /// Server host
    host: String,

    /// Server port
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_demo_env();
    let args = Args::parse();

    let config = DemoConfig::from_env();
    let client = StackClient::connect(&args.host, args.port, &config)?;

    let records = match client.list_models().await {
        Ok(records) => records,
        Err(e) => {
            display::error(&format!("Failed to list models: {}", e));
            return Ok(());
        }
    };

    let llms = language_model_ids(&records);
    let usable = non_embedding_model_ids(&records);

    println!("{} models on {}:\n", records.len(), client.base_url());
    for record in &records {
        let Some(id) = record.model_identifier() else {
            println!("  (no identifier)");
            continue;
        };
        let marker = if usable.iter().any(|m| m == id) {
            "*"
        } else if llms.iter().any(|m| m == id) {
            "+"
        } else {
            " "
        };
        println!(
            "{} {}  type={}",
            marker,
            id,
            record.type_label().unwrap_or("unknown")
        );
    }

    println!("\n* usable language model   + language model (embedding)");
    if usable.is_empty() {
        display::warning("No available models.");
    }

    Ok(())
}
