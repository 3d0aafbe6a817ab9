pub mod agent;
pub mod cli;
pub mod error;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;

use agent::ChatAgent;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let provider_config = args.provider_config();

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr());
    info!("LLM Provider: {}", provider_config.kind);
    info!("Model: {}", provider_config.model);
    info!("API Key Set: {}", provider_config.api_key.is_some());
    info!("Context Window: {}", provider_config.context_window);
    info!("Provider Timeout: {:?}", provider_config.request_timeout);
    info!("Debug: {}", args.debug);
    info!("-------------------------");

    let agent = Arc::new(ChatAgent::from_config(provider_config)?);
    info!("Starting server on: {}", args.server_addr());
    let server = Server::new(agent, &args);
    server.run().await?;

    Ok(())
}
