use chat_relay::app_state::{AppConfig, AppState};
use chat_relay::server;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chat-relay", about = "Streaming chat gateway for a local generation API")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Streaming generation endpoint.
    #[arg(long, default_value = "http://localhost:11434/api/generate")]
    upstream_url: String,

    /// Model used when the request does not name one.
    #[arg(long, default_value = "deepseek-r1:7b")]
    default_model: String,

    /// Upstream connect/read timeout in seconds.
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig {
        host: args.host,
        port: args.port,
        upstream_url: args.upstream_url,
        default_model: args.default_model,
        timeout: args.timeout,
    };
    let state = AppState::new(&config)?;
    actix_web::rt::System::new().block_on(server::startup(config, state))?;
    Ok(())
}
