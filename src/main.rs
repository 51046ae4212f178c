use anyhow::Result;
use clap::Parser;
use opencode_notify::cli::{self, Cli, Commands};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout 是通知渠道，日志只写 stderr
    // 通过 RUST_LOG 调整级别，例如: RUST_LOG=opencode_notify=debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("opencode_notify=warn"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Listen => cli::handle_listen(&args.common).await?,
        Commands::Event(event) => cli::handle_event(&args.common, event).await?,
        Commands::Config => cli::handle_config(&args.common)?,
        Commands::Init => cli::handle_init(&args.common)?,
    }

    Ok(())
}
