//! One-shot recommendation query: reads a mood from stdin and prints the raw reply.

use std::io;

use moviefinder::{cli, config::Config, services::providers::OpenAiGenerator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let generator = OpenAiGenerator::from_config(&config);

    cli::run(io::stdin().lock(), io::stdout(), &generator).await
}
