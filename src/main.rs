//! `adopilot` 바이너리 진입점.

use clap::Parser;

use adopilot::interface::cli::Cli;

#[tokio::main]
async fn main() {
    // stdout은 프로토콜 전용이므로 로그는 stderr로 보낸다.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = adopilot::run(cli.pat).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
