//! Concierge relay CLI and HTTP server entry point.
//!
//! Binary name: `concierge`
//!
//! Loads configuration, initializes tracing, then either serves the `/chat`
//! relay or runs a one-shot connectivity check against the model.

mod cli;
mod http;
mod state;

use clap::Parser;

use concierge_infra::config::{read_config, ConfigError, DEFAULT_CONFIG_FILE};
use concierge_infra::llm::test_provider_connection;
use concierge_observe::tracing_setup::{init_tracing, shutdown_tracing, TracingOptions};
use concierge_types::config::ConciergeConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logged in report_config once the subscriber exists.
    let loaded = read_config(cli.config.as_deref()).await;
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => ConciergeConfig::default(),
    };

    let options = TracingOptions::from_verbosity(cli.verbose, cli.quiet)
        .with_json(config.logging.json)
        .with_otel(config.logging.otel);
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    report_config(&cli, &loaded);

    let result = run(cli, config).await;
    shutdown_tracing();
    result
}

fn report_config(cli: &Cli, loaded: &Result<Option<ConciergeConfig>, ConfigError>) {
    let path = cli
        .config
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
    match loaded {
        Ok(Some(_)) => tracing::info!(%path, "loaded configuration"),
        Ok(None) => tracing::debug!(%path, "no config file found, using defaults"),
        Err(err) => tracing::warn!("{err}, using defaults"),
    }
}

async fn run(cli: Cli, mut config: ConciergeConfig) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }

            let state = AppState::init(&config)?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, model = %config.model.model, "concierge relay listening");

            if !cli.quiet {
                println!(
                    "  {} Concierge relay listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Check => {
            let provider = state::build_provider(&config.model)?;
            println!(
                "  Checking {} ({})...",
                console::style(provider.name()).cyan(),
                config.model.model
            );
            match test_provider_connection(&provider).await {
                Ok(reply) => {
                    println!("  {} Model replied: {}", console::style("✓").green(), reply.trim());
                }
                Err(err) => {
                    println!("  {} {}", console::style("✗").red(), err);
                    anyhow::bail!("connectivity check failed: {err}");
                }
            }
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
