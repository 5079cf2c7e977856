use std::net::{IpAddr, SocketAddr};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use kortex_core::scripting::registry::ScriptRegistry;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kortex_api::cli::{self, Cli, Command};
use kortex_api::config::ServerConfig;
use kortex_api::router::build_app_router;
use kortex_api::scripting::orchestrator::ScriptOrchestrator;
use kortex_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let command = Cli::parse().command.unwrap_or(Command::Serve);

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| command.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let mut config = ServerConfig::from_env();
    config.scripts_dir = config.scripts_dir.canonicalize().with_context(|| {
        format!(
            "Scripts directory {} does not exist",
            config.scripts_dir.display()
        )
    })?;
    let registry = ScriptRegistry::new(&config.scripts_dir);

    match command {
        Command::Serve => {
            serve(config, registry).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::List => {
            cli::print_script_list(&registry, &mut std::io::stdout().lock())
                .await
                .context("Failed to write script list")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run { name } => {
            let orchestrator = ScriptOrchestrator::new(Arc::new(registry), config.script_timeout());
            match orchestrator.run(&name).await {
                Ok(result) => {
                    cli::print_run_result(&result, &mut std::io::stdout().lock())
                        .context("Failed to write script output")?;
                    Ok(ExitCode::from(cli::exit_status(&result)))
                }
                Err(e) => {
                    let (_, _, message) = e.classify();
                    eprintln!("Error: {message}");
                    eprintln!("Use 'kortex-api list' to see available scripts.");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Run the HTTP dashboard until a shutdown signal arrives.
async fn serve(config: ServerConfig, registry: ScriptRegistry) -> anyhow::Result<()> {
    tracing::info!(
        host = %config.host,
        port = config.port,
        scripts_dir = %config.scripts_dir.display(),
        script_timeout_secs = config.script_timeout_secs,
        "Loaded server configuration",
    );
    if config.request_timeout_secs <= config.script_timeout_secs {
        tracing::warn!(
            request_timeout_secs = config.request_timeout_secs,
            script_timeout_secs = config.script_timeout_secs,
            "Request timeout does not exceed script timeout; slow scripts will surface as 408",
        );
    }

    // --- Script allow-list ---
    for name in registry.names() {
        match registry.get(name).await {
            Ok(script) => {
                tracing::info!(script = name, file = %script.file_path, "Allow-listed script ready");
            }
            Err(e) => tracing::warn!(script = name, error = %e, "Allow-listed script missing"),
        }
    }

    // --- App state + router ---
    let state = AppState::new(config.clone(), registry);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse::<IpAddr>()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
