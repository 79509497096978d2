// pt2onnx - Batch model checkpoint exporter
// Copyright (c) 2025 pt2onnx Contributors
// Licensed under the MIT License

use clap::Parser;
use pt2onnx::cli::{Cli, Commands};
use pt2onnx::config::{load_config, LoggingConfig};
use pt2onnx::logging::init_logging;
use std::path::Path;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logging settings come from the config file when it loads cleanly;
    // otherwise console-only logging and the command reports the problem
    let file_config = if Path::new(&cli.config).exists() {
        load_config(&cli.config).ok()
    } else {
        None
    };
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| file_config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = file_config
        .map(|c| c.logging)
        .unwrap_or_else(LoggingConfig::default);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "pt2onnx - Batch model checkpoint exporter"
    );

    // Create shutdown signal channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(wait_for_shutdown(shutdown_tx));

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors; flush file logs first
    drop(guard);
    process::exit(exit_code);
}

/// Signal the driver to stop starting new jobs on SIGINT or SIGTERM
async fn wait_for_shutdown(shutdown_tx: watch::Sender<bool>) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                    }
                    _ = sigterm.recv() => {
                        tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            return;
        }
        tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
    }

    eprintln!("\n⚠️  Shutdown signal received, finishing the current job...");
    let _ = shutdown_tx.send(true);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
