//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for pt2onnx using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Config path used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "pt2onnx.toml";

/// pt2onnx - batch export of model checkpoints to ONNX and other formats
#[derive(Parser, Debug)]
#[command(name = "pt2onnx")]
#[command(version, about, long_about = None)]
#[command(author = "pt2onnx Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "PT2ONNX_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PT2ONNX_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export checkpoints to inference-graph artifacts
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
