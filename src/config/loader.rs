//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::Pt2OnnxConfig;
use crate::domain::errors::Pt2OnnxError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into Pt2OnnxConfig
/// 4. Applies environment variable overrides (PT2ONNX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use pt2onnx::config::loader::load_config;
///
/// let config = load_config("pt2onnx.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<Pt2OnnxConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Pt2OnnxError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        Pt2OnnxError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: Pt2OnnxConfig = toml::from_str(&contents)
        .map_err(|e| Pt2OnnxError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        Pt2OnnxError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Built-in defaults with environment variable overrides applied
///
/// Used when no configuration file exists and the jobs come from the
/// command line.
///
/// # Errors
///
/// Returns an error if an override holds an invalid value.
pub fn default_config() -> Result<Pt2OnnxConfig> {
    let mut config = Pt2OnnxConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate().map_err(|e| {
        Pt2OnnxError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("environment variable pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(Pt2OnnxError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using PT2ONNX_* prefix
///
/// Environment variables follow the pattern: PT2ONNX_<SECTION>_<KEY>
/// For example: PT2ONNX_EXPORTER_DEVICE, PT2ONNX_EXPORT_IF_EXISTS
fn apply_env_overrides(config: &mut Pt2OnnxConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("PT2ONNX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Exporter overrides
    if let Ok(val) = std::env::var("PT2ONNX_EXPORTER_PROGRAM") {
        config.exporter.program = val;
    }
    if let Ok(val) = std::env::var("PT2ONNX_EXPORTER_DEVICE") {
        config.exporter.device = Some(val);
    }
    if let Ok(val) = std::env::var("PT2ONNX_EXPORTER_TIMEOUT_SECS") {
        config.exporter.timeout_secs = val.parse().map_err(|_| {
            Pt2OnnxError::Configuration(format!(
                "PT2ONNX_EXPORTER_TIMEOUT_SECS must be a positive integer, got '{val}'"
            ))
        })?;
    }

    // Export overrides
    if let Ok(val) = std::env::var("PT2ONNX_EXPORT_IF_EXISTS") {
        config.export.if_exists = val.parse().map_err(Pt2OnnxError::Configuration)?;
    }
    if let Ok(val) = std::env::var("PT2ONNX_EXPORT_DRY_RUN") {
        config.export.dry_run = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PT2ONNX_EXPORT_REPORT_PATH") {
        config.export.report_path = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PT2ONNX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("PT2ONNX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
