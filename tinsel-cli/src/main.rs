// tinsel-cli/src/main.rs
mod chat;
mod models;
mod rendering;
mod toys;

use anyhow::{anyhow, Context, Result};
use colored::*;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use tinsel_core::{ChatClient, TinselConfig};

const CONFIG_FILENAME: &str = "Tinsel.toml";
const LOG_FILE_NAME: &str = "tinsel.log";

/// Looks for the config file in the current directory or any parent, then
/// falls back to the user config directory.
fn find_config_file() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let mut current = current_dir.as_path();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() && config_path.is_file() {
            return Ok(config_path);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("tinsel").join(CONFIG_FILENAME);
        if config_path.is_file() {
            return Ok(config_path);
        }
    }
    Err(anyhow!(
        "Could not find '{}' in the current directory, any parent, or the user config directory.",
        CONFIG_FILENAME
    ))
}

fn load_config() -> Result<TinselConfig> {
    let config_path = find_config_file()?;
    info!("Found configuration file at: {:?}", config_path);
    let config_toml_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
    TinselConfig::from_toml_str(&config_toml_content)
        .context("Failed to parse or validate configuration content")
}

#[tokio::main]
async fn main() -> ExitCode {
    // Ensure colored output is enabled for errors printed before logging is
    // fully set up.
    colored::control::set_override(true);

    dotenvy::dotenv().ok();
    let cli = models::cli::Cli::parse();

    // --- Logging Setup ---
    let default_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    let log_dir = match dirs::cache_dir()
        .or_else(dirs::runtime_dir)
        .or_else(|| Some(env::temp_dir()))
        .map(|d| d.join("tinsel"))
    {
        Some(dir) => dir,
        None => {
            eprintln!(
                "{}",
                "Error: Could not determine a suitable directory for log files.".red()
            );
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!(
            "{} Failed to create log directory {}: {}",
            "Error:".red(),
            log_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }
    let log_path = log_dir.join(LOG_FILE_NAME);

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(file_appender);

    let time_format_desc = match time::format_description::parse(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]",
    ) {
        Ok(desc) => desc,
        Err(e) => {
            eprintln!("Warning: Failed to parse time format, using default: {}", e);
            time::format_description::parse("[hour]:[minute]:[second]")
                .expect("Fallback time format failed")
        }
    };
    let local_timer = LocalTime::new(time_format_desc);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_timer(local_timer.clone());

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(local_timer)
        .with_target(false)
        .with_level(true);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("{} Failed to initialize logging: {}", "Error:".red(), e);
        return ExitCode::FAILURE;
    }
    colored::control::unset_override();

    info!(
        "Logging initialized. Level determined by RUST_LOG or -v flags (default: {}). Logging to stderr and {}",
        default_level,
        log_path.display()
    );
    // --- End Logging Setup ---

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!(
                "{} Could not find or load '{}'. See the README for an example.",
                "Error:".red(),
                CONFIG_FILENAME
            );
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Some(models::cli::Commands::Toys { command }) => {
            toys::handle_toys_command(command, &config.inventory)
        }
        Some(models::cli::Commands::Chat) | None => {
            let api_key = env::var(&config.chat.api_key_env_var).unwrap_or_else(|_| {
                warn!(var = %config.chat.api_key_env_var, "API key environment variable not set.");
                String::new()
            });
            match ChatClient::new(config.chat, api_key) {
                Ok(client) => chat::run_interactive(client).await,
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Operation failed: {}", e);
            eprintln!("{} Operation failed: {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
