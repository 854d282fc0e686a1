// tinsel-cli/src/chat.rs

use anyhow::{anyhow, Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::fs;
use tracing::{debug, error, info, warn};

use tinsel_core::ChatClient;

use crate::rendering::print_formatted;

/// What the user sees whenever a turn produces no reply, whatever the cause.
/// The actual failure kind goes to the log.
const NO_RESPONSE_PLACEHOLDER: &str = "[No response]";

fn print_welcome_message() {
    println!("\n{}", "Tinsel - Workshop Chat".cyan().bold());
    println!(
        "{}",
        "Type 'exit', 'quit', Ctrl-D, or press Enter on an empty line to quit.".dimmed()
    );
    println!();
}

/// Runs an interactive chat session using rustyline for a REPL experience.
///
/// Only one request is ever in flight: the next line is not read until the
/// current call resolves. The scrollback is the display transcript; requests
/// themselves always carry exactly the one message just typed.
pub async fn run_interactive(client: ChatClient) -> Result<()> {
    print_welcome_message();

    let rl_config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl = DefaultEditor::with_config(rl_config)?;

    let history_dir = dirs::cache_dir()
        .map(|d| d.join("tinsel"))
        .ok_or_else(|| anyhow!("Could not determine cache directory for history file"))?;
    fs::create_dir_all(&history_dir).context("Failed to create history directory")?;
    let history_file_path = history_dir.join("cli_history.txt");

    if rl.load_history(&history_file_path).is_err() {
        debug!(path = %history_file_path.display(), "No previous CLI history found or error loading.");
    }

    let prompt = format!("{} ", ">".green().bold());

    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed_input = line.trim();
                if trimmed_input.is_empty()
                    || trimmed_input.eq_ignore_ascii_case("exit")
                    || trimmed_input.eq_ignore_ascii_case("quit")
                {
                    info!("Exit command or empty line entered, exiting interactive mode.");
                    break;
                }

                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.cyan} {msg}")?
                        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "-"]),
                );
                pb.set_message("Thinking...");
                pb.enable_steady_tick(std::time::Duration::from_millis(100));

                let reply = client.send(trimmed_input).await;

                pb.finish_and_clear();

                println!("\n{} {}", "You:".cyan().bold(), trimmed_input);
                match reply {
                    Ok(Some(content)) => {
                        println!("{}", "Assistant:".magenta().bold());
                        if let Err(e) = print_formatted(&content) {
                            error!("Failed to render reply markdown: {}. Printing raw.", e);
                            println!("{}", content);
                        }
                    }
                    Ok(None) => {
                        info!("Endpoint answered with no usable reply.");
                        println!(
                            "{} {}",
                            "Assistant:".magenta().bold(),
                            NO_RESPONSE_PLACEHOLDER.dimmed()
                        );
                    }
                    Err(e) => {
                        warn!(error = %e, "Chat request failed; showing placeholder.");
                        println!(
                            "{} {}",
                            "Assistant:".magenta().bold(),
                            NO_RESPONSE_PLACEHOLDER.dimmed()
                        );
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".yellow());
                continue;
            }
            Err(ReadlineError::Eof) => {
                info!("EOF detected, exiting interactive mode.");
                break;
            }
            Err(err) => {
                error!("Readline error: {:?}", err);
                eprintln!("Error reading input: {}", err.to_string().red());
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&history_file_path) {
        warn!(path = %history_file_path.display(), error = %e, "Failed to save CLI history.");
    } else {
        debug!(path = %history_file_path.display(), "Saved CLI history.");
    }

    println!("\n{}\n", "Goodbye.".cyan());
    Ok(())
}
