// tinsel-cli/src/toys.rs

use anyhow::{anyhow, Context, Result};
use colored::*;
use std::path::PathBuf;
use tracing::warn;

use tinsel_core::inventory::json_file::{JsonFileStore, TOYS_FILE_NAME};
use tinsel_core::inventory::sqlite::{SqliteStore, TOYS_DB_NAME};
use tinsel_core::{BackendKind, Inventory, InventoryConfig, ToyRecord, ToyStore};

use crate::models::cli::ToyCommands;

fn resolve_data_dir(config: &InventoryConfig) -> Result<PathBuf> {
    match &config.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => dirs::data_dir()
            .map(|d| d.join("tinsel"))
            .ok_or_else(|| anyhow!("Could not determine a data directory for toy records")),
    }
}

/// Opens the configured backend and loads the collection. A store that cannot
/// be opened is unrecoverable; the error propagates and the process exits.
fn open_inventory(config: &InventoryConfig) -> Result<Inventory> {
    let data_dir = resolve_data_dir(config)?;
    let store: Box<dyn ToyStore> = match config.backend {
        BackendKind::Sqlite => Box::new(
            SqliteStore::open(&data_dir.join(TOYS_DB_NAME))
                .context("Failed to open the toy database")?,
        ),
        BackendKind::Json => Box::new(
            JsonFileStore::open(data_dir.join(TOYS_FILE_NAME))
                .context("Failed to open the toy record file")?,
        ),
    };
    Inventory::new(store).context("Failed to load toy records")
}

pub fn handle_toys_command(command: ToyCommands, config: &InventoryConfig) -> Result<()> {
    let mut inventory = open_inventory(config)?;

    if let ToyCommands::List = command {
        print_records(inventory.records());
        return Ok(());
    }

    // Mutations repaint through the store's subscription hook, so the user
    // always sees the state that was actually persisted and reloaded.
    inventory.subscribe(print_records);

    match command {
        ToyCommands::Add { name, amount } => {
            if let Err(e) = inventory.create(&name, amount) {
                warn!(error = %e, name = %name, "Failed to persist new toy record.");
            }
        }
        ToyCommands::Set { name, amount } => match inventory.update_quantity(&name, amount) {
            Ok(Some(_)) => {}
            Ok(None) => println!("{}", format!("No toy named '{}'.", name).dimmed()),
            Err(e) => warn!(error = %e, name = %name, "Failed to update toy quantity."),
        },
        ToyCommands::Categorize { category } => {
            if let Err(e) = inventory.add_category(&category) {
                warn!(error = %e, category = %category, "Failed to apply category.");
            }
        }
        ToyCommands::List => unreachable!("handled above"),
    }
    Ok(())
}

fn print_records(records: &[ToyRecord]) {
    if records.is_empty() {
        println!("No toys recorded yet.");
        return;
    }
    println!("\n{}", "Toys:".bold());
    println!(
        "{:<28} {:<8} {}",
        "Name".underline(),
        "Amount".underline(),
        "Category".underline()
    );
    for record in records {
        println!(
            "{:<28} {:<8} {}",
            record.name,
            record.amount,
            record
                .category
                .as_deref()
                .unwrap_or("-")
                .dimmed()
        );
    }
    println!();
}
