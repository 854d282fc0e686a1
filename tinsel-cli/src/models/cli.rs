use clap::{ArgAction, Parser, Subcommand};

/// Tinsel: a workshop assistant.
/// Starts an interactive chat session by default; `toys` manages the
/// inventory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase message verbosity.
    ///
    /// Specify multiple times for more verbose output:
    ///  -v:  INFO level
    ///  -vv: DEBUG level
    ///  -vvv: TRACE level (most verbose)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session (the default when no command is
    /// given).
    Chat,
    /// Manage the toy inventory.
    Toys {
        #[command(subcommand)]
        command: ToyCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ToyCommands {
    /// Record a new toy. Names are not unique; adding the same name twice
    /// creates two records.
    Add { name: String, amount: u32 },
    /// Set the quantity on the first toy whose name matches exactly.
    Set { name: String, amount: u32 },
    /// Apply a category to every recorded toy.
    Categorize { category: String },
    /// List all recorded toys.
    List,
}
