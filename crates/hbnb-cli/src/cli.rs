use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hbnb_store::DEFAULT_SNAPSHOT_PATH;

#[derive(Parser)]
#[command(
    name = "hbnb",
    about = "HBNB object store shell",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Snapshot file to load and save
    #[arg(long, global = true, default_value = DEFAULT_SNAPSHOT_PATH)]
    pub file: PathBuf,

    /// Write indented JSON
    #[arg(long, global = true)]
    pub pretty: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// Positional arguments are optional so that a missing one gets the shell's
// own message instead of a usage error.
#[derive(Subcommand)]
pub enum Command {
    /// Create a record and print its id
    Create(CreateArgs),
    /// Print one record
    Show(TargetArgs),
    /// Delete one record
    Destroy(TargetArgs),
    /// Print every record, optionally of one type
    All(ClassArgs),
    /// Set one field of a record
    Update(UpdateArgs),
    /// Count records, optionally of one type
    Count(ClassArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    pub class: Option<String>,
    /// Field overrides as key=value
    pub params: Vec<String>,
}

#[derive(Args)]
pub struct TargetArgs {
    pub class: Option<String>,
    pub id: Option<String>,
}

#[derive(Args)]
pub struct ClassArgs {
    pub class: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub class: Option<String>,
    pub id: Option<String>,
    pub attribute: Option<String>,
    pub value: Option<String>,
}
