use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::model::Action;

/// Reclaim disk space from developer caches and build artifacts.
#[derive(Parser)]
#[command(name = "reclaim", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print JSON Schema for catalog override files.
    Schema,
    /// List every action with the folder or command behind it.
    List,
    /// Perform the given actions, in order.
    Run(RunArgs),
    /// Perform every action in catalog order.
    All,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Output structured JSON lines to stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the home directory that folder targets live under.
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// JSON file replacing the default spec of selected actions.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// Actions to perform.
    #[arg(required = true, value_enum)]
    pub actions: Vec<Action>,
}
