//! `reclaim` - reclaim disk space from developer caches.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use reclaim::cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.global.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut stdout = std::io::stdout();
    let exit_code = match cli.command {
        Command::Schema => reclaim::commands::schema(&mut stdout)?,
        Command::List => reclaim::commands::list(&cli.global, &mut stdout)?,
        Command::Run(args) => reclaim::commands::run(&cli.global, &args.actions)?,
        Command::All => reclaim::commands::all(&cli.global)?,
    };
    std::process::exit(exit_code);
}
