use anyhow::{Context, Result};
use std::io::Write;

use crate::bus::EventBus;
use crate::catalog::{self, ActionCatalog};
use crate::cli::GlobalArgs;
use crate::engine::TaskEngine;
use crate::exit_codes::exit;
use crate::model::Action;
use crate::reporter::Reporter;

/// Build the catalog selected by the global flags.
pub fn load_catalog(args: &GlobalArgs) -> Result<ActionCatalog> {
    let catalog = match &args.home {
        Some(home) => ActionCatalog::new(home),
        None => ActionCatalog::discover()?,
    };
    match &args.catalog {
        Some(path) => Ok(catalog.with_overrides(catalog::load_overrides(path)?)),
        None => Ok(catalog),
    }
}

pub fn list(args: &GlobalArgs, out: &mut impl Write) -> Result<i32> {
    let catalog = load_catalog(args)?;
    for (action, spec) in catalog.iter() {
        if args.json {
            let line = serde_json::json!({ "action": action, "spec": spec });
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{:<30} {:<16} {}", action.name(), spec.kind(), spec.target())?;
        }
    }
    Ok(exit::SUCCESS)
}

/// Perform `actions` in order and wait for all of them.
pub fn run(args: &GlobalArgs, actions: &[Action]) -> Result<i32> {
    execute(args, |engine| {
        for &action in actions {
            engine.perform(action)?;
        }
        Ok(())
    })
}

/// Perform every action plus the aggregate result.
pub fn all(args: &GlobalArgs) -> Result<i32> {
    execute(args, |engine| Ok(engine.perform_all()?))
}

fn execute(args: &GlobalArgs, submit: impl FnOnce(&TaskEngine) -> Result<()>) -> Result<i32> {
    let catalog = load_catalog(args)?;
    let bus = EventBus::new();
    let events = bus.subscribe();
    let presenter = Reporter::spawn(events, args.json);

    // The engine keeps the only remaining bus handle, so the presenter's
    // stream closes once the engine shuts down.
    let engine = TaskEngine::start(catalog, bus)?;
    submit(&engine)?;
    engine.shutdown()?;

    let reporter = presenter
        .join()
        .map_err(|_| anyhow::anyhow!("presentation thread panicked"))?;
    tracing::info!("{}", reporter.summary());
    if reporter.all_succeeded() {
        Ok(exit::SUCCESS)
    } else {
        Ok(exit::ACTION_FAILURE)
    }
}

pub fn schema(out: &mut impl Write) -> Result<i32> {
    let schema = catalog::generate_schema().context("failed to generate schema")?;
    writeln!(out, "{schema}")?;
    Ok(exit::SUCCESS)
}
