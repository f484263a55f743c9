use anyhow::{Context, Result};
use std::path::Path;

use crate::bus::EventBus;
use crate::events::{ProgressEvent, ResultEvent};

/// Name recorded for a listing entry whose name could not be read.
pub const UNREADABLE_ENTRY: &str = "<unreadable entry>";

/// Remove a single directory entry as a unit.
///
/// Directories are removed recursively; files and symlinks are unlinked.
/// Symlinks are never followed.
pub fn remove_entry(path: &Path) -> Result<()> {
    let metadata = std::fs::symlink_metadata(path).context("failed to stat entry")?;
    if metadata.is_dir() {
        std::fs::remove_dir_all(path).context("failed to remove directory")?;
    } else {
        std::fs::remove_file(path).context("failed to remove file")?;
    }
    Ok(())
}

/// Delete every immediate child of `path`, reporting progress on `bus`.
///
/// A child that cannot be removed is recorded and skipped; its siblings are
/// still attempted. Progress counts attempts, so it always reaches `total`.
pub fn purge(path: &Path, label: &str, bus: &EventBus) -> ResultEvent {
    purge_with(path, label, bus, remove_entry)
}

/// [`purge`] with a caller-supplied removal function.
pub fn purge_with(
    path: &Path,
    label: &str,
    bus: &EventBus,
    mut remove: impl FnMut(&Path) -> Result<()>,
) -> ResultEvent {
    let entries: Vec<_> = match std::fs::read_dir(path) {
        Ok(listing) => listing.collect(),
        Err(e) => {
            tracing::info!(path = %path.display(), error = %e, "purge target not listable");
            return ResultEvent::failure("Info", format!("{label} folder not found!"));
        }
    };

    let total = entries.len();
    bus.publish_progress(ProgressEvent::Starting { total });

    let mut failed_items = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match entry {
            Ok(entry) => {
                let entry_path = entry.path();
                match remove(&entry_path) {
                    Ok(()) => tracing::debug!(path = %entry_path.display(), "removed"),
                    Err(e) => {
                        tracing::warn!("Failed to remove {}: {:#}", entry_path.display(), e);
                        failed_items.push(entry.file_name().to_string_lossy().into_owned());
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Failed to read entry in {}: {}", path.display(), e);
                failed_items.push(UNREADABLE_ENTRY.to_owned());
            }
        }
        bus.publish_progress(ProgressEvent::Advanced {
            completed: index + 1,
        });
    }

    bus.publish_progress(ProgressEvent::Finished);

    let title = format!("Clear {label}");
    if failed_items.is_empty() {
        ResultEvent::success(title, format!("{label} cleaned successfully!"))
    } else {
        ResultEvent::failure(
            title,
            format!(
                "Some items could not be removed: {}",
                failed_items.join(", ")
            ),
        )
    }
}
