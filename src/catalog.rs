use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::model::{Action, OperationSpec};

/// Total mapping from every [`Action`] to the work that backs it.
#[derive(Debug, Clone)]
pub struct ActionCatalog {
    specs: [OperationSpec; Action::COUNT],
}

impl ActionCatalog {
    /// Default catalog with folder targets under `home`.
    pub fn new(home: &Path) -> Self {
        Self::from_fn(|action| default_spec(action, home))
    }

    /// Default catalog for the current user's home directory.
    pub fn discover() -> Result<Self> {
        let dirs = directories::BaseDirs::new().context("could not determine home directory")?;
        Ok(Self::new(dirs.home_dir()))
    }

    /// Build a catalog from a function that must cover every action.
    pub fn from_fn(mut f: impl FnMut(Action) -> OperationSpec) -> Self {
        Self {
            specs: Action::ALL.map(&mut f),
        }
    }

    pub fn resolve(&self, action: Action) -> &OperationSpec {
        &self.specs[action.index()]
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, &OperationSpec)> {
        Action::ALL.into_iter().zip(self.specs.iter())
    }

    /// Replace the specs named in `overrides`, keeping the rest.
    pub fn with_overrides(mut self, overrides: CatalogOverrides) -> Self {
        for (action, spec) in overrides.overrides {
            tracing::debug!(%action, target = %spec.target(), "catalog override");
            self.specs[action.index()] = spec;
        }
        self
    }
}

/// On-disk catalog override file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogOverrides {
    /// Replacement specs keyed by action name.
    #[serde(default)]
    pub overrides: BTreeMap<Action, OperationSpec>,
}

/// Load catalog overrides from a JSON file.
pub fn load_overrides(path: &Path) -> Result<CatalogOverrides> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open catalog file {}", path.display()))?;
    let reader = std::io::BufReader::new(file);
    let overrides = serde_json::from_reader(reader)
        .with_context(|| format!("invalid catalog file {}", path.display()))?;
    Ok(overrides)
}

/// Generate JSON Schema for the catalog override file.
pub fn generate_schema() -> Result<String> {
    let schema = schemars::schema_for!(CatalogOverrides);
    Ok(serde_json::to_string_pretty(&schema)?)
}

fn developer_dir(home: &Path, rel: &str) -> PathBuf {
    home.join("Library/Developer").join(rel)
}

fn folder(path: PathBuf, label: &str) -> OperationSpec {
    OperationSpec::DirectoryPurge {
        path,
        label: label.to_owned(),
    }
}

fn command(program: &str, args: &[&str], label: &str, success: &str, failure: &str) -> OperationSpec {
    OperationSpec::ShellCommand {
        program: program.to_owned(),
        args: args.iter().map(|a| (*a).to_owned()).collect(),
        label: label.to_owned(),
        success_message: success.to_owned(),
        failure_message: failure.to_owned(),
    }
}

fn default_spec(action: Action, home: &Path) -> OperationSpec {
    match action {
        Action::PurgeDerivedData => folder(developer_dir(home, "Xcode/DerivedData"), "DerivedData"),
        Action::PurgeXcodeCaches => folder(developer_dir(home, "CoreSimulator/Caches"), "Xcode Caches"),
        Action::PurgeArchives => folder(developer_dir(home, "Xcode/Archives"), "Xcode Archives"),
        Action::PurgeIosDeviceSupport => folder(
            developer_dir(home, "Xcode/iOS DeviceSupport"),
            "iOS Device Support",
        ),
        Action::PurgeWatchosDeviceSupport => folder(
            developer_dir(home, "Xcode/watchOS DeviceSupport"),
            "watchOS Device Support",
        ),
        Action::PurgeTvosDeviceSupport => folder(
            developer_dir(home, "Xcode/tvOS DeviceSupport"),
            "tvOS Device Support",
        ),
        Action::PurgeGeneralCaches => folder(home.join("Library/Caches"), "Caches"),
        Action::RemoveStaleSimulators => command(
            "/usr/bin/xcrun",
            &["simctl", "delete", "unavailable"],
            "Remove Old Simulators",
            "Old simulators removed successfully!",
            "Failed to remove old simulators",
        ),
        Action::PurgePackageManagerCache => command(
            "/bin/bash",
            &[
                "-c",
                "if command -v pod &> /dev/null; then pod cache clean --all; else echo 'CocoaPods not installed'; fi",
            ],
            "Clear CocoaPods Cache",
            "CocoaPods cache cleared successfully!",
            "Failed to clear CocoaPods cache",
        ),
        Action::EmptyTrash => command(
            "/usr/bin/osascript",
            &["-e", "tell application \"Finder\" to empty the trash"],
            "Empty Trash",
            "Trash emptied successfully!",
            "Failed to empty trash",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_paths_are_home_relative() {
        let catalog = ActionCatalog::new(Path::new("/Users/dev"));
        assert_eq!(
            catalog.resolve(Action::PurgeDerivedData),
            &OperationSpec::DirectoryPurge {
                path: "/Users/dev/Library/Developer/Xcode/DerivedData".into(),
                label: "DerivedData".into(),
            }
        );
        assert_eq!(
            catalog.resolve(Action::PurgeGeneralCaches).target(),
            "/Users/dev/Library/Caches"
        );
        assert_eq!(
            catalog.resolve(Action::PurgeIosDeviceSupport).target(),
            "/Users/dev/Library/Developer/Xcode/iOS DeviceSupport"
        );
    }

    #[test]
    fn catalog_covers_every_action_in_order() {
        let catalog = ActionCatalog::new(Path::new("/h"));
        let actions: Vec<Action> = catalog.iter().map(|(a, _)| a).collect();
        assert_eq!(actions, Action::ALL.to_vec());
        let commands = catalog
            .iter()
            .filter(|(_, spec)| matches!(spec, OperationSpec::ShellCommand { .. }))
            .count();
        assert_eq!(commands, 3);
    }

    #[test]
    fn overrides_replace_only_named_actions() {
        let json = r#"{
            "overrides": {
                "empty-trash": {
                    "kind": "shell_command",
                    "program": "true",
                    "label": "Empty Trash",
                    "success_message": "ok",
                    "failure_message": "no"
                }
            }
        }"#;
        let overrides: CatalogOverrides = serde_json::from_str(json).unwrap();
        let catalog = ActionCatalog::new(Path::new("/h")).with_overrides(overrides);
        assert_eq!(catalog.resolve(Action::EmptyTrash).target(), "true");
        assert_eq!(
            catalog.resolve(Action::PurgeArchives).target(),
            "/h/Library/Developer/Xcode/Archives"
        );
    }

    #[test]
    fn schema_mentions_override_map() {
        let schema = generate_schema().unwrap();
        assert!(schema.contains("$schema"));
        assert!(schema.contains("overrides"));
    }
}
