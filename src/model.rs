use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A cleanup operation the user can request.
///
/// The declaration order is the catalog order used by
/// [`TaskEngine::perform_all`](crate::engine::TaskEngine::perform_all).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Xcode DerivedData.
    PurgeDerivedData,
    /// CoreSimulator caches.
    PurgeXcodeCaches,
    /// Xcode archives.
    PurgeArchives,
    /// iOS device support files.
    PurgeIosDeviceSupport,
    /// watchOS device support files.
    PurgeWatchosDeviceSupport,
    /// tvOS device support files.
    PurgeTvosDeviceSupport,
    /// The per-user Library/Caches folder.
    PurgeGeneralCaches,
    /// Delete simulators whose runtime is no longer installed.
    RemoveStaleSimulators,
    /// CocoaPods download cache.
    PurgePackageManagerCache,
    /// Empty the Finder trash.
    EmptyTrash,
}

impl Action {
    pub const COUNT: usize = 10;

    /// Every action, in catalog order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::PurgeDerivedData,
        Action::PurgeXcodeCaches,
        Action::PurgeArchives,
        Action::PurgeIosDeviceSupport,
        Action::PurgeWatchosDeviceSupport,
        Action::PurgeTvosDeviceSupport,
        Action::PurgeGeneralCaches,
        Action::RemoveStaleSimulators,
        Action::PurgePackageManagerCache,
        Action::EmptyTrash,
    ];

    /// Position of this action in [`Action::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable kebab-case name, as accepted on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Action::PurgeDerivedData => "purge-derived-data",
            Action::PurgeXcodeCaches => "purge-xcode-caches",
            Action::PurgeArchives => "purge-archives",
            Action::PurgeIosDeviceSupport => "purge-ios-device-support",
            Action::PurgeWatchosDeviceSupport => "purge-watchos-device-support",
            Action::PurgeTvosDeviceSupport => "purge-tvos-device-support",
            Action::PurgeGeneralCaches => "purge-general-caches",
            Action::RemoveStaleSimulators => "remove-stale-simulators",
            Action::PurgePackageManagerCache => "purge-package-manager-cache",
            Action::EmptyTrash => "empty-trash",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The concrete work backing one [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationSpec {
    /// Delete every immediate child of `path`.
    DirectoryPurge {
        /// Directory whose contents are removed.
        path: PathBuf,
        /// Folder name shown in notifications.
        label: String,
    },
    /// Run an external program and wait for it.
    ShellCommand {
        /// Executable path or name.
        program: String,
        /// Argument vector, passed verbatim.
        #[serde(default)]
        args: Vec<String>,
        /// Notification title on success.
        label: String,
        /// Notification body on success.
        success_message: String,
        /// Prefix of the notification body on failure.
        failure_message: String,
    },
}

impl OperationSpec {
    pub fn label(&self) -> &str {
        match self {
            OperationSpec::DirectoryPurge { label, .. } => label,
            OperationSpec::ShellCommand { label, .. } => label,
        }
    }

    /// Short human-readable description of what will be touched.
    pub fn target(&self) -> String {
        match self {
            OperationSpec::DirectoryPurge { path, .. } => path.display().to_string(),
            OperationSpec::ShellCommand { program, args, .. } => {
                std::iter::once(program.as_str())
                    .chain(args.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            OperationSpec::DirectoryPurge { .. } => "directory_purge",
            OperationSpec::ShellCommand { .. } => "shell_command",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (i, action) in Action::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }

    #[test]
    fn names_match_serde_and_clap() {
        use clap::ValueEnum;
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.name()));
            let parsed = Action::from_str(action.name(), false).unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn spec_target_joins_command_line() {
        let spec = OperationSpec::ShellCommand {
            program: "/usr/bin/xcrun".into(),
            args: vec!["simctl".into(), "delete".into(), "unavailable".into()],
            label: "Remove Old Simulators".into(),
            success_message: "ok".into(),
            failure_message: "failed".into(),
        };
        assert_eq!(spec.target(), "/usr/bin/xcrun simctl delete unavailable");
        assert_eq!(spec.kind(), "shell_command");
    }
}
