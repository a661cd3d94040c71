// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Canonical locations of the fixed configuration tiers.
//!
//! Nothing here touches the filesystem; existence is decided by discovery.

use std::path::{Path, PathBuf};

/// File name used for project and ancestor configs.
pub const PROJECT_CONFIG_FILENAME: &str = ".rig.toml";

/// File name of the gitignored, per-user project overrides.
pub const LOCAL_CONFIG_FILENAME: &str = ".rig.local.toml";

/// Location of the global config relative to the home directory.
pub const GLOBAL_CONFIG_RELATIVE: &str = ".local/rig/config.toml";

/// Resolved paths for the fixed tiers of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
	/// Global config: ~/.local/rig/config.toml, absent without a home directory
	pub global_config_file: Option<PathBuf>,
	/// Project config: <project>/.rig.toml
	pub project_config_file: PathBuf,
	/// Local overrides: <project>/.rig.local.toml
	pub local_config_file: PathBuf,
}

impl ConfigPaths {
	/// Compute the fixed-tier paths for `project_root`, with the global file
	/// under `home_dir` when one is known.
	///
	/// Paths must be absolute; passing a relative path is a caller bug.
	pub fn new(project_root: &Path, home_dir: Option<&Path>) -> Self {
		debug_assert!(project_root.is_absolute(), "project root must be absolute");
		debug_assert!(
			home_dir.map_or(true, Path::is_absolute),
			"home directory must be absolute"
		);

		Self {
			global_config_file: home_dir.map(global_config_path),
			project_config_file: project_config_path(project_root),
			local_config_file: local_config_path(project_root),
		}
	}
}

pub fn global_config_path(home_dir: &Path) -> PathBuf {
	home_dir.join(GLOBAL_CONFIG_RELATIVE)
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
	project_root.join(PROJECT_CONFIG_FILENAME)
}

pub fn local_config_path(project_root: &Path) -> PathBuf {
	project_root.join(LOCAL_CONFIG_FILENAME)
}

/// The current user's home directory, if the platform reports one.
pub fn home_dir() -> Option<PathBuf> {
	let home = dirs::home_dir();
	tracing::trace!(home = ?home, "resolved home directory");
	home
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fixed_tier_paths() {
		let paths = ConfigPaths::new(Path::new("/home/user/src/app"), Some(Path::new("/home/user")));

		assert_eq!(
			paths.global_config_file,
			Some(PathBuf::from("/home/user/.local/rig/config.toml"))
		);
		assert_eq!(
			paths.project_config_file,
			PathBuf::from("/home/user/src/app/.rig.toml")
		);
		assert_eq!(
			paths.local_config_file,
			PathBuf::from("/home/user/src/app/.rig.local.toml")
		);
	}

	/// The project may live outside the home directory entirely.
	#[test]
	fn test_project_outside_home() {
		let paths = ConfigPaths::new(Path::new("/srv/app"), Some(Path::new("/home/user")));
		assert_eq!(paths.project_config_file, PathBuf::from("/srv/app/.rig.toml"));
		assert_eq!(
			paths.global_config_file,
			Some(PathBuf::from("/home/user/.local/rig/config.toml"))
		);
	}

	#[test]
	fn test_no_home_has_no_global_file() {
		let paths = ConfigPaths::new(Path::new("/srv/app"), None);
		assert!(paths.global_config_file.is_none());
		assert_eq!(paths.local_config_file, PathBuf::from("/srv/app/.rig.local.toml"));
	}
}
