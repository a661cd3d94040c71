// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Enumerating candidate config files in precedence order.
//!
//! Discovery never fails: a missing or unreachable file is reported with
//! `exists == false` and any read problem surfaces later, from the parser.

use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::layer::RawLayer;
use crate::paths::{self, ConfigPaths, PROJECT_CONFIG_FILENAME};
use crate::types::ConfigLayer;

/// One candidate config location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
	pub path: PathBuf,
	pub layer: ConfigLayer,
	/// Position within the ancestor chain, 0 = farthest. `None` outside
	/// [`ConfigLayer::Ancestor`].
	pub ancestor_index: Option<usize>,
	pub exists: bool,
	/// Parsed payload, attached by the resolver once the file is loaded.
	pub content: Option<RawLayer>,
}

impl DiscoveredFile {
	fn candidate(path: PathBuf, layer: ConfigLayer, ancestor_index: Option<usize>) -> Self {
		let exists = file_exists(&path);
		trace!(path = %path.display(), layer = %layer, exists, "config candidate");
		Self {
			path,
			layer,
			ancestor_index,
			exists,
			content: None,
		}
	}

	/// Return a copy of this candidate carrying its parsed content.
	pub fn with_content(&self, content: RawLayer) -> Self {
		Self {
			content: Some(content),
			..self.clone()
		}
	}
}

/// Every candidate file for `project_root`, lowest precedence first:
/// global, ancestors (farthest to nearest), project, local.
///
/// `home_dir` bounds the ancestor walk and locates the global file; when it is
/// `None` the current user's home is used. If no home can be determined the
/// global candidate is left out.
pub fn discover_config_files(project_root: &Path, home_dir: Option<&Path>) -> Vec<DiscoveredFile> {
	let home = match home_dir {
		Some(home) => Some(home.to_path_buf()),
		None => paths::home_dir(),
	};
	discover_with_home(project_root, home.as_deref())
}

fn discover_with_home(project_root: &Path, home: Option<&Path>) -> Vec<DiscoveredFile> {
	if home.is_none() {
		warn!("could not determine home directory, skipping global config");
	}

	let ConfigPaths {
		global_config_file,
		project_config_file,
		local_config_file,
	} = ConfigPaths::new(project_root, home);

	let mut files = Vec::new();

	if let Some(global) = global_config_file {
		files.push(DiscoveredFile::candidate(global, ConfigLayer::Global, None));
	}

	let ancestors = ancestor_configs(project_root, home);
	files.extend(ancestors.into_iter().enumerate().map(|(index, path)| {
		DiscoveredFile::candidate(path, ConfigLayer::Ancestor, Some(index))
	}));

	files.push(DiscoveredFile::candidate(
		project_config_file,
		ConfigLayer::Project,
		None,
	));
	files.push(DiscoveredFile::candidate(
		local_config_file,
		ConfigLayer::Local,
		None,
	));

	debug!(
		project_root = %project_root.display(),
		candidates = files.len(),
		existing = files.iter().filter(|f| f.exists).count(),
		"discovered config files"
	);
	files
}

/// Existing `.rig.toml` files in the directories above `start`, farthest
/// first.
///
/// The walk starts at the parent of `start` and stops before the home
/// directory or at the filesystem root, whichever comes first.
pub fn find_ancestor_configs(start: &Path, home_dir: Option<&Path>) -> Vec<PathBuf> {
	let home = match home_dir {
		Some(home) => Some(home.to_path_buf()),
		None => paths::home_dir(),
	};
	ancestor_configs(start, home.as_deref())
}

fn ancestor_configs(start: &Path, home: Option<&Path>) -> Vec<PathBuf> {
	let start = canonicalize_or_keep(start);
	let home = home.map(canonicalize_or_keep);

	let mut found: Vec<PathBuf> = ancestor_dirs(&start, home.as_deref())
		.into_iter()
		.map(|dir| dir.join(PROJECT_CONFIG_FILENAME))
		.filter(|path| file_exists(path))
		.collect();
	found.reverse();
	found
}

/// Directories strictly above `start` and below `stop_at`, nearest first.
///
/// The filesystem root is never included. A `start` outside `stop_at` walks
/// all the way up to the root.
pub fn ancestor_dirs(start: &Path, stop_at: Option<&Path>) -> Vec<PathBuf> {
	let mut dirs = Vec::new();
	let mut current = start.parent();

	while let Some(dir) = current {
		if Some(dir) == stop_at {
			trace!(dir = %dir.display(), "reached home directory");
			break;
		}
		let Some(parent) = dir.parent() else {
			break;
		};
		dirs.push(dir.to_path_buf());
		current = Some(parent);
	}

	dirs
}

fn canonicalize_or_keep(path: &Path) -> PathBuf {
	std::fs::canonicalize(path).unwrap_or_else(|e| {
		trace!(path = %path.display(), error = %e, "could not canonicalize path");
		path.to_path_buf()
	})
}

fn file_exists(path: &Path) -> bool {
	path.try_exists().unwrap_or_else(|e| {
		debug!(path = %path.display(), error = %e, "existence check failed, treating as missing");
		false
	})
}
