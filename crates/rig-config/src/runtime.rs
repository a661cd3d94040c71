// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Runtime configuration types with resolved defaults.

use serde::{Deserialize, Serialize};

use crate::types::LocationStrategy;

/// The final, fully resolved configuration for rig.
///
/// `EffectiveConfig::default()` is the schema's built-in defaults, which is
/// also what merging zero layers produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EffectiveConfig {
	pub worktree: WorktreeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorktreeConfig {
	pub default_location: LocationStrategy,
	pub delete_branch: bool,
	pub protected: bool,
	pub paths: PathPatterns,
	pub sync: SyncConfig,
	pub hooks: HooksConfig,
}

impl Default for WorktreeConfig {
	fn default() -> Self {
		Self {
			default_location: LocationStrategy::Sibling,
			delete_branch: true,
			protected: false,
			paths: PathPatterns::default(),
			sync: SyncConfig::default(),
			hooks: HooksConfig::default(),
		}
	}
}

/// Worktree path templates.
///
/// Placeholders: `{repo}`, `{branch}` (slashes become dashes), `{number}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathPatterns {
	pub sibling: String,
	pub local: String,
	pub pr: String,
}

impl Default for PathPatterns {
	fn default() -> Self {
		Self {
			sibling: "../{repo}-{branch}".to_string(),
			local: ".worktrees/{branch}".to_string(),
			pr: "../{repo}-pr-{number}".to_string(),
		}
	}
}

/// Paths shared with new worktrees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SyncConfig {
	/// Symlinked from the main worktree
	pub link: Vec<String>,
	/// Copied from the main worktree
	pub copy: Vec<String>,
}

/// Lifecycle hook commands, in invocation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HooksConfig {
	pub post_add: Vec<String>,
	pub pre_remove: Vec<String>,
}
