// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration layer - the validated content of one file.
//!
//! Every field is `Option`: `None` means "inherit from lower layers" and is
//! never the same thing as an empty or default value.

use serde::{Deserialize, Serialize};

use crate::types::LocationStrategy;

/// One file's contents; all fields are Option for merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawLayer {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub worktree: Option<WorktreeLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct WorktreeLayer {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub default_location: Option<LocationStrategy>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub delete_branch: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub protected: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub paths: Option<PathsLayer>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sync: Option<SyncLayer>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hooks: Option<HooksLayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PathsLayer {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sibling: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub local: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SyncLayer {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub copy: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extend_link: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extend_copy: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exclude_link: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exclude_copy: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct HooksLayer {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub post_add: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pre_remove: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extend_post_add: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extend_pre_remove: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exclude_post_add: Option<Vec<String>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exclude_pre_remove: Option<Vec<String>>,
}

/// Borrowed view of one mergeable list: base replacement plus modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListPatch<'a> {
	pub base: Option<&'a [String]>,
	pub extend: Option<&'a [String]>,
	pub exclude: Option<&'a [String]>,
}

impl ListPatch<'_> {
	/// True when the layer touches this list in any way.
	pub fn is_present(&self) -> bool {
		self.base.is_some() || self.extend.is_some() || self.exclude.is_some()
	}
}

impl SyncLayer {
	pub fn link_patch(&self) -> ListPatch<'_> {
		ListPatch {
			base: self.link.as_deref(),
			extend: self.extend_link.as_deref(),
			exclude: self.exclude_link.as_deref(),
		}
	}

	pub fn copy_patch(&self) -> ListPatch<'_> {
		ListPatch {
			base: self.copy.as_deref(),
			extend: self.extend_copy.as_deref(),
			exclude: self.exclude_copy.as_deref(),
		}
	}
}

impl HooksLayer {
	pub fn post_add_patch(&self) -> ListPatch<'_> {
		ListPatch {
			base: self.post_add.as_deref(),
			extend: self.extend_post_add.as_deref(),
			exclude: self.exclude_post_add.as_deref(),
		}
	}

	pub fn pre_remove_patch(&self) -> ListPatch<'_> {
		ListPatch {
			base: self.pre_remove.as_deref(),
			extend: self.extend_pre_remove.as_deref(),
			exclude: self.exclude_pre_remove.as_deref(),
		}
	}
}

impl RawLayer {
	/// True when the file specified nothing at all.
	pub fn is_empty(&self) -> bool {
		self.present_keys().is_empty()
	}

	/// Dotted kebab-case keys of the effective configuration this layer sets.
	///
	/// List modifiers are reported under their base key, so
	/// `extend-link` contributes `worktree.sync.link`.
	pub fn present_keys(&self) -> Vec<&'static str> {
		let mut keys = Vec::new();
		let Some(worktree) = &self.worktree else {
			return keys;
		};

		if worktree.default_location.is_some() {
			keys.push("worktree.default-location");
		}
		if worktree.delete_branch.is_some() {
			keys.push("worktree.delete-branch");
		}
		if worktree.protected.is_some() {
			keys.push("worktree.protected");
		}
		if let Some(paths) = &worktree.paths {
			if paths.sibling.is_some() {
				keys.push("worktree.paths.sibling");
			}
			if paths.local.is_some() {
				keys.push("worktree.paths.local");
			}
			if paths.pr.is_some() {
				keys.push("worktree.paths.pr");
			}
		}
		if let Some(sync) = &worktree.sync {
			if sync.link_patch().is_present() {
				keys.push("worktree.sync.link");
			}
			if sync.copy_patch().is_present() {
				keys.push("worktree.sync.copy");
			}
		}
		if let Some(hooks) = &worktree.hooks {
			if hooks.post_add_patch().is_present() {
				keys.push("worktree.hooks.post-add");
			}
			if hooks.pre_remove_patch().is_present() {
				keys.push("worktree.hooks.pre-remove");
			}
		}

		keys
	}
}
