// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Folding validated layers into one [`EffectiveConfig`].
//!
//! Layers are applied lowest precedence first, starting from the schema
//! defaults. Scalars are last-write-wins. Lists are rebuilt per layer: a base
//! list replaces the accumulated value, `extend-*` appends (duplicates kept)
//! and `exclude-*` then removes every exact match.

use tracing::trace;

use crate::layer::{HooksLayer, ListPatch, PathsLayer, RawLayer, SyncLayer, WorktreeLayer};
use crate::runtime::{EffectiveConfig, HooksConfig, PathPatterns, SyncConfig, WorktreeConfig};

/// An exclude entry that matched nothing in the list it was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWarning {
	/// Dotted kebab-case key of the list, e.g. `worktree.sync.link`.
	pub key: &'static str,
	pub excluded_item: String,
	/// Position of the offending layer in the merged sequence.
	pub layer_index: usize,
}

/// Merge layers ordered from lowest to highest precedence.
pub fn merge<'a, I>(layers: I) -> EffectiveConfig
where
	I: IntoIterator<Item = &'a RawLayer>,
{
	merge_with_warnings(layers).0
}

/// Like [`merge`], also reporting exclude entries that removed nothing.
pub fn merge_with_warnings<'a, I>(layers: I) -> (EffectiveConfig, Vec<MergeWarning>)
where
	I: IntoIterator<Item = &'a RawLayer>,
{
	let mut config = EffectiveConfig::default();
	let mut merger = Merger {
		layer_index: 0,
		warnings: Vec::new(),
	};

	for (index, layer) in layers.into_iter().enumerate() {
		merger.layer_index = index;
		if let Some(worktree) = &layer.worktree {
			merger.worktree(&mut config.worktree, worktree);
		}
	}

	(config, merger.warnings)
}

struct Merger {
	layer_index: usize,
	warnings: Vec<MergeWarning>,
}

impl Merger {
	fn worktree(&mut self, target: &mut WorktreeConfig, layer: &WorktreeLayer) {
		if let Some(location) = layer.default_location {
			target.default_location = location;
		}
		if let Some(delete_branch) = layer.delete_branch {
			target.delete_branch = delete_branch;
		}
		if let Some(protected) = layer.protected {
			target.protected = protected;
		}
		if let Some(paths) = &layer.paths {
			merge_paths(&mut target.paths, paths);
		}
		if let Some(sync) = &layer.sync {
			self.sync(&mut target.sync, sync);
		}
		if let Some(hooks) = &layer.hooks {
			self.hooks(&mut target.hooks, hooks);
		}
	}

	fn sync(&mut self, target: &mut SyncConfig, layer: &SyncLayer) {
		self.list(&mut target.link, layer.link_patch(), "worktree.sync.link");
		self.list(&mut target.copy, layer.copy_patch(), "worktree.sync.copy");
	}

	fn hooks(&mut self, target: &mut HooksConfig, layer: &HooksLayer) {
		self.list(
			&mut target.post_add,
			layer.post_add_patch(),
			"worktree.hooks.post-add",
		);
		self.list(
			&mut target.pre_remove,
			layer.pre_remove_patch(),
			"worktree.hooks.pre-remove",
		);
	}

	fn list(&mut self, target: &mut Vec<String>, patch: ListPatch<'_>, key: &'static str) {
		if !patch.is_present() {
			return;
		}

		if let Some(base) = patch.base {
			*target = base.to_vec();
		}
		if let Some(extend) = patch.extend {
			target.extend_from_slice(extend);
		}
		if let Some(exclude) = patch.exclude {
			for item in exclude {
				if !target.contains(item) {
					trace!(key, item = %item, layer = self.layer_index, "exclude matched nothing");
					self.warnings.push(MergeWarning {
						key,
						excluded_item: item.clone(),
						layer_index: self.layer_index,
					});
				}
			}
			target.retain(|entry| !exclude.contains(entry));
		}
	}
}

fn merge_paths(target: &mut PathPatterns, layer: &PathsLayer) {
	if let Some(sibling) = &layer.sibling {
		target.sibling = sibling.clone();
	}
	if let Some(local) = &layer.local {
		target.local = local.clone();
	}
	if let Some(pr) = &layer.pr {
		target.pr = pr.clone();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::LocationStrategy;
	use proptest::prelude::*;

	fn strings(items: &[&str]) -> Vec<String> {
		items.iter().map(|s| s.to_string()).collect()
	}

	fn sync_layer(sync: SyncLayer) -> RawLayer {
		RawLayer {
			worktree: Some(WorktreeLayer {
				sync: Some(sync),
				..Default::default()
			}),
		}
	}

	#[test]
	fn test_zero_layers_yield_defaults() {
		assert_eq!(merge(std::iter::empty()), EffectiveConfig::default());
		let (_, warnings) = merge_with_warnings(std::iter::empty());
		assert!(warnings.is_empty());
	}

	#[test]
	fn test_base_extend_exclude_across_layers() {
		let l1 = sync_layer(SyncLayer {
			link: Some(strings(&["a", "b"])),
			..Default::default()
		});
		let l2 = sync_layer(SyncLayer {
			extend_link: Some(strings(&["c"])),
			..Default::default()
		});
		let l3 = sync_layer(SyncLayer {
			exclude_link: Some(strings(&["a"])),
			..Default::default()
		});

		let config = merge([&l1, &l2, &l3]);
		assert_eq!(config.worktree.sync.link, strings(&["b", "c"]));
		assert!(config.worktree.sync.copy.is_empty());
	}

	/// A later base list discards everything accumulated below it.
	#[test]
	fn test_base_list_resets_accumulated_value() {
		let l1 = sync_layer(SyncLayer {
			link: Some(strings(&["a"])),
			extend_copy: Some(strings(&["x"])),
			..Default::default()
		});
		let l2 = sync_layer(SyncLayer {
			extend_link: Some(strings(&["b"])),
			..Default::default()
		});
		let l3 = sync_layer(SyncLayer {
			link: Some(Vec::new()),
			..Default::default()
		});

		let config = merge([&l1, &l2, &l3]);
		assert!(config.worktree.sync.link.is_empty());
		assert_eq!(config.worktree.sync.copy, strings(&["x"]));
	}

	#[test]
	fn test_extend_keeps_duplicates_and_order() {
		let hooks = |extend: &[&str]| RawLayer {
			worktree: Some(WorktreeLayer {
				hooks: Some(HooksLayer {
					extend_post_add: Some(strings(extend)),
					..Default::default()
				}),
				..Default::default()
			}),
		};
		let l1 = hooks(&["npm install", "make"]);
		let l2 = hooks(&["make"]);

		let config = merge([&l1, &l2]);
		assert_eq!(
			config.worktree.hooks.post_add,
			strings(&["npm install", "make", "make"])
		);
	}

	/// Within one layer exclude runs after extend, so it can drop its own entry.
	#[test]
	fn test_exclude_applies_after_extend_in_same_layer() {
		let layer = sync_layer(SyncLayer {
			extend_copy: Some(strings(&["a", "b"])),
			exclude_copy: Some(strings(&["a"])),
			..Default::default()
		});
		let (config, warnings) = merge_with_warnings([&layer]);
		assert_eq!(config.worktree.sync.copy, strings(&["b"]));
		assert!(warnings.is_empty());
	}

	#[test]
	fn test_exclude_removes_every_match() {
		let l1 = sync_layer(SyncLayer {
			link: Some(strings(&["a", "b", "a"])),
			..Default::default()
		});
		let l2 = sync_layer(SyncLayer {
			exclude_link: Some(strings(&["a"])),
			..Default::default()
		});
		assert_eq!(merge([&l1, &l2]).worktree.sync.link, strings(&["b"]));
	}

	#[test]
	fn test_unmatched_exclude_warns_without_failing() {
		let l1 = sync_layer(SyncLayer {
			link: Some(strings(&["a"])),
			..Default::default()
		});
		let l2 = RawLayer::default();
		let l3 = sync_layer(SyncLayer {
			exclude_link: Some(strings(&["a", "missing"])),
			..Default::default()
		});

		let (config, warnings) = merge_with_warnings([&l1, &l2, &l3]);
		assert!(config.worktree.sync.link.is_empty());
		assert_eq!(
			warnings,
			vec![MergeWarning {
				key: "worktree.sync.link",
				excluded_item: "missing".to_string(),
				layer_index: 2,
			}]
		);
	}

	#[test]
	fn test_scalars_last_write_wins_per_leaf() {
		let l1 = RawLayer {
			worktree: Some(WorktreeLayer {
				default_location: Some(LocationStrategy::Local),
				delete_branch: Some(false),
				paths: Some(PathsLayer {
					sibling: Some("../a-{branch}".to_string()),
					pr: Some("../pr-{number}".to_string()),
					..Default::default()
				}),
				..Default::default()
			}),
		};
		let l2 = RawLayer {
			worktree: Some(WorktreeLayer {
				delete_branch: Some(true),
				paths: Some(PathsLayer {
					sibling: Some("../b-{branch}".to_string()),
					..Default::default()
				}),
				..Default::default()
			}),
		};

		let worktree = merge([&l1, &l2]).worktree;
		assert_eq!(worktree.default_location, LocationStrategy::Local);
		assert!(worktree.delete_branch);
		assert!(!worktree.protected);
		assert_eq!(worktree.paths.sibling, "../b-{branch}");
		assert_eq!(worktree.paths.local, ".worktrees/{branch}");
		assert_eq!(worktree.paths.pr, "../pr-{number}");
	}

	fn arb_items() -> impl Strategy<Value = Vec<String>> {
		prop::collection::vec("[a-d]", 0..5)
	}

	type Patch = (Option<Vec<String>>, Option<Vec<String>>, Option<Vec<String>>);

	fn arb_patch() -> impl Strategy<Value = Patch> {
		prop_oneof![
			Just::<Patch>((None, None, None)),
			arb_items().prop_map(|base| (Some(base), None, None)),
			(
				prop::option::of(arb_items()),
				prop::option::of(arb_items())
			)
				.prop_map(|(extend, exclude)| (None, extend, exclude)),
		]
	}

	fn arb_layer() -> impl Strategy<Value = RawLayer> {
		(
			prop::option::of(prop_oneof![
				Just(LocationStrategy::Local),
				Just(LocationStrategy::Sibling)
			]),
			prop::option::of(any::<bool>()),
			prop::option::of("[a-z{}/.-]{0,12}"),
			arb_patch(),
			arb_patch(),
		)
			.prop_map(|(location, protected, local, link, post_add)| RawLayer {
				worktree: Some(WorktreeLayer {
					default_location: location,
					protected,
					paths: local.map(|local| PathsLayer {
						local: Some(local),
						..Default::default()
					}),
					sync: Some(SyncLayer {
						link: link.0,
						extend_link: link.1,
						exclude_link: link.2,
						..Default::default()
					}),
					hooks: Some(HooksLayer {
						post_add: post_add.0,
						extend_post_add: post_add.1,
						exclude_post_add: post_add.2,
						..Default::default()
					}),
					..Default::default()
				}),
			})
	}

	proptest! {
		#[test]
		fn absent_layers_are_no_ops(layer in arb_layer()) {
			let empty = RawLayer::default();
			let alone = merge([&layer]);
			prop_assert_eq!(&merge([&empty, &layer]), &alone);
			prop_assert_eq!(&merge([&layer, &empty]), &alone);
		}

		#[test]
		fn merging_without_modifiers_is_idempotent(layer in arb_layer()) {
			let mut layer = layer;
			if let Some(worktree) = layer.worktree.as_mut() {
				if let Some(sync) = worktree.sync.as_mut() {
					sync.extend_link = None;
				}
				if let Some(hooks) = worktree.hooks.as_mut() {
					hooks.extend_post_add = None;
				}
			}
			prop_assert_eq!(merge([&layer, &layer]), merge([&layer]));
		}

		#[test]
		fn excluded_items_never_survive(layers in prop::collection::vec(arb_layer(), 1..4)) {
			let config = merge(&layers);
			let last_exclude = layers
				.last()
				.and_then(|l| l.worktree.as_ref())
				.and_then(|w| w.sync.as_ref())
				.and_then(|s| s.exclude_link.clone())
				.unwrap_or_default();
			for item in last_exclude {
				prop_assert!(!config.worktree.sync.link.contains(&item));
			}
		}
	}
}
