// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end resolution: discovery, parsing and merging with provenance.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::discovery::{discover_config_files, DiscoveredFile};
use crate::merge::merge_with_warnings;
use crate::parser::parse_config_file;
use crate::runtime::EffectiveConfig;
use crate::types::{ConfigLayer, LayerSpec};
use crate::ConfigError;

/// A merge warning attributed to the file that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMergeWarning {
	pub key: &'static str,
	pub excluded_item: String,
	/// Index into [`ResolvedConfig::layers`].
	pub file_index: usize,
}

/// The effective configuration together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
	pub config: EffectiveConfig,
	/// Every candidate in precedence order; existing files carry their content.
	pub layers: Vec<DiscoveredFile>,
	/// Dotted kebab-case key to the index in `layers` of the last file that
	/// set it. Keys left at their default are absent.
	pub provenance: BTreeMap<String, usize>,
	pub warnings: Vec<ResolvedMergeWarning>,
}

impl ResolvedConfig {
	/// The file that last set `key`, if any.
	///
	/// `key` must be in dotted kebab-case form, e.g. `worktree.sync.link`.
	pub fn source_of(&self, key: &str) -> Option<&DiscoveredFile> {
		self.provenance.get(key).and_then(|&index| self.layers.get(index))
	}

	/// The file that triggered `warning`.
	pub fn warning_source(&self, warning: &ResolvedMergeWarning) -> Option<&DiscoveredFile> {
		self.layers.get(warning.file_index)
	}

	/// Look up one discovered file.
	///
	/// `ancestor` alone picks the nearest ancestor. `ancestor:<path>` matches
	/// either the ancestor file itself or its directory.
	pub fn find_layer(&self, spec: &LayerSpec) -> Option<&DiscoveredFile> {
		match spec {
			LayerSpec::Layer(ConfigLayer::Ancestor) => self
				.layers
				.iter()
				.rev()
				.find(|f| f.layer == ConfigLayer::Ancestor),
			LayerSpec::Layer(layer) => self.layers.iter().find(|f| f.layer == *layer),
			LayerSpec::AncestorPath(path) => self.layers.iter().find(|f| {
				f.layer == ConfigLayer::Ancestor
					&& (f.path == *path || f.path.parent() == Some(path.as_path()))
			}),
		}
	}
}

/// Discover, parse and merge every config file for `project_root`.
///
/// Stops at the first file that fails to read, parse or validate. Missing
/// files are skipped.
pub fn resolve_config(
	project_root: &Path,
	home_dir: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError> {
	let discovered = discover_config_files(project_root, home_dir);

	let mut layers = Vec::with_capacity(discovered.len());
	for file in discovered {
		if file.exists {
			let content = parse_config_file(&file.path)?;
			layers.push(file.with_content(content));
		} else {
			layers.push(file);
		}
	}

	// Merge indices are positions among loaded files; map them back to `layers`.
	let loaded: Vec<usize> = layers
		.iter()
		.enumerate()
		.filter(|(_, f)| f.content.is_some())
		.map(|(index, _)| index)
		.collect();

	let (config, merge_warnings) =
		merge_with_warnings(layers.iter().filter_map(|f| f.content.as_ref()));

	let warnings: Vec<ResolvedMergeWarning> = merge_warnings
		.into_iter()
		.map(|w| ResolvedMergeWarning {
			key: w.key,
			excluded_item: w.excluded_item,
			file_index: loaded[w.layer_index],
		})
		.collect();

	for warning in &warnings {
		debug!(
			key = warning.key,
			item = %warning.excluded_item,
			path = %layers[warning.file_index].path.display(),
			"exclude entry matched nothing"
		);
	}

	let provenance = build_provenance(&layers);

	info!(
		project_root = %project_root.display(),
		candidates = layers.len(),
		loaded = loaded.len(),
		warnings = warnings.len(),
		"resolved configuration"
	);

	Ok(ResolvedConfig {
		config,
		layers,
		provenance,
		warnings,
	})
}

fn build_provenance(layers: &[DiscoveredFile]) -> BTreeMap<String, usize> {
	let mut provenance = BTreeMap::new();
	for (index, file) in layers.iter().enumerate() {
		let Some(content) = &file.content else {
			continue;
		};
		for key in content.present_keys() {
			provenance.insert(key.to_string(), index);
		}
	}
	provenance
}
