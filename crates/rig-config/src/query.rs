// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reading values and their sources out of a resolved configuration.

use toml::Value;

use crate::discovery::DiscoveredFile;
use crate::parser::field_to_toml_key;
use crate::resolver::ResolvedConfig;
use crate::runtime::EffectiveConfig;
use crate::types::ConfigLayer;

/// Look up a value by dotted key, e.g. `worktree.paths.local`.
///
/// Segments may be kebab-case or snake_case. An empty key (or one made only
/// of dots) returns the whole configuration; a key with an empty segment or
/// one that names nothing returns `None`.
pub fn get_value_by_key(config: &EffectiveConfig, key: &str) -> Option<Value> {
	let segments = normalize_key(key)?;
	let mut current = Value::try_from(config).ok()?;

	for segment in &segments {
		current = match current {
			Value::Table(mut table) => table.remove(segment)?,
			_ => return None,
		};
	}

	Some(current)
}

/// A value together with the file that last set it.
///
/// The file is `None` when the value comes from the built-in defaults, or
/// when `key` names a table rather than a single setting.
pub fn get_value_provenance<'a>(
	resolved: &'a ResolvedConfig,
	key: &str,
) -> (Option<Value>, Option<&'a DiscoveredFile>) {
	let value = get_value_by_key(&resolved.config, key);
	let source = normalize_key(key)
		.filter(|segments| !segments.is_empty())
		.and_then(|segments| resolved.source_of(&segments.join(".")));
	(value, source)
}

/// Discovered files in precedence order, optionally restricted to some tiers.
///
/// Files that do not exist are skipped unless `include_missing` is set.
pub fn filter_layers<'a>(
	resolved: &'a ResolvedConfig,
	layers: Option<&[ConfigLayer]>,
	include_missing: bool,
) -> Vec<&'a DiscoveredFile> {
	resolved
		.layers
		.iter()
		.filter(|f| layers.map_or(true, |wanted| wanted.contains(&f.layer)))
		.filter(|f| include_missing || f.exists)
		.collect()
}

/// Split a dotted key into kebab-case segments.
///
/// Returns `Some(vec![])` for the root and `None` for malformed keys.
fn normalize_key(key: &str) -> Option<Vec<String>> {
	let trimmed = key.trim_matches('.');
	if trimmed.is_empty() {
		return Some(Vec::new());
	}

	trimmed
		.split('.')
		.map(|segment| {
			if segment.is_empty() {
				None
			} else {
				Some(field_to_toml_key(segment))
			}
		})
		.collect()
}
