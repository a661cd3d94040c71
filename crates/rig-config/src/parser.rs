// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Reading one config file into a validated [`RawLayer`].

use std::io::ErrorKind;
use std::path::Path;

use toml::Table;
use tracing::{debug, trace};

use crate::layer::RawLayer;
use crate::validation::validate_table;
use crate::ConfigError;

/// Parse a config file into a validated layer.
///
/// Fails with [`ConfigError::FileAccess`] when the file cannot be read or is
/// not UTF-8, [`ConfigError::Parse`] on TOML syntax errors and
/// [`ConfigError::Validation`] when the content violates the schema.
pub fn parse_config_file(path: &Path) -> Result<RawLayer, ConfigError> {
	debug!(path = %path.display(), "parsing config file");
	let content = read_config_text(path)?;
	parse_config_str(&content, path)
}

/// Parse config text that was read from `path`.
///
/// `path` is only used to label errors.
pub fn parse_config_str(content: &str, path: &Path) -> Result<RawLayer, ConfigError> {
	if content.trim().is_empty() {
		trace!(path = %path.display(), "config file is empty");
		return Ok(RawLayer::default());
	}

	let table: Table = content.parse().map_err(|e: toml::de::Error| {
		let (line, column) = match e.span() {
			Some(span) => {
				let (line, column) = line_column(content, span.start);
				(Some(line), Some(column))
			}
			None => (None, None),
		};
		ConfigError::Parse {
			path: path.to_path_buf(),
			line,
			column,
			detail: e.message().to_string(),
		}
	})?;

	validate_table(&table, path)?;

	// Validation guarantees the shape, so this only renames kebab-case keys
	// onto the layer's fields.
	let layer: RawLayer = toml::Value::Table(table)
		.try_into()
		.map_err(|e: toml::de::Error| ConfigError::validation(path, "root", e.message()))?;

	trace!(path = %path.display(), keys = ?layer.present_keys(), "parsed config layer");
	Ok(layer)
}

fn read_config_text(path: &Path) -> Result<String, ConfigError> {
	let metadata = std::fs::metadata(path).map_err(|e| access_error(path, &e))?;
	if metadata.is_dir() {
		return Err(ConfigError::file_access(path, "is a directory"));
	}

	let bytes = std::fs::read(path).map_err(|e| access_error(path, &e))?;
	String::from_utf8(bytes)
		.map_err(|e| ConfigError::file_access(path, format!("invalid UTF-8: {}", e.utf8_error())))
}

fn access_error(path: &Path, err: &std::io::Error) -> ConfigError {
	let detail = match err.kind() {
		ErrorKind::NotFound => "file not found".to_string(),
		ErrorKind::PermissionDenied => "permission denied".to_string(),
		_ => err.to_string(),
	};
	ConfigError::file_access(path, detail)
}

/// 1-indexed line and column (in characters) of a byte offset.
fn line_column(content: &str, offset: usize) -> (usize, usize) {
	let offset = offset.min(content.len());
	let before = content.get(..offset).unwrap_or(content);
	let line = before.matches('\n').count() + 1;
	let line_start = before.rfind('\n').map_or(0, |i| i + 1);
	let column = before[line_start..].chars().count() + 1;
	(line, column)
}

/// Convert a field name (`post_add`) to a file key (`post-add`).
pub fn field_to_toml_key(key: &str) -> String {
	key.replace('_', "-")
}
