// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rendering configuration as TOML or JSON.
//!
//! Empty lists, and tables left empty once those are dropped, are omitted so
//! the output only shows what carries information.

use serde::Serialize;
use toml::Value;

use crate::types::OutputFormat;
use crate::ConfigError;

/// Render `config` as TOML with kebab-case keys.
pub fn to_toml<T: Serialize + ?Sized>(config: &T) -> Result<String, ConfigError> {
	let value = pruned_value(config, "toml")?;
	toml::to_string(&value).map_err(|e| serialize_error("toml", e))
}

/// Render `config` as pretty-printed JSON (2-space indent).
pub fn to_json<T: Serialize + ?Sized>(config: &T) -> Result<String, ConfigError> {
	let value = pruned_value(config, "json")?;
	serde_json::to_string_pretty(&value).map_err(|e| serialize_error("json", e))
}

/// Render `config` in the requested format.
pub fn render<T: Serialize + ?Sized>(config: &T, format: OutputFormat) -> Result<String, ConfigError> {
	match format {
		OutputFormat::Toml => to_toml(config),
		OutputFormat::Json => to_json(config),
	}
}

fn pruned_value<T: Serialize + ?Sized>(config: &T, format: &'static str) -> Result<Value, ConfigError> {
	let mut value = Value::try_from(config).map_err(|e| serialize_error(format, e))?;
	prune_empty(&mut value);
	Ok(value)
}

fn prune_empty(value: &mut Value) {
	if let Value::Table(table) = value {
		for (_, child) in table.iter_mut() {
			prune_empty(child);
		}
		table.retain(|_, child| match child {
			Value::Array(items) => !items.is_empty(),
			Value::Table(nested) => !nested.is_empty(),
			_ => true,
		});
	}
}

fn serialize_error(format: &'static str, err: impl std::fmt::Display) -> ConfigError {
	ConfigError::Serialize {
		format,
		detail: err.to_string(),
	}
}
