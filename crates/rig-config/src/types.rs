// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Small closed domains shared across the configuration system.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Precedence tier of a configuration file (lower = overridden by higher).
///
/// The derived ordering is the merge order:
/// `Global < Ancestor < Project < Local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLayer {
	/// `~/.local/rig/config.toml`
	Global,
	/// `.rig.toml` in a directory between the project and home
	Ancestor,
	/// `<project>/.rig.toml`
	Project,
	/// `<project>/.rig.local.toml`
	Local,
}

impl ConfigLayer {
	pub const ALL: [ConfigLayer; 4] = [
		ConfigLayer::Global,
		ConfigLayer::Ancestor,
		ConfigLayer::Project,
		ConfigLayer::Local,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			ConfigLayer::Global => "global",
			ConfigLayer::Ancestor => "ancestor",
			ConfigLayer::Project => "project",
			ConfigLayer::Local => "local",
		}
	}
}

impl fmt::Display for ConfigLayer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Worktree placement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStrategy {
	/// Alongside the main repository
	#[default]
	Sibling,
	/// Inside the repository in a hidden directory
	Local,
}

impl LocationStrategy {
	/// Permitted textual values, sorted.
	pub const VALUES: &'static [&'static str] = &["local", "sibling"];

	pub fn as_str(&self) -> &'static str {
		match self {
			LocationStrategy::Sibling => "sibling",
			LocationStrategy::Local => "local",
		}
	}
}

impl fmt::Display for LocationStrategy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LocationStrategy {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"sibling" => Ok(LocationStrategy::Sibling),
			"local" => Ok(LocationStrategy::Local),
			other => Err(UnknownVariant::new(other, Self::VALUES)),
		}
	}
}

/// Output format for rendering an effective configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
	#[default]
	Toml,
	Json,
}

impl OutputFormat {
	pub const VALUES: &'static [&'static str] = &["json", "toml"];

	pub fn as_str(&self) -> &'static str {
		match self {
			OutputFormat::Toml => "toml",
			OutputFormat::Json => "json",
		}
	}
}

impl FromStr for OutputFormat {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"toml" => Ok(OutputFormat::Toml),
			"json" => Ok(OutputFormat::Json),
			_ => Err(UnknownVariant::new(s, Self::VALUES)),
		}
	}
}

/// Selects one discovered file, e.g. `project` or `ancestor:/src/.rig.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSpec {
	Layer(ConfigLayer),
	/// A specific ancestor file by path
	AncestorPath(PathBuf),
}

impl FromStr for LayerSpec {
	type Err = UnknownVariant;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if let Some(path) = s.strip_prefix("ancestor:") {
			if !path.is_empty() {
				return Ok(LayerSpec::AncestorPath(PathBuf::from(path)));
			}
		}
		match s {
			"global" => Ok(LayerSpec::Layer(ConfigLayer::Global)),
			"ancestor" => Ok(LayerSpec::Layer(ConfigLayer::Ancestor)),
			"project" => Ok(LayerSpec::Layer(ConfigLayer::Project)),
			"local" => Ok(LayerSpec::Layer(ConfigLayer::Local)),
			_ => Err(UnknownVariant::new(
				s,
				&["ancestor", "ancestor:<path>", "global", "local", "project"],
			)),
		}
	}
}

impl From<ConfigLayer> for LayerSpec {
	fn from(layer: ConfigLayer) -> Self {
		LayerSpec::Layer(layer)
	}
}

/// A string that is not one of a closed set of values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid value '{value}' (must be one of: {})", allowed.join(", "))]
pub struct UnknownVariant {
	pub value: String,
	pub allowed: &'static [&'static str],
}

impl UnknownVariant {
	fn new(value: &str, allowed: &'static [&'static str]) -> Self {
		Self {
			value: value.to_string(),
			allowed,
		}
	}
}
