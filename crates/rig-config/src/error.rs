// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a configuration file.
///
/// Every failure carries the path of the offending file so callers can
/// build both a terminal message and machine-readable output from it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	/// File exists but could not be read or decoded
	#[error("Cannot access {}: {detail}", path.display())]
	FileAccess { path: PathBuf, detail: String },

	/// File content is not well-formed TOML
	#[error("Failed to parse {}{}: {detail}", path.display(), Location(*line, *column))]
	Parse {
		path: PathBuf,
		line: Option<usize>,
		column: Option<usize>,
		detail: String,
	},

	/// File is well-formed but violates the schema
	#[error("Invalid config at {}: [{key}] {detail}", path.display())]
	Validation {
		path: PathBuf,
		key: String,
		detail: String,
		suggestion: Option<String>,
	},

	/// Effective configuration could not be rendered
	#[error("Failed to render configuration as {format}: {detail}")]
	Serialize { format: &'static str, detail: String },
}

impl ConfigError {
	/// Create a file access error
	pub fn file_access(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
		Self::FileAccess {
			path: path.into(),
			detail: detail.into(),
		}
	}

	/// Create a validation error without a suggestion
	pub fn validation(
		path: impl Into<PathBuf>,
		key: impl Into<String>,
		detail: impl Into<String>,
	) -> Self {
		Self::Validation {
			path: path.into(),
			key: key.into(),
			detail: detail.into(),
			suggestion: None,
		}
	}

	/// Path of the file that caused the error, if any.
	pub fn path(&self) -> Option<&Path> {
		match self {
			Self::FileAccess { path, .. }
			| Self::Parse { path, .. }
			| Self::Validation { path, .. } => Some(path),
			Self::Serialize { .. } => None,
		}
	}

	/// Dotted key path for validation errors.
	pub fn key(&self) -> Option<&str> {
		match self {
			Self::Validation { key, .. } => Some(key),
			_ => None,
		}
	}

	/// "Did you mean" suggestion for unknown-key errors.
	pub fn suggestion(&self) -> Option<&str> {
		match self {
			Self::Validation { suggestion, .. } => suggestion.as_deref(),
			_ => None,
		}
	}
}

/// Renders `:line:column`, `:line`, or nothing.
struct Location(Option<usize>, Option<usize>);

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match (self.0, self.1) {
			(Some(line), Some(column)) => write!(f, ":{line}:{column}"),
			(Some(line), None) => write!(f, ":{line}"),
			_ => Ok(()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_error_includes_line_and_column() {
		let err = ConfigError::Parse {
			path: PathBuf::from("/p/.rig.toml"),
			line: Some(3),
			column: Some(7),
			detail: "expected `=`".to_string(),
		};
		assert_eq!(
			err.to_string(),
			"Failed to parse /p/.rig.toml:3:7: expected `=`"
		);
	}

	#[test]
	fn test_parse_error_without_location() {
		let err = ConfigError::Parse {
			path: PathBuf::from("/p/.rig.toml"),
			line: None,
			column: None,
			detail: "bad".to_string(),
		};
		assert_eq!(err.to_string(), "Failed to parse /p/.rig.toml: bad");
	}

	#[test]
	fn test_validation_error_exposes_key() {
		let err = ConfigError::validation("/p/.rig.toml", "worktree.protected", "expected boolean, got string");
		assert_eq!(err.key(), Some("worktree.protected"));
		assert_eq!(err.path(), Some(Path::new("/p/.rig.toml")));
		assert!(err.to_string().contains("[worktree.protected]"));
		assert_eq!(err.suggestion(), None);
	}

	#[test]
	fn test_file_access_error_message() {
		let err = ConfigError::file_access("/p/.rig.toml", "permission denied");
		assert_eq!(err.to_string(), "Cannot access /p/.rig.toml: permission denied");
		assert_eq!(err.key(), None);
	}
}
