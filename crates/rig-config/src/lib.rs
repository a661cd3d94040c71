// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for rig.
//!
//! This crate provides:
//! - Discovery of global, ancestor, project and local config files
//! - TOML parsing with positioned errors and "did you mean" suggestions
//! - Precedence merging with list extend/exclude modifiers
//! - Provenance tracking, key lookup and TOML/JSON output

pub mod discovery;
pub mod error;
pub mod layer;
pub mod merge;
pub mod output;
pub mod parser;
pub mod paths;
pub mod query;
pub mod resolver;
pub mod runtime;
pub mod types;
pub mod validation;

use std::path::Path;

pub use discovery::{discover_config_files, find_ancestor_configs, DiscoveredFile};
pub use error::ConfigError;
pub use layer::RawLayer;
pub use merge::{merge, merge_with_warnings, MergeWarning};
pub use output::{render, to_json, to_toml};
pub use parser::parse_config_file;
pub use paths::ConfigPaths;
pub use query::{filter_layers, get_value_by_key, get_value_provenance};
pub use resolver::{resolve_config, ResolvedConfig, ResolvedMergeWarning};
pub use runtime::EffectiveConfig;
pub use types::{ConfigLayer, LayerSpec, LocationStrategy, OutputFormat};

/// Resolve the configuration for `project_root` using the current user's
/// home directory.
pub fn load_config(project_root: &Path) -> Result<ResolvedConfig, ConfigError> {
	resolve_config(project_root, None)
}
