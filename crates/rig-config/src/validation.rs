// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema validation rules for a decoded TOML table.
//!
//! Validation is fail-fast: the first violation found is returned and the
//! file contributes nothing to the merge.

use std::path::Path;

use toml::{Table, Value};

use crate::types::LocationStrategy;
use crate::ConfigError;

/// Maximum edit distance for a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Expected shape of a value in the file.
#[derive(Debug, Clone, Copy)]
enum FieldKind {
	Table(&'static TableSchema),
	String,
	Bool,
	StringList,
	Location,
}

#[derive(Debug)]
struct Field {
	key: &'static str,
	kind: FieldKind,
}

/// A base list and its modifiers, which may not share a file.
#[derive(Debug)]
struct ListKeys {
	base: &'static str,
	extend: &'static str,
	exclude: &'static str,
}

#[derive(Debug)]
struct TableSchema {
	fields: &'static [Field],
	lists: &'static [ListKeys],
}

const fn field(key: &'static str, kind: FieldKind) -> Field {
	Field { key, kind }
}

const fn list_keys(base: &'static str, extend: &'static str, exclude: &'static str) -> ListKeys {
	ListKeys {
		base,
		extend,
		exclude,
	}
}

static PATHS: TableSchema = TableSchema {
	fields: &[
		field("sibling", FieldKind::String),
		field("local", FieldKind::String),
		field("pr", FieldKind::String),
	],
	lists: &[],
};

static SYNC: TableSchema = TableSchema {
	fields: &[
		field("link", FieldKind::StringList),
		field("copy", FieldKind::StringList),
		field("extend-link", FieldKind::StringList),
		field("extend-copy", FieldKind::StringList),
		field("exclude-link", FieldKind::StringList),
		field("exclude-copy", FieldKind::StringList),
	],
	lists: &[
		list_keys("link", "extend-link", "exclude-link"),
		list_keys("copy", "extend-copy", "exclude-copy"),
	],
};

static HOOKS: TableSchema = TableSchema {
	fields: &[
		field("post-add", FieldKind::StringList),
		field("pre-remove", FieldKind::StringList),
		field("extend-post-add", FieldKind::StringList),
		field("extend-pre-remove", FieldKind::StringList),
		field("exclude-post-add", FieldKind::StringList),
		field("exclude-pre-remove", FieldKind::StringList),
	],
	lists: &[
		list_keys("post-add", "extend-post-add", "exclude-post-add"),
		list_keys("pre-remove", "extend-pre-remove", "exclude-pre-remove"),
	],
};

static WORKTREE: TableSchema = TableSchema {
	fields: &[
		field("default-location", FieldKind::Location),
		field("delete-branch", FieldKind::Bool),
		field("protected", FieldKind::Bool),
		field("paths", FieldKind::Table(&PATHS)),
		field("sync", FieldKind::Table(&SYNC)),
		field("hooks", FieldKind::Table(&HOOKS)),
	],
	lists: &[],
};

static ROOT: TableSchema = TableSchema {
	fields: &[field("worktree", FieldKind::Table(&WORKTREE))],
	lists: &[],
};

impl TableSchema {
	fn get(&self, key: &str) -> Option<&Field> {
		self.fields.iter().find(|f| f.key == key)
	}

	fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.fields.iter().map(|f| f.key)
	}
}

/// Validate a decoded file against the schema.
///
/// Checks, depth-first: unknown keys (with suggestions), value types,
/// enumerated domains, then base/modifier exclusivity per table.
pub fn validate_table(table: &Table, path: &Path) -> Result<(), ConfigError> {
	validate_level(table, &ROOT, "", path)
}

fn validate_level(
	table: &Table,
	schema: &TableSchema,
	prefix: &str,
	path: &Path,
) -> Result<(), ConfigError> {
	for (key, value) in table {
		let full_key = join_key(prefix, key);

		let Some(field) = schema.get(key) else {
			let suggestion = suggest_key(key, schema.keys()).map(str::to_string);
			let mut detail = format!("unknown key '{key}'");
			if let Some(s) = &suggestion {
				detail.push_str(&format!(" (did you mean '{s}'?)"));
			}
			return Err(ConfigError::Validation {
				path: path.to_path_buf(),
				key: full_key,
				detail,
				suggestion,
			});
		};

		validate_value(value, field.kind, &full_key, path)?;
	}

	for list in schema.lists {
		let base_present = table.contains_key(list.base);
		for modifier in [list.extend, list.exclude] {
			if base_present && table.contains_key(modifier) {
				return Err(ConfigError::validation(
					path,
					prefix,
					format!(
						"cannot specify both '{}' and '{modifier}' in the same file",
						list.base
					),
				));
			}
		}
	}

	Ok(())
}

fn validate_value(
	value: &Value,
	kind: FieldKind,
	full_key: &str,
	path: &Path,
) -> Result<(), ConfigError> {
	match (kind, value) {
		(FieldKind::Table(schema), Value::Table(nested)) => {
			validate_level(nested, schema, full_key, path)
		}
		(FieldKind::String, Value::String(_)) | (FieldKind::Bool, Value::Boolean(_)) => Ok(()),
		(FieldKind::Location, Value::String(s)) => match s.parse::<LocationStrategy>() {
			Ok(_) => Ok(()),
			Err(e) => Err(ConfigError::validation(path, full_key, e.to_string())),
		},
		(FieldKind::StringList, Value::Array(items)) => {
			for (i, item) in items.iter().enumerate() {
				if !item.is_str() {
					return Err(ConfigError::validation(
						path,
						full_key,
						format!("array item {i} must be a string, got {}", item.type_str()),
					));
				}
			}
			Ok(())
		}
		(kind, value) => Err(ConfigError::validation(
			path,
			full_key,
			format!("expected {}, got {}", kind_name(kind), value.type_str()),
		)),
	}
}

fn kind_name(kind: FieldKind) -> &'static str {
	match kind {
		FieldKind::Table(_) => "table",
		FieldKind::String | FieldKind::Location => "string",
		FieldKind::Bool => "boolean",
		FieldKind::StringList => "array",
	}
}

fn join_key(prefix: &str, key: &str) -> String {
	if prefix.is_empty() {
		key.to_string()
	} else {
		format!("{prefix}.{key}")
	}
}

/// Closest known key within the suggestion threshold, ties broken alphabetically.
pub fn suggest_key<'a>(unknown: &str, known: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
	let unknown = unknown.to_lowercase();
	known
		.into_iter()
		.map(|candidate| (edit_distance(&unknown, &candidate.to_lowercase()), candidate))
		.filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
		.min()
		.map(|(_, candidate)| candidate)
}

/// Edit distance counting insertions, deletions, substitutions and
/// adjacent transpositions (optimal string alignment).
pub fn edit_distance(a: &str, b: &str) -> usize {
	let a: Vec<char> = a.chars().collect();
	let b: Vec<char> = b.chars().collect();
	let mut d = vec![vec![0usize; b.len() + 1]; a.len() + 1];

	for (i, row) in d.iter_mut().enumerate() {
		row[0] = i;
	}
	for (j, cell) in d[0].iter_mut().enumerate() {
		*cell = j;
	}

	for i in 1..=a.len() {
		for j in 1..=b.len() {
			let cost = usize::from(a[i - 1] != b[j - 1]);
			let mut best = (d[i - 1][j] + 1)
				.min(d[i][j - 1] + 1)
				.min(d[i - 1][j - 1] + cost);
			if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
				best = best.min(d[i - 2][j - 2] + 1);
			}
			d[i][j] = best;
		}
	}

	d[a.len()][b.len()]
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn check(source: &str) -> Result<(), ConfigError> {
		let table: Table = source.parse().unwrap();
		validate_table(&table, Path::new("/p/.rig.toml"))
	}

	fn expect_validation(source: &str) -> (String, String, Option<String>) {
		match check(source) {
			Err(ConfigError::Validation {
				key,
				detail,
				suggestion,
				..
			}) => (key, detail, suggestion),
			other => panic!("expected validation error, got {other:?}"),
		}
	}

	#[test]
	fn test_accepts_full_schema() {
		let source = r#"
			[worktree]
			default-location = "local"
			delete-branch = false
			protected = true

			[worktree.paths]
			sibling = "../{repo}-{branch}"
			local = ".wt/{branch}"
			pr = "../pr-{number}"

			[worktree.sync]
			extend-link = [".envrc"]
			exclude-link = ["CLAUDE.md"]
			copy = ["node_modules"]

			[worktree.hooks]
			post-add = ["npm install"]
			extend-pre-remove = ["make clean"]
		"#;
		assert!(check(source).is_ok());
	}

	#[test]
	fn test_unknown_key_suggests_nearest() {
		let (key, detail, suggestion) = expect_validation("[worktree]\ndefualt-location = \"local\"\n");
		assert_eq!(key, "worktree.defualt-location");
		assert_eq!(suggestion.as_deref(), Some("default-location"));
		assert!(detail.contains("did you mean 'default-location'?"));
	}

	#[test]
	fn test_unknown_top_level_key() {
		let (key, detail, suggestion) = expect_validation("[bogus]\nx = 1\n");
		assert_eq!(key, "bogus");
		assert_eq!(detail, "unknown key 'bogus'");
		assert!(suggestion.is_none());
	}

	#[test]
	fn test_snake_case_key_suggests_kebab_case() {
		let (_, _, suggestion) = expect_validation("[worktree]\ndelete_branch = true\n");
		assert_eq!(suggestion.as_deref(), Some("delete-branch"));
	}

	#[test]
	fn test_unknown_nested_key() {
		let (key, _, suggestion) = expect_validation("[worktree.sync]\nlnk = []\n");
		assert_eq!(key, "worktree.sync.lnk");
		assert_eq!(suggestion.as_deref(), Some("link"));
	}

	#[test]
	fn test_type_mismatch_reports_types() {
		let (key, detail, _) = expect_validation("[worktree]\nprotected = \"yes\"\n");
		assert_eq!(key, "worktree.protected");
		assert_eq!(detail, "expected boolean, got string");

		let (_, detail, _) = expect_validation("[worktree.paths]\nlocal = 3\n");
		assert_eq!(detail, "expected string, got integer");

		let (_, detail, _) = expect_validation("[worktree.sync]\nlink = \".env\"\n");
		assert_eq!(detail, "expected array, got string");

		let (key, detail, _) = expect_validation("worktree = 1\n");
		assert_eq!(key, "worktree");
		assert_eq!(detail, "expected table, got integer");
	}

	#[test]
	fn test_array_items_must_be_strings() {
		let (key, detail, _) = expect_validation("[worktree.hooks]\npost-add = [\"ok\", 2]\n");
		assert_eq!(key, "worktree.hooks.post-add");
		assert_eq!(detail, "array item 1 must be a string, got integer");
	}

	#[test]
	fn test_location_outside_domain_lists_values() {
		let (key, detail, _) = expect_validation("[worktree]\ndefault-location = \"invalid\"\n");
		assert_eq!(key, "worktree.default-location");
		assert_eq!(
			detail,
			"invalid value 'invalid' (must be one of: local, sibling)"
		);
	}

	#[test]
	fn test_base_and_extend_are_exclusive() {
		let (key, detail, _) =
			expect_validation("[worktree.sync]\nlink = [\"a\"]\nextend-link = [\"b\"]\n");
		assert_eq!(key, "worktree.sync");
		assert_eq!(
			detail,
			"cannot specify both 'link' and 'extend-link' in the same file"
		);
	}

	#[test]
	fn test_base_and_exclude_are_exclusive() {
		let (key, detail, _) =
			expect_validation("[worktree.hooks]\npre-remove = []\nexclude-pre-remove = [\"x\"]\n");
		assert_eq!(key, "worktree.hooks");
		assert!(detail.contains("'pre-remove' and 'exclude-pre-remove'"));
	}

	#[test]
	fn test_extend_and_exclude_may_coexist() {
		assert!(check("[worktree.sync]\nextend-copy = [\"a\"]\nexclude-copy = [\"b\"]\n").is_ok());
	}

	#[test]
	fn test_suggest_key_rejects_distant_keys() {
		assert_eq!(suggest_key("zzzzzz", ["link", "copy"]), None);
		assert_eq!(suggest_key("anything", std::iter::empty()), None);
	}

	#[test]
	fn test_suggest_key_prefers_smallest_distance() {
		assert_eq!(suggest_key("loca", ["local", "pr", "sibling"]), Some("local"));
		assert_eq!(suggest_key("PR", ["local", "pr"]), Some("pr"));
	}

	#[test]
	fn test_edit_distance_known_values() {
		assert_eq!(edit_distance("", ""), 0);
		assert_eq!(edit_distance("kitten", "sitting"), 3);
		assert_eq!(edit_distance("defualt-location", "default-location"), 1);
		assert_eq!(edit_distance("link", ""), 4);
		assert_eq!(edit_distance("ab", "ba"), 1);
	}

	proptest! {
		/// A known key is always its own suggestion.
		#[test]
		fn exact_key_suggests_itself(idx in 0usize..6) {
			let key = SYNC.fields[idx].key;
			prop_assert_eq!(suggest_key(key, SYNC.keys()), Some(key));
		}

		/// Distance is symmetric and bounded by the longer input.
		#[test]
		fn edit_distance_symmetric_and_bounded(a in "[a-z-]{0,12}", b in "[a-z-]{0,12}") {
			let d = edit_distance(&a, &b);
			prop_assert_eq!(d, edit_distance(&b, &a));
			prop_assert!(d <= a.len().max(b.len()));
		}

		/// Dropping one character from a key is always caught by the suggester.
		#[test]
		fn single_deletion_is_suggested(idx in 0usize..6, pos in 0usize..8) {
			let key = HOOKS.fields[idx].key;
			let pos = pos % key.len();
			let typo: String = key
				.char_indices()
				.filter(|(i, _)| *i != pos)
				.map(|(_, c)| c)
				.collect();
			prop_assert!(suggest_key(&typo, HOOKS.keys()).is_some());
		}
	}
}
