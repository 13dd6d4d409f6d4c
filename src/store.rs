//! File-backed label store.
//!
//! Holds the labels already accepted for block content and answers
//! existence checks against them. Labels are read from JSON exports: an
//! array whose items are either plain strings or objects with an `info`
//! field.

use crate::error::OracleError;
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Field holding the label in exported block content rows.
pub const LABEL_FIELD: &str = "info";

/// Set of existing labels.
#[derive(Debug, Default, Clone)]
pub struct LabelStore {
	labels: BTreeSet<String>,
	/// Where the labels were loaded from, if anywhere
	source: Option<PathBuf>,
}

impl LabelStore {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Load a store from a JSON file, or from every `.json` file under a
	/// directory.
	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			bail!("Label store does not exist: {}", path.display());
		}

		let labels = if path.is_dir() {
			load_dir(path)?
		} else {
			read_labels(path)?
		};

		log::debug!("loaded {} labels from {}", labels.len(), path.display());

		Ok(Self {
			labels,
			source: Some(path.to_path_buf()),
		})
	}

	/// Path the store was loaded from.
	pub fn source(&self) -> Option<&Path> {
		self.source.as_deref()
	}

	pub fn contains(&self, label: &str) -> bool {
		self.labels.contains(label)
	}

	pub fn len(&self) -> usize {
		self.labels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.labels.is_empty()
	}

	/// Add a label. Returns `false` if it was already present.
	pub fn insert(&mut self, label: impl Into<String>) -> bool {
		self.labels.insert(label.into())
	}

	/// Labels in sorted order.
	pub fn labels(&self) -> impl Iterator<Item = &str> {
		self.labels.iter().map(String::as_str)
	}

	/// Existence check usable as the oracle for
	/// [`generate_unique`](crate::unique::generate_unique).
	pub fn exists(&self, label: &str) -> std::result::Result<bool, OracleError> {
		Ok(self.contains(label))
	}

	/// Write the store as a sorted JSON array of strings.
	///
	/// The file is replaced atomically so readers never see a partial write.
	pub fn save(&self, path: &Path) -> Result<()> {
		if path.is_dir() {
			bail!(
				"Cannot save labels into a directory store: {}",
				path.display()
			);
		}

		let labels: Vec<&str> = self.labels().collect();
		let mut content = serde_json::to_string_pretty(&labels)?;
		content.push('\n');

		let dir = match path.parent() {
			Some(dir) if !dir.as_os_str().is_empty() => dir,
			_ => Path::new("."),
		};
		let mut tmp = NamedTempFile::new_in(dir)
			.with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
		tmp.write_all(content.as_bytes())
			.with_context(|| format!("Failed to write {}", tmp.path().display()))?;
		tmp.persist(path)
			.with_context(|| format!("Failed to write {}", path.display()))?;
		Ok(())
	}

	/// Record `label` in the store file at `path`.
	///
	/// The file is reloaded first so labels written by others since it was
	/// last read are kept. Fails if `label` is already present. With
	/// `dry_run` every check runs but nothing is written.
	pub fn record(path: &Path, label: &str, dry_run: bool) -> Result<Self> {
		if path.is_dir() {
			bail!(
				"Cannot record labels into a directory store: {}",
				path.display()
			);
		}

		let mut store = Self::load(path)?;
		if !store.insert(label) {
			// Another writer took the label after it was checked
			bail!("Label {:?} already exists in {}", label, path.display());
		}

		if !dry_run {
			store.save(path)?;
			log::debug!("recorded {:?} in {}", label, path.display());
		}
		Ok(store)
	}
}

impl<S: Into<String>> FromIterator<S> for LabelStore {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self {
			labels: iter.into_iter().map(Into::into).collect(),
			source: None,
		}
	}
}

/// Read every `.json` file under `dir` in parallel and merge the labels.
fn load_dir(dir: &Path) -> Result<BTreeSet<String>> {
	// Collect paths first (sequential - fast)
	let mut paths: Vec<PathBuf> = WalkDir::new(dir)
		.into_iter()
		.filter_map(|e| e.ok())
		.filter(|e| e.file_type().is_file())
		.map(|e| e.into_path())
		.filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
		.collect();
	paths.sort();

	log::debug!("reading {} label files from {}", paths.len(), dir.display());

	let results: Vec<Result<BTreeSet<String>>> = paths.par_iter().map(|p| read_labels(p)).collect();

	let mut labels = BTreeSet::new();
	for result in results {
		labels.extend(result?);
	}
	Ok(labels)
}

fn read_labels(path: &Path) -> Result<BTreeSet<String>> {
	let content = fs::read_to_string(path)
		.with_context(|| format!("Failed to read {}", path.display()))?;
	parse_labels(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse a JSON export into a set of labels.
pub fn parse_labels(content: &str) -> Result<BTreeSet<String>> {
	let json: Value = serde_json::from_str(content)?;
	let Some(items) = json.as_array() else {
		bail!("expected a JSON array of labels");
	};

	let labels = items
		.iter()
		.filter_map(|item| match item {
			Value::String(s) => Some(s.clone()),
			Value::Object(row) => row
				.get(LABEL_FIELD)
				.and_then(|v| v.as_str())
				.map(str::to_string),
			_ => None,
		})
		.collect();
	Ok(labels)
}
