//! Settings detection and validation.
//!
//! Finds `block-label.json`, or a `composer.json`/`package.json` carrying a
//! `blockLabel` object, and reads the label generation settings from it.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the dedicated settings file.
pub const SETTINGS_FILE: &str = "block-label.json";

/// Key under which manifests embed the settings.
pub const MANIFEST_KEY: &str = "blockLabel";

const MANIFESTS: [&str; 2] = ["composer.json", "package.json"];

/// Result of finding and parsing the settings
#[derive(Debug, Clone)]
pub struct Settings {
	/// Whether block labels should be generated from the title
	pub generate_custom_block_title: Option<bool>,
	/// Upper bound on existence checks per label
	pub max_attempts: Option<usize>,
	/// Label store path, resolved against the settings directory
	pub label_store: Option<PathBuf>,
	/// Path to the settings file that was found
	pub config_path: PathBuf,
}

impl Settings {
	fn from_json(json: &Value, dir: &Path, config_path: PathBuf) -> Self {
		Self {
			generate_custom_block_title: json
				.get("generateCustomBlockTitle")
				.and_then(|v| v.as_bool()),
			max_attempts: json
				.get("maxAttempts")
				.and_then(|v| v.as_u64())
				.and_then(|n| usize::try_from(n).ok()),
			label_store: json
				.get("labelStore")
				.and_then(|v| v.as_str())
				.map(|s| dir.join(s)),
			config_path,
		}
	}
}

/// Find settings by searching upward from a starting directory.
///
/// Searches for:
/// 1. `block-label.json` in the directory or any parent
/// 2. `composer.json` or `package.json` with a `"blockLabel"` key in the
///    directory or any parent
///
/// Returns `None` if no settings are found.
pub fn find_settings(start_dir: &Path) -> Option<Settings> {
	for dir in start_dir.ancestors() {
		let settings_path = dir.join(SETTINGS_FILE);
		if let Some(json) = read_json(&settings_path) {
			return Some(Settings::from_json(&json, dir, settings_path));
		}

		for manifest in MANIFESTS {
			let manifest_path = dir.join(manifest);
			if let Some(json) = read_json(&manifest_path) {
				if let Some(section) = json.get(MANIFEST_KEY) {
					return Some(Settings::from_json(section, dir, manifest_path));
				}
			}
		}
	}

	None
}

fn read_json(path: &Path) -> Option<Value> {
	if !path.exists() {
		return None;
	}
	let content = fs::read_to_string(path).ok()?;
	serde_json::from_str(&content).ok()
}

/// Validate the types of the keys present in a settings file.
///
/// Unknown keys are ignored. Returns `Err` with a detailed message for the
/// first key that has the wrong type.
pub fn validate_settings(config_path: &Path) -> Result<()> {
	let content = fs::read_to_string(config_path)
		.with_context(|| format!("Failed to read {}", config_path.display()))?;

	let json: Value = serde_json::from_str(&content)
		.with_context(|| format!("Failed to parse {}", config_path.display()))?;

	// Manifests keep the settings under their own key
	let is_manifest = config_path
		.file_name()
		.and_then(|n| n.to_str())
		.map(|n| MANIFESTS.contains(&n))
		.unwrap_or(false);
	let settings = if is_manifest {
		json.get(MANIFEST_KEY).ok_or_else(|| {
			anyhow::anyhow!("No '{}' key found in {}", MANIFEST_KEY, config_path.display())
		})?
	} else {
		&json
	};

	if !settings.is_object() {
		bail!("Settings in {} must be a JSON object", config_path.display());
	}

	if let Some(v) = settings.get("generateCustomBlockTitle") {
		if !v.is_boolean() {
			bail!(
				"'generateCustomBlockTitle' in {} must be true or false, found {}",
				config_path.display(),
				v
			);
		}
	}

	if let Some(v) = settings.get("maxAttempts") {
		if !matches!(v.as_u64(), Some(n) if n > 0) {
			bail!(
				"'maxAttempts' in {} must be a positive integer, found {}",
				config_path.display(),
				v
			);
		}
	}

	if let Some(v) = settings.get("labelStore") {
		if !matches!(v.as_str(), Some(s) if !s.is_empty()) {
			bail!(
				"'labelStore' in {} must be a non-empty path, found {}",
				config_path.display(),
				v
			);
		}
	}

	Ok(())
}
