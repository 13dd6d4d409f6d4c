//! Block Content Label Generation Library
//!
//! Generates unique, human-readable labels for block content entities by
//! prefixing a title with an acronym of the block type name and
//! disambiguating against labels that already exist.

pub mod error;
pub mod prefix;
pub mod settings;
pub mod store;
pub mod unique;

pub use error::{GenerateError, OracleError};
pub use prefix::build_prefix;
pub use store::LabelStore;
pub use unique::generate_unique;

/// Configuration for label generation
#[derive(Debug, Clone)]
pub struct Config {
	/// Whether labels are generated at all
	pub enabled: bool,
	/// Maximum number of existence checks per label (default: 1000)
	pub max_attempts: usize,
	/// Text between prefix and title (default: ": ")
	pub separator: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			enabled: true,
			max_attempts: 1000,
			separator: ": ".to_string(),
		}
	}
}

/// Join a prefix and a title into a candidate label.
pub fn compose_label(prefix: &str, separator: &str, title: &str) -> String {
	format!("{}{}{}", prefix, separator, title)
}

/// Label generator bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct LabelGenerator {
	config: Config,
}

impl LabelGenerator {
	pub fn new(config: Config) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Build `PREFIX<separator>title` from the category name and resolve
	/// collisions against `exists`.
	///
	/// Ignores [`Config::enabled`]; see [`LabelGenerator::fill`].
	pub fn generate<F>(&self, category: &str, title: &str, exists: F) -> Result<String, GenerateError>
	where
		F: FnMut(&str) -> Result<bool, OracleError>,
	{
		let prefix = build_prefix(category);
		let candidate = compose_label(&prefix, &self.config.separator, title);
		log::debug!("candidate label {:?} for category {:?}", candidate, category);

		generate_unique(&candidate, self.config.max_attempts, exists)
	}

	/// Generate a label only when one is needed.
	///
	/// Returns `None` when generation is disabled or `current` already holds
	/// a label, in which case the caller keeps `current`.
	pub fn fill<F>(
		&self,
		current: &str,
		category: &str,
		title: &str,
		exists: F,
	) -> Result<Option<String>, GenerateError>
	where
		F: FnMut(&str) -> Result<bool, OracleError>,
	{
		if !self.config.enabled {
			log::debug!("label generation disabled");
			return Ok(None);
		}
		if !current.trim().is_empty() {
			log::debug!("keeping existing label {:?}", current);
			return Ok(None);
		}

		self.generate(category, title, exists).map(Some)
	}
}
