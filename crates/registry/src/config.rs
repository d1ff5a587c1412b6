//! Registry configuration, loadable from TOML.
//!
//! ```toml
//! core_namespace = "lexis.core"
//! default_imports = ["lexis.lang.Object", "lexis.lang.String"]
//! ```

use std::path::{Path, PathBuf};

use lexis_primitives::Symbol;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {}: {error}", .path.display())]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// A value parsed but is not usable.
	#[error("invalid configuration: {0}")]
	Invalid(String),
}

/// Settings fixed for the lifetime of a [`crate::NamespaceRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Name of the core namespace, which every other namespace refers and which cannot be
	/// removed.
	pub core_namespace: String,
	/// Fully-qualified type names imported into every new namespace under their simple name.
	pub default_imports: Vec<String>,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			core_namespace: "lexis.core".to_string(),
			default_imports: [
				"lexis.lang.Object",
				"lexis.lang.String",
				"lexis.lang.Integer",
				"lexis.lang.Float",
				"lexis.lang.Boolean",
				"lexis.lang.Character",
				"lexis.lang.Exception",
				"lexis.lang.Thread",
			]
			.into_iter()
			.map(String::from)
			.collect(),
		}
	}
}

impl RegistryConfig {
	/// Parses and validates a TOML document. Missing keys take their defaults.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates the TOML file at `path`.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&text)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.core_namespace.is_empty() || self.core_namespace.contains('/') {
			return Err(ConfigError::Invalid(format!(
				"core namespace name {:?} must be a non-empty unqualified symbol",
				self.core_namespace
			)));
		}

		let mut simple_names = FxHashSet::default();
		for name in &self.default_imports {
			let simple = name.rsplit('.').next().unwrap_or_default();
			if simple.is_empty() || name.contains('/') {
				return Err(ConfigError::Invalid(format!("malformed default import {name:?}")));
			}
			if !simple_names.insert(simple) {
				return Err(ConfigError::Invalid(format!(
					"default imports collide on simple name {simple:?}"
				)));
			}
		}
		Ok(())
	}

	pub fn core_symbol(&self) -> Symbol {
		Symbol::unqualified(self.core_namespace.as_str())
	}
}
