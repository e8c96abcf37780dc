//! Editor configuration.
//!
//! ```toml
//! action_types = ["navigate", "drilldown"]
//! hide_trigger_ids = ["context_menu"]
//! action_type = "navigate"
//! create_timeout_ms = 30000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		source: std::io::Error,
	},

	#[error("invalid editor config: {0}")]
	Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
	/// Action types offered for creation. `None` offers every non-singleton type.
	pub action_types: Option<Vec<String>>,
	/// Triggers left out of the events view.
	pub hide_trigger_ids: Vec<String>,
	/// Skips the type choice and creates this type directly.
	pub action_type: Option<String>,
	/// Gives up on an interactive creation after this long.
	pub create_timeout_ms: Option<u64>,
}

impl EditorConfig {
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	pub fn with_action_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.action_types = Some(types.into_iter().map(Into::into).collect());
		self
	}

	pub fn with_hidden_triggers<I, S>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.hide_trigger_ids = ids.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
		self.create_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
		self
	}

	pub fn is_hidden(&self, trigger_id: &str) -> bool {
		self.hide_trigger_ids.iter().any(|id| id == trigger_id)
	}

	/// The type to create without offering a choice: `action_type`, or the
	/// only entry of a one-element `action_types`.
	pub fn forced_action_type(&self) -> Option<&str> {
		if let Some(forced) = &self.action_type {
			return Some(forced.as_str());
		}
		match self.action_types.as_deref() {
			Some([only]) => Some(only.as_str()),
			_ => None,
		}
	}

	pub fn create_timeout(&self) -> Option<Duration> {
		self.create_timeout_ms.map(Duration::from_millis)
	}
}
