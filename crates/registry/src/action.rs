//! Persisted action records.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::subject::{Subject, SubjectKey};

/// Stable action identifier, assigned on first save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns a fresh random (UUID v4) id.
	pub fn generate() -> Self {
		Self(uuid::Uuid::new_v4().to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ActionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for ActionId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ActionId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for ActionId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// A configured behavior instance.
///
/// The record is plain data; editing permission, compatibility and execution
/// are answered by the [`ActionFactory`](crate::ActionFactory) named by
/// `factory_id`. `config` holds the type-specific parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<ActionId>,
	pub factory_id: String,
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub embeddable_id: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub embeddable_type: Option<String>,
	#[serde(default)]
	pub config: serde_json::Value,
}

impl Action {
	/// Creates an unsaved, unscoped action.
	pub fn new(factory_id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: None,
			factory_id: factory_id.into(),
			title: title.into(),
			embeddable_id: None,
			embeddable_type: None,
			config: serde_json::Value::Null,
		}
	}

	pub fn with_id(mut self, id: impl Into<ActionId>) -> Self {
		self.id = Some(id.into());
		self
	}

	pub fn with_config(mut self, config: serde_json::Value) -> Self {
		self.config = config;
		self
	}

	/// Scopes the action to `subject`.
	pub fn scoped_to(mut self, subject: &Subject) -> Self {
		self.bind_subject(subject);
		self
	}

	pub fn bind_subject(&mut self, subject: &Subject) {
		self.embeddable_id = Some(subject.id.clone());
		self.embeddable_type = Some(subject.kind.clone());
	}

	/// The subject this action is scoped to; `None` for global actions.
	pub fn subject_key(&self) -> Option<SubjectKey> {
		match (&self.embeddable_id, &self.embeddable_type) {
			(Some(id), Some(kind)) => Some(SubjectKey::new(id.clone(), kind.clone())),
			_ => None,
		}
	}
}
