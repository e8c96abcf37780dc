//! Subject objects and the context actions are resolved against.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hashable identity of a subject: its id plus its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectKey {
	pub id: String,
	pub kind: String,
}

impl SubjectKey {
	pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			kind: kind.into(),
		}
	}
}

impl fmt::Display for SubjectKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.kind, self.id)
	}
}

/// An addressable UI object that raises triggers, optionally nested in a
/// containing subject (a panel inside a dashboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
	pub id: String,
	pub kind: String,
	pub container: Option<Box<Subject>>,
}

impl Subject {
	pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			kind: kind.into(),
			container: None,
		}
	}

	pub fn with_container(mut self, container: Subject) -> Self {
		self.container = Some(Box::new(container));
		self
	}

	pub fn key(&self) -> SubjectKey {
		SubjectKey::new(self.id.clone(), self.kind.clone())
	}

	pub fn container(&self) -> Option<&Subject> {
		self.container.as_deref()
	}
}

/// What a trigger fired on: the subject and, if any, its containing context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
	pub subject: Subject,
	pub container: Option<Subject>,
}

impl ActionContext {
	pub fn new(subject: Subject, container: Option<Subject>) -> Self {
		Self { subject, container }
	}

	/// Uses the subject's own container as the containing context.
	pub fn for_subject(subject: Subject) -> Self {
		let container = subject.container().cloned();
		Self { subject, container }
	}

	pub fn subject_key(&self) -> SubjectKey {
		self.subject.key()
	}

	pub fn container_key(&self) -> Option<SubjectKey> {
		self.container.as_ref().map(Subject::key)
	}
}
