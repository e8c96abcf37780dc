use serde::{Deserialize, Serialize};
use tether_registry::{Action, ActionId, SubjectKey};

/// Where a binding applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
	/// A single subject, or a containing context such as a dashboard.
	Subject(SubjectKey),
	/// Every subject, subject to the action's compatibility check.
	Global,
}

impl Scope {
	/// The action's own scope: its subject, or global when unscoped.
	pub fn of(action: &Action) -> Self {
		action.subject_key().map_or(Self::Global, Self::Subject)
	}
}

/// Attaches one action to one trigger at one scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binding {
	pub trigger_id: String,
	pub action_id: ActionId,
	pub scope: Scope,
}

impl Binding {
	pub fn new(trigger_id: impl Into<String>, action_id: ActionId, scope: Scope) -> Self {
		Self {
			trigger_id: trigger_id.into(),
			action_id,
			scope,
		}
	}
}

/// A binding to reinsert, positioned ahead of the binding that followed it.
///
/// `before` is `None` when nothing followed it, which places it last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
	pub binding: Binding,
	pub before: Option<Binding>,
}
