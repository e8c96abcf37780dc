//! Read-only rows for the bindings table.

use serde::Serialize;
use tether_registry::{Action, ActionId, Trigger};

/// One (trigger, action) pair, denormalized for display. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
	pub action_id: ActionId,
	pub trigger_id: String,
	pub trigger_title: String,
	pub action_title: String,
}

impl Event {
	/// `None` for actions that were never saved.
	pub fn project(trigger: &Trigger, action: &Action) -> Option<Self> {
		Some(Self {
			action_id: action.id.clone()?,
			trigger_id: trigger.id.clone(),
			trigger_title: trigger.title.clone(),
			action_title: action.title.clone(),
		})
	}
}

/// A trigger whose resolution failed during the last refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerFailure {
	pub trigger_id: String,
	pub error: String,
}

/// Result of one full refresh, published all at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventsView {
	/// Grouped by trigger in registration order, then binding order.
	pub events: Vec<Event>,
	pub failures: Vec<TriggerFailure>,
}

impl EventsView {
	pub fn for_trigger<'a>(&'a self, trigger_id: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
		self.events.iter().filter(move |e| e.trigger_id == trigger_id)
	}

	pub fn is_empty(&self) -> bool {
		self.events.is_empty()
	}
}
