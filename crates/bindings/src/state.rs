//! The persisted document shared by transports.

use serde::{Deserialize, Serialize};
use tether_registry::{Action, ActionId};

use crate::binding::{Binding, Placement};

/// Every saved action and binding, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreState {
	pub actions: Vec<Action>,
	pub bindings: Vec<Binding>,
}

impl StoreState {
	/// Replaces the action with the same id, or appends it.
	pub fn upsert_action(&mut self, action: Action) {
		match self.actions.iter_mut().find(|a| a.id == action.id) {
			Some(slot) => *slot = action,
			None => self.actions.push(action),
		}
	}

	pub fn remove_action(&mut self, id: &ActionId) {
		self.actions.retain(|a| a.id.as_ref() != Some(id));
	}

	/// Appends bindings not already present.
	pub fn insert_bindings(&mut self, bindings: &[Binding]) {
		for binding in bindings {
			if !self.bindings.contains(binding) {
				self.bindings.push(binding.clone());
			}
		}
	}

	/// Reinserts bindings at their recorded positions. A placement whose
	/// successor is gone lands at the end; bindings already present are skipped.
	pub fn restore_bindings(&mut self, placements: &[Placement]) {
		for placement in placements {
			if self.bindings.contains(&placement.binding) {
				continue;
			}
			let at = placement
				.before
				.as_ref()
				.and_then(|next| self.bindings.iter().position(|b| b == next))
				.unwrap_or(self.bindings.len());
			self.bindings.insert(at, placement.binding.clone());
		}
	}

	pub fn remove_bindings(&mut self, bindings: &[Binding]) {
		self.bindings.retain(|b| !bindings.contains(b));
	}
}
