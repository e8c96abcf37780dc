//! Trigger catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::RegistryError;
use crate::plugin::TriggerPlugin;

/// A named event kind a subject can raise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trigger {
	pub id: String,
	pub title: String,
}

impl Trigger {
	pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
		}
	}
}

/// Registry of every trigger the host application can raise.
///
/// Triggers are structural to the host, so there is no removal.
pub struct TriggerRegistry {
	catalog: Catalog<Trigger>,
}

impl Default for TriggerRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl TriggerRegistry {
	pub fn new() -> Self {
		Self {
			catalog: Catalog::new("trigger"),
		}
	}

	pub fn register(&self, trigger: Trigger) -> Result<Arc<Trigger>, RegistryError> {
		let trigger = Arc::new(trigger);
		self.catalog
			.insert_all(vec![(Box::from(trigger.id.as_str()), Arc::clone(&trigger))])?;
		Ok(trigger)
	}

	/// Registers all of `triggers`, or none of them if any id collides.
	pub fn register_many<I>(&self, triggers: I) -> Result<usize, RegistryError>
	where
		I: IntoIterator<Item = Trigger>,
	{
		let entries = triggers
			.into_iter()
			.map(|t| (Box::from(t.id.as_str()), Arc::new(t)))
			.collect();
		self.catalog.insert_all(entries)
	}

	/// Registers every trigger submitted with [`submit_trigger!`](crate::submit_trigger).
	pub fn register_plugins(&self) -> Result<usize, RegistryError> {
		let mut plugins: Vec<&'static TriggerPlugin> = inventory::iter::<TriggerPlugin>.into_iter().collect();
		plugins.sort_by(|a, b| a.id.cmp(b.id));
		self.register_many(plugins.into_iter().map(TriggerPlugin::to_trigger))
	}

	/// All triggers in registration order.
	pub fn triggers(&self) -> Vec<Arc<Trigger>> {
		self.catalog.values()
	}

	#[inline]
	pub fn get(&self, id: &str) -> Option<Arc<Trigger>> {
		self.catalog.get(id)
	}

	pub fn require(&self, id: &str) -> Result<Arc<Trigger>, RegistryError> {
		self.get(id)
			.ok_or_else(|| RegistryError::UnknownTrigger(id.to_owned()))
	}

	#[inline]
	pub fn contains(&self, id: &str) -> bool {
		self.catalog.contains(id)
	}

	pub fn len(&self) -> usize {
		self.catalog.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[cfg(test)]
mod tests;
