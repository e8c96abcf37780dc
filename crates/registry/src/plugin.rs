//! Link-time self-registration via `inventory`.

use std::sync::Arc;

use crate::factory::ActionFactory;
use crate::trigger::Trigger;

/// A trigger submitted with [`submit_trigger!`](crate::submit_trigger).
pub struct TriggerPlugin {
	pub id: &'static str,
	pub title: &'static str,
}

impl TriggerPlugin {
	pub const fn new(id: &'static str, title: &'static str) -> Self {
		Self { id, title }
	}

	pub(crate) fn to_trigger(&self) -> Trigger {
		Trigger::new(self.id, self.title)
	}
}

inventory::collect!(TriggerPlugin);

/// An action type submitted with [`submit_factory!`](crate::submit_factory).
pub struct FactoryPlugin {
	/// Constructor called once per [`FactoryRegistry::register_plugins`](crate::FactoryRegistry::register_plugins).
	pub build: fn() -> Arc<dyn ActionFactory>,
}

impl FactoryPlugin {
	pub const fn new(build: fn() -> Arc<dyn ActionFactory>) -> Self {
		Self { build }
	}
}

inventory::collect!(FactoryPlugin);

/// Submits a trigger for [`TriggerRegistry::register_plugins`](crate::TriggerRegistry::register_plugins).
#[macro_export]
macro_rules! submit_trigger {
	($id:expr, $title:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::TriggerPlugin::new($id, $title)
		}
	};
}

/// Submits an action factory constructor for
/// [`FactoryRegistry::register_plugins`](crate::FactoryRegistry::register_plugins).
#[macro_export]
macro_rules! submit_factory {
	($build:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::FactoryPlugin::new($build)
		}
	};
}
