//! Resolving a fired trigger to the actions bound to it.

use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashSet;
use tether_registry::{Action, ActionContext, ActionId, FactoryRegistry};

use crate::binding::Scope;
use crate::error::BindingError;
use crate::store::{BindingStore, StoreSnapshot};

/// Source of resolved actions, implemented by [`BindingStore`].
///
/// Implementations must be pure reads so that many triggers can be resolved
/// concurrently.
#[async_trait]
pub trait ActionResolver: Send + Sync {
	async fn actions_for_trigger(
		&self,
		trigger_id: &str,
		context: &ActionContext,
	) -> Result<Vec<Arc<Action>>, BindingError>;
}

#[async_trait]
impl ActionResolver for BindingStore {
	async fn actions_for_trigger(
		&self,
		trigger_id: &str,
		context: &ActionContext,
	) -> Result<Vec<Arc<Action>>, BindingError> {
		self.resolve(trigger_id, context)
	}
}

impl BindingStore {
	/// Actions bound to `trigger_id` for the context's subject.
	///
	/// Subject-scoped bindings come first, then bindings on the containing
	/// context, then global bindings, each in binding insertion order. An
	/// action appears once, at its first position. Actions whose factory is
	/// gone or rejects the context are dropped.
	pub fn resolve(&self, trigger_id: &str, context: &ActionContext) -> Result<Vec<Arc<Action>>, BindingError> {
		if !self.triggers().contains(trigger_id) {
			return Err(BindingError::UnknownTrigger(trigger_id.to_owned()));
		}
		Ok(self.snapshot().resolve(trigger_id, context, self.factories()))
	}
}

impl StoreSnapshot {
	pub(crate) fn resolve(
		&self,
		trigger_id: &str,
		context: &ActionContext,
		factories: &FactoryRegistry,
	) -> Vec<Arc<Action>> {
		let subject = context.subject_key();
		let container = context.container_key();

		let mut tiers: [Vec<&ActionId>; 3] = Default::default();
		for binding in self.bindings.iter().filter(|b| b.trigger_id == trigger_id) {
			let tier = match &binding.scope {
				Scope::Subject(key) if *key == subject => 0,
				Scope::Subject(key) if container.as_ref() == Some(key) => 1,
				Scope::Subject(_) => continue,
				Scope::Global => 2,
			};
			tiers[tier].push(&binding.action_id);
		}

		let mut seen = FxHashSet::default();
		tiers
			.into_iter()
			.flatten()
			.filter(|id| seen.insert(*id))
			.filter_map(|id| self.actions.get(id))
			.filter(|action| is_compatible(factories, action, context))
			.cloned()
			.collect()
	}
}

fn is_compatible(factories: &FactoryRegistry, action: &Action, context: &ActionContext) -> bool {
	match factories.get(&action.factory_id) {
		Ok(factory) => factory.is_compatible(action, context),
		Err(err) => {
			tracing::warn!(action = ?action.id, error = %err, "skipping action with unregistered factory");
			false
		}
	}
}
