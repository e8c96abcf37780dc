//! Saved actions and their trigger bindings.
//!
//! # Consistency
//!
//! Readers load an immutable [`StoreSnapshot`] and never block. Writers are
//! serialized, call the transport first, and publish a new snapshot only after
//! every transport call succeeded; a mutation that returns `Ok` is visible to
//! every later read, and one that returns `Err` changed nothing visible.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use tether_registry::{Action, ActionId, FactoryRegistry, TriggerRegistry};
use tokio::sync::Mutex;

use crate::binding::{Binding, Placement, Scope};
use crate::error::BindingError;
use crate::state::StoreState;
use crate::transport::Transport;

/// Immutable view of the store at one point in time.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
	pub(crate) actions: IndexMap<ActionId, Arc<Action>>,
	pub(crate) bindings: Vec<Binding>,
}

impl StoreSnapshot {
	/// Builds a snapshot from persisted state, dropping records that would
	/// leave a binding dangling.
	fn from_state(state: StoreState, triggers: &TriggerRegistry) -> Self {
		let mut snap = Self::default();
		for action in state.actions {
			let Some(id) = action.id.clone() else {
				tracing::warn!(title = %action.title, "skipping persisted action without id");
				continue;
			};
			snap.actions.insert(id, Arc::new(action));
		}

		for binding in state.bindings {
			if !snap.actions.contains_key(&binding.action_id) || !triggers.contains(&binding.trigger_id) {
				tracing::warn!(
					trigger = %binding.trigger_id,
					action = %binding.action_id,
					"dropping dangling persisted binding"
				);
				continue;
			}
			if !snap.bindings.contains(&binding) {
				snap.bindings.push(binding);
			}
		}
		snap
	}

	pub fn action(&self, id: &ActionId) -> Option<&Arc<Action>> {
		self.actions.get(id)
	}

	/// Saved actions in first-save order.
	pub fn actions(&self) -> impl Iterator<Item = &Arc<Action>> {
		self.actions.values()
	}

	/// Bindings in insertion order.
	pub fn bindings(&self) -> &[Binding] {
		&self.bindings
	}
}

pub struct BindingStore {
	triggers: Arc<TriggerRegistry>,
	factories: Arc<FactoryRegistry>,
	transport: Arc<dyn Transport>,
	snap: ArcSwap<StoreSnapshot>,
	write: Mutex<()>,
}

impl BindingStore {
	/// Creates a store with nothing loaded. Existing transport contents are
	/// ignored; use [`BindingStore::open`] to pick them up.
	pub fn new(
		triggers: Arc<TriggerRegistry>,
		factories: Arc<FactoryRegistry>,
		transport: Arc<dyn Transport>,
	) -> Self {
		Self {
			triggers,
			factories,
			transport,
			snap: ArcSwap::from_pointee(StoreSnapshot::default()),
			write: Mutex::new(()),
		}
	}

	/// Creates a store from the transport's persisted state.
	///
	/// Triggers must already be registered: bindings to unknown triggers are
	/// dropped.
	pub async fn open(
		triggers: Arc<TriggerRegistry>,
		factories: Arc<FactoryRegistry>,
		transport: Arc<dyn Transport>,
	) -> Result<Self, BindingError> {
		let state = transport.load().await?;
		let snap = StoreSnapshot::from_state(state, &triggers);
		tracing::debug!(
			actions = snap.actions.len(),
			bindings = snap.bindings.len(),
			"opened binding store"
		);
		let store = Self::new(triggers, factories, transport);
		store.snap.store(Arc::new(snap));
		Ok(store)
	}

	pub fn triggers(&self) -> &Arc<TriggerRegistry> {
		&self.triggers
	}

	pub fn factories(&self) -> &Arc<FactoryRegistry> {
		&self.factories
	}

	pub fn snapshot(&self) -> Arc<StoreSnapshot> {
		self.snap.load_full()
	}

	pub fn get(&self, id: &ActionId) -> Option<Arc<Action>> {
		self.snap.load().actions.get(id).cloned()
	}

	pub fn actions(&self) -> Vec<Arc<Action>> {
		self.snap.load().actions.values().cloned().collect()
	}

	pub fn bindings(&self) -> Vec<Binding> {
		self.snap.load().bindings.clone()
	}

	pub fn bindings_for(&self, id: &ActionId) -> Vec<Binding> {
		self.snap
			.load()
			.bindings
			.iter()
			.filter(|b| &b.action_id == id)
			.cloned()
			.collect()
	}

	/// Creates the action (assigning an id if it has none) or replaces the
	/// saved record with the same id.
	pub async fn save(&self, mut action: Action) -> Result<Arc<Action>, BindingError> {
		if action.title.trim().is_empty() {
			return Err(BindingError::validation("action title is empty"));
		}
		if !self.factories.contains(&action.factory_id) {
			return Err(BindingError::validation(format!(
				"action factory {:?} is not registered",
				action.factory_id
			)));
		}

		let _guard = self.write.lock().await;
		let id = action.id.get_or_insert_with(ActionId::generate).clone();
		let action = Arc::new(action);
		self.transport.put_action(&action).await?;

		let mut next = (*self.snap.load_full()).clone();
		let created = next.actions.insert(id.clone(), Arc::clone(&action)).is_none();
		self.snap.store(Arc::new(next));

		tracing::info!(action = %id, factory = %action.factory_id, created, "saved action");
		Ok(action)
	}

	/// Removes the action and every binding that references it.
	///
	/// Bindings go first so a failure can never strand a binding without its
	/// action. If the action itself cannot be removed, the bindings are put
	/// back where they were and [`BindingError::DeletionFailed`] is returned.
	pub async fn delete(&self, id: &ActionId) -> Result<(), BindingError> {
		let _guard = self.write.lock().await;
		let cur = self.snap.load_full();
		if !cur.actions.contains_key(id) {
			return Err(BindingError::UnknownAction(id.clone()));
		}

		let placements: Vec<Placement> = cur
			.bindings
			.iter()
			.enumerate()
			.filter(|(_, b)| &b.action_id == id)
			.map(|(i, b)| Placement {
				binding: b.clone(),
				before: cur.bindings[i + 1..]
					.iter()
					.find(|next| &next.action_id != id)
					.cloned(),
			})
			.collect();
		let removed: Vec<Binding> = placements.iter().map(|p| p.binding.clone()).collect();

		if !removed.is_empty()
			&& let Err(source) = self.transport.remove_bindings(&removed).await
		{
			return Err(BindingError::DeletionFailed {
				id: id.clone(),
				rolled_back: true,
				source,
			});
		}

		if let Err(source) = self.transport.remove_action(id).await {
			let rolled_back = self.restore_bindings(id, &placements).await;
			return Err(BindingError::DeletionFailed {
				id: id.clone(),
				rolled_back,
				source,
			});
		}

		let mut next = (*cur).clone();
		next.actions.shift_remove(id);
		next.bindings.retain(|b| &b.action_id != id);
		self.snap.store(Arc::new(next));

		tracing::info!(action = %id, bindings = removed.len(), "deleted action");
		Ok(())
	}

	async fn restore_bindings(&self, id: &ActionId, placements: &[Placement]) -> bool {
		if placements.is_empty() {
			return true;
		}
		match self.transport.restore_bindings(placements).await {
			Ok(()) => true,
			Err(err) => {
				tracing::error!(action = %id, error = %err, "failed to restore bindings of undeleted action");
				false
			}
		}
	}

	/// Binds the action to the trigger at the action's own scope.
	///
	/// Returns `false` if the binding already existed.
	pub async fn add_mapping(&self, trigger_id: &str, action_id: &ActionId) -> Result<bool, BindingError> {
		let scope = self
			.get(action_id)
			.map(|action| Scope::of(&action))
			.ok_or_else(|| BindingError::UnknownAction(action_id.clone()))?;
		self.add_scoped_mapping(trigger_id, action_id, scope).await
	}

	/// Binds the action to the trigger at an explicit scope, such as the
	/// dashboard containing the action's panel.
	pub async fn add_scoped_mapping(
		&self,
		trigger_id: &str,
		action_id: &ActionId,
		scope: Scope,
	) -> Result<bool, BindingError> {
		if !self.triggers.contains(trigger_id) {
			return Err(BindingError::UnknownTrigger(trigger_id.to_owned()));
		}

		let _guard = self.write.lock().await;
		let cur = self.snap.load_full();
		let action = cur
			.actions
			.get(action_id)
			.ok_or_else(|| BindingError::UnknownAction(action_id.clone()))?;

		let binding = Binding::new(trigger_id, action_id.clone(), scope);
		if cur.bindings.contains(&binding) {
			return Ok(false);
		}

		let single_trigger = self
			.factories
			.get(&action.factory_id)
			.is_ok_and(|f| !f.allow_multiple_triggers());
		if single_trigger
			&& cur
				.bindings
				.iter()
				.any(|b| &b.action_id == action_id && b.trigger_id != trigger_id)
		{
			return Err(BindingError::validation(format!(
				"action type {:?} cannot be bound to more than one trigger",
				action.factory_id
			)));
		}

		self.transport
			.put_bindings(std::slice::from_ref(&binding))
			.await?;

		let mut next = (*cur).clone();
		next.bindings.push(binding);
		self.snap.store(Arc::new(next));

		tracing::debug!(trigger = trigger_id, action = %action_id, "added mapping");
		Ok(true)
	}

	/// Unbinds the action from the trigger at every scope.
	///
	/// Returns `false` if there was nothing to remove.
	pub async fn remove_mapping(&self, trigger_id: &str, action_id: &ActionId) -> Result<bool, BindingError> {
		self.remove_matching(|b| b.trigger_id == trigger_id && &b.action_id == action_id)
			.await
	}

	pub async fn remove_scoped_mapping(
		&self,
		trigger_id: &str,
		action_id: &ActionId,
		scope: &Scope,
	) -> Result<bool, BindingError> {
		self.remove_matching(|b| b.trigger_id == trigger_id && &b.action_id == action_id && &b.scope == scope)
			.await
	}

	async fn remove_matching(&self, matches: impl Fn(&Binding) -> bool) -> Result<bool, BindingError> {
		let _guard = self.write.lock().await;
		let cur = self.snap.load_full();
		let removed: Vec<Binding> = cur.bindings.iter().filter(|b| matches(b)).cloned().collect();
		if removed.is_empty() {
			return Ok(false);
		}

		self.transport.remove_bindings(&removed).await?;

		let mut next = (*cur).clone();
		next.bindings.retain(|b| !matches(b));
		self.snap.store(Arc::new(next));

		tracing::debug!(count = removed.len(), "removed mappings");
		Ok(true)
	}
}

#[cfg(test)]
mod tests;
