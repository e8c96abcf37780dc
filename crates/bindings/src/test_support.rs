//! Shared fixtures for store and resolution tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tether_registry::{
	Action, ActionContext, ActionFactory, ActionId, CreateOutcome, CreateRequest, FactoryError,
	FactoryRegistry, Subject, Trigger, TriggerRegistry,
};

use crate::binding::{Binding, Placement};
use crate::error::TransportError;
use crate::state::StoreState;
use crate::store::BindingStore;
use crate::transport::{MemoryTransport, Transport};

pub(crate) struct StubFactory {
	pub id: &'static str,
	pub single_trigger: bool,
	/// Subject kinds this type refuses to run on.
	pub incompatible_kind: Option<&'static str>,
}

impl StubFactory {
	pub fn new(id: &'static str) -> Self {
		Self {
			id,
			single_trigger: false,
			incompatible_kind: None,
		}
	}
}

#[async_trait]
impl ActionFactory for StubFactory {
	fn id(&self) -> &str {
		self.id
	}

	fn title(&self) -> &str {
		self.id
	}

	fn allow_multiple_triggers(&self) -> bool {
		!self.single_trigger
	}

	async fn create_new(&self, _request: CreateRequest) -> Result<CreateOutcome, FactoryError> {
		Ok(CreateOutcome::Created(Action::new(self.id, "New action")))
	}

	fn is_compatible(&self, _action: &Action, context: &ActionContext) -> bool {
		self.incompatible_kind != Some(context.subject.kind.as_str())
	}

	async fn execute(&self, _action: &Action, _context: &ActionContext) -> anyhow::Result<()> {
		Ok(())
	}
}

/// Memory transport with switchable failures.
#[derive(Default)]
pub(crate) struct FlakyTransport {
	pub inner: MemoryTransport,
	pub fail_put_action: AtomicBool,
	pub fail_remove_action: AtomicBool,
	pub fail_put_bindings: AtomicBool,
	pub fail_remove_bindings: AtomicBool,
}

impl FlakyTransport {
	fn check(flag: &AtomicBool, call: &str) -> Result<(), TransportError> {
		if flag.load(Ordering::SeqCst) {
			return Err(TransportError::Rejected(format!("{call} refused")));
		}
		Ok(())
	}
}

#[async_trait]
impl Transport for FlakyTransport {
	async fn load(&self) -> Result<StoreState, TransportError> {
		self.inner.load().await
	}

	async fn put_action(&self, action: &Action) -> Result<(), TransportError> {
		Self::check(&self.fail_put_action, "put_action")?;
		self.inner.put_action(action).await
	}

	async fn remove_action(&self, id: &ActionId) -> Result<(), TransportError> {
		Self::check(&self.fail_remove_action, "remove_action")?;
		self.inner.remove_action(id).await
	}

	async fn put_bindings(&self, bindings: &[Binding]) -> Result<(), TransportError> {
		Self::check(&self.fail_put_bindings, "put_bindings")?;
		self.inner.put_bindings(bindings).await
	}

	async fn remove_bindings(&self, bindings: &[Binding]) -> Result<(), TransportError> {
		Self::check(&self.fail_remove_bindings, "remove_bindings")?;
		self.inner.remove_bindings(bindings).await
	}

	async fn restore_bindings(&self, placements: &[Placement]) -> Result<(), TransportError> {
		Self::check(&self.fail_put_bindings, "restore_bindings")?;
		self.inner.restore_bindings(placements).await
	}
}

pub(crate) fn triggers() -> Arc<TriggerRegistry> {
	let triggers = TriggerRegistry::new();
	triggers
		.register_many([
			Trigger::new("click", "Click"),
			Trigger::new("hover", "Hover"),
		])
		.expect("fixture triggers");
	Arc::new(triggers)
}

pub(crate) fn factories(extra: impl IntoIterator<Item = StubFactory>) -> Arc<FactoryRegistry> {
	let factories = FactoryRegistry::new();
	factories
		.register(Arc::new(StubFactory::new("navigate")))
		.expect("fixture factory");
	for factory in extra {
		factories.register(Arc::new(factory)).expect("fixture factory");
	}
	Arc::new(factories)
}

pub(crate) fn store_with(transport: Arc<dyn Transport>) -> BindingStore {
	BindingStore::new(triggers(), factories([]), transport)
}

pub(crate) fn store() -> BindingStore {
	store_with(Arc::new(MemoryTransport::new()))
}

pub(crate) fn panel() -> Subject {
	Subject::new("panel1", "map").with_container(dashboard())
}

pub(crate) fn dashboard() -> Subject {
	Subject::new("dash1", "dashboard")
}

/// Saves a `navigate` action scoped to `subject`.
pub(crate) async fn save_for(store: &BindingStore, subject: &Subject, title: &str) -> ActionId {
	let saved = store
		.save(Action::new("navigate", title).scoped_to(subject))
		.await
		.expect("save fixture action");
	saved.id.clone().expect("saved action has id")
}
