//! Pluggable action types.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::error::RegistryError;
use crate::plugin::FactoryPlugin;
use crate::subject::{ActionContext, Subject};

/// Registered factories keyed by id, in registration order.
pub type FactoryMap = IndexMap<Box<str>, Arc<dyn ActionFactory>>;

/// A request to build a new action, possibly after user interaction.
#[derive(Debug, Clone)]
pub struct CreateRequest {
	/// Subject the new action is being created for.
	pub subject: Option<Subject>,
	/// Cancelled when the requester stops waiting; factories should then
	/// return [`CreateOutcome::Abandoned`].
	pub cancel: CancellationToken,
}

impl CreateRequest {
	pub fn new(subject: Option<Subject>) -> Self {
		Self {
			subject,
			cancel: CancellationToken::new(),
		}
	}

	pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
		self.cancel = cancel;
		self
	}
}

/// Result of [`ActionFactory::create_new`].
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
	Created(Action),
	/// The user backed out. Not an error.
	Abandoned,
}

impl CreateOutcome {
	pub fn into_action(self) -> Option<Action> {
		match self {
			Self::Created(action) => Some(action),
			Self::Abandoned => None,
		}
	}
}

impl From<Option<Action>> for CreateOutcome {
	fn from(action: Option<Action>) -> Self {
		action.map_or(Self::Abandoned, Self::Created)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactoryError {
	#[error("action creation failed: {0}")]
	Failed(String),
}

/// One action type.
///
/// Implementations describe the type (`id`, `title`, `is_singleton`), build
/// new instances, and answer per-instance questions for actions they created.
#[async_trait]
pub trait ActionFactory: Send + Sync + 'static {
	fn id(&self) -> &str;

	fn title(&self) -> &str;

	/// Singleton types have one system-wide instance configured elsewhere and
	/// are never offered for per-subject creation.
	fn is_singleton(&self) -> bool {
		false
	}

	/// Whether one instance may be bound to more than one trigger.
	fn allow_multiple_triggers(&self) -> bool {
		true
	}

	/// Builds a new, unsaved action. May wait on user input.
	async fn create_new(&self, request: CreateRequest) -> Result<CreateOutcome, FactoryError>;

	fn allow_editing(&self, _action: &Action) -> bool {
		true
	}

	/// Resolution drops actions that report `false` here.
	fn is_compatible(&self, _action: &Action, _context: &ActionContext) -> bool {
		true
	}

	/// Runs the action's effect when a bound trigger fires.
	async fn execute(&self, action: &Action, context: &ActionContext) -> anyhow::Result<()>;
}

/// Registry of action types.
pub struct FactoryRegistry {
	catalog: Catalog<dyn ActionFactory>,
}

impl Default for FactoryRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl FactoryRegistry {
	pub fn new() -> Self {
		Self {
			catalog: Catalog::new("action factory"),
		}
	}

	pub fn register(&self, factory: Arc<dyn ActionFactory>) -> Result<(), RegistryError> {
		self.catalog
			.insert_all(vec![(Box::from(factory.id()), factory)])
			.map(drop)
	}

	/// Builds and registers every factory submitted with
	/// [`submit_factory!`](crate::submit_factory), all-or-nothing.
	pub fn register_plugins(&self) -> Result<usize, RegistryError> {
		let mut factories: Vec<Arc<dyn ActionFactory>> = inventory::iter::<FactoryPlugin>
			.into_iter()
			.map(|plugin| (plugin.build)())
			.collect();
		factories.sort_by(|a, b| a.id().cmp(b.id()));
		let entries = factories
			.into_iter()
			.map(|f| (Box::from(f.id()), f))
			.collect();
		self.catalog.insert_all(entries)
	}

	pub fn factories(&self) -> Arc<FactoryMap> {
		self.catalog.snapshot()
	}

	pub fn get(&self, id: &str) -> Result<Arc<dyn ActionFactory>, RegistryError> {
		self.catalog
			.get(id)
			.ok_or_else(|| RegistryError::UnknownFactory(id.to_owned()))
	}

	#[inline]
	pub fn contains(&self, id: &str) -> bool {
		self.catalog.contains(id)
	}

	/// Factories offered for ad-hoc, per-subject creation: non-singletons,
	/// restricted to `allow_list` when one is given.
	pub fn creatable(&self, allow_list: Option<&[String]>) -> Vec<Arc<dyn ActionFactory>> {
		self.catalog
			.values()
			.into_iter()
			.filter(|f| !f.is_singleton())
			.filter(|f| allow_list.is_none_or(|allowed| allowed.iter().any(|id| id == f.id())))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.catalog.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
