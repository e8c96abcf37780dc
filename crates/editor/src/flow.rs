//! The binding editor state machine.
//!
//! ```text
//! Listing --request_create--> Creating --create_action(Created)--> Editing
//!    ^  ^                        |                                    |
//!    |  +---cancel / Abandoned---+                                    |
//!    +-------------------save_draft / close_editor (refresh)---------+
//! ```
//!
//! Every return to `Listing` re-resolves the events view, and deletion
//! refreshes in place, so the view never shows a binding that a successful
//! mutation removed.

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use tether_bindings::{ActionResolver, BindingError, BindingStore};
use tether_registry::{
	Action, ActionContext, ActionFactory, ActionId, CreateOutcome, CreateRequest, FactoryError,
	Subject, Trigger,
};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::event::{Event, EventsView, TriggerFailure};

#[derive(Debug, Clone, PartialEq)]
pub enum EditorState {
	Listing,
	/// Choosing an action type; `error` holds the last failed attempt.
	Creating { error: Option<String> },
	/// One action's editor is open and everything else is suspended.
	Editing { draft: Action },
}

impl EditorState {
	pub fn name(&self) -> &'static str {
		match self {
			Self::Listing => "listing",
			Self::Creating { .. } => "creating",
			Self::Editing { .. } => "editing",
		}
	}
}

/// An entry of the "create new action" choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryOption {
	pub id: String,
	pub title: String,
}

/// Edits the bindings of one subject.
///
/// The flow is the only writer for its subject's bindings while it is open.
pub struct EditorFlow {
	store: Arc<BindingStore>,
	resolver: Arc<dyn ActionResolver>,
	subject: Subject,
	config: EditorConfig,
	state: EditorState,
	view: EventsView,
	cancel: CancellationToken,
}

impl EditorFlow {
	pub fn new(store: Arc<BindingStore>, subject: Subject, config: EditorConfig) -> Self {
		let resolver: Arc<dyn ActionResolver> = store.clone();
		Self {
			store,
			resolver,
			subject,
			config,
			state: EditorState::Listing,
			view: EventsView::default(),
			cancel: CancellationToken::new(),
		}
	}

	/// Resolves events through `resolver` instead of the store.
	pub fn with_resolver(mut self, resolver: Arc<dyn ActionResolver>) -> Self {
		self.resolver = resolver;
		self
	}

	pub fn state(&self) -> &EditorState {
		&self.state
	}

	pub fn view(&self) -> &EventsView {
		&self.view
	}

	pub fn events(&self) -> &[Event] {
		&self.view.events
	}

	pub fn subject(&self) -> &Subject {
		&self.subject
	}

	pub fn config(&self) -> &EditorConfig {
		&self.config
	}

	pub fn draft(&self) -> Option<&Action> {
		match &self.state {
			EditorState::Editing { draft } => Some(draft),
			_ => None,
		}
	}

	pub fn draft_mut(&mut self) -> Option<&mut Action> {
		match &mut self.state {
			EditorState::Editing { draft } => Some(draft),
			_ => None,
		}
	}

	/// Token that abandons a pending [`create_action`](Self::create_action)
	/// when cancelled. A fresh token is issued once a cancelled one is spent.
	pub fn cancel_handle(&self) -> CancellationToken {
		self.cancel.clone()
	}

	/// Registered triggers minus the hidden ones, in registration order.
	pub fn visible_triggers(&self) -> Vec<Arc<Trigger>> {
		self.store
			.triggers()
			.triggers()
			.into_iter()
			.filter(|t| !self.config.is_hidden(&t.id))
			.collect()
	}

	/// Re-resolves every visible trigger and replaces the events view.
	///
	/// Triggers resolve concurrently and independently; the view is replaced
	/// only once all of them have settled. A failing trigger is reported in
	/// [`EventsView::failures`] without affecting the others.
	pub async fn refresh(&mut self) -> &EventsView {
		let triggers = self.visible_triggers();
		let context = ActionContext::for_subject(self.subject.clone());

		let mut tasks = JoinSet::new();
		let mut slots = FxHashMap::default();
		for (index, trigger) in triggers.iter().enumerate() {
			let resolver = Arc::clone(&self.resolver);
			let trigger_id = trigger.id.clone();
			let context = context.clone();
			let handle =
				tasks.spawn(async move { (index, resolver.actions_for_trigger(&trigger_id, &context).await) });
			slots.insert(handle.id(), index);
		}

		let mut resolved: Vec<Option<Result<Vec<Arc<Action>>, String>>> =
			triggers.iter().map(|_| None).collect();
		while let Some(joined) = tasks.join_next().await {
			match joined {
				Ok((index, result)) => resolved[index] = Some(result.map_err(|err| err.to_string())),
				Err(err) => {
					if let Some(&index) = slots.get(&err.id()) {
						resolved[index] = Some(Err(err.to_string()));
					}
				}
			}
		}

		let mut view = EventsView::default();
		for (trigger, result) in triggers.iter().zip(resolved) {
			match result {
				Some(Ok(actions)) => view
					.events
					.extend(actions.iter().filter_map(|action| Event::project(trigger, action))),
				Some(Err(err)) => {
					tracing::warn!(trigger = %trigger.id, error = %err, "failed to resolve trigger");
					view.failures.push(TriggerFailure {
						trigger_id: trigger.id.clone(),
						error: err,
					});
				}
				None => view.failures.push(TriggerFailure {
					trigger_id: trigger.id.clone(),
					error: "resolution task did not report back".to_string(),
				}),
			}
		}

		tracing::debug!(
			subject = %self.subject.key(),
			events = view.events.len(),
			failures = view.failures.len(),
			"refreshed events"
		);
		self.view = view;
		&self.view
	}

	/// Action types offered for creation: non-singletons, limited to the
	/// configured allow-list.
	pub fn factory_options(&self) -> Vec<FactoryOption> {
		self.store
			.factories()
			.creatable(self.config.action_types.as_deref())
			.iter()
			.map(|f| FactoryOption {
				id: f.id().to_owned(),
				title: f.title().to_owned(),
			})
			.collect()
	}

	/// Starts creation. With a forced action type the factory runs at once and
	/// the choice step is skipped.
	pub async fn request_create(&mut self) -> Result<(), EditorError> {
		self.expect_listing("create an action")?;
		if let Some(forced) = self.config.forced_action_type().map(str::to_owned) {
			return self.create_action(&forced).await;
		}
		self.state = EditorState::Creating { error: None };
		Ok(())
	}

	/// Runs the factory and opens the editor on the new action.
	///
	/// Only types listed by [`factory_options`](Self::factory_options) may be
	/// created. Abandonment, cancellation and timeout return to `Listing`
	/// without creating anything. Failures stay in `Creating` with the error
	/// recorded; the events view is left as it was.
	pub async fn create_action(&mut self, factory_id: &str) -> Result<(), EditorError> {
		if let EditorState::Editing { .. } = self.state {
			return Err(self.invalid("create an action"));
		}

		let factory = match self.store.factories().get(factory_id) {
			Ok(factory) => factory,
			Err(err) => return Err(self.creation_failed(err.into())),
		};
		if !self.offers(factory_id) {
			return Err(self.creation_failed(EditorError::NotOffered(factory_id.to_owned())));
		}

		let request = CreateRequest::new(Some(self.subject.clone())).with_cancel(self.cancel.clone());
		let outcome = run_create(factory.as_ref(), request, self.config.create_timeout()).await;
		if self.cancel.is_cancelled() {
			self.cancel = CancellationToken::new();
		}

		match outcome {
			Ok(CreateOutcome::Created(mut action)) => {
				action.bind_subject(&self.subject);
				tracing::debug!(factory = factory_id, subject = %self.subject.key(), "opened new action");
				self.state = EditorState::Editing { draft: action };
				Ok(())
			}
			Ok(CreateOutcome::Abandoned) => {
				tracing::debug!(factory = factory_id, "action creation abandoned");
				self.state = EditorState::Listing;
				Ok(())
			}
			Err(err) => Err(self.creation_failed(err.into())),
		}
	}

	pub fn cancel_create(&mut self) -> Result<(), EditorError> {
		match self.state {
			EditorState::Creating { .. } => {
				self.state = EditorState::Listing;
				Ok(())
			}
			_ => Err(self.invalid("cancel creation")),
		}
	}

	/// Whether the edit affordance for `id` is enabled.
	pub fn can_edit(&self, id: &ActionId) -> bool {
		self.store
			.get(id)
			.is_some_and(|action| self.allows_editing(&action))
	}

	pub fn edit(&mut self, id: &ActionId) -> Result<(), EditorError> {
		self.expect_listing("edit an action")?;
		let action = self
			.store
			.get(id)
			.ok_or_else(|| BindingError::UnknownAction(id.clone()))?;
		if !self.allows_editing(&action) {
			return Err(EditorError::NotEditable(id.clone()));
		}
		self.state = EditorState::Editing {
			draft: (*action).clone(),
		};
		Ok(())
	}

	/// Saves the draft, binds it to `trigger_ids`, and returns to `Listing`.
	///
	/// On error the editor stays open with the draft intact; once saved, the
	/// draft keeps its id so a retry updates rather than duplicates.
	pub async fn save_draft<S: AsRef<str>>(&mut self, trigger_ids: &[S]) -> Result<Arc<Action>, EditorError> {
		for trigger_id in trigger_ids {
			self.store.triggers().require(trigger_id.as_ref())?;
		}

		let state = self.state.name();
		let (id, draft) = match &mut self.state {
			EditorState::Editing { draft } => {
				let id = draft.id.get_or_insert_with(ActionId::generate).clone();
				(id, draft.clone())
			}
			_ => {
				return Err(EditorError::InvalidState {
					operation: "save an action",
					state,
				});
			}
		};

		let saved = self.store.save(draft).await?;
		for trigger_id in trigger_ids {
			self.store.add_mapping(trigger_id.as_ref(), &id).await?;
		}
		tracing::info!(action = %id, triggers = trigger_ids.len(), "saved action from editor");

		self.refresh().await;
		self.state = EditorState::Listing;
		Ok(saved)
	}

	/// Leaves the editor without saving.
	pub async fn close_editor(&mut self) -> Result<(), EditorError> {
		if !matches!(self.state, EditorState::Editing { .. }) {
			return Err(self.invalid("close the editor"));
		}
		self.refresh().await;
		self.state = EditorState::Listing;
		Ok(())
	}

	/// Deletes the action with all its bindings, then refreshes.
	///
	/// On failure nothing visible changes and the deletion can be retried.
	pub async fn delete_action(&mut self, id: &ActionId) -> Result<(), EditorError> {
		self.expect_listing("delete an action")?;
		self.store.delete(id).await?;
		self.refresh().await;
		Ok(())
	}

	fn offers(&self, factory_id: &str) -> bool {
		self.store
			.factories()
			.creatable(self.config.action_types.as_deref())
			.iter()
			.any(|f| f.id() == factory_id)
	}

	fn allows_editing(&self, action: &Action) -> bool {
		self.store
			.factories()
			.get(&action.factory_id)
			.is_ok_and(|f| f.allow_editing(action))
	}

	fn creation_failed(&mut self, err: EditorError) -> EditorError {
		self.state = EditorState::Creating {
			error: Some(err.to_string()),
		};
		err
	}

	fn expect_listing(&self, operation: &'static str) -> Result<(), EditorError> {
		match self.state {
			EditorState::Listing => Ok(()),
			_ => Err(self.invalid(operation)),
		}
	}

	fn invalid(&self, operation: &'static str) -> EditorError {
		EditorError::InvalidState {
			operation,
			state: self.state.name(),
		}
	}
}

async fn run_create(
	factory: &dyn ActionFactory,
	request: CreateRequest,
	timeout: Option<Duration>,
) -> Result<CreateOutcome, FactoryError> {
	let cancel = request.cancel.clone();
	let pending = async {
		tokio::select! {
			outcome = factory.create_new(request) => outcome,
			() = cancel.cancelled() => Ok(CreateOutcome::Abandoned),
		}
	};

	let Some(limit) = timeout else {
		return pending.await;
	};
	match tokio::time::timeout(limit, pending).await {
		Ok(outcome) => outcome,
		Err(_) => {
			tracing::warn!(factory = factory.id(), ?limit, "action creation timed out");
			Ok(CreateOutcome::Abandoned)
		}
	}
}
