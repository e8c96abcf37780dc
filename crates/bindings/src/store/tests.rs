use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;
use tether_registry::{ActionContext, Subject};

use super::*;
use crate::test_support::{FlakyTransport, StubFactory, factories, panel, save_for, store, store_with, triggers};
use crate::transport::MemoryTransport;

#[tokio::test]
async fn save_assigns_id_and_edit_keeps_it() {
	let store = store();
	let saved = store
		.save(Action::new("navigate", "Go to map"))
		.await
		.unwrap();
	let id = saved.id.clone().expect("id assigned on first save");

	let mut edited = (*saved).clone();
	edited.title = "Go to world map".to_string();
	let edited = store.save(edited).await.unwrap();

	assert_eq!(edited.id.as_ref(), Some(&id));
	assert_eq!(store.actions().len(), 1);
	assert_eq!(store.get(&id).unwrap().title, "Go to world map");
}

#[tokio::test]
async fn save_rejects_blank_title() {
	let store = store();
	let err = store.save(Action::new("navigate", "  ")).await.unwrap_err();

	assert!(matches!(err, BindingError::Validation { .. }));
	assert!(store.actions().is_empty());
}

#[tokio::test]
async fn save_rejects_unregistered_factory() {
	let store = store();
	let err = store
		.save(Action::new("uninstalled", "Ghost"))
		.await
		.unwrap_err();

	assert!(matches!(err, BindingError::Validation { reason } if reason.contains("uninstalled")));
}

#[tokio::test]
async fn failed_save_changes_nothing() {
	let transport = Arc::new(FlakyTransport::default());
	transport.fail_put_action.store(true, Ordering::SeqCst);
	let store = store_with(transport);

	let err = store
		.save(Action::new("navigate", "Go"))
		.await
		.unwrap_err();

	assert!(matches!(err, BindingError::Transport(_)));
	assert!(store.actions().is_empty());
}

#[tokio::test]
async fn add_mapping_uses_action_scope_and_is_idempotent() {
	let store = store();
	let subject = panel();
	let id = save_for(&store, &subject, "Go").await;

	assert!(store.add_mapping("click", &id).await.unwrap());
	assert!(!store.add_mapping("click", &id).await.unwrap());

	assert_eq!(
		store.bindings(),
		vec![Binding::new("click", id, Scope::Subject(subject.key()))]
	);
}

#[tokio::test]
async fn add_mapping_rejects_unknown_ids() {
	let store = store();
	let id = save_for(&store, &panel(), "Go").await;

	let err = store.add_mapping("double_click", &id).await.unwrap_err();
	assert!(matches!(err, BindingError::UnknownTrigger(t) if t == "double_click"));

	let missing = ActionId::new("missing");
	let err = store.add_mapping("click", &missing).await.unwrap_err();
	assert!(matches!(err, BindingError::UnknownAction(a) if a == missing));

	assert!(store.bindings().is_empty());
}

#[tokio::test]
async fn single_trigger_factory_refuses_second_trigger() {
	let mut once = StubFactory::new("once");
	once.single_trigger = true;
	let store = BindingStore::new(triggers(), factories([once]), Arc::new(MemoryTransport::new()));

	let saved = store
		.save(Action::new("once", "Only once").scoped_to(&panel()))
		.await
		.unwrap();
	let id = saved.id.clone().unwrap();

	store.add_mapping("click", &id).await.unwrap();
	let err = store.add_mapping("hover", &id).await.unwrap_err();

	assert!(matches!(err, BindingError::Validation { .. }));
	assert_eq!(store.bindings_for(&id).len(), 1);
}

#[tokio::test]
async fn remove_mapping_is_idempotent() {
	let store = store();
	let id = save_for(&store, &panel(), "Go").await;
	store.add_mapping("click", &id).await.unwrap();

	assert!(!store.remove_mapping("hover", &id).await.unwrap());
	assert_eq!(store.bindings().len(), 1);

	assert!(store.remove_mapping("click", &id).await.unwrap());
	assert!(!store.remove_mapping("click", &id).await.unwrap());
	assert!(store.bindings().is_empty());
}

#[tokio::test]
async fn remove_scoped_mapping_leaves_other_scopes() {
	let store = store();
	let subject = panel();
	let id = save_for(&store, &subject, "Go").await;
	let container = Scope::Subject(subject.container().unwrap().key());

	store.add_mapping("click", &id).await.unwrap();
	store
		.add_scoped_mapping("click", &id, container.clone())
		.await
		.unwrap();

	assert!(store.remove_scoped_mapping("click", &id, &container).await.unwrap());
	assert_eq!(store.bindings(), vec![Binding::new("click", id, Scope::Subject(subject.key()))]);
}

#[tokio::test]
async fn delete_removes_action_and_all_bindings() {
	let transport = Arc::new(MemoryTransport::new());
	let store = store_with(transport.clone());
	let id = save_for(&store, &panel(), "Go").await;
	let other = save_for(&store, &panel(), "Stay").await;
	store.add_mapping("click", &id).await.unwrap();
	store.add_mapping("hover", &id).await.unwrap();
	store.add_mapping("click", &other).await.unwrap();

	store.delete(&id).await.unwrap();

	assert!(store.get(&id).is_none());
	assert!(store.bindings_for(&id).is_empty());
	assert_eq!(store.bindings_for(&other).len(), 1);

	let persisted = transport.state();
	assert!(persisted.actions.iter().all(|a| a.id.as_ref() != Some(&id)));
	assert!(persisted.bindings.iter().all(|b| b.action_id != id));
}

#[tokio::test]
async fn delete_unknown_action_fails() {
	let store = store();
	let err = store.delete(&ActionId::new("nope")).await.unwrap_err();
	assert!(matches!(err, BindingError::UnknownAction(_)));
}

#[tokio::test]
async fn interrupted_delete_restores_bindings_in_place() {
	let transport = Arc::new(FlakyTransport::default());
	let store = store_with(transport.clone());
	let first = save_for(&store, &panel(), "First").await;
	let second = save_for(&store, &panel(), "Second").await;
	store.add_mapping("click", &first).await.unwrap();
	store.add_mapping("click", &second).await.unwrap();
	store.add_mapping("hover", &first).await.unwrap();
	let before = transport.inner.state();

	transport.fail_remove_action.store(true, Ordering::SeqCst);
	let err = store.delete(&first).await.unwrap_err();

	assert!(matches!(err, BindingError::DeletionFailed { rolled_back: true, .. }));
	assert!(store.get(&first).is_some());
	assert_eq!(store.bindings_for(&first).len(), 2);
	assert_eq!(transport.inner.state(), before);

	let reopened = BindingStore::open(
		triggers(),
		factories([]),
		Arc::new(MemoryTransport::with_state(transport.inner.state())),
	)
	.await
	.unwrap();
	let titles: Vec<_> = reopened
		.resolve("click", &ActionContext::for_subject(panel()))
		.unwrap()
		.iter()
		.map(|a| a.title.clone())
		.collect();
	assert_eq!(titles, vec!["First", "Second"]);

	// Retry once the transport recovers.
	transport.fail_remove_action.store(false, Ordering::SeqCst);
	store.delete(&first).await.unwrap();
	assert!(store.get(&first).is_none());
	assert_eq!(store.bindings_for(&second).len(), 1);
}

#[tokio::test]
async fn delete_reports_incomplete_rollback() {
	let transport = Arc::new(FlakyTransport::default());
	let store = store_with(transport.clone());
	let id = save_for(&store, &panel(), "Go").await;
	store.add_mapping("click", &id).await.unwrap();

	transport.fail_remove_action.store(true, Ordering::SeqCst);
	transport.fail_put_bindings.store(true, Ordering::SeqCst);
	let err = store.delete(&id).await.unwrap_err();

	assert!(matches!(err, BindingError::DeletionFailed { rolled_back: false, .. }));
	// The visible state is untouched either way.
	assert_eq!(store.bindings_for(&id).len(), 1);
}

#[tokio::test]
async fn delete_fails_cleanly_when_bindings_cannot_be_removed() {
	let transport = Arc::new(FlakyTransport::default());
	let store = store_with(transport.clone());
	let id = save_for(&store, &panel(), "Go").await;
	store.add_mapping("click", &id).await.unwrap();

	transport.fail_remove_bindings.store(true, Ordering::SeqCst);
	let err = store.delete(&id).await.unwrap_err();

	assert!(matches!(err, BindingError::DeletionFailed { rolled_back: true, .. }));
	assert_eq!(transport.inner.state().actions.len(), 1);
	assert_eq!(transport.inner.state().bindings.len(), 1);
}

#[tokio::test]
async fn open_loads_persisted_state_and_drops_dangling_bindings() {
	let subject = Subject::new("panel1", "map");
	let action = Action::new("navigate", "Go")
		.with_id("a1")
		.scoped_to(&subject);
	let scope = Scope::Subject(subject.key());
	let state = StoreState {
		actions: vec![action],
		bindings: vec![
			Binding::new("click", ActionId::new("a1"), scope.clone()),
			Binding::new("click", ActionId::new("gone"), scope.clone()),
			Binding::new("removed_trigger", ActionId::new("a1"), scope.clone()),
		],
	};

	let store = BindingStore::open(triggers(), factories([]), Arc::new(MemoryTransport::with_state(state)))
		.await
		.unwrap();

	assert_eq!(store.actions().len(), 1);
	assert_eq!(
		store.bindings(),
		vec![Binding::new("click", ActionId::new("a1"), scope)]
	);
}
