use pretty_assertions::assert_eq;

use super::*;

crate::submit_trigger!("plugin.double_click", "Double click");

fn titles(registry: &TriggerRegistry) -> Vec<String> {
	registry.triggers().iter().map(|t| t.title.clone()).collect()
}

#[test]
fn triggers_keep_registration_order() {
	let registry = TriggerRegistry::new();
	registry.register(Trigger::new("hover", "Hover")).unwrap();
	registry.register(Trigger::new("click", "Click")).unwrap();
	registry.register(Trigger::new("apply_filter", "Apply filter")).unwrap();

	assert_eq!(titles(&registry), vec!["Hover", "Click", "Apply filter"]);
	assert_eq!(registry.len(), 3);
}

#[test]
fn duplicate_id_is_rejected() {
	let registry = TriggerRegistry::new();
	registry.register(Trigger::new("click", "Click")).unwrap();

	let err = registry.register(Trigger::new("click", "Other click")).unwrap_err();
	assert_eq!(
		err,
		RegistryError::DuplicateId {
			registry: "trigger",
			id: "click".to_string(),
		}
	);
	assert_eq!(registry.get("click").unwrap().title, "Click");
}

#[test]
fn register_many_is_all_or_nothing() {
	let registry = TriggerRegistry::new();
	registry.register(Trigger::new("click", "Click")).unwrap();

	let result = registry.register_many([
		Trigger::new("hover", "Hover"),
		Trigger::new("click", "Click again"),
	]);

	assert!(matches!(result, Err(RegistryError::DuplicateId { .. })));
	assert!(!registry.contains("hover"));
	assert_eq!(registry.len(), 1);
}

#[test]
fn register_many_rejects_collisions_within_batch() {
	let registry = TriggerRegistry::new();
	let result = registry.register_many([Trigger::new("a", "A"), Trigger::new("a", "A2")]);

	assert!(result.is_err());
	assert!(registry.is_empty());
}

#[test]
fn require_reports_unknown_trigger() {
	let registry = TriggerRegistry::new();
	assert_eq!(
		registry.require("missing").unwrap_err(),
		RegistryError::UnknownTrigger("missing".to_string())
	);
}

#[test]
fn submitted_triggers_are_registered() {
	let registry = TriggerRegistry::new();
	let count = registry.register_plugins().unwrap();

	assert!(count >= 1);
	assert_eq!(registry.get("plugin.double_click").unwrap().title, "Double click");

	// A second pass collides with the first.
	assert!(registry.register_plugins().is_err());
}
