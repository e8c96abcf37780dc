use tether_bindings::BindingError;
use tether_registry::{ActionId, FactoryError, RegistryError};

/// Errors surfaced by [`EditorFlow`](crate::EditorFlow). All are recoverable;
/// the flow stays in a well-defined state after each.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Binding(#[from] BindingError),

	#[error(transparent)]
	Factory(#[from] FactoryError),

	#[error("cannot {operation} while {state}")]
	InvalidState {
		operation: &'static str,
		state: &'static str,
	},

	/// Singleton types and types outside the configured allow-list.
	#[error("action type {0:?} is not offered for creation")]
	NotOffered(String),

	#[error("action {0} does not allow editing")]
	NotEditable(ActionId),
}
