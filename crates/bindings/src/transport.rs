//! Persistence backends for the binding store.
//!
//! Each call either succeeds or leaves the backend untouched. Calls are not
//! transactional with one another; [`BindingStore`](crate::BindingStore)
//! sequences them so a failure never leaves a binding without its action.

use async_trait::async_trait;
use tether_registry::{Action, ActionId};

use crate::binding::{Binding, Placement};
use crate::error::TransportError;
use crate::state::StoreState;

mod json_file;
mod memory;

pub use json_file::JsonFileTransport;
pub use memory::MemoryTransport;

#[async_trait]
pub trait Transport: Send + Sync {
	/// Reads the full persisted state.
	async fn load(&self) -> Result<StoreState, TransportError>;

	/// Creates or replaces an action record. `action.id` is always set.
	async fn put_action(&self, action: &Action) -> Result<(), TransportError>;

	/// Removing an absent action succeeds.
	async fn remove_action(&self, id: &ActionId) -> Result<(), TransportError>;

	/// Bindings already present are left as they are.
	async fn put_bindings(&self, bindings: &[Binding]) -> Result<(), TransportError>;

	async fn remove_bindings(&self, bindings: &[Binding]) -> Result<(), TransportError>;

	/// Puts previously removed bindings back in their original order. See
	/// [`StoreState::restore_bindings`].
	async fn restore_bindings(&self, placements: &[Placement]) -> Result<(), TransportError>;
}
