use async_trait::async_trait;
use parking_lot::Mutex;
use tether_registry::{Action, ActionId};

use super::Transport;
use crate::binding::{Binding, Placement};
use crate::error::TransportError;
use crate::state::StoreState;

/// In-process transport; state lives as long as the value.
#[derive(Debug, Default)]
pub struct MemoryTransport {
	state: Mutex<StoreState>,
}

impl MemoryTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_state(state: StoreState) -> Self {
		Self {
			state: Mutex::new(state),
		}
	}

	/// Copy of what has been persisted so far.
	pub fn state(&self) -> StoreState {
		self.state.lock().clone()
	}
}

#[async_trait]
impl Transport for MemoryTransport {
	async fn load(&self) -> Result<StoreState, TransportError> {
		Ok(self.state())
	}

	async fn put_action(&self, action: &Action) -> Result<(), TransportError> {
		self.state.lock().upsert_action(action.clone());
		Ok(())
	}

	async fn remove_action(&self, id: &ActionId) -> Result<(), TransportError> {
		self.state.lock().remove_action(id);
		Ok(())
	}

	async fn put_bindings(&self, bindings: &[Binding]) -> Result<(), TransportError> {
		self.state.lock().insert_bindings(bindings);
		Ok(())
	}

	async fn remove_bindings(&self, bindings: &[Binding]) -> Result<(), TransportError> {
		self.state.lock().remove_bindings(bindings);
		Ok(())
	}

	async fn restore_bindings(&self, placements: &[Placement]) -> Result<(), TransportError> {
		self.state.lock().restore_bindings(placements);
		Ok(())
	}
}
