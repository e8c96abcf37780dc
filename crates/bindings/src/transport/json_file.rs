use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tether_registry::{Action, ActionId};
use tokio::sync::Mutex;

use super::Transport;
use crate::binding::{Binding, Placement};
use crate::error::TransportError;
use crate::state::StoreState;

/// Keeps the whole [`StoreState`] in one JSON file.
///
/// Every mutation rewrites the document through a sibling temp file that is
/// renamed into place, so a failed write leaves the previous document intact.
#[derive(Debug)]
pub struct JsonFileTransport {
	path: PathBuf,
	write: Mutex<()>,
}

impl JsonFileTransport {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			write: Mutex::new(()),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	async fn read(&self) -> Result<StoreState, TransportError> {
		match tokio::fs::read(&self.path).await {
			Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
			Err(err) if err.kind() == ErrorKind::NotFound => Ok(StoreState::default()),
			Err(err) => Err(err.into()),
		}
	}

	async fn write(&self, state: &StoreState) -> Result<(), TransportError> {
		let bytes = serde_json::to_vec_pretty(state)?;
		let mut tmp = self.path.clone().into_os_string();
		tmp.push(".tmp");
		tokio::fs::write(&tmp, bytes).await?;
		tokio::fs::rename(&tmp, &self.path).await?;
		Ok(())
	}

	async fn update(&self, apply: impl FnOnce(&mut StoreState)) -> Result<(), TransportError> {
		let _guard = self.write.lock().await;
		let mut state = self.read().await?;
		apply(&mut state);
		self.write(&state).await
	}
}

#[async_trait]
impl Transport for JsonFileTransport {
	async fn load(&self) -> Result<StoreState, TransportError> {
		self.read().await
	}

	async fn put_action(&self, action: &Action) -> Result<(), TransportError> {
		self.update(|state| state.upsert_action(action.clone())).await
	}

	async fn remove_action(&self, id: &ActionId) -> Result<(), TransportError> {
		self.update(|state| state.remove_action(id)).await
	}

	async fn put_bindings(&self, bindings: &[Binding]) -> Result<(), TransportError> {
		self.update(|state| state.insert_bindings(bindings)).await
	}

	async fn remove_bindings(&self, bindings: &[Binding]) -> Result<(), TransportError> {
		self.update(|state| state.remove_bindings(bindings)).await
	}

	async fn restore_bindings(&self, placements: &[Placement]) -> Result<(), TransportError> {
		self.update(|state| state.restore_bindings(placements)).await
	}
}
