use tether_registry::ActionId;

/// Failure reported by a persistence [`Transport`](crate::Transport).
///
/// A failed call is assumed to have changed nothing.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
	#[error("transport I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("malformed binding document: {0}")]
	Json(#[from] serde_json::Error),

	#[error("transport rejected request: {0}")]
	Rejected(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BindingError {
	#[error("unknown trigger: {0:?}")]
	UnknownTrigger(String),

	#[error("unknown action: {0}")]
	UnknownAction(ActionId),

	/// The action cannot be saved or bound as it stands.
	#[error("invalid action: {reason}")]
	Validation { reason: String },

	/// Deletion aborted. When `rolled_back` is false the transport may still
	/// be missing some of the action's bindings; the in-memory view is intact.
	#[error("failed to delete action {id} (rolled back: {rolled_back}): {source}")]
	DeletionFailed {
		id: ActionId,
		rolled_back: bool,
		source: TransportError,
	},

	#[error(transparent)]
	Transport(#[from] TransportError),
}

impl BindingError {
	pub(crate) fn validation(reason: impl Into<String>) -> Self {
		Self::Validation {
			reason: reason.into(),
		}
	}
}
