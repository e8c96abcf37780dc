/// Registry lookup and registration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// Two registrations share an id. Fatal at plugin load.
	#[error("duplicate {registry} id: {id:?}")]
	DuplicateId { registry: &'static str, id: String },

	#[error("unknown action factory: {0:?}")]
	UnknownFactory(String),

	#[error("unknown trigger: {0:?}")]
	UnknownTrigger(String),
}
