//! Trigger-to-action bindings.
//!
//! [`BindingStore`] owns saved actions and the bindings that attach them to
//! triggers, persisting both through a [`Transport`]. Resolution
//! ([`BindingStore::resolve`], or [`ActionResolver`] for trait objects) turns a
//! trigger and an [`ActionContext`](tether_registry::ActionContext) into the
//! ordered, deduplicated list of actions that should run.

pub mod binding;
pub mod error;
pub mod resolve;
pub mod state;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use binding::{Binding, Placement, Scope};
pub use error::{BindingError, TransportError};
pub use resolve::ActionResolver;
pub use state::StoreState;
pub use store::{BindingStore, StoreSnapshot};
pub use transport::{JsonFileTransport, MemoryTransport, Transport};
