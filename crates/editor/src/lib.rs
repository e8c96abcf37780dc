//! Interactive editing of one subject's trigger/action bindings.
//!
//! An [`EditorFlow`] lists the events bound to a subject, creates new actions
//! through their factories, opens saved actions for editing, and deletes them.
//! All persistence goes through a shared
//! [`BindingStore`](tether_bindings::BindingStore).

pub mod config;
pub mod error;
pub mod event;
pub mod flow;

pub use config::{ConfigError, EditorConfig};
pub use error::EditorError;
pub use event::{Event, EventsView, TriggerFailure};
pub use flow::{EditorFlow, EditorState, FactoryOption};
