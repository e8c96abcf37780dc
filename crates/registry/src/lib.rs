//! Trigger and action factory registries.
//!
//! Triggers are the named events a subject can raise; action factories are the
//! pluggable action types that can be bound to them. Both registries are plain
//! values shared through [`Arc`](std::sync::Arc) rather than process globals.
//!
//! # Initialization order
//!
//! Register every trigger and factory before the first binding is resolved.
//! Registration is lock-free and may race with readers, but a resolution that
//! runs before a trigger exists reports it as unknown.
//!
//! # Self-registration
//!
//! Action types may submit themselves with [`submit_factory!`] and
//! [`submit_trigger!`]; [`FactoryRegistry::register_plugins`] and
//! [`TriggerRegistry::register_plugins`] install everything submitted.

mod catalog;
pub mod action;
pub mod error;
pub mod factory;
pub mod plugin;
pub mod subject;
pub mod trigger;

#[doc(hidden)]
pub use inventory;

pub use action::{Action, ActionId};
pub use error::RegistryError;
pub use factory::{
	ActionFactory, CreateOutcome, CreateRequest, FactoryError, FactoryMap, FactoryRegistry,
};
pub use plugin::{FactoryPlugin, TriggerPlugin};
pub use subject::{ActionContext, Subject, SubjectKey};
pub use trigger::{Trigger, TriggerRegistry};
