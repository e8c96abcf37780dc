//! Insertion-ordered, copy-on-write id catalog shared by both registries.

use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;

use crate::error::RegistryError;

pub(crate) type Entries<T> = IndexMap<Box<str>, Arc<T>>;

/// Readers load an immutable snapshot; writers clone it, insert, and publish
/// with compare-and-swap, retrying if another writer got there first.
pub(crate) struct Catalog<T: ?Sized> {
	name: &'static str,
	snap: ArcSwap<Entries<T>>,
}

impl<T: ?Sized> Catalog<T> {
	pub(crate) fn new(name: &'static str) -> Self {
		Self {
			name,
			snap: ArcSwap::from_pointee(IndexMap::new()),
		}
	}

	/// Inserts every entry or none of them.
	pub(crate) fn insert_all(&self, entries: Vec<(Box<str>, Arc<T>)>) -> Result<usize, RegistryError> {
		if entries.is_empty() {
			return Ok(0);
		}

		loop {
			let cur = self.snap.load_full();
			let mut next = (*cur).clone();

			for (id, entry) in &entries {
				if next.contains_key(id) {
					return Err(RegistryError::DuplicateId {
						registry: self.name,
						id: id.to_string(),
					});
				}
				next.insert(id.clone(), Arc::clone(entry));
			}

			let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				tracing::debug!(registry = self.name, count = entries.len(), "registered entries");
				return Ok(entries.len());
			}
		}
	}

	#[inline]
	pub(crate) fn get(&self, id: &str) -> Option<Arc<T>> {
		self.snap.load().get(id).cloned()
	}

	#[inline]
	pub(crate) fn contains(&self, id: &str) -> bool {
		self.snap.load().contains_key(id)
	}

	pub(crate) fn snapshot(&self) -> Arc<Entries<T>> {
		self.snap.load_full()
	}

	pub(crate) fn values(&self) -> Vec<Arc<T>> {
		self.snap.load().values().cloned().collect()
	}

	pub(crate) fn len(&self) -> usize {
		self.snap.load().len()
	}
}
