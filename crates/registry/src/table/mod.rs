//! Copy-on-write name tables with atomic publication.
//!
//! # Purpose
//!
//! Every mutable table in the registry (a namespace's mappings, aliases and refers, and the
//! registry's own name index) is a [`NameTable`]. It provides the three primitive writes the
//! rest of the crate is built from: install-if-absent, replace-under-policy, and remove.
//!
//! # Mental model
//!
//! * Readers pin an `Arc` of the current immutable map and read from it. They never wait.
//! * Writers clone the pinned map, apply one change, and publish the result with CAS.
//! * A failed CAS means another writer published first; the writer re-reads and re-decides.
//!
//! # Invariants
//!
//! * A published map is never mutated (see `invariants::test_snapshot_stability`).
//! * Concurrent writes to distinct keys are never lost (see `invariants::test_no_lost_updates`).
//! * Concurrent installs of one key converge on a single value
//!   (see `invariants::test_install_converges`).
//! * Policy errors are returned as-is and never retried.
//!
//! # Concurrency & ordering
//!
//! * Reads are wait-free (`ArcSwap` load).
//! * Writes are lock-free: one CAS per attempt, unbounded retries under contention.
//! * There is one linearization point per successful write. No ordering holds across tables.

use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

/// Insertion-ordered map with the Fx hasher.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
/// Insertion-ordered set with the Fx hasher.
pub type FxIndexSet<K> = IndexSet<K, FxBuildHasher>;

/// Outcome of a policy decision on an occupied key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
	/// Overwrite the existing value with the incoming one.
	Replace,
	/// Leave the table untouched and hand back the existing value.
	KeepExisting,
}

/// What a successful write did to the table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertAction {
	/// Key was new; value inserted.
	InsertedNew,
	/// Key existed; kept the existing value.
	KeptExisting,
	/// Key existed; replaced with the new value.
	ReplacedExisting,
}

/// Atomically swappable immutable map with CAS retry writes.
pub struct NameTable<K, V> {
	cell: ArcSwap<FxIndexMap<K, V>>,
}

impl<K, V> NameTable<K, V>
where
	K: Eq + Hash + Clone,
	V: Clone,
{
	/// Creates an empty table.
	pub fn new() -> Self {
		Self::from_snapshot(Arc::new(FxIndexMap::default()))
	}

	/// Creates a table whose first published map is `map`.
	///
	/// The map is shared, not copied; tables seeded from one snapshot diverge on first write.
	pub fn from_snapshot(map: Arc<FxIndexMap<K, V>>) -> Self {
		Self {
			cell: ArcSwap::new(map),
		}
	}

	/// Returns the currently published map.
	#[inline]
	pub fn snapshot(&self) -> Arc<FxIndexMap<K, V>> {
		self.cell.load_full()
	}

	#[inline]
	pub fn get(&self, key: &K) -> Option<V> {
		self.cell.load().get(key).cloned()
	}

	#[inline]
	pub fn contains_key(&self, key: &K) -> bool {
		self.cell.load().contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.cell.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the value under `key`, installing one built by `factory` if absent.
	///
	/// The boolean is `true` when the returned value was already present. The factory runs at
	/// most once per call; a candidate that loses a race is dropped, so it must be a plain
	/// allocation with no side effects.
	pub fn get_or_install(&self, key: K, mut factory: impl FnMut() -> V) -> (V, bool) {
		let mut candidate: Option<V> = None;
		loop {
			let current = self.cell.load_full();
			if let Some(existing) = current.get(&key) {
				return (existing.clone(), true);
			}

			let value = match &candidate {
				Some(v) => v.clone(),
				None => {
					let v = factory();
					candidate = Some(v.clone());
					v
				}
			};

			let mut next = (*current).clone();
			next.insert(key.clone(), value.clone());
			if self.try_publish(&current, next) {
				return (value, false);
			}
		}
	}

	/// Writes `value` under `key`, consulting `policy` when the key is occupied.
	///
	/// `policy(existing, incoming)` runs on every attempt that finds the key present, against
	/// the value observed in that attempt. An `Err` aborts the write and is returned unchanged.
	pub fn replace<E>(
		&self,
		key: K,
		value: V,
		mut policy: impl FnMut(&V, &V) -> Result<Verdict, E>,
	) -> Result<(V, InsertAction), E> {
		loop {
			let current = self.cell.load_full();
			let action = match current.get(&key) {
				None => InsertAction::InsertedNew,
				Some(existing) => match policy(existing, &value)? {
					Verdict::KeepExisting => {
						return Ok((existing.clone(), InsertAction::KeptExisting));
					}
					Verdict::Replace => InsertAction::ReplacedExisting,
				},
			};

			let mut next = (*current).clone();
			next.insert(key.clone(), value.clone());
			if self.try_publish(&current, next) {
				return Ok((value, action));
			}
		}
	}

	/// Unconditionally writes `value` under `key`. Last writer wins.
	pub fn insert(&self, key: K, value: V) -> InsertAction {
		match self.replace(key, value, |_, _| Ok::<_, Infallible>(Verdict::Replace)) {
			Ok((_, action)) => action,
			Err(never) => match never {},
		}
	}

	/// Removes `key`, returning the value this call removed.
	///
	/// Returns `None` if the key was absent, including when a concurrent writer removed it first.
	pub fn remove(&self, key: &K) -> Option<V> {
		loop {
			let current = self.cell.load_full();
			let existing = current.get(key)?.clone();

			let mut next = (*current).clone();
			next.shift_remove(key);
			if self.try_publish(&current, next) {
				return Some(existing);
			}
		}
	}

	/// Publishes `next` if `current` is still the published map.
	fn try_publish(&self, current: &Arc<FxIndexMap<K, V>>, next: FxIndexMap<K, V>) -> bool {
		let prev = self.cell.compare_and_swap(current, Arc::new(next));
		Arc::ptr_eq(&prev, current)
	}
}

impl<K, V> Default for NameTable<K, V>
where
	K: Eq + Hash + Clone,
	V: Clone,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<K, V> fmt::Debug for NameTable<K, V>
where
	K: fmt::Debug,
	V: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.cell.load().iter()).finish()
	}
}

#[cfg(test)]
pub(crate) mod invariants;

#[cfg(test)]
mod tests;
