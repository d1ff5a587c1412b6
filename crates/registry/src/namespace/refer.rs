//! Refer declarations and their filters.
//!
//! A refer makes the unqualified names of a target namespace visible in the referring one.
//! [`ReferFilters`] is the loose form callers build; [`FilterSpec`] is the normalized,
//! immutable form stored in the refer table and consulted on every refer search.

use std::sync::Arc;

use lexis_primitives::Symbol;

use super::Namespace;
use crate::table::{FxIndexMap, FxIndexSet};

/// Raw filter description for [`Namespace::refer_ns`]. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferFilters {
	pub only: Option<Vec<Symbol>>,
	pub exclude: Option<Vec<Symbol>>,
	pub refer: Option<Refer>,
	/// `(source, local)` pairs: the target's `source` becomes visible as `local`.
	pub rename: Option<Vec<(Symbol, Symbol)>>,
}

/// The `refer` field of a filter: everything, or an explicit list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refer {
	All,
	Names(Vec<Symbol>),
}

impl ReferFilters {
	pub fn new() -> Self {
		Self::default()
	}

	/// Restricts visibility to `names`.
	pub fn only<S: Into<Symbol>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
		self.only
			.get_or_insert_with(Vec::new)
			.extend(names.into_iter().map(Into::into));
		self
	}

	/// Hides `names`.
	pub fn exclude<S: Into<Symbol>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
		self.exclude
			.get_or_insert_with(Vec::new)
			.extend(names.into_iter().map(Into::into));
		self
	}

	/// Makes every name of the target visible, apart from exclusions and renames.
	pub fn refer_all(mut self) -> Self {
		self.refer = Some(Refer::All);
		self
	}

	/// Adds `names` to the allow-list.
	pub fn refer<S: Into<Symbol>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
		let names = names.into_iter().map(Into::into);
		match &mut self.refer {
			Some(Refer::Names(existing)) => existing.extend(names),
			Some(Refer::All) => {}
			None => self.refer = Some(Refer::Names(names.collect())),
		}
		self
	}

	/// Presents the target's `source` under the local name `local`.
	pub fn rename(mut self, source: impl Into<Symbol>, local: impl Into<Symbol>) -> Self {
		self.rename
			.get_or_insert_with(Vec::new)
			.push((source.into(), local.into()));
		self
	}
}

/// Normalized `refer` selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferSelection {
	All,
	Names(FxIndexSet<Symbol>),
}

/// Immutable, normalized filter attached to one refer relationship.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSpec {
	only: FxIndexSet<Symbol>,
	exclude: FxIndexSet<Symbol>,
	refer: Option<ReferSelection>,
	/// Keyed by local name; the value is the target's source name.
	rename: FxIndexMap<Symbol, Symbol>,
	/// Source names that are only visible under their new local name.
	renamed_away: FxIndexSet<Symbol>,
	only_and_refer: FxIndexSet<Symbol>,
}

impl FilterSpec {
	/// A filter that lets every name through.
	pub fn unfiltered() -> Self {
		Self::default()
	}

	pub fn normalize(raw: ReferFilters) -> Self {
		let only: FxIndexSet<Symbol> = raw.only.unwrap_or_default().into_iter().collect();
		let exclude: FxIndexSet<Symbol> = raw.exclude.unwrap_or_default().into_iter().collect();
		let refer = raw.refer.map(|refer| match refer {
			Refer::All => ReferSelection::All,
			Refer::Names(names) => ReferSelection::Names(names.into_iter().collect()),
		});

		let mut only_and_refer = only.clone();
		if let Some(ReferSelection::Names(names)) = &refer {
			only_and_refer.extend(names.iter().cloned());
		}

		let mut rename = FxIndexMap::default();
		for (source, local) in raw.rename.unwrap_or_default() {
			rename.insert(local, source);
		}
		let renamed_away = rename
			.values()
			.filter(|source| !rename.contains_key(*source))
			.cloned()
			.collect();

		Self {
			only,
			exclude,
			refer,
			rename,
			renamed_away,
			only_and_refer,
		}
	}

	pub fn only(&self) -> &FxIndexSet<Symbol> {
		&self.only
	}

	pub fn exclude(&self) -> &FxIndexSet<Symbol> {
		&self.exclude
	}

	pub fn refer(&self) -> Option<&ReferSelection> {
		self.refer.as_ref()
	}

	/// `only ∪ refer`, precomputed.
	pub fn only_and_refer(&self) -> &FxIndexSet<Symbol> {
		&self.only_and_refer
	}

	/// Renames as `(source, local)` pairs.
	pub fn renames(&self) -> impl Iterator<Item = (&Symbol, &Symbol)> {
		self.rename.iter().map(|(local, source)| (source, local))
	}

	pub fn is_unfiltered(&self) -> bool {
		self.only.is_empty()
			&& self.exclude.is_empty()
			&& self.refer.is_none()
			&& self.rename.is_empty()
	}

	/// Decides whether `sym` is visible through this filter, and under which source name.
	///
	/// Evaluated in a fixed order: exclusion, then rename, then `refer: all`, then the
	/// `only ∪ refer` allow-list. Returns the name to resolve in the target namespace.
	pub fn select<'a>(&'a self, sym: &'a Symbol) -> Option<&'a Symbol> {
		if self.exclude.contains(sym) {
			return None;
		}
		if let Some(source) = self.rename.get(sym) {
			return Some(source);
		}
		if self.renamed_away.contains(sym) {
			return None;
		}
		if matches!(self.refer, Some(ReferSelection::All)) {
			return Some(sym);
		}
		if !self.only_and_refer.is_empty() && !self.only_and_refer.contains(sym) {
			return None;
		}
		Some(sym)
	}
}

impl Namespace {
	/// Declares that names of `target` are visible here, subject to `filters`.
	///
	/// Replaces any earlier declaration for the same target. Returns `self` for chaining.
	pub fn refer_ns(&self, target: &Arc<Namespace>, filters: ReferFilters) -> &Self {
		let spec = Arc::new(FilterSpec::normalize(filters));
		let action = self.refers.insert(target.clone(), spec);
		tracing::debug!(
			domain = "namespace",
			namespace = %self.name(),
			target = %target.name(),
			?action,
			"refer declared",
		);
		self
	}

	/// The filter installed for `target`, if this namespace refers it.
	pub fn refer_spec(&self, target: &Arc<Namespace>) -> Option<Arc<FilterSpec>> {
		self.refers.get(target)
	}
}
