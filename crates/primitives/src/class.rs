use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// A loaded type, identified by its fully-qualified name and its load instance.
///
/// Loading the same name twice yields two distinct instances, which is how
/// hot-reloaded types are told apart from their predecessors.
pub struct Class {
	name: Arc<str>,
	instance: u64,
}

impl Class {
	/// Loads a fresh instance of the type named `name` (e.g. `lexis.lang.String`).
	pub fn load(name: impl Into<Arc<str>>) -> Arc<Self> {
		Arc::new(Self {
			name: name.into(),
			instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
		})
	}

	/// Fully-qualified type name.
	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Name after the last `.` of the fully-qualified name.
	pub fn simple_name(&self) -> &str {
		match self.name.rfind('.') {
			Some(idx) => &self.name[idx + 1..],
			None => &self.name,
		}
	}

	/// Process-unique load instance number.
	#[inline]
	pub fn instance(&self) -> u64 {
		self.instance
	}

	/// Returns true if both handles denote the same loaded instance.
	#[inline]
	pub fn same_instance(&self, other: &Class) -> bool {
		self.instance == other.instance
	}

	/// Returns true if `other` names the same type but is a different load.
	pub fn is_reload_of(&self, other: &Class) -> bool {
		!self.same_instance(other) && self.name == other.name
	}
}

impl PartialEq for Class {
	fn eq(&self, other: &Self) -> bool {
		self.same_instance(other)
	}
}

impl Eq for Class {}

impl fmt::Display for Class {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

impl fmt::Debug for Class {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Class")
			.field("name", &self.name)
			.field("instance", &self.instance)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn simple_name_strips_package() {
		assert_eq!(Class::load("lexis.lang.String").simple_name(), "String");
		assert_eq!(Class::load("Bare").simple_name(), "Bare");
	}

	#[test]
	fn reloads_are_distinct_instances() {
		let first = Class::load("app.Widget");
		let second = Class::load("app.Widget");
		assert_ne!(*first, *second);
		assert!(second.is_reload_of(&first));
		assert!(!first.is_reload_of(&first));
		assert!(!Class::load("app.Gadget").is_reload_of(&first));
	}
}
