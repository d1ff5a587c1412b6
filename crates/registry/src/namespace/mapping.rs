use std::fmt;
use std::sync::Arc;

use lexis_primitives::{Class, Value};

use crate::var::Var;

/// What a symbol is bound to in a namespace's mapping table.
///
/// Equality is identity: two mappings are equal only if they hold the same var, the same
/// loaded type instance, or the same opaque payload.
#[derive(Clone)]
pub enum Mapping {
	Var(Arc<Var>),
	Class(Arc<Class>),
	Opaque(Value),
}

impl Mapping {
	pub fn as_var(&self) -> Option<&Arc<Var>> {
		match self {
			Self::Var(var) => Some(var),
			_ => None,
		}
	}

	pub fn as_class(&self) -> Option<&Arc<Class>> {
		match self {
			Self::Class(class) => Some(class),
			_ => None,
		}
	}

	pub fn into_var(self) -> Option<Arc<Var>> {
		match self {
			Self::Var(var) => Some(var),
			_ => None,
		}
	}

	/// Identity comparison.
	pub fn same_as(&self, other: &Mapping) -> bool {
		match (self, other) {
			(Self::Var(a), Self::Var(b)) => Arc::ptr_eq(a, b),
			(Self::Class(a), Self::Class(b)) => a.same_instance(b),
			(Self::Opaque(a), Self::Opaque(b)) => Value::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl PartialEq for Mapping {
	fn eq(&self, other: &Self) -> bool {
		self.same_as(other)
	}
}

impl From<Arc<Var>> for Mapping {
	fn from(var: Arc<Var>) -> Self {
		Self::Var(var)
	}
}

impl From<Arc<Class>> for Mapping {
	fn from(class: Arc<Class>) -> Self {
		Self::Class(class)
	}
}

impl From<Value> for Mapping {
	fn from(value: Value) -> Self {
		Self::Opaque(value)
	}
}

impl fmt::Display for Mapping {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Var(var) => fmt::Display::fmt(var, f),
			Self::Class(class) => fmt::Display::fmt(class, f),
			Self::Opaque(_) => f.write_str("#<opaque>"),
		}
	}
}

impl fmt::Debug for Mapping {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Var(var) => fmt::Debug::fmt(var, f),
			Self::Class(class) => fmt::Debug::fmt(class, f),
			Self::Opaque(value) => fmt::Debug::fmt(value, f),
		}
	}
}
