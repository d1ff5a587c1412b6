use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A shared, type-erased payload.
///
/// Used for var roots and for mappings that are neither vars nor types.
/// Equality is identity.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self(Arc::new(value))
	}

	/// Borrows the payload as `T` if that is its concrete type.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.0.downcast_ref()
	}

	#[inline]
	pub fn ptr_eq(a: &Self, b: &Self) -> bool {
		Arc::ptr_eq(&a.0, &b.0)
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		Self::ptr_eq(self, other)
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Value({:p})", Arc::as_ptr(&self.0))
	}
}
