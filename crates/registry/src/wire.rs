//! Namespace references across serialization boundaries.
//!
//! A namespace is serialized as its name only. Decoding never rebuilds a namespace: the name
//! is resolved through [`NamespaceRegistry::find_or_create`] of the receiving registry, so a
//! decoded reference is always that registry's canonical instance.

use std::sync::Arc;

use lexis_primitives::Symbol;
use serde::de::DeserializeSeed;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::namespace::Namespace;
use crate::registry::NamespaceRegistry;

#[derive(Debug, thiserror::Error)]
pub enum WireError {
	#[error("namespace reference codec error: {0}")]
	Codec(#[from] postcard::Error),

	/// The frame held more than one namespace name.
	#[error("{0} trailing bytes after namespace reference")]
	TrailingBytes(usize),
}

impl Serialize for Namespace {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.name().serialize(serializer)
	}
}

/// Deserializes a namespace reference into the canonical instance of a registry.
///
/// Usable inside larger payloads through [`DeserializeSeed`].
#[derive(Clone, Copy)]
pub struct NamespaceSeed<'a>(pub &'a NamespaceRegistry);

impl<'de> DeserializeSeed<'de> for NamespaceSeed<'_> {
	type Value = Arc<Namespace>;

	fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
		let name = Symbol::deserialize(deserializer)?;
		Ok(self.0.find_or_create(&name))
	}
}

/// Encodes a namespace reference with postcard.
pub fn encode(ns: &Namespace) -> Result<Vec<u8>, WireError> {
	Ok(postcard::to_allocvec(ns)?)
}

/// Decodes a namespace reference into `registry`'s instance for that name.
///
/// The frame must hold exactly one name. A rejected frame never creates a namespace.
pub fn decode(registry: &NamespaceRegistry, bytes: &[u8]) -> Result<Arc<Namespace>, WireError> {
	let (name, rest) = postcard::take_from_bytes::<Symbol>(bytes)?;
	if !rest.is_empty() {
		return Err(WireError::TrailingBytes(rest.len()));
	}
	Ok(registry.find_or_create(&name))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_canonicalizes_in_receiving_registry() {
		let sender = NamespaceRegistry::default();
		let receiver = NamespaceRegistry::default();
		let name = Symbol::intern("app.main");

		let original = sender.find_or_create(&name);
		let bytes = encode(&original).unwrap();

		let existing = receiver.find_or_create(&name);
		let decoded = decode(&receiver, &bytes).unwrap();
		assert!(Arc::ptr_eq(&decoded, &existing));
		assert!(!Arc::ptr_eq(&decoded, &original));

		let again = decode(&sender, &bytes).unwrap();
		assert!(Arc::ptr_eq(&again, &original));
	}

	#[test]
	fn test_decode_creates_unknown_namespace() {
		let sender = NamespaceRegistry::default();
		let receiver = NamespaceRegistry::default();
		let name = Symbol::intern("only.on.sender");

		let bytes = encode(&sender.find_or_create(&name)).unwrap();
		assert!(receiver.find(&name).is_none());

		let decoded = decode(&receiver, &bytes).unwrap();
		assert_eq!(decoded.name(), &name);
		assert!(Arc::ptr_eq(&decoded, &receiver.find(&name).unwrap()));
	}

	#[test]
	fn test_truncated_input_is_an_error() {
		let registry = NamespaceRegistry::default();
		let bytes = encode(registry.core()).unwrap();
		let err = decode(&registry, &bytes[..bytes.len() - 1]).unwrap_err();
		assert!(matches!(err, WireError::Codec(_)));
	}

	#[test]
	fn test_trailing_bytes_are_rejected() {
		let sender = NamespaceRegistry::default();
		let receiver = NamespaceRegistry::default();
		let name = Symbol::intern("padded.frame");

		let mut bytes = encode(&sender.find_or_create(&name)).unwrap();
		bytes.extend_from_slice(&[0x00, 0x2a]);

		let err = decode(&receiver, &bytes).unwrap_err();
		assert!(matches!(err, WireError::TrailingBytes(2)), "{err}");
		assert!(receiver.find(&name).is_none());
	}

	#[test]
	fn test_seed_resolves_inside_larger_payload() {
		let registry = NamespaceRegistry::default();
		let app = registry.find_or_create(&Symbol::intern("app"));

		let bytes = postcard::to_allocvec(&(app.as_ref(), 7_u8)).unwrap();
		let mut de = postcard::Deserializer::from_bytes(&bytes);
		let decoded = NamespaceSeed(&registry).deserialize(&mut de).unwrap();
		let tail = u8::deserialize(&mut de).unwrap();
		assert!(Arc::ptr_eq(&decoded, &app));
		assert_eq!(tail, 7);
	}
}
