//! The single error type surfaced by every public entry point in this crate.
//!
//! No component recovers from an error internally; it is always returned to
//! the caller, who decides whether to skip or abort a batch. Panics are
//! reserved for invariant violations that indicate programmer error, such as
//! reaching a [`crate::schema::Schema`] that somehow escaped `build()`
//! validation.

use thiserror::Error;

/// Errors produced while encoding or decoding an element, a property list, or
/// a row key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
	/// Decoding encountered a column family whose group is not declared in
	/// the schema.
	#[error("unknown group `{0}`")]
	UnknownGroup(String),

	/// A schema-bound serializer failed to encode or decode a property value.
	#[error("serialization failed for property `{name}`: {cause}")]
	SerializationFailed {
		/// Name of the property whose serializer raised.
		name: String,
		/// The underlying serializer's error message.
		cause: String,
	},

	/// A length prefix, a row split, or a flags byte was inconsistent with
	/// the bytes that followed it.
	#[error("corrupt record ({where_}): {reason}")]
	CorruptRecord {
		/// Which part of the record was being read (e.g. `"column qualifier"`).
		where_: String,
		/// A short description of what was wrong.
		reason: String,
	},

	/// The element cannot be represented by this codec at all, e.g. a vertex
	/// whose identity is null.
	#[error("encoding unsupported: {0}")]
	EncodingUnsupported(String),

	/// [`crate::schema::SchemaBuilder::build`] rejected a malformed schema
	/// before any record was touched.
	#[error("invalid schema: {0}")]
	SchemaInvalid(String),
}

impl CodecError {
	pub(crate) fn corrupt(where_: impl Into<String>, reason: impl Into<String>) -> Self {
		CodecError::CorruptRecord {
			where_: where_.into(),
			reason: reason.into(),
		}
	}
}
