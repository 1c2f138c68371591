//! The serializer traits schema `TypeDefinition`s bind to, and the reference
//! implementations this crate ships for the worked examples and property
//! tests (§4.6 of the design).
//!
//! This is the Rust-native replacement for the source's reflection-driven
//! `can_handle(Class)` dispatch (§9): a `TypeDefinition` is constructed with
//! an already-bound `Arc<dyn PropertySerializer>`, so no type inspection
//! happens at codec time.

use crate::err::CodecError;
use crate::value::{Value, VertexId};

/// Converts a vertex identity to and from bytes. Implementations MUST
/// preserve natural order: if `a < b`, then `serialize(a) < serialize(b)`
/// lexicographically, since the backing store's key order depends on it.
pub trait VertexSerializer: std::fmt::Debug + Send + Sync {
	/// Serializes a vertex identity to its natural-order-preserving byte form.
	fn serialize(&self, vertex: &VertexId) -> Result<Vec<u8>, CodecError>;
	/// Deserializes bytes previously produced by [`Self::serialize`].
	fn deserialize(&self, bytes: &[u8]) -> Result<VertexId, CodecError>;
}

/// Converts a property value to and from bytes for one schema-declared type.
/// Unlike [`VertexSerializer`], order preservation is not required.
pub trait PropertySerializer: std::fmt::Debug + Send + Sync {
	/// Serializes a present, non-null value.
	fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError>;
	/// Deserializes a non-empty byte slice back into a value.
	fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError>;
	/// The sentinel bytes written when a declared property's value is absent
	/// or explicitly null. May be empty; the choice is serializer-defined.
	fn serialize_null(&self) -> Vec<u8>;
	/// The value materialized when a zero-length frame is read back and the
	/// serializer does not want [`Self::deserialize`] called on an empty
	/// slice (see §4.4.6).
	fn deserialize_empty(&self) -> Value;
}

/// Serializes a [`VertexId::Str`] as its raw UTF-8 bytes.
///
/// Order-preserving because byte-wise comparison of valid UTF-8 agrees with
/// comparison of the underlying Unicode scalar sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8VertexSerializer;

impl VertexSerializer for Utf8VertexSerializer {
	fn serialize(&self, vertex: &VertexId) -> Result<Vec<u8>, CodecError> {
		match vertex {
			VertexId::Str(s) => Ok(s.as_bytes().to_vec()),
			other => Err(CodecError::SerializationFailed {
				name: "vertex".into(),
				cause: format!("Utf8VertexSerializer cannot handle {other:?}"),
			}),
		}
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<VertexId, CodecError> {
		std::str::from_utf8(bytes)
			.map(|s| VertexId::Str(s.to_owned()))
			.map_err(|e| CodecError::SerializationFailed {
				name: "vertex".into(),
				cause: e.to_string(),
			})
	}
}

/// Serializes a [`VertexId::U64`] as 8 big-endian bytes.
///
/// Order-preserving because big-endian unsigned encoding agrees with numeric
/// order byte-for-byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct BigEndianU64VertexSerializer;

impl VertexSerializer for BigEndianU64VertexSerializer {
	fn serialize(&self, vertex: &VertexId) -> Result<Vec<u8>, CodecError> {
		match vertex {
			VertexId::U64(v) => Ok(v.to_be_bytes().to_vec()),
			other => Err(CodecError::SerializationFailed {
				name: "vertex".into(),
				cause: format!("BigEndianU64VertexSerializer cannot handle {other:?}"),
			}),
		}
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<VertexId, CodecError> {
		let arr: [u8; 8] = bytes.try_into().map_err(|_| CodecError::SerializationFailed {
			name: "vertex".into(),
			cause: format!("expected 8 bytes, got {}", bytes.len()),
		})?;
		Ok(VertexId::U64(u64::from_be_bytes(arr)))
	}
}

/// Serializes a [`Value::I32`] as 4 big-endian bytes, matching the `since`
/// property in the worked examples.
#[derive(Debug, Default, Clone, Copy)]
pub struct I32Serializer;

impl PropertySerializer for I32Serializer {
	fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
		match value {
			Value::I32(v) => Ok(v.to_be_bytes().to_vec()),
			other => Err(CodecError::SerializationFailed {
				name: "i32".into(),
				cause: format!("I32Serializer cannot handle {other:?}"),
			}),
		}
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError> {
		let arr: [u8; 4] = bytes.try_into().map_err(|_| CodecError::SerializationFailed {
			name: "i32".into(),
			cause: format!("expected 4 bytes, got {}", bytes.len()),
		})?;
		Ok(Value::I32(i32::from_be_bytes(arr)))
	}

	fn serialize_null(&self) -> Vec<u8> {
		Vec::new()
	}

	fn deserialize_empty(&self) -> Value {
		Value::Null
	}
}

/// Serializes a [`Value::F64`] as 8 big-endian bytes (IEEE-754), matching the
/// `weight` property in the worked examples.
#[derive(Debug, Default, Clone, Copy)]
pub struct F64Serializer;

impl PropertySerializer for F64Serializer {
	fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
		match value {
			Value::F64(v) => Ok(v.to_be_bytes().to_vec()),
			other => Err(CodecError::SerializationFailed {
				name: "f64".into(),
				cause: format!("F64Serializer cannot handle {other:?}"),
			}),
		}
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError> {
		let arr: [u8; 8] = bytes.try_into().map_err(|_| CodecError::SerializationFailed {
			name: "f64".into(),
			cause: format!("expected 8 bytes, got {}", bytes.len()),
		})?;
		Ok(Value::F64(f64::from_be_bytes(arr)))
	}

	fn serialize_null(&self) -> Vec<u8> {
		Vec::new()
	}

	fn deserialize_empty(&self) -> Value {
		Value::Null
	}
}

/// Serializes a [`Value::I64`], used for explicit `timestamp_property`
/// values, as 8 big-endian bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct I64Serializer;

impl PropertySerializer for I64Serializer {
	fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
		match value {
			Value::I64(v) => Ok(v.to_be_bytes().to_vec()),
			other => Err(CodecError::SerializationFailed {
				name: "i64".into(),
				cause: format!("I64Serializer cannot handle {other:?}"),
			}),
		}
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError> {
		let arr: [u8; 8] = bytes.try_into().map_err(|_| CodecError::SerializationFailed {
			name: "i64".into(),
			cause: format!("expected 8 bytes, got {}", bytes.len()),
		})?;
		Ok(Value::I64(i64::from_be_bytes(arr)))
	}

	fn serialize_null(&self) -> Vec<u8> {
		Vec::new()
	}

	fn deserialize_empty(&self) -> Value {
		Value::Null
	}
}

/// Serializes a [`Value::Str`] as raw UTF-8 bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringSerializer;

impl PropertySerializer for StringSerializer {
	fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
		match value {
			Value::Str(s) => Ok(s.as_bytes().to_vec()),
			other => Err(CodecError::SerializationFailed {
				name: "string".into(),
				cause: format!("StringSerializer cannot handle {other:?}"),
			}),
		}
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError> {
		std::str::from_utf8(bytes).map(|s| Value::Str(s.to_owned())).map_err(|e| {
			CodecError::SerializationFailed {
				name: "string".into(),
				cause: e.to_string(),
			}
		})
	}

	fn serialize_null(&self) -> Vec<u8> {
		Vec::new()
	}

	fn deserialize_empty(&self) -> Value {
		Value::Str(String::new())
	}
}

/// Serializes a [`Value::Bytes`] by passing it through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct BytesSerializer;

impl PropertySerializer for BytesSerializer {
	fn serialize(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
		match value {
			Value::Bytes(b) => Ok(b.clone()),
			other => Err(CodecError::SerializationFailed {
				name: "bytes".into(),
				cause: format!("BytesSerializer cannot handle {other:?}"),
			}),
		}
	}

	fn deserialize(&self, bytes: &[u8]) -> Result<Value, CodecError> {
		Ok(Value::Bytes(bytes.to_vec()))
	}

	fn serialize_null(&self) -> Vec<u8> {
		Vec::new()
	}

	fn deserialize_empty(&self) -> Value {
		Value::Bytes(Vec::new())
	}
}
