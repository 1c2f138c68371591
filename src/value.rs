//! The concrete property and vertex-identity value types this codec ships
//! reference serializers for (§4.6 of the design).
//!
//! A production deployment can use any type it likes for vertex identities or
//! property values, as long as it provides a [`crate::schema::ser::VertexSerializer`]
//! or [`crate::schema::ser::PropertySerializer`] for it; these two enums are
//! simply the types the worked examples and the test suite exercise.

/// A vertex identity. Order-preserving serializers are supplied per variant
/// by [`crate::schema::ser::Utf8VertexSerializer`] and
/// [`crate::schema::ser::BigEndianU64VertexSerializer`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VertexId {
	/// A UTF-8 string identity, e.g. `"a"` in the worked examples.
	Str(String),
	/// A 64-bit unsigned integer identity.
	U64(u64),
	/// An arbitrary byte-string identity, for callers with their own
	/// pre-serialized keys.
	Bytes(Vec<u8>),
}

impl From<&str> for VertexId {
	fn from(s: &str) -> Self {
		VertexId::Str(s.to_owned())
	}
}

impl From<String> for VertexId {
	fn from(s: String) -> Self {
		VertexId::Str(s)
	}
}

impl From<u64> for VertexId {
	fn from(v: u64) -> Self {
		VertexId::U64(v)
	}
}

impl From<Vec<u8>> for VertexId {
	fn from(v: Vec<u8>) -> Self {
		VertexId::Bytes(v)
	}
}

/// A property value. `Null` is a value explicitly present in a
/// [`crate::element::Properties`] map; a property name simply absent from
/// the map is a different thing entirely (see §4.3's null vs. absent
/// distinction).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// An explicit null, distinct from the property being absent.
	Null,
	/// A 32-bit signed integer, e.g. `since` in the worked examples.
	I32(i32),
	/// A 64-bit signed integer, used for explicit `timestamp_property` values.
	I64(i64),
	/// A 64-bit IEEE-754 double, e.g. `weight` in the worked examples.
	F64(f64),
	/// A UTF-8 string.
	Str(String),
	/// Raw, serializer-defined bytes.
	Bytes(Vec<u8>),
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::I32(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::I64(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::F64(v)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(s.to_owned())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(s)
	}
}

impl From<Vec<u8>> for Value {
	fn from(v: Vec<u8>) -> Self {
		Value::Bytes(v)
	}
}
