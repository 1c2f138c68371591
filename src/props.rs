//! Serializes and deserializes an ordered property list into a single byte
//! string, as a concatenation of `VarFrame(len) ∥ raw_bytes` pairs.
//!
//! This underlies both the column-qualifier slot (serialized over a group's
//! `group_by` list) and the value slot (serialized over the properties that
//! are neither `group_by`, visibility, nor timestamp) — see
//! [`crate::codec::ElemCodec`] §4.4.1.

use crate::element::Properties;
use crate::err::CodecError;
use crate::schema::SchemaElementDefinition;
use crate::value::Value;
use crate::varint;

/// Serializes `names`, in the given order, out of `props` using the
/// serializers bound in `def`.
///
/// A declared `name` absent from `props` is serialized via its type's
/// [`crate::schema::PropertySerializer::serialize_null`]. A `name` with no
/// bound type in `def` (the schema loader let a group-by property through
/// without a serializer) is serialized as an empty frame and logged — the
/// non-fatal fallback documented in §4.4.6/§9 of the design.
pub fn serialize(
	def: &SchemaElementDefinition,
	names: &[String],
	props: &Properties,
) -> Result<Vec<u8>, CodecError> {
	let mut out = Vec::new();
	for name in names {
		let Some(type_def) = def.types.get(name) else {
			warn!(property = name.as_str(), "no serializer declared for property; emitting empty frame");
			varint::write(0, &mut out);
			continue;
		};
		let bytes = match props.get(name) {
			Some(Value::Null) | None => type_def.serializer().serialize_null(),
			Some(v) => type_def.serializer().serialize(v)?,
		};
		varint::write(bytes.len() as u64, &mut out);
		out.extend_from_slice(&bytes);
	}
	Ok(out)
}

/// Deserializes `bytes`, produced by [`serialize`], back into a [`Properties`]
/// map.
///
/// Stops as soon as either `names` is exhausted or the cursor reaches the end
/// of `bytes` — a byte string truncated after any complete `(len, bytes)`
/// pair is legal input and simply yields a strict prefix of the original
/// properties (§4.3's tail truncation tolerance).
pub fn deserialize(
	def: &SchemaElementDefinition,
	names: &[String],
	bytes: &[u8],
) -> Result<Properties, CodecError> {
	let mut out = Properties::new();
	let mut cursor = 0;
	for name in names {
		if cursor >= bytes.len() {
			break;
		}
		let (len, advance) = varint::read_from(bytes, cursor)?;
		cursor += advance;
		let len = len as usize;
		let end = cursor.checked_add(len).ok_or_else(|| {
			CodecError::corrupt("property value", "declared length overflows")
		})?;
		if end > bytes.len() {
			return Err(CodecError::corrupt(
				"property value",
				format!("declared length {len} exceeds {} remaining bytes", bytes.len() - cursor),
			));
		}
		let slice = &bytes[cursor..end];
		cursor = end;
		if let Some(type_def) = def.types.get(name) {
			let value = if len > 0 {
				type_def.serializer().deserialize(slice)?
			} else {
				type_def.serializer().deserialize_empty()
			};
			out.insert(name.clone(), value);
		}
	}
	Ok(out)
}

/// Returns the byte prefix of `bytes` covering exactly the first `k` framed
/// values, without decoding them.
///
/// Used when the backing store projects a subset of the column qualifier
/// (e.g. an aggregation scan over a `group_by` prefix) without paying for a
/// full decode. If `bytes` contains fewer than `k` complete frames (tail
/// truncation, or `k` at least the total count), the whole input is
/// returned.
pub fn prefix_bytes_for_first_k(bytes: &[u8], k: usize) -> Result<Vec<u8>, CodecError> {
	let mut cursor = 0;
	for _ in 0..k {
		if cursor >= bytes.len() {
			break;
		}
		let (len, advance) = varint::read_from(bytes, cursor)?;
		let end = cursor
			.checked_add(advance)
			.and_then(|c| c.checked_add(len as usize))
			.ok_or_else(|| CodecError::corrupt("column qualifier prefix", "declared length overflows"))?;
		if end > bytes.len() {
			return Err(CodecError::corrupt(
				"column qualifier prefix",
				"declared length exceeds remaining bytes",
			));
		}
		cursor = end;
	}
	Ok(bytes[..cursor].to_vec())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::ser::{BytesSerializer, F64Serializer, I32Serializer};
	use crate::schema::TypeDefinition;
	use proptest::prelude::*;
	use test_log::test;

	/// Builds a definition + name list + props map for `values.len()` raw
	/// byte-string properties named `p0, p1, ...`, each bound to
	/// [`BytesSerializer`] so the framed bytes are exactly the input values —
	/// used by the property-based tests below to generate arbitrary property
	/// lists rather than the fixed `since`/`weight` shape [`friend_def`] gives.
	fn bytes_def_names_props(values: &[Vec<u8>]) -> (SchemaElementDefinition, Vec<String>, Properties) {
		let mut def = SchemaElementDefinition::new();
		let mut names = Vec::new();
		let mut props = Properties::new();
		for (i, v) in values.iter().enumerate() {
			let name = format!("p{i}");
			def = def.with_property(name.clone(), TypeDefinition::new(BytesSerializer));
			props.insert(name.clone(), Value::Bytes(v.clone()));
			names.push(name);
		}
		(def, names, props)
	}

	fn friend_def() -> SchemaElementDefinition {
		SchemaElementDefinition::new()
			.with_property("since", TypeDefinition::new(I32Serializer))
			.group_by("since")
			.with_property("weight", TypeDefinition::new(F64Serializer))
	}

	#[test]
	fn serialize_worked_example() {
		let def = friend_def();
		let names = vec!["since".to_string()];
		let mut props = Properties::new();
		props.insert("since".into(), Value::I32(3));
		let cq = serialize(&def, &names, &props).unwrap();
		assert_eq!(cq, vec![0x04, 0x00, 0x00, 0x00, 0x03]);

		let names = vec!["weight".to_string()];
		let mut props = Properties::new();
		props.insert("weight".into(), Value::F64(1.0));
		let value = serialize(&def, &names, &props).unwrap();
		assert_eq!(value, vec![0x08, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
	}

	#[test]
	fn round_trip() {
		let def = friend_def();
		let names = vec!["since".to_string(), "weight".to_string()];
		let mut props = Properties::new();
		props.insert("since".into(), Value::I32(42));
		props.insert("weight".into(), Value::F64(2.5));
		let bytes = serialize(&def, &names, &props).unwrap();
		let decoded = deserialize(&def, &names, &bytes).unwrap();
		assert_eq!(decoded, props);
	}

	#[test]
	fn empty_input_round_trips_to_empty_properties() {
		let def = friend_def();
		let names = vec!["since".to_string(), "weight".to_string()];
		let decoded = deserialize(&def, &names, &[]).unwrap();
		assert!(decoded.is_empty());
	}

	#[test]
	fn absent_property_serializes_as_null_sentinel() {
		let def = friend_def();
		let names = vec!["since".to_string()];
		let props = Properties::new();
		let bytes = serialize(&def, &names, &props).unwrap();
		assert_eq!(bytes, vec![0x00]);
		let decoded = deserialize(&def, &names, &bytes).unwrap();
		assert_eq!(decoded.get("since"), Some(&Value::Null));
	}

	#[test]
	fn tail_truncation_yields_prefix() {
		let def = friend_def();
		let names = vec!["since".to_string(), "weight".to_string()];
		let mut props = Properties::new();
		props.insert("since".into(), Value::I32(42));
		props.insert("weight".into(), Value::F64(2.5));
		let bytes = serialize(&def, &names, &props).unwrap();
		let truncated = &bytes[..5]; // exactly the "since" frame
		let decoded = deserialize(&def, &names, truncated).unwrap();
		assert_eq!(decoded.len(), 1);
		assert_eq!(decoded.get("since"), Some(&Value::I32(42)));
	}

	#[test]
	fn missing_serializer_emits_empty_frame() {
		let def = SchemaElementDefinition::new().group_by("phantom");
		let names = vec!["phantom".to_string()];
		let props = Properties::new();
		let bytes = serialize(&def, &names, &props).unwrap();
		assert_eq!(bytes, vec![0x00]);
	}

	#[test]
	fn corrupt_length_errors() {
		let def = friend_def();
		let names = vec!["since".to_string()];
		let bytes = vec![0x7F]; // claims 127 bytes follow, none do
		assert!(deserialize(&def, &names, &bytes).is_err());
	}

	#[test]
	fn prefix_for_first_k() {
		let bytes = vec![0x02, b'a', b'b', 0x03, b'c', b'd', b'e', 0x04, b'f', b'g', b'h', b'i'];
		let prefix = prefix_bytes_for_first_k(&bytes, 2).unwrap();
		assert_eq!(prefix, bytes[..6]);
		let all = prefix_bytes_for_first_k(&bytes, 3).unwrap();
		assert_eq!(all, bytes);
		let unchanged = prefix_bytes_for_first_k(&bytes, 10).unwrap();
		assert_eq!(unchanged, bytes);
	}

	#[test]
	fn prefix_for_zero_k_is_empty() {
		let bytes = vec![0x02, b'a', b'b'];
		assert_eq!(prefix_bytes_for_first_k(&bytes, 0).unwrap(), Vec::<u8>::new());
	}

	proptest! {
		/// §8 universal property 5: for all property lists of length `n` and
		/// all `k <= n`, `prefix_bytes_for_first_k` equals serializing just
		/// the first `k` names.
		#[test]
		fn prefix_for_first_k_matches_serialize_of_first_k(
			values in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..8), 1..6),
			k_raw in any::<usize>(),
		) {
			let (def, names, props) = bytes_def_names_props(&values);
			let serialized = serialize(&def, &names, &props).unwrap();
			let k = k_raw % (names.len() + 1);

			let prefix = prefix_bytes_for_first_k(&serialized, k).unwrap();
			let expected = serialize(&def, &names[..k], &props).unwrap();
			prop_assert_eq!(prefix, expected);
		}

		/// §8 universal property 6: truncating after any complete `(len,
		/// bytes)` pair decodes to a strict prefix of the original
		/// properties; everything past the truncation point is absent.
		#[test]
		fn tail_truncation_yields_strict_prefix_of_properties(
			values in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..8), 1..6),
			k_raw in any::<usize>(),
		) {
			let (def, names, props) = bytes_def_names_props(&values);
			let serialized = serialize(&def, &names, &props).unwrap();
			let k = k_raw % (names.len() + 1);

			// A complete-frame-boundary truncation point, reusing the prefix
			// helper rather than re-deriving frame boundaries by hand.
			let truncated = prefix_bytes_for_first_k(&serialized, k).unwrap();
			let decoded = deserialize(&def, &names, &truncated).unwrap();

			prop_assert_eq!(decoded.len(), k);
			for name in &names[..k] {
				prop_assert_eq!(decoded.get(name), props.get(name));
			}
			for name in &names[k..] {
				prop_assert!(decoded.get(name).is_none());
			}
		}
	}
}
