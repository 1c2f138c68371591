//! [`ElemCodec`]: the top-level element ↔ record codec (§4.4).
//!
//! Composes [`crate::varint`], [`crate::esc`], and [`crate::props`] with a
//! frozen [`Schema`], a [`RowKeyLayout`] strategy, and an injected [`Clock`]
//! to turn an [`Entity`]/[`Edge`] into backing-store [`Record`]s and back.

use crate::clock::Clock;
use crate::element::{Edge, Element, Entity, Properties, Record};
use crate::err::CodecError;
use crate::key::{self, Flags, RowKeyLayout};
use crate::props;
use crate::schema::{Schema, SchemaElementDefinition};
use crate::value::Value;

/// The element-to-record codec (§4.4 of the design).
///
/// Holds a [`Schema`], a boxed [`RowKeyLayout`] chosen once at construction
/// (§4.5, replacing the source's abstract-base-class-with-two-subclasses
/// pattern), and a boxed [`Clock`] (§5.1) so the only source of
/// non-determinism in `encode_entity`/`encode_edge` is explicit and
/// test-controllable.
pub struct ElemCodec {
	schema: Schema,
	layout: Box<dyn RowKeyLayout>,
	clock: Box<dyn Clock>,
}

impl std::fmt::Debug for ElemCodec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ElemCodec")
			.field("schema", &self.schema)
			.field("layout", &"<dyn RowKeyLayout>")
			.field("clock", &"<dyn Clock>")
			.finish()
	}
}

impl ElemCodec {
	/// Builds a codec over `schema`, using `layout` for edge row keys and
	/// `clock` as the fallback timestamp source.
	pub fn new(schema: Schema, layout: impl RowKeyLayout + 'static, clock: impl Clock + 'static) -> Self {
		Self {
			schema,
			layout: Box::new(layout),
			clock: Box::new(clock),
		}
	}

	fn group_def(&self, group: &str) -> Result<&SchemaElementDefinition, CodecError> {
		self.schema.group(group).ok_or_else(|| CodecError::UnknownGroup(group.to_string()))
	}

	/// Computes the four shared slots (column family, qualifier, visibility,
	/// timestamp) and the value slot for `group`/`props` (§4.4.1).
	fn encode_slots(
		&self,
		group: &str,
		props: &Properties,
	) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>, i64, Vec<u8>), CodecError> {
		let def = self.group_def(group)?;

		let column_family = group.as_bytes().to_vec();
		let column_qualifier = crate::props::serialize(def, &def.group_by, props)?;

		let visibility_property = self.schema.visibility_property();
		let visibility = match visibility_property.filter(|p| def.types.contains_key(*p)) {
			Some(name) => {
				let type_def = &def.types[name];
				match props.get(name) {
					Some(Value::Null) | None => type_def.serializer().serialize_null(),
					Some(v) => type_def.serializer().serialize(v)?,
				}
			}
			None => Vec::new(),
		};

		let timestamp_property = self.schema.timestamp_property();
		let timestamp = match timestamp_property.filter(|p| def.types.contains_key(*p)) {
			Some(name) => match props.get(name) {
				Some(Value::I64(v)) => *v,
				Some(other) => {
					return Err(CodecError::SerializationFailed {
						name: name.to_string(),
						cause: format!("timestamp property must be an i64, got {other:?}"),
					})
				}
				None => self.clock.now_millis(),
			},
			None => self.clock.now_millis(),
		};

		let value_names: Vec<String> = def
			.value_slot_properties(visibility_property, timestamp_property)
			.into_iter()
			.map(str::to_owned)
			.collect();
		let value = crate::props::serialize(def, &value_names, props)?;

		Ok((column_family, column_qualifier, visibility, timestamp, value))
	}

	/// Encodes an [`Entity`] into its single [`Record`] (§4.4.1, §4.4.2).
	pub fn encode_entity(&self, entity: &Entity) -> Result<Record, CodecError> {
		trace!(group = entity.group.as_str(), "encoding entity");
		let vertex_bytes = self.schema.vertex_serializer().serialize(&entity.vertex)?;
		let row_key = key::entity::encode(&vertex_bytes);
		trace!(group = entity.group.as_str(), row_key = %key::debug::sprint(&row_key), "entity row key built");
		let (column_family, column_qualifier, visibility, timestamp, value) =
			self.encode_slots(&entity.group, &entity.properties)?;
		Ok(Record {
			row_key,
			column_family,
			column_qualifier,
			visibility,
			timestamp,
			value,
		})
	}

	/// Encodes an [`Edge`] into its primary record and, unless it is a
	/// self-edge, its reverse record (§4.4.3).
	pub fn encode_edge(&self, edge: &Edge) -> Result<(Record, Option<Record>), CodecError> {
		trace!(group = edge.group.as_str(), directed = edge.directed, "encoding edge");
		let source_bytes = self.schema.vertex_serializer().serialize(&edge.source)?;
		let destination_bytes = self.schema.vertex_serializer().serialize(&edge.destination)?;

		let (column_family, column_qualifier, visibility, timestamp, value) =
			self.encode_slots(&edge.group, &edge.properties)?;

		let primary_key = self.layout.encode_primary(&source_bytes, &destination_bytes, edge.directed);
		trace!(group = edge.group.as_str(), row_key = %key::debug::sprint(&primary_key), "edge primary row key built");
		let primary = Record {
			row_key: primary_key,
			column_family: column_family.clone(),
			column_qualifier: column_qualifier.clone(),
			visibility: visibility.clone(),
			timestamp,
			value: value.clone(),
		};

		if edge.is_self_edge() {
			debug!(
				group = edge.group.as_str(),
				row_key = %key::debug::sprint(&primary.row_key),
				"self-edge; emitting primary record only"
			);
			return Ok((primary, None));
		}

		let reverse_key = self.layout.encode_reverse(&destination_bytes, &source_bytes, edge.directed);
		trace!(group = edge.group.as_str(), row_key = %key::debug::sprint(&reverse_key), "edge reverse row key built");
		let reverse = Record {
			row_key: reverse_key,
			column_family,
			column_qualifier,
			visibility,
			timestamp,
			value,
		};
		Ok((primary, Some(reverse)))
	}

	fn merge_shared_properties(
		&self,
		def: &SchemaElementDefinition,
		column_qualifier: &[u8],
		visibility: &[u8],
		timestamp: i64,
	) -> Result<Properties, CodecError> {
		let mut properties = props::deserialize(def, &def.group_by, column_qualifier)?;

		if let Some(name) = self.schema.visibility_property().filter(|p| def.types.contains_key(*p)) {
			let type_def = &def.types[name];
			let value = if visibility.is_empty() {
				type_def.serializer().deserialize_empty()
			} else {
				type_def.serializer().deserialize(visibility)?
			};
			properties.insert(name.to_string(), value);
		}

		if let Some(name) = self.schema.timestamp_property().filter(|p| def.types.contains_key(*p)) {
			properties.insert(name.to_string(), Value::I64(timestamp));
		}

		Ok(properties)
	}

	/// Decodes a backing-store record into an [`Element`] (§4.4.4).
	///
	/// `value` is `None` when the caller only has the row key, column family,
	/// qualifier, visibility and timestamp available (e.g. a key-only scan);
	/// in that case the properties normally carried in the value slot are
	/// simply absent from the result.
	pub fn decode(
		&self,
		row_key: &[u8],
		column_family: &[u8],
		column_qualifier: &[u8],
		visibility: &[u8],
		timestamp: i64,
		value: Option<&[u8]>,
	) -> Result<Element, CodecError> {
		let group = std::str::from_utf8(column_family)
			.map_err(|e| CodecError::corrupt("column family", e.to_string()))?
			.to_string();
		let def = self.group_def(&group)?;

		let mut properties = self.merge_shared_properties(def, column_qualifier, visibility, timestamp)?;
		if let Some(value) = value {
			let value_names: Vec<String> = def
				.value_slot_properties(self.schema.visibility_property(), self.schema.timestamp_property())
				.into_iter()
				.map(str::to_owned)
				.collect();
			properties.extend(props::deserialize(def, &value_names, value)?);
		}

		if let Some(vertex_bytes) = key::entity::decode(row_key)? {
			debug!(group = group.as_str(), row_key = %key::debug::sprint(row_key), "decoding entity row");
			let vertex = self.schema.vertex_serializer().deserialize(&vertex_bytes)?;
			return Ok(Element::Entity(Entity {
				group,
				vertex,
				properties,
			}));
		}

		debug!(group = group.as_str(), row_key = %key::debug::sprint(row_key), "decoding edge row");
		let (a, b, flags) = self.layout.decode(row_key)?;
		let a = self.schema.vertex_serializer().deserialize(&a)?;
		let b = self.schema.vertex_serializer().deserialize(&b)?;
		let (source, destination) = if flags.is_primary() { (a, b) } else { (b, a) };
		Ok(Element::Edge(Edge {
			group,
			source,
			destination,
			directed: flags.is_directed(),
			properties,
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::clock::FixedClock;
	use crate::key::ByteOrderedLayout;
	use crate::schema::ser::{F64Serializer, I32Serializer, Utf8VertexSerializer};
	use crate::schema::{SchemaBuilder, TypeDefinition};
	use crate::value::VertexId;
	use proptest::prelude::*;

	fn friend_schema() -> Schema {
		let friend = SchemaElementDefinition::new()
			.with_property("since", TypeDefinition::new(I32Serializer))
			.group_by("since")
			.with_property("weight", TypeDefinition::new(F64Serializer));
		SchemaBuilder::new(Utf8VertexSerializer).group("friend", friend).build().unwrap()
	}

	fn person_schema() -> Schema {
		SchemaBuilder::new(Utf8VertexSerializer)
			.group("person", SchemaElementDefinition::new())
			.build()
			.unwrap()
	}

	fn codec(schema: Schema) -> ElemCodec {
		ElemCodec::new(schema, ByteOrderedLayout, FixedClock(1_700_000_000_000))
	}

	// Scenario 1: entity encode, §8 worked example 1.
	#[test]
	fn worked_example_entity_encode() {
		let codec = codec(person_schema());
		let entity = Entity::new("person", "ab");
		let record = codec.encode_entity(&entity).unwrap();
		assert_eq!(record.row_key, vec![0x61, 0x62]);
		assert_eq!(record.column_family, b"person");
		assert!(record.column_qualifier.is_empty());
		assert!(record.value.is_empty());
	}

	// Scenario 2: directed edge, distinct endpoints, §8 worked example 2.
	#[test]
	fn worked_example_directed_edge() {
		let codec = codec(friend_schema());
		let edge = Edge::new("friend", "a", "b", true).with_property("since", 3i32).with_property("weight", 1.0f64);
		let (primary, reverse) = codec.encode_edge(&edge).unwrap();
		let reverse = reverse.expect("distinct endpoints must produce a reverse record");

		assert_eq!(primary.row_key, vec![0x61, 0x00, 0x62, 0x00, Flags::DirectedPrimary.as_byte()]);
		assert_eq!(reverse.row_key, vec![0x62, 0x00, 0x61, 0x00, Flags::DirectedReverse.as_byte()]);
		assert_eq!(primary.column_qualifier, vec![0x04, 0x00, 0x00, 0x00, 0x03]);
		assert_eq!(primary.value, vec![0x08, 0x3F, 0xF0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
		assert_eq!(primary.column_qualifier, reverse.column_qualifier);
		assert_eq!(primary.value, reverse.value);
	}

	// Scenario 3: self-edge, undirected, §8 worked example 3.
	#[test]
	fn worked_example_self_edge() {
		let codec = codec(friend_schema());
		let edge = Edge::new("friend", "a", "a", false).with_property("since", 1i32).with_property("weight", 0.0);
		let (primary, reverse) = codec.encode_edge(&edge).unwrap();
		assert_eq!(primary.row_key, vec![0x61, 0x00, 0x61, 0x00, Flags::UndirectedPrimary.as_byte()]);
		assert!(reverse.is_none());
	}

	// Scenario 4: vertex containing the delimiter, §8 worked example 4.
	#[test]
	fn worked_example_vertex_containing_delimiter() {
		let codec = codec(person_schema());
		let vertex = VertexId::Str("\u{0}".to_string());
		let entity = Entity::new("person", vertex.clone());
		let record = codec.encode_entity(&entity).unwrap();
		assert_eq!(record.row_key, vec![0x01, 0x01]);
		let decoded = codec
			.decode(&record.row_key, &record.column_family, &record.column_qualifier, &record.visibility, record.timestamp, Some(&record.value))
			.unwrap();
		assert_eq!(decoded, Element::Entity(Entity::new("person", vertex)));
	}

	#[test]
	fn round_trip_entity() {
		let codec = codec(person_schema());
		let entity = Entity::new("person", "alice");
		let record = codec.encode_entity(&entity).unwrap();
		let decoded = codec
			.decode(&record.row_key, &record.column_family, &record.column_qualifier, &record.visibility, record.timestamp, Some(&record.value))
			.unwrap();
		assert_eq!(decoded, Element::Entity(entity));
	}

	#[test]
	fn round_trip_edge_both_records() {
		let codec = codec(friend_schema());
		let edge = Edge::new("friend", "a", "b", true).with_property("since", 3i32).with_property("weight", 1.0);
		let (primary, reverse) = codec.encode_edge(&edge).unwrap();
		let reverse = reverse.unwrap();

		let decoded_primary = codec
			.decode(&primary.row_key, &primary.column_family, &primary.column_qualifier, &primary.visibility, primary.timestamp, Some(&primary.value))
			.unwrap();
		assert_eq!(decoded_primary, Element::Edge(edge.clone()));

		let decoded_reverse = codec
			.decode(&reverse.row_key, &reverse.column_family, &reverse.column_qualifier, &reverse.visibility, reverse.timestamp, Some(&reverse.value))
			.unwrap();
		assert_eq!(decoded_reverse, Element::Edge(edge));
	}

	#[test]
	fn timestamp_falls_back_to_injected_clock() {
		let codec = codec(person_schema());
		let record = codec.encode_entity(&Entity::new("person", "alice")).unwrap();
		assert_eq!(record.timestamp, 1_700_000_000_000);
	}

	#[test]
	fn unknown_group_errors() {
		let codec = codec(person_schema());
		let err = codec.encode_entity(&Entity::new("ghost", "alice")).unwrap_err();
		assert!(matches!(err, CodecError::UnknownGroup(_)));
	}

	proptest! {
		#[test]
		fn entity_round_trips_for_arbitrary_names(vertex in "[a-z]{1,12}") {
			let codec = codec(person_schema());
			let entity = Entity::new("person", vertex.as_str());
			let record = codec.encode_entity(&entity).unwrap();
			let decoded = codec
				.decode(&record.row_key, &record.column_family, &record.column_qualifier, &record.visibility, record.timestamp, Some(&record.value))
				.unwrap();
			prop_assert_eq!(decoded, Element::Entity(entity));
		}

		#[test]
		fn edge_self_edge_always_single_record(vertex in "[a-z]{1,12}", directed in any::<bool>()) {
			let codec = codec(friend_schema());
			let edge = Edge::new("friend", vertex.as_str(), vertex.as_str(), directed)
				.with_property("since", 1i32)
				.with_property("weight", 1.0);
			let (_, reverse) = codec.encode_edge(&edge).unwrap();
			prop_assert!(reverse.is_none());
		}

		#[test]
		fn vertex_order_preserving_in_entity_row_keys(a in "[a-m]{1,8}", b in "[n-z]{1,8}") {
			let codec = codec(person_schema());
			let ra = codec.encode_entity(&Entity::new("person", a.as_str())).unwrap();
			let rb = codec.encode_entity(&Entity::new("person", b.as_str())).unwrap();
			prop_assert!(ra.row_key < rb.row_key);
		}

		/// §8 universal property 2: for an arbitrary non-self edge, decoding
		/// either the primary or the reverse record reconstructs it, and the
		/// reverse record in particular yields the same source/destination/
		/// directed as the original (not swapped).
		#[test]
		fn edge_round_trips_for_arbitrary_distinct_vertices(
			source in "[a-z]{1,10}",
			destination in "[a-z]{1,10}",
			since in any::<i32>(),
			weight in -1.0e10f64..1.0e10f64,
			directed in any::<bool>(),
		) {
			prop_assume!(source != destination);
			let codec = codec(friend_schema());
			let edge = Edge::new("friend", source.as_str(), destination.as_str(), directed)
				.with_property("since", since)
				.with_property("weight", weight);
			let (primary, reverse) = codec.encode_edge(&edge).unwrap();
			let reverse = reverse.expect("distinct endpoints must produce a reverse record");

			let decoded_primary = codec
				.decode(&primary.row_key, &primary.column_family, &primary.column_qualifier, &primary.visibility, primary.timestamp, Some(&primary.value))
				.unwrap();
			prop_assert_eq!(decoded_primary, Element::Edge(edge.clone()));

			let decoded_reverse = codec
				.decode(&reverse.row_key, &reverse.column_family, &reverse.column_qualifier, &reverse.visibility, reverse.timestamp, Some(&reverse.value))
				.unwrap();
			match decoded_reverse {
				Element::Edge(e) => {
					prop_assert_eq!(e.source, edge.source);
					prop_assert_eq!(e.destination, edge.destination);
					prop_assert_eq!(e.directed, edge.directed);
				}
				other => prop_assert!(false, "expected an edge, got {other:?}"),
			}
		}
	}
}
