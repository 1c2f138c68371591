//! The read-only configuration that drives every layout decision made by
//! [`crate::codec::ElemCodec`] and [`crate::props`].
//!
//! A [`Schema`] is built once through [`SchemaBuilder`], validated at
//! `build()` time, and then shared read-only for the lifetime of the store
//! (§3 of the design: "The Schema is created once, frozen, and shared").
//! This replaces the source's shared-mutable schema-via-reference pattern
//! (§9): once `build()` succeeds there is no path back to a mutable view.

pub mod ser;

use std::collections::HashMap;
use std::sync::Arc;

use crate::err::CodecError;
pub use ser::{PropertySerializer, VertexSerializer};

/// A single property's schema-bound serializer.
#[derive(Clone)]
pub struct TypeDefinition {
	serializer: Arc<dyn PropertySerializer>,
}

impl std::fmt::Debug for TypeDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeDefinition").field("serializer", &"<dyn PropertySerializer>").finish()
	}
}

impl TypeDefinition {
	/// Binds a property to a serializer.
	pub fn new(serializer: impl PropertySerializer + 'static) -> Self {
		Self {
			serializer: Arc::new(serializer),
		}
	}

	/// Returns the bound serializer.
	pub fn serializer(&self) -> &dyn PropertySerializer {
		self.serializer.as_ref()
	}
}

/// The declared shape of one group: its properties in schema order, the
/// ordered subset placed in the column qualifier, and the per-property type
/// bindings.
#[derive(Debug, Clone, Default)]
pub struct SchemaElementDefinition {
	/// All declared properties, in the order they are serialized into the
	/// value slot (minus whatever is carved out for group_by/visibility/
	/// timestamp).
	pub properties: Vec<String>,
	/// The ordered subset of `properties` placed in the column qualifier.
	pub group_by: Vec<String>,
	/// Per-property serializer bindings.
	pub types: HashMap<String, TypeDefinition>,
}

impl SchemaElementDefinition {
	/// Starts a definition with no properties.
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares a property in schema order and binds its type.
	pub fn with_property(mut self, name: impl Into<String>, type_def: TypeDefinition) -> Self {
		let name = name.into();
		self.properties.push(name.clone());
		self.types.insert(name, type_def);
		self
	}

	/// Marks the trailing-declared property as part of `group_by`. Declares
	/// group_by membership in the order this is called, which must match the
	/// column-qualifier order.
	pub fn group_by(mut self, name: impl Into<String>) -> Self {
		self.group_by.push(name.into());
		self
	}

	/// Returns this group's properties that belong to neither `group_by`
	/// nor the schema's `visibility_property`/`timestamp_property`, in
	/// schema-declared order — the set and order serialized into the value
	/// slot (§4.4.1).
	pub fn value_slot_properties<'a>(
		&'a self,
		visibility_property: Option<&str>,
		timestamp_property: Option<&str>,
	) -> Vec<&'a str> {
		self.properties
			.iter()
			.map(String::as_str)
			.filter(|p| !self.group_by.iter().any(|g| g == p))
			.filter(|p| visibility_property != Some(*p))
			.filter(|p| timestamp_property != Some(*p))
			.collect()
	}
}

/// The immutable, schema-wide configuration shared by every call into this
/// crate's codec (§3).
#[derive(Clone)]
pub struct Schema {
	vertex_serializer: Arc<dyn VertexSerializer>,
	visibility_property: Option<String>,
	timestamp_property: Option<String>,
	groups: HashMap<String, SchemaElementDefinition>,
}

impl std::fmt::Debug for Schema {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Schema")
			.field("visibility_property", &self.visibility_property)
			.field("timestamp_property", &self.timestamp_property)
			.field("groups", &self.groups.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl Schema {
	/// Returns the group definition named `group`, if declared.
	pub fn group(&self, group: &str) -> Option<&SchemaElementDefinition> {
		self.groups.get(group)
	}

	/// The schema-wide vertex identity serializer.
	pub fn vertex_serializer(&self) -> &dyn VertexSerializer {
		self.vertex_serializer.as_ref()
	}

	/// The property name whose value is placed in the visibility slot, if any.
	pub fn visibility_property(&self) -> Option<&str> {
		self.visibility_property.as_deref()
	}

	/// The property name whose value is placed in the timestamp slot, if any.
	pub fn timestamp_property(&self) -> Option<&str> {
		self.timestamp_property.as_deref()
	}
}

/// A fallible, checked builder for [`Schema`] (§3.1 of the design).
///
/// Validation happens once, in [`Self::build`], rather than being re-checked
/// on every encode/decode call — matching the "frozen, shared" lifecycle
/// the design requires.
#[derive(Default)]
pub struct SchemaBuilder {
	vertex_serializer: Option<Arc<dyn VertexSerializer>>,
	visibility_property: Option<String>,
	timestamp_property: Option<String>,
	groups: HashMap<String, SchemaElementDefinition>,
}

impl std::fmt::Debug for SchemaBuilder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SchemaBuilder")
			.field("vertex_serializer", &self.vertex_serializer.is_some().then_some("<dyn VertexSerializer>"))
			.field("visibility_property", &self.visibility_property)
			.field("timestamp_property", &self.timestamp_property)
			.field("groups", &self.groups.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl SchemaBuilder {
	/// Starts a builder with the given schema-wide vertex serializer.
	pub fn new(vertex_serializer: impl VertexSerializer + 'static) -> Self {
		Self {
			vertex_serializer: Some(Arc::new(vertex_serializer)),
			..Default::default()
		}
	}

	/// Declares the property whose value is placed in the visibility slot.
	pub fn visibility_property(mut self, name: impl Into<String>) -> Self {
		self.visibility_property = Some(name.into());
		self
	}

	/// Declares the property whose value is placed in the timestamp slot.
	pub fn timestamp_property(mut self, name: impl Into<String>) -> Self {
		self.timestamp_property = Some(name.into());
		self
	}

	/// Registers a group's definition.
	pub fn group(mut self, name: impl Into<String>, def: SchemaElementDefinition) -> Self {
		self.groups.insert(name.into(), def);
		self
	}

	/// Validates and freezes the schema.
	///
	/// Returns [`CodecError::SchemaInvalid`] if `group_by` is not a subset of
	/// a group's declared properties, if a group's properties contain a
	/// duplicate name, or if the builder has no vertex serializer — this is
	/// the one place outside per-record encode/decode where the codec can
	/// fail before any record is touched.
	pub fn build(self) -> Result<Schema, CodecError> {
		let vertex_serializer = self
			.vertex_serializer
			.ok_or_else(|| CodecError::SchemaInvalid("no vertex serializer configured".into()))?;

		for (group, def) in &self.groups {
			let mut seen = std::collections::HashSet::new();
			for p in &def.properties {
				if !seen.insert(p.as_str()) {
					return Err(CodecError::SchemaInvalid(format!(
						"group `{group}` declares property `{p}` more than once"
					)));
				}
			}
			for g in &def.group_by {
				if !def.properties.iter().any(|p| p == g) {
					return Err(CodecError::SchemaInvalid(format!(
						"group `{group}` declares `{g}` in group_by but not in properties"
					)));
				}
			}
			for special in [&self.visibility_property, &self.timestamp_property].into_iter().flatten() {
				if def.types.contains_key(special) && !def.properties.iter().any(|p| p == special) {
					return Err(CodecError::SchemaInvalid(format!(
						"group `{group}` binds a serializer for `{special}` without declaring it in properties"
					)));
				}
			}
		}

		Ok(Schema {
			vertex_serializer,
			visibility_property: self.visibility_property,
			timestamp_property: self.timestamp_property,
			groups: self.groups,
		})
	}
}
