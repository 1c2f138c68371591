//! The element data model: [`Entity`], [`Edge`], and the backing-store
//! [`Record`] they encode to (§3 of the design).

use std::collections::BTreeMap;

use crate::value::{Value, VertexId};

/// A `{name → value}` map. Map iteration order is irrelevant; serialization
/// order is always the schema's declared order, never this map's order
/// (§3: "Iteration order for serialization is the schema's declared order,
/// never the map's order").
pub type Properties = BTreeMap<String, Value>;

/// A vertex: a `group`, a `vertex` identity, and its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
	/// The schema-declared group this entity belongs to.
	pub group: String,
	/// The vertex identity.
	pub vertex: VertexId,
	/// This entity's properties.
	pub properties: Properties,
}

impl Entity {
	/// Constructs an entity with no properties set.
	pub fn new(group: impl Into<String>, vertex: impl Into<VertexId>) -> Self {
		Self {
			group: group.into(),
			vertex: vertex.into(),
			properties: Properties::new(),
		}
	}

	/// Sets a property, returning `self` for chaining.
	pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.properties.insert(name.into(), value.into());
		self
	}
}

/// A directed-or-undirected relationship between two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
	/// The schema-declared group this edge belongs to.
	pub group: String,
	/// The source vertex identity.
	pub source: VertexId,
	/// The destination vertex identity.
	pub destination: VertexId,
	/// Whether this edge is directed (source → destination) or undirected.
	pub directed: bool,
	/// This edge's properties.
	pub properties: Properties,
}

impl Edge {
	/// Constructs an edge with no properties set.
	pub fn new(
		group: impl Into<String>,
		source: impl Into<VertexId>,
		destination: impl Into<VertexId>,
		directed: bool,
	) -> Self {
		Self {
			group: group.into(),
			source: source.into(),
			destination: destination.into(),
			directed,
			properties: Properties::new(),
		}
	}

	/// Sets a property, returning `self` for chaining.
	pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.properties.insert(name.into(), value.into());
		self
	}

	/// An edge is a self-edge when its source and destination are the same
	/// vertex (§4.4.3's self-edge rule: only the primary record is emitted).
	pub fn is_self_edge(&self) -> bool {
		self.source == self.destination
	}
}

/// An Entity or an Edge, as decoded from a backing-store record.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
	/// A decoded vertex.
	Entity(Entity),
	/// A decoded edge.
	Edge(Edge),
}

/// One backing-store record: the five physical slots plus the row key.
///
/// An [`Entity`] encodes to exactly one [`Record`]; an [`Edge`] encodes to a
/// pair, the second of which is `None` for a self-edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	/// The row key. Sortable purely by byte comparison (§6).
	pub row_key: Vec<u8>,
	/// UTF-8 encoded group name.
	pub column_family: Vec<u8>,
	/// The group's `group_by` properties, framed by [`crate::props`].
	pub column_qualifier: Vec<u8>,
	/// The visibility property's serialized value, or empty.
	pub visibility: Vec<u8>,
	/// Milliseconds since the Unix epoch.
	pub timestamp: i64,
	/// The remaining properties, framed by [`crate::props`].
	pub value: Vec<u8>,
}
