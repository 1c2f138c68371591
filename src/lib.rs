//! The element-to-key/value codec for a schema-driven graph storage engine.
//!
//! This crate turns vertices and edges into the sorted key/value records an
//! ordered backing store persists them as, and back. It is split into four
//! cooperating layers, leaves-first:
//!
//! - [`varint`] — compact self-delimiting unsigned length framing (`VarFrame`).
//! - [`esc`] — the byte-escape discipline that keeps delimited row keys safe.
//! - [`props`] — serializes/deserializes an ordered property list into a byte string.
//! - [`codec`] — composes the above with a [`schema::Schema`] to encode and decode
//!   whole [`element::Entity`]/[`element::Edge`] values as backing-store [`element::Record`]s.
//!
//! None of these layers perform I/O or hold mutable state once a [`schema::Schema`]
//! has been built; every public entry point is a pure function of its inputs.

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

#[doc(hidden)]
pub mod cnf;

pub mod clock;
pub mod codec;
pub mod element;
pub mod err;
pub mod esc;
pub mod key;
pub mod props;
pub mod schema;
pub mod value;
pub mod varint;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::ElemCodec;
pub use element::{Edge, Element, Entity, Properties, Record};
pub use err::CodecError;
pub use key::{Flags, RowKeyLayout};
pub use schema::{Schema, SchemaBuilder, SchemaElementDefinition, TypeDefinition};
pub use value::{Value, VertexId};
