//! Row-key construction for the two element kinds this codec knows about.
//!
//! ```text
//! crate::key::entity::encode            escape(vertex_bytes)
//! crate::key::edge (byte-ordered)       escape(A) D escape(B) D flags
//! crate::key::edge (hash-prefixed)      escape(hash) D escape(A) D escape(B) D flags
//! ```
//!
//! An entity's row key is just its escaped vertex bytes (§4.4.2): no
//! delimiter ever appears in it, which is exactly how a decoder tells an
//! entity row apart from an edge row (§4.4.4). An edge's row key is built by
//! one of two interchangeable [`RowKeyLayout`] strategies (§4.4.3, §4.5);
//! which one a deployment uses is chosen once, at [`crate::codec::ElemCodec`]
//! construction, replacing the source's abstract-base-class-with-two-
//! subclasses pattern (§9) with a strategy object.

pub mod debug;
pub mod edge;
pub mod entity;

pub use edge::{ByteOrderedLayout, HashPrefixedLayout};

use crate::err::CodecError;

/// What a row-key's trailing flags byte packs: which of the two row
/// representations this is (source-then-destination "primary", or
/// destination-then-source "reverse"), and whether the edge is directed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Flags {
	/// Undirected edge, keyed source-then-destination.
	UndirectedPrimary = 0x01,
	/// Undirected edge, keyed destination-then-source.
	UndirectedReverse = 0x02,
	/// Directed edge, keyed source-then-destination.
	DirectedPrimary = 0x03,
	/// Directed edge, keyed destination-then-source.
	DirectedReverse = 0x04,
}

impl Flags {
	/// Picks the flags value for the given primary/reverse and directed/
	/// undirected combination.
	pub fn new(primary: bool, directed: bool) -> Self {
		match (primary, directed) {
			(true, false) => Flags::UndirectedPrimary,
			(false, false) => Flags::UndirectedReverse,
			(true, true) => Flags::DirectedPrimary,
			(false, true) => Flags::DirectedReverse,
		}
	}

	/// Whether this is the source-then-destination record.
	pub fn is_primary(self) -> bool {
		matches!(self, Flags::UndirectedPrimary | Flags::DirectedPrimary)
	}

	/// Whether the edge this flags byte describes is directed.
	pub fn is_directed(self) -> bool {
		matches!(self, Flags::DirectedPrimary | Flags::DirectedReverse)
	}

	/// The single byte this flags value encodes to.
	pub fn as_byte(self) -> u8 {
		self as u8
	}

	/// Parses a flags byte previously produced by [`Self::as_byte`].
	pub fn try_from_byte(b: u8) -> Result<Self, CodecError> {
		match b {
			0x01 => Ok(Flags::UndirectedPrimary),
			0x02 => Ok(Flags::UndirectedReverse),
			0x03 => Ok(Flags::DirectedPrimary),
			0x04 => Ok(Flags::DirectedReverse),
			other => Err(CodecError::corrupt("flags byte", format!("invalid flags byte 0x{other:02x}"))),
		}
	}
}

/// The strategy interface for edge row-key layouts (§4.4.3, §9's redesign
/// flag for the source's abstract-base-class-with-two-subclasses pattern).
///
/// `a`/`b` passed to the encode methods are the *raw* (pre-escape) serialized
/// vertex bytes; implementations are responsible for escaping them. For the
/// primary record `a = source, b = destination`; for the reverse record
/// `a = destination, b = source`.
pub trait RowKeyLayout: std::fmt::Debug + Send + Sync {
	/// Builds the primary (source-then-destination) row key.
	fn encode_primary(&self, a: &[u8], b: &[u8], directed: bool) -> Vec<u8>;
	/// Builds the reverse (destination-then-source) row key.
	fn encode_reverse(&self, a: &[u8], b: &[u8], directed: bool) -> Vec<u8>;
	/// Inverts either [`Self::encode_primary`] or [`Self::encode_reverse`],
	/// returning the two unescaped vertex byte strings in the order they
	/// were encoded (`a` then `b`) along with the parsed [`Flags`].
	fn decode(&self, row: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Flags), CodecError>;
}
