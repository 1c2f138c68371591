//! The entity row-key layout: `escape(vertex_serializer(vertex))` (§4.4.2).

use crate::err::CodecError;
use crate::esc;

/// Builds an entity's row key from its already-serialized vertex bytes.
pub fn encode(vertex_bytes: &[u8]) -> Vec<u8> {
	esc::escape(vertex_bytes)
}

/// Recovers the raw (unescaped) vertex bytes from an entity row key.
///
/// Returns `None` if `row` contains an unescaped delimiter, in which case it
/// is an edge row, not an entity row (§4.4.4 step 1).
pub fn decode(row: &[u8]) -> Result<Option<Vec<u8>>, CodecError> {
	let segments = esc::split_raw(row);
	if segments.len() != 1 {
		return Ok(None);
	}
	Ok(Some(esc::unescape(segments[0])?))
}
