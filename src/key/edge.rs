//! The two [`super::RowKeyLayout`] implementations (§4.4.3, §4.5).
//!
//! Both lay a row out as `[hash D]? escape(A) D escape(B) D flags`, where the
//! hash segment is present only for [`HashPrefixedLayout`]. Decoding relies on
//! [`esc::split_raw`] rather than [`esc::split_on_delimiter`] because the
//! trailing flags segment is a single raw byte, never itself escaped.

use std::hash::Hasher;

use ahash::AHasher;

use super::Flags;
use crate::cnf::{HASH_PREFIX_WIDTH, HASH_SEEDS};
use crate::err::CodecError;
use crate::esc;

fn build_row(segments: &[&[u8]], flags: Flags) -> Vec<u8> {
	let mut row = Vec::new();
	for segment in segments {
		row.extend_from_slice(segment);
		row.push(0x00);
	}
	row.push(flags.as_byte());
	row
}

fn decode_segments<'a>(row: &'a [u8], expected: usize, what: &str) -> Result<Vec<&'a [u8]>, CodecError> {
	let segments = esc::split_raw(row);
	if segments.len() != expected {
		return Err(CodecError::corrupt(
			what,
			format!("expected {expected} delimited segments, found {}", segments.len()),
		));
	}
	Ok(segments)
}

fn decode_flags(segment: &[u8]) -> Result<Flags, CodecError> {
	match segment {
		[byte] => Flags::try_from_byte(*byte),
		other => Err(CodecError::corrupt("flags byte", format!("expected exactly 1 byte, found {}", other.len()))),
	}
}

/// The byte-ordered edge row-key layout: `escape(A) D escape(B) D flags`
/// (§4.4.3, "byte-ordered variant").
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteOrderedLayout;

impl super::RowKeyLayout for ByteOrderedLayout {
	fn encode_primary(&self, a: &[u8], b: &[u8], directed: bool) -> Vec<u8> {
		build_row(&[&esc::escape(a), &esc::escape(b)], Flags::new(true, directed))
	}

	fn encode_reverse(&self, a: &[u8], b: &[u8], directed: bool) -> Vec<u8> {
		build_row(&[&esc::escape(a), &esc::escape(b)], Flags::new(false, directed))
	}

	fn decode(&self, row: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Flags), CodecError> {
		let segments = decode_segments(row, 3, "edge row key")?;
		let a = esc::unescape(segments[0])?;
		let b = esc::unescape(segments[1])?;
		let flags = decode_flags(segments[2])?;
		Ok((a, b, flags))
	}
}

/// Computes the fixed-width, order-agnostic stable hash
/// [`HashPrefixedLayout`] prepends to a row key.
///
/// Only the row's segment ordering drives range scans under this layout
/// (§4.4.3), so unlike [`crate::schema::ser::VertexSerializer`] this hash is
/// not required to be order-preserving; a fast non-cryptographic hash is
/// sufficient.
fn fixed_width_hash(escaped_a: &[u8]) -> Vec<u8> {
	let (seed0, seed1, _, _) = HASH_SEEDS;
	let mut hasher = AHasher::new_with_keys(seed0 as u128, seed1 as u128);
	hasher.write(escaped_a);
	let digest = hasher.finish().to_be_bytes();
	let width = *HASH_PREFIX_WIDTH;
	if width <= digest.len() {
		digest[digest.len() - width..].to_vec()
	} else {
		let mut out = vec![0u8; width - digest.len()];
		out.extend_from_slice(&digest);
		out
	}
}

/// The hash-prefixed edge row-key layout:
/// `escape(H(escape(A))) D escape(A) D escape(B) D flags` (§4.4.3,
/// "hash-prefixed variant").
///
/// The hash segment is escaped before being placed in the row like any other
/// segment: the spec's abstract schema does not say so explicitly, but an
/// unescaped hash can legally contain `0x00` bytes, which would otherwise
/// corrupt the row's delimiter-based segmentation.
#[derive(Debug, Default, Clone, Copy)]
pub struct HashPrefixedLayout;

impl super::RowKeyLayout for HashPrefixedLayout {
	fn encode_primary(&self, a: &[u8], b: &[u8], directed: bool) -> Vec<u8> {
		let escaped_a = esc::escape(a);
		let hash = esc::escape(&fixed_width_hash(&escaped_a));
		build_row(&[&hash, &escaped_a, &esc::escape(b)], Flags::new(true, directed))
	}

	fn encode_reverse(&self, a: &[u8], b: &[u8], directed: bool) -> Vec<u8> {
		let escaped_a = esc::escape(a);
		let hash = esc::escape(&fixed_width_hash(&escaped_a));
		build_row(&[&hash, &escaped_a, &esc::escape(b)], Flags::new(false, directed))
	}

	fn decode(&self, row: &[u8]) -> Result<(Vec<u8>, Vec<u8>, Flags), CodecError> {
		let segments = decode_segments(row, 4, "edge row key")?;
		// segments[0] is the hash prefix; it carries no information not
		// already recoverable from `a`, so it is discarded rather than
		// verified.
		let a = esc::unescape(segments[1])?;
		let b = esc::unescape(segments[2])?;
		let flags = decode_flags(segments[3])?;
		Ok((a, b, flags))
	}
}
