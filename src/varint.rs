//! Compact, self-delimiting unsigned length framing.
//!
//! Every variable-length field inside a composite slot (a column qualifier or
//! a value slot, see [`crate::props`]) is prefixed with its byte length
//! encoded by this module, so a decoder can walk a concatenation of
//! `(len, bytes)` tuples without a record-level length.
//!
//! Values below 128 fit in a single byte with the top bit clear. Larger
//! values set the top bit of the first byte and pack the count of remaining
//! big-endian value bytes (1 to 8) into its low seven bits, for a maximum
//! frame of 9 bytes and a representable range of `[0, 2^64)`, comfortably
//! covering the `[0, 2^63)` this format is required to support.

use crate::err::CodecError;

const SINGLE_BYTE_MAX: u64 = 0x7F;
const MULTI_BYTE_FLAG: u8 = 0x80;

/// Returns the number of bytes the frame beginning with `first` occupies,
/// including `first` itself. Always in `[1, 9]`.
pub fn size(first: u8) -> usize {
	if first & MULTI_BYTE_FLAG == 0 {
		1
	} else {
		((first & !MULTI_BYTE_FLAG) as usize) + 2
	}
}

/// Appends the VarFrame encoding of `v` to `sink`.
pub fn write(v: u64, sink: &mut Vec<u8>) {
	if v <= SINGLE_BYTE_MAX {
		sink.push(v as u8);
		return;
	}
	let be = v.to_be_bytes();
	let leading_zero_bytes = (be.iter().take_while(|&&b| b == 0).count()).min(7);
	let value_bytes = &be[leading_zero_bytes..];
	debug_assert!(!value_bytes.is_empty() && value_bytes.len() <= 8);
	sink.push(MULTI_BYTE_FLAG | (value_bytes.len() as u8 - 1));
	sink.extend_from_slice(value_bytes);
}

/// Encodes `v` as a standalone `Vec<u8>`.
pub fn encode(v: u64) -> Vec<u8> {
	let mut out = Vec::with_capacity(1);
	write(v, &mut out);
	out
}

/// Reads a VarFrame starting at `buf[pos]`, returning the decoded value and
/// the number of bytes consumed (always equal to `size(buf[pos])`).
///
/// Errors if `pos` is out of bounds or the frame would read past the end of
/// `buf`.
pub fn read_from(buf: &[u8], pos: usize) -> Result<(u64, usize), CodecError> {
	let first = *buf
		.get(pos)
		.ok_or_else(|| CodecError::corrupt("varint", "truncated length prefix"))?;
	let n = size(first);
	if pos + n > buf.len() {
		return Err(CodecError::corrupt(
			"varint",
			"length prefix declares more bytes than remain in the buffer",
		));
	}
	if first & MULTI_BYTE_FLAG == 0 {
		return Ok((first as u64, 1));
	}
	let mut v: u64 = 0;
	for &b in &buf[pos + 1..pos + n] {
		v = (v << 8) | b as u64;
	}
	Ok((v, n))
}
