//! Helpers for safely logging row keys, which may contain arbitrary
//! (including non-UTF-8) bytes.
//!
//! [`ElemCodec`](crate::codec::ElemCodec)'s `trace!`/`debug!` calls at the
//! encode/decode seams run this over every row key before it reaches a log
//! line, the same way the teacher's own key-logging helper is used
//! pervasively at its storage-engine transaction seams.

/// Converts a row key to an ASCII-escaped string, safe for logs and test
/// failure messages regardless of what bytes the key contains.
pub fn sprint<T>(key: &T) -> String
where
	T: AsRef<[u8]>,
{
	key.as_ref()
		.iter()
		.flat_map(|&byte| std::ascii::escape_default(byte))
		.map(|byte| byte as char)
		.collect::<String>()
}
