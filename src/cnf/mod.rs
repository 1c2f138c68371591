use once_cell::sync::Lazy;

/// The reserved byte that separates segments in a composite edge row key.
///
/// This is a wire format detail shared by every encoder and decoder in a
/// deployment, not a policy knob, so unlike the tunables below it is a plain
/// `const` rather than something read from the environment.
pub const DELIMITER_BYTE: u8 = 0x00;

/// The byte used to introduce an escape sequence in [`DELIMITER_BYTE`]-delimited
/// row keys. Fixed for the same reason as [`DELIMITER_BYTE`].
pub const ESCAPE_BYTE: u8 = 0x01;

/// Width, in bytes, of the fixed-width stable hash prepended to row keys by
/// [`crate::key::edge::HashPrefixedLayout`].
///
/// If the environment variable is not present or cannot be parsed, a default
/// value of 8 bytes is used.
pub static HASH_PREFIX_WIDTH: Lazy<usize> =
	lazy_env_parse!("GRAPH_KV_CODEC_HASH_PREFIX_WIDTH", usize, 8);

/// Fixed seeds for the [`crate::key::edge::HashPrefixedLayout`] hasher.
///
/// Wire format details, not policy knobs: every encoder and decoder sharing a
/// deployment must agree on them, so (like [`DELIMITER_BYTE`]) they are
/// `const`s rather than environment-tunable.
pub const HASH_SEEDS: (u64, u64, u64, u64) =
	(0x5A17_3C9E_D041_7B2F, 0x9E37_79B9_7F4A_7C15, 0xC2B2_AE3D_27D4_EB4F, 0x1656_67B1_9E37_79F9);
