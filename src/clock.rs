//! The injectable wall-clock capability used to timestamp records.
//!
//! Encoding an element whose group declares no `timestamp_property` falls
//! back to the current time (§4.4.1 of the design — the only source of
//! non-determinism in an otherwise pure encode). Rather than call
//! `SystemTime::now()` directly from [`crate::codec::ElemCodec`], the clock is
//! a capability injected at construction, so tests can pin it.

/// A source of the current wall-clock time, in milliseconds since the Unix
/// epoch.
pub trait Clock: std::fmt::Debug + Send + Sync {
	/// Returns the current time in milliseconds since the Unix epoch.
	fn now_millis(&self) -> i64;
}

/// The production clock, backed by [`std::time::SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now_millis(&self) -> i64 {
		use std::time::{SystemTime, UNIX_EPOCH};
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("system clock is before the Unix epoch")
			.as_millis() as i64
	}
}

/// A clock that always returns the same value. Used in tests so that encode
/// is fully deterministic.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
	fn now_millis(&self) -> i64 {
		self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fixed_clock_is_stable() {
		let clock = FixedClock(1_700_000_000_000);
		assert_eq!(clock.now_millis(), 1_700_000_000_000);
		assert_eq!(clock.now_millis(), clock.now_millis());
	}

	#[test]
	fn system_clock_is_plausibly_recent() {
		let clock = SystemClock;
		assert!(clock.now_millis() > 1_700_000_000_000);
	}
}
