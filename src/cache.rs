//! Shared TTL-keyed cache collaborator contract used by the shared storage strategy.
//!
//! The steward does not manage the cache's connection lifecycle; it only issues get/set/ttl
//! calls and tolerates failures by treating them as "value absent". Production deployments
//! implement [`TtlCache`] over their distributed cache (any engine with per-key TTL works);
//! [`MemoryTtlCache`] serves local development and tests.

pub mod memory;

pub use memory::MemoryTtlCache;

// self
use crate::_prelude::*;

/// Boxed future returned by [`TtlCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// External key-value cache with per-key TTL semantics.
pub trait TtlCache
where
	Self: Send + Sync,
{
	/// Fetches the value stored under `key`, if present and not yet expired.
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>>;

	/// Stores `value` under `key` with the provided time-to-live.
	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> CacheFuture<'a, ()>;

	/// Returns the remaining time-to-live for `key`, or `None` when the key is absent or
	/// already expired.
	fn remaining_ttl<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<Duration>>;
}

/// Error type produced by [`TtlCache`] implementations.
///
/// The shared store degrades any of these to "value absent"; they only surface to callers
/// that talk to the cache collaborator directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Backend-level failure for the cache engine.
	#[error("Cache backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn cache_error_round_trips_through_serde() {
		let error = CacheError::Backend { message: "connection reset".into() };
		let payload = serde_json::to_string(&error).expect("Cache error should serialize.");
		let round_trip: CacheError =
			serde_json::from_str(&payload).expect("Cache error should deserialize.");

		assert_eq!(round_trip, error);
	}
}
