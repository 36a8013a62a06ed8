//! Thread-safe in-memory [`TtlCache`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	cache::{CacheFuture, TtlCache},
};

type CacheMap = Arc<RwLock<HashMap<String, Entry>>>;

#[derive(Clone, Debug)]
struct Entry {
	value: String,
	expires_at: OffsetDateTime,
}

/// In-process TTL cache that expires entries lazily on read.
#[derive(Clone, Debug, Default)]
pub struct MemoryTtlCache(CacheMap);
impl MemoryTtlCache {
	fn get_now(map: &CacheMap, key: &str, now: OffsetDateTime) -> Option<String> {
		let guard = map.read();
		let entry = guard.get(key)?;

		if entry.expires_at <= now {
			return None;
		}

		Some(entry.value.clone())
	}

	fn set_now(map: &CacheMap, key: &str, value: &str, ttl: Duration, now: OffsetDateTime) {
		map.write().insert(
			key.to_owned(),
			Entry { value: value.to_owned(), expires_at: now + ttl },
		);
	}

	fn remaining_ttl_now(map: &CacheMap, key: &str, now: OffsetDateTime) -> Option<Duration> {
		let guard = map.read();
		let entry = guard.get(key)?;
		let remaining = entry.expires_at - now;

		if remaining.is_positive() { Some(remaining) } else { None }
	}
}
impl TtlCache for MemoryTtlCache {
	fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
		let value = Self::get_now(&self.0, key, OffsetDateTime::now_utc());

		Box::pin(async move { Ok(value) })
	}

	fn set<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> CacheFuture<'a, ()> {
		Self::set_now(&self.0, key, value, ttl, OffsetDateTime::now_utc());

		Box::pin(async { Ok(()) })
	}

	fn remaining_ttl<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<Duration>> {
		let remaining = Self::remaining_ttl_now(&self.0, key, OffsetDateTime::now_utc());

		Box::pin(async move { Ok(remaining) })
	}
}
