//! Shared/distributed [`TokenStore`] strategy over an external TTL-keyed cache.

// self
use crate::{
	_prelude::*,
	auth::{AppId, SAFETY_MARGIN, TokenKind, TokenSecret},
	cache::TtlCache,
	store::{StoreFuture, TokenStore},
};

type Snapshots = Arc<RwLock<HashMap<TokenKind, TokenSecret>>>;

/// Store backed by an external TTL-keyed cache, keyed `"<kindPrefix>_<appId>"`.
///
/// The safety margin is enforced on the read side: `persist` writes the authority's expiry
/// verbatim as the key's TTL, and a key counts as stale once its remaining TTL drops below
/// the margin. A fresh hit is reused directly, so not every process in the fleet has to
/// call the remote authority.
///
/// Cache faults never propagate: a failed read degrades to "absent" (forcing a refresh or
/// falling back to the last in-process snapshot), and a failed write leaves the snapshot as
/// the best available value. Deployments on this strategy must pair it with a distributed
/// [`RefreshGate`](crate::gate::RefreshGate) so only one process refreshes at a time.
pub struct SharedStore {
	cache: Arc<dyn TtlCache>,
	keys: HashMap<TokenKind, String>,
	snapshots: Snapshots,
}
impl SharedStore {
	/// Creates a store for the provided application identity over the given cache.
	pub fn new(app_id: &AppId, cache: Arc<dyn TtlCache>) -> Self {
		let keys = [TokenKind::AccessToken, TokenKind::JsTicket]
			.into_iter()
			.map(|kind| (kind, format!("{}_{}", kind.key_prefix(), app_id)))
			.collect();

		Self { cache, keys, snapshots: Snapshots::default() }
	}

	/// Returns the cache key used for the provided kind.
	pub fn key(&self, kind: TokenKind) -> &str {
		self.keys.get(&kind).map(String::as_str).unwrap_or_default()
	}

	fn snapshot(&self, kind: TokenKind) -> Option<TokenSecret> {
		self.snapshots.read().get(&kind).cloned()
	}

	fn remember(&self, kind: TokenKind, value: &str) {
		self.snapshots.write().insert(kind, TokenSecret::new(value));
	}
}
impl TokenStore for SharedStore {
	fn current(&self, kind: TokenKind) -> StoreFuture<'_, Option<TokenSecret>> {
		Box::pin(async move {
			match self.cache.get(self.key(kind)).await {
				Ok(Some(value)) => {
					self.remember(kind, &value);

					Some(TokenSecret::new(value))
				},
				// Unreachable or empty cache; serve the last value this process saw.
				Ok(None) | Err(_) => self.snapshot(kind),
			}
		})
	}

	fn needs_refresh(&self, kind: TokenKind) -> StoreFuture<'_, bool> {
		Box::pin(async move {
			let key = self.key(kind);
			let Ok(Some(value)) = self.cache.get(key).await else {
				return true;
			};
			let remaining = match self.cache.remaining_ttl(key).await {
				Ok(Some(remaining)) => remaining,
				Ok(None) | Err(_) => return true,
			};

			if remaining < SAFETY_MARGIN {
				return true;
			}

			// Cross-process reuse: another process already refreshed this key.
			self.remember(kind, &value);

			false
		})
	}

	fn persist<'a>(
		&'a self,
		kind: TokenKind,
		value: &'a str,
		expires_in: Duration,
	) -> StoreFuture<'a, ()> {
		// Snapshot first so `current` serves the new value even if the cache write fails.
		self.remember(kind, value);

		Box::pin(async move {
			if let Err(error) = self.cache.set(self.key(kind), value, expires_in).await {
				crate::obs::cache_write_failed(kind, &error);
			}
		})
	}
}
impl Debug for SharedStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SharedStore").field("keys", &self.keys).finish()
	}
}
