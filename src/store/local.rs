//! Process-local [`TokenStore`] strategy with wall-clock, margin-shifted expiry.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, TokenKind, TokenSecret},
	store::{StoreFuture, TokenStore},
};

type Slots = Arc<RwLock<HashMap<TokenKind, CachedToken>>>;

/// In-process store scoped to this process only.
///
/// Each process refreshes independently; that is acceptable because each process also owns
/// its own single-flight gate. The safety margin is applied on the write side: `persist`
/// stores `now + (expires_in - margin)` as the expiry, so freshness is a plain wall-clock
/// compare.
#[derive(Clone, Debug, Default)]
pub struct LocalStore(Slots);
impl LocalStore {
	/// Creates an empty store; the first call for each kind will need a refresh.
	pub fn new() -> Self {
		Self::default()
	}

	fn current_now(slots: &Slots, kind: TokenKind) -> Option<TokenSecret> {
		slots.read().get(&kind).map(|token| token.value.clone())
	}

	fn needs_refresh_at(slots: &Slots, kind: TokenKind, now: OffsetDateTime) -> bool {
		slots.read().get(&kind).is_none_or(|token| !token.is_fresh_at(now))
	}

	fn persist_at(
		slots: &Slots,
		kind: TokenKind,
		value: &str,
		expires_in: Duration,
		now: OffsetDateTime,
	) {
		// Single atomic replace; readers never observe a half-written token.
		slots.write().insert(kind, CachedToken::issued_at(now, value, expires_in));
	}
}
impl TokenStore for LocalStore {
	fn current(&self, kind: TokenKind) -> StoreFuture<'_, Option<TokenSecret>> {
		let value = Self::current_now(&self.0, kind);

		Box::pin(async move { value })
	}

	fn needs_refresh(&self, kind: TokenKind) -> StoreFuture<'_, bool> {
		let stale = Self::needs_refresh_at(&self.0, kind, OffsetDateTime::now_utc());

		Box::pin(async move { stale })
	}

	fn persist<'a>(
		&'a self,
		kind: TokenKind,
		value: &'a str,
		expires_in: Duration,
	) -> StoreFuture<'a, ()> {
		Self::persist_at(&self.0, kind, value, expires_in, OffsetDateTime::now_utc());

		Box::pin(async {})
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn absent_kind_always_needs_refresh() {
		let slots = Slots::default();
		let now = macros::datetime!(2025-03-01 00:00 UTC);

		assert!(LocalStore::needs_refresh_at(&slots, TokenKind::AccessToken, now));
		assert!(LocalStore::needs_refresh_at(&slots, TokenKind::JsTicket, now));
	}

	#[test]
	fn freshness_follows_the_margin_shifted_expiry() {
		let slots = Slots::default();
		let now = macros::datetime!(2025-03-01 00:00 UTC);

		LocalStore::persist_at(&slots, TokenKind::AccessToken, "T1", Duration::seconds(7_200), now);

		assert!(!LocalStore::needs_refresh_at(&slots, TokenKind::AccessToken, now));
		assert!(!LocalStore::needs_refresh_at(
			&slots,
			TokenKind::AccessToken,
			now + Duration::seconds(7_100)
		));
		assert!(LocalStore::needs_refresh_at(
			&slots,
			TokenKind::AccessToken,
			now + Duration::seconds(7_101)
		));
	}

	#[test]
	fn kinds_are_independent() {
		let slots = Slots::default();
		let now = macros::datetime!(2025-03-01 00:00 UTC);

		LocalStore::persist_at(&slots, TokenKind::AccessToken, "T1", Duration::seconds(7_200), now);

		assert!(LocalStore::needs_refresh_at(&slots, TokenKind::JsTicket, now));
		assert_eq!(LocalStore::current_now(&slots, TokenKind::JsTicket), None);
		assert_eq!(
			LocalStore::current_now(&slots, TokenKind::AccessToken).map(|v| v.expose().to_owned()),
			Some("T1".to_owned())
		);
	}

	#[test]
	fn short_expiry_forces_immediate_refresh() {
		let slots = Slots::default();
		let now = macros::datetime!(2025-03-01 00:00 UTC);

		LocalStore::persist_at(&slots, TokenKind::AccessToken, "T1", Duration::seconds(90), now);

		assert!(LocalStore::needs_refresh_at(
			&slots,
			TokenKind::AccessToken,
			now + Duration::seconds(1)
		));
	}
}
