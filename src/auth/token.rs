//! Token kinds, secret wrappers, and cached-token freshness helpers.

// self
use crate::_prelude::*;

/// Fixed buffer subtracted from the authority's stated expiry so refreshes happen before the
/// token truly expires. Callers racing past a stale-but-margin-covered token can keep using
/// the previous value while a single refresh is in flight.
pub const SAFETY_MARGIN: Duration = Duration::seconds(100);

/// The two independent token kinds the steward maintains per credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
	/// Primary short-lived credential required for privileged remote calls.
	AccessToken,
	/// Secondary derived credential, obtained with a valid access token.
	JsTicket,
}
impl TokenKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::AccessToken => "access_token",
			TokenKind::JsTicket => "js_ticket",
		}
	}

	/// Returns the shared-cache key prefix for this kind.
	pub const fn key_prefix(self) -> &'static str {
		match self {
			TokenKind::AccessToken => "accessToken",
			TokenKind::JsTicket => "jsApiTicket",
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// A stored token value together with its margin-shifted expiry instant.
///
/// Replaced wholesale on every successful refresh; readers never observe a half-written
/// token.
#[derive(Clone, Serialize, Deserialize)]
pub struct CachedToken {
	/// Token secret; callers must avoid logging it.
	pub value: TokenSecret,
	/// Expiry instant, already shifted earlier than the authority's true expiry.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds a cached token whose expiry is `expires_in` minus the safety margin from `now`.
	///
	/// An `expires_in` at or below the margin yields an expiry in the past, forcing the next
	/// caller to refresh immediately.
	pub fn issued_at(now: OffsetDateTime, value: impl Into<String>, expires_in: Duration) -> Self {
		Self { value: TokenSecret::new(value), expires_at: now + (expires_in - SAFETY_MARGIN) }
	}

	/// Returns `true` if the token is still usable at the provided instant.
	pub fn is_fresh_at(&self, instant: OffsetDateTime) -> bool {
		instant <= self.expires_at
	}

	/// Convenience helper that checks freshness against the current UTC instant.
	pub fn is_fresh(&self) -> bool {
		self.is_fresh_at(OffsetDateTime::now_utc())
	}
}
impl Debug for CachedToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedToken")
			.field("value", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
