//! Storage strategy contracts and the built-in local/shared implementations.
//!
//! A [`TokenStore`] answers three questions for each token kind: what is the current value,
//! is it still fresh enough to use, and where does a freshly fetched value go. The refresh
//! orchestration in [`crate::steward`] is written once against this trait; [`LocalStore`]
//! and [`SharedStore`] plug in the process-local and distributed policies.

pub mod local;
pub mod shared;

pub use local::LocalStore;
pub use shared::SharedStore;

// self
use crate::{_prelude::*, auth::TokenKind};

/// Boxed future returned by [`TokenStore`] operations.
///
/// Store operations are infallible by contract: the shared strategy degrades cache faults
/// to "value absent"/"needs refresh" instead of surfacing them, so callers of the steward
/// never observe storage errors.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Storage strategy contract implemented by token stores.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current value for the kind, if any has ever been persisted.
	fn current(&self, kind: TokenKind) -> StoreFuture<'_, Option<crate::auth::TokenSecret>>;

	/// Returns `true` when the cached value is stale enough that a refresh should be
	/// attempted (absent values always need a refresh).
	fn needs_refresh(&self, kind: TokenKind) -> StoreFuture<'_, bool>;

	/// Persists a freshly fetched value with the authority-assigned, unshifted expiry.
	/// Where the safety margin is applied (write side or read side) is strategy-specific.
	fn persist<'a>(
		&'a self,
		kind: TokenKind,
		value: &'a str,
		expires_in: Duration,
	) -> StoreFuture<'a, ()>;
}
