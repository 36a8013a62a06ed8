//! Optional observability helpers for refresh flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `token_steward.refresh` with the `kind`
//!   (token kind) and `stage` (call site) fields, plus a warning when a shared-cache write
//!   fails.
//! - Enable `metrics` to increment the `token_steward_refresh_total` counter for every
//!   attempt/success/failure, labeled by `kind` + `outcome`.
//!
//! Gate contention is steady-state behavior and is intentionally never recorded as a
//! failure by any of these helpers.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, auth::TokenKind, cache::CacheError};

/// Outcome labels recorded for each refresh attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// Entry to a gated refresh.
	Attempt,
	/// The fetched value was persisted and published.
	Success,
	/// The fetch failed and the previous value stays authoritative.
	Failure,
}
impl RefreshOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Attempt => "attempt",
			RefreshOutcome::Success => "success",
			RefreshOutcome::Failure => "failure",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Emits a warning for a failed shared-cache write (when `tracing` is enabled).
///
/// The write is best-effort by contract; the in-process snapshot still carries the value.
pub fn cache_write_failed(kind: TokenKind, error: &CacheError) {
	#[cfg(feature = "tracing")]
	{
		::tracing::warn!(kind = kind.as_str(), %error, "Shared cache write failed; keeping the in-process snapshot.");
	}

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, error);
	}
}
