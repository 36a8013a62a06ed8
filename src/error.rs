//! Steward-level error types shared across stores, gates, and fetchers.

// self
use crate::_prelude::*;

/// Steward-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical steward error exposed by public APIs.
///
/// Gate contention deliberately has no variant here: a failed non-blocking acquisition is
/// steady-state behavior, and callers of the steward receive the last stored value instead
/// of an error.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Remote authority fetch failure.
	#[error(transparent)]
	Fetch(#[from] crate::fetch::FetchError),
	/// Shared cache collaborator failure.
	#[error(transparent)]
	Cache(#[from] crate::cache::CacheError),
	/// Identifier validation failure.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),

	/// No token of the requested kind has ever been stored and the refresh attempt failed.
	#[error("No {kind} value is available yet; the initial fetch has not succeeded.")]
	TokenUnavailable {
		/// Token kind that could not be served.
		kind: crate::auth::TokenKind,
	},
}

#[cfg(test)]
mod tests {
	// std
	use std::error::Error as StdError;
	// self
	use super::*;
	use crate::fetch::FetchError;

	#[test]
	fn fetch_error_converts_into_steward_error_with_source() {
		let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline exceeded");
		let fetch_error = FetchError::transport(io);
		let steward_error: Error = fetch_error.into();

		assert!(matches!(steward_error, Error::Fetch(_)));

		let source = StdError::source(&steward_error)
			.expect("Steward error should expose the fetch error as its source.");

		assert!(source.to_string().contains("deadline exceeded"));
	}

	#[test]
	fn token_unavailable_names_the_kind() {
		let error = Error::TokenUnavailable { kind: crate::auth::TokenKind::JsTicket };

		assert!(error.to_string().contains("js_ticket"));
	}
}
