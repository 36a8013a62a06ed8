//! Remote token-fetch collaborator contract.
//!
//! The steward never builds HTTP requests itself; it hands a [`FetchRequest`] to whatever
//! [`TokenFetcher`] it was constructed with and only cares about the three facts in the
//! response: the token value, the authority-assigned expiry, and whether the authority
//! signalled an error. A reqwest-backed implementation ships behind the `reqwest` feature
//! (see [`crate::http`]).

// self
use crate::{
	_prelude::*,
	auth::{Credential, TokenKind},
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`TokenFetcher::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<FetchedToken, FetchError>> + 'a + Send>>;

/// Parameters for one remote fetch.
#[derive(Clone)]
pub struct FetchRequest<'a> {
	/// Credential identifying the remote principal.
	pub credential: &'a Credential,
	/// Which token kind to fetch.
	pub kind: TokenKind,
	/// Live access token; required by authorities whose ticket endpoint is itself a
	/// privileged call. Always present for [`TokenKind::JsTicket`] requests issued by the
	/// steward, absent for access-token requests.
	pub access_token: Option<&'a str>,
}
impl Debug for FetchRequest<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FetchRequest")
			.field("credential", &self.credential)
			.field("kind", &self.kind)
			.field("access_token", &self.access_token.map(|_| "<redacted>"))
			.finish()
	}
}

/// Successful authority response reduced to the two fields the steward needs.
#[derive(Clone, Debug)]
pub struct FetchedToken {
	/// Token value as issued by the authority.
	pub value: String,
	/// Authority-assigned validity window, unshifted.
	pub expires_in: Duration,
}

/// Contract for collaborators that perform the expensive, rate-limited remote call.
///
/// Failures must be distinguishable from success without panicking across the boundary;
/// the steward recovers every variant the same way (previous value stays authoritative),
/// so implementations should map timeouts and transport faults into [`FetchError`] rather
/// than retrying internally.
pub trait TokenFetcher
where
	Self: Send + Sync,
{
	/// Fetches a fresh token of the requested kind from the remote authority.
	fn fetch(&self, request: FetchRequest) -> FetchFuture<'_>;
}

/// Failure variants raised by the remote token-fetch collaborator.
///
/// The split exists so callers that do surface fetch errors (e.g. during
/// [`prime`](crate::steward::Steward::prime)) can tell a rejected credential from an
/// unreachable authority.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// The authority responded with an explicit error indicator.
	#[error("Authority rejected the token request: {code} {message}.")]
	Denied {
		/// Authority-assigned error code.
		code: i64,
		/// Authority-supplied error message.
		message: String,
	},
	/// The authority responded successfully but the token field was empty.
	#[error("Authority response carried an empty token value.")]
	EmptyToken,
	/// The remote call itself could not complete (DNS, TCP, TLS, timeout).
	#[error("Transport error occurred while calling the authority.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The authority responded with a body that could not be parsed.
	#[error("Authority returned a malformed response: {message}.")]
	Malformed {
		/// Human-readable parse failure, including the JSON path when available.
		message: String,
	},
}
impl FetchError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Transport { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for FetchError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn denied_error_carries_authority_code() {
		let error = FetchError::Denied { code: 40001, message: "invalid credential".into() };

		assert!(error.to_string().contains("40001"));
		assert!(error.to_string().contains("invalid credential"));
	}

	#[test]
	fn transport_error_preserves_source() {
		let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "deadline exceeded");
		let error = FetchError::transport(io);

		let source = std::error::Error::source(&error)
			.expect("Transport error should expose the underlying fault.");

		assert!(source.to_string().contains("deadline exceeded"));
	}
}
