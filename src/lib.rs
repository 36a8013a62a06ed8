//! Credential-token lifecycle engine. Margin-shifted expiry policy, single-flight refreshes,
//! pluggable local/shared stores, and change notifications in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod error;
pub mod fetch;
pub mod gate;
#[cfg(feature = "reqwest")] pub mod http;
pub mod notify;
pub mod obs;
pub mod steward;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures shared by the integration tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// self
	use crate::{
		auth::{AppId, Credential, TokenKind},
		fetch::{FetchError, FetchFuture, FetchRequest, FetchedToken, TokenFetcher},
		steward::Steward,
		store::LocalStore,
	};

	/// Builds the credential fixture shared across integration tests.
	pub fn test_credential() -> Credential {
		let app_id = AppId::new("wx-test-app").expect("Test app identifier should be valid.");

		Credential::new(app_id, "test-secret")
	}

	/// Scripted [`TokenFetcher`] that pops pre-seeded outcomes in FIFO order and records
	/// every request it receives.
	#[derive(Debug, Default)]
	pub struct ScriptedFetcher {
		responses: Mutex<VecDeque<Result<FetchedToken, FetchError>>>,
		requests: Mutex<Vec<(TokenKind, Option<String>)>>,
	}
	impl ScriptedFetcher {
		/// Queues a successful fetch outcome.
		pub fn push_ok(&self, value: &str, expires_in: Duration) {
			self.responses.lock().push_back(Ok(FetchedToken {
				value: value.to_owned(),
				expires_in,
			}));
		}

		/// Queues a failed fetch outcome.
		pub fn push_err(&self, error: FetchError) {
			self.responses.lock().push_back(Err(error));
		}

		/// Returns how many times the remote authority has been contacted.
		pub fn calls(&self) -> usize {
			self.requests.lock().len()
		}

		/// Returns every `(kind, bearer)` request observed so far, in arrival order.
		pub fn requests(&self) -> Vec<(TokenKind, Option<String>)> {
			self.requests.lock().clone()
		}
	}
	impl TokenFetcher for ScriptedFetcher {
		fn fetch(&self, request: FetchRequest) -> FetchFuture<'_> {
			self.requests.lock().push((request.kind, request.access_token.map(str::to_owned)));

			let next = self.responses.lock().pop_front();

			Box::pin(async move { next.unwrap_or(Err(FetchError::EmptyToken)) })
		}
	}

	/// Constructs a [`Steward`] over a [`LocalStore`] and a [`ScriptedFetcher`], handing
	/// back the collaborators for direct inspection.
	pub fn build_local_test_steward(
		ticket_enabled: bool,
	) -> (Steward, Arc<ScriptedFetcher>, Arc<LocalStore>) {
		let fetcher = Arc::new(ScriptedFetcher::default());
		let store = Arc::new(LocalStore::default());
		let mut steward = Steward::new(test_credential(), store.clone(), fetcher.clone());

		if ticket_enabled {
			steward = steward.enable_ticket();
		}

		(steward, fetcher, store)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(not(test), not(feature = "reqwest")))] use serde_json as _;
#[cfg(test)] use {color_eyre as _, httpmock as _, token_steward as _, tokio as _};
