//! Refresh orchestration with single-flight gates, margin-aware freshness checks, and
//! change notifications.
//!
//! The steward exposes [`Steward::access_token`] and [`Steward::ticket`] so any number of
//! concurrent callers can request the current value without worrying about redundant
//! remote fetches. Each call checks the store's freshness policy, tries the kind's gate
//! without blocking, and either performs the one in-flight fetch or returns the last
//! stored value, which the safety margin guarantees is still contractually valid.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{Credential, TokenKind, TokenSecret},
	fetch::{FetchError, FetchRequest, TokenFetcher},
	gate::{AtomicGate, RefreshGate},
	notify::{ChangeListener, ChangeNotice, ListenerRegistry},
	obs::{self, RefreshOutcome, RefreshSpan},
	store::TokenStore,
};

/// Outcome of one gated refresh attempt. Callers of the public surface never see this;
/// contention resolves to serving the stored value, not to an observable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RefreshAttempt {
	/// This caller won the gate, fetched, persisted, and published a new value.
	Refreshed,
	/// Another refresh was already in flight; the stored value stays authoritative.
	Contended,
}

/// Coordinates the token lifecycle for a single credential.
///
/// The steward owns the single-flight gates and the listener registry; the storage
/// strategy and the remote fetch are pluggable collaborators. The orchestration algorithm
/// is written once against [`TokenStore`], so the local and shared strategies share every
/// code path.
pub struct Steward {
	credential: Credential,
	store: Arc<dyn TokenStore>,
	fetcher: Arc<dyn TokenFetcher>,
	// One independent gate per kind; releasing one must never touch the other.
	token_gate: Arc<dyn RefreshGate>,
	ticket_gate: Arc<dyn RefreshGate>,
	listeners: ListenerRegistry,
	ticket_enabled: bool,
	refresh_metrics: Arc<RefreshMetrics>,
}
impl Steward {
	/// Creates a steward over the provided storage strategy and fetch collaborator.
	///
	/// Both gates default to the in-process [`AtomicGate`]; deployments on the shared
	/// storage strategy should install distributed gates via [`Steward::with_gates`]. The
	/// ticket feature starts disabled.
	pub fn new(
		credential: Credential,
		store: Arc<dyn TokenStore>,
		fetcher: Arc<dyn TokenFetcher>,
	) -> Self {
		Self {
			credential,
			store,
			fetcher,
			token_gate: Arc::new(AtomicGate::new()),
			ticket_gate: Arc::new(AtomicGate::new()),
			listeners: ListenerRegistry::new(),
			ticket_enabled: false,
			refresh_metrics: Default::default(),
		}
	}

	/// Enables the secondary-ticket feature surface.
	pub fn enable_ticket(mut self) -> Self {
		self.ticket_enabled = true;

		self
	}

	/// Replaces both single-flight gates, one per token kind.
	///
	/// Shared-strategy deployments pass gates backed by a distributed try-lock here so at
	/// most one process across the fleet refreshes a kind at a time.
	pub fn with_gates(
		mut self,
		token_gate: Arc<dyn RefreshGate>,
		ticket_gate: Arc<dyn RefreshGate>,
	) -> Self {
		self.token_gate = token_gate;
		self.ticket_gate = ticket_gate;

		self
	}

	/// Returns the credential this steward serves.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// Returns `true` when the ticket feature surface is enabled.
	pub fn ticket_enabled(&self) -> bool {
		self.ticket_enabled
	}

	/// Returns the shared refresh counters.
	pub fn refresh_metrics(&self) -> &RefreshMetrics {
		&self.refresh_metrics
	}

	/// Registers a change listener; re-subscribing the same handle is a no-op.
	pub fn subscribe(&self, listener: Arc<dyn ChangeListener>) {
		self.listeners.subscribe(listener);
	}

	/// Removes a change listener; removing an unknown handle is a no-op.
	pub fn unsubscribe(&self, listener: &Arc<dyn ChangeListener>) {
		self.listeners.unsubscribe(listener);
	}

	/// Removes every registered change listener.
	pub fn unsubscribe_all(&self) {
		self.listeners.unsubscribe_all();
	}

	/// Performs the eager initial fetch, mirroring construction-time initialization.
	///
	/// Unlike [`Steward::access_token`], this surfaces fetch failures so deployments can
	/// fail fast on a rejected credential instead of serving
	/// [`Error::TokenUnavailable`](crate::error::Error::TokenUnavailable) later.
	pub async fn prime(&self) -> Result<()> {
		if self.store.needs_refresh(TokenKind::AccessToken).await {
			self.try_refresh(TokenKind::AccessToken, None).await?;
		}
		if self.ticket_enabled && self.store.needs_refresh(TokenKind::JsTicket).await {
			let bearer = self.serve(TokenKind::AccessToken, "prime").await?;

			self.try_refresh(TokenKind::JsTicket, Some(&bearer)).await?;
		}

		Ok(())
	}

	/// Returns the best currently-available access token.
	///
	/// Stale values trigger at most one synchronous refresh; callers racing a refresh that
	/// is already in flight get the previous value immediately, which the safety margin
	/// keeps contractually valid. Fetch failures are recovered the same way, so the only
	/// error a caller can observe is a cold start whose first fetch failed.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		self.serve(TokenKind::AccessToken, "access_token").await
	}

	/// Returns the best currently-available ticket; same contract as
	/// [`Steward::access_token`].
	///
	/// When the ticket feature is disabled this is a passthrough read that never triggers
	/// a remote fetch; callers should not invoke it in that configuration.
	pub async fn ticket(&self) -> Result<TokenSecret> {
		const KIND: TokenKind = TokenKind::JsTicket;

		if !self.ticket_enabled {
			return self.current_or_unavailable(KIND).await;
		}
		if self.store.needs_refresh(KIND).await {
			// A ticket fetch is itself a privileged call; secure a live access token first.
			if let Ok(bearer) = self.serve(TokenKind::AccessToken, "ticket").await {
				let span = RefreshSpan::new(KIND, "ticket");
				let _ = span.instrument(self.try_refresh(KIND, Some(&bearer))).await;
			}
		}

		self.current_or_unavailable(KIND).await
	}

	async fn serve(&self, kind: TokenKind, stage: &'static str) -> Result<TokenSecret> {
		if self.store.needs_refresh(kind).await {
			// Failures keep the previous value authoritative; the next eligible caller
			// retries. No automatic retry or backoff here.
			let span = RefreshSpan::new(kind, stage);
			let _ = span.instrument(self.try_refresh(kind, None)).await;
		}

		self.current_or_unavailable(kind).await
	}

	async fn current_or_unavailable(&self, kind: TokenKind) -> Result<TokenSecret> {
		self.store.current(kind).await.ok_or(Error::TokenUnavailable { kind })
	}

	/// Runs one gated refresh: acquire, fetch, persist, publish, release.
	async fn try_refresh(
		&self,
		kind: TokenKind,
		bearer: Option<&TokenSecret>,
	) -> Result<RefreshAttempt> {
		let gate = self.gate(kind);

		if !gate.try_acquire().await {
			// Expected steady-state contention, not a failure.
			self.refresh_metrics.record_contention();

			return Ok(RefreshAttempt::Contended);
		}

		obs::record_refresh_outcome(kind, RefreshOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let outcome = self.fetch_and_persist(kind, bearer).await;

		// Guaranteed release on every exit path, success or failure.
		gate.release().await;

		match &outcome {
			Ok(()) => {
				obs::record_refresh_outcome(kind, RefreshOutcome::Success);
				self.refresh_metrics.record_success();
			},
			Err(_) => {
				obs::record_refresh_outcome(kind, RefreshOutcome::Failure);
				self.refresh_metrics.record_failure();
			},
		}

		outcome.map(|()| RefreshAttempt::Refreshed)
	}

	async fn fetch_and_persist(&self, kind: TokenKind, bearer: Option<&TokenSecret>) -> Result<()> {
		let request = FetchRequest {
			credential: &self.credential,
			kind,
			access_token: bearer.map(TokenSecret::expose),
		};
		let fetched = self.fetcher.fetch(request).await?;

		// Persist-then-notify happens only after the value is confirmed non-empty; a
		// failed fetch must leave the previous token and expiry untouched.
		if fetched.value.is_empty() {
			return Err(FetchError::EmptyToken.into());
		}

		self.store.persist(kind, &fetched.value, fetched.expires_in).await;
		self.listeners.publish(&ChangeNotice {
			app_id: self.credential.app_id().clone(),
			kind,
			new_value: TokenSecret::new(fetched.value),
		});

		Ok(())
	}

	fn gate(&self, kind: TokenKind) -> &Arc<dyn RefreshGate> {
		match kind {
			TokenKind::AccessToken => &self.token_gate,
			TokenKind::JsTicket => &self.ticket_gate,
		}
	}
}
impl Debug for Steward {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Steward")
			.field("credential", &self.credential)
			.field("ticket_enabled", &self.ticket_enabled)
			.field("listeners", &self.listeners)
			.finish()
	}
}
