//! Single-flight gates guarding each token kind's refresh path.
//!
//! A gate is a non-blocking, try-once mutual-exclusion primitive: at most one holder at a
//! time, no fairness guarantee, and a failed acquisition is expected steady-state behavior
//! rather than an error. The in-process [`AtomicGate`] backs the local storage strategy;
//! deployments on the shared strategy implement [`RefreshGate`] over their distributed
//! lock's try-lock/unlock primitives so only one process across the fleet refreshes at a
//! time.

// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::_prelude::*;

/// Boxed future returned by [`RefreshGate`] operations.
///
/// Gate operations are infallible by contract: a distributed backing that cannot reach its
/// lock service must report `false` from [`RefreshGate::try_acquire`] and treat
/// [`RefreshGate::release`] as best-effort, never raise.
pub type GateFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Try-once mutual-exclusion contract for refresh single-flighting.
pub trait RefreshGate
where
	Self: Send + Sync,
{
	/// Attempts to acquire the gate without blocking; `false` means a refresh is already in
	/// flight and the caller should fall back to the last stored value.
	fn try_acquire(&self) -> GateFuture<'_, bool>;

	/// Releases the gate. Must be called by the acquirer on every refresh exit path and
	/// only by the acquirer; releasing one kind's gate must never touch another kind's.
	fn release(&self) -> GateFuture<'_, ()>;
}

/// In-process gate backed by an atomic compare-and-set flag.
#[derive(Debug, Default)]
pub struct AtomicGate(AtomicBool);
impl AtomicGate {
	/// Creates a released gate.
	pub fn new() -> Self {
		Self::default()
	}

	fn try_acquire_now(&self) -> bool {
		self.0.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok()
	}

	fn release_now(&self) {
		self.0.store(false, Ordering::Release);
	}
}
impl RefreshGate for AtomicGate {
	fn try_acquire(&self) -> GateFuture<'_, bool> {
		let acquired = self.try_acquire_now();

		Box::pin(async move { acquired })
	}

	fn release(&self) -> GateFuture<'_, ()> {
		self.release_now();

		Box::pin(async {})
	}
}
