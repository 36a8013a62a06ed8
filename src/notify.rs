//! Change-notification bus: an explicit, insertion-ordered listener list with synchronous
//! dispatch.
//!
//! The bus never catches a listener's panic; a failing listener is a caller-level concern
//! and cannot corrupt token state, which is persisted before any notice goes out.

// self
use crate::{
	_prelude::*,
	auth::{AppId, TokenKind, TokenSecret},
};

/// Notice emitted once per successful refresh; not retained after delivery.
#[derive(Clone, Serialize, Deserialize)]
pub struct ChangeNotice {
	/// Application identity whose token changed.
	pub app_id: AppId,
	/// Which token kind was replaced.
	pub kind: TokenKind,
	/// The freshly issued value.
	pub new_value: TokenSecret,
}
impl Debug for ChangeNotice {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ChangeNotice")
			.field("app_id", &self.app_id)
			.field("kind", &self.kind)
			.field("new_value", &"<redacted>")
			.finish()
	}
}

/// Callback interface invoked on the publisher's own thread of execution.
pub trait ChangeListener
where
	Self: Send + Sync,
{
	/// Receives a notice for each successful refresh.
	fn on_change(&self, notice: &ChangeNotice);
}

/// Insertion-ordered set of listener handles.
///
/// Identity is `Arc` pointer identity: subscribing the same handle twice keeps one entry,
/// and unsubscribing is idempotent for repeated removal.
#[derive(Default)]
pub struct ListenerRegistry(Mutex<Vec<Arc<dyn ChangeListener>>>);
impl ListenerRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a listener; re-subscribing an already-registered handle is a no-op.
	pub fn subscribe(&self, listener: Arc<dyn ChangeListener>) {
		let mut listeners = self.0.lock();

		if !listeners.iter().any(|existing| Arc::ptr_eq(existing, &listener)) {
			listeners.push(listener);
		}
	}

	/// Removes a listener; removing an unknown handle is a no-op.
	pub fn unsubscribe(&self, listener: &Arc<dyn ChangeListener>) {
		self.0.lock().retain(|existing| !Arc::ptr_eq(existing, listener));
	}

	/// Removes every registered listener.
	pub fn unsubscribe_all(&self) {
		self.0.lock().clear();
	}

	/// Returns how many listeners are currently subscribed.
	pub fn len(&self) -> usize {
		self.0.lock().len()
	}

	/// Returns `true` when no listener is subscribed.
	pub fn is_empty(&self) -> bool {
		self.0.lock().is_empty()
	}

	/// Invokes every currently-subscribed listener synchronously, in subscription order.
	pub fn publish(&self, notice: &ChangeNotice) {
		// Snapshot so a listener that (un)subscribes during dispatch cannot deadlock.
		let listeners = self.0.lock().clone();

		for listener in listeners {
			listener.on_change(notice);
		}
	}
}
impl Debug for ListenerRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ListenerRegistry").field(&self.len()).finish()
	}
}
