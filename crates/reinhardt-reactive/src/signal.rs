//! Signal - Observable Cell
//!
//! `Signal<T>` holds a value and a list of subscriber callbacks. Writing the
//! value (`set` or `update`) calls every subscriber synchronously before
//! returning.
//!
//! ## Re-entrance
//!
//! Subscribers may read or write the signal that is notifying them. The
//! subscriber list is snapshotted before notification starts, and each
//! subscriber is handed the value current at the moment it is called, so a
//! nested write is observed by every later subscriber instead of being
//! overwritten by a stale copy.
//!
//! ## Example
//!
//! ```
//! use reinhardt_reactive::Signal;
//!
//! let count = Signal::new(0);
//! assert_eq!(count.get(), 0);
//!
//! count.set(42);
//! assert_eq!(count.get(), 42);
//!
//! count.update(|n| *n += 1);
//! assert_eq!(count.get(), 43);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Unique identifier for reactive nodes (signals and their subscribers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
	/// Create a new unique NodeId
	pub fn new() -> Self {
		static COUNTER: AtomicUsize = AtomicUsize::new(0);
		Self(COUNTER.fetch_add(1, Ordering::Relaxed))
	}
}

impl Default for NodeId {
	fn default() -> Self {
		Self::new()
	}
}

type Callback<T> = Rc<dyn Fn(&T)>;

struct SignalInner<T> {
	value: RefCell<T>,
	subscribers: RefCell<Vec<(NodeId, Callback<T>)>>,
}

/// A shared observable cell.
///
/// `Signal<T>` implements `Clone`; all clones share the same value and the
/// same subscriber list.
pub struct Signal<T: 'static> {
	/// Unique identifier for this signal
	id: NodeId,
	inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<T: 'static> Signal<T> {
	/// Create a new Signal with the given initial value
	pub fn new(value: T) -> Self {
		Self {
			id: NodeId::new(),
			inner: Rc::new(SignalInner {
				value: RefCell::new(value),
				subscribers: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Get a clone of the current value.
	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.inner.value.borrow().clone()
	}

	/// Borrow the current value without cloning it.
	///
	/// The closure must not write this signal.
	pub fn with<U>(&self, f: impl FnOnce(&T) -> U) -> U {
		f(&self.inner.value.borrow())
	}

	/// Set the signal to a new value and notify every subscriber.
	pub fn set(&self, value: T)
	where
		T: Clone,
	{
		*self.inner.value.borrow_mut() = value;
		self.notify();
	}

	/// Update the value in place and notify every subscriber once.
	pub fn update<F>(&self, f: F)
	where
		F: FnOnce(&mut T),
		T: Clone,
	{
		f(&mut *self.inner.value.borrow_mut());
		self.notify();
	}

	/// Register a callback invoked synchronously after every write.
	///
	/// The callback stays registered for as long as the returned
	/// [`Subscription`] is alive.
	pub fn subscribe<F>(&self, callback: F) -> Subscription
	where
		F: Fn(&T) + 'static,
	{
		let id = NodeId::new();
		self.inner
			.subscribers
			.borrow_mut()
			.push((id, Rc::new(callback)));

		let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
		Subscription {
			id,
			release: Some(Box::new(move || {
				if let Some(inner) = weak.upgrade() {
					inner.subscribers.borrow_mut().retain(|(sub, _)| *sub != id);
				}
			})),
		}
	}

	/// Number of live subscribers.
	pub fn subscriber_count(&self) -> usize {
		self.inner.subscribers.borrow().len()
	}

	/// Get the NodeId of this signal
	pub fn id(&self) -> NodeId {
		self.id
	}

	fn notify(&self)
	where
		T: Clone,
	{
		let subscribers: Vec<(NodeId, Callback<T>)> = self.inner.subscribers.borrow().clone();

		for (id, callback) in subscribers {
			// A subscriber released by an earlier callback must not run.
			let live = self
				.inner
				.subscribers
				.borrow()
				.iter()
				.any(|(sub, _)| *sub == id);
			if !live {
				continue;
			}
			let value = self.get();
			callback(&value);
		}
	}
}

impl<T: fmt::Debug + 'static> fmt::Debug for Signal<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Signal")
			.field("id", &self.id)
			.field("value", &*self.inner.value.borrow())
			.field("subscribers", &self.inner.subscribers.borrow().len())
			.finish()
	}
}

/// Handle to a registered signal callback.
///
/// Dropping the handle unsubscribes. Outliving the signal is harmless.
#[must_use = "dropping a Subscription immediately unsubscribes the callback"]
pub struct Subscription {
	id: NodeId,
	release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	/// Identifier of the registered callback.
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Remove the callback now.
	pub fn unsubscribe(mut self) {
		self.release_now();
	}

	fn release_now(&mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.release_now();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription")
			.field("id", &self.id)
			.field("active", &self.release.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::Cell;

	#[rstest]
	fn test_node_id_uniqueness() {
		let id1 = NodeId::new();
		let id2 = NodeId::new();
		let id3 = NodeId::new();

		assert_ne!(id1, id2);
		assert_ne!(id2, id3);
		assert_ne!(id1, id3);
	}

	#[rstest]
	fn test_signal_creation() {
		let signal = Signal::new(42);
		assert_eq!(signal.get(), 42);
	}

	#[rstest]
	fn test_signal_set() {
		let signal = Signal::new(0);
		signal.set(100);
		assert_eq!(signal.get(), 100);
	}

	#[rstest]
	fn test_signal_update() {
		let signal = Signal::new(0);

		signal.update(|n| *n += 1);
		assert_eq!(signal.get(), 1);

		signal.update(|n| *n *= 2);
		assert_eq!(signal.get(), 2);
	}

	#[rstest]
	fn test_signal_clone_shares_value() {
		let signal1 = Signal::new(42);
		let signal2 = signal1.clone();

		signal1.set(100);
		assert_eq!(signal2.get(), 100);
		assert_eq!(signal1.id(), signal2.id());
	}

	#[rstest]
	fn test_subscriber_called_on_set() {
		let signal = Signal::new(0);
		let seen = Rc::new(Cell::new(0));

		let sink = Rc::clone(&seen);
		let _sub = signal.subscribe(move |v| sink.set(*v));

		signal.set(7);
		assert_eq!(seen.get(), 7);
	}

	#[rstest]
	fn test_subscribers_called_in_order() {
		let signal = Signal::new(0);
		let log = Rc::new(RefCell::new(Vec::new()));

		let first = Rc::clone(&log);
		let _a = signal.subscribe(move |_| first.borrow_mut().push("a"));
		let second = Rc::clone(&log);
		let _b = signal.subscribe(move |_| second.borrow_mut().push("b"));

		signal.set(1);
		assert_eq!(*log.borrow(), vec!["a", "b"]);
	}

	#[rstest]
	fn test_drop_subscription_unsubscribes() {
		let signal = Signal::new(0);
		let calls = Rc::new(Cell::new(0));

		let sink = Rc::clone(&calls);
		let sub = signal.subscribe(move |_| sink.set(sink.get() + 1));
		assert_eq!(signal.subscriber_count(), 1);

		drop(sub);
		signal.set(1);

		assert_eq!(calls.get(), 0);
		assert_eq!(signal.subscriber_count(), 0);
	}

	#[rstest]
	fn test_reentrant_write_seen_by_later_subscribers() {
		let signal = Signal::new(String::from("a"));

		let writer = signal.clone();
		let _redirect = signal.subscribe(move |v| {
			if v == "a" {
				writer.set(String::from("c"));
			}
		});

		let last = Rc::new(RefCell::new(String::new()));
		let sink = Rc::clone(&last);
		let _observer = signal.subscribe(move |v| *sink.borrow_mut() = v.clone());

		signal.set(String::from("a"));

		assert_eq!(signal.get(), "c");
		assert_eq!(*last.borrow(), "c");
	}

	#[rstest]
	fn test_subscription_outlives_signal() {
		let signal = Signal::new(0);
		let sub = signal.subscribe(|_| {});
		drop(signal);
		sub.unsubscribe();
	}
}
