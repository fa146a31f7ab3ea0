//! Effect - Reactive Side Effects
//!
//! `Effect` runs a closure against a signal's value once when it is created and
//! again on every write to that signal, until it is disposed or dropped.
//!
//! ## Example
//!
//! ```
//! use reinhardt_reactive::{Effect, Signal};
//!
//! let count = Signal::new(1);
//! let doubled = Signal::new(0);
//!
//! let out = doubled.clone();
//! let effect = Effect::watch(&count, move |n: &i32| out.set(n * 2));
//! assert_eq!(doubled.get(), 2);
//!
//! count.set(5);
//! assert_eq!(doubled.get(), 10);
//!
//! effect.dispose();
//! count.set(6);
//! assert_eq!(doubled.get(), 10);
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::signal::{NodeId, Signal, Subscription};

/// A watcher bound to one signal.
pub struct Effect {
	/// Unique identifier for this effect
	id: NodeId,
	/// Whether this effect has been disposed
	disposed: Rc<Cell<bool>>,
	subscription: Option<Subscription>,
}

impl Effect {
	/// Run `f` with the current value of `source` now, and after every write.
	pub fn watch<T, F>(source: &Signal<T>, f: F) -> Self
	where
		T: Clone + 'static,
		F: Fn(&T) + 'static,
	{
		let disposed = Rc::new(Cell::new(false));
		let f = Rc::new(f);

		let initial = source.get();
		f(&initial);

		let flag = Rc::clone(&disposed);
		let run = Rc::clone(&f);
		let subscription = source.subscribe(move |value| {
			if !flag.get() {
				run(value);
			}
		});

		Self {
			id: subscription.id(),
			disposed,
			subscription: Some(subscription),
		}
	}

	/// Identifier of this effect.
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Whether the effect has been disposed.
	pub fn is_disposed(&self) -> bool {
		self.disposed.get()
	}

	/// Stop the effect. It will not run again.
	pub fn dispose(mut self) {
		self.stop();
	}

	fn stop(&mut self) {
		self.disposed.set(true);
		if let Some(subscription) = self.subscription.take() {
			subscription.unsubscribe();
		}
	}
}

impl Drop for Effect {
	fn drop(&mut self) {
		self.stop();
	}
}

impl fmt::Debug for Effect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Effect")
			.field("id", &self.id)
			.field("disposed", &self.disposed.get())
			.finish()
	}
}
