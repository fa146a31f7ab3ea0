//! History backends.
//!
//! [`History`] is the router's view of the browser session history: read the
//! current location, push or replace an entry, and be told when the user moves
//! through the stack with back/forward.
//!
//! Two backends are provided:
//! - [`MemoryHistory`], an in-process stack usable outside a browser and in
//!   tests;
//! - `BrowserHistory` (wasm32 only), backed by `window.history`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use url::Url;

use crate::error::{Result, RouterError};

/// Callback invoked after a back/forward move.
pub type PopListener = Rc<dyn Fn()>;

/// Identifier of a registered [`PopListener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// How a history entry came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
	/// A new entry (user-intended navigation).
	Push,
	/// The current entry was overwritten (redirects).
	Replace,
	/// The user moved through existing entries (back/forward).
	Pop,
}

/// The browser session history, as seen by the router.
pub trait History: 'static {
	/// Absolute URL of the current entry.
	fn href(&self) -> Result<String>;

	/// Adds an entry for `url` (absolute, or relative to the current entry).
	fn push(&self, url: &str) -> Result<()>;

	/// Overwrites the current entry with `url`.
	fn replace(&self, url: &str) -> Result<()>;

	/// Registers a callback for back/forward moves.
	fn listen(&self, listener: PopListener) -> Result<ListenerId>;

	/// Removes a callback. Unknown ids are ignored.
	fn unlisten(&self, id: ListenerId);
}

/// One recorded history operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
	/// The kind of operation.
	pub navigation_type: NavigationType,
	/// Absolute URL of the entry afterwards.
	pub href: String,
}

struct MemoryState {
	entries: Vec<Url>,
	index: usize,
	journal: Vec<HistoryRecord>,
	listeners: Vec<(ListenerId, PopListener)>,
}

/// An in-process history stack.
///
/// Behaves like a browser tab's session history: pushing discards forward
/// entries, and [`back`](Self::back) / [`forward`](Self::forward) /
/// [`go`](Self::go) notify listeners the way `popstate` does. Clones share the
/// same stack.
#[derive(Clone)]
pub struct MemoryHistory {
	state: Rc<RefCell<MemoryState>>,
	next_listener: Rc<Cell<u64>>,
}

impl MemoryHistory {
	/// Origin used by [`MemoryHistory::default`].
	pub const DEFAULT_ORIGIN: &'static str = "http://localhost/";

	/// Creates a history whose only entry is `href`.
	pub fn new(href: &str) -> Result<Self> {
		Ok(Self::with_entry(Url::parse(href)?))
	}

	fn with_entry(url: Url) -> Self {
		Self {
			state: Rc::new(RefCell::new(MemoryState {
				entries: vec![url],
				index: 0,
				journal: Vec::new(),
				listeners: Vec::new(),
			})),
			next_listener: Rc::new(Cell::new(0)),
		}
	}

	/// Moves one entry back. Returns `false` at the start of the stack.
	pub fn back(&self) -> bool {
		self.go(-1)
	}

	/// Moves one entry forward. Returns `false` at the end of the stack.
	pub fn forward(&self) -> bool {
		self.go(1)
	}

	/// Moves `delta` entries and notifies listeners.
	///
	/// A move out of range leaves the stack untouched and returns `false`.
	pub fn go(&self, delta: isize) -> bool {
		let listeners = {
			let mut state = self.state.borrow_mut();
			let Some(target) = state.index.checked_add_signed(delta) else {
				return false;
			};
			if delta == 0 || target >= state.entries.len() {
				return false;
			}
			state.index = target;
			let href = state.entries[target].to_string();
			state.journal.push(HistoryRecord {
				navigation_type: NavigationType::Pop,
				href,
			});
			state
				.listeners
				.iter()
				.map(|(_, listener)| Rc::clone(listener))
				.collect::<Vec<_>>()
		};

		for listener in listeners {
			listener();
		}
		true
	}

	/// Number of entries in the stack.
	pub fn len(&self) -> usize {
		self.state.borrow().entries.len()
	}

	/// Whether the stack is empty. Never true: there is always a current entry.
	pub fn is_empty(&self) -> bool {
		self.state.borrow().entries.is_empty()
	}

	/// Position of the current entry.
	pub fn index(&self) -> usize {
		self.state.borrow().index
	}

	/// Absolute URLs of all entries.
	pub fn entries(&self) -> Vec<String> {
		self.state
			.borrow()
			.entries
			.iter()
			.map(Url::to_string)
			.collect()
	}

	/// Every push, replace and pop so far, oldest first.
	pub fn journal(&self) -> Vec<HistoryRecord> {
		self.state.borrow().journal.clone()
	}

	/// Number of push operations so far.
	pub fn push_count(&self) -> usize {
		self.count(NavigationType::Push)
	}

	/// Number of replace operations so far.
	pub fn replace_count(&self) -> usize {
		self.count(NavigationType::Replace)
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.state.borrow().listeners.len()
	}

	fn count(&self, navigation_type: NavigationType) -> usize {
		self.state
			.borrow()
			.journal
			.iter()
			.filter(|record| record.navigation_type == navigation_type)
			.count()
	}

	fn write(&self, url: &str, navigation_type: NavigationType) -> Result<()> {
		let mut state = self.state.borrow_mut();
		let index = state.index;
		let target = state.entries[index].join(url)?;

		if target.origin() != state.entries[index].origin() {
			return Err(RouterError::NavigationFailed(format!(
				"cannot move history to a different origin: {}",
				target
			)));
		}

		match navigation_type {
			NavigationType::Push => {
				state.entries.truncate(index + 1);
				state.entries.push(target.clone());
				state.index = index + 1;
			}
			_ => state.entries[index] = target.clone(),
		}
		state.journal.push(HistoryRecord {
			navigation_type,
			href: target.to_string(),
		});
		Ok(())
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		let url = Url::parse(Self::DEFAULT_ORIGIN)
			.unwrap_or_else(|e| panic!("Invalid default origin '{}': {}", Self::DEFAULT_ORIGIN, e));
		Self::with_entry(url)
	}
}

impl History for MemoryHistory {
	fn href(&self) -> Result<String> {
		let state = self.state.borrow();
		Ok(state.entries[state.index].to_string())
	}

	fn push(&self, url: &str) -> Result<()> {
		self.write(url, NavigationType::Push)
	}

	fn replace(&self, url: &str) -> Result<()> {
		self.write(url, NavigationType::Replace)
	}

	fn listen(&self, listener: PopListener) -> Result<ListenerId> {
		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.state.borrow_mut().listeners.push((id, listener));
		Ok(id)
	}

	fn unlisten(&self, id: ListenerId) {
		self.state
			.borrow_mut()
			.listeners
			.retain(|(listener, _)| *listener != id);
	}
}

impl fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("MemoryHistory")
			.field("entries", &state.entries.iter().map(Url::as_str).collect::<Vec<_>>())
			.field("index", &state.index)
			.field("listeners", &state.listeners.len())
			.finish()
	}
}
