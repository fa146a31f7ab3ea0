//! Route table.
//!
//! The table is an arena: every route of the declared tree is stored once in a
//! flat vector and addressed by [`RouteId`]. Branches refer to their children
//! by id, so neither construction nor matching recurses, however deep the
//! declared tree is.

use std::collections::VecDeque;
use std::fmt;

use crate::path::normalize;
use crate::route::Route;

/// Index of an entry in a [`RouteTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouteId(usize);

impl RouteId {
	/// Position of the entry in the arena.
	pub fn index(self) -> usize {
		self.0
	}
}

/// A normalized route.
pub struct RouteEntry<R> {
	path: String,
	redirect_to: Option<String>,
	renderable: Option<R>,
	children: Option<Vec<RouteId>>,
}

impl<R> RouteEntry<R> {
	/// The normalized path (no leading separator).
	pub fn path(&self) -> &str {
		&self.path
	}

	/// The redirect target, as declared.
	pub fn redirect_to(&self) -> Option<&str> {
		self.redirect_to.as_deref()
	}

	/// The renderable handle.
	pub fn renderable(&self) -> Option<&R> {
		self.renderable.as_ref()
	}

	/// Child ids, or `None` for a leaf.
	///
	/// A route declared with an empty child list is a leaf.
	pub fn children(&self) -> Option<&[RouteId]> {
		self.children.as_deref().filter(|ids| !ids.is_empty())
	}

	/// Whether matching stops at this entry.
	pub fn is_leaf(&self) -> bool {
		self.children().is_none()
	}
}

impl<R> fmt::Debug for RouteEntry<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteEntry")
			.field("path", &self.path)
			.field("redirect_to", &self.redirect_to)
			.field("has_renderable", &self.renderable.is_some())
			.field("children", &self.children)
			.finish()
	}
}

/// An immutable, normalized tree of routes.
pub struct RouteTable<R> {
	entries: Vec<RouteEntry<R>>,
	roots: Vec<RouteId>,
}

impl<R> RouteTable<R> {
	/// Builds a table from declarations.
	///
	/// Every path is normalized. The declarations are consumed, so the table
	/// owns a tree nobody else can mutate.
	pub fn build(routes: Vec<Route<R>>) -> Self {
		let mut entries: Vec<RouteEntry<R>> = Vec::new();
		let mut roots = Vec::new();

		// Breadth-first: siblings get consecutive ids, in declaration order.
		let mut pending: VecDeque<(Option<RouteId>, Vec<Route<R>>)> = VecDeque::new();
		pending.push_back((None, routes));

		while let Some((parent, siblings)) = pending.pop_front() {
			let mut ids = Vec::with_capacity(siblings.len());

			for route in siblings {
				let id = RouteId(entries.len());
				let Route {
					path,
					children,
					redirect_to,
					renderable,
				} = route;

				entries.push(RouteEntry {
					path: normalize(&path).to_string(),
					redirect_to,
					renderable,
					children: None,
				});
				if let Some(children) = children {
					pending.push_back((Some(id), children));
				}
				ids.push(id);
			}

			match parent {
				Some(parent) => entries[parent.0].children = Some(ids),
				None => roots = ids,
			}
		}

		Self { entries, roots }
	}

	/// Top-level entries, in declaration order.
	pub fn roots(&self) -> &[RouteId] {
		&self.roots
	}

	/// Looks up an entry.
	///
	/// # Panics
	///
	/// Panics if `id` does not come from this table.
	pub fn entry(&self, id: RouteId) -> &RouteEntry<R> {
		&self.entries[id.0]
	}

	/// Looks up an entry, returning `None` for a foreign id.
	pub fn get(&self, id: RouteId) -> Option<&RouteEntry<R>> {
		self.entries.get(id.0)
	}

	/// Total number of entries at every depth.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the table has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// All entries with their ids, parents before children.
	pub fn iter(&self) -> impl Iterator<Item = (RouteId, &RouteEntry<R>)> {
		self.entries
			.iter()
			.enumerate()
			.map(|(index, entry)| (RouteId(index), entry))
	}
}

impl<R> Default for RouteTable<R> {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
			roots: Vec::new(),
		}
	}
}

impl<R> fmt::Debug for RouteTable<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteTable")
			.field("entries", &self.entries)
			.field("roots", &self.roots)
			.finish()
	}
}
