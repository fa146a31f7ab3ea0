//! Route matching.
//!
//! Matching is a greedy literal-prefix walk over the table:
//!
//! - entries are tried in declaration order and the first match wins;
//! - an entry with an empty path only matches an empty remainder;
//! - any other entry matches when the remainder starts with its path, with no
//!   regard for segment boundaries (`"user"` matches `"users/5"`);
//! - a matched branch continues with its children on the rest of the path and
//!   never falls back to a later sibling.
//!
//! The prefix rule is segment-unaware on purpose. Callers disambiguate
//! overlapping prefixes by declaration order.

use std::fmt;

use crate::path::normalize;
use crate::table::{RouteEntry, RouteId, RouteTable};

/// The leaf entry a path resolved to.
pub struct RouteMatch<'a, R> {
	/// Id of the matched entry.
	pub id: RouteId,
	/// The matched entry.
	pub route: &'a RouteEntry<R>,
	/// The part of the path the matched leaf did not consume.
	pub remaining: String,
}

impl<R> fmt::Debug for RouteMatch<'_, R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteMatch")
			.field("id", &self.id)
			.field("route", &self.route)
			.field("remaining", &self.remaining)
			.finish()
	}
}

/// Finds the leaf route for `path`.
pub fn match_path<'a, R>(table: &'a RouteTable<R>, path: &str) -> Option<RouteMatch<'a, R>> {
	let mut remaining = normalize(path);
	let mut candidates = table.roots();

	'level: loop {
		for &id in candidates {
			let route = table.entry(id);
			let route_path = route.path();

			if route_path.is_empty() && !remaining.is_empty() {
				continue;
			}

			let Some(rest) = remaining.strip_prefix(route_path) else {
				continue;
			};

			match route.children() {
				Some(children) => {
					remaining = normalize(rest);
					candidates = children;
					continue 'level;
				}
				None => {
					return Some(RouteMatch {
						id,
						route,
						remaining: rest.to_string(),
					});
				}
			}
		}

		return None;
	}
}
