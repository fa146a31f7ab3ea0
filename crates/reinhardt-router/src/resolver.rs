//! Redirect resolution.
//!
//! Resolution repeatedly matches the working path and follows `redirect_to`
//! links until a renderable leaf is found, nothing matches, or the hop limit
//! is reached. Redirects are declarative data, so a cycle (`a -> b -> a`) is a
//! possible misconfiguration; the hop limit turns it into a deterministic
//! error instead of an endless loop.

use crate::error::{Result, RouterError};
use crate::matcher::match_path;
use crate::renderable::Renderable;
use crate::table::RouteTable;

/// Maximum number of redirects followed for one resolution.
pub const MAX_REDIRECTS: usize = 10;

/// What the rendering layer should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<R> {
	/// A route matched; its renderable.
	Rendered(R),
	/// Nothing matched; the error template.
	NotFound(R),
}

impl<R> Resolution<R> {
	/// The handle to render, whichever the outcome.
	pub fn renderable(&self) -> &R {
		match self {
			Self::Rendered(r) | Self::NotFound(r) => r,
		}
	}

	/// Consumes the resolution, returning the handle to render.
	pub fn into_renderable(self) -> R {
		match self {
			Self::Rendered(r) | Self::NotFound(r) => r,
		}
	}

	/// Whether a route matched.
	pub fn is_rendered(&self) -> bool {
		matches!(self, Self::Rendered(_))
	}
}

/// A finished resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<R> {
	/// The outcome.
	pub resolution: Resolution<R>,
	/// The path the outcome belongs to (the start path, or the last redirect
	/// target).
	pub path: String,
	/// Redirect targets followed, in order. One history entry is replaced per
	/// element.
	pub redirects: Vec<String>,
}

impl<R> Resolved<R> {
	/// Whether at least one redirect was followed.
	pub fn redirected(&self) -> bool {
		!self.redirects.is_empty()
	}
}

/// Resolves `start` against `table`.
///
/// # Errors
///
/// - [`RouterError::TooManyRedirects`] when the chain is longer than
///   [`MAX_REDIRECTS`].
/// - [`RouterError::MissingRenderable`] when the final leaf has neither a
///   redirect nor a renderable.
pub fn resolve<R: Renderable>(
	start: &str,
	table: &RouteTable<R>,
	error_template: &R,
) -> Result<Resolved<R>> {
	let mut path = start.to_string();
	let mut redirects = Vec::new();

	for _ in 0..MAX_REDIRECTS {
		let Some(route_match) = match_path(table, &path) else {
			tracing::debug!(path = %path, "no route matched");
			return Ok(Resolved {
				resolution: Resolution::NotFound(error_template.clone()),
				path,
				redirects,
			});
		};
		let route = route_match.route;

		if let Some(target) = route.redirect_to() {
			tracing::debug!(from = %path, to = %target, "following redirect");
			path = target.to_string();
			redirects.push(path.clone());
			continue;
		}

		return match route.renderable() {
			Some(renderable) => Ok(Resolved {
				resolution: Resolution::Rendered(renderable.clone()),
				path,
				redirects,
			}),
			None => Err(RouterError::MissingRenderable {
				path: route.path().to_string(),
			}),
		};
	}

	Err(RouterError::TooManyRedirects {
		path: start.to_string(),
		hops: redirects.len(),
	})
}
