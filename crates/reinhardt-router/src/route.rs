//! Route declarations.
//!
//! A [`Route`] is what the application declares. It is consumed by
//! [`RouteTable::build`](crate::table::RouteTable::build), which normalizes it
//! into the immutable table used for matching.

use std::fmt;

/// A single route declaration.
///
/// A route is meant to be exactly one of:
/// - a redirect (`redirect_to`),
/// - a leaf that renders (`renderable`),
/// - a branch with `children`.
///
/// Declaring both a redirect and a renderable is allowed; the redirect wins.
#[derive(Clone)]
pub struct Route<R> {
	/// The declared path (a leading `/` is optional).
	pub(crate) path: String,
	/// Nested routes, matched against the remainder of the path.
	pub(crate) children: Option<Vec<Route<R>>>,
	/// Path to resolve instead of rendering.
	pub(crate) redirect_to: Option<String>,
	/// The handle returned when this route is the match.
	pub(crate) renderable: Option<R>,
}

impl<R> fmt::Debug for Route<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("path", &self.path)
			.field("children", &self.children)
			.field("redirect_to", &self.redirect_to)
			.field("has_renderable", &self.renderable.is_some())
			.finish()
	}
}

impl<R> Route<R> {
	/// Creates a route with only a path.
	///
	/// Without a redirect, a renderable or children, matching it is a
	/// configuration error.
	pub fn new(path: impl Into<String>) -> Self {
		Self {
			path: path.into(),
			children: None,
			redirect_to: None,
			renderable: None,
		}
	}

	/// Creates a leaf route rendering `renderable`.
	pub fn view(path: impl Into<String>, renderable: R) -> Self {
		Self::new(path).renderable(renderable)
	}

	/// Creates a redirect route.
	pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
		Self::new(path).redirect_to(to)
	}

	/// Creates a branch route.
	pub fn branch(path: impl Into<String>, children: Vec<Route<R>>) -> Self {
		Self::new(path).children(children)
	}

	/// Sets the child routes.
	pub fn children(mut self, children: Vec<Route<R>>) -> Self {
		self.children = Some(children);
		self
	}

	/// Sets the redirect target.
	pub fn redirect_to(mut self, to: impl Into<String>) -> Self {
		self.redirect_to = Some(to.into());
		self
	}

	/// Sets the renderable handle.
	pub fn renderable(mut self, renderable: R) -> Self {
		self.renderable = Some(renderable);
		self
	}

	/// Returns the declared path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the redirect target.
	pub fn get_redirect_to(&self) -> Option<&str> {
		self.redirect_to.as_deref()
	}

	/// Returns the renderable handle.
	pub fn get_renderable(&self) -> Option<&R> {
		self.renderable.as_ref()
	}

	/// Returns the declared children.
	pub fn get_children(&self) -> Option<&[Route<R>]> {
		self.children.as_deref()
	}
}
