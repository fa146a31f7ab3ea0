//! Renderable handles.
//!
//! The router never renders anything itself. A route carries an opaque handle
//! supplied by the rendering layer (a component, a factory, a template) and the
//! router hands the matched handle back. The only thing the router needs to
//! know about the handle type is how to produce the built-in "not found" page
//! used until an error template is configured.

use std::rc::Rc;
use std::sync::Arc;

/// Text of the built-in error page.
pub const NOT_FOUND_TEXT: &str = "404";

/// An opaque handle the rendering layer knows how to display.
pub trait Renderable: Clone + 'static {
	/// The built-in page rendered when no route matches.
	fn not_found() -> Self;
}

impl Renderable for String {
	fn not_found() -> Self {
		NOT_FOUND_TEXT.to_string()
	}
}

impl Renderable for &'static str {
	fn not_found() -> Self {
		NOT_FOUND_TEXT
	}
}

impl Renderable for Rc<str> {
	fn not_found() -> Self {
		Rc::from(NOT_FOUND_TEXT)
	}
}

impl Renderable for Arc<str> {
	fn not_found() -> Self {
		Arc::from(NOT_FOUND_TEXT)
	}
}
