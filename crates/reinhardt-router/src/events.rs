//! Router events.
//!
//! Two kinds of input drive in-app navigation:
//!
//! - a **navigate request**: the application dispatches a [`NAVIGATE`] event
//!   whose detail is a [`NavigateDetail`] (`{"go": "a/b"}` or
//!   `{"go": ["a", "b"]}`);
//! - an **anchor activation**: the user clicks a link inside the router's
//!   subtree.
//!
//! The controller consumes both through the [`NavigateEvent`] and
//! [`ActivationEvent`] traits, so the same logic serves DOM events (wasm32)
//! and the native [`NavigateRequest`] / [`LinkClick`] types below.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::path::join_segments;

/// Event name to use to tell the router to navigate.
pub const NAVIGATE: &str = "router_navigate";

/// Where to navigate: a path, or segments joined with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavigateTarget {
	/// A single path string.
	Path(String),
	/// Path segments, joined with `/` before use.
	Segments(Vec<String>),
}

impl NavigateTarget {
	/// The path this target designates.
	pub fn to_path(&self) -> String {
		match self {
			Self::Path(path) => path.clone(),
			Self::Segments(segments) => join_segments(segments),
		}
	}
}

impl From<&str> for NavigateTarget {
	fn from(path: &str) -> Self {
		Self::Path(path.to_string())
	}
}

impl From<String> for NavigateTarget {
	fn from(path: String) -> Self {
		Self::Path(path)
	}
}

impl From<Vec<String>> for NavigateTarget {
	fn from(segments: Vec<String>) -> Self {
		Self::Segments(segments)
	}
}

impl From<&[&str]> for NavigateTarget {
	fn from(segments: &[&str]) -> Self {
		Self::Segments(segments.iter().map(|s| s.to_string()).collect())
	}
}

impl<const N: usize> From<[&str; N]> for NavigateTarget {
	fn from(segments: [&str; N]) -> Self {
		Self::from(&segments[..])
	}
}

/// Event details to use to tell the router to navigate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigateDetail {
	/// The navigation target.
	pub go: NavigateTarget,
}

impl NavigateDetail {
	/// Creates a detail for `go`.
	pub fn new(go: impl Into<NavigateTarget>) -> Self {
		Self { go: go.into() }
	}

	/// Decodes a detail from its JSON form.
	pub fn from_json(json: &str) -> serde_json::Result<Self> {
		serde_json::from_str(json)
	}
}

/// The anchor element an activation landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
	/// The link target, absolute or relative to the current page.
	pub href: String,
	/// The browsing context the link opens in (`target` attribute).
	pub target: Option<String>,
	/// Whether the link carries a `download` attribute.
	pub download: bool,
}

impl Anchor {
	/// An anchor with only an `href`.
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: href.into(),
			target: None,
			download: false,
		}
	}

	/// Sets the `target` attribute.
	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	/// Sets the `download` attribute.
	pub fn with_download(mut self, download: bool) -> Self {
		self.download = download;
		self
	}

	/// Whether the link opens in the current browsing context.
	pub fn opens_in_place(&self) -> bool {
		match self.target.as_deref() {
			None | Some("") => true,
			Some(target) => target.eq_ignore_ascii_case("_self"),
		}
	}
}

/// An input event the router may consume.
pub trait RouterEvent {
	/// Suppresses the browser's default action.
	fn prevent_default(&self);

	/// Stops the event from reaching outer listeners.
	fn stop_propagation(&self);
}

/// A pointer/keyboard activation.
pub trait ActivationEvent: RouterEvent {
	/// The anchor the event targets, if its target is (inside) a link.
	fn anchor(&self) -> Option<Anchor>;

	/// Whether a modifier key or a non-primary button was involved.
	///
	/// Such activations (open in new tab, save link, ...) belong to the
	/// browser.
	fn is_modified(&self) -> bool {
		false
	}
}

/// A navigate request.
pub trait NavigateEvent: RouterEvent {
	/// The request's detail, if it carries a valid one.
	fn detail(&self) -> Option<NavigateDetail>;
}

/// Records whether an event was consumed.
#[derive(Debug, Default)]
struct Consumption {
	default_prevented: Cell<bool>,
	propagation_stopped: Cell<bool>,
}

/// A link activation outside the DOM.
#[derive(Debug)]
pub struct LinkClick {
	anchor: Option<Anchor>,
	modified: bool,
	consumption: Consumption,
}

impl LinkClick {
	/// A plain primary-button click on `anchor`.
	pub fn new(anchor: Anchor) -> Self {
		Self {
			anchor: Some(anchor),
			modified: false,
			consumption: Consumption::default(),
		}
	}

	/// A click on `href`.
	pub fn href(href: impl Into<String>) -> Self {
		Self::new(Anchor::new(href))
	}

	/// A click whose target is not a link.
	pub fn elsewhere() -> Self {
		Self {
			anchor: None,
			modified: false,
			consumption: Consumption::default(),
		}
	}

	/// Marks the click as modified (ctrl/meta/shift/alt or non-primary button).
	pub fn modified(mut self, modified: bool) -> Self {
		self.modified = modified;
		self
	}

	/// Whether the router suppressed the default action.
	pub fn default_prevented(&self) -> bool {
		self.consumption.default_prevented.get()
	}

	/// Whether the router stopped propagation.
	pub fn propagation_stopped(&self) -> bool {
		self.consumption.propagation_stopped.get()
	}
}

impl RouterEvent for LinkClick {
	fn prevent_default(&self) {
		self.consumption.default_prevented.set(true);
	}

	fn stop_propagation(&self) {
		self.consumption.propagation_stopped.set(true);
	}
}

impl ActivationEvent for LinkClick {
	fn anchor(&self) -> Option<Anchor> {
		self.anchor.clone()
	}

	fn is_modified(&self) -> bool {
		self.modified
	}
}

/// A navigate request outside the DOM.
#[derive(Debug)]
pub struct NavigateRequest {
	detail: Option<NavigateDetail>,
	consumption: Consumption,
}

impl NavigateRequest {
	/// A request for `go`.
	pub fn new(go: impl Into<NavigateTarget>) -> Self {
		Self {
			detail: Some(NavigateDetail::new(go)),
			consumption: Consumption::default(),
		}
	}

	/// A request without a usable detail.
	pub fn empty() -> Self {
		Self {
			detail: None,
			consumption: Consumption::default(),
		}
	}

	/// Whether the router stopped propagation.
	pub fn propagation_stopped(&self) -> bool {
		self.consumption.propagation_stopped.get()
	}

	/// Whether the router suppressed the default action.
	pub fn default_prevented(&self) -> bool {
		self.consumption.default_prevented.get()
	}
}

impl RouterEvent for NavigateRequest {
	fn prevent_default(&self) {
		self.consumption.default_prevented.set(true);
	}

	fn stop_propagation(&self) {
		self.consumption.propagation_stopped.set(true);
	}
}

impl NavigateEvent for NavigateRequest {
	fn detail(&self) -> Option<NavigateDetail> {
		self.detail.clone()
	}
}
