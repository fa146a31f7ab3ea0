//! Browser bindings (WASM only).
//!
//! - [`BrowserHistory`] implements [`History`] over `window.history` and
//!   `popstate`.
//! - [`mount`] wires a [`NavigationController`] to a DOM subtree: clicks on
//!   links inside it and [`NAVIGATE`] events dispatched inside it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Element, Event, EventTarget, HtmlAnchorElement, MouseEvent, Window};

use crate::controller::NavigationController;
use crate::error::{Result, RouterError};
use crate::events::{ActivationEvent, Anchor, NAVIGATE, NavigateDetail, NavigateEvent, RouterEvent};
use crate::history::{History, ListenerId, PopListener};
use crate::renderable::Renderable;

type EventClosure = Closure<dyn FnMut(Event)>;

fn js_error(context: &str, value: JsValue) -> RouterError {
	RouterError::NavigationFailed(format!("{}: {:?}", context, value))
}

fn window() -> Result<Window> {
	web_sys::window().ok_or_else(|| RouterError::NavigationFailed("no global window".to_string()))
}

/// The session history of the current browsing context.
///
/// Clones share the registered `popstate` listeners.
#[derive(Clone)]
pub struct BrowserHistory {
	window: Window,
	listeners: Rc<RefCell<HashMap<ListenerId, EventClosure>>>,
	next_listener: Rc<Cell<u64>>,
}

impl BrowserHistory {
	/// Binds to `window.history`.
	pub fn new() -> Result<Self> {
		Ok(Self {
			window: window()?,
			listeners: Rc::new(RefCell::new(HashMap::new())),
			next_listener: Rc::new(Cell::new(0)),
		})
	}

	fn history(&self) -> Result<web_sys::History> {
		self.window
			.history()
			.map_err(|e| js_error("window.history unavailable", e))
	}
}

impl History for BrowserHistory {
	fn href(&self) -> Result<String> {
		self.window
			.location()
			.href()
			.map_err(|e| js_error("failed to read location", e))
	}

	fn push(&self, url: &str) -> Result<()> {
		self.history()?
			.push_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(|e| js_error("pushState failed", e))
	}

	fn replace(&self, url: &str) -> Result<()> {
		self.history()?
			.replace_state_with_url(&JsValue::NULL, "", Some(url))
			.map_err(|e| js_error("replaceState failed", e))
	}

	fn listen(&self, listener: PopListener) -> Result<ListenerId> {
		let closure = Closure::wrap(Box::new(move |_event: Event| listener()) as Box<dyn FnMut(_)>);
		self.window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
			.map_err(|e| js_error("failed to add popstate listener", e))?;

		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.listeners.borrow_mut().insert(id, closure);
		Ok(id)
	}

	fn unlisten(&self, id: ListenerId) {
		let Some(closure) = self.listeners.borrow_mut().remove(&id) else {
			return;
		};
		if let Err(e) = self
			.window
			.remove_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
		{
			tracing::warn!(error = ?e, "failed to remove popstate listener");
		}
	}
}

impl fmt::Debug for BrowserHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BrowserHistory")
			.field("listeners", &self.listeners.borrow().len())
			.finish()
	}
}

struct DomActivation(MouseEvent);

impl RouterEvent for DomActivation {
	fn prevent_default(&self) {
		self.0.prevent_default();
	}

	fn stop_propagation(&self) {
		self.0.stop_propagation();
	}
}

impl ActivationEvent for DomActivation {
	fn anchor(&self) -> Option<Anchor> {
		let target = self.0.target()?.dyn_into::<Element>().ok()?;
		let element = target.closest("a").ok()??;
		let href = match element.dyn_ref::<HtmlAnchorElement>() {
			Some(anchor) => anchor.href(),
			None => element.get_attribute("href")?,
		};

		let mut anchor = Anchor::new(href).with_download(element.has_attribute("download"));
		anchor.target = element.get_attribute("target");
		Some(anchor)
	}

	fn is_modified(&self) -> bool {
		let event = &self.0;
		event.button() != 0
			|| event.ctrl_key()
			|| event.meta_key()
			|| event.shift_key()
			|| event.alt_key()
	}
}

struct DomNavigate(CustomEvent);

impl RouterEvent for DomNavigate {
	fn prevent_default(&self) {
		self.0.prevent_default();
	}

	fn stop_propagation(&self) {
		self.0.stop_propagation();
	}
}

impl NavigateEvent for DomNavigate {
	fn detail(&self) -> Option<NavigateDetail> {
		let json = js_sys::JSON::stringify(&self.0.detail()).ok()?.as_string()?;
		NavigateDetail::from_json(&json).ok()
	}
}

/// Listeners installed by [`mount`]. Dropping it removes them.
pub struct DomListeners {
	target: EventTarget,
	click: EventClosure,
	navigate: EventClosure,
}

impl Drop for DomListeners {
	fn drop(&mut self) {
		for (name, closure) in [("click", &self.click), (NAVIGATE, &self.navigate)] {
			if let Err(e) = self
				.target
				.remove_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
			{
				tracing::warn!(event = name, error = ?e, "failed to remove listener");
			}
		}
	}
}

impl fmt::Debug for DomListeners {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DomListeners").finish_non_exhaustive()
	}
}

/// Intercepts link clicks and navigate requests inside `root`.
///
/// The listeners hold a weak handle: they go quiet once the controller is
/// dropped.
pub fn mount<R: Renderable, H: History>(
	controller: &NavigationController<R, H>,
	root: &EventTarget,
) -> Result<DomListeners> {
	let weak = controller.downgrade();
	let click = Closure::wrap(Box::new(move |event: Event| {
		let Some(controller) = weak.upgrade() else {
			return;
		};
		let Ok(event) = event.dyn_into::<MouseEvent>() else {
			return;
		};
		if let Err(err) = controller.handle_link_activation(&DomActivation(event)) {
			tracing::error!(error = %err, "link navigation failed");
		}
	}) as Box<dyn FnMut(_)>);

	let weak = controller.downgrade();
	let navigate = Closure::wrap(Box::new(move |event: Event| {
		let Some(controller) = weak.upgrade() else {
			return;
		};
		let Ok(event) = event.dyn_into::<CustomEvent>() else {
			tracing::debug!("navigate event is not a CustomEvent");
			return;
		};
		if let Err(err) = controller.handle_navigate_event(&DomNavigate(event)) {
			tracing::error!(error = %err, "navigate request failed");
		}
	}) as Box<dyn FnMut(_)>);

	root.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
		.map_err(|e| js_error("failed to add click listener", e))?;
	// The guard removes both listeners, so build it before the second add.
	let listeners = DomListeners {
		target: root.clone(),
		click,
		navigate,
	};
	root.add_event_listener_with_callback(NAVIGATE, listeners.navigate.as_ref().unchecked_ref())
		.map_err(|e| js_error("failed to add navigate listener", e))?;

	tracing::debug!("router mounted");
	Ok(listeners)
}
