//! Navigation controller.
//!
//! [`NavigationController`] owns the observable current path and keeps it in
//! sync with the browser history:
//!
//! - back/forward moves set the current path from the new location;
//! - navigate requests and same-origin link activations push a history entry
//!   and set the current path;
//! - every change of the current path re-runs redirect resolution against the
//!   active route table and publishes the result to [`render`](NavigationController::render).
//!
//! Redirect hops replace (never push) the current history entry, one replace
//! per hop, and the final path is published to the current path.
//!
//! Everything runs synchronously on the thread that delivers the input: when
//! an input method returns, the render output already reflects it.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use reinhardt_reactive::{Effect, Signal};
use url::Url;

use crate::error::{Result, RouterError};
use crate::events::{ActivationEvent, NavigateEvent, NavigateTarget};
use crate::history::{History, ListenerId};
use crate::path::{normalize, pathname, to_history_url};
use crate::renderable::Renderable;
use crate::resolver::{Resolved, resolve};
use crate::route::Route;
use crate::table::RouteTable;

struct Inner<R: Renderable, H: History> {
	history: H,
	/// Active table. Replaced wholesale; resolutions in flight keep their `Rc`.
	routes: RefCell<Rc<RouteTable<R>>>,
	error_template: RefCell<R>,
	/// Normalized pathname of the active location.
	current_path: Signal<String>,
	/// Last successful resolution output.
	render: Signal<Option<R>>,
	last_error: RefCell<Option<RouterError>>,
	resolving: Cell<bool>,
	/// Set when the current path changes during a resolution.
	pending: Cell<bool>,
	effect: RefCell<Option<Effect>>,
	pop_listener: Cell<Option<ListenerId>>,
}

impl<R: Renderable, H: History> Inner<R, H> {
	fn recompute(&self, path: &str) {
		// A change made while resolving (the redirect write-back, or an
		// observer navigating) is resolved once the running pass ends.
		if self.resolving.replace(true) {
			self.pending.set(true);
			return;
		}

		let mut path = path.to_string();
		loop {
			self.pending.set(false);
			let published = self.resolve_and_publish(&path);
			let current = self.current_path.get();
			if !self.pending.get() || current == published {
				break;
			}
			tracing::debug!(path = %current, "path changed during resolution");
			path = current;
		}

		self.resolving.set(false);
	}

	/// Resolves `path` and publishes the outcome. Returns the path the
	/// outcome belongs to.
	fn resolve_and_publish(&self, path: &str) -> String {
		let table = Rc::clone(&self.routes.borrow());
		let error_template = self.error_template.borrow().clone();

		match resolve(path, &table, &error_template).and_then(|resolved| self.apply(resolved)) {
			Ok((renderable, published)) => {
				self.last_error.replace(None);
				self.render.set(Some(renderable));
				published
			}
			Err(err) => {
				tracing::error!(path = %path, error = %err, "route resolution failed");
				self.last_error.replace(Some(err));
				path.to_string()
			}
		}
	}

	fn apply(&self, resolved: Resolved<R>) -> Result<(R, String)> {
		let published = if resolved.redirected() {
			for target in &resolved.redirects {
				self.history.replace(&to_history_url(target))?;
			}
			let published = normalize(&resolved.path).to_string();
			self.current_path.set(published.clone());
			published
		} else {
			resolved.path
		};
		if !resolved.resolution.is_rendered() {
			tracing::warn!(path = %published, "no route matched, rendering error template");
		}
		Ok((resolved.resolution.into_renderable(), published))
	}

	fn set_path(&self, path: String) -> Result<()> {
		self.last_error.replace(None);
		self.current_path.set(path);
		self.take_error()
	}

	fn rerun(&self) -> Result<()> {
		let path = self.current_path.get();
		self.recompute(&path);
		self.take_error()
	}

	fn take_error(&self) -> Result<()> {
		match self.last_error.borrow_mut().take() {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}

	/// Normalized pathname of the history's current entry.
	fn location_path(&self) -> Result<String> {
		pathname(&self.history.href()?)
	}

	fn sync_from_location(&self) -> Result<()> {
		let path = self.location_path()?;
		tracing::debug!(path = %path, "history moved");
		self.set_path(path)
	}

	fn release(&self) {
		if let Some(id) = self.pop_listener.take() {
			self.history.unlisten(id);
		}
		// Dropped outside the borrow: disposing unsubscribes from current_path.
		let effect = self.effect.borrow_mut().take();
		drop(effect);
	}
}

impl<R: Renderable, H: History> Drop for Inner<R, H> {
	fn drop(&mut self) {
		self.release();
	}
}

/// Resolves the current location and keeps it in sync with browser history.
///
/// The controller is a cheap handle (`Rc`); clones share state. Listeners
/// registered at construction are released by [`teardown`](Self::teardown)
/// or when the last handle is dropped.
///
/// # Example
///
/// ```
/// use reinhardt_router::{MemoryHistory, NavigationController, Route};
///
/// let history = MemoryHistory::new("http://localhost/").unwrap();
/// let router = NavigationController::new(history.clone()).unwrap();
/// router
/// 	.set_routes(vec![
/// 		Route::view("", "Home"),
/// 		Route::redirect("old", "users"),
/// 		Route::view("users", "Users"),
/// 	])
/// 	.unwrap();
/// assert_eq!(router.current_render(), Some("Home"));
///
/// router.navigate("old").unwrap();
/// assert_eq!(router.current_render(), Some("Users"));
/// assert_eq!(router.current_path_value(), "users");
/// assert_eq!(history.push_count(), 1);
/// assert_eq!(history.replace_count(), 1);
/// ```
pub struct NavigationController<R: Renderable, H: History> {
	inner: Rc<Inner<R, H>>,
}

impl<R: Renderable, H: History> Clone for NavigationController<R, H> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<R: Renderable, H: History> fmt::Debug for NavigationController<R, H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NavigationController")
			.field("current_path", &self.inner.current_path.get())
			.field("routes_count", &self.inner.routes.borrow().len())
			.field("listening", &self.inner.pop_listener.get().is_some())
			.finish()
	}
}

impl<R: Renderable, H: History> NavigationController<R, H> {
	/// Creates a controller on `history`.
	///
	/// Reads the current location, resolves it against an empty table (so the
	/// error template renders until routes are set) and starts listening for
	/// back/forward moves.
	pub fn new(history: H) -> Result<Self> {
		let initial_path = pathname(&history.href()?)?;

		let inner = Rc::new(Inner {
			history,
			routes: RefCell::new(Rc::new(RouteTable::default())),
			error_template: RefCell::new(R::not_found()),
			current_path: Signal::new(initial_path),
			render: Signal::new(None),
			last_error: RefCell::new(None),
			resolving: Cell::new(false),
			pending: Cell::new(false),
			effect: RefCell::new(None),
			pop_listener: Cell::new(None),
		});

		let weak = Rc::downgrade(&inner);
		let effect = Effect::watch(&inner.current_path, move |path: &String| {
			if let Some(inner) = weak.upgrade() {
				inner.recompute(path);
			}
		});
		inner.effect.replace(Some(effect));

		let weak = Rc::downgrade(&inner);
		let listener = inner.history.listen(Rc::new(move || {
			// No caller to return to: keep the error readable via last_error.
			if let Some(inner) = weak.upgrade()
				&& let Err(err) = inner.sync_from_location()
			{
				tracing::error!(error = %err, "failed to sync with history");
				inner.last_error.replace(Some(err));
			}
		}))?;
		inner.pop_listener.set(Some(listener));

		tracing::debug!(path = %inner.current_path.get(), "navigation controller ready");
		Ok(Self { inner })
	}

	/// Replaces the route table and re-resolves the current path.
	pub fn set_routes(&self, routes: Vec<Route<R>>) -> Result<()> {
		let table = RouteTable::build(routes);
		tracing::debug!(routes = table.len(), "route table replaced");
		self.inner.routes.replace(Rc::new(table));
		self.inner.rerun()
	}

	/// Replaces the error template and re-resolves the current path.
	pub fn set_error_template(&self, error_template: R) -> Result<()> {
		self.inner.error_template.replace(error_template);
		self.inner.rerun()
	}

	/// Navigates to `target`, pushing a history entry.
	///
	/// The current path is read back from the pushed entry, so a query or a
	/// fragment in `target` never ends up in it.
	///
	/// # Errors
	///
	/// Configuration errors from resolving the new path, or a history failure.
	/// On a resolution error the history entry has already been pushed and the
	/// previous render output stays in place.
	pub fn navigate(&self, target: impl Into<NavigateTarget>) -> Result<()> {
		let target = target.into().to_path();
		self.inner.history.push(&to_history_url(normalize(&target)))?;
		let path = self.inner.location_path()?;
		tracing::debug!(target = %target, path = %path, "navigate");
		self.inner.set_path(path)
	}

	/// Handles a navigate request event. Returns whether it was consumed.
	///
	/// A request without a valid detail is ignored.
	pub fn handle_navigate_event<E: NavigateEvent + ?Sized>(&self, event: &E) -> Result<bool> {
		let Some(detail) = event.detail() else {
			tracing::debug!("navigate request without a valid detail ignored");
			return Ok(false);
		};
		event.stop_propagation();
		self.navigate(detail.go)?;
		Ok(true)
	}

	/// Handles an activation event. Returns whether the router took it over.
	///
	/// The router leaves to the browser: activations not on a link, modified
	/// activations, links opening in another browsing context, download links,
	/// unparsable links and links to another host. Everything else has its
	/// default suppressed, propagation stopped, and is navigated in-app.
	pub fn handle_link_activation<E: ActivationEvent + ?Sized>(&self, event: &E) -> Result<bool> {
		let Some(anchor) = event.anchor() else {
			return Ok(false);
		};
		if event.is_modified() || anchor.download || !anchor.opens_in_place() {
			return Ok(false);
		}

		let base = Url::parse(&self.inner.history.href()?)?;
		let link = match base.join(&anchor.href) {
			Ok(link) => link,
			Err(err) => {
				tracing::debug!(href = %anchor.href, error = %err, "unparsable link left to the browser");
				return Ok(false);
			}
		};
		if !same_authority(&base, &link) {
			tracing::debug!(href = %link, "cross-authority link left to the browser");
			return Ok(false);
		}

		event.prevent_default();
		event.stop_propagation();

		let path = normalize(link.path()).to_string();
		tracing::debug!(path = %path, "link intercepted");
		self.inner.history.push(&to_history_url(&path))?;
		self.inner.set_path(path)?;
		Ok(true)
	}

	/// Syncs the current path with the history's location.
	///
	/// Called by the history listener on back/forward; never writes history
	/// except to replace entries for redirects.
	pub fn handle_pop_state(&self) -> Result<()> {
		self.inner.sync_from_location()
	}

	/// The current path signal.
	pub fn current_path(&self) -> Signal<String> {
		self.inner.current_path.clone()
	}

	/// The current normalized path.
	pub fn current_path_value(&self) -> String {
		self.inner.current_path.get()
	}

	/// The render output signal. `None` until a resolution succeeds.
	pub fn render(&self) -> Signal<Option<R>> {
		self.inner.render.clone()
	}

	/// The current render output.
	pub fn current_render(&self) -> Option<R> {
		self.inner.render.get()
	}

	/// Resolves `path` against the active table without navigating.
	pub fn resolve(&self, path: &str) -> Result<Resolved<R>> {
		let table = Rc::clone(&self.inner.routes.borrow());
		let error_template = self.inner.error_template.borrow().clone();
		resolve(path, &table, &error_template)
	}

	/// The active route table.
	pub fn routes(&self) -> Rc<RouteTable<R>> {
		Rc::clone(&self.inner.routes.borrow())
	}

	/// The error template.
	pub fn error_template(&self) -> R {
		self.inner.error_template.borrow().clone()
	}

	/// The error from the latest failed resolution not yet returned to a
	/// caller (e.g. one triggered by a back/forward move).
	pub fn last_error(&self) -> Option<RouterError> {
		self.inner.last_error.borrow().clone()
	}

	/// The history backend.
	pub fn history(&self) -> &H {
		&self.inner.history
	}

	/// Whether the back/forward listener is registered.
	pub fn is_listening(&self) -> bool {
		self.inner.pop_listener.get().is_some()
	}

	/// Stops listening to history and stops re-resolving on path changes.
	///
	/// Idempotent. The last render output stays readable.
	pub fn teardown(&self) {
		tracing::debug!("navigation controller torn down");
		self.inner.release();
	}

	/// A weak handle, for callbacks that must not keep the controller alive.
	pub fn downgrade(&self) -> WeakNavigationController<R, H> {
		WeakNavigationController {
			inner: Rc::downgrade(&self.inner),
		}
	}
}

/// A non-owning [`NavigationController`] handle.
pub struct WeakNavigationController<R: Renderable, H: History> {
	inner: Weak<Inner<R, H>>,
}

impl<R: Renderable, H: History> Clone for WeakNavigationController<R, H> {
	fn clone(&self) -> Self {
		Self {
			inner: Weak::clone(&self.inner),
		}
	}
}

impl<R: Renderable, H: History> WeakNavigationController<R, H> {
	/// The controller, if it is still alive.
	pub fn upgrade(&self) -> Option<NavigationController<R, H>> {
		self.inner
			.upgrade()
			.map(|inner| NavigationController { inner })
	}
}

fn same_authority(a: &Url, b: &Url) -> bool {
	a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::events::{Anchor, LinkClick, NavigateRequest};
	use crate::history::MemoryHistory;
	use rstest::{fixture, rstest};

	type Controller = NavigationController<&'static str, MemoryHistory>;

	#[fixture]
	fn history() -> MemoryHistory {
		MemoryHistory::new("http://localhost/").unwrap()
	}

	fn routes() -> Vec<Route<&'static str>> {
		vec![
			Route::view("", "Home"),
			Route::redirect("old", "legacy"),
			Route::redirect("legacy", "users"),
			Route::view("users", "Users"),
			Route::branch("a", vec![Route::view("b", "AB")]),
		]
	}

	fn controller(history: &MemoryHistory) -> Controller {
		let controller = NavigationController::new(history.clone()).unwrap();
		controller.set_routes(routes()).unwrap();
		controller
	}

	#[rstest]
	fn test_initial_render_without_routes_is_default_error(history: MemoryHistory) {
		let controller: Controller = NavigationController::new(history).unwrap();
		assert_eq!(controller.current_render(), Some("404"));
		assert_eq!(controller.current_path_value(), "");
	}

	#[rstest]
	fn test_initial_path_from_location() {
		let history = MemoryHistory::new("http://localhost/users?x=1").unwrap();
		let controller = controller(&history);

		assert_eq!(controller.current_path_value(), "users");
		assert_eq!(controller.current_render(), Some("Users"));
	}

	#[rstest]
	fn test_set_routes_rerenders(history: MemoryHistory) {
		let controller = controller(&history);
		assert_eq!(controller.current_render(), Some("Home"));
	}

	#[rstest]
	fn test_navigate_pushes_and_renders(history: MemoryHistory) {
		let controller = controller(&history);
		controller.navigate("/users").unwrap();

		assert_eq!(controller.current_path_value(), "users");
		assert_eq!(controller.current_render(), Some("Users"));
		assert_eq!(history.push_count(), 1);
		assert_eq!(history.href().unwrap(), "http://localhost/users");
	}

	#[rstest]
	fn test_navigate_segments_equals_path(history: MemoryHistory) {
		let controller = controller(&history);

		controller.navigate(["a", "b"]).unwrap();
		assert_eq!(controller.current_path_value(), "a/b");
		assert_eq!(controller.current_render(), Some("AB"));

		controller.navigate("a/b").unwrap();
		assert_eq!(controller.current_path_value(), "a/b");
		assert_eq!(
			history.entries(),
			vec![
				"http://localhost/",
				"http://localhost/a/b",
				"http://localhost/a/b"
			]
		);
	}

	#[rstest]
	fn test_redirect_chain_replaces_once_per_hop(history: MemoryHistory) {
		let controller = controller(&history);
		controller.navigate("old").unwrap();

		assert_eq!(controller.current_render(), Some("Users"));
		assert_eq!(controller.current_path_value(), "users");
		assert_eq!(history.push_count(), 1);
		assert_eq!(history.replace_count(), 2);
		assert_eq!(history.len(), 2);
		assert_eq!(history.href().unwrap(), "http://localhost/users");
	}

	#[rstest]
	fn test_not_found_renders_error_template(history: MemoryHistory) {
		let controller = controller(&history);
		controller.set_error_template("Custom 404").unwrap();
		controller.navigate("nowhere").unwrap();

		assert_eq!(controller.current_render(), Some("Custom 404"));
	}

	#[rstest]
	fn test_redirect_loop_is_returned_and_render_kept(history: MemoryHistory) {
		let controller: Controller = NavigationController::new(history.clone()).unwrap();
		controller
			.set_routes(vec![
				Route::view("", "Home"),
				Route::redirect("a", "b"),
				Route::redirect("b", "a"),
			])
			.unwrap();

		let err = controller.navigate("a").unwrap_err();

		assert!(matches!(err, RouterError::TooManyRedirects { hops: 10, .. }));
		assert_eq!(controller.current_render(), Some("Home"));
		assert_eq!(history.replace_count(), 0);
		assert!(controller.last_error().is_none());
	}

	#[rstest]
	fn test_missing_renderable_is_returned(history: MemoryHistory) {
		let controller: Controller = NavigationController::new(history).unwrap();
		let err = controller.set_routes(vec![Route::new("")]).unwrap_err();
		assert_eq!(
			err,
			RouterError::MissingRenderable {
				path: String::new()
			}
		);
	}

	#[rstest]
	fn test_same_authority_link_intercepted(history: MemoryHistory) {
		let controller = controller(&history);
		let click = LinkClick::href("/users");

		assert!(controller.handle_link_activation(&click).unwrap());
		assert!(click.default_prevented());
		assert!(click.propagation_stopped());
		assert_eq!(history.push_count(), 1);
		assert_eq!(controller.current_render(), Some("Users"));
	}

	#[rstest]
	#[case(LinkClick::href("https://example.com/users"))]
	#[case(LinkClick::href("http://localhost:8080/users"))]
	#[case(LinkClick::href("mailto:someone@example.com"))]
	#[case(LinkClick::href("/users").modified(true))]
	#[case(LinkClick::new(Anchor::new("/users").with_target("_blank")))]
	#[case(LinkClick::new(Anchor::new("/users").with_download(true)))]
	#[case(LinkClick::elsewhere())]
	fn test_activation_left_to_browser(history: MemoryHistory, #[case] click: LinkClick) {
		let controller = controller(&history);

		assert!(!controller.handle_link_activation(&click).unwrap());
		assert!(!click.default_prevented());
		assert!(!click.propagation_stopped());
		assert_eq!(history.push_count(), 0);
		assert_eq!(controller.current_path_value(), "");
	}

	#[rstest]
	fn test_relative_link_resolves_against_location() {
		let history = MemoryHistory::new("http://localhost/a/").unwrap();
		let controller = controller(&history);

		assert!(controller.handle_link_activation(&LinkClick::href("b")).unwrap());
		assert_eq!(controller.current_path_value(), "a/b");
	}

	#[rstest]
	fn test_navigate_event_consumed(history: MemoryHistory) {
		let controller = controller(&history);
		let request = NavigateRequest::new(["users"]);

		assert!(controller.handle_navigate_event(&request).unwrap());
		assert!(request.propagation_stopped());
		assert_eq!(controller.current_render(), Some("Users"));
	}

	#[rstest]
	fn test_navigate_event_without_detail_ignored(history: MemoryHistory) {
		let controller = controller(&history);
		let request = NavigateRequest::empty();

		assert!(!controller.handle_navigate_event(&request).unwrap());
		assert!(!request.propagation_stopped());
		assert_eq!(history.push_count(), 0);
	}

	#[rstest]
	fn test_back_forward_updates_without_push(history: MemoryHistory) {
		let controller = controller(&history);
		controller.navigate("users").unwrap();

		assert!(history.back());
		assert_eq!(controller.current_path_value(), "");
		assert_eq!(controller.current_render(), Some("Home"));

		assert!(history.forward());
		assert_eq!(controller.current_path_value(), "users");
		assert_eq!(history.push_count(), 1);
		assert_eq!(history.len(), 2);
	}

	#[rstest]
	fn test_teardown_stops_listening(history: MemoryHistory) {
		let controller = controller(&history);
		controller.navigate("users").unwrap();
		assert_eq!(history.listener_count(), 1);

		controller.teardown();
		assert!(!controller.is_listening());
		assert_eq!(history.listener_count(), 0);

		history.back();
		assert_eq!(controller.current_path_value(), "users");
	}

	#[rstest]
	fn test_drop_releases_listener(history: MemoryHistory) {
		let controller = controller(&history);
		drop(controller);
		assert_eq!(history.listener_count(), 0);
	}

	#[rstest]
	fn test_current_path_observers_see_final_redirect_target(history: MemoryHistory) {
		let controller = controller(&history);
		let seen = Rc::new(RefCell::new(Vec::new()));

		let sink = Rc::clone(&seen);
		let _sub = controller
			.current_path()
			.subscribe(move |p| sink.borrow_mut().push(p.clone()));

		controller.navigate("old").unwrap();
		assert_eq!(seen.borrow().last().map(String::as_str), Some("users"));
	}

	#[rstest]
	fn test_navigation_from_observer_during_redirect_is_resolved(history: MemoryHistory) {
		let controller: Controller = NavigationController::new(history.clone()).unwrap();
		controller
			.set_routes(vec![
				Route::view("", "Home"),
				Route::redirect("old", "users"),
				Route::view("users", "Users"),
				Route::view("next", "Next"),
			])
			.unwrap();

		let weak = controller.downgrade();
		let _sub = controller.current_path().subscribe(move |p: &String| {
			if p == "users"
				&& let Some(controller) = weak.upgrade()
			{
				controller.navigate("next").unwrap();
			}
		});

		controller.navigate("old").unwrap();

		assert_eq!(controller.current_path_value(), "next");
		assert_eq!(controller.current_render(), Some("Next"));
		assert_eq!(history.href().unwrap(), "http://localhost/next");
		assert_eq!(history.push_count(), 2);
	}

	#[rstest]
	#[case("#top", "", Some("Home"), "http://localhost/#top")]
	#[case("a/b?q=1#x", "a/b", Some("AB"), "http://localhost/a/b?q=1#x")]
	#[case("//x", "x", Some("404"), "http://localhost/x")]
	fn test_navigate_path_matches_pushed_entry(
		history: MemoryHistory,
		#[case] target: &str,
		#[case] path: &str,
		#[case] render: Option<&'static str>,
		#[case] href: &str,
	) {
		let controller = controller(&history);

		controller.navigate(target).unwrap();
		assert_eq!(history.href().unwrap(), href);
		assert_eq!(controller.current_path_value(), path);
		assert_eq!(controller.current_render(), render);

		controller.handle_pop_state().unwrap();
		assert_eq!(controller.current_path_value(), path);
		assert_eq!(controller.current_render(), render);
	}

	#[rstest]
	fn test_resolve_is_pure(history: MemoryHistory) {
		let controller = controller(&history);
		let resolved = controller.resolve("old").unwrap();

		assert_eq!(resolved.redirects, vec!["legacy", "users"]);
		assert_eq!(history.replace_count(), 0);
		assert_eq!(controller.current_path_value(), "");
	}

	#[rstest]
	fn test_weak_handle(history: MemoryHistory) {
		let controller = controller(&history);
		let weak = controller.downgrade();
		assert!(weak.upgrade().is_some());

		drop(controller);
		assert!(weak.upgrade().is_none());
	}
}
