//! Client-side route resolution for Reinhardt.
//!
//! This crate resolves the browser's current location to something to render
//! and keeps that location in sync with the session history:
//!
//! - [`Route`] declarations are normalized into an immutable [`RouteTable`];
//! - [`match_path`] walks the table with greedy literal-prefix matching;
//! - [`resolve`] follows redirects (at most [`MAX_REDIRECTS`]) to a
//!   renderable, or to the error template when nothing matches;
//! - [`NavigationController`] owns the observable current path, handles
//!   back/forward moves, navigate requests and link activations, and writes
//!   history (push for navigation, replace for redirect hops).
//!
//! Routes can also be loaded from TOML or JSON, see [`RoutesConfig`].
//!
//! ## Example
//!
//! ```
//! use reinhardt_router::{MemoryHistory, NavigationController, Route};
//!
//! let router = NavigationController::new(MemoryHistory::default()).unwrap();
//! router
//! 	.set_routes(vec![
//! 		Route::view("", "home".to_string()),
//! 		Route::branch("users", vec![Route::view("/list", "user list".to_string())]),
//! 	])
//! 	.unwrap();
//!
//! router.navigate(["users", "list"]).unwrap();
//! assert_eq!(router.current_render().as_deref(), Some("user list"));
//! ```
//!
//! ## Browser
//!
//! On `wasm32`, `BrowserHistory` binds to `window.history` and `mount` installs
//! the click and [`NAVIGATE`] listeners on a DOM subtree.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod history;
pub mod matcher;
pub mod path;
pub mod renderable;
pub mod resolver;
pub mod route;
pub mod table;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{ComponentRegistry, ConfigError, RouteConfig, RoutesConfig};
pub use controller::{NavigationController, WeakNavigationController};
pub use error::{Result, RouterError};
pub use events::{
	ActivationEvent, Anchor, LinkClick, NAVIGATE, NavigateDetail, NavigateEvent, NavigateRequest,
	NavigateTarget, RouterEvent,
};
pub use history::{History, HistoryRecord, ListenerId, MemoryHistory, NavigationType, PopListener};
pub use matcher::{RouteMatch, match_path};
pub use path::normalize;
pub use renderable::{NOT_FOUND_TEXT, Renderable};
pub use resolver::{MAX_REDIRECTS, Resolution, Resolved, resolve};
pub use route::Route;
pub use table::{RouteEntry, RouteId, RouteTable};

#[cfg(target_arch = "wasm32")]
pub use web::{BrowserHistory, DomListeners, mount};
