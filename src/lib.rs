//! # Reinhardt Navigation
//!
//! Client-side navigation for Reinhardt single-page applications.
//!
//! Reinhardt Navigation resolves the browser location to something to render:
//! routes are declared as a tree, matched by literal prefix, redirects are
//! followed with a bounded hop count, and the browser history is kept in sync
//! with an observable current path.
//!
//! ## Feature Flags
//!
//! - `router` (default) - Route tables, matching, redirects and the navigation controller
//! - `reactive` (default) - Observable cells (`Signal`, `Effect`)
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_navigation::prelude::*;
//!
//! let history = MemoryHistory::default();
//! let router = NavigationController::new(history.clone()).unwrap();
//! router
//! 	.set_routes(vec![
//! 		Route::view("", "home"),
//! 		Route::redirect("old", "new"),
//! 		Route::view("new", "new page"),
//! 	])
//! 	.unwrap();
//!
//! router.navigate("old").unwrap();
//! assert_eq!(router.current_render(), Some("new page"));
//! assert_eq!(history.href().unwrap(), "http://localhost/new");
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "reactive")]
#[cfg_attr(docsrs, doc(cfg(feature = "reactive")))]
pub mod reactive;
#[cfg(feature = "router")]
#[cfg_attr(docsrs, doc(cfg(feature = "router")))]
pub mod router;

#[cfg(feature = "reactive")]
pub use reinhardt_reactive::{Effect, Signal, Subscription};

#[cfg(feature = "router")]
pub use reinhardt_router::{
	History, MemoryHistory, NavigationController, Route, RouteTable, RouterError, RoutesConfig,
};

#[cfg(all(feature = "router", target_arch = "wasm32"))]
pub use reinhardt_router::{BrowserHistory, mount};

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "reactive")]
	pub use crate::{Effect, Signal, Subscription};

	#[cfg(feature = "router")]
	pub use reinhardt_router::{
		ComponentRegistry, History, LinkClick, MemoryHistory, NavigateRequest, NavigationController,
		Renderable, Route, RouterError, RoutesConfig, match_path, resolve,
	};

	#[cfg(all(feature = "router", target_arch = "wasm32"))]
	pub use reinhardt_router::{BrowserHistory, mount};
}
