//! Client-side route resolution and history synchronization
//!
//! This module provides access to reinhardt-router:
//!
//! - **Route tables**: declarations normalized into an immutable arena
//! - **Matching**: greedy literal-prefix matching, first match wins
//! - **Redirects**: followed up to a fixed hop limit, replacing history entries
//! - **Navigation**: an observable current path driven by history, navigate
//!   requests and link activations
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_navigation::router::{MemoryHistory, NavigationController, Route};
//!
//! let router = NavigationController::new(MemoryHistory::default()).unwrap();
//! router.set_routes(vec![Route::view("", "home")]).unwrap();
//! assert_eq!(router.current_render(), Some("home"));
//! ```

pub use reinhardt_router::*;
