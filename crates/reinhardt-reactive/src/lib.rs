//! Observable cells for Reinhardt client-side navigation.
//!
//! This crate provides the small reactive layer the navigation controller is
//! built on:
//!
//! - [`Signal`]: a shared mutable cell whose subscribers are called
//!   synchronously, in subscription order, every time the value is written.
//! - [`Subscription`]: the handle returned by [`Signal::subscribe`]. Dropping it
//!   removes the callback.
//! - [`Effect`]: a watcher that runs once immediately and again on every change
//!   of the signal it watches.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`), matching the browser
//! event loop the router runs on. There is no scheduler: by the time
//! [`Signal::set`] returns, every dependent computation has already run.
//!
//! ## Example
//!
//! ```
//! use reinhardt_reactive::{Effect, Signal};
//!
//! let path = Signal::new(String::from("home"));
//! let length = Signal::new(0usize);
//!
//! let sink = length.clone();
//! let _effect = Effect::watch(&path, move |p: &String| sink.set(p.len()));
//! assert_eq!(length.get(), 4);
//!
//! path.set(String::from("users/42"));
//! assert_eq!(length.get(), 8);
//! ```

pub mod effect;
pub mod signal;

pub use effect::Effect;
pub use signal::{NodeId, Signal, Subscription};
