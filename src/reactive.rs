//! Synchronous observable cells
//!
//! This module provides access to reinhardt-reactive, the signal layer the
//! navigation controller publishes its current path and render output through.

pub use reinhardt_reactive::*;
