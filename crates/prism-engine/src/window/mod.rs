//! Platform window + event loop.
//!
//! [`Runtime`] owns the single demo window, the GPU context bound to it and
//! the input/timing state, and drives a [`crate::core::App`] through winit's
//! `ApplicationHandler`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
