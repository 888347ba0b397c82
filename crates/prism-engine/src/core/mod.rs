//! Contracts between the runtime (platform loop) and the demos.
//!
//! Keeps the winit/wgpu plumbing out of demo code: a demo implements [`App`]
//! and receives a ready [`FrameCtx`] once per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
