//! Camera types.
//!
//! The camera is an explicit per-run struct owned by each demo and updated
//! from the input state once per frame; no global or static camera exists.

mod fly;

pub use fly::FlyCamera;
