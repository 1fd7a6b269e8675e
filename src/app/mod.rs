//! Application orchestration layer
//!
//! The controller turns key and timer events into window motion; the state
//! module holds the read-only views of it used by rendering.

pub mod controller;
pub mod state;

pub use controller::{MotionController, WindowSurface};
pub use state::{StatusSnapshot, VisualState};
