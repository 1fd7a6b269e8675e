//! Keyboard input mapping and held-key state

pub mod keys;

pub use keys::{KeySet, LogicalKey};
