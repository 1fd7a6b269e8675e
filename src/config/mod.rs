//! Configuration module for roamer
//!
//! The two program variants are expressed as `MotionConfig` presets. The
//! variant is chosen at build time; nothing is read from disk or the
//! command line.

pub mod motion;

pub use motion::{ConfigError, MotionConfig, Variant};
