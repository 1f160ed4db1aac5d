//! Enemy AI for SKYRAID.
//!
//! Implements the standard and heavy enemy behavior state machines and the
//! motion helpers they share (sine paths, aimed shots).

pub mod fsm;
pub mod motion;

pub use skyraid_core as core;
