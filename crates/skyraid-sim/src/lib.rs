//! Simulation engine for SKYRAID.
//!
//! Owns the hecs ECS world, the clock and the wave/player bookkeeping, runs
//! systems at a fixed tick rate, and produces GameStateSnapshots for the
//! presentation layer.

pub mod clock;
pub mod combat;
pub mod engine;
pub mod overlap;
pub mod player;
pub mod registry;
pub mod systems;
pub mod wave;

pub use skyraid_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use overlap::{HitboxDetector, OverlapDetector};

#[cfg(test)]
mod tests;
