//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` plus whatever bookkeeping
//! they need passed in explicitly. They do not own state.

pub mod cleanup;
pub mod heavy_ai;
pub mod movement;
pub mod parallax;
pub mod player_control;
pub mod snapshot;
pub mod standard_ai;
