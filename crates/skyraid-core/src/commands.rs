//! Player input sent from the input collaborator to the simulation.
//!
//! Intents are sampled once per tick; commands are queued and processed at
//! the next tick boundary.

use serde::{Deserialize, Serialize};

/// Held directional/fire intents for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputIntent {
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

/// Discrete player actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Tear everything down and start again from wave 1.
    Restart,
    /// Flip the hitbox debug overlay flag reported in snapshots.
    ToggleDebugOverlay,
}
