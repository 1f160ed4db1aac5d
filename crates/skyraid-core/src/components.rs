//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems and the enemy state machines, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::TimerId;

/// Marks the player's ship.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Player;

/// Marks a bullet fired by the player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerBullet;

/// Marks a bullet fired by an enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub origin: BulletOrigin,
}

/// Origin of a standard enemy's sinusoidal vertical path.
///
/// `y = start_y + sin(start_time_ms + now_ms * frequency) * amplitude`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineMotion {
    pub start_y: f64,
    /// Simulation time (ms) at which this path began.
    pub start_time_ms: f64,
    /// Radians per millisecond.
    pub frequency: f64,
    /// Peak vertical offset in pixels.
    pub amplitude: f64,
}

/// Standard enemy state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardEnemy {
    pub phase: StandardPhase,
    pub motion: SineMotion,
    /// Pending Waiting → Dashing timer, if one is scheduled.
    pub pause_timer: Option<TimerId>,
    /// Repeating fire timer, scheduled at spawn.
    pub fire_timer: Option<TimerId>,
}

/// Heavy enemy state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeavyEnemy {
    pub phase: HeavyPhase,
    /// Remaining hit points. Only bullet damage can take this to zero.
    pub hit_points: u32,
    /// Set after ramming the player; body collisions are ignored while true.
    pub invincible: bool,
    pub invincibility_timer: Option<TimerId>,
    /// Simulation time (ms) at which the current idle phase began.
    pub idle_since_ms: u64,
    /// Whether the barrage for the current idle phase has been scheduled.
    pub has_fired_barrage: bool,
    /// x-coordinate the heavy parks at after entering.
    pub settle_x: f64,
}
