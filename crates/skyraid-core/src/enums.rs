//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Standard enemy behavior phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StandardPhase {
    /// Drifting left along its sine path.
    #[default]
    Normal,
    /// Holding position before the dash.
    Waiting,
    /// Fast leftward dash.
    Dashing,
}

/// Heavy enemy behavior phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeavyPhase {
    /// Creeping in from the right edge toward its settle point.
    #[default]
    Entering,
    /// Parked at the settle point; fires one barrage per idle phase.
    Idle,
    /// Retreating off the left edge.
    Dashing,
}

/// Kind of live entity, as seen by the overlap collaborator and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    StandardEnemy,
    HeavyEnemy,
    PlayerBullet,
    EnemyBullet,
}

/// Who fired an enemy bullet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOrigin {
    /// Periodic straight shot from a standard enemy.
    Standard,
    /// Aimed barrage shot from a heavy enemy.
    Heavy,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    /// Player destroyed; world frozen until restart.
    GameOver,
}

/// Wave lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveStatus {
    #[default]
    InProgress,
    Complete,
}

/// Sound effects the audio collaborator knows how to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    EnemyExplosion,
    PlayerExplosion,
}

/// Timed banners shown by the presentation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BannerKind {
    /// "Wave N" announcement.
    Wave,
    /// Shown when the first half of a wave has been cleared.
    Reinforcements,
}
