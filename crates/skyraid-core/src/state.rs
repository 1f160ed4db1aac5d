//! Game state snapshot: the complete visible state handed to presentation each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioEvent, PresentationEvent};
use crate::types::{EntityId, Position, SimTime, Velocity};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub score: u64,
    pub wave: WaveView,
    pub player: PlayerView,
    pub standard_enemies: Vec<StandardEnemyView>,
    pub heavy_enemies: Vec<HeavyEnemyView>,
    pub player_bullets: Vec<BulletView>,
    pub enemy_bullets: Vec<EnemyBulletView>,
    /// Tile offsets of the parallax layers, back to front.
    pub parallax: Vec<f64>,
    pub debug_overlay: bool,
    /// Presentation requests raised during this tick.
    pub presentation_events: Vec<PresentationEvent>,
    /// Audio requests raised during this tick.
    pub audio_events: Vec<AudioEvent>,
}

/// Wave progress for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub wave_number: u32,
    pub status: WaveStatus,
    pub enemy_count: u32,
    pub enemies_remaining: u32,
    pub phase_spawned: u32,
    pub phase_defeated: u32,
    pub reinforcements_unlocked: bool,
    pub heavy_max: u32,
    pub heavies_spawned: u32,
}

/// Player ship status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub entity: Option<EntityId>,
    pub position: Position,
    pub health: i32,
    pub invincible: bool,
    pub dead: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardEnemyView {
    pub entity: EntityId,
    pub position: Position,
    pub phase: StandardPhase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeavyEnemyView {
    pub entity: EntityId,
    pub position: Position,
    pub velocity: Velocity,
    pub phase: HeavyPhase,
    pub hit_points: u32,
    pub invincible: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub entity: EntityId,
    pub position: Position,
    pub velocity: Velocity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBulletView {
    pub entity: EntityId,
    pub position: Position,
    pub velocity: Velocity,
    pub origin: BulletOrigin,
}
