//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only and never modifies the world.

use hecs::World;

use skyraid_core::components::*;
use skyraid_core::enums::GamePhase;
use skyraid_core::events::{AudioEvent, PresentationEvent};
use skyraid_core::state::*;
use skyraid_core::types::{Position, SimTime, Velocity};

use crate::player::PlayerStatus;
use crate::registry::{self, entity_id};
use crate::wave::WaveController;

/// Everything outside the world that a snapshot reports.
pub struct SnapshotInputs<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub score: u64,
    pub wave: &'a WaveController,
    pub player: &'a PlayerStatus,
    pub parallax: Vec<f64>,
    pub debug_overlay: bool,
    pub presentation_events: Vec<PresentationEvent>,
    pub audio_events: Vec<AudioEvent>,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(world: &World, inputs: SnapshotInputs) -> GameStateSnapshot {
    GameStateSnapshot {
        time: inputs.time,
        phase: inputs.phase,
        score: inputs.score,
        wave: inputs.wave.view(),
        player: build_player(world, inputs.player),
        standard_enemies: build_standard_enemies(world),
        heavy_enemies: build_heavy_enemies(world),
        player_bullets: build_player_bullets(world),
        enemy_bullets: build_enemy_bullets(world),
        parallax: inputs.parallax,
        debug_overlay: inputs.debug_overlay,
        presentation_events: inputs.presentation_events,
        audio_events: inputs.audio_events,
    }
}

fn build_player(world: &World, status: &PlayerStatus) -> PlayerView {
    let ship = registry::player_entity(world);
    let position = ship
        .and_then(|e| world.get::<&Position>(e).ok().map(|p| *p))
        .unwrap_or_default();

    PlayerView {
        entity: ship.map(entity_id),
        position,
        health: status.health(),
        invincible: status.is_invincible(),
        dead: status.is_dead(),
    }
}

fn build_standard_enemies(world: &World) -> Vec<StandardEnemyView> {
    let mut views: Vec<StandardEnemyView> = world
        .query::<(&StandardEnemy, &Position)>()
        .iter()
        .map(|(entity, (enemy, pos))| StandardEnemyView {
            entity: entity_id(entity),
            position: *pos,
            phase: enemy.phase,
        })
        .collect();

    views.sort_by_key(|v| v.entity);
    views
}

fn build_heavy_enemies(world: &World) -> Vec<HeavyEnemyView> {
    let mut views: Vec<HeavyEnemyView> = world
        .query::<(&HeavyEnemy, &Position, &Velocity)>()
        .iter()
        .map(|(entity, (heavy, pos, vel))| HeavyEnemyView {
            entity: entity_id(entity),
            position: *pos,
            velocity: *vel,
            phase: heavy.phase,
            hit_points: heavy.hit_points,
            invincible: heavy.invincible,
        })
        .collect();

    views.sort_by_key(|v| v.entity);
    views
}

fn build_player_bullets(world: &World) -> Vec<BulletView> {
    let mut views: Vec<BulletView> = world
        .query::<(&PlayerBullet, &Position, &Velocity)>()
        .iter()
        .map(|(entity, (_, pos, vel))| BulletView {
            entity: entity_id(entity),
            position: *pos,
            velocity: *vel,
        })
        .collect();

    views.sort_by_key(|v| v.entity);
    views
}

fn build_enemy_bullets(world: &World) -> Vec<EnemyBulletView> {
    let mut views: Vec<EnemyBulletView> = world
        .query::<(&EnemyBullet, &Position, &Velocity)>()
        .iter()
        .map(|(entity, (bullet, pos, vel))| EnemyBulletView {
            entity: entity_id(entity),
            position: *pos,
            velocity: *vel,
            origin: bullet.origin,
        })
        .collect();

    views.sort_by_key(|v| v.entity);
    views
}
