//! Entity registry: spawn factories, identity mapping and destruction.
//!
//! Live entities are hecs entities with a marker/state component plus
//! `Position` (and `Velocity` for anything the movement system integrates).
//! Destruction goes through [`destroy`], which cancels the entity's timers in
//! the same step that removes it from the world.

use hecs::{Entity, World};
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyraid_core::components::*;
use skyraid_core::config::{HeavyTuning, PlayerTuning, StandardTuning};
use skyraid_core::enums::*;
use skyraid_core::types::{EntityId, Position, Velocity};

use crate::clock::{Clock, TimerAction};
use crate::combat::{Combatant, CombatantState};
use crate::player::PlayerStatus;

/// Public identity for an entity.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Map a public identity back to a live entity.
pub fn resolve_id(world: &World, id: EntityId) -> Option<Entity> {
    Entity::from_bits(id.0).filter(|entity| world.contains(*entity))
}

/// Spawn the player's ship at its start position.
pub fn spawn_player(world: &mut World, tuning: &PlayerTuning) -> Entity {
    world.spawn((
        Player,
        Position::new(tuning.start_x, tuning.start_y),
        Velocity::zero(),
    ))
}

/// Spawn a player bullet in front of the ship.
pub fn spawn_player_bullet(world: &mut World, tuning: &PlayerTuning, ship: Position) -> Entity {
    world.spawn((
        PlayerBullet,
        Position::new(ship.x + tuning.muzzle_offset_x, ship.y),
        Velocity::new(tuning.bullet_speed, 0.0),
    ))
}

/// Spawn an enemy bullet with a fixed velocity.
pub fn spawn_enemy_bullet(
    world: &mut World,
    origin: BulletOrigin,
    position: Position,
    velocity: Velocity,
) -> Entity {
    world.spawn((EnemyBullet { origin }, position, velocity))
}

/// Draw a fresh sine path for a standard enemy starting at `now_ms`.
pub fn random_sine_motion(rng: &mut ChaCha8Rng, tuning: &StandardTuning, now_ms: u64) -> SineMotion {
    SineMotion {
        start_y: rng.gen_range(tuning.spawn_y_min..=tuning.spawn_y_max).round(),
        start_time_ms: now_ms as f64,
        frequency: rng.gen_range(tuning.frequency_min..tuning.frequency_max),
        amplitude: rng.gen_range(tuning.amplitude_min..=tuning.amplitude_max).round(),
    }
}

/// Spawn a standard enemy at the right edge and start its repeating shot.
pub fn spawn_standard_enemy(
    world: &mut World,
    clock: &mut Clock,
    rng: &mut ChaCha8Rng,
    tuning: &StandardTuning,
) -> Entity {
    let motion = random_sine_motion(rng, tuning, clock.now());
    let entity = world.spawn((
        StandardEnemy {
            phase: StandardPhase::Normal,
            motion,
            pause_timer: None,
            fire_timer: None,
        },
        Position::new(tuning.spawn_x, motion.start_y),
    ));

    let fire_timer = clock.every(
        tuning.fire_interval_ms,
        Some(entity),
        TimerAction::StandardFire,
    );
    if let Ok(mut enemy) = world.get::<&mut StandardEnemy>(entity) {
        enemy.fire_timer = Some(fire_timer);
    }

    debug!(
        "Spawned standard enemy {:?} at y={:.0} (freq {:.4}, amp {:.0})",
        entity, motion.start_y, motion.frequency, motion.amplitude
    );
    entity
}

/// Spawn a heavy enemy off the right edge, creeping in toward its settle point.
pub fn spawn_heavy_enemy(world: &mut World, rng: &mut ChaCha8Rng, tuning: &HeavyTuning) -> Entity {
    let y = rng.gen_range(tuning.spawn_y_min..=tuning.spawn_y_max).round();
    let entity = world.spawn((
        HeavyEnemy {
            phase: HeavyPhase::Entering,
            hit_points: tuning.hit_points,
            invincible: false,
            invincibility_timer: None,
            idle_since_ms: 0,
            has_fired_barrage: false,
            settle_x: tuning.settle_x,
        },
        Position::new(tuning.spawn_x, y),
        Velocity::new(-tuning.entry_speed, 0.0),
    ));
    debug!("Spawned heavy enemy {:?} at y={:.0}", entity, y);
    entity
}

/// Remove an entity and cancel every timer it owns.
///
/// Returns `false` if the entity was already gone.
pub fn destroy(world: &mut World, clock: &mut Clock, entity: Entity) -> bool {
    if !world.contains(entity) {
        return false;
    }
    clock.cancel_owned_by(entity);
    world.despawn(entity).is_ok()
}

/// Classify a live entity.
pub fn kind_of(world: &World, entity: Entity) -> Option<EntityKind> {
    let entity_ref = world.entity(entity).ok()?;
    if entity_ref.has::<Player>() {
        Some(EntityKind::Player)
    } else if entity_ref.has::<StandardEnemy>() {
        Some(EntityKind::StandardEnemy)
    } else if entity_ref.has::<HeavyEnemy>() {
        Some(EntityKind::HeavyEnemy)
    } else if entity_ref.has::<PlayerBullet>() {
        Some(EntityKind::PlayerBullet)
    } else if entity_ref.has::<EnemyBullet>() {
        Some(EntityKind::EnemyBullet)
    } else {
        None
    }
}

/// Snapshot a live entity for combat resolution.
pub fn combatant(world: &World, player: &PlayerStatus, entity: Entity) -> Option<Combatant> {
    let kind = kind_of(world, entity)?;
    let position = *world.get::<&Position>(entity).ok()?;

    let state = match kind {
        EntityKind::Player => CombatantState::Player {
            invincible: player.is_invincible(),
            dead: player.is_dead(),
        },
        EntityKind::StandardEnemy => CombatantState::StandardEnemy,
        EntityKind::HeavyEnemy => {
            let heavy = world.get::<&HeavyEnemy>(entity).ok()?;
            CombatantState::HeavyEnemy {
                hit_points: heavy.hit_points,
                invincible: heavy.invincible,
            }
        }
        EntityKind::PlayerBullet => CombatantState::PlayerBullet,
        EntityKind::EnemyBullet => CombatantState::EnemyBullet,
    };

    Some(Combatant {
        entity,
        position,
        state,
    })
}

/// Number of live entities carrying component `T`.
pub fn count<T: hecs::Component>(world: &World) -> u32 {
    world.query::<&T>().iter().count() as u32
}

/// The player's ship entity, if present.
pub fn player_entity(world: &World) -> Option<Entity> {
    world
        .query::<&Player>()
        .iter()
        .next()
        .map(|(entity, _)| entity)
}
