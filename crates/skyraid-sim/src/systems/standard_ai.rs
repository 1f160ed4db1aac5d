//! Standard enemy system: spawning, per-tick behavior and timer callbacks.
//!
//! Calls the standard FSM from skyraid-enemy-ai for each enemy, then applies
//! the resulting position/phase and carries out any transition it reports.

use hecs::{Entity, World};
use log::debug;
use rand_chacha::ChaCha8Rng;

use skyraid_core::components::StandardEnemy;
use skyraid_core::config::StandardTuning;
use skyraid_core::enums::{BulletOrigin, StandardPhase};
use skyraid_core::types::{Position, TimerId, Velocity};

use skyraid_enemy_ai::fsm::{evaluate_standard, StandardContext, StandardTransition};

use crate::clock::{Clock, TimerAction};
use crate::registry;
use crate::wave::WaveController;

/// Spawn one standard enemy if the wave allows it right now.
pub fn spawn(
    world: &mut World,
    clock: &mut Clock,
    rng: &mut ChaCha8Rng,
    wave: &mut WaveController,
    tuning: &StandardTuning,
) -> Option<Entity> {
    let now = clock.now();
    if !wave.can_spawn_standard(now) {
        return None;
    }
    let entity = registry::spawn_standard_enemy(world, clock, rng, tuning);
    wave.record_standard_spawn(now, tuning.spawn_cooldown_ms);
    Some(entity)
}

/// Run the standard FSM for every standard enemy and apply the results.
pub fn run(
    world: &mut World,
    clock: &mut Clock,
    rng: &mut ChaCha8Rng,
    tuning: &StandardTuning,
    dt_secs: f64,
) {
    let now = clock.now();
    // Collect updates in a buffer to avoid borrow issues with hecs
    let mut updates: Vec<(Entity, StandardPhase, Position, Option<StandardTransition>)> =
        Vec::new();

    {
        let mut query = world.query::<(&StandardEnemy, &Position)>();
        for (entity, (enemy, pos)) in query.iter() {
            let ctx = StandardContext {
                phase: enemy.phase,
                position: *pos,
                motion: enemy.motion,
                now_ms: now,
                dt_secs,
                tuning,
            };
            let update = evaluate_standard(&ctx);
            updates.push((entity, update.new_phase, update.new_position, update.transition));
        }
    }

    for (entity, new_phase, new_position, transition) in updates {
        let Ok((enemy, pos)) = world.query_one_mut::<(&mut StandardEnemy, &mut Position)>(entity)
        else {
            continue;
        };
        enemy.phase = new_phase;
        *pos = new_position;

        match transition {
            Some(StandardTransition::BeginPause) => {
                let timer = clock.after(
                    tuning.pause_ms,
                    Some(entity),
                    TimerAction::StandardBeginDash,
                );
                if let Some(stale) = enemy.pause_timer.replace(timer) {
                    clock.cancel(stale);
                }
            }
            Some(StandardTransition::Recycle) => {
                if let Some(pending) = enemy.pause_timer.take() {
                    clock.cancel(pending);
                }
                enemy.motion = registry::random_sine_motion(rng, tuning, now);
                *pos = Position::new(tuning.reentry_x, enemy.motion.start_y);
                debug!("Recycled standard enemy {:?} to y={:.0}", entity, pos.y);
            }
            None => {}
        }
    }
}

/// Pause timer callback: a waiting enemy starts its dash.
///
/// Returns `false` (and changes nothing) if the enemy is gone, is no longer
/// waiting, or `timer` is not its current pause timer.
pub fn begin_dash(world: &mut World, entity: Entity, timer: TimerId) -> bool {
    let Ok(mut enemy) = world.get::<&mut StandardEnemy>(entity) else {
        return false;
    };
    if enemy.pause_timer != Some(timer) || enemy.phase != StandardPhase::Waiting {
        return false;
    }
    enemy.pause_timer = None;
    enemy.phase = StandardPhase::Dashing;
    true
}

/// Fire timer callback: one straight shot to the left from the enemy's current position.
pub fn fire(world: &mut World, entity: Entity, tuning: &StandardTuning) -> Option<Entity> {
    let muzzle = {
        let mut query = world.query_one::<(&StandardEnemy, &Position)>(entity).ok()?;
        let (_, pos) = query.get()?;
        Position::new(pos.x - tuning.muzzle_offset_x, pos.y)
    };
    Some(registry::spawn_enemy_bullet(
        world,
        BulletOrigin::Standard,
        muzzle,
        Velocity::new(-tuning.bullet_speed, 0.0),
    ))
}
