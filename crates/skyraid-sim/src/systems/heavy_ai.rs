//! Heavy enemy system: gated spawning, per-tick behavior, barrage and
//! invincibility callbacks.

use hecs::{Entity, World};
use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use skyraid_core::components::HeavyEnemy;
use skyraid_core::config::HeavyTuning;
use skyraid_core::enums::{BulletOrigin, HeavyPhase};
use skyraid_core::types::{Position, TimerId, Velocity};

use skyraid_enemy_ai::fsm::{evaluate_heavy, HeavyContext, HeavyTransition};
use skyraid_enemy_ai::motion::{aim_velocity, barrage_delays};

use crate::clock::{Clock, TimerAction};
use crate::registry;
use crate::wave::WaveController;

/// Spawn one heavy if the wave's gate, caps and cooldown allow it.
pub fn spawn(
    world: &mut World,
    clock: &Clock,
    rng: &mut ChaCha8Rng,
    wave: &mut WaveController,
    tuning: &HeavyTuning,
) -> Option<Entity> {
    let now = clock.now();
    let active = registry::count::<HeavyEnemy>(world);
    if !wave.can_spawn_heavy(now, active) {
        return None;
    }
    let entity = registry::spawn_heavy_enemy(world, rng, tuning);
    wave.record_heavy_spawn(now, tuning.spawn_cooldown_ms);
    Some(entity)
}

struct HeavyChange {
    entity: Entity,
    phase: HeavyPhase,
    position: Position,
    velocity: Velocity,
    fire_barrage: bool,
    transition: Option<HeavyTransition>,
}

/// Run the heavy FSM for every heavy and apply the results.
///
/// Expects this tick's movement integration to have run already.
pub fn run(world: &mut World, clock: &mut Clock, rng: &mut ChaCha8Rng, tuning: &HeavyTuning) {
    let now = clock.now();
    let mut changes: Vec<HeavyChange> = Vec::new();

    {
        let mut query = world.query::<(&HeavyEnemy, &Position, &Velocity)>();
        for (entity, (heavy, pos, vel)) in query.iter() {
            let ctx = HeavyContext {
                phase: heavy.phase,
                position: *pos,
                velocity: *vel,
                settle_x: heavy.settle_x,
                idle_since_ms: heavy.idle_since_ms,
                has_fired_barrage: heavy.has_fired_barrage,
                now_ms: now,
                tuning,
            };
            let update = evaluate_heavy(&ctx);
            changes.push(HeavyChange {
                entity,
                phase: update.new_phase,
                position: update.new_position,
                velocity: update.new_velocity,
                fire_barrage: update.fire_barrage,
                transition: update.transition,
            });
        }
    }

    for change in changes {
        let Ok((heavy, pos, vel)) = world
            .query_one_mut::<(&mut HeavyEnemy, &mut Position, &mut Velocity)>(change.entity)
        else {
            continue;
        };
        heavy.phase = change.phase;
        *pos = change.position;
        *vel = change.velocity;

        match change.transition {
            Some(HeavyTransition::Settled) => {
                heavy.idle_since_ms = now;
                heavy.has_fired_barrage = false;
                debug!("Heavy {:?} settled at x={:.0}", change.entity, pos.x);
            }
            Some(HeavyTransition::Reenter) => {
                pos.y = rng.gen_range(tuning.spawn_y_min..=tuning.spawn_y_max).round();
                debug!("Heavy {:?} re-entering at y={:.0}", change.entity, pos.y);
            }
            Some(HeavyTransition::BeginDash) | None => {}
        }

        if change.fire_barrage {
            heavy.has_fired_barrage = true;
            for delay in barrage_delays(tuning.barrage_shots, tuning.barrage_spacing_ms) {
                clock.after(delay, Some(change.entity), TimerAction::HeavyBarrageShot);
            }
        }
    }
}

/// Barrage timer callback: one bullet aimed at where the player is right now.
pub fn fire_barrage_shot(
    world: &mut World,
    entity: Entity,
    target: Position,
    tuning: &HeavyTuning,
) -> Option<Entity> {
    let origin = {
        let mut query = world.query_one::<(&HeavyEnemy, &Position)>(entity).ok()?;
        let (_, pos) = query.get()?;
        *pos
    };
    let velocity = aim_velocity(origin, target, tuning.bullet_speed);
    Some(registry::spawn_enemy_bullet(
        world,
        BulletOrigin::Heavy,
        origin,
        velocity,
    ))
}

/// Open a heavy's post-ram invincibility window, replacing any pending expiry.
pub fn grant_invincibility(
    world: &mut World,
    clock: &mut Clock,
    entity: Entity,
    tuning: &HeavyTuning,
) -> bool {
    let Ok(mut heavy) = world.get::<&mut HeavyEnemy>(entity) else {
        return false;
    };
    let timer = clock.after(
        tuning.invincibility_ms,
        Some(entity),
        TimerAction::HeavyInvincibilityExpired,
    );
    if let Some(stale) = heavy.invincibility_timer.replace(timer) {
        clock.cancel(stale);
    }
    heavy.invincible = true;
    true
}

/// Expiry callback. Returns `true` if the window actually closed.
pub fn end_invincibility(world: &mut World, entity: Entity, timer: TimerId) -> bool {
    let Ok(mut heavy) = world.get::<&mut HeavyEnemy>(entity) else {
        return false;
    };
    if heavy.invincibility_timer != Some(timer) {
        return false;
    }
    heavy.invincibility_timer = None;
    heavy.invincible = false;
    true
}

/// Store new hit points on a live heavy.
pub fn set_hit_points(world: &mut World, entity: Entity, hit_points: u32) -> bool {
    match world.get::<&mut HeavyEnemy>(entity) {
        Ok(mut heavy) => {
            heavy.hit_points = hit_points;
            true
        }
        Err(_) => false,
    }
}
