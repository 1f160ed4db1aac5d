//! Player control system: vertical movement intents and firing.

use hecs::World;
use log::trace;

use skyraid_core::commands::InputIntent;
use skyraid_core::components::PlayerBullet;
use skyraid_core::config::{PlayerTuning, PlayfieldTuning};
use skyraid_core::types::{Position, Velocity};

use crate::registry;

/// Earliest time the player may fire again.
#[derive(Debug, Clone, Copy, Default)]
pub struct FireGate {
    /// Firing is allowed strictly after this time.
    last_fired_ms: u64,
}

/// Apply this tick's intents. Returns `true` if a bullet was fired.
pub fn run(
    world: &mut World,
    intent: InputIntent,
    tuning: &PlayerTuning,
    playfield: &PlayfieldTuning,
    gate: &mut FireGate,
    now_ms: u64,
) -> bool {
    let Some(ship) = registry::player_entity(world) else {
        return false;
    };

    let position = {
        let Ok((pos, vel)) = world.query_one_mut::<(&mut Position, &mut Velocity)>(ship) else {
            return false;
        };
        pos.y = pos.y.clamp(0.0, playfield.height);
        vel.x = 0.0;
        vel.y = if intent.up {
            -tuning.vertical_speed
        } else if intent.down {
            tuning.vertical_speed
        } else {
            0.0
        };
        *pos
    };

    if !intent.fire || now_ms <= gate.last_fired_ms {
        return false;
    }

    let active = registry::count::<PlayerBullet>(world) as usize;
    if active >= tuning.max_active_bullets || active >= tuning.bullet_pool {
        trace!("Fire dropped: {} player bullets active", active);
        return false;
    }

    registry::spawn_player_bullet(world, tuning, position);
    gate.last_fired_ms = now_ms + tuning.fire_cooldown_ms;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (World, PlayerTuning, PlayfieldTuning) {
        let mut world = World::new();
        let tuning = PlayerTuning::default();
        registry::spawn_player(&mut world, &tuning);
        (world, tuning, PlayfieldTuning::default())
    }

    fn ship_velocity(world: &World) -> Velocity {
        let ship = registry::player_entity(world).unwrap();
        *world.get::<&Velocity>(ship).unwrap()
    }

    #[test]
    fn test_intents_set_vertical_velocity() {
        let (mut world, tuning, playfield) = setup();
        let mut gate = FireGate::default();

        let up = InputIntent {
            up: true,
            ..Default::default()
        };
        run(&mut world, up, &tuning, &playfield, &mut gate, 20);
        assert_eq!(ship_velocity(&world).y, -320.0);

        let down = InputIntent {
            down: true,
            ..Default::default()
        };
        run(&mut world, down, &tuning, &playfield, &mut gate, 40);
        assert_eq!(ship_velocity(&world).y, 320.0);

        run(&mut world, InputIntent::default(), &tuning, &playfield, &mut gate, 60);
        assert_eq!(ship_velocity(&world).y, 0.0);
    }

    #[test]
    fn test_fire_cooldown_and_active_cap() {
        let (mut world, tuning, playfield) = setup();
        let mut gate = FireGate::default();
        let fire = InputIntent {
            fire: true,
            ..Default::default()
        };

        let mut shots = Vec::new();
        let mut now = 20;
        while now <= 2000 {
            if run(&mut world, fire, &tuning, &playfield, &mut gate, now) {
                shots.push(now);
            }
            now += 20;
        }
        // Bullets never leave in this test, so the active cap stops firing at three.
        assert_eq!(shots, vec![20, 340, 660]);
        assert_eq!(registry::count::<PlayerBullet>(&world), 3);
    }

    #[test]
    fn test_bullet_leaves_from_muzzle() {
        let (mut world, tuning, playfield) = setup();
        let mut gate = FireGate::default();
        let fire = InputIntent {
            fire: true,
            ..Default::default()
        };
        assert!(run(&mut world, fire, &tuning, &playfield, &mut gate, 20));

        let mut query = world.query::<(&PlayerBullet, &Position, &Velocity)>();
        let (_, (_, pos, vel)) = query.iter().next().unwrap();
        assert_eq!(pos.x, tuning.start_x + tuning.muzzle_offset_x);
        assert_eq!(pos.y, tuning.start_y);
        assert_eq!(vel.x, tuning.bullet_speed);
    }

    #[test]
    fn test_ship_clamped_to_playfield() {
        let (mut world, tuning, playfield) = setup();
        let ship = registry::player_entity(&world).unwrap();
        world.get::<&mut Position>(ship).unwrap().y = -40.0;

        let mut gate = FireGate::default();
        run(&mut world, InputIntent::default(), &tuning, &playfield, &mut gate, 20);
        assert_eq!(world.get::<&Position>(ship).unwrap().y, 0.0);
    }
}
