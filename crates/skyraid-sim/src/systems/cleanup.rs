//! Cleanup system: removes bullets that have left the playfield.

use hecs::{Entity, World};

use skyraid_core::components::{EnemyBullet, PlayerBullet};
use skyraid_core::config::PlayfieldTuning;
use skyraid_core::types::Position;

use crate::clock::Clock;
use crate::registry;

/// Remove player bullets past the right bound and enemy bullets past the left
/// bound or too far above/below the playfield.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    clock: &mut Clock,
    playfield: &PlayfieldTuning,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();

    for (entity, (pos, _bullet)) in world.query_mut::<(&Position, &PlayerBullet)>() {
        if pos.x > playfield.player_bullet_max_x {
            despawn_buffer.push(entity);
        }
    }

    let top = -playfield.bullet_vertical_margin;
    let bottom = playfield.height + playfield.bullet_vertical_margin;
    for (entity, (pos, _bullet)) in world.query_mut::<(&Position, &EnemyBullet)>() {
        if pos.x < playfield.enemy_bullet_min_x || pos.y < top || pos.y > bottom {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        registry::destroy(world, clock, entity);
    }
}
