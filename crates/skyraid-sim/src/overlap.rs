//! Overlap collaborator interface.
//!
//! The engine never computes collisions for gameplay; it is told which pairs
//! overlapped. A collaborator can either push pairs with
//! `SimulationEngine::report_overlap` or be installed as an [`OverlapDetector`]
//! that the engine polls once per tick after all positions are final.
//! [`HitboxDetector`] is a simple axis-aligned box detector for headless runs.

use glam::DVec2;
use hecs::World;

use skyraid_core::components::*;
use skyraid_core::enums::EntityKind;
use skyraid_core::types::{EntityId, Position};

use crate::combat::OverlapKind;
use crate::registry::entity_id;

/// One collidable entity as seen by a detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
}

/// Supplies overlapping pairs for the current tick.
pub trait OverlapDetector {
    fn detect(&mut self, bodies: &[Body]) -> Vec<(EntityId, EntityId)>;
}

/// Collect every collidable entity, ordered by id.
pub fn collect_bodies(world: &World) -> Vec<Body> {
    let mut bodies = Vec::new();
    push_kind::<Player>(world, EntityKind::Player, &mut bodies);
    push_kind::<StandardEnemy>(world, EntityKind::StandardEnemy, &mut bodies);
    push_kind::<HeavyEnemy>(world, EntityKind::HeavyEnemy, &mut bodies);
    push_kind::<PlayerBullet>(world, EntityKind::PlayerBullet, &mut bodies);
    push_kind::<EnemyBullet>(world, EntityKind::EnemyBullet, &mut bodies);
    bodies.sort_by_key(|b| b.id);
    bodies
}

fn push_kind<T: hecs::Component>(world: &World, kind: EntityKind, out: &mut Vec<Body>) {
    for (entity, (_, pos)) in world.query::<(&T, &Position)>().iter() {
        out.push(Body {
            id: entity_id(entity),
            kind,
            position: *pos,
        });
    }
}

/// Axis-aligned hitboxes centred on each entity's position.
#[derive(Debug, Clone)]
pub struct HitboxDetector {
    pub player: DVec2,
    pub standard_enemy: DVec2,
    pub heavy_enemy: DVec2,
    pub player_bullet: DVec2,
    pub enemy_bullet: DVec2,
}

impl Default for HitboxDetector {
    fn default() -> Self {
        Self {
            player: DVec2::new(220.0, 20.0),
            standard_enemy: DVec2::new(120.0, 80.0),
            heavy_enemy: DVec2::new(200.0, 120.0),
            player_bullet: DVec2::new(80.0, 20.0),
            enemy_bullet: DVec2::new(40.0, 10.0),
        }
    }
}

impl HitboxDetector {
    fn size(&self, kind: EntityKind) -> DVec2 {
        match kind {
            EntityKind::Player => self.player,
            EntityKind::StandardEnemy => self.standard_enemy,
            EntityKind::HeavyEnemy => self.heavy_enemy,
            EntityKind::PlayerBullet => self.player_bullet,
            EntityKind::EnemyBullet => self.enemy_bullet,
        }
    }

    fn overlaps(&self, a: &Body, b: &Body) -> bool {
        let delta = (DVec2::new(a.position.x, a.position.y)
            - DVec2::new(b.position.x, b.position.y))
        .abs();
        let reach = (self.size(a.kind) + self.size(b.kind)) * 0.5;
        delta.cmple(reach).all()
    }
}

impl OverlapDetector for HitboxDetector {
    fn detect(&mut self, bodies: &[Body]) -> Vec<(EntityId, EntityId)> {
        let mut pairs = Vec::new();
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                if OverlapKind::classify(a.kind, b.kind).is_some() && self.overlaps(a, b) {
                    pairs.push((a.id, b.id));
                }
            }
        }
        pairs
    }
}
