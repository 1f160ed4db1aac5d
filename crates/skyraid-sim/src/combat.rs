//! Combat resolution.
//!
//! Overlap handling is a pure function of two combatant snapshots. It decides
//! what should happen and returns a list of effects; the engine applies them
//! against the registry, the wave controller and the player status.

use hecs::Entity;

use skyraid_core::enums::EntityKind;
use skyraid_core::types::Position;

/// Variant-specific state combat needs to see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatantState {
    Player { invincible: bool, dead: bool },
    StandardEnemy,
    HeavyEnemy { hit_points: u32, invincible: bool },
    PlayerBullet,
    EnemyBullet,
}

/// Read-only snapshot of one side of an overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combatant {
    pub entity: Entity,
    pub position: Position,
    pub state: CombatantState,
}

impl Combatant {
    pub fn kind(&self) -> EntityKind {
        match self.state {
            CombatantState::Player { .. } => EntityKind::Player,
            CombatantState::StandardEnemy => EntityKind::StandardEnemy,
            CombatantState::HeavyEnemy { .. } => EntityKind::HeavyEnemy,
            CombatantState::PlayerBullet => EntityKind::PlayerBullet,
            CombatantState::EnemyBullet => EntityKind::EnemyBullet,
        }
    }
}

/// The five overlap categories the collision collaborator reports, in the
/// order they are resolved within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverlapKind {
    BulletStandard,
    EnemyBulletPlayer,
    BulletHeavy,
    StandardPlayer,
    HeavyPlayer,
}

impl OverlapKind {
    /// Categorise a pair of entity kinds, in either order.
    pub fn classify(a: EntityKind, b: EntityKind) -> Option<Self> {
        use EntityKind::*;
        match (a, b) {
            (PlayerBullet, StandardEnemy) | (StandardEnemy, PlayerBullet) => {
                Some(Self::BulletStandard)
            }
            (EnemyBullet, Player) | (Player, EnemyBullet) => Some(Self::EnemyBulletPlayer),
            (PlayerBullet, HeavyEnemy) | (HeavyEnemy, PlayerBullet) => Some(Self::BulletHeavy),
            (StandardEnemy, Player) | (Player, StandardEnemy) => Some(Self::StandardPlayer),
            (HeavyEnemy, Player) | (Player, HeavyEnemy) => Some(Self::HeavyPlayer),
            _ => None,
        }
    }
}

/// A mutation or side-effect request produced by combat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEffect {
    /// Remove a bullet.
    ConsumeBullet(Entity),
    /// Standard enemy shot down: explode, score, count the defeat.
    KillStandard { entity: Entity, position: Position },
    /// Standard enemy rammed the player: removed without score.
    RamStandard { entity: Entity },
    /// Store a heavy's new hit points.
    SetHeavyHitPoints { entity: Entity, hit_points: u32 },
    /// Heavy shot down: explode and score.
    KillHeavy { entity: Entity, position: Position },
    /// Open the heavy's post-ram invincibility window.
    GrantHeavyInvincibility(Entity),
    /// Heavy ram landed on a vulnerable player.
    RamImpactSound,
    /// One unit of damage to the player.
    DamagePlayer,
    /// Redraw the health display.
    RefreshHealth,
    /// Redraw the score display.
    RefreshScore,
}

/// Resolve one confirmed overlap.
///
/// Returns `None` when the pair is not a combat category (e.g. two enemies).
/// A recognised pair may still yield no effects, e.g. anything touching a
/// dead player or a heavy inside its ram cooldown.
pub fn resolve(a: &Combatant, b: &Combatant) -> Option<(OverlapKind, Vec<CombatEffect>)> {
    let kind = OverlapKind::classify(a.kind(), b.kind())?;
    let (first, second) = order_pair(kind, a, b);

    let effects = match kind {
        OverlapKind::BulletStandard => vec![
            CombatEffect::ConsumeBullet(first.entity),
            CombatEffect::KillStandard {
                entity: second.entity,
                position: second.position,
            },
            CombatEffect::RefreshScore,
        ],
        OverlapKind::BulletHeavy => bullet_hits_heavy(first, second),
        OverlapKind::EnemyBulletPlayer => enemy_bullet_hits_player(first, second),
        OverlapKind::StandardPlayer => standard_rams_player(first, second),
        OverlapKind::HeavyPlayer => heavy_rams_player(first, second),
    };
    Some((kind, effects))
}

/// Put the pair in the order its category names them (bullet or enemy first).
fn order_pair<'a>(
    kind: OverlapKind,
    a: &'a Combatant,
    b: &'a Combatant,
) -> (&'a Combatant, &'a Combatant) {
    let first_kind = match kind {
        OverlapKind::BulletStandard | OverlapKind::BulletHeavy => EntityKind::PlayerBullet,
        OverlapKind::EnemyBulletPlayer => EntityKind::EnemyBullet,
        OverlapKind::StandardPlayer => EntityKind::StandardEnemy,
        OverlapKind::HeavyPlayer => EntityKind::HeavyEnemy,
    };
    if a.kind() == first_kind {
        (a, b)
    } else {
        (b, a)
    }
}

fn player_flags(player: &Combatant) -> (bool, bool) {
    match player.state {
        CombatantState::Player { invincible, dead } => (invincible, dead),
        _ => (false, false),
    }
}

fn bullet_hits_heavy(bullet: &Combatant, heavy: &Combatant) -> Vec<CombatEffect> {
    let hit_points = match heavy.state {
        CombatantState::HeavyEnemy { hit_points, .. } => hit_points,
        _ => return Vec::new(),
    };

    let mut effects = vec![CombatEffect::ConsumeBullet(bullet.entity)];
    let remaining = hit_points.saturating_sub(1);
    if remaining == 0 {
        effects.push(CombatEffect::KillHeavy {
            entity: heavy.entity,
            position: heavy.position,
        });
    } else {
        effects.push(CombatEffect::SetHeavyHitPoints {
            entity: heavy.entity,
            hit_points: remaining,
        });
    }
    effects.push(CombatEffect::RefreshScore);
    effects
}

fn enemy_bullet_hits_player(bullet: &Combatant, player: &Combatant) -> Vec<CombatEffect> {
    let (invincible, dead) = player_flags(player);
    if dead {
        return Vec::new();
    }

    vec![
        CombatEffect::ConsumeBullet(bullet.entity),
        damage_or_refresh(invincible),
    ]
}

fn standard_rams_player(enemy: &Combatant, player: &Combatant) -> Vec<CombatEffect> {
    let (invincible, dead) = player_flags(player);
    if dead {
        return Vec::new();
    }

    vec![
        CombatEffect::RamStandard {
            entity: enemy.entity,
        },
        damage_or_refresh(invincible),
    ]
}

/// Damage reports the new health itself; an ignored hit still refreshes it.
fn damage_or_refresh(invincible: bool) -> CombatEffect {
    if invincible {
        CombatEffect::RefreshHealth
    } else {
        CombatEffect::DamagePlayer
    }
}

fn heavy_rams_player(heavy: &Combatant, player: &Combatant) -> Vec<CombatEffect> {
    let (player_invincible, dead) = player_flags(player);
    let (hit_points, heavy_invincible) = match heavy.state {
        CombatantState::HeavyEnemy {
            hit_points,
            invincible,
        } => (hit_points, invincible),
        _ => return Vec::new(),
    };
    if heavy_invincible || dead {
        return Vec::new();
    }

    // Ramming never takes the last hit point.
    let mut effects = vec![
        CombatEffect::SetHeavyHitPoints {
            entity: heavy.entity,
            hit_points: hit_points.saturating_sub(1).max(1),
        },
        CombatEffect::GrantHeavyInvincibility(heavy.entity),
    ];
    if !player_invincible {
        effects.push(CombatEffect::DamagePlayer);
        effects.push(CombatEffect::RamImpactSound);
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        world: hecs::World,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                world: hecs::World::new(),
            }
        }

        fn combatant(&mut self, state: CombatantState) -> Combatant {
            Combatant {
                entity: self.world.spawn(()),
                position: Position::new(400.0, 300.0),
                state,
            }
        }
    }

    fn player(invincible: bool, dead: bool) -> CombatantState {
        CombatantState::Player { invincible, dead }
    }

    fn heavy(hit_points: u32, invincible: bool) -> CombatantState {
        CombatantState::HeavyEnemy {
            hit_points,
            invincible,
        }
    }

    #[test]
    fn test_classify_is_symmetric() {
        use EntityKind::*;
        let pairs = [
            (PlayerBullet, StandardEnemy, OverlapKind::BulletStandard),
            (EnemyBullet, Player, OverlapKind::EnemyBulletPlayer),
            (PlayerBullet, HeavyEnemy, OverlapKind::BulletHeavy),
            (StandardEnemy, Player, OverlapKind::StandardPlayer),
            (HeavyEnemy, Player, OverlapKind::HeavyPlayer),
        ];
        for (a, b, expected) in pairs {
            assert_eq!(OverlapKind::classify(a, b), Some(expected));
            assert_eq!(OverlapKind::classify(b, a), Some(expected));
        }
        assert_eq!(OverlapKind::classify(StandardEnemy, HeavyEnemy), None);
        assert_eq!(OverlapKind::classify(PlayerBullet, EnemyBullet), None);
        assert_eq!(OverlapKind::classify(PlayerBullet, Player), None);
    }

    #[test]
    fn test_bullet_kills_standard() {
        let mut fx = Fixture::new();
        let bullet = fx.combatant(CombatantState::PlayerBullet);
        let enemy = fx.combatant(CombatantState::StandardEnemy);

        // Argument order does not matter.
        let (kind, effects) = resolve(&enemy, &bullet).unwrap();
        assert_eq!(kind, OverlapKind::BulletStandard);
        assert_eq!(effects[0], CombatEffect::ConsumeBullet(bullet.entity));
        assert!(matches!(
            effects[1],
            CombatEffect::KillStandard { entity, .. } if entity == enemy.entity
        ));
    }

    #[test]
    fn test_bullet_wounds_then_kills_heavy() {
        let mut fx = Fixture::new();
        let bullet = fx.combatant(CombatantState::PlayerBullet);
        let target = fx.combatant(heavy(5, false));

        let (_, effects) = resolve(&bullet, &target).unwrap();
        assert!(effects.contains(&CombatEffect::SetHeavyHitPoints {
            entity: target.entity,
            hit_points: 4
        }));
        assert!(!effects
            .iter()
            .any(|e| matches!(e, CombatEffect::GrantHeavyInvincibility(_))));

        // Bullet damage is not blocked by ram invincibility.
        let last = fx.combatant(heavy(1, true));
        let (_, effects) = resolve(&bullet, &last).unwrap();
        assert!(effects
            .iter()
            .any(|e| matches!(e, CombatEffect::KillHeavy { entity, .. } if *entity == last.entity)));
    }

    #[test]
    fn test_enemy_bullet_respects_invincibility() {
        let mut fx = Fixture::new();
        let bullet = fx.combatant(CombatantState::EnemyBullet);

        let vulnerable = fx.combatant(player(false, false));
        let (_, effects) = resolve(&bullet, &vulnerable).unwrap();
        assert_eq!(
            effects,
            vec![
                CombatEffect::ConsumeBullet(bullet.entity),
                CombatEffect::DamagePlayer,
            ]
        );

        let shielded = fx.combatant(player(true, false));
        let (_, effects) = resolve(&bullet, &shielded).unwrap();
        assert_eq!(
            effects,
            vec![
                CombatEffect::ConsumeBullet(bullet.entity),
                CombatEffect::RefreshHealth
            ]
        );
    }

    #[test]
    fn test_nothing_touches_a_dead_player() {
        let mut fx = Fixture::new();
        let corpse = fx.combatant(player(false, true));
        let bullet = fx.combatant(CombatantState::EnemyBullet);
        let enemy = fx.combatant(CombatantState::StandardEnemy);
        let brute = fx.combatant(heavy(5, false));

        for other in [&bullet, &enemy, &brute] {
            let (_, effects) = resolve(other, &corpse).unwrap();
            assert!(effects.is_empty(), "{:?}", other.kind());
        }
    }

    #[test]
    fn test_standard_ram_destroys_enemy_even_when_player_invincible() {
        let mut fx = Fixture::new();
        let enemy = fx.combatant(CombatantState::StandardEnemy);
        let shielded = fx.combatant(player(true, false));

        let (kind, effects) = resolve(&shielded, &enemy).unwrap();
        assert_eq!(kind, OverlapKind::StandardPlayer);
        assert_eq!(
            effects,
            vec![
                CombatEffect::RamStandard {
                    entity: enemy.entity
                },
                CombatEffect::RefreshHealth
            ]
        );
    }

    #[test]
    fn test_heavy_ram_never_below_one_hit_point() {
        let mut fx = Fixture::new();
        let target = fx.combatant(player(false, false));

        for hp in [5, 2, 1] {
            let brute = fx.combatant(heavy(hp, false));
            let (_, effects) = resolve(&brute, &target).unwrap();
            let new_hp = effects.iter().find_map(|e| match e {
                CombatEffect::SetHeavyHitPoints { hit_points, .. } => Some(*hit_points),
                _ => None,
            });
            assert_eq!(new_hp, Some((hp - 1).max(1)));
            assert!(effects.contains(&CombatEffect::GrantHeavyInvincibility(brute.entity)));
            assert!(effects.contains(&CombatEffect::DamagePlayer));
        }
    }

    #[test]
    fn test_heavy_ram_ignored_during_cooldown() {
        let mut fx = Fixture::new();
        let target = fx.combatant(player(false, false));
        let brute = fx.combatant(heavy(3, true));
        let (_, effects) = resolve(&brute, &target).unwrap();
        assert!(effects.is_empty());
    }

    #[test]
    fn test_heavy_ram_on_invincible_player_still_costs_heavy() {
        let mut fx = Fixture::new();
        let target = fx.combatant(player(true, false));
        let brute = fx.combatant(heavy(3, false));
        let (_, effects) = resolve(&brute, &target).unwrap();
        assert_eq!(
            effects,
            vec![
                CombatEffect::SetHeavyHitPoints {
                    entity: brute.entity,
                    hit_points: 2
                },
                CombatEffect::GrantHeavyInvincibility(brute.entity),
            ]
        );
    }

    #[test]
    fn test_non_combat_pair() {
        let mut fx = Fixture::new();
        let a = fx.combatant(CombatantState::StandardEnemy);
        let b = fx.combatant(heavy(5, false));
        assert!(resolve(&a, &b).is_none());
    }
}
