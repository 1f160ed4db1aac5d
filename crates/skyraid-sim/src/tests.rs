//! Tests for the simulation engine: determinism, combat outcomes, wave
//! progression, heavy enemy timing and restart.

use std::collections::BTreeMap;

use skyraid_core::commands::{InputIntent, PlayerCommand};
use skyraid_core::components::StandardEnemy;
use skyraid_core::config::Tuning;
use skyraid_core::enums::*;
use skyraid_core::events::{AudioEvent, PresentationEvent};
use skyraid_core::state::GameStateSnapshot;
use skyraid_core::types::EntityId;

use crate::engine::{SimConfig, SimulationEngine};
use crate::overlap::HitboxDetector;

fn engine_with(tuning: Tuning) -> SimulationEngine {
    SimulationEngine::new(SimConfig { seed: 7, tuning })
}

fn count_presentation(
    snap: &GameStateSnapshot,
    pred: impl Fn(&PresentationEvent) -> bool,
) -> usize {
    snap.presentation_events.iter().filter(|e| pred(e)).count()
}

fn is_game_over(event: &PresentationEvent) -> bool {
    matches!(event, PresentationEvent::GameOver { .. })
}

fn scripted_input(tick: u64) -> InputIntent {
    InputIntent {
        up: (tick / 50) % 2 == 0,
        down: (tick / 50) % 2 == 1,
        fire: true,
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    engine_a.set_overlap_detector(Box::new(HitboxDetector::default()));
    engine_b.set_overlap_detector(Box::new(HitboxDetector::default()));

    for tick in 0..1500 {
        engine_a.set_input(scripted_input(tick));
        engine_b.set_input(scripted_input(tick));
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 111,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 222,
        ..Default::default()
    });

    // The first standard spawn already draws a random path.
    let snap_a = engine_a.tick();
    let snap_b = engine_b.tick();
    assert_eq!(snap_a.standard_enemies.len(), 1);
    assert_ne!(
        serde_json::to_string(&snap_a.standard_enemies).unwrap(),
        serde_json::to_string(&snap_b.standard_enemies).unwrap()
    );
}

// ---- Session start ----

#[test]
fn test_first_snapshot_announces_wave_one() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick();

    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(snap.time.elapsed_ms, 20);
    assert_eq!(snap.wave.wave_number, 1);
    assert_eq!(snap.wave.enemy_count, 15);
    assert_eq!(snap.wave.enemies_remaining, 14, "one spawned on the first tick");
    assert!(!snap.wave.reinforcements_unlocked);
    assert_eq!(snap.player.health, 3);
    assert_eq!(snap.parallax.len(), 7);
    assert!(snap
        .audio_events
        .contains(&AudioEvent::PlayMusic { volume: 0.5 }));
    assert!(snap.presentation_events.contains(&PresentationEvent::ShowBanner {
        banner: BannerKind::Wave,
        text: "Wave 1".to_string(),
        duration_ms: 2000,
    }));

    // The banner hides itself two seconds later.
    let mut hidden = false;
    for _ in 0..100 {
        let snap = engine.tick();
        if snap.presentation_events.contains(&PresentationEvent::HideBanner {
            banner: BannerKind::Wave,
        }) {
            hidden = true;
            assert_eq!(snap.time.elapsed_ms, 2000);
            break;
        }
    }
    assert!(hidden);
}

#[test]
fn test_snapshot_serde_and_ordering() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.set_input(InputIntent {
        fire: true,
        ..Default::default()
    });
    let mut snap = engine.tick();
    for _ in 0..200 {
        snap = engine.tick();
    }
    assert!(snap.standard_enemies.len() > 1);
    assert!(snap
        .standard_enemies
        .windows(2)
        .all(|w| w[0].entity < w[1].entity));

    let json = serde_json::to_string(&snap).unwrap();
    let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back.standard_enemies.len(), snap.standard_enemies.len());
    assert_eq!(back.time, snap.time);
}

#[test]
fn test_invalid_tuning_falls_back_to_defaults() {
    let mut tuning = Tuning::default();
    tuning.standard.frequency_min = tuning.standard.frequency_max;
    let mut engine = engine_with(tuning);
    assert_eq!(engine.tuning(), &Tuning::default());

    // Spawning rolls sine frequencies from the accepted range.
    for _ in 0..200 {
        engine.tick();
    }
    assert_eq!(engine.phase(), GamePhase::Active);
}

#[test]
fn test_snapshot_time_follows_clock() {
    let mut engine = engine_with(Tuning::default());
    for _ in 0..30 {
        let snap = engine.tick();
        assert_eq!(snap.time.elapsed_ms, engine.clock().now());
    }
    assert_eq!(engine.time().tick, 30);
    assert_eq!(engine.time().elapsed_ms, 600);
}

#[test]
fn test_toggle_debug_overlay() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    assert!(!engine.tick().debug_overlay);
    engine.queue_command(PlayerCommand::ToggleDebugOverlay);
    assert!(engine.tick().debug_overlay);
    engine.queue_command(PlayerCommand::ToggleDebugOverlay);
    assert!(!engine.tick().debug_overlay);
}

// ---- Player damage and death ----

#[test]
fn test_death_signalled_once_with_two_lethal_hits() {
    let mut tuning = Tuning::default();
    tuning.player.start_health = 1;
    let mut engine = engine_with(tuning);
    engine.tick();

    let player = engine.player_id().unwrap();
    let first = engine.spawn_test_enemy_bullet(100.0, 600.0);
    let second = engine.spawn_test_enemy_bullet(100.0, 600.0);
    engine.report_overlap(first, player);
    engine.report_overlap(player, second);

    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap.player.dead);
    assert_eq!(snap.player.health, 0);
    assert_eq!(count_presentation(&snap, is_game_over), 1);
    assert_eq!(
        snap.audio_events
            .iter()
            .filter(|e| matches!(e, AudioEvent::FadeOutMusic { duration_ms: 1000 }))
            .count(),
        1
    );
    assert!(snap.presentation_events.contains(&PresentationEvent::SetVisible {
        entity: player,
        visible: false
    }));

    // Frozen: further overlaps and ticks change nothing.
    let frozen_at = snap.time;
    let third = engine.spawn_test_enemy_bullet(100.0, 600.0);
    engine.report_overlap(third, player);
    for _ in 0..10 {
        let snap = engine.tick();
        assert_eq!(snap.time, frozen_at);
        assert_eq!(count_presentation(&snap, is_game_over), 0);
        assert_eq!(snap.player.health, 0);
    }
}

#[test]
fn test_invincibility_window_ignores_hits_without_extending() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    let player = engine.player_id().unwrap();

    // Two hits in one tick cost one health.
    let a = engine.spawn_test_enemy_bullet(100.0, 600.0);
    let b = engine.spawn_test_enemy_bullet(100.0, 600.0);
    engine.report_overlap(a, player);
    engine.report_overlap(b, player);
    let snap = engine.tick();
    assert_eq!(snap.player.health, 2);
    assert!(snap.player.invincible);
    assert!(snap.enemy_bullets.iter().all(|v| v.entity != a && v.entity != b));
    let hit_at = snap.time.elapsed_ms;

    // A hit half-way through is ignored and does not push the expiry back.
    for _ in 0..25 {
        engine.tick();
    }
    let c = engine.spawn_test_enemy_bullet(100.0, 600.0);
    engine.report_overlap(c, player);
    let snap = engine.tick();
    assert_eq!(snap.player.health, 2);

    let mut expired_at = None;
    for _ in 0..50 {
        let snap = engine.tick();
        if !snap.player.invincible {
            expired_at = Some(snap.time.elapsed_ms);
            assert!(snap.presentation_events.contains(&PresentationEvent::SetAlpha {
                entity: player,
                alpha: 1.0
            }));
            break;
        }
    }
    assert_eq!(expired_at, Some(hit_at + 1000));

    let d = engine.spawn_test_enemy_bullet(100.0, 600.0);
    engine.report_overlap(d, player);
    assert_eq!(engine.tick().player.health, 1);
}

#[test]
fn test_standard_ram_destroys_enemy_and_damages_player() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    let player = engine.player_id().unwrap();
    let enemy = engine.spawn_test_standard(1800.0, 600.0);

    engine.report_overlap(enemy, player);
    let snap = engine.tick();
    assert!(engine.entity(enemy).is_none());
    assert_eq!(snap.player.health, 2);
    assert_eq!(snap.score, 0, "rams do not score");
    assert_eq!(snap.wave.phase_defeated, 0, "rams are not defeats");
}

// ---- Heavy enemies ----

#[test]
fn test_heavy_ram_never_takes_last_hit_point() {
    let mut tuning = Tuning::default();
    tuning.player.start_health = 100;
    let mut engine = engine_with(tuning);
    engine.tick();
    let player = engine.player_id().unwrap();
    let heavy = engine.spawn_test_heavy(1710.0, 600.0);

    let mut hit_points = Vec::new();
    for _ in 0..8 {
        engine.report_overlap(heavy, player);
        let snap = engine.tick();
        let view = snap
            .heavy_enemies
            .iter()
            .find(|h| h.entity == heavy)
            .expect("heavy survives rams");
        assert!(view.invincible);
        hit_points.push(view.hit_points);

        // Inside the cooldown a second ram is ignored.
        engine.report_overlap(heavy, player);
        let snap = engine.tick();
        let view = snap.heavy_enemies.iter().find(|h| h.entity == heavy).unwrap();
        assert_eq!(view.hit_points, *hit_points.last().unwrap());

        // Let both invincibility windows lapse.
        for _ in 0..55 {
            engine.tick();
        }
    }
    assert_eq!(hit_points, vec![4, 3, 2, 1, 1, 1, 1, 1]);
    assert_eq!(engine.player().health(), 92);
}

#[test]
fn test_heavy_ram_reports_new_health() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    let player = engine.player_id().unwrap();
    let heavy = engine.spawn_test_heavy(1710.0, 600.0);

    engine.report_overlap(heavy, player);
    let snap = engine.tick();
    assert_eq!(snap.player.health, 2);
    assert_eq!(
        count_presentation(&snap, |e| {
            matches!(e, PresentationEvent::HealthChanged { health: 2 })
        }),
        1
    );
}

#[test]
fn test_lethal_heavy_ram_reports_zero_health() {
    let mut tuning = Tuning::default();
    tuning.player.start_health = 1;
    let mut engine = engine_with(tuning);
    engine.tick();
    let player = engine.player_id().unwrap();
    let heavy = engine.spawn_test_heavy(1710.0, 600.0);

    engine.report_overlap(heavy, player);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::GameOver);
    assert!(snap
        .presentation_events
        .contains(&PresentationEvent::HealthChanged { health: 0 }));
    assert_eq!(count_presentation(&snap, is_game_over), 1);
}

#[test]
fn test_bullets_kill_heavy_and_score() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    let heavy = engine.spawn_test_heavy(1710.0, 400.0);

    for hit in 1..=5 {
        let bullet = engine.spawn_test_player_bullet(1700.0, 400.0);
        engine.report_overlap(bullet, heavy);
        let snap = engine.tick();
        if hit < 5 {
            let view = snap.heavy_enemies.iter().find(|h| h.entity == heavy).unwrap();
            assert_eq!(view.hit_points, 5 - hit);
            assert!(!view.invincible, "bullet hits grant no invincibility");
        } else {
            assert!(snap.heavy_enemies.iter().all(|h| h.entity != heavy));
            assert_eq!(snap.score, 500);
            assert!(snap
                .presentation_events
                .iter()
                .any(|e| matches!(e, PresentationEvent::Explosion { scale, .. } if *scale == 1.2)));
            assert!(snap
                .presentation_events
                .contains(&PresentationEvent::ScoreChanged { score: 500 }));
        }
    }
}

#[test]
fn test_heavy_barrage_timing() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    let heavy = engine.spawn_test_heavy(1710.0, 400.0);

    let mut settled_at = None;
    let mut dash_at = None;
    let mut shots: BTreeMap<EntityId, u64> = BTreeMap::new();

    for _ in 0..200 {
        let snap = engine.tick();
        let now = snap.time.elapsed_ms;
        let Some(view) = snap.heavy_enemies.iter().find(|h| h.entity == heavy) else {
            break;
        };
        match view.phase {
            HeavyPhase::Idle if settled_at.is_none() => settled_at = Some(now),
            HeavyPhase::Dashing if dash_at.is_none() => dash_at = Some(now),
            _ => {}
        }
        for bullet in snap
            .enemy_bullets
            .iter()
            .filter(|b| b.origin == BulletOrigin::Heavy)
        {
            shots.entry(bullet.entity).or_insert(now);
            assert!(bullet.velocity.x < 0.0, "aimed back toward the player");
        }
    }

    let t0 = settled_at.expect("heavy settles");
    let mut fired: Vec<u64> = shots.values().copied().collect();
    fired.sort_unstable();
    assert_eq!(
        fired,
        vec![t0 + 1000, t0 + 1200, t0 + 1400, t0 + 1600, t0 + 1800]
    );
    assert_eq!(dash_at, Some(t0 + 2000));
}

#[test]
fn test_heavies_withheld_until_reinforcements() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    for _ in 0..500 {
        let snap = engine.tick();
        assert!(snap.heavy_enemies.is_empty());
    }
    engine.wave_mut().unlock_reinforcements();
    let snap = engine.tick();
    assert_eq!(snap.heavy_enemies.len(), 1);
    assert_eq!(snap.wave.heavies_spawned, 1);
}

// ---- Standard enemies ----

#[test]
fn test_destroyed_waiting_enemy_is_never_touched_again() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    let enemy_id = engine.spawn_test_standard(1426.0, 500.0);
    let enemy = engine.entity(enemy_id).unwrap();

    let snap = engine.tick();
    let view = snap
        .standard_enemies
        .iter()
        .find(|v| v.entity == enemy_id)
        .unwrap();
    assert_eq!(view.phase, StandardPhase::Waiting);
    let pause_timer = engine
        .world()
        .get::<&StandardEnemy>(enemy)
        .unwrap()
        .pause_timer
        .unwrap();
    assert!(engine.clock().is_pending(pause_timer));

    let bullet = engine.spawn_test_player_bullet(1400.0, 500.0);
    engine.report_overlap(bullet, enemy_id);
    engine.tick();

    assert!(engine.entity(enemy_id).is_none());
    assert!(!engine.clock().is_pending(pause_timer));
    assert_eq!(engine.clock().pending_for(enemy), 0);

    // Well past the pause: nothing resurrects it.
    for _ in 0..100 {
        let snap = engine.tick();
        assert!(snap.standard_enemies.iter().all(|v| v.entity != enemy_id));
    }
}

#[test]
fn test_standard_fires_every_interval() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    engine.clear_field();
    engine.wave_mut().exhaust_budget();
    engine.spawn_test_standard(1800.0, 500.0);

    for _ in 0..199 {
        let snap = engine.tick();
        assert!(snap.enemy_bullets.is_empty());
    }
    let snap = engine.tick();
    assert_eq!(snap.enemy_bullets.len(), 1);
    assert_eq!(snap.enemy_bullets[0].origin, BulletOrigin::Standard);
    assert_eq!(snap.enemy_bullets[0].velocity.x, -600.0);
}

// ---- Waves ----

#[test]
fn test_reinforcements_after_four_defeats() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    let snap = engine.tick();
    assert_eq!(snap.wave.enemies_remaining, 14);

    let kill = |engine: &mut SimulationEngine| {
        let enemy = engine.spawn_test_standard(1600.0, 300.0);
        let bullet = engine.spawn_test_player_bullet(1600.0, 300.0);
        engine.report_overlap(bullet, enemy);
        engine.tick()
    };

    for n in 1..=3 {
        let snap = kill(&mut engine);
        assert_eq!(snap.wave.phase_defeated, n);
        assert!(!snap.wave.reinforcements_unlocked);
        assert_eq!(snap.score, 100 * n as u64);
        assert!(snap.audio_events.contains(&AudioEvent::Sound {
            effect: SoundEffect::EnemyExplosion,
            volume: 0.6,
            rate: 3.0
        }));
    }

    let snap = kill(&mut engine);
    assert_eq!(snap.wave.phase_defeated, 4);
    assert!(snap.wave.reinforcements_unlocked);
    assert!(engine.wave().initial_spawn_done());
    assert_eq!(
        count_presentation(&snap, |e| matches!(
            e,
            PresentationEvent::ShowBanner {
                banner: BannerKind::Reinforcements,
                ..
            }
        )),
        1
    );

    let snap = kill(&mut engine);
    assert_eq!(
        count_presentation(&snap, |e| matches!(e, PresentationEvent::ShowBanner { .. })),
        0,
        "notification fires once"
    );
}

#[test]
fn test_wave_round_trip() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    engine.clear_field();
    engine.wave_mut().exhaust_budget();

    let enemy = engine.spawn_test_standard(1600.0, 300.0);
    let bullet = engine.spawn_test_player_bullet(1600.0, 300.0);
    engine.report_overlap(bullet, enemy);
    let snap = engine.tick();

    assert_eq!(snap.wave.wave_number, 2);
    assert_eq!(snap.wave.status, WaveStatus::InProgress);
    assert_eq!(snap.wave.enemy_count, 20);
    assert_eq!(snap.wave.enemies_remaining, 20);
    assert_eq!(snap.wave.phase_spawned, 0);
    assert_eq!(snap.wave.phase_defeated, 0);
    assert!(!snap.wave.reinforcements_unlocked);
    assert_eq!(snap.wave.heavies_spawned, snap.wave.heavy_max, "heavy gate held");
    assert!(snap.presentation_events.contains(&PresentationEvent::ShowBanner {
        banner: BannerKind::Wave,
        text: "Wave 2".to_string(),
        duration_ms: 2000,
    }));

    for _ in 0..5 {
        engine.tick();
    }
    assert_eq!(engine.wave().heavies_spawned(), 0, "gate released after 100 ms");
}

#[test]
fn test_ram_of_last_enemy_also_completes_wave() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    engine.clear_field();
    engine.wave_mut().exhaust_budget();

    let player = engine.player_id().unwrap();
    let enemy = engine.spawn_test_standard(1600.0, 300.0);
    engine.report_overlap(player, enemy);
    let snap = engine.tick();
    assert_eq!(snap.wave.wave_number, 2);
    assert_eq!(snap.player.health, 2);
}

#[test]
fn test_wave_waits_for_field_to_clear() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.tick();
    engine.clear_field();
    engine.wave_mut().exhaust_budget();

    engine.spawn_test_standard(1700.0, 800.0);
    let enemy = engine.spawn_test_standard(1600.0, 300.0);
    let bullet = engine.spawn_test_player_bullet(1600.0, 300.0);
    engine.report_overlap(bullet, enemy);
    let snap = engine.tick();
    assert_eq!(snap.wave.wave_number, 1, "one enemy still on the field");
}

// ---- Restart ----

#[test]
fn test_restart_rebuilds_from_scratch() {
    let mut tuning = Tuning::default();
    tuning.player.start_health = 1;
    let mut engine = engine_with(tuning);
    let first = engine.tick();

    let player = engine.player_id().unwrap();
    let bullet = engine.spawn_test_enemy_bullet(100.0, 600.0);
    engine.report_overlap(bullet, player);
    assert_eq!(engine.tick().phase, GamePhase::GameOver);

    engine.queue_command(PlayerCommand::Restart);
    let snap = engine.tick();
    assert_eq!(snap.phase, GamePhase::Active);
    assert_eq!(snap.time.tick, 1);
    assert_eq!(snap.time.elapsed_ms, engine.clock().now());
    assert_eq!(snap.time.elapsed_ms, 20);
    assert_eq!(snap.score, 0);
    assert_eq!(snap.wave.wave_number, 1);
    assert_eq!(snap.player.health, 1);
    assert!(!snap.player.dead);
    assert_eq!(snap.audio_events.first(), Some(&AudioEvent::StopMusic));
    assert!(snap
        .audio_events
        .contains(&AudioEvent::PlayMusic { volume: 0.5 }));

    // Same seed, same first spawn.
    assert_eq!(
        snap.standard_enemies[0].position,
        first.standard_enemies[0].position
    );
}
