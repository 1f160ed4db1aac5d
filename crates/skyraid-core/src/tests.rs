#[cfg(test)]
mod tests {
    use crate::commands::{InputIntent, PlayerCommand};
    use crate::config::{Tuning, WaveTuning};
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::{ConfigError, EffectError};
    use crate::events::{AudioEvent, PresentationEvent};
    use crate::state::GameStateSnapshot;
    use crate::types::{Position, SimTime, Velocity};

    /// Verify phase enums round-trip through serde_json.
    #[test]
    fn test_phase_serde() {
        for v in [
            StandardPhase::Normal,
            StandardPhase::Waiting,
            StandardPhase::Dashing,
        ] {
            let json = serde_json::to_string(&v).unwrap();
            let back: StandardPhase = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
        for v in [HeavyPhase::Entering, HeavyPhase::Idle, HeavyPhase::Dashing] {
            let json = serde_json::to_string(&v).unwrap();
            let back: HeavyPhase = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_player_command_serde_tagged() {
        let json = serde_json::to_string(&PlayerCommand::Restart).unwrap();
        assert_eq!(json, r#"{"type":"Restart"}"#);
        let back: PlayerCommand = serde_json::from_str(r#"{"type":"ToggleDebugOverlay"}"#).unwrap();
        assert_eq!(back, PlayerCommand::ToggleDebugOverlay);
    }

    #[test]
    fn test_input_intent_default_is_idle() {
        let intent = InputIntent::default();
        assert!(!intent.up && !intent.down && !intent.fire);
    }

    #[test]
    fn test_explosion_rejects_non_finite() {
        let err = PresentationEvent::explosion(f64::NAN, 10.0, 1.0).unwrap_err();
        assert!(matches!(err, EffectError::NonFiniteCoordinate { .. }));

        let err = PresentationEvent::explosion(10.0, f64::INFINITY, 1.0).unwrap_err();
        assert!(matches!(err, EffectError::NonFiniteCoordinate { .. }));

        let err = PresentationEvent::explosion(10.0, 10.0, 0.0).unwrap_err();
        assert_eq!(err, EffectError::InvalidScale(0.0));

        let ok = PresentationEvent::explosion(10.0, 20.0, 1.2).unwrap();
        assert_eq!(
            ok,
            PresentationEvent::Explosion {
                x: 10.0,
                y: 20.0,
                scale: 1.2
            }
        );
    }

    #[test]
    fn test_audio_event_default_sound() {
        let ev = AudioEvent::sound(SoundEffect::EnemyExplosion);
        assert_eq!(
            ev,
            AudioEvent::Sound {
                effect: SoundEffect::EnemyExplosion,
                volume: 1.0,
                rate: 1.0
            }
        );
    }

    #[test]
    fn test_sim_time_at() {
        let time = SimTime::at(50, 50 * TICK_MS);
        assert_eq!(time.tick, 50);
        assert_eq!(time.elapsed_ms, 1000);
        assert!((time.elapsed_secs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_position_and_velocity_helpers() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!(!Position::new(f64::NAN, 0.0).is_finite());
        assert!((Velocity::new(-3.0, 4.0).speed() - 5.0).abs() < 1e-12);
    }

    // ---- Wave formulas ----

    #[test]
    fn test_wave_enemy_count_formula() {
        let wave = WaveTuning::default();
        for n in 1..=20 {
            assert_eq!(wave.enemy_count(n), 15 + 5 * (n - 1), "wave {n}");
        }
    }

    #[test]
    fn test_wave_heavy_max_formula() {
        let wave = WaveTuning::default();
        for n in 1..=20 {
            assert_eq!(wave.heavy_max(n), 3 + (n - 1) / 2, "wave {n}");
        }
    }

    #[test]
    fn test_reinforcement_threshold() {
        // floor(15/2) = 7, ceil(7/2) = 4
        assert_eq!(WaveTuning::initial_spawn_cap(15), 7);
        assert_eq!(WaveTuning::reinforcement_threshold(15), 4);
        // floor(20/2) = 10, ceil(10/2) = 5
        assert_eq!(WaveTuning::reinforcement_threshold(20), 5);
        // floor(25/2) = 12, ceil(12/2) = 6
        assert_eq!(WaveTuning::reinforcement_threshold(25), 6);
    }

    // ---- Tuning ----

    #[test]
    fn test_default_tuning_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.tick_ms, TICK_MS);
        assert_eq!(tuning.heavy.hit_points, 5);
        assert_eq!(tuning.player.start_health, 3);
    }

    #[test]
    fn test_partial_tuning_json_fills_defaults() {
        let tuning =
            Tuning::from_json_str(r#"{ "tick_ms": 16, "heavy": { "hit_points": 8 } }"#).unwrap();
        assert_eq!(tuning.tick_ms, 16);
        assert_eq!(tuning.heavy.hit_points, 8);
        assert_eq!(tuning.heavy.settle_x, HEAVY_SETTLE_X);
        assert_eq!(tuning.standard, Tuning::default().standard);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let err = Tuning::from_json_str(r#"{ "tick_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "tick_ms", .. }));

        let err = Tuning::from_json_str(r#"{ "heavy": { "hit_points": 0 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "heavy.hit_points",
                ..
            }
        ));

        let err = Tuning::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_tuning_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back = Tuning::from_json_str(&json).unwrap();
        assert_eq!(tuning, back);
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = GameStateSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Active);
        assert_eq!(back.score, 0);
    }
}
