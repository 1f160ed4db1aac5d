//! Tuning configuration.
//!
//! Every value defaults to the matching constant in `constants.rs`. Each
//! section is `#[serde(default)]`, so a tuning file only needs the fields it
//! overrides:
//!
//! ```json
//! { "tick_ms": 16, "heavy": { "hit_points": 8 } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// All gameplay tuning for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed tick length in milliseconds.
    pub tick_ms: u64,
    pub playfield: PlayfieldTuning,
    pub player: PlayerTuning,
    pub standard: StandardTuning,
    pub heavy: HeavyTuning,
    pub wave: WaveTuning,
    pub scoring: ScoringTuning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldTuning {
    pub width: f64,
    pub height: f64,
    pub player_bullet_max_x: f64,
    pub enemy_bullet_min_x: f64,
    pub bullet_vertical_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start_x: f64,
    pub start_y: f64,
    pub start_health: i32,
    pub vertical_speed: f64,
    pub invincibility_ms: u64,
    pub fire_cooldown_ms: u64,
    pub max_active_bullets: usize,
    pub bullet_pool: usize,
    pub muzzle_offset_x: f64,
    pub bullet_speed: f64,
    pub music_volume: f64,
    pub music_fade_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardTuning {
    pub spawn_x: f64,
    pub spawn_y_min: f64,
    pub spawn_y_max: f64,
    pub frequency_min: f64,
    pub frequency_max: f64,
    pub amplitude_min: f64,
    pub amplitude_max: f64,
    pub normal_speed: f64,
    pub dash_speed: f64,
    pub pause_x: f64,
    pub pause_ms: u64,
    pub recycle_x: f64,
    pub reentry_x: f64,
    pub spawn_cooldown_ms: u64,
    pub fire_interval_ms: u64,
    pub bullet_speed: f64,
    pub muzzle_offset_x: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeavyTuning {
    pub spawn_x: f64,
    pub spawn_y_min: f64,
    pub spawn_y_max: f64,
    pub settle_x: f64,
    pub hit_points: u32,
    pub entry_speed: f64,
    pub reentry_speed: f64,
    pub dash_speed: f64,
    pub reset_x: f64,
    pub fire_delay_ms: u64,
    pub retreat_delay_ms: u64,
    pub barrage_shots: u32,
    pub barrage_spacing_ms: u64,
    pub bullet_speed: f64,
    pub invincibility_ms: u64,
    pub spawn_cooldown_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub base_enemy_count: u32,
    pub enemies_per_level: u32,
    pub base_heavy_max: u32,
    pub heavy_step: u32,
    pub heavy_gate_ms: u64,
    pub banner_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    pub standard: u64,
    pub heavy: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            playfield: PlayfieldTuning::default(),
            player: PlayerTuning::default(),
            standard: StandardTuning::default(),
            heavy: HeavyTuning::default(),
            wave: WaveTuning::default(),
            scoring: ScoringTuning::default(),
        }
    }
}

impl Default for PlayfieldTuning {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            player_bullet_max_x: PLAYER_BULLET_MAX_X,
            enemy_bullet_min_x: ENEMY_BULLET_MIN_X,
            bullet_vertical_margin: BULLET_VERTICAL_MARGIN,
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_x: PLAYER_START_X,
            start_y: PLAYER_START_Y,
            start_health: PLAYER_START_HEALTH,
            vertical_speed: PLAYER_VERTICAL_SPEED,
            invincibility_ms: PLAYER_INVINCIBILITY_MS,
            fire_cooldown_ms: PLAYER_FIRE_COOLDOWN_MS,
            max_active_bullets: PLAYER_MAX_ACTIVE_BULLETS,
            bullet_pool: PLAYER_BULLET_POOL,
            muzzle_offset_x: PLAYER_MUZZLE_OFFSET_X,
            bullet_speed: PLAYER_BULLET_SPEED,
            music_volume: MUSIC_VOLUME,
            music_fade_ms: MUSIC_FADE_MS,
        }
    }
}

impl Default for StandardTuning {
    fn default() -> Self {
        Self {
            spawn_x: STANDARD_SPAWN_X,
            spawn_y_min: STANDARD_SPAWN_Y_MIN,
            spawn_y_max: STANDARD_SPAWN_Y_MAX,
            frequency_min: STANDARD_FREQUENCY_MIN,
            frequency_max: STANDARD_FREQUENCY_MAX,
            amplitude_min: STANDARD_AMPLITUDE_MIN,
            amplitude_max: STANDARD_AMPLITUDE_MAX,
            normal_speed: STANDARD_NORMAL_SPEED,
            dash_speed: STANDARD_DASH_SPEED,
            pause_x: STANDARD_PAUSE_X,
            pause_ms: STANDARD_PAUSE_MS,
            recycle_x: STANDARD_RECYCLE_X,
            reentry_x: STANDARD_REENTRY_X,
            spawn_cooldown_ms: STANDARD_SPAWN_COOLDOWN_MS,
            fire_interval_ms: STANDARD_FIRE_INTERVAL_MS,
            bullet_speed: STANDARD_BULLET_SPEED,
            muzzle_offset_x: STANDARD_MUZZLE_OFFSET_X,
        }
    }
}

impl Default for HeavyTuning {
    fn default() -> Self {
        Self {
            spawn_x: HEAVY_SPAWN_X,
            spawn_y_min: HEAVY_SPAWN_Y_MIN,
            spawn_y_max: HEAVY_SPAWN_Y_MAX,
            settle_x: HEAVY_SETTLE_X,
            hit_points: HEAVY_HIT_POINTS,
            entry_speed: HEAVY_ENTRY_SPEED,
            reentry_speed: HEAVY_REENTRY_SPEED,
            dash_speed: HEAVY_DASH_SPEED,
            reset_x: HEAVY_RESET_X,
            fire_delay_ms: HEAVY_FIRE_DELAY_MS,
            retreat_delay_ms: HEAVY_RETREAT_DELAY_MS,
            barrage_shots: HEAVY_BARRAGE_SHOTS,
            barrage_spacing_ms: HEAVY_BARRAGE_SPACING_MS,
            bullet_speed: HEAVY_BULLET_SPEED,
            invincibility_ms: HEAVY_INVINCIBILITY_MS,
            spawn_cooldown_ms: HEAVY_SPAWN_COOLDOWN_MS,
        }
    }
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_enemy_count: WAVE_BASE_ENEMY_COUNT,
            enemies_per_level: WAVE_ENEMIES_PER_LEVEL,
            base_heavy_max: WAVE_BASE_HEAVY_MAX,
            heavy_step: WAVE_HEAVY_STEP,
            heavy_gate_ms: WAVE_HEAVY_GATE_MS,
            banner_ms: BANNER_DURATION_MS,
        }
    }
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            standard: SCORE_STANDARD,
            heavy: SCORE_HEAVY,
        }
    }
}

impl WaveTuning {
    /// Standard enemy budget for a wave (1-based).
    pub fn enemy_count(&self, wave_number: u32) -> u32 {
        self.base_enemy_count + wave_number.saturating_sub(1) * self.enemies_per_level
    }

    /// Heavy enemy cap for a wave (1-based). Grows by one every `heavy_step` waves.
    pub fn heavy_max(&self, wave_number: u32) -> u32 {
        self.base_heavy_max + wave_number.saturating_sub(1) / self.heavy_step.max(1)
    }

    /// How many standard enemies may spawn before reinforcements unlock.
    pub fn initial_spawn_cap(enemy_count: u32) -> u32 {
        enemy_count / 2
    }

    /// Defeats needed to unlock reinforcements: half of the initial half, rounded up.
    pub fn reinforcement_threshold(enemy_count: u32) -> u32 {
        Self::initial_spawn_cap(enemy_count).div_ceil(2)
    }
}

impl Tuning {
    /// Seconds per tick.
    pub fn dt_secs(&self) -> f64 {
        self.tick_ms as f64 / 1000.0
    }

    /// Parse a (possibly partial) tuning document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(invalid("tick_ms", "must be at least 1 ms"));
        }
        if self.playfield.width <= 0.0 || self.playfield.height <= 0.0 {
            return Err(invalid("playfield", "width and height must be positive"));
        }
        if self.player.start_health <= 0 {
            return Err(invalid("player.start_health", "must be positive"));
        }
        if self.player.max_active_bullets > self.player.bullet_pool {
            return Err(invalid(
                "player.max_active_bullets",
                "cannot exceed player.bullet_pool",
            ));
        }
        if self.standard.spawn_y_min > self.standard.spawn_y_max {
            return Err(invalid("standard.spawn_y_min", "must not exceed spawn_y_max"));
        }
        if self.standard.frequency_min >= self.standard.frequency_max {
            return Err(invalid(
                "standard.frequency_min",
                "must be below frequency_max",
            ));
        }
        if self.standard.amplitude_min > self.standard.amplitude_max {
            return Err(invalid(
                "standard.amplitude_min",
                "must not exceed amplitude_max",
            ));
        }
        if self.standard.fire_interval_ms == 0 {
            return Err(invalid("standard.fire_interval_ms", "must be positive"));
        }
        if self.heavy.spawn_y_min > self.heavy.spawn_y_max {
            return Err(invalid("heavy.spawn_y_min", "must not exceed spawn_y_max"));
        }
        if self.heavy.hit_points == 0 {
            return Err(invalid("heavy.hit_points", "must be at least 1"));
        }
        if self.heavy.settle_x >= self.heavy.spawn_x {
            return Err(invalid("heavy.settle_x", "must be left of heavy.spawn_x"));
        }
        if self.wave.heavy_step == 0 {
            return Err(invalid("wave.heavy_step", "must be at least 1"));
        }
        if self.wave.base_enemy_count == 0 {
            return Err(invalid("wave.base_enemy_count", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
