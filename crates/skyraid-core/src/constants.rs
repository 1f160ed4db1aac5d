//! Simulation constants and default tuning parameters.
//!
//! Speeds are pixels per second. Movement rates were tuned per frame at
//! 60 Hz, so `per-frame * 60` appears where that is clearer.

/// Default tick length in milliseconds (50 Hz).
pub const TICK_MS: u64 = 20;

/// Frame rate the per-frame speeds below were authored against.
pub const AUTHORED_FRAME_RATE: f64 = 60.0;

// --- Playfield ---

/// Playfield width in pixels.
pub const PLAYFIELD_WIDTH: f64 = 1900.0;

/// Playfield height in pixels.
pub const PLAYFIELD_HEIGHT: f64 = 1200.0;

// --- Player ---

pub const PLAYER_START_X: f64 = 100.0;
pub const PLAYER_START_Y: f64 = PLAYFIELD_HEIGHT / 2.0;
pub const PLAYER_START_HEALTH: i32 = 3;

/// Vertical speed while an up/down intent is held.
pub const PLAYER_VERTICAL_SPEED: f64 = 320.0;

/// Invincibility window after taking damage.
pub const PLAYER_INVINCIBILITY_MS: u64 = 1000;

/// Minimum time between shots.
pub const PLAYER_FIRE_COOLDOWN_MS: u64 = 300;

/// Maximum simultaneously active player bullets.
pub const PLAYER_MAX_ACTIVE_BULLETS: usize = 3;

/// Player bullet pool capacity.
pub const PLAYER_BULLET_POOL: usize = 10;

/// Horizontal offset from the ship at which bullets appear.
pub const PLAYER_MUZZLE_OFFSET_X: f64 = 20.0;

pub const PLAYER_BULLET_SPEED: f64 = 800.0;

/// Background music fade duration on death.
pub const MUSIC_FADE_MS: u64 = 1000;

pub const MUSIC_VOLUME: f64 = 0.5;

// --- Standard enemy ---

pub const STANDARD_SPAWN_X: f64 = 1900.0;
pub const STANDARD_SPAWN_Y_MIN: f64 = 125.0;
pub const STANDARD_SPAWN_Y_MAX: f64 = 1100.0;
pub const STANDARD_FREQUENCY_MIN: f64 = 0.002;
pub const STANDARD_FREQUENCY_MAX: f64 = 0.004;
pub const STANDARD_AMPLITUDE_MIN: f64 = 50.0;
pub const STANDARD_AMPLITUDE_MAX: f64 = 100.0;

/// Drift speed in `Normal` (2 px per authored frame).
pub const STANDARD_NORMAL_SPEED: f64 = 2.0 * AUTHORED_FRAME_RATE;

/// Dash speed in `Dashing` (10 px per authored frame).
pub const STANDARD_DASH_SPEED: f64 = 10.0 * AUTHORED_FRAME_RATE;

/// x at or below which a drifting enemy pauses (75% across from the right).
pub const STANDARD_PAUSE_X: f64 = 1425.0;

/// Pause before the dash.
pub const STANDARD_PAUSE_MS: u64 = 500;

/// Left bound below which a standard enemy is recycled.
pub const STANDARD_RECYCLE_X: f64 = -50.0;

/// x at which a recycled standard enemy re-enters.
pub const STANDARD_REENTRY_X: f64 = 1950.0;

/// Minimum time between standard spawns.
pub const STANDARD_SPAWN_COOLDOWN_MS: u64 = 1000;

/// Interval of the repeating straight shot.
pub const STANDARD_FIRE_INTERVAL_MS: u64 = 4000;

pub const STANDARD_BULLET_SPEED: f64 = 600.0;

/// Horizontal offset from the enemy at which its bullets appear.
pub const STANDARD_MUZZLE_OFFSET_X: f64 = 20.0;

// --- Heavy enemy ---

pub const HEAVY_SPAWN_X: f64 = 2000.0;
pub const HEAVY_SPAWN_Y_MIN: f64 = 150.0;
pub const HEAVY_SPAWN_Y_MAX: f64 = 1050.0;
pub const HEAVY_SETTLE_X: f64 = 1700.0;
pub const HEAVY_HIT_POINTS: u32 = 5;

/// Entry velocity of a freshly spawned heavy.
pub const HEAVY_ENTRY_SPEED: f64 = 120.0;

/// Entry velocity after a dash-and-reset cycle. Slower than the first entry.
pub const HEAVY_REENTRY_SPEED: f64 = 40.0;

pub const HEAVY_DASH_SPEED: f64 = 800.0;

/// Left bound below which a dashing heavy resets to the right edge.
pub const HEAVY_RESET_X: f64 = -150.0;

/// Idle time before the barrage is scheduled.
pub const HEAVY_FIRE_DELAY_MS: u64 = 1000;

/// Idle time before the retreat dash.
pub const HEAVY_RETREAT_DELAY_MS: u64 = 2000;

pub const HEAVY_BARRAGE_SHOTS: u32 = 5;
pub const HEAVY_BARRAGE_SPACING_MS: u64 = 200;
pub const HEAVY_BULLET_SPEED: f64 = 1200.0;

/// Body-collision cooldown after ramming the player.
pub const HEAVY_INVINCIBILITY_MS: u64 = 1000;

/// Minimum time between heavy spawns.
pub const HEAVY_SPAWN_COOLDOWN_MS: u64 = 4000;

// --- Bullets ---

/// Player bullets beyond this x are removed.
pub const PLAYER_BULLET_MAX_X: f64 = 1900.0;

/// Enemy bullets below this x are removed.
pub const ENEMY_BULLET_MIN_X: f64 = -10.0;

/// Aimed bullets further than this outside the top/bottom edges are removed.
pub const BULLET_VERTICAL_MARGIN: f64 = 200.0;

// --- Waves ---

pub const WAVE_BASE_ENEMY_COUNT: u32 = 15;
pub const WAVE_ENEMIES_PER_LEVEL: u32 = 5;
pub const WAVE_BASE_HEAVY_MAX: u32 = 3;

/// One extra heavy allowed every this many waves.
pub const WAVE_HEAVY_STEP: u32 = 2;

/// Heavy spawning stays blocked this long after a new wave starts.
pub const WAVE_HEAVY_GATE_MS: u64 = 100;

/// Display duration of wave and reinforcement banners.
pub const BANNER_DURATION_MS: u64 = 2000;

// --- Scoring ---

pub const SCORE_STANDARD: u64 = 100;
pub const SCORE_HEAVY: u64 = 500;

// --- Effects ---

pub const ENEMY_EXPLOSION_SCALE: f64 = 1.2;
pub const PLAYER_EXPLOSION_SCALE: f64 = 1.5;

/// Player alpha while invincible.
pub const INVINCIBLE_ALPHA: f64 = 0.5;

// --- Background ---

/// Parallax scroll rates per authored frame, back to front:
/// sky, far mountains, mid mountains, water, city, reflection, front.
pub const PARALLAX_RATES: [f64; 7] = [0.2, 0.4, 0.6, 0.8, 1.0, 1.0, 1.2];
