//! Motion helpers shared by the enemy state machines.

use glam::DVec2;

use skyraid_core::components::SineMotion;
use skyraid_core::types::{Position, Velocity};

/// Vertical position on a standard enemy's sine path at `now_ms`.
pub fn sine_y(motion: &SineMotion, now_ms: u64) -> f64 {
    motion.start_y + (motion.start_time_ms + now_ms as f64 * motion.frequency).sin() * motion.amplitude
}

/// Velocity that carries a projectile from `from` toward `to` at `speed`.
///
/// The direction is fixed at the moment of the call; bullets are not re-aimed.
/// Coincident points aim straight right, matching an `atan2(0, 0)` heading.
pub fn aim_velocity(from: Position, to: Position, speed: f64) -> Velocity {
    let delta = DVec2::new(to.x - from.x, to.y - from.y);
    let heading = delta.y.atan2(delta.x);
    let v = DVec2::from_angle(heading) * speed;
    Velocity::new(v.x, v.y)
}

/// Delays (ms from scheduling) of each shot in a barrage.
pub fn barrage_delays(shots: u32, spacing_ms: u64) -> impl Iterator<Item = u64> {
    (0..shots as u64).map(move |i| i * spacing_ms)
}
