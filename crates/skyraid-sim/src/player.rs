//! Player status: health, invincibility window and the one-way death transition.

use log::info;

use skyraid_core::types::TimerId;

/// What a call to [`PlayerStatus::apply_damage`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Player already dead; nothing changed.
    Ignored,
    /// Health dropped; the player is now invincible.
    Damaged { health: i32 },
    /// Health reached zero. Returned at most once per run.
    Killed,
}

#[derive(Debug, Clone)]
pub struct PlayerStatus {
    health: i32,
    invincible: bool,
    invincibility_timer: Option<TimerId>,
    dead: bool,
}

impl PlayerStatus {
    pub fn new(start_health: i32) -> Self {
        Self {
            health: start_health,
            invincible: false,
            invincibility_timer: None,
            dead: false,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn invincibility_timer(&self) -> Option<TimerId> {
        self.invincibility_timer
    }

    /// Take one unit of damage.
    ///
    /// Callers check invincibility first; this only guards against damage
    /// after death. The invincible flag is raised here, and the caller
    /// schedules its expiry with [`PlayerStatus::begin_invincibility`].
    pub fn apply_damage(&mut self) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - 1).max(0);
        self.invincible = true;

        if self.health == 0 {
            self.dead = true;
            info!("Player destroyed");
            return DamageOutcome::Killed;
        }
        DamageOutcome::Damaged {
            health: self.health,
        }
    }

    /// Attach the expiry timer, returning the one it replaces (to cancel).
    pub fn begin_invincibility(&mut self, timer: TimerId) -> Option<TimerId> {
        self.invincibility_timer.replace(timer)
    }

    /// Expiry callback. Returns `true` if this timer actually ended the window.
    pub fn end_invincibility(&mut self, timer: TimerId) -> bool {
        if self.invincibility_timer != Some(timer) {
            return false;
        }
        self.invincibility_timer = None;
        self.invincible = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_then_expiry() {
        let mut player = PlayerStatus::new(3);
        assert_eq!(player.apply_damage(), DamageOutcome::Damaged { health: 2 });
        assert!(player.is_invincible());

        assert_eq!(player.begin_invincibility(TimerId(7)), None);
        assert!(!player.end_invincibility(TimerId(6)), "stale timer");
        assert!(player.is_invincible());
        assert!(player.end_invincibility(TimerId(7)));
        assert!(!player.is_invincible());
    }

    #[test]
    fn test_new_window_replaces_old_timer() {
        let mut player = PlayerStatus::new(3);
        player.apply_damage();
        player.begin_invincibility(TimerId(1));
        player.apply_damage();
        assert_eq!(player.begin_invincibility(TimerId(2)), Some(TimerId(1)));
        assert!(!player.end_invincibility(TimerId(1)));
        assert!(player.is_invincible());
    }

    #[test]
    fn test_death_is_reported_once() {
        let mut player = PlayerStatus::new(1);
        assert_eq!(player.apply_damage(), DamageOutcome::Killed);
        assert!(player.is_dead());
        assert_eq!(player.health(), 0);

        assert_eq!(player.apply_damage(), DamageOutcome::Ignored);
        assert_eq!(player.apply_damage(), DamageOutcome::Ignored);
        assert_eq!(player.health(), 0, "health never goes negative");
    }
}
