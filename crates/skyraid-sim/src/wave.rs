//! Wave controller: spawn budget, first-half gating and wave progression.
//!
//! One value per session, passed by reference to the spawners and to combat
//! resolution. It holds every counter that decides whether an enemy may spawn.

use log::info;

use skyraid_core::config::WaveTuning;
use skyraid_core::enums::WaveStatus;
use skyraid_core::state::WaveView;

/// Result of recording a standard enemy defeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefeatOutcome {
    /// This defeat cleared the first half and unlocked reinforcements.
    pub reinforcements_unlocked: bool,
}

#[derive(Debug, Clone)]
pub struct WaveController {
    wave_number: u32,
    status: WaveStatus,
    enemy_count: u32,
    /// Standard spawns left in this wave's budget.
    enemies_remaining: u32,
    /// Standard spawns this wave. With `enemies_remaining` always sums to `enemy_count`.
    phase_spawned: u32,
    /// Standard enemies shot down this wave.
    phase_defeated: u32,
    /// `false` until the first half is cleared: spawning stops at half the
    /// budget and heavies are withheld.
    initial_spawn_done: bool,
    heavy_max: u32,
    heavies_spawned: u32,
    next_standard_spawn_ms: u64,
    next_heavy_spawn_ms: u64,
}

impl WaveController {
    /// Start at wave 1.
    pub fn new(tuning: &WaveTuning) -> Self {
        let enemy_count = tuning.enemy_count(1);
        Self {
            wave_number: 1,
            status: WaveStatus::InProgress,
            enemy_count,
            enemies_remaining: enemy_count,
            phase_spawned: 0,
            phase_defeated: 0,
            initial_spawn_done: false,
            heavy_max: tuning.heavy_max(1),
            heavies_spawned: 0,
            next_standard_spawn_ms: 0,
            next_heavy_spawn_ms: 0,
        }
    }

    pub fn wave_number(&self) -> u32 {
        self.wave_number
    }

    pub fn status(&self) -> WaveStatus {
        self.status
    }

    pub fn enemy_count(&self) -> u32 {
        self.enemy_count
    }

    pub fn enemies_remaining(&self) -> u32 {
        self.enemies_remaining
    }

    pub fn phase_spawned(&self) -> u32 {
        self.phase_spawned
    }

    pub fn phase_defeated(&self) -> u32 {
        self.phase_defeated
    }

    pub fn initial_spawn_done(&self) -> bool {
        self.initial_spawn_done
    }

    pub fn heavy_max(&self) -> u32 {
        self.heavy_max
    }

    pub fn heavies_spawned(&self) -> u32 {
        self.heavies_spawned
    }

    /// Whether a standard enemy may spawn at `now_ms`.
    pub fn can_spawn_standard(&self, now_ms: u64) -> bool {
        if self.enemies_remaining == 0 || now_ms <= self.next_standard_spawn_ms {
            return false;
        }
        self.initial_spawn_done
            || self.phase_spawned < WaveTuning::initial_spawn_cap(self.enemy_count)
    }

    /// Consume one unit of the standard budget and start the spawn cooldown.
    pub fn record_standard_spawn(&mut self, now_ms: u64, cooldown_ms: u64) {
        self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
        self.phase_spawned += 1;
        self.next_standard_spawn_ms = now_ms + cooldown_ms;
    }

    /// Whether a heavy may spawn at `now_ms` with `active_heavies` on the field.
    pub fn can_spawn_heavy(&self, now_ms: u64, active_heavies: u32) -> bool {
        self.initial_spawn_done
            && active_heavies < self.heavy_max
            && self.heavies_spawned < self.heavy_max
            && now_ms >= self.next_heavy_spawn_ms
    }

    pub fn record_heavy_spawn(&mut self, now_ms: u64, cooldown_ms: u64) {
        self.heavies_spawned += 1;
        self.next_heavy_spawn_ms = now_ms + cooldown_ms;
    }

    /// Count a standard enemy shot down by the player.
    pub fn record_defeat(&mut self) -> DefeatOutcome {
        self.phase_defeated += 1;

        let threshold = WaveTuning::reinforcement_threshold(self.enemy_count);
        if !self.initial_spawn_done && self.phase_defeated >= threshold {
            self.initial_spawn_done = true;
            info!(
                "Wave {}: first half cleared after {} defeats, reinforcements unlocked",
                self.wave_number, self.phase_defeated
            );
            return DefeatOutcome {
                reinforcements_unlocked: true,
            };
        }
        DefeatOutcome::default()
    }

    /// The budget is spent and nothing is left on the field.
    pub fn is_cleared(&self, active_standard: u32) -> bool {
        self.enemies_remaining == 0 && active_standard == 0
    }

    /// Mark the current wave complete.
    pub fn complete(&mut self) {
        self.status = WaveStatus::Complete;
        info!("Wave {} complete", self.wave_number);
    }

    /// Begin the next wave: rescale the budget, reset the phase counters and
    /// hold heavy spawning closed until [`WaveController::release_heavy_gate`].
    ///
    /// Returns the new wave number.
    pub fn start_next(&mut self, tuning: &WaveTuning) -> u32 {
        self.wave_number += 1;
        self.status = WaveStatus::InProgress;
        self.enemy_count = tuning.enemy_count(self.wave_number);
        self.enemies_remaining = self.enemy_count;
        self.initial_spawn_done = false;
        self.phase_spawned = 0;
        self.phase_defeated = 0;
        self.heavy_max = tuning.heavy_max(self.wave_number);
        self.heavies_spawned = self.heavy_max;

        info!(
            "Wave {} started: {} enemies, up to {} heavies",
            self.wave_number, self.enemy_count, self.heavy_max
        );
        self.wave_number
    }

    /// End the post-wave heavy grace window.
    pub fn release_heavy_gate(&mut self) {
        self.heavies_spawned = 0;
    }

    pub fn view(&self) -> WaveView {
        WaveView {
            wave_number: self.wave_number,
            status: self.status,
            enemy_count: self.enemy_count,
            enemies_remaining: self.enemies_remaining,
            phase_spawned: self.phase_spawned,
            phase_defeated: self.phase_defeated,
            reinforcements_unlocked: self.initial_spawn_done,
            heavy_max: self.heavy_max,
            heavies_spawned: self.heavies_spawned,
        }
    }

    /// Force the first half open (for tests that need heavies immediately).
    #[cfg(test)]
    pub(crate) fn unlock_reinforcements(&mut self) {
        self.initial_spawn_done = true;
    }

    /// Drain the spawn budget (for tests of wave completion).
    #[cfg(test)]
    pub(crate) fn exhaust_budget(&mut self) {
        self.phase_spawned += self.enemies_remaining;
        self.enemies_remaining = 0;
    }
}
