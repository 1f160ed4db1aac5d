//! Simulation clock and timer service.
//!
//! Every delayed effect in the game (pause-then-dash, barrage volleys,
//! invincibility expiry, banner expiry, the heavy spawn gate) is a scheduled
//! task record: owner entity + due time + action tag. Tasks never capture
//! entity state; the engine looks the owner up again when a task fires, and
//! destroying an entity cancels every task it owns.

use std::collections::{BTreeMap, HashMap};

use hecs::Entity;

use skyraid_core::enums::BannerKind;
use skyraid_core::types::TimerId;

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Standard enemy: end the pause and start dashing.
    StandardBeginDash,
    /// Standard enemy: fire one straight shot (repeating).
    StandardFire,
    /// Heavy enemy: fire one aimed barrage shot.
    HeavyBarrageShot,
    /// Heavy enemy: post-ram invincibility window is over.
    HeavyInvincibilityExpired,
    /// Player: invincibility window is over.
    PlayerInvincibilityExpired,
    /// Remove a timed banner.
    HideBanner(BannerKind),
    /// Let heavies spawn again after a wave change.
    ReleaseHeavyGate,
}

/// A timer that has come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    pub id: TimerId,
    pub owner: Option<Entity>,
    pub action: TimerAction,
}

#[derive(Debug, Clone)]
struct ScheduledTask {
    id: TimerId,
    owner: Option<Entity>,
    action: TimerAction,
    /// `Some` for repeating tasks.
    interval_ms: Option<u64>,
}

/// Monotonic millisecond clock with an ordered task queue.
///
/// Tasks fire in due-time order; ties go to whichever was scheduled first.
#[derive(Debug, Default)]
pub struct Clock {
    now_ms: u64,
    next_seq: u64,
    /// Keyed by (due time, schedule sequence).
    queue: BTreeMap<(u64, u64), ScheduledTask>,
    /// Where each live timer currently sits in `queue`.
    index: HashMap<TimerId, (u64, u64)>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Move time forward. Due tasks are collected with [`Clock::pop_due`].
    pub fn advance(&mut self, dt_ms: u64) {
        self.now_ms += dt_ms;
    }

    /// Schedule a one-shot task `delay_ms` from now.
    pub fn after(&mut self, delay_ms: u64, owner: Option<Entity>, action: TimerAction) -> TimerId {
        self.schedule(delay_ms, owner, action, None)
    }

    /// Schedule a task that fires every `interval_ms` until cancelled.
    ///
    /// The first firing is one interval from now. A zero interval is treated
    /// as one millisecond so the task cannot fire twice at the same instant.
    pub fn every(
        &mut self,
        interval_ms: u64,
        owner: Option<Entity>,
        action: TimerAction,
    ) -> TimerId {
        let interval_ms = interval_ms.max(1);
        self.schedule(interval_ms, owner, action, Some(interval_ms))
    }

    /// Cancel a task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.index.remove(&id) {
            Some(key) => self.queue.remove(&key).is_some(),
            None => false,
        }
    }

    /// Cancel every task owned by `owner`. Returns how many were removed.
    pub fn cancel_owned_by(&mut self, owner: Entity) -> usize {
        let keys: Vec<(u64, u64)> = self
            .queue
            .iter()
            .filter(|(_, task)| task.owner == Some(owner))
            .map(|(key, _)| *key)
            .collect();

        for key in &keys {
            if let Some(task) = self.queue.remove(key) {
                self.index.remove(&task.id);
            }
        }
        keys.len()
    }

    /// Whether a task is still waiting to fire.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of tasks waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of pending tasks owned by `owner`.
    pub fn pending_for(&self, owner: Entity) -> usize {
        self.queue
            .values()
            .filter(|task| task.owner == Some(owner))
            .count()
    }

    /// Take the earliest task due at or before now.
    ///
    /// Repeating tasks are re-queued one interval after their due time and
    /// keep their id, so a handle stays cancellable for its whole life.
    pub fn pop_due(&mut self) -> Option<FiredTimer> {
        let (&(due, seq), _) = self.queue.first_key_value()?;
        if due > self.now_ms {
            return None;
        }
        let task = self.queue.remove(&(due, seq))?;
        let fired = FiredTimer {
            id: task.id,
            owner: task.owner,
            action: task.action,
        };

        match task.interval_ms {
            Some(interval) => {
                let key = (due + interval, self.bump_seq());
                self.index.insert(task.id, key);
                self.queue.insert(key, task);
            }
            None => {
                self.index.remove(&task.id);
            }
        }
        Some(fired)
    }

    fn schedule(
        &mut self,
        delay_ms: u64,
        owner: Option<Entity>,
        action: TimerAction,
        interval_ms: Option<u64>,
    ) -> TimerId {
        let seq = self.bump_seq();
        let id = TimerId(seq);
        let key = (self.now_ms + delay_ms, seq);
        self.queue.insert(
            key,
            ScheduledTask {
                id,
                owner,
                action,
                interval_ms,
            },
        );
        self.index.insert(id, key);
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
