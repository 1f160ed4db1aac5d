//! Enemy behavior finite state machines.
//!
//! Pure functions that compute the next position, phase and velocity of an
//! enemy from its current state and the clock. No ECS dependency; operates
//! on plain data. Anything involving randomness or timers is reported back as
//! a transition for the caller to carry out.

use skyraid_core::components::SineMotion;
use skyraid_core::config::{HeavyTuning, StandardTuning};
use skyraid_core::enums::{HeavyPhase, StandardPhase};
use skyraid_core::types::{Position, Velocity};

use crate::motion::sine_y;

/// Input to the standard enemy FSM for a single entity.
pub struct StandardContext<'a> {
    pub phase: StandardPhase,
    pub position: Position,
    pub motion: SineMotion,
    pub now_ms: u64,
    pub dt_secs: f64,
    pub tuning: &'a StandardTuning,
}

/// Side effects the caller must perform after a standard update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardTransition {
    /// Entered `Waiting`: schedule the delayed switch to `Dashing`.
    BeginPause,
    /// Left the playfield: cancel any pause timer, re-randomise, re-enter at the right.
    Recycle,
}

/// Output from the standard enemy FSM.
pub struct StandardUpdate {
    pub new_phase: StandardPhase,
    pub new_position: Position,
    pub transition: Option<StandardTransition>,
}

/// Evaluate one tick for a standard enemy.
///
/// The vertical sine path runs in every phase. The `Waiting → Dashing` step is
/// timer-driven and never happens here.
pub fn evaluate_standard(ctx: &StandardContext) -> StandardUpdate {
    let mut position = Position::new(ctx.position.x, sine_y(&ctx.motion, ctx.now_ms));
    let mut phase = ctx.phase;
    let mut transition = None;

    match ctx.phase {
        StandardPhase::Normal => {
            position.x -= ctx.tuning.normal_speed * ctx.dt_secs;
            if position.x <= ctx.tuning.pause_x {
                phase = StandardPhase::Waiting;
                transition = Some(StandardTransition::BeginPause);
            }
        }
        StandardPhase::Waiting => {}
        StandardPhase::Dashing => {
            position.x -= ctx.tuning.dash_speed * ctx.dt_secs;
        }
    }

    if position.x < ctx.tuning.recycle_x {
        phase = StandardPhase::Normal;
        transition = Some(StandardTransition::Recycle);
    }

    StandardUpdate {
        new_phase: phase,
        new_position: position,
        transition,
    }
}

/// Input to the heavy enemy FSM for a single entity.
///
/// `position` is expected to already include this tick's velocity integration.
pub struct HeavyContext<'a> {
    pub phase: HeavyPhase,
    pub position: Position,
    pub velocity: Velocity,
    pub settle_x: f64,
    pub idle_since_ms: u64,
    pub has_fired_barrage: bool,
    pub now_ms: u64,
    pub tuning: &'a HeavyTuning,
}

/// Phase transitions the caller must finish off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeavyTransition {
    /// Reached the settle point: record `idle_since` and re-arm the barrage.
    Settled,
    /// Started the retreat dash.
    BeginDash,
    /// Left the playfield while dashing: pick a new y and re-enter at the right edge.
    Reenter,
}

/// Output from the heavy enemy FSM.
pub struct HeavyUpdate {
    pub new_phase: HeavyPhase,
    pub new_position: Position,
    pub new_velocity: Velocity,
    /// Schedule this idle phase's barrage now.
    pub fire_barrage: bool,
    pub transition: Option<HeavyTransition>,
}

/// Evaluate one tick for a heavy enemy.
pub fn evaluate_heavy(ctx: &HeavyContext) -> HeavyUpdate {
    let mut update = HeavyUpdate {
        new_phase: ctx.phase,
        new_position: ctx.position,
        new_velocity: ctx.velocity,
        fire_barrage: false,
        transition: None,
    };

    match ctx.phase {
        HeavyPhase::Entering => {
            if ctx.position.x <= ctx.settle_x {
                update.new_phase = HeavyPhase::Idle;
                update.new_position.x = ctx.settle_x;
                update.new_velocity = Velocity::zero();
                update.transition = Some(HeavyTransition::Settled);
            }
        }
        HeavyPhase::Idle => {
            let idle_ms = ctx.now_ms.saturating_sub(ctx.idle_since_ms);
            let mut fired = ctx.has_fired_barrage;

            if !fired && idle_ms >= ctx.tuning.fire_delay_ms {
                update.fire_barrage = true;
                fired = true;
            }

            if fired && idle_ms >= ctx.tuning.retreat_delay_ms {
                update.new_phase = HeavyPhase::Dashing;
                update.new_velocity = Velocity::new(-ctx.tuning.dash_speed, 0.0);
                update.transition = Some(HeavyTransition::BeginDash);
            }
        }
        HeavyPhase::Dashing => {
            if ctx.position.x < ctx.tuning.reset_x {
                update.new_phase = HeavyPhase::Entering;
                update.new_position.x = ctx.tuning.spawn_x;
                update.new_velocity = Velocity::new(-ctx.tuning.reentry_speed, 0.0);
                update.transition = Some(HeavyTransition::Reenter);
            }
        }
    }

    update
}
