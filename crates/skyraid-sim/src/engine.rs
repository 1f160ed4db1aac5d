//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the clock, the wave controller
//! and the player status. Each tick it processes queued commands, runs all
//! systems in a fixed order, resolves reported overlaps and produces a
//! `GameStateSnapshot`. Completely headless, enabling deterministic testing.

use std::collections::{HashMap, VecDeque};

use hecs::{Entity, World};
use log::{debug, info, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use skyraid_core::commands::{InputIntent, PlayerCommand};
use skyraid_core::components::StandardEnemy;
use skyraid_core::config::Tuning;
use skyraid_core::constants::{ENEMY_EXPLOSION_SCALE, INVINCIBLE_ALPHA, PLAYER_EXPLOSION_SCALE};
use skyraid_core::enums::{BannerKind, GamePhase, SoundEffect};
use skyraid_core::events::{AudioEvent, PresentationEvent};
use skyraid_core::state::GameStateSnapshot;
use skyraid_core::types::{EntityId, Position, SimTime, TimerId};

use crate::clock::{Clock, FiredTimer, TimerAction};
use crate::combat::{self, CombatEffect, OverlapKind};
use crate::overlap::{self, OverlapDetector};
use crate::player::{DamageOutcome, PlayerStatus};
use crate::registry;
use crate::systems;
use crate::systems::parallax::Parallax;
use crate::systems::player_control::FireGate;
use crate::systems::snapshot::SnapshotInputs;
use crate::wave::WaveController;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed + same inputs = same simulation.
    pub seed: u64,
    pub tuning: Tuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: Tuning::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    world: World,
    clock: Clock,
    ticks: u64,
    phase: GamePhase,
    rng: ChaCha8Rng,
    wave: WaveController,
    player: PlayerStatus,
    player_entity: Option<Entity>,
    score: u64,
    parallax: Parallax,
    fire_gate: FireGate,
    input: InputIntent,
    debug_overlay: bool,
    banner_timers: HashMap<BannerKind, TimerId>,
    command_queue: VecDeque<PlayerCommand>,
    reported_overlaps: Vec<(EntityId, EntityId)>,
    overlap_detector: Option<Box<dyn OverlapDetector>>,
    despawn_buffer: Vec<Entity>,
    presentation_events: Vec<PresentationEvent>,
    audio_events: Vec<AudioEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine at wave 1 with the given config.
    ///
    /// A tuning that fails validation is logged and replaced by the defaults.
    pub fn new(mut config: SimConfig) -> Self {
        if let Err(err) = config.tuning.validate() {
            warn!("Rejected tuning: {err}; using defaults");
            config.tuning = Tuning::default();
        }
        let tuning = &config.tuning;
        let mut engine = Self {
            world: World::new(),
            clock: Clock::new(),
            ticks: 0,
            phase: GamePhase::Active,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            wave: WaveController::new(&tuning.wave),
            player: PlayerStatus::new(tuning.player.start_health),
            player_entity: None,
            score: 0,
            parallax: Parallax::default(),
            fire_gate: FireGate::default(),
            input: InputIntent::default(),
            debug_overlay: false,
            banner_timers: HashMap::new(),
            command_queue: VecDeque::new(),
            reported_overlaps: Vec::new(),
            overlap_detector: None,
            despawn_buffer: Vec::new(),
            presentation_events: Vec::new(),
            audio_events: Vec::new(),
            config,
        };
        engine.start_session();
        engine
    }

    /// Set the held intents used from the next tick on.
    pub fn set_input(&mut self, input: InputIntent) {
        self.input = input;
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Report that two entities overlap. Resolved during the next tick.
    pub fn report_overlap(&mut self, a: EntityId, b: EntityId) {
        self.reported_overlaps.push((a, b));
    }

    /// Install a detector polled every tick once positions are final.
    pub fn set_overlap_detector(&mut self, detector: Box<dyn OverlapDetector>) {
        self.overlap_detector = Some(detector);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
        } else {
            self.reported_overlaps.clear();
        }

        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotInputs {
                time: self.time(),
                phase: self.phase,
                score: self.score,
                wave: &self.wave,
                player: &self.player,
                parallax: self.parallax.offsets(),
                debug_overlay: self.debug_overlay,
                presentation_events: std::mem::take(&mut self.presentation_events),
                audio_events: std::mem::take(&mut self.audio_events),
            },
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time. Elapsed time is the clock's.
    pub fn time(&self) -> SimTime {
        SimTime::at(self.ticks, self.clock.now())
    }

    pub fn wave(&self) -> &WaveController {
        &self.wave
    }

    pub fn player(&self) -> &PlayerStatus {
        &self.player
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Public identity of the player's ship.
    pub fn player_id(&self) -> Option<EntityId> {
        self.player_entity.map(registry::entity_id)
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn tuning(&self) -> &Tuning {
        &self.config.tuning
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Restart => self.restart(),
            PlayerCommand::ToggleDebugOverlay => {
                self.debug_overlay = !self.debug_overlay;
                info!(
                    "Debug overlay {}",
                    if self.debug_overlay { "enabled" } else { "disabled" }
                );
            }
        }
    }

    /// Tear everything down and rebuild from the stored config.
    ///
    /// The overlap detector and held input survive; everything else is new.
    fn restart(&mut self) {
        let tuning = &self.config.tuning;
        self.world = World::new();
        self.clock = Clock::new();
        self.ticks = 0;
        self.phase = GamePhase::Active;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.wave = WaveController::new(&tuning.wave);
        self.player = PlayerStatus::new(tuning.player.start_health);
        self.player_entity = None;
        self.score = 0;
        self.parallax = Parallax::default();
        self.fire_gate = FireGate::default();
        self.banner_timers.clear();
        self.reported_overlaps.clear();
        self.presentation_events.clear();
        self.audio_events.clear();

        self.audio_events.push(AudioEvent::StopMusic);
        info!("Restarting from wave 1");
        self.start_session();
    }

    /// Spawn the ship and announce wave 1.
    fn start_session(&mut self) {
        let tuning = &self.config.tuning;
        self.player_entity = Some(registry::spawn_player(&mut self.world, &tuning.player));
        self.audio_events.push(AudioEvent::PlayMusic {
            volume: tuning.player.music_volume,
        });
        self.presentation_events
            .push(PresentationEvent::ScoreChanged { score: self.score });
        self.push_health();
        let text = format!("Wave {}", self.wave.wave_number());
        self.show_banner(BannerKind::Wave, text);
        info!(
            "Session started (seed {}): wave 1, {} enemies",
            self.config.seed,
            self.wave.enemy_count()
        );
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let tick_ms = self.config.tuning.tick_ms;
        let dt = self.config.tuning.dt_secs();

        // 1. Clock
        self.clock.advance(tick_ms);
        self.ticks += 1;
        self.fire_due_timers();

        // 2. Movement integration (bullets, heavies, player)
        systems::movement::run(&mut self.world, dt);
        // 3. Background scroll
        self.parallax.advance(dt);
        // 4. Player input + fire
        systems::player_control::run(
            &mut self.world,
            self.input,
            &self.config.tuning.player,
            &self.config.tuning.playfield,
            &mut self.fire_gate,
            self.clock.now(),
        );
        // 5. Standard enemies
        systems::standard_ai::spawn(
            &mut self.world,
            &mut self.clock,
            &mut self.rng,
            &mut self.wave,
            &self.config.tuning.standard,
        );
        systems::standard_ai::run(
            &mut self.world,
            &mut self.clock,
            &mut self.rng,
            &self.config.tuning.standard,
            dt,
        );
        // 6. Heavy enemies
        systems::heavy_ai::spawn(
            &mut self.world,
            &self.clock,
            &mut self.rng,
            &mut self.wave,
            &self.config.tuning.heavy,
        );
        systems::heavy_ai::run(
            &mut self.world,
            &mut self.clock,
            &mut self.rng,
            &self.config.tuning.heavy,
        );
        // 7. Zero-delay timers scheduled by the updates above
        self.fire_due_timers();
        // 8. Bullet cleanup
        systems::cleanup::run(
            &mut self.world,
            &mut self.clock,
            &self.config.tuning.playfield,
            &mut self.despawn_buffer,
        );
        // 9. Overlap resolution
        self.resolve_overlaps();
    }

    fn fire_due_timers(&mut self) {
        while let Some(fired) = self.clock.pop_due() {
            self.handle_timer(fired);
        }
    }

    fn handle_timer(&mut self, fired: FiredTimer) {
        let tuning = &self.config.tuning;
        match (fired.action, fired.owner) {
            (TimerAction::StandardBeginDash, Some(owner)) => {
                systems::standard_ai::begin_dash(&mut self.world, owner, fired.id);
            }
            (TimerAction::StandardFire, Some(owner)) => {
                systems::standard_ai::fire(&mut self.world, owner, &tuning.standard);
            }
            (TimerAction::HeavyBarrageShot, Some(owner)) => {
                let Some(target) = self.player_position() else {
                    return;
                };
                systems::heavy_ai::fire_barrage_shot(&mut self.world, owner, target, &tuning.heavy);
            }
            (TimerAction::HeavyInvincibilityExpired, Some(owner)) => {
                if systems::heavy_ai::end_invincibility(&mut self.world, owner, fired.id) {
                    self.presentation_events.push(PresentationEvent::SetAlpha {
                        entity: registry::entity_id(owner),
                        alpha: 1.0,
                    });
                }
            }
            (TimerAction::PlayerInvincibilityExpired, _) => {
                if self.player.end_invincibility(fired.id) {
                    if let Some(id) = self.player_id() {
                        self.presentation_events
                            .push(PresentationEvent::SetAlpha { entity: id, alpha: 1.0 });
                    }
                }
            }
            (TimerAction::HideBanner(banner), _) => {
                if self.banner_timers.get(&banner) == Some(&fired.id) {
                    self.banner_timers.remove(&banner);
                    self.presentation_events
                        .push(PresentationEvent::HideBanner { banner });
                }
            }
            (TimerAction::ReleaseHeavyGate, _) => {
                self.wave.release_heavy_gate();
                debug!("Heavy spawning released for wave {}", self.wave.wave_number());
            }
            (action, None) => {
                trace!("Timer {:?} has no owner: {:?}", fired.id, action);
            }
        }
    }

    /// Resolve this tick's overlaps, one category at a time.
    fn resolve_overlaps(&mut self) {
        let mut pairs = std::mem::take(&mut self.reported_overlaps);
        if let Some(detector) = self.overlap_detector.as_mut() {
            let bodies = overlap::collect_bodies(&self.world);
            pairs.extend(detector.detect(&bodies));
        }
        if pairs.is_empty() {
            return;
        }

        let mut classified: Vec<(OverlapKind, Entity, Entity)> = pairs
            .into_iter()
            .filter_map(|(a, b)| {
                let a = registry::resolve_id(&self.world, a)?;
                let b = registry::resolve_id(&self.world, b)?;
                let kind = OverlapKind::classify(
                    registry::kind_of(&self.world, a)?,
                    registry::kind_of(&self.world, b)?,
                )?;
                Some((kind, a, b))
            })
            .collect();
        // Stable: report order is kept within a category.
        classified.sort_by_key(|(kind, _, _)| *kind);

        for (kind, a, b) in classified {
            if self.phase != GamePhase::Active {
                break;
            }
            // Snapshots are taken fresh: an earlier pair may have consumed either side.
            let (Some(first), Some(second)) = (
                registry::combatant(&self.world, &self.player, a),
                registry::combatant(&self.world, &self.player, b),
            ) else {
                trace!("Skipping {:?} overlap: entity already destroyed", kind);
                continue;
            };
            if let Some((_, effects)) = combat::resolve(&first, &second) {
                self.apply_effects(effects);
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<CombatEffect>) {
        for effect in effects {
            self.apply_effect(effect);
        }
    }

    fn apply_effect(&mut self, effect: CombatEffect) {
        match effect {
            CombatEffect::ConsumeBullet(bullet) => {
                registry::destroy(&mut self.world, &mut self.clock, bullet);
            }
            CombatEffect::KillStandard { entity, position } => {
                if !registry::destroy(&mut self.world, &mut self.clock, entity) {
                    return;
                }
                self.push_explosion(position, ENEMY_EXPLOSION_SCALE);
                self.audio_events.push(AudioEvent::Sound {
                    effect: SoundEffect::EnemyExplosion,
                    volume: 0.6,
                    rate: 3.0,
                });
                self.score += self.config.tuning.scoring.standard;

                if self.wave.record_defeat().reinforcements_unlocked {
                    self.show_banner(
                        BannerKind::Reinforcements,
                        "Reinforcements Incoming!".to_string(),
                    );
                }
                self.check_wave_cleared();
            }
            CombatEffect::RamStandard { entity } => {
                if registry::destroy(&mut self.world, &mut self.clock, entity) {
                    self.check_wave_cleared();
                }
            }
            CombatEffect::SetHeavyHitPoints { entity, hit_points } => {
                systems::heavy_ai::set_hit_points(&mut self.world, entity, hit_points);
            }
            CombatEffect::KillHeavy { entity, position } => {
                if !registry::destroy(&mut self.world, &mut self.clock, entity) {
                    return;
                }
                self.push_explosion(position, ENEMY_EXPLOSION_SCALE);
                self.audio_events
                    .push(AudioEvent::sound(SoundEffect::EnemyExplosion));
                self.score += self.config.tuning.scoring.heavy;
                debug!("Heavy {:?} destroyed", entity);
            }
            CombatEffect::GrantHeavyInvincibility(entity) => {
                systems::heavy_ai::grant_invincibility(
                    &mut self.world,
                    &mut self.clock,
                    entity,
                    &self.config.tuning.heavy,
                );
            }
            CombatEffect::RamImpactSound => {
                self.audio_events
                    .push(AudioEvent::sound(SoundEffect::EnemyExplosion));
            }
            CombatEffect::DamagePlayer => self.damage_player(),
            CombatEffect::RefreshHealth => self.push_health(),
            CombatEffect::RefreshScore => {
                self.presentation_events
                    .push(PresentationEvent::ScoreChanged { score: self.score });
            }
        }
    }

    fn damage_player(&mut self) {
        let player_id = self.player_id();
        let outcome = self.player.apply_damage();
        self.push_health();
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { health } => {
                let timer = self.clock.after(
                    self.config.tuning.player.invincibility_ms,
                    self.player_entity,
                    TimerAction::PlayerInvincibilityExpired,
                );
                if let Some(stale) = self.player.begin_invincibility(timer) {
                    self.clock.cancel(stale);
                }
                if let Some(id) = player_id {
                    self.presentation_events.push(PresentationEvent::SetAlpha {
                        entity: id,
                        alpha: INVINCIBLE_ALPHA,
                    });
                }
                self.push_hit_sound();
                debug!("Player hit, health {}", health);
            }
            DamageOutcome::Killed => {
                self.push_hit_sound();
                if let Some(position) = self.player_position() {
                    self.push_explosion(position, PLAYER_EXPLOSION_SCALE);
                }
                self.audio_events
                    .push(AudioEvent::sound(SoundEffect::PlayerExplosion));
                if let Some(id) = player_id {
                    self.presentation_events.push(PresentationEvent::SetVisible {
                        entity: id,
                        visible: false,
                    });
                    self.presentation_events
                        .push(PresentationEvent::SetAlpha { entity: id, alpha: 1.0 });
                }
                self.phase = GamePhase::GameOver;
                self.audio_events.push(AudioEvent::FadeOutMusic {
                    duration_ms: self.config.tuning.player.music_fade_ms,
                });
                self.presentation_events.push(PresentationEvent::GameOver {
                    score: self.score,
                    wave_number: self.wave.wave_number(),
                });
                info!(
                    "Game over at wave {} with score {}",
                    self.wave.wave_number(),
                    self.score
                );
            }
        }
    }

    fn push_health(&mut self) {
        self.presentation_events.push(PresentationEvent::HealthChanged {
            health: self.player.health(),
        });
    }

    fn push_hit_sound(&mut self) {
        self.audio_events.push(AudioEvent::Sound {
            effect: SoundEffect::PlayerExplosion,
            volume: 0.5,
            rate: 5.0,
        });
    }

    /// Advance to the next wave once the budget is spent and the field is clear.
    fn check_wave_cleared(&mut self) {
        let active = registry::count::<StandardEnemy>(&self.world);
        if !self.wave.is_cleared(active) {
            return;
        }
        self.wave.complete();
        let wave_number = self.wave.start_next(&self.config.tuning.wave);

        if let Some(timer) = self.banner_timers.remove(&BannerKind::Reinforcements) {
            self.clock.cancel(timer);
            self.presentation_events.push(PresentationEvent::HideBanner {
                banner: BannerKind::Reinforcements,
            });
        }
        self.show_banner(BannerKind::Wave, format!("Wave {wave_number}"));
        self.clock.after(
            self.config.tuning.wave.heavy_gate_ms,
            None,
            TimerAction::ReleaseHeavyGate,
        );
    }

    /// Show a banner and schedule its removal, replacing any of the same kind.
    fn show_banner(&mut self, banner: BannerKind, text: String) {
        let duration_ms = self.config.tuning.wave.banner_ms;
        if let Some(stale) = self.banner_timers.remove(&banner) {
            self.clock.cancel(stale);
        }
        let timer = self
            .clock
            .after(duration_ms, None, TimerAction::HideBanner(banner));
        self.banner_timers.insert(banner, timer);
        self.presentation_events.push(PresentationEvent::ShowBanner {
            banner,
            text,
            duration_ms,
        });
    }

    /// Queue an explosion, dropping requests the renderer could not place.
    fn push_explosion(&mut self, position: Position, scale: f64) {
        match PresentationEvent::explosion(position.x, position.y, scale) {
            Ok(event) => self.presentation_events.push(event),
            Err(err) => warn!("Dropped explosion request: {err}"),
        }
    }

    fn player_position(&self) -> Option<Position> {
        let ship = self.player_entity?;
        self.world.get::<&Position>(ship).ok().map(|p| *p)
    }

    // ---- Test helpers ----

    /// Plant a standard enemy at a fixed point on a flat path.
    #[cfg(test)]
    pub fn spawn_test_standard(&mut self, x: f64, y: f64) -> EntityId {
        use skyraid_core::components::SineMotion;

        let entity = registry::spawn_standard_enemy(
            &mut self.world,
            &mut self.clock,
            &mut self.rng,
            &self.config.tuning.standard,
        );
        if let Ok((enemy, pos)) = self
            .world
            .query_one_mut::<(&mut StandardEnemy, &mut Position)>(entity)
        {
            enemy.motion = SineMotion {
                start_y: y,
                start_time_ms: 0.0,
                frequency: 0.0,
                amplitude: 0.0,
            };
            *pos = Position::new(x, y);
        }
        registry::entity_id(entity)
    }

    /// Plant a heavy enemy in its entering phase.
    #[cfg(test)]
    pub fn spawn_test_heavy(&mut self, x: f64, y: f64) -> EntityId {
        let entity =
            registry::spawn_heavy_enemy(&mut self.world, &mut self.rng, &self.config.tuning.heavy);
        if let Ok(mut pos) = self.world.get::<&mut Position>(entity) {
            *pos = Position::new(x, y);
        }
        registry::entity_id(entity)
    }

    /// Plant a player bullet (stationary) at a point.
    #[cfg(test)]
    pub fn spawn_test_player_bullet(&mut self, x: f64, y: f64) -> EntityId {
        use skyraid_core::components::PlayerBullet;
        use skyraid_core::types::Velocity;

        let entity = self
            .world
            .spawn((PlayerBullet, Position::new(x, y), Velocity::zero()));
        registry::entity_id(entity)
    }

    /// Plant a stationary enemy bullet at a point.
    #[cfg(test)]
    pub fn spawn_test_enemy_bullet(&mut self, x: f64, y: f64) -> EntityId {
        use skyraid_core::enums::BulletOrigin;
        use skyraid_core::types::Velocity;

        let entity = registry::spawn_enemy_bullet(
            &mut self.world,
            BulletOrigin::Standard,
            Position::new(x, y),
            Velocity::zero(),
        );
        registry::entity_id(entity)
    }

    /// Destroy every enemy and enemy bullet on the field.
    #[cfg(test)]
    pub fn clear_field(&mut self) {
        use skyraid_core::components::{EnemyBullet, HeavyEnemy};

        let doomed: Vec<Entity> = self
            .world
            .iter()
            .filter(|e| {
                e.has::<StandardEnemy>() || e.has::<HeavyEnemy>() || e.has::<EnemyBullet>()
            })
            .map(|e| e.entity())
            .collect();
        for entity in doomed {
            registry::destroy(&mut self.world, &mut self.clock, entity);
        }
    }

    #[cfg(test)]
    pub fn wave_mut(&mut self) -> &mut WaveController {
        &mut self.wave
    }

    #[cfg(test)]
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        registry::resolve_id(&self.world, id)
    }
}
