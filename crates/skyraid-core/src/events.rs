//! Events emitted by the simulation for the presentation and audio collaborators.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::error::EffectError;
use crate::types::EntityId;

/// Requests for the rendering/presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PresentationEvent {
    /// Play an explosion at a playfield position.
    Explosion { x: f64, y: f64, scale: f64 },
    ScoreChanged { score: u64 },
    HealthChanged { health: i32 },
    /// Show a banner that the presentation removes on `HideBanner`.
    ShowBanner {
        banner: BannerKind,
        text: String,
        duration_ms: u64,
    },
    HideBanner { banner: BannerKind },
    SetAlpha { entity: EntityId, alpha: f64 },
    SetVisible { entity: EntityId, visible: bool },
    /// Terminal state; emitted exactly once per run.
    GameOver { score: u64, wave_number: u32 },
}

/// Requests for the audio layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    Sound {
        effect: SoundEffect,
        volume: f64,
        rate: f64,
    },
    /// Start the looping background track.
    PlayMusic { volume: f64 },
    /// Fade the background track to silence, then pause it.
    FadeOutMusic { duration_ms: u64 },
    StopMusic,
}

impl PresentationEvent {
    /// Build an explosion request, rejecting coordinates the renderer cannot place.
    pub fn explosion(x: f64, y: f64, scale: f64) -> Result<Self, EffectError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(EffectError::NonFiniteCoordinate { x, y });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(EffectError::InvalidScale(scale));
        }
        Ok(Self::Explosion { x, y, scale })
    }
}

impl AudioEvent {
    /// A sound effect at default volume and playback rate.
    pub fn sound(effect: SoundEffect) -> Self {
        Self::Sound {
            effect,
            volume: 1.0,
            rate: 1.0,
        }
    }
}
