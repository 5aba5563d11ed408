//! Tunable constants for the flocking background.
//!
//! Every field has a default matching the hand-tuned look of the original
//! background, and `#[serde(default)]` lets a JSON document override only the
//! fields it names.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::ConfigError;
use crate::seed::FlockSpawn;
use crate::viewport::Viewport;
use crate::Vector2D;

/// Inclusive `[min, max]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Discrete distribution of per-agent speed multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedMix {
    pub fast_chance: f64,
    pub fast: f64,
    pub slow_chance: f64,
    pub slow: f64,
}

impl Default for SpeedMix {
    fn default() -> Self {
        Self {
            fast_chance: 0.3,
            fast: 1.1,
            slow_chance: 0.2,
            slow: 0.9,
        }
    }
}

impl SpeedMix {
    /// Maps a uniform roll in `[0, 1)` onto a multiplier.
    pub fn pick(&self, roll: f64) -> f64 {
        if roll < self.fast_chance {
            self.fast
        } else if roll < self.fast_chance + self.slow_chance {
            self.slow
        } else {
            1.0
        }
    }
}

/// Where and how agents start inside their flock's seed region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnStyle {
    /// Shared starting heading in radians (0 = rightward).
    pub base_heading: f64,
    pub heading_jitter: f64,
    /// Half-width of the square window agents are scattered in around the center.
    pub position_jitter: f64,
}

impl Default for SpawnStyle {
    fn default() -> Self {
        Self {
            base_heading: 0.0,
            heading_jitter: 0.2,
            position_jitter: 40.0,
        }
    }
}

/// Stroke color band and circle size of newly seeded agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub hue: f64,
    pub hue_jitter: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub lightness_jitter: f64,
    pub alpha: f64,
    pub diameter: f64,
    pub diameter_jitter: f64,
}

impl Default for Appearance {
    fn default() -> Self {
        // orange / coral / yellow
        Self {
            hue: 30.0,
            hue_jitter: 30.0,
            saturation: 85.0,
            lightness: 55.0,
            lightness_jitter: 12.0,
            alpha: 0.8,
            diameter: 20.0,
            diameter_jitter: 5.0,
        }
    }
}

/// One flock: a seed center as fractions of the viewport plus a count scale
/// applied to [`SimConfig::agent_count`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlockDef {
    pub x: f64,
    pub y: f64,
    pub count_scale: f64,
}

impl FlockDef {
    pub fn new(x: f64, y: f64, count_scale: f64) -> Self {
        Self { x, y, count_scale }
    }

    pub fn count(&self, base: usize) -> usize {
        (base as f64 * self.count_scale).round() as usize
    }
}

/// Configuration for the flocking simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub agent_count: usize,
    /// Cruise speed in px/frame before the per-agent multiplier.
    pub base_speed: f64,
    pub max_force: f64,
    pub neighbor_radius: f64,
    pub min_separation: f64,
    pub turn_interval_ms: Span,
    /// Radians per simulated second.
    pub max_turn_rate: f64,
    /// Largest deviation of a freshly rolled target heading.
    pub turn_jitter: f64,
    /// Frames per simulated second assumed by the turn-rate cap.
    pub frame_rate: f64,
    pub pointer_radius: f64,
    pub pointer_weight: f64,
    pub alignment_weight: f64,
    pub cohesion_weight: f64,
    pub separation_weight: f64,
    /// Allowed speed as a multiple of each agent's cruise speed.
    pub speed_band: Span,
    pub speed_mix: SpeedMix,
    pub spawn: SpawnStyle,
    pub appearance: Appearance,
    pub flocks: Vec<FlockDef>,
    /// Skip the animation loop when the host asks for reduced motion.
    pub respect_reduced_motion: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            agent_count: 60,
            base_speed: 1.08,
            max_force: 0.05,
            neighbor_radius: 500.0,
            min_separation: 40.0,
            turn_interval_ms: Span::new(1000.0, 4000.0),
            max_turn_rate: PI / 3.0,
            turn_jitter: PI / 6.0,
            frame_rate: 60.0,
            pointer_radius: 70.0,
            pointer_weight: 3.5,
            alignment_weight: 0.02,
            cohesion_weight: 0.001,
            separation_weight: 0.6,
            speed_band: Span::new(0.7, 1.3),
            speed_mix: SpeedMix::default(),
            spawn: SpawnStyle::default(),
            appearance: Appearance::default(),
            flocks: vec![
                FlockDef::new(0.2, 0.6, 1.0),
                FlockDef::new(0.55, 0.35, 1.2),
                FlockDef::new(0.8, 0.7, 0.6),
            ],
            respect_reduced_motion: true,
        }
    }
}

impl SimConfig {
    /// Parses a (possibly partial) JSON document and validates the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        at_least("base_speed", self.base_speed, 0.0)?;
        at_least("max_force", self.max_force, 0.0)?;
        at_least("neighbor_radius", self.neighbor_radius, 0.0)?;
        at_least("min_separation", self.min_separation, 0.0)?;
        at_least("max_turn_rate", self.max_turn_rate, 0.0)?;
        at_least("turn_jitter", self.turn_jitter, 0.0)?;
        at_least("frame_rate", self.frame_rate, f64::MIN_POSITIVE)?;
        at_least("pointer_radius", self.pointer_radius, 0.0)?;
        at_least("pointer_weight", self.pointer_weight, 0.0)?;
        at_least("alignment_weight", self.alignment_weight, 0.0)?;
        at_least("cohesion_weight", self.cohesion_weight, 0.0)?;
        at_least("separation_weight", self.separation_weight, 0.0)?;

        ordered("turn_interval_ms", self.turn_interval_ms, 0.0)?;
        ordered("speed_band", self.speed_band, 0.0)?;

        let mix = &self.speed_mix;
        fraction("speed_mix.fast_chance", mix.fast_chance)?;
        fraction("speed_mix.slow_chance", mix.slow_chance)?;
        fraction(
            "speed_mix.fast_chance + speed_mix.slow_chance",
            mix.fast_chance + mix.slow_chance,
        )?;
        at_least("speed_mix.fast", mix.fast, 0.0)?;
        at_least("speed_mix.slow", mix.slow, 0.0)?;

        at_least("spawn.heading_jitter", self.spawn.heading_jitter, 0.0)?;
        at_least("spawn.position_jitter", self.spawn.position_jitter, 0.0)?;
        at_least("spawn.base_heading", self.spawn.base_heading, f64::MIN)?;

        let look = &self.appearance;
        at_least("appearance.hue_jitter", look.hue_jitter, 0.0)?;
        at_least("appearance.saturation", look.saturation, 0.0)?;
        at_least("appearance.lightness", look.lightness, 0.0)?;
        at_least("appearance.lightness_jitter", look.lightness_jitter, 0.0)?;
        fraction("appearance.alpha", look.alpha)?;
        at_least("appearance.diameter_jitter", look.diameter_jitter, 0.0)?;
        at_least(
            "appearance.diameter - appearance.diameter_jitter",
            look.diameter - look.diameter_jitter,
            0.0,
        )?;

        for def in &self.flocks {
            fraction("flocks[].x", def.x)?;
            fraction("flocks[].y", def.y)?;
            at_least("flocks[].count_scale", def.count_scale, 0.0)?;
        }

        Ok(())
    }

    /// Seed centers and agent counts for the given viewport, one per flock.
    pub fn spawns(&self, viewport: &Viewport) -> Vec<FlockSpawn> {
        let width = f64::from(viewport.width);
        let height = f64::from(viewport.height);
        self.flocks
            .iter()
            .map(|def| FlockSpawn {
                center: Vector2D::new(width * def.x, height * def.y),
                count: def.count(self.agent_count),
            })
            .collect()
    }

    /// Largest heading change the drift steering may apply in one frame.
    pub fn max_turn_per_frame(&self) -> f64 {
        self.max_turn_rate / self.frame_rate
    }
}

fn at_least(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, min, value })
    }
}

fn ordered(field: &'static str, span: Span, floor: f64) -> Result<(), ConfigError> {
    at_least(field, span.min, floor)?;
    at_least(field, span.max, floor)?;
    if span.min > span.max {
        return Err(ConfigError::InvertedRange {
            field,
            min: span.min,
            max: span.max,
        });
    }
    Ok(())
}

fn fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::NotAFraction { field, value })
    }
}
