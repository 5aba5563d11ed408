use std::f64::consts::PI;

use rand::Rng;

use crate::agent::{Agent, Flock, Pointer};
use crate::behavior;
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::seed::{jitter, seed_flocks, turn_delay};
use crate::viewport::Viewport;
use crate::Vector2D;

/// Normalizes an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped <= -PI {
        wrapped + 2.0 * PI
    } else {
        wrapped
    }
}

/// Wraps a coordinate into `[0, extent)`.
pub fn wrap_coordinate(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// The whole simulation state: config, viewport, flocks and pointer
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    viewport: Viewport,
    flocks: Vec<Flock>,
    pointer: Pointer,
    frame: u64,
}

impl Simulation {
    /// Validates `config` and seeds its flocks for `viewport`.
    pub fn new<R: Rng + ?Sized>(
        config: SimConfig,
        viewport: Viewport,
        now_ms: f64,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let flocks = seed_flocks(&config, &viewport, now_ms, rng);
        Ok(Self {
            config,
            viewport,
            flocks,
            pointer: Pointer::inactive(),
            frame: 0,
        })
    }

    /// Simulation over hand-built flocks, for tests and custom scenes.
    pub fn from_flocks(config: SimConfig, viewport: Viewport, flocks: Vec<Flock>) -> Self {
        Self {
            config,
            viewport,
            flocks,
            pointer: Pointer::inactive(),
            frame: 0,
        }
    }

    /// Adopts a new viewport and throws every flock away for a fresh seeding.
    pub fn resize<R: Rng + ?Sized>(&mut self, viewport: Viewport, now_ms: f64, rng: &mut R) {
        log::debug!(
            "resize {}x{} -> {}x{} @{}x",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height,
            viewport.device_pixel_ratio
        );
        self.viewport = viewport;
        self.reseed(now_ms, rng);
    }

    pub fn reseed<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        self.flocks = seed_flocks(&self.config, &self.viewport, now_ms, rng);
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn flocks(&self) -> &[Flock] {
        &self.flocks
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut Pointer {
        &mut self.pointer
    }

    pub fn agent_count(&self) -> usize {
        self.flocks.iter().map(Flock::len).sum()
    }

    /// Number of steps taken since construction.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.flocks.iter().flat_map(|flock| flock.agents.iter())
    }

    /// Advances every agent by one frame. `now_ms` is the simulation clock used
    /// to schedule random turns.
    ///
    /// Agents are updated in place, in order: agent `i` has already moved when
    /// agent `i + 1` scans its neighbors. An empty viewport leaves the state
    /// untouched.
    pub fn step<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        if self.viewport.is_empty() {
            return;
        }

        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);

        let config = &self.config;
        let pointer = &self.pointer;

        for flock in self.flocks.iter_mut() {
            for i in 0..flock.len() {
                let force = behavior::steering_force(flock, i, pointer, config);
                let agent = &mut flock.agents[i];
                integrate(agent, force, now_ms, config, rng);
                agent.position.x = wrap_coordinate(agent.position.x, width);
                agent.position.y = wrap_coordinate(agent.position.y, height);
            }
        }

        self.frame += 1;
    }
}

/// Applies a capped steering force to one agent: speed clamp, heading drift,
/// velocity re-derivation and position update. Does not wrap.
pub fn integrate<R: Rng + ?Sized>(
    agent: &mut Agent,
    force: Vector2D,
    now_ms: f64,
    config: &SimConfig,
    rng: &mut R,
) {
    agent.velocity += force;

    let cruise = agent.cruise_speed(config.base_speed);
    let measured = agent.speed();
    let speed = if measured == 0.0 { cruise } else { measured };
    let band = config.speed_band;
    let speed = speed.max(cruise * band.min).min(cruise * band.max);

    agent.heading = agent.velocity.heading();

    if now_ms >= agent.next_turn_at {
        agent.target_heading = agent.heading + jitter(rng, config.turn_jitter);
        agent.next_turn_at = now_ms + turn_delay(rng, config);
    }

    let max_step = config.max_turn_per_frame();
    let diff = wrap_angle(agent.target_heading - agent.heading);
    agent.heading += diff.max(-max_step).min(max_step);

    agent.velocity = Vector2D::from_angle(agent.heading) * speed;
    agent.position += agent.velocity;
}
