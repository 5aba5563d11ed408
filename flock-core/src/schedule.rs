//! Frame pacing and the controller that ties simulation, surface and
//! randomness together.

use std::cell::Cell;
use std::rc::Rc;

use rand::Rng;

use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::render::{render, Surface};
use crate::sim::Simulation;
use crate::viewport::Viewport;

/// Something that can call back once more, e.g. `requestAnimationFrame`.
pub trait Scheduler {
    fn request_tick(&mut self);
}

/// Synthetic clock for tests and headless runs. Each requested tick fires one
/// frame interval after the previous one.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    now_ms: f64,
    frame_ms: f64,
    pending: bool,
    requests: u64,
}

impl ManualScheduler {
    pub fn new(frame_rate: f64) -> Self {
        Self {
            now_ms: 0.0,
            frame_ms: 1000.0 / frame_rate,
            pending: false,
            requests: 0,
        }
    }

    /// Fires the pending tick, if any, and returns its timestamp.
    pub fn next_tick(&mut self) -> Option<f64> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        self.now_ms += self.frame_ms;
        Some(self.now_ms)
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total number of ticks ever requested.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl Scheduler for ManualScheduler {
    fn request_tick(&mut self) {
        self.pending = true;
        self.requests += 1;
    }
}

/// Shared flag that ends a frame loop before its next frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

/// Owns one simulation together with its surface and random source.
pub struct Controller<S, R> {
    sim: Simulation,
    surface: S,
    rng: R,
    stop: StopHandle,
}

impl<S: Surface, R: Rng> Controller<S, R> {
    /// Seeds a fresh simulation. Fails when `config` does not validate.
    pub fn new(
        config: SimConfig,
        viewport: Viewport,
        now_ms: f64,
        surface: S,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        let sim = Simulation::new(config, viewport, now_ms, &mut rng)?;
        Ok(Self::with_simulation(sim, surface, rng))
    }

    pub fn with_simulation(sim: Simulation, surface: S, rng: R) -> Self {
        Self {
            sim,
            surface,
            rng,
            stop: StopHandle::new(),
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    /// Requests the first frame unless the loop was already stopped.
    pub fn start<Sch: Scheduler + ?Sized>(&mut self, scheduler: &mut Sch) {
        if !self.stop.is_stopped() {
            scheduler.request_tick();
        }
    }

    /// One frame: step, draw, ask for the next frame. Returns `false` and
    /// schedules nothing once stopped.
    pub fn tick<Sch: Scheduler + ?Sized>(&mut self, now_ms: f64, scheduler: &mut Sch) -> bool {
        if self.stop.is_stopped() {
            return false;
        }
        self.sim.step(now_ms, &mut self.rng);
        render(&self.sim, &mut self.surface);
        scheduler.request_tick();
        true
    }

    /// Reseeds for the new viewport and draws the fresh flocks once.
    pub fn resize(&mut self, viewport: Viewport, now_ms: f64) {
        self.sim.resize(viewport, now_ms, &mut self.rng);
        self.draw();
    }

    /// Draws the current state without stepping.
    pub fn draw(&mut self) {
        render(&self.sim, &mut self.surface);
    }

    /// Drives up to `frames` ticks off a manual clock and returns how many ran.
    pub fn run_for(&mut self, frames: u64, scheduler: &mut ManualScheduler) -> u64 {
        let mut ran = 0;
        if !scheduler.is_pending() {
            self.start(scheduler);
        }
        while ran < frames {
            let Some(now) = scheduler.next_tick() else {
                break;
            };
            if !self.tick(now, scheduler) {
                break;
            }
            ran += 1;
        }
        ran
    }
}
