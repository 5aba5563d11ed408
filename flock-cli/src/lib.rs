use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use flock_core::{Controller, ManualScheduler, SimConfig, Surface, Vector2D, Viewport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Surface that keeps the most recent frame as SVG `<circle>` elements.
#[derive(Debug, Clone, Default)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    body: String,
    circles: usize,
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circle_count(&self) -> usize {
        self.circles
    }

    /// Complete SVG document. The view box is in logical pixels, the
    /// rendered size matches the viewport's backing store.
    pub fn to_svg(&self, viewport: &Viewport) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n{}</svg>\n",
            viewport.backing_width(),
            viewport.backing_height(),
            self.width,
            self.height,
            self.body
        )
    }
}

impl Surface for SvgSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.body.clear();
        self.circles = 0;
    }

    fn stroke_circle(&mut self, center: Vector2D, radius: f64, stroke: &str) {
        // writing into a String cannot fail
        let _ = writeln!(
            self.body,
            "  <circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
            center.x, center.y, radius, stroke
        );
        self.circles += 1;
    }
}

/// Everything a headless run needs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: SimConfig,
    pub viewport: Viewport,
    pub seed: u64,
    pub frames: u64,
    pub pointer: Option<(f64, f64)>,
}

/// Statistics gathered over a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    pub frames: u64,
    pub clock_ms: f64,
    pub flock_sizes: Vec<usize>,
    /// Smallest observed speed as a multiple of the agent's cruise speed.
    pub min_speed_ratio: f64,
    pub max_speed_ratio: f64,
    pub agents_outside: usize,
}

pub struct RunOutput {
    pub summary: RunSummary,
    pub svg: String,
}

/// Runs the simulation on a synthetic clock at the config's frame rate and
/// checks speed and position bounds after every frame.
pub fn run(options: &RunOptions) -> Result<RunOutput> {
    let config = options.config.clone();
    let frame_rate = config.frame_rate;
    let base_speed = config.base_speed;
    let mut controller = Controller::new(
        config,
        options.viewport,
        0.0,
        SvgSurface::new(),
        StdRng::seed_from_u64(options.seed),
    )
    .context("Invalid simulation config")?;
    if let Some((x, y)) = options.pointer {
        controller.sim_mut().pointer_mut().move_to(x, y);
    }

    let mut scheduler = ManualScheduler::new(frame_rate);
    let mut min_ratio = f64::INFINITY;
    let mut max_ratio = 0.0_f64;
    let mut outside = 0;
    let width = f64::from(options.viewport.width);
    let height = f64::from(options.viewport.height);

    controller.start(&mut scheduler);
    let mut frames = 0;
    while frames < options.frames {
        let Some(now) = scheduler.next_tick() else {
            break;
        };
        if !controller.tick(now, &mut scheduler) {
            break;
        }
        frames += 1;

        for agent in controller.sim().agents() {
            let ratio = agent.speed() / agent.cruise_speed(base_speed);
            min_ratio = min_ratio.min(ratio);
            max_ratio = max_ratio.max(ratio);
            let p = agent.position;
            if !(0.0..width).contains(&p.x) || !(0.0..height).contains(&p.y) {
                outside += 1;
            }
        }

        if frames % 60 == 0 {
            log::debug!(
                "frame {frames}: speed ratio [{min_ratio:.3}, {max_ratio:.3}], {outside} out of bounds"
            );
        }
    }

    if frames == 0 {
        min_ratio = 0.0;
    }

    let sim = controller.sim();
    let summary = RunSummary {
        seed: options.seed,
        width: options.viewport.width,
        height: options.viewport.height,
        frames,
        clock_ms: scheduler.now_ms(),
        flock_sizes: sim.flocks().iter().map(|flock| flock.len()).collect(),
        min_speed_ratio: min_ratio,
        max_speed_ratio: max_ratio,
        agents_outside: outside,
    };
    let svg = controller.surface().to_svg(sim.viewport());

    Ok(RunOutput { summary, svg })
}

/// Loads a JSON config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = SimConfig::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(config)
}

/// Parses `X,Y` into a pointer position.
pub fn parse_pointer(value: &str) -> Result<(f64, f64), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{value}'"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("bad x in '{value}'"))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("bad y in '{value}'"))?;
    Ok((x, y))
}
