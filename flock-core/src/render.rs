//! Drawing seam between the simulation and whatever paints it.

use crate::sim::Simulation;
use crate::Vector2D;

/// A 2D drawing target in logical pixels.
pub trait Surface {
    /// Clears the `width` x `height` logical rectangle at the origin.
    fn clear(&mut self, width: f64, height: f64);

    /// Strokes a circle outline with a CSS color string.
    fn stroke_circle(&mut self, center: Vector2D, radius: f64, stroke: &str);
}

/// Clears the surface and outlines every agent. Draws nothing at all when the
/// viewport has no area.
pub fn render<S: Surface + ?Sized>(sim: &Simulation, surface: &mut S) {
    let viewport = sim.viewport();
    if viewport.is_empty() {
        return;
    }

    surface.clear(f64::from(viewport.width), f64::from(viewport.height));
    for agent in sim.agents() {
        surface.stroke_circle(agent.position, agent.radius, &agent.stroke);
    }
}

/// One recorded call on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear {
        width: f64,
        height: f64,
    },
    Circle {
        center: Vector2D,
        radius: f64,
        stroke: String,
    },
}

/// Surface that only remembers what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the most recent clear, the clear included.
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|call| matches!(call, DrawCall::Clear { .. }))
            .unwrap_or(0);
        &self.calls[start..]
    }

    pub fn circle_count(&self) -> usize {
        self.last_frame()
            .iter()
            .filter(|call| matches!(call, DrawCall::Circle { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn stroke_circle(&mut self, center: Vector2D, radius: f64, stroke: &str) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            stroke: stroke.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SimConfig, Viewport};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn render_clears_then_draws_every_agent() {
        let mut rng = StdRng::seed_from_u64(5);
        let viewport = Viewport::new(640, 480, 2.0);
        let sim = Simulation::new(SimConfig::default(), viewport, 0.0, &mut rng).unwrap();
        let mut surface = RecordingSurface::new();
        render(&sim, &mut surface);

        assert_eq!(
            surface.calls[0],
            DrawCall::Clear {
                width: 640.0,
                height: 480.0
            }
        );
        assert_eq!(surface.circle_count(), sim.agent_count());

        let first = sim.agents().next().unwrap();
        assert_eq!(
            surface.calls[1],
            DrawCall::Circle {
                center: first.position,
                radius: first.radius,
                stroke: first.stroke.clone(),
            }
        );
    }

    #[test]
    fn empty_viewport_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let viewport = Viewport::new(640, 0, 1.0);
        let sim = Simulation::new(SimConfig::default(), viewport, 0.0, &mut rng).unwrap();
        let mut surface = RecordingSurface::new();
        render(&sim, &mut surface);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn last_frame_starts_at_latest_clear() {
        let mut surface = RecordingSurface::new();
        surface.clear(1.0, 1.0);
        surface.stroke_circle(Vector2D::zero(), 1.0, "red");
        surface.stroke_circle(Vector2D::zero(), 1.0, "red");
        surface.clear(1.0, 1.0);
        surface.stroke_circle(Vector2D::zero(), 1.0, "blue");
        assert_eq!(surface.last_frame().len(), 2);
        assert_eq!(surface.circle_count(), 1);
    }
}
