use std::fmt;

use crate::Vector2D;

/// Where the pointer is parked while it is outside the viewport, far enough
/// away that no agent is ever inside the repulsion radius.
pub const PARKED_POINTER: f64 = -9999.0;

/// Stroke color in CSS `hsla()` terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    /// Degrees.
    pub hue: f64,
    /// Percent.
    pub saturation: f64,
    /// Percent.
    pub lightness: f64,
    pub alpha: f64,
}

impl Hsla {
    pub fn new(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }

    /// CSS Color 4 space-separated form, e.g. `hsla(30 85% 55% / 0.8)`.
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl Default for Hsla {
    fn default() -> Self {
        Self::new(30.0, 85.0, 55.0, 0.8)
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsla({} {}% {}% / {})",
            self.hue, self.saturation, self.lightness, self.alpha
        )
    }
}

/// A single flock member
#[derive(Debug, Clone)]
pub struct Agent {
    pub position: Vector2D,
    /// Pixels per frame.
    pub velocity: Vector2D,
    /// Radians. Authoritative direction after each step; velocity is
    /// re-derived from it.
    pub heading: f64,
    pub target_heading: f64,
    /// Simulation-clock milliseconds at which a new target heading is rolled.
    pub next_turn_at: f64,
    pub speed_multiplier: f64,
    pub radius: f64,
    pub color: Hsla,
    /// `color` rendered once as a CSS string.
    pub stroke: String,
}

impl Agent {
    /// Agent moving along `velocity`. It keeps its heading until
    /// [`Agent::with_turn_at`] schedules a random turn.
    pub fn new(position: Vector2D, velocity: Vector2D, speed_multiplier: f64) -> Self {
        let heading = velocity.heading();
        let color = Hsla::default();
        Self {
            position,
            velocity,
            heading,
            target_heading: heading,
            next_turn_at: f64::INFINITY,
            speed_multiplier,
            radius: 10.0,
            stroke: color.css(),
            color,
        }
    }

    pub fn with_turn_at(mut self, at_ms: f64) -> Self {
        self.next_turn_at = at_ms;
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_color(mut self, color: Hsla) -> Self {
        self.stroke = color.css();
        self.color = color;
        self
    }

    pub fn cruise_speed(&self, base_speed: f64) -> f64 {
        base_speed * self.speed_multiplier
    }

    pub fn speed(&self) -> f64 {
        self.velocity.magnitude()
    }
}

/// An independently simulated group of agents seeded around one center
#[derive(Debug, Clone, Default)]
pub struct Flock {
    pub center: Vector2D,
    pub agents: Vec<Agent>,
}

impl Flock {
    pub fn new(center: Vector2D, agents: Vec<Agent>) -> Self {
        Self { center, agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Last known pointer position and whether it is over the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub active: bool,
}

impl Pointer {
    pub fn inactive() -> Self {
        Self {
            x: PARKED_POINTER,
            y: PARKED_POINTER,
            active: false,
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
        self.active = true;
    }

    pub fn leave(&mut self) {
        *self = Self::inactive();
    }

    pub fn position(&self) -> Vector2D {
        Vector2D::new(self.x, self.y)
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::inactive()
    }
}
