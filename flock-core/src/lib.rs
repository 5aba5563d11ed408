//! Flocking simulation used as animated background art.
//!
//! Agents live in independent flocks, steer by alignment, cohesion and
//! separation, drift toward periodically re-rolled headings and scatter away
//! from the pointer. Drawing goes through the [`Surface`] trait and frame
//! pacing through the [`Scheduler`] trait, so the same model runs in a browser
//! canvas, a headless driver or a unit test.

pub mod agent;
pub mod behavior;
pub mod config;
pub mod error;
pub mod render;
pub mod schedule;
pub mod seed;
pub mod sim;
pub mod viewport;

pub use agent::{Agent, Flock, Hsla, Pointer};
pub use config::{FlockDef, SimConfig};
pub use error::ConfigError;
pub use render::{render, DrawCall, RecordingSurface, Surface};
pub use schedule::{Controller, ManualScheduler, Scheduler, StopHandle};
pub use seed::{seed_flocks, FlockSpawn};
pub use sim::Simulation;
pub use viewport::Viewport;

/// A 2D vector used for position, velocity and steering forces
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector pointing along `angle` (radians, 0 = rightward).
    pub fn from_angle(angle: f64) -> Self {
        Self {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn limit(&self, max: f64) -> Self {
        let mag = self.magnitude();
        if mag > max {
            self.normalize() * max
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Direction of the vector in radians, `atan2(y, x)`.
    pub fn heading(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f64> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f64> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_is_euclidean_length() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
    }

    #[test]
    fn normalize_yields_unit_vector() {
        let v = Vector2D::new(3.0, 4.0);
        let normalized = v.normalize();
        assert!((normalized.magnitude() - 1.0).abs() < 1e-12);
        assert_eq!(Vector2D::zero().normalize(), Vector2D::zero());
    }

    #[test]
    fn limit_keeps_direction() {
        let v = Vector2D::new(30.0, 40.0).limit(5.0);
        assert!((v.x - 3.0).abs() < 1e-12);
        assert!((v.y - 4.0).abs() < 1e-12);

        let short = Vector2D::new(0.1, 0.0);
        assert_eq!(short.limit(5.0), short);
    }

    #[test]
    fn arithmetic_operators() {
        let v1 = Vector2D::new(1.0, 2.0);
        let v2 = Vector2D::new(3.0, 4.0);

        let sum = v1 + v2;
        assert_eq!(sum, Vector2D::new(4.0, 6.0));

        let diff = v2 - v1;
        assert_eq!(diff, Vector2D::new(2.0, 2.0));

        let scaled = v1 * 2.0;
        assert_eq!(scaled, Vector2D::new(2.0, 4.0));

        let mut acc = v1;
        acc += v2;
        acc -= v1;
        assert_eq!(acc, v2);
    }

    #[test]
    fn from_angle_and_heading_agree() {
        let v = Vector2D::from_angle(1.0) * 2.5;
        assert!((v.magnitude() - 2.5).abs() < 1e-12);
        assert!((v.heading() - 1.0).abs() < 1e-12);
    }
}
