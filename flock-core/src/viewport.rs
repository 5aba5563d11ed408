//! Logical viewport size and device pixel ratio.

/// Logical (CSS pixel) size of the drawing area plus the device pixel ratio
/// used for the canvas backing store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: sanitize_ratio(Some(device_pixel_ratio)),
        }
    }

    /// Builds a viewport from raw host measurements.
    ///
    /// Sizes are floored to whole pixels (negative or NaN sizes become 0) and
    /// a missing or bogus pixel ratio falls back to 1. Ratios below 1 are
    /// raised to 1.
    pub fn measure(inner_width: f64, inner_height: f64, device_pixel_ratio: Option<f64>) -> Self {
        Self {
            width: floor_px(inner_width),
            height: floor_px(inner_height),
            device_pixel_ratio: sanitize_ratio(device_pixel_ratio),
        }
    }

    pub fn backing_width(&self) -> u32 {
        floor_px(f64::from(self.width) * self.device_pixel_ratio)
    }

    pub fn backing_height(&self) -> u32 {
        floor_px(f64::from(self.height) * self.device_pixel_ratio)
    }

    /// Canvas transform `[a, b, c, d, e, f]` that keeps drawing coordinates in
    /// logical pixels.
    pub fn transform(&self) -> [f64; 6] {
        let r = self.device_pixel_ratio;
        [r, 0.0, 0.0, r, 0.0, 0.0]
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

fn sanitize_ratio(ratio: Option<f64>) -> f64 {
    match ratio {
        Some(r) if r.is_finite() => r.max(1.0),
        _ => 1.0,
    }
}

fn floor_px(value: f64) -> u32 {
    // `as` saturates: NaN and negatives land on 0
    value.floor() as u32
}
