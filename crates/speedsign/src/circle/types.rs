//! Core circle types, sampling errors and the RANSAC configuration.

use serde::{Deserialize, Serialize};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors raised while drawing a minimal sample from an edge point set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The request was empty or asked for more points than are available.
    InsufficientPoints {
        /// Number of points requested.
        requested: usize,
        /// Number of points that could still be drawn.
        available: usize,
    },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientPoints {
                requested,
                available,
            } => write!(
                f,
                "insufficient points: requested {}, available {}",
                requested, available
            ),
        }
    }
}

impl std::error::Error for SelectionError {}

// ── Types ──────────────────────────────────────────────────────────────────

/// Integer pixel coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel circle as reported to callers.
///
/// `Circle::default()` (center (0,0), radius 0) is the "no result yet" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: u32,
}

impl Circle {
    pub const fn new(center: Point, radius: u32) -> Self {
        Self { center, radius }
    }

    /// Circumference in pixels of the ideal circle with this radius.
    pub fn circumference(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.radius as f64
    }
}

/// Exact circle through three points, before snapping to the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleModel {
    /// Center (x, y) in pixels.
    pub center: [f64; 2],
    /// Radius in pixels.
    pub radius: f64,
}

impl CircleModel {
    /// Euclidean distance from `(x, y)` to the circle outline.
    pub fn distance_to_outline(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center[0];
        let dy = y - self.center[1];
        ((dx * dx + dy * dy).sqrt() - self.radius).abs()
    }

    /// Round center and radius to the nearest pixel.
    pub fn to_circle(&self) -> Circle {
        Circle {
            center: Point::new(
                self.center[0].round() as i32,
                self.center[1].round() as i32,
            ),
            radius: self.radius.round().max(0.0) as u32,
        }
    }
}

/// Configuration for RANSAC circle detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleRansacConfig {
    /// Smallest accepted radius (pixels). Also scales the preflight point count.
    pub min_radius: u32,
    /// Largest accepted radius (pixels).
    pub max_radius: u32,
    /// Maximum number of sample-construct-score trials.
    pub trial_budget: usize,
    /// A candidate is accepted as soon as its confidence exceeds this value.
    pub confidence_threshold: f64,
    /// Width of the rasterized candidate outline used for scoring (pixels).
    pub stroke_width: u32,
    /// Extra margin around the candidate radius when cropping for scoring.
    pub crop_margin: u32,
    /// RNG seed used by [`crate::CircleDetector::detect`].
    pub seed: u64,
}

impl Default for CircleRansacConfig {
    fn default() -> Self {
        Self {
            min_radius: 15,
            max_radius: 100,
            trial_budget: 40,
            confidence_threshold: 0.7,
            stroke_width: 3,
            crop_margin: 2,
            seed: 42,
        }
    }
}

impl CircleRansacConfig {
    /// Minimum number of edge pixels needed before any trial is attempted.
    pub fn min_edge_points(&self) -> usize {
        self.min_radius as usize * 3
    }

    pub fn radius_in_range(&self, radius: u32) -> bool {
        radius >= self.min_radius && radius <= self.max_radius
    }
}

/// An accepted circle together with the score that accepted it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleDetection {
    pub circle: Circle,
    /// Inlier count divided by the circumference. May exceed 1.0.
    pub confidence: f64,
    /// Number of edge pixels on the rasterized outline.
    pub num_inliers: usize,
    /// 1-based index of the trial that produced the circle.
    pub trial: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_rounds_to_pixel_circle() {
        let m = CircleModel {
            center: [10.4, 19.6],
            radius: 24.5,
        };
        let c = m.to_circle();
        assert_eq!(c.center, Point::new(10, 20));
        assert_eq!(c.radius, 25);
    }

    #[test]
    fn default_circle_is_sentinel() {
        let c = Circle::default();
        assert_eq!(c.center, Point::new(0, 0));
        assert_eq!(c.radius, 0);
    }

    #[test]
    fn default_config_matches_tuned_constants() {
        let cfg = CircleRansacConfig::default();
        assert_eq!(cfg.min_edge_points(), 45);
        assert!(cfg.radius_in_range(15));
        assert!(cfg.radius_in_range(100));
        assert!(!cfg.radius_in_range(14));
        assert!(!cfg.radius_in_range(101));
    }

    #[test]
    fn config_json_fills_missing_fields() {
        let cfg: CircleRansacConfig = serde_json::from_str(r#"{"min_radius": 8}"#).unwrap();
        assert_eq!(cfg.min_radius, 8);
        assert_eq!(cfg.max_radius, 100);
        assert_eq!(cfg.trial_budget, 40);
    }

    #[test]
    fn selection_error_display() {
        let e = SelectionError::InsufficientPoints {
            requested: 3,
            available: 2,
        };
        assert_eq!(e.to_string(), "insufficient points: requested 3, available 2");
    }
}
