//! High-level circle detection API.
//!
//! [`CircleDetector`] is the entry point for callers that already have a
//! binary edge image and only need the RANSAC circle search.

use image::GrayImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::circle::{
    detect_circle, search_circle, CircleDetection, CircleRansacConfig, CircleSearch, IndexSource,
};

/// Primary circle detection interface.
///
/// Create once, detect on many images. Every call to [`detect`](Self::detect)
/// reseeds from `config.seed`, so the same image always gives the same answer.
///
/// # Examples
///
/// ```no_run
/// use image::GrayImage;
/// use speedsign::CircleDetector;
///
/// let detector = CircleDetector::default();
/// let edges = GrayImage::new(320, 240);
/// if let Some(det) = detector.detect(&edges) {
///     println!("circle at ({}, {}) r={}", det.circle.center.x, det.circle.center.y, det.circle.radius);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CircleDetector {
    config: CircleRansacConfig,
}

impl CircleDetector {
    /// Create with full config control.
    pub fn with_config(config: CircleRansacConfig) -> Self {
        Self { config }
    }

    /// Access the current configuration.
    pub fn config(&self) -> &CircleRansacConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut CircleRansacConfig {
        &mut self.config
    }

    /// Detect a circle with the configured seed.
    pub fn detect(&self, edges: &GrayImage) -> Option<CircleDetection> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        detect_circle(edges, &self.config, &mut rng)
    }

    /// Detect a circle drawing randomness from a caller-owned source.
    pub fn detect_with_rng(
        &self,
        edges: &GrayImage,
        rng: &mut (impl IndexSource + ?Sized),
    ) -> Option<CircleDetection> {
        detect_circle(edges, &self.config, rng)
    }

    /// Detect with search diagnostics (trial counts and rejection reasons).
    pub fn search(&self, edges: &GrayImage) -> CircleSearch {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        search_circle(edges, &self.config, &mut rng)
    }
}
