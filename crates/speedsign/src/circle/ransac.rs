//! RANSAC circle search over a binary edge image.
//!
//! Each trial draws three fresh edge points, constructs the circle through
//! them and scores it by rasterizing its outline and counting the edge
//! pixels it covers. The first candidate whose coverage ratio exceeds the
//! confidence threshold wins; sub-threshold candidates are dropped.

use image::{GenericImageView, GrayImage};
use serde::{Deserialize, Serialize};

use super::sampling::{IndexSource, SamplePool};
use super::solver::construct_circle;
use super::types::{Circle, CircleDetection, CircleRansacConfig, Point};
use crate::edges::find_non_zero;
use crate::roi::{clip_rect, PixelRect};

/// Why a single trial was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialReject {
    /// The three sampled points were collinear.
    Degenerate,
    /// The candidate radius fell outside `[min_radius, max_radius]`.
    RadiusOutOfRange,
    /// The candidate did not cover enough edge pixels.
    LowConfidence,
}

impl TrialReject {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Degenerate => "degenerate",
            Self::RadiusOutOfRange => "radius_out_of_range",
            Self::LowConfidence => "low_confidence",
        }
    }
}

impl std::fmt::Display for TrialReject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a whole search ended without a circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFailure {
    /// Fewer than `3 * min_radius` edge pixels; no trial was run.
    TooFewEdgePoints,
    /// The undrawn point pool ran dry before the budget was spent.
    PoolExhausted,
    /// Every trial in the budget was rejected.
    BudgetExhausted,
}

/// Per-search counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleSearchStats {
    /// Non-zero pixels found in the edge image.
    pub num_edge_points: usize,
    /// Trials started (samples drawn).
    pub trials: usize,
    pub degenerate: usize,
    pub radius_out_of_range: usize,
    pub low_confidence: usize,
}

impl CircleSearchStats {
    fn record(&mut self, reason: TrialReject) {
        match reason {
            TrialReject::Degenerate => self.degenerate += 1,
            TrialReject::RadiusOutOfRange => self.radius_out_of_range += 1,
            TrialReject::LowConfidence => self.low_confidence += 1,
        }
    }
}

/// Outcome of [`search_circle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<CircleDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<SearchFailure>,
    pub stats: CircleSearchStats,
}

/// Find a circle in a binary edge image.
///
/// Convenience wrapper around [`search_circle`] that drops the diagnostics.
pub fn detect_circle(
    edges: &GrayImage,
    config: &CircleRansacConfig,
    rng: &mut (impl IndexSource + ?Sized),
) -> Option<CircleDetection> {
    search_circle(edges, config, rng).detection
}

/// Run the RANSAC circle search and report how it went.
pub fn search_circle(
    edges: &GrayImage,
    config: &CircleRansacConfig,
    rng: &mut (impl IndexSource + ?Sized),
) -> CircleSearch {
    let mut points = find_non_zero(edges);
    let mut stats = CircleSearchStats {
        num_edge_points: points.len(),
        ..CircleSearchStats::default()
    };

    if points.len() < config.min_edge_points() || points.len() < 3 {
        return CircleSearch {
            detection: None,
            failure: Some(SearchFailure::TooFewEdgePoints),
            stats,
        };
    }

    let mut pool = SamplePool::new(&mut points);
    let mut scorer = StrokeScorer::default();

    for trial in 1..=config.trial_budget {
        let sample = match pool.draw(3, rng) {
            Ok(s) => [s[0], s[1], s[2]],
            Err(e) => {
                tracing::trace!("circle search stopped after {} trials: {}", stats.trials, e);
                return CircleSearch {
                    detection: None,
                    failure: Some(SearchFailure::PoolExhausted),
                    stats,
                };
            }
        };
        stats.trials += 1;

        match evaluate_trial(edges, sample, config, &mut scorer) {
            Ok((circle, num_inliers, confidence)) => {
                tracing::debug!(
                    "circle accepted at trial {}: center=({}, {}) r={} conf={:.3}",
                    trial,
                    circle.center.x,
                    circle.center.y,
                    circle.radius,
                    confidence
                );
                return CircleSearch {
                    detection: Some(CircleDetection {
                        circle,
                        confidence,
                        num_inliers,
                        trial,
                    }),
                    failure: None,
                    stats,
                };
            }
            Err(reason) => {
                tracing::trace!("trial {} rejected: {}", trial, reason);
                stats.record(reason);
            }
        }
    }

    CircleSearch {
        detection: None,
        failure: Some(SearchFailure::BudgetExhausted),
        stats,
    }
}

fn evaluate_trial(
    edges: &GrayImage,
    sample: [Point; 3],
    config: &CircleRansacConfig,
    scorer: &mut StrokeScorer,
) -> Result<(Circle, usize, f64), TrialReject> {
    let model =
        construct_circle(sample[0], sample[1], sample[2]).ok_or(TrialReject::Degenerate)?;

    // Huge radii from near-collinear samples saturate here and fail the range check.
    let circle = model.to_circle();
    if !config.radius_in_range(circle.radius) {
        return Err(TrialReject::RadiusOutOfRange);
    }

    let num_inliers = scorer.count_inliers(edges, &circle, config);
    let confidence = num_inliers as f64 / circle.circumference();
    if confidence > config.confidence_threshold {
        Ok((circle, num_inliers, confidence))
    } else {
        Err(TrialReject::LowConfidence)
    }
}

/// Scratch state for inlier scoring, reused across the trials of one search.
#[derive(Default)]
struct StrokeScorer {
    mask: Vec<u8>,
}

impl StrokeScorer {
    /// Count edge pixels covered by the candidate's outline.
    ///
    /// The edge image is cropped to a square of half-extent
    /// `radius + crop_margin` around the center (clipped to the image), the
    /// outline is rasterized into a same-sized mask, and the non-zero pixels
    /// of `mask AND crop` are counted.
    fn count_inliers(
        &mut self,
        edges: &GrayImage,
        circle: &Circle,
        config: &CircleRansacConfig,
    ) -> usize {
        let half = circle.radius as i64 + config.crop_margin as i64;
        let Some(rect) = clip_rect(
            circle.center.x as i64 - half,
            circle.center.y as i64 - half,
            2 * half,
            2 * half,
            edges.dimensions(),
        ) else {
            return 0;
        };

        self.rasterize_stroke(rect, circle, config.stroke_width);

        let crop = image::imageops::crop_imm(edges, rect.x, rect.y, rect.width, rect.height);
        crop.pixels()
            .zip(self.mask.iter())
            .filter(|((_, _, px), m)| (px[0] & **m) != 0)
            .count()
    }

    /// Rasterize the circle outline into `self.mask`, laid out row-major over `rect`.
    ///
    /// A pixel belongs to the stroke when its distance from the center is
    /// within half the stroke width of the radius.
    fn rasterize_stroke(&mut self, rect: PixelRect, circle: &Circle, stroke_width: u32) {
        let w = rect.width as usize;
        let h = rect.height as usize;
        self.mask.clear();
        self.mask.resize(w * h, 0);

        let half_width = stroke_width.max(1) as f64 * 0.5;
        let r = circle.radius as f64;
        // Circle center in crop coordinates.
        let cx = (circle.center.x as i64 - rect.x as i64) as f64;
        let cy = (circle.center.y as i64 - rect.y as i64) as f64;

        for y in 0..h {
            let dy = y as f64 - cy;
            for x in 0..w {
                let dx = x as f64 - cx;
                let d = (dx * dx + dy * dy).sqrt();
                if (d - r).abs() <= half_width {
                    self.mask[y * w + x] = 255;
                }
            }
        }
    }
}
