//! Per-frame sign detection: ROI strips → red mask → edges → circle search →
//! verification → overlays.

use std::time::Instant;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::circle::{search_circle, CircleDetection, CircleSearchStats};
use crate::color::find_red;
use crate::config::PipelineConfig;
use crate::cooldown::Cooldown;
use crate::edges::detect_edges;
use crate::roi::{safe_crop, PixelRect, RoadsideRoi};
use crate::signs::{is_false_positive, RecentSigns};

const CIRCLE_COLOR: Rgba<u8> = Rgba([0, 255, 255, 255]);
const CIRCLE_THICKNESS: i32 = 4;
const ROI_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);
const ROI_THICKNESS: u32 = 2;

/// What happened to a detected circle after verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignDecision {
    /// Stored in the recent-signs buffer.
    Accepted,
    /// Rejected by the color heuristic.
    FalsePositive,
    /// Plausible, but another sign was accepted too recently.
    CoolingDown,
    /// The sign's bounding box does not intersect the frame.
    OutsideFrame,
}

/// Summary of one processed frame.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FrameReport {
    /// Strip geometry, absent when the frame was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi: Option<RoadsideRoi>,
    /// Reason the frame was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
    /// Detected circle in frame coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circle: Option<CircleDetection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<SignDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<CircleSearchStats>,
    /// Wall time spent in `process_frame`.
    pub elapsed_ms: f64,
}

impl FrameReport {
    fn skipped(reason: String, started: Instant) -> Self {
        Self {
            roi: None,
            skipped: Some(reason),
            circle: None,
            decision: None,
            search: None,
            elapsed_ms: started.elapsed().as_secs_f64() * 1e3,
        }
    }
}

/// Frame-to-frame state of the sign detector.
///
/// The circle search itself is stateless; this struct carries everything
/// that does persist between frames: the random stream, the buffer of
/// recently accepted signs and the cooldown.
pub struct SignPipeline {
    config: PipelineConfig,
    rng: StdRng,
    recent: RecentSigns,
    cooldown: Cooldown,
}

impl SignPipeline {
    /// Seeds the random stream from `config.circle.seed`.
    pub fn new(config: PipelineConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.circle.seed);
        let recent = RecentSigns::new(config.signs.clone());
        let cooldown = Cooldown::new(config.cooldown());
        Self {
            config,
            rng,
            recent,
            cooldown,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn recent_signs(&self) -> &RecentSigns {
        &self.recent
    }

    /// Detect a sign in `frame` and draw the results onto it.
    ///
    /// `now` drives the cooldown; pass the capture time of the frame.
    pub fn process_frame(&mut self, frame: &mut RgbaImage, now: Instant) -> FrameReport {
        let started = Instant::now();
        let (w, h) = frame.dimensions();

        let roi = match RoadsideRoi::for_frame(w, h, &self.config.roi) {
            Ok(roi) => roi,
            Err(e) => {
                tracing::warn!("skipping {}x{} frame: {}", w, h, e);
                return FrameReport::skipped(e.to_string(), started);
            }
        };

        let strip = roi.extract(frame);
        let red = find_red(&strip, &self.config.color);
        let edges = detect_edges(&red, &self.config.edges);
        let search = search_circle(&edges, &self.config.circle, &mut self.rng);

        let mut circle = search.detection;
        let mut decision = None;
        if let Some(det) = circle.as_mut() {
            det.circle.center = roi.to_frame(det.circle.center);
            decision = Some(self.verify(frame, det, now));
            draw_circle_stroke(frame, det);
        }

        draw_roi(frame, roi.left());
        draw_roi(frame, roi.right());
        self.recent.draw_onto(frame);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;
        tracing::debug!("frame processed in {:.2} ms", elapsed_ms);

        FrameReport {
            roi: Some(roi),
            skipped: None,
            circle,
            decision,
            search: Some(search.stats),
            elapsed_ms,
        }
    }

    fn verify(&mut self, frame: &RgbaImage, det: &CircleDetection, now: Instant) -> SignDecision {
        let c = det.circle;
        let r = c.radius as i64;
        let Some(crop) = safe_crop(
            frame,
            c.center.x as i64 - r,
            c.center.y as i64 - r,
            2 * r,
            2 * r,
        ) else {
            return SignDecision::OutsideFrame;
        };

        if is_false_positive(&*crop, &self.config.color, &self.config.signs) {
            tracing::debug!(
                "circle at ({}, {}) rejected as false positive",
                c.center.x,
                c.center.y
            );
            return SignDecision::FalsePositive;
        }
        if !self.cooldown.is_elapsed(now) {
            return SignDecision::CoolingDown;
        }

        self.recent.push(&*crop);
        self.cooldown.start(now);
        tracing::info!(
            "sign accepted at ({}, {}) r={}",
            c.center.x,
            c.center.y,
            c.radius
        );
        SignDecision::Accepted
    }
}

fn draw_circle_stroke(frame: &mut RgbaImage, det: &CircleDetection) {
    let c = det.circle;
    let r = c.radius as i32;
    for k in 0..CIRCLE_THICKNESS {
        let radius = r - CIRCLE_THICKNESS / 2 + k;
        if radius > 0 {
            draw_hollow_circle_mut(frame, (c.center.x, c.center.y), radius, CIRCLE_COLOR);
        }
    }
}

fn draw_roi(frame: &mut RgbaImage, rect: PixelRect) {
    for k in 0..ROI_THICKNESS {
        if rect.width <= 2 * k || rect.height <= 2 * k {
            break;
        }
        let r = Rect::at((rect.x + k) as i32, (rect.y + k) as i32)
            .of_size(rect.width - 2 * k, rect.height - 2 * k);
        draw_hollow_rect_mut(frame, r, ROI_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::draw_sign_frame;
    use std::time::Duration;

    const YELLOW: Rgba<u8> = Rgba([250, 210, 20, 255]);
    const WHITE: Rgba<u8> = Rgba([240, 240, 240, 255]);

    // A red ring yields two concentric edge circles; give the search more trials.
    fn test_config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.circle.trial_budget = 120;
        config
    }

    #[test]
    fn sign_in_left_strip_is_accepted() {
        let mut frame = draw_sign_frame(1280, 720, (100, 120), 40, 32, YELLOW);
        let mut pipeline = SignPipeline::new(test_config());
        let report = pipeline.process_frame(&mut frame, Instant::now());

        let det = report.circle.expect("sign should be detected");
        assert!((det.circle.center.x - 100).abs() <= 3, "{det:?}");
        assert!((det.circle.center.y - 120).abs() <= 3, "{det:?}");
        assert!((30..=42).contains(&det.circle.radius), "{det:?}");
        assert_eq!(report.decision, Some(SignDecision::Accepted));
        // Newest slot of the buffer now holds the yellow sign.
        let slot = &pipeline.recent_signs().slots()[0];
        assert_eq!(*slot.get_pixel(200, 200), YELLOW);
    }

    #[test]
    fn second_sign_within_cooldown_is_held_back() {
        let t0 = Instant::now();
        let mut pipeline = SignPipeline::new(test_config());

        let mut frame = draw_sign_frame(1280, 720, (100, 120), 40, 32, YELLOW);
        let first = pipeline.process_frame(&mut frame, t0);
        assert_eq!(first.decision, Some(SignDecision::Accepted));

        let mut frame = draw_sign_frame(1280, 720, (100, 120), 40, 32, YELLOW);
        let second = pipeline.process_frame(&mut frame, t0 + Duration::from_millis(500));
        second.circle.expect("sign should be detected in second frame");
        assert_eq!(second.decision, Some(SignDecision::CoolingDown));

        let mut frame = draw_sign_frame(1280, 720, (100, 120), 40, 32, YELLOW);
        let third = pipeline.process_frame(&mut frame, t0 + Duration::from_secs(3));
        third.circle.expect("sign should be detected in third frame");
        assert_eq!(third.decision, Some(SignDecision::Accepted));
    }

    #[test]
    fn sign_in_right_strip_maps_to_frame_coordinates() {
        let mut frame = draw_sign_frame(1280, 720, (1180, 150), 40, 32, YELLOW);
        let mut pipeline = SignPipeline::new(test_config());
        let report = pipeline.process_frame(&mut frame, Instant::now());
        let det = report.circle.expect("sign should be detected");
        assert!((det.circle.center.x - 1180).abs() <= 3, "{det:?}");
        assert!((det.circle.center.y - 150).abs() <= 3, "{det:?}");
    }

    #[test]
    fn red_ring_without_yellow_is_false_positive() {
        let mut frame = draw_sign_frame(1280, 720, (100, 120), 40, 32, WHITE);
        let mut pipeline = SignPipeline::new(test_config());
        let report = pipeline.process_frame(&mut frame, Instant::now());
        assert!(report.circle.is_some());
        assert_eq!(report.decision, Some(SignDecision::FalsePositive));
        assert_eq!(pipeline.recent_signs().slots()[0].get_pixel(200, 200)[0], 0);
    }

    #[test]
    fn empty_frame_draws_roi_only() {
        let mut frame = RgbaImage::from_pixel(640, 480, WHITE);
        let mut pipeline = SignPipeline::new(test_config());
        let report = pipeline.process_frame(&mut frame, Instant::now());
        assert!(report.circle.is_none());
        assert!(report.decision.is_none());
        let roi = report.roi.expect("roi");
        assert_eq!(*frame.get_pixel(0, 0), ROI_COLOR);
        assert_eq!(*frame.get_pixel(roi.right().x, 0), ROI_COLOR);
        assert_eq!(*frame.get_pixel(320, 400), WHITE);
    }

    #[test]
    fn oversized_roi_skips_frame() {
        let mut config = test_config();
        config.roi.width_pct = 700_000_000;
        let mut pipeline = SignPipeline::new(config);
        let mut frame = RgbaImage::from_pixel(640, 480, WHITE);
        let report = pipeline.process_frame(&mut frame, Instant::now());
        assert!(report.roi.is_none());
        assert_eq!(report.skipped.as_deref(), Some("frame too small for ROI"));
        assert!(frame.pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn zero_roi_skips_frame() {
        let mut config = test_config();
        config.roi.width_pct = 0;
        let mut pipeline = SignPipeline::new(config);
        let mut frame = RgbaImage::from_pixel(64, 64, WHITE);
        let report = pipeline.process_frame(&mut frame, Instant::now());
        assert!(report.roi.is_none());
        assert_eq!(report.skipped.as_deref(), Some("ROI width set to 0"));
        assert!(frame.pixels().all(|p| *p == WHITE));
    }
}
