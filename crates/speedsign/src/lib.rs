//! speedsign: red circular road-sign detection in camera frames.
//!
//! The pipeline stages are:
//!
//! 1. **ROI** – the left and right road-side strips are packed into one image.
//! 2. **Color** – red pixels are selected in HSV space.
//! 3. **Edges** – Canny on the red mask.
//! 4. **Circle** – RANSAC circle search: three-point samples, closed-form
//!    construction, and inlier scoring against the rasterized outline.
//! 5. **Signs** – yellow-content verification, cooldown, and a buffer of the
//!    last three accepted signs drawn onto the frame.
//!
//! # Public API
//! - [`CircleDetector`] for the circle search on a ready edge image
//! - [`SignPipeline`] for whole frames
//! - [`PipelineConfig`] and the per-stage configs for tuning

pub mod circle;
pub mod color;
mod config;
pub mod cooldown;
mod detector;
pub mod edges;
mod pipeline;
pub mod roi;
pub mod signs;

#[cfg(test)]
pub(crate) mod test_utils;

pub use circle::{
    construct_circle, detect_circle, search_circle, select_samples, Circle, CircleDetection,
    CircleModel, CircleRansacConfig, CircleSearch, CircleSearchStats, IndexSource, Point,
    SamplePool, SearchFailure, SelectionError, TrialReject,
};
pub use color::{ColorConfig, HsvRange};
pub use config::PipelineConfig;
pub use cooldown::Cooldown;
pub use detector::CircleDetector;
pub use edges::EdgeConfig;
pub use pipeline::{FrameReport, SignDecision, SignPipeline};
pub use roi::{PixelRect, RoadsideRoi, RoiConfig, RoiError};
pub use signs::{RecentSigns, SignConfig};
