//! Circle model fitting: minimal sampling, three-point construction and the
//! RANSAC search that ties them together.

mod ransac;
mod sampling;
mod solver;
mod types;

pub use ransac::{
    detect_circle, search_circle, CircleSearch, CircleSearchStats, SearchFailure, TrialReject,
};
pub use sampling::{select_samples, IndexSource, SamplePool};
pub use solver::construct_circle;
pub use types::{Circle, CircleDetection, CircleModel, CircleRansacConfig, Point, SelectionError};
