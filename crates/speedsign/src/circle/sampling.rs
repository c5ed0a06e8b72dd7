//! Minimal-sample selection for RANSAC trials.

use super::types::SelectionError;

/// Source of uniformly distributed indices.
///
/// Implemented for every [`rand::Rng`], so a seeded `StdRng` gives
/// reproducible detections.
pub trait IndexSource {
    /// Uniform index in `[low, high)`. Callers guarantee `low < high`.
    fn next_index(&mut self, low: usize, high: usize) -> usize;
}

impl<R: rand::Rng> IndexSource for R {
    fn next_index(&mut self, low: usize, high: usize) -> usize {
        self.gen_range(low..high)
    }
}

/// Move `n` distinct, uniformly chosen elements of `points` to its front.
///
/// Fisher–Yates partial shuffle: slot `i` receives an element drawn from the
/// still-unselected range `i..len`, and the displaced element takes its place.
/// The contents of `points` are only permuted. On error `points` is untouched.
pub fn select_samples<T>(
    points: &mut [T],
    n: usize,
    rng: &mut (impl IndexSource + ?Sized),
) -> Result<(), SelectionError> {
    let len = points.len();
    if n == 0 || n > len {
        return Err(SelectionError::InsufficientPoints {
            requested: n,
            available: len,
        });
    }
    for i in 0..n {
        let j = rng.next_index(i, len);
        points.swap(i, j);
    }
    Ok(())
}

/// Sampling without replacement across the trials of one detection.
///
/// Points before the `drawn` boundary have already been handed out; every
/// draw picks from the remainder and advances the boundary, so a point is
/// never used by two trials.
pub struct SamplePool<'a, T> {
    points: &'a mut [T],
    drawn: usize,
}

impl<'a, T> SamplePool<'a, T> {
    pub fn new(points: &'a mut [T]) -> Self {
        Self { points, drawn: 0 }
    }

    /// Number of points that have not been drawn yet.
    pub fn remaining(&self) -> usize {
        self.points.len() - self.drawn
    }

    /// Draw `n` fresh points.
    pub fn draw(
        &mut self,
        n: usize,
        rng: &mut (impl IndexSource + ?Sized),
    ) -> Result<&[T], SelectionError> {
        let start = self.drawn;
        select_samples(&mut self.points[start..], n, rng)?;
        self.drawn += n;
        Ok(&self.points[start..start + n])
    }
}
