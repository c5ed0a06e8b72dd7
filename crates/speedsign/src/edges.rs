//! Edge extraction from binary threshold images.

use image::GrayImage;

use crate::circle::Point;

/// Canny hysteresis thresholds.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            low_threshold: 80.0,
            high_threshold: 100.0,
        }
    }
}

/// Run Canny on a binary (0/255) mask. The result is again 0/255.
pub fn detect_edges(mask: &GrayImage, config: &EdgeConfig) -> GrayImage {
    imageproc::edges::canny(mask, config.low_threshold, config.high_threshold)
}

/// Coordinates of every non-zero pixel, in row-major order.
pub fn find_non_zero(img: &GrayImage) -> Vec<Point> {
    img.enumerate_pixels()
        .filter(|(_, _, px)| px[0] != 0)
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn non_zero_points_in_row_major_order() {
        let mut img = GrayImage::new(5, 4);
        img.put_pixel(3, 0, Luma([1]));
        img.put_pixel(0, 2, Luma([255]));
        img.put_pixel(4, 2, Luma([9]));
        assert_eq!(
            find_non_zero(&img),
            vec![Point::new(3, 0), Point::new(0, 2), Point::new(4, 2)]
        );
    }

    #[test]
    fn empty_image_has_no_points() {
        assert!(find_non_zero(&GrayImage::new(8, 8)).is_empty());
    }

    #[test]
    fn filled_disk_yields_ring_edge() {
        let img = crate::test_utils::draw_filled_disk(120, 120, (60, 60), 30);
        let edges = detect_edges(&img, &EdgeConfig::default());
        let pts = find_non_zero(&edges);
        assert!(!pts.is_empty());
        for p in &pts {
            let d = (((p.x - 60).pow(2) + (p.y - 60).pow(2)) as f64).sqrt();
            assert!((d - 30.0).abs() <= 2.5, "edge pixel {p:?} at distance {d:.2}");
        }
        // Interior and background stay empty.
        assert_eq!(edges.get_pixel(60, 60)[0], 0);
        assert_eq!(edges.get_pixel(2, 2)[0], 0);
    }
}
