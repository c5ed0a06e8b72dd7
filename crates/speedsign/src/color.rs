//! HSV color segmentation.
//!
//! Hue follows the 8-bit convention of halving degrees, so H is in
//! `[0, 180)` while S and V span `[0, 255]`.

use image::{GrayImage, Luma, Rgba, RgbaImage};

/// Inclusive HSV box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HsvRange {
    pub lo: [u8; 3],
    pub hi: [u8; 3],
}

impl HsvRange {
    pub const fn new(lo: [u8; 3], hi: [u8; 3]) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lo[i] && hsv[i] <= self.hi[i])
    }
}

/// Color ranges used by the pipeline.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Red wraps around hue 0, so it takes two boxes.
    pub red: Vec<HsvRange>,
    pub yellow: HsvRange,
    pub black: HsvRange,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            red: vec![
                HsvRange::new([0, 100, 100], [10, 255, 255]),
                HsvRange::new([170, 100, 100], [179, 255, 255]),
            ],
            yellow: HsvRange::new([15, 60, 80], [35, 255, 255]),
            black: HsvRange::new([0, 0, 0], [180, 255, 100]),
        }
    }
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v > 0.0 { 255.0 * delta / v } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / delta
    } else if v == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    let h = (h * 0.5).round() as u32 % 180;
    [h as u8, s.round() as u8, v as u8]
}

/// Binary mask (0/255) of pixels whose HSV value falls in any of `ranges`.
pub fn hsv_mask(img: &RgbaImage, ranges: &[HsvRange]) -> GrayImage {
    let (w, h) = img.dimensions();
    let mut out = GrayImage::new(w, h);
    for (x, y, &Rgba([r, g, b, _])) in img.enumerate_pixels() {
        let hsv = rgb_to_hsv([r, g, b]);
        if ranges.iter().any(|range| range.contains(hsv)) {
            out.put_pixel(x, y, Luma([255]));
        }
    }
    out
}

pub fn find_red(img: &RgbaImage, config: &ColorConfig) -> GrayImage {
    hsv_mask(img, &config.red)
}

pub fn find_yellow(img: &RgbaImage, config: &ColorConfig) -> GrayImage {
    hsv_mask(img, std::slice::from_ref(&config.yellow))
}

/// Dark gray and black pixels (sign digits).
pub fn find_black(img: &RgbaImage, config: &ColorConfig) -> GrayImage {
    hsv_mask(img, std::slice::from_ref(&config.black))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_colors_to_hsv() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_to_hsv([255, 255, 0]), [30, 255, 255]);
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        assert_eq!(rgb_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_to_hsv([128, 128, 128]), [0, 0, 128]);
    }

    #[test]
    fn magenta_red_wraps_to_high_hue() {
        // Slightly bluish red lands just below 180.
        let [h, s, v] = rgb_to_hsv([220, 20, 40]);
        assert!((170..180).contains(&h), "hue {h}");
        assert!(s > 200);
        assert_eq!(v, 220);
    }

    #[test]
    fn red_mask_selects_both_hue_bands() {
        let cfg = ColorConfig::default();
        let mut img = RgbaImage::from_pixel(4, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, Rgba([230, 30, 10, 255]));
        img.put_pixel(1, 0, Rgba([220, 20, 40, 255]));
        img.put_pixel(2, 0, Rgba([250, 210, 20, 255]));
        let mask = find_red(&img, &cfg);
        assert_eq!(mask.get_pixel(0, 0)[0], 255);
        assert_eq!(mask.get_pixel(1, 0)[0], 255);
        assert_eq!(mask.get_pixel(2, 0)[0], 0);
        assert_eq!(mask.get_pixel(3, 0)[0], 0);
    }

    #[test]
    fn yellow_and_black_masks() {
        let cfg = ColorConfig::default();
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(0, 0, Rgba([250, 210, 20, 255]));
        img.put_pixel(1, 0, Rgba([30, 30, 30, 255]));
        let yellow = find_yellow(&img, &cfg);
        let black = find_black(&img, &cfg);
        assert_eq!(yellow.get_pixel(0, 0)[0], 255);
        assert_eq!(yellow.get_pixel(1, 0)[0], 0);
        assert_eq!(black.get_pixel(1, 0)[0], 255);
        assert_eq!(black.get_pixel(2, 0)[0], 0);
    }
}
