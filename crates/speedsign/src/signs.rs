//! Sign verification and the buffer of recently accepted signs.

use image::imageops::FilterType;
use image::{GenericImageView, Rgba, RgbaImage};

use crate::color::{find_yellow, ColorConfig};

/// Tuning for sign verification and display.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SignConfig {
    /// A sign must be at least this fraction yellow to be accepted.
    pub min_yellow_fraction: f64,
    /// Square side of each display slot, newest first.
    pub slot_sizes: [u32; 3],
    /// Smallest frame (width, height) the slots are drawn onto.
    pub min_display_frame: [u32; 2],
    /// Gap between the newest slot and the frame corner.
    pub display_margin: u32,
}

impl Default for SignConfig {
    fn default() -> Self {
        Self {
            min_yellow_fraction: 0.3,
            slot_sizes: [400, 200, 100],
            min_display_frame: [1280, 720],
            display_margin: 5,
        }
    }
}

/// Fraction of pixels in `crop` that are yellow.
pub fn yellow_fraction<I>(crop: &I, colors: &ColorConfig) -> f64
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (w, h) = crop.dimensions();
    if w == 0 || h == 0 {
        return 0.0;
    }
    let owned = to_rgba_image(crop);
    let mask = find_yellow(&owned, colors);
    let yellow = mask.pixels().filter(|p| p[0] != 0).count();
    yellow as f64 / (w as f64 * h as f64)
}

/// Whether a circular red candidate is unlikely to be a speed sign.
///
/// Speed-limit signs carry a yellow field inside the red ring; candidates
/// with too little yellow are rejected.
pub fn is_false_positive<I>(crop: &I, colors: &ColorConfig, config: &SignConfig) -> bool
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    yellow_fraction(crop, colors) < config.min_yellow_fraction
}

fn to_rgba_image<I>(view: &I) -> RgbaImage
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (w, h) = view.dimensions();
    RgbaImage::from_fn(w, h, |x, y| view.get_pixel(x, y))
}

/// The last three accepted signs, newest first, each at its display size.
#[derive(Debug, Clone)]
pub struct RecentSigns {
    slots: [RgbaImage; 3],
    config: SignConfig,
}

impl RecentSigns {
    /// Empty (black) slots.
    pub fn new(config: SignConfig) -> Self {
        let [a, b, c] = config.slot_sizes;
        let black = Rgba([0, 0, 0, 255]);
        Self {
            slots: [
                RgbaImage::from_pixel(a, a, black),
                RgbaImage::from_pixel(b, b, black),
                RgbaImage::from_pixel(c, c, black),
            ],
            config,
        }
    }

    pub fn slots(&self) -> &[RgbaImage; 3] {
        &self.slots
    }

    /// Store a new sign, shifting older ones down and shrinking them.
    pub fn push<I>(&mut self, sign: &I)
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let [s0, s1, s2] = self.config.slot_sizes;
        self.slots[2] = image::imageops::resize(&self.slots[1], s2, s2, FilterType::Triangle);
        self.slots[1] = image::imageops::resize(&self.slots[0], s1, s1, FilterType::Triangle);
        self.slots[0] = image::imageops::resize(sign, s0, s0, FilterType::Triangle);
    }

    /// Draw the slots as discs in the bottom-right corner of `frame`.
    ///
    /// Frames smaller than `min_display_frame` are left untouched. Returns
    /// whether anything was drawn.
    pub fn draw_onto(&self, frame: &mut RgbaImage) -> bool {
        let (w, h) = frame.dimensions();
        let [min_w, min_h] = self.config.min_display_frame;
        let [s0, s1, s2] = self.config.slot_sizes.map(i64::from);
        if w < min_w || h < min_h {
            return false;
        }
        let margin = self.config.display_margin as i64;
        let px = w as i64 - s0 - margin;
        let py = h as i64 - s0 - margin;

        let origins = [
            (px, py),
            (px - s1, py + s1 / 2),
            (px - s1 - s2, py + s1 / 2 + s2 / 2),
        ];
        for (slot, (ox, oy)) in self.slots.iter().zip(origins) {
            blit_disc(frame, slot, ox, oy);
        }
        true
    }
}

/// Copy the inscribed disc of `src` into `dst` with its top-left at `(ox, oy)`.
fn blit_disc(dst: &mut RgbaImage, src: &RgbaImage, ox: i64, oy: i64) {
    let (sw, sh) = src.dimensions();
    let (dw, dh) = dst.dimensions();
    let r = sw.min(sh) as f64 * 0.5;
    let (cx, cy) = ((sw / 2) as f64, (sh / 2) as f64);
    for (x, y, px) in src.enumerate_pixels() {
        let dx = x as f64 - cx;
        let dy = y as f64 - cy;
        if dx * dx + dy * dy > r * r {
            continue;
        }
        let tx = ox + x as i64;
        let ty = oy + y as i64;
        if tx < 0 || ty < 0 || tx >= dw as i64 || ty >= dh as i64 {
            continue;
        }
        dst.put_pixel(tx as u32, ty as u32, *px);
    }
}
