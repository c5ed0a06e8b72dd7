//! Synthetic images for unit tests: edge circles, noise and full sign frames.

use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_circle_mut;
use rand::Rng;

/// Binary edge image with a one-pixel circle outline.
pub(crate) fn draw_circle_edges(w: u32, h: u32, center: (i32, i32), radius: i32) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    draw_hollow_circle_mut(&mut img, center, radius, Luma([255u8]));
    img
}

/// Set `n` uniformly placed pixels to 255.
pub(crate) fn scatter_noise(img: &mut GrayImage, n: usize, rng: &mut impl Rng) {
    let (w, h) = img.dimensions();
    for _ in 0..n {
        let x = rng.gen_range(0..w);
        let y = rng.gen_range(0..h);
        img.put_pixel(x, y, Luma([255]));
    }
}

/// Binary image of a filled disk.
pub(crate) fn draw_filled_disk(w: u32, h: u32, center: (i32, i32), radius: i32) -> GrayImage {
    let r2 = (radius * radius) as i64;
    GrayImage::from_fn(w, h, |x, y| {
        let dx = x as i64 - center.0 as i64;
        let dy = y as i64 - center.1 as i64;
        Luma([if dx * dx + dy * dy <= r2 { 255 } else { 0 }])
    })
}

/// Gray frame with a speed-sign-like target: a red annulus between
/// `inner_radius` and `outer_radius` around `center`, filled with `fill`.
pub(crate) fn draw_sign_frame(
    w: u32,
    h: u32,
    center: (i32, i32),
    outer_radius: i32,
    inner_radius: i32,
    fill: Rgba<u8>,
) -> RgbaImage {
    let red = Rgba([220u8, 30, 30, 255]);
    let background = Rgba([120u8, 130, 125, 255]);
    RgbaImage::from_fn(w, h, |x, y| {
        let dx = (x as i64 - center.0 as i64) as f64;
        let dy = (y as i64 - center.1 as i64) as f64;
        let d = (dx * dx + dy * dy).sqrt();
        if d <= inner_radius as f64 {
            fill
        } else if d <= outer_radius as f64 {
            red
        } else {
            background
        }
    })
}
