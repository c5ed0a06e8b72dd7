//! Regions of interest: the two road-side strips and bounds-safe cropping.
//!
//! Signs are searched for on both sides of the road. The left and right
//! strips of the frame are copied side by side into one image so the circle
//! search runs once per frame; detections are then mapped back into frame
//! coordinates.

use image::{GenericImageView, RgbaImage, SubImage};

use crate::circle::Point;

/// Size of each road-side strip, in percent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    /// Strip width as a percentage of half the frame width.
    pub width_pct: u32,
    /// Strip height as a percentage of the frame height.
    pub height_pct: u32,
}

impl Default for RoiConfig {
    fn default() -> Self {
        Self {
            width_pct: 30,
            height_pct: 50,
        }
    }
}

/// Axis-aligned pixel rectangle fully inside some image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Intersect the rectangle `(x, y, w, h)` with an image of size `bounds`.
///
/// Returns `None` when the intersection is empty.
pub fn clip_rect(x: i64, y: i64, w: i64, h: i64, bounds: (u32, u32)) -> Option<PixelRect> {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(bounds.0 as i64);
    let y1 = (y + h).min(bounds.1 as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(PixelRect {
        x: x0 as u32,
        y: y0 as u32,
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
    })
}

/// Crop as much of `(x, y, w, h)` as lies inside `img`.
pub fn safe_crop<I: GenericImageView>(
    img: &I,
    x: i64,
    y: i64,
    w: i64,
    h: i64,
) -> Option<SubImage<&I>> {
    let rect = clip_rect(x, y, w, h, img.dimensions())?;
    Some(image::imageops::crop_imm(
        img,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
    ))
}

/// Geometry of the two road-side strips for one frame size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RoadsideRoi {
    /// Width of one strip.
    pub strip_width: u32,
    /// Height of both strips.
    pub strip_height: u32,
    /// Width of the frame the strips were taken from.
    pub frame_width: u32,
}

/// Why a frame could not be split into strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoiError {
    ZeroWidth,
    ZeroHeight,
    FrameTooSmall,
}

impl std::fmt::Display for RoiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroWidth => f.write_str("ROI width set to 0"),
            Self::ZeroHeight => f.write_str("ROI height set to 0"),
            Self::FrameTooSmall => f.write_str("frame too small for ROI"),
        }
    }
}

impl std::error::Error for RoiError {}

impl RoadsideRoi {
    /// Compute strip geometry for a `frame_width x frame_height` frame.
    pub fn for_frame(
        frame_width: u32,
        frame_height: u32,
        config: &RoiConfig,
    ) -> Result<Self, RoiError> {
        let strip_width = ((frame_width / 2) as f64 * (config.width_pct as f64 / 100.0)) as u32;
        let strip_height = (frame_height as f64 * (config.height_pct as f64 / 100.0)) as u32;
        if strip_width == 0 {
            return Err(RoiError::ZeroWidth);
        }
        if strip_height == 0 {
            return Err(RoiError::ZeroHeight);
        }
        if u64::from(frame_width) < 2 * u64::from(strip_width) || frame_height < strip_height {
            return Err(RoiError::FrameTooSmall);
        }
        Ok(Self {
            strip_width,
            strip_height,
            frame_width,
        })
    }

    /// Left strip rectangle in frame coordinates.
    pub fn left(&self) -> PixelRect {
        PixelRect {
            x: 0,
            y: 0,
            width: self.strip_width,
            height: self.strip_height,
        }
    }

    /// Right strip rectangle in frame coordinates.
    pub fn right(&self) -> PixelRect {
        PixelRect {
            x: self.frame_width - self.strip_width,
            y: 0,
            width: self.strip_width,
            height: self.strip_height,
        }
    }

    /// Copy both strips side by side into a `2 * strip_width` wide image.
    pub fn extract(&self, frame: &RgbaImage) -> RgbaImage {
        let mut strip = RgbaImage::new(2 * self.strip_width, self.strip_height);
        for (dst_x, rect) in [(0, self.left()), (self.strip_width, self.right())] {
            let view = image::imageops::crop_imm(frame, rect.x, rect.y, rect.width, rect.height);
            image::imageops::replace(&mut strip, &*view, dst_x as i64, 0);
        }
        strip
    }

    /// Map a point in strip coordinates back to frame coordinates.
    pub fn to_frame(&self, p: Point) -> Point {
        let w = self.strip_width as i32;
        if p.x >= w {
            Point::new(p.x - w + (self.frame_width as i32 - w), p.y)
        } else {
            p
        }
    }
}
