//! Deterministic software rasterizer for strokes.
//!
//! Each polyline segment is filled as a capsule (a rectangle with a
//! half-disc on each end): a pixel is painted when its center lies within
//! `width / 2` of the segment. Consecutive capsules overlap at shared
//! points, which gives round caps and round joins with no extra work.
//! There is no antialiasing, so the output is a pure function of the
//! stroke list.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::{CanvasError, CanvasSize, Color, Point, Stroke, LOGICAL_SIZE};

/// Largest raster side, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

/// Prefix of every drawing artifact.
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// An RGBA pixel buffer that strokes are painted onto.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    image: RgbaImage,
    /// Logical → pixel scale factors.
    scale_x: f32,
    scale_y: f32,
}

impl Raster {
    /// Creates a raster of `size` filled with `background`.
    ///
    /// Each side must be between 1 and [`MAX_DIMENSION`] pixels.
    pub fn new(size: CanvasSize, background: Color) -> Result<Self, CanvasError> {
        let CanvasSize { width, height } = size;
        if !(1..=MAX_DIMENSION).contains(&width) || !(1..=MAX_DIMENSION).contains(&height) {
            return Err(CanvasError::InvalidSize { width, height });
        }
        let image = RgbaImage::from_pixel(width, height, Rgba(background.to_rgba()));
        Ok(Self {
            image,
            scale_x: width as f32 / LOGICAL_SIZE.width as f32,
            scale_y: height as f32 / LOGICAL_SIZE.height as f32,
        })
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize::new(self.image.width(), self.image.height())
    }

    /// Repaints every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        let px = Rgba(color.to_rgba());
        for pixel in self.image.pixels_mut() {
            *pixel = px;
        }
    }

    /// Returns the color at pixel `(x, y)`, or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.image
            .get_pixel_checked(x, y)
            .map(|p| Color::rgb(p.0[0], p.0[1], p.0[2]))
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Paints one stroke as a connected polyline.
    ///
    /// Strokes with fewer than two points paint nothing.
    pub fn draw_stroke(&mut self, stroke: &Stroke) {
        if stroke.points.len() < 2 {
            return;
        }
        let radius = stroke.width / 2.0 * (self.scale_x + self.scale_y) / 2.0;
        let color = Rgba(stroke.color.to_rgba());
        for pair in stroke.points.windows(2) {
            let a = self.to_pixel_space(pair[0]);
            let b = self.to_pixel_space(pair[1]);
            self.fill_capsule(a, b, radius, color);
        }
    }

    /// Encodes the raster as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>, CanvasError> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(png)
    }

    /// Encodes the raster as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> Result<String, CanvasError> {
        let png = self.to_png()?;
        Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(png)))
    }

    fn to_pixel_space(&self, p: Point) -> (f32, f32) {
        (p.x * self.scale_x, p.y * self.scale_y)
    }

    fn fill_capsule(&mut self, a: (f32, f32), b: (f32, f32), radius: f32, color: Rgba<u8>) {
        let (w, h) = (self.image.width(), self.image.height());
        if w == 0 || h == 0 {
            return;
        }
        let min_x = (a.0.min(b.0) - radius).floor().max(0.0) as u32;
        let min_y = (a.1.min(b.1) - radius).floor().max(0.0) as u32;
        let max_x = ((a.0.max(b.0) + radius).ceil().max(0.0) as u32).min(w - 1);
        let max_y = ((a.1.max(b.1) + radius).ceil().max(0.0) as u32).min(h - 1);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let r2 = radius * radius;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = (x as f32 + 0.5, y as f32 + 0.5);
                if distance_sq_to_segment(center, a, b) <= r2 {
                    self.image.put_pixel(x, y, color);
                }
            }
        }
    }
}

/// Squared distance from `p` to the segment `a`–`b`.
fn distance_sq_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    (p.0 - cx) * (p.0 - cx) + (p.1 - cy) * (p.1 - cy)
}
