//! Geometry and brush types: points, colors, strokes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CanvasError;

// ---------------------------------------------------------------------------
// Logical canvas space
// ---------------------------------------------------------------------------

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The fixed coordinate space every stroke is recorded in.
///
/// Artifacts are rendered at this size, whatever the on-screen size of
/// the drawing surface was.
pub const LOGICAL_SIZE: CanvasSize = CanvasSize::new(600, 600);

/// A point in logical canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where the drawing surface currently sits in view/device coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Maps a pointer position in view space into logical canvas space.
    ///
    /// A degenerate (zero-sized) rect maps everything to the origin.
    pub fn to_logical(&self, view_x: f32, view_y: f32) -> Point {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Point::new(0.0, 0.0);
        }
        Point {
            x: (view_x - self.left) / self.width * LOGICAL_SIZE.width as f32,
            y: (view_y - self.top) / self.height * LOGICAL_SIZE.height as f32,
        }
    }
}

/// Maps a pointer position in view space into logical canvas space.
pub fn map_point(view_x: f32, view_y: f32, view_rect: &ViewRect) -> Point {
    view_rect.to_logical(view_x, view_y)
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An opaque RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA bytes for the raster (always fully opaque).
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xff]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CanvasError::InvalidColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

// ---------------------------------------------------------------------------
// Brush
// ---------------------------------------------------------------------------

/// Colors offered by the drawing toolbar.
pub const PALETTE: [Color; 8] = [
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0x00, 0x00, 0xff),
    Color::rgb(0x00, 0xaa, 0x00),
    Color::rgb(0xff, 0x88, 0x00),
    Color::rgb(0x88, 0x00, 0xff),
    Color::rgb(0x00, 0xaa, 0xaa),
    Color::rgb(0x88, 0x88, 0x88),
];

/// Brush widths offered by the drawing toolbar, in logical pixels.
pub const BRUSH_SIZES: [f32; 4] = [3.0, 6.0, 12.0, 20.0];

/// The eraser paints background-colored strokes of this width.
pub const ERASER_WIDTH: f32 = 20.0;

/// The tool state that decides what a new stroke looks like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    color: Color,
    width: f32,
    eraser: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: BRUSH_SIZES[1],
            eraser: false,
        }
    }
}

impl Brush {
    /// Picks a color; switches the eraser off.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.eraser = false;
    }

    /// Picks a width; switches the eraser off.
    pub fn set_width(&mut self, width: f32) {
        self.width = width;
        self.eraser = false;
    }

    pub fn toggle_eraser(&mut self) {
        self.eraser = !self.eraser;
    }

    pub fn is_eraser(&self) -> bool {
        self.eraser
    }

    /// The `(color, width)` a stroke started now would be recorded with.
    pub fn style(&self) -> (Color, f32) {
        if self.eraser {
            (Color::WHITE, ERASER_WIDTH)
        } else {
            (self.color, self.width)
        }
    }
}

// ---------------------------------------------------------------------------
// Stroke
// ---------------------------------------------------------------------------

/// One continuous pointer-down → pointer-up gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub fn new(start: Point, color: Color, width: f32) -> Self {
        Self {
            points: vec![start],
            color,
            width,
        }
    }
}
