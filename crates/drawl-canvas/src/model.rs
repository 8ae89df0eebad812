//! The stroke-capture model behind a drawing turn.
//!
//! ```text
//! pointer down ──→ begin_stroke ──→ extend_stroke* ──→ commit_stroke
//!                                                       │
//!                        undo / clear ←─────────────────┘
//!                                                       │
//!                                          take_artifact (turn ends)
//! ```
//!
//! The model owns its strokes exclusively until [`StrokeCanvas::take_artifact`],
//! which hands the serialized image to the caller and resets the model for
//! the next turn.

use crate::{Brush, CanvasError, CanvasSize, Color, Point, Raster, Stroke, LOGICAL_SIZE};

/// Background every render starts from.
pub const BACKGROUND: Color = Color::WHITE;

/// Committed strokes plus the stroke currently under the pointer.
#[derive(Debug, Clone, Default)]
pub struct StrokeCanvas {
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
    brush: Brush,
}

impl StrokeCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Pointer input --

    /// Pointer down: starts a stroke with the current brush style.
    ///
    /// Ignored while a stroke is already in progress, so a duplicated
    /// pointer-down event can't orphan the stroke being drawn.
    pub fn begin_stroke(&mut self, point: Point) {
        if self.current.is_some() {
            tracing::trace!("pointer down while drawing; ignored");
            return;
        }
        let (color, width) = self.brush.style();
        self.current = Some(Stroke::new(point, color, width));
    }

    /// Pointer move: appends to the in-progress stroke.
    ///
    /// Returns the in-progress stroke so the caller can paint a live
    /// preview; `None` (and no change) when no stroke is in progress.
    pub fn extend_stroke(&mut self, point: Point) -> Option<&Stroke> {
        let stroke = self.current.as_mut()?;
        stroke.points.push(point);
        Some(stroke)
    }

    /// Pointer up: moves the in-progress stroke onto the committed list.
    pub fn commit_stroke(&mut self) {
        if let Some(stroke) = self.current.take() {
            if !stroke.points.is_empty() {
                self.strokes.push(stroke);
            }
        }
    }

    // -- Editing --

    /// Removes and returns the most recent committed stroke.
    pub fn undo(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Removes every committed stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    /// Drops all strokes, including one in progress. The brush is kept.
    pub fn reset(&mut self) {
        self.strokes.clear();
        self.current = None;
    }

    // -- Accessors --

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.current.is_none()
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    // -- Output --

    /// Full replay of the committed strokes at `size`.
    ///
    /// A pure function of the stroke list: calling it again with the same
    /// strokes yields an identical raster. Fails with
    /// [`CanvasError::InvalidSize`] when `size` is out of range.
    pub fn render(&self, size: CanvasSize) -> Result<Raster, CanvasError> {
        let mut raster = Raster::new(size, BACKGROUND)?;
        for stroke in &self.strokes {
            raster.draw_stroke(stroke);
        }
        Ok(raster)
    }

    /// Paints only the in-progress stroke onto an existing raster.
    ///
    /// Cheap enough to call on every pointer move; the committed strokes
    /// already on `raster` are left alone.
    pub fn render_preview(&self, raster: &mut Raster) {
        if let Some(stroke) = &self.current {
            raster.draw_stroke(stroke);
        }
    }

    /// Encodes what the player currently sees (committed strokes plus any
    /// in-progress stroke) as a PNG data URL at the logical size.
    pub fn serialize(&self) -> Result<String, CanvasError> {
        let mut raster = self.render(LOGICAL_SIZE)?;
        self.render_preview(&mut raster);
        raster.to_data_url()
    }

    /// Serializes the drawing and resets the model.
    ///
    /// On error the strokes are left untouched.
    pub fn take_artifact(&mut self) -> Result<String, CanvasError> {
        let artifact = self.serialize()?;
        self.reset();
        tracing::debug!(bytes = artifact.len(), "drawing artifact taken");
        Ok(artifact)
    }
}
