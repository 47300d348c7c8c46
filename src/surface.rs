//! The drawing primitives the effect renders through

use glam::Vec2;

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DrawError {
    #[error("circle radius must be positive, got {0}")]
    NonPositiveRadius(f32),
}

/// An immediate-mode 2D drawing surface.
///
/// Coordinates are in surface pixels with the origin in the top left corner.
/// Nothing drawn is retained outside of the surface contents, a resize
/// discards them.
pub trait Surface {
    fn size(&self) -> (u32, u32);

    fn resize(&mut self, width: u32, height: u32);

    /// Reset the rectangle to fully transparent
    fn clear(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Composite `color` over the rectangle
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);

    /// Fill a circle and optionally outline it.
    ///
    /// Fails with [`DrawError::NonPositiveRadius`] before touching the surface
    /// when `radius <= 0`.
    fn draw_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    ) -> Result<(), DrawError>;

    fn draw_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke);

    /// Clear the whole surface
    fn clear_all(&mut self) {
        let (width, height) = self.size();
        self.clear(0.0, 0.0, width as f32, height as f32);
    }

    /// Composite `color` over the whole surface
    fn fill_all(&mut self, color: Color) {
        let (width, height) = self.size();
        self.fill_rect(0.0, 0.0, width as f32, height as f32, color);
    }
}

pub fn check_radius(radius: f32) -> Result<(), DrawError> {
    if radius > 0.0 {
        Ok(())
    } else {
        Err(DrawError::NonPositiveRadius(radius))
    }
}
