//! Software rasterized RGBA canvas

use glam::Vec2;

use crate::{
    color::Color,
    surface::{check_radius, DrawError, Stroke, Surface},
};

/// RGBA8 pixel buffer with source-over compositing.
///
/// Pixels start out fully transparent and are presented over black.
pub struct Canvas {
    pixels: Vec<[u8; 4]>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![[0; 4]; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Blend `color` into one pixel, `coverage` scales the source alpha
    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }

        let src_alpha = color.a * coverage.clamp(0.0, 1.0);
        if src_alpha <= 0.0 {
            return;
        }

        let idx = self.index(x as u32, y as u32);
        let dst = Color::from_rgba8(self.pixels[idx]);

        let keep = dst.a * (1.0 - src_alpha);
        let out_alpha = src_alpha + keep;
        let out = if out_alpha <= 0.0 {
            Color::TRANSPARENT
        } else {
            Color::rgba(
                (color.r * src_alpha + dst.r * keep) / out_alpha,
                (color.g * src_alpha + dst.g * keep) / out_alpha,
                (color.b * src_alpha + dst.b * keep) / out_alpha,
                out_alpha,
            )
        };

        self.pixels[idx] = out.to_rgba8();
    }

    /// Pixel range covered by a rectangle, clipped to the canvas.
    /// Negative extents grow the rectangle left or up from its origin.
    fn span(&self, x: f32, y: f32, width: f32, height: f32) -> (u32, u32, u32, u32) {
        let clip = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
        let (left, right) = (x.min(x + width), x.max(x + width));
        let (top, bottom) = (y.min(y + height), y.max(y + height));
        (
            clip(left, self.width),
            clip(top, self.height),
            clip(right, self.width),
            clip(bottom, self.height),
        )
    }
}

impl Surface for Canvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = Canvas::new(width, height);
    }

    fn clear(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (x0, y0, x1, y1) = self.span(x, y, width, height);
        for py in y0..y1 {
            let row = self.index(x0, py);
            self.pixels[row..row + (x1 - x0) as usize].fill([0; 4]);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        let (x0, y0, x1, y1) = self.span(x, y, width, height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px as i64, py as i64, color, 1.0);
            }
        }
    }

    fn draw_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    ) -> Result<(), DrawError> {
        check_radius(radius)?;

        let half_stroke = stroke.map_or(0.0, |s| s.width / 2.0);
        let reach = radius + half_stroke + 1.0;
        let (x0, y0) = ((center.x - reach).floor() as i64, (center.y - reach).floor() as i64);
        let (x1, y1) = ((center.x + reach).ceil() as i64, (center.y + reach).ceil() as i64);

        for py in y0.max(0)..y1.min(self.height as i64) {
            for px in x0.max(0)..x1.min(self.width as i64) {
                let d = Vec2::new(px as f32 + 0.5, py as f32 + 0.5).distance(center);

                self.blend(px, py, fill, radius + 0.5 - d);

                if let Some(stroke) = stroke {
                    let coverage = (half_stroke + 0.5 - (d - radius).abs()) * stroke.width.min(1.0);
                    self.blend(px, py, stroke.color, coverage);
                }
            }
        }

        Ok(())
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, stroke: Stroke) {
        if stroke.width <= 0.0 {
            return;
        }

        let delta = to - from;

        // Hairlines are stepped one pixel at a time with the width as coverage
        if stroke.width <= 1.0 {
            let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as u32;
            for i in 0..=steps {
                let p = from + delta * (i as f32 / steps as f32);
                self.blend(
                    p.x.floor() as i64,
                    p.y.floor() as i64,
                    stroke.color,
                    stroke.width,
                );
            }
            return;
        }

        let half = stroke.width / 2.0;
        let min = from.min(to) - Vec2::splat(half + 1.0);
        let max = from.max(to) + Vec2::splat(half + 1.0);
        let length_squared = delta.length_squared();

        for py in (min.y.floor() as i64).max(0)..(max.y.ceil() as i64).min(self.height as i64) {
            for px in (min.x.floor() as i64).max(0)..(max.x.ceil() as i64).min(self.width as i64) {
                let p = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let t = if length_squared > 0.0 {
                    ((p - from).dot(delta) / length_squared).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let d = p.distance(from + delta * t);
                self.blend(px, py, stroke.color, half + 0.5 - d);
            }
        }
    }
}
