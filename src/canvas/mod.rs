//! Canvas buffer - the authoritative pixel grid of a document.
//!
//! Dimensions are fixed when the canvas is created. Content is replaced
//! wholesale on undo/redo/load and mutated in place by the tool engine.

pub mod color;

use egui::ColorImage;
use image::{Rgba, RgbaImage};

use crate::error::CanvasError;
pub use color::Color;

/// A fixed-size grid of 8-bit RGBA pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    image: RgbaImage,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl Canvas {
    /// Creates an opaque white canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        Self::filled(width, height, color::WHITE)
    }

    pub fn filled(width: u32, height: u32, fill: Color) -> Result<Self, CanvasError> {
        check_dimensions(width, height)?;
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, fill),
        })
    }

    /// Wraps raw RGBA bytes (row-major, 4 bytes per pixel).
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CanvasError> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        let image = RgbaImage::from_raw(width, height, data)
            .ok_or(CanvasError::BufferSizeMismatch { expected, actual })?;
        if actual != expected {
            return Err(CanvasError::BufferSizeMismatch { expected, actual });
        }
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height()
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Result<Color, CanvasError> {
        if !self.contains(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        Ok(*self.image.get_pixel(x as u32, y as u32))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), CanvasError> {
        if !self.contains(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        self.image.put_pixel(x as u32, y as u32, color);
        Ok(())
    }

    /// Writes a pixel if it lies on the canvas. Returns whether it was written.
    ///
    /// All tool rasterizers go through this so that geometry hanging off the
    /// edge is clipped rather than reported.
    #[inline]
    pub fn put_clipped(&mut self, x: i32, y: i32, color: Color) -> bool {
        if self.contains(x, y) {
            self.image.put_pixel(x as u32, y as u32, color);
            true
        } else {
            false
        }
    }

    /// Composites `source` with its top-left corner at `offset`.
    ///
    /// Each pixel is blended by the alpha of `mask` at the same source
    /// coordinate, or by the source's own alpha when no mask is given.
    /// Mask pixels missing because the mask is smaller count as fully
    /// transparent. Anything falling outside the canvas is clipped.
    pub fn blit(&mut self, source: &RgbaImage, offset: (i32, i32), mask: Option<&RgbaImage>) {
        let (ox, oy) = offset;
        let (cw, ch) = (self.width() as i64, self.height() as i64);

        // Visible source rectangle after clipping
        let sx0 = (-(ox as i64)).max(0);
        let sy0 = (-(oy as i64)).max(0);
        let sx1 = (source.width() as i64).min(cw - ox as i64);
        let sy1 = (source.height() as i64).min(ch - oy as i64);
        if sx0 >= sx1 || sy0 >= sy1 {
            return;
        }

        for sy in sy0..sy1 {
            for sx in sx0..sx1 {
                let (sx, sy) = (sx as u32, sy as u32);
                let src = *source.get_pixel(sx, sy);
                let alpha = match mask {
                    Some(mask) if sx < mask.width() && sy < mask.height() => {
                        mask.get_pixel(sx, sy).0[3]
                    }
                    Some(_) => 0,
                    None => src.0[3],
                };
                if alpha == 0 {
                    continue;
                }

                let dx = (ox as i64 + sx as i64) as u32;
                let dy = (oy as i64 + sy as i64) as u32;
                let dst = self.image.get_pixel_mut(dx, dy);
                *dst = blend(*dst, src, alpha);
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Converts to an egui image for texture upload by the front end.
    pub fn to_color_image(&self) -> ColorImage {
        let size = [self.width() as usize, self.height() as usize];
        ColorImage::from_rgba_unmultiplied(size, self.image.as_raw())
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> CanvasError {
        CanvasError::OutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        }
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), CanvasError> {
    if width == 0 || height == 0 {
        return Err(CanvasError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Linear blend of every channel, alpha included.
#[inline]
fn blend(dst: Color, src: Color, alpha: u8) -> Color {
    if alpha == 255 {
        return src;
    }
    let a = alpha as u16;
    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let mixed = src.0[i] as u16 * a + dst.0[i] as u16 * (255 - a);
        *channel = ((mixed + 127) / 255) as u8;
    }
    Rgba(out)
}
