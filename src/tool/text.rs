//! Text tool: rasterizes a string centred on the click point.
//!
//! A TrueType font is used when one of the configured paths loads;
//! otherwise the built-in bitmap font takes over so the tool always works.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, GlyphId, PxScale, Rect, ScaleFont, point};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::bitmap_font;
use crate::canvas::{Canvas, Color};
use crate::error::ResourceError;

/// Default point size for new text requests.
pub const DEFAULT_TEXT_SIZE: u32 = 24;

/// Directories searched for bare font file names.
const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts/dejavu",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
];

/// What the text tool writes, and how large.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
    pub size: u32,
}

impl Default for TextRequest {
    fn default() -> Self {
        Self {
            text: String::new(),
            size: DEFAULT_TEXT_SIZE,
        }
    }
}

impl TextRequest {
    pub fn new(text: impl Into<String>, size: u32) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }
}

/// Turns strings into coverage masks.
#[derive(Clone, Default)]
pub struct TextRenderer {
    font: Option<FontArc>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("truetype", &self.font.is_some())
            .finish()
    }
}

impl TextRenderer {
    /// Tries each path in order and keeps the first font that parses.
    ///
    /// Bare file names are also looked up in the usual system font
    /// directories.
    pub fn try_load(paths: &[PathBuf]) -> Result<Self, ResourceError> {
        for path in paths {
            for candidate in candidates(path) {
                let Ok(bytes) = fs::read(&candidate) else {
                    continue;
                };
                match FontArc::try_from_vec(bytes) {
                    Ok(font) => {
                        info!("Using font {}", candidate.display());
                        return Ok(Self { font: Some(font) });
                    }
                    Err(err) => warn!("Ignoring invalid font {}: {}", candidate.display(), err),
                }
            }
        }
        Err(ResourceError::NoFontAvailable)
    }

    /// Like [`TextRenderer::try_load`], falling back to the bitmap font.
    pub fn load(paths: &[PathBuf]) -> Self {
        Self::try_load(paths).unwrap_or_else(|err| {
            warn!("{}, using built-in bitmap font", err);
            Self::builtin()
        })
    }

    /// Renderer that only uses the bitmap font.
    pub fn builtin() -> Self {
        Self { font: None }
    }

    pub fn has_truetype(&self) -> bool {
        self.font.is_some()
    }

    /// Rasterizes `text` and crops the result to its ink.
    ///
    /// Returns `None` when nothing would be drawn.
    pub fn rasterize(&self, text: &str, size: u32) -> Option<GrayImage> {
        let mask = match &self.font {
            Some(font) => rasterize_truetype(font, text, size as f32)?,
            None => bitmap_font::render_mask(text, size)?,
        };
        crop_to_ink(&mask)
    }
}

fn candidates(path: &Path) -> Vec<PathBuf> {
    let mut out = vec![path.to_path_buf()];
    if path.components().count() == 1 {
        out.extend(SYSTEM_FONT_DIRS.iter().map(|dir| Path::new(dir).join(path)));
    }
    out
}

fn rasterize_truetype(font: &FontArc, text: &str, size: f32) -> Option<GrayImage> {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let line_height = scaled.height() + scaled.line_gap();

    let mut outlined = Vec::new();
    for (row, line) in text.split('\n').enumerate() {
        let baseline = scaled.ascent() + row as f32 * line_height;
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        for c in line.chars() {
            let id = font.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);
            if let Some(g) = font.outline_glyph(glyph) {
                outlined.push(g);
            }
        }
    }

    let bounds = outlined.iter().map(|g| g.px_bounds()).reduce(|a, b| Rect {
        min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
        max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
    })?;

    let width = (bounds.max.x - bounds.min.x).ceil() as u32;
    let height = (bounds.max.y - bounds.min.y).ceil() as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let mut mask = GrayImage::new(width, height);
    for g in &outlined {
        let gb = g.px_bounds();
        let ox = (gb.min.x - bounds.min.x) as u32;
        let oy = (gb.min.y - bounds.min.y) as u32;
        g.draw(|x, y, coverage| {
            let (px, py) = (ox + x, oy + y);
            if px < width && py < height {
                let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                let pixel = mask.get_pixel_mut(px, py);
                pixel.0[0] = pixel.0[0].max(value);
            }
        });
    }
    Some(mask)
}

/// Smallest sub-image holding every non-zero pixel.
fn crop_to_ink(mask: &GrayImage) -> Option<GrayImage> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    let (x0, y0, x1, y1) = bounds?;
    Some(image::imageops::crop_imm(mask, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image())
}

/// Draws `request.text` in `color`, centred on `center`.
///
/// Returns `false` when the text has no ink (empty or whitespace only).
pub fn render_text(
    canvas: &mut Canvas,
    renderer: &TextRenderer,
    request: &TextRequest,
    center: (i32, i32),
    color: Color,
) -> bool {
    let Some(mask) = renderer.rasterize(&request.text, request.size) else {
        return false;
    };

    let (w, h) = mask.dimensions();
    let source = RgbaImage::from_fn(w, h, |x, y| {
        let Luma([coverage]) = *mask.get_pixel(x, y);
        let alpha = (coverage as u32 * color.0[3] as u32 + 127) / 255;
        Rgba([color.0[0], color.0[1], color.0[2], alpha as u8])
    });
    let offset = (center.0 - (w / 2) as i32, center.1 - (h / 2) as i32);
    canvas.blit(&source, offset, None);
    true
}
