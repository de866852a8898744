use serde::{Deserialize, Serialize};

use super::pen;
use crate::canvas::{Canvas, Color};

/// Primitives drawn between two drag corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Line,
    Rectangle,
    Ellipse,
}

/// Rasterizes `shape` between `start` and `end`.
///
/// The line is a solid stroke of the given width. Rectangle and ellipse are
/// outlines only, with the outline width growing inward from the bounding
/// box spanned by the two corners (both corners inclusive).
pub fn draw_shape(
    canvas: &mut Canvas,
    shape: Shape,
    start: (i32, i32),
    end: (i32, i32),
    width: u32,
    color: Color,
) {
    match shape {
        Shape::Line => pen::draw_segment(canvas, start, end, width, color),
        Shape::Rectangle => draw_rect_outline(canvas, start, end, width, color),
        Shape::Ellipse => draw_ellipse_outline(canvas, start, end, width, color),
    }
}

/// Inclusive bounding box, normalized so min <= max.
fn bounds(a: (i32, i32), b: (i32, i32)) -> (i32, i32, i32, i32) {
    (a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
}

/// Visible part of an inclusive box, or `None` if it misses the canvas.
fn clip(canvas: &Canvas, (x0, y0, x1, y1): (i32, i32, i32, i32)) -> Option<(i32, i32, i32, i32)> {
    let cx0 = x0.max(0);
    let cy0 = y0.max(0);
    let cx1 = x1.min(canvas.width() as i32 - 1);
    let cy1 = y1.min(canvas.height() as i32 - 1);
    (cx0 <= cx1 && cy0 <= cy1).then_some((cx0, cy0, cx1, cy1))
}

fn draw_rect_outline(canvas: &mut Canvas, a: (i32, i32), b: (i32, i32), width: u32, color: Color) {
    let (x0, y0, x1, y1) = bounds(a, b);
    let Some((cx0, cy0, cx1, cy1)) = clip(canvas, (x0, y0, x1, y1)) else {
        return;
    };
    let t = i64::from(width.max(1));
    let (x0, y0, x1, y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));

    for y in cy0..=cy1 {
        let yl = i64::from(y);
        let horizontal_edge = yl < y0 + t || yl > y1 - t;
        for x in cx0..=cx1 {
            let xl = i64::from(x);
            if horizontal_edge || xl < x0 + t || xl > x1 - t {
                canvas.put_clipped(x, y, color);
            }
        }
    }
}

fn draw_ellipse_outline(canvas: &mut Canvas, a: (i32, i32), b: (i32, i32), width: u32, color: Color) {
    let (x0, y0, x1, y1) = bounds(a, b);
    let Some((cx0, cy0, cx1, cy1)) = clip(canvas, (x0, y0, x1, y1)) else {
        return;
    };

    // Radii reach the outer edge of the corner pixels, so they are never zero.
    let cx = (x0 as f64 + x1 as f64) / 2.0;
    let cy = (y0 as f64 + y1 as f64) / 2.0;
    let rx = (x1 as f64 - x0 as f64) / 2.0 + 0.5;
    let ry = (y1 as f64 - y0 as f64) / 2.0 + 0.5;
    let t = width.max(1) as f64;
    let (irx, iry) = (rx - t, ry - t);

    for y in cy0..=cy1 {
        let ny = (y as f64 - cy) / ry;
        for x in cx0..=cx1 {
            let nx = (x as f64 - cx) / rx;
            if nx * nx + ny * ny > 1.0 {
                continue;
            }
            if irx > 0.0 && iry > 0.0 {
                let ix = (x as f64 - cx) / irx;
                let iy = (y as f64 - cy) / iry;
                if ix * ix + iy * iy < 1.0 {
                    continue;
                }
            }
            canvas.put_clipped(x, y, color);
        }
    }
}
