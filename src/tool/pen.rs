use crate::canvas::{Canvas, Color};

/// Draws one segment of a freehand stroke.
///
/// Walks the segment with Bresenham and stamps a round brush `width` pixels
/// across at every step. A zero-length segment leaves a single dab, which is
/// what a click without drag produces.
pub fn draw_segment(canvas: &mut Canvas, from: (i32, i32), to: (i32, i32), width: u32, color: Color) {
    let (x1, y1) = (i64::from(to.0), i64::from(to.1));
    let (mut x, mut y) = (i64::from(from.0), i64::from(from.1));
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        fill_brush(canvas, (x, y), width, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Fills a round footprint exactly `diameter` pixels across.
///
/// For an odd diameter the footprint is centred on `center`; for an even
/// one it spans `center` and the pixel to its right/below. Only the part
/// overlapping the canvas is visited.
pub(crate) fn fill_brush(canvas: &mut Canvas, center: (i64, i64), diameter: u32, color: Color) {
    let d = diameter.max(1) as i64;
    let lo = -((d - 1) / 2);
    let hi = d / 2;
    let (cx, cy) = center;

    let x0 = (cx + lo).max(0);
    let y0 = (cy + lo).max(0);
    let x1 = (cx + hi).min(canvas.width() as i64 - 1);
    let y1 = (cy + hi).min(canvas.height() as i64 - 1);

    // Doubled coordinates keep the half-pixel centre of even footprints exact.
    let limit = d.saturating_mul(d);
    for y in y0..=y1 {
        let ddy = 2 * (y - cy) - (lo + hi);
        let ddy2 = ddy.saturating_mul(ddy);
        for x in x0..=x1 {
            let ddx = 2 * (x - cx) - (lo + hi);
            if ddx.saturating_mul(ddx).saturating_add(ddy2) <= limit {
                canvas.put_clipped(x as i32, y as i32, color);
            }
        }
    }
}
