use std::f64::consts::TAU;

use rand::Rng;

use crate::canvas::{Canvas, Color};

/// Samples emitted per unit of brush size.
pub const SAMPLES_PER_SIZE: u32 = 10;

/// Scatters `10 * brush_size` single-pixel dots around `center`.
///
/// Each dot uses a uniform angle in `[0, 2π)` and a uniform radius in
/// `[0, brush_size]`; the offset is truncated toward zero. Dots landing off
/// the canvas are dropped. Returns how many dots were painted.
pub fn spray<R: Rng + ?Sized>(
    canvas: &mut Canvas,
    center: (i32, i32),
    brush_size: u32,
    color: Color,
    rng: &mut R,
) -> usize {
    let radius = brush_size as f64;
    let mut painted = 0;
    for _ in 0..brush_size.saturating_mul(SAMPLES_PER_SIZE) {
        let angle = rng.gen_range(0.0..TAU);
        let r = rng.gen_range(0.0..=radius);
        let dx = (r * angle.cos()) as i32;
        let dy = (r * angle.sin()) as i32;
        if canvas.put_clipped(center.0.saturating_add(dx), center.1.saturating_add(dy), color) {
            painted += 1;
        }
    }
    painted
}
