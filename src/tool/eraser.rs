use super::pen;
use crate::canvas::{Canvas, color};

/// Paints the background color over a round footprint `2·brush_size`
/// pixels across, centred on `center` (the extra pixel of the even width
/// falls to the right and below).
///
/// The canvas has no transparency model, so erasing means painting opaque
/// white.
pub fn erase(canvas: &mut Canvas, center: (i32, i32), brush_size: u32) {
    let center = (i64::from(center.0), i64::from(center.1));
    pen::fill_brush(canvas, center, brush_size.saturating_mul(2), color::BACKGROUND);
}
