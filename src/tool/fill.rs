use crate::canvas::{Canvas, Color, color};

/// 4-connected flood fill from `seed`.
///
/// Pixels match when their RGB equals the seed pixel's RGB; alpha is
/// ignored. Matching pixels are replaced by `fill` at full opacity. When the
/// seed already has the fill RGB, or lies off the canvas, nothing changes.
///
/// Uses an explicit work stack. A filled pixel no longer matches the target
/// (its RGB differs), so no visited set is needed and the walk terminates
/// after at most `W·H` fills.
///
/// Returns the number of pixels filled.
pub fn flood_fill(canvas: &mut Canvas, seed: (i32, i32), fill: Color) -> usize {
    let Ok(target) = canvas.get_pixel(seed.0, seed.1) else {
        return 0;
    };
    if color::same_rgb(target, fill) {
        return 0;
    }

    let fill = color::opaque(fill);
    let matches = |canvas: &Canvas, x: i32, y: i32| {
        canvas
            .get_pixel(x, y)
            .is_ok_and(|pixel| color::same_rgb(pixel, target))
    };

    let mut filled = 0;
    let mut stack: Vec<(i32, i32)> = Vec::with_capacity(1024);
    stack.push(seed);

    while let Some((x, y)) = stack.pop() {
        // A pixel can be queued by two neighbours before either pops it.
        if !matches(canvas, x, y) {
            continue;
        }
        canvas.put_clipped(x, y, fill);
        filled += 1;

        for (nx, ny) in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
            if matches(canvas, nx, ny) {
                stack.push((nx, ny));
            }
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::color::{BLACK, WHITE};
    use image::Rgba;

    const RED: Color = Rgba([255, 0, 0, 255]);

    #[test]
    fn test_fill_whole_canvas() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        assert_eq!(flood_fill(&mut canvas, (5, 5), RED), 100);
        assert!(canvas.image().pixels().all(|p| *p == RED));
    }

    #[test]
    fn test_fill_same_color_is_noop() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        flood_fill(&mut canvas, (5, 5), RED);
        let before = canvas.clone();
        assert_eq!(flood_fill(&mut canvas, (5, 5), RED), 0);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_same_rgb_different_alpha_is_noop() {
        let mut canvas = Canvas::new(3, 3).unwrap();
        assert_eq!(flood_fill(&mut canvas, (1, 1), Rgba([255, 255, 255, 10])), 0);
    }

    #[test]
    fn test_fill_stops_at_boundary() {
        // Vertical black wall at x = 2 splits the canvas in two.
        let mut canvas = Canvas::new(5, 3).unwrap();
        for y in 0..3 {
            canvas.set_pixel(2, y, BLACK).unwrap();
        }
        assert_eq!(flood_fill(&mut canvas, (0, 0), RED), 6);
        assert_eq!(canvas.get_pixel(1, 2).unwrap(), RED);
        assert_eq!(canvas.get_pixel(2, 1).unwrap(), BLACK);
        assert_eq!(canvas.get_pixel(3, 0).unwrap(), WHITE);
    }

    #[test]
    fn test_diagonal_neighbours_are_not_connected() {
        let mut canvas = Canvas::filled(2, 2, BLACK).unwrap();
        canvas.set_pixel(0, 0, WHITE).unwrap();
        canvas.set_pixel(1, 1, WHITE).unwrap();
        assert_eq!(flood_fill(&mut canvas, (0, 0), RED), 1);
        assert_eq!(canvas.get_pixel(1, 1).unwrap(), WHITE);
    }

    #[test]
    fn test_translucent_target_is_filled_opaque() {
        let mut canvas = Canvas::filled(2, 1, Rgba([0, 0, 255, 40])).unwrap();
        flood_fill(&mut canvas, (0, 0), Rgba([0, 255, 0, 100]));
        assert_eq!(canvas.get_pixel(1, 0).unwrap(), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_seed_off_canvas() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        assert_eq!(flood_fill(&mut canvas, (-1, 0), RED), 0);
        assert_eq!(flood_fill(&mut canvas, (0, 2), RED), 0);
    }

    #[test]
    fn test_large_canvas_does_not_overflow_stack() {
        let mut canvas = Canvas::new(800, 600).unwrap();
        assert_eq!(flood_fill(&mut canvas, (400, 300), RED), 480_000);
    }
}
