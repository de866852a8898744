mod common;

use image::{Rgba, RgbaImage};
use raster_paint::canvas::color::{self, BLACK, TRANSPARENT, WHITE};
use raster_paint::tool::{fill, shapes, stamp};
use raster_paint::{Canvas, CanvasError, Shape, StampRegistry};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

#[test]
fn test_out_of_bounds_access() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    assert_eq!(
        canvas.get_pixel(10, 0),
        Err(CanvasError::OutOfBounds { x: 10, y: 0, width: 10, height: 10 })
    );
    assert!(canvas.set_pixel(0, -1, BLACK).is_err());
    assert!(canvas.set_pixel(9, 9, BLACK).is_ok());
}

#[test]
fn test_clone_is_deep() {
    let mut canvas = Canvas::new(3, 3).unwrap();
    let copy = canvas.clone();
    canvas.set_pixel(1, 1, BLACK).unwrap();
    assert_eq!(copy.get_pixel(1, 1).unwrap(), WHITE);
}

#[test]
fn test_flood_fill_scenario() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    assert_eq!(fill::flood_fill(&mut canvas, (5, 5), RED), 100);
    assert!(canvas.image().pixels().all(|p| *p == RED));

    let before = canvas.clone();
    assert_eq!(fill::flood_fill(&mut canvas, (5, 5), RED), 0);
    assert_eq!(canvas, before);
}

#[test]
fn test_flood_fill_leaves_other_regions_untouched() {
    // Ring of black around the centre pixel.
    let mut canvas = Canvas::new(5, 5).unwrap();
    shapes::draw_shape(&mut canvas, Shape::Rectangle, (1, 1), (3, 3), 1, BLACK);
    let filled = fill::flood_fill(&mut canvas, (2, 2), RED);

    assert_eq!(filled, 1);
    assert_eq!(canvas.get_pixel(2, 2).unwrap(), RED);
    assert_eq!(canvas.get_pixel(0, 0).unwrap(), WHITE);
    assert_eq!(canvas.get_pixel(1, 2).unwrap(), BLACK);
}

#[test]
fn test_blit_with_explicit_mask() {
    let mut canvas = Canvas::new(4, 4).unwrap();
    let source = RgbaImage::from_pixel(2, 2, BLACK);
    let mut mask = RgbaImage::from_pixel(2, 2, TRANSPARENT);
    mask.put_pixel(0, 0, Rgba([0, 0, 0, 255]));

    canvas.blit(&source, (1, 1), Some(&mask));
    assert_eq!(canvas.get_pixel(1, 1).unwrap(), BLACK);
    assert_eq!(canvas.get_pixel(2, 2).unwrap(), WHITE);
}

#[test]
fn test_stamp_directory_scan() {
    let dir = common::temp_dir("raster_paint_stamps");
    RgbaImage::from_pixel(4, 4, RED).save(dir.join("b.png")).unwrap();
    RgbaImage::from_pixel(2, 2, BLACK).save(dir.join("a.PNG")).unwrap();
    std::fs::write(dir.join("broken.png"), b"not an image").unwrap();
    std::fs::write(dir.join("notes.txt"), b"ignored").unwrap();

    let mut registry = StampRegistry::default();
    assert_eq!(registry.load_dir(&dir).unwrap(), 2);
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a.PNG", "b.png"]);

    let mut canvas = Canvas::new(8, 8).unwrap();
    stamp::apply_stamp(&mut canvas, registry.get("b.png").unwrap(), (4, 4));
    assert_eq!(canvas.get_pixel(2, 2).unwrap(), RED);
    assert_eq!(canvas.get_pixel(5, 5).unwrap(), RED);
    assert_eq!(canvas.get_pixel(6, 6).unwrap(), WHITE);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_palette_colors_parse() {
    let palette = color::default_palette();
    assert_eq!(palette.len(), 16);
    assert_eq!(palette[0], BLACK);
    assert_eq!(palette[1], WHITE);
}
