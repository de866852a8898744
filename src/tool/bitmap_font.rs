//! Built-in 5x7 bitmap font, used when no TrueType font can be loaded.

use image::{GrayImage, Luma};

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// Blank column after each glyph.
const ADVANCE: u32 = GLYPH_WIDTH + 1;
/// Two blank rows between lines.
const LINE_HEIGHT: u32 = GLYPH_HEIGHT + 2;
const FIRST: u8 = 0x20;
const LAST: u8 = 0x7E;

/// Glyphs for printable ASCII, one byte per column; bit 0 is the top row.
#[rustfmt::skip]
const GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], [0x00, 0x00, 0x5F, 0x00, 0x00], // ' ' !
    [0x00, 0x07, 0x00, 0x07, 0x00], [0x14, 0x7F, 0x14, 0x7F, 0x14], // " #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], [0x23, 0x13, 0x08, 0x64, 0x62], // $ %
    [0x36, 0x49, 0x55, 0x22, 0x50], [0x00, 0x05, 0x03, 0x00, 0x00], // & '
    [0x00, 0x1C, 0x22, 0x41, 0x00], [0x00, 0x41, 0x22, 0x1C, 0x00], // ( )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], [0x08, 0x08, 0x3E, 0x08, 0x08], // * +
    [0x00, 0x50, 0x30, 0x00, 0x00], [0x08, 0x08, 0x08, 0x08, 0x08], // , -
    [0x00, 0x60, 0x60, 0x00, 0x00], [0x20, 0x10, 0x08, 0x04, 0x02], // . /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], [0x00, 0x42, 0x7F, 0x40, 0x00], // 0 1
    [0x42, 0x61, 0x51, 0x49, 0x46], [0x21, 0x41, 0x45, 0x4B, 0x31], // 2 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], [0x27, 0x45, 0x45, 0x45, 0x39], // 4 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], [0x01, 0x71, 0x09, 0x05, 0x03], // 6 7
    [0x36, 0x49, 0x49, 0x49, 0x36], [0x06, 0x49, 0x49, 0x29, 0x1E], // 8 9
    [0x00, 0x36, 0x36, 0x00, 0x00], [0x00, 0x56, 0x36, 0x00, 0x00], // : ;
    [0x08, 0x14, 0x22, 0x41, 0x00], [0x14, 0x14, 0x14, 0x14, 0x14], // < =
    [0x00, 0x41, 0x22, 0x14, 0x08], [0x02, 0x01, 0x51, 0x09, 0x06], // > ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], [0x7E, 0x11, 0x11, 0x11, 0x7E], // @ A
    [0x7F, 0x49, 0x49, 0x49, 0x36], [0x3E, 0x41, 0x41, 0x41, 0x22], // B C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], [0x7F, 0x49, 0x49, 0x49, 0x41], // D E
    [0x7F, 0x09, 0x09, 0x01, 0x01], [0x3E, 0x41, 0x41, 0x51, 0x32], // F G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], [0x00, 0x41, 0x7F, 0x41, 0x00], // H I
    [0x20, 0x40, 0x41, 0x3F, 0x01], [0x7F, 0x08, 0x14, 0x22, 0x41], // J K
    [0x7F, 0x40, 0x40, 0x40, 0x40], [0x7F, 0x02, 0x04, 0x02, 0x7F], // L M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], [0x3E, 0x41, 0x41, 0x41, 0x3E], // N O
    [0x7F, 0x09, 0x09, 0x09, 0x06], [0x3E, 0x41, 0x51, 0x21, 0x5E], // P Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], [0x46, 0x49, 0x49, 0x49, 0x31], // R S
    [0x01, 0x01, 0x7F, 0x01, 0x01], [0x3F, 0x40, 0x40, 0x40, 0x3F], // T U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], [0x7F, 0x20, 0x18, 0x20, 0x7F], // V W
    [0x63, 0x14, 0x08, 0x14, 0x63], [0x03, 0x04, 0x78, 0x04, 0x03], // X Y
    [0x61, 0x51, 0x49, 0x45, 0x43], [0x00, 0x00, 0x7F, 0x41, 0x41], // Z [
    [0x02, 0x04, 0x08, 0x10, 0x20], [0x41, 0x41, 0x7F, 0x00, 0x00], // \ ]
    [0x04, 0x02, 0x01, 0x02, 0x04], [0x40, 0x40, 0x40, 0x40, 0x40], // ^ _
    [0x00, 0x01, 0x02, 0x04, 0x00], [0x20, 0x54, 0x54, 0x54, 0x78], // ` a
    [0x7F, 0x48, 0x44, 0x44, 0x38], [0x38, 0x44, 0x44, 0x44, 0x20], // b c
    [0x38, 0x44, 0x44, 0x48, 0x7F], [0x38, 0x54, 0x54, 0x54, 0x18], // d e
    [0x08, 0x7E, 0x09, 0x01, 0x02], [0x08, 0x14, 0x54, 0x54, 0x3C], // f g
    [0x7F, 0x08, 0x04, 0x04, 0x78], [0x00, 0x44, 0x7D, 0x40, 0x00], // h i
    [0x20, 0x40, 0x44, 0x3D, 0x00], [0x00, 0x7F, 0x10, 0x28, 0x44], // j k
    [0x00, 0x41, 0x7F, 0x40, 0x00], [0x7C, 0x04, 0x18, 0x04, 0x78], // l m
    [0x7C, 0x08, 0x04, 0x04, 0x78], [0x38, 0x44, 0x44, 0x44, 0x38], // n o
    [0x7C, 0x14, 0x14, 0x14, 0x08], [0x08, 0x14, 0x14, 0x18, 0x7C], // p q
    [0x7C, 0x08, 0x04, 0x04, 0x08], [0x48, 0x54, 0x54, 0x54, 0x20], // r s
    [0x04, 0x3F, 0x44, 0x40, 0x20], [0x3C, 0x40, 0x40, 0x20, 0x7C], // t u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], [0x3C, 0x40, 0x30, 0x40, 0x3C], // v w
    [0x44, 0x28, 0x10, 0x28, 0x44], [0x0C, 0x50, 0x50, 0x50, 0x3C], // x y
    [0x44, 0x64, 0x54, 0x4C, 0x44], [0x00, 0x08, 0x36, 0x41, 0x00], // z {
    [0x00, 0x00, 0x7F, 0x00, 0x00], [0x00, 0x41, 0x36, 0x08, 0x00], // | }
    [0x08, 0x04, 0x08, 0x10, 0x08],                                 // ~
];

/// Characters outside printable ASCII render as `?`.
fn glyph(c: char) -> &'static [u8; 5] {
    let code = u32::from(c);
    let index = if (u32::from(FIRST)..=u32::from(LAST)).contains(&code) {
        code - u32::from(FIRST)
    } else {
        u32::from(b'?' - FIRST)
    };
    &GLYPHS[index as usize]
}

/// Integer pixel scale for a requested point size; 8 maps to 1.
pub fn scale_for(size: u32) -> u32 {
    ((size as f32 / 8.0).round() as u32).max(1)
}

/// Renders `text` into a full-coverage mask, one line per `\n`.
///
/// The mask spans the layout box, not just the ink; callers crop it.
/// Returns `None` for text with no lines or only empty lines.
pub fn render_mask(text: &str, size: u32) -> Option<GrayImage> {
    let scale = scale_for(size);
    let lines: Vec<&str> = text.split('\n').collect();
    let columns = lines.iter().map(|l| l.chars().count() as u32).max()?;
    if columns == 0 {
        return None;
    }

    let width = columns * ADVANCE * scale;
    let height = lines.len() as u32 * LINE_HEIGHT * scale;
    let mut mask = GrayImage::new(width, height);

    for (row, line) in lines.iter().enumerate() {
        let top = row as u32 * LINE_HEIGHT * scale;
        for (col, c) in line.chars().enumerate() {
            let left = col as u32 * ADVANCE * scale;
            for (gx, bits) in glyph(c).iter().enumerate() {
                for gy in 0..GLYPH_HEIGHT {
                    if bits & (1 << gy) == 0 {
                        continue;
                    }
                    let px = left + gx as u32 * scale;
                    let py = top + gy * scale;
                    for sy in 0..scale {
                        for sx in 0..scale {
                            mask.put_pixel(px + sx, py + sy, Luma([255]));
                        }
                    }
                }
            }
        }
    }

    Some(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p.0[0] > 0).count()
    }

    #[test]
    fn test_scale_for_size() {
        assert_eq!(scale_for(1), 1);
        assert_eq!(scale_for(8), 1);
        assert_eq!(scale_for(24), 3);
        assert_eq!(scale_for(200), 25);
    }

    #[test]
    fn test_single_glyph_layout() {
        let mask = render_mask("I", 8).unwrap();
        assert_eq!(mask.dimensions(), (ADVANCE, LINE_HEIGHT));
        // 'I': top bar, stem, bottom bar
        assert_eq!(ink(&mask), 3 + 7 + 3 - 2);
        assert_eq!(mask.get_pixel(2, 3).0[0], 255);
    }

    #[test]
    fn test_scaled_glyph_has_scaled_ink() {
        let small = render_mask("A", 8).unwrap();
        let big = render_mask("A", 16).unwrap();
        assert_eq!(ink(&big), ink(&small) * 4);
    }

    #[test]
    fn test_multiline_and_blank_text() {
        let mask = render_mask("ab\nc", 8).unwrap();
        assert_eq!(mask.dimensions(), (2 * ADVANCE, 2 * LINE_HEIGHT));
        assert!(render_mask("", 8).is_none());
        assert!(render_mask("\n", 8).is_none());
    }

    #[test]
    fn test_non_ascii_falls_back_to_question_mark() {
        assert_eq!(glyph('é'), glyph('?'));
        assert_eq!(glyph('\t'), glyph('?'));
    }
}
