use image::Rgba;
use thiserror::Error;

/// 8-bit straight-alpha RGBA.
pub type Color = Rgba<u8>;

pub const WHITE: Color = Rgba([255, 255, 255, 255]);
pub const BLACK: Color = Rgba([0, 0, 0, 255]);
pub const TRANSPARENT: Color = Rgba([0, 0, 0, 0]);

/// Background the eraser paints with. The canvas has no transparency model.
pub const BACKGROUND: Color = WHITE;

/// The sixteen swatches offered by default.
pub const DEFAULT_PALETTE: [&str; 16] = [
    "#000000", "#FFFFFF", "#A1A192", "#E6EAD8", "#980000", "#FF3300", "#E68B2C", "#FFAA00",
    "#9B6600", "#FFFF00", "#008D00", "#00FF00", "#003399", "#14A5F4", "#6487DC", "#FF00FF",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Color must have 6 or 8 hex digits: {0}")]
    BadLength(String),
    #[error("Invalid hex digit in color: {0}")]
    BadDigit(String),
}

/// Parses `#RRGGBB` or `#RRGGBBAA`. Six-digit colors are opaque.
pub fn parse_hex(text: &str) -> Result<Color, ColorParseError> {
    let digits = text
        .trim()
        .strip_prefix('#')
        .ok_or_else(|| ColorParseError::MissingHash(text.to_string()))?;

    if digits.len() != 6 && digits.len() != 8 {
        return Err(ColorParseError::BadLength(text.to_string()));
    }

    let mut channels = [255u8; 4];
    for (i, channel) in channels.iter_mut().enumerate().take(digits.len() / 2) {
        let pair = digits
            .get(i * 2..i * 2 + 2)
            .ok_or_else(|| ColorParseError::BadDigit(text.to_string()))?;
        *channel =
            u8::from_str_radix(pair, 16).map_err(|_| ColorParseError::BadDigit(text.to_string()))?;
    }
    Ok(Rgba(channels))
}

/// Formats as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
pub fn to_hex(color: Color) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

pub fn default_palette() -> Vec<Color> {
    DEFAULT_PALETTE
        .iter()
        .filter_map(|hex| parse_hex(hex).ok())
        .collect()
}

/// Compares the color channels only, ignoring alpha.
#[inline]
pub fn same_rgb(a: Color, b: Color) -> bool {
    a.0[..3] == b.0[..3]
}

/// Forces full opacity.
#[inline]
pub fn opaque(color: Color) -> Color {
    Rgba([color.0[0], color.0[1], color.0[2], 255])
}
