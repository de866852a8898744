//! Stamp registry and stamp compositing.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::{self, FilterType};
use log::{debug, info, warn};

use crate::canvas::Canvas;
use crate::error::ResourceError;

/// Default bounding box for user-supplied stamps.
pub const DEFAULT_MAX_EDGE: u32 = 64;

/// Named RGBA images pasted onto the canvas through their own alpha.
#[derive(Debug, Clone)]
pub struct StampRegistry {
    stamps: BTreeMap<String, RgbaImage>,
    max_edge: u32,
}

impl Default for StampRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EDGE)
    }
}

impl StampRegistry {
    pub fn new(max_edge: u32) -> Self {
        Self {
            stamps: BTreeMap::new(),
            max_edge: max_edge.max(1),
        }
    }

    /// Loads every `*.png` in `dir`, keyed by file name.
    ///
    /// Files that fail to decode are skipped with a warning. Returns how
    /// many stamps were added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ResourceError> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            match image::open(&path) {
                Ok(img) => {
                    info!("Loaded stamp {} from {}", name, path.display());
                    self.stamps.insert(name, img.to_rgba8());
                    loaded += 1;
                }
                Err(err) => warn!("Skipping unreadable stamp {}: {}", path.display(), err),
            }
        }
        Ok(loaded)
    }

    /// Adds a user-supplied stamp.
    ///
    /// The image is shrunk to fit the registry's bounding box with its
    /// aspect ratio kept. Names already taken get `_1`, `_2`, ... appended
    /// before the extension. Returns the name the stamp was stored under.
    pub fn register(&mut self, name: &str, image: RgbaImage) -> String {
        let name = self.unique_name(name);
        let image = fit_within(image, self.max_edge);
        debug!("Registered stamp {} ({}x{})", name, image.width(), image.height());
        self.stamps.insert(name.clone(), image);
        name
    }

    /// Decodes an image file and registers it under its file name.
    pub fn register_file(&mut self, path: &Path) -> Result<String, ResourceError> {
        let image = image::open(path)?.to_rgba8();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "stamp.png".to_string());
        Ok(self.register(&name, image))
    }

    pub fn get(&self, name: &str) -> Option<&RgbaImage> {
        self.stamps.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.stamps.contains_key(name)
    }

    /// Stamp names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stamps.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn max_edge(&self) -> u32 {
        self.max_edge
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.stamps.contains_key(name) {
            return name.to_string();
        }
        let (stem, ext) = match name.rfind('.') {
            Some(dot) if dot > 0 => name.split_at(dot),
            _ => (name, ""),
        };
        (1..)
            .map(|n| format!("{stem}_{n}{ext}"))
            .find(|candidate| !self.stamps.contains_key(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

/// Shrinks `image` so neither side exceeds `max_edge`, keeping the aspect
/// ratio. Smaller images are returned untouched.
fn fit_within(image: RgbaImage, max_edge: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w <= max_edge && h <= max_edge {
        return image;
    }
    let scale = (max_edge as f64 / w as f64).min(max_edge as f64 / h as f64);
    let new_w = ((w as f64 * scale).round() as u32).clamp(1, max_edge);
    let new_h = ((h as f64 * scale).round() as u32).clamp(1, max_edge);
    imageops::resize(&image, new_w, new_h, FilterType::Lanczos3)
}

/// Composites `stamp` centred on `center`, masked by its own alpha.
pub fn apply_stamp(canvas: &mut Canvas, stamp: &RgbaImage, center: (i32, i32)) {
    let offset = (
        center.0 - (stamp.width() / 2) as i32,
        center.1 - (stamp.height() / 2) as i32,
    );
    canvas.blit(stamp, offset, Some(stamp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::color::{BLACK, TRANSPARENT, WHITE};

    fn dot_stamp() -> RgbaImage {
        let mut stamp = RgbaImage::from_pixel(3, 3, TRANSPARENT);
        stamp.put_pixel(1, 1, BLACK);
        stamp
    }

    #[test]
    fn test_register_shrinks_large_images() {
        let mut registry = StampRegistry::new(64);
        let name = registry.register("wide.png", RgbaImage::from_pixel(256, 128, BLACK));
        assert_eq!(registry.get(&name).unwrap().dimensions(), (64, 32));

        let name = registry.register("tiny.png", RgbaImage::from_pixel(10, 20, BLACK));
        assert_eq!(registry.get(&name).unwrap().dimensions(), (10, 20));
    }

    #[test]
    fn test_register_deduplicates_names() {
        let mut registry = StampRegistry::default();
        assert_eq!(registry.register("star.png", dot_stamp()), "star.png");
        assert_eq!(registry.register("star.png", dot_stamp()), "star_1.png");
        assert_eq!(registry.register("star.png", dot_stamp()), "star_2.png");
        assert_eq!(registry.register("noext", dot_stamp()), "noext");
        assert_eq!(registry.register("noext", dot_stamp()), "noext_1");
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_apply_stamp_is_centred_and_masked() {
        let mut canvas = Canvas::new(5, 5).unwrap();
        apply_stamp(&mut canvas, &dot_stamp(), (2, 2));
        assert_eq!(canvas.get_pixel(2, 2).unwrap(), BLACK);
        assert_eq!(canvas.get_pixel(1, 1).unwrap(), WHITE);
        assert_eq!(canvas.get_pixel(3, 3).unwrap(), WHITE);
    }

    #[test]
    fn test_apply_stamp_at_edge_is_clipped() {
        let mut canvas = Canvas::new(2, 2).unwrap();
        let stamp = RgbaImage::from_pixel(4, 4, BLACK);
        apply_stamp(&mut canvas, &stamp, (0, 0));
        assert!(canvas.image().pixels().all(|p| *p == BLACK));
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let mut registry = StampRegistry::default();
        let result = registry.load_dir(Path::new("/definitely/not/a/stamp/dir"));
        assert!(matches!(result, Err(ResourceError::Io(_))));
    }
}
