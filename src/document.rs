use log::info;
use uuid::Uuid;

use crate::canvas::Canvas;
use crate::error::CanvasError;

/// The canvas being edited, with its identity and dirty flag.
#[derive(Debug, Clone)]
pub struct Document {
    id: Uuid,
    canvas: Canvas,
    modified: bool,
}

impl Document {
    /// Blank white document.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        let document = Self::from_canvas(Canvas::new(width, height)?);
        info!("Created {}x{} document {}", width, height, document.id);
        Ok(document)
    }

    /// Wraps pixels handed over by an external loader.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CanvasError> {
        let document = Self::from_canvas(Canvas::from_raw(width, height, pixels)?);
        info!("Loaded {}x{} document {}", width, height, document.id);
        Ok(document)
    }

    pub fn from_canvas(canvas: Canvas) -> Self {
        Self {
            id: Uuid::new_v4(),
            canvas,
            modified: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    /// Clears the dirty flag once the collaborator has written the pixels out.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Copy of the pixels as tightly packed RGBA rows.
    pub fn export(&self) -> Vec<u8> {
        self.canvas.as_raw().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_clean() {
        let doc = Document::new(4, 3).unwrap();
        assert!(!doc.is_modified());
        assert_eq!(doc.canvas().dimensions(), (4, 3));
        assert_eq!(doc.export().len(), 4 * 3 * 4);
    }

    #[test]
    fn test_documents_get_distinct_ids() {
        let a = Document::new(1, 1).unwrap();
        let b = Document::new(1, 1).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_dirty_flag() {
        let mut doc = Document::new(2, 2).unwrap();
        doc.mark_modified();
        assert!(doc.is_modified());
        doc.mark_saved();
        assert!(!doc.is_modified());
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert_eq!(
            Document::from_raw(2, 2, vec![0; 15]).unwrap_err(),
            CanvasError::BufferSizeMismatch { expected: 16, actual: 15 }
        );
    }
}
