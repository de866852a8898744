use crate::canvas::{Canvas, Color};
use crate::tool::Shape;
use crate::tool::shapes;

/// Disposable rendering of the committed canvas with an in-progress shape
/// drawn on top.
///
/// Each call to [`Preview::render`] starts again from the committed canvas,
/// so earlier extents of the drag never accumulate.
#[derive(Debug, Clone, Default)]
pub struct Preview {
    frame: Option<Canvas>,
}

impl Preview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the preview with `committed` plus `shape` drawn from
    /// `start` to `current`.
    pub fn render(
        &mut self,
        committed: &Canvas,
        shape: Shape,
        start: (i32, i32),
        current: (i32, i32),
        width: u32,
        color: Color,
    ) -> &Canvas {
        let frame = self.frame.insert(committed.clone());
        shapes::draw_shape(frame, shape, start, current, width, color);
        frame
    }

    pub fn frame(&self) -> Option<&Canvas> {
        self.frame.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.frame.is_some()
    }

    pub fn clear(&mut self) {
        self.frame = None;
    }
}
