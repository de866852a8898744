//! Session controller: the boundary the front end talks to.
//!
//! The front end forwards pointer events, tool changes and undo requests
//! here. The session routes each event to the active tool, keeps the shape
//! preview up to date, records history at stroke boundaries and emits an
//! [`EditorEvent`] for every observable outcome.
//!
//! Tool switches requested while a stroke is active are deferred to the end
//! of the stroke; the latest request wins. Undo and redo are ignored while a
//! stroke is active.

use std::path::Path;

use egui::{ColorImage, Pos2};
use image::RgbaImage;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::canvas::color::ColorParseError;
use crate::canvas::{Canvas, Color, color};
use crate::document::Document;
use crate::error::{CanvasError, ResourceError, SessionError};
use crate::event::{DocumentEvent, EditorEvent, EventBus, EventHandler};
use crate::history::History;
use crate::preview::Preview;
use crate::state::{ActiveStroke, EditorState, SessionConfig};
use crate::tool::{
    self, StampRegistry, StrokeStyle, TextRenderer, TextRequest, Tool, ToolKind, ToolState, UnknownTool,
};

/// Pixel under a pointer position.
fn to_pixel(pos: Pos2) -> (i32, i32) {
    (pos.x.floor() as i32, pos.y.floor() as i32)
}

/// One open document plus everything needed to edit it.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    document: Document,
    history: History,
    preview: Preview,
    state: EditorState,
    tools: ToolState,
    /// Tool requested mid-stroke, applied when the stroke ends.
    pending_tool: Option<Tool>,
    stamps: StampRegistry,
    text: TextRenderer,
    palette: Vec<Color>,
    rng: StdRng,
    events: EventBus,
}

impl Session {
    /// Opens a blank document using `config`.
    ///
    /// Stamps are scanned from the configured directory when it exists and
    /// fonts are resolved from the configured list; neither failing is fatal.
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let document = Document::new(config.width, config.height)?;
        let mut history = History::new(config.history_capacity);
        history.reset(document.canvas());

        let mut stamps = StampRegistry::new(config.stamp_max_edge);
        if let Some(dir) = config.stamps_dir.as_deref() {
            if dir.is_dir() {
                match stamps.load_dir(dir) {
                    Ok(count) => info!("Loaded {} stamps from {}", count, dir.display()),
                    Err(err) => warn!("Failed to scan stamps in {}: {}", dir.display(), err),
                }
            } else {
                debug!("Stamp directory {} not found", dir.display());
            }
        }

        let text = TextRenderer::load(&config.fonts);
        let tools = ToolState::new(config.brush_size, config.initial_color()?);
        let palette = config.palette_colors();

        Ok(Self {
            config,
            document,
            history,
            preview: Preview::new(),
            state: EditorState::Idle,
            tools,
            pending_tool: None,
            stamps,
            text,
            palette,
            rng: StdRng::from_entropy(),
            events: EventBus::new(),
        })
    }

    // --- pointer input ---

    /// Starts a stroke with the current tool.
    ///
    /// One-shot tools (bucket, stamp, text, eraser) act and commit here.
    pub fn pointer_down(&mut self, pos: Pos2) {
        if self.state.is_stroking() {
            debug!("Ignoring pointer down during an active stroke");
            return;
        }

        let point = to_pixel(pos);
        let tool = self.tools.tool.clone();
        let kind = tool.kind();
        if let Err(err) = self
            .state
            .transition_to(EditorState::Stroking(ActiveStroke::new(tool.clone(), point)))
        {
            warn!("Failed to start stroke: {}", err);
            return;
        }
        self.events.emit(EditorEvent::StrokeStarted { tool: kind });

        match tool.stroke_style() {
            StrokeStyle::Continuous => self.paint_continuous(kind, point, point),
            StrokeStyle::Shape(shape) => {
                self.preview.render(
                    self.document.canvas(),
                    shape,
                    point,
                    point,
                    self.tools.brush_size(),
                    self.tools.color,
                );
            }
            StrokeStyle::OneShot => {
                if self.apply_one_shot(&tool, point) {
                    self.commit(kind);
                } else {
                    debug!("{} at {:?} changed nothing", kind, point);
                }
            }
        }
    }

    /// Extends the active stroke. Pointer motion while idle is ignored.
    pub fn pointer_move(&mut self, pos: Pos2) {
        let Some(stroke) = self.state.stroke() else {
            return;
        };
        let point = to_pixel(pos);
        let kind = stroke.tool.kind();
        let (start, last) = (stroke.start, stroke.last);

        match stroke.tool.stroke_style() {
            StrokeStyle::Continuous => self.paint_continuous(kind, last, point),
            StrokeStyle::Shape(shape) => {
                self.preview.render(
                    self.document.canvas(),
                    shape,
                    start,
                    point,
                    self.tools.brush_size(),
                    self.tools.color,
                );
            }
            StrokeStyle::OneShot => {}
        }

        if let Some(stroke) = self.state.stroke_mut() {
            stroke.last = point;
        }
    }

    /// Ends the active stroke, committing shapes and freehand paint.
    pub fn pointer_up(&mut self, pos: Pos2) {
        let point = to_pixel(pos);
        let stroke = match self.state.transition_to(EditorState::Idle) {
            Ok(EditorState::Stroking(stroke)) => stroke,
            _ => {
                debug!("Ignoring pointer up without an active stroke");
                return;
            }
        };
        let kind = stroke.tool.kind();

        match stroke.tool.stroke_style() {
            StrokeStyle::Continuous => {
                if kind == ToolKind::Pen && point != stroke.last {
                    self.paint_continuous(kind, stroke.last, point);
                }
                self.commit(kind);
            }
            StrokeStyle::Shape(shape) => {
                self.preview.clear();
                tool::shapes::draw_shape(
                    self.document.canvas_mut(),
                    shape,
                    stroke.start,
                    point,
                    self.tools.brush_size(),
                    self.tools.color,
                );
                self.commit(kind);
            }
            StrokeStyle::OneShot => {}
        }

        self.apply_pending_tool();
    }

    /// Aborts the active stroke without recording history.
    ///
    /// Shape strokes drop their preview. Freehand strokes are rolled back to
    /// the last committed state. One-shot tools have already committed, so
    /// cancelling them only ends the stroke. Returns `false` when idle.
    pub fn cancel_stroke(&mut self) -> bool {
        let stroke = match self.state.transition_to(EditorState::Idle) {
            Ok(EditorState::Stroking(stroke)) => stroke,
            _ => return false,
        };
        let kind = stroke.tool.kind();

        match stroke.tool.stroke_style() {
            StrokeStyle::Shape(_) => self.preview.clear(),
            StrokeStyle::Continuous => {
                if let Some(baseline) = self.history.baseline() {
                    *self.document.canvas_mut() = baseline.clone();
                }
            }
            StrokeStyle::OneShot => {}
        }

        info!("Cancelled {} stroke", kind);
        self.events.emit(EditorEvent::StrokeCancelled { tool: kind });
        self.apply_pending_tool();
        true
    }

    fn paint_continuous(&mut self, kind: ToolKind, from: (i32, i32), to: (i32, i32)) {
        let width = self.tools.brush_size();
        let color = self.tools.color;
        let canvas = self.document.canvas_mut();
        match kind {
            ToolKind::Pen => tool::pen::draw_segment(canvas, from, to, width, color),
            ToolKind::Spray => {
                tool::spray::spray(canvas, to, width, color, &mut self.rng);
            }
            _ => {}
        }
    }

    /// Runs a press-and-done tool. Returns whether the canvas changed.
    fn apply_one_shot(&mut self, active: &Tool, point: (i32, i32)) -> bool {
        let canvas = self.document.canvas_mut();
        match active {
            Tool::Bucket => tool::fill::flood_fill(canvas, point, self.tools.color) > 0,
            Tool::Stamp => {
                match self.tools.stamp.as_deref().and_then(|name| self.stamps.get(name)) {
                    Some(stamp) => {
                        tool::stamp::apply_stamp(canvas, stamp, point);
                        true
                    }
                    None => {
                        debug!("Stamp tool used with no stamp selected");
                        false
                    }
                }
            }
            Tool::Text(request) => {
                let request = TextRequest {
                    text: request.text.clone(),
                    size: self.config.clamp_text_size(request.size),
                };
                tool::text::render_text(canvas, &self.text, &request, point, self.tools.color)
            }
            Tool::Eraser => {
                tool::eraser::erase(canvas, point, self.tools.brush_size());
                true
            }
            Tool::Pen | Tool::Spray | Tool::Line | Tool::Rectangle | Tool::Ellipse => false,
        }
    }

    fn commit(&mut self, kind: ToolKind) {
        self.history.snapshot(self.document.canvas());
        self.document.mark_modified();
        self.events.emit(EditorEvent::StrokeCommitted { tool: kind });
        self.emit_history();
    }

    fn emit_history(&self) {
        self.events.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    // --- tool state ---

    /// Switches tools, or defers the switch if a stroke is active.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.state.is_stroking() {
            debug!("Deferring switch to {} until the stroke ends", tool.name());
            self.events.emit(EditorEvent::ToolSwitchDeferred { requested: tool.kind() });
            self.pending_tool = Some(tool);
            return;
        }
        self.apply_tool(tool);
    }

    /// Switches tools by toolbar name, e.g. `"pen"` or `"circle"`.
    pub fn set_tool_by_name(&mut self, name: &str) -> Result<(), UnknownTool> {
        let tool = match name.parse::<Tool>()? {
            // Keep the configured text when re-selecting the text tool.
            Tool::Text(_) => match &self.tools.tool {
                Tool::Text(request) => Tool::Text(request.clone()),
                _ => Tool::Text(TextRequest::default()),
            },
            tool => tool,
        };
        self.set_tool(tool);
        Ok(())
    }

    /// Selects the text tool with `text` at `size`, clamped to the
    /// configured range.
    pub fn set_text(&mut self, text: impl Into<String>, size: u32) {
        let size = self.config.clamp_text_size(size);
        self.set_tool(Tool::Text(TextRequest::new(text, size)));
    }

    fn apply_pending_tool(&mut self) {
        if let Some(tool) = self.pending_tool.take() {
            self.apply_tool(tool);
        }
    }

    fn apply_tool(&mut self, tool: Tool) {
        if tool == self.tools.tool {
            return;
        }
        let old = self.tools.tool.kind();
        let new = tool.kind();
        self.tools.tool = tool;
        info!("Tool changed from {} to {}", old, new);
        self.events.emit(EditorEvent::ToolChanged { old, new });
    }

    /// Sets the brush width, clamped to `1..=max_brush_size`.
    pub fn set_brush_size(&mut self, size: u32) {
        let clamped = self.config.clamp_brush_size(size);
        if clamped != size {
            debug!("Brush size {} clamped to {}", size, clamped);
        }
        self.tools.set_brush_size(clamped);
    }

    pub fn set_color(&mut self, color: Color) {
        self.tools.color = color;
    }

    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ColorParseError> {
        self.tools.color = color::parse_hex(hex)?;
        Ok(())
    }

    /// Picks a registered stamp for the stamp tool.
    pub fn select_stamp(&mut self, name: &str) -> Result<(), ResourceError> {
        if !self.stamps.contains(name) {
            warn!("Stamp {} is not registered", name);
            return Err(ResourceError::MissingStamp(name.to_string()));
        }
        self.tools.stamp = Some(name.to_string());
        Ok(())
    }

    /// Adds a user stamp, selects it and activates the stamp tool.
    ///
    /// Returns the name the stamp was stored under, which differs from
    /// `name` when that name was already taken.
    pub fn register_stamp(&mut self, name: &str, image: RgbaImage) -> String {
        let stored = self.stamps.register(name, image);
        self.activate_stamp(stored)
    }

    /// Decodes an image file and registers it as in [`Session::register_stamp`].
    pub fn register_stamp_file(&mut self, path: &Path) -> Result<String, ResourceError> {
        let stored = self.stamps.register_file(path)?;
        Ok(self.activate_stamp(stored))
    }

    fn activate_stamp(&mut self, stored: String) -> String {
        self.tools.stamp = Some(stored.clone());
        self.set_tool(Tool::Stamp);
        self.events.emit(EditorEvent::StampRegistered { name: stored.clone() });
        stored
    }

    pub fn set_text_renderer(&mut self, renderer: TextRenderer) {
        self.text = renderer;
    }

    /// Reseeds the spray scatter, making it reproducible.
    pub fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // --- output and documents ---

    /// What the front end should display: the preview while a shape is
    /// being dragged, the committed canvas otherwise.
    pub fn current_frame(&self) -> &Canvas {
        match self.preview.frame() {
            Some(frame) if self.state.is_stroking() => frame,
            _ => self.document.canvas(),
        }
    }

    pub fn frame_image(&self) -> ColorImage {
        self.current_frame().to_color_image()
    }

    /// Raw RGBA bytes of the committed canvas for an external encoder.
    pub fn export_document(&self) -> Vec<u8> {
        self.events.emit(EditorEvent::DocumentChanged(DocumentEvent::Exported {
            id: self.document.id(),
        }));
        self.document.export()
    }

    /// Replaces the document with decoded pixels from the front end.
    ///
    /// An active stroke is cancelled first. History starts over.
    pub fn load_document(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> Result<(), CanvasError> {
        let document = Document::from_raw(width, height, pixels)?;
        self.cancel_stroke();
        self.replace_document(document);
        self.events.emit(EditorEvent::DocumentChanged(DocumentEvent::Loaded {
            id: self.document.id(),
        }));
        self.emit_history();
        Ok(())
    }

    /// Starts over with a blank document of the configured size.
    pub fn new_document(&mut self) -> Result<(), CanvasError> {
        let document = Document::new(self.config.width, self.config.height)?;
        self.cancel_stroke();
        self.replace_document(document);
        self.events.emit(EditorEvent::DocumentChanged(DocumentEvent::Created {
            id: self.document.id(),
        }));
        self.emit_history();
        Ok(())
    }

    fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.history.reset(self.document.canvas());
        self.preview.clear();
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    pub fn mark_saved(&mut self) {
        self.document.mark_saved();
    }

    // --- history ---

    /// Steps back one committed state. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        if self.state.is_stroking() {
            debug!("Ignoring undo during an active stroke");
            return false;
        }
        match self.history.undo(self.document.canvas_mut()) {
            Ok(()) => {
                self.document.mark_modified();
                self.emit_history();
                true
            }
            Err(err) => {
                debug!("Undo: {}", err);
                false
            }
        }
    }

    /// Re-applies the last undone state. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        if self.state.is_stroking() {
            debug!("Ignoring redo during an active stroke");
            return false;
        }
        match self.history.redo(self.document.canvas_mut()) {
            Ok(()) => {
                self.document.mark_modified();
                self.emit_history();
                true
            }
            Err(err) => {
                debug!("Redo: {}", err);
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn set_history_capacity(&mut self, capacity: usize) {
        self.history.set_capacity(capacity);
        self.emit_history();
    }

    // --- accessors ---

    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.events.subscribe(handler);
    }

    pub fn canvas(&self) -> &Canvas {
        self.document.canvas()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn tool(&self) -> &Tool {
        &self.tools.tool
    }

    pub fn tool_state(&self) -> &ToolState {
        &self.tools
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_stroking(&self) -> bool {
        self.state.is_stroking()
    }

    pub fn stamps(&self) -> &StampRegistry {
        &self.stamps
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::color::{BLACK, WHITE};
    use egui::pos2;

    fn session(width: u32, height: u32) -> Session {
        let config = SessionConfig {
            width,
            height,
            stamps_dir: None,
            fonts: Vec::new(),
            ..SessionConfig::default()
        };
        Session::new(config).unwrap()
    }

    #[test]
    fn test_pointer_positions_are_floored() {
        assert_eq!(to_pixel(pos2(3.9, 0.2)), (3, 0));
        assert_eq!(to_pixel(pos2(-0.5, 2.0)), (-1, 2));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SessionConfig { history_capacity: 0, ..SessionConfig::default() };
        assert!(matches!(Session::new(config), Err(SessionError::Config(_))));
    }

    #[test]
    fn test_pen_click_commits_dot() {
        let mut session = session(5, 5);
        session.set_brush_size(1);
        session.pointer_down(pos2(2.0, 2.0));
        session.pointer_up(pos2(2.0, 2.0));

        assert_eq!(session.canvas().get_pixel(2, 2).unwrap(), BLACK);
        assert!(session.can_undo());
        assert!(session.is_modified());
    }

    #[test]
    fn test_cancelled_pen_stroke_rolls_back() {
        let mut session = session(10, 10);
        session.pointer_down(pos2(1.0, 1.0));
        session.pointer_move(pos2(8.0, 8.0));
        assert_ne!(session.canvas().get_pixel(5, 5).unwrap(), WHITE);

        assert!(session.cancel_stroke());
        assert!(session.canvas().image().pixels().all(|p| *p == WHITE));
        assert!(!session.can_undo());
        assert!(!session.cancel_stroke());
    }

    #[test]
    fn test_stamp_without_selection_is_noop() {
        let mut session = session(5, 5);
        session.set_tool(Tool::Stamp);
        session.pointer_down(pos2(2.0, 2.0));
        session.pointer_up(pos2(2.0, 2.0));
        assert!(!session.can_undo());
        assert!(session.select_stamp("missing.png").is_err());
    }
}
