//! Tool engine: the pixel algorithms behind each drawing tool.
//!
//! Every algorithm takes the canvas plus only the parameters it needs and
//! mutates the canvas in place. Geometry that falls outside the canvas is
//! clipped, never reported.

pub mod bitmap_font;
pub mod eraser;
pub mod fill;
pub mod pen;
pub mod shapes;
pub mod spray;
pub mod stamp;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::{Color, color};
pub use shapes::Shape;
pub use stamp::StampRegistry;
pub use text::{TextRenderer, TextRequest};

/// The active tool, carrying only the parameters that tool needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Pen,
    Spray,
    Line,
    Rectangle,
    Ellipse,
    Bucket,
    Stamp,
    Text(TextRequest),
    Eraser,
}

/// Fieldless tool discriminant, used for naming and in events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Pen,
    Spray,
    Line,
    Rectangle,
    Ellipse,
    Bucket,
    Stamp,
    Text,
    Eraser,
}

/// How a tool behaves across a pointer-down/up gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStyle {
    /// Mutates on every pointer event, snapshots on release.
    Continuous,
    /// Previews while dragging, mutates and snapshots on release.
    Shape(Shape),
    /// Mutates and snapshots once on press.
    OneShot,
}

impl Tool {
    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Pen => ToolKind::Pen,
            Tool::Spray => ToolKind::Spray,
            Tool::Line => ToolKind::Line,
            Tool::Rectangle => ToolKind::Rectangle,
            Tool::Ellipse => ToolKind::Ellipse,
            Tool::Bucket => ToolKind::Bucket,
            Tool::Stamp => ToolKind::Stamp,
            Tool::Text(_) => ToolKind::Text,
            Tool::Eraser => ToolKind::Eraser,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        match self {
            Tool::Pen | Tool::Spray => StrokeStyle::Continuous,
            Tool::Line => StrokeStyle::Shape(Shape::Line),
            Tool::Rectangle => StrokeStyle::Shape(Shape::Rectangle),
            Tool::Ellipse => StrokeStyle::Shape(Shape::Ellipse),
            Tool::Bucket | Tool::Stamp | Tool::Text(_) | Tool::Eraser => StrokeStyle::OneShot,
        }
    }
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Pen => "pen",
            ToolKind::Spray => "spray",
            ToolKind::Line => "line",
            ToolKind::Rectangle => "rect",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Bucket => "bucket",
            ToolKind::Stamp => "stamp",
            ToolKind::Text => "text",
            ToolKind::Eraser => "eraser",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tool: {0}")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    /// Accepts the canonical names plus the toolbar aliases
    /// (`square`, `circle`, `paintbucket`, `stamps`).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "pen" => Ok(Tool::Pen),
            "spray" => Ok(Tool::Spray),
            "line" => Ok(Tool::Line),
            "rect" | "rectangle" | "square" => Ok(Tool::Rectangle),
            "ellipse" | "circle" => Ok(Tool::Ellipse),
            "bucket" | "paintbucket" | "fill" => Ok(Tool::Bucket),
            "stamp" | "stamps" => Ok(Tool::Stamp),
            "text" => Ok(Tool::Text(TextRequest::default())),
            "eraser" => Ok(Tool::Eraser),
            _ => Err(UnknownTool(name.to_string())),
        }
    }
}

/// Everything a stroke needs besides geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolState {
    pub tool: Tool,
    brush_size: u32,
    pub color: Color,
    /// Name of the selected stamp in the registry.
    pub stamp: Option<String>,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            brush_size: 3,
            color: color::BLACK,
            stamp: None,
        }
    }
}

impl ToolState {
    pub fn new(brush_size: u32, color: Color) -> Self {
        Self {
            brush_size: brush_size.max(1),
            color,
            ..Self::default()
        }
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Brush width is always positive; zero is raised to one.
    pub fn set_brush_size(&mut self, size: u32) {
        self.brush_size = size.max(1);
    }
}
