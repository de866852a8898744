#![warn(clippy::all, rust_2018_idioms)]

pub mod canvas;
pub mod document;
pub mod error;
pub mod event;
pub mod history;
pub mod preview;
pub mod session;
pub mod state;
pub mod tool;

pub use canvas::{Canvas, Color};
pub use document::Document;
pub use error::{CanvasError, HistoryError, ResourceError, SessionError};
pub use event::{DocumentEvent, EditorEvent, EventBus, EventHandler, EventRecorder};
pub use history::History;
pub use preview::Preview;
pub use session::Session;
pub use state::{EditorState, SessionConfig};
pub use tool::{Shape, StampRegistry, TextRenderer, TextRequest, Tool, ToolKind, ToolState};
