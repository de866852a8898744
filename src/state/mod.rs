mod config;
mod editor_state;

pub use config::{ConfigError, ConfigResult, SessionConfig};
pub use editor_state::{ActiveStroke, EditorState, StateTransitionError};
