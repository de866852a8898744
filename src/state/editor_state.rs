//! The stroke state machine driven by pointer events.
//!
//! A stroke is one gesture from pointer-down to pointer-up. The machine has
//! two states and two legal transitions:
//!
//! ```text
//!            pointer down
//!   ┌──────┐ ───────────► ┌───────────┐
//!   │ Idle │              │ Stroking  │ ◄─┐ pointer move
//!   └──────┘ ◄─────────── └───────────┘ ──┘
//!            pointer up / cancel
//! ```
//!
//! The session owns the only instance and goes through
//! [`EditorState::transition_to`] so an illegal pair is reported instead of
//! silently overwriting a live stroke.

use thiserror::Error;

use crate::tool::Tool;

/// Geometry and tool of the gesture in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStroke {
    /// Tool captured at pointer-down; later tool switches do not affect it.
    pub tool: Tool,
    pub start: (i32, i32),
    pub last: (i32, i32),
}

impl ActiveStroke {
    pub fn new(tool: Tool, start: (i32, i32)) -> Self {
        Self {
            tool,
            start,
            last: start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Stroking(ActiveStroke),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateTransitionError {
    #[error("Cannot go from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl EditorState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &EditorState) -> bool {
        matches!(
            (self, new_state),
            (EditorState::Idle, EditorState::Stroking(_)) | (EditorState::Stroking(_), EditorState::Idle)
        )
    }

    /// Replaces the state if the transition is legal, returning the old one.
    pub fn transition_to(&mut self, new_state: EditorState) -> Result<EditorState, StateTransitionError> {
        if !self.can_transition_to(&new_state) {
            return Err(StateTransitionError::InvalidTransition {
                from: self.name(),
                to: new_state.name(),
            });
        }
        Ok(std::mem::replace(self, new_state))
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::Stroking(_) => "stroking",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self, EditorState::Stroking(_))
    }

    pub fn stroke(&self) -> Option<&ActiveStroke> {
        match self {
            EditorState::Stroking(stroke) => Some(stroke),
            EditorState::Idle => None,
        }
    }

    pub fn stroke_mut(&mut self) -> Option<&mut ActiveStroke> {
        match self {
            EditorState::Stroking(stroke) => Some(stroke),
            EditorState::Idle => None,
        }
    }
}
