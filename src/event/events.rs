use uuid::Uuid;

use crate::tool::ToolKind;

/// Post-condition events emitted by the session after each operation.
///
/// Presentation side effects (sound cues, title-bar dirty markers, toolbar
/// highlighting) subscribe to these instead of being called from the
/// drawing code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    ToolChanged {
        old: ToolKind,
        new: ToolKind,
    },
    /// A tool switch arrived mid-stroke and will apply at pointer-up.
    ToolSwitchDeferred {
        requested: ToolKind,
    },
    StrokeStarted {
        tool: ToolKind,
    },
    /// The stroke mutated the canvas and a history entry was recorded.
    StrokeCommitted {
        tool: ToolKind,
    },
    StrokeCancelled {
        tool: ToolKind,
    },
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
    DocumentChanged(DocumentEvent),
    StampRegistered {
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Created { id: Uuid },
    Loaded { id: Uuid },
    Exported { id: Uuid },
}
