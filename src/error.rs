use thiserror::Error;

/// Errors raised by the pixel buffer itself.
///
/// The tool engine clips every write before it reaches the buffer, so
/// `OutOfBounds` only surfaces to callers using the raw accessors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },

    #[error("Invalid canvas dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Errors for stamps and fonts the engine looks up by name or path.
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Stamp not found: {0}")]
    MissingStamp(String),

    #[error("No usable font in the fallback list")]
    NoFontAvailable,

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to read resource: {0}")]
    Io(#[from] std::io::Error),
}

/// Returned by the history manager when there is nothing to pop.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History stack is empty")]
    Empty,
}

/// Errors from building or reconfiguring a session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] crate::state::ConfigError),

    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
