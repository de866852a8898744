#![allow(dead_code)]

use std::path::PathBuf;

use raster_paint::{Session, SessionConfig, TextRenderer};

/// Routes `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Session with a small white canvas and no disk lookups.
pub fn session(width: u32, height: u32) -> Session {
    init_logging();
    let config = SessionConfig {
        width,
        height,
        stamps_dir: None,
        fonts: Vec::new(),
        ..SessionConfig::default()
    };
    let mut session = Session::new(config).expect("valid test config");
    session.set_text_renderer(TextRenderer::builtin());
    session
}

/// Fresh directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}_{}", prefix, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
