//! Shared error taxonomy for font-engine calls.

use thiserror::Error;

/// Errors surfaced by the font engine collaborator.
///
/// Engine failures are fatal for the triggering call only; callers must
/// leave shared state (glyph map, atlas) untouched when one is returned.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("font engine call failed: {0}")]
    Engine(String),
    #[error("no font loaded for handle {0}")]
    FontNotFound(u64),
    #[error("invalid font data: {0}")]
    InvalidFont(String),
}
