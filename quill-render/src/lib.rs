//! # quill-render
//!
//! Draw-submission layer: turns laid-out text into GPU-ready glyph
//! instances and drives the per-frame shape/resolve/layout cycle.
//!
//! ## Architecture
//!
//! ```text
//!  FontAsset (quill-text)
//!       │  register_font / spawn
//!       ▼
//!  TextScene.process()          ◀─── shape → resolve missing → wrap+align
//!       │
//!       ▼
//!  bridge::emit_instances()     ◀─── em space → world space
//!       │
//!       ▼
//!  GlyphInstance[]              ◀─── one instanced draw per font atlas
//! ```
//!
//! ## Crate modules
//!
//! - [`vertex`] — GPU instance data types (`bytemuck::Pod`)
//! - [`bridge`] — layout glyphs → world-space instances
//! - [`scene`] — text entities, font runtimes, and the update cycle

pub mod bridge;
pub mod scene;
pub mod vertex;

// Re-exports for convenience
pub use bridge::emit_instances;
pub use scene::{ProcessStats, SceneError, TextEntityId, TextScene, TextStyle};
pub use vertex::{GlyphInstance, QuadVertex};
