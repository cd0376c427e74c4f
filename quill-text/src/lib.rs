//! # quill-text
//!
//! Font-side half of the Quill text subsystem: character-set
//! collection, atlas packing, baked font assets, and the shared font
//! runtime with incremental missing-glyph resolution.
//!
//! ## Architecture
//!
//! ```text
//! CharacterSetBuilder ──► bake() ──► FontAsset (bytes + metrics + packer state)
//!                                        │
//!                                        ▼
//! FontRuntimeRegistry ──attach──► FontRuntime (glyph map + packer + missing set)
//!                                        │
//!                   shaping miss ────────┤
//!                                        ▼
//!                          resolver::resolve_runtime()
//!                          (metrics → pack → render → merge)
//! ```
//!
//! - **`charset`** — deduplicated glyph-discovery seed strings.
//! - **`atlas`** — append-only shelf packer with serializable state.
//! - **`asset`** — baked font asset, lossless bincode round-trip.
//! - **`runtime`** — reference-counted font runtime + glyph map.
//! - **`resolver`** — per-cycle missing-glyph backfill.
//! - **`engine`** — deterministic synthetic [`FontEngine`](quill_core::FontEngine)
//!   for headless use and tests.

pub mod atlas;
pub mod asset;
pub mod charset;
pub mod engine;
pub mod resolver;
pub mod runtime;

// Re-exports for ergonomic use.
pub use atlas::{AtlasError, AtlasPacker};
pub use asset::{AssetError, FontAsset};
pub use charset::{CharacterPreset, CharacterSetBuilder};
pub use engine::MonoFontEngine;
pub use resolver::{resolve_runtime, ResolveOutcome};
pub use runtime::{FontRuntime, FontRuntimeRegistry, RuntimeState};
