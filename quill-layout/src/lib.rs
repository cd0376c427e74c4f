//! Text layout — line wrapping, alignment, and the shaped-glyph bridge.
//!
//! ## Architecture
//!
//! ```text
//!   ShapedGlyph[] ──bridge──▶ LayoutGlyph[] ──wrap──▶ lines ──align──▶ final
//!        │                        │                                     │
//!   glyph map lookup         em-unit metrics                    positionEm.x
//!   (missing reported)       (font-size free)                   shifted once
//! ```
//!
//! All layout math is in em units: font-unit values divided by the
//! face's units-per-em, independent of the final render size. The wrap
//! pass assigns `{positionEm, line}` per glyph in a single forward scan
//! with bounded backtrack; the alignment pass then shifts whole lines
//! horizontally, exactly once, after line assignments are final.

pub mod align;
pub mod bridge;
pub mod engine;

pub use align::{align_glyphs, TextAlign};
pub use bridge::{build_layout_glyphs, BuiltGlyphs};
pub use engine::{BreakRule, LayoutError, LayoutGlyph, LineLayoutEngine};
