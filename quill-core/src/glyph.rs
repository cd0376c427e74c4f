//! Per-glyph data: shaping output, atlas metrics, and derived runtime
//! (UV) values.
//!
//! `GlyphMetrics` is produced once per code point by the font engine and
//! is immutable after the packer assigns its atlas position.
//! `GlyphRuntimeData` is the cached, normalized form held by the glyph
//! map for the lifetime of a font runtime.

use crate::UvRect;
use serde::{Deserialize, Serialize};

/// Sentinel for an atlas position that has not been assigned yet.
pub const UNPLACED: i32 = -1;

/// A glyph as returned by the shaping collaborator. Ephemeral — consumed
/// immediately after shaping, never retained.
///
/// Offsets and advances are in font units; divide by
/// [`FontDescription::units_per_em`](crate::font::FontDescription) to get
/// em values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapedGlyph {
    pub code_point: u32,
    /// Byte index into the source string this glyph corresponds to.
    pub cluster: usize,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: i32,
    pub y_advance: i32,
}

/// Atlas-space metrics for a single code point.
///
/// The atlas position starts out as [`UNPLACED`] and is assigned exactly
/// once by the atlas packer; it never changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphMetrics {
    pub code_point: u32,
    /// Atlas pixel rect. `atlas_x`/`atlas_y` are [`UNPLACED`] until packed.
    pub atlas_x: i32,
    pub atlas_y: i32,
    pub atlas_width: i32,
    pub atlas_height: i32,
    /// Glyph extents and bearings in font units.
    pub width_fu: i32,
    pub height_fu: i32,
    pub left_fu: i32,
    pub top_fu: i32,
}

impl GlyphMetrics {
    /// Metrics stub for a code point whose values the engine has not
    /// filled in yet.
    pub fn unplaced(code_point: u32) -> Self {
        Self {
            code_point,
            atlas_x: UNPLACED,
            atlas_y: UNPLACED,
            atlas_width: 0,
            atlas_height: 0,
            width_fu: 0,
            height_fu: 0,
            left_fu: 0,
            top_fu: 0,
        }
    }

    /// Whether the packer has assigned this glyph an atlas position.
    #[inline(always)]
    pub fn is_placed(&self) -> bool {
        self.atlas_x != UNPLACED && self.atlas_y != UNPLACED
    }
}

/// Glyph data derived from [`GlyphMetrics`] plus the atlas size: the
/// normalized UV rect plus the source metrics. Cached indefinitely in
/// the glyph map; freed only when the owning font runtime is disposed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphRuntimeData {
    pub code_point: u32,
    pub atlas_uv: UvRect,
    pub metrics: GlyphMetrics,
}

impl GlyphRuntimeData {
    pub fn new(metrics: GlyphMetrics, atlas_size: f32) -> Self {
        Self {
            code_point: metrics.code_point,
            atlas_uv: UvRect {
                x: metrics.atlas_x as f32 / atlas_size,
                y: metrics.atlas_y as f32 / atlas_size,
                width: metrics.atlas_width as f32 / atlas_size,
                height: metrics.atlas_height as f32 / atlas_size,
            },
            metrics,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
