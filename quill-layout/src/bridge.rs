//! Bridge from shaped glyphs to layout glyphs.
//!
//! Converts the shaper's font-unit deltas into em units, attaches each
//! glyph's atlas UV and metrics from the glyph map, and reports code
//! points the map does not hold yet. Missing glyphs keep their advance
//! (so the cursor stays correct) and carry zero quad size, rendering as
//! blank space until resolved.

use crate::engine::LayoutGlyph;
use quill_core::{AtlasConfig, FontDescription, GlyphRuntimeData, ShapedGlyph, Vec2};
use rustc_hash::FxHashSet;

/// Output of one bridge pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltGlyphs {
    /// Layout glyphs, in shaping order, positions unset.
    pub glyphs: Vec<LayoutGlyph>,
    /// Distinct code points absent from the glyph map, in first-seen
    /// order. Feed these to the missing-glyph resolver.
    pub missing: Vec<u32>,
}

/// Build layout glyphs for a shaped run, looking up atlas data through
/// `lookup` (typically a read lock over the font runtime's glyph map).
pub fn build_layout_glyphs(
    shaped: &[ShapedGlyph],
    description: &FontDescription,
    atlas: &AtlasConfig,
    mut lookup: impl FnMut(u32) -> Option<GlyphRuntimeData>,
) -> BuiltGlyphs {
    let fu_to_em = description.font_units_to_em();
    // One em spans `glyph_size` atlas pixels, so the baked distance-field
    // padding converts at 1 / glyph_size.
    let padding_em = atlas.padding as f32 / atlas.glyph_size as f32;

    let mut glyphs = Vec::with_capacity(shaped.len());
    let mut missing = Vec::new();
    let mut seen_missing = FxHashSet::default();

    for s in shaped {
        let mut glyph = LayoutGlyph {
            cluster: s.cluster,
            advance_em: Vec2::new(s.x_advance as f32, s.y_advance as f32) * fu_to_em,
            ..Default::default()
        };

        match lookup(s.code_point) {
            Some(data) => {
                let m = data.metrics;
                glyph.real_size_em =
                    Vec2::new(m.width_fu as f32, m.height_fu as f32) * fu_to_em;
                glyph.offset_em = Vec2::new(
                    (s.x_offset + m.left_fu) as f32,
                    (s.y_offset + m.top_fu - m.height_fu) as f32,
                ) * fu_to_em;
                // The rendered quad extends past the ink by the baked
                // padding on every side; empty bitmaps stay empty.
                glyph.quad_size_em = if m.atlas_width > 0 {
                    glyph.real_size_em + Vec2::new(2.0 * padding_em, 2.0 * padding_em)
                } else {
                    Vec2::ZERO
                };
                glyph.atlas_uv = data.atlas_uv;
            }
            None => {
                glyph.offset_em =
                    Vec2::new(s.x_offset as f32, s.y_offset as f32) * fu_to_em;
                if seen_missing.insert(s.code_point) {
                    missing.push(s.code_point);
                }
            }
        }

        glyphs.push(glyph);
    }

    if !missing.is_empty() {
        log::debug!("bridge found {} unresolved code points", missing.len());
    }

    BuiltGlyphs { glyphs, missing }
}

// ===================================================================
// Tests
// ===================================================================
