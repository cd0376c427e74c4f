//! Layout → GPU bridge: converts em-space layout glyphs into
//! world-space `GlyphInstance` arrays for instanced drawing.
//!
//! Layout runs with Y growing downward (pen-space); world space has Y
//! up, so the cursor's Y is negated. Each instance is positioned at its
//! quad center: pen position, plus the glyph's bearing offset, plus
//! half the ink extents. Everything scales uniformly by the font size.

use crate::vertex::GlyphInstance;
use quill_layout::LayoutGlyph;

/// Build world-space instances for one laid-out text block.
///
/// Glyphs with an empty quad (whitespace, control characters, and
/// still-unresolved code points) produce no instance; their advances
/// already shaped the layout.
pub fn emit_instances(
    glyphs: &[LayoutGlyph],
    font_size: f32,
    color: [f32; 4],
) -> Vec<GlyphInstance> {
    let mut instances = Vec::with_capacity(glyphs.len());

    for g in glyphs {
        if g.quad_size_em.x <= 0.0 || g.quad_size_em.y <= 0.0 {
            continue;
        }

        let center_x = g.position_em.x + g.offset_em.x + 0.5 * g.real_size_em.x;
        let center_y = -g.position_em.y + g.offset_em.y + 0.5 * g.real_size_em.y;

        instances.push(GlyphInstance::new(
            [center_x * font_size, center_y * font_size, 0.0],
            [g.quad_size_em.x * font_size, g.quad_size_em.y * font_size],
            [g.atlas_uv.x, g.atlas_uv.y, g.atlas_uv.width, g.atlas_uv.height],
            color,
        ));
    }

    instances
}

// ===================================================================
// Tests
// ===================================================================
