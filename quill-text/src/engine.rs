//! Synthetic font engine — a deterministic, dependency-free
//! [`FontEngine`] for headless use and tests.
//!
//! Every code point maps to itself (no ligature substitution), every
//! visible glyph has the same fixed advance and extents, and rendering
//! fills the glyph's atlas rect with opaque white. Real shaping and
//! MSDF generation live in the production engine behind the same trait.

use quill_core::{
    AtlasConfig, FontDescription, FontEngine, FontError, FontHandle, GlyphMetrics, RenderConfig,
    Rgba8, ShapedGlyph,
};
use rustc_hash::FxHashSet;

/// Fixed-metrics synthetic engine: 1000 units per em, 600-unit advance.
#[derive(Debug, Default)]
pub struct MonoFontEngine {
    next_handle: u64,
    loaded: FxHashSet<u64>,
}

/// Advance of every non-control glyph, in font units.
pub const MONO_ADVANCE_FU: i32 = 600;
/// Ink extents of every visible glyph, in font units.
pub const MONO_WIDTH_FU: i32 = 500;
pub const MONO_HEIGHT_FU: i32 = 700;

const UNITS_PER_EM: i32 = 1000;

impl MonoFontEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fonts currently loaded.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    fn check(&self, handle: FontHandle) -> Result<(), FontError> {
        if self.loaded.contains(&handle.0) {
            Ok(())
        } else {
            Err(FontError::FontNotFound(handle.0))
        }
    }
}

fn is_invisible(ch: char) -> bool {
    ch.is_whitespace() || ch.is_control()
}

impl FontEngine for MonoFontEngine {
    fn load_font(&mut self, data: &[u8]) -> Result<(FontHandle, FontDescription), FontError> {
        if data.is_empty() {
            return Err(FontError::InvalidFont("empty font blob".into()));
        }
        self.next_handle += 1;
        self.loaded.insert(self.next_handle);
        Ok((
            FontHandle(self.next_handle),
            FontDescription {
                units_per_em: UNITS_PER_EM,
                ascender: 800,
                descender: -200,
                height: 1200,
                max_advance_width: MONO_ADVANCE_FU,
                max_advance_height: 1200,
                underline_position: -100,
                underline_thickness: 50,
            },
        ))
    }

    fn unload_font(&mut self, handle: FontHandle) -> Result<(), FontError> {
        if self.loaded.remove(&handle.0) {
            Ok(())
        } else {
            Err(FontError::FontNotFound(handle.0))
        }
    }

    fn shape_text(
        &mut self,
        handle: FontHandle,
        text: &str,
    ) -> Result<Vec<ShapedGlyph>, FontError> {
        self.check(handle)?;
        Ok(text
            .char_indices()
            .map(|(cluster, ch)| ShapedGlyph {
                code_point: ch as u32,
                cluster,
                x_offset: 0,
                y_offset: 0,
                x_advance: if ch.is_control() { 0 } else { MONO_ADVANCE_FU },
                y_advance: 0,
            })
            .collect())
    }

    fn glyph_metrics(
        &mut self,
        handle: FontHandle,
        glyph_size: u32,
        padding: u32,
        glyphs: &mut [GlyphMetrics],
    ) -> Result<(), FontError> {
        self.check(handle)?;
        let bitmap = (glyph_size + 2 * padding) as i32;
        for g in glyphs.iter_mut() {
            let invisible = char::from_u32(g.code_point).map_or(true, is_invisible);
            if invisible {
                g.atlas_width = 0;
                g.atlas_height = 0;
                g.width_fu = 0;
                g.height_fu = 0;
                g.left_fu = 0;
                g.top_fu = 0;
            } else {
                g.atlas_width = bitmap;
                g.atlas_height = bitmap;
                g.width_fu = MONO_WIDTH_FU;
                g.height_fu = MONO_HEIGHT_FU;
                g.left_fu = 50;
                g.top_fu = MONO_HEIGHT_FU;
            }
        }
        Ok(())
    }

    fn render_glyphs(
        &mut self,
        handle: FontHandle,
        atlas: &AtlasConfig,
        _render: &RenderConfig,
        glyphs: &[GlyphMetrics],
        target: &mut [Rgba8],
    ) -> Result<(), FontError> {
        self.check(handle)?;
        let size = atlas.size as usize;
        if target.len() < size * size {
            return Err(FontError::Engine(format!(
                "atlas buffer too small: {} < {}",
                target.len(),
                size * size
            )));
        }
        for g in glyphs {
            if !g.is_placed() {
                continue;
            }
            let (x, y) = (g.atlas_x as usize, g.atlas_y as usize);
            for row in 0..g.atlas_height.max(0) as usize {
                for col in 0..g.atlas_width.max(0) as usize {
                    let (dx, dy) = (x + col, y + row);
                    if dx < size && dy < size {
                        target[dy * size + dx] = Rgba8::new(255, 255, 255, 255);
                    }
                }
            }
        }
        Ok(())
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_unload() {
        let mut engine = MonoFontEngine::new();
        let (handle, desc) = engine.load_font(b"font").unwrap();
        assert_eq!(desc.units_per_em, 1000);
        engine.unload_font(handle).unwrap();
        assert!(engine.unload_font(handle).is_err());
    }

    #[test]
    fn test_empty_font_rejected() {
        let mut engine = MonoFontEngine::new();
        assert!(engine.load_font(b"").is_err());
    }

    #[test]
    fn test_shape_is_deterministic() {
        let mut engine = MonoFontEngine::new();
        let (handle, _) = engine.load_font(b"font").unwrap();
        let a = engine.shape_text(handle, "Hello, world!").unwrap();
        let b = engine.shape_text(handle, "Hello, world!").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 13);
    }

    #[test]
    fn test_shape_clusters_are_byte_indices() {
        let mut engine = MonoFontEngine::new();
        let (handle, _) = engine.load_font(b"font").unwrap();
        // 'é' is 2 bytes in UTF-8.
        let glyphs = engine.shape_text(handle, "aéb").unwrap();
        let clusters: Vec<usize> = glyphs.iter().map(|g| g.cluster).collect();
        assert_eq!(clusters, vec![0, 1, 3]);
    }

    #[test]
    fn test_whitespace_metrics_are_empty() {
        let mut engine = MonoFontEngine::new();
        let (handle, _) = engine.load_font(b"font").unwrap();
        let mut glyphs = vec![
            GlyphMetrics::unplaced('A' as u32),
            GlyphMetrics::unplaced(' ' as u32),
        ];
        engine.glyph_metrics(handle, 32, 2, &mut glyphs).unwrap();
        assert_eq!(glyphs[0].atlas_width, 36);
        assert_eq!(glyphs[0].width_fu, MONO_WIDTH_FU);
        assert_eq!(glyphs[1].atlas_width, 0);
        assert_eq!(glyphs[1].width_fu, 0);
    }

    #[test]
    fn test_render_touches_only_glyph_rects() {
        let mut engine = MonoFontEngine::new();
        let (handle, _) = engine.load_font(b"font").unwrap();
        let atlas = AtlasConfig {
            size: 16,
            ..Default::default()
        };
        let mut glyph = GlyphMetrics::unplaced('A' as u32);
        glyph.atlas_x = 1;
        glyph.atlas_y = 1;
        glyph.atlas_width = 2;
        glyph.atlas_height = 2;

        let mut target = vec![Rgba8::TRANSPARENT; 16 * 16];
        engine
            .render_glyphs(handle, &atlas, &RenderConfig::default(), &[glyph], &mut target)
            .unwrap();

        let lit = target.iter().filter(|t| t.a != 0).count();
        assert_eq!(lit, 4);
        assert_eq!(target[1 * 16 + 1].a, 255);
        assert_eq!(target[0].a, 0);
    }
}
