//! The external font-engine collaborator boundary.
//!
//! Shaping (cluster/kerning/ligature resolution) and MSDF rasterization
//! are not implemented in this workspace; they arrive through the
//! [`FontEngine`] trait. All calls are synchronous and bounded by input
//! size. `shape_text` must be deterministic for identical (font, text)
//! pairs — the shaping cache in `quill-text` relies on it.

use crate::error::FontError;
use crate::font::{AtlasConfig, FontDescription, FontHandle, RenderConfig};
use crate::glyph::{GlyphMetrics, ShapedGlyph};
use crate::Rgba8;

/// Font shaping and glyph rendering service.
pub trait FontEngine {
    /// Load a font from its binary blob, returning an opaque handle plus
    /// the face's global metrics.
    fn load_font(&mut self, data: &[u8]) -> Result<(FontHandle, FontDescription), FontError>;

    /// Release a font handle. Further use of the handle is an error.
    fn unload_font(&mut self, handle: FontHandle) -> Result<(), FontError>;

    /// Shape a UTF-8 string into an ordered glyph run.
    fn shape_text(&mut self, handle: FontHandle, text: &str)
        -> Result<Vec<ShapedGlyph>, FontError>;

    /// Fill in extents/bearings and atlas bitmap dimensions for each
    /// glyph in `glyphs` (keyed by its `code_point`), scaled to
    /// `glyph_size` with `padding` pixels of distance-field border.
    /// Atlas positions are left untouched.
    fn glyph_metrics(
        &mut self,
        handle: FontHandle,
        glyph_size: u32,
        padding: u32,
        glyphs: &mut [GlyphMetrics],
    ) -> Result<(), FontError>;

    /// Rasterize the given (already packed) glyphs into `target`, a
    /// row-major `atlas.size` × `atlas.size` pixel buffer. Only the
    /// pixel rects of the passed glyphs are touched.
    fn render_glyphs(
        &mut self,
        handle: FontHandle,
        atlas: &AtlasConfig,
        render: &RenderConfig,
        glyphs: &[GlyphMetrics],
        target: &mut [Rgba8],
    ) -> Result<(), FontError>;
}
