//! Font-level types: the engine-opaque font handle, the description
//! returned when a font is loaded, and atlas/render configuration.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Opaque handle to a font loaded inside the font engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontHandle(pub u64);

/// Global metrics of a loaded font face, in font units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescription {
    pub units_per_em: i32,
    pub ascender: i32,
    pub descender: i32,
    /// Line height (line gap included) in font units.
    pub height: i32,
    pub max_advance_width: i32,
    pub max_advance_height: i32,
    pub underline_position: i32,
    pub underline_thickness: i32,
}

impl FontDescription {
    /// Conversion factor from font units to em units.
    #[inline(always)]
    pub fn font_units_to_em(&self) -> f32 {
        1.0 / self.units_per_em as f32
    }

    /// Line height in em units.
    #[inline(always)]
    pub fn line_height_em(&self) -> f32 {
        self.height as f32 * self.font_units_to_em()
    }
}

/// Atlas texture configuration, fixed when an asset is baked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Atlas width = height in pixels (always square).
    pub size: u32,
    /// Spacing between packed glyphs and from the atlas border, pixels.
    pub margin: u32,
    /// Distance-field padding baked around each glyph bitmap, pixels.
    pub padding: u32,
    /// Nominal glyph bitmap size in pixels (1 em at render scale).
    pub glyph_size: u32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            size: 512,
            margin: 1,
            padding: 2,
            glyph_size: 32,
        }
    }
}

bitflags! {
    /// Options forwarded to the engine's glyph rasterizer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GlyphRenderFlags: u32 {
        const RESOLVE_INTERSECTION = 1 << 0;
        const TEST = 1 << 1;
    }
}

bitflags! {
    /// Atlas compaction hints (reserved; the packer is append-only and
    /// currently ignores these).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AtlasCompactFlags: u32 {
        const FILL_END = 1 << 0;
        const GRAVITY = 1 << 1;
        const ZIGZAG = 1 << 2;
    }
}

/// Distance-field rendering configuration, fixed when an asset is baked.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub flags: GlyphRenderFlags,
    /// Distance-field range in atlas pixels.
    pub pixel_range: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            flags: GlyphRenderFlags::empty(),
            pixel_range: 2.0,
        }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn description() -> FontDescription {
        FontDescription {
            units_per_em: 1000,
            ascender: 800,
            descender: -200,
            height: 1200,
            max_advance_width: 1000,
            max_advance_height: 1200,
            underline_position: -100,
            underline_thickness: 50,
        }
    }

    #[test]
    fn test_font_units_to_em() {
        let desc = description();
        assert_eq!(desc.font_units_to_em(), 0.001);
        assert!((desc.line_height_em() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_atlas_config_default() {
        let cfg = AtlasConfig::default();
        assert_eq!(cfg.size, 512);
        assert_eq!(cfg.glyph_size, 32);
    }

    #[test]
    fn test_render_flags_combine() {
        let flags = GlyphRenderFlags::RESOLVE_INTERSECTION | GlyphRenderFlags::TEST;
        assert!(flags.contains(GlyphRenderFlags::RESOLVE_INTERSECTION));
        assert!(flags.contains(GlyphRenderFlags::TEST));
        assert!(!GlyphRenderFlags::empty().contains(GlyphRenderFlags::TEST));
    }
}
