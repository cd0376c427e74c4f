//! Baked font assets — the persisted artifact of the build pipeline.
//!
//! A `FontAsset` bundles the raw font blob, the glyph metrics baked at
//! build time, the serialized atlas packer state, and the atlas/render
//! configuration. Deserializing and re-serializing an unmodified asset
//! yields byte-identical bytes, so assets are stable within one build.
//! Corrupt blobs fail loading outright — there is no best-effort
//! reconstruction.

use crate::atlas::{AtlasError, AtlasPacker};
use crate::charset::CharacterSetBuilder;
use quill_core::{
    AtlasConfig, FontEngine, FontError, FontHandle, GlyphMetrics, RenderConfig, Rgba8,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Atlas(#[from] AtlasError),
    #[error("corrupt font asset: {0}")]
    Corrupt(String),
}

/// A font asset baked by the build pipeline and loaded at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontAsset {
    /// Asset identity — one font runtime exists per distinct id.
    pub id: Uuid,
    /// Raw font binary, fed to the engine's `load_font`.
    pub font_bytes: Vec<u8>,
    /// Metrics of every glyph baked at build time, atlas positions set.
    pub glyphs: Vec<GlyphMetrics>,
    /// Serialized [`AtlasPacker`] state for incremental runtime packing.
    pub packer_state: Vec<u8>,
    pub atlas_config: AtlasConfig,
    pub render_config: RenderConfig,
    /// Identity of the GPU material/texture pair this asset renders with.
    pub material: Uuid,
}

impl FontAsset {
    /// Bake a font asset: shape the charset, collect the distinct code
    /// points, fetch metrics, pack them into a fresh atlas, and render
    /// the glyph bitmaps into `texture`.
    ///
    /// `texture` must be an `atlas_config.size²` pixel buffer; it
    /// becomes the baked atlas image.
    pub fn bake(
        engine: &mut dyn FontEngine,
        font_bytes: Vec<u8>,
        charset: &CharacterSetBuilder,
        atlas_config: AtlasConfig,
        render_config: RenderConfig,
        texture: &mut [Rgba8],
    ) -> Result<Self, AssetError> {
        let (handle, _desc) = engine.load_font(&font_bytes)?;

        // The handle is released whether the bake succeeds or not.
        let baked = Self::bake_glyphs(engine, handle, charset, atlas_config, render_config, texture);
        let unloaded = engine.unload_font(handle);
        let (glyphs, packer_state) = baked?;
        unloaded?;

        Ok(Self {
            id: Uuid::new_v4(),
            font_bytes,
            glyphs,
            packer_state,
            atlas_config,
            render_config,
            material: Uuid::new_v4(),
        })
    }

    fn bake_glyphs(
        engine: &mut dyn FontEngine,
        handle: FontHandle,
        charset: &CharacterSetBuilder,
        atlas_config: AtlasConfig,
        render_config: RenderConfig,
        texture: &mut [Rgba8],
    ) -> Result<(Vec<GlyphMetrics>, Vec<u8>), AssetError> {
        // Shape the seed string; dedupe the discovered code points.
        let seed = charset.build();
        let shaped = engine.shape_text(handle, &seed)?;
        let code_points: BTreeSet<u32> = shaped.iter().map(|g| g.code_point).collect();

        let mut glyphs: Vec<GlyphMetrics> = code_points
            .into_iter()
            .map(GlyphMetrics::unplaced)
            .collect();
        engine.glyph_metrics(
            handle,
            atlas_config.glyph_size,
            atlas_config.padding,
            &mut glyphs,
        )?;

        let mut packer = AtlasPacker::new(atlas_config);
        let packed = packer.pack(&mut glyphs);
        let remaining = glyphs.len() - packed;
        if remaining > 0 {
            log::warn!("atlas bake packed {packed} glyphs, {remaining} did not fit");
        }

        let placed: Vec<GlyphMetrics> = glyphs.iter().copied().filter(|g| g.is_placed()).collect();
        engine.render_glyphs(handle, &atlas_config, &render_config, &placed, texture)?;

        let packer_state = packer.to_bytes()?;
        Ok((glyphs, packer_state))
    }

    /// Serialize the asset for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, AssetError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| AssetError::Corrupt(e.to_string()))
    }

    /// Load an asset from persisted bytes. Malformed input is fatal.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let (asset, _): (Self, _) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| AssetError::Corrupt(e.to_string()))?;
        Ok(asset)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MonoFontEngine;

    fn bake_ascii() -> (FontAsset, Vec<Rgba8>) {
        let mut engine = MonoFontEngine::new();
        let atlas_config = AtlasConfig::default();
        let mut texture =
            vec![Rgba8::TRANSPARENT; (atlas_config.size * atlas_config.size) as usize];
        let mut charset = CharacterSetBuilder::new();
        charset.add_sample("Hello, world!");
        let asset = FontAsset::bake(
            &mut engine,
            b"mono".to_vec(),
            &charset,
            atlas_config,
            RenderConfig::default(),
            &mut texture,
        )
        .unwrap();
        (asset, texture)
    }

    #[test]
    fn test_bake_collects_distinct_code_points() {
        let (asset, _) = bake_ascii();
        // "Hello, world!" has 10 distinct characters.
        assert_eq!(asset.glyphs.len(), 10);
        let mut seen = std::collections::HashSet::new();
        for g in &asset.glyphs {
            assert!(seen.insert(g.code_point), "duplicate {}", g.code_point);
            assert!(g.is_placed());
        }
    }

    #[test]
    fn test_bake_renders_into_texture() {
        let (_, texture) = bake_ascii();
        assert!(texture.iter().any(|t| t.a != 0));
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let (asset, _) = bake_ascii();
        let bytes = asset.to_bytes().unwrap();
        let restored = FontAsset::from_bytes(&bytes).unwrap();
        assert_eq!(restored, asset);
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let (asset, _) = bake_ascii();
        let bytes = asset.to_bytes().unwrap();
        let again = FontAsset::from_bytes(&bytes).unwrap().to_bytes().unwrap();
        assert_eq!(bytes, again);
    }

    #[test]
    fn test_corrupt_bytes_fail_loading() {
        let (asset, _) = bake_ascii();
        let mut bytes = asset.to_bytes().unwrap();
        bytes.truncate(bytes.len() / 2);
        assert!(FontAsset::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_failed_bake_releases_font() {
        let mut engine = MonoFontEngine::new();
        let mut charset = CharacterSetBuilder::new();
        charset.add_sample("abc");

        // An undersized atlas buffer makes the render step fail.
        let mut texture = vec![Rgba8::TRANSPARENT; 1];
        let result = FontAsset::bake(
            &mut engine,
            b"mono".to_vec(),
            &charset,
            AtlasConfig::default(),
            RenderConfig::default(),
            &mut texture,
        );
        assert!(result.is_err());
        assert_eq!(engine.loaded_count(), 0);
    }

    #[test]
    fn test_packer_state_restores() {
        let (asset, _) = bake_ascii();
        let packer = AtlasPacker::from_bytes(&asset.packer_state).unwrap();
        assert_eq!(*packer.config(), asset.atlas_config);
        assert!(packer.shelf_count() > 0);
    }
}
