//! Missing-glyph resolution — drains a runtime's missing set into the
//! atlas in one deterministic cycle.
//!
//! ## Architecture
//!
//! ```text
//!   missing set ──snapshot+clear──▶ metrics ──▶ pack ──▶ render
//!        ▲                                        │
//!        │                              placed ───┤─── unplaced
//!   (new misses land                     │               │
//!    in the next cycle)            glyph map        unresolvable
//!                                 (insert-only)     (never retried)
//! ```
//!
//! The merge is insert-only: a code point resolved in an earlier cycle
//! keeps its UV rect forever, so layouts already referencing it stay
//! valid. Glyphs the packer cannot place are parked in the runtime's
//! unresolvable set and never re-queued (fixed-capacity atlas policy).

use crate::runtime::FontRuntime;
use quill_core::{FontEngine, FontError, GlyphMetrics, GlyphRuntimeData, Rgba8};

/// Counts from one resolution cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// Code points placed, rendered, and merged into the glyph map.
    pub resolved: usize,
    /// Code points that did not fit and were parked permanently.
    pub unresolvable: usize,
}

/// Run one resolution cycle over `runtime`, rendering newly placed
/// glyphs into `texture` (the runtime's atlas image).
///
/// On engine failure the snapshot is re-queued so the next cycle
/// retries it; the atlas and glyph map are left as they were.
pub fn resolve_runtime(
    runtime: &mut FontRuntime,
    engine: &mut dyn FontEngine,
    texture: &mut [Rgba8],
) -> Result<ResolveOutcome, FontError> {
    let snapshot = runtime.snapshot_missing();
    if snapshot.is_empty() {
        runtime.finish_resolution();
        return Ok(ResolveOutcome::default());
    }

    let atlas_config = *runtime.atlas_config();
    let mut glyphs: Vec<GlyphMetrics> = snapshot
        .iter()
        .copied()
        .map(GlyphMetrics::unplaced)
        .collect();

    if let Err(e) = engine.glyph_metrics(
        runtime.font_handle,
        atlas_config.glyph_size,
        atlas_config.padding,
        &mut glyphs,
    ) {
        requeue(runtime, &snapshot);
        return Err(e);
    }

    runtime.packer.pack(&mut glyphs);
    let placed: Vec<GlyphMetrics> = glyphs.iter().copied().filter(|g| g.is_placed()).collect();

    if !placed.is_empty() {
        let render_config = runtime.render_config;
        if let Err(e) =
            engine.render_glyphs(runtime.font_handle, &atlas_config, &render_config, &placed, texture)
        {
            // Packer space for this batch is lost, but the glyph map is
            // untouched; the retry re-packs into fresh space.
            requeue(runtime, &snapshot);
            return Err(e);
        }
    }

    let atlas_size = atlas_config.size as f32;
    for g in &placed {
        runtime.merge_glyph(GlyphRuntimeData::new(*g, atlas_size));
    }

    let mut unresolvable = 0;
    for g in glyphs.iter().filter(|g| !g.is_placed()) {
        runtime.mark_unresolvable(g.code_point);
        unresolvable += 1;
        log::warn!(
            "glyph U+{:04X} does not fit in the {}px atlas; dropped",
            g.code_point,
            atlas_config.size
        );
    }

    runtime.finish_resolution();
    Ok(ResolveOutcome {
        resolved: placed.len(),
        unresolvable,
    })
}

fn requeue(runtime: &mut FontRuntime, snapshot: &[u32]) {
    for &code_point in snapshot {
        runtime.note_missing(code_point);
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::FontAsset;
    use crate::charset::CharacterSetBuilder;
    use crate::engine::MonoFontEngine;
    use crate::runtime::RuntimeState;
    use quill_core::{AtlasConfig, RenderConfig};

    fn runtime_with(
        engine: &mut MonoFontEngine,
        sample: &str,
        atlas_config: AtlasConfig,
    ) -> (FontRuntime, Vec<Rgba8>) {
        let mut texture =
            vec![Rgba8::TRANSPARENT; (atlas_config.size * atlas_config.size) as usize];
        let mut charset = CharacterSetBuilder::new();
        charset.add_sample(sample);
        let asset = FontAsset::bake(
            engine,
            b"mono".to_vec(),
            &charset,
            atlas_config,
            RenderConfig::default(),
            &mut texture,
        )
        .unwrap();
        let runtime = FontRuntime::from_asset(engine, &asset).unwrap();
        (runtime, texture)
    }

    #[test]
    fn test_resolve_empty_is_noop() {
        let mut engine = MonoFontEngine::new();
        let (mut runtime, mut texture) = runtime_with(&mut engine, "a", AtlasConfig::default());
        let outcome = resolve_runtime(&mut runtime, &mut engine, &mut texture).unwrap();
        assert_eq!(outcome, ResolveOutcome::default());
        assert_eq!(runtime.state(), RuntimeState::Loaded);
    }

    #[test]
    fn test_resolve_adds_missing_glyphs() {
        let mut engine = MonoFontEngine::new();
        let (mut runtime, mut texture) = runtime_with(&mut engine, "a", AtlasConfig::default());

        runtime.note_missing('x' as u32);
        runtime.note_missing('y' as u32);
        assert_eq!(runtime.state(), RuntimeState::Augmenting);

        let outcome = resolve_runtime(&mut runtime, &mut engine, &mut texture).unwrap();
        assert_eq!(outcome.resolved, 2);
        assert_eq!(outcome.unresolvable, 0);
        assert_eq!(runtime.state(), RuntimeState::Loaded);
        assert!(runtime.glyph('x' as u32).is_some());
        assert!(runtime.glyph('y' as u32).is_some());
    }

    #[test]
    fn test_resolved_uvs_are_stable_across_cycles() {
        let mut engine = MonoFontEngine::new();
        let (mut runtime, mut texture) = runtime_with(&mut engine, "a", AtlasConfig::default());

        runtime.note_missing('x' as u32);
        resolve_runtime(&mut runtime, &mut engine, &mut texture).unwrap();
        let before = runtime.glyph('x' as u32).unwrap();

        runtime.note_missing('y' as u32);
        runtime.note_missing('z' as u32);
        resolve_runtime(&mut runtime, &mut engine, &mut texture).unwrap();
        let after = runtime.glyph('x' as u32).unwrap();

        assert_eq!(before.atlas_uv, after.atlas_uv);
        assert_eq!(before.metrics, after.metrics);
    }

    #[test]
    fn test_resolved_glyphs_render_into_texture() {
        let mut engine = MonoFontEngine::new();
        let (mut runtime, _) = runtime_with(&mut engine, "a", AtlasConfig::default());

        // Fresh texture so only the resolved glyph lights pixels.
        let size = runtime.atlas_config().size;
        let mut texture = vec![Rgba8::TRANSPARENT; (size * size) as usize];
        runtime.note_missing('x' as u32);
        resolve_runtime(&mut runtime, &mut engine, &mut texture).unwrap();
        assert!(texture.iter().any(|t| t.a != 0));
    }

    #[test]
    fn test_exhausted_atlas_parks_glyphs_permanently() {
        // 64px atlas fits exactly one 36px bitmap per the default margin.
        let tiny = AtlasConfig {
            size: 64,
            ..Default::default()
        };
        let mut engine = MonoFontEngine::new();
        let (mut runtime, mut texture) = runtime_with(&mut engine, "a", tiny);

        runtime.note_missing('b' as u32);
        runtime.note_missing('c' as u32);
        let outcome = resolve_runtime(&mut runtime, &mut engine, &mut texture).unwrap();
        assert_eq!(outcome.resolved, 0);
        assert_eq!(outcome.unresolvable, 2);
        assert_eq!(runtime.state(), RuntimeState::Loaded);

        // Parked code points never re-queue.
        assert!(!runtime.note_missing('b' as u32));
        assert_eq!(runtime.missing_count(), 0);
    }

    #[test]
    fn test_whitespace_resolves_without_atlas_space() {
        let tiny = AtlasConfig {
            size: 64,
            ..Default::default()
        };
        let mut engine = MonoFontEngine::new();
        let (mut runtime, mut texture) = runtime_with(&mut engine, "a", tiny);

        runtime.note_missing(' ' as u32);
        let outcome = resolve_runtime(&mut runtime, &mut engine, &mut texture).unwrap();
        assert_eq!(outcome.resolved, 1);
        let space = runtime.glyph(' ' as u32).unwrap();
        assert_eq!(space.metrics.atlas_width, 0);
    }
}
