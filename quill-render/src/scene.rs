//! Text scene — owns the font runtimes, text entities, and the
//! shape → resolve → layout update cycle.
//!
//! ## Architecture
//!
//! ```text
//!   process()
//!      │
//!      ├─ 1. shape: entities flagged dirty re-shape and rebuild their
//!      │          layout glyphs; unknown code points queue as missing
//!      ├─ 2. resolve: each augmenting font runtime packs + renders its
//!      │          missing set; entities on that font re-flag for shape
//!      └─ 3. layout: wrap + align entities whose glyphs are settled
//! ```
//!
//! A glyph missing from the atlas renders as blank space with its
//! advance preserved, then self-heals one cycle after resolution. The
//! scene owns its registry and working atlas textures; dropping the
//! last entity on a font disposes its runtime deterministically.

use crate::bridge::emit_instances;
use crate::vertex::GlyphInstance;
use quill_core::{FontEngine, FontError, Rgba8, Vec2};
use quill_layout::{
    align_glyphs, build_layout_glyphs, BreakRule, LayoutError, LayoutGlyph, LineLayoutEngine,
    TextAlign,
};
use quill_text::{resolve_runtime, AssetError, FontAsset, FontRuntimeRegistry};
use rustc_hash::FxHashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error(transparent)]
    Font(#[from] FontError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("unknown text entity {0}")]
    UnknownEntity(u64),
    #[error("font asset {0} is not registered")]
    UnknownFont(Uuid),
    #[error("font runtime lock poisoned")]
    Poisoned,
}

/// Handle to a text entity in the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextEntityId(u64);

/// Per-entity presentation style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// World units per em.
    pub font_size: f32,
    pub color: [f32; 4],
    /// Maximum line width in em units; zero means unbounded.
    pub max_line_width: f32,
    pub break_rule: BreakRule,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            color: [1.0, 1.0, 1.0, 1.0],
            max_line_width: 0.0,
            break_rule: BreakRule::Word,
            align: TextAlign::Left,
        }
    }
}

/// Counts from one [`TextScene::process`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcessStats {
    /// Entities re-shaped this cycle.
    pub shaped: usize,
    /// Glyphs newly resolved into atlases.
    pub resolved: usize,
    /// Glyphs permanently dropped for lack of atlas space.
    pub unresolvable: usize,
    /// Entities wrapped and aligned this cycle.
    pub laid_out: usize,
}

struct FontSlot {
    asset: FontAsset,
    /// Pristine atlas image from the bake, kept for runtime re-creation.
    baked: Vec<Rgba8>,
    /// Live atlas image, mutated by the resolver. Exists while the
    /// font's runtime is alive.
    working: Option<Vec<Rgba8>>,
}

struct TextEntity {
    asset_id: Uuid,
    text: String,
    style: TextStyle,
    glyphs: Vec<LayoutGlyph>,
    size: Vec2,
    needs_shape: bool,
    needs_layout: bool,
}

/// All text state for one scene: entities, font runtimes, and atlas
/// textures, driven by [`process`](TextScene::process).
pub struct TextScene<E: FontEngine> {
    engine: E,
    registry: FontRuntimeRegistry,
    fonts: FxHashMap<Uuid, FontSlot>,
    entities: FxHashMap<u64, TextEntity>,
    next_entity: u64,
}

impl<E: FontEngine> TextScene<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            registry: FontRuntimeRegistry::new(),
            fonts: FxHashMap::default(),
            entities: FxHashMap::default(),
            next_entity: 0,
        }
    }

    /// Register a baked font asset with its atlas image. Entities refer
    /// to it by asset id.
    pub fn register_font(&mut self, asset: FontAsset, baked: Vec<Rgba8>) -> Result<(), SceneError> {
        let expected = (asset.atlas_config.size * asset.atlas_config.size) as usize;
        if baked.len() != expected {
            return Err(SceneError::Asset(AssetError::Corrupt(format!(
                "atlas image has {} texels, expected {expected}",
                baked.len()
            ))));
        }
        self.fonts.insert(
            asset.id,
            FontSlot {
                asset,
                baked,
                working: None,
            },
        );
        Ok(())
    }

    /// Create a text entity. Attaches to the font runtime (creating it
    /// on first use) and flags the entity for shaping.
    pub fn spawn(
        &mut self,
        asset_id: Uuid,
        text: &str,
        style: TextStyle,
    ) -> Result<TextEntityId, SceneError> {
        let slot = self
            .fonts
            .get_mut(&asset_id)
            .ok_or(SceneError::UnknownFont(asset_id))?;
        self.registry.attach(&mut self.engine, &slot.asset)?;
        if slot.working.is_none() {
            slot.working = Some(slot.baked.clone());
        }

        self.next_entity += 1;
        let id = self.next_entity;
        self.entities.insert(
            id,
            TextEntity {
                asset_id,
                text: text.to_owned(),
                style,
                glyphs: Vec::new(),
                size: Vec2::ZERO,
                needs_shape: true,
                needs_layout: false,
            },
        );
        Ok(TextEntityId(id))
    }

    /// Replace an entity's text, flagging it for re-shaping.
    pub fn set_text(&mut self, id: TextEntityId, text: &str) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(&id.0)
            .ok_or(SceneError::UnknownEntity(id.0))?;
        if entity.text != text {
            entity.text = text.to_owned();
            entity.needs_shape = true;
        }
        Ok(())
    }

    /// Replace an entity's style, flagging it for re-layout.
    pub fn set_style(&mut self, id: TextEntityId, style: TextStyle) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(&id.0)
            .ok_or(SceneError::UnknownEntity(id.0))?;
        if entity.style != style {
            entity.style = style;
            entity.needs_layout = true;
        }
        Ok(())
    }

    /// Remove an entity, detaching from its font runtime. The last
    /// detach disposes the runtime and drops the working atlas.
    pub fn despawn(&mut self, id: TextEntityId) -> Result<(), SceneError> {
        let entity = self
            .entities
            .remove(&id.0)
            .ok_or(SceneError::UnknownEntity(id.0))?;
        let disposed = self.registry.detach(&mut self.engine, entity.asset_id)?;
        if disposed {
            if let Some(slot) = self.fonts.get_mut(&entity.asset_id) {
                slot.working = None;
            }
        }
        Ok(())
    }

    /// Run one update cycle: shape dirty entities, resolve missing
    /// glyphs, then wrap and align settled entities.
    ///
    /// Entities whose font gained glyphs this cycle re-shape on the
    /// next call, so a brand-new code point is fully visible after two
    /// cycles.
    pub fn process(&mut self) -> Result<ProcessStats, SceneError> {
        let mut stats = ProcessStats::default();

        // ── 1. shape ──
        let Self {
            engine,
            registry,
            entities,
            ..
        } = self;
        for entity in entities.values_mut() {
            if !entity.needs_shape {
                continue;
            }
            let runtime = registry
                .runtime(entity.asset_id)
                .ok_or(SceneError::UnknownFont(entity.asset_id))?;
            let mut rt = runtime.write().map_err(|_| SceneError::Poisoned)?;

            let shaped = rt.shape(engine, &entity.text)?;
            let description = *rt.description();
            let atlas_config = *rt.atlas_config();
            let built =
                build_layout_glyphs(&shaped, &description, &atlas_config, |cp| rt.glyph(cp));
            for &code_point in &built.missing {
                rt.note_missing(code_point);
            }

            entity.glyphs = built.glyphs;
            entity.needs_shape = false;
            entity.needs_layout = true;
            stats.shaped += 1;
        }

        // ── 2. resolve ──
        for asset_id in self.registry.augmenting() {
            let runtime = self
                .registry
                .runtime(asset_id)
                .ok_or(SceneError::UnknownFont(asset_id))?;
            let mut rt = runtime.write().map_err(|_| SceneError::Poisoned)?;
            let texture = self
                .fonts
                .get_mut(&asset_id)
                .and_then(|slot| slot.working.as_mut())
                .ok_or(SceneError::UnknownFont(asset_id))?;

            let outcome = resolve_runtime(&mut rt, &mut self.engine, texture)?;
            stats.resolved += outcome.resolved;
            stats.unresolvable += outcome.unresolvable;

            if outcome.resolved > 0 {
                for entity in self.entities.values_mut() {
                    if entity.asset_id == asset_id {
                        entity.needs_shape = true;
                    }
                }
            }
        }

        // ── 3. layout ──
        for entity in self.entities.values_mut() {
            if !entity.needs_layout || entity.needs_shape {
                continue;
            }
            let runtime = self
                .registry
                .runtime(entity.asset_id)
                .ok_or(SceneError::UnknownFont(entity.asset_id))?;
            let line_height = runtime
                .read()
                .map_err(|_| SceneError::Poisoned)?
                .description()
                .line_height_em();

            let wrap = LineLayoutEngine::new(
                line_height,
                entity.style.max_line_width,
                entity.style.break_rule,
            );
            let size = wrap.layout(&mut entity.glyphs, &entity.text)?;
            align_glyphs(&mut entity.glyphs, &entity.text, size.x, entity.style.align);

            entity.size = size;
            entity.needs_layout = false;
            stats.laid_out += 1;
        }

        log::trace!(
            "scene cycle: {} shaped, {} resolved, {} laid out",
            stats.shaped,
            stats.resolved,
            stats.laid_out
        );
        Ok(stats)
    }

    /// World-space instances for one entity, ready for draw submission.
    pub fn instances(&self, id: TextEntityId) -> Result<Vec<GlyphInstance>, SceneError> {
        let entity = self
            .entities
            .get(&id.0)
            .ok_or(SceneError::UnknownEntity(id.0))?;
        Ok(emit_instances(
            &entity.glyphs,
            entity.style.font_size,
            entity.style.color,
        ))
    }

    /// Laid-out block size in em units.
    pub fn text_size(&self, id: TextEntityId) -> Option<Vec2> {
        self.entities.get(&id.0).map(|e| e.size)
    }

    /// Whether any entity still needs shaping or layout.
    pub fn has_pending_work(&self) -> bool {
        self.entities
            .values()
            .any(|e| e.needs_shape || e.needs_layout)
            || !self.registry.augmenting().is_empty()
    }

    /// Live atlas image for a font, for GPU texture upload.
    pub fn atlas_texture(&self, asset_id: Uuid) -> Option<&[Rgba8]> {
        self.fonts
            .get(&asset_id)
            .and_then(|slot| slot.working.as_deref())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of live font runtimes.
    pub fn runtime_count(&self) -> usize {
        self.registry.len()
    }
}

// ===================================================================
// Tests
// ===================================================================
