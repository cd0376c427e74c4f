//! Font runtime — the shared, reference-counted per-font-asset state:
//! engine font handle, glyph map, missing-glyph set, and atlas packer.
//!
//! Exactly one `FontRuntime` exists per distinct font-asset identity;
//! [`FontRuntimeRegistry`] enforces this with a lookup table keyed by
//! asset id. Consumers attach (incrementing an atomic count) and detach;
//! when the count reaches zero the runtime is disposed deterministically:
//! the engine handle is released and the glyph map and packer are freed.
//!
//! Lifecycle: `Uninitialized → Loaded → (Augmenting)* → Disposed`. The
//! runtime enters `Augmenting` whenever shaping discovers code points
//! absent from the glyph map and returns to `Loaded` once the resolver
//! drains the missing set.

use crate::asset::{AssetError, FontAsset};
use crate::atlas::AtlasPacker;
use lru::LruCache;
use quill_core::{
    AtlasConfig, FontDescription, FontEngine, FontError, FontHandle, GlyphRuntimeData,
    RenderConfig, ShapedGlyph,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Shaping results memoized per runtime.
const SHAPE_CACHE_CAPACITY: usize = 256;

/// Lifecycle state of a font runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeState {
    Uninitialized,
    Loaded,
    Augmenting,
    Disposed,
}

/// Runtime state shared by every text entity using the same font asset.
pub struct FontRuntime {
    pub(crate) font_handle: FontHandle,
    description: FontDescription,
    atlas_config: AtlasConfig,
    pub(crate) render_config: RenderConfig,
    material: Uuid,
    asset_id: Uuid,
    glyph_map: FxHashMap<u32, GlyphRuntimeData>,
    missing: FxHashSet<u32>,
    /// Code points that could not be packed into this atlas; never
    /// retried (fixed-capacity policy).
    unresolvable: FxHashSet<u32>,
    pub(crate) packer: AtlasPacker,
    shape_cache: LruCache<String, Vec<ShapedGlyph>>,
    state: RuntimeState,
}

impl FontRuntime {
    /// Load a runtime from a baked asset: load the font into the engine,
    /// restore the packer, and populate the glyph map with every glyph
    /// baked at asset-build time.
    pub fn from_asset(engine: &mut dyn FontEngine, asset: &FontAsset) -> Result<Self, AssetError> {
        let (font_handle, description) = engine.load_font(&asset.font_bytes)?;

        let packer = if asset.packer_state.is_empty() {
            AtlasPacker::new(asset.atlas_config)
        } else {
            AtlasPacker::from_bytes(&asset.packer_state)?
        };

        let atlas_size = asset.atlas_config.size as f32;
        let glyph_map: FxHashMap<u32, GlyphRuntimeData> = asset
            .glyphs
            .iter()
            .filter(|g| g.is_placed())
            .map(|g| (g.code_point, GlyphRuntimeData::new(*g, atlas_size)))
            .collect();

        log::debug!(
            "font runtime loaded: asset {} with {} baked glyphs",
            asset.id,
            glyph_map.len()
        );

        Ok(Self {
            font_handle,
            description,
            atlas_config: asset.atlas_config,
            render_config: asset.render_config,
            material: asset.material,
            asset_id: asset.id,
            glyph_map,
            missing: FxHashSet::default(),
            unresolvable: FxHashSet::default(),
            packer,
            shape_cache: LruCache::new(
                NonZeroUsize::new(SHAPE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            ),
            state: RuntimeState::Loaded,
        })
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    pub fn description(&self) -> &FontDescription {
        &self.description
    }

    pub fn atlas_config(&self) -> &AtlasConfig {
        &self.atlas_config
    }

    pub fn material(&self) -> Uuid {
        self.material
    }

    pub fn asset_id(&self) -> Uuid {
        self.asset_id
    }

    pub fn glyph_count(&self) -> usize {
        self.glyph_map.len()
    }

    /// Look up the runtime data for a code point. Concurrent readers get
    /// `None` for unresolved glyphs instead of blocking.
    pub fn glyph(&self, code_point: u32) -> Option<GlyphRuntimeData> {
        self.glyph_map.get(&code_point).copied()
    }

    /// Record a code point seen during shaping but absent from the glyph
    /// map. Returns whether it was newly queued.
    pub fn note_missing(&mut self, code_point: u32) -> bool {
        if self.glyph_map.contains_key(&code_point) || self.unresolvable.contains(&code_point) {
            return false;
        }
        let queued = self.missing.insert(code_point);
        if queued {
            self.state = RuntimeState::Augmenting;
        }
        queued
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    pub fn unresolvable_count(&self) -> usize {
        self.unresolvable.len()
    }

    /// Shape `text`, memoizing results. Shaping is deterministic per
    /// (font, text) pair, so cached runs are exact.
    pub fn shape(
        &mut self,
        engine: &mut dyn FontEngine,
        text: &str,
    ) -> Result<Vec<ShapedGlyph>, FontError> {
        if let Some(cached) = self.shape_cache.get(text) {
            return Ok(cached.clone());
        }
        let shaped = engine.shape_text(self.font_handle, text)?;
        self.shape_cache.put(text.to_owned(), shaped.clone());
        Ok(shaped)
    }

    /// Release the engine handle and free all per-font state.
    pub fn dispose(&mut self, engine: &mut dyn FontEngine) -> Result<(), FontError> {
        engine.unload_font(self.font_handle)?;
        self.glyph_map.clear();
        self.missing.clear();
        self.unresolvable.clear();
        self.shape_cache.clear();
        self.state = RuntimeState::Disposed;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Resolver support (crate-internal)
    // ---------------------------------------------------------------

    /// Drain the missing set in deterministic (ascending) order. Misses
    /// recorded after this snapshot land in the next cycle's set.
    pub(crate) fn snapshot_missing(&mut self) -> Vec<u32> {
        let mut snapshot: Vec<u32> = self.missing.drain().collect();
        snapshot.sort_unstable();
        snapshot
    }

    /// Insert-only merge: a code point, once resolved, never changes UV.
    pub(crate) fn merge_glyph(&mut self, data: GlyphRuntimeData) {
        self.glyph_map.entry(data.code_point).or_insert(data);
    }

    pub(crate) fn mark_unresolvable(&mut self, code_point: u32) {
        self.unresolvable.insert(code_point);
    }

    pub(crate) fn finish_resolution(&mut self) {
        if self.missing.is_empty() {
            self.state = RuntimeState::Loaded;
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Registry
// ───────────────────────────────────────────────────────────────────

struct RegistryEntry {
    runtime: Arc<RwLock<FontRuntime>>,
    refs: AtomicU32,
}

/// Owned lookup table enforcing one runtime per font-asset identity.
///
/// Not a process-wide singleton — the scene layer owns its registry and
/// tears it down with the subsystem.
#[derive(Default)]
pub struct FontRuntimeRegistry {
    entries: FxHashMap<Uuid, RegistryEntry>,
}

impl FontRuntimeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a consumer to the runtime for `asset`, creating it lazily
    /// on first use. Repeated lookups return the same instance.
    pub fn attach(
        &mut self,
        engine: &mut dyn FontEngine,
        asset: &FontAsset,
    ) -> Result<Arc<RwLock<FontRuntime>>, AssetError> {
        if let Some(entry) = self.entries.get(&asset.id) {
            entry.refs.fetch_add(1, Ordering::AcqRel);
            return Ok(Arc::clone(&entry.runtime));
        }

        let runtime = Arc::new(RwLock::new(FontRuntime::from_asset(engine, asset)?));
        self.entries.insert(
            asset.id,
            RegistryEntry {
                runtime: Arc::clone(&runtime),
                refs: AtomicU32::new(1),
            },
        );
        Ok(runtime)
    }

    /// Detach a consumer. When the count reaches zero the runtime is
    /// disposed and removed. Returns whether disposal happened.
    pub fn detach(
        &mut self,
        engine: &mut dyn FontEngine,
        asset_id: Uuid,
    ) -> Result<bool, FontError> {
        let Some(entry) = self.entries.get(&asset_id) else {
            log::warn!("detach for unknown font asset {asset_id}");
            return Ok(false);
        };

        let previous = entry.refs.fetch_sub(1, Ordering::AcqRel);
        if previous > 1 {
            return Ok(false);
        }

        if let Some(entry) = self.entries.remove(&asset_id) {
            match entry.runtime.write() {
                Ok(mut runtime) => runtime.dispose(engine)?,
                Err(_) => {
                    return Err(FontError::Engine(format!(
                        "font runtime lock poisoned for asset {asset_id}"
                    )))
                }
            }
            log::debug!("font runtime disposed: asset {asset_id}");
        }
        Ok(true)
    }

    pub fn runtime(&self, asset_id: Uuid) -> Option<Arc<RwLock<FontRuntime>>> {
        self.entries.get(&asset_id).map(|e| Arc::clone(&e.runtime))
    }

    pub fn ref_count(&self, asset_id: Uuid) -> u32 {
        self.entries
            .get(&asset_id)
            .map(|e| e.refs.load(Ordering::Acquire))
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Asset ids whose runtimes currently hold unresolved misses.
    pub fn augmenting(&self) -> Vec<Uuid> {
        self.entries
            .iter()
            .filter(|(_, e)| e.runtime.read().map(|r| r.has_missing()).unwrap_or(false))
            .map(|(id, _)| *id)
            .collect()
    }
}

// ===================================================================
// Tests
// ===================================================================
