//! Atlas packer — append-only rectangle packing over a fixed-size
//! square texture.
//!
//! Uses row-based "shelf" packing: each shelf has a fixed height set by
//! the tallest glyph placed on it; when a glyph doesn't fit the current
//! shelves, a new shelf is opened below. Packing is monotonic — a glyph
//! placed in an earlier call is never moved by a later one, so UV rects
//! handed out to the glyph map stay valid as the atlas grows.
//!
//! The full free-space state serializes losslessly, so baked font
//! assets can persist their packer and keep appending at runtime.

use quill_core::{AtlasConfig, GlyphMetrics};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("failed to serialize atlas state: {0}")]
    Serialize(String),
    #[error("corrupt atlas state: {0}")]
    Corrupt(String),
}

/// One packing row. `cursor_x` is the next free X position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Shelf {
    y: u32,
    height: u32,
    cursor_x: u32,
}

/// Append-only shelf packer over a square atlas texture.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtlasPacker {
    config: AtlasConfig,
    shelves: Vec<Shelf>,
}

impl AtlasPacker {
    pub fn new(config: AtlasConfig) -> Self {
        Self {
            config,
            shelves: Vec::new(),
        }
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Number of shelves opened so far.
    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    /// Assign atlas positions to every glyph whose position is unset,
    /// returning the number placed by this call.
    ///
    /// Glyphs that don't fit are left unplaced — callers detect
    /// `packed < requested` and decide the policy (warn-and-drop).
    /// Already-placed glyphs are never touched. Placement order is
    /// deterministic for identical inputs: candidates are packed
    /// tallest-first, ties broken by ascending code point.
    pub fn pack(&mut self, glyphs: &mut [GlyphMetrics]) -> usize {
        let mut order: Vec<usize> = (0..glyphs.len())
            .filter(|&i| !glyphs[i].is_placed())
            .collect();
        order.sort_by(|&a, &b| {
            glyphs[b]
                .atlas_height
                .cmp(&glyphs[a].atlas_height)
                .then(glyphs[a].code_point.cmp(&glyphs[b].code_point))
        });

        let mut packed = 0;
        for i in order {
            let w = glyphs[i].atlas_width.max(0) as u32;
            let h = glyphs[i].atlas_height.max(0) as u32;
            if let Some((x, y)) = self.allocate(w, h) {
                glyphs[i].atlas_x = x as i32;
                glyphs[i].atlas_y = y as i32;
                packed += 1;
            }
        }
        packed
    }

    /// Serialize the full packing state (config + free space).
    pub fn to_bytes(&self) -> Result<Vec<u8>, AtlasError> {
        bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| AtlasError::Serialize(e.to_string()))
    }

    /// Restore a packer from serialized state. A never-packed state
    /// yields a packer equivalent to `new(config)`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AtlasError> {
        let (packer, _): (Self, _) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| AtlasError::Corrupt(e.to_string()))?;
        Ok(packer)
    }

    // ---------------------------------------------------------------
    // Internal
    // ---------------------------------------------------------------

    /// Find a position for a w×h rect, opening a new shelf if needed.
    fn allocate(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        let size = self.config.size;
        let margin = self.config.margin;
        let padded_w = w + margin;
        let padded_h = h + margin;

        if margin + padded_w > size {
            return None; // wider than the atlas
        }

        // Try existing shelves.
        for shelf in &mut self.shelves {
            if shelf.height >= padded_h && shelf.cursor_x + padded_w <= size {
                let pos = (shelf.cursor_x, shelf.y);
                shelf.cursor_x += padded_w;
                return Some(pos);
            }
        }

        // Open a new shelf below the last one.
        let shelf_y = self
            .shelves
            .last()
            .map(|s| s.y + s.height)
            .unwrap_or(margin);

        if shelf_y + padded_h > size {
            return None; // atlas full
        }

        self.shelves.push(Shelf {
            y: shelf_y,
            height: padded_h,
            cursor_x: margin + padded_w,
        });

        Some((margin, shelf_y))
    }
}

// ===================================================================
// Tests
// ===================================================================
