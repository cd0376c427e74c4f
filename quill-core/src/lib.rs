//! # quill-core
//!
//! Shared data model for the Quill MSDF text subsystem. Every other
//! crate in the workspace builds on the types defined here.
//!
//! ## Architecture
//!
//! ```text
//! FontEngine (trait)  ──►  ShapedGlyph / GlyphMetrics
//!       │                        │
//!       ▼                        ▼
//! quill-text (atlas, runtime)  quill-layout (wrap, align)
//!       │                        │
//!       └────────► quill-render ◄┘
//! ```
//!
//! - [`glyph`] — per-glyph metrics and runtime (UV) data.
//! - [`font`] — font description, atlas/render configuration, flags.
//! - [`engine`] — the external font-engine collaborator trait.
//! - [`error`] — shared error taxonomy.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

pub mod engine;
pub mod error;
pub mod font;
pub mod glyph;

// Re-exports for ergonomic use.
pub use engine::FontEngine;
pub use error::FontError;
pub use font::{
    AtlasCompactFlags, AtlasConfig, FontDescription, FontHandle, GlyphRenderFlags, RenderConfig,
};
pub use glyph::{GlyphMetrics, GlyphRuntimeData, ShapedGlyph, UNPLACED};

// ───────────────────────────────────────────────────────────────────
// Vec2
// ───────────────────────────────────────────────────────────────────

/// 2-D vector used for em-space cursor math and sizes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline(always)]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise maximum.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

// ───────────────────────────────────────────────────────────────────
// UvRect
// ───────────────────────────────────────────────────────────────────

/// Normalized atlas region: origin + size, each component in [0, 1].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct UvRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

// ───────────────────────────────────────────────────────────────────
// Rgba8
// ───────────────────────────────────────────────────────────────────

/// A single atlas texel (RGBA, 8 bits per channel).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self { r: 0, g: 0, b: 0, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

// ===================================================================
// Tests
// ===================================================================
