//! GPU vertex and instance data types for the text renderer.
//!
//! All types derive `bytemuck::Pod` + `Zeroable` for zero-copy upload
//! to GPU buffers.

use bytemuck::{Pod, Zeroable};

// ───────────────────────────────────────────────────────────────────
// Vertex (unit quad)
// ───────────────────────────────────────────────────────────────────

/// A single vertex of the unit quad (0,0)→(1,1).
///
/// The quad is shared across ALL glyph instances. Per-instance data
/// (position, scale, UV, color) is provided via `GlyphInstance`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct QuadVertex {
    /// Position in [0, 1] space.
    pub position: [f32; 2],
}

impl QuadVertex {
    /// The 4 vertices of a unit quad, centered at the origin.
    pub const VERTICES: [QuadVertex; 4] = [
        QuadVertex { position: [-0.5, -0.5] },
        QuadVertex { position: [0.5, -0.5] },
        QuadVertex { position: [-0.5, 0.5] },
        QuadVertex { position: [0.5, 0.5] },
    ];

    /// Triangle-list indices for the unit quad.
    pub const INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];
}

// ───────────────────────────────────────────────────────────────────
// Instance data
// ───────────────────────────────────────────────────────────────────

/// Per-instance data for a single glyph quad drawn via instanced
/// rendering.
///
/// 64 bytes per instance — 10,000 glyphs = 640 KB of GPU memory.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GlyphInstance {
    /// World-space position of the quad center.
    pub position: [f32; 3],
    /// World-space quad extents.
    pub scale: [f32; 2],
    /// Atlas region: `[u, v, width, height]`, normalized.
    pub atlas_uv: [f32; 4],
    /// RGBA text color, each channel in [0.0, 1.0].
    pub color: [f32; 4],
    /// Index of the atlas texture in the bound texture array.
    pub atlas_index: u32,
    /// Padding for 16-byte alignment.
    pub _pad: [f32; 2],
}

impl GlyphInstance {
    pub fn new(
        position: [f32; 3],
        scale: [f32; 2],
        atlas_uv: [f32; 4],
        color: [f32; 4],
    ) -> Self {
        Self {
            position,
            scale,
            atlas_uv,
            color,
            atlas_index: 0,
            _pad: [0.0; 2],
        }
    }

    pub fn with_atlas(mut self, index: u32) -> Self {
        self.atlas_index = index;
        self
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_is_64_bytes() {
        assert_eq!(std::mem::size_of::<GlyphInstance>(), 64);
    }

    #[test]
    fn test_instance_pod_round_trip() {
        let instance = GlyphInstance::new(
            [1.0, -2.0, 0.0],
            [0.5, 0.7],
            [0.1, 0.2, 0.05, 0.05],
            [1.0, 1.0, 1.0, 1.0],
        )
        .with_atlas(3);
        let bytes = bytemuck::bytes_of(&instance);
        let back: &GlyphInstance = bytemuck::from_bytes(bytes);
        assert_eq!(*back, instance);
    }

    #[test]
    fn test_unit_quad_covers_unit_area() {
        let xs: Vec<f32> = QuadVertex::VERTICES.iter().map(|v| v.position[0]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 0.5);
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -0.5);
        assert_eq!(QuadVertex::INDICES.len(), 6);
    }
}
