//! Hardcoded geometry.

use bytemuck::{Pod, Zeroable};

/// Position-only vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl PositionVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PositionVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const fn v(x: f32, y: f32, z: f32) -> PositionVertex {
    PositionVertex { position: [x, y, z] }
}

/// Corners of the cube spanning `[-1, 1]` on every axis.
///
/// 0..4 is the +Z face, 4..8 the -Z face, both counter-clockwise seen from +Z.
const CUBE_VERTICES: [PositionVertex; 8] = [
    v(-1.0, -1.0, 1.0),
    v(1.0, -1.0, 1.0),
    v(1.0, 1.0, 1.0),
    v(-1.0, 1.0, 1.0),
    v(-1.0, -1.0, -1.0),
    v(1.0, -1.0, -1.0),
    v(1.0, 1.0, -1.0),
    v(-1.0, 1.0, -1.0),
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 2, 3, 0, // +z
    1, 5, 6, 6, 2, 1, // +x
    7, 6, 5, 5, 4, 7, // -z
    4, 0, 3, 3, 7, 4, // -x
    4, 5, 1, 1, 0, 4, // -y
    3, 2, 6, 6, 7, 3, // +y
];

/// Returns the cube's 8 corners and 36 triangle-list indices.
pub fn cube() -> (Vec<PositionVertex>, Vec<u32>) {
    (CUBE_VERTICES.to_vec(), CUBE_INDICES.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_triangles_over_eight_corners() {
        let (vertices, indices) = cube();
        assert_eq!(vertices.len(), 8);
        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn every_corner_is_used_by_three_faces() {
        let (_, indices) = cube();
        for corner in 0..8u32 {
            let faces = indices
                .chunks_exact(6)
                .filter(|face| face.contains(&corner))
                .count();
            assert_eq!(faces, 3, "corner {corner}");
        }
    }

    #[test]
    fn corners_lie_on_the_unit_cube() {
        let (vertices, _) = cube();
        for vert in vertices {
            assert!(vert.position.iter().all(|c| c.abs() == 1.0));
        }
    }
}
