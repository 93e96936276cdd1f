use std::collections::HashSet;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::RenderCtx;

/// Unique undirected edges of a triangle list, as a line-list index buffer.
///
/// Edges keep the order they are first met in. A trailing partial triangle
/// is ignored.
pub fn wireframe_edges(indices: &[u32]) -> Vec<u32> {
    let mut seen: HashSet<(u32, u32)> = HashSet::with_capacity(indices.len());
    let mut lines = Vec::with_capacity(indices.len() * 2);

    for tri in indices.chunks_exact(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            if a == b {
                continue;
            }
            if seen.insert((a.min(b), a.max(b))) {
                lines.push(a);
                lines.push(b);
            }
        }
    }

    lines
}

/// GPU vertex/index buffers of one indexed mesh, plus its wireframe edges.
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub edge_buffer: wgpu::Buffer,
    pub edge_count: u32,
}

impl MeshBuffers {
    pub fn new<V: Pod>(ctx: &RenderCtx<'_>, vertices: &[V], indices: &[u32], label: &str) -> Self {
        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vbo")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} ibo")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let edges = wireframe_edges(indices);
        let edge_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} edges")),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "{label}: {} vertices, {} triangles, {} edges",
            vertices.len(),
            indices.len() / 3,
            edges.len() / 2
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            edge_buffer,
            edge_count: edges.len() as u32,
        }
    }

    /// Binds vertex slot 0 and the triangle indices, then draws.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Binds vertex slot 0 and the edge indices, then draws a line list.
    pub fn draw_edges(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.edge_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_shares_its_diagonal() {
        let edges = wireframe_edges(&[0, 1, 2, 2, 1, 3]);
        assert_eq!(edges, vec![0, 1, 1, 2, 2, 0, 1, 3, 3, 2]);
    }

    #[test]
    fn single_triangle_has_three_edges() {
        assert_eq!(wireframe_edges(&[4, 5, 6]).len(), 6);
    }

    #[test]
    fn degenerate_and_partial_triangles_add_nothing() {
        assert!(wireframe_edges(&[1, 1, 1]).is_empty());
        assert!(wireframe_edges(&[0, 1]).is_empty());
    }

    #[test]
    fn closed_cube_has_eighteen_edges() {
        // 12 box edges plus one diagonal per face.
        let indices = [
            0, 1, 2, 2, 3, 0, // front
            1, 5, 6, 6, 2, 1, // right
            7, 6, 5, 5, 4, 7, // back
            4, 0, 3, 3, 7, 4, // left
            4, 5, 1, 1, 0, 4, // bottom
            3, 2, 6, 6, 7, 3, // top
        ];
        assert_eq!(wireframe_edges(&indices).len() / 2, 18);
    }
}
