//! glTF mesh loading for the textured recipes.

use std::path::{Path, PathBuf};

use bytemuck::{Pod, Zeroable};

/// Error type for mesh loading.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to import glTF {}: {source}", .path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("{} contains no meshes", .0.display())]
    NoMesh(PathBuf),

    #[error("first mesh of {} has no triangle primitive", .0.display())]
    NoTrianglePrimitive(PathBuf),

    #[error("primitive has no position data")]
    MissingPositions,

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Interleaved vertex used by the mesh and environment shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // normal
        2 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// CPU-side triangle mesh ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshAsset {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Converts a glTF Y-up vector into the recipes' axis convention.
fn swizzle([x, y, z]: [f32; 3]) -> [f32; 3] {
    [x, z, y]
}

/// Builds a [`MeshAsset`] from raw attribute streams.
///
/// Missing normals or texture coordinates read as zero; a missing index
/// stream means the vertices are already a triangle list.
fn build_mesh(
    positions: Vec<[f32; 3]>,
    normals: Option<Vec<[f32; 3]>>,
    uvs: Option<Vec<[f32; 2]>>,
    indices: Option<Vec<u32>>,
) -> Result<MeshAsset, MeshError> {
    let vertex_count = positions.len();

    let vertices = positions
        .into_iter()
        .enumerate()
        .map(|(i, p)| MeshVertex {
            position: swizzle(p),
            normal: normals
                .as_ref()
                .and_then(|n| n.get(i).copied())
                .map(swizzle)
                .unwrap_or_default(),
            uv: uvs.as_ref().and_then(|t| t.get(i).copied()).unwrap_or_default(),
        })
        .collect();

    let mut indices = indices.unwrap_or_else(|| (0..vertex_count as u32).collect());
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(MeshError::IndexOutOfRange { index, vertex_count });
    }
    indices.truncate(indices.len() - indices.len() % 3);

    Ok(MeshAsset { vertices, indices })
}

/// Loads the first triangle primitive of the first mesh in a glTF file.
pub fn load_gltf_mesh(path: impl AsRef<Path>) -> Result<MeshAsset, MeshError> {
    let path = path.as_ref();
    let (document, buffers, _images) = gltf::import(path).map_err(|source| MeshError::Import {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = document
        .meshes()
        .next()
        .ok_or_else(|| MeshError::NoMesh(path.to_path_buf()))?;

    let primitive = mesh
        .primitives()
        .find(|p| p.mode() == gltf::mesh::Mode::Triangles)
        .ok_or_else(|| MeshError::NoTrianglePrimitive(path.to_path_buf()))?;

    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .ok_or(MeshError::MissingPositions)?
        .collect();
    let normals = reader.read_normals().map(|n| n.collect());
    let uvs = reader.read_tex_coords(0).map(|t| t.into_f32().collect());
    let indices = reader.read_indices().map(|i| i.into_u32().collect());

    let asset = build_mesh(positions, normals, uvs, indices)?;
    log::info!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        asset.vertices.len(),
        asset.indices.len() / 3
    );
    Ok(asset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
        assert_eq!(MeshVertex::layout().array_stride, 32);
    }

    #[test]
    fn positions_and_normals_swap_y_and_z() {
        let mesh = build_mesh(
            vec![[1.0, 2.0, 3.0], [0.0; 3], [0.0; 3]],
            Some(vec![[0.0, 1.0, 0.0]; 3]),
            None,
            None,
        )
        .unwrap();
        assert_eq!(mesh.vertices[0].position, [1.0, 3.0, 2.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn missing_attributes_read_as_zero() {
        let mesh = build_mesh(vec![[0.0; 3]; 3], None, None, Some(vec![0, 1, 2])).unwrap();
        assert!(mesh.vertices.iter().all(|v| v.uv == [0.0, 0.0] && v.normal == [0.0; 3]));
    }

    #[test]
    fn uvs_are_kept_as_is() {
        let mesh = build_mesh(
            vec![[0.0; 3]; 3],
            None,
            Some(vec![[0.25, 0.75], [1.0, 0.0], [0.0, 1.0]]),
            None,
        )
        .unwrap();
        assert_eq!(mesh.vertices[0].uv, [0.25, 0.75]);
    }

    #[test]
    fn unindexed_primitive_gets_sequential_indices() {
        let mesh = build_mesh(vec![[0.0; 3]; 6], None, None, None).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = build_mesh(vec![[0.0; 3]; 3], None, None, Some(vec![0, 1, 3])).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 3, vertex_count: 3 }));
    }

    #[test]
    fn trailing_partial_triangle_is_dropped() {
        let mesh = build_mesh(vec![[0.0; 3]; 3], None, None, Some(vec![0, 1, 2, 0])).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_gltf_mesh("no/such/duck.gltf").unwrap_err();
        assert!(err.to_string().contains("duck.gltf"));
    }
}
