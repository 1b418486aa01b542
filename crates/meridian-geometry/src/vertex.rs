//! Vertex formats for tessellated fills.

use bytemuck::{Pod, Zeroable};

/// 2D position vertex for tessellated fills.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FillVertex {
    pub position: [f32; 2],
}

impl FillVertex {
    pub fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }
}

/// Output from tessellation: vertices and triangle indices.
#[derive(Debug, Clone, Default)]
pub struct TessellatedMesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> TessellatedMesh<V> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn from_data(vertices: Vec<V>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append another mesh, rebasing its indices.
    pub fn append(&mut self, other: TessellatedMesh<V>) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<FillVertex>(), 8);
        let vertices = [FillVertex::new(1.0, 2.0)];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 8);
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut mesh = TessellatedMesh::from_data(
            vec![FillVertex::new(0.0, 0.0); 3],
            vec![0, 1, 2],
        );
        mesh.append(TessellatedMesh::from_data(
            vec![FillVertex::new(1.0, 1.0); 3],
            vec![0, 2, 1],
        ));

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 5, 4]);
        assert_eq!(mesh.triangle_count(), 2);

        mesh.clear();
        assert!(mesh.is_empty());
    }
}
