//! The base geometry shared by every portion of a layer.

use crate::buffer::ArrayBuffer;
use crate::error::{LayerError, LayerResult};
use meridian_core::math::{Aabb3, Mat4, Vec3};
use meridian_core::quantize::{self, decompress_position};
use meridian_test_utils::RenderContext;

/// Description of a base geometry, as handed over by a loader.
///
/// Positions are quantized to `u16` and restored with
/// `positions_decode_matrix`. Normals are oct-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDescriptor {
    pub positions: Vec<[u16; 3]>,
    pub positions_decode_matrix: Mat4,
    pub normals: Option<Vec<[i8; 2]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub indices: Vec<u32>,
    pub edge_indices: Option<Vec<u32>>,
    /// Oriented bounding box corners in decoded local space. Computed from
    /// the positions when absent.
    pub obb: Option<[Vec3; 8]>,
}

impl GeometryDescriptor {
    /// Quantize float positions into a new descriptor.
    pub fn from_positions(positions: &[Vec3], indices: Vec<u32>) -> Self {
        let quantized = quantize::quantize_positions(positions);
        Self {
            positions: quantized.positions,
            positions_decode_matrix: quantized.decode_matrix,
            normals: None,
            uvs: None,
            indices,
            edge_indices: None,
            obb: None,
        }
    }

    pub fn with_normals(mut self, normals: &[Vec3]) -> Self {
        self.normals = Some(normals.iter().map(|n| quantize::oct_encode(*n)).collect());
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<[f32; 2]>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn with_edge_indices(mut self, edge_indices: Vec<u32>) -> Self {
        self.edge_indices = Some(edge_indices);
        self
    }

    pub fn with_obb(mut self, obb: [Vec3; 8]) -> Self {
        self.obb = Some(obb);
        self
    }
}

/// Validated CPU-side base geometry.
///
/// Positions and triangle indices stay on the CPU for the life of the layer
/// because precise picking tests against them. Everything else moves to the
/// GPU at finalize.
#[derive(Debug)]
pub struct InstancingGeometry {
    positions: Vec<[u16; 3]>,
    decode_matrix: Mat4,
    indices: Vec<u32>,
    obb: [Vec3; 8],
    staged: Option<StagedAttributes>,
    has_normals: bool,
    has_uvs: bool,
    has_edges: bool,
}

#[derive(Debug)]
struct StagedAttributes {
    normals: Option<Vec<[i8; 2]>>,
    uvs: Option<Vec<[f32; 2]>>,
    edge_indices: Option<Vec<u32>>,
}

impl InstancingGeometry {
    pub fn new(desc: GeometryDescriptor) -> LayerResult<Self> {
        let vertex_count = desc.positions.len();
        if vertex_count == 0 {
            return Err(LayerError::InvalidGeometry("no positions".into()));
        }
        if desc.indices.is_empty() || desc.indices.len() % 3 != 0 {
            return Err(LayerError::InvalidGeometry(format!(
                "triangle index count {} is not a non-zero multiple of 3",
                desc.indices.len()
            )));
        }
        if let Some(bad) = desc.indices.iter().find(|i| **i as usize >= vertex_count) {
            return Err(LayerError::InvalidGeometry(format!(
                "index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }
        if let Some(edges) = &desc.edge_indices {
            if edges.len() % 2 != 0 || edges.iter().any(|i| *i as usize >= vertex_count) {
                return Err(LayerError::InvalidGeometry(
                    "edge indices must be in-range pairs".into(),
                ));
            }
        }
        if desc.normals.as_ref().is_some_and(|n| n.len() != vertex_count) {
            return Err(LayerError::InvalidGeometry("normal count mismatch".into()));
        }
        if desc.uvs.as_ref().is_some_and(|uv| uv.len() != vertex_count) {
            return Err(LayerError::InvalidGeometry("uv count mismatch".into()));
        }

        let obb = desc.obb.unwrap_or_else(|| {
            let aabb = Aabb3::from_points(
                desc.positions
                    .iter()
                    .map(|p| decompress_position(*p, &desc.positions_decode_matrix).as_dvec3()),
            );
            aabb.corners().map(|c| c.as_vec3())
        });

        Ok(Self {
            has_normals: desc.normals.is_some(),
            has_uvs: desc.uvs.is_some(),
            has_edges: desc.edge_indices.as_ref().is_some_and(|e| !e.is_empty()),
            positions: desc.positions,
            decode_matrix: desc.positions_decode_matrix,
            indices: desc.indices,
            obb,
            staged: Some(StagedAttributes {
                normals: desc.normals,
                uvs: desc.uvs,
                edge_indices: desc.edge_indices,
            }),
        })
    }

    pub fn has_normals(&self) -> bool {
        self.has_normals
    }

    pub fn has_uvs(&self) -> bool {
        self.has_uvs
    }

    pub fn has_edges(&self) -> bool {
        self.has_edges
    }

    pub fn decode_matrix(&self) -> &Mat4 {
        &self.decode_matrix
    }

    pub fn obb(&self) -> &[Vec3; 8] {
        &self.obb
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Decoded corners of every triangle, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            <[u32; 3]>::try_from(tri).unwrap().map(|i| decompress_position(self.positions[i as usize], &self.decode_matrix))
        })
    }

    /// Move the vertex data to the GPU, dropping the staged copies.
    pub(crate) fn upload(&mut self, ctx: &dyn RenderContext, label: &str) -> GeometryBuffers {
        let staged = self.staged.take().unwrap_or(StagedAttributes {
            normals: None,
            uvs: None,
            edge_indices: None,
        });

        let padded_positions: Vec<[u16; 4]> =
            self.positions.iter().map(|p| [p[0], p[1], p[2], 0]).collect();
        let positions = ArrayBuffer::new(
            ctx,
            &format!("{label} positions"),
            wgpu::BufferUsages::VERTEX,
            8,
            bytemuck::cast_slice(&padded_positions),
        );

        let normals = staged.normals.map(|normals| {
            let padded: Vec<[i8; 4]> = normals.iter().map(|n| [n[0], n[1], 0, 0]).collect();
            ArrayBuffer::new(
                ctx,
                &format!("{label} normals"),
                wgpu::BufferUsages::VERTEX,
                4,
                bytemuck::cast_slice(&padded),
            )
        });

        let uvs = staged.uvs.map(|uvs| {
            ArrayBuffer::new(
                ctx,
                &format!("{label} uvs"),
                wgpu::BufferUsages::VERTEX,
                8,
                bytemuck::cast_slice(&uvs),
            )
        });

        let indices = ArrayBuffer::indices(ctx, &format!("{label} indices"), &self.indices);
        let edge_indices = staged
            .edge_indices
            .filter(|e| !e.is_empty())
            .map(|e| ArrayBuffer::indices(ctx, &format!("{label} edge indices"), &e));

        GeometryBuffers {
            positions,
            normals,
            uvs,
            indices,
            edge_indices,
        }
    }
}

/// GPU side of the base geometry.
#[derive(Debug)]
pub struct GeometryBuffers {
    pub positions: ArrayBuffer,
    pub normals: Option<ArrayBuffer>,
    pub uvs: Option<ArrayBuffer>,
    pub indices: ArrayBuffer,
    pub edge_indices: Option<ArrayBuffer>,
}

impl GeometryBuffers {
    pub(crate) fn destroy(&mut self, ctx: &dyn RenderContext) {
        self.positions.destroy(ctx);
        if let Some(normals) = &mut self.normals {
            normals.destroy(ctx);
        }
        if let Some(uvs) = &mut self.uvs {
            uvs.destroy(ctx);
        }
        self.indices.destroy(ctx);
        if let Some(edges) = &mut self.edge_indices {
            edges.destroy(ctx);
        }
    }
}
