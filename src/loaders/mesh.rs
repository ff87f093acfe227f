use glam::Vec3;

use super::AssetError;
use crate::math::AABB;

/// Indexed triangle geometry as produced by the mesh parsers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Builds an unindexed triangle soup with one flat normal per face
    pub fn from_triangles(triangles: &[[Vec3; 3]]) -> Self {
        let mut positions = Vec::with_capacity(triangles.len() * 3);
        let mut normals = Vec::with_capacity(triangles.len() * 3);

        for tri in triangles {
            let normal = face_normal(tri[0], tri[1], tri[2]);
            positions.extend_from_slice(tri);
            normals.extend_from_slice(&[normal; 3]);
        }

        let indices = (0..positions.len() as u32).collect();
        Self {
            positions,
            normals,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(&self.positions)
    }

    /// Appends another mesh, rebasing its indices
    pub fn append(&mut self, other: MeshData) {
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.normals.extend(other.normals);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Checks that indices form whole triangles within the vertex range and
    /// that normals, when present, match the vertex count
    pub fn validate(&self) -> Result<(), AssetError> {
        if self.indices.len() % 3 != 0 {
            return Err(AssetError::MalformedMesh(format!(
                "{} indices do not form whole triangles",
                self.indices.len()
            )));
        }
        let vertex_count = self.positions.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(AssetError::MalformedMesh(format!(
                "index {index} out of range for {vertex_count} vertices"
            )));
        }
        if !self.normals.is_empty() && self.normals.len() != vertex_count {
            return Err(AssetError::MalformedMesh(format!(
                "{} normals for {vertex_count} vertices",
                self.normals.len()
            )));
        }
        Ok(())
    }

    /// Smooth normals from area-weighted face normals, for sources that ship none
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let weighted = (pb - pa).cross(pc - pa);
            accum[a] += weighted;
            accum[b] += weighted;
            accum[c] += weighted;
        }

        self.normals = accum
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Z))
            .collect();
    }
}

/// Counter-clockwise face normal; degenerate triangles get +Z
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).try_normalize().unwrap_or(Vec3::Z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> [Vec3; 3] {
        [Vec3::ZERO, Vec3::X, Vec3::Y]
    }

    #[test]
    fn test_from_triangles_flat_normals() {
        let mesh = MeshData::from_triangles(&[unit_triangle()]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.normals.iter().all(|&n| n == Vec3::Z));
    }

    #[test]
    fn test_degenerate_face_normal() {
        assert_eq!(face_normal(Vec3::ZERO, Vec3::ZERO, Vec3::X), Vec3::Z);
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut mesh = MeshData::from_triangles(&[unit_triangle()]);
        mesh.append(MeshData::from_triangles(&[unit_triangle()]));
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let mut mesh = MeshData::from_triangles(&[unit_triangle()]);
        assert!(mesh.validate().is_ok());
        mesh.indices[2] = 7;
        assert!(matches!(mesh.validate(), Err(AssetError::MalformedMesh(_))));
    }

    #[test]
    fn test_validate_rejects_mismatched_normals() {
        let mut mesh = MeshData::from_triangles(&[unit_triangle()]);
        mesh.normals.pop();
        assert!(mesh.validate().is_err());
        mesh.normals.clear();
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_compute_vertex_normals() {
        let mut mesh = MeshData {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)],
            normals: Vec::new(),
            indices: vec![0, 1, 2, 1, 3, 2],
        };
        mesh.compute_vertex_normals();
        assert_eq!(mesh.normals.len(), 4);
        for n in &mesh.normals {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_bounds() {
        let mesh = MeshData::from_triangles(&[[
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(3.0, 2.0, 0.0),
            Vec3::new(0.0, 0.0, 5.0),
        ]]);
        let bounds = mesh.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 2.0, 5.0));
    }
}
