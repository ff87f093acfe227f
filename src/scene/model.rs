use glam::{EulerRot, Mat4, Vec3};

use super::particles::ParticleSystem;
use crate::catalog::DEFAULT_MATERIAL;
use crate::loaders::{AssetError, MeshData};
use crate::math::AABB;

/// Edge length the largest bounding-box dimension is scaled to
pub const TARGET_SIZE: f32 = 20.0;

/// Uniform scale and placement that centre a mesh and fit it to `TARGET_SIZE`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub center: Vec3,
    pub max_dimension: f32,
    pub base_scale: f32,
    /// Translation applied after scaling so the scaled centre lands on the origin
    pub position: Vec3,
}

/// Degenerate boxes (flat to a point, or non-finite) keep a unit scale
pub fn normalize(bounds: &AABB) -> Normalization {
    let center = bounds.center();
    let max_dimension = bounds.max_dimension();

    let base_scale = if max_dimension.is_finite() && max_dimension > f32::EPSILON {
        TARGET_SIZE / max_dimension
    } else {
        1.0
    };

    Normalization {
        center,
        max_dimension,
        base_scale,
        position: -center * base_scale,
    }
}

/// The loaded mesh together with its presentation state
#[derive(Debug, Clone)]
pub struct Model {
    pub mesh: MeshData,
    pub bounds: AABB,
    /// Key into the material catalog
    pub material: String,
    /// Scale fixed at load time; scroll zoom multiplies this
    pub base_scale: f32,
    pub position: Vec3,
    pub scale: f32,
    /// Euler angles in radians, applied in XYZ order
    pub rotation: Vec3,
    pub particles: ParticleSystem,
}

impl Model {
    /// Centres and scales the mesh, and anchors the particle cloud at the
    /// model's resting position
    pub fn new(mesh: MeshData, mut particles: ParticleSystem) -> Result<Self, AssetError> {
        let bounds = mesh.bounds().ok_or(AssetError::EmptyMesh)?;
        let fit = normalize(&bounds);

        log::info!(
            "Initial scale: {} Max dimension: {}",
            fit.base_scale,
            fit.max_dimension
        );

        particles.origin = fit.position;

        Ok(Self {
            mesh,
            bounds,
            material: DEFAULT_MATERIAL.to_string(),
            base_scale: fit.base_scale,
            position: fit.position,
            scale: fit.base_scale,
            rotation: Vec3::ZERO,
            particles,
        })
    }

    /// Model-to-world matrix: translate * rotate(XYZ) * uniform scale
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// World-space bounds of the mesh with the current scale and no rotation
    pub fn scaled_bounds(&self) -> AABB {
        self.bounds.scaled_then_translated(self.scale, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn box_mesh(min: Vec3, max: Vec3) -> MeshData {
        MeshData::from_triangles(&[[min, Vec3::new(max.x, min.y, min.z), max]])
    }

    #[test]
    fn normalize_targets_twenty_units() {
        let fit = normalize(&AABB::new(Vec3::ZERO, Vec3::new(10.0, 40.0, 5.0)));
        assert_eq!(fit.max_dimension, 40.0);
        assert_eq!(fit.base_scale, 0.5);
        assert_eq!(fit.position, Vec3::new(-2.5, -10.0, -1.25));
    }

    #[test]
    fn normalize_degenerate_box_keeps_unit_scale() {
        let fit = normalize(&AABB::new(Vec3::ONE, Vec3::ONE));
        assert_eq!(fit.base_scale, 1.0);
        assert_eq!(fit.position, -Vec3::ONE);
    }

    #[test]
    fn model_is_centered_after_normalization() {
        let mesh = box_mesh(Vec3::new(3.0, -7.0, 1.0), Vec3::new(13.0, 5.0, 9.0));
        let model = Model::new(mesh, ParticleSystem::with_seed(4, 0)).unwrap();

        let center = model.scaled_bounds().center();
        assert!(center.length() < 1e-5, "center {center:?}");
        assert!((model.scaled_bounds().max_dimension() - TARGET_SIZE).abs() < 1e-4);
    }

    #[test]
    fn particles_follow_model_position() {
        let mesh = box_mesh(Vec3::new(2.0, 2.0, 2.0), Vec3::new(6.0, 6.0, 6.0));
        let model = Model::new(mesh, ParticleSystem::with_seed(4, 0)).unwrap();
        assert_eq!(model.particles.origin, model.position);
    }

    #[test]
    fn starts_with_glass_and_base_scale() {
        let mesh = box_mesh(Vec3::ZERO, Vec3::splat(4.0));
        let model = Model::new(mesh, ParticleSystem::with_seed(4, 0)).unwrap();
        assert_eq!(model.material, "glass");
        assert_eq!(model.scale, model.base_scale);
        assert_eq!(model.rotation, Vec3::ZERO);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let result = Model::new(MeshData::default(), ParticleSystem::with_seed(4, 0));
        assert!(matches!(result, Err(AssetError::EmptyMesh)));
    }

    #[test]
    fn transform_applies_scale_before_translation() {
        let mesh = box_mesh(Vec3::ZERO, Vec3::splat(40.0));
        let model = Model::new(mesh, ParticleSystem::with_seed(4, 0)).unwrap();
        // Box corner (40,40,40) * 0.5 - 10 = 10
        let corner = model.transform().transform_point3(Vec3::splat(40.0));
        assert!((corner - Vec3::splat(10.0)).length() < 1e-5);
    }
}
