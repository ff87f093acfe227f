//! Plain-old-data layouts shared with the WGSL shaders. Field order and
//! padding follow WGSL uniform alignment (vec3 aligned to 16 bytes).

use glam::{Mat4, Vec3};

use crate::catalog::MaterialPreset;
use crate::math::rgb_to_linear;
use crate::scroll::BackgroundGradient;

/// Camera uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 3],
    pub _pad: f32,
}

const _: [(); 80] = [(); std::mem::size_of::<CameraUniform>()];

/// Per-frame data for the mesh pass: camera, model transform and lights
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub camera: CameraUniform,
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb * intensity, w unused
    pub ambient: [f32; 4],
    /// Direction towards the light, w = intensity
    pub light_direction: [f32; 4],
    pub light_color: [f32; 4],
}

const _: [(); 256] = [(); std::mem::size_of::<SceneUniform>()];

impl SceneUniform {
    pub fn new(camera: CameraUniform, model: Mat4, lights: &Lighting) -> Self {
        Self {
            camera,
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            ambient: (Vec3::from_array(rgb_to_linear(lights.ambient_color))
                * lights.ambient_intensity)
                .extend(0.0)
                .to_array(),
            light_direction: lights
                .direction
                .normalize_or(Vec3::Y)
                .extend(lights.directional_intensity)
                .to_array(),
            light_color: Vec3::from_array(rgb_to_linear(lights.directional_color))
                .extend(1.0)
                .to_array(),
        }
    }
}

/// One ambient light plus one directional light, colours in sRGB
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    /// Points from the scene towards the light
    pub direction: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient_color: [1.0; 3],
            ambient_intensity: 0.5,
            directional_color: [1.0; 3],
            directional_intensity: 0.8,
            direction: Vec3::ONE,
        }
    }
}

/// Surface parameters for the mesh shader, colour converted to linear
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// Linear rgb, a = blend alpha
    pub color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub reflectivity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_map_intensity: f32,
    pub _pad: f32,
}

const _: [(); 48] = [(); std::mem::size_of::<MaterialUniform>()];

impl From<&MaterialPreset> for MaterialUniform {
    fn from(preset: &MaterialPreset) -> Self {
        let [r, g, b] = rgb_to_linear(preset.color);
        Self {
            color: [r, g, b, preset.alpha()],
            metalness: preset.metalness,
            roughness: preset.roughness,
            transmission: preset.transmission,
            reflectivity: preset.reflectivity,
            clearcoat: preset.clearcoat,
            clearcoat_roughness: preset.clearcoat_roughness,
            env_map_intensity: preset.env_map_intensity,
            _pad: 0.0,
        }
    }
}

/// Top and bottom colours of the background, linear
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GradientUniform {
    pub top: [f32; 4],
    pub bottom: [f32; 4],
}

impl From<&BackgroundGradient> for GradientUniform {
    fn from(gradient: &BackgroundGradient) -> Self {
        let [tr, tg, tb] = gradient.top_linear();
        let [br, bg, bb] = gradient.bottom_linear();
        Self {
            top: [tr, tg, tb, 1.0],
            bottom: [br, bg, bb, 1.0],
        }
    }
}

/// Billboard parameters shared by every particle
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    /// xyz = cloud origin, w = point size
    pub origin_size: [f32; 4],
    /// Linear rgb, a = opacity
    pub color: [f32; 4],
}

const _: [(); 128] = [(); std::mem::size_of::<ParticleUniform>()];

/// Per-instance particle offset from the cloud origin
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub offset: [f32; 3],
    pub _pad: f32,
}

impl ParticleInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<Vec3> for ParticleInstance {
    fn from(offset: Vec3) -> Self {
        Self {
            offset: offset.to_array(),
            _pad: 0.0,
        }
    }
}

/// Interleaved mesh vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Zips positions with normals; a missing normal becomes +Z
    pub fn interleave(positions: &[Vec3], normals: &[Vec3]) -> Vec<Self> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| Self {
                position: p.to_array(),
                normal: normals.get(i).copied().unwrap_or(Vec3::Z).to_array(),
            })
            .collect()
    }
}
