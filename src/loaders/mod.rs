pub mod asset;
pub mod cubemap;
pub mod gltf;
pub mod mesh;
pub mod stl;

pub use asset::{load_mesh_file, parse_mesh, AssetLoader, LoadEvent, LoadProgress};
pub use cubemap::{load_cube_map, CubeMapData};
pub use mesh::MeshData;

/// Failures specific to the asset formats this viewer reads
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("unsupported mesh format: {0:?}")]
    UnsupportedFormat(Option<String>),
    #[error("mesh contains no triangles")]
    EmptyMesh,
    #[error("malformed mesh: {0}")]
    MalformedMesh(String),
    #[error("malformed STL: {0}")]
    MalformedStl(String),
    #[error("cube map face {0:?} not found")]
    MissingCubeFace(String),
    #[error("cube map needs 6 faces, got {0}")]
    CubeFaceCount(usize),
    #[error("cube map face {face} is {width}x{height}, expected {expected}x{expected}")]
    CubeFaceSize {
        face: String,
        width: u32,
        height: u32,
        expected: u32,
    },
}
