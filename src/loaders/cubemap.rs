use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::AssetError;

/// Face file stems in wgpu cube layer order (+X, -X, +Y, -Y, +Z, -Z)
pub const FACE_NAMES: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];

const FACE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Six square RGBA8 faces of equal size
#[derive(Debug, Clone)]
pub struct CubeMapData {
    pub size: u32,
    pub faces: Vec<Vec<u8>>,
}

impl CubeMapData {
    /// Validates decoded faces; all six must be square and the same size
    pub fn from_faces(faces: Vec<image::RgbaImage>) -> Result<Self, AssetError> {
        if faces.len() != FACE_NAMES.len() {
            return Err(AssetError::CubeFaceCount(faces.len()));
        }

        let size = faces[0].width();
        for (name, face) in FACE_NAMES.iter().zip(&faces) {
            if face.width() != size || face.height() != size {
                return Err(AssetError::CubeFaceSize {
                    face: name.to_string(),
                    width: face.width(),
                    height: face.height(),
                    expected: size,
                });
            }
        }

        Ok(Self {
            size,
            faces: faces.into_iter().map(|f| f.into_raw()).collect(),
        })
    }

    /// 1x1 single-colour cube, used when the face images are unavailable
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            size: 1,
            faces: vec![rgba.to_vec(); FACE_NAMES.len()],
        }
    }
}

/// Loads `posx.jpg` .. `negz.jpg` (or `.png`) from a directory
pub fn load_cube_map(dir: impl AsRef<Path>) -> Result<CubeMapData> {
    let dir = dir.as_ref();

    let faces = FACE_NAMES
        .iter()
        .map(|name| {
            let path = find_face(dir, name)?;
            let face = image::open(&path)
                .context(format!("Failed to decode cube face {:?}", path))?
                .into_rgba8();
            Ok(face)
        })
        .collect::<Result<Vec<_>>>()?;

    let cube = CubeMapData::from_faces(faces)
        .context(format!("Invalid cube map in {:?}", dir))?;
    log::info!("Environment map loaded: {}px faces from {:?}", cube.size, dir);
    Ok(cube)
}

fn find_face(dir: &Path, name: &str) -> Result<PathBuf> {
    FACE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{name}.{ext}")))
        .find(|path| path.is_file())
        .ok_or_else(|| AssetError::MissingCubeFace(name.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(sizes: [u32; 6]) -> Vec<image::RgbaImage> {
        sizes.iter().map(|&s| image::RgbaImage::new(s, s)).collect()
    }

    #[test]
    fn test_equal_faces_accepted() {
        let cube = CubeMapData::from_faces(faces([4; 6])).unwrap();
        assert_eq!(cube.size, 4);
        assert_eq!(cube.faces.len(), 6);
        assert_eq!(cube.faces[0].len(), 4 * 4 * 4);
    }

    #[test]
    fn test_mismatched_face_rejected() {
        let err = CubeMapData::from_faces(faces([4, 4, 4, 8, 4, 4])).unwrap_err();
        assert!(matches!(err, AssetError::CubeFaceSize { ref face, .. } if face == "negy"));
    }

    #[test]
    fn test_non_square_face_rejected() {
        let mut list = faces([2; 6]);
        list[5] = image::RgbaImage::new(2, 3);
        assert!(CubeMapData::from_faces(list).is_err());
    }

    #[test]
    fn test_wrong_face_count_rejected() {
        let list = vec![image::RgbaImage::new(1, 1); 5];
        assert!(matches!(
            CubeMapData::from_faces(list),
            Err(AssetError::CubeFaceCount(5))
        ));
    }

    #[test]
    fn test_solid_fallback() {
        let cube = CubeMapData::solid([10, 20, 30, 255]);
        assert_eq!(cube.size, 1);
        assert!(cube.faces.iter().all(|f| f == &vec![10, 20, 30, 255]));
    }

    #[test]
    fn test_missing_directory_fails() {
        assert!(load_cube_map("no/such/cube/dir").is_err());
    }
}
