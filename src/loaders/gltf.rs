use anyhow::{Context, Result};
use glam::{Mat3, Mat4, Vec3};
use std::path::Path;

use super::mesh::MeshData;
use super::AssetError;

/// Loads every mesh of a `.gltf` file (external buffers resolved next to it)
pub fn load_gltf_file(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    let (document, buffers, _images) =
        gltf::import(path).context(format!("Failed to load glTF file: {:?}", path))?;
    collect_document(&document, &buffers)
}

/// Loads every mesh of a self-contained `.glb` (or data-URI `.gltf`) buffer
pub fn load_gltf_slice(bytes: &[u8]) -> Result<MeshData> {
    let (document, buffers, _images) =
        gltf::import_slice(bytes).context("Failed to parse glTF binary")?;
    collect_document(&document, &buffers)
}

fn collect_document(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<MeshData> {
    log::debug!(
        "glTF: {} scenes, {} nodes, {} meshes",
        document.scenes().count(),
        document.nodes().count(),
        document.meshes().count()
    );

    let mut mesh = MeshData::default();

    // Only the default scene is shown; fall back to the first one
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(AssetError::EmptyMesh)?;

    for node in scene.nodes() {
        process_node(&node, buffers, &Mat4::IDENTITY, &mut mesh)?;
    }

    if mesh.triangle_count() == 0 {
        return Err(AssetError::EmptyMesh.into());
    }

    log::debug!("Extracted {} triangles from glTF", mesh.triangle_count());
    Ok(mesh)
}

/// Recursively processes glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    out: &mut MeshData,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, out)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, out)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    out: &mut MeshData,
) -> Result<()> {
    let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "Skipping {:?} primitive in mesh {:?}",
                primitive.mode(),
                mesh.name()
            );
            continue;
        }

        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<Vec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();

        if positions.is_empty() {
            continue;
        }

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let normals: Vec<Vec3> = reader
            .read_normals()
            .map(|normals| {
                normals
                    .map(|n| {
                        (normal_matrix * Vec3::from_array(n))
                            .try_normalize()
                            .unwrap_or(Vec3::Z)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut part = MeshData {
            positions,
            normals,
            indices,
        };
        part.validate()
            .context(format!("Invalid primitive in mesh {:?}", mesh.name()))?;

        if part.normals.is_empty() {
            part.compute_vertex_normals();
        }

        out.append(part);
    }

    Ok(())
}
