use glam::Vec3;

use super::mesh::MeshData;
use super::AssetError;

const HEADER_LEN: usize = 80;
const TRIANGLE_RECORD_LEN: usize = 50;

/// Parses binary or ASCII STL, detected by content
///
/// A buffer whose length matches the binary record count is binary even when
/// the header starts with `solid`, which some exporters write. Otherwise only
/// a leading `solid` marks ASCII; everything else is read as binary, trailing
/// padding included.
pub fn parse_stl(bytes: &[u8]) -> Result<MeshData, AssetError> {
    let triangles = if is_ascii(bytes) {
        parse_ascii(bytes)?
    } else {
        parse_binary(bytes)?
    };

    if triangles.is_empty() {
        return Err(AssetError::EmptyMesh);
    }

    Ok(MeshData::from_triangles(&triangles))
}

fn binary_triangle_count(bytes: &[u8]) -> Option<usize> {
    let count = bytes.get(HEADER_LEN..HEADER_LEN + 4)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]) as usize)
}

fn binary_len(count: usize) -> usize {
    HEADER_LEN + 4 + count * TRIANGLE_RECORD_LEN
}

fn is_ascii(bytes: &[u8]) -> bool {
    if binary_triangle_count(bytes).is_some_and(|count| bytes.len() == binary_len(count)) {
        return false;
    }
    bytes.trim_ascii_start().starts_with(b"solid")
}

fn read_vec3(record: &[u8]) -> Vec3 {
    let f = |i: usize| {
        f32::from_le_bytes([record[i], record[i + 1], record[i + 2], record[i + 3]])
    };
    Vec3::new(f(0), f(4), f(8))
}

fn parse_binary(bytes: &[u8]) -> Result<Vec<[Vec3; 3]>, AssetError> {
    let count = binary_triangle_count(bytes).ok_or_else(|| {
        AssetError::MalformedStl(format!("{} bytes is too short for an STL header", bytes.len()))
    })?;

    let expected = binary_len(count);
    if bytes.len() < expected {
        return Err(AssetError::MalformedStl(format!(
            "{count} triangles need {expected} bytes, got {}",
            bytes.len()
        )));
    }

    // Record layout: normal, three vertices, u16 attribute count
    let triangles = bytes[HEADER_LEN + 4..]
        .chunks_exact(TRIANGLE_RECORD_LEN)
        .take(count)
        .map(|record| {
            [
                read_vec3(&record[12..24]),
                read_vec3(&record[24..36]),
                read_vec3(&record[36..48]),
            ]
        })
        .collect();

    Ok(triangles)
}

fn parse_ascii(bytes: &[u8]) -> Result<Vec<[Vec3; 3]>, AssetError> {
    // Solid names are free text; only the numbers have to be ASCII
    let text = String::from_utf8_lossy(bytes);

    let mut vertices = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }

        let coords: Vec<f32> = tokens
            .map(str::parse::<f32>)
            .collect::<Result<_, _>>()
            .map_err(|e| AssetError::MalformedStl(format!("line {}: {e}", line_no + 1)))?;

        if coords.len() != 3 {
            return Err(AssetError::MalformedStl(format!(
                "line {}: vertex has {} coordinates",
                line_no + 1,
                coords.len()
            )));
        }
        vertices.push(Vec3::new(coords[0], coords[1], coords[2]));
    }

    if vertices.len() % 3 != 0 {
        return Err(AssetError::MalformedStl(format!(
            "{} vertices do not form whole triangles",
            vertices.len()
        )));
    }

    Ok(vertices
        .chunks_exact(3)
        .map(|v| [v[0], v[1], v[2]])
        .collect())
}
