//! Minimal Wavefront OBJ decoder.
//!
//! Reads positions (`v`), texcoords (`vt`), normals (`vn`) and faces (`f`).
//! Polygons are fan-triangulated and every face corner becomes its own
//! vertex. Corners without a normal get (0, 0, 1); corners without a texcoord
//! get (0, 0). Other statements (`o`, `g`, `s`, `usemtl`, `mtllib`, ...) are
//! ignored.

use std::path::Path;

use crate::error::AssetError;

use super::{Mesh, ModelVertex};

const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
const DEFAULT_UV: [f32; 2] = [0.0, 0.0];

/// Reads and decodes an OBJ file.
pub fn load(path: impl AsRef<Path>) -> Result<Mesh, AssetError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| AssetError::io(path, e))?;
    let text = String::from_utf8(bytes).map_err(|_| AssetError::Utf8 {
        path: path.to_path_buf(),
    })?;
    let mesh = decode(&text)?;
    log::info!(
        "loaded {}: {} vertices, {} indices",
        path.display(),
        mesh.vertex_count(),
        mesh.index_count()
    );
    Ok(mesh)
}

/// Decodes OBJ source text into an identity-indexed model mesh.
pub fn decode(source: &str) -> Result<Mesh, AssetError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut corners: Vec<ModelVertex> = Vec::new();

    for (i, raw) in source.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut fields = line.split_whitespace();
        let Some(keyword) = fields.next() else { continue };

        match keyword {
            "v" => positions.push(floats::<3>(fields, line_no, 3)?),
            "vn" => normals.push(floats::<3>(fields, line_no, 3)?),
            // The optional third (w) component is dropped.
            "vt" => uvs.push(floats::<2>(fields, line_no, 1)?),
            "f" => {
                let refs = fields
                    .map(|f| parse_corner(f, line_no, &positions, &uvs, &normals))
                    .collect::<Result<Vec<_>, _>>()?;
                if refs.len() < 3 {
                    return Err(AssetError::obj(line_no, "face needs at least 3 corners"));
                }
                for k in 1..refs.len() - 1 {
                    corners.extend([refs[0], refs[k], refs[k + 1]]);
                }
            }
            _ => {}
        }
    }

    if corners.is_empty() {
        return Err(AssetError::obj(source.lines().count(), "no faces"));
    }

    Mesh::from_corners(&corners).map_err(|e| AssetError::obj(0, e.to_string()))
}

/// Reads up to `N` floats; at least `required` must be present.
fn floats<const N: usize>(
    fields: std::str::SplitWhitespace<'_>,
    line: usize,
    required: usize,
) -> Result<[f32; N], AssetError> {
    let mut out = [0.0; N];
    let mut count = 0;
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field
            .parse()
            .map_err(|_| AssetError::obj(line, format!("invalid number `{field}`")))?;
        count += 1;
    }
    if count < required {
        return Err(AssetError::obj(
            line,
            format!("expected {required} numbers, found {count}"),
        ));
    }
    Ok(out)
}

/// Resolves one `v`, `v/vt`, `v//vn` or `v/vt/vn` face corner.
fn parse_corner(
    field: &str,
    line: usize,
    positions: &[[f32; 3]],
    uvs: &[[f32; 2]],
    normals: &[[f32; 3]],
) -> Result<ModelVertex, AssetError> {
    let mut parts = field.split('/');
    let position = match parts.next().filter(|s| !s.is_empty()) {
        Some(s) => resolve(s, positions, line)?,
        None => return Err(AssetError::obj(line, format!("corner `{field}` has no position"))),
    };
    let uv = match parts.next().filter(|s| !s.is_empty()) {
        Some(s) => resolve(s, uvs, line)?,
        None => DEFAULT_UV,
    };
    let normal = match parts.next().filter(|s| !s.is_empty()) {
        Some(s) => resolve(s, normals, line)?,
        None => DEFAULT_NORMAL,
    };
    Ok(ModelVertex {
        position,
        normal,
        uv,
    })
}

/// 1-based index, or negative relative to the end of what has been read.
fn resolve<T: Copy>(token: &str, items: &[T], line: usize) -> Result<T, AssetError> {
    let index: i64 = token
        .parse()
        .map_err(|_| AssetError::obj(line, format!("invalid index `{token}`")))?;
    let len = items.len() as i64;
    let zero_based = match index {
        i if i > 0 => i - 1,
        i if i < 0 => len + i,
        _ => -1,
    };
    usize::try_from(zero_based)
        .ok()
        .and_then(|i| items.get(i).copied())
        .ok_or_else(|| AssetError::obj(line, format!("index {index} out of range (have {len})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# one triangle
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.5 1
vn 0 1 0
f 1/1/1 2/1/1 3/1/1
";

    #[test]
    fn triangle_decodes_with_identity_indices() {
        let mesh = decode(TRIANGLE).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        // Second corner: position, normal, uv.
        assert_eq!(&mesh.vertices()[8..16], &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn quads_are_fan_triangulated() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
        let mesh = decode(src).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.index_count(), 6);
        let xs: Vec<f32> = mesh.vertices().chunks(8).map(|v| v[0]).collect();
        let ys: Vec<f32> = mesh.vertices().chunks(8).map(|v| v[1]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 1.0, 0.0, 1.0, 0.0]);
        assert_eq!(ys, vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn corner_count_equals_vertex_and_index_count() {
        // Two triangles and one pentagon: 3 + 3 + 9 corners.
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0.5 2 0
f 1 2 3
f 1 3 4
f 1 2 3 5 4
";
        let mesh = decode(src).unwrap();
        assert_eq!(mesh.vertex_count(), 15);
        assert_eq!(mesh.index_count(), 15);
        assert!(mesh.indices().iter().enumerate().all(|(i, &idx)| idx as usize == i));
    }

    #[test]
    fn missing_attributes_use_defaults() {
        let src = "v 1 2 3\nv 4 5 6\nv 7 8 9\nf 1 2 3\n";
        let mesh = decode(src).unwrap();
        assert_eq!(&mesh.vertices()[0..8], &[1.0, 2.0, 3.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

        let src = "v 1 2 3\nv 4 5 6\nv 7 8 9\nvn 1 0 0\nf 1//1 2//1 3//1\n";
        let mesh = decode(src).unwrap();
        assert_eq!(&mesh.vertices()[3..8], &[1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn negative_indices_are_relative() {
        let src = "v 0 0 0\nv 1 0 0\nv 2 0 0\nf -3 -2 -1\n";
        let mesh = decode(src).unwrap();
        let xs: Vec<f32> = mesh.vertices().chunks(8).map(|v| v[0]).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = decode("v 0 0 0\nv 1 0\n").unwrap_err();
        assert!(matches!(err, AssetError::Obj { line: 2, .. }), "{err}");

        let err = decode("v 0 0 0\nf 1 2 3\n").unwrap_err();
        assert!(matches!(err, AssetError::Obj { line: 2, .. }), "{err}");

        let err = decode("v 0 0 0\nv 0 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, AssetError::Obj { line: 3, .. }), "{err}");

        let err = decode("v 0 0 0\n").unwrap_err();
        assert!(matches!(err, AssetError::Obj { .. }), "{err}");
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.obj");
        std::fs::write(&path, TRIANGLE).unwrap();
        assert_eq!(load(&path).unwrap().vertex_count(), 3);

        let err = load(dir.path().join("missing.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }
}
