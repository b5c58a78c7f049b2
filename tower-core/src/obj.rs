/// Wavefront OBJ export and import for tower meshes
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::take_till,
    character::complete::{char, i64 as signed, space0, space1},
    combinator::{all_consuming, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{preceded, terminated},
    IResult,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::color::Rgb;
use crate::error::ObjError;
use crate::geometry::{compute_vertex_normals, TowerMesh};

const HEADER: &str = "# Parametric Tower Export";
const OBJECT_NAME: &str = "ParametricTower";

/// Borrowed mesh buffers handed to the OBJ writer.
///
/// Normals, colours and indices are optional. Without an index buffer every
/// three consecutive vertices form one triangle.
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'a> {
    pub positions: &'a [Point3<f32>],
    pub normals: Option<&'a [Vector3<f32>]>,
    pub colors: Option<&'a [Rgb]>,
    pub indices: Option<&'a [u32]>,
}

impl<'a> MeshView<'a> {
    pub fn face_count(&self) -> usize {
        match self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }
}

impl<'a> From<&'a TowerMesh> for MeshView<'a> {
    fn from(mesh: &'a TowerMesh) -> Self {
        let per_vertex = |len: usize| len > 0 && len == mesh.positions.len();
        Self {
            positions: &mesh.positions,
            normals: per_vertex(mesh.normals.len()).then_some(mesh.normals.as_slice()),
            colors: per_vertex(mesh.colors.len()).then_some(mesh.colors.as_slice()),
            indices: Some(mesh.indices.as_slice()),
        }
    }
}

/// Format a coordinate with 6 decimals, then drop trailing zeros by
/// reparsing, so `0.500000` prints as `0.5` and `-0.000000` as `0`.
fn format_number(value: f32) -> String {
    let rounded: f64 = format!("{:.6}", value).parse().unwrap_or(f64::NAN);
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Write `mesh` as OBJ text
pub fn write_obj<W: Write>(writer: &mut W, mesh: MeshView<'_>) -> Result<(), ObjError> {
    let faces = mesh.face_count();

    writeln!(writer, "{}", HEADER)?;
    writeln!(writer, "# Vertices: {}", mesh.positions.len())?;
    writeln!(writer, "# Faces: {}", faces)?;
    writeln!(writer, "o {}", OBJECT_NAME)?;

    for (i, p) in mesh.positions.iter().enumerate() {
        write!(
            writer,
            "v {} {} {}",
            format_number(p.x),
            format_number(p.y),
            format_number(p.z)
        )?;
        if let Some(color) = mesh.colors.and_then(|colors| colors.get(i)) {
            write!(
                writer,
                " {} {} {}",
                format_number(color.r),
                format_number(color.g),
                format_number(color.b)
            )?;
        }
        writeln!(writer)?;
    }

    if let Some(normals) = mesh.normals {
        for n in normals {
            writeln!(
                writer,
                "vn {} {} {}",
                format_number(n.x),
                format_number(n.y),
                format_number(n.z)
            )?;
        }
    }

    let with_normals = mesh.normals.is_some();
    let corner = |index: u32| {
        let one_based = index as u64 + 1;
        if with_normals {
            format!("{}//{}", one_based, one_based)
        } else {
            one_based.to_string()
        }
    };

    for face in 0..faces {
        let [a, b, c] = match mesh.indices {
            Some(indices) => [indices[3 * face], indices[3 * face + 1], indices[3 * face + 2]],
            None => {
                let base = 3 * face as u32;
                [base, base + 1, base + 2]
            }
        };
        writeln!(writer, "f {} {} {}", corner(a), corner(b), corner(c))?;
    }

    Ok(())
}

/// Render `mesh` to an OBJ string
pub fn to_obj_string(mesh: MeshView<'_>) -> Result<String, ObjError> {
    let mut buffer = Vec::new();
    write_obj(&mut buffer, mesh)?;
    String::from_utf8(buffer).map_err(|e| ObjError::Parse {
        line: 0,
        message: e.to_string(),
    })
}

/// Write `mesh` to an OBJ file at `path`
pub fn save_obj(path: &Path, mesh: MeshView<'_>) -> Result<(), ObjError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(&mut writer, mesh)?;
    writer.flush()?;
    Ok(())
}

fn float_list(input: &str) -> IResult<&str, Vec<f32>> {
    all_consuming(terminated(
        preceded(space0, separated_list1(space1, float)),
        space0,
    ))(input)
}

/// A face corner: the vertex index, ignoring any `/vt/vn` suffix
fn face_corner(input: &str) -> IResult<&str, i64> {
    terminated(
        signed,
        opt(preceded(char('/'), take_till(|c: char| c.is_whitespace()))),
    )(input)
}

fn face_corners(input: &str) -> IResult<&str, Vec<i64>> {
    all_consuming(terminated(
        preceded(space0, separated_list1(space1, face_corner)),
        space0,
    ))(input)
}

/// Parse OBJ text into a tower mesh.
///
/// Polygons are fan-triangulated. Vertices without a colour are white.
/// When the file's normals do not match its vertices one-to-one the
/// normals are recomputed.
pub fn parse_obj(input: &str) -> Result<TowerMesh, ObjError> {
    let mut positions = Vec::new();
    let mut colors: Vec<Option<Rgb>> = Vec::new();
    let mut normals = Vec::new();
    // (line, zero-based index) for deferred range checks
    let mut corners: Vec<(usize, i64)> = Vec::new();

    for (number, raw) in input.lines().enumerate() {
        let line = number + 1;
        let text = raw.trim();
        let (keyword, rest) = match text.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest),
            None => (text, ""),
        };
        let malformed = |what: &str| ObjError::Parse {
            line,
            message: format!("malformed {} statement", what),
        };

        match keyword {
            "v" => {
                let (_, values) = float_list(rest).map_err(|_| malformed("vertex"))?;
                match values.as_slice() {
                    [x, y, z] => {
                        positions.push(Point3::new(*x, *y, *z));
                        colors.push(None);
                    }
                    [x, y, z, r, g, b] => {
                        positions.push(Point3::new(*x, *y, *z));
                        colors.push(Some(Rgb::new(*r, *g, *b)));
                    }
                    _ => return Err(malformed("vertex")),
                }
            }
            "vn" => {
                let (_, values) = float_list(rest).map_err(|_| malformed("normal"))?;
                match values.as_slice() {
                    [x, y, z] => normals.push(Vector3::new(*x, *y, *z)),
                    _ => return Err(malformed("normal")),
                }
            }
            "f" => {
                let (_, raw_corners) = face_corners(rest).map_err(|_| malformed("face"))?;
                if raw_corners.len() < 3 {
                    return Err(malformed("face"));
                }
                let resolved: Vec<i64> = raw_corners
                    .iter()
                    .map(|&index| {
                        if index < 0 {
                            positions.len() as i64 + index
                        } else {
                            index - 1
                        }
                    })
                    .collect();
                for k in 1..resolved.len() - 1 {
                    corners.push((line, resolved[0]));
                    corners.push((line, resolved[k]));
                    corners.push((line, resolved[k + 1]));
                }
            }
            _ => {}
        }
    }

    let vertex_count = positions.len() as i64;
    let indices = corners
        .into_iter()
        .map(|(line, index)| {
            if (0..vertex_count).contains(&index) {
                Ok(index as u32)
            } else {
                Err(ObjError::Parse {
                    line,
                    message: format!("vertex index {} out of range", index + 1),
                })
            }
        })
        .collect::<Result<Vec<u32>, ObjError>>()?;

    let normals = if normals.len() == positions.len() {
        normals
    } else {
        compute_vertex_normals(&positions, &indices)
    };

    Ok(TowerMesh {
        positions,
        normals,
        colors: colors.into_iter().map(Option::unwrap_or_default).collect(),
        indices,
    })
}

/// Read and parse an OBJ file
pub fn load_obj(path: &Path) -> Result<TowerMesh, ObjError> {
    let text = std::fs::read_to_string(path)?;
    parse_obj(&text)
}
