/// STL reading and writing, binary and ASCII
use log::info;
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::config::StlFormat;
use crate::error::{Fd3Error, Result};
use crate::geometry::{Mesh, Triangle, Vertex};

/// Binary STL header size in bytes
const HEADER_SIZE: usize = 80;

/// Size of one binary triangle record (normal, 3 vertices, attribute count)
const TRIANGLE_SIZE: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_SIZE + 4 {
        return Err(Fd3Error::invalid_stl("file too small to be a valid STL"));
    }

    // Skip 80-byte header
    let data = &data[HEADER_SIZE..];

    // Read triangle count (4 bytes, little-endian)
    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let records = &data[4..];

    // The count comes from the file, so check it against the bytes present
    // before reserving anything
    let available = records.len() / TRIANGLE_SIZE;
    if available < triangle_count as usize {
        return Err(Fd3Error::UnexpectedEof {
            expected: triangle_count,
            read: available as u32,
        });
    }

    let mut mesh = Mesh::with_capacity(triangle_count as usize);
    for record in records.chunks_exact(TRIANGLE_SIZE).take(triangle_count as usize) {
        let [nx, ny, nz] = read_vector(&record[0..12]);
        let mut vertices = [Vertex::new(0.0, 0.0, 0.0, nx, ny, nz); 3];
        for (k, vertex) in vertices.iter_mut().enumerate() {
            let start = 12 + k * 12;
            let [x, y, z] = read_vector(&record[start..start + 12]);
            *vertex = Vertex::new(x, y, z, nx, ny, nz);
        }
        // The trailing attribute byte count is ignored
        mesh.add_triangle(Triangle::new(vertices[0], vertices[1], vertices[2]));
    }
    Ok(mesh)
}

fn read_vector(bytes: &[u8]) -> [f32; 3] {
    let f = |i: usize| f32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    [f(0), f(4), f(8)]
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(Fd3Error::invalid_stl(format!(
            "failed to parse ASCII STL: {:?}",
            e
        ))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    let mut mesh = Mesh::with_capacity(triangles.len());
    for triangle in triangles {
        mesh.add_triangle(triangle);
    }

    Ok((input, mesh))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input, normal)?;
    let (input, v2) = parse_vertex(input, normal)?;
    let (input, v3) = parse_vertex(input, normal)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, Triangle::new(v1, v2, v3)))
}

fn parse_vertex(input: &str, normal: (f32, f32, f32)) -> IResult<&str, Vertex> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Vertex::new(x, y, z, normal.0, normal.1, normal.2)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    // Binary files may also start with "solid", so fall back on failure
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Read and parse an STL file from disk
pub fn load_stl(path: impl AsRef<Path>) -> Result<Mesh> {
    let data = std::fs::read(path)?;
    parse_stl(&data)
}

/// Write `mesh` as binary STL. Facet normals are recomputed from the winding.
pub fn write_binary_stl<W: Write>(mesh: &Mesh, writer: &mut W) -> Result<()> {
    let mut header = [0u8; HEADER_SIZE];
    let label = b"fd3 binary STL";
    header[..label.len()].copy_from_slice(label);
    writer.write_all(&header)?;

    let count = u32::try_from(mesh.len())
        .map_err(|_| Fd3Error::invalid_stl("too many triangles for binary STL"))?;
    writer.write_all(&count.to_le_bytes())?;

    for triangle in &mesh.triangles {
        let normal = triangle.calculate_normal();
        for value in normal.iter() {
            writer.write_all(&value.to_le_bytes())?;
        }
        for vertex in &triangle.vertices {
            for value in vertex.position.coords.iter() {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Write `mesh` as ASCII STL under the solid name `name`.
pub fn write_ascii_stl<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> Result<()> {
    writeln!(writer, "solid {name}")?;
    for triangle in &mesh.triangles {
        let n = triangle.calculate_normal();
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for vertex in &triangle.vertices {
            let p = vertex.position;
            writeln!(writer, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

/// Write `mesh` to `path` in the given format.
pub fn save_stl(mesh: &Mesh, path: impl AsRef<Path>, format: StlFormat) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        StlFormat::Binary => write_binary_stl(mesh, &mut writer)?,
        StlFormat::Ascii => write_ascii_stl(mesh, "fd3", &mut writer)?,
    }
    writer.flush()?;
    info!(
        "wrote {} triangles to {} ({:?})",
        mesh.len(),
        path.display(),
        format
    );
    Ok(())
}
