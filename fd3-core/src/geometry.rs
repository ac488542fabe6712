/// Triangle meshes and the cylinder and sphere primitives of the wire-frame model
use log::warn;
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;
use std::ops::{Add, AddAssign};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    /// Realize a double precision position and normal
    pub fn from_f64(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            position: position.cast::<f32>(),
            normal: normal.cast::<f32>(),
        }
    }
}

/// A triangle face defined by three vertices, counter-clockwise seen from outside
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    ///
    /// Degenerate triangles get a zero normal.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// A 3D mesh composed of triangles
///
/// Meshes combine with `+`, which keeps every triangle of both operands.
/// `Mesh::new()` is the identity of that union, so a model is a fold of its
/// parts starting from the empty mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Move every vertex by `offset`
    pub fn translate(mut self, offset: Vector3<f64>) -> Self {
        let offset = offset.cast::<f32>();
        for triangle in &mut self.triangles {
            for vertex in &mut triangle.vertices {
                vertex.position += offset;
            }
        }
        self
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn bounds(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let mut points = self
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter().map(|v| v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (min.inf(&p), max.sup(&p))
        }))
    }

    /// A closed cylinder of `radius` around the segment `start`..`end`
    ///
    /// Returns `None` for a zero-length segment, which has no axis.
    pub fn cylinder(
        start: Point3<f64>,
        end: Point3<f64>,
        radius: f64,
        segments: usize,
    ) -> Option<Self> {
        let axis = end - start;
        let length = axis.norm();
        if length < f64::EPSILON {
            warn!("skipping zero-length cylinder at {:?}", start);
            return None;
        }
        let axis = axis / length;
        let (perp1, perp2) = perpendicular_basis(axis);
        let segments = segments.max(3);

        let radial = |i: usize| {
            let angle = 2.0 * PI * (i % segments) as f64 / segments as f64;
            perp1 * angle.cos() + perp2 * angle.sin()
        };

        let mut mesh = Self::with_capacity(segments * 4);
        for i in 0..segments {
            let (n0, n1) = (radial(i), radial(i + 1));
            let s0 = Vertex::from_f64(start + n0 * radius, n0);
            let s1 = Vertex::from_f64(start + n1 * radius, n1);
            let e0 = Vertex::from_f64(end + n0 * radius, n0);
            let e1 = Vertex::from_f64(end + n1 * radius, n1);

            // Side quad
            mesh.add_triangle(Triangle::new(s0, s1, e0));
            mesh.add_triangle(Triangle::new(s1, e1, e0));

            // Caps face away from the segment
            mesh.add_triangle(Triangle::new(
                Vertex::from_f64(start, -axis),
                Vertex::from_f64(start + n1 * radius, -axis),
                Vertex::from_f64(start + n0 * radius, -axis),
            ));
            mesh.add_triangle(Triangle::new(
                Vertex::from_f64(end, axis),
                Vertex::from_f64(end + n0 * radius, axis),
                Vertex::from_f64(end + n1 * radius, axis),
            ));
        }
        Some(mesh)
    }

    /// A UV sphere of `radius` centred at the origin
    pub fn sphere(radius: f64, stacks: usize, slices: usize) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);

        let point = |stack: usize, slice: usize| {
            let phi = PI * stack as f64 / stacks as f64;
            let theta = 2.0 * PI * (slice % slices) as f64 / slices as f64;
            let normal = Vector3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos());
            Vertex::from_f64(Point3::from(normal * radius), normal)
        };

        let mut mesh = Self::with_capacity(slices * (2 * stacks - 2));
        for j in 0..stacks {
            for i in 0..slices {
                let nw = point(j, i);
                let sw = point(j + 1, i);
                let se = point(j + 1, i + 1);
                let ne = point(j, i + 1);
                // Pole rows collapse one triangle of the quad
                if j + 1 < stacks {
                    mesh.add_triangle(Triangle::new(nw, sw, se));
                }
                if j > 0 {
                    mesh.add_triangle(Triangle::new(nw, se, ne));
                }
            }
        }
        mesh
    }
}

impl Add for Mesh {
    type Output = Mesh;

    fn add(mut self, rhs: Mesh) -> Mesh {
        self += rhs;
        self
    }
}

impl AddAssign for Mesh {
    fn add_assign(&mut self, rhs: Mesh) {
        self.triangles.extend(rhs.triangles);
    }
}

/// Two unit vectors completing `axis` to a right-handed orthonormal basis
fn perpendicular_basis(axis: Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let helper = if axis.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let perp1 = axis.cross(&helper).normalize();
    let perp2 = axis.cross(&perp1);
    (perp1, perp2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward(mesh: &Mesh, centre: Point3<f32>) {
        for triangle in &mesh.triangles {
            let normal = triangle.calculate_normal();
            let c = triangle.vertices.iter().fold(Vector3::zeros(), |acc, v| {
                acc + v.position.coords
            }) / 3.0;
            assert!(normal.dot(&(c - centre.coords)) > 0.0, "inward face {:?}", triangle);
        }
    }

    #[test]
    fn test_empty_mesh_is_union_identity() {
        let sphere = Mesh::sphere(1.0, 4, 6);
        assert_eq!(Mesh::new() + sphere.clone(), sphere);
        assert_eq!(sphere.clone() + Mesh::new(), sphere);
    }

    #[test]
    fn test_union_keeps_all_triangles() {
        let a = Mesh::sphere(1.0, 4, 6);
        let b = Mesh::cylinder(Point3::origin(), Point3::new(0.0, 0.0, 1.0), 0.1, 8).unwrap();
        let (na, nb) = (a.len(), b.len());
        let mut c = a;
        c += b;
        assert_eq!(c.len(), na + nb);
    }

    #[test]
    fn test_cylinder_shape() {
        let start = Point3::new(1.0, 2.0, 3.0);
        let end = Point3::new(1.0, 2.0, 5.0);
        let mesh = Mesh::cylinder(start, end, 0.1, 12).unwrap();
        assert_eq!(mesh.len(), 12 * 4);

        let (min, max) = mesh.bounds().unwrap();
        assert!((min.z - 3.0).abs() < 1e-5);
        assert!((max.z - 5.0).abs() < 1e-5);
        assert!((max.x - 1.1).abs() < 1e-5);
        assert_outward(&mesh, Point3::new(1.0, 2.0, 4.0));
    }

    #[test]
    fn test_oblique_cylinder_faces_outward() {
        let mesh = Mesh::cylinder(Point3::origin(), Point3::new(1.0, 1.0, 1.0), 0.2, 6).unwrap();
        assert_outward(&mesh, Point3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_degenerate_cylinder() {
        let p = Point3::new(0.5, 0.5, 0.5);
        assert!(Mesh::cylinder(p, p, 0.1, 12).is_none());
    }

    #[test]
    fn test_sphere_shape() {
        let mesh = Mesh::sphere(0.1, 8, 12);
        assert_eq!(mesh.len(), 12 * (2 * 8 - 2));
        for triangle in &mesh.triangles {
            for v in &triangle.vertices {
                assert!((v.position.coords.norm() - 0.1).abs() < 1e-6);
            }
        }
        assert_outward(&mesh, Point3::origin());
    }

    #[test]
    fn test_translate() {
        let mesh = Mesh::sphere(1.0, 4, 4).translate(Vector3::new(0.0, 0.0, 3.0));
        let (min, max) = mesh.bounds().unwrap();
        assert!((min.z - 2.0).abs() < 1e-6);
        assert!((max.z - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }
}
