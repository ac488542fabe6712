/// 3D embedding of FD3: two cubes, three generator spokes and two apexes
///
/// The top cube carries the elements above the median (element 9, at the
/// origin) and the bottom cube its mirror image below. The generators sit in
/// the z = 0 plane, each joined to one vertex of either cube, and the bounds
/// of FD3 hang one unit beyond the cubes on the z axis.
use log::debug;
use nalgebra::Point3;
use std::collections::HashSet;

use crate::config::ModelConfig;
use crate::error::{Fd3Error, Result};
use crate::exact::{ExactPoint, Surd, A, B, C};
use crate::geometry::Mesh;
use crate::lattice::{Element, Poset, ELEMENT_COUNT};

/// A segment between two model points
pub type Edge = (ExactPoint, ExactPoint);

/// Cube skeleton as index pairs into a cube's eight points
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 4),
    (1, 5),
    (2, 4),
    (2, 6),
    (3, 5),
    (3, 6),
    (4, 7),
    (5, 7),
    (6, 7),
];

/// Index into `vertices()` of each element's point.
///
/// `vertices()` lists the top cube (0..=7), the bottom cube without its
/// origin (8..=14), the spokes (15..=17) and the top and bottom apex (18, 19).
pub const ELEMENT_VERTEX: [usize; ELEMENT_COUNT] = [
    19, 14, 11, 12, 13, 8, 9, 10, 15, 0, 16, 17, 1, 2, 3, 4, 5, 6, 7, 18,
];

fn p(x: Surd, y: Surd, z: Surd) -> ExactPoint {
    ExactPoint::new(x, y, z)
}

/// Vertices of the top cube
pub fn cube0() -> [ExactPoint; 8] {
    let one = Surd::ONE;
    let zero = Surd::ZERO;
    [
        p(zero, zero, zero),
        p(one + A - B, A - B, C),
        p(A - B, one + A - B, C),
        p(-C, -C, C),
        p(C, C, 2 * C),
        p(one - A - B, -A - B, 2 * C),
        p(-A - B, one - A - B, 2 * C),
        p(zero, zero, 3 * C),
    ]
}

/// Vertices of the bottom cube
pub fn cube1() -> [ExactPoint; 8] {
    let one = Surd::ONE;
    let zero = Surd::ZERO;
    [
        p(zero, zero, zero),
        p(one + A - B, A - B, -C),
        p(A - B, one + A - B, -C),
        p(-C, -C, -C),
        p(C, C, -2 * C),
        p(one - A - B, -A - B, -2 * C),
        p(-A - B, one - A - B, -2 * C),
        p(zero, zero, -3 * C),
    ]
}

/// Generator points in the plane z = 0
pub fn spoke_points() -> [ExactPoint; 3] {
    let one = Surd::ONE;
    let zero = Surd::ZERO;
    [
        p(2 * (one + A - B), 2 * (A - B), zero),
        p(2 * (A - B), 2 * (one + A - B), zero),
        p(-2 * C, -2 * C, zero),
    ]
}

/// Top and bottom of FD3
pub fn apex_points() -> [ExactPoint; 2] {
    let zero = Surd::ZERO;
    [
        p(zero, zero, 3 * C + Surd::ONE),
        p(zero, zero, -3 * C - Surd::ONE),
    ]
}

/// All points of the model, the shared origin listed once
pub fn vertices() -> Vec<ExactPoint> {
    let mut vertices = Vec::with_capacity(ELEMENT_COUNT);
    vertices.extend(cube0());
    vertices.extend(&cube1()[1..]);
    vertices.extend(spoke_points());
    vertices.extend(apex_points());
    vertices
}

fn cube_edges(cube: &[ExactPoint; 8]) -> Vec<Edge> {
    CUBE_EDGES.iter().map(|&(i, j)| (cube[i], cube[j])).collect()
}

pub fn top_cube_edges() -> Vec<Edge> {
    cube_edges(&cube0())
}

pub fn bottom_cube_edges() -> Vec<Edge> {
    cube_edges(&cube1())
}

/// Each generator joined to one vertex of either cube
pub fn spoke_edges() -> Vec<Edge> {
    let (top, bottom, spokes) = (cube0(), cube1(), spoke_points());
    (0..3)
        .flat_map(|i| [(top[i + 1], spokes[i]), (bottom[i + 1], spokes[i])])
        .collect()
}

/// The cube tips joined to the bounds
pub fn apex_edges() -> Vec<Edge> {
    let [top, bottom] = apex_points();
    vec![(cube0()[7], top), (cube1()[7], bottom)]
}

pub fn edges() -> Vec<Edge> {
    let mut edges = top_cube_edges();
    edges.extend(bottom_cube_edges());
    edges.extend(spoke_edges());
    edges.extend(apex_edges());
    edges
}

/// The point standing for `element`
pub fn element_vertex(element: Element) -> ExactPoint {
    vertices()[ELEMENT_VERTEX[element as usize]]
}

/// Points and edges of the wire-frame, before tessellation
#[derive(Debug, Clone, PartialEq)]
pub struct WireframeModel {
    pub vertices: Vec<ExactPoint>,
    pub edges: Vec<Edge>,
}

impl WireframeModel {
    pub fn fd3() -> Self {
        Self {
            vertices: vertices(),
            edges: edges(),
        }
    }

    pub fn vertex_index(&self, point: &ExactPoint) -> Option<usize> {
        self.vertices.iter().position(|v| v == point)
    }

    /// Edge endpoints realized as floating point
    pub fn segments(&self) -> impl Iterator<Item = (Point3<f64>, Point3<f64>)> + '_ {
        self.edges.iter().map(|(a, b)| (a.realize(), b.realize()))
    }

    /// Check that the model draws the Hasse diagram of `poset`.
    ///
    /// Elements must map to distinct vertices, edges must be exactly the
    /// images of the covering pairs, and every cover must climb in z.
    pub fn check_embedding(&self, poset: &Poset) -> Result<()> {
        if poset.len() != self.vertices.len() {
            return Err(Fd3Error::embedding(format!(
                "{} elements but {} vertices",
                poset.len(),
                self.vertices.len()
            )));
        }

        let images: HashSet<usize> = poset.elements().map(|e| ELEMENT_VERTEX[e as usize]).collect();
        if images.len() != poset.len() || images.iter().any(|&i| i >= self.vertices.len()) {
            return Err(Fd3Error::embedding("element map is not a bijection"));
        }

        let mut drawn = HashSet::new();
        for (a, b) in &self.edges {
            let (Some(i), Some(j)) = (self.vertex_index(a), self.vertex_index(b)) else {
                return Err(Fd3Error::embedding(format!("dangling edge {a} - {b}")));
            };
            drawn.insert((i.min(j), i.max(j)));
        }

        let mut covered = HashSet::new();
        for &(lower, upper) in poset.covers() {
            let (i, j) = (ELEMENT_VERTEX[lower as usize], ELEMENT_VERTEX[upper as usize]);
            if self.vertices[i].z >= self.vertices[j].z {
                return Err(Fd3Error::embedding(format!(
                    "cover {lower} < {upper} does not rise in z"
                )));
            }
            covered.insert((i.min(j), i.max(j)));
        }

        if drawn != covered || drawn.len() != self.edges.len() {
            return Err(Fd3Error::embedding(format!(
                "{} distinct edges drawn, {} covers",
                drawn.len(),
                covered.len()
            )));
        }
        Ok(())
    }

    /// Tessellate into one solid: a cylinder per edge and a sphere per vertex.
    pub fn to_mesh(&self, config: &ModelConfig) -> Mesh {
        let ball = Mesh::sphere(config.vertex_radius, config.sphere_stacks, config.sphere_slices);

        let cylinders = self.segments().filter_map(|(start, end)| {
            Mesh::cylinder(start, end, config.edge_radius, config.cylinder_segments)
        });
        let spheres = self
            .vertices
            .iter()
            .map(|v| ball.clone().translate(v.realize().coords));

        let solid = cylinders
            .chain(spheres)
            .fold(Mesh::new(), |solid, part| solid + part);
        debug!(
            "tessellated {} edges and {} vertices into {} triangles",
            self.edges.len(),
            self.vertices.len(),
            solid.len()
        );
        solid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::COVERS;

    #[test]
    fn test_counts() {
        assert_eq!(vertices().len(), 20);
        assert_eq!(top_cube_edges().len(), 12);
        assert_eq!(bottom_cube_edges().len(), 12);
        assert_eq!(spoke_edges().len(), 6);
        assert_eq!(apex_edges().len(), 2);
        assert_eq!(edges().len(), 32);
    }

    #[test]
    fn test_vertices_are_distinct() {
        let vertices = vertices();
        let unique: HashSet<_> = vertices.iter().collect();
        assert_eq!(unique.len(), vertices.len());
        assert_eq!(vertices.iter().filter(|&&v| v == ExactPoint::ORIGIN).count(), 1);
    }

    #[test]
    fn test_cubes_are_mirror_images() {
        let (top, bottom) = (cube0(), cube1());
        for i in 0..8 {
            assert_eq!(bottom[i], top[i].mirror_z(), "vertex {i}");
        }
    }

    #[test]
    fn test_named_points() {
        let (top, bottom) = (cube0(), cube1());
        assert_eq!(top[0], ExactPoint::ORIGIN);
        assert_eq!(bottom[0], ExactPoint::ORIGIN);
        assert_eq!(top[7], ExactPoint::new(Surd::ZERO, Surd::ZERO, 3 * C));
        assert_eq!(bottom[7], ExactPoint::new(Surd::ZERO, Surd::ZERO, -3 * C));

        let c = 1.0 / 3f64.sqrt();
        assert!((top[7].realize().z - 3.0 * c).abs() < 1e-12);
        let a = 1.0 / (2.0 * 3f64.sqrt());
        let spoke = spoke_points()[0].realize();
        assert!((spoke.x - 2.0 * (1.0 + a - 0.5)).abs() < 1e-12);
        assert!((spoke.y - 2.0 * (a - 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_spokes_lie_in_the_plane() {
        for spoke in spoke_points() {
            assert_eq!(spoke.z, Surd::ZERO);
        }
    }

    #[test]
    fn test_apex_edges() {
        let origin_z = |z| ExactPoint::new(Surd::ZERO, Surd::ZERO, z);
        assert_eq!(
            apex_edges(),
            vec![
                (origin_z(3 * C), origin_z(3 * C + Surd::ONE)),
                (origin_z(-3 * C), origin_z(-3 * C - Surd::ONE)),
            ]
        );
    }

    #[test]
    fn test_edges_have_no_dangling_endpoints() {
        let model = WireframeModel::fd3();
        for (a, b) in &model.edges {
            assert!(model.vertex_index(a).is_some(), "{a}");
            assert!(model.vertex_index(b).is_some(), "{b}");
        }
    }

    #[test]
    fn test_element_map() {
        assert_eq!(element_vertex(9), ExactPoint::ORIGIN);
        assert_eq!(element_vertex(0), apex_points()[1]);
        assert_eq!(element_vertex(19), apex_points()[0]);
        assert_eq!(element_vertex(18), cube0()[7]);
        assert_eq!(element_vertex(1), cube1()[7]);
        assert_eq!(element_vertex(8), spoke_points()[0]);
    }

    #[test]
    fn test_embedding_matches_fd3() {
        let poset = Poset::fd3().unwrap();
        WireframeModel::fd3().check_embedding(&poset).unwrap();
    }

    #[test]
    fn test_covers_rise_exactly() {
        for &(lower, upper) in &COVERS {
            assert!(element_vertex(lower).z < element_vertex(upper).z, "{lower} < {upper}");
        }
        assert!(element_vertex(6).z < element_vertex(9).z);
        assert!(element_vertex(18).z < element_vertex(19).z);
    }

    #[test]
    fn test_embedding_rejects_missing_edge() {
        let poset = Poset::fd3().unwrap();
        let mut model = WireframeModel::fd3();
        model.edges.pop();
        let err = model.check_embedding(&poset).unwrap_err();
        assert!(matches!(err, Fd3Error::Embedding { .. }));
    }

    #[test]
    fn test_embedding_rejects_other_poset() {
        let chain: Vec<(Element, Element)> = (0..19).map(|i| (i, i + 1)).collect();
        let poset = Poset::from_covers(ELEMENT_COUNT, &chain).unwrap();
        assert!(WireframeModel::fd3().check_embedding(&poset).is_err());
    }

    #[test_log::test]
    fn test_mesh_triangle_count() {
        let config = ModelConfig::default();
        let mesh = WireframeModel::fd3().to_mesh(&config);
        let per_cylinder = config.cylinder_segments * 4;
        let per_sphere = config.sphere_slices * (2 * config.sphere_stacks - 2);
        assert_eq!(mesh.len(), 32 * per_cylinder + 20 * per_sphere);

        let (min, max) = mesh.bounds().unwrap();
        let tip = (3.0 / 3f64.sqrt() + 1.0 + 0.1) as f32;
        assert!((max.z - tip).abs() < 1e-4);
        assert!((min.z + tip).abs() < 1e-4);
    }
}
