/// Layered 2D layout of a Hasse diagram, with SVG and DOT output
use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;
use std::fmt::Write;

use crate::lattice::{Element, Poset};

/// Element positions in the unit square, one row per rank.
///
/// `y` is 0 on the bottom row and 1 on the top row; within a row elements
/// are spread evenly in `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct HasseLayout {
    pub positions: Vec<(f64, f64)>,
    pub rows: Vec<Vec<Element>>,
    pub edges: Vec<(Element, Element)>,
}

impl HasseLayout {
    /// Rows by rank; each row ordered by the mean `x` of its members' lower
    /// covers, ties broken by label.
    pub fn layered(poset: &Poset) -> Self {
        let ranks = poset.ranks();
        let height = ranks.iter().copied().max().unwrap_or(0);

        let mut rows: Vec<Vec<Element>> = vec![Vec::new(); height + 1];
        for element in poset.elements() {
            rows[ranks[element as usize]].push(element);
        }

        let mut positions = vec![(0.0, 0.0); poset.len()];
        for (rank, row) in rows.iter_mut().enumerate() {
            if rank > 0 {
                let barycenter = |e: Element| {
                    let lower = poset.lower_covers(e);
                    if lower.is_empty() {
                        return 0.5;
                    }
                    lower.iter().map(|&l| positions[l as usize].0).sum::<f64>() / lower.len() as f64
                };
                let mut keyed: Vec<(f64, Element)> = row.iter().map(|&e| (barycenter(e), e)).collect();
                keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
                *row = keyed.into_iter().map(|(_, e)| e).collect();
            }

            let y = if height == 0 {
                0.0
            } else {
                rank as f64 / height as f64
            };
            let slots = row.len() as f64 + 1.0;
            for (i, &element) in row.iter().enumerate() {
                positions[element as usize] = ((i as f64 + 1.0) / slots, y);
            }
        }

        Self {
            positions,
            rows,
            edges: poset.covers().to_vec(),
        }
    }

    pub fn position(&self, element: Element) -> (f64, f64) {
        self.positions[element as usize]
    }

    /// Render as a standalone SVG document of the given pixel size.
    pub fn to_svg(&self, width: f64, height: f64) -> String {
        let padding = 30.0;
        let avail_w = width - 2.0 * padding;
        let avail_h = height - 2.0 * padding;
        let screen = |(x, y): (f64, f64)| (padding + x * avail_w, padding + (1.0 - y) * avail_h);

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        let _ = writeln!(svg, "<rect width=\"100%\" height=\"100%\" fill=\"white\"/>");
        for &(lower, upper) in &self.edges {
            let (x1, y1) = screen(self.position(lower));
            let (x2, y2) = screen(self.position(upper));
            let _ = writeln!(
                svg,
                "<line x1=\"{x1:.1}\" y1=\"{y1:.1}\" x2=\"{x2:.1}\" y2=\"{y2:.1}\" stroke=\"#333\" stroke-width=\"1.5\"/>"
            );
        }
        for element in 0..self.positions.len() {
            let (x, y) = screen(self.positions[element]);
            let _ = writeln!(
                svg,
                "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"10\" fill=\"#fff\" stroke=\"#333\"/>"
            );
            let _ = writeln!(
                svg,
                "<text x=\"{x:.1}\" y=\"{:.1}\" font-family=\"monospace\" font-size=\"10\" text-anchor=\"middle\">{element}</text>",
                y + 3.5
            );
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl Poset {
    /// Graphviz source of the Hasse diagram
    pub fn to_dot(&self) -> String {
        let mut graph: DiGraph<Element, ()> = DiGraph::new();
        let nodes: Vec<_> = self.elements().map(|e| graph.add_node(e)).collect();
        for &(lower, upper) in self.covers() {
            graph.add_edge(nodes[lower as usize], nodes[upper as usize], ());
        }
        // `Debug` formatting, since the unit edge weights have no `Display`
        format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}
