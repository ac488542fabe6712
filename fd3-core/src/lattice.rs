/// Partial order of the free bounded distributive lattice on three generators
use log::debug;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{Fd3Error, Result};

/// Label of a lattice element
pub type Element = u8;

/// Number of elements in FD3
pub const ELEMENT_COUNT: usize = 20;

/// Largest poset whose labels fit in `Element`
pub const MAX_ELEMENTS: usize = Element::MAX as usize + 1;

/// Covering pairs (lower, upper) of FD3.
///
/// 0 is the bottom and 19 the top; 1 and 18 are the bottom and top of the
/// unbounded free distributive lattice, and 8, 10, 11 are the generators.
pub const COVERS: [(Element, Element); 32] = [
    (0, 1),
    (1, 2),
    (1, 3),
    (1, 4),
    (2, 5),
    (2, 6),
    (3, 5),
    (3, 7),
    (4, 6),
    (4, 7),
    (5, 8),
    (5, 9),
    (6, 9),
    (6, 10),
    (7, 9),
    (7, 11),
    (8, 12),
    (9, 12),
    (9, 13),
    (9, 14),
    (10, 13),
    (11, 14),
    (12, 15),
    (12, 16),
    (13, 15),
    (13, 17),
    (14, 16),
    (14, 17),
    (15, 18),
    (16, 18),
    (17, 18),
    (18, 19),
];

/// A finite partial order given by covering pairs.
///
/// The order is stored twice: as a petgraph graph of the given pairs (node
/// index `i` is element `i`) and as a dense reachability table, which is
/// cheap at this size and makes `leq` a lookup.
#[derive(Debug, Clone)]
pub struct Poset {
    graph: DiGraph<Element, ()>,
    /// `below[x][y]` holds when `x <= y`
    below: Vec<Vec<bool>>,
    /// Transitive reduction, sorted
    covers: Vec<(Element, Element)>,
    /// Deterministic linear extension
    order: Vec<Element>,
}

impl Poset {
    /// Build the order generated by `pairs` on the labels `0..size`.
    pub fn from_covers(size: usize, pairs: &[(Element, Element)]) -> Result<Self> {
        if size > MAX_ELEMENTS {
            return Err(Fd3Error::TooManyElements {
                size,
                max: MAX_ELEMENTS,
            });
        }

        let mut graph: DiGraph<Element, ()> = DiGraph::with_capacity(size, pairs.len());
        for label in 0..size {
            graph.add_node(label as Element);
        }

        for &(lower, upper) in pairs {
            for element in [lower, upper] {
                if element as usize >= size {
                    return Err(Fd3Error::UnknownElement { element, size });
                }
            }
            if lower == upper {
                return Err(Fd3Error::Cycle { element: lower });
            }
            graph.update_edge(NodeIndex::new(lower as usize), NodeIndex::new(upper as usize), ());
        }

        let sorted = toposort(&graph, None).map_err(|cycle| Fd3Error::Cycle {
            element: graph[cycle.node_id()],
        })?;
        let order: Vec<Element> = sorted.iter().map(|&ix| graph[ix]).collect();

        // Walk the linear extension backwards so every successor's up-set is
        // complete before it is merged into its predecessors.
        let mut below = vec![vec![false; size]; size];
        for &ix in sorted.iter().rev() {
            let x = ix.index();
            below[x][x] = true;
            for succ in graph.neighbors(ix) {
                let up = below[succ.index()].clone();
                for (y, reachable) in up.into_iter().enumerate() {
                    if reachable {
                        below[x][y] = true;
                    }
                }
            }
        }

        let mut covers = Vec::new();
        for x in 0..size {
            for y in 0..size {
                if x == y || !below[x][y] {
                    continue;
                }
                let between = (0..size).any(|z| z != x && z != y && below[x][z] && below[z][y]);
                if !between {
                    covers.push((x as Element, y as Element));
                }
            }
        }

        debug!(
            "built poset: {} elements, {} pairs given, {} covers",
            size,
            pairs.len(),
            covers.len()
        );

        Ok(Self {
            graph,
            below,
            covers,
            order,
        })
    }

    /// The poset of FD3 from the literal covering table
    pub fn fd3() -> Result<Self> {
        Self::from_covers(ELEMENT_COUNT, &COVERS)
    }

    pub fn len(&self) -> usize {
        self.below.len()
    }

    pub fn is_empty(&self) -> bool {
        self.below.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = Element> {
        (0..self.len()).map(|x| x as Element)
    }

    /// Reflexive order test `x <= y`
    pub fn leq(&self, x: Element, y: Element) -> bool {
        self.below[x as usize][y as usize]
    }

    /// Strict order test `x < y`
    pub fn lt(&self, x: Element, y: Element) -> bool {
        x != y && self.leq(x, y)
    }

    pub fn comparable(&self, x: Element, y: Element) -> bool {
        self.leq(x, y) || self.leq(y, x)
    }

    /// Hasse edges (lower, upper), sorted
    pub fn covers(&self) -> &[(Element, Element)] {
        &self.covers
    }

    pub fn upper_covers(&self, x: Element) -> Vec<Element> {
        self.covers
            .iter()
            .filter(|&&(lower, _)| lower == x)
            .map(|&(_, upper)| upper)
            .collect()
    }

    pub fn lower_covers(&self, x: Element) -> Vec<Element> {
        self.covers
            .iter()
            .filter(|&&(_, upper)| upper == x)
            .map(|&(lower, _)| lower)
            .collect()
    }

    /// The number of pairs the poset was built from, duplicates removed.
    pub fn generating_pairs(&self) -> usize {
        self.graph.edge_count()
    }

    /// One deterministic linear extension of the order
    pub fn linear_extension(&self) -> &[Element] {
        &self.order
    }

    /// The unique least element, if there is one.
    pub fn minimum(&self) -> Option<Element> {
        self.elements().find(|&m| self.elements().all(|x| self.leq(m, x)))
    }

    /// The unique greatest element, if there is one.
    pub fn maximum(&self) -> Option<Element> {
        self.elements().find(|&m| self.elements().all(|x| self.leq(x, m)))
    }

    /// Greatest lower bound of `x` and `y`
    pub fn meet(&self, x: Element, y: Element) -> Option<Element> {
        let lower: Vec<Element> = self
            .elements()
            .filter(|&z| self.leq(z, x) && self.leq(z, y))
            .collect();
        lower
            .iter()
            .copied()
            .find(|&z| lower.iter().all(|&w| self.leq(w, z)))
    }

    /// Least upper bound of `x` and `y`
    pub fn join(&self, x: Element, y: Element) -> Option<Element> {
        let upper: Vec<Element> = self
            .elements()
            .filter(|&z| self.leq(x, z) && self.leq(y, z))
            .collect();
        upper
            .iter()
            .copied()
            .find(|&z| upper.iter().all(|&w| self.leq(z, w)))
    }

    /// Every pair has a meet and a join.
    pub fn is_lattice(&self) -> bool {
        self.elements().all(|x| {
            self.elements()
                .all(|y| self.meet(x, y).is_some() && self.join(x, y).is_some())
        })
    }

    /// `x ∧ (y ∨ z) = (x ∧ y) ∨ (x ∧ z)` for all triples.
    ///
    /// Returns false for posets that are not lattices.
    pub fn is_distributive(&self) -> bool {
        if !self.is_lattice() {
            return false;
        }
        let distributes = |x, y, z| -> Option<bool> {
            let lhs = self.meet(x, self.join(y, z)?)?;
            let rhs = self.join(self.meet(x, y)?, self.meet(x, z)?)?;
            Some(lhs == rhs)
        };
        self.elements().all(|x| {
            self.elements()
                .all(|y| self.elements().all(|z| distributes(x, y, z) == Some(true)))
        })
    }

    /// Length of the longest chain ending at each element.
    pub fn ranks(&self) -> Vec<usize> {
        let mut ranks = vec![0usize; self.len()];
        for &x in &self.order {
            for upper in self.upper_covers(x) {
                ranks[upper as usize] = ranks[upper as usize].max(ranks[x as usize] + 1);
            }
        }
        ranks
    }

    /// Elements with exactly one lower cover
    pub fn join_irreducibles(&self) -> Vec<Element> {
        self.elements()
            .filter(|&x| self.lower_covers(x).len() == 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_table_shape() {
        assert_eq!(COVERS.len(), 32);
        for &(lower, upper) in &COVERS {
            assert_ne!(lower, upper);
            assert!((lower as usize) < ELEMENT_COUNT);
            assert!((upper as usize) < ELEMENT_COUNT);
        }
    }

    #[test]
    fn test_fd3_is_bounded() {
        let poset = Poset::fd3().unwrap();
        assert_eq!(poset.len(), ELEMENT_COUNT);
        assert_eq!(poset.minimum(), Some(0));
        assert_eq!(poset.maximum(), Some(19));
    }

    #[test]
    fn test_closure_is_partial_order() {
        let poset = Poset::fd3().unwrap();
        for x in poset.elements() {
            assert!(poset.leq(x, x));
            for y in poset.elements() {
                if x != y {
                    assert!(!(poset.leq(x, y) && poset.leq(y, x)), "{x} and {y}");
                }
                for z in poset.elements() {
                    if poset.leq(x, y) && poset.leq(y, z) {
                        assert!(poset.leq(x, z));
                    }
                }
            }
        }
    }

    #[test]
    fn test_table_is_already_reduced() {
        let poset = Poset::fd3().unwrap();
        let mut given = COVERS.to_vec();
        given.sort_unstable();
        assert_eq!(poset.covers(), given.as_slice());
        assert_eq!(poset.generating_pairs(), 32);
    }

    #[test]
    fn test_fd3_is_distributive_lattice() {
        let poset = Poset::fd3().unwrap();
        assert!(poset.is_lattice());
        assert!(poset.is_distributive());
    }

    #[test]
    fn test_meets_and_joins() {
        let poset = Poset::fd3().unwrap();
        assert_eq!(poset.join(2, 3), Some(5));
        assert_eq!(poset.meet(12, 13), Some(9));
        assert_eq!(poset.join(8, 10), Some(15));
        assert_eq!(poset.meet(8, 11), Some(3));
        assert_eq!(poset.meet(8, 10), Some(2));
        assert_eq!(poset.join(0, 19), Some(19));
    }

    #[test]
    fn test_join_irreducibles_and_ranks() {
        let poset = Poset::fd3().unwrap();
        assert_eq!(poset.join_irreducibles(), vec![1, 2, 3, 4, 8, 10, 11, 19]);

        let ranks = poset.ranks();
        assert_eq!(ranks[0], 0);
        assert_eq!(ranks[9], 4);
        assert_eq!(ranks[8], 4);
        assert_eq!(ranks[19], 8);
    }

    #[test]
    fn test_linear_extension_respects_order() {
        let poset = Poset::fd3().unwrap();
        let order = poset.linear_extension();
        assert_eq!(order.len(), ELEMENT_COUNT);
        let position = |e: Element| order.iter().position(|&x| x == e).unwrap();
        for &(lower, upper) in poset.covers() {
            assert!(position(lower) < position(upper));
        }
    }

    #[test]
    fn test_cycle_is_rejected() {
        let err = Poset::from_covers(3, &[(0, 1), (1, 2), (2, 0)]).unwrap_err();
        assert!(matches!(err, Fd3Error::Cycle { .. }));
    }

    #[test]
    fn test_out_of_range_label_is_rejected() {
        let err = Poset::from_covers(2, &[(0, 5)]).unwrap_err();
        assert!(matches!(err, Fd3Error::UnknownElement { element: 5, size: 2 }));
    }

    #[test]
    fn test_oversized_poset_is_rejected() {
        let err = Poset::from_covers(300, &[]).unwrap_err();
        assert!(matches!(err, Fd3Error::TooManyElements { size: 300, max: 256 }));

        // The largest labellable size still works
        let poset = Poset::from_covers(MAX_ELEMENTS, &[(0, 255)]).unwrap();
        assert_eq!(poset.elements().last(), Some(255));
        assert!(poset.lt(0, 255));
    }

    #[test]
    fn test_strict_order_and_comparability() {
        let poset = Poset::fd3().unwrap();
        assert!(poset.lt(0, 19));
        assert!(poset.lt(8, 15));
        assert!(!poset.lt(9, 9));
        assert!(!poset.lt(19, 0));

        // The generators are pairwise incomparable
        for (x, y) in [(8, 10), (8, 11), (10, 11)] {
            assert!(!poset.comparable(x, y));
        }
        assert!(poset.comparable(9, 9));
        assert!(poset.comparable(19, 5));
        for &(lower, upper) in poset.covers() {
            assert!(poset.lt(lower, upper) && poset.comparable(upper, lower));
        }
    }

    #[test]
    fn test_non_lattice() {
        // Two incomparable maxima have no join.
        let poset = Poset::from_covers(3, &[(0, 1), (0, 2)]).unwrap();
        assert_eq!(poset.join(1, 2), None);
        assert_eq!(poset.maximum(), None);
        assert!(!poset.is_lattice());
        assert!(!poset.is_distributive());
    }

    #[test]
    fn test_diamond_is_not_distributive() {
        // M3: bottom, three atoms, top
        let poset = Poset::from_covers(5, &[(0, 1), (0, 2), (0, 3), (1, 4), (2, 4), (3, 4)]).unwrap();
        assert!(poset.is_lattice());
        assert!(!poset.is_distributive());
    }

    #[test]
    fn test_redundant_pair_is_reduced() {
        let poset = Poset::from_covers(3, &[(0, 1), (1, 2), (0, 2)]).unwrap();
        assert_eq!(poset.covers(), &[(0, 1), (1, 2)]);
    }
}
