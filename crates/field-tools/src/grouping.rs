//! Element bookkeeping: grouping evaluation points by element and counting
//! parametric coordinates in nested element maps.

use std::collections::BTreeMap;
use std::ops::Range;

/// Parametric coordinates of each element, keyed by element id.
pub type ElementXi<X> = BTreeMap<usize, Vec<X>>;

/// Original list positions of each element's entries, keyed by element id.
pub type ElementPositions = BTreeMap<usize, Vec<usize>>;

/// Group an ordered list of `(element, xi)` evaluation points by element.
///
/// Returns the parametric coordinates of each element in input order, and
/// for each element the positions in `pairs` its entries came from.
///
/// ```
/// use field_tools::group_by_element;
///
/// let (xi, positions) = group_by_element(&[(3, 0.1), (1, 0.5), (3, 0.9)]);
/// assert_eq!(xi[&3], vec![0.1, 0.9]);
/// assert_eq!(positions[&3], vec![0, 2]);
/// assert_eq!(positions[&1], vec![1]);
/// ```
pub fn group_by_element<X: Clone>(pairs: &[(usize, X)]) -> (ElementXi<X>, ElementPositions) {
    let mut xi: ElementXi<X> = BTreeMap::new();
    let mut positions: ElementPositions = BTreeMap::new();

    for (i, (elem, ep)) in pairs.iter().enumerate() {
        xi.entry(*elem).or_default().push(ep.clone());
        positions.entry(*elem).or_default().push(i);
    }

    (xi, positions)
}

/// A positional nested list of parametric coordinate arrays.
///
/// This is the shape produced by discretising grouped elements before the
/// positions are turned into keys.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedXi<X> {
    /// An array of parametric coordinates.
    Array(Vec<X>),
    /// A list of further nested entries.
    List(Vec<NestedXi<X>>),
}

/// Parametric coordinates keyed by position at every level.
#[derive(Debug, Clone, PartialEq)]
pub enum XiTree<X> {
    /// The xi values of a single element.
    Leaf(Vec<X>),
    /// Sub-regions keyed by their 0-based position in the nested input.
    Node(BTreeMap<usize, XiTree<X>>),
}

impl<X> XiTree<X> {
    /// Key every entry of `items` (recursively) by its 0-based position.
    pub fn index_nested(items: Vec<NestedXi<X>>) -> BTreeMap<usize, XiTree<X>> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| (i, XiTree::from(item)))
            .collect()
    }

    /// Number of parametric coordinates under this tree.
    pub fn value_count(&self) -> usize {
        match self {
            XiTree::Leaf(values) => values.len(),
            XiTree::Node(children) => value_count(children),
        }
    }
}

impl<X> From<NestedXi<X>> for XiTree<X> {
    fn from(nested: NestedXi<X>) -> Self {
        match nested {
            NestedXi::Array(values) => XiTree::Leaf(values),
            NestedXi::List(items) => XiTree::Node(XiTree::index_nested(items)),
        }
    }
}

/// Total number of parametric coordinates in a keyed map of trees.
pub fn value_count<X>(tree: &BTreeMap<usize, XiTree<X>>) -> usize {
    tree.values().map(XiTree::value_count).sum()
}

/// Map each region to the range of flat indices its values occupy.
///
/// Regions are laid out back to back in ascending key order, each taking
/// `value_count` consecutive indices starting from 0.
///
/// ```
/// use std::collections::BTreeMap;
/// use field_tools::{XiTree, region_ep_map};
///
/// let mut regions = BTreeMap::new();
/// regions.insert(0, XiTree::Leaf(vec![0.0, 0.5, 1.0]));
/// regions.insert(1, XiTree::Leaf(vec![0.25]));
///
/// let map = region_ep_map(&regions);
/// assert_eq!(map[&0], 0..3);
/// assert_eq!(map[&1], 3..4);
/// ```
pub fn region_ep_map<X>(regions: &BTreeMap<usize, XiTree<X>>) -> BTreeMap<usize, Range<usize>> {
    let mut start = 0;
    regions
        .iter()
        .map(|(&region, tree)| {
            let end = start + tree.value_count();
            let range = start..end;
            start = end;
            (region, range)
        })
        .collect()
}
