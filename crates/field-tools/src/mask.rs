//! Rebuilding per-element parametric coordinates from a flat keep mask.

use std::collections::BTreeMap;

use crate::error::{FieldError, FieldResult};

/// Split a flat keep mask back into per-element parametric coordinates.
///
/// `orig_xi_list[e]` holds the parametric coordinates of element `e`, and
/// `keep_mask` has one flag per entry of their concatenation (for example the
/// mask returned by [`remove_close_points`](crate::remove_close_points) on the
/// concatenated points). The result maps every element index to the
/// coordinates that survived, including elements left with none.
///
/// ```
/// use field_tools::keep_xi_by_element;
///
/// let xi = vec![vec!['a', 'b'], vec!['c']];
/// let kept = keep_xi_by_element(&xi, &[true, false, true]).unwrap();
/// assert_eq!(kept[&0], vec!['a']);
/// assert_eq!(kept[&1], vec!['c']);
/// ```
pub fn keep_xi_by_element<X: Clone>(
    orig_xi_list: &[Vec<X>],
    keep_mask: &[bool],
) -> FieldResult<BTreeMap<usize, Vec<X>>> {
    let expected: usize = orig_xi_list.iter().map(Vec::len).sum();
    if keep_mask.len() != expected {
        return Err(FieldError::MaskLengthMismatch {
            mask_len: keep_mask.len(),
            expected,
        });
    }

    let mut offset = 0;
    let mut kept = BTreeMap::new();
    for (elem, xi) in orig_xi_list.iter().enumerate() {
        let elem_mask = &keep_mask[offset..offset + xi.len()];
        offset += xi.len();

        let survivors = xi
            .iter()
            .zip(elem_mask)
            .filter_map(|(x, &k)| k.then(|| x.clone()))
            .collect();
        kept.insert(elem, survivors);
    }

    Ok(kept)
}
