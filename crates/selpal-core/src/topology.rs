//! Selection edits that follow contour connectivity.
//!
//! Adjacency runs along each contour's full node sequence, handles included.
//! Closed contours wrap; open contours end at their first and last node.
//! Anchors, components and guides have no neighbours.

use crate::error::{SelectionError, SelectionResult};
use crate::outline::{Contour, Outline};
use crate::selection::{SelectableElement, SelectionSet};

fn node(contour: usize, index: usize) -> SelectableElement {
    SelectableElement::node(contour, index)
}

fn neighbours(contour: &Contour, index: usize) -> [Option<usize>; 2] {
    [contour.prev(index), contour.next(index)]
}

fn require_contours(outline: &Outline) -> SelectionResult<()> {
    if outline.has_no_contours() {
        Err(SelectionError::EmptyTopology)
    } else {
        Ok(())
    }
}

/// Extend the selection by one node on either side of every selected node.
pub fn grow(outline: &Outline, current: &SelectionSet) -> SelectionResult<SelectionSet> {
    require_contours(outline)?;
    current.validate(outline)?;

    let mut result = current.clone();
    for (ci, ni, _) in outline.nodes() {
        if current.contains(&node(ci, ni)) {
            continue;
        }
        let touches_selection = neighbours(&outline.contours[ci], ni)
            .into_iter()
            .flatten()
            .any(|n| current.contains(&node(ci, n)));
        if touches_selection {
            result.insert(node(ci, ni));
        }
    }
    Ok(result)
}

/// Remove every selected element that sits on the edge of the selection.
///
/// A node is on the edge when a neighbour is unselected or missing (the ends of
/// an open contour). A fully selected closed contour has no edge, so its start
/// node is treated as one. Elements without neighbours are always on the edge.
pub fn shrink(outline: &Outline, current: &SelectionSet) -> SelectionResult<SelectionSet> {
    require_contours(outline)?;
    current.validate(outline)?;

    let fully_selected: Vec<bool> = outline
        .contours
        .iter()
        .enumerate()
        .map(|(ci, contour)| {
            contour.closed
                && !contour.is_empty()
                && (0..contour.len()).all(|ni| current.contains(&node(ci, ni)))
        })
        .collect();

    let mut result = current.clone();
    result.retain(|element| {
        let Some((ci, ni)) = element.as_node() else {
            return false;
        };
        if fully_selected[ci] {
            return ni != 0;
        }
        neighbours(&outline.contours[ci], ni)
            .into_iter()
            .all(|n| n.is_some_and(|n| current.contains(&node(ci, n))))
    });
    Ok(result)
}

/// The last two selected elements, if both are nodes on the same contour.
fn last_two_nodes(current: &SelectionSet) -> Option<(usize, usize, usize)> {
    let (origin, last) = current.last_two()?;
    let (origin_contour, origin_index) = origin.as_node()?;
    let (last_contour, last_index) = last.as_node()?;
    (origin_contour == last_contour).then_some((origin_contour, origin_index, last_index))
}

/// Repeat the spacing between the last two selected nodes once more.
///
/// On a closed contour the spacing is measured forward and wraps; on an open
/// contour it keeps its direction. Nothing changes when fewer than two nodes
/// are selected, when they sit on different contours, or when the next node
/// would fall off an open contour.
pub fn continue_selection(
    outline: &Outline,
    current: &SelectionSet,
) -> SelectionResult<SelectionSet> {
    current.validate(outline)?;

    let Some((ci, origin, last)) = last_two_nodes(current) else {
        log::debug!("continue selection needs two nodes on one contour");
        return Ok(current.clone());
    };
    let contour = &outline.contours[ci];

    let rhythm = if contour.closed {
        if last > origin {
            (last - origin) as isize
        } else {
            (contour.len() - origin + last) as isize
        }
    } else {
        last as isize - origin as isize
    };

    let mut result = current.clone();
    match contour.step(last, rhythm) {
        Some(target) => result.touch(node(ci, target)),
        None => log::debug!("continue selection ran off the end of contour {}", ci),
    }
    Ok(result)
}

/// Deselect the most recently selected element.
pub fn undo_selection(current: &SelectionSet) -> SelectionSet {
    let mut result = current.clone();
    if let Some(last) = current.last() {
        result.remove(last);
    }
    result
}

/// Select every node between the last two selected nodes.
///
/// Closed contours take the shorter way round, preferring the direct route on
/// a tie. The two end nodes stay the most recently selected.
pub fn select_between(outline: &Outline, current: &SelectionSet) -> SelectionResult<SelectionSet> {
    current.validate(outline)?;

    let Some((ci, origin, last)) = last_two_nodes(current) else {
        log::debug!("select between needs two nodes on one contour");
        return Ok(current.clone());
    };
    let contour = &outline.contours[ci];
    let (lo, hi) = if origin < last { (origin, last) } else { (last, origin) };

    let direct = hi - lo;
    let around = lo + contour.len() - hi;

    let mut result = current.clone();
    if !contour.closed || direct <= around {
        result.extend((lo..=hi).map(|ni| node(ci, ni)));
    } else {
        result.extend((hi..contour.len()).chain(0..=lo).map(|ni| node(ci, ni)));
    }
    result.touch(node(ci, origin));
    result.touch(node(ci, last));
    Ok(result)
}
