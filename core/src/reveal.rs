use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec;
use alloc::vec::Vec;

use crate::*;

/// Computes the full set of coordinates a reveal at `origin` uncovers.
///
/// Returns an empty set when `origin` is out of bounds, already uncovered, or
/// a mine; this function never touches mine cells. A numbered-but-safe origin
/// opens only itself. A double-safe origin seeds a breadth-first expansion:
/// every safe neighbor of a frontier cell joins the open-set, and the
/// double-safe ones among them keep the frontier growing. Numbered cells are
/// the boundary of the fill.
///
/// The caller applies the result by clearing cover bits, which keeps
/// uncovering monotonic and repeated calls idempotent.
pub fn open_set(board: &Board, cover: &CoverGrid, origin: Coord2) -> Vec<Coord2> {
    if !board.in_bounds(origin) || !cover[origin.to_nd_index()] || board.contains_mine(origin) {
        return Vec::new();
    }

    let mut opened = vec![origin];
    let mut seen = BTreeSet::from([origin]);
    let mut frontier: VecDeque<Coord2> = if board.is_double_safe(origin) {
        VecDeque::from([origin])
    } else {
        VecDeque::new()
    };

    while let Some(cell) = frontier.pop_front() {
        for pos in board.iter_neighbors(cell) {
            if board.is_safe(pos) && seen.insert(pos) {
                opened.push(pos);
                if board.is_double_safe(pos) {
                    frontier.push_back(pos);
                }
            }
        }
    }

    opened
}
