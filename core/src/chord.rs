use smallvec::SmallVec;

use crate::*;

/// Covered, unflagged neighbors of a chorded cell.
pub type NeighborSet = SmallVec<[Coord2; 8]>;

/// Result of evaluating the chord rule on a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum ChordOutcome {
    /// Flagged-neighbor count matches the bomb-neighbor count; reveal these.
    Reveal(NeighborSet),
    /// Counts differ (under- or over-flagged); mark these for transient
    /// feedback instead of revealing anything.
    Rejected(NeighborSet),
}

/// Evaluates the chord rule at `coord`: with `B` the bomb-neighbor count and
/// `F` the flagged-neighbor count, `F == B` releases every covered unflagged
/// neighbor for reveal, anything else rejects the chord.
///
/// The rule is total: it does not check that `coord` is an uncovered numbered
/// cell. That gate lives where the gesture is wired up, in
/// [`Game::chord_start`](crate::Game::chord_start).
pub fn evaluate(board: &Board, cover: &CoverGrid, flags: &FlagGrid, coord: Coord2) -> ChordOutcome {
    let mut flagged_neighbors = 0u8;
    let mut candidates = NeighborSet::new();

    for pos in board.iter_neighbors(coord) {
        let covered = cover[pos.to_nd_index()];
        if covered && flags[pos.to_nd_index()] {
            flagged_neighbors += 1;
        } else if covered {
            candidates.push(pos);
        }
    }

    if flagged_neighbors == board.adjacent_mine_count(coord) {
        ChordOutcome::Reveal(candidates)
    } else {
        ChordOutcome::Rejected(candidates)
    }
}
