use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Spacing between consecutive explosion steps of a loss sequence.
pub const EXPLOSION_INTERVAL: Duration = Duration::from_millis(30);

/// One scheduled explosion, `fire_in` measured from the moment of detonation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplosionStep {
    pub coords: Coord2,
    pub fire_in: Duration,
}

/// The timed mine-reveal sequence of a lost round. The host schedules one
/// delayed callback per step and feeds each back through
/// [`Game::fire_explosion`](crate::Game::fire_explosion) with the stamped
/// `generation`; steps captured before a reset become no-ops there.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LossSchedule {
    pub generation: u64,
    pub steps: Vec<ExplosionStep>,
    pub total: Duration,
}

/// Jitter in `[0, 1)` hashed from the detonation origin and a mine cell.
/// Seeded from coordinates only, so a given detonation always replays the
/// same ripple.
fn jitter(origin: Coord2, coords: Coord2) -> f64 {
    let seed = (origin.0 as u64)
        .wrapping_mul(73_856_093)
        .wrapping_add((origin.1 as u64).wrapping_mul(19_349_663));
    let packed = ((coords.0 as u64) << 32) | coords.1 as u64;
    let mixed = mix64(seed ^ packed);
    (mixed >> 11) as f64 / (1u64 << 53) as f64
}

/// Manhattan distance from the origin plus sub-step jitter. The jitter stays
/// below one distance unit, so farther mines never overtake nearer ones; it
/// only shuffles mines within the same distance band.
fn weighted_distance(origin: Coord2, coords: Coord2) -> f64 {
    manhattan(origin, coords) as f64 + jitter(origin, coords) * 0.75
}

/// Orders every unflagged mine into a timed explosion sequence rippling out
/// from `origin`. Flagged mines are spared the spectacle. `origin` is always
/// the first, immediate step, and degenerately the only one when the player
/// had flagged every other mine.
pub fn build_schedule(
    board: &Board,
    flags: &FlagGrid,
    origin: Coord2,
    generation: u64,
) -> LossSchedule {
    let (size_x, size_y) = board.size();
    let mut mines: Vec<Coord2> = Vec::with_capacity(board.mine_count() as usize);
    for x in 0..size_x {
        for y in 0..size_y {
            let coords = (x, y);
            if coords != origin && board.contains_mine(coords) && !flags[coords.to_nd_index()] {
                mines.push(coords);
            }
        }
    }
    mines.sort_by(|&a, &b| {
        weighted_distance(origin, a).total_cmp(&weighted_distance(origin, b))
    });

    let steps: Vec<ExplosionStep> = core::iter::once(origin)
        .chain(mines)
        .enumerate()
        .map(|(index, coords)| ExplosionStep {
            coords,
            fire_in: EXPLOSION_INTERVAL * index as u32,
        })
        .collect();
    let total = EXPLOSION_INTERVAL * steps.len() as u32;

    LossSchedule {
        generation,
        steps,
        total,
    }
}
