#![no_std]

extern crate alloc;

use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use chord::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use gesture::*;
pub use loss::*;
pub use reveal::*;
pub use types::*;

mod chord;
mod engine;
mod error;
mod generator;
mod gesture;
mod loss;
mod reveal;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub bomb_probability: f64,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, bomb_probability: f64) -> Self {
        Self {
            size,
            bomb_probability,
        }
    }

    pub fn new(size: Coord2, bomb_probability: f64) -> Result<Self> {
        if !bomb_probability.is_finite() {
            return Err(GameError::InvalidProbability);
        }

        let clamped = bomb_probability.clamp(0.0, 1.0);
        if clamped != bomb_probability {
            log::warn!("bomb probability {bomb_probability} outside [0, 1], clamped to {clamped}");
        }
        Ok(Self::new_unchecked(size, clamped))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Mine layout of a single round, immutable once generated. Regeneration
/// replaces it wholesale; nothing mutates a committed board in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    mines: Array2<bool>,
    mine_count: CellCount,
}

impl Board {
    pub fn empty(size: Coord2) -> Self {
        Self {
            mines: Array2::default(size.to_nd_index()),
            mine_count: 0,
        }
    }

    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let mine_count = mines
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        Self { mines, mine_count }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if !in_bounds(size, coords) {
                return Err(GameError::InvalidCoords);
            }
            mines[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mines))
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mines.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        in_bounds(self.size(), coords)
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn is_safe(&self, coords: Coord2) -> bool {
        !self[coords]
    }

    /// Bomb-neighbor count over the in-bounds 8-neighborhood.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mines
            .iter_neighbors(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    /// A cell is double-safe when it is safe and so is every in-bounds
    /// neighbor. Flood-fill propagates only through double-safe cells.
    pub fn is_double_safe(&self, coords: Coord2) -> bool {
        self.is_safe(coords) && self.adjacent_mine_count(coords) == 0
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mines.iter_neighbors(coords)
    }
}

impl Index<Coord2> for Board {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mines[(x as usize, y as usize)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_probability_and_rejects_non_finite() {
        assert_eq!(
            GameConfig::new((4, 4), 1.5).unwrap().bomb_probability,
            1.0
        );
        assert_eq!(
            GameConfig::new((4, 4), -0.25).unwrap().bomb_probability,
            0.0
        );
        assert_eq!(
            GameConfig::new((4, 4), f64::NAN),
            Err(GameError::InvalidProbability)
        );
    }

    #[test]
    fn degenerate_sizes_yield_empty_grids() {
        let config = GameConfig::new((0, 7), 0.5).unwrap();
        assert_eq!(config.total_cells(), 0);
        assert_eq!(Board::empty((0, 7)).total_cells(), 0);
    }

    #[test]
    fn mine_coords_outside_the_board_are_rejected() {
        assert_eq!(
            Board::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn double_safe_requires_a_clean_neighborhood() {
        let board = Board::from_mine_coords((3, 3), &[(1, 1)]).unwrap();

        assert!(!board.is_double_safe((1, 1)));
        assert!(!board.is_double_safe((0, 0)));
        assert_eq!(board.adjacent_mine_count((0, 0)), 1);

        let clear = Board::from_mine_coords((3, 3), &[]).unwrap();
        assert!(clear.is_double_safe((0, 0)));
    }

    #[test]
    fn counts_derive_from_the_mask() {
        let board = Board::from_mine_coords((3, 2), &[(0, 0), (2, 1)]).unwrap();
        assert_eq!(board.mine_count(), 2);
        assert_eq!(board.safe_cell_count(), 4);
        assert!(board.contains_mine((0, 0)));
        assert!(board.is_safe((1, 0)));
    }
}
