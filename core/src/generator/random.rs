use super::*;
use ndarray::Array2;

/// Generation strategy that runs one independent Bernoulli trial per cell and
/// then forces a safe zone around the first activated cell, so the opening
/// move can never be a mine. There is no guarantee on the total mine count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BernoulliGenerator {
    seed: u64,
    safe_zone: Option<Coord2>,
}

impl BernoulliGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            safe_zone: None,
        }
    }

    /// The safe zone is `origin` plus its in-bounds 8-neighborhood.
    pub fn with_safe_zone(seed: u64, origin: Coord2) -> Self {
        Self {
            seed,
            safe_zone: Some(origin),
        }
    }
}

impl BoardGenerator for BernoulliGenerator {
    fn generate(self, config: GameConfig) -> Board {
        use rand::prelude::*;

        let (size_x, size_y) = config.size;
        if config.total_cells() == 0 {
            log::warn!("degenerate {size_x}x{size_y} board requested, generating an empty grid");
            return Board::empty(config.size);
        }

        let probability = config.bomb_probability.clamp(0.0, 1.0);
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for x in 0..size_x {
            for y in 0..size_y {
                mines[(x, y).to_nd_index()] = rng.random_bool(probability);
            }
        }

        // undo trials inside the safe zone, after all cells rolled, so one
        // seed always yields one base layout
        if let Some(origin) = self.safe_zone {
            if in_bounds(config.size, origin) {
                mines[origin.to_nd_index()] = false;
                for pos in mines.iter_neighbors(origin) {
                    mines[pos.to_nd_index()] = false;
                }
            } else {
                log::warn!("safe zone origin {origin:?} outside {size_x}x{size_y} board, ignored");
            }
        }

        Board::from_mine_mask(mines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: Coord2, bomb_probability: f64) -> GameConfig {
        GameConfig::new(size, bomb_probability).unwrap()
    }

    #[test]
    fn safe_zone_is_mine_free_even_at_full_probability() {
        for seed in 0..32 {
            let board =
                BernoulliGenerator::with_safe_zone(seed, (2, 2)).generate(config((5, 5), 1.0));

            assert!(board.is_double_safe((2, 2)), "seed {seed}");
            for pos in board.iter_neighbors((2, 2)) {
                assert!(board.is_safe(pos), "seed {seed}, neighbor {pos:?}");
            }
            // everything outside the zone did roll a mine at p = 1
            assert_eq!(board.mine_count(), 25 - 9);
        }
    }

    #[test]
    fn corner_safe_zone_only_clears_in_bounds_neighbors() {
        let board = BernoulliGenerator::with_safe_zone(7, (0, 0)).generate(config((4, 4), 1.0));
        assert_eq!(board.mine_count(), 16 - 4);
        assert!(board.is_safe((0, 0)));
        assert!(board.is_safe((1, 1)));
        assert!(board.contains_mine((2, 2)));
    }

    #[test]
    fn zero_probability_places_no_mines() {
        let board = BernoulliGenerator::new(42).generate(config((6, 3), 0.0));
        assert_eq!(board.mine_count(), 0);
    }

    #[test]
    fn same_seed_yields_same_layout() {
        let cfg = config((9, 9), 0.4);
        let first = BernoulliGenerator::new(1234).generate(cfg);
        let second = BernoulliGenerator::new(1234).generate(cfg);
        let other = BernoulliGenerator::new(1235).generate(cfg);

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn degenerate_config_generates_an_empty_board() {
        let board = BernoulliGenerator::new(0).generate(config((0, 9), 0.5));
        assert_eq!(board.total_cells(), 0);
        assert_eq!(board.size(), (0, 9));
    }
}
