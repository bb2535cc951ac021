use ndarray::Array2;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Covered/uncovered overlay, `true` while the cell is still covered.
pub type CoverGrid = Array2<bool>;

/// Flag overlay, `true` on flagged cells.
pub type FlagGrid = Array2<bool>;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

pub const fn in_bounds(bounds: Coord2, coords: Coord2) -> bool {
    coords.0 < bounds.0 && coords.1 < bounds.1
}

pub const fn manhattan(a: Coord2, b: Coord2) -> CellCount {
    (a.0.abs_diff(b.0) as CellCount) + (a.1.abs_diff(b.1) as CellCount)
}

/// splitmix64 finalizer, used to derive per-round seeds and explosion jitter.
pub(crate) const fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> NeighborIter {
        let dim = self.dim();
        let size = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        NeighborIter::new(index, size)
    }
}

/// The 8 compass offsets: NW, N, NE, W, E, SW, S, SE.
const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Iterates the in-bounds 8-neighborhood of a cell. Out-of-bounds offsets are
/// absent neighbors, never errors, so iteration near edges is naturally safe.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    offsets: core::slice::Iter<'static, (i8, i8)>,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            offsets: DISPLACEMENTS.iter(),
        }
    }

    fn displaced(&self, (dx, dy): (i8, i8)) -> Option<Coord2> {
        let next_x = self.center.0.checked_add_signed(dx)?;
        let next_y = self.center.1.checked_add_signed(dy)?;
        in_bounds(self.bounds, (next_x, next_y)).then_some((next_x, next_y))
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let &delta = self.offsets.next()?;
            if let Some(coords) = self.displaced(delta) {
                return Some(coords);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn neighbors_of(center: Coord2, bounds: Coord2) -> Vec<Coord2> {
        NeighborIter::new(center, bounds).collect()
    }

    #[test]
    fn interior_cell_has_eight_neighbors() {
        let neighbors = neighbors_of((1, 1), (3, 3));
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&(1, 1)));
    }

    #[test]
    fn corner_and_edge_cells_are_clipped() {
        assert_eq!(neighbors_of((0, 0), (3, 3)).len(), 3);
        assert_eq!(neighbors_of((1, 0), (3, 3)).len(), 5);
        assert_eq!(neighbors_of((2, 2), (3, 3)).len(), 3);
    }

    #[test]
    fn out_of_bounds_center_yields_nothing_on_tiny_boards() {
        assert!(neighbors_of((0, 0), (1, 1)).is_empty());
        assert!(neighbors_of((0, 0), (0, 0)).is_empty());
    }

    #[test]
    fn neighbor_order_follows_compass_offsets() {
        let neighbors = neighbors_of((1, 1), (3, 3));
        assert_eq!(
            neighbors,
            [
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 1),
                (2, 1),
                (0, 2),
                (1, 2),
                (2, 2)
            ]
        );
    }

    #[test]
    fn manhattan_distance_is_symmetric() {
        assert_eq!(manhattan((0, 0), (2, 3)), 5);
        assert_eq!(manhattan((2, 3), (0, 0)), 5);
        assert_eq!(manhattan((4, 4), (4, 4)), 0);
    }

    #[test]
    fn mult_saturates_instead_of_overflowing() {
        assert_eq!(mult(255, 255), 65025);
        assert_eq!(mult(0, 255), 0);
    }
}
