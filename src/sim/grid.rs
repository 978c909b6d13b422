//! Grid graph: cells and the open passages between them
//!
//! Each cell keeps a 4-bit mask of its open sides. Passages are always
//! carved on both cells, so membership is a single bit test either way.

use serde::{Deserialize, Serialize};

/// A grid cell, addressed by row and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One of the four grid directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Neighbor enumeration order. The maze generator draws from this order,
    /// so changing it changes every seeded maze.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Dir::Up => 1,
            Dir::Down => 2,
            Dir::Left => 4,
            Dir::Right => 8,
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// H×W grid with a passage set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    /// Open-side bits per cell, row-major
    open: Vec<u8>,
}

impl Grid {
    /// A fully walled grid (no passages)
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            open: vec![0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat index `row * cols + col`
    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    #[inline]
    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index / self.cols, index % self.cols)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// The in-bounds cell one step from `cell` in `dir`
    pub fn step(&self, cell: Cell, dir: Dir) -> Option<Cell> {
        let next = match dir {
            Dir::Up => Cell::new(cell.row.checked_sub(1)?, cell.col),
            Dir::Down => Cell::new(cell.row + 1, cell.col),
            Dir::Left => Cell::new(cell.row, cell.col.checked_sub(1)?),
            Dir::Right => Cell::new(cell.row, cell.col + 1),
        };
        self.contains(next).then_some(next)
    }

    /// In-bounds 4-neighbors, in `Dir::ALL` order
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = (Dir, Cell)> + '_ {
        Dir::ALL
            .into_iter()
            .filter_map(move |dir| self.step(cell, dir).map(|n| (dir, n)))
    }

    /// Direction from `a` to an adjacent cell `b`
    pub fn direction_between(a: Cell, b: Cell) -> Option<Dir> {
        if a.col == b.col && a.row == b.row + 1 {
            Some(Dir::Up)
        } else if a.col == b.col && a.row + 1 == b.row {
            Some(Dir::Down)
        } else if a.row == b.row && a.col == b.col + 1 {
            Some(Dir::Left)
        } else if a.row == b.row && a.col + 1 == b.col {
            Some(Dir::Right)
        } else {
            None
        }
    }

    /// Open the passage between two adjacent cells (symmetric).
    /// Returns false if the cells are not grid-adjacent.
    pub fn carve(&mut self, a: Cell, b: Cell) -> bool {
        let Some(dir) = Self::direction_between(a, b) else {
            return false;
        };
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        let (ia, ib) = (self.index(a), self.index(b));
        self.open[ia] |= dir.bit();
        self.open[ib] |= dir.opposite().bit();
        true
    }

    #[inline]
    pub fn is_open(&self, cell: Cell, dir: Dir) -> bool {
        self.contains(cell) && self.open[self.index(cell)] & dir.bit() != 0
    }

    /// Passage-membership test for any pair of cells
    pub fn has_passage(&self, a: Cell, b: Cell) -> bool {
        Self::direction_between(a, b).is_some_and(|dir| self.is_open(a, dir))
    }

    /// Cells reachable in one step through open passages
    pub fn open_neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.neighbors(cell)
            .filter(move |&(dir, _)| self.is_open(cell, dir))
            .map(|(_, n)| n)
    }

    /// Every undirected passage once, as (cell, right-or-down neighbor)
    pub fn passages(&self) -> impl Iterator<Item = (Cell, Cell)> + '_ {
        (0..self.cell_count()).flat_map(move |i| {
            let cell = self.cell_at(i);
            [Dir::Right, Dir::Down]
                .into_iter()
                .filter(move |&dir| self.is_open(cell, dir))
                .filter_map(move |dir| self.step(cell, dir).map(|n| (cell, n)))
        })
    }

    pub fn passage_count(&self) -> usize {
        self.passages().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors_respect_bounds() {
        let grid = Grid::new(3, 4);

        let corner: Vec<_> = grid.neighbors(Cell::new(0, 0)).collect();
        assert_eq!(
            corner,
            vec![(Dir::Down, Cell::new(1, 0)), (Dir::Right, Cell::new(0, 1))]
        );

        let middle: Vec<_> = grid.neighbors(Cell::new(1, 1)).map(|(d, _)| d).collect();
        assert_eq!(middle, Dir::ALL.to_vec());

        let far = grid.neighbors(Cell::new(2, 3)).count();
        assert_eq!(far, 2);
    }

    #[test]
    fn test_carve_is_symmetric() {
        let mut grid = Grid::new(2, 2);
        let a = Cell::new(0, 0);
        let b = Cell::new(0, 1);

        assert!(!grid.has_passage(a, b));
        assert!(grid.carve(a, b));
        assert!(grid.has_passage(a, b));
        assert!(grid.has_passage(b, a));
        assert!(grid.is_open(a, Dir::Right));
        assert!(grid.is_open(b, Dir::Left));
        assert_eq!(grid.passage_count(), 1);
    }

    #[test]
    fn test_carve_rejects_non_adjacent() {
        let mut grid = Grid::new(3, 3);
        assert!(!grid.carve(Cell::new(0, 0), Cell::new(1, 1)));
        assert!(!grid.carve(Cell::new(0, 0), Cell::new(0, 2)));
        assert!(!grid.carve(Cell::new(0, 0), Cell::new(0, 0)));
        assert_eq!(grid.passage_count(), 0);
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(5, 7);
        let cell = Cell::new(3, 6);
        assert_eq!(grid.index(cell), 27);
        assert_eq!(grid.cell_at(27), cell);
    }

    #[test]
    fn test_passages_listed_once() {
        let mut grid = Grid::new(2, 2);
        grid.carve(Cell::new(0, 0), Cell::new(0, 1));
        grid.carve(Cell::new(1, 1), Cell::new(0, 1));

        let passages: Vec<_> = grid.passages().collect();
        assert_eq!(
            passages,
            vec![
                (Cell::new(0, 0), Cell::new(0, 1)),
                (Cell::new(0, 1), Cell::new(1, 1)),
            ]
        );
        let open: Vec<_> = grid.open_neighbors(Cell::new(0, 1)).collect();
        assert_eq!(open, vec![Cell::new(1, 1), Cell::new(0, 0)]);
    }
}
