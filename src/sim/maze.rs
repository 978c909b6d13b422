//! Maze generation and start/end selection
//!
//! Mazes are uniform spanning trees of the grid graph, sampled with
//! Wilson's algorithm (loop-erased random walks). Start and end are the
//! two ends of an approximate diameter found by a double BFS.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::{Cell, Dir, Grid};

/// Uniform integer draws, the only randomness the generator needs
pub trait RandomSource {
    /// Uniform integer in `[0, n)`. `n` is always at least 1.
    fn below(&mut self, n: usize) -> usize;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn below(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

/// A generated maze: a spanning tree over the grid plus its endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    pub grid: Grid,
    pub start: Cell,
    pub end: Cell,
}

impl Maze {
    /// Generate a perfect maze of `rows`×`cols` cells
    pub fn generate<R: RandomSource + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let grid = generate_tree(rows, cols, rng);
        let (start, end) = farthest_pair(&grid);
        log::debug!(
            "Maze {}x{}: start ({}, {}), end ({}, {})",
            rows,
            cols,
            start.row,
            start.col,
            end.row,
            end.col
        );
        Self { grid, start, end }
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Text drawing with `S` at the start and `E` at the end
    pub fn to_ascii(&self) -> String {
        let (rows, cols) = (self.rows(), self.cols());
        let mut out = String::with_capacity((rows * 2 + 1) * (cols * 3 + 2));

        out.push('+');
        for _ in 0..cols {
            out.push_str("--+");
        }
        out.push('\n');

        for row in 0..rows {
            let mut body = String::from("|");
            let mut floor = String::from("+");
            for col in 0..cols {
                let cell = Cell::new(row, col);
                body.push_str(if cell == self.start {
                    "S "
                } else if cell == self.end {
                    "E "
                } else {
                    "  "
                });
                body.push(if self.grid.is_open(cell, Dir::Right) { ' ' } else { '|' });
                floor.push_str(if self.grid.is_open(cell, Dir::Down) { "  +" } else { "--+" });
            }
            out.push_str(&body);
            out.push('\n');
            out.push_str(&floor);
            out.push('\n');
        }
        out
    }
}

/// Out-of-tree cells as a Fenwick tree over 0/1 flags, so the k-th free
/// cell in row-major order is an O(log n) lookup
struct FreeCells {
    tree: Vec<usize>,
}

impl FreeCells {
    /// Every cell free; node `i` (1-based) counts the `lowbit(i)` flags ending at `i`
    fn full(len: usize) -> Self {
        Self {
            tree: (0..=len).map(|i| i & i.wrapping_neg()).collect(),
        }
    }

    fn remove(&mut self, index: usize) {
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] -= 1;
            i += i & i.wrapping_neg();
        }
    }

    /// Flat index of the k-th (0-based) free cell
    fn nth(&self, k: usize) -> Option<usize> {
        let len = self.tree.len() - 1;
        if len == 0 {
            return None;
        }
        let mut pos = 0;
        let mut rank = k + 1;
        let mut step = 1 << (usize::BITS - 1 - len.leading_zeros());
        while step > 0 {
            let next = pos + step;
            if next <= len && self.tree[next] < rank {
                pos = next;
                rank -= self.tree[next];
            }
            step >>= 1;
        }
        (pos < len).then_some(pos)
    }
}

/// Carve a uniform spanning tree with Wilson's algorithm
///
/// Draw order (fixed, fixtures depend on it):
/// 1. `below(rows * cols)` picks the initial tree cell.
/// 2. Per walk, `below(remaining)` picks the k-th out-of-tree cell in
///    row-major order as the walk origin.
/// 3. Per step, `below(neighbor_count)` picks the next cell from the
///    in-bounds neighbors in `Dir::ALL` order.
pub fn generate_tree<R: RandomSource + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Grid {
    let mut grid = Grid::new(rows, cols);
    let total = grid.cell_count();
    if total == 0 {
        return grid;
    }

    let mut in_tree = vec![false; total];
    let mut free = FreeCells::full(total);
    let root = rng.below(total);
    in_tree[root] = true;
    free.remove(root);
    let mut remaining = total - 1;

    // Walk path as flat indices, plus each path cell's position in it
    let mut path: Vec<usize> = Vec::with_capacity(total);
    let mut position: Vec<Option<usize>> = vec![None; total];
    let mut steps = 0usize;

    while remaining > 0 {
        let k = rng.below(remaining);
        let Some(origin) = free.nth(k) else {
            break;
        };

        path.clear();
        path.push(origin);
        position[origin] = Some(0);

        let mut current = origin;
        while !in_tree[current] {
            let cell = grid.cell_at(current);
            let count = grid.neighbors(cell).count();
            let pick = rng.below(count);
            let Some((_, next)) = grid.neighbors(cell).nth(pick) else {
                break;
            };
            let next = grid.index(next);
            steps += 1;

            match position[next] {
                // Loop: erase everything after the first visit
                Some(cut) => {
                    for &erased in &path[cut + 1..] {
                        position[erased] = None;
                    }
                    path.truncate(cut + 1);
                }
                None => {
                    position[next] = Some(path.len());
                    path.push(next);
                }
            }
            current = next;
        }

        for pair in path.windows(2) {
            grid.carve(grid.cell_at(pair[0]), grid.cell_at(pair[1]));
        }
        for &i in &path {
            position[i] = None;
            if !in_tree[i] {
                in_tree[i] = true;
                free.remove(i);
                remaining -= 1;
            }
        }
    }

    log::debug!("Wilson walk: {} cells, {} steps", total, steps);
    grid
}

/// Hop distances from `from` over open passages, plus the visit order
fn bfs(grid: &Grid, from: usize) -> (Vec<Option<u32>>, Vec<usize>) {
    let mut dist = vec![None; grid.cell_count()];
    let mut order = Vec::with_capacity(grid.cell_count());
    let mut queue = VecDeque::new();

    dist[from] = Some(0);
    queue.push_back(from);
    while let Some(v) = queue.pop_front() {
        order.push(v);
        let d = dist[v].unwrap_or(0);
        for n in grid.open_neighbors(grid.cell_at(v)) {
            let n = grid.index(n);
            if dist[n].is_none() {
                dist[n] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    (dist, order)
}

/// The first cell in BFS order at maximum distance from `from`
fn farthest_from(grid: &Grid, from: usize) -> usize {
    let (dist, order) = bfs(grid, from);
    let mut best = from;
    let mut best_dist = 0;
    for v in order {
        let d = dist[v].unwrap_or(0);
        if d > best_dist {
            best = v;
            best_dist = d;
        }
    }
    best
}

/// Double-BFS diameter estimate: (farthest from cell 0, farthest from that)
pub fn farthest_pair(grid: &Grid) -> (Cell, Cell) {
    if grid.cell_count() == 0 {
        return (Cell::new(0, 0), Cell::new(0, 0));
    }
    let a = farthest_from(grid, 0);
    let b = farthest_from(grid, a);
    (grid.cell_at(a), grid.cell_at(b))
}
