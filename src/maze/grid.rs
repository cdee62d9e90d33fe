//! Maze grid and generator.

use std::collections::VecDeque;

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Open,
}

/// Row-major grid of cells. Immutable once handed to a maze session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl MazeGrid {
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
        }
    }

    /// Carve the lattice: every odd (x, y) strictly inside the border is opened,
    /// together with its right and lower neighbour when that neighbour is not on
    /// the border. Then `openings` random interior cells are knocked out.
    pub fn generate(width: usize, height: usize, openings: usize, rng: &mut impl Rng) -> Self {
        let mut grid = Self::filled(width, height);
        for y in (1..height.saturating_sub(1)).step_by(2) {
            for x in (1..width.saturating_sub(1)).step_by(2) {
                grid.open(x, y);
                if x + 2 < width {
                    grid.open(x + 1, y);
                }
                if y + 2 < height {
                    grid.open(x, y + 1);
                }
            }
        }
        if width > 2 && height > 2 {
            for _ in 0..openings {
                let x = rng.gen_range(1..width - 1);
                let y = rng.gen_range(1..height - 1);
                grid.open(x, y);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Signed lookup; anything off the grid reads as `None`.
    pub fn get_signed(&self, x: i64, y: i64) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        self.get(x as usize, y as usize)
    }

    pub fn is_open(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(Cell::Open)
    }

    pub fn open(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = Cell::Open;
        }
    }

    /// Breadth-first reachability over open cells (4-connected).
    pub fn reachable(&self, from: (usize, usize), to: (usize, usize)) -> bool {
        if !self.is_open(from.0, from.1) || !self.is_open(to.0, to.1) {
            return false;
        }
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        seen[from.1 * self.width + from.0] = true;
        queue.push_back(from);
        while let Some((x, y)) = queue.pop_front() {
            if (x, y) == to {
                return true;
            }
            let dirs: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
            for (dx, dy) in dirs {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if self.get_signed(nx, ny) != Some(Cell::Open) {
                    continue;
                }
                let idx = ny as usize * self.width + nx as usize;
                if !seen[idx] {
                    seen[idx] = true;
                    queue.push_back((nx as usize, ny as usize));
                }
            }
        }
        false
    }

    /// Open `target` and, if it cannot be reached from `from`, carve an L-shaped
    /// corridor (horizontal leg first, along `from`'s row).
    pub fn ensure_reachable(&mut self, from: (usize, usize), target: (usize, usize)) {
        self.open(from.0, from.1);
        self.open(target.0, target.1);
        if self.reachable(from, target) {
            return;
        }
        let (fx, fy) = from;
        let (tx, ty) = target;
        for x in fx.min(tx)..=fx.max(tx) {
            self.open(x, fy);
        }
        for y in fy.min(ty)..=fy.max(ty) {
            self.open(tx, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn lattice_without_random_openings() {
        let mut rng = SmallRng::seed_from_u64(0);
        let g = MazeGrid::generate(15, 15, 0, &mut rng);
        // Every odd row is a full corridor between the borders.
        for x in 1..14 {
            assert!(g.is_open(x, 1), "({x},1)");
            assert!(g.is_open(x, 13), "({x},13)");
        }
        // Even/even interior cells stay walls.
        assert!(!g.is_open(4, 4));
        assert!(!g.is_open(12, 12));
        // Border is solid.
        for i in 0..15 {
            assert!(!g.is_open(i, 0));
            assert!(!g.is_open(0, i));
            assert!(!g.is_open(i, 14));
            assert!(!g.is_open(14, i));
        }
    }

    #[test]
    fn random_openings_stay_inside_border() {
        let mut rng = SmallRng::seed_from_u64(77);
        let g = MazeGrid::generate(15, 15, 200, &mut rng);
        for i in 0..15 {
            assert!(!g.is_open(i, 0));
            assert!(!g.is_open(14, i));
        }
    }

    #[test]
    fn minimal_grid() {
        let mut rng = SmallRng::seed_from_u64(1);
        let g = MazeGrid::generate(3, 3, 10, &mut rng);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(g.is_open(x, y), (x, y) == (1, 1), "({x},{y})");
            }
        }
    }

    #[test]
    fn out_of_bounds_reads_none() {
        let g = MazeGrid::filled(3, 3);
        assert_eq!(g.get(3, 0), None);
        assert_eq!(g.get_signed(-1, 0), None);
        assert_eq!(g.get(2, 2), Some(Cell::Wall));
    }

    #[test]
    fn reachable_follows_open_cells() {
        let mut g = MazeGrid::filled(5, 5);
        g.open(1, 1);
        g.open(2, 1);
        g.open(3, 1);
        g.open(3, 3);
        assert!(g.reachable((1, 1), (3, 1)));
        assert!(!g.reachable((1, 1), (3, 3)));
        g.open(3, 2);
        assert!(g.reachable((1, 1), (3, 3)));
    }

    #[test]
    fn ensure_reachable_carves_corridor() {
        let mut g = MazeGrid::filled(7, 7);
        g.ensure_reachable((1, 1), (5, 4));
        assert!(g.reachable((1, 1), (5, 4)));
        assert!(g.is_open(5, 1));
    }
}
