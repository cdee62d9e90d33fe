//! Treasure maze played after the balloon phase.
//!
//! A [`MazeSession`] owns the generated grid, the walker's cell and facing, the
//! treats and the decorative figures, plus the rotating hint line shown along the
//! bottom of the screen.

use rand::Rng;

use crate::HINTS;
use crate::config::MazeConfig;

mod grid;
mod layout;

pub use grid::{Cell, MazeGrid};
pub use layout::{COLLECTIBLES, Collectible, OBSTACLES, Obstacle, ObstacleKind, TreatKind};

pub const START: (usize, usize) = (1, 1);

/// Phase step of the walker's idle dance.
const DANCE_STEP: f64 = 0.1;

pub struct MazeSession {
    grid: MazeGrid,
    pub cell_size: f64,
    pub player: (usize, usize),
    /// Radians, from the last accepted step.
    pub facing: f64,
    pub dance: f64,
    pub treasure: (usize, usize),
    pub collectibles: Vec<Collectible>,
    pub obstacles: Vec<Obstacle>,
    hint: String,
    hint_timer: u32,
    hint_frames: u32,
}

impl MazeSession {
    pub fn new(cfg: &MazeConfig, rng: &mut impl Rng) -> Self {
        let grid = MazeGrid::generate(cfg.width, cfg.height, cfg.random_openings, rng);
        Self::with_grid(grid, cfg)
    }

    /// Build a session on a given grid. Treats and figures outside the grid's
    /// interior are dropped; start, treasure and treats are guaranteed reachable.
    pub fn with_grid(mut grid: MazeGrid, cfg: &MazeConfig) -> Self {
        let inside = |x: usize, y: usize| {
            x >= 1 && y >= 1 && x + 1 < grid.width() && y + 1 < grid.height()
        };
        let treasure = cfg.treasure;
        let collectibles: Vec<Collectible> = layout::collectibles()
            .into_iter()
            .filter(|c| inside(c.x, c.y))
            .collect();
        let obstacles: Vec<Obstacle> = layout::obstacles()
            .into_iter()
            .filter(|o| inside(o.x, o.y))
            .collect();

        grid.ensure_reachable(START, treasure);
        for c in &collectibles {
            grid.ensure_reachable(START, (c.x, c.y));
        }

        Self {
            grid,
            cell_size: cfg.cell_size,
            player: START,
            facing: 0.0,
            dance: 0.0,
            treasure,
            collectibles,
            obstacles,
            hint: String::new(),
            hint_timer: 0,
            hint_frames: cfg.hint_frames,
        }
    }

    pub fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// Try to step the walker by one unit. Blocked or out-of-bounds steps are
    /// ignored. Returns true iff the walker now stands on the treasure.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        let nx = self.player.0 as i64 + dx as i64;
        let ny = self.player.1 as i64 + dy as i64;
        if self.grid.get_signed(nx, ny) != Some(Cell::Open) {
            return false;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        self.player = (nx, ny);
        self.facing = (dy as f64).atan2(dx as f64);

        for item in self.collectibles.iter_mut().filter(|c| !c.collected) {
            if item.x == nx && item.y == ny {
                item.collected = true;
                self.hint = format!("Waah! {} mil gaya! 🎉", item.kind.name());
                self.hint_timer = self.hint_frames;
            }
        }

        self.player == self.treasure
    }

    /// Per-frame progression: hint rotation, figure animation and the walker's
    /// dance. Drawing never mutates the session.
    pub fn advance(&mut self, rng: &mut impl Rng) {
        if self.hint_timer == 0 {
            self.hint = HINTS[rng.gen_range(0..HINTS.len())].to_string();
            self.hint_timer = self.hint_frames;
        }
        self.hint_timer = self.hint_timer.saturating_sub(1);
        for o in &mut self.obstacles {
            o.advance();
        }
        self.dance += DANCE_STEP;
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn hint_timer(&self) -> u32 {
        self.hint_timer
    }

    /// Put the walker back at the start with all treats restored. The grid is
    /// kept as generated.
    pub fn rewind(&mut self) {
        self.player = START;
        self.facing = 0.0;
        for c in &mut self.collectibles {
            c.collected = false;
        }
        self.hint.clear();
        self.hint_timer = 0;
    }

    pub fn treats_left(&self) -> usize {
        self.collectibles.iter().filter(|c| !c.collected).count()
    }
}
