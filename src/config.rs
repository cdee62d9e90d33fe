//! Game tunables.
//!
//! Every field has a default matching the shipped game; a page can override any
//! subset by passing a JSON object to `start_game_with_config()`. Unknown keys are
//! ignored and missing keys keep their defaults.

#[cfg(feature = "serde")]
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Logical drawing surface width.
    pub width: f64,
    /// Logical drawing surface height.
    pub height: f64,
    pub balloon_pool: usize,
    pub target_balloons: u32,
    /// A compliment shows every time the score hits a multiple of this.
    pub compliment_every: u32,
    pub catch_radius: f64,
    /// Horizontal distance covered by one lane input.
    pub lane_step: f64,
    /// Closest the lane player gets to either side edge.
    pub lane_margin: f64,
    pub maze: MazeConfig,
    /// Length of the compliment overlay, in frames.
    pub compliment_frames: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    pub cell_size: f64,
    /// Extra interior cells knocked open after the lattice is carved.
    pub random_openings: usize,
    pub hint_frames: u32,
    pub treasure: (usize, usize),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            balloon_pool: 5,
            target_balloons: 15,
            compliment_every: 4,
            catch_radius: 60.0,
            lane_step: 15.0,
            lane_margin: 50.0,
            maze: MazeConfig::default(),
            compliment_frames: 150,
        }
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
            cell_size: 40.0,
            random_openings: 10,
            hint_frames: 120,
            treasure: (13, 13),
        }
    }
}

impl GameConfig {
    /// Parse a JSON override. Malformed input yields the error so the caller can
    /// report it and fall back to [`GameConfig::default`].
    #[cfg(feature = "serde_json")]
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let mut cfg: GameConfig = serde_json::from_str(text)?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Clamp values that would make the game unplayable or panic.
    pub fn sanitize(&mut self) {
        self.balloon_pool = self.balloon_pool.max(1);
        self.target_balloons = self.target_balloons.max(1);
        self.compliment_every = self.compliment_every.max(1);
        self.compliment_frames = self.compliment_frames.max(1);

        let defaults = GameConfig::default();
        self.lane_margin = non_negative(self.lane_margin, defaults.lane_margin);
        self.lane_step = non_negative(self.lane_step, defaults.lane_step);
        self.catch_radius = non_negative(self.catch_radius, defaults.catch_radius);
        self.width = non_negative(self.width, defaults.width)
            .max(MIN_SURFACE)
            .max(2.0 * self.lane_margin);
        self.height = non_negative(self.height, defaults.height).max(MIN_SURFACE);
        self.maze.cell_size = non_negative(self.maze.cell_size, defaults.maze.cell_size);

        // The lattice carver needs odd dimensions of at least 3.
        let odd = |n: usize| if n < 3 { 3 } else { n.min(MAX_MAZE_SIDE) | 1 };
        self.maze.width = odd(self.maze.width);
        self.maze.height = odd(self.maze.height);
        let (tx, ty) = self.maze.treasure;
        self.maze.treasure = (
            tx.clamp(1, self.maze.width - 2),
            ty.clamp(1, self.maze.height - 2),
        );
    }
}

/// Smallest drawing surface side, in logical units.
pub const MIN_SURFACE: f64 = 100.0;
/// Largest maze side, in cells.
pub const MAX_MAZE_SIDE: usize = 99;

fn non_negative(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_game() {
        let c = GameConfig::default();
        assert_eq!(c.width, 800.0);
        assert_eq!(c.height, 600.0);
        assert_eq!(c.target_balloons, 15);
        assert_eq!(c.compliment_every, 4);
        assert_eq!(c.maze.width, 15);
        assert_eq!(c.maze.treasure, (13, 13));
    }

    #[test]
    fn sanitize_forces_odd_maze_and_inner_treasure() {
        let mut c = GameConfig::default();
        c.maze.width = 10;
        c.maze.height = 1;
        c.maze.treasure = (40, 0);
        c.sanitize();
        assert_eq!(c.maze.width, 11);
        assert_eq!(c.maze.height, 3);
        assert_eq!(c.maze.treasure, (9, 1));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_overrides_only_given_fields() {
        let c = GameConfig::from_json(r#"{ "target_balloons": 3, "maze": { "hint_frames": 60 } }"#)
            .unwrap();
        assert_eq!(c.target_balloons, 3);
        assert_eq!(c.maze.hint_frames, 60);
        assert_eq!(c.maze.width, 15);
        assert_eq!(c.catch_radius, 60.0);
    }

    #[test]
    fn degenerate_surface_is_clamped_and_drawable() {
        use crate::render::{RecordingSurface, draw_frame};
        use crate::session::{ControlScheme, GameSession};
        use rand::SeedableRng;
        use rand::rngs::SmallRng;

        for height in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut c = GameConfig {
                height,
                width: 0.0,
                lane_margin: 0.0,
                ..GameConfig::default()
            };
            c.sanitize();
            assert!(c.height >= MIN_SURFACE, "height {height}");
            assert!(c.width >= MIN_SURFACE);

            let mut rng = SmallRng::seed_from_u64(9);
            let s = GameSession::new(c, ControlScheme::Keyboard, &mut rng);
            let mut surf = RecordingSurface::default();
            draw_frame(&s, &mut surf, &mut rng, 0.0);
            assert_eq!(surf.clears, 1);
        }
    }

    #[test]
    fn non_finite_tunables_fall_back_to_defaults() {
        let mut c = GameConfig {
            width: f64::NAN,
            lane_margin: f64::INFINITY,
            catch_radius: f64::NAN,
            ..GameConfig::default()
        };
        c.sanitize();
        assert_eq!(c.width, 800.0);
        assert_eq!(c.lane_margin, 50.0);
        assert_eq!(c.catch_radius, 60.0);
    }

    #[test]
    fn huge_maze_is_capped() {
        let mut c = GameConfig::default();
        c.maze.width = usize::MAX;
        c.maze.height = 1000;
        c.maze.treasure = (usize::MAX, usize::MAX);
        c.sanitize();
        assert_eq!(c.maze.width, MAX_MAZE_SIDE);
        assert_eq!(c.maze.height, MAX_MAZE_SIDE);
        assert_eq!(c.maze.treasure, (97, 97));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn zero_height_from_json_is_clamped() {
        let c = GameConfig::from_json(r#"{ "height": 0 }"#).unwrap();
        assert_eq!(c.height, MIN_SURFACE);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn malformed_json_is_an_error() {
        assert!(GameConfig::from_json("{ nope").is_err());
    }
}
