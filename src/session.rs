//! Game state machine.
//!
//! A single [`GameSession`] owns everything that changes while the page is open:
//! the current mode, the lane player, the balloon pool, the compliment overlay and
//! the (lazily built) maze. Input arrives through [`GameSession::handle_input`];
//! the frame driver calls [`GameSession::update`] once per frame and then draws.
//! Nothing here touches the browser; observable happenings are queued as
//! [`GameEvent`]s for the presentation layer.

use rand::Rng;

use crate::balloon::Balloon;
use crate::compliment::ComplimentOverlay;
use crate::config::GameConfig;
use crate::input::{Direction, Input};
use crate::maze::{MazeSession, TreatKind};

/// Lane player's distance above the bottom edge.
pub const PLAYER_LIFT: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Intro,
    Playing,
    Compliment,
    Maze,
    GameOver,
}

/// How the player is expected to control the game; picks message wording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ControlScheme {
    #[default]
    Keyboard,
    Touch,
}

/// Things the presentation layer may want to log or announce.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Welcome,
    Started,
    Restarted,
    BalloonCaught { score: u32 },
    ComplimentShown { text: &'static str },
    ComplimentEnded,
    MazeEntered { rebuilt: bool },
    TreatCollected { kind: TreatKind },
    TreasureFound,
}

impl GameEvent {
    /// Text for the message box, if this event changes it. `<br>` is allowed.
    pub fn message(&self, scheme: ControlScheme) -> Option<&'static str> {
        match (self, scheme) {
            (GameEvent::Welcome, ControlScheme::Keyboard) => {
                Some("🎮 Welcome to the Birthday Adventure! 🎂<br>Press SPACE to start!")
            }
            (GameEvent::Welcome, ControlScheme::Touch) => {
                Some("🎮 Welcome to the Birthday Adventure! 🎂<br>Tap Start to begin!")
            }
            (GameEvent::Started, ControlScheme::Keyboard) => {
                Some("Use LEFT and RIGHT arrow keys to move and catch balloons!")
            }
            (GameEvent::Started, ControlScheme::Touch) => {
                Some("Tap the arrows to move and catch balloons!")
            }
            (GameEvent::Restarted, _) => Some("Game restarted! Catch those balloons!"),
            (GameEvent::MazeEntered { .. }, _) => {
                Some("🎮 Bhool Bhulaiya Time! Find the birthday treasure! 🎁")
            }
            (GameEvent::TreasureFound, _) => {
                Some("🎉 Happiest Birthday Madam Ji! You found the treasure! 🎂")
            }
            _ => None,
        }
    }
}

pub struct GameSession {
    cfg: GameConfig,
    scheme: ControlScheme,
    state: GameState,
    pub player_x: f64,
    pub player_y: f64,
    score: u32,
    balloons_collected: u32,
    pub balloons: Vec<Balloon>,
    compliment: Option<ComplimentOverlay>,
    maze: Option<MazeSession>,
    maze_builds: u32,
    game_won: bool,
    events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(cfg: GameConfig, scheme: ControlScheme, rng: &mut impl Rng) -> Self {
        let balloons = (0..cfg.balloon_pool)
            .map(|_| Balloon::new(cfg.width, cfg.height, rng))
            .collect();
        Self {
            player_x: cfg.width / 2.0,
            player_y: cfg.height - PLAYER_LIFT,
            cfg,
            scheme,
            state: GameState::Intro,
            score: 0,
            balloons_collected: 0,
            balloons,
            compliment: None,
            maze: None,
            maze_builds: 0,
            game_won: false,
            events: vec![GameEvent::Welcome],
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    pub fn scheme(&self) -> ControlScheme {
        self.scheme
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn balloons_collected(&self) -> u32 {
        self.balloons_collected
    }

    pub fn target_balloons(&self) -> u32 {
        self.cfg.target_balloons
    }

    pub fn compliment(&self) -> Option<&ComplimentOverlay> {
        self.compliment.as_ref()
    }

    pub fn maze(&self) -> Option<&MazeSession> {
        self.maze.as_ref()
    }

    pub fn maze_mut(&mut self) -> Option<&mut MazeSession> {
        self.maze.as_mut()
    }

    /// How many times a maze has been generated this session (0 or 1).
    pub fn maze_builds(&self) -> u32 {
        self.maze_builds
    }

    pub fn game_won(&self) -> bool {
        self.game_won
    }

    /// Take all events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply one input. Inputs that mean nothing in the current state are ignored.
    pub fn handle_input(&mut self, input: Input, rng: &mut impl Rng) {
        match (self.state, input) {
            (GameState::Intro, Input::Action) => {
                self.state = GameState::Playing;
                self.events.push(GameEvent::Started);
            }
            (GameState::GameOver, Input::Action) => self.restart(rng),
            (GameState::Playing, Input::Move(dir)) => self.move_lane(dir),
            (GameState::Maze, Input::Move(dir)) => self.move_in_maze(dir),
            _ => {}
        }
    }

    /// Apply one swipe step. Swipes only steer the maze walker; the lane player
    /// has its own buttons.
    pub fn handle_drag(&mut self, dir: Direction) {
        if self.state == GameState::Maze {
            self.move_in_maze(dir);
        }
    }

    fn move_lane(&mut self, dir: Direction) {
        let lo = self.cfg.lane_margin;
        let hi = self.cfg.width - self.cfg.lane_margin;
        match dir {
            Direction::Left => self.player_x = (self.player_x - self.cfg.lane_step).max(lo),
            Direction::Right => self.player_x = (self.player_x + self.cfg.lane_step).min(hi),
            Direction::Up | Direction::Down => {}
        }
    }

    fn move_in_maze(&mut self, dir: Direction) {
        let Some(maze) = self.maze.as_mut() else {
            return;
        };
        let (dx, dy) = dir.delta();
        let before = maze.treats_left();
        let found = maze.move_by(dx, dy);
        if maze.treats_left() < before {
            let (px, py) = maze.player;
            if let Some(item) = maze.collectibles.iter().find(|c| c.x == px && c.y == py) {
                self.events.push(GameEvent::TreatCollected { kind: item.kind });
            }
        }
        if found {
            self.state = GameState::GameOver;
            self.game_won = true;
            self.events.push(GameEvent::TreasureFound);
        }
    }

    fn restart(&mut self, rng: &mut impl Rng) {
        self.state = GameState::Playing;
        self.score = 0;
        self.balloons_collected = 0;
        self.game_won = false;
        self.compliment = None;
        for b in &mut self.balloons {
            b.reset(rng);
        }
        self.events.push(GameEvent::Restarted);
    }

    /// Advance the active mode by one frame.
    pub fn update(&mut self, rng: &mut impl Rng) {
        match self.state {
            GameState::Playing | GameState::Compliment => {
                for b in &mut self.balloons {
                    b.update(rng);
                }
                self.check_catches(rng);
                self.tick_compliment();
            }
            GameState::Maze => {
                if let Some(maze) = self.maze.as_mut() {
                    maze.advance(rng);
                }
            }
            GameState::Intro | GameState::GameOver => {}
        }
    }

    fn tick_compliment(&mut self) {
        if self.state != GameState::Compliment {
            return;
        }
        let finished = match self.compliment.as_mut() {
            Some(overlay) => overlay.tick(),
            None => true,
        };
        if finished {
            self.compliment = None;
            self.state = GameState::Playing;
            self.events.push(GameEvent::ComplimentEnded);
        }
    }

    /// Test every live balloon against the lane player and register catches.
    pub fn check_catches(&mut self, rng: &mut impl Rng) {
        for idx in 0..self.balloons.len() {
            if !matches!(self.state, GameState::Playing | GameState::Compliment) {
                break;
            }
            let b = &self.balloons[idx];
            if !b.collected && b.distance_to(self.player_x, self.player_y) < self.cfg.catch_radius {
                self.register_catch(idx, rng);
            }
        }
    }

    /// Count a catch of balloon `idx` and recycle it.
    pub fn register_catch(&mut self, idx: usize, rng: &mut impl Rng) {
        let Some(b) = self.balloons.get_mut(idx) else {
            return;
        };
        b.collected = true;
        self.score += 1;
        self.balloons_collected += 1;
        self.events.push(GameEvent::BalloonCaught { score: self.score });

        if self.balloons_collected >= self.cfg.target_balloons {
            self.enter_maze(rng);
        } else if self.score % self.cfg.compliment_every == 0 {
            self.show_compliment(rng);
        }

        self.balloons[idx].reset(rng);
    }

    fn show_compliment(&mut self, rng: &mut impl Rng) {
        let overlay = ComplimentOverlay::new(rng, self.cfg.compliment_frames);
        self.events.push(GameEvent::ComplimentShown { text: overlay.text });
        self.compliment = Some(overlay);
        self.state = GameState::Compliment;
    }

    fn enter_maze(&mut self, rng: &mut impl Rng) {
        self.compliment = None;
        self.state = GameState::Maze;
        let rebuilt = match self.maze.as_mut() {
            Some(maze) => {
                maze.rewind();
                false
            }
            None => {
                self.maze = Some(MazeSession::new(&self.cfg.maze, rng));
                self.maze_builds += 1;
                true
            }
        };
        self.events.push(GameEvent::MazeEntered { rebuilt });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn playing() -> (GameSession, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut s = GameSession::new(GameConfig::default(), ControlScheme::Keyboard, &mut rng);
        s.handle_input(Input::Action, &mut rng);
        s.drain_events();
        (s, rng)
    }

    #[test]
    fn starts_in_intro_with_welcome() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = GameSession::new(GameConfig::default(), ControlScheme::Touch, &mut rng);
        assert_eq!(s.state(), GameState::Intro);
        assert_eq!(s.balloons.len(), 5);
        assert_eq!(s.player_x, 400.0);
        assert_eq!(s.player_y, 500.0);
        assert_eq!(s.drain_events(), vec![GameEvent::Welcome]);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn directions_ignored_outside_play() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut s = GameSession::new(GameConfig::default(), ControlScheme::Keyboard, &mut rng);
        s.handle_input(Input::Move(Direction::Left), &mut rng);
        assert_eq!(s.player_x, 400.0);
        assert_eq!(s.state(), GameState::Intro);
    }

    #[test]
    fn lane_moves_are_clamped() {
        let (mut s, mut rng) = playing();
        s.handle_input(Input::Move(Direction::Left), &mut rng);
        assert_eq!(s.player_x, 385.0);
        for _ in 0..100 {
            s.handle_input(Input::Move(Direction::Left), &mut rng);
        }
        assert_eq!(s.player_x, 50.0);
        for _ in 0..100 {
            s.handle_input(Input::Move(Direction::Right), &mut rng);
        }
        assert_eq!(s.player_x, 750.0);
        s.handle_input(Input::Move(Direction::Up), &mut rng);
        assert_eq!(s.player_x, 750.0);
    }

    #[test]
    fn action_ignored_while_playing() {
        let (mut s, mut rng) = playing();
        s.handle_input(Input::Action, &mut rng);
        assert_eq!(s.state(), GameState::Playing);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn every_fourth_catch_shows_compliment() {
        let (mut s, mut rng) = playing();
        for n in 1..=3 {
            s.register_catch(0, &mut rng);
            assert_eq!(s.score(), n);
            assert_eq!(s.state(), GameState::Playing);
        }
        s.register_catch(1, &mut rng);
        assert_eq!(s.state(), GameState::Compliment);
        let overlay = s.compliment().unwrap();
        assert!(crate::COMPLIMENTS.contains(&overlay.text));
        assert_eq!(overlay.alpha(), 0.0);
        assert!(!s.balloons[1].collected);
    }

    #[test]
    fn compliment_returns_to_play_after_window() {
        let (mut s, mut rng) = playing();
        for _ in 0..4 {
            s.register_catch(0, &mut rng);
        }
        // Keep balloons away from the player so no catches interfere.
        s.player_x = -1000.0;
        for frame in 1..=150 {
            assert_eq!(s.state(), GameState::Compliment, "frame {frame}");
            s.update(&mut rng);
            if frame == 30 {
                assert_eq!(s.compliment().unwrap().alpha(), 1.0);
            }
        }
        assert_eq!(s.state(), GameState::Playing);
        assert!(s.compliment().is_none());
        assert!(s.drain_events().contains(&GameEvent::ComplimentEnded));
    }

    #[test]
    fn moves_ignored_during_compliment() {
        let (mut s, mut rng) = playing();
        for _ in 0..4 {
            s.register_catch(0, &mut rng);
        }
        s.handle_input(Input::Move(Direction::Right), &mut rng);
        assert_eq!(s.player_x, 400.0);
    }

    #[test]
    fn target_catch_enters_maze_once() {
        let (mut s, mut rng) = playing();
        for _ in 0..15 {
            s.register_catch(0, &mut rng);
        }
        assert_eq!(s.state(), GameState::Maze);
        assert_eq!(s.maze_builds(), 1);
        assert_eq!(s.maze().unwrap().player, (1, 1));
        assert!(s.compliment().is_none());
        // Balloon phase is frozen in the maze.
        s.update(&mut rng);
        assert_eq!(s.balloons_collected(), 15);
        assert_eq!(s.maze_builds(), 1);
    }

    #[test]
    fn overlapping_balloon_is_caught_on_update() {
        let (mut s, mut rng) = playing();
        s.balloons[2].x = s.player_x;
        s.balloons[2].y = s.player_y;
        s.update(&mut rng);
        assert_eq!(s.score(), 1);
        assert_eq!(s.balloons_collected(), 1);
        assert!(!s.balloons[2].collected);
        assert_eq!(s.balloons[2].y, 630.0);
    }

    #[test]
    fn restart_keeps_maze_but_resets_counters() {
        let (mut s, mut rng) = playing();
        for _ in 0..15 {
            s.register_catch(0, &mut rng);
        }
        let grid = s.maze().unwrap().grid().clone();
        // Walk straight to the treasure along the lattice corridors.
        for _ in 0..12 {
            s.handle_input(Input::Move(Direction::Right), &mut rng);
        }
        for _ in 0..12 {
            s.handle_input(Input::Move(Direction::Down), &mut rng);
        }
        assert_eq!(s.state(), GameState::GameOver);
        assert!(s.game_won());

        s.handle_input(Input::Action, &mut rng);
        assert_eq!(s.state(), GameState::Playing);
        assert_eq!(s.score(), 0);
        assert_eq!(s.balloons_collected(), 0);
        assert!(s.maze().is_some());

        for _ in 0..15 {
            s.register_catch(0, &mut rng);
        }
        assert_eq!(s.maze_builds(), 1);
        assert_eq!(s.maze().unwrap().grid(), &grid);
        assert_eq!(s.maze().unwrap().player, (1, 1));
    }

    #[test]
    fn swipes_only_steer_in_the_maze() {
        let (mut s, mut rng) = playing();
        s.handle_drag(Direction::Left);
        assert_eq!(s.player_x, 400.0);

        for _ in 0..15 {
            s.register_catch(0, &mut rng);
        }
        s.handle_drag(Direction::Right);
        assert_eq!(s.maze().unwrap().player, (2, 1));
    }

    #[test]
    fn treat_pickup_is_announced() {
        let (mut s, mut rng) = playing();
        for _ in 0..15 {
            s.register_catch(0, &mut rng);
        }
        s.drain_events();
        if let Some(maze) = s.maze_mut() {
            maze.player = (4, 3);
        }
        s.handle_input(Input::Move(Direction::Down), &mut rng);
        assert_eq!(s.maze().unwrap().player, (4, 4));
        assert_eq!(
            s.drain_events(),
            vec![GameEvent::TreatCollected {
                kind: TreatKind::Ladoo
            }]
        );
        // Stepping back off and on again does not re-announce.
        s.handle_input(Input::Move(Direction::Up), &mut rng);
        s.handle_input(Input::Move(Direction::Down), &mut rng);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn event_messages_follow_scheme() {
        assert!(GameEvent::Welcome.message(ControlScheme::Touch).unwrap().contains("Tap Start"));
        assert!(GameEvent::Welcome.message(ControlScheme::Keyboard).unwrap().contains("SPACE"));
        let caught = GameEvent::BalloonCaught { score: 1 };
        assert_eq!(caught.message(ControlScheme::Keyboard), None);
    }
}
