//! Per-frame driver: owns the session and its random source, and runs
//! update-then-draw once per display refresh.

use rand::Rng;
use rand::rngs::SmallRng;

use crate::input::{Direction, Input};
use crate::render::{self, Surface};
use crate::session::{GameEvent, GameSession};

pub struct FrameDriver<R: Rng = SmallRng> {
    session: GameSession,
    rng: R,
    frames: u64,
}

impl<R: Rng> FrameDriver<R> {
    pub fn new(session: GameSession, rng: R) -> Self {
        Self {
            session,
            rng,
            frames: 0,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn input(&mut self, input: Input) {
        self.session.handle_input(input, &mut self.rng);
    }

    pub fn drag(&mut self, dir: Direction) {
        self.session.handle_drag(dir);
    }

    /// Advance the session one frame, then repaint it.
    pub fn frame(&mut self, surface: &mut dyn Surface, now_ms: f64) {
        self.session.update(&mut self.rng);
        render::draw_frame(&self.session, surface, &mut self.rng, now_ms);
        self.frames += 1;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.session.drain_events()
    }
}
