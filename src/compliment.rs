//! Compliment overlay shown on score milestones.
//!
//! The overlay is driven purely by frames: a 30-frame fade in, a hold until
//! frame 90, a 30-frame fade out, then a transparent tail until the window
//! closes and the session returns to play.

use rand::Rng;

use crate::COMPLIMENTS;

pub const FADE_FRAMES: u32 = 30;
pub const HOLD_UNTIL: u32 = 90;

#[derive(Clone, Debug)]
pub struct ComplimentOverlay {
    pub text: &'static str,
    frame: u32,
    window: u32,
}

impl ComplimentOverlay {
    /// Pick a compliment at random; `window` is the number of frames before the
    /// overlay reports itself finished.
    pub fn new(rng: &mut impl Rng, window: u32) -> Self {
        let text = COMPLIMENTS[rng.gen_range(0..COMPLIMENTS.len())];
        Self {
            text,
            frame: 0,
            window,
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn alpha(&self) -> f64 {
        alpha_at(self.frame)
    }

    /// Advance one frame. Returns true once the window has elapsed.
    pub fn tick(&mut self) -> bool {
        self.frame = self.frame.saturating_add(1);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.window
    }
}

/// Overlay opacity at a given frame of the window.
pub fn alpha_at(frame: u32) -> f64 {
    if frame < FADE_FRAMES {
        frame as f64 / FADE_FRAMES as f64
    } else if frame <= HOLD_UNTIL {
        1.0
    } else {
        (1.0 - (frame - HOLD_UNTIL) as f64 / FADE_FRAMES as f64).max(0.0)
    }
}
