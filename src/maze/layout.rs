//! Fixed placement of maze treats and decorations.

use std::f64::consts::TAU;

/// Treat categories scattered through the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreatKind {
    Ladoo,
    GulabJamun,
    Barfi,
}

impl TreatKind {
    pub fn name(self) -> &'static str {
        match self {
            TreatKind::Ladoo => "ladoo",
            TreatKind::GulabJamun => "gulab jamun",
            TreatKind::Barfi => "barfi",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Collectible {
    pub x: usize,
    pub y: usize,
    pub kind: TreatKind,
    pub collected: bool,
}

pub const COLLECTIBLES: [(usize, usize, TreatKind); 3] = [
    (4, 4, TreatKind::Ladoo),
    (12, 3, TreatKind::GulabJamun),
    (3, 12, TreatKind::Barfi),
];

pub fn collectibles() -> Vec<Collectible> {
    COLLECTIBLES
        .iter()
        .map(|&(x, y, kind)| Collectible {
            x,
            y,
            kind,
            collected: false,
        })
        .collect()
}

/// Decorative animated figures. Each variant carries only its own phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObstacleKind {
    DancingDholak { frame: f64 },
    SpinningSamosa { rotation: f64 },
    JumpingJalebi { phase: f64, height: f64 },
    BouncingBalloon { phase: f64, scale: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: usize,
    pub y: usize,
    pub kind: ObstacleKind,
}

// Per-frame phase steps at 60 Hz. The jalebi bob has a 500 ms radian period,
// the balloon pulse a 400 ms one.
const DHOLAK_STEP: f64 = 0.1;
const SAMOSA_STEP: f64 = 0.05;
const JALEBI_STEP: f64 = 1000.0 / 60.0 / 500.0;
const BALLOON_STEP: f64 = 1000.0 / 60.0 / 400.0;

impl Obstacle {
    /// Move the animation forward one frame.
    pub fn advance(&mut self) {
        match &mut self.kind {
            ObstacleKind::DancingDholak { frame } => *frame += DHOLAK_STEP,
            ObstacleKind::SpinningSamosa { rotation } => {
                *rotation = (*rotation + SAMOSA_STEP) % TAU;
            }
            ObstacleKind::JumpingJalebi { phase, height } => {
                *phase = (*phase + JALEBI_STEP) % TAU;
                *height = phase.sin() * 10.0;
            }
            ObstacleKind::BouncingBalloon { phase, scale } => {
                *phase = (*phase + BALLOON_STEP) % TAU;
                *scale = 1.0 + phase.sin() * 0.2;
            }
        }
    }
}

pub const OBSTACLES: [(usize, usize, ObstacleKind); 4] = [
    (5, 5, ObstacleKind::DancingDholak { frame: 0.0 }),
    (8, 3, ObstacleKind::SpinningSamosa { rotation: 0.0 }),
    (
        3,
        8,
        ObstacleKind::JumpingJalebi {
            phase: 0.0,
            height: 0.0,
        },
    ),
    (
        10,
        7,
        ObstacleKind::BouncingBalloon {
            phase: 0.0,
            scale: 1.0,
        },
    ),
];

pub fn obstacles() -> Vec<Obstacle> {
    OBSTACLES.iter().map(|&(x, y, kind)| Obstacle { x, y, kind }).collect()
}
