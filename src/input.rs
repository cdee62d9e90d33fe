//! Input vocabulary shared by keyboard, on-screen buttons and drag gestures.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// A discrete input delivered to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    /// Space key or the start button: starts from the intro, restarts after a win.
    Action,
    Move(Direction),
}

impl Input {
    /// Map a `KeyboardEvent.code` value.
    pub fn from_key_code(code: &str) -> Option<Input> {
        match code {
            "Space" => Some(Input::Action),
            "ArrowLeft" => Some(Input::Move(Direction::Left)),
            "ArrowRight" => Some(Input::Move(Direction::Right)),
            "ArrowUp" => Some(Input::Move(Direction::Up)),
            "ArrowDown" => Some(Input::Move(Direction::Down)),
            _ => None,
        }
    }
}

/// Minimum drag displacement, per axis, before a direction fires.
pub const DRAG_THRESHOLD: f64 = 30.0;

/// Turns a pointer/touch drag into single-axis steps. The dominant axis of the
/// displacement since the last sample wins; after a step fires the sample point
/// moves to the current position.
#[derive(Clone, Copy, Debug, Default)]
pub struct DragTracker {
    anchor: Option<(f64, f64)>,
}

impl DragTracker {
    pub fn begin(&mut self, x: f64, y: f64) {
        self.anchor = Some((x, y));
    }

    pub fn moved(&mut self, x: f64, y: f64) -> Option<Direction> {
        let (ax, ay) = self.anchor?;
        let (dx, dy) = (x - ax, y - ay);
        if dx.abs() <= DRAG_THRESHOLD && dy.abs() <= DRAG_THRESHOLD {
            return None;
        }
        self.anchor = Some((x, y));
        let dir = if dx.abs() > dy.abs() {
            if dx > 0.0 { Direction::Right } else { Direction::Left }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(dir)
    }

    pub fn end(&mut self) {
        self.anchor = None;
    }
}
