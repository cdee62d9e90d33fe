//! Rising balloons for the catching phase. Balloons live in a fixed pool and are
//! recycled through [`Balloon::reset`] instead of being dropped.

use rand::Rng;

/// Balloon palette (pinks and a purple).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BalloonColor {
    HotPink,
    MediumPurple,
    LightPink,
    Pink,
    DeepPink,
}

impl BalloonColor {
    pub const ALL: [BalloonColor; 5] = [
        BalloonColor::HotPink,
        BalloonColor::MediumPurple,
        BalloonColor::LightPink,
        BalloonColor::Pink,
        BalloonColor::DeepPink,
    ];

    pub fn css(self) -> &'static str {
        match self {
            BalloonColor::HotPink => "#FF69B4",
            BalloonColor::MediumPurple => "#9370DB",
            BalloonColor::LightPink => "#FFB6C1",
            BalloonColor::Pink => "#FFC0CB",
            BalloonColor::DeepPink => "#FF1493",
        }
    }
}

pub const SPEED_RANGE: std::ops::Range<f64> = 2.0..4.0;
pub const SIZE_RANGE: std::ops::Range<f64> = 25.0..40.0;
/// Horizontal inset from either canvas edge for freshly spawned balloons.
pub const SPAWN_MARGIN: f64 = 20.0;
/// How far below the bottom edge a balloon starts.
pub const SPAWN_DROP: f64 = 30.0;

#[derive(Clone, Debug)]
pub struct Balloon {
    pub x: f64,
    pub y: f64,
    /// Upward speed in units per frame.
    pub speed: f64,
    /// Radius.
    pub size: f64,
    pub color: BalloonColor,
    pub collected: bool,
    // Surface the balloon was spawned for; needed to respawn it.
    bounds: (f64, f64),
}

impl Balloon {
    pub fn new(width: f64, height: f64, rng: &mut impl Rng) -> Self {
        let mut b = Self {
            x: 0.0,
            y: 0.0,
            speed: 0.0,
            size: 0.0,
            color: BalloonColor::HotPink,
            collected: false,
            bounds: (width, height),
        };
        b.reset(rng);
        b
    }

    /// Re-roll position, speed, size and color and place the balloon just below
    /// the visible bottom edge.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        let (width, height) = self.bounds;
        let span = (width - 2.0 * SPAWN_MARGIN).max(f64::EPSILON);
        self.x = SPAWN_MARGIN + rng.gen_range(0.0..span);
        self.y = height + SPAWN_DROP;
        self.speed = rng.gen_range(SPEED_RANGE);
        self.size = rng.gen_range(SIZE_RANGE);
        self.color = BalloonColor::ALL[rng.gen_range(0..BalloonColor::ALL.len())];
        self.collected = false;
    }

    /// Rise one frame; balloons that left through the top are respawned.
    pub fn update(&mut self, rng: &mut impl Rng) {
        if self.collected {
            return;
        }
        self.y -= self.speed;
        if self.y < -self.size {
            self.reset(rng);
        }
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn assert_fresh(b: &Balloon) {
        assert!(!b.collected);
        assert!(b.x >= SPAWN_MARGIN && b.x < 800.0 - SPAWN_MARGIN, "x={}", b.x);
        assert_eq!(b.y, 600.0 + SPAWN_DROP);
        assert!(SPEED_RANGE.contains(&b.speed));
        assert!(SIZE_RANGE.contains(&b.size));
    }

    #[test]
    fn new_balloon_starts_below_screen() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            assert_fresh(&Balloon::new(800.0, 600.0, &mut rng));
        }
    }

    #[test]
    fn update_moves_up_by_speed() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut b = Balloon::new(800.0, 600.0, &mut rng);
        let (y0, speed) = (b.y, b.speed);
        b.update(&mut rng);
        assert!((b.y - (y0 - speed)).abs() < 1e-9);
    }

    #[test]
    fn collected_balloon_does_not_move() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut b = Balloon::new(800.0, 600.0, &mut rng);
        b.collected = true;
        let y0 = b.y;
        b.update(&mut rng);
        assert_eq!(b.y, y0);
    }

    #[test]
    fn balloon_leaving_top_is_recycled() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut b = Balloon::new(800.0, 600.0, &mut rng);
        b.y = -b.size + 0.5;
        b.speed = 1.0;
        b.update(&mut rng);
        assert_fresh(&b);
    }

    #[test]
    fn reset_clears_collected_flag() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut b = Balloon::new(800.0, 600.0, &mut rng);
        b.collected = true;
        b.reset(&mut rng);
        assert_fresh(&b);
    }
}
