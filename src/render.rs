//! Drawing.
//!
//! Everything is painted through the [`Surface`] trait, a thin slice of the
//! Canvas 2D API. The browser canvas implements it in `web`; tests and headless
//! runs use [`RecordingSurface`]. Draw routines only read game state: all
//! progression happens in `GameSession::update` before drawing.

use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::balloon::Balloon;
use crate::compliment::ComplimentOverlay;
use crate::maze::{Cell, Collectible, MazeSession, Obstacle, ObstacleKind, TreatKind};
use crate::session::{GameSession, GameState};

/// The subset of Canvas 2D the game draws with.
pub trait Surface {
    fn clear(&mut self, w: f64, h: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);
    fn scale(&mut self, x: f64, y: f64);

    fn set_fill(&mut self, style: &str);
    fn set_stroke(&mut self, style: &str);
    fn set_line_width(&mut self, w: f64);
    fn set_global_alpha(&mut self, a: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
    fn set_text_baseline(&mut self, baseline: &str);
    fn set_shadow(&mut self, blur: f64, color: &str);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64);
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, start: f64, end: f64);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Fill a rectangle with a two-stop linear gradient from (x0, y0) to (x1, y1).
    fn fill_rect_gradient(
        &mut self,
        rect: (f64, f64, f64, f64),
        from: (f64, f64),
        to: (f64, f64),
        stops: (&str, &str),
    );
}

/// Headless surface that remembers the text it was asked to draw and counts
/// every other call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub texts: Vec<String>,
    pub calls: usize,
    pub clears: usize,
}

impl Surface for RecordingSurface {
    fn clear(&mut self, _w: f64, _h: f64) {
        self.clears += 1;
        self.calls += 1;
    }
    fn save(&mut self) {
        self.calls += 1;
    }
    fn restore(&mut self) {
        self.calls += 1;
    }
    fn translate(&mut self, _x: f64, _y: f64) {
        self.calls += 1;
    }
    fn rotate(&mut self, _angle: f64) {
        self.calls += 1;
    }
    fn scale(&mut self, _x: f64, _y: f64) {
        self.calls += 1;
    }
    fn set_fill(&mut self, _style: &str) {
        self.calls += 1;
    }
    fn set_stroke(&mut self, _style: &str) {
        self.calls += 1;
    }
    fn set_line_width(&mut self, _w: f64) {
        self.calls += 1;
    }
    fn set_global_alpha(&mut self, _a: f64) {
        self.calls += 1;
    }
    fn set_font(&mut self, _font: &str) {
        self.calls += 1;
    }
    fn set_text_align(&mut self, _align: &str) {
        self.calls += 1;
    }
    fn set_text_baseline(&mut self, _baseline: &str) {
        self.calls += 1;
    }
    fn set_shadow(&mut self, _blur: f64, _color: &str) {
        self.calls += 1;
    }
    fn begin_path(&mut self) {
        self.calls += 1;
    }
    fn move_to(&mut self, _x: f64, _y: f64) {
        self.calls += 1;
    }
    fn line_to(&mut self, _x: f64, _y: f64) {
        self.calls += 1;
    }
    fn quadratic_curve_to(&mut self, _cpx: f64, _cpy: f64, _x: f64, _y: f64) {
        self.calls += 1;
    }
    fn arc(&mut self, _x: f64, _y: f64, _r: f64, _s: f64, _e: f64) {
        self.calls += 1;
    }
    fn ellipse(&mut self, _x: f64, _y: f64, _rx: f64, _ry: f64, _s: f64, _e: f64) {
        self.calls += 1;
    }
    fn fill(&mut self) {
        self.calls += 1;
    }
    fn stroke(&mut self) {
        self.calls += 1;
    }
    fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {
        self.calls += 1;
    }
    fn fill_text(&mut self, text: &str, _x: f64, _y: f64) {
        self.calls += 1;
        self.texts.push(text.to_string());
    }
    fn fill_rect_gradient(
        &mut self,
        _rect: (f64, f64, f64, f64),
        _from: (f64, f64),
        _to: (f64, f64),
        _stops: (&str, &str),
    ) {
        self.calls += 1;
    }
}

// --- Frame --------------------------------------------------------------------

/// Paint one full frame for the current state. `now_ms` drives the purely
/// cosmetic celebration animation; `rng` drives background sparkles.
pub fn draw_frame(session: &GameSession, s: &mut dyn Surface, rng: &mut impl Rng, now_ms: f64) {
    let cfg = session.config();
    let (w, h) = (cfg.width, cfg.height);
    s.clear(w, h);
    draw_background(s, w, h, rng);

    match session.state() {
        GameState::Intro => draw_character(s, session.player_x, session.player_y),
        GameState::Playing | GameState::Compliment => {
            for b in session.balloons.iter().filter(|b| !b.collected) {
                draw_balloon(s, b);
            }
            draw_character(s, session.player_x, session.player_y);
            s.set_fill("white");
            s.set_font("bold 24px Arial");
            s.set_text_align("left");
            let hud = format!(
                "Balloons: {}/{}",
                session.balloons_collected(),
                session.target_balloons()
            );
            s.fill_text(&hud, 20.0, 40.0);
            if let Some(overlay) = session.compliment() {
                draw_compliment(s, overlay, w, h);
            }
        }
        GameState::Maze => {
            if let Some(maze) = session.maze() {
                draw_maze(s, maze, w, h, rng);
            }
        }
        GameState::GameOver => {
            if session.game_won() {
                draw_celebration(s, w, h, now_ms / 1000.0);
            }
        }
    }
}

fn draw_background(s: &mut dyn Surface, w: f64, h: f64, rng: &mut impl Rng) {
    s.fill_rect_gradient((0.0, 0.0, w, h), (0.0, 0.0), (w, h), ("#ff69b4", "#9370db"));
    for _ in 0..50 {
        let x = rng.gen_range(0.0..w);
        let y = rng.gen_range(0.0..h);
        let size = rng.gen_range(0.0..2.0);
        let a = rng.gen_range(0.0..0.5);
        s.set_fill(&format!("rgba(255, 255, 255, {a})"));
        s.begin_path();
        s.arc(x, y, size, 0.0, TAU);
        s.fill();
    }
}

fn draw_balloon(s: &mut dyn Surface, b: &Balloon) {
    s.begin_path();
    s.arc(b.x, b.y, b.size, 0.0, TAU);
    s.set_fill(b.color.css());
    s.fill();
    s.set_stroke("white");
    s.set_line_width(2.0);
    s.stroke();
    // string
    s.begin_path();
    s.move_to(b.x, b.y + b.size);
    s.line_to(b.x, b.y + b.size + 20.0);
    s.stroke();
}

/// The birthday character used on the intro screen and in the balloon phase.
fn draw_character(s: &mut dyn Surface, x: f64, y: f64) {
    s.save();
    s.begin_path();
    s.arc(x, y, 40.0, 0.0, TAU);
    s.set_fill("#FF69B4");
    s.fill();

    s.set_fill("white");
    s.begin_path();
    s.arc(x - 15.0, y - 10.0, 8.0, 0.0, TAU);
    s.arc(x + 15.0, y - 10.0, 8.0, 0.0, TAU);
    s.fill();

    s.begin_path();
    s.arc(x, y + 10.0, 20.0, 0.0, PI);
    s.set_stroke("white");
    s.set_line_width(3.0);
    s.stroke();

    // hat
    s.begin_path();
    s.move_to(x - 20.0, y - 40.0);
    s.line_to(x + 20.0, y - 40.0);
    s.line_to(x, y - 70.0);
    s.set_fill("#FFD700");
    s.fill();
    s.restore();
}

fn draw_compliment(s: &mut dyn Surface, overlay: &ComplimentOverlay, w: f64, h: f64) {
    let alpha = overlay.alpha();
    let t = overlay.frame() as f64;
    s.set_fill(&format!("rgba(0, 0, 0, {})", alpha * 0.3));
    s.fill_rect(0.0, 0.0, w, h);

    let (cx, cy) = (w / 2.0, h / 2.0);
    s.save();
    s.set_shadow(15.0, "rgba(255, 182, 193, 0.8)");
    s.set_fill(&format!("rgba(255, 255, 255, {alpha})"));
    s.set_font("bold 28px Arial");
    s.set_text_align("center");
    s.set_text_baseline("middle");
    s.fill_text(overlay.text, cx, cy);
    s.restore();

    for i in 0..5 {
        let i = i as f64;
        let angle = t * 0.05 + i * PI * 0.4;
        let scale = 0.5 + (t * 0.1 + i).sin() * 0.2;
        s.save();
        s.translate(cx + angle.cos() * 150.0, cy + angle.sin() * 80.0);
        s.scale(scale, scale);
        s.set_fill(&format!("rgba(255, 105, 180, {})", alpha * 0.8));
        draw_heart(s, 0.0, 0.0, 15.0);
        s.restore();
    }
}

fn draw_heart(s: &mut dyn Surface, x: f64, y: f64, size: f64) {
    s.begin_path();
    s.move_to(x, y + size / 4.0);
    s.quadratic_curve_to(x, y, x + size / 4.0, y);
    s.quadratic_curve_to(x + size / 2.0, y, x + size / 2.0, y + size / 4.0);
    s.quadratic_curve_to(x + size / 2.0, y, x + size * 3.0 / 4.0, y);
    s.quadratic_curve_to(x + size, y, x + size, y + size / 4.0);
    s.quadratic_curve_to(x + size, y + size / 2.0, x + size / 2.0, y + size);
    s.quadratic_curve_to(x, y + size / 2.0, x, y + size / 4.0);
    s.fill();
}

// --- Maze ---------------------------------------------------------------------

fn draw_maze(s: &mut dyn Surface, maze: &MazeSession, w: f64, h: f64, rng: &mut impl Rng) {
    let cs = maze.cell_size;
    let grid = maze.grid();
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            if grid.get(x, y) != Some(Cell::Wall) {
                continue;
            }
            let (px, py) = (x as f64 * cs, y as f64 * cs);
            s.set_fill("#8B4513");
            s.fill_rect(px, py, cs, cs);
            // texture
            s.set_stroke("#A0522D");
            s.set_line_width(2.0);
            s.begin_path();
            s.move_to(px, py);
            s.line_to(px + cs, py + cs);
            s.stroke();
        }
    }

    for item in maze.collectibles.iter().filter(|c| !c.collected) {
        draw_collectible(s, item, cs, maze.dance, rng);
    }
    for o in &maze.obstacles {
        draw_obstacle(s, o, cs);
    }
    draw_walker(s, maze);

    if !maze.hint().is_empty() {
        s.save();
        s.set_fill("rgba(0, 0, 0, 0.7)");
        s.fill_rect(0.0, h - 60.0, w, 60.0);
        s.set_font("20px Arial");
        s.set_fill("white");
        s.set_text_align("center");
        s.fill_text(maze.hint(), w / 2.0, h - 30.0);
        s.restore();
    }
}

fn draw_collectible(
    s: &mut dyn Surface,
    item: &Collectible,
    cs: f64,
    phase: f64,
    rng: &mut impl Rng,
) {
    s.save();
    s.translate(item.x as f64 * cs + cs / 2.0, item.y as f64 * cs + cs / 2.0);
    match item.kind {
        TreatKind::Ladoo => {
            s.begin_path();
            s.arc(0.0, 0.0, 10.0, 0.0, TAU);
            s.set_fill("#FFD700");
            s.fill();
            s.set_stroke("#FFA500");
            s.stroke();
        }
        TreatKind::GulabJamun => {
            s.begin_path();
            s.arc(0.0, 0.0, 8.0, 0.0, TAU);
            s.set_fill("#8B4513");
            s.fill();
            // syrup drip
            s.begin_path();
            s.move_to(-5.0, 8.0);
            s.quadratic_curve_to(0.0, 15.0 + (phase * 0.33).sin() * 3.0, 5.0, 8.0);
            s.set_stroke("rgba(139, 69, 19, 0.5)");
            s.stroke();
        }
        TreatKind::Barfi => {
            s.rotate(PI / 4.0);
            s.set_fill("#FFFFFF");
            s.fill_rect(-8.0, -8.0, 16.0, 16.0);
            if rng.gen_bool(0.3) {
                s.set_fill("rgba(255, 255, 255, 0.8)");
                s.begin_path();
                s.arc(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0), 1.0, 0.0, TAU);
                s.fill();
            }
        }
    }
    s.restore();
}

fn draw_obstacle(s: &mut dyn Surface, o: &Obstacle, cs: f64) {
    let (cx, cy) = (o.x as f64 * cs + cs / 2.0, o.y as f64 * cs + cs / 2.0);
    s.save();
    match o.kind {
        ObstacleKind::DancingDholak { frame } => {
            s.translate(cx, cy + frame.sin() * 5.0);
            s.rotate((frame * 0.5).sin() * 0.2);
            s.set_fill("#8B4513");
            s.fill_rect(-15.0, -20.0, 30.0, 40.0);
            s.set_fill("#D2691E");
            s.begin_path();
            s.ellipse(0.0, -20.0, 15.0, 5.0, 0.0, TAU);
            s.fill();
            s.begin_path();
            s.ellipse(0.0, 20.0, 15.0, 5.0, 0.0, TAU);
            s.fill();
        }
        ObstacleKind::SpinningSamosa { rotation } => {
            s.translate(cx, cy);
            s.rotate(rotation);
            s.set_fill("#FFD700");
            for i in 0..3 {
                let i = i as f64;
                s.rotate(rotation - i * 0.2);
                s.set_global_alpha(1.0 - i * 0.2);
                s.begin_path();
                s.move_to(-15.0, 10.0);
                s.line_to(15.0, 10.0);
                s.line_to(0.0, -20.0);
                s.fill();
            }
        }
        ObstacleKind::JumpingJalebi { height, .. } => {
            s.translate(cx, cy + height);
            let squish = 1.0 - height.abs() / 20.0;
            s.scale(1.0 / squish, squish);
            s.begin_path();
            s.arc(0.0, 0.0, 15.0, 0.0, TAU);
            s.set_stroke("#FFA500");
            s.set_line_width(5.0);
            s.stroke();
        }
        ObstacleKind::BouncingBalloon { scale, .. } => {
            s.translate(cx, cy);
            s.scale(scale, scale);
            s.begin_path();
            s.arc(0.0, 0.0, 15.0, 0.0, TAU);
            s.set_fill("#FF69B4");
            s.fill();
            s.set_fill("black");
            s.begin_path();
            s.arc(-5.0, -5.0, 2.0, 0.0, TAU);
            s.arc(5.0, -5.0, 2.0, 0.0, TAU);
            s.fill();
            s.begin_path();
            s.arc(0.0, 2.0, 5.0, 0.0, PI);
            s.stroke();
        }
    }
    s.restore();
}

fn draw_walker(s: &mut dyn Surface, maze: &MazeSession) {
    let cs = maze.cell_size;
    let (x, y) = maze.player;
    s.save();
    s.translate(x as f64 * cs + cs / 2.0, y as f64 * cs + cs / 2.0);
    s.rotate(maze.facing);
    s.translate(0.0, maze.dance.sin() * 3.0);

    s.set_fill("#FF69B4");
    s.begin_path();
    s.arc(0.0, 0.0, 15.0, 0.0, TAU);
    s.fill();

    // party hat
    s.begin_path();
    s.move_to(-10.0, -5.0);
    s.line_to(0.0, -25.0);
    s.line_to(10.0, -5.0);
    s.set_fill("#FFD700");
    s.fill();

    s.set_fill("white");
    s.begin_path();
    s.arc(-5.0, -5.0, 3.0, 0.0, TAU);
    s.arc(5.0, -5.0, 3.0, 0.0, TAU);
    s.fill();

    s.begin_path();
    s.arc(0.0, 5.0, 5.0, 0.0, PI);
    s.set_stroke("white");
    s.stroke();
    s.restore();
}

// --- Victory ------------------------------------------------------------------

fn draw_celebration(s: &mut dyn Surface, w: f64, h: f64, time: f64) {
    // confetti
    for i in 0..50 {
        let i = i as f64;
        let x = ((time * 2.0 + i).sin() * 0.5 + 0.5) * w;
        let y = (time * 100.0 + i * 50.0) % h;
        let size = 5.0 + (time + i).sin() * 2.0;
        let hue = (time * 50.0 + i * 20.0) % 360.0;
        s.save();
        s.translate(x, y);
        s.rotate(time * 2.0 + i);
        s.set_fill(&format!("hsla({hue}, 100%, 60%, 0.8)"));
        s.fill_rect(-size / 2.0, -size / 2.0, size, size);
        s.restore();
    }

    // sparkles
    for i in 0..20 {
        let i = i as f64;
        let angle = time * 2.0 + i * PI * 0.1;
        let radius = 100.0 + (time * 3.0 + i).sin() * 50.0;
        s.begin_path();
        s.arc(w / 2.0 + angle.cos() * radius, h / 2.0 + angle.sin() * radius, 2.0, 0.0, TAU);
        s.set_fill(&format!("rgba(255, 215, 0, {})", 0.7 + (time * 5.0 + i).sin() * 0.3));
        s.fill();
    }

    let pulse = 1.0 + (time * 3.0).sin() * 0.1;
    s.save();
    s.translate(w / 2.0, h / 2.0);
    s.scale(pulse, pulse);
    s.set_shadow(20.0, "rgba(255, 105, 180, 0.8)");
    s.set_font("bold 48px Arial");
    s.set_text_align("center");
    s.set_fill("#FF69B4");
    s.fill_text("Happiest Birthday Madam Ji!", 0.0, 0.0);
    s.set_font("24px Arial");
    s.set_fill("#FFF");
    s.fill_text("🎉 You found the birthday treasure! 🎂", 0.0, 50.0);
    s.restore();

    for i in 0..8 {
        let i = i as f64;
        let angle = time * 2.0 + i * PI * 0.25;
        s.save();
        s.translate(w / 2.0 + angle.cos() * 200.0, h / 2.0 + angle.sin() * 150.0);
        s.rotate(angle);
        s.set_fill(&format!("rgba(255, 105, 180, {})", 0.7 + (time * 3.0 + i).sin() * 0.3));
        draw_heart(s, 0.0, 0.0, 20.0);
        s.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::input::{Direction, Input};
    use crate::session::ControlScheme;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn session() -> (GameSession, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(11);
        let s = GameSession::new(GameConfig::default(), ControlScheme::Keyboard, &mut rng);
        (s, rng)
    }

    #[test]
    fn intro_draws_no_text() {
        let (s, mut rng) = session();
        let mut surf = RecordingSurface::default();
        draw_frame(&s, &mut surf, &mut rng, 0.0);
        assert_eq!(surf.clears, 1);
        assert!(surf.texts.is_empty());
    }

    #[test]
    fn playing_draws_hud() {
        let (mut s, mut rng) = session();
        s.handle_input(Input::Action, &mut rng);
        let mut surf = RecordingSurface::default();
        draw_frame(&s, &mut surf, &mut rng, 0.0);
        assert_eq!(surf.texts, vec!["Balloons: 0/15".to_string()]);
    }

    #[test]
    fn compliment_text_is_drawn() {
        let (mut s, mut rng) = session();
        s.handle_input(Input::Action, &mut rng);
        for _ in 0..4 {
            s.register_catch(0, &mut rng);
        }
        let mut surf = RecordingSurface::default();
        draw_frame(&s, &mut surf, &mut rng, 0.0);
        let text = s.compliment().unwrap().text;
        assert!(surf.texts.iter().any(|t| t == text));
    }

    #[test]
    fn maze_draws_hint_and_win_screen() {
        let (mut s, mut rng) = session();
        s.handle_input(Input::Action, &mut rng);
        for _ in 0..15 {
            s.register_catch(0, &mut rng);
        }
        s.update(&mut rng);
        let mut surf = RecordingSurface::default();
        draw_frame(&s, &mut surf, &mut rng, 0.0);
        let hint = s.maze().unwrap().hint().to_string();
        assert_eq!(surf.texts, vec![hint]);

        for _ in 0..12 {
            s.handle_input(Input::Move(Direction::Right), &mut rng);
        }
        for _ in 0..12 {
            s.handle_input(Input::Move(Direction::Down), &mut rng);
        }
        let mut surf = RecordingSurface::default();
        draw_frame(&s, &mut surf, &mut rng, 1234.0);
        assert!(surf.texts.iter().any(|t| t == "Happiest Birthday Madam Ji!"));
    }

    #[test]
    fn drawing_does_not_advance_state() {
        let (mut s, mut rng) = session();
        s.handle_input(Input::Action, &mut rng);
        let ys: Vec<f64> = s.balloons.iter().map(|b| b.y).collect();
        let mut surf = RecordingSurface::default();
        for _ in 0..3 {
            draw_frame(&s, &mut surf, &mut rng, 0.0);
        }
        let after: Vec<f64> = s.balloons.iter().map(|b| b.y).collect();
        assert_eq!(ys, after);
    }
}
