//! Browser glue: canvas surface, DOM input wiring, message box and the
//! `requestAnimationFrame` loop. The session itself never sees `web_sys`.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

use crate::config::GameConfig;
use crate::driver::FrameDriver;
use crate::input::{Direction, DragTracker, Input};
use crate::render::Surface;
use crate::session::{ControlScheme, GameEvent, GameSession};

const CANVAS_ID: &str = "gameCanvas";
const MESSAGE_ID: &str = "messageBox";
/// Repeat period of the press-and-hold lane buttons.
const HOLD_REPEAT_MS: i32 = 33;
const MOBILE_AGENTS: &[&str] = &[
    "Android", "webOS", "iPhone", "iPad", "iPod", "BlackBerry", "IEMobile", "Opera Mini",
];

pub(crate) fn clog(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

// --- Canvas surface -------------------------------------------------------------

impl Surface for CanvasRenderingContext2d {
    fn clear(&mut self, w: f64, h: f64) {
        self.clear_rect(0.0, 0.0, w, h);
    }
    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }
    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }
    fn translate(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::translate(self, x, y).ok();
    }
    fn rotate(&mut self, angle: f64) {
        CanvasRenderingContext2d::rotate(self, angle).ok();
    }
    fn scale(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::scale(self, x, y).ok();
    }
    fn set_fill(&mut self, style: &str) {
        self.set_fill_style_str(style);
    }
    fn set_stroke(&mut self, style: &str) {
        self.set_stroke_style_str(style);
    }
    fn set_line_width(&mut self, w: f64) {
        CanvasRenderingContext2d::set_line_width(self, w);
    }
    fn set_global_alpha(&mut self, a: f64) {
        CanvasRenderingContext2d::set_global_alpha(self, a);
    }
    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }
    fn set_text_align(&mut self, align: &str) {
        CanvasRenderingContext2d::set_text_align(self, align);
    }
    fn set_text_baseline(&mut self, baseline: &str) {
        CanvasRenderingContext2d::set_text_baseline(self, baseline);
    }
    fn set_shadow(&mut self, blur: f64, color: &str) {
        self.set_shadow_blur(blur);
        self.set_shadow_color(color);
    }
    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }
    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }
    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        CanvasRenderingContext2d::quadratic_curve_to(self, cpx, cpy, x, y);
    }
    fn arc(&mut self, x: f64, y: f64, r: f64, start: f64, end: f64) {
        CanvasRenderingContext2d::arc(self, x, y, r, start, end).ok();
    }
    fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, start: f64, end: f64) {
        CanvasRenderingContext2d::ellipse(self, x, y, rx, ry, 0.0, start, end).ok();
    }
    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }
    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        CanvasRenderingContext2d::fill_text(self, text, x, y).ok();
    }
    fn fill_rect_gradient(
        &mut self,
        rect: (f64, f64, f64, f64),
        from: (f64, f64),
        to: (f64, f64),
        stops: (&str, &str),
    ) {
        let g = self.create_linear_gradient(from.0, from.1, to.0, to.1);
        g.add_color_stop(0.0, stops.0).ok();
        g.add_color_stop(1.0, stops.1).ok();
        self.set_fill_style_canvas_gradient(&g);
        CanvasRenderingContext2d::fill_rect(self, rect.0, rect.1, rect.2, rect.3);
    }
}

// --- Global state ---------------------------------------------------------------

struct WebGame {
    driver: FrameDriver,
    ctx: CanvasRenderingContext2d,
    drag: DragTracker,
    dpad_installed: bool,
}

thread_local! {
    static GAME: RefCell<Option<WebGame>> = const { RefCell::new(None) };
}

fn with_game(f: impl FnOnce(&mut WebGame)) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            f(game);
        }
    });
}

/// Deliver one input and publish whatever it caused.
fn dispatch(input: Input) {
    with_game(|game| {
        game.driver.input(input);
        flush_events(game);
    });
}

fn flush_events(game: &mut WebGame) {
    let scheme = game.driver.session().scheme();
    for event in game.driver.drain_events() {
        clog(&format!("{event:?}"));
        if let Some(text) = event.message(scheme) {
            show_message(text);
        }
        if matches!(event, GameEvent::MazeEntered { .. })
            && scheme == ControlScheme::Touch
            && !game.dpad_installed
        {
            match install_dpad() {
                Ok(()) => game.dpad_installed = true,
                Err(e) => clog(&format!("d-pad setup failed: {e:?}")),
            }
        }
    }
}

fn show_message(html: &str) {
    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(MESSAGE_ID))
    {
        el.set_inner_html(html);
    }
}

// --- Entry --------------------------------------------------------------------

pub(crate) fn start(cfg: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        doc.body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&c)?;
        c
    };
    canvas.set_width(cfg.width as u32);
    canvas.set_height(cfg.height as u32);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let agent = win.navigator().user_agent().unwrap_or_default();
    let scheme = if MOBILE_AGENTS.iter().any(|m| agent.contains(m)) {
        ControlScheme::Touch
    } else {
        ControlScheme::Keyboard
    };

    let mut rng = SmallRng::from_entropy();
    let session = GameSession::new(cfg, scheme, &mut rng);
    let mut game = WebGame {
        driver: FrameDriver::new(session, rng),
        ctx,
        drag: DragTracker::default(),
        dpad_installed: false,
    };
    flush_events(&mut game);
    GAME.with(|cell| *cell.borrow_mut() = Some(game));

    install_keyboard(&doc)?;
    install_drag(&canvas)?;
    if scheme == ControlScheme::Touch {
        install_touch_buttons(&doc)?;
    }

    start_loop();
    clog("balloon party started");
    Ok(())
}

// --- Input wiring ---------------------------------------------------------------

fn install_keyboard(doc: &Document) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        if let Some(input) = Input::from_key_code(&evt.code()) {
            evt.prevent_default();
            dispatch(input);
        }
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn install_drag(canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    let first_touch = |evt: &web_sys::TouchEvent| {
        evt.touches()
            .get(0)
            .map(|t| (t.client_x() as f64, t.client_y() as f64))
    };

    let start = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
        evt.prevent_default();
        if let Some((x, y)) = first_touch(&evt) {
            with_game(|game| game.drag.begin(x, y));
        }
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("touchstart", start.as_ref().unchecked_ref())?;
    start.forget();

    let moved = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
        let Some((x, y)) = first_touch(&evt) else {
            return;
        };
        evt.prevent_default();
        with_game(|game| {
            if let Some(dir) = game.drag.moved(x, y) {
                game.driver.drag(dir);
                flush_events(game);
            }
        });
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("touchmove", moved.as_ref().unchecked_ref())?;
    moved.forget();

    let end = Closure::wrap(Box::new(move |_evt: web_sys::TouchEvent| {
        with_game(|game| game.drag.end());
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("touchend", end.as_ref().unchecked_ref())?;
    end.forget();
    Ok(())
}

fn install_touch_buttons(doc: &Document) -> Result<(), JsValue> {
    if let Some(btn) = doc.get_element_by_id("startButton") {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            dispatch(Input::Action);
        }) as Box<dyn FnMut(_)>);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    for (id, dir) in [("leftButton", Direction::Left), ("rightButton", Direction::Right)] {
        if let Some(btn) = doc.get_element_by_id(id) {
            install_hold_button(&btn, dir)?;
        }
    }
    Ok(())
}

/// Press-and-hold: repeat the lane step every `HOLD_REPEAT_MS` until release.
fn install_hold_button(btn: &web_sys::Element, dir: Direction) -> Result<(), JsValue> {
    let handle: Rc<RefCell<Option<i32>>> = Rc::new(RefCell::new(None));
    let repeat: Rc<Closure<dyn FnMut()>> =
        Rc::new(Closure::wrap(Box::new(move || dispatch(Input::Move(dir))) as Box<dyn FnMut()>));

    let press_handle = handle.clone();
    let press = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
        evt.prevent_default();
        let Some(win) = window() else {
            return;
        };
        if let Some(old) = press_handle.borrow_mut().take() {
            win.clear_interval_with_handle(old);
        }
        match win.set_interval_with_callback_and_timeout_and_arguments_0(
            (*repeat).as_ref().unchecked_ref(),
            HOLD_REPEAT_MS,
        ) {
            Ok(id) => *press_handle.borrow_mut() = Some(id),
            Err(e) => clog(&format!("hold repeat failed: {e:?}")),
        }
    }) as Box<dyn FnMut(_)>);
    btn.add_event_listener_with_callback("touchstart", press.as_ref().unchecked_ref())?;
    press.forget();

    let release = Closure::wrap(Box::new(move |_evt: web_sys::TouchEvent| {
        if let (Some(win), Some(id)) = (window(), handle.borrow_mut().take()) {
            win.clear_interval_with_handle(id);
        }
    }) as Box<dyn FnMut(_)>);
    btn.add_event_listener_with_callback("touchend", release.as_ref().unchecked_ref())?;
    release.forget();
    Ok(())
}

/// Replace the lane buttons with a four-way pad for the maze.
fn install_dpad() -> Result<(), JsValue> {
    let doc = window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let Some(container) = doc.query_selector(".mobile-controls")? else {
        return Ok(());
    };
    container.set_inner_html("");

    let pad = doc.create_element("div")?;
    pad.set_attribute(
        "style",
        "display:grid; grid-template-columns:repeat(3, 60px); gap:5px; \
         justify-content:center; margin-top:20px;",
    )?;
    // 3x3 grid; only the four edge-centre cells are buttons.
    let buttons = [
        (1, "upButton", "↑", Direction::Up),
        (3, "leftButton", "←", Direction::Left),
        (5, "rightButton", "→", Direction::Right),
        (7, "downButton", "↓", Direction::Down),
    ];
    for i in 0..9 {
        let cell = doc.create_element("div")?;
        cell.set_attribute("style", "width:60px; height:60px;")?;
        if let Some(&(_, id, label, dir)) = buttons.iter().find(|b| b.0 == i) {
            cell.set_class_name("control-button");
            cell.set_id(id);
            cell.set_text_content(Some(label));
            let closure = Closure::wrap(Box::new(move |evt: web_sys::TouchEvent| {
                evt.prevent_default();
                dispatch(Input::Move(dir));
            }) as Box<dyn FnMut(_)>);
            cell.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        pad.append_child(&cell)?;
    }
    container.append_child(&pad)?;
    Ok(())
}

// --- Animation loop -------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_game(|game| {
            game.driver.frame(&mut game.ctx, ts);
            flush_events(game);
        });
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
