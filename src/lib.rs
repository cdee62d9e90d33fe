//! Balloon Party core crate.
//!
//! A birthday mini-game for the browser: catch rising balloons, enjoy a
//! compliment every few catches, then find the treasure in a small maze. Game
//! logic lives in plain Rust modules that run natively under `cargo test`; the
//! `web` module binds them to a canvas, DOM input and `requestAnimationFrame`.

use wasm_bindgen::prelude::*;

pub mod balloon;
pub mod compliment;
pub mod config;
pub mod driver;
pub mod input;
pub mod maze;
pub mod render;
pub mod session;
mod web;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Message pools
// -----------------------------------------------------------------------------

pub const COMPLIMENTS: &[&str] = &[
    "Zindagi seems rukhi sukhi ...cause you're not my pookie 🥺",
    "You sweet like mithai...izazat ho toh can i hold your kalaiii 🤭",
    "Swiping is no more fun cause you are my dil ki dhadkan 💖",
    "Your smile brightens up even the darkest days! 🌟",
    "You're the most amazing friend anyone could ask for! 🎀",
];

pub const HINTS: &[&str] = &[
    "Koi mil gaya... treasure ka raasta! 😄",
    "Arey waah! Sahi direction mein jaa rahe ho! 🎯",
    "Thoda aur... bas thoda aur! 🌟",
    "Hot and cold khel rahe ho kya? You're getting warmer! 🔥",
];

// -----------------------------------------------------------------------------
// Unified entrypoints
// -----------------------------------------------------------------------------

/// Start the game with the default configuration.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(config::GameConfig::default())
}

/// Start the game with a JSON configuration override. Malformed JSON is logged
/// and the defaults are used instead.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let cfg = match config::GameConfig::from_json(json) {
        Ok(cfg) => cfg,
        Err(e) => {
            web::clog(&format!("config parse error: {e}; using defaults"));
            config::GameConfig::default()
        }
    };
    web::start(cfg)
}
