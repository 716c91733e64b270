//! Spot the Word core crate.
//!
//! An illustration hides one region per word. The player arms a word from the
//! option list and clicks the picture; the click is hit-tested against that
//! word's mask. Everything except `web` is plain Rust and runs natively under
//! `cargo test`; `web` wires the core to the DOM and is what `start_game()`
//! launches from JS.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod coords;
pub mod error;
pub mod game;
pub mod hit;
pub mod lang;
pub mod mask;
pub mod options;
pub mod sample;
pub mod web;

pub use error::GameError;
pub use game::{ClickOutcome, GameController, Renderer, SettingsStore};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) only fails to replace the logger.
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start()
}
