//! Birthday Wish core crate.
//!
//! A single-page greeting: tap start, watch a five second countdown, the
//! candles blow out in a glitter burst, an envelope appears and opens with
//! confetti to reveal a personalized card.
//!
//! The state machine (`flow`), the particle factories (`effects`) and the
//! query-string binder (`greeting`) are plain Rust and run under `cargo test`.
//! Only `web` touches the browser.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod effects;
pub mod error;
pub mod flow;
pub mod greeting;
pub mod logging;
pub mod rng;
mod web;

pub use config::{DEFAULT_MESSAGE, ElementIds, FlowTimings, GreetingConfig};
pub use error::GreetingError;
pub use flow::{Effect, FlowSequencer, Phase, StageFlags};
pub use greeting::Greeting;
pub use web::{HostStatus, status};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    logging::init(level);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_greeting() -> Result<(), JsValue> {
    mount(GreetingConfig::default()).map_err(JsValue::from)
}

/// Same as `start_greeting` with a JSON object overriding timings, ids or the
/// default message. Missing keys keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_greeting_with_config(json: &str) -> Result<(), JsValue> {
    let config = GreetingConfig::from_json(json)?;
    mount(config).map_err(JsValue::from)
}

/// Rust-side mount for hosts that build their own `GreetingConfig`.
/// A second call while mounted is a no-op.
pub fn mount(config: GreetingConfig) -> Result<(), GreetingError> {
    web::mount(config)
}

#[wasm_bindgen]
pub fn replay_greeting() {
    web::replay();
}

#[wasm_bindgen]
pub fn dispose_greeting() {
    web::dispose();
}
