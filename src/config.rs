//! Tunables for the greeting page.
//!
//! Every field has a default matching the shipped page; with the `serde`
//! feature a partial JSON object can override any subset of them.

#[cfg(feature = "serde")]
use serde::Deserialize;

pub const DEFAULT_MESSAGE: &str =
    "Happy Birthday! ✨\nMay your day be full of sparkle, laughter, and sweet surprises.";

/// Sequencer timings and burst sizes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct FlowTimings {
    pub countdown_from: u8,
    pub tick_ms: u32,
    /// Blow-out to envelope reveal.
    pub envelope_delay_ms: u32,
    /// Envelope open to card reveal.
    pub card_delay_ms: u32,
    pub cake_glitter: usize,
    pub envelope_glitter: usize,
}

impl Default for FlowTimings {
    fn default() -> Self {
        Self {
            countdown_from: 5,
            tick_ms: 1000,
            envelope_delay_ms: 750,
            card_delay_ms: 620,
            cake_glitter: 140,
            envelope_glitter: 95,
        }
    }
}

/// DOM ids (and selectors) the page must provide.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct ElementIds {
    pub start_overlay: String,
    pub start_button: String,
    pub stage: String,
    pub countdown: String,
    pub candles: String,
    pub envelope: String,
    pub card: String,
    pub replay: String,
    pub sound: String,
    pub confetti_canvas: String,
    pub to: String,
    pub from: String,
    pub message: String,
    /// CSS selector for the cake wrapper used as the blow-out glitter anchor.
    pub cake_selector: String,
    /// CSS selector for candles inside `candles`.
    pub candle_selector: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            start_overlay: "start".into(),
            start_button: "startBtn".into(),
            stage: "stage".into(),
            countdown: "countdown".into(),
            candles: "candles".into(),
            envelope: "envelope".into(),
            card: "card".into(),
            replay: "replay".into(),
            sound: "pop".into(),
            confetti_canvas: "confetti".into(),
            to: "to".into(),
            from: "from".into(),
            message: "msg".into(),
            cake_selector: ".cake-wrap".into(),
            candle_selector: ".candle".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct GreetingConfig {
    pub timings: FlowTimings,
    pub ids: ElementIds,
    pub default_message: String,
}

impl Default for GreetingConfig {
    fn default() -> Self {
        Self {
            timings: FlowTimings::default(),
            ids: ElementIds::default(),
            default_message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

#[cfg(feature = "serde_json")]
impl GreetingConfig {
    pub fn from_json(json: &str) -> Result<Self, crate::error::GreetingError> {
        serde_json::from_str(json).map_err(|e| crate::error::GreetingError::Config(e.to_string()))
    }
}
