use thiserror::Error;
use wasm_bindgen::JsValue;

/// Setup failures. Once the page is wired nothing here is raised; runtime
/// hiccups (blocked audio, a missing anchor) are logged and skipped.
#[derive(Debug, Error)]
pub enum GreetingError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("missing element `{0}`")]
    MissingElement(String),
    #[error("canvas unavailable: {0}")]
    Canvas(String),
    #[error("js error: {0}")]
    Js(String),
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<JsValue> for GreetingError {
    fn from(value: JsValue) -> Self {
        GreetingError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<GreetingError> for JsValue {
    fn from(err: GreetingError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GreetingError>;
