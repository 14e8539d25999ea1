use size_format::SizeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(#[from] SizeError),

    #[error("network error: {0}")]
    Network(String),

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request timed out after {0} ms")]
    Timeout(u32),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("player error: {0}")]
    Player(String),
}

/// Best-effort text for a thrown JS value.
pub fn js_detail(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    match value.dyn_ref::<js_sys::Error>() {
        Some(err) => String::from(err.message()),
        None => format!("{:?}", value),
    }
}

impl From<AppError> for JsValue {
    fn from(err: AppError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
