use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("javascript error: {0}")]
    Js(String),

    #[error("required element missing: {0}")]
    MissingElement(&'static str),

    #[error("server answered with status {0}")]
    Http(u16),

    #[error("network failure: {0}")]
    Network(String),

    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        SiteError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<gloo_net::Error> for SiteError {
    fn from(err: gloo_net::Error) -> Self {
        SiteError::Network(err.to_string())
    }
}
