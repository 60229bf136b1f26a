//! Crate error type.

use core::fmt;

/// Errors surfaced by the site runtime.
///
/// Most browser-side failures are silent: a missing navigation target is a
/// no-op and a failed image is left to the browser. This type covers the ones
/// that abort a setup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteError {
    /// The embedded site configuration could not be parsed.
    Config(String),
    /// A required element was not present in the document.
    MissingElement(String),
    /// A required form field was left empty.
    MissingField(&'static str),
    /// WebGL2 setup failed (context, shader compile, program link).
    WebGl(String),
    /// An opaque error thrown by a browser API.
    Js(String),
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid site config: {msg}"),
            Self::MissingElement(id) => write!(f, "element not found: #{id}"),
            Self::MissingField(name) => write!(f, "required field is empty: {name}"),
            Self::WebGl(msg) => write!(f, "webgl: {msg}"),
            Self::Js(msg) => write!(f, "js: {msg}"),
        }
    }
}

impl std::error::Error for SiteError {}

impl From<serde_json::Error> for SiteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<wasm_bindgen::JsValue> for SiteError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<SiteError> for wasm_bindgen::JsValue {
    fn from(err: SiteError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_missing_piece() {
        assert_eq!(
            SiteError::MissingElement("hero-section".into()).to_string(),
            "element not found: #hero-section"
        );
        assert_eq!(
            SiteError::MissingField("email").to_string(),
            "required field is empty: email"
        );
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err: SiteError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, SiteError::Config(_)));
    }
}
