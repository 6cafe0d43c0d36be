//! WASM bindings for the DocVerify verification page
//!
//! All verification logic lives in `docverify-core`; this crate only binds
//! it to the browser.
//!
//! ## Architecture
//!
//! - `VerifierApp` owns the flow controller and wires click/Enter events
//! - `DomView` applies rendered view models to the page elements
//! - `FetchTransport` performs the remote lookup when an endpoint is set
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { VerifierApp } from './pkg/docverify_wasm.js';
//!
//! await init();
//!
//! // Demo table, codes upper-cased
//! const app = new VerifierApp();
//! app.mount(); // verifies ?code= automatically if present
//!
//! // Or against a backend
//! const remote = new VerifierApp(JSON.stringify({ endpoint: "https://api.example.com/verify" }));
//! remote.mount();
//! ```

pub mod app;
pub mod dom;
pub mod fetch;

use docverify_core::{normalize_code, render, PresentationState, ViewModel};
use wasm_bindgen::prelude::*;

// Re-export main types for JavaScript
pub use app::VerifierApp;
pub use dom::DomView;
pub use fetch::FetchTransport;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"DocVerify WASM initialized".into());
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Normalize a code the way the verifier does
/// Returns undefined for blank input
#[wasm_bindgen]
pub fn normalize(raw: &str, uppercase: bool) -> Option<String> {
    normalize_code(raw, uppercase).map(|c| c.into_string())
}

/// Static view for a state name, for pages that render without a lookup
/// (e.g. server-side previews)
#[wasm_bindgen]
pub fn preview_view(state: &str) -> Result<JsValue, JsValue> {
    let view = preview_model(state).ok_or_else(|| JsValue::from_str("Unknown state"))?;
    serde_wasm_bindgen::to_value(&view)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn preview_model(state: &str) -> Option<ViewModel> {
    let state = match state {
        "ready" => return Some(ViewModel::ready()),
        "awaiting_input" => PresentationState::AwaitingInput,
        "checking" => PresentationState::Checking,
        "valid" => PresentationState::Valid,
        "revoked" => PresentationState::Revoked,
        "not_found" => PresentationState::NotFound,
        "lookup_error" => PresentationState::LookupError,
        _ => return None,
    };
    Some(render(state, None, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  abc ", true).as_deref(), Some("ABC"));
        assert_eq!(normalize("  abc ", false).as_deref(), Some("abc"));
        assert_eq!(normalize("   ", true), None);
    }

    #[test]
    fn test_preview_model() {
        assert_eq!(preview_model("ready"), Some(ViewModel::ready()));
        assert_eq!(
            preview_model("not_found").map(|v| v.state),
            Some(PresentationState::NotFound)
        );
        assert!(preview_model("bogus").is_none());
    }
}
