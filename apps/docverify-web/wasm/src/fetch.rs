//! `fetch` transport for the remote lookup strategy

use docverify_core::{HttpReply, HttpTransport, LookupError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Issues read-only GET requests through the browser's `fetch`
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    async fn fetch(&self, url: &str) -> Result<HttpReply, JsValue> {
        let window = web_sys::window().ok_or("No window")?;

        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(url, &opts)?;
        request.headers().set("Accept", "application/json")?;

        let response = JsFuture::from(window.fetch_with_request(&request)).await?;
        let response: Response = response.dyn_into()?;

        let status = response.status();
        let body = JsFuture::from(response.text()?)
            .await?
            .as_string()
            .unwrap_or_default();

        Ok(HttpReply { status, body })
    }
}

impl HttpTransport for FetchTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, LookupError> {
        self.fetch(url)
            .await
            .map_err(|e| LookupError::Transport(describe_js_error(&e)))
    }
}

/// Best-effort text for a rejected promise or thrown value
fn describe_js_error(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| "Network request failed".to_string())
}

// WASM-specific tests that run in a browser environment
#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use docverify_core::VerifyResponse;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_fetch_reads_status_and_body() {
        let reply = FetchTransport
            .get("data:application/json,%7B%22valid%22%3Afalse%7D")
            .await
            .unwrap();

        assert!(reply.is_success());
        assert_eq!(reply.body, r#"{"valid":false}"#);
        assert!(!VerifyResponse::parse(&reply.body).unwrap().valid);
    }

    #[wasm_bindgen_test]
    async fn test_unreachable_url_is_transport_error() {
        let result = FetchTransport.get("http://[not a host/verify").await;
        assert!(matches!(result, Err(LookupError::Transport(_))));
    }
}
