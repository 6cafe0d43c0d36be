//! Page controller: wires DOM events to the verification flow

use std::rc::Rc;

use docverify_core::{
    code_from_query, ConfigError, ConfiguredResolver, FlowOutcome, VerificationFlow,
    VerifierConfig, ViewSink,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::KeyboardEvent;

use crate::dom::DomView;
use crate::fetch::FetchTransport;

type Flow = VerificationFlow<ConfiguredResolver<FetchTransport>>;

/// Parse the optional JSON configuration handed over from the page
///
/// `None` or blank input selects the built-in demo configuration.
pub fn parse_config(json: Option<&str>) -> Result<VerifierConfig, ConfigError> {
    match json {
        Some(json) if !json.trim().is_empty() => VerifierConfig::from_json(json),
        _ => Ok(VerifierConfig::default()),
    }
}

/// Short name of a flow outcome for JavaScript callers
pub fn outcome_label(outcome: &FlowOutcome) -> String {
    match outcome {
        FlowOutcome::Absent => "awaiting_input".to_string(),
        FlowOutcome::Superseded => "superseded".to_string(),
        FlowOutcome::Completed(state) => serde_json::to_value(state)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
    }
}

/// The verification page
#[wasm_bindgen]
pub struct VerifierApp {
    flow: Rc<Flow>,
    view: Rc<DomView>,
}

#[wasm_bindgen]
impl VerifierApp {
    /// Create the app from an optional JSON configuration
    ///
    /// Accepted keys: `endpoint`, `uppercase`, `table`.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<VerifierApp, JsValue> {
        let config =
            parse_config(config_json.as_deref()).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let view = DomView::bind()?;

        if config.is_remote() {
            web_sys::console::log_1(&"DocVerify using remote endpoint".into());
        }

        let flow = VerificationFlow::from_config(&config, FetchTransport)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            flow: Rc::new(flow),
            view: Rc::new(view),
        })
    }

    /// Bind events and run the initial verification
    ///
    /// A `?code=` parameter in the page URL is verified right away;
    /// otherwise the ready screen is shown.
    #[wasm_bindgen]
    pub fn mount(&self) -> Result<(), JsValue> {
        self.view.set_year();
        self.bind_button()?;
        self.bind_enter_key()?;

        let url_code = code_from_query(&self.view.location_search());
        if url_code.is_empty() {
            self.flow.show_ready(self.view.as_ref());
            return Ok(());
        }

        if let Some(code) = self.flow.normalize(&url_code) {
            self.view.set_input_value(code.as_str());
        }
        spawn_submit(self.flow.clone(), self.view.clone(), url_code);
        Ok(())
    }

    /// Verify a code programmatically
    ///
    /// Resolves to the final state name (`valid`, `revoked`, `not_found`,
    /// `lookup_error`, `awaiting_input`) or `superseded`.
    #[wasm_bindgen]
    pub fn verify(&self, raw: String) -> js_sys::Promise {
        let flow = self.flow.clone();
        let view = self.view.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let outcome = flow.submit(&raw, view.as_ref()).await;
            Ok(JsValue::from_str(&outcome_label(&outcome)))
        })
    }

    /// Current presentation state name
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        outcome_label(&FlowOutcome::Completed(self.flow.state()))
    }

    /// Clear the input and return to the ready screen
    ///
    /// A lookup still running is discarded when it answers.
    #[wasm_bindgen]
    pub fn reset(&self) {
        self.view.set_input_value("");
        self.view.sync_code(None);
        self.flow.show_ready(self.view.as_ref());
    }
}

impl VerifierApp {
    fn bind_button(&self) -> Result<(), JsValue> {
        let Some(button) = self.view.validate_button() else {
            return Ok(());
        };

        let flow = self.flow.clone();
        let view = self.view.clone();
        let on_click = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            let raw = view.input_value();
            spawn_submit(flow.clone(), view.clone(), raw);
        });

        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
        Ok(())
    }

    fn bind_enter_key(&self) -> Result<(), JsValue> {
        let Some(input) = self.view.code_input() else {
            return Ok(());
        };

        let flow = self.flow.clone();
        let view = self.view.clone();
        let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if event.key() == "Enter" {
                let raw = view.input_value();
                spawn_submit(flow.clone(), view.clone(), raw);
            }
        });

        input.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
        on_key.forget();
        Ok(())
    }
}

fn spawn_submit(flow: Rc<Flow>, view: Rc<DomView>, raw: String) {
    spawn_local(async move {
        flow.submit(&raw, view.as_ref()).await;
    });
}
