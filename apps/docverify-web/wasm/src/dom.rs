//! DOM surface for the verification page
//!
//! Binds the page elements by id once and applies [`ViewModel`]s to them.
//! Elements missing from the page are skipped, so trimmed-down layouts
//! keep working.

use docverify_core::{Code, StateTag, ViewModel, ViewSink, CODE_PARAM};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Url, Window};

/// Element ids the page is expected to provide
pub mod ids {
    pub const STATUS_BADGE: &str = "statusBadge";
    pub const STATUS_TITLE: &str = "statusTitle";
    pub const STATUS_SUBTITLE: &str = "statusSubtitle";
    pub const CODE_INPUT: &str = "codeInput";
    pub const VALIDATE_BTN: &str = "validateBtn";
    pub const RESULT_BOX: &str = "resultBox";
    pub const RESULT_ICON: &str = "resultIcon";
    pub const RESULT_TOP: &str = "resultTop";
    pub const RESULT_BOTTOM: &str = "resultBottom";
    pub const META_CODE: &str = "metaCode";
    pub const META_DOC: &str = "metaDoc";
    pub const META_ISSUER: &str = "metaIssuer";
    pub const META_DATE: &str = "metaDate";
    pub const YEAR: &str = "year";
}

/// Class toggled on the result box while a lookup is running
pub const PULSE_CLASS: &str = "pulse";

pub struct DomView {
    window: Window,
    body: Option<HtmlElement>,
    status_badge: Option<Element>,
    status_title: Option<Element>,
    status_subtitle: Option<Element>,
    code_input: Option<HtmlInputElement>,
    validate_btn: Option<Element>,
    result_box: Option<Element>,
    result_icon: Option<Element>,
    result_top: Option<Element>,
    result_bottom: Option<Element>,
    meta_code: Option<Element>,
    meta_doc: Option<Element>,
    meta_issuer: Option<Element>,
    meta_date: Option<Element>,
    year: Option<Element>,
}

impl DomView {
    /// Look up every known element in the current document
    ///
    /// # Errors
    /// Returns JsValue error if there is no window or document
    pub fn bind() -> Result<Self, JsValue> {
        let window =
            web_sys::window().ok_or_else(|| JsValue::from_str("No window object available"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document object available"))?;

        let by_id = |id: &str| document.get_element_by_id(id);

        Ok(Self {
            body: document.body(),
            status_badge: by_id(ids::STATUS_BADGE),
            status_title: by_id(ids::STATUS_TITLE),
            status_subtitle: by_id(ids::STATUS_SUBTITLE),
            code_input: input_by_id(&document, ids::CODE_INPUT),
            validate_btn: by_id(ids::VALIDATE_BTN),
            result_box: by_id(ids::RESULT_BOX),
            result_icon: by_id(ids::RESULT_ICON),
            result_top: by_id(ids::RESULT_TOP),
            result_bottom: by_id(ids::RESULT_BOTTOM),
            meta_code: by_id(ids::META_CODE),
            meta_doc: by_id(ids::META_DOC),
            meta_issuer: by_id(ids::META_ISSUER),
            meta_date: by_id(ids::META_DATE),
            year: by_id(ids::YEAR),
            window,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn code_input(&self) -> Option<&HtmlInputElement> {
        self.code_input.as_ref()
    }

    pub fn validate_button(&self) -> Option<&Element> {
        self.validate_btn.as_ref()
    }

    /// Current text of the code field (empty when the field is missing)
    pub fn input_value(&self) -> String {
        self.code_input
            .as_ref()
            .map(HtmlInputElement::value)
            .unwrap_or_default()
    }

    pub fn set_input_value(&self, value: &str) {
        if let Some(input) = &self.code_input {
            input.set_value(value);
        }
    }

    /// Current page query string, including the leading `?`
    pub fn location_search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    /// Fill the footer year
    pub fn set_year(&self) {
        let year = js_sys::Date::new_0().get_full_year();
        set_text(&self.year, &year.to_string());
    }

    fn apply_state_tag(&self, tag: StateTag, pulse: bool) -> Result<(), JsValue> {
        if let Some(body) = &self.body {
            let classes = body.class_list();
            for class in StateTag::CLASSES {
                classes.remove_1(class)?;
            }
            if let Some(class) = tag.css_class() {
                classes.add_1(class)?;
            }
        }

        if let Some(result_box) = &self.result_box {
            let classes = result_box.class_list();
            classes.remove_1(PULSE_CLASS)?;
            if pulse {
                classes.add_1(PULSE_CLASS)?;
            }
        }

        Ok(())
    }

    fn replace_code_param(&self, code: Option<&Code>) -> Result<(), JsValue> {
        let href = self.window.location().href()?;
        let url = Url::new(&href)?;
        let params = url.search_params();
        match code {
            Some(code) => params.set(CODE_PARAM, code.as_str()),
            None => params.delete(CODE_PARAM),
        }

        self.window
            .history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(&url.href()))
    }
}

impl ViewSink for DomView {
    fn render(&self, view: &ViewModel) {
        if let Err(e) = self.apply_state_tag(view.tag, view.pulse) {
            web_sys::console::warn_2(&"Failed to update state classes".into(), &e);
        }

        set_text(&self.status_badge, &view.badge);
        set_text(&self.status_title, &view.title);
        set_text(&self.status_subtitle, &view.subtitle);

        set_text(&self.result_icon, &view.icon);
        set_text(&self.result_top, &view.top);
        set_text(&self.result_bottom, &view.bottom);

        set_text(&self.meta_code, &view.meta.code);
        set_text(&self.meta_doc, &view.meta.doc_name);
        set_text(&self.meta_issuer, &view.meta.issuer);
        set_text(&self.meta_date, &view.meta.issued_at);
    }

    fn sync_code(&self, code: Option<&Code>) {
        // Cosmetic only; a failure here must not affect verification
        if let Err(e) = self.replace_code_param(code) {
            web_sys::console::warn_2(&"Failed to update page URL".into(), &e);
        }
    }
}

fn set_text(element: &Option<Element>, text: &str) {
    if let Some(element) = element {
        element.set_text_content(Some(text));
    }
}

fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}
