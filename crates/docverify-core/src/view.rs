//! Presentation states and the view renderer
//!
//! [`render`] is a pure function from a [`PresentationState`] plus the
//! lookup payload to a [`ViewModel`]: the exact text for every display
//! field, the state tag and whether the in-progress pulse is shown.
//! A [`ViewSink`] applies that model to a real surface (the DOM, a test
//! recorder).

use serde::Serialize;

use crate::code::Code;
use crate::error::LookupError;
use crate::outcome::Verification;

/// Shown for any metadata field without a value
pub const PLACEHOLDER: &str = "—";

/// Document name shown when a found document has none
pub const FALLBACK_DOC_NAME: &str = "Verified document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationState {
    AwaitingInput,
    Checking,
    Valid,
    Revoked,
    NotFound,
    LookupError,
}

impl PresentationState {
    pub fn tag(self) -> StateTag {
        match self {
            PresentationState::AwaitingInput => StateTag::Warn,
            PresentationState::Checking => StateTag::Idle,
            PresentationState::Valid => StateTag::Ok,
            PresentationState::Revoked => StateTag::Warn,
            PresentationState::NotFound => StateTag::Bad,
            PresentationState::LookupError => StateTag::Warn,
        }
    }

    /// States a lookup can end in
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PresentationState::Valid
                | PresentationState::Revoked
                | PresentationState::NotFound
                | PresentationState::LookupError
        )
    }

    /// Terminal state for a finished lookup
    pub fn for_result(result: &Result<Verification, LookupError>) -> Self {
        match result {
            Ok(Verification::Valid { .. }) => PresentationState::Valid,
            Ok(Verification::Revoked { .. }) => PresentationState::Revoked,
            Ok(Verification::NotFound { .. }) => PresentationState::NotFound,
            Err(_) => PresentationState::LookupError,
        }
    }
}

/// Mutually exclusive visual style of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTag {
    Ok,
    Bad,
    Warn,
    Idle,
}

impl StateTag {
    /// Every class [`StateTag::css_class`] can return
    pub const CLASSES: [&'static str; 3] = ["state-ok", "state-bad", "state-warn"];

    /// Body class for this tag; `Idle` has none
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            StateTag::Ok => Some("state-ok"),
            StateTag::Bad => Some("state-bad"),
            StateTag::Warn => Some("state-warn"),
            StateTag::Idle => None,
        }
    }
}

/// The four metadata fields under the result box
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaFields {
    pub code: String,
    pub doc_name: String,
    pub issuer: String,
    pub issued_at: String,
}

impl MetaFields {
    pub fn empty() -> Self {
        Self {
            code: PLACEHOLDER.to_string(),
            doc_name: PLACEHOLDER.to_string(),
            issuer: PLACEHOLDER.to_string(),
            issued_at: PLACEHOLDER.to_string(),
        }
    }

    fn code_only(code: &Code) -> Self {
        Self {
            code: code.to_string(),
            ..Self::empty()
        }
    }
}

/// Everything a surface needs to display one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub state: PresentationState,
    pub tag: StateTag,
    pub pulse: bool,
    pub badge: String,
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    pub top: String,
    pub bottom: String,
    pub meta: MetaFields,
}

impl ViewModel {
    /// Initial screen when the page was opened without a code
    pub fn ready() -> Self {
        Self {
            state: PresentationState::AwaitingInput,
            tag: PresentationState::AwaitingInput.tag(),
            pulse: false,
            badge: "Ready to verify".to_string(),
            title: "Scan the QR code to verify".to_string(),
            subtitle: "If the QR code includes ?code=, verification runs automatically."
                .to_string(),
            icon: "●".to_string(),
            top: "Status".to_string(),
            bottom: "Not verified".to_string(),
            meta: MetaFields::empty(),
        }
    }
}

/// Applies view models to a display surface
pub trait ViewSink {
    fn render(&self, view: &ViewModel);

    /// Mirror the submitted code into the page address (`None` clears it)
    fn sync_code(&self, _code: Option<&Code>) {}
}

/// Build the view for a state
///
/// `code` is the normalized code being verified, `verification` the lookup
/// answer when one exists. Fields the payload does not provide fall back
/// to [`PLACEHOLDER`].
pub fn render(
    state: PresentationState,
    code: Option<&Code>,
    verification: Option<&Verification>,
) -> ViewModel {
    let bottom = code.map(|c| c.to_string());
    let meta = match code {
        Some(code) => MetaFields::code_only(code),
        None => MetaFields::empty(),
    };

    let base = ViewModel {
        state,
        tag: state.tag(),
        pulse: false,
        badge: String::new(),
        title: String::new(),
        subtitle: String::new(),
        icon: String::new(),
        top: String::new(),
        bottom: bottom.unwrap_or_else(|| "Not verified".to_string()),
        meta,
    };

    match state {
        PresentationState::AwaitingInput => ViewModel {
            badge: "Code missing".to_string(),
            title: "Enter a code or scan the QR code".to_string(),
            subtitle: "No ?code= parameter was found in the URL.".to_string(),
            icon: "!".to_string(),
            top: "Status".to_string(),
            bottom: "Not verified".to_string(),
            meta: MetaFields::empty(),
            ..base
        },
        PresentationState::Checking => ViewModel {
            pulse: true,
            badge: "Verifying…".to_string(),
            title: "Checking authenticity".to_string(),
            subtitle: "Checking the document code.".to_string(),
            icon: "…".to_string(),
            top: "Processing".to_string(),
            ..base
        },
        PresentationState::NotFound => ViewModel {
            badge: "Not valid".to_string(),
            title: "❌ Document not valid".to_string(),
            subtitle: "The code does not exist or does not match an original document."
                .to_string(),
            icon: "×".to_string(),
            top: "Invalid".to_string(),
            ..base
        },
        PresentationState::Revoked => {
            let reason = match verification {
                Some(Verification::Revoked { reason, .. }) => non_empty(reason.as_deref()),
                _ => None,
            };
            let subtitle = match reason {
                Some(reason) => format!("This document has been revoked. Reason: {}", reason),
                None => "This document has been revoked and must not be considered valid."
                    .to_string(),
            };
            let meta = document_meta(base.meta.clone(), verification);
            ViewModel {
                badge: "Document revoked".to_string(),
                title: "⚠️ Document revoked".to_string(),
                subtitle,
                icon: "!".to_string(),
                top: "Revoked".to_string(),
                meta,
                ..base
            }
        }
        PresentationState::Valid => {
            let meta = document_meta(base.meta.clone(), verification);
            ViewModel {
                badge: "Original document".to_string(),
                title: "✅ Original document".to_string(),
                subtitle: "Verification indicates this document is authentic.".to_string(),
                icon: "✓".to_string(),
                top: "Valid".to_string(),
                meta,
                ..base
            }
        }
        PresentationState::LookupError => ViewModel {
            badge: "Verification error".to_string(),
            title: "Could not verify".to_string(),
            subtitle: "There was a problem verifying the code. Please try again.".to_string(),
            icon: "!".to_string(),
            top: "Error".to_string(),
            ..base
        },
    }
}

/// View for a finished lookup
pub fn render_result(code: &Code, result: &Result<Verification, LookupError>) -> ViewModel {
    render(
        PresentationState::for_result(result),
        Some(code),
        result.as_ref().ok(),
    )
}

fn document_meta(meta: MetaFields, verification: Option<&Verification>) -> MetaFields {
    let Some(document) = verification.and_then(Verification::document) else {
        return MetaFields {
            doc_name: FALLBACK_DOC_NAME.to_string(),
            ..meta
        };
    };

    MetaFields {
        doc_name: non_empty(document.doc_name.as_deref())
            .unwrap_or(FALLBACK_DOC_NAME)
            .to_string(),
        issuer: non_empty(document.issuer.as_deref())
            .unwrap_or(PLACEHOLDER)
            .to_string(),
        issued_at: non_empty(document.issued_at.as_deref())
            .unwrap_or(PLACEHOLDER)
            .to_string(),
        ..meta
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
