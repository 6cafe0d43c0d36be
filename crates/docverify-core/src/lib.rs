//! Document verification core
//!
//! Looks up a document code (usually carried by a QR link as `?code=`)
//! and turns the answer into what the verification page shows.
//!
//! ## Architecture
//!
//! - [`code`]: normalization of raw input into a [`Code`]
//! - [`record`]: document records and the [`DocumentTable`]
//! - [`resolver`]: local table and remote endpoint lookup strategies
//! - [`flow`]: the [`VerificationFlow`] controller and its state machine
//! - [`view`]: presentation states and the pure [`render`] function
//!
//! Nothing here touches a browser; the wasm front end supplies a DOM
//! [`ViewSink`] and a `fetch` based [`HttpTransport`].

pub mod code;
pub mod config;
pub mod error;
pub mod flow;
pub mod outcome;
pub mod record;
pub mod resolver;
pub mod view;

pub use code::{code_from_query, normalize_code, Code, CODE_PARAM};
pub use config::VerifierConfig;
pub use error::{ConfigError, FlowError, LookupError};
pub use flow::{FlowEvent, FlowOutcome, VerificationFlow};
pub use outcome::{DocumentSummary, Verification};
pub use record::{DocumentRecord, DocumentStatus, DocumentTable};
pub use resolver::{
    ConfiguredResolver, Endpoint, HttpReply, HttpTransport, LocalResolver, RemoteResolver, Resolver,
    VerifyResponse,
};
pub use view::{
    render, render_result, MetaFields, PresentationState, StateTag, ViewModel, ViewSink,
    FALLBACK_DOC_NAME, PLACEHOLDER,
};
