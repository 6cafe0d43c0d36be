//! Remote lookup over HTTP
//!
//! The endpoint is called as `GET <endpoint>?code=<code>` (any `code`
//! already in the endpoint is replaced) and must answer with a JSON object:
//!
//! ```json
//! { "valid": true, "code": "VBC-9F3K7Q", "docName": "...", "issuer": "...",
//!   "issuedAt": "2026-01-15", "status": "valid", "owner": "...", "reason": null }
//! ```
//!
//! Only `valid` is required. A non-2xx status, a transport failure or a body
//! that does not parse all surface as [`LookupError`], never as "not found".

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::{Position, Url};

use crate::code::{Code, CODE_PARAM};
use crate::error::{ConfigError, LookupError};
use crate::outcome::{DocumentSummary, Verification};
use crate::record::DocumentStatus;

use super::Resolver;

/// Raw HTTP answer handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Read-only HTTP capability used by [`RemoteResolver`]
///
/// Implementations only report transport-level failures as errors; HTTP
/// error statuses come back as an [`HttpReply`].
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpReply, LookupError>;
}

/// Body of a verification endpoint response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default)]
    pub revoked: bool,
}

impl VerifyResponse {
    /// Parse a response body
    pub fn parse(body: &str) -> Result<Self, LookupError> {
        serde_json::from_str(body).map_err(|e| LookupError::MalformedResponse(e.to_string()))
    }

    /// Build the wire form of a verification answer
    pub fn from_verification(verification: &Verification) -> Self {
        let code = Some(verification.code().to_string());
        match verification {
            Verification::NotFound { .. } => Self {
                valid: false,
                code,
                ..Self::default()
            },
            Verification::Valid { document, .. } => Self {
                valid: true,
                code,
                status: Some(DocumentStatus::Valid.to_string()),
                ..Self::with_document(document)
            },
            Verification::Revoked {
                document, reason, ..
            } => Self {
                valid: true,
                code,
                status: Some(DocumentStatus::Revoked.to_string()),
                reason: reason.clone(),
                revoked: true,
                ..Self::with_document(document)
            },
        }
    }

    fn with_document(document: &DocumentSummary) -> Self {
        Self {
            doc_name: document.doc_name.clone(),
            issuer: document.issuer.clone(),
            issued_at: document.issued_at.clone(),
            owner: document.owner.clone(),
            ..Self::default()
        }
    }

    /// Whether the body marks the document as revoked
    ///
    /// Either the explicit flag or a status label is enough.
    pub fn is_revoked(&self) -> bool {
        self.revoked
            || self
                .status
                .as_deref()
                .is_some_and(DocumentStatus::is_revoked_label)
    }

    /// Classify the response for the code that was requested
    ///
    /// The requested code is kept even if the body echoes a different one.
    pub fn into_verification(self, code: Code) -> Verification {
        if !self.valid {
            return Verification::NotFound { code };
        }

        let revoked = self.is_revoked();
        let document = DocumentSummary {
            doc_name: self.doc_name,
            issuer: self.issuer,
            issued_at: self.issued_at,
            owner: self.owner,
        };

        if revoked {
            Verification::Revoked {
                code,
                document,
                reason: self.reason,
            }
        } else {
            Verification::Valid { code, document }
        }
    }
}

/// Origin page-relative endpoints are resolved against
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// A parsed verification endpoint
///
/// Either an absolute `http`/`https` URL or a path relative to the page
/// origin (`/verify`), which is what a same-origin deployment uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
    relative: bool,
}

impl Endpoint {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let invalid = || ConfigError::InvalidEndpoint(raw.to_string());

        match Url::parse(raw) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self {
                    url,
                    relative: false,
                }),
                _ => Err(invalid()),
            },
            Err(url::ParseError::RelativeUrlWithoutBase)
                if raw.starts_with('/') && !raw.starts_with("//") =>
            {
                let url = Url::parse(RELATIVE_BASE)
                    .and_then(|base| base.join(raw))
                    .map_err(|_| invalid())?;
                Ok(Self {
                    url,
                    relative: true,
                })
            }
            Err(_) => Err(invalid()),
        }
    }

    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// URL for one lookup
    ///
    /// Sets `code` to the given code, replacing any value the endpoint
    /// already carries. Other parameters and the fragment are kept.
    pub fn request_url(&self, code: &Code) -> String {
        let mut url = self.url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != CODE_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair(CODE_PARAM, code.as_str());

        Self::serialize(&url, self.relative)
    }

    fn serialize(url: &Url, relative: bool) -> String {
        if relative {
            url[Position::BeforePath..].to_string()
        } else {
            url.to_string()
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::serialize(&self.url, self.relative))
    }
}

/// Resolves codes by calling a verification endpoint
pub struct RemoteResolver<T> {
    endpoint: Endpoint,
    transport: T,
}

impl<T: HttpTransport> RemoteResolver<T> {
    pub fn new(endpoint: Endpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn request_url(&self, code: &Code) -> String {
        self.endpoint.request_url(code)
    }
}

impl<T: HttpTransport> Resolver for RemoteResolver<T> {
    async fn resolve(&self, code: &Code) -> Result<Verification, LookupError> {
        let url = self.request_url(code);
        debug!(url = %url, "remote lookup");

        let reply = self.transport.get(&url).await?;
        if !reply.is_success() {
            warn!(status = reply.status, "verification endpoint returned an error status");
            return Err(LookupError::HttpStatus(reply.status));
        }

        let response = VerifyResponse::parse(&reply.body)?;
        Ok(response.into_verification(code.clone()))
    }

    fn strategy(&self) -> &'static str {
        "remote"
    }
}
