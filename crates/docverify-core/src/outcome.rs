//! Lookup outcomes
//!
//! A lookup either answers with a [`Verification`] or fails with a
//! [`LookupError`](crate::LookupError). "Not found" and "revoked" are
//! answers, never errors.

use serde::Serialize;

use crate::code::Code;
use crate::record::DocumentRecord;

/// Document metadata attached to a positive answer
///
/// Every field is optional because remote services may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub doc_name: Option<String>,
    pub issuer: Option<String>,
    pub issued_at: Option<String>,
    pub owner: Option<String>,
}

impl From<&DocumentRecord> for DocumentSummary {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            doc_name: Some(record.doc_name.clone()),
            issuer: Some(record.issuer.clone()),
            issued_at: Some(record.issued_at.clone()),
            owner: Some(record.owner.clone()),
        }
    }
}

/// Answer to a single verification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Issued and still in force
    Valid {
        code: Code,
        document: DocumentSummary,
    },
    /// Issued, then administratively invalidated
    Revoked {
        code: Code,
        document: DocumentSummary,
        reason: Option<String>,
    },
    /// No document was ever issued under this code
    NotFound { code: Code },
}

impl Verification {
    /// Classify a table hit or miss
    pub fn from_record(code: Code, record: Option<&DocumentRecord>) -> Self {
        match record {
            None => Verification::NotFound { code },
            Some(record) if record.is_revoked() => Verification::Revoked {
                code,
                document: record.into(),
                reason: record.reason.clone(),
            },
            Some(record) => Verification::Valid {
                code,
                document: record.into(),
            },
        }
    }

    pub fn code(&self) -> &Code {
        match self {
            Verification::Valid { code, .. }
            | Verification::Revoked { code, .. }
            | Verification::NotFound { code } => code,
        }
    }

    pub fn document(&self) -> Option<&DocumentSummary> {
        match self {
            Verification::Valid { document, .. } | Verification::Revoked { document, .. } => {
                Some(document)
            }
            Verification::NotFound { .. } => None,
        }
    }

    /// True for any document that exists, revoked or not
    pub fn is_found(&self) -> bool {
        !matches!(self, Verification::NotFound { .. })
    }

    pub fn is_revoked(&self) -> bool {
        matches!(self, Verification::Revoked { .. })
    }
}
