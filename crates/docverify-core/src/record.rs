//! Document records and the lookup table they live in

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::code::{normalize_code, Code};
use crate::error::ConfigError;

/// Administrative status of an issued document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum DocumentStatus {
    Valid,
    Revoked,
}

impl DocumentStatus {
    /// Case-insensitive check for a revoked status string
    ///
    /// Accepts both the English and the Spanish spelling used by the
    /// first deployments (`Revocado`).
    pub fn is_revoked_label(label: &str) -> bool {
        matches!(label.trim().to_lowercase().as_str(), "revoked" | "revocado")
    }
}

impl FromStr for DocumentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "valid" | "vigente" | "active" => Ok(DocumentStatus::Valid),
            "revoked" | "revocado" => Ok(DocumentStatus::Revoked),
            other => Err(format!("Unknown document status: {}", other)),
        }
    }
}

impl TryFrom<String> for DocumentStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentStatus::Valid => write!(f, "valid"),
            DocumentStatus::Revoked => write!(f, "revoked"),
        }
    }
}

/// An issued document as stored in the verification table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub doc_name: String,
    pub issuer: String,
    pub issued_at: String,
    pub status: DocumentStatus,
    pub owner: String,
    /// Only meaningful for revoked documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DocumentRecord {
    pub fn is_revoked(&self) -> bool {
        self.status == DocumentStatus::Revoked
    }
}

/// Static mapping from code to document record
///
/// Serializes as a plain JSON object keyed by code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentTable {
    entries: BTreeMap<String, DocumentRecord>,
}

impl DocumentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in demonstration table
    pub fn demo() -> Self {
        let mut entries = BTreeMap::new();

        entries.insert(
            "VBC-9F3K7Q".to_string(),
            DocumentRecord {
                doc_name: "Training Certificate".to_string(),
                issuer: "Vibecoding Chile".to_string(),
                issued_at: "2026-01-15".to_string(),
                status: DocumentStatus::Valid,
                owner: "Empresa Demo SpA".to_string(),
                reason: None,
            },
        );
        entries.insert(
            "VBC-2M8P1A".to_string(),
            DocumentRecord {
                doc_name: "Service Agreement".to_string(),
                issuer: "Vibecoding Chile".to_string(),
                issued_at: "2026-01-20".to_string(),
                status: DocumentStatus::Valid,
                owner: "Cliente Ejemplo Ltda".to_string(),
                reason: None,
            },
        );
        entries.insert(
            "VBC-REVOK1".to_string(),
            DocumentRecord {
                doc_name: "Certificate of Participation".to_string(),
                issuer: "Vibecoding Chile".to_string(),
                issued_at: "2026-01-10".to_string(),
                status: DocumentStatus::Revoked,
                owner: "Organizacion X".to_string(),
                reason: Some("Document superseded by a newer version".to_string()),
            },
        );

        Self { entries }
    }

    /// Parse a table from its JSON object form
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidTable(e.to_string()))
    }

    /// Insert or replace a record under an already-normalized code
    pub fn insert(&mut self, code: &Code, record: DocumentRecord) -> Option<DocumentRecord> {
        self.entries.insert(code.as_str().to_string(), record)
    }

    /// Exact-match lookup
    pub fn get(&self, code: &Code) -> Option<&DocumentRecord> {
        self.entries.get(code.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DocumentRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Re-key every entry through [`normalize_code`]
    ///
    /// Lookups use normalized codes, so a table written by hand with
    /// lower-case or padded keys must be normalized the same way before use.
    /// Fails on blank keys and on keys that collide after normalization.
    pub fn normalized(self, uppercase: bool) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();

        for (raw, record) in self.entries {
            let code =
                normalize_code(&raw, uppercase).ok_or_else(|| ConfigError::BlankKey(raw.clone()))?;
            let key = code.into_string();
            if entries.contains_key(&key) {
                return Err(ConfigError::DuplicateKey(key));
            }
            entries.insert(key, record);
        }

        Ok(Self { entries })
    }

    /// Check record-level invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (code, record) in &self.entries {
            if record.reason.is_some() && !record.is_revoked() {
                return Err(ConfigError::UnexpectedReason(code.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn code(raw: &str) -> Code {
        normalize_code(raw, true).unwrap()
    }

    #[test]
    fn test_status_parsing_is_case_insensitive() {
        assert_eq!("Vigente".parse::<DocumentStatus>(), Ok(DocumentStatus::Valid));
        assert_eq!("VALID".parse::<DocumentStatus>(), Ok(DocumentStatus::Valid));
        assert_eq!("Revocado".parse::<DocumentStatus>(), Ok(DocumentStatus::Revoked));
        assert_eq!(" revoked ".parse::<DocumentStatus>(), Ok(DocumentStatus::Revoked));
        assert!("expired".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn test_revoked_label() {
        assert!(DocumentStatus::is_revoked_label("REVOKED"));
        assert!(DocumentStatus::is_revoked_label("revocado"));
        assert!(!DocumentStatus::is_revoked_label("Vigente"));
        assert!(!DocumentStatus::is_revoked_label(""));
    }

    #[test]
    fn test_demo_table_contents() {
        let table = DocumentTable::demo();
        assert_eq!(table.len(), 3);
        assert!(!table.get(&code("VBC-9F3K7Q")).unwrap().is_revoked());
        assert!(table.get(&code("VBC-REVOK1")).unwrap().is_revoked());
        assert!(table.get(&code("ZZZZZZ")).is_none());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"{
            "ABC123": {
                "docName": "Diploma",
                "issuer": "Example University",
                "issuedAt": "2025-06-30",
                "status": "Vigente",
                "owner": "Jane Roe"
            },
            "OLD-1": {
                "docName": "Permit",
                "issuer": "City Hall",
                "issuedAt": "2020-01-01",
                "status": "revoked",
                "owner": "ACME",
                "reason": "Expired licence"
            }
        }"#;

        let table = DocumentTable::from_json(json).unwrap();
        assert_eq!(table.len(), 2);

        let diploma = table.get(&code("abc123")).unwrap();
        assert_eq!(diploma.doc_name, "Diploma");
        assert_eq!(diploma.status, DocumentStatus::Valid);
        assert_eq!(diploma.reason, None);

        let permit = table.get(&code("OLD-1")).unwrap();
        assert_eq!(permit.reason.as_deref(), Some("Expired licence"));
    }

    #[test]
    fn test_table_from_json_rejects_unknown_status() {
        let json = r#"{"A": {"docName":"x","issuer":"y","issuedAt":"z","status":"lost","owner":"o"}}"#;
        assert!(matches!(
            DocumentTable::from_json(json),
            Err(ConfigError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_normalized_rekeys_entries() {
        let json = r#"{" abc ": {"docName":"x","issuer":"y","issuedAt":"z","status":"valid","owner":"o"}}"#;
        let table = DocumentTable::from_json(json).unwrap().normalized(true).unwrap();
        assert!(table.get(&code("ABC")).is_some());
    }

    #[test]
    fn test_normalized_detects_collisions() {
        let json = r#"{
            "abc": {"docName":"x","issuer":"y","issuedAt":"z","status":"valid","owner":"o"},
            "ABC": {"docName":"x","issuer":"y","issuedAt":"z","status":"valid","owner":"o"}
        }"#;
        let result = DocumentTable::from_json(json).unwrap().normalized(true);
        assert_eq!(result, Err(ConfigError::DuplicateKey("ABC".to_string())));
    }

    #[test]
    fn test_normalized_rejects_blank_key() {
        let json = r#"{"  ": {"docName":"x","issuer":"y","issuedAt":"z","status":"valid","owner":"o"}}"#;
        let result = DocumentTable::from_json(json).unwrap().normalized(false);
        assert!(matches!(result, Err(ConfigError::BlankKey(_))));
    }

    #[test]
    fn test_validate_rejects_reason_on_valid_record() {
        let mut table = DocumentTable::new();
        table.insert(
            &code("X1"),
            DocumentRecord {
                doc_name: "Doc".to_string(),
                issuer: "Issuer".to_string(),
                issued_at: "2026-01-01".to_string(),
                status: DocumentStatus::Valid,
                owner: "Owner".to_string(),
                reason: Some("should not be here".to_string()),
            },
        );
        assert_eq!(
            table.validate(),
            Err(ConfigError::UnexpectedReason("X1".to_string()))
        );
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let table = DocumentTable::demo();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["VBC-REVOK1"]["docName"], "Certificate of Participation");
        assert_eq!(json["VBC-REVOK1"]["status"], "revoked");
        assert!(json["VBC-9F3K7Q"].get("reason").is_none());
    }
}
