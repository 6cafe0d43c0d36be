use tracing::debug;

use crate::code::Code;
use crate::error::LookupError;
use crate::outcome::Verification;
use crate::record::DocumentTable;

use super::Resolver;

/// Resolves codes against an in-memory table
#[derive(Debug, Clone)]
pub struct LocalResolver {
    table: DocumentTable,
}

impl LocalResolver {
    pub fn new(table: DocumentTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &DocumentTable {
        &self.table
    }

    /// Synchronous lookup; never fails
    pub fn lookup(&self, code: &Code) -> Verification {
        let hit = self.table.get(code);
        debug!(code = %code, found = hit.is_some(), "local table lookup");
        Verification::from_record(code.clone(), hit)
    }
}

impl Resolver for LocalResolver {
    async fn resolve(&self, code: &Code) -> Result<Verification, LookupError> {
        Ok(self.lookup(code))
    }

    fn strategy(&self) -> &'static str {
        "local"
    }
}
