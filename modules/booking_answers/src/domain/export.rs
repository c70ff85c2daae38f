//! Encoded table tokens for the download endpoint
//!
//! A rendered table hands the download endpoint an opaque token. The token
//! only identifies the table (scope, scope id, status, behavior); the query
//! is rebuilt from those values when the download is served, so nothing in
//! the token ends up in query text.

use super::table::TableLayout;
use crate::contract::{BookingAnswersError, Scope, TableDescriptor};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Serialized form of a table identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableToken {
    /// Unique table name: `{prefix}_{scope}_{scope_id}`
    pub name: String,
    pub scope: String,
    pub scope_id: i64,
    pub status_param: i64,
    pub sortable: bool,
    pub paginate: bool,
}

impl From<&TableDescriptor> for TableToken {
    fn from(table: &TableDescriptor) -> Self {
        Self {
            name: table.name.clone(),
            scope: table.scope.as_str().to_string(),
            scope_id: table.scope_id,
            status_param: table.status_param,
            sortable: table.sortable_rows,
            paginate: table.use_pages,
        }
    }
}

impl TableToken {
    /// URL-safe base64 of the JSON form
    pub fn encode(&self) -> Result<String, BookingAnswersError> {
        let json = serde_json::to_vec(self).map_err(|e| {
            tracing::error!("Failed to serialize table token: {}", e);
            BookingAnswersError::Internal
        })?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(encoded: &str) -> Result<Self, BookingAnswersError> {
        if encoded.is_empty() {
            return Err(malformed("token is empty"));
        }
        let json = URL_SAFE_NO_PAD
            .decode(encoded.trim())
            .map_err(|e| malformed(format!("not base64: {}", e)))?;
        serde_json::from_slice(&json).map_err(|e| malformed(format!("not a table token: {}", e)))
    }

    /// Layout of the identified table, without columns
    pub fn into_layout(self) -> Result<TableLayout, BookingAnswersError> {
        let scope: Scope = self
            .scope
            .parse()
            .map_err(|_| malformed(format!("unknown scope '{}'", self.scope)))?;
        let suffix = format!("_{}_{}", scope, self.scope_id);
        let prefix = self
            .name
            .strip_suffix(&suffix)
            .filter(|prefix| !prefix.is_empty())
            .ok_or_else(|| malformed(format!("table name '{}' does not match its scope", self.name)))?;

        Ok(TableLayout {
            scope,
            scope_id: self.scope_id,
            status_param: self.status_param,
            table_name_prefix: prefix.to_string(),
            columns: Vec::new(),
            headers: Vec::new(),
            sortable: self.sortable,
            paginate: self.paginate,
        })
    }
}

fn malformed(details: impl Into<String>) -> BookingAnswersError {
    BookingAnswersError::MalformedTableToken {
        details: details.into(),
    }
}
