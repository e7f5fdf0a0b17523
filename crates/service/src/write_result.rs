use serde::{Deserialize, Serialize};

/// Outcome of a single write statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteResult {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_insert_id: Option<i32>,
    pub rows_affected: u64,
}

impl WriteResult {
    pub fn inserted(id: i32) -> Self {
        Self { last_insert_id: Some(id), rows_affected: 1 }
    }

    pub fn affected(rows: u64) -> Self {
        Self { last_insert_id: None, rows_affected: rows }
    }

    /// Nothing matched the statement's filter.
    pub fn is_noop(&self) -> bool {
        self.rows_affected == 0
    }
}
