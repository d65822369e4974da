//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table status (桌台状态), owned by the order service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    /// Server-set only; no waiter action leads here
    Reserved,
    /// Any status string this client does not recognise
    #[serde(other)]
    Unknown,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
            Self::Unknown => "unknown",
        }
    }

    /// Whether a waiter may act on a table in this status
    pub fn is_actionable(&self) -> bool {
        matches!(self, Self::Available | Self::Occupied)
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dining table entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    #[serde(deserialize_with = "crate::util::lenient_i64")]
    pub table_id: i64,
    pub table_status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
}

/// Status update payload (`PUT /orders/tables/:id`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub table_status: TableStatus,
}

/// Table list as returned by the order service.
///
/// Older deployments wrap the array as `{"tables": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TableListResponse {
    Bare(Vec<DiningTable>),
    Wrapped { tables: Vec<DiningTable> },
}

impl TableListResponse {
    pub fn into_tables(self) -> Vec<DiningTable> {
        match self {
            Self::Bare(tables) | Self::Wrapped { tables } => tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_preserved_as_unknown() {
        let table: DiningTable =
            serde_json::from_str(r#"{"table_id": 3, "table_status": "cleaning"}"#).unwrap();
        assert_eq!(table.table_status, TableStatus::Unknown);
        assert!(!table.table_status.is_actionable());
    }

    #[test]
    fn test_wrapped_table_list() {
        let body = r#"{"tables": [{"table_id": 1, "table_status": "available"}]}"#;
        let list: TableListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(list.into_tables().len(), 1);
    }

    #[test]
    fn test_update_payload_shape() {
        let body = serde_json::to_value(TableStatusUpdate {
            table_status: TableStatus::Occupied,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"table_status": "occupied"}));
    }
}
