use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::ItemName;

/// Kind of mutation recorded in the audit trail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditKind {
    Add,
    Remove,
    RemoveAll,
}

impl AuditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditKind::Add => "ADD",
            AuditKind::Remove => "REMOVE",
            AuditKind::RemoveAll => "REMOVE_ALL",
        }
    }
}

impl core::fmt::Display for AuditKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one successful ledger mutation.
///
/// `delta` is the number of units moved (always positive); for `RemoveAll` it is
/// the quantity held immediately before the item was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 1-based position in the ledger's audit trail.
    pub sequence: u64,
    pub occurred_at: DateTime<Utc>,
    pub kind: AuditKind,
    pub item: ItemName,
    pub delta: i64,
    pub resulting_quantity: i64,
}
