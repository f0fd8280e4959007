use serde::Deserialize;

use stockroom_inventory::{AuditEntry, Snapshot};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub amount: i64,
}

#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub amount: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn snapshot_to_json(snapshot: &Snapshot) -> serde_json::Value {
    serde_json::json!({
        "items": snapshot
            .entries()
            .iter()
            .map(|e| serde_json::json!({ "name": e.name.as_str(), "quantity": e.quantity }))
            .collect::<Vec<_>>(),
        "distinct_items": snapshot.distinct_items(),
        "total_units": units_to_json(snapshot.total_units()),
    })
}

/// JSON numbers only carry 64 bits; larger totals are rendered as strings.
fn units_to_json(total: i128) -> serde_json::Value {
    match i64::try_from(total) {
        Ok(n) => serde_json::Value::from(n),
        Err(_) => serde_json::Value::String(total.to_string()),
    }
}

pub fn history_to_json(entries: &[AuditEntry]) -> serde_json::Value {
    serde_json::json!({
        "count": entries.len(),
        "entries": entries
            .iter()
            .map(|e| serde_json::json!({
                "sequence": e.sequence,
                "occurred_at": e.occurred_at.to_rfc3339(),
                "kind": e.kind.as_str(),
                "item": e.item.as_str(),
                "delta": e.delta,
                "resulting_quantity": e.resulting_quantity,
            }))
            .collect::<Vec<_>>(),
    })
}
