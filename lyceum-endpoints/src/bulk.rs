//! Bulk-operation outcomes.
//!
//! Bulk endpoints return a per-item status array. There is no
//! partial-success contract: one failing item fails the whole mutation,
//! with every item message rolled into one aggregated error.

use lyceum_core::EndpointError;
use serde::Deserialize;

/// One item of a bulk response, a tagged union on the `status` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BulkItem<T> {
    Ok { data: T },
    Error { message: String },
}

/// Collapse a per-item array into all-or-nothing.
///
/// Item positions in the aggregated message are 1-indexed, matching how
/// the forms present them.
pub fn collect_bulk<T>(items: Vec<BulkItem<T>>) -> Result<Vec<T>, EndpointError> {
    let mut values = Vec::with_capacity(items.len());
    let mut failures: Vec<String> = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match item {
            BulkItem::Ok { data } => values.push(data),
            BulkItem::Error { message } => {
                failures.push(format!("item {}: {}", index + 1, message));
            }
        }
    }

    if failures.is_empty() {
        Ok(values)
    } else {
        Err(EndpointError::Aggregated {
            message: failures.join("; "),
        })
    }
}
