use crate::workflows::crm::{normalize_filter, normalize_lead, BaseLead, LeadFilter, LeadId};
use crate::workflows::listings::{normalize_listing, Listing};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Boundary failures: the caller handed over something that is not a snapshot at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("`{field}` must be an array of rows")]
    NotACollection { field: &'static str },
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
}

/// Raw rows as fetched from the backend, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotRows {
    #[serde(default)]
    pub leads: Value,
    #[serde(default)]
    pub filters: Value,
    #[serde(default)]
    pub listings: Value,
}

/// Per-table counts of rows dropped during normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DroppedRows {
    pub leads: usize,
    pub filters: usize,
    pub listings: usize,
}

impl DroppedRows {
    pub fn total(&self) -> usize {
        self.leads + self.filters + self.listings
    }
}

/// Normalized, read-only input for one assistant run.
#[derive(Debug, Clone, Default)]
pub struct LeadSnapshot {
    pub leads: Vec<BaseLead>,
    pub filters: HashMap<LeadId, LeadFilter>,
    pub listings: Vec<Listing>,
    pub dropped: DroppedRows,
}

impl LeadSnapshot {
    pub fn new(
        leads: Vec<BaseLead>,
        filters: HashMap<LeadId, LeadFilter>,
        listings: Vec<Listing>,
    ) -> Self {
        Self {
            leads,
            filters,
            listings,
            dropped: DroppedRows::default(),
        }
    }

    /// Normalizes raw rows. A missing table (`null`) is empty; anything else that is not an
    /// array is rejected. Malformed rows inside an array are dropped and counted.
    pub fn from_rows(rows: &SnapshotRows) -> Result<Self, SnapshotError> {
        let lead_rows = collection(&rows.leads, "leads")?;
        let filter_rows = collection(&rows.filters, "filters")?;
        let listing_rows = collection(&rows.listings, "listings")?;

        let mut dropped = DroppedRows::default();

        let mut leads = Vec::with_capacity(lead_rows.len());
        for row in lead_rows {
            match normalize_lead(row) {
                Ok(lead) => leads.push(lead),
                Err(reason) => {
                    debug!(%reason, "dropping lead row");
                    dropped.leads += 1;
                }
            }
        }

        let mut filters = HashMap::with_capacity(filter_rows.len());
        for row in filter_rows {
            match normalize_filter(row) {
                Ok((lead_id, filter)) => {
                    filters.insert(lead_id, filter);
                }
                Err(reason) => {
                    debug!(%reason, "dropping filter row");
                    dropped.filters += 1;
                }
            }
        }

        let mut listings = Vec::with_capacity(listing_rows.len());
        for row in listing_rows {
            match normalize_listing(row) {
                Ok(listing) => listings.push(listing),
                Err(reason) => {
                    debug!(%reason, "dropping listing row");
                    dropped.listings += 1;
                }
            }
        }

        Ok(Self {
            leads,
            filters,
            listings,
            dropped,
        })
    }

    pub fn filter_for(&self, lead_id: &LeadId) -> Option<&LeadFilter> {
        self.filters.get(lead_id)
    }
}

fn collection<'a>(value: &'a Value, field: &'static str) -> Result<&'a [Value], SnapshotError> {
    match value {
        Value::Array(rows) => Ok(rows.as_slice()),
        Value::Null => Ok(&[]),
        _ => Err(SnapshotError::NotACollection { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_rows_are_dropped_not_fatal() {
        let rows = SnapshotRows {
            leads: json!([{ "id": "l1", "name": "Ana" }, { "name": "sem id" }, 42]),
            filters: json!([{ "lead_id": "l1", "min_price": 100 }, { "min_price": 5 }]),
            listings: json!([{ "id": "x1", "price": 120 }, "broken"]),
        };

        let snapshot = LeadSnapshot::from_rows(&rows).expect("snapshot");
        assert_eq!(snapshot.leads.len(), 1);
        assert_eq!(snapshot.filters.len(), 1);
        assert_eq!(snapshot.listings.len(), 1);
        assert_eq!(
            snapshot.dropped,
            DroppedRows {
                leads: 2,
                filters: 1,
                listings: 1
            }
        );
        assert_eq!(snapshot.dropped.total(), 4);
        assert!(snapshot.filter_for(&LeadId::from("l1")).is_some());
    }

    #[test]
    fn non_array_tables_are_rejected() {
        let rows = SnapshotRows {
            leads: json!({ "id": "l1" }),
            ..SnapshotRows::default()
        };
        assert_eq!(
            LeadSnapshot::from_rows(&rows).expect_err("not a collection"),
            SnapshotError::NotACollection { field: "leads" }
        );
    }

    #[test]
    fn absent_tables_are_empty() {
        let snapshot = LeadSnapshot::from_rows(&SnapshotRows::default()).expect("snapshot");
        assert!(snapshot.leads.is_empty());
        assert!(snapshot.listings.is_empty());
    }
}
