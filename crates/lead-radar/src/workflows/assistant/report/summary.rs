use super::super::snapshot::{DroppedRows, LeadSnapshot};
use crate::workflows::crm::PipelineStatus;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineCountEntry {
    pub status: PipelineStatus,
    pub status_label: &'static str,
    pub count: usize,
}

/// Counts describing the snapshot and the buckets derived from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotSummary {
    pub leads: usize,
    pub filters: usize,
    pub listings_considered: usize,
    pub dropped_rows: DroppedRows,
    pub unrecognized_statuses: usize,
    pub pipeline: Vec<PipelineCountEntry>,
    pub due_today: usize,
    pub overdue: usize,
    pub waiting_return: usize,
}

impl SnapshotSummary {
    /// Snapshot-level counts; bucket sizes are filled in by the caller.
    pub(crate) fn of(snapshot: &LeadSnapshot, listings_considered: usize) -> Self {
        let mut per_status: HashMap<PipelineStatus, usize> = HashMap::new();
        for lead in &snapshot.leads {
            *per_status.entry(lead.status_pipeline).or_default() += 1;
        }

        let pipeline = PipelineStatus::ordered()
            .into_iter()
            .filter_map(|status| {
                per_status.get(&status).map(|count| PipelineCountEntry {
                    status,
                    status_label: status.label(),
                    count: *count,
                })
            })
            .collect();

        Self {
            leads: snapshot.leads.len(),
            filters: snapshot.filters.len(),
            listings_considered,
            dropped_rows: snapshot.dropped,
            unrecognized_statuses: snapshot
                .leads
                .iter()
                .filter(|lead| lead.unrecognized_status.is_some())
                .count(),
            pipeline,
            ..Self::default()
        }
    }

    pub fn count_for(&self, status: PipelineStatus) -> usize {
        self.pipeline
            .iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }
}
