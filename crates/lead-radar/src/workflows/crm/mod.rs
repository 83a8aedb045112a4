//! CRM lead snapshots: canonical records and the row normalizer that builds them.

mod dates;
pub mod domain;
mod normalizer;

pub use dates::LeadDate;
pub use domain::{BaseLead, ClosedOutcome, ContactInfo, LeadFilter, LeadId, PipelineStatus};
pub use normalizer::{normalize_filter, normalize_lead, DroppedReason};
