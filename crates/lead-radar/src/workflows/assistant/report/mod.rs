mod summary;
pub mod views;

pub use summary::{PipelineCountEntry, SnapshotSummary};
pub use views::{AssistantPayload, LeadEntryView, LeadScoreView};
