use super::domain::{BaseLead, ClosedOutcome, ContactInfo, LeadFilter, LeadId, PipelineStatus};
use crate::workflows::rows::{self, Row};
use serde_json::Value;
use tracing::warn;

/// Why a backend row was left out of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DroppedReason {
    #[error("row is not an object")]
    NotAnObject,
    #[error("row has no usable id")]
    MissingId,
    #[error("filter row does not reference a lead")]
    MissingLeadReference,
}

/// Builds a canonical lead from an untyped row.
pub fn normalize_lead(row: &Value) -> Result<BaseLead, DroppedReason> {
    let row = row.as_object().ok_or(DroppedReason::NotAnObject)?;
    let id = rows::text(row, &["id"]).ok_or(DroppedReason::MissingId)?;

    let raw_status = rows::text(row, &["status_pipeline", "status"]);
    let (status_pipeline, unrecognized_status) = match raw_status {
        Some(raw) => match PipelineStatus::parse(&raw) {
            Some(status) => (status, None),
            None => {
                warn!(lead_id = %id, status = %raw, "unrecognized pipeline status, treating as new_match");
                (PipelineStatus::NewMatch, Some(raw))
            }
        },
        None => (PipelineStatus::NewMatch, None),
    };

    Ok(BaseLead {
        id: LeadId(id),
        name: rows::text(row, &["name"]).unwrap_or_default(),
        status_pipeline,
        unrecognized_status,
        closed_outcome: rows::text(row, &["closed_outcome"])
            .as_deref()
            .and_then(ClosedOutcome::parse),
        lost_reason: rows::text(row, &["lost_reason"]),
        contact: contact_info(row),
        added_at: rows::date(row, &["added_at"]),
        created_at: rows::date(row, &["created_at"]),
        next_action_at: rows::date(row, &["next_action_at"]),
        chase_due_at: rows::date(row, &["chase_due_at"]),
        next_followup_at: rows::date(row, &["next_followup_at"]),
        last_contact_at: rows::date(row, &["last_contact_at"]),
        last_reply_at: rows::date(row, &["last_reply_at"]),
        last_status_change_at: rows::date(row, &["last_status_change_at"]),
        context_description: rows::text(row, &["context_description"]),
    })
}

/// Contact info only counts when it is an object carrying an email or phone string.
fn contact_info(row: &Row) -> Option<ContactInfo> {
    let contact = rows::lookup(row, &["contact", "contact_info"])?.as_object()?;
    let field = |key: &str| {
        contact
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let email = field("email");
    let phone = field("phone");
    if email.is_none() && phone.is_none() {
        return None;
    }

    Some(ContactInfo { email, phone })
}

/// Builds a saved search from an untyped row, keyed by the lead it belongs to.
pub fn normalize_filter(row: &Value) -> Result<(LeadId, LeadFilter), DroppedReason> {
    let row = row.as_object().ok_or(DroppedReason::NotAnObject)?;
    let lead_id = rows::text(row, &["lead_id"]).ok_or(DroppedReason::MissingLeadReference)?;

    let filter = LeadFilter {
        active: rows::flag(row, &["active", "is_active"]).unwrap_or(true),
        min_price: rows::number(row, &["min_price"]),
        max_price: rows::number(row, &["max_price"]),
        min_bedrooms: rows::number(row, &["min_bedrooms"]),
        min_bathrooms: rows::number(row, &["min_bathrooms"]),
        min_parking: rows::number(row, &["min_parking"]),
        min_area_m2: rows::number(row, &["min_area_m2"]),
        max_area_m2: rows::number(row, &["max_area_m2"]),
        neighborhoods: rows::string_set(row, &["neighborhoods"]),
        property_types: rows::string_set(row, &["property_types"]),
    };

    Ok((LeadId(lead_id), filter))
}
