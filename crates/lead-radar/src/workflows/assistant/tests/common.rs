use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::workflows::assistant::{
    AssistantEngine, AssistantLimits, AssistantPayload, AssistantRequest, LeadSnapshot,
    SnapshotRows, TimezoneRegistry,
};

pub(super) const ZONE: &str = "America/Sao_Paulo";

/// 12:00 in São Paulo; local day is 2024-05-10.
pub(super) fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-10T15:00:00Z")
        .expect("valid now")
        .with_timezone(&Utc)
}

pub(super) fn engine() -> AssistantEngine {
    AssistantEngine::new(
        TimezoneRegistry::new(ZONE).expect("registry"),
        AssistantLimits::default(),
    )
}

pub(super) fn request() -> AssistantRequest {
    AssistantRequest::at(now())
}

pub(super) fn lead_rows() -> Value {
    json!([
        {
            "id": "l1",
            "name": "João Pedro",
            "status_pipeline": "awaiting_reply",
            "next_action_at": null,
            "chase_due_at": "2024-05-10",
            "added_at": "2024-05-02T15:00:00Z",
            "last_contact_at": "2024-05-02T15:00:00Z",
            "contact": { "phone": "+55 11 98888-0000" }
        },
        {
            "id": "l2",
            "name": "Ana Costa",
            "status_pipeline": "in_conversation",
            "next_action_at": "2024-05-08",
            "added_at": "2024-03-01T12:00:00Z",
            "last_contact_at": "2024-05-09T13:00:00Z",
            "last_reply_at": "2024-05-09T20:00:00Z"
        },
        {
            "id": "l3",
            "name": "Bruno Lima",
            "status_pipeline": "closed",
            "closed_outcome": "lost",
            "lost_reason": "comprou com outra imobiliária",
            "next_action_at": "2024-05-01",
            "added_at": "2024-05-09T15:00:00Z"
        },
        {
            "id": "l4",
            "name": "Carla",
            "status": "awaiting_response",
            "chase_due_at": "2024-05-12",
            "added_at": "2024-05-09T15:00:00Z",
            "last_contact_at": "2024-05-09T15:00:00Z"
        },
        {
            "id": "l5",
            "name": "Diego Souza",
            "status_pipeline": "qualified"
        },
        { "name": "linha sem id" }
    ])
}

pub(super) fn filter_rows() -> Value {
    json!([
        {
            "lead_id": "l1",
            "active": true,
            "min_price": 400000,
            "max_price": 700000,
            "min_bedrooms": 2,
            "neighborhoods": ["Moema", "Pinheiros"]
        },
        { "lead_id": "l4", "active": false, "max_price": 1000000 }
    ])
}

pub(super) fn listing_rows() -> Value {
    json!([
        { "id": "x1", "price": 500000, "previous_price": 550000, "bedrooms": 3, "neighborhood": "Moema" },
        { "id": "x2", "price": "650000", "bedrooms": 2, "neighborhood": "pinheiros" },
        { "id": "x3", "price": 900000, "bedrooms": 3, "neighborhood": "Moema" },
        { "id": "x4", "price": 600000, "bedrooms": 3, "neighborhood": "Moema", "is_active": false }
    ])
}

pub(super) fn rows() -> SnapshotRows {
    SnapshotRows {
        leads: lead_rows(),
        filters: filter_rows(),
        listings: listing_rows(),
    }
}

pub(super) fn snapshot() -> LeadSnapshot {
    LeadSnapshot::from_rows(&rows()).expect("snapshot")
}

pub(super) fn payload() -> AssistantPayload {
    engine().run(&snapshot(), &request()).expect("payload")
}

pub(super) fn request_body() -> Value {
    json!({
        "leads": lead_rows(),
        "filters": filter_rows(),
        "listings": listing_rows(),
        "now": "2024-05-10T15:00:00Z",
        "timezone": ZONE
    })
}
