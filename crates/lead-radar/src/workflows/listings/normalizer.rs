use super::domain::{Listing, ListingId};
use super::mapping;
use crate::workflows::crm::DroppedReason;
use crate::workflows::rows;
use serde_json::Value;

/// Builds a listing from an untyped row, resolving columns through the alias table.
pub fn normalize_listing(row: &Value) -> Result<Listing, DroppedReason> {
    let row = row.as_object().ok_or(DroppedReason::NotAnObject)?;
    let id = rows::text(row, mapping::ID).ok_or(DroppedReason::MissingId)?;

    Ok(Listing {
        id: ListingId(id),
        price: rows::number(row, mapping::PRICE),
        previous_price: rows::number(row, mapping::PREVIOUS_PRICE),
        bedrooms: rows::number(row, mapping::BEDROOMS),
        bathrooms: rows::number(row, mapping::BATHROOMS),
        parking: rows::number(row, mapping::PARKING),
        area_m2: rows::number(row, mapping::AREA),
        neighborhood: rows::text(row, mapping::NEIGHBORHOOD),
        property_type: rows::text(row, mapping::PROPERTY_TYPE),
        is_active: rows::flag(row, mapping::ACTIVE).unwrap_or(true),
        badges: rows::string_set(row, mapping::BADGES).into_iter().collect(),
        published_at: rows::date(row, mapping::PUBLISHED_AT),
        updated_at: rows::date(row, mapping::UPDATED_AT),
    })
}
