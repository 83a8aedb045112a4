use super::text::fold_label;
use crate::workflows::crm::LeadDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub String);

/// Candidate property from the search pool. Numeric attributes are optional because
/// portals frequently leave them blank (e.g. bedrooms on land plots).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub price: Option<f64>,
    pub previous_price: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub parking: Option<f64>,
    pub area_m2: Option<f64>,
    pub neighborhood: Option<String>,
    pub property_type: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub badges: Vec<String>,
    pub published_at: Option<LeadDate>,
    pub updated_at: Option<LeadDate>,
}

impl Listing {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ListingId(id.into()),
            price: None,
            previous_price: None,
            bedrooms: None,
            bathrooms: None,
            parking: None,
            area_m2: None,
            neighborhood: None,
            property_type: None,
            is_active: true,
            badges: Vec::new(),
            published_at: None,
            updated_at: None,
        }
    }

    /// Asking price went down, either by comparing prices or via a portal badge.
    pub fn has_price_drop(&self) -> bool {
        let dropped = match (self.previous_price, self.price) {
            (Some(previous), Some(current)) => previous > current && current > 0.0,
            _ => false,
        };

        dropped
            || self.badges.iter().any(|badge| {
                matches!(
                    fold_label(badge).replace(['-', '_'], " ").as_str(),
                    "price drop" | "reducao de preco" | "baixou o preco" | "preco reduzido"
                )
            })
    }
}
