//! Column aliases for listing rows. Listing tables have drifted across schema versions;
//! each attribute lists its known column names, newest first, and the first present wins.

pub(crate) const ID: &[&str] = &["id", "listing_id", "external_id"];
pub(crate) const PRICE: &[&str] = &["price", "sale_price", "valor", "preco"];
pub(crate) const PREVIOUS_PRICE: &[&str] = &["previous_price", "old_price", "preco_anterior"];
pub(crate) const BEDROOMS: &[&str] = &["bedrooms", "quartos", "dormitorios"];
pub(crate) const BATHROOMS: &[&str] = &["bathrooms", "banheiros"];
pub(crate) const PARKING: &[&str] = &["parking", "parking_spaces", "vagas"];
pub(crate) const AREA: &[&str] = &["area_m2", "area", "useful_area", "area_util"];
pub(crate) const NEIGHBORHOOD: &[&str] = &["neighborhood", "bairro", "district"];
pub(crate) const PROPERTY_TYPE: &[&str] = &["property_type", "tipo", "type"];
pub(crate) const ACTIVE: &[&str] = &["is_active", "active"];
pub(crate) const BADGES: &[&str] = &["badges", "tags"];
pub(crate) const PUBLISHED_AT: &[&str] = &["published_at", "first_seen_at", "created_at"];
pub(crate) const UPDATED_AT: &[&str] = &["updated_at", "last_seen_at"];
