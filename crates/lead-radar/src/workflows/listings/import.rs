use super::domain::{Listing, ListingId};
use crate::workflows::crm::LeadDate;
use crate::workflows::rows::{parse_flag, split_list};
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ListingImportError {
    #[error("failed to read listing export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid listing CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads listing pools exported from the search screen as CSV.
pub struct ListingPoolImporter;

impl ListingPoolImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Listing>, ListingImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Listing>, ListingImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut listings = Vec::new();

        for record in csv_reader.deserialize::<ListingRow>() {
            let row = record?;
            if let Some(listing) = row.into_listing() {
                listings.push(listing);
            }
        }

        Ok(listings)
    }
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    previous_price: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bedrooms: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bathrooms: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    parking: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    area_m2: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    neighborhood: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    property_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_active: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    badges: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    published_at: Option<String>,
}

impl ListingRow {
    /// Rows without an id are skipped rather than failing the import.
    fn into_listing(self) -> Option<Listing> {
        let id = self.id?;
        Some(Listing {
            id: ListingId(id),
            price: parse_number(self.price.as_deref()),
            previous_price: parse_number(self.previous_price.as_deref()),
            bedrooms: parse_number(self.bedrooms.as_deref()),
            bathrooms: parse_number(self.bathrooms.as_deref()),
            parking: parse_number(self.parking.as_deref()),
            area_m2: parse_number(self.area_m2.as_deref()),
            neighborhood: self.neighborhood,
            property_type: self.property_type,
            is_active: self
                .is_active
                .as_deref()
                .and_then(parse_flag)
                .unwrap_or(true),
            badges: self
                .badges
                .as_deref()
                .map(|raw| split_list(raw, '|').into_iter().collect())
                .unwrap_or_default(),
            published_at: self.published_at.as_deref().and_then(LeadDate::parse),
            updated_at: None,
        })
    }
}

fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|number| number.is_finite())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_rows_and_blank_cells() {
        let csv = "id,price,previous_price,bedrooms,bathrooms,parking,area_m2,neighborhood,property_type,is_active,badges,published_at\n\
a1,480000,520000,2,1,1,64,Moema,Apartamento,true,novo|price_drop,2024-04-28T10:00:00Z\n\
a2,,,,,,,Centro,Terreno,,,\n";
        let listings = ListingPoolImporter::from_reader(Cursor::new(csv)).expect("import");

        assert_eq!(listings.len(), 2);
        let first = &listings[0];
        assert_eq!(first.price, Some(480_000.0));
        assert!(first.has_price_drop());
        assert_eq!(first.badges.len(), 2);
        assert!(first.published_at.is_some());

        let plot = &listings[1];
        assert!(plot.price.is_none());
        assert!(plot.bedrooms.is_none());
        assert!(plot.is_active);
    }

    #[test]
    fn skips_rows_without_id_and_reads_inactive_flag() {
        let csv = "id,price,is_active\n,100,true\nb1,200,false\n";
        let listings = ListingPoolImporter::from_reader(Cursor::new(csv)).expect("import");
        assert_eq!(listings.len(), 1);
        assert!(!listings[0].is_active);
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = ListingPoolImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        match error {
            ListingImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
