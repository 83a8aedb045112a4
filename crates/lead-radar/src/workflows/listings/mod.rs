//! Listing pool: domain records, text folding, saved-search matching and CSV import.

pub mod domain;
mod import;
mod mapping;
mod matcher;
mod normalizer;
mod text;

pub use domain::{Listing, ListingId};
pub use import::{ListingImportError, ListingPoolImporter};
pub use matcher::{count_opportunities, listing_matches, OpportunityMatch};
pub use normalizer::normalize_listing;
pub use text::fold_label;
