use super::domain::Listing;
use super::text::fold_label;
use crate::workflows::crm::LeadFilter;
use serde::Serialize;
use std::collections::BTreeSet;

/// Listings in a pool that satisfy a saved search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OpportunityMatch {
    pub count: usize,
    pub price_drops: usize,
}

/// Counts opportunities for a lead. Paused or missing searches never produce opportunities,
/// and inactive listings are skipped.
pub fn count_opportunities(filter: Option<&LeadFilter>, listings: &[Listing]) -> OpportunityMatch {
    let Some(filter) = filter.filter(|filter| filter.active) else {
        return OpportunityMatch::default();
    };

    let criteria = FoldedCriteria::new(filter);
    listings
        .iter()
        .filter(|listing| listing.is_active)
        .filter(|listing| criteria.matches(filter, listing))
        .fold(OpportunityMatch::default(), |mut acc, listing| {
            acc.count += 1;
            if listing.has_price_drop() {
                acc.price_drops += 1;
            }
            acc
        })
}

/// Whether a single listing satisfies every constraint of `filter` (the `active` flag is ignored).
pub fn listing_matches(filter: &LeadFilter, listing: &Listing) -> bool {
    FoldedCriteria::new(filter).matches(filter, listing)
}

struct FoldedCriteria {
    neighborhoods: BTreeSet<String>,
    property_types: BTreeSet<String>,
}

impl FoldedCriteria {
    fn new(filter: &LeadFilter) -> Self {
        Self {
            neighborhoods: fold_set(&filter.neighborhoods),
            property_types: fold_set(&filter.property_types),
        }
    }

    fn matches(&self, filter: &LeadFilter, listing: &Listing) -> bool {
        price_within(listing.price, filter.min_price, filter.max_price)
            && meets_minimum(listing.bedrooms, filter.min_bedrooms)
            && meets_minimum(listing.bathrooms, filter.min_bathrooms)
            && meets_minimum(listing.parking, filter.min_parking)
            && meets_minimum(listing.area_m2, filter.min_area_m2)
            && within_maximum(listing.area_m2, filter.max_area_m2)
            && in_folded_set(&self.neighborhoods, listing.neighborhood.as_deref())
            && in_folded_set(&self.property_types, listing.property_type.as_deref())
    }
}

fn fold_set(values: &BTreeSet<String>) -> BTreeSet<String> {
    values
        .iter()
        .map(|value| fold_label(value))
        .filter(|value| !value.is_empty())
        .collect()
}

/// Price bounds are enforced independently. A zero price is "not applicable" like any other
/// zero attribute; a missing or non-finite price cannot satisfy a bound.
fn price_within(price: Option<f64>, min: Option<f64>, max: Option<f64>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    let Some(price) = price.filter(|value| value.is_finite()) else {
        return false;
    };
    meets_minimum(Some(price), min) && max.map_or(true, |max| price <= max)
}

/// Zero or missing attributes mean "not applicable" and always pass.
fn meets_minimum(value: Option<f64>, minimum: Option<f64>) -> bool {
    match (applicable(value), minimum) {
        (Some(value), Some(minimum)) => value >= minimum,
        _ => true,
    }
}

fn within_maximum(value: Option<f64>, maximum: Option<f64>) -> bool {
    match (applicable(value), maximum) {
        (Some(value), Some(maximum)) => value <= maximum,
        _ => true,
    }
}

fn applicable(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite() && *value != 0.0)
}

fn in_folded_set(allowed: &BTreeSet<String>, value: Option<&str>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    value.map_or(false, |value| allowed.contains(&fold_label(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, price: f64, bedrooms: f64, neighborhood: &str) -> Listing {
        let mut listing = Listing::new(id);
        listing.price = Some(price);
        listing.bedrooms = Some(bedrooms);
        listing.neighborhood = Some(neighborhood.to_string());
        listing.property_type = Some("Apartamento".to_string());
        listing
    }

    fn filter() -> LeadFilter {
        LeadFilter {
            min_price: Some(400_000.0),
            max_price: Some(700_000.0),
            min_bedrooms: Some(2.0),
            ..LeadFilter::default()
        }
    }

    #[test]
    fn zero_bedrooms_passes_minimum() {
        let plot = listing("plot", 500_000.0, 0.0, "Moema");
        assert!(listing_matches(&filter(), &plot));
    }

    #[test]
    fn missing_and_non_finite_minimums_pass() {
        let mut unknown = listing("unknown", 500_000.0, 1.0, "Moema");
        unknown.bedrooms = None;
        assert!(listing_matches(&filter(), &unknown));

        unknown.bedrooms = Some(f64::NAN);
        assert!(listing_matches(&filter(), &unknown));

        unknown.bedrooms = Some(1.0);
        assert!(!listing_matches(&filter(), &unknown));
    }

    #[test]
    fn price_bounds_are_enforced_independently() {
        let only_min = LeadFilter {
            min_price: Some(400_000.0),
            ..LeadFilter::default()
        };
        assert!(listing_matches(&only_min, &listing("a", 2_000_000.0, 3.0, "Moema")));
        assert!(!listing_matches(&only_min, &listing("b", 399_999.0, 3.0, "Moema")));

        let only_max = LeadFilter {
            max_price: Some(400_000.0),
            ..LeadFilter::default()
        };
        assert!(listing_matches(&only_max, &listing("c", 400_000.0, 3.0, "Moema")));

        let mut unpriced = listing("d", 0.0, 3.0, "Moema");
        unpriced.price = None;
        assert!(!listing_matches(&only_max, &unpriced));
        assert!(listing_matches(&LeadFilter::default(), &unpriced));
    }

    #[test]
    fn zero_price_passes_minimum_price() {
        let search = LeadFilter {
            min_price: Some(300_000.0),
            ..LeadFilter::default()
        };
        assert!(listing_matches(&search, &listing("ask", 0.0, 2.0, "Moema")));
        assert!(listing_matches(&filter(), &listing("ask", 0.0, 2.0, "Moema")));
        assert!(!listing_matches(&search, &listing("low", 250_000.0, 2.0, "Moema")));
    }

    #[test]
    fn area_maximum_treats_zero_as_unknown() {
        let compact = LeadFilter {
            max_area_m2: Some(60.0),
            ..LeadFilter::default()
        };
        let mut unit = listing("a", 1.0, 1.0, "Centro");
        unit.area_m2 = Some(0.0);
        assert!(listing_matches(&compact, &unit));
        unit.area_m2 = Some(75.0);
        assert!(!listing_matches(&compact, &unit));
    }

    #[test]
    fn neighborhoods_match_without_case_or_accents() {
        let mut search = filter();
        search.neighborhoods.insert("Jardim Paulísta".to_string());
        assert!(listing_matches(
            &search,
            &listing("a", 500_000.0, 2.0, "JARDIM PAULISTA")
        ));
        assert!(!listing_matches(
            &search,
            &listing("b", 500_000.0, 2.0, "Vila Olimpia")
        ));

        let mut homeless = listing("c", 500_000.0, 2.0, "x");
        homeless.neighborhood = None;
        assert!(!listing_matches(&search, &homeless));
    }

    #[test]
    fn property_types_are_members_after_folding() {
        let mut search = LeadFilter::default();
        search.property_types.insert("apartamento".to_string());
        assert!(listing_matches(&search, &listing("a", 1.0, 1.0, "x")));

        let mut house = listing("b", 1.0, 1.0, "x");
        house.property_type = Some("Casa".to_string());
        assert!(!listing_matches(&search, &house));
    }

    #[test]
    fn paused_or_missing_search_counts_nothing() {
        let pool = vec![listing("a", 500_000.0, 3.0, "Moema")];
        let paused = LeadFilter {
            active: false,
            ..filter()
        };
        assert_eq!(count_opportunities(Some(&paused), &pool).count, 0);
        assert_eq!(count_opportunities(None, &pool).count, 0);
        assert_eq!(count_opportunities(Some(&filter()), &pool).count, 1);
    }

    #[test]
    fn counts_skip_inactive_listings_and_track_price_drops() {
        let mut dropped = listing("a", 500_000.0, 3.0, "Moema");
        dropped.previous_price = Some(550_000.0);
        let mut withdrawn = listing("b", 500_000.0, 3.0, "Moema");
        withdrawn.is_active = false;
        let regular = listing("c", 600_000.0, 2.0, "Moema");

        let found = count_opportunities(Some(&filter()), &[dropped, withdrawn, regular]);
        assert_eq!(
            found,
            OpportunityMatch {
                count: 2,
                price_drops: 1
            }
        );
    }
}
