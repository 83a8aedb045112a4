use lead_radar::workflows::crm::LeadFilter;
use lead_radar::workflows::listings::{
    count_opportunities, ListingPoolImporter, OpportunityMatch,
};

fn pool() -> Vec<lead_radar::workflows::listings::Listing> {
    let data = include_bytes!("../buscador_listings.csv");
    ListingPoolImporter::from_reader(&data[..]).expect("buscador export imports")
}

#[test]
fn importer_reads_buscador_export() {
    let listings = pool();

    assert_eq!(listings.len(), 7, "row without id is skipped");
    assert!(listings.iter().any(|listing| !listing.is_active));

    let plot = listings
        .iter()
        .find(|listing| listing.id.0 == "BR-1006")
        .expect("plot present");
    assert!(plot.price.is_none());
    assert_eq!(plot.bedrooms, Some(0.0));

    let badge_drop = listings
        .iter()
        .find(|listing| listing.id.0 == "BR-1005")
        .expect("badge listing present");
    assert!(badge_drop.has_price_drop());
    assert!(listings.iter().all(|listing| listing.published_at.is_some()));
}

#[test]
fn imported_pool_feeds_the_opportunity_matcher() {
    let mut search = LeadFilter {
        min_price: Some(450_000.0),
        max_price: Some(700_000.0),
        min_bedrooms: Some(2.0),
        ..LeadFilter::default()
    };
    search.neighborhoods.insert("Moema".to_string());
    search.neighborhoods.insert("Pinheiros".to_string());
    search.property_types.insert("apartamento".to_string());

    assert_eq!(
        count_opportunities(Some(&search), &pool()),
        OpportunityMatch {
            count: 3,
            price_drops: 2
        }
    );

    search.active = false;
    assert_eq!(count_opportunities(Some(&search), &pool()).count, 0);
}
