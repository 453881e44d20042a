use serde_json::json;

use super::*;

fn sold_record(address: &str, lat: Value, lng: Value) -> Value {
    json!({
        "Publish": true,
        "Status": "Sold",
        "Latitude": lat,
        "Longitude": lng,
        "Price": 650_000,
        "priceRange": "$500k - $749k",
        "streetAddress": address,
        "City": "Des Moines",
        "State": "IA",
        "imageURL": "https://img.example.com/1.jpg",
        "ZillowURL": "https://www.zillow.com/homedetails/1",
        "yearSold": 2023,
        "Neighborhood": "Beaverdale"
    })
}

// -----------------------------------------------------------------------
// validate_record
// -----------------------------------------------------------------------

#[test]
fn validate_record_accepts_complete_sold_record() {
    let raw = sold_record("3012 Beaver Ave", json!(41.6126), json!(-93.6791));
    let listing = validate_record(&raw, &ListingFilter::default()).unwrap();
    assert_eq!(listing.street_address, "3012 Beaver Ave");
    assert_eq!(listing.position, LatLng::new(41.6126, -93.6791));
    assert_eq!(listing.status, ListingStatus::Sold);
    assert_eq!(listing.price, Some(650_000.0));
    assert_eq!(listing.year_sold.as_deref(), Some("2023"));
    assert_eq!(listing.neighborhood.as_deref(), Some("Beaverdale"));
}

#[test]
fn validate_record_accepts_string_coordinates_and_quoted_publish() {
    let mut raw = sold_record("1 Main St", json!("41.60"), json!("-93.61"));
    raw["Publish"] = json!("\"true\"");
    let listing = validate_record(&raw, &ListingFilter::default()).unwrap();
    assert_eq!(listing.position, LatLng::new(41.60, -93.61));
}

#[test]
fn validate_record_rejects_unpublished() {
    let mut raw = sold_record("1 Main St", json!(41.6), json!(-93.6));
    raw["Publish"] = json!(false);
    assert_eq!(
        validate_record(&raw, &ListingFilter::default()),
        Err(Rejection::Unpublished)
    );
    raw.as_object_mut().unwrap().remove("Publish");
    assert_eq!(
        validate_record(&raw, &ListingFilter::default()),
        Err(Rejection::Unpublished)
    );
}

#[test]
fn validate_record_rejects_status_mismatch_unless_all() {
    let mut raw = sold_record("1 Main St", json!(41.6), json!(-93.6));
    raw["Status"] = json!("Available");
    assert_eq!(
        validate_record(&raw, &ListingFilter::default()),
        Err(Rejection::StatusMismatch("Available".to_string()))
    );

    let all = ListingFilter {
        status: StatusFilter::All,
        ..ListingFilter::default()
    };
    let listing = validate_record(&raw, &all).unwrap();
    assert_eq!(listing.status, ListingStatus::Available);
}

#[test]
fn validate_record_rejects_missing_identity() {
    let mut raw = sold_record("1 Main St", json!(41.6), json!(-93.6));
    raw["City"] = json!("   ");
    assert_eq!(
        validate_record(&raw, &ListingFilter::default()),
        Err(Rejection::MissingIdentity("City"))
    );
}

#[test]
fn validate_record_rejects_missing_zero_and_garbage_coordinates() {
    let filter = ListingFilter::default();
    let no_lat = sold_record("1 Main St", Value::Null, json!(-93.6));
    assert_eq!(
        validate_record(&no_lat, &filter),
        Err(Rejection::MissingCoordinates)
    );
    let zero = sold_record("1 Main St", json!(0), json!(0));
    assert_eq!(
        validate_record(&zero, &filter),
        Err(Rejection::MissingCoordinates)
    );
    let garbage = sold_record("1 Main St", json!("north"), json!(-93.6));
    assert_eq!(
        validate_record(&garbage, &filter),
        Err(Rejection::MissingCoordinates)
    );
    let out_of_range = sold_record("1 Main St", json!(141.6), json!(-93.6));
    assert_eq!(
        validate_record(&out_of_range, &filter),
        Err(Rejection::InvalidCoordinates)
    );
}

#[test]
fn validate_record_missing_price_is_kept_as_none() {
    let mut raw = sold_record("1 Main St", json!(41.6), json!(-93.6));
    raw["Price"] = json!("TBD");
    let listing = validate_record(&raw, &ListingFilter::default()).unwrap();
    assert!(listing.price.is_none());
}

#[test]
fn validate_record_neighborhood_filter_beats_city_filter() {
    let raw = sold_record("1 Main St", json!(41.6), json!(-93.6));
    let filter = ListingFilter {
        neighborhood: Some("Sherman Hill".to_string()),
        city: Some("Des Moines".to_string()),
        ..ListingFilter::default()
    };
    assert_eq!(
        validate_record(&raw, &filter),
        Err(Rejection::OutsideLocation)
    );

    let city_only = ListingFilter {
        city: Some("Des Moines".to_string()),
        ..ListingFilter::default()
    };
    assert!(validate_record(&raw, &city_only).is_ok());
}

// -----------------------------------------------------------------------
// validate_feed
// -----------------------------------------------------------------------

#[test]
fn validate_feed_tolerates_arbitrary_junk() {
    let records = vec![
        json!(null),
        json!(42),
        json!("row"),
        json!([1, 2, 3]),
        json!({}),
        json!({"Publish": "true"}),
        sold_record("1 Main St", json!(41.6), json!(-93.6)),
    ];
    let feed = validate_feed(&records, &ListingFilter::default());
    assert_eq!(feed.listings.len(), 1);
    assert_eq!(feed.rejected, records.len() - 1);
}

#[test]
fn validate_feed_output_is_published_and_geolocated() {
    let mut unpublished = sold_record("2 Elm St", json!(41.7), json!(-93.7));
    unpublished["Publish"] = json!("false");
    let records = vec![
        sold_record("1 Main St", json!(41.6), json!(-93.6)),
        unpublished,
        sold_record("3 Oak St", json!("41.65"), json!("-93.65")),
    ];
    let feed = validate_feed(&records, &ListingFilter::default());
    assert!(feed.listings.len() <= records.len());
    assert_eq!(feed.listings.len(), 2);
    assert!(feed.listings.iter().all(|l| l.position.is_valid()));
}

#[test]
fn validate_feed_reads_positional_rows_through_header() {
    let records = vec![
        json!(["ID", "streetAddress", "City", "State", "Price", "Publish", "Status", "Latitude", "Longitude"]),
        json!([1, "10 Park Ave", "Ankeny", "IA", 410_000, true, "Sold", 41.73, -93.6]),
        json!([2, "12 Park Ave", "Ankeny", "IA", 415_000, false, "Sold", 41.73, -93.6]),
        json!("not a row"),
    ];
    let feed = validate_feed(&records, &ListingFilter::default());
    assert_eq!(feed.listings.len(), 1);
    assert_eq!(feed.rejected, 2);
    assert_eq!(feed.listings[0].city, "Ankeny");
    assert_eq!(feed.listings[0].price, Some(410_000.0));
}

#[test]
fn validate_feed_bad_leading_record_does_not_drop_keyed_records() {
    for leading in [json!([]), json!(["junk"])] {
        let records = vec![
            leading.clone(),
            sold_record("1 Main St", json!(41.6), json!(-93.6)),
            sold_record("2 Elm St", json!(41.7), json!(-93.7)),
        ];
        let feed = validate_feed(&records, &ListingFilter::default());
        assert_eq!(feed.listings.len(), 2, "leading {leading} dropped the batch");
        assert_eq!(feed.rejected, 1);
    }
}

#[test]
fn validate_feed_positional_mode_still_reads_keyed_objects() {
    let records = vec![
        json!(["streetAddress", "City", "State", "Publish", "Status", "Latitude", "Longitude"]),
        json!(["10 Park Ave", "Ankeny", "IA", true, "Sold", 41.73, -93.6]),
        sold_record("1 Main St", json!(41.6), json!(-93.6)),
    ];
    let feed = validate_feed(&records, &ListingFilter::default());
    assert_eq!(feed.listings.len(), 2);
    assert_eq!(feed.rejected, 0);
    assert_eq!(feed.listings[1].street_address, "1 Main St");
}

#[test]
fn validate_feed_empty_is_empty() {
    let feed = validate_feed(&[], &ListingFilter::default());
    assert!(feed.listings.is_empty());
    assert_eq!(feed.rejected, 0);
}
