mod support;

use std::sync::Arc;

use support::{FlakyCoreRepository, FlakyDetailStore};
use transitsync::geo::{self, GeoPoint};
use transitsync::{EntitySynchronizer, FilterCriteria, NewRecord, SyncError, entities};

// Along a meridian one kilometer is roughly 1/111.195 of a degree, so
// these offsets sit at ~0, ~3 and ~8 km from the origin.
const ORIGIN: GeoPoint = GeoPoint { lat: 0.0, lng: 0.0 };
const AT_0_KM: &str = "0.0,0.0";
const AT_3_KM: &str = "0.026980,0.0";
const AT_8_KM: &str = "0.071946,0.0";

async fn seed_stations(sync: &EntitySynchronizer, rows: &[(&str, &str)]) {
    for (name, location) in rows {
        sync.create(
            NewRecord::new("active")
                .field("name", *name)
                .field("location", *location),
            None,
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn radius_filter_returns_sorted_subset() {
    let details = Arc::new(FlakyDetailStore::new());
    let records = Arc::new(FlakyCoreRepository::new());
    let stations = EntitySynchronizer::new(entities::station(), details, records);

    seed_stations(
        &stations,
        &[("far", AT_8_KM), ("near", AT_3_KM), ("here", AT_0_KM)],
    )
    .await;

    let hits = stations
        .find_nearby(&FilterCriteria::new(), ORIGIN, Some(5.0))
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(
        hits[0].record.coordinate("location").unwrap(),
        AT_0_KM
    );
    assert_eq!(hits[1].record.coordinate("location").unwrap(), AT_3_KM);
    assert!(hits[0].distance_km < 0.01);
    assert!((hits[1].distance_km - 3.0).abs() < 0.01);
}

#[tokio::test]
async fn unparseable_coordinates_are_skipped_not_fatal() {
    let details = Arc::new(FlakyDetailStore::new());
    let records = Arc::new(FlakyCoreRepository::new());
    let stations = EntitySynchronizer::new(entities::station(), details, records);

    seed_stations(
        &stations,
        &[
            ("ok", AT_3_KM),
            ("garbage", "not-a-coordinate"),
            ("out-of-range", "95.0,10.0"),
        ],
    )
    .await;
    // A record with no coordinate field at all.
    stations
        .create(NewRecord::new("active").field("name", "no-location"), None)
        .await
        .unwrap();

    let hits = stations
        .find_nearby(&FilterCriteria::new(), ORIGIN, Some(50.0))
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.coordinate("location").unwrap(), AT_3_KM);
}

#[tokio::test]
async fn equidistant_records_keep_input_order() {
    let details = Arc::new(FlakyDetailStore::new());
    let records = Arc::new(FlakyCoreRepository::new());
    let stations = EntitySynchronizer::new(entities::station(), details, records);

    // Same coordinates, inserted in id order; the stable sort must keep
    // that order among ties.
    seed_stations(
        &stations,
        &[("first", AT_3_KM), ("second", AT_3_KM), ("third", AT_3_KM)],
    )
    .await;

    let hits = stations
        .find_nearby(&FilterCriteria::new(), ORIGIN, Some(5.0))
        .await
        .unwrap();

    let ids: Vec<_> = hits.iter().map(|hit| hit.record.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn descriptor_default_radius_applies() {
    let details = Arc::new(FlakyDetailStore::new());
    let records = Arc::new(FlakyCoreRepository::new());
    // Stations default to a 2 km radius.
    let stations = EntitySynchronizer::new(entities::station(), details, records);

    seed_stations(&stations, &[("here", AT_0_KM), ("near", AT_3_KM)]).await;

    let hits = stations
        .find_nearby(&FilterCriteria::new(), ORIGIN, None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].distance_km < 0.01);
}

#[tokio::test]
async fn criteria_narrow_the_candidate_set() {
    let details = Arc::new(FlakyDetailStore::new());
    let records = Arc::new(FlakyCoreRepository::new());
    let stations = EntitySynchronizer::new(entities::station(), details, records);

    stations
        .create(
            NewRecord::new("active")
                .field("name", "open")
                .field("location", AT_0_KM),
            None,
        )
        .await
        .unwrap();
    stations
        .create(
            NewRecord::new("inactive")
                .field("name", "closed")
                .field("location", AT_0_KM),
            None,
        )
        .await
        .unwrap();

    let hits = stations
        .find_nearby(&FilterCriteria::new().status("active"), ORIGIN, Some(5.0))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.status, "active");
}

#[tokio::test]
async fn non_spatial_entity_rejects_proximity_search() {
    let details = Arc::new(FlakyDetailStore::new());
    let records = Arc::new(FlakyCoreRepository::new());
    let messages = EntitySynchronizer::new(entities::message(), details, records);

    let err = messages
        .find_nearby(&FilterCriteria::new(), ORIGIN, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::UnsupportedOperation(_)));
}

#[test]
fn haversine_matches_codec_round_trip() {
    // The matcher and the codec agree on what a coordinate string means.
    let encoded = geo::encode(0.026980, 0.0);
    let point = geo::decode(&encoded).unwrap();
    let d = geo::haversine_km(ORIGIN, point);
    assert!((d - 3.0).abs() < 0.01);
}
