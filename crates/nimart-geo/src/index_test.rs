use super::*;
use crate::types::VerificationFilter;

const ORIGIN: GeoPoint = GeoPoint {
    lat: 6.5244,
    lng: 3.3792,
};

/// Roughly `km` kilometres due north of [`ORIGIN`].
fn north_of_origin(km: f64) -> (f64, f64) {
    (ORIGIN.lat + km / 111.195, ORIGIN.lng)
}

fn provider(id: &str, at: Option<(f64, f64)>, status: VerificationStatus) -> Provider {
    let mut p = Provider::new(id);
    if let Some((lat, lng)) = at {
        p.latitude = Some(lat);
        p.longitude = Some(lng);
    }
    p.verification_status = status;
    p
}

/// A provider `km` kilometres north of [`ORIGIN`].
fn near(id: &str, km: f64, status: VerificationStatus) -> Provider {
    provider(id, Some(north_of_origin(km)), status)
}

fn ids(entries: &[IndexedProvider]) -> Vec<&str> {
    entries.iter().map(|e| e.provider.id.as_str()).collect()
}

fn radius_fixture() -> Vec<Provider> {
    vec![
        near("p1", 5.0, VerificationStatus::Verified),
        near("p2", 50.0, VerificationStatus::Verified),
        provider("p3", None, VerificationStatus::Verified),
    ]
}

fn criteria() -> MapFilterCriteria {
    MapFilterCriteria::default()
}

#[test]
fn empty_input_gives_empty_output() {
    let index = GeoIndex::build(Vec::new(), Some(ORIGIN));
    assert!(index.is_empty());
    assert!(index.filter(&criteria()).is_empty());
    assert!(index.sort_by_distance().is_empty());
    assert!(discover(Vec::new(), Some(ORIGIN), &criteria()).is_empty());
}

#[test]
fn build_attaches_distance_only_with_origin_and_location() {
    let index = GeoIndex::build(radius_fixture(), Some(ORIGIN));
    let d: Vec<Option<f64>> = index.entries().iter().map(|e| e.distance_km).collect();
    assert!(d[0].is_some_and(|km| (km - 5.0).abs() < 0.1), "{d:?}");
    assert!(d[1].is_some_and(|km| (km - 50.0).abs() < 0.5), "{d:?}");
    assert_eq!(d[2], None);

    let index = GeoIndex::build(radius_fixture(), None);
    assert!(index.entries().iter().all(|e| e.distance_km.is_none()));
}

#[test]
fn build_ignores_an_invalid_origin() {
    let index = GeoIndex::build(
        radius_fixture(),
        Some(GeoPoint {
            lat: f64::NAN,
            lng: 3.0,
        }),
    );
    assert!(index.origin().is_none());
    assert!(index.entries().iter().all(|e| e.distance_km.is_none()));
}

#[test]
fn radius_filter_keeps_only_nearby_located_providers() {
    let index = GeoIndex::build(radius_fixture(), Some(ORIGIN));
    let c = MapFilterCriteria {
        max_distance_km: 10.0,
        ..criteria()
    };
    assert_eq!(ids(&index.filter(&c)), vec!["p1"]);
}

#[test]
fn radius_filter_is_a_no_op_without_origin() {
    let index = GeoIndex::build(radius_fixture(), None);
    let c = MapFilterCriteria {
        max_distance_km: 10.0,
        ..criteria()
    };
    assert_eq!(ids(&index.filter(&c)), vec!["p1", "p2", "p3"]);
}

#[test]
fn zero_radius_keeps_only_providers_at_the_origin() {
    let providers = vec![
        provider(
            "here",
            Some((ORIGIN.lat, ORIGIN.lng)),
            VerificationStatus::Verified,
        ),
        near("near", 0.5, VerificationStatus::Verified),
    ];
    let index = GeoIndex::build(providers, Some(ORIGIN));
    let c = MapFilterCriteria {
        max_distance_km: 0.0,
        ..criteria()
    };
    assert_eq!(ids(&index.filter(&c)), vec!["here"]);
}

#[test]
fn negative_radius_selects_nothing() {
    let index = GeoIndex::build(radius_fixture(), Some(ORIGIN));
    let c = MapFilterCriteria {
        max_distance_km: -1.0,
        ..criteria()
    };
    assert!(index.filter(&c).is_empty());
}

#[test]
fn service_type_is_case_insensitive_substring() {
    let mut plumber = provider("a", None, VerificationStatus::Verified);
    plumber.service_type = Some("Plumbing & Pipe Repair".to_string());
    let mut electrician = provider("b", None, VerificationStatus::Verified);
    electrician.service_type = Some("Electrician".to_string());
    let untyped = provider("c", None, VerificationStatus::Verified);

    let index = GeoIndex::build(vec![plumber, electrician, untyped], None);
    let c = MapFilterCriteria {
        service_type: Some("PLUMB".to_string()),
        ..criteria()
    };
    assert_eq!(ids(&index.filter(&c)), vec!["a"]);

    let blank = MapFilterCriteria {
        service_type: Some("   ".to_string()),
        ..criteria()
    };
    assert_eq!(index.filter(&blank).len(), 3);
}

#[test]
fn verification_filter_is_exact() {
    let index = GeoIndex::build(
        vec![
            provider("v", None, VerificationStatus::Verified),
            provider("u", None, VerificationStatus::Unverified),
            provider("p", None, VerificationStatus::Pending),
            provider("x", None, VerificationStatus::Unknown),
        ],
        None,
    );
    let pick = |f: VerificationFilter| {
        let c = MapFilterCriteria {
            verification_status: f,
            ..criteria()
        };
        ids(&index.filter(&c))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>()
    };
    assert_eq!(pick(VerificationFilter::Verified), vec!["v"]);
    assert_eq!(pick(VerificationFilter::Unverified), vec!["u"]);
    assert_eq!(pick(VerificationFilter::Pending), vec!["p"]);
    assert_eq!(pick(VerificationFilter::All).len(), 4);
}

#[test]
fn rating_threshold_is_inclusive() {
    let mut four = provider("four", None, VerificationStatus::Verified);
    four.rating = Some(4.0);
    let mut three = provider("three", None, VerificationStatus::Verified);
    three.rating = Some(3.9);
    let unrated = provider("unrated", None, VerificationStatus::Verified);

    let index = GeoIndex::build(vec![four, three, unrated], None);
    let c = MapFilterCriteria {
        min_rating: 4.0,
        ..criteria()
    };
    assert_eq!(ids(&index.filter(&c)), vec!["four"]);

    // Unrated providers count as 0 and pass a zero threshold.
    assert_eq!(index.filter(&criteria()).len(), 3);
}

#[test]
fn raising_min_rating_never_grows_the_result() {
    let providers: Vec<Provider> = (0..=10)
        .map(|i| {
            let mut p = provider(
                &format!("p{i}"),
                Some(north_of_origin(f64::from(i))),
                VerificationStatus::Verified,
            );
            p.rating = Some(f64::from(i) / 2.0);
            p
        })
        .collect();
    let index = GeoIndex::build(providers, Some(ORIGIN));

    let mut previous = usize::MAX;
    for step in 0..=12 {
        let c = MapFilterCriteria {
            min_rating: f64::from(step) / 2.0,
            ..criteria()
        };
        let n = index.filter(&c).len();
        assert!(n <= previous, "min_rating {} grew result", c.min_rating);
        previous = n;
    }
    assert_eq!(previous, 0);
}

#[test]
fn online_only_requires_online_flag() {
    let mut online = provider("on", None, VerificationStatus::Verified);
    online.is_online = Some(true);
    let offline = provider("off", None, VerificationStatus::Verified);

    let index = GeoIndex::build(vec![online, offline], None);
    let c = MapFilterCriteria {
        online_only: true,
        ..criteria()
    };
    assert_eq!(ids(&index.filter(&c)), vec!["on"]);
}

#[test]
fn sort_by_distance_drops_unlocated_and_is_stable() {
    let providers = vec![
        near("far", 30.0, VerificationStatus::Verified),
        provider("none", None, VerificationStatus::Verified),
        near("near-a", 2.0, VerificationStatus::Verified),
        near("near-b", 2.0, VerificationStatus::Verified),
    ];
    let index = GeoIndex::build(providers, Some(ORIGIN));
    assert_eq!(
        ids(&index.sort_by_distance()),
        vec!["near-a", "near-b", "far"]
    );
}

#[test]
fn sort_by_distance_without_origin_is_empty() {
    let index = GeoIndex::build(radius_fixture(), None);
    assert!(index.sort_by_distance().is_empty());
}

#[test]
fn baseline_visibility_hides_demo_and_pending_email() {
    let mut demo = near("demo", 1.0, VerificationStatus::Demo);
    demo.map_visibility = Some(true);
    demo.rating = Some(5.0);
    let pending_email = near("pe", 1.0, VerificationStatus::PendingEmail);
    let mut hidden = near("hidden", 1.0, VerificationStatus::Verified);
    hidden.map_visibility = Some(false);
    let shown = near("shown", 1.0, VerificationStatus::Verified);

    assert!(!is_map_visible(&demo));
    assert!(!is_map_visible(&pending_email));
    assert!(!is_map_visible(&hidden));
    assert!(is_map_visible(&shown));

    let result = discover(
        vec![demo, pending_email, hidden, shown],
        Some(ORIGIN),
        &criteria(),
    );
    assert_eq!(ids(&result), vec!["shown"]);
}

#[test]
fn dedupe_keeps_first_record_per_id() {
    let mut first = provider("dup", None, VerificationStatus::Verified);
    first.business_name = Some("First".to_string());
    let mut second = provider("dup", None, VerificationStatus::Verified);
    second.business_name = Some("Second".to_string());
    let other = provider("other", None, VerificationStatus::Verified);

    let deduped = dedupe_by_id(vec![first, other, second]);
    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].business_name.as_deref(), Some("First"));
    assert_eq!(deduped[1].id, "other");
}

#[test]
fn hidden_first_record_is_not_revived_by_a_visible_duplicate() {
    let mut hidden = near("x", 1.0, VerificationStatus::Verified);
    hidden.map_visibility = Some(false);
    let visible = near("x", 2.0, VerificationStatus::Verified);
    let other = near("y", 3.0, VerificationStatus::Verified);

    let result = discover(vec![hidden, visible, other], Some(ORIGIN), &criteria());
    assert_eq!(ids(&result), vec!["y"]);
}

#[test]
fn demo_first_record_is_not_revived_by_a_verified_duplicate() {
    let demo = provider("x", None, VerificationStatus::Demo);
    let verified = provider("x", None, VerificationStatus::Verified);

    assert!(discover(vec![demo, verified], None, &criteria()).is_empty());
}

#[test]
fn discover_orders_by_distance_with_origin() {
    let providers = vec![
        near("b", 8.0, VerificationStatus::Verified),
        near("a", 3.0, VerificationStatus::Pending),
        provider("c", None, VerificationStatus::Verified),
    ];
    let result = discover(providers, Some(ORIGIN), &criteria());
    assert_eq!(ids(&result), vec!["a", "b"]);
}

#[test]
fn discover_keeps_input_order_without_origin() {
    let providers = vec![
        near("b", 8.0, VerificationStatus::Verified),
        provider("c", None, VerificationStatus::Unverified),
        near("a", 3.0, VerificationStatus::Pending),
    ];
    let result = discover(providers, None, &criteria());
    assert_eq!(ids(&result), vec!["b", "c", "a"]);
}
