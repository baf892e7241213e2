//! Address resolution at submission time.

mod common;

use common::{desk, desk_with, epoch, submission, FailingGeocoder, FixedGeocoder};
use grievance_core::{
    clock::FixedClock,
    geocode::short_address,
    lifecycle::{NewComplaint, ADDRESS_LOOKUP_FAILED, ADDRESS_NOT_PROVIDED},
    types::GeoPoint,
};

fn located(user_id: &str, description: &str) -> NewComplaint {
    NewComplaint {
        location: Some(GeoPoint {
            lat: 26.76,
            lng: 83.37,
        }),
        ..submission(user_id, description)
    }
}

#[test]
fn geocoded_address_keeps_first_three_components() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk_with(
        &clock,
        Some(Box::new(FixedGeocoder(
            "Golghar, Gorakhpur, Uttar Pradesh, 273001, India",
        ))),
        None,
    );

    let record = lifecycle
        .submit(located("u1", "water leak near the pump house"))
        .unwrap();
    assert_eq!(record.address, "Golghar, Gorakhpur, Uttar Pradesh");
    assert_eq!(
        record.location,
        Some(GeoPoint {
            lat: 26.76,
            lng: 83.37
        })
    );
}

#[test]
fn short_display_names_pass_through_unchanged() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk_with(&clock, Some(Box::new(FixedGeocoder("X, Y, Z"))), None);

    let record = lifecycle
        .submit(located("u1", "water leak near the pump house"))
        .unwrap();
    assert_eq!(record.address, "X, Y, Z");
}

#[test]
fn geocoder_failure_substitutes_placeholder() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk_with(&clock, Some(Box::new(FailingGeocoder)), None);

    let record = lifecycle
        .submit(located("u1", "water leak near the pump house"))
        .unwrap();
    assert_eq!(record.address, ADDRESS_LOOKUP_FAILED);
}

#[test]
fn location_without_geocoder_reads_as_failed_lookup() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);

    let record = lifecycle
        .submit(located("u1", "water leak near the pump house"))
        .unwrap();
    assert_eq!(record.address, ADDRESS_LOOKUP_FAILED);
}

#[test]
fn missing_location_reads_as_not_provided() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk_with(&clock, Some(Box::new(FixedGeocoder("X, Y, Z"))), None);

    let record = lifecycle
        .submit(submission("u1", "water leak near the pump house"))
        .unwrap();
    assert_eq!(record.address, ADDRESS_NOT_PROVIDED);
}

#[test]
fn short_address_truncation() {
    assert_eq!(short_address("A, B, C, D"), "A, B, C");
    assert_eq!(short_address("A, B"), "A, B");
    assert_eq!(short_address("A"), "A");
}
