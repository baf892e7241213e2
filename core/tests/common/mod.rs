//! Shared test fixtures: in-memory desk, fixed clock, fake collaborators.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use grievance_core::{
    classifier::Classifier,
    clock::FixedClock,
    config::DeskConfig,
    geocode::Geocoder,
    lifecycle::{ComplaintLifecycle, NewComplaint},
    store::DeskStore,
};

pub fn data_dir() -> String {
    format!("{}/../data", env!("CARGO_MANIFEST_DIR"))
}

pub fn config() -> DeskConfig {
    DeskConfig::load(&data_dir()).expect("data directory should load")
}

/// A fixed reference instant for clock-driven tests.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn desk(clock: &FixedClock) -> ComplaintLifecycle {
    desk_with(clock, None, None)
}

pub fn desk_with(
    clock: &FixedClock,
    geocoder: Option<Box<dyn Geocoder>>,
    classifier: Option<Box<dyn Classifier>>,
) -> ComplaintLifecycle {
    let store = DeskStore::in_memory().unwrap();
    store.migrate().unwrap();
    let mut lifecycle =
        ComplaintLifecycle::new(store, Box::new(clock.clone()), config().deadlines);
    if let Some(g) = geocoder {
        lifecycle = lifecycle.with_geocoder(g);
    }
    if let Some(c) = classifier {
        lifecycle = lifecycle.with_classifier(c);
    }
    lifecycle
}

pub fn submission(user_id: &str, description: &str) -> NewComplaint {
    NewComplaint {
        user_id: user_id.to_string(),
        user_name: "Asha Verma".to_string(),
        description: description.to_string(),
        ..Default::default()
    }
}

pub struct FixedGeocoder(pub &'static str);

impl Geocoder for FixedGeocoder {
    fn reverse(&self, _lat: f64, _lng: f64) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}

pub struct FailingGeocoder;

impl Geocoder for FailingGeocoder {
    fn reverse(&self, _lat: f64, _lng: f64) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("geocode service unreachable"))
    }
}

pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn classify(
        &self,
        _description: &str,
    ) -> anyhow::Result<grievance_core::classifier::Classification> {
        Err(anyhow::anyhow!("classifier timed out"))
    }
}
