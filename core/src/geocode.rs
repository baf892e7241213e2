//! Reverse-geocoding seam.
//!
//! The network lookup itself lives outside this crate; callers wire in an
//! implementation (or none). Lookups are best-effort with no retry — a
//! failure is absorbed into a placeholder address by the lifecycle.

/// Resolve a (lat, lng) pair to a display name.
pub trait Geocoder: Send {
    fn reverse(&self, lat: f64, lng: f64) -> anyhow::Result<String>;
}

/// Truncate a geocoder display name to its first three comma-separated
/// components. Full nominatim-style names run to a dozen components;
/// the first three are enough for a complaint card.
pub fn short_address(display_name: &str) -> String {
    display_name
        .split(", ")
        .take(3)
        .collect::<Vec<_>>()
        .join(", ")
}
