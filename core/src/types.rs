//! Shared primitive types used across the whole crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned when a stored enum string no longer matches a known value.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ParseEnumError(pub String);

/// A stable, unique identifier for a complaint document.
pub type ComplaintId = String;

/// The caller-supplied identity of a submitter. Opaque to this crate.
pub type UserId = String;

/// The complaint status progression.
/// `classified` is only ever set by the explicit classify transition;
/// `update_status` accepts any value from any state (admins may revert).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    New,
    Classified,
    UnderAction,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Classified => "classified",
            Self::UnderAction => "under_action",
            Self::Resolved => "resolved",
        }
    }

    /// Human form for bot replies: "UNDER ACTION" rather than "under_action".
    pub fn display(&self) -> String {
        self.as_str().replace('_', " ").to_uppercase()
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "classified" => Ok(Self::Classified),
            "under_action" => Ok(Self::UnderAction),
            "resolved" => Ok(Self::Resolved),
            other => Err(ParseEnumError(format!("unknown status '{other}'"))),
        }
    }
}

/// Resolution priority assigned by the classifier.
/// Unclassified complaints display as Medium at the presentation boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(ParseEnumError(format!("unknown priority '{other}'"))),
        }
    }
}

/// A raw (latitude, longitude) pair as submitted by the client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}
