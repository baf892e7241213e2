//! Complaint lifecycle — creation, status transitions, classification,
//! and derived read-time fields.
//!
//! RULE: derived fields (elapsed time, overdue, display defaults) are
//! recomputed on every read from the injected clock. The stored `overdue`
//! column is a convenience flag for dashboard queries; reads never trust it.

use crate::{
    classifier::Classifier,
    clock::Clock,
    config::DeadlinePolicy,
    error::{GrievanceError, GrievanceResult},
    geocode::{self, Geocoder},
    store::DeskStore,
    types::{ComplaintId, ComplaintStatus, GeoPoint, Priority, UserId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ADDRESS_NOT_PROVIDED: &str = "Location not provided";
pub const ADDRESS_LOOKUP_FAILED: &str = "Location provided but address lookup failed";
pub const DEPARTMENT_UNASSIGNED: &str = "Unassigned";

const DEFAULT_MOBILE: &str = "Not provided";
const DEFAULT_ACTOR: &str = "Admin";
const CLASSIFIER_ACTOR: &str = "Classifier";

/// One entry of the append-only audit trail on a complaint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub complaint_id: ComplaintId,
    pub user_id: UserId,
    pub user_name: String,
    pub mobile: String,
    pub description: String,
    pub location: Option<GeoPoint>,
    pub address: String,
    pub image_name: Option<String>,
    pub has_image: bool,
    pub department: Option<String>,
    pub priority: Option<Priority>,
    pub status: ComplaintStatus,
    pub actions: Vec<ActionEntry>,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub overdue: bool,
    pub last_updated: DateTime<Utc>,
}

/// Submission input. `mobile`, `location` and `image_name` are optional.
#[derive(Debug, Clone, Default)]
pub struct NewComplaint {
    pub user_id: String,
    pub user_name: String,
    pub mobile: Option<String>,
    pub description: String,
    pub location: Option<GeoPoint>,
    pub image_name: Option<String>,
}

/// Read model: the stored record plus fields computed at read time.
#[derive(Debug, Clone, Serialize)]
pub struct ComplaintView {
    #[serde(flatten)]
    pub record: ComplaintRecord,
    pub hours_passed: i64,
    pub time_passed: String,
    pub is_overdue: bool,
    /// `department` with the "Unassigned" default applied.
    pub display_department: String,
    /// `priority` with the Medium default applied.
    pub display_priority: Priority,
}

/// Equality filters for the admin listing. Filtering happens in memory:
/// the store contract only guarantees equality filters on `user_id`.
#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub status: Option<ComplaintStatus>,
    pub department: Option<String>,
}

impl ComplaintFilter {
    fn matches(&self, record: &ComplaintRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(ref department) = self.department {
            let assigned = record
                .department
                .as_deref()
                .unwrap_or(DEPARTMENT_UNASSIGNED);
            if assigned != department {
                return false;
            }
        }
        true
    }
}

/// Per-status complaint counts.
#[derive(Debug, Clone, Serialize)]
pub struct DeskStats {
    pub total: i64,
    pub new: i64,
    pub classified: i64,
    pub under_action: i64,
    pub resolved: i64,
}

pub struct ComplaintLifecycle {
    store: DeskStore,
    clock: Box<dyn Clock>,
    geocoder: Option<Box<dyn Geocoder>>,
    classifier: Option<Box<dyn Classifier>>,
    deadlines: DeadlinePolicy,
}

impl ComplaintLifecycle {
    pub fn new(store: DeskStore, clock: Box<dyn Clock>, deadlines: DeadlinePolicy) -> Self {
        Self {
            store,
            clock,
            geocoder: None,
            classifier: None,
            deadlines,
        }
    }

    pub fn with_geocoder(mut self, geocoder: Box<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_classifier(mut self, classifier: Box<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Create a complaint. The record lands with `status = new` and a single
    /// "Complaint Submitted" action; geocoding and classification are
    /// best-effort and never fail the submission. If the final persist
    /// fails, nothing is stored.
    pub fn submit(&self, input: NewComplaint) -> GrievanceResult<ComplaintRecord> {
        if input.user_id.trim().is_empty() {
            return Err(GrievanceError::Validation { field: "user_id" });
        }
        if input.user_name.trim().is_empty() {
            return Err(GrievanceError::Validation { field: "user_name" });
        }
        if input.description.trim().is_empty() {
            return Err(GrievanceError::Validation { field: "description" });
        }

        let now = self.clock.now();

        let address = match input.location {
            None => ADDRESS_NOT_PROVIDED.to_string(),
            Some(point) => self.resolve_address(point),
        };

        let mut department = None;
        let mut priority = None;
        let mut deadline = None;
        if let Some(classifier) = &self.classifier {
            match classifier.classify(&input.description) {
                Ok(c) => {
                    deadline = Some(now + self.deadlines.window_for(c.priority));
                    department = Some(c.department);
                    priority = Some(c.priority);
                }
                Err(e) => {
                    log::warn!("Classification failed, complaint left unclassified: {e}");
                }
            }
        }

        let record = ComplaintRecord {
            complaint_id: uuid::Uuid::new_v4().to_string(),
            user_id: input.user_id,
            user_name: input.user_name.clone(),
            mobile: input.mobile.unwrap_or_else(|| DEFAULT_MOBILE.to_string()),
            description: input.description,
            location: input.location,
            address,
            has_image: input.image_name.is_some(),
            image_name: input.image_name,
            department,
            priority,
            status: ComplaintStatus::New,
            actions: vec![ActionEntry {
                action: "Complaint Submitted".to_string(),
                timestamp: now,
                by: input.user_name,
            }],
            created_at: now,
            deadline,
            overdue: false,
            last_updated: now,
        };

        self.store.insert_complaint(&record)?;
        log::info!(
            "Complaint {} submitted by {} ({})",
            record.complaint_id,
            record.user_id,
            record.address
        );
        Ok(record)
    }

    /// Set a new status. Any of the four values is accepted from any
    /// current state — admins may revert; no monotonicity check.
    /// Appends an action entry and bumps `last_updated`.
    pub fn update_status(
        &self,
        complaint_id: &str,
        status: ComplaintStatus,
        actor: Option<&str>,
    ) -> GrievanceResult<ComplaintRecord> {
        let mut record = self.store.get_complaint(complaint_id)?;
        let now = self.clock.now();
        record.actions.push(ActionEntry {
            action: format!("Status changed to {status}"),
            timestamp: now,
            by: actor.unwrap_or(DEFAULT_ACTOR).to_string(),
        });
        record.status = status;
        record.last_updated = now;
        self.store.update_status(&record)?;
        log::info!("Complaint {complaint_id} status -> {status}");
        Ok(record)
    }

    /// The explicit classifier transition: assign department, priority and
    /// deadline, move to `classified`, append the classification action.
    /// A missing or failing classifier leaves the record untouched.
    pub fn classify(&self, complaint_id: &str) -> GrievanceResult<ComplaintRecord> {
        let mut record = self.store.get_complaint(complaint_id)?;
        let Some(classifier) = &self.classifier else {
            log::warn!("No classifier configured; complaint {complaint_id} left as-is");
            return Ok(record);
        };
        let classification = match classifier.classify(&record.description) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Classification failed for {complaint_id}: {e}");
                return Ok(record);
            }
        };

        let now = self.clock.now();
        record.deadline = Some(now + self.deadlines.window_for(classification.priority));
        record.actions.push(ActionEntry {
            action: format!(
                "Classified as {} priority for {} department",
                classification.priority, classification.department
            ),
            timestamp: now,
            by: CLASSIFIER_ACTOR.to_string(),
        });
        record.department = Some(classification.department);
        record.priority = Some(classification.priority);
        record.status = ComplaintStatus::Classified;
        record.last_updated = now;
        self.store.apply_classification(&record)?;
        log::info!(
            "Complaint {complaint_id} classified: {} / {}",
            record.department.as_deref().unwrap_or(DEPARTMENT_UNASSIGNED),
            classification.priority
        );
        Ok(record)
    }

    /// All complaints, newest first, with derived fields and the optional
    /// in-memory equality filters applied.
    pub fn list(&self, filter: &ComplaintFilter) -> GrievanceResult<Vec<ComplaintView>> {
        let now = self.clock.now();
        let records = self.store.complaints_all()?;
        Ok(records
            .into_iter()
            .filter(|r| filter.matches(r))
            .map(|r| view_of(r, now))
            .collect())
    }

    /// One user's complaints, newest first. Falls back to the unordered
    /// fetch when the ordered query fails; both return the same set.
    pub fn for_user(&self, user_id: &str) -> GrievanceResult<Vec<ComplaintView>> {
        let records = match self.store.complaints_for_user(user_id) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("Ordered fetch failed for {user_id}, retrying unordered: {e}");
                self.store.complaints_for_user_unordered(user_id)?
            }
        };
        let now = self.clock.now();
        Ok(records.into_iter().map(|r| view_of(r, now)).collect())
    }

    pub fn get(&self, complaint_id: &str) -> GrievanceResult<ComplaintView> {
        let record = self.store.get_complaint(complaint_id)?;
        Ok(view_of(record, self.clock.now()))
    }

    /// Per-status counts for the desk summary.
    pub fn stats(&self) -> GrievanceResult<DeskStats> {
        Ok(DeskStats {
            total: self.store.complaint_count()?,
            new: self.store.count_by_status(ComplaintStatus::New)?,
            classified: self.store.count_by_status(ComplaintStatus::Classified)?,
            under_action: self.store.count_by_status(ComplaintStatus::UnderAction)?,
            resolved: self.store.count_by_status(ComplaintStatus::Resolved)?,
        })
    }

    /// Persist the overdue flag for every unresolved complaint whose
    /// deadline has passed. Reads stay authoritative either way; the flag
    /// exists so dashboards can query on it. Returns how many were flagged.
    pub fn sweep_overdue(&self) -> GrievanceResult<usize> {
        let now = self.clock.now();
        let mut flagged = 0;
        for record in self.store.complaints_all()? {
            if !record.overdue && is_overdue(&record, now) {
                self.store.mark_overdue(&record.complaint_id)?;
                flagged += 1;
            }
        }
        if flagged > 0 {
            log::debug!("{flagged} complaints marked overdue");
        }
        Ok(flagged)
    }

    fn resolve_address(&self, point: GeoPoint) -> String {
        let Some(geocoder) = &self.geocoder else {
            return ADDRESS_LOOKUP_FAILED.to_string();
        };
        match geocoder.reverse(point.lat, point.lng) {
            Ok(display_name) => geocode::short_address(&display_name),
            Err(e) => {
                log::warn!("Geocoding failed: {e}");
                ADDRESS_LOOKUP_FAILED.to_string()
            }
        }
    }
}

/// Whole hours elapsed, floored. A clock skew that puts `created_at` in
/// the future clamps to zero rather than going negative.
pub fn hours_since(created_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - created_at).num_hours().max(0)
}

/// "{days}d {hours}h" once a full day has passed, else "{hours}h".
pub fn format_elapsed(hours_passed: i64) -> String {
    let days = hours_passed / 24;
    let hours = hours_passed % 24;
    if days > 0 {
        format!("{days}d {hours}h")
    } else {
        format!("{hours}h")
    }
}

/// Overdue iff a deadline exists, the complaint is not resolved, and the
/// deadline has passed. Resolving after the deadline clears it on read.
pub fn is_overdue(record: &ComplaintRecord, now: DateTime<Utc>) -> bool {
    match record.deadline {
        Some(deadline) => record.status != ComplaintStatus::Resolved && now > deadline,
        None => false,
    }
}

fn view_of(record: ComplaintRecord, now: DateTime<Utc>) -> ComplaintView {
    let hours_passed = hours_since(record.created_at, now);
    ComplaintView {
        hours_passed,
        time_passed: format_elapsed(hours_passed),
        is_overdue: is_overdue(&record, now),
        display_department: record
            .department
            .clone()
            .unwrap_or_else(|| DEPARTMENT_UNASSIGNED.to_string()),
        display_priority: record.priority.unwrap_or(Priority::Medium),
        record,
    }
}
