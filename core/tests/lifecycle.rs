//! Complaint creation and status transition tests.

mod common;

use common::{desk, desk_with, epoch, submission, FailingClassifier};
use grievance_core::{
    classifier::KeywordClassifier,
    clock::FixedClock,
    error::GrievanceError,
    lifecycle::NewComplaint,
    types::ComplaintStatus,
};

#[test]
fn submit_creates_new_complaint_with_single_action() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);

    let record = lifecycle
        .submit(submission("u1", "streetlight flickering all night"))
        .unwrap();

    assert_eq!(record.status, ComplaintStatus::New);
    assert_eq!(record.actions.len(), 1);
    assert_eq!(record.actions[0].action, "Complaint Submitted");
    assert_eq!(record.actions[0].by, "Asha Verma");
    assert_eq!(record.created_at, epoch());
    assert!(record.department.is_none());
    assert!(record.deadline.is_none());
    assert!(!record.overdue);
}

#[test]
fn submit_rejects_missing_required_fields() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);

    let missing_desc = lifecycle.submit(submission("u1", "   "));
    assert!(matches!(
        missing_desc,
        Err(GrievanceError::Validation { field: "description" })
    ));

    let missing_user = lifecycle.submit(submission("", "pothole on main street"));
    assert!(matches!(
        missing_user,
        Err(GrievanceError::Validation { field: "user_id" })
    ));

    let missing_name = lifecycle.submit(NewComplaint {
        user_id: "u1".to_string(),
        user_name: String::new(),
        description: "pothole on main street".to_string(),
        ..Default::default()
    });
    assert!(matches!(
        missing_name,
        Err(GrievanceError::Validation { field: "user_name" })
    ));

    // Rejected submissions leave no trace.
    assert_eq!(lifecycle.stats().unwrap().total, 0);
}

#[test]
fn submit_defaults_optional_fields() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);

    let record = lifecycle
        .submit(submission("u1", "garbage pile near the park"))
        .unwrap();

    assert_eq!(record.mobile, "Not provided");
    assert_eq!(record.address, "Location not provided");
    assert!(record.image_name.is_none());
    assert!(!record.has_image);
}

#[test]
fn update_status_appends_exactly_one_action() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);
    let record = lifecycle
        .submit(submission("u1", "open drain beside the school"))
        .unwrap();

    let updated = lifecycle
        .update_status(&record.complaint_id, ComplaintStatus::UnderAction, Some("Ward Officer"))
        .unwrap();

    assert_eq!(updated.status, ComplaintStatus::UnderAction);
    assert_eq!(updated.actions.len(), record.actions.len() + 1);
    let last = updated.actions.last().unwrap();
    assert!(last.action.contains("under_action"));
    assert_eq!(last.by, "Ward Officer");

    // The change persisted, not just the returned copy.
    let fetched = lifecycle.get(&record.complaint_id).unwrap();
    assert_eq!(fetched.record.status, ComplaintStatus::UnderAction);
    assert_eq!(fetched.record.actions.len(), 2);
}

#[test]
fn update_status_defaults_actor_to_admin() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);
    let record = lifecycle
        .submit(submission("u1", "water tank overflowing"))
        .unwrap();

    let updated = lifecycle
        .update_status(&record.complaint_id, ComplaintStatus::Resolved, None)
        .unwrap();
    assert_eq!(updated.actions.last().unwrap().by, "Admin");
}

#[test]
fn update_status_unknown_id_is_not_found() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);

    let result = lifecycle.update_status("no-such-id", ComplaintStatus::Resolved, None);
    assert!(matches!(result, Err(GrievanceError::NotFound { .. })));
    // NotFound leaves no trace.
    assert_eq!(lifecycle.stats().unwrap().total, 0);
}

#[test]
fn update_status_allows_reverting_from_resolved() {
    // Deliberate: no monotonicity check, admins may reopen.
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);
    let record = lifecycle
        .submit(submission("u1", "broken speed breaker"))
        .unwrap();

    lifecycle
        .update_status(&record.complaint_id, ComplaintStatus::Resolved, None)
        .unwrap();
    let reopened = lifecycle
        .update_status(&record.complaint_id, ComplaintStatus::UnderAction, None)
        .unwrap();

    assert_eq!(reopened.status, ComplaintStatus::UnderAction);
    assert_eq!(reopened.actions.len(), 3);
}

#[test]
fn submit_with_classifier_assigns_routing_but_keeps_status_new() {
    let clock = FixedClock::at(epoch());
    let classifier = KeywordClassifier::new(common::config().classifier);
    let lifecycle = desk_with(&clock, None, Some(Box::new(classifier)));

    let record = lifecycle
        .submit(submission("u1", "water leak from the broken pipe"))
        .unwrap();

    assert_eq!(record.status, ComplaintStatus::New);
    assert_eq!(record.actions.len(), 1);
    assert_eq!(record.department.as_deref(), Some("Water"));
    assert!(record.priority.is_some());
    assert!(record.deadline.is_some());
}

#[test]
fn submit_swallows_classifier_failure() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk_with(&clock, None, Some(Box::new(FailingClassifier)));

    let record = lifecycle
        .submit(submission("u1", "transformer sparking near the pole"))
        .unwrap();

    assert_eq!(record.status, ComplaintStatus::New);
    assert!(record.department.is_none());
    assert!(record.priority.is_none());
    assert!(record.deadline.is_none());
}

#[test]
fn classify_moves_to_classified_with_action() {
    let clock = FixedClock::at(epoch());
    let classifier = KeywordClassifier::new(common::config().classifier);
    let lifecycle = desk_with(&clock, None, Some(Box::new(classifier)));

    let record = lifecycle
        .submit(submission("u1", "huge pothole causing accident risk"))
        .unwrap();
    let classified = lifecycle.classify(&record.complaint_id).unwrap();

    assert_eq!(classified.status, ComplaintStatus::Classified);
    assert_eq!(classified.department.as_deref(), Some("PWD"));
    assert!(classified.deadline.is_some());
    let last = classified.actions.last().unwrap();
    assert!(last.action.starts_with("Classified as"));
    assert!(last.action.contains("PWD"));
    assert_eq!(last.by, "Classifier");
}

#[test]
fn classify_without_classifier_leaves_record_unchanged() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk(&clock);
    let record = lifecycle
        .submit(submission("u1", "street dogs menace"))
        .unwrap();

    let after = lifecycle.classify(&record.complaint_id).unwrap();
    assert_eq!(after.status, ComplaintStatus::New);
    assert_eq!(after.actions.len(), 1);
    assert!(after.department.is_none());
}

#[test]
fn classify_failure_leaves_record_unchanged() {
    let clock = FixedClock::at(epoch());
    let lifecycle = desk_with(&clock, None, Some(Box::new(FailingClassifier)));
    let record = lifecycle
        .submit(submission("u1", "street dogs menace"))
        .unwrap();

    let after = lifecycle.classify(&record.complaint_id).unwrap();
    assert_eq!(after.status, ComplaintStatus::New);
    assert_eq!(after.actions.len(), 1);
}

#[test]
fn list_filters_by_status_and_department() {
    let clock = FixedClock::at(epoch());
    let classifier = KeywordClassifier::new(common::config().classifier);
    let lifecycle = desk_with(&clock, None, Some(Box::new(classifier)));

    let a = lifecycle
        .submit(submission("u1", "water leak in the colony"))
        .unwrap();
    lifecycle
        .submit(submission("u2", "garbage dump stinking"))
        .unwrap();
    lifecycle
        .update_status(&a.complaint_id, ComplaintStatus::Resolved, None)
        .unwrap();

    let resolved = lifecycle
        .list(&grievance_core::lifecycle::ComplaintFilter {
            status: Some(ComplaintStatus::Resolved),
            department: None,
        })
        .unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].record.complaint_id, a.complaint_id);

    let water = lifecycle
        .list(&grievance_core::lifecycle::ComplaintFilter {
            status: None,
            department: Some("Water".to_string()),
        })
        .unwrap();
    assert_eq!(water.len(), 1);
    assert_eq!(water[0].record.complaint_id, a.complaint_id);
}
