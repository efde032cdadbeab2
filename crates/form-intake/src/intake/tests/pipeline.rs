use std::sync::Arc;

use super::common::*;
use crate::intake::domain::Booking;
use crate::intake::forms::{BookingForm, BookingPayload, ContactForm};
use crate::intake::pipeline::{DeliveryStatus, IntakeError, IntakePipeline};

#[test]
fn rejection_performs_no_side_effects() {
    let store: Arc<MemoryStore<Booking>> = Arc::new(MemoryStore::default());
    let mailbox = Arc::new(RecordingMailbox::default());
    let pipeline =
        IntakePipeline::<BookingForm>::new(store.clone(), mailbox.clone(), mail_config());

    let payload = BookingPayload {
        email: "not-an-email".to_string(),
        name: String::new(),
        ..booking_payload()
    };
    let err = pipeline.submit(payload).expect_err("payload is invalid");

    match err {
        IntakeError::Rejected(rejection) => assert_eq!(rejection.errors.len(), 2),
        other => panic!("expected a validation rejection, got {other:?}"),
    }
    assert!(store.records().is_empty(), "nothing persisted on rejection");
    assert!(mailbox.messages().is_empty(), "nothing sent on rejection");
}

#[test]
fn successful_submission_notifies_submitter_before_admin() {
    let store: Arc<MemoryStore<Booking>> = Arc::new(MemoryStore::default());
    let mailbox = Arc::new(RecordingMailbox::default());
    let pipeline =
        IntakePipeline::<BookingForm>::new(store.clone(), mailbox.clone(), mail_config());

    let submitted = pipeline.submit(booking_payload()).expect("valid payload");

    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fields.email, "jane@x.com");
    assert_eq!(records[0].id, submitted.record.id);

    let messages = mailbox.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].to, "jane@x.com", "submitter notice goes first");
    assert_eq!(messages[1].to, "admin@example.com");

    assert!(submitted.notifications.submitter.is_sent());
    assert!(submitted.notifications.admin.is_sent());
}

#[test]
fn store_failure_short_circuits_all_notifications() {
    let mailbox = Arc::new(RecordingMailbox::default());
    let pipeline = IntakePipeline::<ContactForm>::new(
        Arc::new(UnavailableStore),
        mailbox.clone(),
        mail_config(),
    );

    let err = pipeline.submit(contact_payload()).expect_err("store is down");
    assert!(matches!(err, IntakeError::Store(_)));
    assert!(mailbox.messages().is_empty());
}

#[test]
fn delivery_failure_after_insert_still_reports_success() {
    let store: Arc<MemoryStore<Booking>> = Arc::new(MemoryStore::default());
    let pipeline =
        IntakePipeline::<BookingForm>::new(store.clone(), Arc::new(FailingMailbox), mail_config());

    let submitted = pipeline
        .submit(booking_payload())
        .expect("record is durable regardless of email outcome");

    assert_eq!(store.records().len(), 1);
    assert!(matches!(
        submitted.notifications.submitter,
        DeliveryStatus::Failed(_)
    ));
    assert!(matches!(
        submitted.notifications.admin,
        DeliveryStatus::Failed(_)
    ));
}
