use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::{AppEnvironment, MailConfig};
use crate::intake::domain::{Booking, CareerApplication, Contact, NewsletterSubscription, Stored};
use crate::intake::forms::{
    BookingPayload, CareerIntake, CareerPayload, ContactPayload, NewsletterIntake,
};
use crate::intake::mailer::{DeliveryError, DeliveryReceipt, EmailMessage, MailTransport};
use crate::intake::pipeline::IntakePipeline;
use crate::intake::router::IntakeHub;
use crate::intake::storage::{FileError, ResumeStorage, ResumeUpload};
use crate::intake::store::{RecordStore, StoreError, SubscriptionStore};

pub(super) fn mail_config() -> MailConfig {
    MailConfig {
        host: "mail.example.com".to_string(),
        port: 587,
        secure: false,
        username: String::new(),
        password: String::new(),
        from_address: "no-reply@example.com".to_string(),
        admin_address: "admin@example.com".to_string(),
        company_name: "Tzur Global".to_string(),
    }
}

pub(super) fn booking_payload() -> BookingPayload {
    BookingPayload {
        service: "s1".to_string(),
        service_label: "Consulting".to_string(),
        date: "2025-01-15".to_string(),
        time: "10:00".to_string(),
        name: "Jane Doe".to_string(),
        email: "JANE@X.COM".to_string(),
        company: None,
        website: None,
    }
}

pub(super) fn contact_payload() -> ContactPayload {
    ContactPayload {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: None,
        subject: Some("Pricing".to_string()),
        message: "I would like to learn more about your services.".to_string(),
        service: None,
    }
}

pub(super) fn career_payload() -> CareerPayload {
    CareerPayload {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: None,
        position: "Backend Engineer".to_string(),
        experience: Some("Senior".to_string()),
        message: None,
    }
}

pub(super) fn pdf_upload() -> ResumeUpload {
    ResumeUpload {
        original_name: "jane-doe-cv.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.7 minimal".to_vec(),
    }
}

/// Append-only in-memory store assigning ids and timestamps at insert.
pub(super) struct MemoryStore<T> {
    records: Mutex<Vec<Stored<T>>>,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone> MemoryStore<T> {
    pub(super) fn records(&self) -> Vec<Stored<T>> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

impl<T: Clone + Send + Sync> RecordStore<T> for MemoryStore<T> {
    fn insert(&self, fields: T) -> Result<Stored<T>, StoreError> {
        let record = Stored::assign(fields);
        self.records
            .lock()
            .expect("store mutex poisoned")
            .push(record.clone());
        Ok(record)
    }
}

/// Newsletter store with the unique-email constraint enforced under one lock.
#[derive(Default)]
pub(super) struct MemorySubscriptionStore {
    records: Mutex<Vec<Stored<NewsletterSubscription>>>,
}

impl MemorySubscriptionStore {
    pub(super) fn records(&self) -> Vec<Stored<NewsletterSubscription>> {
        self.records.lock().expect("store mutex poisoned").clone()
    }
}

impl RecordStore<NewsletterSubscription> for MemorySubscriptionStore {
    fn insert(
        &self,
        fields: NewsletterSubscription,
    ) -> Result<Stored<NewsletterSubscription>, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.iter().any(|record| record.fields.email == fields.email) {
            return Err(StoreError::Conflict);
        }
        let record = Stored::assign(fields);
        guard.push(record.clone());
        Ok(record)
    }
}

impl SubscriptionStore for MemorySubscriptionStore {
    fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Stored<NewsletterSubscription>>, StoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard
            .iter()
            .find(|record| record.fields.email == email)
            .cloned())
    }
}

/// Store that fails every insert, for persistence-failure paths.
pub(super) struct UnavailableStore;

impl<T> RecordStore<T> for UnavailableStore {
    fn insert(&self, _fields: T) -> Result<Stored<T>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Transport that records every message in delivery order.
#[derive(Default)]
pub(super) struct RecordingMailbox {
    messages: Mutex<Vec<EmailMessage>>,
}

impl RecordingMailbox {
    pub(super) fn messages(&self) -> Vec<EmailMessage> {
        self.messages.lock().expect("mailbox mutex poisoned").clone()
    }
}

impl MailTransport for RecordingMailbox {
    fn deliver(&self, message: EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let mut guard = self.messages.lock().expect("mailbox mutex poisoned");
        guard.push(message);
        Ok(DeliveryReceipt {
            message_id: format!("msg-{}", guard.len()),
        })
    }
}

/// Transport that rejects everything.
pub(super) struct FailingMailbox;

impl MailTransport for FailingMailbox {
    fn deliver(&self, _message: EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        Err(DeliveryError::Transport("connection refused".to_string()))
    }
}

/// Resume storage keeping bytes in memory and counting stores.
#[derive(Default)]
pub(super) struct MemoryResumeStorage {
    stored: AtomicUsize,
}

impl MemoryResumeStorage {
    pub(super) fn stored_count(&self) -> usize {
        self.stored.load(Ordering::SeqCst)
    }
}

impl ResumeStorage for MemoryResumeStorage {
    fn store(&self, upload: &ResumeUpload) -> Result<String, FileError> {
        let n = self.stored.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("mem://resumes/{n}-{}", upload.original_name))
    }
}

/// Handles onto the collaborators behind a hub, for call-count assertions.
pub(super) struct HubHandles {
    pub(super) bookings: Arc<MemoryStore<Booking>>,
    pub(super) contacts: Arc<MemoryStore<Contact>>,
    pub(super) careers: Arc<MemoryStore<CareerApplication>>,
    pub(super) subscriptions: Arc<MemorySubscriptionStore>,
    pub(super) mailbox: Arc<RecordingMailbox>,
    pub(super) resumes: Arc<MemoryResumeStorage>,
}

pub(super) fn build_hub(environment: AppEnvironment) -> (Arc<IntakeHub>, HubHandles) {
    let handles = HubHandles {
        bookings: Arc::new(MemoryStore::default()),
        contacts: Arc::new(MemoryStore::default()),
        careers: Arc::new(MemoryStore::default()),
        subscriptions: Arc::new(MemorySubscriptionStore::default()),
        mailbox: Arc::new(RecordingMailbox::default()),
        resumes: Arc::new(MemoryResumeStorage::default()),
    };
    let mail = mail_config();

    let hub = IntakeHub {
        bookings: IntakePipeline::new(
            handles.bookings.clone(),
            handles.mailbox.clone(),
            mail.clone(),
        ),
        contacts: IntakePipeline::new(
            handles.contacts.clone(),
            handles.mailbox.clone(),
            mail.clone(),
        ),
        careers: CareerIntake::new(
            handles.careers.clone(),
            handles.resumes.clone(),
            handles.mailbox.clone(),
            mail.clone(),
        ),
        newsletter: NewsletterIntake::new(
            handles.subscriptions.clone(),
            handles.mailbox.clone(),
            mail,
        ),
        environment,
    };

    (Arc::new(hub), handles)
}
