use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use form_intake::intake::domain::{NewsletterSubscription, Stored};
use form_intake::intake::mailer::{DeliveryError, DeliveryReceipt, EmailMessage, MailTransport};
use form_intake::intake::store::{RecordStore, StoreError, SubscriptionStore};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Append-only in-memory store; the durable database backend plugs in behind
/// the same trait.
pub(crate) struct InMemoryStore<T> {
    records: Mutex<Vec<Stored<T>>>,
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone + Send + Sync> RecordStore<T> for InMemoryStore<T> {
    fn insert(&self, fields: T) -> Result<Stored<T>, StoreError> {
        let record = Stored::assign(fields);
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?
            .push(record.clone());
        Ok(record)
    }
}

/// Subscription store enforcing the unique-email constraint under one lock, so
/// concurrent subscribers observe either the existing record or a conflict.
#[derive(Default)]
pub(crate) struct InMemorySubscriptionStore {
    records: Mutex<Vec<Stored<NewsletterSubscription>>>,
}

impl RecordStore<NewsletterSubscription> for InMemorySubscriptionStore {
    fn insert(
        &self,
        fields: NewsletterSubscription,
    ) -> Result<Stored<NewsletterSubscription>, StoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        if guard.iter().any(|record| record.fields.email == fields.email) {
            return Err(StoreError::Conflict);
        }
        let record = Stored::assign(fields);
        guard.push(record.clone());
        Ok(record)
    }
}

impl SubscriptionStore for InMemorySubscriptionStore {
    fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Stored<NewsletterSubscription>>, StoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| StoreError::Unavailable("store mutex poisoned".to_string()))?;
        Ok(guard
            .iter()
            .find(|record| record.fields.email == email)
            .cloned())
    }
}

/// Transport that logs outbound mail instead of speaking SMTP. Stands in
/// until real delivery credentials are wired up.
#[derive(Default)]
pub(crate) struct LoggingMailTransport {
    delivered: AtomicU64,
}

impl MailTransport for LoggingMailTransport {
    fn deliver(&self, message: EmailMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let sequence = self.delivered.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            to = %message.to,
            subject = %message.subject,
            sequence,
            "outbound email"
        );
        Ok(DeliveryReceipt {
            message_id: format!("logged-{sequence}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_intake::intake::domain::Contact;

    fn contact() -> Contact {
        Contact {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: None,
            subject: None,
            message: "Hello there, I have a question.".to_string(),
            service: None,
        }
    }

    #[test]
    fn insert_assigns_distinct_identifiers() {
        let store = InMemoryStore::default();
        let first = store.insert(contact()).expect("first insert");
        let second = store.insert(contact()).expect("second insert");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn duplicate_subscription_email_conflicts() {
        let store = InMemorySubscriptionStore::default();
        let fields = NewsletterSubscription {
            email: "jane@x.com".to_string(),
        };
        let stored = store.insert(fields.clone()).expect("first insert");
        assert!(matches!(store.insert(fields), Err(StoreError::Conflict)));

        let found = store
            .find_by_email("jane@x.com")
            .expect("lookup succeeds")
            .expect("record present");
        assert_eq!(found.id, stored.id);
    }

    #[test]
    fn logging_transport_issues_sequential_receipts() {
        let transport = LoggingMailTransport::default();
        let message = EmailMessage {
            to: "jane@x.com".to_string(),
            subject: "Hello".to_string(),
            text: String::new(),
            html: String::new(),
        };
        let first = transport.deliver(message.clone()).expect("first delivery");
        let second = transport.deliver(message).expect("second delivery");
        assert_eq!(first.message_id, "logged-1");
        assert_eq!(second.message_id, "logged-2");
    }
}
