use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::MailConfig;

use super::domain::Stored;
use super::mailer::{DeliveryReceipt, EmailMessage, MailTransport};
use super::storage::FileError;
use super::store::{RecordStore, StoreError};
use super::validation::ValidationRejection;

/// One form kind: its wire payload, field ruleset, and notice templates.
/// Each of the four forms is a configuration of this trait, not a separate
/// code path.
pub trait IntakeForm: Send + Sync + 'static {
    /// Raw payload as received over the wire, all fields string-like.
    type Raw: Send;
    /// Validated, normalized fields ready for persistence.
    type Fields: Clone + Send + Sync + 'static;

    /// Short label used in log lines.
    const LABEL: &'static str;

    /// Apply the field ruleset. Collects every failing field; never
    /// short-circuits at the first failure. Pure.
    fn validate(raw: Self::Raw) -> Result<Self::Fields, ValidationRejection>;

    /// Confirmation sent to the submitter after the record is stored.
    fn submitter_notice(record: &Stored<Self::Fields>, mail: &MailConfig) -> EmailMessage;

    /// Notification for the admin inbox; `None` disables it for this form.
    fn admin_notice(record: &Stored<Self::Fields>, mail: &MailConfig) -> Option<EmailMessage>;
}

/// Failures that terminate a submission before it completes.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error(transparent)]
    Rejected(#[from] ValidationRejection),
    #[error(transparent)]
    File(#[from] FileError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of one notification attempt. Delivery failures after a
/// successful insert are recorded here rather than failing the submission;
/// the persisted record is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent(DeliveryReceipt),
    Failed(String),
    Skipped,
}

impl DeliveryStatus {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryStatus::Sent(_))
    }
}

/// What happened to the two notices for a completed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationReport {
    pub submitter: DeliveryStatus,
    pub admin: DeliveryStatus,
}

/// A completed submission: the durable record plus the notification report.
#[derive(Debug, Clone)]
pub struct Submitted<T> {
    pub record: Stored<T>,
    pub notifications: NotificationReport,
}

/// The shared validate -> persist -> notify sequence. Nothing is persisted
/// or sent when validation rejects; the submitter notice is always attempted
/// before the admin notice.
pub struct IntakePipeline<F: IntakeForm> {
    store: Arc<dyn RecordStore<F::Fields>>,
    mailer: Arc<dyn MailTransport>,
    mail: MailConfig,
    _form: PhantomData<F>,
}

impl<F: IntakeForm> IntakePipeline<F> {
    pub fn new(
        store: Arc<dyn RecordStore<F::Fields>>,
        mailer: Arc<dyn MailTransport>,
        mail: MailConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            mail,
            _form: PhantomData,
        }
    }

    pub fn submit(&self, raw: F::Raw) -> Result<Submitted<F::Fields>, IntakeError> {
        let fields = F::validate(raw)?;
        self.record_and_notify(fields)
    }

    /// Persist already-validated fields and dispatch the notices. Split out
    /// so form services with extra stages (the career file step) can join
    /// the pipeline after their own preconditions.
    pub fn record_and_notify(
        &self,
        fields: F::Fields,
    ) -> Result<Submitted<F::Fields>, IntakeError> {
        let record = self.store.insert(fields)?;
        tracing::info!(form = F::LABEL, id = %record.id, "submission recorded");

        let submitter = dispatch_notice(
            self.mailer.as_ref(),
            F::LABEL,
            F::submitter_notice(&record, &self.mail),
        );
        let admin = match F::admin_notice(&record, &self.mail) {
            Some(notice) => dispatch_notice(self.mailer.as_ref(), F::LABEL, notice),
            None => DeliveryStatus::Skipped,
        };

        Ok(Submitted {
            record,
            notifications: NotificationReport { submitter, admin },
        })
    }
}

/// Hand one notice to the transport, downgrading a delivery failure to a
/// warning: the record is already durable at this point.
pub(crate) fn dispatch_notice(
    mailer: &dyn MailTransport,
    form: &'static str,
    message: EmailMessage,
) -> DeliveryStatus {
    let recipient = message.to.clone();
    match mailer.deliver(message) {
        Ok(receipt) => {
            tracing::debug!(form, to = %recipient, message_id = %receipt.message_id, "notice delivered");
            DeliveryStatus::Sent(receipt)
        }
        Err(err) => {
            tracing::warn!(form, to = %recipient, error = %err, "notice delivery failed after record was stored");
            DeliveryStatus::Failed(err.to_string())
        }
    }
}
