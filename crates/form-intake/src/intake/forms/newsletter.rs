use std::sync::Arc;

use serde::Deserialize;

use crate::config::MailConfig;
use crate::intake::domain::{NewsletterSubscription, Stored, SubmissionId};
use crate::intake::mailer::{EmailMessage, MailTransport};
use crate::intake::pipeline::{
    dispatch_notice, DeliveryStatus, IntakeError, IntakeForm, Submitted,
};
use crate::intake::store::{StoreError, SubscriptionStore};
use crate::intake::validation::{self, FieldReport, ValidationRejection};

/// Wire payload for a newsletter signup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscribePayload {
    #[serde(default)]
    pub email: String,
}

pub struct NewsletterForm;

impl IntakeForm for NewsletterForm {
    type Raw = SubscribePayload;
    type Fields = NewsletterSubscription;

    const LABEL: &'static str = "newsletter";

    fn validate(raw: SubscribePayload) -> Result<NewsletterSubscription, ValidationRejection> {
        let mut report = FieldReport::default();
        let email = report.capture(
            "email",
            validation::email_address(&raw.email, "Please enter a valid email address."),
        );
        match email {
            Some(email) if report.is_clean() => Ok(NewsletterSubscription { email }),
            _ => Err(report.into_rejection()),
        }
    }

    fn submitter_notice(record: &Stored<NewsletterSubscription>, mail: &MailConfig) -> EmailMessage {
        let html = format!(
            "<p>Hi there,</p>\n\
             <p>Thank you for subscribing to the {company} newsletter!</p>\n\
             <p>Stay tuned for updates, insights, and special offers.</p>\n\
             <p>Best regards,<br/>The {company} Team</p>",
            company = mail.company_name,
        );
        let text = format!(
            "Thank you for subscribing to the {company} newsletter!\n\
             Stay tuned for updates, insights, and special offers.\n\nBest regards,\nThe {company} Team",
            company = mail.company_name,
        );

        EmailMessage {
            to: record.fields.email.clone(),
            subject: format!("Welcome to the {} Newsletter!", mail.company_name),
            text,
            html,
        }
    }

    // Admin notice for newsletter signups is disabled by design.
    fn admin_notice(_record: &Stored<NewsletterSubscription>, _mail: &MailConfig) -> Option<EmailMessage> {
        None
    }
}

/// Outcome of a subscribe call. Resubscribing is not an error: the endpoint
/// is safe to call repeatedly and reports the original identifier.
#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
    Subscribed(Submitted<NewsletterSubscription>),
    AlreadySubscribed { id: SubmissionId },
}

/// Newsletter orchestrator: validation, duplicate short-circuit, insert,
/// welcome email.
pub struct NewsletterIntake {
    store: Arc<dyn SubscriptionStore>,
    mailer: Arc<dyn MailTransport>,
    mail: MailConfig,
}

impl NewsletterIntake {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        mailer: Arc<dyn MailTransport>,
        mail: MailConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            mail,
        }
    }

    pub fn subscribe(&self, raw: SubscribePayload) -> Result<SubscribeOutcome, IntakeError> {
        let fields = NewsletterForm::validate(raw)?;

        if let Some(existing) = self.store.find_by_email(&fields.email)? {
            return Ok(SubscribeOutcome::AlreadySubscribed { id: existing.id });
        }

        let record = match self.store.insert(fields.clone()) {
            Ok(record) => record,
            // Lost the race against a concurrent subscribe for the same
            // address; the store's unique constraint is the arbiter.
            Err(StoreError::Conflict) => {
                let existing = self
                    .store
                    .find_by_email(&fields.email)?
                    .ok_or_else(|| StoreError::Unavailable("subscription vanished".to_string()))?;
                return Ok(SubscribeOutcome::AlreadySubscribed { id: existing.id });
            }
            Err(other) => return Err(other.into()),
        };
        tracing::info!(form = NewsletterForm::LABEL, id = %record.id, "subscription recorded");

        let welcome = dispatch_notice(
            self.mailer.as_ref(),
            NewsletterForm::LABEL,
            NewsletterForm::submitter_notice(&record, &self.mail),
        );

        Ok(SubscribeOutcome::Subscribed(Submitted {
            record,
            notifications: crate::intake::pipeline::NotificationReport {
                submitter: welcome,
                admin: DeliveryStatus::Skipped,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized_before_anything_else() {
        let subscription = NewsletterForm::validate(SubscribePayload {
            email: " Foo@Example.com ".to_string(),
        })
        .expect("valid email");
        assert_eq!(subscription.email, "foo@example.com");
    }

    #[test]
    fn invalid_email_is_rejected_with_a_field_error() {
        let rejection = NewsletterForm::validate(SubscribePayload {
            email: "not-an-email".to_string(),
        })
        .expect_err("invalid email");
        assert_eq!(rejection.errors.len(), 1);
        assert_eq!(rejection.errors[0].field, "email");
    }
}
