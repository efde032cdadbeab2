//! Submission intake: the validate -> persist -> notify pipeline shared by
//! every form the website accepts, plus the collaborator contracts it
//! sequences (record stores, resume storage, mail transport).

pub mod domain;
pub mod forms;
pub mod mailer;
pub mod pipeline;
pub mod router;
pub mod storage;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Booking, CareerApplication, Contact, NewsletterSubscription, Stored, SubmissionId,
};
pub use mailer::{DeliveryError, DeliveryReceipt, EmailMessage, MailTransport};
pub use pipeline::{
    DeliveryStatus, IntakeError, IntakeForm, IntakePipeline, NotificationReport, Submitted,
};
pub use router::{intake_router, IntakeHub};
pub use storage::{FileError, LocalResumeStorage, ResumeStorage, ResumeUpload};
pub use store::{RecordStore, StoreError, SubscriptionStore};
pub use validation::{FieldError, ValidationRejection};
