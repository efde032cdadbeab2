//! One module per form kind. Each implements [`IntakeForm`] — field rules
//! plus notice templates — and the forms with an extra stage (career file
//! intake, newsletter dedup) wrap the shared pipeline in a small service.
//!
//! [`IntakeForm`]: super::pipeline::IntakeForm

pub mod booking;
pub mod career;
pub mod contact;
pub mod newsletter;

pub use booking::{BookingConfirmation, BookingForm, BookingPayload};
pub use career::{CareerForm, CareerIntake, CareerPayload};
pub use contact::{ContactForm, ContactPayload};
pub use newsletter::{NewsletterForm, NewsletterIntake, SubscribeOutcome, SubscribePayload};
