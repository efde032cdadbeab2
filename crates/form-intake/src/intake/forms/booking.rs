use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::MailConfig;
use crate::intake::domain::{Booking, Stored};
use crate::intake::mailer::EmailMessage;
use crate::intake::pipeline::IntakeForm;
use crate::intake::validation::{self, FieldReport, ValidationRejection};

/// Wire payload for a consultation booking.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub service_label: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

pub struct BookingForm;

impl IntakeForm for BookingForm {
    type Raw = BookingPayload;
    type Fields = Booking;

    const LABEL: &'static str = "booking";

    fn validate(raw: BookingPayload) -> Result<Booking, ValidationRejection> {
        let mut report = FieldReport::default();

        let service = report.capture(
            "service",
            validation::required_text(&raw.service, "Service selection is required."),
        );
        let service_label = report.capture(
            "serviceLabel",
            validation::required_text(&raw.service_label, "Service label is required."),
        );
        let date = report.capture(
            "date",
            validation::calendar_date(&raw.date, "Date must be a valid ISO 8601 date string."),
        );
        let time = report.capture(
            "time",
            validation::required_text(&raw.time, "Time selection is required."),
        );
        let name = report.capture(
            "name",
            validation::text_with_min(&raw.name, 2, "Name must be at least 2 characters long."),
        );
        let email = report.capture(
            "email",
            validation::email_address(&raw.email, "Please enter a valid email address."),
        );
        let company = report.capture(
            "company",
            validation::optional_text(raw.company.as_deref()),
        );
        let website = report.capture(
            "website",
            validation::optional_url(
                raw.website.as_deref(),
                "If provided, website must be a valid URL.",
            ),
        );

        match (service, service_label, date, time, name, email, company, website) {
            (
                Some(service),
                Some(service_label),
                Some(date),
                Some(time),
                Some(name),
                Some(email),
                Some(company),
                Some(website),
            ) if report.is_clean() => Ok(Booking {
                service,
                service_label,
                date,
                time,
                name,
                email,
                company,
                website,
            }),
            _ => Err(report.into_rejection()),
        }
    }

    fn submitter_notice(record: &Stored<Booking>, mail: &MailConfig) -> EmailMessage {
        let booking = &record.fields;
        let date = long_date(booking.date);
        let company_line = match &booking.company {
            Some(company) => format!("<p><strong>Company:</strong> {company}</p>\n"),
            None => String::new(),
        };
        let website_line = match &booking.website {
            Some(website) => format!(
                "<p><strong>Website:</strong> <a href=\"{website}\">{website}</a></p>\n"
            ),
            None => String::new(),
        };

        let html = format!(
            "<p>Dear {name},</p>\n\
             <p>Thank you for booking a consultation with {company_name} for the <strong>{label}</strong> service.</p>\n\
             <p>Your session is scheduled for:</p>\n\
             <ul>\n<li><strong>Date:</strong> {date}</li>\n<li><strong>Time:</strong> {time}</li>\n</ul>\n\
             {company_line}{website_line}\
             <p>Your Booking ID: {id}</p>\n\
             <p>We will send you a calendar invitation and any necessary meeting details shortly.</p>\n\
             <p>Best regards,<br/>The {company_name} Team</p>",
            name = booking.name,
            company_name = mail.company_name,
            label = booking.service_label,
            time = booking.time,
            id = record.id,
        );
        let text = format!(
            "Dear {name},\n\nThank you for booking a consultation with {company_name} for the {label} service.\n\
             Date: {date}\nTime: {time}\nBooking ID: {id}\n\n\
             We will send you a calendar invitation shortly.\n\nBest regards,\nThe {company_name} Team",
            name = booking.name,
            company_name = mail.company_name,
            label = booking.service_label,
            time = booking.time,
            id = record.id,
        );

        EmailMessage {
            to: booking.email.clone(),
            subject: format!(
                "Your {} Consultation for \"{}\" is Booked!",
                mail.company_name, booking.service_label
            ),
            text,
            html,
        }
    }

    fn admin_notice(record: &Stored<Booking>, mail: &MailConfig) -> Option<EmailMessage> {
        let booking = &record.fields;
        let date = long_date(booking.date);
        let company_line = match &booking.company {
            Some(company) => format!("<li><strong>Company:</strong> {company}</li>\n"),
            None => String::new(),
        };
        let website_line = match &booking.website {
            Some(website) => format!(
                "<li><strong>Website:</strong> <a href=\"{website}\">{website}</a></li>\n"
            ),
            None => String::new(),
        };

        let html = format!(
            "<p>A new consultation has been booked:</p>\n<ul>\n\
             <li><strong>Client Name:</strong> {name}</li>\n\
             <li><strong>Client Email:</strong> <a href=\"mailto:{email}\">{email}</a></li>\n\
             <li><strong>Service Requested:</strong> {label} (ID: {service})</li>\n\
             <li><strong>Preferred Date:</strong> {date}</li>\n\
             <li><strong>Preferred Time:</strong> {time}</li>\n\
             {company_line}{website_line}\
             <li><strong>Booking ID:</strong> {id}</li>\n</ul>\n<p>Please follow up.</p>",
            name = booking.name,
            email = booking.email,
            label = booking.service_label,
            service = booking.service,
            time = booking.time,
            id = record.id,
        );
        let text = format!(
            "New consultation booking:\nName: {name}\nEmail: {email}\nService: {label} (ID: {service})\n\
             Date: {date}\nTime: {time}\nBooking ID: {id}\nPlease follow up.",
            name = booking.name,
            email = booking.email,
            label = booking.service_label,
            service = booking.service,
            time = booking.time,
            id = record.id,
        );

        Some(EmailMessage {
            to: mail.admin_address.clone(),
            subject: format!(
                "New Consultation Booking: {} - {}",
                booking.service_label, booking.name
            ),
            text,
            html,
        })
    }
}

/// Success body echoed to the caller.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub id: String,
    pub name: String,
    pub email: String,
    pub service_label: String,
    pub date: String,
    pub time: String,
}

impl BookingConfirmation {
    pub fn from_record(record: &Stored<Booking>) -> Self {
        Self {
            id: record.id.0.clone(),
            name: record.fields.name.clone(),
            email: record.fields.email.clone(),
            service_label: record.fields.service_label.clone(),
            date: long_date(record.fields.date),
            time: record.fields.time.clone(),
        }
    }
}

/// Long-form date used in confirmations, e.g. "January 15, 2025".
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
