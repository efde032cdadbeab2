use serde::Deserialize;

use crate::config::MailConfig;
use crate::intake::domain::{Contact, Stored};
use crate::intake::mailer::EmailMessage;
use crate::intake::pipeline::IntakeForm;
use crate::intake::validation::{self, FieldReport, ValidationRejection};

/// Wire payload for the contact form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub service: Option<String>,
}

pub struct ContactForm;

impl IntakeForm for ContactForm {
    type Raw = ContactPayload;
    type Fields = Contact;

    const LABEL: &'static str = "contact";

    fn validate(raw: ContactPayload) -> Result<Contact, ValidationRejection> {
        let mut report = FieldReport::default();

        let name = report.capture(
            "name",
            validation::text_with_min(&raw.name, 2, "Name must be at least 2 characters."),
        );
        let email = report.capture(
            "email",
            validation::email_address(&raw.email, "Please enter a valid email address."),
        );
        let phone = report.capture(
            "phone",
            validation::optional_phone(
                raw.phone.as_deref(),
                "Please enter a valid phone number if provided.",
            ),
        );
        let subject = report.capture(
            "subject",
            validation::optional_text_max(
                raw.subject.as_deref(),
                150,
                "Subject cannot exceed 150 characters.",
            ),
        );
        let message = report.capture(
            "message",
            validation::bounded_text(
                &raw.message,
                10,
                2000,
                "Message must be between 10 and 2000 characters.",
            ),
        );
        let service = report.capture("service", validation::optional_text(raw.service.as_deref()));

        match (name, email, phone, subject, message, service) {
            (Some(name), Some(email), Some(phone), Some(subject), Some(message), Some(service))
                if report.is_clean() =>
            {
                Ok(Contact {
                    name,
                    email,
                    phone,
                    subject,
                    message,
                    service,
                })
            }
            _ => Err(report.into_rejection()),
        }
    }

    fn submitter_notice(record: &Stored<Contact>, mail: &MailConfig) -> EmailMessage {
        let contact = &record.fields;
        let topic = contact.subject.as_deref().unwrap_or("your inquiry");

        let html = format!(
            "<p>Dear {name},</p>\n\
             <p>Thank you for contacting {company}! We have successfully received your message regarding \"{topic}\".</p>\n\
             <p>Our team will review your submission and get back to you as soon as possible, typically within 1-2 business days.</p>\n\
             <p>Sincerely,<br/>The {company} Team</p>",
            name = contact.name,
            company = mail.company_name,
        );
        let text = format!(
            "Dear {name},\n\nThank you for contacting {company}! We have received your message regarding \"{topic}\".\n\
             Our team will review your submission and get back to you soon.\n\nSincerely,\nThe {company} Team",
            name = contact.name,
            company = mail.company_name,
        );

        EmailMessage {
            to: contact.email.clone(),
            subject: format!("We've Received Your Message, {}!", contact.name),
            text,
            html,
        }
    }

    fn admin_notice(record: &Stored<Contact>, mail: &MailConfig) -> Option<EmailMessage> {
        let contact = &record.fields;
        let topic = contact.subject.as_deref().unwrap_or("Not specified");
        let phone_line = match &contact.phone {
            Some(phone) => format!("<li><strong>Phone:</strong> {phone}</li>\n"),
            None => String::new(),
        };
        let service_line = match &contact.service {
            Some(service) => format!("<li><strong>Regarding Service:</strong> {service}</li>\n"),
            None => String::new(),
        };

        let html = format!(
            "<p>You have received a new message via the {company} contact form:</p>\n<ul>\n\
             <li><strong>Name:</strong> {name}</li>\n\
             <li><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></li>\n\
             {phone_line}{service_line}\
             <li><strong>Subject:</strong> {topic}</li>\n</ul>\n<hr>\n\
             <h3>Message:</h3>\n<p style=\"white-space: pre-wrap;\">{message}</p>\n<hr>\n\
             <p>Database Record ID: {id}</p>\n<p>Please respond to this inquiry promptly.</p>",
            company = mail.company_name,
            name = contact.name,
            email = contact.email,
            message = contact.message,
            id = record.id,
        );

        let mut text = format!(
            "New contact form message:\nName: {}\nEmail: {}\n",
            contact.name, contact.email
        );
        if let Some(phone) = &contact.phone {
            text.push_str(&format!("Phone: {phone}\n"));
        }
        if let Some(service) = &contact.service {
            text.push_str(&format!("Regarding Service: {service}\n"));
        }
        text.push_str(&format!(
            "Subject: {topic}\n\nMessage:\n{}\n\nDatabase Record ID: {}\nPlease respond promptly.",
            contact.message, record.id
        ));

        Some(EmailMessage {
            to: mail.admin_address.clone(),
            subject: format!(
                "New Contact Form Message from {}: \"{}\"",
                contact.name,
                contact.subject.as_deref().unwrap_or("General Inquiry")
            ),
            text,
            html,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> ContactPayload {
        ContactPayload {
            name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: None,
            subject: Some("Pricing".to_string()),
            message: "I would like to learn more about your services.".to_string(),
            service: None,
        }
    }

    #[test]
    fn message_boundaries_are_inclusive() {
        let mut payload = valid_payload();
        payload.message = "x".repeat(9);
        assert!(ContactForm::validate(payload.clone()).is_err());

        payload.message = "x".repeat(10);
        assert!(ContactForm::validate(payload.clone()).is_ok());

        payload.message = "x".repeat(2001);
        assert!(ContactForm::validate(payload).is_err());
    }

    #[test]
    fn subject_over_150_characters_is_rejected() {
        let mut payload = valid_payload();
        payload.subject = Some("s".repeat(151));
        let rejection = ContactForm::validate(payload).expect_err("subject too long");
        assert_eq!(rejection.errors.len(), 1);
        assert_eq!(rejection.errors[0].field, "subject");
    }

    #[test]
    fn collects_all_failing_fields() {
        let payload = ContactPayload {
            name: "J".to_string(),
            email: "bad".to_string(),
            phone: Some("abc".to_string()),
            message: "short".to_string(),
            ..valid_payload()
        };
        let rejection = ContactForm::validate(payload).expect_err("invalid payload");
        assert_eq!(rejection.errors.len(), 4);
    }

    #[test]
    fn admin_notice_omits_absent_optional_lines() {
        let mail = MailConfig {
            host: String::new(),
            port: 587,
            secure: false,
            username: String::new(),
            password: String::new(),
            from_address: "no-reply@example.com".to_string(),
            admin_address: "admin@example.com".to_string(),
            company_name: "Tzur Global".to_string(),
        };
        let record = Stored::assign(ContactForm::validate(valid_payload()).expect("valid"));
        let notice = ContactForm::admin_notice(&record, &mail).expect("admin notice enabled");
        assert!(!notice.html.contains("Phone:"));
        assert!(!notice.html.contains("Regarding Service:"));
        assert!(notice.html.contains("Pricing"));
        assert_eq!(notice.to, "admin@example.com");
    }
}
