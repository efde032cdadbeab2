use std::sync::Arc;

use serde::Deserialize;

use crate::config::MailConfig;
use crate::intake::domain::{CareerApplication, Stored};
use crate::intake::mailer::{EmailMessage, MailTransport};
use crate::intake::pipeline::{IntakeError, IntakeForm, IntakePipeline, Submitted};
use crate::intake::storage::{FileError, ResumeStorage, ResumeUpload};
use crate::intake::store::RecordStore;
use crate::intake::validation::{self, FieldReport, ValidationRejection};

/// Text fields of a career application; the resume arrives separately as a
/// multipart file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CareerPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Normalized career fields awaiting the stored resume path.
#[derive(Debug, Clone)]
struct CareerDraft {
    name: String,
    email: String,
    phone: Option<String>,
    position: String,
    experience: Option<String>,
    message: Option<String>,
}

fn run_rules(raw: &CareerPayload) -> Result<CareerDraft, ValidationRejection> {
    let mut report = FieldReport::default();

    let name = report.capture(
        "name",
        validation::required_text(&raw.name, "Name is required."),
    );
    let email = report.capture(
        "email",
        validation::email_address(&raw.email, "Please enter a valid email."),
    );
    let phone = report.capture(
        "phone",
        validation::optional_phone(raw.phone.as_deref(), "Valid phone number if provided."),
    );
    let position = report.capture(
        "position",
        validation::required_text(&raw.position, "Preferred position is required."),
    );
    let experience = report.capture(
        "experience",
        validation::optional_text(raw.experience.as_deref()),
    );
    let message = report.capture(
        "message",
        validation::optional_text_max(
            raw.message.as_deref(),
            2000,
            "Message cannot exceed 2000 characters.",
        ),
    );

    match (name, email, phone, position, experience, message) {
        (Some(name), Some(email), Some(phone), Some(position), Some(experience), Some(message))
            if report.is_clean() =>
        {
            Ok(CareerDraft {
                name,
                email,
                phone,
                position,
                experience,
                message,
            })
        }
        _ => Err(report.into_rejection()),
    }
}

pub struct CareerForm;

impl IntakeForm for CareerForm {
    /// Payload plus the storage path of the already-accepted resume.
    type Raw = (CareerPayload, String);
    type Fields = CareerApplication;

    const LABEL: &'static str = "career";

    fn validate(raw: Self::Raw) -> Result<CareerApplication, ValidationRejection> {
        let (payload, resume_path) = raw;
        let draft = run_rules(&payload)?;
        Ok(CareerApplication {
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            position: draft.position,
            experience: draft.experience,
            message: draft.message,
            resume_path,
        })
    }

    fn submitter_notice(record: &Stored<CareerApplication>, mail: &MailConfig) -> EmailMessage {
        let application = &record.fields;
        let html = format!(
            "<p>Dear {name},</p>\n\
             <p>Thank you for your interest in {company} and for submitting your application for the {position} role.</p>\n\
             <p>We have successfully received your application (ID: {id}).</p>\n\
             <p>Our hiring team will review your qualifications. If your profile matches our current needs, we will contact you for the next steps.</p>\n\
             <p>Sincerely,<br/>The {company} Team</p>",
            name = application.name,
            company = mail.company_name,
            position = application.position,
            id = record.id,
        );
        let text = format!(
            "Dear {name},\n\nThank you for applying to {company} for the {position} role.\n\
             Your application ID is {id}.\n\nOur hiring team will review your qualifications and contact you if your profile matches our needs.\n\n\
             Sincerely,\nThe {company} Team",
            name = application.name,
            company = mail.company_name,
            position = application.position,
            id = record.id,
        );

        EmailMessage {
            to: application.email.clone(),
            subject: format!(
                "Your Application to {} has been Received, {}!",
                mail.company_name, application.name
            ),
            text,
            html,
        }
    }

    fn admin_notice(record: &Stored<CareerApplication>, mail: &MailConfig) -> Option<EmailMessage> {
        let application = &record.fields;
        let phone_line = match &application.phone {
            Some(phone) => format!("<li><strong>Phone:</strong> {phone}</li>\n"),
            None => String::new(),
        };
        let experience_line = match &application.experience {
            Some(level) => format!("<li><strong>Experience Level:</strong> {level}</li>\n"),
            None => String::new(),
        };
        let message_line = match &application.message {
            Some(message) => format!(
                "<li><strong>Additional Info:</strong><br/>{}</li>\n",
                message.replace('\n', "<br/>")
            ),
            None => String::new(),
        };

        let html = format!(
            "<p>A new career application has been submitted:</p>\n<ul>\n\
             <li><strong>Name:</strong> {name}</li>\n\
             <li><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></li>\n\
             {phone_line}\
             <li><strong>Preferred Position:</strong> {position}</li>\n\
             {experience_line}{message_line}\
             <li><strong>Resume:</strong> stored at {resume_path}</li>\n\
             <li><strong>Application ID:</strong> {id}</li>\n</ul>\n<p>Please review.</p>",
            name = application.name,
            email = application.email,
            position = application.position,
            resume_path = application.resume_path,
            id = record.id,
        );
        let text = format!(
            "New career application from {name} for {position}.\nResume path: {resume_path}\nApplication ID: {id}",
            name = application.name,
            position = application.position,
            resume_path = application.resume_path,
            id = record.id,
        );

        Some(EmailMessage {
            to: mail.admin_address.clone(),
            subject: format!(
                "New Career Application: {} - {}",
                application.position, application.name
            ),
            text,
            html,
        })
    }
}

/// Career orchestrator: the shared pipeline plus the resume file stage.
///
/// Stage order is contractual: the missing-file gate runs before any field
/// rule, the MIME/size check and the field rules both run before any bytes
/// are written, and the file is stored before the record is inserted.
pub struct CareerIntake {
    storage: Arc<dyn ResumeStorage>,
    pipeline: IntakePipeline<CareerForm>,
}

impl CareerIntake {
    pub fn new(
        store: Arc<dyn RecordStore<CareerApplication>>,
        storage: Arc<dyn ResumeStorage>,
        mailer: Arc<dyn MailTransport>,
        mail: MailConfig,
    ) -> Self {
        Self {
            storage,
            pipeline: IntakePipeline::new(store, mailer, mail),
        }
    }

    pub fn submit(
        &self,
        payload: CareerPayload,
        upload: Option<ResumeUpload>,
    ) -> Result<Submitted<CareerApplication>, IntakeError> {
        let upload = upload.ok_or(FileError::Missing)?;
        upload.check_acceptable()?;

        let draft = run_rules(&payload)?;
        let resume_path = self.storage.store(&upload)?;

        self.pipeline.record_and_notify(CareerApplication {
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            position: draft.position,
            experience: draft.experience,
            message: draft.message,
            resume_path,
        })
    }
}
