use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use crate::config::AppEnvironment;

use super::forms::{
    BookingConfirmation, BookingPayload, CareerIntake, CareerPayload, ContactPayload,
    NewsletterIntake, SubscribeOutcome, SubscribePayload,
};
use super::forms::{BookingForm, ContactForm};
use super::pipeline::{IntakeError, IntakePipeline};
use super::storage::{FileError, ResumeUpload, MAX_RESUME_BYTES};
use super::store::StoreError;

/// Multipart form field carrying the resume.
pub const RESUME_FIELD: &str = "resumeFile";

// Resume limit plus headroom for the text fields and multipart framing.
const CAREER_BODY_LIMIT: usize = MAX_RESUME_BYTES + 512 * 1024;

/// Every orchestrator the HTTP surface needs, built once at startup.
pub struct IntakeHub {
    pub bookings: IntakePipeline<BookingForm>,
    pub contacts: IntakePipeline<ContactForm>,
    pub careers: CareerIntake,
    pub newsletter: NewsletterIntake,
    pub environment: AppEnvironment,
}

/// Router for the four submission endpoints.
pub fn intake_router(hub: Arc<IntakeHub>) -> Router {
    Router::new()
        .route("/api/bookings", post(booking_handler))
        .route("/api/contact", post(contact_handler))
        .route(
            "/api/careers",
            post(career_handler).layer(DefaultBodyLimit::max(CAREER_BODY_LIMIT)),
        )
        .route("/api/newsletter/subscribe", post(subscribe_handler))
        .with_state(hub)
}

pub(crate) async fn booking_handler(
    State(hub): State<Arc<IntakeHub>>,
    Json(payload): Json<BookingPayload>,
) -> Response {
    match hub.bookings.submit(payload) {
        Ok(submitted) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Booking successful and recorded! Confirmation emails have been sent.",
                "bookingDetails": BookingConfirmation::from_record(&submitted.record),
            })),
        )
            .into_response(),
        Err(err) => error_response(err, hub.environment),
    }
}

pub(crate) async fn contact_handler(
    State(hub): State<Arc<IntakeHub>>,
    Json(payload): Json<ContactPayload>,
) -> Response {
    match hub.contacts.submit(payload) {
        Ok(submitted) => (
            StatusCode::OK,
            Json(json!({
                "message": "Your message has been sent successfully and recorded! We will get back to you shortly.",
                "submissionId": submitted.record.id.0,
            })),
        )
            .into_response(),
        Err(err) => error_response(err, hub.environment),
    }
}

pub(crate) async fn career_handler(
    State(hub): State<Arc<IntakeHub>>,
    mut multipart: Multipart,
) -> Response {
    let (payload, upload) = match read_career_request(&mut multipart).await {
        Ok(parts) => parts,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": format!("File upload error: {err}") })),
            )
                .into_response();
        }
    };

    match hub.careers.submit(payload, upload) {
        Ok(submitted) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Application submitted successfully! We will review it and get in touch if your profile matches our needs.",
                "applicationId": submitted.record.id.0,
            })),
        )
            .into_response(),
        Err(err) => error_response(err, hub.environment),
    }
}

pub(crate) async fn subscribe_handler(
    State(hub): State<Arc<IntakeHub>>,
    Json(payload): Json<SubscribePayload>,
) -> Response {
    match hub.newsletter.subscribe(payload) {
        Ok(SubscribeOutcome::Subscribed(submitted)) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Successfully subscribed to the newsletter! Welcome aboard.",
                "subscriptionId": submitted.record.id.0,
            })),
        )
            .into_response(),
        Ok(SubscribeOutcome::AlreadySubscribed { id }) => (
            StatusCode::OK,
            Json(json!({
                "message": "You are already subscribed to our newsletter!",
                "subscriptionId": id.0,
            })),
        )
            .into_response(),
        Err(err) => error_response(err, hub.environment),
    }
}

async fn read_career_request(
    multipart: &mut Multipart,
) -> Result<(CareerPayload, Option<ResumeUpload>), MultipartError> {
    let mut payload = CareerPayload::default();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let original_name = field.file_name().unwrap_or("resume").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;
                upload = Some(ResumeUpload {
                    original_name,
                    mime_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("name") => payload.name = field.text().await?,
            Some("email") => payload.email = field.text().await?,
            Some("phone") => payload.phone = Some(field.text().await?),
            Some("position") => payload.position = field.text().await?,
            Some("experience") => payload.experience = Some(field.text().await?),
            Some("message") => payload.message = Some(field.text().await?),
            _ => {}
        }
    }

    Ok((payload, upload))
}

/// Map intake failures to the wire shapes clients render. Internal detail is
/// only included outside production.
fn error_response(err: IntakeError, environment: AppEnvironment) -> Response {
    match err {
        IntakeError::Rejected(rejection) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "Validation failed. Please check your inputs.",
                "errors": rejection.errors,
            })),
        )
            .into_response(),
        IntakeError::File(FileError::Missing) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Resume file is required." })),
        )
            .into_response(),
        IntakeError::File(FileError::InvalidType(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Invalid file type. Only PDF, DOC, and DOCX are allowed." })),
        )
            .into_response(),
        IntakeError::File(FileError::TooLarge { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "File is too large. Max size is 5MB." })),
        )
            .into_response(),
        IntakeError::File(FileError::Storage(detail)) => server_error(detail, environment),
        IntakeError::Store(StoreError::InvalidRecord(detail)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": format!("Database validation failed: {detail}") })),
        )
            .into_response(),
        IntakeError::Store(other) => server_error(other.to_string(), environment),
    }
}

fn server_error(detail: String, environment: AppEnvironment) -> Response {
    let mut body = json!({ "message": "An unexpected server error occurred." });
    if environment.exposes_diagnostics() {
        body["error"] = json!(detail);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
