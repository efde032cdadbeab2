use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryStore, InMemorySubscriptionStore, LoggingMailTransport};
use crate::routes::with_intake_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use form_intake::config::AppConfig;
use form_intake::error::AppError;
use form_intake::intake::domain::{Booking, CareerApplication, Contact};
use form_intake::intake::forms::{CareerIntake, NewsletterIntake};
use form_intake::intake::pipeline::IntakePipeline;
use form_intake::intake::router::IntakeHub;
use form_intake::intake::storage::LocalResumeStorage;
use form_intake::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let mailer = Arc::new(LoggingMailTransport::default());
    let resume_storage = Arc::new(LocalResumeStorage::new(config.uploads.resume_dir.clone())?);
    let bookings: Arc<InMemoryStore<Booking>> = Arc::new(InMemoryStore::default());
    let contacts: Arc<InMemoryStore<Contact>> = Arc::new(InMemoryStore::default());
    let careers: Arc<InMemoryStore<CareerApplication>> = Arc::new(InMemoryStore::default());
    let hub = Arc::new(IntakeHub {
        bookings: IntakePipeline::new(bookings, mailer.clone(), config.mail.clone()),
        contacts: IntakePipeline::new(contacts, mailer.clone(), config.mail.clone()),
        careers: CareerIntake::new(careers, resume_storage, mailer.clone(), config.mail.clone()),
        newsletter: NewsletterIntake::new(
            Arc::new(InMemorySubscriptionStore::default()),
            mailer,
            config.mail.clone(),
        ),
        environment: config.environment,
    });

    let app = with_intake_routes(hub)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "form intake service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
