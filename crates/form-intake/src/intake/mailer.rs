/// One outbound email, fully rendered: subject line plus plain-text and HTML
/// bodies built from submission data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Handoff confirmation from the transport. This is not an end-to-end
/// delivery confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub message_id: String,
}

/// Outbound delivery failures. No retry or queueing happens here; the
/// orchestrator sees the failure synchronously.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("mail transport unreachable: {0}")]
    Transport(String),
    #[error("message rejected by transport: {0}")]
    Rejected(String),
}

/// Mail transport capability. Constructed once at process start and shared
/// with every orchestrator; the core never inspects transport internals.
pub trait MailTransport: Send + Sync {
    fn deliver(&self, message: EmailMessage) -> Result<DeliveryReceipt, DeliveryError>;
}
