use crate::MessageKind;

/// Failures of the messaging layer.
///
/// The three classification failures are kept apart so callers can tell a data-quality gap
/// (no header, or a header without a type) from a message this system does not speak.
#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("bundle has no MessageHeader")]
    HeaderMissing,

    #[error("MessageHeader has no eventUri")]
    EventTypeMissing,

    #[error("unsupported message type: {0}")]
    UnsupportedEventType(String),

    #[error("{0} message carries no record payload")]
    NoRecordPayload(MessageKind),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("record error: {0}")]
    Record(#[from] vital_core::RecordError),

    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),
}

impl MessagingError {
    /// True for the classification failures that may clear up once the sender fixes its data.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::HeaderMissing | Self::EventTypeMissing)
    }
}

pub type MessagingResult<T> = std::result::Result<T, MessagingError>;
