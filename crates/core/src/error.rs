/// Errors raised while assembling or restoring a death record graph.
///
/// Restoration fails fast only where continuing would leave a structurally meaningless graph;
/// everything else (unknown resources, unknown observation codes) is skipped.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("structural error: expected {expected}")]
    Structural { expected: String },

    #[error("observation {id} has no code")]
    MissingObservationCode { id: String },

    #[error("record contains more than one decedent (Patient {first} and {second})")]
    DuplicateSubject { first: String, second: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),
}

impl RecordError {
    pub(crate) fn structural(expected: impl Into<String>) -> Self {
        Self::Structural {
            expected: expected.into(),
        }
    }
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
