//! FHIR wire/boundary support for vital-records exchange.
//!
//! This crate provides **wire models** and **format helpers** for the resource-graph
//! representation of vital records and their messaging envelopes:
//! - datatypes (`Coding`, `CodeableConcept`, `Extension`, ...)
//! - the resources a death record or message uses, dispatched on `resourceType`
//! - `Bundle` parse/render with schema-mismatch paths
//! - canonical URLs and code systems of the interoperability standard
//!
//! Record semantics (which resource plays which role) live in `vital-core`; this crate handles
//! the wire shape only. Resources of unrecognised types are preserved verbatim as
//! [`Resource::Other`] so that newer graphs survive a round trip.

pub mod bundle;
pub mod datatypes;
pub mod resources;
pub mod urls;

pub use bundle::{Bundle, BundleEntry};
pub use datatypes::{
    Address, ChoiceValue, CodeableConcept, Coding, Extension, HumanName, Identifier, Meta,
    Quantity, Reference,
};
pub use resources::{
    Composition, CompositionAttester, CompositionEvent, CompositionSection, Location,
    LocationPosition, MessageDestination, MessageHeader, MessageResponse, MessageSource,
    Observation, ObservationComponent, OperationOutcome, OperationOutcomeIssue, Parameters,
    ParametersParameter, Patient, Practitioner, PrimitiveExtension, Procedure,
    ProcedurePerformer, RelatedPerson, Resource,
};

/// Errors returned by the `fhir` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
