//! Resource wire models, dispatched on `resourceType`.
//!
//! Responsibilities:
//! - Define the resources a death record, its sub-graph views and its message envelopes use
//! - Dispatch deserialisation on `resourceType`, keeping unknown resources verbatim
//! - Surface a best-effort path to the failing field when a known resource does not match its
//!   wire schema
//!
//! Notes:
//! - Wire structs do not reject unknown keys; the interoperability standard evolves faster than
//!   this model and extra elements are ignored rather than fatal.

use crate::bundle::Bundle;
use crate::datatypes::{
    Address, ChoiceValue, CodeableConcept, Extension, HumanName, Identifier, Meta, Reference,
};
use crate::{FhirError, FhirResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

// ============================================================================
// Resource dispatch
// ============================================================================

/// Any resource that can appear in a record graph or message bundle.
#[derive(Clone, Debug, PartialEq)]
pub enum Resource {
    Bundle(Box<Bundle>),
    Composition(Composition),
    Location(Location),
    MessageHeader(MessageHeader),
    Observation(Observation),
    OperationOutcome(OperationOutcome),
    Parameters(Parameters),
    Patient(Patient),
    Practitioner(Practitioner),
    Procedure(Procedure),
    RelatedPerson(RelatedPerson),
    /// A resource type this model does not know, kept as raw JSON.
    Other(Value),
}

impl Resource {
    /// Returns the `resourceType` discriminator.
    pub fn resource_type(&self) -> &str {
        match self {
            Resource::Bundle(_) => "Bundle",
            Resource::Composition(_) => "Composition",
            Resource::Location(_) => "Location",
            Resource::MessageHeader(_) => "MessageHeader",
            Resource::Observation(_) => "Observation",
            Resource::OperationOutcome(_) => "OperationOutcome",
            Resource::Parameters(_) => "Parameters",
            Resource::Patient(_) => "Patient",
            Resource::Practitioner(_) => "Practitioner",
            Resource::Procedure(_) => "Procedure",
            Resource::RelatedPerson(_) => "RelatedPerson",
            Resource::Other(value) => value
                .get("resourceType")
                .and_then(Value::as_str)
                .unwrap_or("Unknown"),
        }
    }

    /// Returns the logical id of the resource, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Resource::Bundle(r) => r.id.as_deref(),
            Resource::Composition(r) => r.id.as_deref(),
            Resource::Location(r) => r.id.as_deref(),
            Resource::MessageHeader(r) => r.id.as_deref(),
            Resource::Observation(r) => r.id.as_deref(),
            Resource::OperationOutcome(r) => r.id.as_deref(),
            Resource::Parameters(r) => r.id.as_deref(),
            Resource::Patient(r) => r.id.as_deref(),
            Resource::Practitioner(r) => r.id.as_deref(),
            Resource::Procedure(r) => r.id.as_deref(),
            Resource::RelatedPerson(r) => r.id.as_deref(),
            Resource::Other(value) => value.get("id").and_then(Value::as_str),
        }
    }

    /// Builds a resource from a JSON value, dispatching on `resourceType`.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if `resourceType` is missing, or
    /// [`FhirError::Translation`] (with the failing path) if a known resource type does not
    /// match its wire schema.
    pub fn from_value(value: Value) -> FhirResult<Self> {
        let resource_type = value
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or_else(|| FhirError::InvalidInput("resource is missing resourceType".into()))?
            .to_string();

        match resource_type.as_str() {
            "Bundle" => typed(value, &resource_type).map(|b| Resource::Bundle(Box::new(b))),
            "Composition" => typed(value, &resource_type).map(Resource::Composition),
            "Location" => typed(value, &resource_type).map(Resource::Location),
            "MessageHeader" => typed(value, &resource_type).map(Resource::MessageHeader),
            "Observation" => typed(value, &resource_type).map(Resource::Observation),
            "OperationOutcome" => typed(value, &resource_type).map(Resource::OperationOutcome),
            "Parameters" => typed(value, &resource_type).map(Resource::Parameters),
            "Patient" => typed(value, &resource_type).map(Resource::Patient),
            "Practitioner" => typed(value, &resource_type).map(Resource::Practitioner),
            "Procedure" => typed(value, &resource_type).map(Resource::Procedure),
            "RelatedPerson" => typed(value, &resource_type).map(Resource::RelatedPerson),
            _ => Ok(Resource::Other(value)),
        }
    }
}

fn typed<T: DeserializeOwned>(value: Value, resource_type: &str) -> FhirResult<T> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| {
        let path = err.path().to_string();
        let source = err.into_inner();
        let path = if path.is_empty() || path == "." {
            "<root>"
        } else {
            path.as_str()
        };
        FhirError::Translation(format!("{resource_type} schema mismatch at {path}: {source}"))
    })
}

/// Serialises `inner` with a leading `resourceType` member.
#[derive(Serialize)]
pub(crate) struct Tagged<'a, T: Serialize> {
    #[serde(rename = "resourceType")]
    pub resource_type: &'static str,
    #[serde(flatten)]
    pub inner: &'a T,
}

fn tag<'a, T: Serialize>(resource_type: &'static str, inner: &'a T) -> Tagged<'a, T> {
    Tagged {
        resource_type,
        inner,
    }
}

impl Serialize for Resource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Resource::Bundle(r) => tag("Bundle", r.as_ref()).serialize(serializer),
            Resource::Composition(r) => tag("Composition", r).serialize(serializer),
            Resource::Location(r) => tag("Location", r).serialize(serializer),
            Resource::MessageHeader(r) => tag("MessageHeader", r).serialize(serializer),
            Resource::Observation(r) => tag("Observation", r).serialize(serializer),
            Resource::OperationOutcome(r) => tag("OperationOutcome", r).serialize(serializer),
            Resource::Parameters(r) => tag("Parameters", r).serialize(serializer),
            Resource::Patient(r) => tag("Patient", r).serialize(serializer),
            Resource::Practitioner(r) => tag("Practitioner", r).serialize(serializer),
            Resource::Procedure(r) => tag("Procedure", r).serialize(serializer),
            Resource::RelatedPerson(r) => tag("RelatedPerson", r).serialize(serializer),
            Resource::Other(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Resource::from_value(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Entity resources
// ============================================================================

/// Carrier for extensions on a primitive element (for example `_birthDate`).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct PrimitiveExtension {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(rename = "_birthDate", default, skip_serializing_if = "Option::is_none")]
    pub birth_date_extension: Option<PrimitiveExtension>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<CodeableConcept>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Practitioner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address: Vec<Address>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RelatedPerson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<Reference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationship: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ProcedurePerformer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<CodeableConcept>,
    pub actor: Reference,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Procedure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performed_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<ProcedurePerformer>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct LocationPosition {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub type_: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<LocationPosition>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ObservationComponent {
    pub code: CodeableConcept,
    #[serde(flatten)]
    pub value: ChoiceValue,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<Reference>,
    #[serde(flatten)]
    pub value: ChoiceValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<ObservationComponent>,
}

impl Observation {
    /// Finds the component whose code matches `system`/`code`.
    pub fn component(&self, system: &str, code: &str) -> Option<&ObservationComponent> {
        self.component.iter().find(|c| c.code.has_code(system, code))
    }

    /// Replaces (or removes, when `value` is empty) the component with `system`/`code`.
    pub fn set_component(&mut self, system: &str, code: &str, value: ChoiceValue) {
        self.component.retain(|c| !c.code.has_code(system, code));
        if !value.is_empty() {
            self.component.push(ObservationComponent {
                code: CodeableConcept::from_coding(crate::Coding::new(system, code, "")),
                value,
            });
        }
    }
}

// ============================================================================
// Document index
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CompositionAttester {
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party: Option<Reference>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CompositionEvent {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code: Vec<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detail: Vec<Reference>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CompositionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<Reference>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Composition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attester: Vec<CompositionAttester>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event: Vec<CompositionEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub section: Vec<CompositionSection>,
}

// ============================================================================
// Messaging resources
// ============================================================================

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MessageDestination {
    pub endpoint: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MessageSource {
    pub endpoint: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub identifier: String,
    pub code: String,
}

/// Routing header of a message bundle.
///
/// `eventUri` is optional on the wire so that a header without a type can be told apart from a
/// missing header during classification.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub destination: Vec<MessageDestination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MessageSource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus: Vec<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<MessageResponse>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct ParametersParameter {
    pub name: String,
    #[serde(flatten)]
    pub value: ChoiceValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub part: Vec<ParametersParameter>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Parameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter: Vec<ParametersParameter>,
}

impl Parameters {
    /// Returns the first parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&ParametersParameter> {
        self.parameter.iter().find(|p| p.name == name)
    }

    /// Appends a parameter; empty values are skipped.
    pub fn push(&mut self, name: &str, value: ChoiceValue) {
        if !value.is_empty() {
            self.parameter.push(ParametersParameter {
                name: name.to_string(),
                value,
                part: Vec::new(),
            });
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct OperationOutcomeIssue {
    pub severity: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct OperationOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issue: Vec<OperationOutcomeIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coding;

    #[test]
    fn dispatches_on_resource_type() {
        let value = serde_json::json!({
            "resourceType": "Observation",
            "id": "obs-1",
            "code": { "coding": [{ "system": "http://loinc.org", "code": "69449-7" }] },
            "valueCodeableConcept": { "coding": [{ "system": "http://snomed.info/sct", "code": "38605008" }] }
        });

        let resource = Resource::from_value(value).expect("parse observation");
        match &resource {
            Resource::Observation(obs) => {
                assert_eq!(obs.id.as_deref(), Some("obs-1"));
                assert!(obs
                    .code
                    .as_ref()
                    .is_some_and(|c| c.has_code("http://loinc.org", "69449-7")));
                assert_eq!(
                    obs.value.as_coding().and_then(|c| c.code.as_deref()),
                    Some("38605008")
                );
            }
            other => panic!("expected observation, got {other:?}"),
        }
        assert_eq!(resource.resource_type(), "Observation");
    }

    #[test]
    fn unknown_resources_are_preserved_verbatim() {
        let value = serde_json::json!({
            "resourceType": "Organization",
            "id": "funeral-home",
            "name": "Smith Funeral Home"
        });

        let resource = Resource::from_value(value.clone()).expect("parse unknown");
        assert_eq!(resource.resource_type(), "Organization");
        assert_eq!(resource.id(), Some("funeral-home"));
        assert_eq!(serde_json::to_value(&resource).expect("serialize"), value);
    }

    #[test]
    fn missing_resource_type_is_rejected() {
        let err = Resource::from_value(serde_json::json!({ "id": "x" }))
            .expect_err("should reject missing resourceType");
        assert!(matches!(err, FhirError::InvalidInput(msg) if msg.contains("resourceType")));
    }

    #[test]
    fn schema_mismatch_reports_path() {
        let value = serde_json::json!({
            "resourceType": "Patient",
            "name": [{ "given": "not-an-array" }]
        });

        let err = Resource::from_value(value).expect_err("should reject wrong type");
        match err {
            FhirError::Translation(msg) => {
                assert!(msg.contains("Patient schema mismatch"));
                assert!(msg.contains("given"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn serialises_resource_type_first() {
        let patient = Resource::Patient(Patient {
            id: Some("d1".into()),
            gender: Some("female".into()),
            ..Patient::default()
        });
        let json = serde_json::to_string(&patient).expect("serialize");
        assert!(json.starts_with(r#"{"resourceType":"Patient","id":"d1""#));
    }

    #[test]
    fn set_component_replaces_existing_entry() {
        let mut obs = Observation::default();
        obs.set_component("s", "c", ChoiceValue::string("one"));
        obs.set_component("s", "c", ChoiceValue::string("two"));
        assert_eq!(obs.component.len(), 1);
        assert_eq!(
            obs.component("s", "c").and_then(|c| c.value.value_string.as_deref()),
            Some("two")
        );

        obs.set_component("s", "c", ChoiceValue::default());
        assert!(obs.component.is_empty());

        let cc = CodeableConcept::from_coding(Coding::new("s", "d", ""));
        obs.set_component("s", "d", ChoiceValue::codeable_concept(cc));
        assert!(obs.component("s", "d").is_some());
    }
}
