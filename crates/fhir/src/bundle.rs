//! Bundle wire model.
//!
//! A bundle is the container for both a full death record (`document`/`collection`) and a
//! message (`message`). Entries are ordered; the first entry of a message bundle is expected to
//! be its `MessageHeader`.

use crate::datatypes::{Identifier, Meta};
use crate::resources::{Resource, Tagged};
use crate::{FhirError, FhirResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,
}

impl BundleEntry {
    pub fn new(full_url: Option<String>, resource: Resource) -> Self {
        Self {
            full_url,
            resource: Some(resource),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Bundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Identifier>,
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// Creates an empty bundle of the given type (`collection`, `document`, `message`).
    pub fn new(type_: &str) -> Self {
        Self {
            type_: type_.to_string(),
            ..Self::default()
        }
    }

    /// Parses a JSON string into a bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON, is not a `Bundle`, or does not match the wire
    /// schema.
    pub fn parse_json(input: &str) -> FhirResult<Self> {
        let value: Value = serde_json::from_str(input)?;
        match Resource::from_value(value)? {
            Resource::Bundle(bundle) => Ok(*bundle),
            other => Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Bundle', got '{}'",
                other.resource_type()
            ))),
        }
    }

    /// Renders the bundle as pretty-printed JSON, `resourceType` first.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> FhirResult<String> {
        let tagged = Tagged {
            resource_type: "Bundle",
            inner: self,
        };
        Ok(serde_json::to_string_pretty(&tagged)?)
    }

    /// Iterates the resources of all entries, skipping entries without one.
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.entry.iter().filter_map(|e| e.resource.as_ref())
    }

    pub fn push(&mut self, full_url: Option<String>, resource: Resource) {
        self.entry.push(BundleEntry::new(full_url, resource));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Patient;

    #[test]
    fn parse_json_accepts_bundle() {
        let input = r#"{
            "resourceType": "Bundle",
            "type": "collection",
            "entry": [
                { "fullUrl": "urn:uuid:1", "resource": { "resourceType": "Patient", "id": "1" } },
                { "resource": { "resourceType": "Device", "id": "d" } }
            ]
        }"#;

        let bundle = Bundle::parse_json(input).expect("parse bundle");
        assert_eq!(bundle.type_, "collection");
        assert_eq!(bundle.entry.len(), 2);
        let types: Vec<_> = bundle.resources().map(Resource::resource_type).collect();
        assert_eq!(types, vec!["Patient", "Device"]);
    }

    #[test]
    fn parse_json_rejects_other_resource_types() {
        let err = Bundle::parse_json(r#"{ "resourceType": "Patient" }"#)
            .expect_err("should reject non-bundle");
        assert!(matches!(err, FhirError::InvalidInput(msg) if msg.contains("'Patient'")));
    }

    #[test]
    fn parse_json_rejects_invalid_json() {
        let err = Bundle::parse_json("{ not json").expect_err("should reject");
        assert!(matches!(err, FhirError::InvalidJson(_)));
    }

    #[test]
    fn to_json_round_trips() {
        let mut bundle = Bundle::new("document");
        bundle.id = Some("b1".into());
        bundle.push(
            Some("urn:uuid:p1".into()),
            Resource::Patient(Patient {
                id: Some("p1".into()),
                ..Patient::default()
            }),
        );

        let json = bundle.to_json().expect("render");
        assert!(json.contains(r#""resourceType": "Bundle""#));
        let back = Bundle::parse_json(&json).expect("reparse");
        assert_eq!(back, bundle);
    }
}
