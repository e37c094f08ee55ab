//! FHIR datatypes shared by the resource wire models.
//!
//! Choice-typed `value[x]` elements are modelled by [`ChoiceValue`], which is flattened into every
//! element that carries one (observations, components, extensions, parameters). At most one of
//! its fields is expected to be set; readers take whichever is present.

use serde::{Deserialize, Serialize};

/// Resource metadata. Only profiles are modelled.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile: Vec<String>,
}

impl Meta {
    pub fn with_profile(profile: &str) -> Self {
        Self {
            profile: vec![profile.to_string()],
        }
    }

    pub fn has_profile(&self, profile: &str) -> bool {
        self.profile.iter().any(|p| p == profile)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    pub fn new(system: &str, code: &str, display: &str) -> Self {
        Self {
            system: Some(system.to_string()),
            code: Some(code.to_string()),
            display: (!display.is_empty()).then(|| display.to_string()),
        }
    }

    /// Returns true when system and code both match.
    pub fn is(&self, system: &str, code: &str) -> bool {
        self.system.as_deref() == Some(system) && self.code.as_deref() == Some(code)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            text: None,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            coding: Vec::new(),
            text: Some(text.to_string()),
        }
    }

    pub fn first_coding(&self) -> Option<&Coding> {
        self.coding.first()
    }

    /// Returns the code of the first coding, if any.
    pub fn first_code(&self) -> Option<&str> {
        self.coding.first().and_then(|c| c.code.as_deref())
    }

    pub fn has_code(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|c| c.is(system, code))
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Reference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Reference {
    pub fn to(target: &str) -> Self {
        Self {
            reference: Some(target.to_string()),
        }
    }

    /// Returns the referenced entity id (see [`vital_uuid::id_from_reference`]).
    pub fn target_id(&self) -> Option<&str> {
        self.reference.as_deref().map(vital_uuid::id_from_reference)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// The `value[x]` choice element.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_integer: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_unsigned_int: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_coding: Option<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_codeable_concept: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_reference: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_address: Option<Address>,
}

impl ChoiceValue {
    pub fn string(value: &str) -> Self {
        Self {
            value_string: Some(value.to_string()),
            ..Self::default()
        }
    }

    pub fn codeable_concept(value: CodeableConcept) -> Self {
        Self {
            value_codeable_concept: Some(value),
            ..Self::default()
        }
    }

    pub fn unsigned_int(value: u32) -> Self {
        Self {
            value_unsigned_int: Some(value),
            ..Self::default()
        }
    }

    pub fn code(value: &str) -> Self {
        Self {
            value_code: Some(value.to_string()),
            ..Self::default()
        }
    }

    pub fn boolean(value: bool) -> Self {
        Self {
            value_boolean: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns a textual rendering of whichever scalar value is present.
    pub fn as_text(&self) -> Option<String> {
        if let Some(s) = &self.value_string {
            return Some(s.clone());
        }
        if let Some(c) = &self.value_code {
            return Some(c.clone());
        }
        if let Some(n) = self.value_unsigned_int {
            return Some(n.to_string());
        }
        if let Some(n) = self.value_integer {
            return Some(n.to_string());
        }
        if let Some(cc) = &self.value_codeable_concept {
            return cc.text.clone().or_else(|| cc.first_code().map(str::to_string));
        }
        self.value_coding
            .as_ref()
            .and_then(|c| c.code.clone())
            .or_else(|| self.value_date_time.clone())
            .or_else(|| self.value_time.clone())
    }

    /// Returns the coding carried by `valueCodeableConcept` or `valueCoding`.
    pub fn as_coding(&self) -> Option<&Coding> {
        self.value_codeable_concept
            .as_ref()
            .and_then(CodeableConcept::first_coding)
            .or(self.value_coding.as_ref())
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Extension {
    pub url: String,
    #[serde(flatten)]
    pub value: ChoiceValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

impl Extension {
    pub fn new(url: &str, value: ChoiceValue) -> Self {
        Self {
            url: url.to_string(),
            value,
            extension: Vec::new(),
        }
    }

    pub fn nested(url: &str, extension: Vec<Extension>) -> Self {
        Self {
            url: url.to_string(),
            value: ChoiceValue::default(),
            extension,
        }
    }

    /// Finds the first extension with `url` in a list.
    pub fn find<'a>(extensions: &'a [Extension], url: &str) -> Option<&'a Extension> {
        extensions.iter().find(|e| e.url == url)
    }

    /// Replaces (or removes, when `value` is `None`) the extension with `url` in a list.
    pub fn upsert(extensions: &mut Vec<Extension>, url: &str, value: Option<Extension>) {
        extensions.retain(|e| e.url != url);
        if let Some(value) = value {
            extensions.push(value);
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<CodeableConcept>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct HumanName {
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub use_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suffix: Vec<String>,
}

impl HumanName {
    pub fn is_empty(&self) -> bool {
        self.family.is_none() && self.given.is_empty() && self.suffix.is_empty()
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub line: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_value_flattens_into_extension() {
        let ext = Extension::new("http://example.org/x", ChoiceValue::unsigned_int(2021));
        let json = serde_json::to_string(&ext).expect("serialize");
        assert_eq!(json, r#"{"url":"http://example.org/x","valueUnsignedInt":2021}"#);

        let back: Extension = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, ext);
    }

    #[test]
    fn choice_value_as_text_prefers_string_then_code() {
        assert_eq!(ChoiceValue::string("abc").as_text().as_deref(), Some("abc"));
        assert_eq!(ChoiceValue::code("Y").as_text().as_deref(), Some("Y"));
        let cc = CodeableConcept::from_coding(Coding::new("s", "N", ""));
        assert_eq!(ChoiceValue::codeable_concept(cc).as_text().as_deref(), Some("N"));
        assert!(ChoiceValue::default().as_text().is_none());
    }

    #[test]
    fn upsert_replaces_and_removes_extensions() {
        let mut exts = vec![Extension::new("a", ChoiceValue::string("1"))];
        Extension::upsert(&mut exts, "a", Some(Extension::new("a", ChoiceValue::string("2"))));
        assert_eq!(exts.len(), 1);
        assert_eq!(exts[0].value.value_string.as_deref(), Some("2"));

        Extension::upsert(&mut exts, "a", None);
        assert!(exts.is_empty());
    }

    #[test]
    fn empty_display_is_omitted() {
        let coding = Coding::new("http://loinc.org", "81956-5", "");
        let json = serde_json::to_string(&coding).expect("serialize");
        assert!(!json.contains("display"));
    }
}
