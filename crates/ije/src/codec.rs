//! The positional codec: text ⇄ field values for one registry.

use crate::registry::{FieldDescriptor, FieldRegistry};
use crate::transform::{justify, unjustify};
use crate::{IjeError, IjeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An advisory problem found during a pass. Issues never abort decoding or encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Short code of the field concerned.
    pub code: String,
    /// Human-readable name of the field concerned.
    pub name: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.code, self.message)
    }
}

/// Raw field values keyed by short code. Blank fields are absent rather than empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, String>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.0.get(code).map(String::as_str)
    }

    /// Sets a value; `None` or an empty string removes it.
    pub fn set(&mut self, code: &str, value: Option<String>) {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => {
                self.0.insert(code.to_string(), v);
            }
            None => {
                self.0.remove(code);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            let code: String = k.into();
            values.set(&code, Some(v.into()));
        }
        values
    }
}

/// A codec bound to one registry, owning the issue list of the passes it runs.
#[derive(Debug)]
pub struct IjeCodec {
    registry: &'static FieldRegistry,
    issues: Vec<Issue>,
}

impl IjeCodec {
    pub fn new(registry: &'static FieldRegistry) -> Self {
        Self {
            registry,
            issues: Vec::new(),
        }
    }

    pub fn registry(&self) -> &'static FieldRegistry {
        self.registry
    }

    /// Issues accumulated so far, in the order they were raised.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }

    pub(crate) fn push_issue(&mut self, field: &FieldDescriptor, message: impl Into<String>) {
        let issue = Issue {
            code: field.code.to_string(),
            name: field.name.to_string(),
            message: message.into(),
        };
        tracing::debug!(%issue, "IJE issue");
        self.issues.push(issue);
    }

    /// Slices a line into field values.
    ///
    /// Short input is padded with spaces; over-long input is truncated to the record width.
    ///
    /// # Errors
    ///
    /// Returns [`IjeError::EmptyInput`] if `text` has no characters at all.
    pub fn decode(&mut self, text: &str) -> IjeResult<FieldValues> {
        if text.is_empty() {
            return Err(IjeError::EmptyInput);
        }

        let width = self.registry.total_width();
        let mut chars: Vec<char> = text.chars().collect();
        if chars.len() > width {
            tracing::warn!(
                length = chars.len(),
                width,
                "IJE input longer than the record width; truncating"
            );
            chars.truncate(width);
        }
        chars.resize(width, ' ');

        let mut values = FieldValues::new();
        for field in self.registry.fields() {
            let raw: String = chars[field.start..field.end()].iter().collect();
            values.set(field.code, unjustify(&raw, field.justification));
        }
        Ok(values)
    }

    /// Lays field values out into a line of exactly the registry width.
    ///
    /// Values for codes the registry does not declare are reported as issues and skipped.
    pub fn encode(&mut self, values: &FieldValues) -> String {
        for (code, _) in values.iter() {
            if self.registry.get(code).is_none() {
                let issue = Issue {
                    code: code.to_string(),
                    name: code.to_string(),
                    message: "no such field in the layout; value ignored".into(),
                };
                tracing::debug!(%issue, "IJE issue");
                self.issues.push(issue);
            }
        }

        let mut out = String::with_capacity(self.registry.total_width());
        for field in self.registry.fields() {
            out.push_str(&justify(values.get(field.code), field.width, field.justification));
        }
        out
    }

    /// Reads one field of an already decoded line.
    ///
    /// # Errors
    ///
    /// Returns [`IjeError::UnknownField`] if the registry does not declare `code`.
    pub fn field<'v>(&self, values: &'v FieldValues, code: &str) -> IjeResult<Option<&'v str>> {
        self.registry
            .get(code)
            .ok_or_else(|| IjeError::UnknownField(code.to_string()))?;
        Ok(values.get(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{FieldRow, Justification, RecordKind};
    use once_cell::sync::Lazy;

    static SMALL: Lazy<FieldRegistry> = Lazy::new(|| {
        FieldRegistry::from_rows(
            RecordKind::Mortality,
            10,
            [
                FieldRow { code: "NAME", name: "Name", width: 5, justification: Justification::Left },
                FieldRow { code: "FLAG", name: "Flag", width: 1, justification: Justification::Left },
                FieldRow { code: "NUM", name: "Number", width: 4, justification: Justification::ZeroFilled },
            ],
        )
        .expect("valid layout")
    });

    #[test]
    fn empty_input_is_a_hard_error() {
        let mut codec = IjeCodec::new(&SMALL);
        assert!(matches!(codec.decode(""), Err(IjeError::EmptyInput)));
    }

    #[test]
    fn short_input_is_padded() {
        let mut codec = IjeCodec::new(&SMALL);
        let values = codec.decode("ANN").expect("decode");
        assert_eq!(values.get("NAME"), Some("ANN"));
        assert_eq!(values.get("FLAG"), None);
        assert_eq!(values.get("NUM"), None);
    }

    #[test]
    fn long_input_is_truncated() {
        let mut codec = IjeCodec::new(&SMALL);
        let values = codec.decode("BOBBYY0042EXTRA").expect("decode");
        assert_eq!(values.get("NUM"), Some("42"));
        assert!(codec.issues().is_empty());
    }

    #[test]
    fn encode_always_fills_the_width() {
        let mut codec = IjeCodec::new(&SMALL);
        assert_eq!(codec.encode(&FieldValues::new()), "      0000");

        let values: FieldValues = [("NAME", "ALEXANDRA"), ("NUM", "123456")].into_iter().collect();
        let line = codec.encode(&values);
        assert_eq!(line, "ALEXA 3456");
        assert_eq!(line.chars().count(), SMALL.total_width());
    }

    #[test]
    fn unknown_codes_raise_issues_without_failing() {
        let mut codec = IjeCodec::new(&SMALL);
        let values: FieldValues = [("BOGUS", "X"), ("FLAG", "Y")].into_iter().collect();
        let line = codec.encode(&values);

        assert_eq!(&line[5..6], "Y");
        assert_eq!(codec.issues().len(), 1);
        assert_eq!(codec.issues()[0].code, "BOGUS");
        assert!(matches!(
            codec.field(&values, "BOGUS"),
            Err(IjeError::UnknownField(_))
        ));
    }

    #[test]
    fn left_and_flag_fields_round_trip() {
        let mut codec = IjeCodec::new(&SMALL);
        let values: FieldValues = [("NAME", "JO"), ("FLAG", "U"), ("NUM", "7")].into_iter().collect();
        let line = codec.encode(&values);
        let decoded = codec.decode(&line).expect("decode");
        assert_eq!(decoded, values);
    }
}
