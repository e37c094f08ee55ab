//! Value types shared by the record model, the IJE codec and the message envelopes.
//!
//! - [`NonEmptyText`] guards identifiers and names that must carry content.
//! - [`Tristate`] distinguishes a value that was never supplied from one that was explicitly
//!   reported as unknown. Partial dates and yes/no/unknown answers rely on this distinction.

use serde::{Deserialize, Serialize};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, so fixed-width
/// padding never leaks into identifiers built from IJE slices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`] but maps blank input to `None`.
    pub fn optional(input: impl AsRef<str>) -> Option<Self> {
        Self::new(input).ok()
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A value that may be present, explicitly unknown, or absent.
///
/// `Absent` means nothing was reported. `Unknown` means the reporter stated that the value is not
/// known (IJE `9`-filled numerics, `U` flags, data-absent-reason extensions). The two are never
/// inferred from one another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tristate<T> {
    /// No value was supplied.
    #[default]
    Absent,
    /// The value was explicitly reported as unknown.
    Unknown,
    /// A concrete value.
    Known(T),
}

impl<T> Tristate<T> {
    /// Returns `true` for [`Tristate::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Tristate::Absent)
    }

    /// Returns `true` for [`Tristate::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, Tristate::Unknown)
    }

    /// Returns `true` for [`Tristate::Known`].
    pub fn is_known(&self) -> bool {
        matches!(self, Tristate::Known(_))
    }

    /// Returns the known value, if any.
    pub fn known(self) -> Option<T> {
        match self {
            Tristate::Known(value) => Some(value),
            _ => None,
        }
    }

    /// Borrows the known value, if any.
    pub fn as_ref(&self) -> Tristate<&T> {
        match self {
            Tristate::Absent => Tristate::Absent,
            Tristate::Unknown => Tristate::Unknown,
            Tristate::Known(value) => Tristate::Known(value),
        }
    }

    /// Maps the known value, preserving `Absent` and `Unknown`.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Tristate<U> {
        match self {
            Tristate::Absent => Tristate::Absent,
            Tristate::Unknown => Tristate::Unknown,
            Tristate::Known(value) => Tristate::Known(f(value)),
        }
    }
}

impl<T> From<Option<T>> for Tristate<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Tristate::Known(value),
            None => Tristate::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_padding() {
        let text = NonEmptyText::new("  SMITH   ").expect("non-empty");
        assert_eq!(text.as_str(), "SMITH");
    }

    #[test]
    fn non_empty_text_rejects_blank_input() {
        assert!(matches!(NonEmptyText::new("     "), Err(TextError::Empty)));
        assert!(NonEmptyText::optional("").is_none());
    }

    #[test]
    fn non_empty_text_deserialization_rejects_blank_strings() {
        let err = serde_json::from_str::<NonEmptyText>("\"  \"").expect_err("blank is invalid");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn tristate_keeps_unknown_distinct_from_absent() {
        let absent: Tristate<u32> = Tristate::Absent;
        let unknown: Tristate<u32> = Tristate::Unknown;
        assert!(absent.is_absent());
        assert!(!unknown.is_absent());
        assert_eq!(unknown.map(|v| v + 1), Tristate::Unknown);
        assert_eq!(Tristate::Known(4).map(|v| v * 2).known(), Some(8));
    }

    #[test]
    fn tristate_from_option_never_produces_unknown() {
        assert_eq!(Tristate::from(None::<u32>), Tristate::Absent);
        assert_eq!(Tristate::from(Some(3)), Tristate::Known(3));
    }
}
