//! Internal implementation of identity tokens.

use std::fmt;
use uuid::Uuid;

/// Prefix used for bundle entry `fullUrl` values and intra-bundle references.
pub const URN_UUID_PREFIX: &str = "urn:uuid:";

/// A freshly minted identity token.
///
/// Always displayed in the lowercase hyphenated form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(Uuid);

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceId {
    /// Mints a new random (v4) token.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns true if `input` is in canonical lowercase hyphenated form.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 36
            && input.bytes().enumerate().all(|(idx, b)| match idx {
                8 | 13 | 18 | 23 => b == b'-',
                _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            })
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Builds the `urn:uuid:` full URL for an arbitrary entity id.
pub fn full_url(id: &str) -> String {
    format!("{URN_UUID_PREFIX}{id}")
}

/// Extracts the entity id from a reference string.
///
/// Supports `urn:uuid:<id>` and relative `Type/<id>` references; anything else is returned as-is
/// so that bare ids still resolve.
pub fn id_from_reference(reference: &str) -> &str {
    if let Some(id) = reference.strip_prefix(URN_UUID_PREFIX) {
        return id;
    }
    match reference.rsplit_once('/') {
        Some((_, id)) if !id.is_empty() => id,
        _ => reference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generates_canonical_token() {
        let id = ResourceId::new();
        assert!(ResourceId::is_canonical(&id.to_string()));
        assert_ne!(id, ResourceId::new());
    }

    #[test]
    fn test_is_canonical_rejects_uppercase_and_simple_forms() {
        assert!(ResourceId::is_canonical("550e8400-e29b-41d4-a716-446655440000"));
        for input in [
            "550E8400-E29B-41D4-A716-446655440000",
            "550e8400e29b41d4a716446655440000",
            "not-a-token",
            "",
        ] {
            assert!(!ResourceId::is_canonical(input), "{input}");
        }
    }

    #[test]
    fn test_full_url_round_trips_through_reference_parsing() {
        let id = ResourceId::new().to_string();
        let url = full_url(&id);
        assert!(url.starts_with(URN_UUID_PREFIX));
        assert_eq!(id_from_reference(&url), id);
    }

    #[test]
    fn test_id_from_reference_handles_relative_and_bare_references() {
        assert_eq!(id_from_reference("Patient/Decedent-Example1"), "Decedent-Example1");
        assert_eq!(id_from_reference("Decedent-Example1"), "Decedent-Example1");
        assert_eq!(id_from_reference("urn:uuid:abc"), "abc");
    }
}
