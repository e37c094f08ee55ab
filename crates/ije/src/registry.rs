//! Field registries: the ordered, immutable table of fixed-width field descriptors for one
//! record kind.
//!
//! A registry is built once from a static table of rows in sequence order. Start offsets are
//! accumulated from the widths, so offsets are contiguous by construction and no field can read
//! past the declared record width.

use crate::{IjeError, IjeResult};
use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Mortality,
    Natality,
}

/// How a value is aligned inside its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Justification {
    /// Trailing spaces; overflow drops trailing characters.
    Left,
    /// Leading zeros; overflow drops leading characters.
    ZeroFilled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// 1-based position of the field in the layout.
    pub sequence: u32,
    /// External short code, e.g. `DOD_YR`.
    pub code: &'static str,
    /// Human-readable name used in issues.
    pub name: &'static str,
    /// 0-based character offset.
    pub start: usize,
    pub width: usize,
    pub justification: Justification,
}

impl FieldDescriptor {
    pub fn end(&self) -> usize {
        self.start + self.width
    }

    /// The encoded form of a missing value.
    pub fn blank(&self) -> String {
        let fill = match self.justification {
            Justification::Left => ' ',
            Justification::ZeroFilled => '0',
        };
        std::iter::repeat(fill).take(self.width).collect()
    }
}

/// One row of a static layout table.
#[derive(Clone, Copy, Debug)]
pub struct FieldRow {
    pub code: &'static str,
    pub name: &'static str,
    pub width: usize,
    pub justification: Justification,
}

#[derive(Clone, Debug)]
pub struct FieldRegistry {
    kind: RecordKind,
    total_width: usize,
    fields: Vec<FieldDescriptor>,
    index: HashMap<&'static str, usize>,
}

impl FieldRegistry {
    /// Builds and validates a registry from rows in sequence order.
    ///
    /// # Errors
    ///
    /// Returns [`IjeError::InvalidRegistry`] if the rows break a layout invariant (see
    /// [`FieldRegistry::validate`]).
    pub fn from_rows(
        kind: RecordKind,
        total_width: usize,
        rows: impl IntoIterator<Item = FieldRow>,
    ) -> IjeResult<Self> {
        let registry = Self::layout(kind, total_width, rows);
        registry.validate()?;
        Ok(registry)
    }

    /// Lays rows out without validation. Only for shipped tables whose layout is checked by tests.
    pub(crate) fn layout(
        kind: RecordKind,
        total_width: usize,
        rows: impl IntoIterator<Item = FieldRow>,
    ) -> Self {
        let mut start = 0;
        let mut fields = Vec::new();
        let mut index = HashMap::new();

        for (i, row) in rows.into_iter().enumerate() {
            index.entry(row.code).or_insert(i);
            fields.push(FieldDescriptor {
                sequence: (i + 1) as u32,
                code: row.code,
                name: row.name,
                start,
                width: row.width,
                justification: row.justification,
            });
            start += row.width;
        }

        Self {
            kind,
            total_width,
            fields,
            index,
        }
    }

    /// Re-checks the layout invariants.
    ///
    /// # Errors
    ///
    /// Returns [`IjeError::InvalidRegistry`] on a zero width, a sequence that does not strictly
    /// increase, a gap or overlap between fields, a duplicate code, or a total width that differs
    /// from the declared record width.
    pub fn validate(&self) -> IjeResult<()> {
        let invalid = |reason: String| IjeError::InvalidRegistry {
            kind: self.kind,
            reason,
        };

        let mut expected_start = 0;
        let mut last_sequence = 0;
        let mut seen = HashSet::new();

        for field in &self.fields {
            if field.width == 0 {
                return Err(invalid(format!("{} has zero width", field.code)));
            }
            if field.sequence <= last_sequence {
                return Err(invalid(format!("{} is out of sequence", field.code)));
            }
            if field.start != expected_start {
                return Err(invalid(format!(
                    "{} starts at {} but the previous field ends at {expected_start}",
                    field.code, field.start
                )));
            }
            if !seen.insert(field.code) {
                return Err(invalid(format!("{} is declared twice", field.code)));
            }
            last_sequence = field.sequence;
            expected_start = field.end();
        }

        if expected_start != self.total_width {
            return Err(invalid(format!(
                "fields cover {expected_start} characters, expected {}",
                self.total_width
            )));
        }
        Ok(())
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn total_width(&self) -> usize {
        self.total_width
    }

    /// Field descriptors in sequence order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn get(&self, code: &str) -> Option<&FieldDescriptor> {
        self.index.get(code).map(|&i| &self.fields[i])
    }

    pub fn position(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Returns the shared registry for a record kind.
///
/// # Errors
///
/// Returns [`IjeError::UnsupportedKind`] for kinds without a shipped layout.
pub fn registry(kind: RecordKind) -> IjeResult<&'static FieldRegistry> {
    match kind {
        RecordKind::Mortality => Ok(&*crate::mortality::MORTALITY),
        other => Err(IjeError::UnsupportedKind(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &'static str, width: usize) -> FieldRow {
        FieldRow {
            code,
            name: code,
            width,
            justification: Justification::Left,
        }
    }

    #[test]
    fn offsets_accumulate() {
        let registry =
            FieldRegistry::from_rows(RecordKind::Mortality, 7, [row("A", 4), row("B", 1), row("C", 2)])
                .expect("valid");

        let b = registry.get("B").expect("B");
        assert_eq!((b.sequence, b.start, b.end()), (2, 4, 5));
        assert_eq!(registry.position("C"), Some(2));
    }

    #[test]
    fn validate_rejects_bad_tables() {
        let short = FieldRegistry::from_rows(RecordKind::Mortality, 10, [row("A", 4)]);
        assert!(matches!(short, Err(IjeError::InvalidRegistry { .. })));

        let duplicate = FieldRegistry::from_rows(RecordKind::Mortality, 2, [row("A", 1), row("A", 1)]);
        assert!(duplicate.is_err());

        let zero = FieldRegistry::from_rows(RecordKind::Mortality, 1, [row("A", 1), row("B", 0)]);
        assert!(zero.is_err());

        let unchecked = FieldRegistry::layout(RecordKind::Mortality, 10, [row("A", 4)]);
        assert!(unchecked.validate().is_err());
    }

    #[test]
    fn blank_depends_on_justification() {
        let registry = FieldRegistry::from_rows(
            RecordKind::Mortality,
            5,
            [
                row("A", 2),
                FieldRow {
                    code: "B",
                    name: "B",
                    width: 3,
                    justification: Justification::ZeroFilled,
                },
            ],
        )
        .expect("valid");
        assert_eq!(registry.get("A").map(FieldDescriptor::blank).as_deref(), Some("  "));
        assert_eq!(registry.get("B").map(FieldDescriptor::blank).as_deref(), Some("000"));
    }

    #[test]
    fn fields_reaching_past_the_record_width_are_rejected() {
        let wide = FieldRegistry::from_rows(RecordKind::Mortality, 3, [row("A", 5)]);
        assert!(matches!(wide, Err(IjeError::InvalidRegistry { .. })));
    }

    #[test]
    fn natality_is_not_shipped() {
        assert!(matches!(
            registry(RecordKind::Natality),
            Err(IjeError::UnsupportedKind(RecordKind::Natality))
        ));
    }
}
