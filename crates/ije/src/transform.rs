//! Field-level transforms between raw slot text and typed values.
//!
//! All widths are in characters, not bytes.

use crate::registry::Justification;
use vital_types::Tristate;

/// Pads with trailing spaces; overflow drops trailing characters.
pub fn left_justify(value: Option<&str>, width: usize) -> String {
    let value = value.unwrap_or_default();
    let mut out: String = value.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// Pads with leading zeros; overflow keeps the right-most characters.
pub fn zero_fill(value: Option<&str>, width: usize) -> String {
    let value = value.unwrap_or_default();
    let chars: Vec<char> = value.chars().collect();
    let kept = &chars[chars.len().saturating_sub(width)..];
    let mut out: String = std::iter::repeat('0').take(width - kept.len()).collect();
    out.extend(kept);
    out
}

pub fn justify(value: Option<&str>, width: usize, justification: Justification) -> String {
    match justification {
        Justification::Left => left_justify(value, width),
        Justification::ZeroFilled => zero_fill(value, width),
    }
}

/// Reads a slot back into a value; blank slots (and all-zero zero-filled slots) are absent.
pub fn unjustify(raw: &str, justification: Justification) -> Option<String> {
    let value = match justification {
        Justification::Left => raw.trim_end(),
        Justification::ZeroFilled => raw.trim().trim_start_matches('0'),
    };
    (!value.trim().is_empty()).then(|| value.to_string())
}

/// `Y` / `N` / `U`, with blank for absent.
pub fn flag_to_ije(value: Tristate<bool>) -> Option<&'static str> {
    match value {
        Tristate::Known(true) => Some("Y"),
        Tristate::Known(false) => Some("N"),
        Tristate::Unknown => Some("U"),
        Tristate::Absent => None,
    }
}

pub fn flag_from_ije(raw: &str) -> Tristate<bool> {
    match raw.trim() {
        "Y" => Tristate::Known(true),
        "N" => Tristate::Known(false),
        "U" => Tristate::Unknown,
        _ => Tristate::Absent,
    }
}

/// Hispanic-origin checkboxes use `H` for yes.
pub fn hispanic_to_ije(value: Tristate<bool>) -> Option<&'static str> {
    match value {
        Tristate::Known(true) => Some("H"),
        other => flag_to_ije(other),
    }
}

pub fn hispanic_from_ije(raw: &str) -> Tristate<bool> {
    match raw.trim() {
        "H" => Tristate::Known(true),
        other => flag_from_ije(other),
    }
}

/// Renders a numeric that may be reported as unknown.
///
/// Known values are zero-padded to `width`, unknown is all `9`s, absent is `None`. The rendered
/// text may be longer than `width`; callers decide how to report that.
pub fn numeric_to_ije(value: Tristate<u32>, width: usize) -> Option<String> {
    match value {
        Tristate::Known(n) => Some(format!("{n:0width$}")),
        Tristate::Unknown => Some("9".repeat(width)),
        Tristate::Absent => None,
    }
}

pub fn numeric_from_ije(raw: &str) -> Tristate<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Tristate::Absent;
    }
    if raw.chars().all(|c| c == '9') {
        return Tristate::Unknown;
    }
    raw.parse().ok().into()
}

/// `HH:MM` to `HHMM`; unknown is `9999`.
pub fn time_to_ije(value: Tristate<&String>) -> Option<String> {
    match value {
        Tristate::Known(time) => Some(time.chars().filter(|c| *c != ':').take(4).collect()),
        Tristate::Unknown => Some("9999".into()),
        Tristate::Absent => None,
    }
}

pub fn time_from_ije(raw: &str) -> Tristate<String> {
    let raw = raw.trim();
    match raw {
        "" => Tristate::Absent,
        "9999" => Tristate::Unknown,
        hhmm if hhmm.len() == 4 && hhmm.chars().all(|c| c.is_ascii_digit()) => {
            Tristate::Known(format!("{}:{}", &hhmm[..2], &hhmm[2..]))
        }
        _ => Tristate::Absent,
    }
}

/// ICD-10 codes are written without the dot in IJE (`I219` for `I21.9`).
pub fn icd10_to_ije(code: &str) -> String {
    code.chars().filter(|c| *c != '.').collect()
}

pub fn icd10_from_ije(raw: &str) -> String {
    let raw = raw.trim();
    if raw.len() > 3 && raw.is_ascii() && !raw.contains('.') {
        format!("{}.{}", &raw[..3], &raw[3..])
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_direction_differs_by_justification() {
        assert_eq!(left_justify(Some("ABCDEF"), 4), "ABCD");
        assert_eq!(zero_fill(Some("123456"), 4), "3456");
        assert_eq!(left_justify(Some("AB"), 4), "AB  ");
        assert_eq!(zero_fill(Some("12"), 4), "0012");
        assert_eq!(left_justify(None, 3), "   ");
        assert_eq!(zero_fill(None, 3), "000");
    }

    #[test]
    fn widths_count_characters() {
        assert_eq!(left_justify(Some("Ñandú"), 6), "Ñandú ");
        assert_eq!(left_justify(Some("Ñandú"), 6).chars().count(), 6);
    }

    #[test]
    fn unjustify_treats_blank_as_absent() {
        assert_eq!(unjustify("SMITH   ", Justification::Left).as_deref(), Some("SMITH"));
        assert_eq!(unjustify("    ", Justification::Left), None);
        assert_eq!(unjustify("000123", Justification::ZeroFilled).as_deref(), Some("123"));
        assert_eq!(unjustify("000000", Justification::ZeroFilled), None);
    }

    #[test]
    fn flags() {
        assert_eq!(flag_to_ije(Tristate::Known(true)), Some("Y"));
        assert_eq!(flag_to_ije(Tristate::Absent), None);
        assert_eq!(flag_from_ije("U"), Tristate::Unknown);
        assert_eq!(flag_from_ije(" "), Tristate::Absent);
        assert_eq!(hispanic_to_ije(Tristate::Known(true)), Some("H"));
        assert_eq!(hispanic_from_ije("N"), Tristate::Known(false));
    }

    #[test]
    fn numerics_allow_unknown() {
        assert_eq!(numeric_to_ije(Tristate::Known(7), 2).as_deref(), Some("07"));
        assert_eq!(numeric_to_ije(Tristate::Unknown, 4).as_deref(), Some("9999"));
        assert_eq!(numeric_to_ije(Tristate::Known(12345), 4).as_deref(), Some("12345"));
        assert_eq!(numeric_from_ije("99"), Tristate::Unknown);
        assert_eq!(numeric_from_ije("07"), Tristate::Known(7));
        assert_eq!(numeric_from_ije("  "), Tristate::Absent);
    }

    #[test]
    fn times_and_icd_codes() {
        let time = "14:30".to_string();
        assert_eq!(time_to_ije(Tristate::Known(&time)).as_deref(), Some("1430"));
        assert_eq!(time_from_ije("1430"), Tristate::Known("14:30".into()));
        assert_eq!(time_from_ije("9999"), Tristate::Unknown);

        assert_eq!(icd10_to_ije("I21.9"), "I219");
        assert_eq!(icd10_from_ije("I219"), "I21.9");
        assert_eq!(icd10_from_ije("R99"), "R99");
    }
}
