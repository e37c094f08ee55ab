//! Partial dates whose year, month, day and time are independently present, absent or unknown.
//!
//! Wire form: a `PartialDateTime` extension with `date-year`, `date-month`, `date-day` and
//! `date-time` sub-extensions. A known component carries `valueUnsignedInt` (or `valueTime`); an
//! unknown component carries a nested data-absent-reason extension with `valueCode = "unknown"`;
//! an absent component is omitted. Components are never inferred from each other.

use chrono::NaiveDate;
use fhir::urls::{DATA_ABSENT_REASON, DATE_DAY, DATE_MONTH, DATE_TIME, DATE_YEAR, PARTIAL_DATE_TIME};
use fhir::{ChoiceValue, Extension};
use vital_types::Tristate;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialDate {
    pub year: Tristate<u32>,
    pub month: Tristate<u32>,
    pub day: Tristate<u32>,
    /// `HH:MM`.
    pub time: Tristate<String>,
}

impl PartialDate {
    pub fn ymd(year: u32, month: u32, day: u32) -> Self {
        Self {
            year: Tristate::Known(year),
            month: Tristate::Known(month),
            day: Tristate::Known(day),
            time: Tristate::Absent,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_absent()
            && self.month.is_absent()
            && self.day.is_absent()
            && self.time.is_absent()
    }

    /// Returns `YYYY-MM-DD` when year, month and day are known and form a calendar date.
    pub fn complete_date(&self) -> Option<String> {
        match (&self.year, &self.month, &self.day) {
            (Tristate::Known(y), Tristate::Known(m), Tristate::Known(d)) => {
                let date = NaiveDate::from_ymd_opt(i32::try_from(*y).ok()?, *m, *d)?;
                Some(date.format("%Y-%m-%d").to_string())
            }
            _ => None,
        }
    }

    /// Returns `YYYY-MM-DDTHH:MM:00` when the date is complete and the time known, otherwise the
    /// complete date alone.
    pub fn complete_date_time(&self) -> Option<String> {
        let date = self.complete_date()?;
        match &self.time {
            Tristate::Known(time) => Some(format!("{date}T{time}:00")),
            _ => Some(date),
        }
    }

    /// Renders the `PartialDateTime` extension, or `None` when every component is absent.
    pub fn to_extension(&self) -> Option<Extension> {
        if self.is_empty() {
            return None;
        }

        let mut parts = Vec::new();
        push_part(&mut parts, DATE_YEAR, self.year.as_ref().map(|v| ChoiceValue::unsigned_int(*v)));
        push_part(&mut parts, DATE_MONTH, self.month.as_ref().map(|v| ChoiceValue::unsigned_int(*v)));
        push_part(&mut parts, DATE_DAY, self.day.as_ref().map(|v| ChoiceValue::unsigned_int(*v)));
        push_part(
            &mut parts,
            DATE_TIME,
            self.time.as_ref().map(|t| ChoiceValue {
                value_time: Some(format!("{t}:00")),
                ..ChoiceValue::default()
            }),
        );

        Some(Extension::nested(PARTIAL_DATE_TIME, parts))
    }

    /// Reads the `PartialDateTime` extension out of an extension list.
    pub fn from_extensions(extensions: &[Extension]) -> Option<Self> {
        let ext = Extension::find(extensions, PARTIAL_DATE_TIME)?;
        Some(Self {
            year: read_number(&ext.extension, DATE_YEAR),
            month: read_number(&ext.extension, DATE_MONTH),
            day: read_number(&ext.extension, DATE_DAY),
            time: read_part(&ext.extension, DATE_TIME, |v| {
                v.value_time.as_deref().map(|t| t.chars().take(5).collect())
            }),
        })
    }

    /// Parses a plain FHIR date or dateTime (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`, optionally
    /// followed by `THH:MM...`). Components not present in the text are absent.
    pub fn parse_plain(text: &str) -> Self {
        let (date, time) = match text.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (text, None),
        };
        let mut parts = date.split('-').map(|p| p.parse::<u32>().ok());
        let year = parts.next().flatten();
        let month = parts.next().flatten();
        let day = parts.next().flatten();
        let time = time
            .filter(|t| t.len() >= 5)
            .map(|t| t.chars().take(5).collect::<String>());

        Self {
            year: year.into(),
            month: month.into(),
            day: day.into(),
            time: time.into(),
        }
    }

    /// Reads the partial date of an element, preferring the extension over the plain field.
    pub fn read(extensions: &[Extension], plain: Option<&str>) -> Self {
        Self::from_extensions(extensions)
            .or_else(|| plain.map(Self::parse_plain))
            .unwrap_or_default()
    }

    /// Writes the partial date into an element and returns the plain value for it.
    pub fn write(&self, extensions: &mut Vec<Extension>) -> Option<String> {
        Extension::upsert(extensions, PARTIAL_DATE_TIME, self.to_extension());
        self.complete_date_time()
    }
}

fn push_part(parts: &mut Vec<Extension>, url: &str, value: Tristate<ChoiceValue>) {
    match value {
        Tristate::Absent => {}
        Tristate::Unknown => parts.push(Extension::nested(
            url,
            vec![Extension::new(DATA_ABSENT_REASON, ChoiceValue::code("unknown"))],
        )),
        Tristate::Known(value) => parts.push(Extension::new(url, value)),
    }
}

fn read_part<T>(
    parts: &[Extension],
    url: &str,
    read: impl FnOnce(&ChoiceValue) -> Option<T>,
) -> Tristate<T> {
    let Some(part) = Extension::find(parts, url) else {
        return Tristate::Absent;
    };
    if Extension::find(&part.extension, DATA_ABSENT_REASON).is_some() {
        return Tristate::Unknown;
    }
    read(&part.value).into()
}

fn read_number(parts: &[Extension], url: &str) -> Tristate<u32> {
    read_part(parts, url, |v| {
        v.value_unsigned_int
            .or_else(|| v.value_integer.and_then(|n| u32::try_from(n).ok()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_are_independent() {
        let date = PartialDate {
            year: Tristate::Known(2021),
            month: Tristate::Unknown,
            day: Tristate::Absent,
            time: Tristate::Known("14:30".into()),
        };

        let ext = date.to_extension().expect("extension");
        assert_eq!(ext.url, PARTIAL_DATE_TIME);
        assert_eq!(ext.extension.len(), 3);

        let back = PartialDate::from_extensions(&[ext]).expect("read back");
        assert_eq!(back, date);
        assert!(back.complete_date().is_none());
    }

    #[test]
    fn unknown_component_uses_data_absent_reason() {
        let date = PartialDate {
            year: Tristate::Unknown,
            ..PartialDate::default()
        };
        let ext = date.to_extension().expect("extension");
        let year = Extension::find(&ext.extension, DATE_YEAR).expect("year part");
        assert!(year.value.is_empty());
        let reason = Extension::find(&year.extension, DATA_ABSENT_REASON).expect("reason");
        assert_eq!(reason.value.value_code.as_deref(), Some("unknown"));
    }

    #[test]
    fn empty_date_renders_no_extension() {
        assert!(PartialDate::default().to_extension().is_none());
    }

    #[test]
    fn complete_date_requires_a_calendar_date() {
        assert_eq!(
            PartialDate::ymd(2020, 2, 29).complete_date().as_deref(),
            Some("2020-02-29")
        );
        assert!(PartialDate::ymd(2021, 2, 29).complete_date().is_none());
    }

    #[test]
    fn write_returns_plain_date_time_when_complete() {
        let mut date = PartialDate::ymd(2019, 1, 5);
        date.time = Tristate::Known("08:15".into());

        let mut extensions = Vec::new();
        let plain = date.write(&mut extensions);
        assert_eq!(plain.as_deref(), Some("2019-01-05T08:15:00"));
        assert_eq!(extensions.len(), 1);
        assert_eq!(PartialDate::read(&extensions, None), date);
    }

    #[test]
    fn plain_dates_are_parsed_when_no_extension_exists() {
        let date = PartialDate::read(&[], Some("1940-07-12"));
        assert_eq!(date, PartialDate::ymd(1940, 7, 12));

        let partial = PartialDate::parse_plain("1940");
        assert_eq!(partial.year, Tristate::Known(1940));
        assert!(partial.month.is_absent());
    }
}
