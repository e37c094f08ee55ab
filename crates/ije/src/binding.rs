//! Glue between field values and a [`DeathRecord`].
//!
//! The mortality table in [`crate::mortality`] attaches a [`Binding`] to every row. Encoding walks
//! the table and renders each bound accessor into its slot; decoding walks it the other way,
//! touching the record only for values that are present so a blank line yields an empty record.

use crate::codec::{FieldValues, IjeCodec};
use crate::mappings::ValueSet;
use crate::mortality::{ROWS, MORTALITY};
use crate::registry::{FieldDescriptor, RecordKind};
use crate::transform::{
    flag_from_ije, flag_to_ije, hispanic_from_ije, hispanic_to_ije, icd10_from_ije, icd10_to_ije,
    numeric_from_ije, numeric_to_ije, time_from_ije, time_to_ije,
};
use crate::{IjeError, IjeResult};
use fhir::urls::ICD10;
use fhir::Coding;
use std::collections::{BTreeMap, HashMap};
use vital_core::{
    AddressField, AddressKey, CauseLine, CodedField, DateField, DeathRecord, EntityAxisEntry,
    FlagField, GeoFlag, PartialDate, RecordAxisEntry, TextField,
};
use vital_types::Tristate;

const ENTITY_AXIS_CHUNK: usize = 8;
const RECORD_AXIS_CHUNK: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DatePart {
    Year,
    Month,
    Day,
    Time,
}

/// How one IJE field reads from and writes to a record.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Binding {
    /// Carried through the codec only.
    Unbound,
    Text(TextField),
    Flag(FlagField),
    HispanicFlag(FlagField),
    Coded(CodedField, &'static ValueSet),
    /// An ICD-10 code written without its dot.
    CauseCode(CodedField),
    DatePart(DateField, DatePart),
    Age,
    Address(AddressField, AddressKey),
    CityLimits,
    /// First letter of the middle name; only read back when the full middle name is blank.
    MiddleInitial,
    CauseText(u32),
    CauseInterval(u32),
    EntityAxis,
    RecordAxis,
}

/// Multi-valued accessors read once per pass.
struct Lists {
    causes: Vec<CauseLine>,
    entity_axis: Vec<EntityAxisEntry>,
    record_axis: Vec<RecordAxisEntry>,
}

/// Values collected while decoding that are written to the record in one go.
#[derive(Default)]
struct Pending {
    dates: HashMap<DateField, PartialDate>,
    causes: BTreeMap<u32, CauseLine>,
    middle_initial: Option<String>,
    entity_axis: Vec<EntityAxisEntry>,
    record_axis: Vec<RecordAxisEntry>,
}

impl IjeCodec {
    /// A codec over the shared mortality registry.
    pub fn mortality() -> Self {
        Self::new(&MORTALITY)
    }

    fn require_mortality(&self) -> IjeResult<()> {
        match self.registry().kind() {
            RecordKind::Mortality => Ok(()),
            other => Err(IjeError::UnsupportedKind(other)),
        }
    }

    /// Reads every bound field of `record` into raw values.
    ///
    /// # Errors
    ///
    /// Returns [`IjeError::UnsupportedKind`] if the codec is not bound to a mortality registry.
    pub fn record_to_values(&mut self, record: &DeathRecord) -> IjeResult<FieldValues> {
        self.require_mortality()?;
        let registry = self.registry();
        let lists = Lists {
            causes: record.cause_of_death_part1(),
            entity_axis: record.entity_axis(),
            record_axis: record.record_axis(),
        };

        let mut values = FieldValues::new();
        for row in ROWS {
            let Some(field) = registry.get(row.field.code) else {
                continue;
            };
            let value = self.render(record, &lists, row.binding, field);
            values.set(field.code, value);
        }
        Ok(values)
    }

    /// Writes raw values into a fresh record.
    ///
    /// Values that cannot be translated are reported as issues and left unset.
    ///
    /// # Errors
    ///
    /// Returns [`IjeError::UnsupportedKind`] if the codec is not bound to a mortality registry.
    pub fn values_to_record(&mut self, values: &FieldValues) -> IjeResult<DeathRecord> {
        self.require_mortality()?;
        let registry = self.registry();
        let mut record = DeathRecord::new();
        let mut pending = Pending::default();

        for row in ROWS {
            let Some(field) = registry.get(row.field.code) else {
                continue;
            };
            let Some(raw) = values.get(field.code) else {
                continue;
            };
            self.apply(&mut record, &mut pending, row.binding, field, raw);
        }

        if let Some(initial) = pending.middle_initial {
            if record.text(TextField::MiddleName).is_none() {
                self.set_text(&mut record, TextField::MiddleName, &initial, "MNAME");
            }
        }
        for (field, date) in pending.dates {
            record.set_date(field, &date);
        }
        if !pending.causes.is_empty() {
            record.set_cause_of_death_part1(pending.causes.into_values().collect());
        }
        if !pending.entity_axis.is_empty() {
            record.set_entity_axis_codes(pending.entity_axis);
        }
        if !pending.record_axis.is_empty() {
            record.set_record_axis_codes(pending.record_axis);
        }
        Ok(record)
    }

    /// Encodes a record as one IJE line.
    ///
    /// # Errors
    ///
    /// Returns [`IjeError::UnsupportedKind`] if the codec is not bound to a mortality registry.
    pub fn record_to_ije(&mut self, record: &DeathRecord) -> IjeResult<String> {
        let values = self.record_to_values(record)?;
        Ok(self.encode(&values))
    }

    /// Decodes one IJE line into a record.
    ///
    /// # Errors
    ///
    /// Returns [`IjeError::EmptyInput`] for an empty line and [`IjeError::UnsupportedKind`] if the
    /// codec is not bound to a mortality registry.
    pub fn ije_to_record(&mut self, text: &str) -> IjeResult<DeathRecord> {
        let values = self.decode(text)?;
        self.values_to_record(&values)
    }

    fn render(
        &mut self,
        record: &DeathRecord,
        lists: &Lists,
        binding: Binding,
        field: &FieldDescriptor,
    ) -> Option<String> {
        match binding {
            Binding::Unbound => None,
            Binding::Text(text) => record.text(text),
            Binding::Flag(flag) => flag_to_ije(record.flag(flag)).map(str::to_string),
            Binding::HispanicFlag(flag) => hispanic_to_ije(record.flag(flag)).map(str::to_string),
            Binding::Coded(coded, set) => {
                let coding = record.coded(coded)?;
                match set.to_ije(&coding) {
                    Some(code) => Some(code.to_string()),
                    None => {
                        let code = coding.code.unwrap_or_default();
                        self.push_issue(field, format!("no {} mapping for '{code}'", set.name));
                        None
                    }
                }
            }
            Binding::CauseCode(coded) => record
                .coded(coded)
                .and_then(|c| c.code)
                .map(|code| icd10_to_ije(&code)),
            Binding::DatePart(date, part) => {
                let date = record.date(date);
                match part {
                    DatePart::Year => self.numeric(field, date.year),
                    DatePart::Month => self.numeric(field, date.month),
                    DatePart::Day => self.numeric(field, date.day),
                    DatePart::Time => time_to_ije(date.time.as_ref()),
                }
            }
            Binding::Age => self.numeric(field, record.age()),
            Binding::Address(address, key) => record.address(address, key),
            Binding::CityLimits => match record.residence_within_city_limits() {
                GeoFlag::Absent => None,
                GeoFlag::Yes => Some("Y".into()),
                GeoFlag::No => Some("N".into()),
                GeoFlag::Unknown => Some("U".into()),
                GeoFlag::Override(value) => Some(value),
            },
            Binding::MiddleInitial => record
                .text(TextField::MiddleName)
                .and_then(|name| name.chars().next())
                .map(String::from),
            Binding::CauseText(line) => lists
                .causes
                .iter()
                .find(|c| c.line == line)
                .map(|c| c.text.clone()),
            Binding::CauseInterval(line) => lists
                .causes
                .iter()
                .find(|c| c.line == line)
                .and_then(|c| c.interval.clone()),
            Binding::EntityAxis => {
                let packed: String = lists
                    .entity_axis
                    .iter()
                    .map(|e| {
                        format!(
                            "{}{}{:<5}{}",
                            e.line % 10,
                            e.position % 10,
                            chunk_code(&e.code, 5),
                            if e.e_code { '&' } else { ' ' }
                        )
                    })
                    .collect();
                self.packed(field, packed, lists.entity_axis.len(), ENTITY_AXIS_CHUNK)
            }
            Binding::RecordAxis => {
                let packed: String = lists
                    .record_axis
                    .iter()
                    .map(|e| {
                        format!(
                            "{:<4}{}",
                            chunk_code(&e.code, 4),
                            if e.pregnancy { '&' } else { ' ' }
                        )
                    })
                    .collect();
                self.packed(field, packed, lists.record_axis.len(), RECORD_AXIS_CHUNK)
            }
        }
    }

    /// Known numerics that do not fit are reported and cut to the slot, keeping leading digits.
    fn numeric(&mut self, field: &FieldDescriptor, value: Tristate<u32>) -> Option<String> {
        let rendered = numeric_to_ije(value, field.width)?;
        if rendered.chars().count() == field.width {
            return Some(rendered);
        }
        self.push_issue(
            field,
            format!("value '{rendered}' does not fit in {} characters", field.width),
        );
        Some(rendered.chars().take(field.width).collect())
    }

    fn packed(
        &mut self,
        field: &FieldDescriptor,
        packed: String,
        entries: usize,
        chunk: usize,
    ) -> Option<String> {
        let capacity = field.width / chunk;
        if entries > capacity {
            self.push_issue(
                field,
                format!("{entries} codes present; only the first {capacity} are written"),
            );
        }
        let packed = packed.trim_end();
        (!packed.is_empty()).then(|| packed.chars().take(field.width).collect())
    }

    fn apply(
        &mut self,
        record: &mut DeathRecord,
        pending: &mut Pending,
        binding: Binding,
        field: &FieldDescriptor,
        raw: &str,
    ) {
        match binding {
            Binding::Unbound => {}
            Binding::Text(text) => self.set_text(record, text, raw, field.code),
            Binding::Flag(flag) => {
                let value = flag_from_ije(raw);
                if value.is_absent() {
                    self.push_issue(field, format!("'{raw}' is not a Y/N/U flag"));
                } else {
                    record.set_flag(flag, value);
                }
            }
            Binding::HispanicFlag(flag) => {
                let value = hispanic_from_ije(raw);
                if value.is_absent() {
                    self.push_issue(field, format!("'{raw}' is not an H/N/U flag"));
                } else {
                    record.set_flag(flag, value);
                }
            }
            Binding::Coded(coded, set) => match set.to_coding(raw) {
                Some(coding) => record.set_coded(coded, Some(coding)),
                None => self.push_issue(field, format!("no {} mapping for '{raw}'", set.name)),
            },
            Binding::CauseCode(coded) => {
                let code = icd10_from_ije(raw);
                record.set_coded(coded, Some(Coding::new(ICD10, &code, "")));
            }
            Binding::DatePart(date, part) => {
                let date = pending.dates.entry(date).or_default();
                match part {
                    DatePart::Year => date.year = numeric_from_ije(raw),
                    DatePart::Month => date.month = numeric_from_ije(raw),
                    DatePart::Day => date.day = numeric_from_ije(raw),
                    DatePart::Time => date.time = time_from_ije(raw),
                }
            }
            Binding::Age => match numeric_from_ije(raw) {
                Tristate::Absent => self.push_issue(field, format!("'{raw}' is not a number")),
                age => record.set_age(age),
            },
            Binding::Address(address, key) => record.set_address(address, key, Some(raw)),
            Binding::CityLimits => {
                let flag = match raw {
                    "Y" => GeoFlag::Yes,
                    "N" => GeoFlag::No,
                    "U" => GeoFlag::Unknown,
                    other => GeoFlag::Override(other.to_string()),
                };
                record.set_residence_within_city_limits(flag);
            }
            Binding::MiddleInitial => pending.middle_initial = Some(raw.to_string()),
            Binding::CauseText(line) => cause_line(pending, line).text = raw.to_string(),
            Binding::CauseInterval(line) => cause_line(pending, line).interval = Some(raw.to_string()),
            Binding::EntityAxis => {
                for chunk in chunks(raw, ENTITY_AXIS_CHUNK) {
                    match parse_entity_axis(&chunk) {
                        Some(entry) => pending.entity_axis.push(entry),
                        None => self.push_issue(field, format!("malformed entity-axis entry '{chunk}'")),
                    }
                }
            }
            Binding::RecordAxis => {
                for (i, chunk) in chunks(raw, RECORD_AXIS_CHUNK).into_iter().enumerate() {
                    let code = chunk.chars().take(4).collect::<String>();
                    let code = code.trim();
                    if code.is_empty() {
                        self.push_issue(field, format!("malformed record-axis entry '{chunk}'"));
                        continue;
                    }
                    pending.record_axis.push(RecordAxisEntry {
                        position: (i + 1) as u32,
                        code: icd10_from_ije(code),
                        pregnancy: chunk.chars().nth(4) == Some('&'),
                    });
                }
            }
        }
    }

    fn set_text(&mut self, record: &mut DeathRecord, text: TextField, value: &str, code: &str) {
        if let Err(err) = record.set_text(text, Some(value)) {
            if let Some(field) = self.registry().get(code) {
                self.push_issue(field, err.to_string());
            }
        }
    }
}

fn chunk_code(code: &str, width: usize) -> String {
    icd10_to_ije(code).chars().take(width).collect()
}

/// Splits a packed field into fixed-size chunks, skipping blank ones.
fn chunks(raw: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    chars
        .chunks(size)
        .map(|c| c.iter().collect::<String>())
        .filter(|c| !c.trim().is_empty())
        .collect()
}

fn parse_entity_axis(chunk: &str) -> Option<EntityAxisEntry> {
    let chars: Vec<char> = chunk.chars().collect();
    let line = chars.first()?.to_digit(10)?;
    let position = chars.get(1)?.to_digit(10)?;
    let code: String = chars.iter().skip(2).take(5).collect();
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    Some(EntityAxisEntry {
        line,
        position,
        code: icd10_from_ije(code),
        e_code: chars.get(7) == Some(&'&'),
    })
}

fn cause_line(pending: &mut Pending, line: u32) -> &mut CauseLine {
    pending.causes.entry(line).or_insert_with(|| CauseLine {
        line,
        text: String::new(),
        interval: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappings;

    fn sample() -> DeathRecord {
        let mut record = DeathRecord::new();
        record.set_text(TextField::GivenName, Some("Example")).expect("given");
        record.set_text(TextField::MiddleName, Some("Middle")).expect("middle");
        record.set_text(TextField::FamilyName, Some("Person")).expect("family");
        record.set_text(TextField::CertificateNumber, Some("123")).expect("certificate");
        record.set_text(TextField::Jurisdiction, Some("MA")).expect("jurisdiction");
        record.set_coded(CodedField::Sex, mappings::SEX.to_coding("F"));
        record.set_date(DateField::Death, &PartialDate::ymd(2021, 3, 9));
        record.set_flag(FlagField::Autopsy, Tristate::Known(true));
        record.set_flag(FlagField::InjuryAtWork, Tristate::Unknown);
        record.set_age(Tristate::Known(79));
        record.set_coded(CodedField::AgeUnit, mappings::AGE_UNIT.to_coding("1"));
        record
    }

    fn slot<'a>(line: &'a str, code: &str) -> &'a str {
        let field = MORTALITY.get(code).expect(code);
        &line[field.start..field.end()]
    }

    #[test]
    fn record_encodes_into_its_slots() {
        let mut codec = IjeCodec::mortality();
        let line = codec.record_to_ije(&sample()).expect("encode");

        assert_eq!(line.chars().count(), 5000);
        assert_eq!(slot(&line, "DOD_YR"), "2021");
        assert_eq!(slot(&line, "DSTATE"), "MA");
        assert_eq!(slot(&line, "FILENO"), "000123");
        assert_eq!(slot(&line, "SEX"), "F");
        assert_eq!(slot(&line, "MNAME"), "M");
        assert_eq!(slot(&line, "AUTOP"), "Y");
        assert_eq!(slot(&line, "WORKINJ"), "U");
        assert_eq!(slot(&line, "AUTOPF"), " ");
        assert_eq!(slot(&line, "AGE"), "079");
        assert_eq!(slot(&line, "AGETYPE"), "1");
        assert!(codec.issues().is_empty(), "{:?}", codec.issues());
    }

    #[test]
    fn decoded_line_restores_the_record() {
        let mut codec = IjeCodec::mortality();
        let line = codec.record_to_ije(&sample()).expect("encode");
        let record = codec.ije_to_record(&line).expect("decode");

        assert_eq!(record.text(TextField::GivenName).as_deref(), Some("Example"));
        assert_eq!(record.text(TextField::MiddleName).as_deref(), Some("Middle"));
        assert_eq!(record.certificate_number().as_deref(), Some("123"));
        assert_eq!(record.date(DateField::Death), PartialDate::ymd(2021, 3, 9));
        assert_eq!(record.flag(FlagField::Autopsy), Tristate::Known(true));
        assert_eq!(record.flag(FlagField::InjuryAtWork), Tristate::Unknown);
        assert_eq!(record.age(), Tristate::Known(79));
        assert_eq!(
            record.coded(CodedField::Sex).and_then(|c| c.code).as_deref(),
            Some("female")
        );
    }

    #[test]
    fn middle_initial_fills_in_when_the_full_name_is_blank() {
        let mut codec = IjeCodec::mortality();
        let values: FieldValues = [("MNAME", "Q")].into_iter().collect();
        let record = codec.values_to_record(&values).expect("record");
        assert_eq!(record.text(TextField::MiddleName).as_deref(), Some("Q"));
    }

    #[test]
    fn unmapped_codes_are_reported_by_field_name() {
        let mut codec = IjeCodec::mortality();
        let values: FieldValues = [("MARITAL", "Z")].into_iter().collect();
        let record = codec.values_to_record(&values).expect("record");

        assert!(record.coded(CodedField::MaritalStatus).is_none());
        let issues = codec.issues();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].name, "Marital Status");
        assert!(issues[0].message.contains("Marital Status mapping for 'Z'"));
    }

    #[test]
    fn axis_codes_pack_and_unpack() {
        let mut record = DeathRecord::new();
        record.set_entity_axis_codes(vec![
            EntityAxisEntry { line: 1, position: 1, code: "I21.0".into(), e_code: false },
            EntityAxisEntry { line: 2, position: 1, code: "V89.2".into(), e_code: true },
        ]);
        record.set_record_axis_codes(vec![
            RecordAxisEntry { position: 1, code: "I21.0".into(), pregnancy: false },
            RecordAxisEntry { position: 2, code: "O99".into(), pregnancy: true },
        ]);

        let mut codec = IjeCodec::mortality();
        let values = codec.record_to_values(&record).expect("values");
        assert_eq!(values.get("EAC"), Some("11I210  21V892 &"));
        assert_eq!(values.get("RAC"), Some("I210 O99 &"));

        let restored = codec.values_to_record(&values).expect("record");
        assert_eq!(restored.entity_axis(), record.entity_axis());
        assert_eq!(restored.record_axis(), record.record_axis());
    }

    #[test]
    fn cause_lines_and_city_limits() {
        let values: FieldValues = [
            ("COD1A", "Rupture of myocardium"),
            ("INTERVAL1A", "Minutes"),
            ("COD1B", "Acute myocardial infarction"),
            ("LIMITS", "Y"),
        ]
        .into_iter()
        .collect();
        let mut codec = IjeCodec::mortality();
        let record = codec.values_to_record(&values).expect("record");

        let lines = record.cause_of_death_part1();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].interval.as_deref(), Some("Minutes"));
        assert_eq!(lines[1].text, "Acute myocardial infarction");
        assert_eq!(record.residence_within_city_limits(), GeoFlag::Yes);

        let back = codec.record_to_values(&record).expect("values");
        assert_eq!(back.get("COD1B"), Some("Acute myocardial infarction"));
        assert_eq!(back.get("LIMITS"), Some("Y"));
    }

    #[test]
    fn unset_city_limits_render_blank() {
        let mut codec = IjeCodec::mortality();
        let values = codec.record_to_values(&DeathRecord::new()).expect("values");
        assert_eq!(values.get("LIMITS"), None);
    }
}
