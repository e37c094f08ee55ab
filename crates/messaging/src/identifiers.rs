//! Business identifiers carried by every envelope, and their `Parameters` wire form.

use fhir::{ChoiceValue, Parameters};
use serde::Serialize;
use vital_core::DeathRecord;

pub(crate) const CERT_NO: &str = "cert_no";
pub(crate) const STATE_AUXILIARY_ID: &str = "state_auxiliary_id";
pub(crate) const DEATH_YEAR: &str = "death_year";
pub(crate) const JURISDICTION_ID: &str = "jurisdiction_id";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BusinessIdentifiers {
    pub certificate_number: Option<u32>,
    pub jurisdiction_id: Option<String>,
    pub event_year: Option<u32>,
    pub state_auxiliary_id: Option<String>,
}

impl BusinessIdentifiers {
    /// Reads the identifiers of a record. A certificate number that is not an unsigned integer
    /// is dropped; the others are copied verbatim.
    pub fn from_record(record: &DeathRecord) -> Self {
        Self {
            certificate_number: record
                .certificate_number()
                .and_then(|n| n.trim().parse().ok()),
            jurisdiction_id: record.jurisdiction(),
            event_year: record.death_year(),
            state_auxiliary_id: record.state_auxiliary_id(),
        }
    }

    pub(crate) fn from_parameters(parameters: &Parameters) -> Self {
        let number = |name| {
            parameters.get(name).and_then(|p| {
                p.value
                    .value_unsigned_int
                    .or_else(|| p.value.as_text().and_then(|t| t.trim().parse().ok()))
            })
        };
        let text = |name| {
            parameters
                .get(name)
                .and_then(|p| p.value.as_text())
                .filter(|t| !t.trim().is_empty())
        };
        Self {
            certificate_number: number(CERT_NO),
            jurisdiction_id: text(JURISDICTION_ID),
            event_year: number(DEATH_YEAR),
            state_auxiliary_id: text(STATE_AUXILIARY_ID),
        }
    }

    pub(crate) fn write(&self, parameters: &mut Parameters) {
        if let Some(n) = self.certificate_number {
            parameters.push(CERT_NO, ChoiceValue::unsigned_int(n));
        }
        if let Some(id) = &self.state_auxiliary_id {
            parameters.push(STATE_AUXILIARY_ID, ChoiceValue::string(id));
        }
        if let Some(year) = self.event_year {
            parameters.push(DEATH_YEAR, ChoiceValue::unsigned_int(year));
        }
        if let Some(j) = &self.jurisdiction_id {
            parameters.push(JURISDICTION_ID, ChoiceValue::string(j));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vital_core::{DateField, PartialDate, TextField};

    #[test]
    fn identifiers_come_from_the_record() {
        let mut record = DeathRecord::new();
        record.set_text(TextField::CertificateNumber, Some("000182")).expect("number");
        record.set_text(TextField::Jurisdiction, Some("MI")).expect("jurisdiction");
        record.set_text(TextField::StateAuxiliaryId1, Some("aux-9")).expect("aux");
        record.set_date(DateField::Death, &PartialDate::ymd(2022, 1, 3));

        let ids = BusinessIdentifiers::from_record(&record);
        assert_eq!(ids.certificate_number, Some(182));
        assert_eq!(ids.jurisdiction_id.as_deref(), Some("MI"));
        assert_eq!(ids.event_year, Some(2022));
        assert_eq!(ids.state_auxiliary_id.as_deref(), Some("aux-9"));
    }

    #[test]
    fn non_numeric_certificate_number_is_absent() {
        let mut record = DeathRecord::new();
        record.set_text(TextField::CertificateNumber, Some("A12")).expect("number");
        assert_eq!(BusinessIdentifiers::from_record(&record).certificate_number, None);
    }

    #[test]
    fn parameters_carry_every_identifier() {
        let ids = BusinessIdentifiers {
            certificate_number: Some(7),
            jurisdiction_id: Some("NY".into()),
            event_year: Some(2019),
            state_auxiliary_id: None,
        };
        let mut parameters = Parameters::default();
        ids.write(&mut parameters);
        assert_eq!(parameters.parameter.len(), 3);
        assert_eq!(BusinessIdentifiers::from_parameters(&parameters), ids);
    }
}
