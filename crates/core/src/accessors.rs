//! Typed field accessors over the record graph.
//!
//! Fields are grouped by shape (text, flag, coded, date, address) so that callers such as the
//! IJE binding can address them generically. Every setter lazily creates the entity that backs
//! the field; clearing a field (`None`, `Tristate::Absent`) removes the value but keeps the entity.
//! Empty and whitespace-only strings are treated as absent.

use crate::codes::{component, ObservationCode, ObservationList, LocationRole, Relationship};
use crate::partial_date::PartialDate;
use crate::record::{identifier_extension, set_identifier_extension, DeathRecord};
use crate::{RecordError, RecordResult};
use fhir::urls::{
    ADMINISTRATIVE_GENDER, AUXILIARY_STATE_ID1, AUXILIARY_STATE_ID2, BIRTH_PLACE, CERTIFICATE_NUMBER,
    CITY_CODE, COMPONENT_CS, DATA_ABSENT_REASON, DISTRICT_CODE, ICD10, LOCATION_JURISDICTION_ID,
    NULL_FLAVOR_UNKNOWN, POST_DIRECTIONAL, PRE_DIRECTIONAL, SPOUSE_ALIVE, SSN_SYSTEM,
    STATE_SPECIFIC_FIELD, STREET_DESIGNATOR, STREET_NAME, STREET_NUMBER, UNITS_OF_MEASURE,
    UNIT_NUMBER, V2_YES_NO, V3_NULL_FLAVOR, WITHIN_CITY_LIMITS,
};
use fhir::{
    Address, ChoiceValue, CodeableConcept, Coding, Extension, HumanName, Identifier,
    LocationPosition, Observation, PrimitiveExtension, Quantity,
};
use vital_types::{NonEmptyText, Tristate};

// ============================================================================
// Field keys
// ============================================================================

/// Free-text fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    CertificateNumber,
    StateAuxiliaryId1,
    StateAuxiliaryId2,
    /// Two-letter jurisdiction of death, kept on the death location.
    Jurisdiction,
    GivenName,
    MiddleName,
    FamilyName,
    Suffix,
    Ssn,
    FatherFamilyName,
    MotherMaidenName,
    SpouseGivenName,
    SpouseFamilyName,
    UsualOccupation,
    UsualIndustry,
    OccupationCode,
    IndustryCode,
    HowInjured,
    ContributingConditions,
    StateSpecific,
    DeathLocationName,
    DeathLatitude,
    DeathLongitude,
    IntentionalReject,
    AcmeSystemReject,
    TransaxConversion,
    /// A string component of the input race and ethnicity observation (see [`crate::codes::race`]).
    RaceLiteral(&'static str),
    /// A component of the coded race and ethnicity observation (see [`crate::codes::coded_race`]).
    CodedRace(&'static str),
}

/// Yes/no fields that may also be reported as unknown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlagField {
    /// A race checkbox of the input race and ethnicity observation.
    Race(&'static str),
    /// A Hispanic-origin checkbox of the input race and ethnicity observation.
    Hispanic(&'static str),
    Autopsy,
    AutopsyResultsAvailable,
    InjuryAtWork,
    MilitaryService,
    SpouseAlive,
}

/// Fields whose value is a code from a value set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodedField {
    Sex,
    MaritalStatus,
    PlaceOfDeath,
    DispositionMethod,
    Education,
    MannerOfDeath,
    TobaccoUse,
    PregnancyStatus,
    CertifierType,
    TransportationRole,
    ActivityAtDeath,
    PlaceOfInjury,
    RaceMissingValueReason,
    AgeUnit,
    AutomatedUnderlyingCause,
    ManualUnderlyingCause,
}

impl CodedField {
    /// The observation whose value carries this field, when it is observation-valued.
    fn observation(self) -> Option<ObservationCode> {
        Some(match self {
            CodedField::DispositionMethod => ObservationCode::DispositionMethod,
            CodedField::Education => ObservationCode::Education,
            CodedField::MannerOfDeath => ObservationCode::MannerOfDeath,
            CodedField::TobaccoUse => ObservationCode::TobaccoUse,
            CodedField::PregnancyStatus => ObservationCode::PregnancyStatus,
            CodedField::TransportationRole => ObservationCode::TransportationRole,
            CodedField::ActivityAtDeath => ObservationCode::ActivityAtDeath,
            CodedField::PlaceOfInjury => ObservationCode::PlaceOfInjury,
            CodedField::AutomatedUnderlyingCause => ObservationCode::AutomatedUnderlyingCause,
            CodedField::ManualUnderlyingCause => ObservationCode::ManualUnderlyingCause,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateField {
    Birth,
    Death,
    Injury,
    /// Receipt of the record by the coding system.
    Receipt,
    Registration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressField {
    Residence,
    Birthplace,
    DeathLocation,
    DispositionLocation,
}

/// Sub-keys of an address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressKey {
    Line1,
    StreetNumber,
    PreDirectional,
    StreetName,
    StreetDesignator,
    PostDirectional,
    UnitNumber,
    City,
    CityCode,
    County,
    CountyCode,
    State,
    Zip,
    Country,
}

impl AddressKey {
    fn extension_url(self) -> Option<&'static str> {
        match self {
            AddressKey::StreetNumber => Some(STREET_NUMBER),
            AddressKey::PreDirectional => Some(PRE_DIRECTIONAL),
            AddressKey::StreetName => Some(STREET_NAME),
            AddressKey::StreetDesignator => Some(STREET_DESIGNATOR),
            AddressKey::PostDirectional => Some(POST_DIRECTIONAL),
            AddressKey::UnitNumber => Some(UNIT_NUMBER),
            AddressKey::CityCode => Some(CITY_CODE),
            AddressKey::CountyCode => Some(DISTRICT_CODE),
            _ => None,
        }
    }
}

/// The "inside city limits" indicator of the residence.
///
/// Absence is explicit: an unset indicator is [`GeoFlag::Absent`] and never reads as unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GeoFlag {
    #[default]
    Absent,
    Yes,
    No,
    Unknown,
    /// A reported value outside yes/no/unknown, kept verbatim.
    Override(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CauseLine {
    /// 1-based line number (a-d map to 1-4).
    pub line: u32,
    pub text: String,
    pub interval: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityAxisEntry {
    pub line: u32,
    pub position: u32,
    pub code: String,
    pub e_code: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordAxisEntry {
    pub position: u32,
    pub code: String,
    pub pregnancy: bool,
}

// ============================================================================
// Value helpers
// ============================================================================

fn clean(value: Option<&str>) -> Option<String> {
    value.and_then(NonEmptyText::optional).map(NonEmptyText::into_string)
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).map(str::to_string)
}

fn flag_concept(value: &Tristate<bool>) -> Option<CodeableConcept> {
    let coding = match value {
        Tristate::Absent => return None,
        Tristate::Known(true) => Coding::new(V2_YES_NO, "Y", "Yes"),
        Tristate::Known(false) => Coding::new(V2_YES_NO, "N", "No"),
        Tristate::Unknown => Coding::new(V3_NULL_FLAVOR, NULL_FLAVOR_UNKNOWN, "unknown"),
    };
    Some(CodeableConcept::from_coding(coding))
}

fn flag_from_value(value: &ChoiceValue) -> Tristate<bool> {
    if let Some(b) = value.value_boolean {
        return Tristate::Known(b);
    }
    match value.as_coding() {
        Some(c) if c.is(V2_YES_NO, "Y") => Tristate::Known(true),
        Some(c) if c.is(V2_YES_NO, "N") => Tristate::Known(false),
        Some(c) if c.is(V3_NULL_FLAVOR, NULL_FLAVOR_UNKNOWN) => Tristate::Unknown,
        _ => Tristate::Absent,
    }
}

fn flag_value(value: &Tristate<bool>) -> ChoiceValue {
    flag_concept(value)
        .map(ChoiceValue::codeable_concept)
        .unwrap_or_default()
}

fn component_value<'a>(obs: Option<&'a Observation>, code: component::ComponentCode) -> Option<&'a ChoiceValue> {
    obs.and_then(|o| o.component(code.0, code.1)).map(|c| &c.value)
}

fn component_text(obs: Option<&Observation>, code: component::ComponentCode) -> Option<String> {
    component_value(obs, code)
        .and_then(ChoiceValue::as_text)
        .filter(|t| !t.is_empty())
}

fn component_number(obs: &Observation, code: component::ComponentCode) -> Option<u32> {
    let value = &obs.component(code.0, code.1)?.value;
    value
        .value_unsigned_int
        .or_else(|| value.value_integer.and_then(|n| u32::try_from(n).ok()))
        .or_else(|| value.as_text().and_then(|t| t.trim().parse().ok()))
}

fn component_bool(obs: &Observation, code: component::ComponentCode) -> bool {
    obs.component(code.0, code.1)
        .map(|c| flag_from_value(&c.value) == Tristate::Known(true))
        .unwrap_or(false)
}

fn concept_text(value: &ChoiceValue) -> Option<String> {
    value
        .value_codeable_concept
        .as_ref()
        .and_then(|cc| cc.text.clone())
        .or_else(|| value.value_string.clone())
        .filter(|t| !t.is_empty())
}

fn text_concept(value: Option<String>) -> ChoiceValue {
    value
        .map(|v| ChoiceValue::codeable_concept(CodeableConcept::from_text(&v)))
        .unwrap_or_default()
}

fn string_value(value: Option<String>) -> ChoiceValue {
    value.map(|v| ChoiceValue::string(&v)).unwrap_or_default()
}

fn integer_value(value: u32) -> ChoiceValue {
    ChoiceValue {
        value_integer: Some(i64::from(value)),
        ..ChoiceValue::default()
    }
}

fn format_coordinate(value: f64) -> String {
    format!("{value}")
}

fn name_part(name: Option<&HumanName>, pick: impl FnOnce(&HumanName) -> Option<&String>) -> Option<String> {
    name.and_then(pick).filter(|v| !v.is_empty()).cloned()
}

fn edit_first_name(names: &mut Vec<HumanName>, edit: impl FnOnce(&mut HumanName)) {
    if names.is_empty() {
        names.push(HumanName {
            use_: Some("official".into()),
            ..HumanName::default()
        });
    }
    if let Some(name) = names.first_mut() {
        edit(name);
    }
    names.retain(|n| !n.is_empty());
}

fn set_given(name: &mut HumanName, index: usize, value: Option<String>) {
    match value {
        Some(value) => {
            while name.given.len() <= index {
                name.given.push(String::new());
            }
            name.given[index] = value;
        }
        None => {
            if index < name.given.len() {
                name.given[index] = String::new();
            }
        }
    }
    while name.given.last().is_some_and(String::is_empty) {
        name.given.pop();
    }
}

fn address_part(address: &Address, key: AddressKey) -> Option<String> {
    let value = match key {
        AddressKey::Line1 => address.line.first().cloned(),
        AddressKey::City => address.city.clone(),
        AddressKey::County => address.district.clone(),
        AddressKey::State => address.state.clone(),
        AddressKey::Zip => address.postal_code.clone(),
        AddressKey::Country => address.country.clone(),
        other => other
            .extension_url()
            .and_then(|url| Extension::find(&address.extension, url))
            .and_then(|e| e.value.as_text()),
    };
    value.filter(|v| !v.trim().is_empty())
}

fn set_address_part(address: &mut Address, key: AddressKey, value: Option<String>) {
    match key {
        AddressKey::Line1 => match value {
            Some(v) if address.line.is_empty() => address.line.push(v),
            Some(v) => address.line[0] = v,
            None => {
                if !address.line.is_empty() {
                    address.line.remove(0);
                }
            }
        },
        AddressKey::City => address.city = value,
        AddressKey::County => address.district = value,
        AddressKey::State => address.state = value,
        AddressKey::Zip => address.postal_code = value,
        AddressKey::Country => address.country = value,
        other => {
            if let Some(url) = other.extension_url() {
                Extension::upsert(
                    &mut address.extension,
                    url,
                    value.map(|v| Extension::new(url, ChoiceValue::string(&v))),
                );
            }
        }
    }
}

// ============================================================================
// Accessors
// ============================================================================

impl DeathRecord {
    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn text(&self, field: TextField) -> Option<String> {
        let decedent_name = || self.decedent().and_then(|p| p.name.first());
        let relative_name =
            |rel| self.relative(rel).and_then(|r| r.name.first());
        let obs = |code| self.observation(code);

        let value = match field {
            TextField::CertificateNumber => identifier_extension(&self.identifier, CERTIFICATE_NUMBER),
            TextField::StateAuxiliaryId1 => identifier_extension(&self.identifier, AUXILIARY_STATE_ID1),
            TextField::StateAuxiliaryId2 => identifier_extension(&self.identifier, AUXILIARY_STATE_ID2),
            TextField::Jurisdiction => self.jurisdiction(),
            TextField::GivenName => name_part(decedent_name(), |n| n.given.first()),
            TextField::MiddleName => name_part(decedent_name(), |n| n.given.get(1)),
            TextField::FamilyName => name_part(decedent_name(), |n| n.family.as_ref()),
            TextField::Suffix => name_part(decedent_name(), |n| n.suffix.first()),
            TextField::Ssn => self.decedent().and_then(|p| {
                p.identifier
                    .iter()
                    .find(|i| i.system.as_deref() == Some(SSN_SYSTEM))
                    .and_then(|i| i.value.clone())
            }),
            TextField::FatherFamilyName => name_part(relative_name(Relationship::Father), |n| n.family.as_ref()),
            TextField::MotherMaidenName => name_part(relative_name(Relationship::Mother), |n| n.family.as_ref()),
            TextField::SpouseGivenName => name_part(relative_name(Relationship::Spouse), |n| n.given.first()),
            TextField::SpouseFamilyName => name_part(relative_name(Relationship::Spouse), |n| n.family.as_ref()),
            TextField::UsualOccupation => obs(ObservationCode::UsualWork).and_then(|o| concept_text(&o.value)),
            TextField::UsualIndustry => component_value(obs(ObservationCode::UsualWork), component::USUAL_INDUSTRY)
                .and_then(concept_text),
            TextField::OccupationCode => component_text(obs(ObservationCode::IndustryOccupationCoded), component::OCCUPATION_CODE),
            TextField::IndustryCode => component_text(obs(ObservationCode::IndustryOccupationCoded), component::INDUSTRY_CODE),
            TextField::HowInjured => obs(ObservationCode::InjuryIncident).and_then(|o| concept_text(&o.value)),
            TextField::ContributingConditions => obs(ObservationCode::ContributingConditions).and_then(|o| concept_text(&o.value)),
            TextField::StateSpecific => self
                .composition()
                .and_then(|c| Extension::find(&c.extension, STATE_SPECIFIC_FIELD))
                .and_then(|e| e.value.as_text()),
            TextField::DeathLocationName => self.location(LocationRole::Death).and_then(|l| l.name.clone()),
            TextField::DeathLatitude => self
                .location(LocationRole::Death)
                .and_then(|l| l.position.as_ref())
                .map(|p| format_coordinate(p.latitude)),
            TextField::DeathLongitude => self
                .location(LocationRole::Death)
                .and_then(|l| l.position.as_ref())
                .map(|p| format_coordinate(p.longitude)),
            TextField::IntentionalReject => component_text(obs(ObservationCode::CodingStatus), component::INTENTIONAL_REJECT),
            TextField::AcmeSystemReject => component_text(obs(ObservationCode::CodingStatus), component::ACME_SYSTEM_REJECT),
            TextField::TransaxConversion => component_text(obs(ObservationCode::CodingStatus), component::TRANSAX_CONVERSION),
            TextField::RaceLiteral(name) => {
                component_text(obs(ObservationCode::InputRaceAndEthnicity), (COMPONENT_CS, name))
            }
            TextField::CodedRace(name) => {
                component_text(obs(ObservationCode::CodedRaceAndEthnicity), (COMPONENT_CS, name))
            }
        };
        value.filter(|v| !v.trim().is_empty())
    }

    /// Sets (or clears, with `None`) a text field.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::InvalidInput`] if a coordinate is not a number.
    pub fn set_text(&mut self, field: TextField, value: Option<&str>) -> RecordResult<()> {
        let value = clean(value);

        match field {
            TextField::CertificateNumber => {
                set_identifier_extension(&mut self.identifier, CERTIFICATE_NUMBER, value);
                self.refresh_record_id();
            }
            TextField::StateAuxiliaryId1 => {
                set_identifier_extension(&mut self.identifier, AUXILIARY_STATE_ID1, value)
            }
            TextField::StateAuxiliaryId2 => {
                set_identifier_extension(&mut self.identifier, AUXILIARY_STATE_ID2, value)
            }
            TextField::Jurisdiction => {
                self.edit_location(LocationRole::Death, |l| {
                    Extension::upsert(
                        &mut l.extension,
                        LOCATION_JURISDICTION_ID,
                        value.map(|v| Extension::new(LOCATION_JURISDICTION_ID, ChoiceValue::string(&v))),
                    );
                });
                self.refresh_record_id();
            }
            TextField::GivenName => self.edit_decedent_name(|n| set_given(n, 0, value)),
            TextField::MiddleName => self.edit_decedent_name(|n| set_given(n, 1, value)),
            TextField::FamilyName => self.edit_decedent_name(|n| n.family = value),
            TextField::Suffix => self.edit_decedent_name(|n| n.suffix = value.into_iter().collect()),
            TextField::Ssn => {
                self.edit_decedent(|p| {
                    p.identifier.retain(|i| i.system.as_deref() != Some(SSN_SYSTEM));
                    if let Some(ssn) = value {
                        p.identifier.push(Identifier {
                            system: Some(SSN_SYSTEM.into()),
                            value: Some(ssn),
                            ..Identifier::default()
                        });
                    }
                });
            }
            TextField::FatherFamilyName => self.edit_relative_name(Relationship::Father, |n| n.family = value),
            TextField::MotherMaidenName => self.edit_relative_name(Relationship::Mother, |n| {
                n.use_ = Some("maiden".into());
                n.family = value;
            }),
            TextField::SpouseGivenName => self.edit_relative_name(Relationship::Spouse, |n| set_given(n, 0, value)),
            TextField::SpouseFamilyName => self.edit_relative_name(Relationship::Spouse, |n| n.family = value),
            TextField::UsualOccupation => {
                self.edit_observation(ObservationCode::UsualWork, |o| o.value = text_concept(value));
            }
            TextField::UsualIndustry => {
                let (system, code) = component::USUAL_INDUSTRY;
                self.edit_observation(ObservationCode::UsualWork, |o| {
                    o.set_component(system, code, text_concept(value))
                });
            }
            TextField::OccupationCode => self.set_component(ObservationCode::IndustryOccupationCoded, component::OCCUPATION_CODE, string_value(value)),
            TextField::IndustryCode => self.set_component(ObservationCode::IndustryOccupationCoded, component::INDUSTRY_CODE, string_value(value)),
            TextField::HowInjured => {
                self.edit_observation(ObservationCode::InjuryIncident, |o| o.value = text_concept(value));
            }
            TextField::ContributingConditions => {
                self.edit_observation(ObservationCode::ContributingConditions, |o| o.value = text_concept(value));
            }
            TextField::StateSpecific => {
                self.edit_composition(|c| {
                    Extension::upsert(
                        &mut c.extension,
                        STATE_SPECIFIC_FIELD,
                        value.map(|v| Extension::new(STATE_SPECIFIC_FIELD, ChoiceValue::string(&v))),
                    )
                });
            }
            TextField::DeathLocationName => {
                self.edit_location(LocationRole::Death, |l| l.name = value);
            }
            TextField::DeathLatitude | TextField::DeathLongitude => {
                let coordinate = value
                    .map(|v| {
                        v.parse::<f64>().map_err(|_| {
                            RecordError::InvalidInput(format!("coordinate is not a number: '{v}'"))
                        })
                    })
                    .transpose()?;
                self.edit_location(LocationRole::Death, |l| {
                    let mut position = l.position.take().unwrap_or_default();
                    if field == TextField::DeathLatitude {
                        position.latitude = coordinate.unwrap_or_default();
                    } else {
                        position.longitude = coordinate.unwrap_or_default();
                    }
                    let empty = position == LocationPosition::default();
                    l.position = (!empty).then_some(position);
                });
            }
            TextField::IntentionalReject => self.set_component(ObservationCode::CodingStatus, component::INTENTIONAL_REJECT, string_value(value)),
            TextField::AcmeSystemReject => self.set_component(ObservationCode::CodingStatus, component::ACME_SYSTEM_REJECT, string_value(value)),
            TextField::TransaxConversion => self.set_component(ObservationCode::CodingStatus, component::TRANSAX_CONVERSION, string_value(value)),
            TextField::RaceLiteral(name) => {
                self.set_component(ObservationCode::InputRaceAndEthnicity, (COMPONENT_CS, name), string_value(value))
            }
            TextField::CodedRace(name) => {
                self.set_component(ObservationCode::CodedRaceAndEthnicity, (COMPONENT_CS, name), string_value(value))
            }
        }
        Ok(())
    }

    fn edit_decedent_name(&mut self, edit: impl FnOnce(&mut HumanName)) {
        self.edit_decedent(|p| edit_first_name(&mut p.name, edit));
    }

    fn edit_relative_name(&mut self, relationship: Relationship, edit: impl FnOnce(&mut HumanName)) {
        self.edit_relative(relationship, |r| edit_first_name(&mut r.name, edit));
    }

    fn set_component(&mut self, code: ObservationCode, component: component::ComponentCode, value: ChoiceValue) {
        self.edit_observation(code, |o| o.set_component(component.0, component.1, value));
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    pub fn flag(&self, field: FlagField) -> Tristate<bool> {
        let value = match field {
            FlagField::Race(name) | FlagField::Hispanic(name) => component_value(
                self.observation(ObservationCode::InputRaceAndEthnicity),
                (COMPONENT_CS, name),
            ),
            FlagField::Autopsy => self.observation(ObservationCode::Autopsy).map(|o| &o.value),
            FlagField::AutopsyResultsAvailable => component_value(
                self.observation(ObservationCode::Autopsy),
                component::AUTOPSY_RESULTS_AVAILABLE,
            ),
            FlagField::InjuryAtWork => component_value(
                self.observation(ObservationCode::InjuryIncident),
                component::INJURY_AT_WORK,
            ),
            FlagField::MilitaryService => {
                self.observation(ObservationCode::MilitaryService).map(|o| &o.value)
            }
            FlagField::SpouseAlive => self
                .decedent()
                .and_then(|p| Extension::find(&p.extension, SPOUSE_ALIVE))
                .map(|e| &e.value),
        };
        value.map(flag_from_value).unwrap_or_default()
    }

    pub fn set_flag(&mut self, field: FlagField, value: Tristate<bool>) {
        match field {
            FlagField::Race(name) | FlagField::Hispanic(name) => self.set_component(
                ObservationCode::InputRaceAndEthnicity,
                (COMPONENT_CS, name),
                flag_value(&value),
            ),
            FlagField::Autopsy => {
                self.edit_observation(ObservationCode::Autopsy, |o| o.value = flag_value(&value));
            }
            FlagField::AutopsyResultsAvailable => self.set_component(
                ObservationCode::Autopsy,
                component::AUTOPSY_RESULTS_AVAILABLE,
                flag_value(&value),
            ),
            FlagField::InjuryAtWork => self.set_component(
                ObservationCode::InjuryIncident,
                component::INJURY_AT_WORK,
                flag_value(&value),
            ),
            FlagField::MilitaryService => {
                self.edit_observation(ObservationCode::MilitaryService, |o| {
                    o.value = flag_value(&value)
                });
            }
            FlagField::SpouseAlive => {
                self.edit_decedent(|p| {
                    Extension::upsert(
                        &mut p.extension,
                        SPOUSE_ALIVE,
                        flag_concept(&value).map(|cc| {
                            Extension::new(SPOUSE_ALIVE, ChoiceValue::codeable_concept(cc))
                        }),
                    )
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Coded values
    // ------------------------------------------------------------------

    pub fn coded(&self, field: CodedField) -> Option<Coding> {
        if let Some(code) = field.observation() {
            return self
                .observation(code)
                .and_then(|o| o.value.as_coding())
                .cloned();
        }

        match field {
            CodedField::Sex => self
                .decedent()
                .and_then(|p| p.gender.as_deref())
                .map(|g| Coding::new(ADMINISTRATIVE_GENDER, g, "")),
            CodedField::MaritalStatus => self
                .decedent()
                .and_then(|p| p.marital_status.as_ref())
                .and_then(CodeableConcept::first_coding)
                .cloned(),
            CodedField::PlaceOfDeath => component_value(
                self.observation(ObservationCode::DateOfDeath),
                component::PLACE_OF_DEATH,
            )
            .and_then(ChoiceValue::as_coding)
            .cloned(),
            CodedField::CertifierType => self
                .certification()
                .and_then(|p| p.performer.first())
                .and_then(|p| p.function.as_ref())
                .and_then(CodeableConcept::first_coding)
                .cloned(),
            CodedField::RaceMissingValueReason => component_value(
                self.observation(ObservationCode::InputRaceAndEthnicity),
                component::MISSING_VALUE_REASON,
            )
            .and_then(ChoiceValue::as_coding)
            .cloned(),
            CodedField::AgeUnit => self
                .observation(ObservationCode::Age)
                .and_then(|o| o.value.value_quantity.as_ref())
                .and_then(|q| {
                    q.code.as_deref().map(|code| Coding {
                        system: q.system.clone(),
                        code: Some(code.to_string()),
                        display: q.unit.clone(),
                    })
                }),
            _ => None,
        }
    }

    pub fn set_coded(&mut self, field: CodedField, value: Option<Coding>) {
        if let Some(code) = field.observation() {
            self.edit_observation(code, |o| {
                o.value = value
                    .map(|c| ChoiceValue::codeable_concept(CodeableConcept::from_coding(c)))
                    .unwrap_or_default()
            });
            return;
        }

        let concept = value.clone().map(CodeableConcept::from_coding);
        match field {
            CodedField::Sex => {
                self.edit_decedent(|p| p.gender = value.and_then(|c| c.code));
            }
            CodedField::MaritalStatus => {
                self.edit_decedent(|p| p.marital_status = concept);
            }
            CodedField::PlaceOfDeath => self.set_component(
                ObservationCode::DateOfDeath,
                component::PLACE_OF_DEATH,
                concept.map(ChoiceValue::codeable_concept).unwrap_or_default(),
            ),
            CodedField::CertifierType => {
                self.edit_certification(|p| {
                    if let Some(performer) = p.performer.first_mut() {
                        performer.function = concept;
                    }
                });
            }
            CodedField::RaceMissingValueReason => self.set_component(
                ObservationCode::InputRaceAndEthnicity,
                component::MISSING_VALUE_REASON,
                concept.map(ChoiceValue::codeable_concept).unwrap_or_default(),
            ),
            CodedField::AgeUnit => {
                self.edit_observation(ObservationCode::Age, |o| {
                    let mut quantity = o.value.value_quantity.take().unwrap_or_default();
                    quantity.system = value.as_ref().map(|_| UNITS_OF_MEASURE.to_string());
                    quantity.code = value.as_ref().and_then(|c| c.code.clone());
                    quantity.unit = value.and_then(|c| c.display);
                    let empty = quantity == Quantity::default();
                    o.value.value_quantity = (!empty).then_some(quantity);
                });
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // Age
    // ------------------------------------------------------------------

    pub fn age(&self) -> Tristate<u32> {
        let Some(obs) = self.observation(ObservationCode::Age) else {
            return Tristate::Absent;
        };
        if Extension::find(&obs.extension, DATA_ABSENT_REASON).is_some() {
            return Tristate::Unknown;
        }
        obs.value
            .value_quantity
            .as_ref()
            .and_then(|q| q.value)
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as u32)
            .into()
    }

    pub fn set_age(&mut self, value: Tristate<u32>) {
        self.edit_observation(ObservationCode::Age, |o| {
            let unknown = value.is_unknown();
            Extension::upsert(
                &mut o.extension,
                DATA_ABSENT_REASON,
                unknown.then(|| Extension::new(DATA_ABSENT_REASON, ChoiceValue::code("unknown"))),
            );
            let mut quantity = o.value.value_quantity.take().unwrap_or_default();
            quantity.value = value.known().map(f64::from);
            let empty = quantity == Quantity::default();
            o.value.value_quantity = (!empty).then_some(quantity);
        });
    }

    // ------------------------------------------------------------------
    // Dates
    // ------------------------------------------------------------------

    pub fn date(&self, field: DateField) -> PartialDate {
        match field {
            DateField::Birth => self
                .decedent()
                .map(|p| {
                    let extensions = p
                        .birth_date_extension
                        .as_ref()
                        .map(|e| e.extension.as_slice())
                        .unwrap_or_default();
                    PartialDate::read(extensions, p.birth_date.as_deref())
                })
                .unwrap_or_default(),
            DateField::Death => self
                .observation(ObservationCode::DateOfDeath)
                .map(|o| PartialDate::read(&o.extension, o.value.value_date_time.as_deref()))
                .unwrap_or_default(),
            DateField::Injury => self
                .observation(ObservationCode::InjuryIncident)
                .map(|o| PartialDate::read(&o.extension, o.effective_date_time.as_deref()))
                .unwrap_or_default(),
            DateField::Receipt => self
                .observation(ObservationCode::CodingStatus)
                .map(|o| PartialDate::read(&o.extension, None))
                .unwrap_or_default(),
            DateField::Registration => self
                .composition()
                .map(|c| PartialDate::read(&c.extension, None))
                .unwrap_or_default(),
        }
    }

    pub fn set_date(&mut self, field: DateField, value: &PartialDate) {
        match field {
            DateField::Birth => {
                self.edit_decedent(|p| {
                    let mut holder = p.birth_date_extension.take().unwrap_or_default();
                    let mut date_only = value.clone();
                    date_only.time = Tristate::Absent;
                    p.birth_date = date_only.write(&mut holder.extension);
                    p.birth_date_extension = (holder != PrimitiveExtension::default()).then_some(holder);
                });
            }
            DateField::Death => {
                self.edit_observation(ObservationCode::DateOfDeath, |o| {
                    o.value.value_date_time = value.write(&mut o.extension);
                });
                self.refresh_record_id();
            }
            DateField::Injury => {
                self.edit_observation(ObservationCode::InjuryIncident, |o| {
                    o.effective_date_time = value.write(&mut o.extension);
                });
            }
            DateField::Receipt => {
                self.edit_observation(ObservationCode::CodingStatus, |o| {
                    value.write(&mut o.extension);
                });
            }
            DateField::Registration => {
                self.edit_composition(|c| {
                    value.write(&mut c.extension);
                });
            }
        }
    }

    // ------------------------------------------------------------------
    // Addresses
    // ------------------------------------------------------------------

    fn address_ref(&self, field: AddressField) -> Option<&Address> {
        match field {
            AddressField::Residence => self.decedent().and_then(|p| p.address.first()),
            AddressField::Birthplace => self
                .decedent()
                .and_then(|p| Extension::find(&p.extension, BIRTH_PLACE))
                .and_then(|e| e.value.value_address.as_ref()),
            AddressField::DeathLocation => self
                .location(LocationRole::Death)
                .and_then(|l| l.address.as_ref()),
            AddressField::DispositionLocation => self
                .location(LocationRole::Disposition)
                .and_then(|l| l.address.as_ref()),
        }
    }

    fn edit_address(&mut self, field: AddressField, edit: impl FnOnce(&mut Address)) {
        match field {
            AddressField::Residence => {
                self.edit_decedent(|p| {
                    if p.address.is_empty() {
                        p.address.push(Address::default());
                    }
                    if let Some(address) = p.address.first_mut() {
                        edit(address);
                    }
                    p.address.retain(|a| *a != Address::default());
                });
            }
            AddressField::Birthplace => {
                self.edit_decedent(|p| {
                    let mut address = Extension::find(&p.extension, BIRTH_PLACE)
                        .and_then(|e| e.value.value_address.clone())
                        .unwrap_or_default();
                    edit(&mut address);
                    let value = (address != Address::default()).then(|| {
                        Extension::new(
                            BIRTH_PLACE,
                            ChoiceValue {
                                value_address: Some(address),
                                ..ChoiceValue::default()
                            },
                        )
                    });
                    Extension::upsert(&mut p.extension, BIRTH_PLACE, value);
                });
            }
            AddressField::DeathLocation | AddressField::DispositionLocation => {
                let role = if field == AddressField::DeathLocation {
                    LocationRole::Death
                } else {
                    LocationRole::Disposition
                };
                self.edit_location(role, |l| {
                    let mut address = l.address.take().unwrap_or_default();
                    edit(&mut address);
                    l.address = (address != Address::default()).then_some(address);
                });
            }
        }
    }

    /// Reads one sub-key of an address. Empty strings read as absent.
    pub fn address(&self, field: AddressField, key: AddressKey) -> Option<String> {
        self.address_ref(field).and_then(|a| address_part(a, key))
    }

    pub fn set_address(&mut self, field: AddressField, key: AddressKey, value: Option<&str>) {
        let value = non_empty(value).map(|v| v.trim_end().to_string());
        self.edit_address(field, |a| set_address_part(a, key, value));
    }

    pub fn residence_within_city_limits(&self) -> GeoFlag {
        let Some(ext) = self
            .address_ref(AddressField::Residence)
            .and_then(|a| Extension::find(&a.extension, WITHIN_CITY_LIMITS))
        else {
            return GeoFlag::Absent;
        };

        if let Some(coding) = ext.value.as_coding() {
            if coding.is(V2_YES_NO, "Y") {
                return GeoFlag::Yes;
            }
            if coding.is(V2_YES_NO, "N") {
                return GeoFlag::No;
            }
            if coding.is(V3_NULL_FLAVOR, NULL_FLAVOR_UNKNOWN) {
                return GeoFlag::Unknown;
            }
        }
        match ext.value.as_text() {
            Some(text) if !text.trim().is_empty() => GeoFlag::Override(text),
            _ => GeoFlag::Absent,
        }
    }

    pub fn set_residence_within_city_limits(&mut self, value: GeoFlag) {
        let ext = match value {
            GeoFlag::Absent => None,
            GeoFlag::Yes => flag_concept(&Tristate::Known(true)),
            GeoFlag::No => flag_concept(&Tristate::Known(false)),
            GeoFlag::Unknown => flag_concept(&Tristate::Unknown),
            GeoFlag::Override(text) => {
                let ext = clean(Some(&text))
                    .map(|t| Extension::new(WITHIN_CITY_LIMITS, ChoiceValue::string(&t)));
                self.edit_address(AddressField::Residence, |a| {
                    Extension::upsert(&mut a.extension, WITHIN_CITY_LIMITS, ext)
                });
                return;
            }
        }
        .map(|cc| Extension::new(WITHIN_CITY_LIMITS, ChoiceValue::codeable_concept(cc)));

        self.edit_address(AddressField::Residence, |a| {
            Extension::upsert(&mut a.extension, WITHIN_CITY_LIMITS, ext)
        });
    }

    // ------------------------------------------------------------------
    // Multi-valued cause of death lists
    // ------------------------------------------------------------------

    /// Cause of death part I lines, ordered by line number.
    pub fn cause_of_death_part1(&self) -> Vec<CauseLine> {
        let mut lines: Vec<CauseLine> = self
            .observations(ObservationList::CauseOfDeathPart1)
            .into_iter()
            .filter_map(|o| {
                Some(CauseLine {
                    line: component_number(o, component::LINE_NUMBER)?,
                    text: concept_text(&o.value).unwrap_or_default(),
                    interval: component_text(Some(o), component::INTERVAL),
                })
            })
            .collect();
        lines.sort_by_key(|l| l.line);
        lines
    }

    /// Replaces every cause of death part I line.
    pub fn set_cause_of_death_part1(&mut self, lines: Vec<CauseLine>) {
        let observations = lines
            .into_iter()
            .filter(|l| !l.text.trim().is_empty() || l.interval.is_some())
            .map(|line| {
                let mut obs = Observation {
                    value: text_concept(clean(Some(&line.text))),
                    ..Observation::default()
                };
                let (system, code) = component::LINE_NUMBER;
                obs.set_component(system, code, integer_value(line.line));
                let (system, code) = component::INTERVAL;
                obs.set_component(system, code, string_value(clean(line.interval.as_deref())));
                obs
            })
            .collect();
        self.replace_list(ObservationList::CauseOfDeathPart1, observations);
    }

    pub fn entity_axis(&self) -> Vec<EntityAxisEntry> {
        let mut entries: Vec<EntityAxisEntry> = self
            .observations(ObservationList::EntityAxis)
            .into_iter()
            .filter_map(|o| {
                Some(EntityAxisEntry {
                    line: component_number(o, component::LINE_NUMBER)?,
                    position: component_number(o, component::POSITION)?,
                    code: o.value.as_coding()?.code.clone()?,
                    e_code: component_bool(o, component::E_CODE_INDICATOR),
                })
            })
            .collect();
        entries.sort_by_key(|e| (e.line, e.position));
        entries
    }

    /// Replaces every entity axis code.
    pub fn set_entity_axis_codes(&mut self, entries: Vec<EntityAxisEntry>) {
        let observations = entries
            .into_iter()
            .map(|entry| {
                let mut obs = Observation {
                    value: icd10_value(&entry.code),
                    ..Observation::default()
                };
                let (system, code) = component::LINE_NUMBER;
                obs.set_component(system, code, integer_value(entry.line));
                let (system, code) = component::POSITION;
                obs.set_component(system, code, integer_value(entry.position));
                if entry.e_code {
                    let (system, code) = component::E_CODE_INDICATOR;
                    obs.set_component(system, code, ChoiceValue::boolean(true));
                }
                obs
            })
            .collect();
        self.replace_list(ObservationList::EntityAxis, observations);
    }

    pub fn record_axis(&self) -> Vec<RecordAxisEntry> {
        let mut entries: Vec<RecordAxisEntry> = self
            .observations(ObservationList::RecordAxis)
            .into_iter()
            .filter_map(|o| {
                Some(RecordAxisEntry {
                    position: component_number(o, component::POSITION)?,
                    code: o.value.as_coding()?.code.clone()?,
                    pregnancy: component_bool(o, component::PREGNANCY_INDICATOR),
                })
            })
            .collect();
        entries.sort_by_key(|e| e.position);
        entries
    }

    /// Replaces every record axis code.
    pub fn set_record_axis_codes(&mut self, entries: Vec<RecordAxisEntry>) {
        let observations = entries
            .into_iter()
            .map(|entry| {
                let mut obs = Observation {
                    value: icd10_value(&entry.code),
                    ..Observation::default()
                };
                let (system, code) = component::POSITION;
                obs.set_component(system, code, integer_value(entry.position));
                if entry.pregnancy {
                    let (system, code) = component::PREGNANCY_INDICATOR;
                    obs.set_component(system, code, ChoiceValue::boolean(true));
                }
                obs
            })
            .collect();
        self.replace_list(ObservationList::RecordAxis, observations);
    }

    // ------------------------------------------------------------------
    // Business identifiers
    // ------------------------------------------------------------------

    pub(crate) fn date_of_death_year(&self) -> Option<u32> {
        self.date(DateField::Death).year.known()
    }

    pub(crate) fn death_location_jurisdiction(&self) -> Option<String> {
        self.location(LocationRole::Death)
            .and_then(|l| Extension::find(&l.extension, LOCATION_JURISDICTION_ID))
            .and_then(|e| e.value.as_text())
            .filter(|j| !j.trim().is_empty())
    }

    pub fn certificate_number(&self) -> Option<String> {
        self.text(TextField::CertificateNumber)
    }

    pub fn state_auxiliary_id(&self) -> Option<String> {
        self.text(TextField::StateAuxiliaryId1)
    }

    /// Year of death; falls back to the record identifier for graphs without a death date.
    pub fn death_year(&self) -> Option<u32> {
        self.date_of_death_year().or_else(|| {
            self.record_id()
                .and_then(|id| id.get(0..4))
                .filter(|y| *y != "0000")
                .and_then(|y| y.parse().ok())
        })
    }

    /// Jurisdiction of death; falls back to the record identifier for graphs without a death
    /// location.
    pub fn jurisdiction(&self) -> Option<String> {
        self.death_location_jurisdiction().or_else(|| {
            self.record_id()
                .and_then(|id| id.get(4..6))
                .filter(|j| *j != "XX")
                .map(str::to_string)
        })
    }
}

fn icd10_value(code: &str) -> ChoiceValue {
    ChoiceValue::codeable_concept(CodeableConcept::from_coding(Coding::new(ICD10, code.trim(), "")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::race;
    use fhir::urls::SNOMED;

    #[test]
    fn certificate_number_refreshes_record_id() {
        let mut record = DeathRecord::new();
        record
            .set_text(TextField::CertificateNumber, Some("123"))
            .expect("set");
        assert_eq!(record.record_id(), Some("0000XX000123"));

        record.set_text(TextField::Jurisdiction, Some("MA")).expect("set");
        record.set_date(DateField::Death, &PartialDate::ymd(2021, 3, 14));
        assert_eq!(record.record_id(), Some("2021MA000123"));
        assert_eq!(record.death_year(), Some(2021));
        assert_eq!(record.jurisdiction().as_deref(), Some("MA"));
    }

    #[test]
    fn record_id_keeps_its_twelve_character_shape() {
        let mut record = DeathRecord::new();
        record
            .set_text(TextField::CertificateNumber, Some("1234567"))
            .expect("set");
        assert_eq!(record.record_id(), Some("0000XX234567"));

        record.set_date(DateField::Death, &PartialDate::ymd(12021, 3, 14));
        assert_eq!(record.record_id().map(str::len), Some(12));
        assert_eq!(record.certificate_number().as_deref(), Some("1234567"));
    }

    #[test]
    fn decedent_names_round_trip() {
        let mut record = DeathRecord::new();
        record.set_text(TextField::GivenName, Some("Jane")).expect("set");
        record.set_text(TextField::MiddleName, Some("Q")).expect("set");
        record.set_text(TextField::FamilyName, Some("Public")).expect("set");

        assert_eq!(record.text(TextField::GivenName).as_deref(), Some("Jane"));
        assert_eq!(record.text(TextField::MiddleName).as_deref(), Some("Q"));
        assert_eq!(record.text(TextField::FamilyName).as_deref(), Some("Public"));

        record.set_text(TextField::GivenName, None).expect("clear");
        assert_eq!(record.text(TextField::GivenName), None);
        assert_eq!(record.text(TextField::MiddleName).as_deref(), Some("Q"));
    }

    #[test]
    fn blank_text_is_treated_as_absent() {
        let mut record = DeathRecord::new();
        record.set_text(TextField::FamilyName, Some("   ")).expect("set");
        assert_eq!(record.text(TextField::FamilyName), None);
        assert!(record.decedent().is_some_and(|p| p.name.is_empty()));
    }

    #[test]
    fn flags_keep_absent_and_unknown_apart() {
        let mut record = DeathRecord::new();
        assert_eq!(record.flag(FlagField::Autopsy), Tristate::Absent);

        record.set_flag(FlagField::Autopsy, Tristate::Unknown);
        assert_eq!(record.flag(FlagField::Autopsy), Tristate::Unknown);

        record.set_flag(FlagField::Race(race::WHITE), Tristate::Known(true));
        record.set_flag(FlagField::Race(race::CHINESE), Tristate::Known(false));
        assert_eq!(record.flag(FlagField::Race(race::WHITE)), Tristate::Known(true));
        assert_eq!(record.flag(FlagField::Race(race::CHINESE)), Tristate::Known(false));
        assert_eq!(record.flag(FlagField::Race(race::SAMOAN)), Tristate::Absent);
    }

    #[test]
    fn setters_create_one_observation_per_code() {
        let mut record = DeathRecord::new();
        let before = record.len();
        record.set_coded(
            CodedField::MannerOfDeath,
            Some(Coding::new(SNOMED, "7878000", "Accidental death")),
        );
        record.set_coded(
            CodedField::MannerOfDeath,
            Some(Coding::new(SNOMED, "38605008", "Natural death")),
        );
        assert_eq!(record.len(), before + 1);
        assert_eq!(
            record.coded(CodedField::MannerOfDeath).and_then(|c| c.code),
            Some("38605008".to_string())
        );
    }

    #[test]
    fn age_distinguishes_unknown_from_absent() {
        let mut record = DeathRecord::new();
        record.set_age(Tristate::Known(79));
        record.set_coded(
            CodedField::AgeUnit,
            Some(Coding::new(UNITS_OF_MEASURE, "a", "years")),
        );
        assert_eq!(record.age(), Tristate::Known(79));
        assert_eq!(
            record.coded(CodedField::AgeUnit).and_then(|c| c.code).as_deref(),
            Some("a")
        );

        record.set_age(Tristate::Unknown);
        assert_eq!(record.age(), Tristate::Unknown);

        record.set_age(Tristate::Absent);
        assert_eq!(record.age(), Tristate::Absent);
    }

    #[test]
    fn empty_geo_values_read_as_absent() {
        let mut record = DeathRecord::new();
        record.set_address(AddressField::Residence, AddressKey::City, Some(""));
        assert_eq!(record.address(AddressField::Residence, AddressKey::City), None);
        assert_eq!(record.residence_within_city_limits(), GeoFlag::Absent);

        record.set_residence_within_city_limits(GeoFlag::Override(String::new()));
        assert_eq!(record.residence_within_city_limits(), GeoFlag::Absent);

        record.set_residence_within_city_limits(GeoFlag::Override("X".into()));
        assert_eq!(
            record.residence_within_city_limits(),
            GeoFlag::Override("X".into())
        );

        record.set_residence_within_city_limits(GeoFlag::No);
        assert_eq!(record.residence_within_city_limits(), GeoFlag::No);
    }

    #[test]
    fn address_sub_keys_round_trip() {
        let mut record = DeathRecord::new();
        record.set_address(AddressField::DeathLocation, AddressKey::StreetNumber, Some("12"));
        record.set_address(AddressField::DeathLocation, AddressKey::City, Some("Boston"));
        record.set_address(AddressField::Birthplace, AddressKey::State, Some("NH"));

        assert_eq!(
            record.address(AddressField::DeathLocation, AddressKey::StreetNumber).as_deref(),
            Some("12")
        );
        assert_eq!(
            record.address(AddressField::DeathLocation, AddressKey::City).as_deref(),
            Some("Boston")
        );
        assert_eq!(
            record.address(AddressField::Birthplace, AddressKey::State).as_deref(),
            Some("NH")
        );
    }

    #[test]
    fn axis_codes_are_rebuilt_wholesale() {
        let mut record = DeathRecord::new();
        record.set_entity_axis_codes(vec![
            EntityAxisEntry { line: 1, position: 1, code: "I21.0".into(), e_code: false },
            EntityAxisEntry { line: 2, position: 1, code: "I25.1".into(), e_code: true },
        ]);
        assert_eq!(record.entity_axis().len(), 2);

        record.set_entity_axis_codes(vec![EntityAxisEntry {
            line: 1,
            position: 1,
            code: "J18.9".into(),
            e_code: false,
        }]);
        let entries = record.entity_axis();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "J18.9");
    }

    #[test]
    fn cause_lines_keep_order_and_intervals() {
        let mut record = DeathRecord::new();
        record.set_cause_of_death_part1(vec![
            CauseLine { line: 2, text: "Coronary artery disease".into(), interval: Some("Years".into()) },
            CauseLine { line: 1, text: "Myocardial infarction".into(), interval: Some("Hours".into()) },
        ]);

        let lines = record.cause_of_death_part1();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, 1);
        assert_eq!(lines[0].interval.as_deref(), Some("Hours"));
        assert_eq!(lines[1].text, "Coronary artery disease");
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        let mut record = DeathRecord::new();
        let err = record
            .set_text(TextField::DeathLatitude, Some("north"))
            .expect_err("should reject");
        assert!(matches!(err, RecordError::InvalidInput(_)));

        record.set_text(TextField::DeathLatitude, Some("42.36")).expect("set");
        assert_eq!(record.text(TextField::DeathLatitude).as_deref(), Some("42.36"));
    }
}
