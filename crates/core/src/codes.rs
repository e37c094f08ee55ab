//! Discriminator codes that assign resources to record roles.
//!
//! Every observation in a death record is identified by its code. Singleton observations map to
//! an [`ObservationCode`]; cause-of-death lines and the two coded axes may occur many times and
//! are tracked as lists.

use fhir::urls::{LOCATION_TYPE_CS, LOINC, OBSERVATIONS_CS, SNOMED, V3_ROLE_CODE};
use fhir::{CodeableConcept, Coding};

/// SNOMED code of the death certification procedure.
pub const DEATH_CERTIFICATION_CODE: &str = "308646001";

/// Observations that occur at most once per record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObservationCode {
    DateOfDeath,
    Age,
    Education,
    UsualWork,
    TobaccoUse,
    PregnancyStatus,
    Autopsy,
    InjuryIncident,
    MannerOfDeath,
    MilitaryService,
    DispositionMethod,
    TransportationRole,
    ActivityAtDeath,
    AutomatedUnderlyingCause,
    ManualUnderlyingCause,
    PlaceOfInjury,
    ContributingConditions,
    InputRaceAndEthnicity,
    CodedRaceAndEthnicity,
    IndustryOccupationCoded,
    CodingStatus,
}

impl ObservationCode {
    pub const ALL: [ObservationCode; 21] = [
        ObservationCode::DateOfDeath,
        ObservationCode::Age,
        ObservationCode::Education,
        ObservationCode::UsualWork,
        ObservationCode::TobaccoUse,
        ObservationCode::PregnancyStatus,
        ObservationCode::Autopsy,
        ObservationCode::InjuryIncident,
        ObservationCode::MannerOfDeath,
        ObservationCode::MilitaryService,
        ObservationCode::DispositionMethod,
        ObservationCode::TransportationRole,
        ObservationCode::ActivityAtDeath,
        ObservationCode::AutomatedUnderlyingCause,
        ObservationCode::ManualUnderlyingCause,
        ObservationCode::PlaceOfInjury,
        ObservationCode::ContributingConditions,
        ObservationCode::InputRaceAndEthnicity,
        ObservationCode::CodedRaceAndEthnicity,
        ObservationCode::IndustryOccupationCoded,
        ObservationCode::CodingStatus,
    ];

    /// Returns `(system, code, display)`.
    pub fn parts(self) -> (&'static str, &'static str, &'static str) {
        match self {
            ObservationCode::DateOfDeath => (LOINC, "81956-5", "Date+time of death"),
            ObservationCode::Age => (LOINC, "39016-1", "Age at death"),
            ObservationCode::Education => (LOINC, "80913-7", "Highest level of education"),
            ObservationCode::UsualWork => (LOINC, "21843-8", "History of Usual occupation"),
            ObservationCode::TobaccoUse => (LOINC, "69443-0", "Did tobacco use contribute to death"),
            ObservationCode::PregnancyStatus => (LOINC, "69442-2", "Timing of recent pregnancy in relation to death"),
            ObservationCode::Autopsy => (LOINC, "85699-7", "Autopsy was performed"),
            ObservationCode::InjuryIncident => (LOINC, "11374-6", "Injury incident description Narrative"),
            ObservationCode::MannerOfDeath => (LOINC, "69449-7", "Manner of death"),
            ObservationCode::MilitaryService => (LOINC, "55280-2", "Military service Narrative"),
            ObservationCode::DispositionMethod => (LOINC, "80905-3", "Body disposition method"),
            ObservationCode::TransportationRole => (LOINC, "69451-3", "Transportation role of decedent"),
            ObservationCode::ActivityAtDeath => (LOINC, "80626-5", "Activity at time of death"),
            ObservationCode::AutomatedUnderlyingCause => (LOINC, "80358-5", "Cause of death.underlying [Automated]"),
            ObservationCode::ManualUnderlyingCause => (LOINC, "80359-3", "Cause of death.underlying [Manual]"),
            ObservationCode::PlaceOfInjury => (LOINC, "11376-1", "Injury location"),
            ObservationCode::ContributingConditions => (LOINC, "69441-4", "Other significant causes or conditions of death"),
            ObservationCode::InputRaceAndEthnicity => (OBSERVATIONS_CS, "inputraceandethnicity", "Input Race and Ethnicity"),
            ObservationCode::CodedRaceAndEthnicity => (OBSERVATIONS_CS, "codedraceandethnicity", "Coded Race and Ethnicity"),
            ObservationCode::IndustryOccupationCoded => (OBSERVATIONS_CS, "industryoccupationcoded", "Industry and Occupation Coded"),
            ObservationCode::CodingStatus => (OBSERVATIONS_CS, "codingstatus", "Coding Status"),
        }
    }

    pub fn concept(self) -> CodeableConcept {
        let (system, code, display) = self.parts();
        CodeableConcept::from_coding(Coding::new(system, code, display))
    }
}

/// Observations that may occur many times; each list is rebuilt wholesale on write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObservationList {
    CauseOfDeathPart1,
    EntityAxis,
    RecordAxis,
}

impl ObservationList {
    pub fn parts(self) -> (&'static str, &'static str, &'static str) {
        match self {
            ObservationList::CauseOfDeathPart1 => (LOINC, "69453-9", "Cause of death [US Standard Certificate of Death]"),
            ObservationList::EntityAxis => (LOINC, "80356-9", "Cause of death entity axis code [Automated]"),
            ObservationList::RecordAxis => (LOINC, "80357-7", "Cause of death record axis code [Automated]"),
        }
    }

    pub fn concept(self) -> CodeableConcept {
        let (system, code, display) = self.parts();
        CodeableConcept::from_coding(Coding::new(system, code, display))
    }
}

/// Role an observation plays once its code has been read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObservationRole {
    Single(ObservationCode),
    List(ObservationList),
}

impl ObservationRole {
    /// Matches a code against the known observation codes; `None` for codes this model skips.
    pub fn from_concept(concept: &CodeableConcept) -> Option<Self> {
        for code in ObservationCode::ALL {
            let (system, value, _) = code.parts();
            if concept.has_code(system, value) {
                return Some(ObservationRole::Single(code));
            }
        }
        [
            ObservationList::CauseOfDeathPart1,
            ObservationList::EntityAxis,
            ObservationList::RecordAxis,
        ]
        .into_iter()
        .find(|list| {
            let (system, value, _) = list.parts();
            concept.has_code(system, value)
        })
        .map(ObservationRole::List)
    }
}

/// Typed locations, discriminated by a local location-type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocationRole {
    Death,
    Disposition,
    Injury,
}

impl LocationRole {
    pub const ALL: [LocationRole; 3] = [
        LocationRole::Death,
        LocationRole::Disposition,
        LocationRole::Injury,
    ];

    pub fn code(self) -> &'static str {
        match self {
            LocationRole::Death => "death",
            LocationRole::Disposition => "disposition",
            LocationRole::Injury => "injury",
        }
    }

    pub fn concept(self) -> CodeableConcept {
        let display = match self {
            LocationRole::Death => "death location",
            LocationRole::Disposition => "disposition location",
            LocationRole::Injury => "injury location",
        };
        CodeableConcept::from_coding(Coding::new(LOCATION_TYPE_CS, self.code(), display))
    }

    pub fn from_concepts(types: &[CodeableConcept]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|role| types.iter().any(|t| t.has_code(LOCATION_TYPE_CS, role.code())))
    }
}

/// Relatives of the decedent, discriminated by their v3 RoleCode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Relationship {
    Father,
    Mother,
    Spouse,
}

impl Relationship {
    pub const ALL: [Relationship; 3] = [
        Relationship::Father,
        Relationship::Mother,
        Relationship::Spouse,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Relationship::Father => "FTH",
            Relationship::Mother => "MTH",
            Relationship::Spouse => "SPS",
        }
    }

    pub fn concept(self) -> CodeableConcept {
        let display = match self {
            Relationship::Father => "father",
            Relationship::Mother => "mother",
            Relationship::Spouse => "spouse",
        };
        CodeableConcept::from_coding(Coding::new(V3_ROLE_CODE, self.code(), display))
    }

    pub fn from_concepts(relationships: &[CodeableConcept]) -> Option<Self> {
        Self::ALL.into_iter().find(|role| {
            relationships
                .iter()
                .any(|r| r.has_code(V3_ROLE_CODE, role.code()))
        })
    }
}

pub fn certification_concept() -> CodeableConcept {
    CodeableConcept::from_coding(Coding::new(
        SNOMED,
        DEATH_CERTIFICATION_CODE,
        "Death certification",
    ))
}

/// `(system, code)` of the components carried by observations.
pub mod component {
    use fhir::urls::{COMPONENT_CS, LOINC};

    pub type ComponentCode = (&'static str, &'static str);

    pub const PLACE_OF_DEATH: ComponentCode = (LOINC, "58332-8");
    pub const USUAL_INDUSTRY: ComponentCode = (LOINC, "21844-6");
    pub const INJURY_AT_WORK: ComponentCode = (LOINC, "69444-8");
    pub const AUTOPSY_RESULTS_AVAILABLE: ComponentCode = (LOINC, "69436-4");
    pub const INTERVAL: ComponentCode = (LOINC, "69440-6");

    pub const LINE_NUMBER: ComponentCode = (COMPONENT_CS, "lineNumber");
    pub const POSITION: ComponentCode = (COMPONENT_CS, "position");
    pub const E_CODE_INDICATOR: ComponentCode = (COMPONENT_CS, "eCodeIndicator");
    pub const PREGNANCY_INDICATOR: ComponentCode =
        (COMPONENT_CS, "wouldBeUnderlyingCauseOfDeathWithoutPregnancy");

    pub const OCCUPATION_CODE: ComponentCode = (COMPONENT_CS, "occupationCode");
    pub const INDUSTRY_CODE: ComponentCode = (COMPONENT_CS, "industryCode");

    pub const INTENTIONAL_REJECT: ComponentCode = (COMPONENT_CS, "intentionalReject");
    pub const ACME_SYSTEM_REJECT: ComponentCode = (COMPONENT_CS, "acmeSystemReject");
    pub const TRANSAX_CONVERSION: ComponentCode = (COMPONENT_CS, "transaxConversion");

    pub const MISSING_VALUE_REASON: ComponentCode = (COMPONENT_CS, "MissingValueReason");
}

/// Input race and ethnicity component names (local component code system).
pub mod race {
    pub const WHITE: &str = "White";
    pub const BLACK: &str = "BlackOrAfricanAmerican";
    pub const AMERICAN_INDIAN: &str = "AmericanIndianOrAlaskanNative";
    pub const ASIAN_INDIAN: &str = "AsianIndian";
    pub const CHINESE: &str = "Chinese";
    pub const FILIPINO: &str = "Filipino";
    pub const JAPANESE: &str = "Japanese";
    pub const KOREAN: &str = "Korean";
    pub const VIETNAMESE: &str = "Vietnamese";
    pub const OTHER_ASIAN: &str = "OtherAsian";
    pub const NATIVE_HAWAIIAN: &str = "NativeHawaiian";
    pub const GUAMANIAN: &str = "GuamanianOrChamorro";
    pub const SAMOAN: &str = "Samoan";
    pub const OTHER_PACIFIC_ISLANDER: &str = "OtherPacificIslander";
    pub const OTHER_RACE: &str = "OtherRace";

    pub const FIRST_AMERICAN_INDIAN_LITERAL: &str = "FirstAmericanIndianOrAlaskanNativeLiteral";
    pub const SECOND_AMERICAN_INDIAN_LITERAL: &str = "SecondAmericanIndianOrAlaskanNativeLiteral";
    pub const FIRST_OTHER_ASIAN_LITERAL: &str = "FirstOtherAsianLiteral";
    pub const SECOND_OTHER_ASIAN_LITERAL: &str = "SecondOtherAsianLiteral";
    pub const FIRST_OTHER_PACIFIC_ISLANDER_LITERAL: &str = "FirstOtherPacificIslanderLiteral";
    pub const SECOND_OTHER_PACIFIC_ISLANDER_LITERAL: &str = "SecondOtherPacificIslanderLiteral";
    pub const FIRST_OTHER_RACE_LITERAL: &str = "FirstOtherRaceLiteral";
    pub const SECOND_OTHER_RACE_LITERAL: &str = "SecondOtherRaceLiteral";

    pub const HISPANIC_MEXICAN: &str = "HispanicMexican";
    pub const HISPANIC_PUERTO_RICAN: &str = "HispanicPuertoRican";
    pub const HISPANIC_CUBAN: &str = "HispanicCuban";
    pub const HISPANIC_OTHER: &str = "HispanicOther";
    pub const HISPANIC_LITERAL: &str = "HispanicLiteral";
}

/// Coded race and ethnicity component names (local component code system).
pub mod coded_race {
    pub const HISPANIC_CODE: &str = "HispanicCode";
    pub const HISPANIC_CODE_FOR_LITERAL: &str = "HispanicCodeForLiteral";
    pub const EDITED: [&str; 8] = [
        "FirstEditedCode",
        "SecondEditedCode",
        "ThirdEditedCode",
        "FourthEditedCode",
        "FifthEditedCode",
        "SixthEditedCode",
        "SeventhEditedCode",
        "EighthEditedCode",
    ];
    pub const FIRST_AMERICAN_INDIAN_CODE: &str = "FirstAmericanIndianCode";
    pub const SECOND_AMERICAN_INDIAN_CODE: &str = "SecondAmericanIndianCode";
    pub const FIRST_OTHER_ASIAN_CODE: &str = "FirstOtherAsianCode";
    pub const SECOND_OTHER_ASIAN_CODE: &str = "SecondOtherAsianCode";
    pub const FIRST_OTHER_PACIFIC_ISLANDER_CODE: &str = "FirstOtherPacificIslanderCode";
    pub const SECOND_OTHER_PACIFIC_ISLANDER_CODE: &str = "SecondOtherPacificIslanderCode";
    pub const FIRST_OTHER_RACE_CODE: &str = "FirstOtherRaceCode";
    pub const SECOND_OTHER_RACE_CODE: &str = "SecondOtherRaceCode";
    pub const BRIDGED_RACE: &str = "RaceBridged";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_roles_resolve_from_codes() {
        let concept = ObservationCode::MannerOfDeath.concept();
        assert_eq!(
            ObservationRole::from_concept(&concept),
            Some(ObservationRole::Single(ObservationCode::MannerOfDeath))
        );

        let concept = ObservationList::EntityAxis.concept();
        assert_eq!(
            ObservationRole::from_concept(&concept),
            Some(ObservationRole::List(ObservationList::EntityAxis))
        );

        let unknown = CodeableConcept::from_coding(Coding::new(LOINC, "00000-0", ""));
        assert_eq!(ObservationRole::from_concept(&unknown), None);
    }

    #[test]
    fn observation_codes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in ObservationCode::ALL {
            let (system, value, _) = code.parts();
            assert!(seen.insert((system, value)), "duplicate code {value}");
        }
    }

    #[test]
    fn location_and_relationship_roles_round_trip() {
        for role in LocationRole::ALL {
            assert_eq!(LocationRole::from_concepts(&[role.concept()]), Some(role));
        }
        for rel in Relationship::ALL {
            assert_eq!(Relationship::from_concepts(&[rel.concept()]), Some(rel));
        }
    }
}
