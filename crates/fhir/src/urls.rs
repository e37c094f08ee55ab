//! Canonical URLs, identifier systems and code systems of the vital-records interoperability
//! standard. These are part of the external wire contract and must not be changed locally.

macro_rules! sd {
    ($name:literal) => {
        concat!("http://hl7.org/fhir/us/vrdr/StructureDefinition/", $name)
    };
}

/// Prefix shared by every structure definition of the standard.
pub const STRUCTURE_DEFINITION_BASE: &str = sd!("");

// Bundle and composition profiles.
pub const DEATH_CERTIFICATE_DOCUMENT: &str = sd!("DeathCertificateDocument");
pub const DEATH_CERTIFICATE: &str = sd!("DeathCertificate");
pub const CAUSE_OF_DEATH_CODED_CONTENT_BUNDLE: &str = sd!("CauseOfDeathCodedContentBundle");
pub const DEMOGRAPHIC_CODED_CONTENT_BUNDLE: &str = sd!("DemographicCodedContentBundle");
pub const INDUSTRY_OCCUPATION_CODED_CONTENT_BUNDLE: &str =
    sd!("IndustryOccupationCodedContentBundle");
pub const MORTALITY_ROSTER_BUNDLE: &str = sd!("MortalityRosterBundle");

// Entity profiles.
pub const DECEDENT: &str = sd!("Decedent");
pub const CERTIFIER: &str = sd!("Certifier");
pub const DEATH_CERTIFICATION: &str = sd!("DeathCertification");

// Extensions.
pub const PARTIAL_DATE_TIME: &str = sd!("PartialDateTime");
pub const DATE_YEAR: &str = "date-year";
pub const DATE_MONTH: &str = "date-month";
pub const DATE_DAY: &str = "date-day";
pub const DATE_TIME: &str = "date-time";
pub const DATA_ABSENT_REASON: &str = "http://hl7.org/fhir/StructureDefinition/data-absent-reason";
pub const CERTIFICATE_NUMBER: &str = sd!("CertificateNumber");
pub const AUXILIARY_STATE_ID1: &str = sd!("AuxiliaryStateIdentifier1");
pub const AUXILIARY_STATE_ID2: &str = sd!("AuxiliaryStateIdentifier2");
pub const LOCATION_JURISDICTION_ID: &str = sd!("Location-Jurisdiction-Id");
pub const STATE_SPECIFIC_FIELD: &str = sd!("StateSpecificField");
pub const WITHIN_CITY_LIMITS: &str = sd!("WithinCityLimitsIndicator");
pub const CITY_CODE: &str = sd!("CityCode");
pub const DISTRICT_CODE: &str = sd!("DistrictCode");
pub const PRE_DIRECTIONAL: &str = sd!("PreDirectional");
pub const POST_DIRECTIONAL: &str = sd!("PostDirectional");
pub const STREET_DESIGNATOR: &str = sd!("StreetDesignator");
pub const STREET_NUMBER: &str = "http://hl7.org/fhir/StructureDefinition/iso21090-ADXP-houseNumber";
pub const STREET_NAME: &str = "http://hl7.org/fhir/StructureDefinition/iso21090-ADXP-streetName";
pub const UNIT_NUMBER: &str = "http://hl7.org/fhir/StructureDefinition/iso21090-ADXP-unitID";
pub const BIRTH_PLACE: &str = "http://hl7.org/fhir/StructureDefinition/patient-birthPlace";
pub const SPOUSE_ALIVE: &str = sd!("SpouseAlive");

// Identifier systems.
pub const RECORD_ID_SYSTEM: &str = "http://nchs.cdc.gov/vrdr_id";
pub const SSN_SYSTEM: &str = "http://hl7.org/fhir/sid/us-ssn";

// Code systems.
pub const LOINC: &str = "http://loinc.org";
pub const SNOMED: &str = "http://snomed.info/sct";
pub const ADMINISTRATIVE_GENDER: &str = "http://hl7.org/fhir/administrative-gender";
pub const UNITS_OF_MEASURE: &str = "http://unitsofmeasure.org";
pub const V3_ROLE_CODE: &str = "http://terminology.hl7.org/CodeSystem/v3-RoleCode";
pub const V3_MARITAL_STATUS: &str = "http://terminology.hl7.org/CodeSystem/v3-MaritalStatus";
pub const V3_NULL_FLAVOR: &str = "http://terminology.hl7.org/CodeSystem/v3-NullFlavor";
pub const V3_EDUCATION_LEVEL: &str = "http://terminology.hl7.org/CodeSystem/v3-EducationLevel";
pub const NULL_FLAVOR_UNKNOWN: &str = "UNK";
pub const V2_YES_NO: &str = "http://terminology.hl7.org/CodeSystem/v2-0136";
pub const COMPONENT_CS: &str = "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-component-cs";
pub const OBSERVATIONS_CS: &str = "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-observations-cs";
pub const LOCATION_TYPE_CS: &str = "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-location-type-cs";
pub const PREGNANCY_STATUS_CS: &str =
    "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-pregnancy-status-cs";
pub const ACTIVITY_AT_DEATH_CS: &str =
    "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-activity-at-time-of-death-cs";
pub const PLACE_OF_INJURY_CS: &str =
    "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-place-of-injury-cs";
pub const MISSING_VALUE_REASON_CS: &str =
    "http://hl7.org/fhir/us/vrdr/CodeSystem/vrdr-missing-value-reason-cs";
pub const ICD10: &str = "http://hl7.org/fhir/sid/icd-10";
