//! Static lookup tables between IJE short codes and record codings.
//!
//! Each table is a named value set; entries are one-to-one, so translating an IJE code to a
//! coding and back yields the original code.

use fhir::urls::{
    ACTIVITY_AT_DEATH_CS, ADMINISTRATIVE_GENDER, MISSING_VALUE_REASON_CS, PLACE_OF_INJURY_CS,
    PREGNANCY_STATUS_CS, SNOMED, UNITS_OF_MEASURE, V3_EDUCATION_LEVEL, V3_MARITAL_STATUS,
    V3_NULL_FLAVOR,
};
use fhir::Coding;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mapping {
    pub ije: &'static str,
    pub system: &'static str,
    pub code: &'static str,
    pub display: &'static str,
}

const fn m(ije: &'static str, system: &'static str, code: &'static str, display: &'static str) -> Mapping {
    Mapping {
        ije,
        system,
        code,
        display,
    }
}

#[derive(Debug)]
pub struct ValueSet {
    pub name: &'static str,
    pub entries: &'static [Mapping],
}

impl ValueSet {
    pub fn to_coding(&self, ije: &str) -> Option<Coding> {
        let ije = ije.trim();
        self.entries
            .iter()
            .find(|e| e.ije == ije)
            .map(|e| Coding::new(e.system, e.code, e.display))
    }

    /// Finds the IJE code for a coding. A coding without a system matches on code alone.
    pub fn to_ije(&self, coding: &Coding) -> Option<&'static str> {
        let code = coding.code.as_deref()?;
        self.entries
            .iter()
            .find(|e| {
                e.code == code
                    && coding
                        .system
                        .as_deref()
                        .map_or(true, |system| system == e.system)
            })
            .map(|e| e.ije)
    }
}

pub static SEX: ValueSet = ValueSet {
    name: "Sex",
    entries: &[
        m("M", ADMINISTRATIVE_GENDER, "male", "Male"),
        m("F", ADMINISTRATIVE_GENDER, "female", "Female"),
        m("U", ADMINISTRATIVE_GENDER, "unknown", "Unknown"),
    ],
};

pub static MARITAL_STATUS: ValueSet = ValueSet {
    name: "Marital Status",
    entries: &[
        m("M", V3_MARITAL_STATUS, "M", "Married"),
        m("A", V3_MARITAL_STATUS, "L", "Legally Separated"),
        m("W", V3_MARITAL_STATUS, "W", "Widowed"),
        m("D", V3_MARITAL_STATUS, "D", "Divorced"),
        m("S", V3_MARITAL_STATUS, "S", "Never Married"),
        m("U", V3_NULL_FLAVOR, "UNK", "unknown"),
    ],
};

pub static PLACE_OF_DEATH: ValueSet = ValueSet {
    name: "Place of Death",
    entries: &[
        m("1", SNOMED, "16983000", "Death in hospital"),
        m("2", SNOMED, "450391000124102", "Death in emergency Room/Outpatient"),
        m("3", SNOMED, "63238001", "Dead on arrival at hospital"),
        m("4", SNOMED, "440081000124100", "Death in home"),
        m("5", SNOMED, "450381000124100", "Death in nursing home/Long term care facility"),
        m("6", SNOMED, "440071000124103", "Death in hospice"),
        m("7", V3_NULL_FLAVOR, "OTH", "other"),
        m("9", V3_NULL_FLAVOR, "UNK", "unknown"),
    ],
};

pub static DISPOSITION_METHOD: ValueSet = ValueSet {
    name: "Method of Disposition",
    entries: &[
        m("B", SNOMED, "449971000124106", "Burial"),
        m("C", SNOMED, "449961000124104", "Cremation"),
        m("D", SNOMED, "449951000124101", "Donation"),
        m("E", SNOMED, "449931000124108", "Entombment"),
        m("R", SNOMED, "449941000124103", "Removal from State"),
        m("O", V3_NULL_FLAVOR, "OTH", "other"),
        m("U", V3_NULL_FLAVOR, "UNK", "unknown"),
    ],
};

pub static EDUCATION: ValueSet = ValueSet {
    name: "Education Level",
    entries: &[
        m("1", V3_EDUCATION_LEVEL, "ELEM", "Elementary School"),
        m("2", V3_EDUCATION_LEVEL, "SEC", "Some secondary or high school education"),
        m("3", V3_EDUCATION_LEVEL, "HS", "High School or secondary school degree complete"),
        m("4", V3_EDUCATION_LEVEL, "SCOL", "Some College education"),
        m("5", V3_EDUCATION_LEVEL, "ASSOC", "Associate's or technical degree complete"),
        m("6", V3_EDUCATION_LEVEL, "BD", "College or baccalaureate degree complete"),
        m("7", V3_EDUCATION_LEVEL, "GD", "Graduate or professional Degree complete"),
        m("8", V3_EDUCATION_LEVEL, "POSTG", "Doctoral or post graduate education"),
        m("9", V3_NULL_FLAVOR, "UNK", "unknown"),
    ],
};

pub static MANNER_OF_DEATH: ValueSet = ValueSet {
    name: "Manner of Death",
    entries: &[
        m("N", SNOMED, "38605008", "Natural death"),
        m("A", SNOMED, "7878000", "Accidental death"),
        m("S", SNOMED, "44301001", "Suicide"),
        m("H", SNOMED, "27935005", "Homicide"),
        m("P", SNOMED, "185973002", "Patient awaiting investigation"),
        m("C", SNOMED, "65037004", "Death, manner undetermined"),
    ],
};

pub static TOBACCO_USE: ValueSet = ValueSet {
    name: "Contributory Tobacco Use",
    entries: &[
        m("Y", SNOMED, "373066001", "Yes"),
        m("N", SNOMED, "373067005", "No"),
        m("P", SNOMED, "2931005", "Probably"),
        m("U", V3_NULL_FLAVOR, "UNK", "unknown"),
        m("C", V3_NULL_FLAVOR, "NI", "no information"),
    ],
};

pub static PREGNANCY_STATUS: ValueSet = ValueSet {
    name: "Pregnancy Status",
    entries: &[
        m("1", PREGNANCY_STATUS_CS, "1", "Not pregnant within past year"),
        m("2", PREGNANCY_STATUS_CS, "2", "Pregnant at time of death"),
        m("3", PREGNANCY_STATUS_CS, "3", "Not pregnant, but pregnant within 42 days of death"),
        m("4", PREGNANCY_STATUS_CS, "4", "Not pregnant, but pregnant 43 days to 1 year before death"),
        m("7", PREGNANCY_STATUS_CS, "7", "Unknown if pregnant within the past year"),
        m("8", V3_NULL_FLAVOR, "NA", "not applicable"),
        m("9", PREGNANCY_STATUS_CS, "9", "Not reported on certificate"),
    ],
};

pub static CERTIFIER_TYPE: ValueSet = ValueSet {
    name: "Certifier Type",
    entries: &[
        m("D", SNOMED, "434641000124105", "Physician (Certifier)"),
        m("P", SNOMED, "434651000124107", "Physician (Pronouncer and Certifier)"),
        m("M", SNOMED, "440051000124108", "Medical Examiner/Coroner"),
        m("O", V3_NULL_FLAVOR, "OTH", "other"),
    ],
};

pub static TRANSPORTATION_ROLE: ValueSet = ValueSet {
    name: "Transportation Incident Role",
    entries: &[
        m("DR", SNOMED, "236320001", "Vehicle driver"),
        m("PA", SNOMED, "257500003", "Passenger"),
        m("PE", SNOMED, "257518000", "Pedestrian"),
        m("OT", V3_NULL_FLAVOR, "OTH", "other"),
    ],
};

pub static ACTIVITY_AT_DEATH: ValueSet = ValueSet {
    name: "Activity at Time of Death",
    entries: &[
        m("0", ACTIVITY_AT_DEATH_CS, "0", "While engaged in sports activity"),
        m("1", ACTIVITY_AT_DEATH_CS, "1", "While engaged in leisure activities"),
        m("2", ACTIVITY_AT_DEATH_CS, "2", "While working for income"),
        m("3", ACTIVITY_AT_DEATH_CS, "3", "While engaged in other types of work"),
        m("4", ACTIVITY_AT_DEATH_CS, "4", "While resting, sleeping, eating, or engaging in other vital activities"),
        m("8", ACTIVITY_AT_DEATH_CS, "8", "While engaged in other specified activities"),
        m("9", ACTIVITY_AT_DEATH_CS, "9", "During unspecified activity"),
    ],
};

pub static PLACE_OF_INJURY: ValueSet = ValueSet {
    name: "Place of Injury",
    entries: &[
        m("0", PLACE_OF_INJURY_CS, "0", "Home"),
        m("1", PLACE_OF_INJURY_CS, "1", "Residential institution"),
        m("2", PLACE_OF_INJURY_CS, "2", "School, other institution and public administrative area"),
        m("3", PLACE_OF_INJURY_CS, "3", "Sports and athletics area"),
        m("4", PLACE_OF_INJURY_CS, "4", "Street and highway"),
        m("5", PLACE_OF_INJURY_CS, "5", "Trade and service area"),
        m("6", PLACE_OF_INJURY_CS, "6", "Industrial and construction area"),
        m("7", PLACE_OF_INJURY_CS, "7", "Farm"),
        m("8", PLACE_OF_INJURY_CS, "8", "Other specified place"),
        m("9", PLACE_OF_INJURY_CS, "9", "Unspecified place"),
    ],
};

pub static RACE_MISSING_VALUE_REASON: ValueSet = ValueSet {
    name: "Race Missing Value Reason",
    entries: &[
        m("R", MISSING_VALUE_REASON_CS, "R", "Refused"),
        m("S", MISSING_VALUE_REASON_CS, "S", "Sought, but unknown"),
        m("C", MISSING_VALUE_REASON_CS, "C", "Not obtainable"),
    ],
};

pub static AGE_UNIT: ValueSet = ValueSet {
    name: "Age Unit",
    entries: &[
        m("1", UNITS_OF_MEASURE, "a", "Years"),
        m("2", UNITS_OF_MEASURE, "mo", "Months"),
        m("4", UNITS_OF_MEASURE, "d", "Days"),
        m("5", UNITS_OF_MEASURE, "h", "Hours"),
        m("6", UNITS_OF_MEASURE, "min", "Minutes"),
    ],
};

/// Every value set, for iteration in tests and tooling.
pub static ALL: &[&ValueSet] = &[
    &SEX,
    &MARITAL_STATUS,
    &PLACE_OF_DEATH,
    &DISPOSITION_METHOD,
    &EDUCATION,
    &MANNER_OF_DEATH,
    &TOBACCO_USE,
    &PREGNANCY_STATUS,
    &CERTIFIER_TYPE,
    &TRANSPORTATION_ROLE,
    &ACTIVITY_AT_DEATH,
    &PLACE_OF_INJURY,
    &RACE_MISSING_VALUE_REASON,
    &AGE_UNIT,
];
