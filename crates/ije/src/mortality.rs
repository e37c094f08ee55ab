//! The 5000-character mortality layout.
//!
//! Each row declares a field and how it binds to the death record. Rows are in sequence order;
//! offsets follow from the widths. Unbound rows (infant linkage, bypass flags, legacy codes,
//! blank filler) are carried through the codec but never read from or written to a record.

use crate::binding::{Binding, DatePart};
use crate::mappings;
use crate::registry::{FieldRegistry, FieldRow, Justification, RecordKind};
use once_cell::sync::Lazy;
use vital_core::codes::{coded_race, race};
use vital_core::{AddressField, AddressKey, CodedField, DateField, FlagField, TextField};

pub const MORTALITY_WIDTH: usize = 5000;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Row {
    pub field: FieldRow,
    pub binding: Binding,
}

const fn left(code: &'static str, name: &'static str, width: usize, binding: Binding) -> Row {
    Row {
        field: FieldRow {
            code,
            name,
            width,
            justification: Justification::Left,
        },
        binding,
    }
}

const fn zero(code: &'static str, name: &'static str, width: usize, binding: Binding) -> Row {
    Row {
        field: FieldRow {
            code,
            name,
            width,
            justification: Justification::ZeroFilled,
        },
        binding,
    }
}

const fn blank(code: &'static str, width: usize) -> Row {
    left(code, "Blank", width, Binding::Unbound)
}

use Binding::{Address as Addr, Coded, DatePart as Date, Flag, HispanicFlag, Text, Unbound};

pub(crate) static ROWS: &[Row] = &[
    left("DOD_YR", "Date of Death--Year", 4, Date(DateField::Death, DatePart::Year)),
    left("DSTATE", "State, U.S. Territory or Canadian Province of Death - code", 2, Text(TextField::Jurisdiction)),
    zero("FILENO", "Certificate Number", 6, Text(TextField::CertificateNumber)),
    left("VOID", "Void flag", 1, Unbound),
    left("AUXNO", "Auxiliary State file number", 12, Text(TextField::StateAuxiliaryId1)),
    left("MFILED", "Source flag: paper/electronic", 1, Unbound),
    left("GNAME", "Decedent's Legal Name--Given", 50, Text(TextField::GivenName)),
    left("MNAME", "Decedent's Legal Name--Middle", 1, Binding::MiddleInitial),
    left("LNAME", "Decedent's Legal Name--Last", 50, Text(TextField::FamilyName)),
    left("SUFF", "Decedent's Legal Name--Suffix", 10, Text(TextField::Suffix)),
    left("ALIAS", "Decedent's Legal Name--Alias", 1, Unbound),
    left("FLNAME", "Father's Surname", 50, Text(TextField::FatherFamilyName)),
    left("SEX", "Sex", 1, Coded(CodedField::Sex, &mappings::SEX)),
    left("SSN", "Social Security Number", 9, Text(TextField::Ssn)),
    left("AGETYPE", "Decedent's Age--Type", 1, Coded(CodedField::AgeUnit, &mappings::AGE_UNIT)),
    left("AGE", "Decedent's Age--Units", 3, Binding::Age),
    left("AGE_BYPASS", "Decedent's Age--Edit Flag", 1, Unbound),
    left("DOB_YR", "Date of Birth--Year", 4, Date(DateField::Birth, DatePart::Year)),
    left("DOB_MO", "Date of Birth--Month", 2, Date(DateField::Birth, DatePart::Month)),
    left("DOB_DY", "Date of Birth--Day", 2, Date(DateField::Birth, DatePart::Day)),
    left("BPLACE_CNT", "Birthplace--Country", 2, Addr(AddressField::Birthplace, AddressKey::Country)),
    left("BPLACE_ST", "State, U.S. Territory or Canadian Province of Birth - code", 2, Addr(AddressField::Birthplace, AddressKey::State)),
    left("CITYC", "Decedent's Residence--City", 5, Addr(AddressField::Residence, AddressKey::CityCode)),
    left("COUNTYC", "Decedent's Residence--County", 3, Addr(AddressField::Residence, AddressKey::CountyCode)),
    left("STATEC", "State, U.S. Territory or Canadian Province of Decedent's residence - code", 2, Addr(AddressField::Residence, AddressKey::State)),
    left("COUNTRYC", "Decedent's Residence--Country", 2, Addr(AddressField::Residence, AddressKey::Country)),
    left("LIMITS", "Decedent's Residence--Inside City Limits", 1, Binding::CityLimits),
    left("MARITAL", "Marital Status", 1, Coded(CodedField::MaritalStatus, &mappings::MARITAL_STATUS)),
    left("MARITAL_BYPASS", "Marital Status--Edit Flag", 1, Unbound),
    left("DPLACE", "Place of Death", 1, Coded(CodedField::PlaceOfDeath, &mappings::PLACE_OF_DEATH)),
    left("COD", "County of Death Occurrence", 3, Addr(AddressField::DeathLocation, AddressKey::CountyCode)),
    left("DISP", "Method of Disposition", 1, Coded(CodedField::DispositionMethod, &mappings::DISPOSITION_METHOD)),
    left("DOD_MO", "Date of Death--Month", 2, Date(DateField::Death, DatePart::Month)),
    left("DOD_DY", "Date of Death--Day", 2, Date(DateField::Death, DatePart::Day)),
    left("TOD", "Time of Death", 4, Date(DateField::Death, DatePart::Time)),
    left("DEDUC", "Decedent's Education", 1, Coded(CodedField::Education, &mappings::EDUCATION)),
    left("DEDUC_BYPASS", "Decedent's Education--Edit Flag", 1, Unbound),
    left("DETHNIC1", "Decedent of Hispanic Origin?--Mexican", 1, HispanicFlag(FlagField::Hispanic(race::HISPANIC_MEXICAN))),
    left("DETHNIC2", "Decedent of Hispanic Origin?--Puerto Rican", 1, HispanicFlag(FlagField::Hispanic(race::HISPANIC_PUERTO_RICAN))),
    left("DETHNIC3", "Decedent of Hispanic Origin?--Cuban", 1, HispanicFlag(FlagField::Hispanic(race::HISPANIC_CUBAN))),
    left("DETHNIC4", "Decedent of Hispanic Origin?--Other", 1, HispanicFlag(FlagField::Hispanic(race::HISPANIC_OTHER))),
    left("DETHNIC5", "Decedent of Hispanic Origin?--Other, Literal", 20, Text(TextField::RaceLiteral(race::HISPANIC_LITERAL))),
    left("RACE1", "Decedent's Race--White", 1, Flag(FlagField::Race(race::WHITE))),
    left("RACE2", "Decedent's Race--Black or African American", 1, Flag(FlagField::Race(race::BLACK))),
    left("RACE3", "Decedent's Race--American Indian or Alaska Native", 1, Flag(FlagField::Race(race::AMERICAN_INDIAN))),
    left("RACE4", "Decedent's Race--Asian Indian", 1, Flag(FlagField::Race(race::ASIAN_INDIAN))),
    left("RACE5", "Decedent's Race--Chinese", 1, Flag(FlagField::Race(race::CHINESE))),
    left("RACE6", "Decedent's Race--Filipino", 1, Flag(FlagField::Race(race::FILIPINO))),
    left("RACE7", "Decedent's Race--Japanese", 1, Flag(FlagField::Race(race::JAPANESE))),
    left("RACE8", "Decedent's Race--Korean", 1, Flag(FlagField::Race(race::KOREAN))),
    left("RACE9", "Decedent's Race--Vietnamese", 1, Flag(FlagField::Race(race::VIETNAMESE))),
    left("RACE10", "Decedent's Race--Other Asian", 1, Flag(FlagField::Race(race::OTHER_ASIAN))),
    left("RACE11", "Decedent's Race--Native Hawaiian", 1, Flag(FlagField::Race(race::NATIVE_HAWAIIAN))),
    left("RACE12", "Decedent's Race--Guamanian or Chamorro", 1, Flag(FlagField::Race(race::GUAMANIAN))),
    left("RACE13", "Decedent's Race--Samoan", 1, Flag(FlagField::Race(race::SAMOAN))),
    left("RACE14", "Decedent's Race--Other Pacific Islander", 1, Flag(FlagField::Race(race::OTHER_PACIFIC_ISLANDER))),
    left("RACE15", "Decedent's Race--Other", 1, Flag(FlagField::Race(race::OTHER_RACE))),
    left("RACE16", "Decedent's Race--First American Indian or Alaska Native Literal", 30, Text(TextField::RaceLiteral(race::FIRST_AMERICAN_INDIAN_LITERAL))),
    left("RACE17", "Decedent's Race--Second American Indian or Alaska Native Literal", 30, Text(TextField::RaceLiteral(race::SECOND_AMERICAN_INDIAN_LITERAL))),
    left("RACE18", "Decedent's Race--First Other Asian Literal", 30, Text(TextField::RaceLiteral(race::FIRST_OTHER_ASIAN_LITERAL))),
    left("RACE19", "Decedent's Race--Second Other Asian Literal", 30, Text(TextField::RaceLiteral(race::SECOND_OTHER_ASIAN_LITERAL))),
    left("RACE20", "Decedent's Race--First Other Pacific Islander Literal", 30, Text(TextField::RaceLiteral(race::FIRST_OTHER_PACIFIC_ISLANDER_LITERAL))),
    left("RACE21", "Decedent's Race--Second Other Pacific Islander Literal", 30, Text(TextField::RaceLiteral(race::SECOND_OTHER_PACIFIC_ISLANDER_LITERAL))),
    left("RACE22", "Decedent's Race--First Other Literal", 30, Text(TextField::RaceLiteral(race::FIRST_OTHER_RACE_LITERAL))),
    left("RACE23", "Decedent's Race--Second Other Literal", 30, Text(TextField::RaceLiteral(race::SECOND_OTHER_RACE_LITERAL))),
    left("RACE_MVR", "Decedent's Race--Missing", 1, Coded(CodedField::RaceMissingValueReason, &mappings::RACE_MISSING_VALUE_REASON)),
    left("OCCUP", "Occupation -- Literal", 40, Text(TextField::UsualOccupation)),
    left("OCCUPC", "Occupation -- Code", 3, Unbound),
    left("INDUST", "Industry -- Literal", 40, Text(TextField::UsualIndustry)),
    left("INDUSTC", "Industry -- Code", 3, Unbound),
    left("BCNO", "Infant Death/Birth Linking - birth certificate number", 6, Unbound),
    left("IDOB_YR", "Infant Death/Birth Linking - year of birth", 4, Unbound),
    left("BSTATE", "Infant Death/Birth Linking - State, U.S. Territory or Canadian Province of Birth - code", 2, Unbound),
    left("R_YR", "Receipt date -- Year", 4, Date(DateField::Receipt, DatePart::Year)),
    left("R_MO", "Receipt date -- Month", 2, Date(DateField::Receipt, DatePart::Month)),
    left("R_DY", "Receipt date -- Day", 2, Date(DateField::Receipt, DatePart::Day)),
    left("OCCUPC4", "Occupation -- 4 digit Code", 6, Text(TextField::OccupationCode)),
    left("INDUSTC4", "Industry -- 4 digit Code", 6, Text(TextField::IndustryCode)),
    left("DOR_YR", "Date of Registration--Year", 4, Date(DateField::Registration, DatePart::Year)),
    left("DOR_MO", "Date of Registration--Month", 2, Date(DateField::Registration, DatePart::Month)),
    left("DOR_DY", "Date of Registration--Day", 2, Date(DateField::Registration, DatePart::Day)),
    blank("FILLER_652", 49),
    left("MANNER", "Manner of Death", 1, Coded(CodedField::MannerOfDeath, &mappings::MANNER_OF_DEATH)),
    left("INT_REJ", "Intentional Reject", 1, Text(TextField::IntentionalReject)),
    left("SYS_REJ", "Acme System Reject Codes", 1, Text(TextField::AcmeSystemReject)),
    left("INJPL", "Place of Injury (computer generated)", 1, Coded(CodedField::PlaceOfInjury, &mappings::PLACE_OF_INJURY)),
    left("MAN_UC", "Manual Underlying Cause", 5, Binding::CauseCode(CodedField::ManualUnderlyingCause)),
    left("ACME_UC", "ACME Underlying Cause", 5, Binding::CauseCode(CodedField::AutomatedUnderlyingCause)),
    left("EAC", "Entity-axis codes", 160, Binding::EntityAxis),
    left("TRX_FLG", "Transax conversion flag", 1, Text(TextField::TransaxConversion)),
    left("RAC", "Record-axis codes", 100, Binding::RecordAxis),
    left("AUTOP", "Was Autopsy performed", 1, Flag(FlagField::Autopsy)),
    left("AUTOPF", "Were Autopsy Findings Available to Complete the Cause of Death?", 1, Flag(FlagField::AutopsyResultsAvailable)),
    left("TOBAC", "Did Tobacco Use Contribute to Death?", 1, Coded(CodedField::TobaccoUse, &mappings::TOBACCO_USE)),
    left("PREG", "Pregnancy", 1, Coded(CodedField::PregnancyStatus, &mappings::PREGNANCY_STATUS)),
    left("PREG_BYPASS", "If Female--Edit Flag", 1, Unbound),
    left("DOI_MO", "Date of injury--month", 2, Date(DateField::Injury, DatePart::Month)),
    left("DOI_DY", "Date of injury--day", 2, Date(DateField::Injury, DatePart::Day)),
    left("DOI_YR", "Date of injury--year", 4, Date(DateField::Injury, DatePart::Year)),
    left("TOI_HR", "Time of injury", 4, Date(DateField::Injury, DatePart::Time)),
    left("WORKINJ", "Injury at work", 1, Flag(FlagField::InjuryAtWork)),
    left("CERTL", "Title of Certifier", 30, Coded(CodedField::CertifierType, &mappings::CERTIFIER_TYPE)),
    left("INACT", "Activity at time of death (computer generated)", 1, Coded(CodedField::ActivityAtDeath, &mappings::ACTIVITY_AT_DEATH)),
    left("AUXNO2", "Auxiliary State file number", 12, Text(TextField::StateAuxiliaryId2)),
    left("STATESP", "State Specific Data", 30, Text(TextField::StateSpecific)),
    left("SUR_MO", "Surgery Date--month", 2, Unbound),
    left("SUR_DY", "Surgery Date--day", 2, Unbound),
    left("SUR_YR", "Surgery Date--year", 4, Unbound),
    left("TOI_UNIT", "Time of Injury Unit", 1, Unbound),
    blank("BLANK_1076", 5),
    left("ARMEDF", "Decedent ever served in Armed Forces?", 1, Flag(FlagField::MilitaryService)),
    left("DINSTI", "Death Institution name", 50, Text(TextField::DeathLocationName)),
    left("ADDRESS_D", "Long String address for place of death", 50, Addr(AddressField::DeathLocation, AddressKey::Line1)),
    left("STNUM_D", "Place of death. Street number", 10, Addr(AddressField::DeathLocation, AddressKey::StreetNumber)),
    left("PREDIR_D", "Place of death. Pre Directional", 10, Addr(AddressField::DeathLocation, AddressKey::PreDirectional)),
    left("STNAME_D", "Place of death. Street name", 50, Addr(AddressField::DeathLocation, AddressKey::StreetName)),
    left("STDESIG_D", "Place of death. Street designator", 10, Addr(AddressField::DeathLocation, AddressKey::StreetDesignator)),
    left("POSTDIR_D", "Place of death. Post Directional", 10, Addr(AddressField::DeathLocation, AddressKey::PostDirectional)),
    left("CITYTEXT_D", "Place of death. City or Town name", 28, Addr(AddressField::DeathLocation, AddressKey::City)),
    left("STATETEXT_D", "Place of death. State name literal", 28, Addr(AddressField::DeathLocation, AddressKey::State)),
    left("ZIP9_D", "Place of death. Zip code", 9, Addr(AddressField::DeathLocation, AddressKey::Zip)),
    left("COUNTYTEXT_D", "Place of death. County of Death", 28, Addr(AddressField::DeathLocation, AddressKey::County)),
    left("CITYCODE_D", "Place of death. City FIPS code", 5, Addr(AddressField::DeathLocation, AddressKey::CityCode)),
    left("LONG_D", "Place of death. Longitude", 17, Text(TextField::DeathLongitude)),
    left("LAT_D", "Place of Death. Latitude", 17, Text(TextField::DeathLatitude)),
    left("SPOUSELV", "Decedent's spouse living at decedent's DOD?", 1, Flag(FlagField::SpouseAlive)),
    left("SPOUSEF", "Spouse's First Name", 50, Text(TextField::SpouseGivenName)),
    left("SPOUSEL", "Husband's Surname/Wife's Maiden Last Name", 50, Text(TextField::SpouseFamilyName)),
    left("STNUM_R", "Decedent's Residence - Street number", 10, Addr(AddressField::Residence, AddressKey::StreetNumber)),
    left("PREDIR_R", "Decedent's Residence - Pre Directional", 10, Addr(AddressField::Residence, AddressKey::PreDirectional)),
    left("STNAME_R", "Decedent's Residence - Street name", 28, Addr(AddressField::Residence, AddressKey::StreetName)),
    left("STDESIG_R", "Decedent's Residence - Street designator", 10, Addr(AddressField::Residence, AddressKey::StreetDesignator)),
    left("POSTDIR_R", "Decedent's Residence - Post directional", 10, Addr(AddressField::Residence, AddressKey::PostDirectional)),
    left("UNITNUM_R", "Decedent's Residence - Unit number", 7, Addr(AddressField::Residence, AddressKey::UnitNumber)),
    left("CITYTEXT_R", "Decedent's Residence - City or Town name", 28, Addr(AddressField::Residence, AddressKey::City)),
    left("ZIP9_R", "Decedent's Residence - ZIP code", 9, Addr(AddressField::Residence, AddressKey::Zip)),
    left("COUNTYTEXT_R", "Decedent's Residence - County", 28, Addr(AddressField::Residence, AddressKey::County)),
    left("STATETEXT_R", "Decedent's Residence - State name", 28, Unbound),
    left("COUNTRYTEXT_R", "Decedent's Residence - COUNTRY name", 28, Unbound),
    left("ADDRESS_R", "Long string address for decedent's place of residence", 50, Addr(AddressField::Residence, AddressKey::Line1)),
    left("RESSTATE", "Old NCHS residence state code", 2, Unbound),
    left("RESCON", "Old NCHS residence country code", 2, Unbound),
    blank("BLANK_1755", 53),
    left("DMIDDLE", "Decedent's middle name", 50, Text(TextField::MiddleName)),
    blank("BLANK_1858", 404),
    left("HOWINJ", "Describe How Injury Occurred", 250, Text(TextField::HowInjured)),
    left("TRANSPRT", "If Transportation Accident, Specify", 30, Coded(CodedField::TransportationRole, &mappings::TRANSPORTATION_ROLE)),
    left("COD1A", "Cause of Death Part I Line a", 120, Binding::CauseText(1)),
    left("INTERVAL1A", "Cause of Death Part I Interval, Line a", 20, Binding::CauseInterval(1)),
    left("COD1B", "Cause of Death Part I Line b", 120, Binding::CauseText(2)),
    left("INTERVAL1B", "Cause of Death Part I Interval, Line b", 20, Binding::CauseInterval(2)),
    left("COD1C", "Cause of Death Part I Line c", 120, Binding::CauseText(3)),
    left("INTERVAL1C", "Cause of Death Part I Interval, Line c", 20, Binding::CauseInterval(3)),
    left("COD1D", "Cause of Death Part I Line d", 120, Binding::CauseText(4)),
    left("INTERVAL1D", "Cause of Death Part I Interval, Line d", 20, Binding::CauseInterval(4)),
    left("OTHERCONDITION", "Cause of Death Part II", 240, Text(TextField::ContributingConditions)),
    left("DBPLACECITYCODE", "Place of Disposition - City code", 5, Addr(AddressField::DispositionLocation, AddressKey::CityCode)),
    left("DBPLACECITY", "Place of Disposition - City or Town name", 28, Addr(AddressField::DispositionLocation, AddressKey::City)),
    left("DETHNICE", "Hispanic Code", 3, Text(TextField::CodedRace(coded_race::HISPANIC_CODE))),
    left("DETHNIC5C", "Hispanic Code for Literal", 3, Text(TextField::CodedRace(coded_race::HISPANIC_CODE_FOR_LITERAL))),
    left("RACE1E", "First Edited Code", 3, Text(TextField::CodedRace(coded_race::EDITED[0]))),
    left("RACE2E", "Second Edited Code", 3, Text(TextField::CodedRace(coded_race::EDITED[1]))),
    left("RACE3E", "Third Edited Code", 3, Text(TextField::CodedRace(coded_race::EDITED[2]))),
    left("RACE4E", "Fourth Edited Code", 3, Text(TextField::CodedRace(coded_race::EDITED[3]))),
    left("RACE5E", "Fifth Edited Code", 3, Text(TextField::CodedRace(coded_race::EDITED[4]))),
    left("RACE6E", "Sixth Edited Code", 3, Text(TextField::CodedRace(coded_race::EDITED[5]))),
    left("RACE7E", "Seventh Edited Code", 3, Text(TextField::CodedRace(coded_race::EDITED[6]))),
    left("RACE8E", "Eighth Edited Code", 3, Text(TextField::CodedRace(coded_race::EDITED[7]))),
    left("RACE16C", "First American Indian Code", 3, Text(TextField::CodedRace(coded_race::FIRST_AMERICAN_INDIAN_CODE))),
    left("RACE17C", "Second American Indian Code", 3, Text(TextField::CodedRace(coded_race::SECOND_AMERICAN_INDIAN_CODE))),
    left("RACE18C", "First Other Asian Code", 3, Text(TextField::CodedRace(coded_race::FIRST_OTHER_ASIAN_CODE))),
    left("RACE19C", "Second Other Asian Code", 3, Text(TextField::CodedRace(coded_race::SECOND_OTHER_ASIAN_CODE))),
    left("RACE20C", "First Other Pacific Islander Code", 3, Text(TextField::CodedRace(coded_race::FIRST_OTHER_PACIFIC_ISLANDER_CODE))),
    left("RACE21C", "Second Other Pacific Islander Code", 3, Text(TextField::CodedRace(coded_race::SECOND_OTHER_PACIFIC_ISLANDER_CODE))),
    left("RACE22C", "First Other Race Code", 3, Text(TextField::CodedRace(coded_race::FIRST_OTHER_RACE_CODE))),
    left("RACE23C", "Second Other Race Code", 3, Text(TextField::CodedRace(coded_race::SECOND_OTHER_RACE_CODE))),
    left("RACEBRG", "Bridged Race", 2, Text(TextField::CodedRace(coded_race::BRIDGED_RACE))),
    blank("BLANK_3431", 1570),
];

/// The shared mortality registry, built on first use.
pub static MORTALITY: Lazy<FieldRegistry> = Lazy::new(|| {
    FieldRegistry::layout(
        RecordKind::Mortality,
        MORTALITY_WIDTH,
        ROWS.iter().map(|row| row.field),
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    fn one_based(code: &str) -> (usize, usize) {
        let field = MORTALITY.get(code).expect(code);
        (field.start + 1, field.end())
    }

    #[test]
    fn mortality_layout_is_valid() {
        MORTALITY.validate().expect("valid layout");
        assert_eq!(MORTALITY.total_width(), 5000);
        assert_eq!(MORTALITY.len(), ROWS.len());
    }

    #[test]
    fn key_offsets_match_the_published_layout() {
        for (code, expected) in [
            ("DOD_YR", (1, 4)),
            ("DSTATE", (5, 6)),
            ("FILENO", (7, 12)),
            ("AUXNO", (14, 25)),
            ("GNAME", (27, 76)),
            ("LNAME", (78, 127)),
            ("SEX", (189, 189)),
            ("SSN", (190, 198)),
            ("DOB_YR", (204, 207)),
            ("MANNER", (701, 701)),
            ("EAC", (715, 874)),
            ("RAC", (876, 975)),
            ("AUXNO2", (1025, 1036)),
            ("DINSTI", (1082, 1131)),
            ("STNUM_R", (1505, 1514)),
            ("DMIDDLE", (1808, 1857)),
            ("HOWINJ", (2262, 2511)),
            ("COD1A", (2542, 2661)),
            ("OTHERCONDITION", (3102, 3341)),
            ("DBPLACECITY", (3347, 3374)),
            ("DETHNICE", (3375, 3377)),
            ("RACEBRG", (3429, 3430)),
        ] {
            assert_eq!(one_based(code), expected, "{code}");
        }
    }

    #[test]
    fn only_the_certificate_number_is_zero_filled() {
        let zero_filled: Vec<_> = MORTALITY
            .fields()
            .iter()
            .filter(|f| f.justification == Justification::ZeroFilled)
            .map(|f| f.code)
            .collect();
        assert_eq!(zero_filled, vec!["FILENO"]);
    }
}
