use vital_core::{
    AddressField, AddressKey, CodedField, DateField, DeathRecord, FlagField, GeoFlag, PartialDate,
    TextField, Tristate,
};
use vital_ije::mappings;
use vital_ije::{registry, FieldValues, IjeCodec, IjeError, RecordKind, MORTALITY_WIDTH};

fn slot<'a>(line: &'a str, code: &str) -> &'a str {
    let field = registry(RecordKind::Mortality)
        .expect("mortality")
        .get(code)
        .expect(code);
    &line[field.start..field.end()]
}

const FLAG_FIELDS: &[&str] = &[
    "AUTOP", "AUTOPF", "WORKINJ", "ARMEDF", "SPOUSELV", "DETHNIC1", "DETHNIC2", "DETHNIC3",
    "DETHNIC4", "RACE1", "RACE2", "RACE3", "RACE4", "RACE5", "RACE6", "RACE7", "RACE8", "RACE9",
    "RACE10", "RACE11", "RACE12", "RACE13", "RACE14", "RACE15",
];

const FLAGS: &[FlagField] = &[
    FlagField::Autopsy,
    FlagField::AutopsyResultsAvailable,
    FlagField::InjuryAtWork,
    FlagField::MilitaryService,
    FlagField::SpouseAlive,
];

#[test]
fn overlong_numeric_is_reported_once_and_truncated() {
    let mut record = DeathRecord::new();
    record.set_date(
        DateField::Birth,
        &PartialDate {
            year: Tristate::Known(12345),
            month: Tristate::Known(2),
            day: Tristate::Known(14),
            time: Tristate::Absent,
        },
    );

    let mut codec = IjeCodec::mortality();
    let line = codec.record_to_ije(&record).expect("encode");

    let issues = codec.issues();
    assert_eq!(issues.len(), 1, "{issues:?}");
    assert_eq!(issues[0].code, "DOB_YR");
    assert_eq!(issues[0].name, "Date of Birth--Year");
    assert_eq!(slot(&line, "DOB_YR"), "1234");
    assert_eq!(slot(&line, "DOB_MO"), "02");
    assert_eq!(line.chars().count(), MORTALITY_WIDTH);
}

#[test]
fn blank_line_keeps_flags_unset_and_reencodes_blank() {
    let blank = " ".repeat(MORTALITY_WIDTH);
    let mut codec = IjeCodec::mortality();

    let values = codec.decode(&blank).expect("decode");
    assert!(values.is_empty());

    let record = codec.values_to_record(&values).expect("record");
    for flag in FLAGS {
        assert!(!record.flag(*flag).is_known(), "{flag:?}");
    }
    assert_eq!(record.residence_within_city_limits(), GeoFlag::Absent);

    let line = codec.record_to_ije(&record).expect("encode");
    for code in FLAG_FIELDS {
        assert!(slot(&line, code).trim().is_empty(), "{code}");
    }
    assert_eq!(slot(&line, "LIMITS"), " ");

    let mut expected = blank.clone();
    expected.replace_range(6..12, "000000");
    assert_eq!(line, expected);
    assert!(codec.issues().is_empty());
}

#[test]
fn every_encode_is_exactly_the_record_width() {
    let mut codec = IjeCodec::mortality();
    let everything: FieldValues = registry(RecordKind::Mortality)
        .expect("mortality")
        .fields()
        .iter()
        .map(|f| (f.code, "X".repeat(f.width + 3)))
        .collect();

    for values in [FieldValues::new(), everything] {
        assert_eq!(codec.encode(&values).chars().count(), MORTALITY_WIDTH);
    }
}

#[test]
fn registry_is_valid_and_natality_is_not_shipped() {
    let mortality = registry(RecordKind::Mortality).expect("mortality");
    mortality.validate().expect("valid");
    assert_eq!(mortality.total_width(), MORTALITY_WIDTH);
    assert!(matches!(
        registry(RecordKind::Natality),
        Err(IjeError::UnsupportedKind(RecordKind::Natality))
    ));
}

#[test]
fn text_and_flag_values_survive_encode_then_decode() {
    let values: FieldValues = [
        ("GNAME", "Madelyn"),
        ("LNAME", "Patel"),
        ("AUTOP", "N"),
        ("AUTOPF", "U"),
        ("DETHNIC1", "H"),
        ("COD1A", "Pulmonary embolism"),
        ("FILENO", "42"),
    ]
    .into_iter()
    .collect();

    let mut codec = IjeCodec::mortality();
    let line = codec.encode(&values);
    assert_eq!(codec.decode(&line).expect("decode"), values);
}

#[test]
fn full_record_survives_ije() {
    let mut record = DeathRecord::new();
    record.set_text(TextField::GivenName, Some("Madelyn")).expect("given");
    record.set_text(TextField::FamilyName, Some("Patel")).expect("family");
    record.set_text(TextField::CertificateNumber, Some("7")).expect("certificate");
    record.set_text(TextField::Jurisdiction, Some("YC")).expect("jurisdiction");
    record.set_text(TextField::Ssn, Some("987654321")).expect("ssn");
    record.set_date(DateField::Death, &PartialDate::ymd(2020, 11, 12));
    record.set_date(
        DateField::Birth,
        &PartialDate {
            year: Tristate::Known(1940),
            month: Tristate::Unknown,
            day: Tristate::Unknown,
            time: Tristate::Absent,
        },
    );
    record.set_coded(CodedField::MannerOfDeath, mappings::MANNER_OF_DEATH.to_coding("N"));
    record.set_coded(CodedField::Education, mappings::EDUCATION.to_coding("9"));
    record.set_flag(FlagField::MilitaryService, Tristate::Known(false));
    record.set_address(AddressField::Residence, AddressKey::City, Some("Salem"));
    record.set_address(AddressField::Residence, AddressKey::State, Some("MA"));
    record.set_residence_within_city_limits(GeoFlag::No);

    let mut codec = IjeCodec::mortality();
    let line = codec.record_to_ije(&record).expect("encode");
    assert_eq!(slot(&line, "DOB_MO"), "99");
    let restored = codec.ije_to_record(&line).expect("decode");
    assert!(codec.issues().is_empty(), "{:?}", codec.issues());

    for field in [
        TextField::GivenName,
        TextField::FamilyName,
        TextField::CertificateNumber,
        TextField::Jurisdiction,
        TextField::Ssn,
    ] {
        assert_eq!(restored.text(field), record.text(field), "{field:?}");
    }
    for field in [DateField::Death, DateField::Birth] {
        assert_eq!(restored.date(field), record.date(field), "{field:?}");
    }
    for field in [CodedField::MannerOfDeath, CodedField::Education] {
        assert_eq!(
            restored.coded(field).and_then(|c| c.code),
            record.coded(field).and_then(|c| c.code),
            "{field:?}"
        );
    }
    assert_eq!(restored.flag(FlagField::MilitaryService), Tristate::Known(false));
    assert_eq!(
        restored.address(AddressField::Residence, AddressKey::City).as_deref(),
        Some("Salem")
    );
    assert_eq!(restored.residence_within_city_limits(), GeoFlag::No);
    assert_eq!(restored.certificate_number().as_deref(), Some("7"));
}

#[test]
fn issues_serialize_for_reporting() {
    let values: FieldValues = [("SEX", "Q")].into_iter().collect();
    let mut codec = IjeCodec::mortality();
    codec.values_to_record(&values).expect("record");

    let json = serde_json::to_value(codec.take_issues()).expect("json");
    assert_eq!(json[0]["code"], "SEX");
    assert_eq!(json[0]["name"], "Sex");
    assert!(codec.issues().is_empty());
}
