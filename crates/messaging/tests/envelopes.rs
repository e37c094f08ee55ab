use fhir::{Bundle, MessageHeader, Resource};
use vital_core::{
    CodedField, DateField, DeathRecord, EntityAxisEntry, PartialDate, TextField, ViewKind,
};
use vital_messaging::{BusinessIdentifiers, Envelope, MessageKind, MessagingError, Payload};

fn coded_record() -> DeathRecord {
    let mut record = DeathRecord::new();
    record.set_text(TextField::GivenName, Some("Ana")).expect("given");
    record.set_text(TextField::CertificateNumber, Some("900")).expect("number");
    record.set_text(TextField::Jurisdiction, Some("NJ")).expect("jurisdiction");
    record.set_text(TextField::StateAuxiliaryId1, Some("000000000042")).expect("aux");
    record.set_date(DateField::Death, &PartialDate::ymd(2023, 2, 14));
    record.set_coded(
        CodedField::AutomatedUnderlyingCause,
        Some(fhir::Coding::new(fhir::urls::ICD10, "I21.9", "")),
    );
    record.set_entity_axis_codes(vec![EntityAxisEntry {
        line: 1,
        position: 1,
        code: "I21.9".into(),
        e_code: false,
    }]);
    record
}

fn message_with_uri(uri: Option<&str>) -> Bundle {
    let mut bundle = Bundle::new("message");
    bundle.push(
        None,
        Resource::MessageHeader(MessageHeader {
            id: Some("m-1".into()),
            event_uri: uri.map(str::to_string),
            ..MessageHeader::default()
        }),
    );
    bundle
}

#[test]
fn unsupported_type_is_distinct_from_missing_header() {
    let unsupported = Envelope::classify(message_with_uri(Some("http://example.org/unknown")))
        .expect_err("unsupported");
    assert!(
        matches!(&unsupported, MessagingError::UnsupportedEventType(uri) if uri == "http://example.org/unknown")
    );
    assert!(!unsupported.is_transient());

    let missing = Envelope::classify(Bundle::new("message")).expect_err("missing");
    assert!(matches!(missing, MessagingError::HeaderMissing));
    assert!(missing.is_transient());

    let untyped = Envelope::classify(message_with_uri(None)).expect_err("untyped");
    assert!(matches!(untyped, MessagingError::EventTypeMissing));
}

#[test]
fn classification_is_deterministic() {
    for kind in MessageKind::ALL {
        let bundle = message_with_uri(Some(kind.event_uri()));
        for _ in 0..3 {
            let envelope = Envelope::classify(bundle.clone()).expect("classify");
            assert_eq!(envelope.kind(), kind);
            assert_eq!(envelope.id(), "m-1");
        }
    }
}

#[test]
fn coding_result_embeds_only_the_coded_content_view() {
    let record = coded_record();
    let envelope = Envelope::outbound(MessageKind::CauseOfDeathCoding, &record);

    let Payload::View(kind, view) = envelope.payload() else {
        panic!("expected a view payload, got {:?}", envelope.payload());
    };
    assert_eq!(*kind, ViewKind::CodedContent);
    assert_eq!(ViewKind::of_bundle(view), Some(ViewKind::CodedContent));
    assert_ne!(view.type_, "document");
    assert!(!view
        .resources()
        .any(|r| matches!(r, Resource::Patient(_) | Resource::Composition(_))));

    assert_eq!(envelope.identifiers(), &BusinessIdentifiers::from_record(&record));
    assert_eq!(envelope.identifiers().certificate_number, Some(900));
    assert_eq!(envelope.identifiers().jurisdiction_id.as_deref(), Some("NJ"));
    assert_eq!(envelope.identifiers().event_year, Some(2023));
    assert_eq!(
        envelope.identifiers().state_auxiliary_id.as_deref(),
        Some("000000000042")
    );
}

#[test]
fn coding_result_survives_the_wire() {
    let record = coded_record();
    let sent = Envelope::outbound(MessageKind::CauseOfDeathCoding, &record);
    let received = Envelope::parse_json(&sent.to_json().expect("json")).expect("classify");

    assert_eq!(received.kind(), MessageKind::CauseOfDeathCoding);
    assert_eq!(received.identifiers(), sent.identifiers());
    assert!(matches!(received.payload(), Payload::View(ViewKind::CodedContent, _)));

    let coded = received.record().expect("restore view");
    assert_eq!(coded.entity_axis(), record.entity_axis());
    assert_eq!(
        coded
            .coded(CodedField::AutomatedUnderlyingCause)
            .and_then(|c| c.code)
            .as_deref(),
        Some("I21.9")
    );
}

#[test]
fn malformed_input_is_wrapped_and_forwarded() {
    let inbound = Envelope::outbound(MessageKind::Submission, &coded_record());
    let mut broken = inbound.to_bundle();
    for entry in &mut broken.entry {
        if let Some(Resource::MessageHeader(header)) = &mut entry.resource {
            header.event_uri = Some("http://example.org/not-a-message".into());
        }
    }

    let failure = Envelope::classify(broken.clone()).expect_err("unsupported");
    let error = Envelope::extraction_error(&failure, Some(broken));

    assert_eq!(error.kind(), MessageKind::ExtractionError);
    assert_eq!(error.response_to(), Some(inbound.id()));
    assert_eq!(error.identifiers(), inbound.identifiers());

    let received = Envelope::classify(error.to_bundle()).expect("classify");
    let Payload::ExtractionError { issues, original } = received.payload() else {
        panic!("expected an extraction error payload");
    };
    assert_eq!(issues.len(), 1);
    assert!(issues[0]
        .diagnostics
        .as_deref()
        .is_some_and(|d| d.contains("not-a-message")));
    assert!(original.is_some());
}
