//! Message envelopes: a routing header, business identifiers and a typed payload.
//!
//! Wire form is a `message` bundle whose first entry is the `MessageHeader`, followed by a
//! `Parameters` resource holding the business identifiers (plus the block count, alias values
//! or status where the kind needs them) and then the payload resources. Envelopes are built once
//! and never mutated; responses and errors are new envelopes.

use crate::identifiers::BusinessIdentifiers;
use crate::{MessageKind, MessagingConfig, MessagingError, MessagingResult};
use chrono::{SecondsFormat, Utc};
use fhir::{
    Bundle, ChoiceValue, MessageDestination, MessageHeader, MessageResponse, MessageSource,
    OperationOutcome, OperationOutcomeIssue, Parameters, Reference, Resource,
};
use serde::Serialize;
use std::fmt::Display;
use vital_core::{DeathRecord, ViewKind};
use vital_uuid::ResourceId;

const BLOCK_COUNT: &str = "block_count";
const STATUS: &str = "status";

const ALIAS_GIVEN: &str = "alias_decedent_first_name";
const ALIAS_MIDDLE: &str = "alias_decedent_middle_name";
const ALIAS_FAMILY: &str = "alias_decedent_last_name";
const ALIAS_SUFFIX: &str = "alias_decedent_name_suffix";
const ALIAS_FATHER_SURNAME: &str = "alias_father_surname";
const ALIAS_SSN: &str = "alias_social_security_number";

/// Alternate identity details sent with an alias message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AliasData {
    pub given_name: Option<String>,
    pub middle_name: Option<String>,
    pub family_name: Option<String>,
    pub suffix: Option<String>,
    pub father_surname: Option<String>,
    pub ssn: Option<String>,
}

impl AliasData {
    fn fields(&self) -> [(&'static str, Option<&String>); 6] {
        [
            (ALIAS_GIVEN, self.given_name.as_ref()),
            (ALIAS_MIDDLE, self.middle_name.as_ref()),
            (ALIAS_FAMILY, self.family_name.as_ref()),
            (ALIAS_SUFFIX, self.suffix.as_ref()),
            (ALIAS_FATHER_SURNAME, self.father_surname.as_ref()),
            (ALIAS_SSN, self.ssn.as_ref()),
        ]
    }

    fn from_parameters(parameters: &Parameters) -> Self {
        let text = |name| parameters.get(name).and_then(|p| p.value.as_text());
        Self {
            given_name: text(ALIAS_GIVEN),
            middle_name: text(ALIAS_MIDDLE),
            family_name: text(ALIAS_FAMILY),
            suffix: text(ALIAS_SUFFIX),
            father_surname: text(ALIAS_FATHER_SURNAME),
            ssn: text(ALIAS_SSN),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Identifiers only.
    None,
    /// A full death record.
    Record(Bundle),
    /// One coded-content sub-graph.
    View(ViewKind, Bundle),
    /// Voids `block_count` consecutive certificate numbers starting at the envelope's.
    Void { block_count: u32 },
    Alias(AliasData),
    Status(String),
    /// A failure description plus the payload that caused it, when there was one.
    ExtractionError {
        issues: Vec<OperationOutcomeIssue>,
        original: Option<Bundle>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    kind: MessageKind,
    id: String,
    timestamp: Option<String>,
    source: Option<String>,
    destinations: Vec<String>,
    identifiers: BusinessIdentifiers,
    response_to: Option<String>,
    payload: Payload,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn first<'a, T>(bundle: &'a Bundle, pick: impl Fn(&'a Resource) -> Option<&'a T>) -> Option<&'a T> {
    bundle.resources().find_map(pick)
}

impl Envelope {
    fn build(kind: MessageKind, identifiers: BusinessIdentifiers, payload: Payload) -> Self {
        let config = MessagingConfig::default();
        Self {
            kind,
            id: ResourceId::new().to_string(),
            timestamp: Some(now()),
            source: Some(config.source_endpoint().to_string()),
            destinations: vec![config.destination_endpoint().to_string()],
            identifiers,
            response_to: None,
            payload,
        }
    }

    // ------------------------------------------------------------------
    // Classification
    // ------------------------------------------------------------------

    /// Classifies a message bundle by the event URI of its header and extracts its payload.
    ///
    /// # Errors
    ///
    /// - [`MessagingError::HeaderMissing`] if no entry is a `MessageHeader`.
    /// - [`MessagingError::EventTypeMissing`] if the header has no `eventUri`.
    /// - [`MessagingError::UnsupportedEventType`] if the URI names no known kind.
    pub fn classify(bundle: Bundle) -> MessagingResult<Self> {
        let header = first(&bundle, |r| match r {
            Resource::MessageHeader(h) => Some(h),
            _ => None,
        })
        .ok_or(MessagingError::HeaderMissing)?;

        let uri = header
            .event_uri
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(MessagingError::EventTypeMissing)?;
        let kind = MessageKind::from_event_uri(uri)
            .ok_or_else(|| MessagingError::UnsupportedEventType(uri.to_string()))?;

        let parameters = first(&bundle, |r| match r {
            Resource::Parameters(p) => Some(p),
            _ => None,
        })
        .cloned()
        .unwrap_or_default();
        let embedded = first(&bundle, |r| match r {
            Resource::Bundle(b) => Some(&**b),
            _ => None,
        })
        .cloned();

        let payload = if kind.carries_record() {
            embedded.map_or(Payload::None, Payload::Record)
        } else if let Some(view) = kind.view() {
            embedded.map_or(Payload::None, |b| {
                Payload::View(ViewKind::of_bundle(&b).unwrap_or(view), b)
            })
        } else {
            match kind {
                MessageKind::Void => Payload::Void {
                    block_count: parameters
                        .get(BLOCK_COUNT)
                        .and_then(|p| p.value.value_unsigned_int)
                        .unwrap_or(1),
                },
                MessageKind::Alias => Payload::Alias(AliasData::from_parameters(&parameters)),
                MessageKind::Status => Payload::Status(
                    parameters
                        .get(STATUS)
                        .and_then(|p| p.value.as_text())
                        .unwrap_or_default(),
                ),
                MessageKind::ExtractionError => Payload::ExtractionError {
                    issues: first(&bundle, |r| match r {
                        Resource::OperationOutcome(o) => Some(o),
                        _ => None,
                    })
                    .map(|o| o.issue.clone())
                    .unwrap_or_default(),
                    original: embedded,
                },
                _ => Payload::None,
            }
        };

        let id = header
            .id
            .clone()
            .or_else(|| bundle.id.clone())
            .unwrap_or_else(|| ResourceId::new().to_string());
        tracing::debug!(%kind, %id, "classified message");

        Ok(Self {
            kind,
            id,
            timestamp: bundle.timestamp.clone(),
            source: header.source.as_ref().map(|s| s.endpoint.clone()),
            destinations: header.destination.iter().map(|d| d.endpoint.clone()).collect(),
            identifiers: BusinessIdentifiers::from_parameters(&parameters),
            response_to: header.response.as_ref().map(|r| r.identifier.clone()),
            payload,
        })
    }

    /// Parses and classifies a JSON message bundle.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::Fhir`] if the text is not a bundle, otherwise as
    /// [`Envelope::classify`].
    pub fn parse_json(text: &str) -> MessagingResult<Self> {
        Self::classify(Bundle::parse_json(text)?)
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Builds an outbound message of `kind` for a record.
    ///
    /// Submission and update embed the full record, coding kinds embed their coded-content view,
    /// everything else carries identifiers only.
    pub fn outbound(kind: MessageKind, record: &DeathRecord) -> Self {
        let payload = if kind.carries_record() {
            Payload::Record(record.to_bundle())
        } else if let Some(view) = kind.view() {
            Payload::View(view, record.view(view))
        } else if kind == MessageKind::Void {
            Payload::Void { block_count: 1 }
        } else {
            Payload::None
        };
        Self::build(kind, BusinessIdentifiers::from_record(record), payload)
    }

    pub fn void(identifiers: BusinessIdentifiers, block_count: u32) -> Self {
        Self::build(MessageKind::Void, identifiers, Payload::Void { block_count })
    }

    pub fn alias(record: &DeathRecord, alias: AliasData) -> Self {
        Self::build(
            MessageKind::Alias,
            BusinessIdentifiers::from_record(record),
            Payload::Alias(alias),
        )
    }

    /// A status update about an inbound message.
    pub fn status(inbound: &Envelope, status: &str) -> Self {
        let mut envelope = Self::respond_to(inbound, MessageKind::Status);
        envelope.payload = Payload::Status(status.to_string());
        envelope
    }

    /// A response correlated to `inbound` by its id, with the same business identifiers.
    ///
    /// Routing is reversed: the response goes back to the inbound source.
    pub fn respond_to(inbound: &Envelope, kind: MessageKind) -> Self {
        let mut envelope = Self::build(kind, inbound.identifiers.clone(), Payload::None);
        envelope.response_to = Some(inbound.id.clone());
        if let Some(source) = &inbound.source {
            envelope.destinations = vec![source.clone()];
        }
        if let Some(destination) = inbound.destinations.first() {
            envelope.source = Some(destination.clone());
        }
        envelope
    }

    pub fn acknowledge(inbound: &Envelope) -> Self {
        Self::respond_to(inbound, MessageKind::Acknowledgement)
    }

    /// Wraps a classification or restoration failure for forwarding.
    ///
    /// When the offending payload is itself a message, its header id and identifiers are carried
    /// over so the sender can correlate the error.
    pub fn extraction_error(failure: &(impl Display + ?Sized), original: Option<Bundle>) -> Self {
        let (response_to, identifiers) = original
            .as_ref()
            .map(|bundle| {
                let header_id = first(bundle, |r| match r {
                    Resource::MessageHeader(h) => h.id.as_ref(),
                    _ => None,
                })
                .cloned();
                let identifiers = first(bundle, |r| match r {
                    Resource::Parameters(p) => Some(p),
                    _ => None,
                })
                .map(BusinessIdentifiers::from_parameters)
                .unwrap_or_default();
                (header_id, identifiers)
            })
            .unwrap_or_default();

        let issue = OperationOutcomeIssue {
            severity: "error".into(),
            code: "invalid".into(),
            diagnostics: Some(failure.to_string()),
        };
        let mut envelope = Self::build(
            MessageKind::ExtractionError,
            identifiers,
            Payload::ExtractionError {
                issues: vec![issue],
                original,
            },
        );
        envelope.response_to = response_to;
        envelope
    }

    /// Routes through the configured endpoints.
    pub fn with_config(mut self, config: &MessagingConfig) -> Self {
        self.source = Some(config.source_endpoint().to_string());
        self.destinations = vec![config.destination_endpoint().to_string()];
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn identifiers(&self) -> &BusinessIdentifiers {
        &self.identifiers
    }

    pub fn response_to(&self) -> Option<&str> {
        self.response_to.as_deref()
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Restores the embedded record or view.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::NoRecordPayload`] for kinds without one, or a
    /// [`MessagingError::Record`] if the payload does not restore.
    pub fn record(&self) -> MessagingResult<DeathRecord> {
        match &self.payload {
            Payload::Record(bundle) | Payload::View(_, bundle) => {
                Ok(DeathRecord::from_bundle(bundle.clone())?)
            }
            _ => Err(MessagingError::NoRecordPayload(self.kind)),
        }
    }

    // ------------------------------------------------------------------
    // Wire form
    // ------------------------------------------------------------------

    pub fn to_bundle(&self) -> Bundle {
        let mut parameters = Parameters {
            id: Some(ResourceId::new().to_string()),
            ..Parameters::default()
        };
        self.identifiers.write(&mut parameters);

        let mut payload: Vec<Resource> = Vec::new();
        match &self.payload {
            Payload::None => {}
            Payload::Record(bundle) | Payload::View(_, bundle) => {
                payload.push(Resource::Bundle(Box::new(bundle.clone())));
            }
            Payload::Void { block_count } => {
                parameters.push(BLOCK_COUNT, ChoiceValue::unsigned_int(*block_count));
            }
            Payload::Alias(alias) => {
                for (name, value) in alias.fields() {
                    if let Some(value) = value {
                        parameters.push(name, ChoiceValue::string(value));
                    }
                }
            }
            Payload::Status(status) => parameters.push(STATUS, ChoiceValue::string(status)),
            Payload::ExtractionError { issues, original } => {
                payload.push(Resource::OperationOutcome(OperationOutcome {
                    id: Some(ResourceId::new().to_string()),
                    issue: issues.clone(),
                }));
                if let Some(bundle) = original {
                    payload.push(Resource::Bundle(Box::new(bundle.clone())));
                }
            }
        }

        let mut focus = Vec::new();
        let mut entries = Vec::new();
        let parameters_id = parameters.id.clone().unwrap_or_default();
        entries.push((parameters_id, Resource::Parameters(parameters)));
        for resource in payload {
            let id = resource
                .id()
                .map(str::to_string)
                .unwrap_or_else(|| ResourceId::new().to_string());
            entries.push((id, resource));
        }
        for (id, _) in &entries {
            focus.push(Reference::to(&vital_uuid::full_url(id)));
        }

        let response_code = match self.kind {
            MessageKind::ExtractionError => "fatal-error",
            _ => "ok",
        };
        let header = MessageHeader {
            id: Some(self.id.clone()),
            event_uri: Some(self.kind.event_uri().to_string()),
            destination: self
                .destinations
                .iter()
                .map(|endpoint| MessageDestination {
                    endpoint: endpoint.clone(),
                })
                .collect(),
            source: self.source.as_ref().map(|endpoint| MessageSource {
                endpoint: endpoint.clone(),
            }),
            focus,
            response: self.response_to.as_ref().map(|identifier| MessageResponse {
                identifier: identifier.clone(),
                code: response_code.to_string(),
            }),
        };

        let mut bundle = Bundle::new("message");
        bundle.id = Some(ResourceId::new().to_string());
        bundle.timestamp = self.timestamp.clone();
        bundle.push(
            Some(vital_uuid::full_url(&self.id)),
            Resource::MessageHeader(header),
        );
        for (id, resource) in entries {
            bundle.push(Some(vital_uuid::full_url(&id)), resource);
        }
        bundle
    }

    /// # Errors
    ///
    /// Returns [`MessagingError::Fhir`] if serialisation fails.
    pub fn to_json(&self) -> MessagingResult<String> {
        Ok(self.to_bundle().to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vital_core::{DateField, PartialDate, TextField};

    fn record() -> DeathRecord {
        let mut record = DeathRecord::new();
        record.set_text(TextField::CertificateNumber, Some("1234")).expect("number");
        record.set_text(TextField::Jurisdiction, Some("TX")).expect("jurisdiction");
        record.set_date(DateField::Death, &PartialDate::ymd(2021, 6, 1));
        record
    }

    #[test]
    fn submission_round_trips_through_json() {
        let sent = Envelope::outbound(MessageKind::Submission, &record());
        let json = sent.to_json().expect("json");
        let received = Envelope::parse_json(&json).expect("classify");

        assert_eq!(received.kind(), MessageKind::Submission);
        assert_eq!(received.id(), sent.id());
        assert_eq!(received.identifiers(), sent.identifiers());
        assert!(matches!(received.payload(), Payload::Record(_)));

        let restored = received.record().expect("record");
        assert_eq!(restored.certificate_number().as_deref(), Some("1234"));
    }

    #[test]
    fn missing_header_and_missing_type_are_transient() {
        let no_header = Envelope::classify(Bundle::new("message")).expect_err("no header");
        assert!(matches!(no_header, MessagingError::HeaderMissing));
        assert!(no_header.is_transient());

        let mut bundle = Bundle::new("message");
        bundle.push(None, Resource::MessageHeader(MessageHeader::default()));
        let no_type = Envelope::classify(bundle).expect_err("no type");
        assert!(matches!(no_type, MessagingError::EventTypeMissing));
        assert!(no_type.is_transient());
    }

    #[test]
    fn acknowledgement_points_back_at_the_inbound_message() {
        let inbound = Envelope::outbound(MessageKind::Submission, &record());
        let ack = Envelope::acknowledge(&inbound);

        assert_eq!(ack.kind(), MessageKind::Acknowledgement);
        assert_eq!(ack.response_to(), Some(inbound.id()));
        assert_eq!(ack.identifiers(), inbound.identifiers());
        assert_eq!(ack.destinations(), [inbound.source().unwrap_or_default().to_string()]);
        assert!(matches!(ack.payload(), Payload::None));

        let back = Envelope::classify(ack.to_bundle()).expect("classify");
        assert_eq!(back.response_to(), Some(inbound.id()));
    }

    #[test]
    fn void_alias_and_status_carry_their_parameters() {
        let ids = BusinessIdentifiers::from_record(&record());

        let void = Envelope::classify(Envelope::void(ids.clone(), 5).to_bundle()).expect("void");
        assert_eq!(void.payload(), &Payload::Void { block_count: 5 });
        assert_eq!(void.identifiers(), &ids);

        let alias = AliasData {
            given_name: Some("Jon".into()),
            ssn: Some("111223333".into()),
            ..AliasData::default()
        };
        let sent = Envelope::alias(&record(), alias.clone());
        let received = Envelope::classify(sent.to_bundle()).expect("alias");
        assert_eq!(received.payload(), &Payload::Alias(alias));

        let status = Envelope::status(&sent, "manualCauseOfDeathCoding");
        let received = Envelope::classify(status.to_bundle()).expect("status");
        assert_eq!(received.payload(), &Payload::Status("manualCauseOfDeathCoding".into()));
        assert_eq!(received.response_to(), Some(sent.id()));
    }

    #[test]
    fn identifier_only_kinds_have_no_record() {
        let ack = Envelope::outbound(MessageKind::Acknowledgement, &record());
        assert!(matches!(
            ack.record(),
            Err(MessagingError::NoRecordPayload(MessageKind::Acknowledgement))
        ));
    }

    #[test]
    fn configured_endpoints_are_used() {
        let config = MessagingConfig::new("http://state.example", "http://nchs.example").expect("config");
        let envelope = Envelope::outbound(MessageKind::Update, &record()).with_config(&config);
        let back = Envelope::classify(envelope.to_bundle()).expect("classify");
        assert_eq!(back.source(), Some("http://state.example"));
        assert_eq!(back.destinations(), ["http://nchs.example".to_string()]);
    }
}
