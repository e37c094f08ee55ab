//! Restoring a [`DeathRecord`] from a serialized bundle.
//!
//! Restoration is a single linear scan over the bundle entries. Every resource is kept in the
//! arena (so unknown resources survive a round trip) and the recognised ones are assigned to
//! named slots by a type and code discriminator.

use crate::arena::Arena;
use crate::codes::{
    LocationRole, ObservationRole, Relationship, DEATH_CERTIFICATION_CODE,
};
use crate::record::{DeathRecord, GraphKind, Slots};
use crate::views::ViewKind;
use crate::{RecordError, RecordResult};
use fhir::urls::{DEATH_CERTIFICATE_DOCUMENT, RECORD_ID_SYSTEM, SNOMED};
use fhir::{Bundle, Composition, Identifier, Patient, Practitioner, Procedure, Reference, Resource};
use vital_uuid::ResourceId;

fn graph_kind(bundle: &Bundle) -> GraphKind {
    let document_profile = bundle
        .meta
        .as_ref()
        .is_some_and(|m| m.has_profile(DEATH_CERTIFICATE_DOCUMENT));
    if bundle.type_ == "document" || document_profile {
        GraphKind::Full
    } else {
        GraphKind::Partial(ViewKind::of_bundle(bundle))
    }
}

/// Gives a resource an id when it arrives without one.
fn ensure_id(resource: &mut Resource) -> String {
    if let Some(id) = resource.id() {
        return id.to_string();
    }
    let id = ResourceId::new().to_string();
    match resource {
        Resource::Composition(r) => r.id = Some(id.clone()),
        Resource::Location(r) => r.id = Some(id.clone()),
        Resource::Observation(r) => r.id = Some(id.clone()),
        Resource::Patient(r) => r.id = Some(id.clone()),
        Resource::Practitioner(r) => r.id = Some(id.clone()),
        Resource::Procedure(r) => r.id = Some(id.clone()),
        Resource::RelatedPerson(r) => r.id = Some(id.clone()),
        _ => {}
    }
    id
}

/// First reference among `candidates` that names an arena entity of type `T`.
fn resolve<'a, T: crate::arena::ArenaResource>(
    arena: &Arena,
    candidates: impl IntoIterator<Item = Option<&'a Reference>>,
) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .filter_map(Reference::target_id)
        .find(|id| arena.get::<T>(id).is_some())
        .map(str::to_string)
}

/// Re-points the decedent and certifier slots at the entities the certification act and the
/// composition reference. First-seen assignment stands when nothing references a candidate.
fn follow_references(arena: &Arena, slots: &mut Slots) {
    let procedure = slots
        .certification
        .as_deref()
        .and_then(|id| arena.get::<Procedure>(id));
    let composition = slots
        .composition
        .as_deref()
        .and_then(|id| arena.get::<Composition>(id));

    let performers = procedure
        .into_iter()
        .flat_map(|p| p.performer.iter().map(|f| Some(&f.actor)));
    let attesters = composition
        .into_iter()
        .flat_map(|c| c.attester.iter().map(|a| a.party.as_ref()));
    if let Some(certifier) = resolve::<Practitioner>(arena, performers.chain(attesters)) {
        if slots.certifier.as_deref() != Some(certifier.as_str()) {
            tracing::debug!(id = %certifier, "certifier resolved through reference");
        }
        slots.certifier = Some(certifier);
    }

    let subjects = [
        composition.and_then(|c| c.subject.as_ref()),
        procedure.and_then(|p| p.subject.as_ref()),
    ];
    if let Some(decedent) = resolve::<Patient>(arena, subjects) {
        slots.decedent = Some(decedent);
    }
}

impl DeathRecord {
    /// Restores a record from a bundle.
    ///
    /// # Errors
    ///
    /// - [`RecordError::MissingObservationCode`] if an observation carries no code.
    /// - [`RecordError::DuplicateSubject`] if more than one decedent is present.
    /// - [`RecordError::Structural`] if a full record lacks its composition, decedent or
    ///   certification. Partial graphs tolerate these gaps.
    pub fn from_bundle(bundle: Bundle) -> RecordResult<Self> {
        let kind = graph_kind(&bundle);
        let mut arena = Arena::default();
        let mut slots = Slots::default();

        for entry in bundle.entry {
            let Some(mut resource) = entry.resource else {
                continue;
            };
            let id = ensure_id(&mut resource);

            match &resource {
                Resource::Composition(_) => {
                    slots.composition.get_or_insert_with(|| id.clone());
                }
                Resource::Patient(_) => {
                    if let Some(first) = &slots.decedent {
                        return Err(RecordError::DuplicateSubject {
                            first: first.clone(),
                            second: id,
                        });
                    }
                    slots.decedent = Some(id.clone());
                }
                Resource::Practitioner(_) => {
                    slots.certifier.get_or_insert_with(|| id.clone());
                }
                Resource::Procedure(p) => {
                    let certifies = p
                        .code
                        .as_ref()
                        .is_some_and(|c| c.has_code(SNOMED, DEATH_CERTIFICATION_CODE));
                    if certifies {
                        slots.certification.get_or_insert_with(|| id.clone());
                    } else {
                        tracing::debug!(id = %id, "skipping procedure with unrecognised code");
                    }
                }
                Resource::RelatedPerson(r) => match Relationship::from_concepts(&r.relationship) {
                    Some(rel) => {
                        slots.relatives.entry(rel).or_insert_with(|| id.clone());
                    }
                    None => tracing::debug!(id = %id, "skipping related person with unknown relationship"),
                },
                Resource::Location(l) => match LocationRole::from_concepts(&l.type_) {
                    Some(role) => {
                        slots.locations.entry(role).or_insert_with(|| id.clone());
                    }
                    None => tracing::debug!(id = %id, "skipping location with unknown type"),
                },
                Resource::Observation(o) => {
                    let Some(code) = o.code.as_ref().filter(|c| !c.coding.is_empty()) else {
                        return Err(RecordError::MissingObservationCode { id });
                    };
                    match ObservationRole::from_concept(code) {
                        Some(ObservationRole::Single(code)) => {
                            if slots.observations.contains_key(&code) {
                                tracing::warn!(id = %id, ?code, "duplicate observation ignored for slot");
                            } else {
                                slots.observations.insert(code, id.clone());
                            }
                        }
                        Some(ObservationRole::List(list)) => {
                            slots.lists.entry(list).or_default().push(id.clone());
                        }
                        None => tracing::debug!(id = %id, "skipping observation with unknown code"),
                    }
                }
                other => {
                    tracing::debug!(id = %id, resource_type = other.resource_type(), "keeping unrecognised resource");
                }
            }

            let full_url = entry.full_url.unwrap_or_else(|| vital_uuid::full_url(&id));
            arena.insert(id, full_url, resource);
        }

        follow_references(&arena, &mut slots);

        if kind == GraphKind::Full {
            if slots.composition.is_none() {
                return Err(RecordError::structural("a Composition in a full death record"));
            }
            if slots.decedent.is_none() {
                return Err(RecordError::structural("a decedent Patient in a full death record"));
            }
            if slots.certification.is_none() {
                return Err(RecordError::structural(
                    "a death certification Procedure in a full death record",
                ));
            }
        }

        let identifier = bundle.identifier.unwrap_or_else(|| Identifier {
            system: Some(RECORD_ID_SYSTEM.into()),
            ..Identifier::default()
        });

        tracing::debug!(entities = arena.len(), ?kind, "restored death record");

        Ok(Self {
            kind,
            bundle_id: bundle.id.unwrap_or_else(|| ResourceId::new().to_string()),
            timestamp: bundle.timestamp,
            identifier,
            arena,
            slots,
        })
    }

    /// Parses and restores a record from bundle JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Fhir`] for malformed JSON or a non-bundle resource, and otherwise
    /// the errors of [`DeathRecord::from_bundle`].
    pub fn from_json(json: &str) -> RecordResult<Self> {
        Self::from_bundle(Bundle::parse_json(json)?)
    }
}
