//! The death record: an arena of resources plus the named slots that give them roles.

use crate::arena::{Arena, ArenaResource};
use crate::codes::{
    certification_concept, LocationRole, ObservationCode, ObservationList, Relationship,
};
use crate::views::ViewKind;
use crate::RecordResult;
use chrono::{SecondsFormat, Utc};
use fhir::urls::{
    CERTIFICATE_NUMBER, CERTIFIER, DEATH_CERTIFICATE, DEATH_CERTIFICATE_DOCUMENT,
    DEATH_CERTIFICATION, DECEDENT, LOINC, RECORD_ID_SYSTEM,
};
use fhir::{
    Bundle, BundleEntry, ChoiceValue, CodeableConcept, Coding, Composition, CompositionAttester,
    CompositionEvent, CompositionSection, Extension, Identifier, Location, Meta, Observation,
    Patient, Practitioner, Procedure, ProcedurePerformer, Reference, RelatedPerson, Resource,
};
use std::collections::HashMap;
use vital_uuid::ResourceId;

/// Whether a graph claims to be a complete record or a narrower projection of one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphKind {
    /// A complete death certificate document.
    Full,
    /// A collection narrower than a full record, optionally tagged with the view it came from.
    Partial(Option<ViewKind>),
}

/// Role assignments into the arena.
#[derive(Clone, Debug, Default)]
pub(crate) struct Slots {
    pub composition: Option<String>,
    pub decedent: Option<String>,
    pub certifier: Option<String>,
    pub certification: Option<String>,
    pub locations: HashMap<LocationRole, String>,
    pub relatives: HashMap<Relationship, String>,
    pub observations: HashMap<ObservationCode, String>,
    pub lists: HashMap<ObservationList, Vec<String>>,
}

/// A death record resource graph.
///
/// Entities live in an arena keyed by identity token and reference each other by
/// `urn:uuid:<id>`. Typed accessors (see the `accessors` module) read and write through named
/// slots; setters lazily create the entity that backs a field.
#[derive(Clone, Debug)]
pub struct DeathRecord {
    pub(crate) kind: GraphKind,
    pub(crate) bundle_id: String,
    pub(crate) timestamp: Option<String>,
    pub(crate) identifier: Identifier,
    pub(crate) arena: Arena,
    pub(crate) slots: Slots,
}

impl Default for DeathRecord {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn reference(id: &str) -> Reference {
    Reference::to(&vital_uuid::full_url(id))
}

pub(crate) fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn death_certificate_type() -> CodeableConcept {
    CodeableConcept::from_coding(Coding::new(LOINC, "64297-5", "Death certificate"))
}

impl DeathRecord {
    /// Builds the minimal skeleton of a full record.
    ///
    /// The decedent, certifier and certification procedure are created with fresh identity
    /// tokens, then cross-linked: the procedure's subject is the decedent and its performer the
    /// certifier; the composition's subject is the decedent, its attester the certifier and its
    /// event detail the certification.
    pub fn new() -> Self {
        let mut arena = Arena::default();

        let composition = arena.create(Composition::default());
        let decedent = arena.create(Patient {
            meta: Some(Meta::with_profile(DECEDENT)),
            ..Patient::default()
        });
        let certifier = arena.create(Practitioner {
            meta: Some(Meta::with_profile(CERTIFIER)),
            ..Practitioner::default()
        });
        let certification = arena.create(Procedure {
            meta: Some(Meta::with_profile(DEATH_CERTIFICATION)),
            status: Some("completed".into()),
            code: Some(certification_concept()),
            subject: Some(reference(&decedent)),
            performer: vec![ProcedurePerformer {
                function: None,
                actor: reference(&certifier),
            }],
            ..Procedure::default()
        });

        let timestamp = now();
        arena.edit::<Composition, _>(&composition, |c| {
            c.meta = Some(Meta::with_profile(DEATH_CERTIFICATE));
            c.status = Some("final".into());
            c.type_ = Some(death_certificate_type());
            c.subject = Some(reference(&decedent));
            c.date = Some(timestamp.clone());
            c.author = vec![reference(&certifier)];
            c.title = Some("Death Certificate".into());
            c.attester = vec![CompositionAttester {
                mode: "legal".into(),
                party: Some(reference(&certifier)),
            }];
            c.event = vec![CompositionEvent {
                code: vec![certification_concept()],
                detail: vec![reference(&certification)],
            }];
        });

        let slots = Slots {
            composition: Some(composition),
            decedent: Some(decedent),
            certifier: Some(certifier),
            certification: Some(certification),
            ..Slots::default()
        };

        let mut record = Self {
            kind: GraphKind::Full,
            bundle_id: ResourceId::new().to_string(),
            timestamp: Some(timestamp),
            identifier: Identifier {
                system: Some(RECORD_ID_SYSTEM.into()),
                ..Identifier::default()
            },
            arena,
            slots,
        };
        record.refresh_record_id();
        record
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    /// Bundle id of the record graph.
    pub fn id(&self) -> &str {
        &self.bundle_id
    }

    /// The top-level business identifier (record id plus certificate number and auxiliary ids).
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// `YYYYJJNNNNNN`: death year, jurisdiction, zero-padded certificate number.
    pub fn record_id(&self) -> Option<&str> {
        self.identifier.value.as_deref()
    }

    /// Number of resources in the graph.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    /// Re-derives the record identifier from death year, jurisdiction and certificate number.
    pub(crate) fn refresh_record_id(&mut self) {
        let year = self
            .date_of_death_year()
            .map(|y| right_most(&y.to_string(), 4))
            .unwrap_or_else(|| "0000".into());
        let jurisdiction: String = self
            .death_location_jurisdiction()
            .map(|j| j.chars().take(2).collect())
            .unwrap_or_else(|| "XX".into());
        let number = identifier_extension(&self.identifier, CERTIFICATE_NUMBER).unwrap_or_default();
        self.identifier.value = Some(format!("{year}{jurisdiction:X<2}{}", right_most(&number, 6)));
    }

    // ------------------------------------------------------------------
    // Slot reads
    // ------------------------------------------------------------------

    pub(crate) fn slot<T: ArenaResource>(&self, id: Option<&String>) -> Option<&T> {
        id.and_then(|id| self.arena.get::<T>(id))
    }

    pub fn decedent(&self) -> Option<&Patient> {
        self.slot(self.slots.decedent.as_ref())
    }

    pub fn certifier(&self) -> Option<&Practitioner> {
        self.slot(self.slots.certifier.as_ref())
    }

    pub fn certification(&self) -> Option<&Procedure> {
        self.slot(self.slots.certification.as_ref())
    }

    pub fn composition(&self) -> Option<&Composition> {
        self.slot(self.slots.composition.as_ref())
    }

    pub fn observation(&self, code: ObservationCode) -> Option<&Observation> {
        self.slot(self.slots.observations.get(&code))
    }

    pub fn location(&self, role: LocationRole) -> Option<&Location> {
        self.slot(self.slots.locations.get(&role))
    }

    pub fn relative(&self, relationship: Relationship) -> Option<&RelatedPerson> {
        self.slot(self.slots.relatives.get(&relationship))
    }

    /// Observations of a multi-valued list, in insertion order.
    pub fn observations(&self, list: ObservationList) -> Vec<&Observation> {
        self.slots
            .lists
            .get(&list)
            .map(|ids| ids.iter().filter_map(|id| self.arena.get(id)).collect())
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Lazy creation
    // ------------------------------------------------------------------

    fn subject(&self) -> Option<Reference> {
        self.slots.decedent.as_deref().map(reference)
    }

    pub(crate) fn ensure_decedent(&mut self) -> String {
        if let Some(id) = &self.slots.decedent {
            return id.clone();
        }
        let id = self.arena.create(Patient {
            meta: Some(Meta::with_profile(DECEDENT)),
            ..Patient::default()
        });
        self.slots.decedent = Some(id.clone());
        id
    }

    pub(crate) fn ensure_certifier(&mut self) -> String {
        if let Some(id) = &self.slots.certifier {
            return id.clone();
        }
        let id = self.arena.create(Practitioner {
            meta: Some(Meta::with_profile(CERTIFIER)),
            ..Practitioner::default()
        });
        self.slots.certifier = Some(id.clone());
        id
    }

    pub(crate) fn ensure_certification(&mut self) -> String {
        if let Some(id) = &self.slots.certification {
            return id.clone();
        }
        let certifier = self.ensure_certifier();
        let id = self.arena.create(Procedure {
            meta: Some(Meta::with_profile(DEATH_CERTIFICATION)),
            status: Some("completed".into()),
            code: Some(certification_concept()),
            subject: self.subject(),
            performer: vec![ProcedurePerformer {
                function: None,
                actor: reference(&certifier),
            }],
            ..Procedure::default()
        });
        self.slots.certification = Some(id.clone());
        id
    }

    pub(crate) fn ensure_composition(&mut self) -> String {
        if let Some(id) = &self.slots.composition {
            return id.clone();
        }
        let id = self.arena.create(Composition {
            meta: Some(Meta::with_profile(DEATH_CERTIFICATE)),
            status: Some("final".into()),
            type_: Some(death_certificate_type()),
            subject: self.subject(),
            date: Some(now()),
            ..Composition::default()
        });
        self.slots.composition = Some(id.clone());
        id
    }

    pub(crate) fn ensure_observation(&mut self, code: ObservationCode) -> String {
        if let Some(id) = self.slots.observations.get(&code) {
            return id.clone();
        }
        let id = self.arena.create(Observation {
            status: Some("final".into()),
            code: Some(code.concept()),
            subject: self.subject(),
            ..Observation::default()
        });
        self.slots.observations.insert(code, id.clone());
        id
    }

    pub(crate) fn ensure_location(&mut self, role: LocationRole) -> String {
        if let Some(id) = self.slots.locations.get(&role) {
            return id.clone();
        }
        let id = self.arena.create(Location {
            type_: vec![role.concept()],
            ..Location::default()
        });
        self.slots.locations.insert(role, id.clone());
        id
    }

    pub(crate) fn ensure_relative(&mut self, relationship: Relationship) -> String {
        if let Some(id) = self.slots.relatives.get(&relationship) {
            return id.clone();
        }
        let id = self.arena.create(RelatedPerson {
            patient: self.subject(),
            relationship: vec![relationship.concept()],
            ..RelatedPerson::default()
        });
        self.slots.relatives.insert(relationship, id.clone());
        id
    }

    // ------------------------------------------------------------------
    // Typed edits (create on demand)
    // ------------------------------------------------------------------

    pub(crate) fn edit_decedent<R>(&mut self, f: impl FnOnce(&mut Patient) -> R) -> Option<R> {
        let id = self.ensure_decedent();
        self.arena.edit(&id, f)
    }

    pub(crate) fn edit_certification<R>(
        &mut self,
        f: impl FnOnce(&mut Procedure) -> R,
    ) -> Option<R> {
        let id = self.ensure_certification();
        self.arena.edit(&id, f)
    }

    pub(crate) fn edit_composition<R>(
        &mut self,
        f: impl FnOnce(&mut Composition) -> R,
    ) -> Option<R> {
        let id = self.ensure_composition();
        self.arena.edit(&id, f)
    }

    pub(crate) fn edit_observation<R>(
        &mut self,
        code: ObservationCode,
        f: impl FnOnce(&mut Observation) -> R,
    ) -> Option<R> {
        let id = self.ensure_observation(code);
        self.arena.edit(&id, f)
    }

    pub(crate) fn edit_location<R>(
        &mut self,
        role: LocationRole,
        f: impl FnOnce(&mut Location) -> R,
    ) -> Option<R> {
        let id = self.ensure_location(role);
        self.arena.edit(&id, f)
    }

    pub(crate) fn edit_relative<R>(
        &mut self,
        relationship: Relationship,
        f: impl FnOnce(&mut RelatedPerson) -> R,
    ) -> Option<R> {
        let id = self.ensure_relative(relationship);
        self.arena.edit(&id, f)
    }

    /// Drops every observation of `list` and creates one per entry of `observations`.
    pub(crate) fn replace_list(&mut self, list: ObservationList, observations: Vec<Observation>) {
        for id in self.slots.lists.remove(&list).unwrap_or_default() {
            self.arena.remove(&id);
        }

        let subject = self.subject();
        let ids = observations
            .into_iter()
            .map(|mut obs| {
                obs.status = Some("final".into());
                obs.code = Some(list.concept());
                obs.subject = subject.clone();
                self.arena.create(obs)
            })
            .collect::<Vec<_>>();

        if !ids.is_empty() {
            self.slots.lists.insert(list, ids);
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Renders the graph as a bundle.
    ///
    /// A full record is a `document` whose composition section lists every other entity in
    /// arena order; partial graphs render as `collection`.
    pub fn to_bundle(&self) -> Bundle {
        let (type_, profile) = match self.kind {
            GraphKind::Full => ("document", Some(DEATH_CERTIFICATE_DOCUMENT)),
            GraphKind::Partial(view) => ("collection", view.map(ViewKind::profile)),
        };

        let section_refs: Vec<Reference> = self
            .arena
            .ids()
            .filter(|id| Some(*id) != self.slots.composition.as_deref())
            .map(reference)
            .collect();

        let entry = self
            .arena
            .ids()
            .filter_map(|id| self.arena.entry(id).map(|e| (id, e)))
            .map(|(id, entry)| {
                let resource = match &entry.resource {
                    Resource::Composition(c)
                        if self.kind == GraphKind::Full
                            && Some(id) == self.slots.composition.as_deref() =>
                    {
                        let mut composition = c.clone();
                        composition.section = vec![CompositionSection {
                            code: None,
                            entry: section_refs.clone(),
                        }];
                        Resource::Composition(composition)
                    }
                    other => other.clone(),
                };
                BundleEntry::new(Some(entry.full_url.clone()), resource)
            })
            .collect();

        Bundle {
            id: Some(self.bundle_id.clone()),
            meta: profile.map(Meta::with_profile),
            identifier: Some(self.identifier.clone()),
            type_: type_.into(),
            timestamp: self.timestamp.clone(),
            entry,
        }
    }

    /// Renders the graph as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> RecordResult<String> {
        Ok(self.to_bundle().to_json()?)
    }
}

/// Reads a string-valued extension off the business identifier.
/// Right-most `width` characters of `text`, zero-padded on the left.
fn right_most(text: &str, width: usize) -> String {
    let skip = text.chars().count().saturating_sub(width);
    let kept: String = text.chars().skip(skip).collect();
    format!("{kept:0>width$}")
}

pub(crate) fn identifier_extension(identifier: &Identifier, url: &str) -> Option<String> {
    Extension::find(&identifier.extension, url).and_then(|e| e.value.as_text())
}

pub(crate) fn set_identifier_extension(identifier: &mut Identifier, url: &str, value: Option<String>) {
    Extension::upsert(
        &mut identifier.extension,
        url,
        value.map(|v| Extension::new(url, ChoiceValue::string(&v))),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhir::urls::SNOMED;

    #[test]
    fn new_record_links_the_skeleton() {
        let record = DeathRecord::new();

        let decedent = record.slots.decedent.clone().expect("decedent");
        let certifier = record.slots.certifier.clone().expect("certifier");
        let certification = record.slots.certification.clone().expect("certification");

        let procedure = record.certification().expect("procedure");
        assert!(procedure
            .code
            .as_ref()
            .is_some_and(|c| c.has_code(SNOMED, "308646001")));
        assert_eq!(
            procedure.subject.as_ref().and_then(Reference::target_id),
            Some(decedent.as_str())
        );
        assert_eq!(procedure.performer[0].actor.target_id(), Some(certifier.as_str()));

        let composition = record.composition().expect("composition");
        assert_eq!(
            composition.subject.as_ref().and_then(Reference::target_id),
            Some(decedent.as_str())
        );
        assert_eq!(
            composition.attester[0].party.as_ref().and_then(Reference::target_id),
            Some(certifier.as_str())
        );
        assert_eq!(
            composition.event[0].detail[0].target_id(),
            Some(certification.as_str())
        );
    }

    #[test]
    fn new_record_has_default_identifier() {
        let record = DeathRecord::new();
        assert_eq!(record.record_id(), Some("0000XX000000"));
        assert_eq!(record.kind(), GraphKind::Full);
    }

    #[test]
    fn to_bundle_lists_every_entity_in_the_section() {
        let record = DeathRecord::new();
        let bundle = record.to_bundle();

        assert_eq!(bundle.type_, "document");
        assert_eq!(bundle.entry.len(), 4);
        let composition = match &bundle.entry[0].resource {
            Some(Resource::Composition(c)) => c,
            other => panic!("expected composition first, got {other:?}"),
        };
        assert_eq!(composition.section.len(), 1);
        assert_eq!(composition.section[0].entry.len(), 3);
        for entry in &bundle.entry {
            assert!(entry
                .full_url
                .as_deref()
                .is_some_and(|u| u.starts_with("urn:uuid:")));
        }
    }

    #[test]
    fn replace_list_rebuilds_the_whole_set() {
        let mut record = DeathRecord::new();
        record.replace_list(
            ObservationList::EntityAxis,
            vec![Observation::default(), Observation::default()],
        );
        let first: Vec<String> = record.slots.lists[&ObservationList::EntityAxis].clone();
        assert_eq!(record.len(), 6);

        record.replace_list(ObservationList::EntityAxis, vec![Observation::default()]);
        assert_eq!(record.len(), 5);
        for id in first {
            assert!(!record.arena.contains(&id));
        }

        record.replace_list(ObservationList::EntityAxis, Vec::new());
        assert!(record.observations(ObservationList::EntityAxis).is_empty());
        assert_eq!(record.len(), 4);
    }
}
