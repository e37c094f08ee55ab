//! Derived sub-graph views of a death record.
//!
//! Each view is a fresh `collection` bundle tagged with its own profile. It carries a copy of the
//! parent's business identifier and only the entities of that view that are present; nothing is
//! inserted as a placeholder. Views are derived on demand and never cached.

use crate::codes::{LocationRole, ObservationCode, ObservationList, Relationship};
use crate::record::{now, DeathRecord};
use fhir::urls::{
    CAUSE_OF_DEATH_CODED_CONTENT_BUNDLE, DEMOGRAPHIC_CODED_CONTENT_BUNDLE,
    INDUSTRY_OCCUPATION_CODED_CONTENT_BUNDLE, MORTALITY_ROSTER_BUNDLE,
};
use fhir::{Bundle, BundleEntry, Meta};
use vital_uuid::ResourceId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    CodedContent,
    DemographicCodedContent,
    IndustryOccupationCodedContent,
    MortalityRoster,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::CodedContent,
        ViewKind::DemographicCodedContent,
        ViewKind::IndustryOccupationCodedContent,
        ViewKind::MortalityRoster,
    ];

    pub fn profile(self) -> &'static str {
        match self {
            ViewKind::CodedContent => CAUSE_OF_DEATH_CODED_CONTENT_BUNDLE,
            ViewKind::DemographicCodedContent => DEMOGRAPHIC_CODED_CONTENT_BUNDLE,
            ViewKind::IndustryOccupationCodedContent => INDUSTRY_OCCUPATION_CODED_CONTENT_BUNDLE,
            ViewKind::MortalityRoster => MORTALITY_ROSTER_BUNDLE,
        }
    }

    pub fn from_profile(profile: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.profile() == profile)
    }

    /// Detects the view a bundle claims to be, by profile.
    pub fn of_bundle(bundle: &Bundle) -> Option<Self> {
        bundle
            .meta
            .as_ref()
            .and_then(|meta| meta.profile.iter().find_map(|p| Self::from_profile(p)))
    }
}

impl DeathRecord {
    /// Derives a sub-graph view of this record.
    pub fn view(&self, kind: ViewKind) -> Bundle {
        let slots = &self.slots;
        let mut ids: Vec<&str> = Vec::new();
        let observation =
            move |code: ObservationCode| slots.observations.get(&code).map(String::as_str);
        let list = move |list: ObservationList| {
            slots
                .lists
                .get(&list)
                .map(|ids| ids.iter().map(String::as_str).collect::<Vec<_>>())
                .unwrap_or_default()
        };

        match kind {
            ViewKind::CodedContent => {
                ids.extend(
                    [
                        ObservationCode::ActivityAtDeath,
                        ObservationCode::AutomatedUnderlyingCause,
                        ObservationCode::ManualUnderlyingCause,
                        ObservationCode::PlaceOfInjury,
                        ObservationCode::CodingStatus,
                    ]
                    .into_iter()
                    .filter_map(observation),
                );
                ids.extend(list(ObservationList::EntityAxis));
                ids.extend(list(ObservationList::RecordAxis));
                ids.extend(observation(ObservationCode::DateOfDeath));
            }
            ViewKind::DemographicCodedContent => {
                ids.extend(
                    [
                        ObservationCode::InputRaceAndEthnicity,
                        ObservationCode::CodedRaceAndEthnicity,
                    ]
                    .into_iter()
                    .filter_map(observation),
                );
            }
            ViewKind::IndustryOccupationCodedContent => {
                ids.extend(
                    [
                        ObservationCode::UsualWork,
                        ObservationCode::IndustryOccupationCoded,
                    ]
                    .into_iter()
                    .filter_map(observation),
                );
            }
            ViewKind::MortalityRoster => {
                ids.extend(slots.decedent.as_deref());
                ids.extend(
                    Relationship::ALL
                        .into_iter()
                        .filter_map(|rel| slots.relatives.get(&rel).map(String::as_str)),
                );
                ids.extend(
                    [
                        ObservationCode::DateOfDeath,
                        ObservationCode::Age,
                        ObservationCode::InputRaceAndEthnicity,
                    ]
                    .into_iter()
                    .filter_map(observation),
                );
                ids.extend(slots.locations.get(&LocationRole::Death).map(String::as_str));
            }
        }

        let entry = ids
            .into_iter()
            .filter_map(|id| self.arena.entry(id))
            .map(|e| BundleEntry::new(Some(e.full_url.clone()), e.resource.clone()))
            .collect();

        Bundle {
            id: Some(ResourceId::new().to_string()),
            meta: Some(Meta::with_profile(kind.profile())),
            identifier: Some(self.identifier.clone()),
            type_: "collection".into(),
            timestamp: Some(now()),
            entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessors::{CodedField, TextField};
    use fhir::urls::SNOMED;
    use fhir::{Coding, Resource};

    fn observation_codes(bundle: &Bundle) -> Vec<String> {
        bundle
            .resources()
            .filter_map(|r| match r {
                Resource::Observation(o) => o.code.as_ref().and_then(|c| c.first_code()).map(str::to_string),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn coded_content_view_includes_only_coding_entities() {
        let mut record = DeathRecord::new();
        record
            .set_text(TextField::CertificateNumber, Some("42"))
            .expect("set certificate number");
        record.set_coded(
            CodedField::MannerOfDeath,
            Some(Coding::new(SNOMED, "38605008", "Natural death")),
        );
        record.set_coded(
            CodedField::ManualUnderlyingCause,
            Some(Coding::new(fhir::urls::ICD10, "I21.0", "")),
        );

        let view = record.view(ViewKind::CodedContent);
        assert_eq!(view.type_, "collection");
        assert_eq!(ViewKind::of_bundle(&view), Some(ViewKind::CodedContent));
        assert_eq!(view.identifier.as_ref(), Some(record.identifier()));
        assert_eq!(observation_codes(&view), vec!["80359-3".to_string()]);
        assert_ne!(view.id.as_deref(), Some(record.id()));
    }

    #[test]
    fn empty_views_have_no_placeholders() {
        let record = DeathRecord::new();
        for kind in [
            ViewKind::CodedContent,
            ViewKind::DemographicCodedContent,
            ViewKind::IndustryOccupationCodedContent,
        ] {
            assert!(record.view(kind).entry.is_empty(), "{kind:?} should be empty");
        }
    }

    #[test]
    fn roster_includes_decedent_and_relatives() {
        let mut record = DeathRecord::new();
        record
            .set_text(TextField::FatherFamilyName, Some("Doe"))
            .expect("set father");
        let view = record.view(ViewKind::MortalityRoster);

        let types: Vec<_> = view.resources().map(Resource::resource_type).collect();
        assert_eq!(types, vec!["Patient", "RelatedPerson"]);
    }
}
