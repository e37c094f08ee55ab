//! The closed set of message kinds and their event URIs.

use std::fmt::{Display, Formatter};
use vital_core::ViewKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Submission,
    Update,
    Acknowledgement,
    Void,
    Alias,
    CauseOfDeathCoding,
    DemographicsCoding,
    IndustryOccupationCoding,
    CauseOfDeathCodingUpdate,
    DemographicsCodingUpdate,
    IndustryOccupationCodingUpdate,
    ExtractionError,
    Status,
}

impl MessageKind {
    /// Every kind, in classification order.
    pub const ALL: [MessageKind; 13] = [
        MessageKind::Submission,
        MessageKind::Update,
        MessageKind::Acknowledgement,
        MessageKind::Void,
        MessageKind::Alias,
        MessageKind::CauseOfDeathCoding,
        MessageKind::DemographicsCoding,
        MessageKind::IndustryOccupationCoding,
        MessageKind::CauseOfDeathCodingUpdate,
        MessageKind::DemographicsCodingUpdate,
        MessageKind::IndustryOccupationCodingUpdate,
        MessageKind::ExtractionError,
        MessageKind::Status,
    ];

    pub const fn event_uri(&self) -> &'static str {
        match self {
            MessageKind::Submission => "http://nchs.cdc.gov/vrdr_submission",
            MessageKind::Update => "http://nchs.cdc.gov/vrdr_submission_update",
            MessageKind::Acknowledgement => "http://nchs.cdc.gov/vrdr_acknowledgement",
            MessageKind::Void => "http://nchs.cdc.gov/vrdr_submission_void",
            MessageKind::Alias => "http://nchs.cdc.gov/vrdr_alias",
            MessageKind::CauseOfDeathCoding => "http://nchs.cdc.gov/vrdr_causeofdeath_coding",
            MessageKind::DemographicsCoding => "http://nchs.cdc.gov/vrdr_demographics_coding",
            MessageKind::IndustryOccupationCoding => {
                "http://nchs.cdc.gov/vrdr_industryoccupation_coding"
            }
            MessageKind::CauseOfDeathCodingUpdate => {
                "http://nchs.cdc.gov/vrdr_causeofdeath_coding_update"
            }
            MessageKind::DemographicsCodingUpdate => {
                "http://nchs.cdc.gov/vrdr_demographics_coding_update"
            }
            MessageKind::IndustryOccupationCodingUpdate => {
                "http://nchs.cdc.gov/vrdr_industryoccupation_coding_update"
            }
            MessageKind::ExtractionError => "http://nchs.cdc.gov/vrdr_extraction_error",
            MessageKind::Status => "http://nchs.cdc.gov/vrdr_status",
        }
    }

    /// Stable short name, used on the command line.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Submission => "submission",
            MessageKind::Update => "update",
            MessageKind::Acknowledgement => "acknowledgement",
            MessageKind::Void => "void",
            MessageKind::Alias => "alias",
            MessageKind::CauseOfDeathCoding => "cause-of-death-coding",
            MessageKind::DemographicsCoding => "demographics-coding",
            MessageKind::IndustryOccupationCoding => "industry-occupation-coding",
            MessageKind::CauseOfDeathCodingUpdate => "cause-of-death-coding-update",
            MessageKind::DemographicsCodingUpdate => "demographics-coding-update",
            MessageKind::IndustryOccupationCodingUpdate => "industry-occupation-coding-update",
            MessageKind::ExtractionError => "extraction-error",
            MessageKind::Status => "status",
        }
    }

    /// First kind whose event URI matches.
    pub fn from_event_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.event_uri() == uri)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// The sub-graph a coding-result kind carries.
    pub const fn view(&self) -> Option<ViewKind> {
        match self {
            MessageKind::CauseOfDeathCoding | MessageKind::CauseOfDeathCodingUpdate => {
                Some(ViewKind::CodedContent)
            }
            MessageKind::DemographicsCoding | MessageKind::DemographicsCodingUpdate => {
                Some(ViewKind::DemographicCodedContent)
            }
            MessageKind::IndustryOccupationCoding
            | MessageKind::IndustryOccupationCodingUpdate => {
                Some(ViewKind::IndustryOccupationCodedContent)
            }
            _ => None,
        }
    }

    /// Submission and update carry the full record.
    pub const fn carries_record(&self) -> bool {
        matches!(self, MessageKind::Submission | MessageKind::Update)
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn event_uris_and_names_are_distinct() {
        let uris: HashSet<_> = MessageKind::ALL.iter().map(MessageKind::event_uri).collect();
        let names: HashSet<_> = MessageKind::ALL.iter().map(MessageKind::as_str).collect();
        assert_eq!(uris.len(), 13);
        assert_eq!(names.len(), 13);
    }

    #[test]
    fn lookups_invert_each_other() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::from_event_uri(kind.event_uri()), Some(kind));
            assert_eq!(MessageKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::from_event_uri("http://example.org/other"), None);
    }

    #[test]
    fn only_coding_kinds_carry_views() {
        let with_view: Vec<_> = MessageKind::ALL.into_iter().filter(|k| k.view().is_some()).collect();
        assert_eq!(with_view.len(), 6);
        assert!(!with_view.iter().any(MessageKind::carries_record));
    }
}
