//! # Vital Core
//!
//! The death record resource graph: assembly, restoration and derived views.
//!
//! A [`DeathRecord`] is an arena of FHIR resources keyed by identity token. Resources reference
//! each other by `urn:uuid:<id>` and never own one another; named slots assign the roles
//! (decedent, certifier, certification, observations by code, locations by type, relatives by
//! relationship).
//!
//! - [`DeathRecord::new`] builds the cross-linked skeleton of a full record.
//! - [`DeathRecord::from_bundle`] restores a record with a single scan over a bundle.
//! - [`DeathRecord::view`] derives the coded-content, demographic, industry/occupation and
//!   mortality roster sub-graphs.
//! - Typed accessors read and write fields by shape (text, flag, coded, date, address).
//!
//! **No wire concerns**: JSON shapes live in `fhir`; IJE positional encoding lives in
//! `vital-ije`; messaging envelopes live in `vital-messaging`.

mod arena;

pub mod accessors;
pub mod codes;
pub mod error;
pub mod partial_date;
pub mod record;
pub mod restore;
pub mod views;

pub use accessors::{
    AddressField, AddressKey, CauseLine, CodedField, DateField, EntityAxisEntry, FlagField,
    GeoFlag, RecordAxisEntry, TextField,
};
pub use error::{RecordError, RecordResult};
pub use partial_date::PartialDate;
pub use record::{DeathRecord, GraphKind};
pub use views::ViewKind;
pub use vital_types::Tristate;
