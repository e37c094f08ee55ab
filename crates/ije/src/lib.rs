//! # Vital IJE
//!
//! Fixed-width IJE interchange for death records.
//!
//! - [`registry`]: ordered, immutable field layouts per record kind, with offsets derived from
//!   widths and checked by [`FieldRegistry::validate`].
//! - [`IjeCodec`]: text ⇄ [`FieldValues`] for one registry, and [`FieldValues`] ⇄
//!   [`vital_core::DeathRecord`] through the bindings of the mortality layout.
//! - [`transform`]: justification and the flag, numeric, time and ICD-10 slot conventions.
//! - [`mappings`]: static IJE code ⇄ coding value sets.
//!
//! Field-level problems never fail a pass. They accumulate as [`Issue`]s on the codec that ran
//! it, alongside whatever partial output could still be produced.

mod binding;

pub mod codec;
pub mod error;
pub mod mappings;
pub mod mortality;
pub mod registry;
pub mod transform;

pub use codec::{FieldValues, IjeCodec, Issue};
pub use error::{IjeError, IjeResult};
pub use mortality::MORTALITY_WIDTH;
pub use registry::{registry, FieldDescriptor, FieldRegistry, Justification, RecordKind};
