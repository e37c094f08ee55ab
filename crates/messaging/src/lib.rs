//! # Vital Messaging
//!
//! Typed envelopes around death records for submission, coding and acknowledgement traffic.
//!
//! - [`Envelope::classify`] reads the routing header of an inbound message bundle and pulls out
//!   the payload for its [`MessageKind`]. A missing header, a header without a type and an
//!   unknown type are three distinct [`MessagingError`]s.
//! - [`Envelope::outbound`] and the other builders stamp [`BusinessIdentifiers`] from a record
//!   and embed the full record or exactly one coded-content view.
//! - [`Envelope::respond_to`] correlates a response with the inbound message id.
//! - [`Envelope::extraction_error`] wraps a failure and the offending payload for forwarding.

pub mod config;
pub mod envelope;
pub mod error;
pub mod identifiers;
pub mod kind;

pub use config::MessagingConfig;
pub use envelope::{AliasData, Envelope, Payload};
pub use error::{MessagingError, MessagingResult};
pub use identifiers::BusinessIdentifiers;
pub use kind::MessageKind;
