//! Identity tokens for resource-graph entities and message envelopes.
//!
//! Every entity in a record graph, and every envelope, carries an identity token that other
//! entities use to reference it. Freshly minted tokens are lowercase hyphenated UUID v4 values;
//! the corresponding bundle `fullUrl` is `urn:uuid:<token>`.
//!
//! ## Canonical form
//! - Length: 36
//! - Characters: `0-9`, `a-f` and hyphens at positions 8, 13, 18 and 23
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//!
//! Restored graphs may carry ids that are not UUIDs at all (for example `Decedent-Example1`).
//! Those are kept as plain strings by the record model; [`ResourceId`] is only used where a
//! token is minted.

mod service;

pub use service::{full_url, id_from_reference, ResourceId, URN_UUID_PREFIX};
