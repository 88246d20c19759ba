//! Pipedef Core
//!
//! Core types and conversions for provisioning pipeline definitions.
//!
//! This crate contains:
//! - Hashing: content identities for unordered collection elements
//! - Sets: identity-keyed, order-independent collections
//! - Domain types: the configuration-side definition tree
//! - DTOs: the remote service's wire format
//! - Codec: encode/decode between the two

pub mod codec;
pub mod domain;
pub mod dto;
pub mod hash;
pub mod set;

pub use hash::SetId;
pub use set::{IdentitySet, SetElement};
