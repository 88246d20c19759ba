//! Configuration-side domain types
//!
//! These records describe the desired state of a pipeline definition as the
//! user authored it. Every unordered collection is an [`IdentitySet`], so
//! element order never affects equality.
//!
//! [`IdentitySet`]: crate::set::IdentitySet

pub mod parameter;
pub mod pipeline;
