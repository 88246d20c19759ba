//! Data Transfer Objects for the remote pipeline service
//!
//! These types mirror the service's JSON wire format (camelCase keys).
//! Every scalar and collection is optional on the wire: absent values are
//! omitted from requests and tolerated in responses.

pub mod parameter;
pub mod pipeline;
