//! Schema layer: serde shapes of the two upstream JSON documents.
//!
//! Object-valued maps deserialize into `IndexMap` so iteration follows the
//! order in which keys appear in the response body. Capability first-match and
//! GPU row order both depend on that.

pub mod capabilities;
pub mod ens;

pub use capabilities::{CapabilityConstraint, GpuInfo, RawCapabilitiesDocument};
pub use ens::EnsEntry;
