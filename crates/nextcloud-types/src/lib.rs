//! # nextcloud-types
//!
//! Value types shared by the Nextcloud client crates:
//!
//! - **constants**: documented OCS, sharing and Talk constant sets
//! - **ocs**: the `{"ocs": {"meta", "data"}}` response envelope
//! - **types**: response models and request argument types

pub mod constants;
pub mod ocs;
pub mod types;

pub use constants::*;
pub use ocs::{OcsEnvelope, OcsMeta, OcsResponse};
pub use types::*;
