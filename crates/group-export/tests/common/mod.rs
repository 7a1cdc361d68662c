//! Test infrastructure for group resolution.
//!
//! Fixtures build FHIR Group JSON; the harness creates backends, tenants and
//! resolvers and loads fixtures into storage.

#![allow(dead_code)]

pub mod fixtures;
pub mod harness;

pub use fixtures::*;
pub use harness::*;
