//! Helios FHIR Server Group Export Scope
//!
//! This crate resolves a FHIR `Group` into the set of patients that were its
//! members at a point in time. It is used to compute the scope of a
//! group-level bulk export (`[base]/Group/[id]/$export`).
//!
//! # Features
//!
//! - **Nested groups**: Members that are themselves groups are expanded depth-first
//! - **Cycle safety**: Each group is expanded at most once per resolution
//! - **Point-in-time membership**: `Group.member.period` and `inactive` are evaluated at a snapshot instant
//! - **Cancellation**: Resolution aborts promptly when the caller's token fires
//!
//! # Architecture
//!
//! - [`tenant`] - Tenant scoping for storage reads
//! - [`types`] - Stored records and the structured Group model
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage, deserializer and reference-parser traits
//! - [`group`] - The resolver and its default FHIR JSON collaborators
//! - [`backends`] - Backend implementations (in-memory, SQLite)
//! - [`config`] - Resolver configuration and logging setup
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use helios_group_export::backends::InMemoryBackend;
//! use helios_group_export::core::ResourceStorage;
//! use helios_group_export::group::GroupResolver;
//! use helios_group_export::tenant::{TenantContext, TenantId};
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> helios_group_export::StorageResult<()> {
//! let backend = Arc::new(InMemoryBackend::new());
//! let tenant = TenantContext::new(TenantId::new("acme"));
//!
//! backend
//!     .create_or_update(
//!         &tenant,
//!         "Group",
//!         "cohort",
//!         json!({
//!             "resourceType": "Group",
//!             "member": [
//!                 {"entity": {"reference": "Patient/p1"}},
//!                 {"entity": {"reference": "Group/sub-cohort"}}
//!             ]
//!         }),
//!     )
//!     .await?;
//! backend
//!     .create_or_update(
//!         &tenant,
//!         "Group",
//!         "sub-cohort",
//!         json!({"resourceType": "Group", "member": [{"entity": {"reference": "Patient/p2"}}]}),
//!     )
//!     .await?;
//!
//! let resolver = GroupResolver::new(backend);
//! let patients = resolver
//!     .resolve_patient_ids(&tenant, "cohort", chrono::Utc::now(), &CancellationToken::new())
//!     .await?;
//! assert_eq!(patients.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod config;
pub mod core;
pub mod error;
pub mod group;
pub mod tenant;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{GroupResolverConfig, init_logging, try_init_logging};
pub use error::{StorageError, StorageResult};
pub use group::{FhirReferenceParser, GroupResolver, JsonGroupDeserializer};
pub use tenant::{TenantContext, TenantId};
pub use types::{Group, GroupMember, ResolvedMember, StoredResource};

// Re-export core traits
pub use core::{GroupDeserializer, ReferenceResolver, ResourceStorage};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
