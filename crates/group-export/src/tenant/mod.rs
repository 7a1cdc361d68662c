//! Tenant scoping for group resolution.
//!
//! Every storage read performed while resolving a group is scoped to the
//! caller's [`TenantContext`]. A resolution tree never crosses tenants: a
//! nested group reference is looked up in the same tenant as its parent.
//!
//! ```
//! use helios_group_export::tenant::{TenantContext, TenantId};
//!
//! let ctx = TenantContext::new(TenantId::new("acme")).with_correlation_id("export-42");
//! assert_eq!(ctx.tenant_id().as_str(), "acme");
//! assert_eq!(ctx.correlation_id(), Some("export-42"));
//! ```

mod context;
mod id;

pub use context::TenantContext;
pub use id::{SYSTEM_TENANT, TenantId};
