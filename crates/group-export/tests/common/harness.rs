//! Test harness helpers.

use std::collections::HashSet;
use std::sync::Arc;

use helios_group_export::backends::InMemoryBackend;
use helios_group_export::core::ResourceStorage;
use helios_group_export::group::GroupResolver;
use helios_group_export::tenant::{TenantContext, TenantId};

use super::fixtures::GroupFixture;

/// Creates a tenant context for the given tenant ID.
pub fn create_tenant(id: &str) -> TenantContext {
    TenantContext::new(TenantId::new(id))
}

/// Stores every fixture in the backend under the given tenant.
pub async fn load_groups<S: ResourceStorage>(
    storage: &S,
    tenant: &TenantContext,
    groups: &[GroupFixture],
) {
    for group in groups {
        storage
            .create_or_update(tenant, "Group", &group.id, group.to_json())
            .await
            .expect("Failed to store group fixture");
    }
}

/// Creates an in-memory resolver loaded with the given groups.
pub async fn resolver_with(
    tenant: &TenantContext,
    groups: &[GroupFixture],
) -> GroupResolver<InMemoryBackend> {
    let backend = InMemoryBackend::new();
    load_groups(&backend, tenant, groups).await;
    GroupResolver::new(Arc::new(backend))
}

/// Builds an id set from string slices.
pub fn id_set(ids: &[&str]) -> HashSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}
