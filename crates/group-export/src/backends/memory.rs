//! In-memory storage backend.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::core::ResourceStorage;
use crate::error::{ResourceError, StorageResult};
use crate::tenant::{TenantContext, TenantId};
use crate::types::StoredResource;

type ResourceKey = (TenantId, String, String);

/// A [`ResourceStorage`] kept in a process-local map.
///
/// Deletes are soft: the last version is kept and reads report `Gone`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    resources: RwLock<HashMap<ResourceKey, StoredResource>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored resources, deleted ones included.
    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    /// Returns `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    fn key(tenant: &TenantContext, resource_type: &str, id: &str) -> ResourceKey {
        (
            tenant.tenant_id().clone(),
            resource_type.to_string(),
            id.to_string(),
        )
    }
}

#[async_trait]
impl ResourceStorage for InMemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create_or_update(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
        resource: Value,
    ) -> StorageResult<(StoredResource, bool)> {
        let mut resource = resource;
        if let Some(obj) = resource.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.to_string()));
        }

        let key = Self::key(tenant, resource_type, id);
        let mut resources = self.resources.write();

        let (stored, created) = match resources.get(&key) {
            Some(current) => (current.new_version(resource), false),
            None => (
                StoredResource::new(resource_type, id, tenant.tenant_id().clone(), resource),
                true,
            ),
        };
        resources.insert(key, stored.clone());

        Ok((stored, created))
    }

    async fn read(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
    ) -> StorageResult<Option<StoredResource>> {
        let resources = self.resources.read();
        match resources.get(&Self::key(tenant, resource_type, id)) {
            Some(stored) if stored.is_deleted() => Err(ResourceError::Gone {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
                deleted_at: stored.deleted_at(),
            }
            .into()),
            Some(stored) => Ok(Some(stored.clone())),
            None => Ok(None),
        }
    }

    async fn delete(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
    ) -> StorageResult<()> {
        let mut resources = self.resources.write();
        match resources.get_mut(&Self::key(tenant, resource_type, id)) {
            Some(stored) if stored.is_deleted() => Err(ResourceError::Gone {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
                deleted_at: stored.deleted_at(),
            }
            .into()),
            Some(stored) => {
                stored.mark_deleted();
                Ok(())
            }
            None => Err(ResourceError::NotFound {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
            }
            .into()),
        }
    }
}
