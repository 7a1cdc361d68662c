//! Core resource storage trait.
//!
//! This module defines the [`ResourceStorage`] trait, which provides the
//! key-based access group resolution needs. All operations require a
//! [`TenantContext`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageResult;
use crate::tenant::TenantContext;
use crate::types::StoredResource;

/// Storage trait for FHIR resources.
///
/// # Example
///
/// ```ignore
/// use helios_group_export::core::ResourceStorage;
/// use helios_group_export::tenant::{TenantContext, TenantId};
///
/// async fn example<S: ResourceStorage>(storage: &S) -> StorageResult<()> {
///     let tenant = TenantContext::new(TenantId::new("acme"));
///
///     let group = serde_json::json!({"resourceType": "Group", "member": []});
///     storage.create_or_update(&tenant, "Group", "grp-1", group).await?;
///
///     let read = storage.read(&tenant, "Group", "grp-1").await?;
///     assert!(read.is_some());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ResourceStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Creates or replaces a resource with a specific ID (PUT semantics).
    ///
    /// # Returns
    ///
    /// A tuple of (StoredResource, created: bool) where created indicates
    /// whether a new resource was created (true) or an existing one updated (false).
    async fn create_or_update(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
        resource: Value,
    ) -> StorageResult<(StoredResource, bool)>;

    /// Reads a resource by type and ID.
    ///
    /// # Returns
    ///
    /// The stored resource if found, or `None` if no record exists.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(Gone)` - If the resource was deleted
    async fn read(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
    ) -> StorageResult<Option<StoredResource>>;

    /// Deletes a resource (soft delete).
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If the resource doesn't exist
    /// * `StorageError::Resource(Gone)` - If already deleted
    async fn delete(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
    ) -> StorageResult<()>;
}
