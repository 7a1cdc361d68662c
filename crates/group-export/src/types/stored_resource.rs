//! Stored resource types.
//!
//! This module defines the [`StoredResource`] type, the raw record a storage
//! backend hands back for a `(type, id)` lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tenant::TenantId;

/// A FHIR resource with persistence metadata.
///
/// # Examples
///
/// ```
/// use helios_group_export::types::StoredResource;
/// use helios_group_export::tenant::TenantId;
/// use serde_json::json;
///
/// let resource = StoredResource::new(
///     "Group",
///     "grp-1",
///     TenantId::new("acme"),
///     json!({"resourceType": "Group", "id": "grp-1", "member": []}),
/// );
///
/// assert_eq!(resource.id(), "grp-1");
/// assert_eq!(resource.version_id(), "1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResource {
    resource_type: String,
    id: String,
    version_id: String,
    tenant_id: TenantId,
    content: Value,
    last_modified: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl StoredResource {
    /// Creates a first version of a resource, stamped with the current time.
    pub fn new(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        tenant_id: TenantId,
        content: Value,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            version_id: "1".to_string(),
            tenant_id,
            content,
            last_modified: Utc::now(),
            deleted_at: None,
        }
    }

    /// Creates a stored resource from existing data (e.g., loaded from database).
    pub fn from_storage(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        version_id: impl Into<String>,
        tenant_id: TenantId,
        content: Value,
        last_modified: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            version_id: version_id.into(),
            tenant_id,
            content,
            last_modified,
            deleted_at,
        }
    }

    /// Returns the FHIR resource type.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Returns the resource's logical ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the version ID.
    pub fn version_id(&self) -> &str {
        &self.version_id
    }

    /// Returns the tenant that owns this resource.
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the resource content as JSON.
    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Returns when the resource was last modified.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Returns when the resource was deleted, if applicable.
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns `true` if the resource has been deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Produces the next version of this resource with new content.
    pub fn new_version(&self, content: Value) -> Self {
        let next = self
            .version_id
            .parse::<u64>()
            .map(|v| (v + 1).to_string())
            .unwrap_or_else(|_| "1".to_string());

        Self {
            resource_type: self.resource_type.clone(),
            id: self.id.clone(),
            version_id: next,
            tenant_id: self.tenant_id.clone(),
            content,
            last_modified: Utc::now(),
            deleted_at: None,
        }
    }

    /// Marks this resource as deleted at the current time.
    pub fn mark_deleted(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.last_modified = now;
    }
}
