//! ResourceStorage implementation for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use serde_json::Value;

use crate::core::ResourceStorage;
use crate::error::{BackendError, ResourceError, StorageError, StorageResult};
use crate::tenant::TenantContext;
use crate::types::StoredResource;

use super::SqliteBackend;

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: "sqlite".to_string(),
        message,
        source: None,
    })
}

fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| internal_error(format!("Failed to parse timestamp '{}': {}", value, e)))
}

#[async_trait]
impl ResourceStorage for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn create_or_update(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
        resource: Value,
    ) -> StorageResult<(StoredResource, bool)> {
        let mut conn = self.get_connection()?;
        let tenant_id = tenant.tenant_id().as_str();

        let mut resource = resource;
        if let Some(obj) = resource.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.to_string()));
        }

        // Immediate so the version read and the upsert hold the write lock together.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current_version: Option<String> = tx
            .query_row(
                "SELECT version_id FROM resources
                 WHERE tenant_id = ?1 AND resource_type = ?2 AND id = ?3",
                params![tenant_id, resource_type, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to check resource: {}", e)))?;

        let created = current_version.is_none();
        let new_version = current_version
            .and_then(|v| v.parse::<u64>().ok())
            .map_or(1, |v| v + 1)
            .to_string();

        let data = serde_json::to_vec(&resource)?;
        let now = Utc::now();

        tx.execute(
            "INSERT INTO resources (tenant_id, resource_type, id, version_id, data, last_updated, is_deleted, deleted_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, NULL)
             ON CONFLICT (tenant_id, resource_type, id) DO UPDATE SET
                version_id = excluded.version_id,
                data = excluded.data,
                last_updated = excluded.last_updated,
                is_deleted = 0,
                deleted_at = NULL",
            params![tenant_id, resource_type, id, new_version, data, now.to_rfc3339()],
        )
        .map_err(|e| internal_error(format!("Failed to store resource: {}", e)))?;
        tx.commit()?;

        let stored = StoredResource::from_storage(
            resource_type,
            id,
            new_version,
            tenant.tenant_id().clone(),
            resource,
            now,
            None,
        );

        Ok((stored, created))
    }

    async fn read(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
    ) -> StorageResult<Option<StoredResource>> {
        let conn = self.get_connection()?;
        let tenant_id = tenant.tenant_id().as_str();

        let row = conn
            .query_row(
                "SELECT version_id, data, last_updated, is_deleted, deleted_at
                 FROM resources
                 WHERE tenant_id = ?1 AND resource_type = ?2 AND id = ?3",
                params![tenant_id, resource_type, id],
                |row| {
                    let version_id: String = row.get(0)?;
                    let data: Vec<u8> = row.get(1)?;
                    let last_updated: String = row.get(2)?;
                    let is_deleted: i32 = row.get(3)?;
                    let deleted_at: Option<String> = row.get(4)?;
                    Ok((version_id, data, last_updated, is_deleted, deleted_at))
                },
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to read resource: {}", e)))?;

        let Some((version_id, data, last_updated, is_deleted, deleted_at)) = row else {
            return Ok(None);
        };

        if is_deleted != 0 {
            let deleted_at = deleted_at.and_then(|s| parse_timestamp(&s).ok());
            return Err(StorageError::Resource(ResourceError::Gone {
                resource_type: resource_type.to_string(),
                id: id.to_string(),
                deleted_at,
            }));
        }

        let content: Value = serde_json::from_slice(&data)?;

        Ok(Some(StoredResource::from_storage(
            resource_type,
            id,
            version_id,
            tenant.tenant_id().clone(),
            content,
            parse_timestamp(&last_updated)?,
            None,
        )))
    }

    async fn delete(
        &self,
        tenant: &TenantContext,
        resource_type: &str,
        id: &str,
    ) -> StorageResult<()> {
        let conn = self.get_connection()?;
        let tenant_id = tenant.tenant_id().as_str();

        let row: Option<(String, i32)> = conn
            .query_row(
                "SELECT version_id, is_deleted FROM resources
                 WHERE tenant_id = ?1 AND resource_type = ?2 AND id = ?3",
                params![tenant_id, resource_type, id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to check resource: {}", e)))?;

        let current_version = match row {
            None => {
                return Err(StorageError::Resource(ResourceError::NotFound {
                    resource_type: resource_type.to_string(),
                    id: id.to_string(),
                }));
            }
            Some((_, is_deleted)) if is_deleted != 0 => {
                return Err(StorageError::Resource(ResourceError::Gone {
                    resource_type: resource_type.to_string(),
                    id: id.to_string(),
                    deleted_at: None,
                }));
            }
            Some((version, _)) => version,
        };

        let new_version: u64 = current_version.parse().unwrap_or(0) + 1;
        let deleted_at = Utc::now().to_rfc3339();

        conn.execute(
            "UPDATE resources SET is_deleted = 1, deleted_at = ?1, version_id = ?2, last_updated = ?1
             WHERE tenant_id = ?3 AND resource_type = ?4 AND id = ?5",
            params![deleted_at, new_version.to_string(), tenant_id, resource_type, id],
        )
        .map_err(|e| internal_error(format!("Failed to delete resource: {}", e)))?;

        Ok(())
    }
}
