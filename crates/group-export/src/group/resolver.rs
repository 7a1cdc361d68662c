//! Depth-first expansion of Group membership.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, trace, warn};

use crate::config::GroupResolverConfig;
use crate::core::{GroupDeserializer, ReferenceResolver, ResourceStorage};
use crate::error::{BulkExportError, ResourceError, StorageError, StorageResult, ValidationError};
use crate::tenant::TenantContext;
use crate::types::{Group, ResolvedMember};

use super::{FhirReferenceParser, JsonGroupDeserializer};

/// A group whose active members are being walked.
struct Frame {
    group_id: String,
    members: std::vec::IntoIter<ResolvedMember>,
}

/// Resolves Groups into the individuals they contain.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use helios_group_export::backends::InMemoryBackend;
/// use helios_group_export::group::GroupResolver;
/// use helios_group_export::tenant::{TenantContext, TenantId};
/// use tokio_util::sync::CancellationToken;
///
/// let resolver = GroupResolver::new(Arc::new(InMemoryBackend::new()));
/// let tenant = TenantContext::new(TenantId::new("acme"));
///
/// let patients = resolver
///     .resolve_patient_ids(&tenant, "grp-1", chrono::Utc::now(), &CancellationToken::new())
///     .await?;
/// ```
pub struct GroupResolver<S, D = JsonGroupDeserializer, R = FhirReferenceParser> {
    storage: Arc<S>,
    deserializer: D,
    references: R,
    config: GroupResolverConfig,
}

impl<S: ResourceStorage> GroupResolver<S> {
    /// Creates a resolver reading FHIR JSON with the default configuration.
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_collaborators(
            storage,
            JsonGroupDeserializer::new(),
            FhirReferenceParser::new(),
            GroupResolverConfig::default(),
        )
    }
}

impl<S, D, R> GroupResolver<S, D, R>
where
    S: ResourceStorage,
    D: GroupDeserializer,
    R: ReferenceResolver,
{
    /// Creates a resolver with explicit collaborators and configuration.
    pub fn with_collaborators(
        storage: Arc<S>,
        deserializer: D,
        references: R,
        config: GroupResolverConfig,
    ) -> Self {
        Self {
            storage,
            deserializer,
            references,
            config,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: GroupResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GroupResolverConfig {
        &self.config
    }

    /// Returns the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Lists the direct members of a group that were active at `snapshot`.
    ///
    /// Members are returned in source order, without deduplication. Nested
    /// groups are returned as members, not expanded. With `include_inactive`
    /// the inactive flag and the end of the membership window are ignored.
    ///
    /// # Errors
    ///
    /// * `BulkExportError::GroupNotFound` - If the group doesn't exist or was deleted
    /// * `BulkExportError::Cancelled` - If `cancel` fires before the list is complete
    /// * Deserializer and reference parser errors, unchanged
    #[instrument(skip(self, tenant, cancel), fields(tenant = %tenant.tenant_id(), correlation_id = ?tenant.correlation_id()))]
    pub async fn resolve_members(
        &self,
        tenant: &TenantContext,
        group_id: &str,
        snapshot: DateTime<Utc>,
        include_inactive: bool,
        cancel: &CancellationToken,
    ) -> StorageResult<Vec<ResolvedMember>> {
        let group = self.fetch_group(tenant, group_id, cancel).await?;
        let mut resolved = Vec::with_capacity(group.members.len());

        for member in &group.members {
            Self::check_cancelled(group_id, cancel)?;

            if !member.is_active_at(snapshot, include_inactive) {
                trace!(reference = ?member.reference, "Skipping member outside membership window");
                continue;
            }

            let Some(reference) = member.reference.as_deref() else {
                warn!(group_id, "Active group member has no literal reference");
                return Err(ValidationError::InvalidReference {
                    reference: String::new(),
                    message: format!(
                        "active member of group {} has no entity.reference",
                        group_id
                    ),
                }
                .into());
            };

            let target = self
                .references
                .resolve_reference(reference)
                .inspect_err(|e| {
                    warn!(reference, error = %e, "Failed to resolve group member")
                })?;
            resolved.push(target);
        }

        debug!(
            total = group.members.len(),
            active = resolved.len(),
            "Resolved group members"
        );

        Ok(resolved)
    }

    /// Collects every individual reachable from a group at `snapshot`.
    ///
    /// Nested groups are expanded depth-first. Each group is expanded at most
    /// once per call; a reference back to a group already being or already
    /// expanded is skipped. Members of any other resource type are ignored.
    /// A nested reference to a group that does not exist fails the whole call.
    ///
    /// # Errors
    ///
    /// Same as [`resolve_members`](Self::resolve_members), for any group in the tree.
    #[instrument(skip(self, tenant, cancel), fields(tenant = %tenant.tenant_id(), correlation_id = ?tenant.correlation_id()))]
    pub async fn resolve_patient_ids(
        &self,
        tenant: &TenantContext,
        group_id: &str,
        snapshot: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> StorageResult<HashSet<String>> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut patient_ids: HashSet<String> = HashSet::new();

        visited.insert(group_id.to_string());
        let root = self
            .resolve_members(tenant, group_id, snapshot, false, cancel)
            .await?;
        let mut stack = vec![Frame {
            group_id: group_id.to_string(),
            members: root.into_iter(),
        }];

        loop {
            let Some(frame) = stack.last_mut() else {
                break;
            };
            Self::check_cancelled(&frame.group_id, cancel)?;
            let Some(member) = frame.members.next() else {
                stack.pop();
                continue;
            };

            if member.resource_type == self.config.individual_type {
                patient_ids.insert(member.resource_id);
            } else if member.resource_type == self.config.group_type {
                if !visited.insert(member.resource_id.clone()) {
                    debug!(nested_group = %member.resource_id, "Skipping group already expanded");
                    continue;
                }

                debug!(
                    nested_group = %member.resource_id,
                    depth = stack.len(),
                    "Expanding nested group"
                );
                let members = self
                    .resolve_members(tenant, &member.resource_id, snapshot, false, cancel)
                    .await?;
                stack.push(Frame {
                    group_id: member.resource_id,
                    members: members.into_iter(),
                });
            } else {
                trace!(member = %member, "Ignoring member of non-exportable type");
            }
        }

        info!(
            groups = visited.len(),
            patients = patient_ids.len(),
            "Resolved group patient ids"
        );

        Ok(patient_ids)
    }

    /// Reads and deserializes a group, racing the read against `cancel`.
    async fn fetch_group(
        &self,
        tenant: &TenantContext,
        group_id: &str,
        cancel: &CancellationToken,
    ) -> StorageResult<Group> {
        Self::check_cancelled(group_id, cancel)?;

        let read = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Self::cancelled(group_id)),
            read = self.storage.read(tenant, &self.config.group_type, group_id) => read,
        };

        let stored = match read {
            Ok(Some(stored)) => stored,
            Ok(None) | Err(StorageError::Resource(ResourceError::Gone { .. })) => {
                debug!(group_id, "Group not found");
                return Err(BulkExportError::GroupNotFound {
                    group_id: group_id.to_string(),
                }
                .into());
            }
            Err(e) => return Err(e),
        };

        self.deserializer
            .deserialize_group(&stored)
            .inspect_err(|e| warn!(group_id, error = %e, "Failed to deserialize group"))
    }

    fn check_cancelled(group_id: &str, cancel: &CancellationToken) -> StorageResult<()> {
        if cancel.is_cancelled() {
            Err(Self::cancelled(group_id))
        } else {
            Ok(())
        }
    }

    fn cancelled(group_id: &str) -> StorageError {
        debug!(group_id, "Group resolution cancelled");
        BulkExportError::Cancelled {
            group_id: group_id.to_string(),
        }
        .into()
    }
}
