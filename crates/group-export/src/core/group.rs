//! Deserializer and reference-parser contracts.

use crate::error::StorageResult;
use crate::types::{Group, ResolvedMember, StoredResource};

/// Turns a raw Group record into its ordered member list.
///
/// Errors are surfaced to the caller of the resolver unchanged.
pub trait GroupDeserializer: Send + Sync {
    /// Deserializes a stored Group resource.
    fn deserialize_group(&self, resource: &StoredResource) -> StorageResult<Group>;
}

/// Resolves a member reference string to the referenced type and id.
///
/// Errors are surfaced to the caller of the resolver unchanged.
pub trait ReferenceResolver: Send + Sync {
    /// Resolves one reference.
    fn resolve_reference(&self, reference: &str) -> StorageResult<ResolvedMember>;
}

impl<T: GroupDeserializer + ?Sized> GroupDeserializer for Box<T> {
    fn deserialize_group(&self, resource: &StoredResource) -> StorageResult<Group> {
        (**self).deserialize_group(resource)
    }
}

impl<T: ReferenceResolver + ?Sized> ReferenceResolver for Box<T> {
    fn resolve_reference(&self, reference: &str) -> StorageResult<ResolvedMember> {
        (**self).resolve_reference(reference)
    }
}
