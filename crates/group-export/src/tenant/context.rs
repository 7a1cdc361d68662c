//! Tenant context for storage reads.

use super::id::TenantId;

/// The tenant scope of a storage call or a resolution tree.
///
/// The optional correlation ID ties the log events of one export request
/// together; it is recorded on the resolver's spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
    correlation_id: Option<String>,
}

impl TenantContext {
    /// Creates a new tenant context.
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            correlation_id: None,
        }
    }

    /// Creates a system tenant context for shared resources.
    pub fn system() -> Self {
        Self::new(TenantId::system())
    }

    /// Creates a context with the specified correlation ID for tracing.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Returns the tenant ID.
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the correlation ID, if set.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Returns `true` if this is the system tenant context.
    pub fn is_system(&self) -> bool {
        self.tenant_id.is_system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_has_no_correlation_id() {
        let ctx = TenantContext::new(TenantId::new("acme"));
        assert_eq!(ctx.tenant_id().as_str(), "acme");
        assert!(ctx.correlation_id().is_none());
        assert!(!ctx.is_system());
    }

    #[test]
    fn test_system_context() {
        assert!(TenantContext::system().is_system());
    }
}
