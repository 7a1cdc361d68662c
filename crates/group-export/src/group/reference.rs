//! Literal reference parsing.

use regex::Regex;

use crate::core::ReferenceResolver;
use crate::error::{StorageResult, ValidationError};
use crate::types::ResolvedMember;

/// Relative or absolute literal reference, optionally versioned.
const LITERAL_REFERENCE: &str = r"^(?:(?P<base>https?://.+)/)?(?P<type>[A-Z][A-Za-z]+)/(?P<id>[A-Za-z0-9\-\.]{1,64})(?:/_history/[A-Za-z0-9\-\.]{1,64})?$";

/// Parses FHIR literal references into `(type, id)`.
///
/// Accepted forms:
/// - `Patient/123`
/// - `Patient/123/_history/2`
/// - `https://example.org/fhir/Patient/123`
///
/// Contained (`#id`) and `urn:` references are rejected, as is anything whose
/// type segment is not a resource type name or whose id is not a FHIR id.
///
/// ```
/// use helios_group_export::core::ReferenceResolver;
/// use helios_group_export::group::FhirReferenceParser;
///
/// let parser = FhirReferenceParser::new();
/// let member = parser.resolve_reference("https://example.org/fhir/Patient/123").unwrap();
/// assert_eq!(member.resource_type, "Patient");
/// assert_eq!(member.resource_id, "123");
/// ```
#[derive(Debug, Clone)]
pub struct FhirReferenceParser {
    pattern: Regex,
}

impl FhirReferenceParser {
    /// Creates a parser.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(LITERAL_REFERENCE).expect("literal reference pattern compiles"),
        }
    }

    fn invalid(reference: &str, message: &str) -> ValidationError {
        ValidationError::InvalidReference {
            reference: reference.to_string(),
            message: message.to_string(),
        }
    }
}

impl Default for FhirReferenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceResolver for FhirReferenceParser {
    fn resolve_reference(&self, reference: &str) -> StorageResult<ResolvedMember> {
        let trimmed = reference.trim();

        if trimmed.is_empty() {
            return Err(Self::invalid(reference, "reference is empty").into());
        }
        if trimmed.starts_with('#') {
            return Err(Self::invalid(reference, "contained references cannot be resolved").into());
        }
        if trimmed.starts_with("urn:") {
            return Err(Self::invalid(reference, "urn references cannot be resolved").into());
        }

        let captures = self
            .pattern
            .captures(trimmed)
            .ok_or_else(|| Self::invalid(reference, "not a literal resource reference"))?;

        Ok(ResolvedMember::new(&captures["type"], &captures["id"]))
    }
}
