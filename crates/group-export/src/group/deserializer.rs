//! FHIR JSON Group deserialization.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::core::GroupDeserializer;
use crate::error::{StorageResult, ValidationError};
use crate::types::{Group, GroupMember, Period, StoredResource};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupJson {
    resource_type: Option<String>,
    #[serde(default)]
    member: Vec<MemberJson>,
}

#[derive(Debug, Deserialize)]
struct MemberJson {
    entity: Option<ReferenceJson>,
    period: Option<PeriodJson>,
    inactive: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ReferenceJson {
    reference: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PeriodJson {
    start: Option<String>,
    end: Option<String>,
}

/// Which side of a membership window a partial date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Start,
    End,
}

/// Reads `Group.member` from stored FHIR JSON.
///
/// Partial dates widen to their precision: a start of `2024-03` is
/// `2024-03-01T00:00:00Z`, an end of `2024-03` is `2024-04-01T00:00:00Z`.
/// Date-times without an offset are taken as UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGroupDeserializer;

impl JsonGroupDeserializer {
    /// Creates a deserializer.
    pub fn new() -> Self {
        Self
    }
}

impl GroupDeserializer for JsonGroupDeserializer {
    fn deserialize_group(&self, resource: &StoredResource) -> StorageResult<Group> {
        let invalid = |message: String| ValidationError::InvalidResource {
            resource_type: resource.resource_type().to_string(),
            id: resource.id().to_string(),
            message,
        };

        let parsed = GroupJson::deserialize(resource.content())
            .map_err(|e| invalid(format!("failed to parse group: {}", e)))?;

        if let Some(resource_type) = parsed.resource_type.as_deref() {
            if resource_type != "Group" {
                return Err(invalid(format!("expected a Group, found {}", resource_type)).into());
            }
        }

        let mut group = Group::new(resource.id());
        for (index, member) in parsed.member.into_iter().enumerate() {
            let reference = member.entity.and_then(|entity| entity.reference);

            let period = match member.period {
                Some(period) => Some(Period::new(
                    parse_bound(period.start.as_deref(), Bound::Start)
                        .map_err(|e| invalid(format!("member[{}].period.start: {}", index, e)))?,
                    parse_bound(period.end.as_deref(), Bound::End)
                        .map_err(|e| invalid(format!("member[{}].period.end: {}", index, e)))?,
                )),
                None => None,
            };

            group.members.push(GroupMember {
                reference,
                inactive: member.inactive,
                period,
            });
        }

        Ok(group)
    }
}

fn parse_bound(value: Option<&str>, bound: Bound) -> Result<Option<DateTime<Utc>>, String> {
    match value {
        Some(value) => parse_fhir_datetime(value, bound)
            .map(Some)
            .ok_or_else(|| format!("invalid dateTime '{}'", value)),
        None => Ok(None),
    }
}

/// Parses a FHIR `dateTime` into an instant.
fn parse_fhir_datetime(value: &str, bound: Bound) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }

    // Partial dates: YYYY-MM-DD, YYYY-MM, YYYY
    let (first, next) = if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        (date, date.checked_add_signed(TimeDelta::days(1))?)
    } else if value.len() == 7 {
        let date = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").ok()?;
        (date, date.checked_add_months(Months::new(1))?)
    } else if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
        let date = NaiveDate::from_ymd_opt(value.parse().ok()?, 1, 1)?;
        (date, NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)?)
    } else {
        return None;
    };

    let date = match bound {
        Bound::Start => first,
        Bound::End => next,
    };
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::tenant::TenantId;
    use chrono::TimeZone;
    use serde_json::{Value, json};

    fn stored(content: Value) -> StoredResource {
        StoredResource::new("Group", "grp-1", TenantId::new("t"), content)
    }

    fn deserialize(content: Value) -> StorageResult<Group> {
        JsonGroupDeserializer::new().deserialize_group(&stored(content))
    }

    #[test]
    fn test_group_without_members() {
        let group = deserialize(json!({"resourceType": "Group", "type": "person"})).unwrap();
        assert_eq!(group.id, "grp-1");
        assert!(group.members.is_empty());
    }

    #[test]
    fn test_members_keep_source_order() {
        let group = deserialize(json!({
            "resourceType": "Group",
            "member": [
                {"entity": {"reference": "Patient/b"}},
                {"entity": {"reference": "Group/g2"}, "inactive": true},
                {"entity": {"reference": "Patient/a"},
                 "period": {"start": "2024-01-01T00:00:00Z", "end": "2024-12-31T10:30:00+02:00"}}
            ]
        }))
        .unwrap();

        let references: Vec<_> = group
            .members
            .iter()
            .map(|m| m.reference.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(references, vec!["Patient/b", "Group/g2", "Patient/a"]);
        assert_eq!(group.members[1].inactive, Some(true));

        let period = group.members[2].period.unwrap();
        assert_eq!(period.start, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(period.end, Some(Utc.with_ymd_and_hms(2024, 12, 31, 8, 30, 0).unwrap()));
    }

    #[test]
    fn test_partial_dates_widen_to_precision() {
        let group = deserialize(json!({
            "resourceType": "Group",
            "member": [
                {"entity": {"reference": "Patient/a"}, "period": {"start": "2024-03-15", "end": "2024-03-15"}},
                {"entity": {"reference": "Patient/b"}, "period": {"start": "2024-02", "end": "2024-12"}},
                {"entity": {"reference": "Patient/c"}, "period": {"start": "2023", "end": "2023"}}
            ]
        }))
        .unwrap();

        let a = group.members[0].period.unwrap();
        assert_eq!(a.start, Some(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap()));
        assert_eq!(a.end, Some(Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap()));

        let b = group.members[1].period.unwrap();
        assert_eq!(b.start, Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
        assert_eq!(b.end, Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));

        let c = group.members[2].period.unwrap();
        assert_eq!(c.start, Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(c.end, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_one_sided_period() {
        let group = deserialize(json!({
            "member": [{"entity": {"reference": "Patient/a"}, "period": {"end": "2024-01-01T00:00:00Z"}}]
        }))
        .unwrap();
        let period = group.members[0].period.unwrap();
        assert!(period.start.is_none());
        assert!(period.end.is_some());
    }

    #[test]
    fn test_naive_datetime_is_utc() {
        let group = deserialize(json!({
            "member": [{"entity": {"reference": "Patient/a"}, "period": {"start": "2024-05-05T10:00:00"}}]
        }))
        .unwrap();
        assert_eq!(
            group.members[0].period.unwrap().start,
            Some(Utc.with_ymd_and_hms(2024, 5, 5, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_rejects_wrong_resource_type() {
        let err = deserialize(json!({"resourceType": "Patient"})).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Validation(ValidationError::InvalidResource { .. })
        ));
    }

    #[test]
    fn test_member_without_reference_is_kept() {
        let group = deserialize(json!({
            "resourceType": "Group",
            "member": [
                {"entity": {"identifier": {"system": "urn:mrn", "value": "123"}}, "inactive": true},
                {"entity": {"reference": "Patient/p1"}}
            ]
        }))
        .unwrap();
        assert_eq!(group.members.len(), 2);
        assert!(group.members[0].reference.is_none());
        assert_eq!(group.members[0].inactive, Some(true));
        assert_eq!(group.members[1].reference.as_deref(), Some("Patient/p1"));
    }

    #[test]
    fn test_rejects_bad_date_with_member_index() {
        let err = deserialize(json!({
            "resourceType": "Group",
            "member": [{"entity": {"reference": "Patient/a"}, "period": {"end": "soon"}}]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("member[0].period.end"));
    }

    #[test]
    fn test_rejects_bad_dates_and_shapes() {
        assert!(deserialize(json!({
            "member": [{"entity": {"reference": "Patient/a"}, "period": {"start": "yesterday"}}]
        }))
        .is_err());
        assert!(deserialize(json!({"member": {"entity": {"reference": "Patient/a"}}})).is_err());
    }
}
