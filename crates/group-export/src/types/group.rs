//! Structured Group model.
//!
//! A [`Group`] is what a [`GroupDeserializer`](crate::core::GroupDeserializer)
//! produces from a raw Group record: the group's id and its ordered member
//! entries. Each [`GroupMember`] knows whether it was active at a given
//! instant; each reference is later turned into a [`ResolvedMember`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deserialized Group resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// The group's logical ID.
    pub id: String,
    /// Member entries, in source order.
    #[serde(default)]
    pub members: Vec<GroupMember>,
}

impl Group {
    /// Creates a group with no members.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
        }
    }

    /// Appends a member entry.
    pub fn with_member(mut self, member: GroupMember) -> Self {
        self.members.push(member);
        self
    }
}

/// A time window bounding a membership. Both bounds are optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Start of the window, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// End of the window, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl Period {
    /// Creates a period with the given bounds.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// `true` unless the window has a start at or after `at`.
    pub fn has_started(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| start < at)
    }

    /// `true` unless the window has an end at or before `at`.
    pub fn has_not_ended(&self, at: DateTime<Utc>) -> bool {
        self.end.is_none_or(|end| end > at)
    }
}

/// One entry of `Group.member`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Literal reference to the member resource (e.g. `Patient/123`).
    ///
    /// `None` when `entity` carries only an identifier or display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Explicit inactive flag, if present in the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive: Option<bool>,
    /// Membership window, if present in the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
}

impl GroupMember {
    /// Creates a member entry with no inactive flag and no period.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: Some(reference.into()),
            inactive: None,
            period: None,
        }
    }

    /// Creates a member entry whose entity has no literal reference.
    pub fn unreferenced() -> Self {
        Self {
            reference: None,
            inactive: None,
            period: None,
        }
    }

    /// Sets the inactive flag.
    pub fn with_inactive(mut self, inactive: bool) -> Self {
        self.inactive = Some(inactive);
        self
    }

    /// Sets the membership window.
    pub fn with_period(mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        self.period = Some(Period::new(start, end));
        self
    }

    /// Returns `true` if the entry counts as a member at `snapshot`.
    ///
    /// `include_inactive` overrides both the inactive flag and the end of the
    /// membership window. The start of the window is always enforced. Both
    /// bounds are exclusive: a window starting or ending exactly at
    /// `snapshot` does not cover it. Absent fields impose no constraint.
    pub fn is_active_at(&self, snapshot: DateTime<Utc>, include_inactive: bool) -> bool {
        let period = self.period.unwrap_or_default();
        let flagged_inactive = self.inactive.unwrap_or(false);

        (include_inactive || (!flagged_inactive && period.has_not_ended(snapshot)))
            && period.has_started(snapshot)
    }
}

/// A member reference resolved to a resource type and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedMember {
    /// The referenced resource's ID.
    pub resource_id: String,
    /// The referenced resource's type (e.g. `Patient`, `Group`).
    pub resource_type: String,
}

impl ResolvedMember {
    /// Creates a resolved member.
    pub fn new(resource_type: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            resource_type: resource_type.into(),
        }
    }

    /// Returns the relative reference (`Type/id`).
    pub fn reference(&self) -> String {
        format!("{}/{}", self.resource_type, self.resource_id)
    }
}

impl fmt::Display for ResolvedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.resource_type, self.resource_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_bare_member_is_active() {
        let member = GroupMember::new("Patient/p1");
        assert!(member.is_active_at(t0(), false));
        assert!(member.is_active_at(t0(), true));
    }

    #[test]
    fn test_start_bound_is_exclusive() {
        let member = GroupMember::new("Patient/p1").with_period(Some(t0()), None);
        assert!(!member.is_active_at(t0(), false));
        assert!(member.is_active_at(t0() + Duration::seconds(1), false));
    }

    #[test]
    fn test_end_bound_is_exclusive() {
        let member = GroupMember::new("Patient/p1").with_period(None, Some(t0()));
        assert!(!member.is_active_at(t0(), false));
        assert!(member.is_active_at(t0() - Duration::seconds(1), false));
    }

    #[test]
    fn test_inside_window_is_active() {
        let member = GroupMember::new("Patient/p1").with_period(
            Some(t0() - Duration::days(1)),
            Some(t0() + Duration::days(1)),
        );
        assert!(member.is_active_at(t0(), false));
    }

    #[test]
    fn test_inactive_flag_excludes_unless_overridden() {
        let member = GroupMember::new("Patient/p1").with_inactive(true);
        assert!(!member.is_active_at(t0(), false));
        assert!(member.is_active_at(t0(), true));

        let explicit_active = GroupMember::new("Patient/p1").with_inactive(false);
        assert!(explicit_active.is_active_at(t0(), false));
    }

    #[test]
    fn test_include_inactive_overrides_ended_window() {
        let member = GroupMember::new("Patient/p1").with_period(None, Some(t0()));
        assert!(member.is_active_at(t0(), true));
    }

    #[test]
    fn test_include_inactive_does_not_override_future_start() {
        let member = GroupMember::new("Patient/p1").with_period(Some(t0()), None);
        assert!(!member.is_active_at(t0(), true));
    }

    #[test]
    fn test_unreferenced_member_still_has_a_window() {
        let member = GroupMember::unreferenced().with_inactive(true);
        assert!(member.reference.is_none());
        assert!(!member.is_active_at(t0(), false));
        assert!(GroupMember::unreferenced().is_active_at(t0(), false));
    }

    #[test]
    fn test_resolved_member_reference() {
        let member = ResolvedMember::new("Patient", "p1");
        assert_eq!(member.reference(), "Patient/p1");
        assert_eq!(member.to_string(), "Patient/p1");
    }
}
