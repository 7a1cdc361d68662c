//! Test fixtures for Group resources.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

/// The instant most tests resolve membership at.
pub fn snapshot() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

/// A `Group.member` entry fixture.
#[derive(Debug, Clone)]
pub struct MemberFixture {
    /// Literal reference.
    pub reference: String,
    /// Inactive flag.
    pub inactive: Option<bool>,
    /// Period start.
    pub start: Option<DateTime<Utc>>,
    /// Period end.
    pub end: Option<DateTime<Utc>>,
}

impl MemberFixture {
    /// A member with an arbitrary reference.
    pub fn reference(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            inactive: None,
            start: None,
            end: None,
        }
    }

    /// A `Patient/{id}` member.
    pub fn patient(id: &str) -> Self {
        Self::reference(format!("Patient/{}", id))
    }

    /// A `Group/{id}` member.
    pub fn group(id: &str) -> Self {
        Self::reference(format!("Group/{}", id))
    }

    /// Sets the inactive flag.
    pub fn inactive(mut self, inactive: bool) -> Self {
        self.inactive = Some(inactive);
        self
    }

    /// Sets the period start.
    pub fn starting(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the period end.
    pub fn ending(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        let mut member = json!({"entity": {"reference": self.reference}});

        if let Some(inactive) = self.inactive {
            member["inactive"] = json!(inactive);
        }

        if self.start.is_some() || self.end.is_some() {
            let mut period = json!({});
            if let Some(start) = self.start {
                period["start"] = json!(start.to_rfc3339());
            }
            if let Some(end) = self.end {
                period["end"] = json!(end.to_rfc3339());
            }
            member["period"] = period;
        }

        member
    }
}

/// A Group resource fixture.
#[derive(Debug, Clone)]
pub struct GroupFixture {
    /// Group ID.
    pub id: String,
    /// Member entries in order.
    pub members: Vec<MemberFixture>,
}

impl GroupFixture {
    /// Creates an empty group.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
        }
    }

    /// Adds a member entry.
    pub fn with_member(mut self, member: MemberFixture) -> Self {
        self.members.push(member);
        self
    }

    /// Adds plain patient members.
    pub fn with_patients(mut self, ids: &[&str]) -> Self {
        self.members.extend(ids.iter().map(|id| MemberFixture::patient(id)));
        self
    }

    /// Adds plain nested group members.
    pub fn with_groups(mut self, ids: &[&str]) -> Self {
        self.members.extend(ids.iter().map(|id| MemberFixture::group(id)));
        self
    }

    /// Converts to FHIR JSON.
    pub fn to_json(&self) -> Value {
        json!({
            "resourceType": "Group",
            "id": self.id,
            "type": "person",
            "actual": true,
            "member": self.members.iter().map(MemberFixture::to_json).collect::<Vec<_>>(),
        })
    }
}
