//! Core types: raw stored records and the structured Group model.

mod group;
mod stored_resource;

pub use group::{Group, GroupMember, Period, ResolvedMember};
pub use stored_resource::StoredResource;
