//! Collaborator contracts consumed by the group resolver.
//!
//! - [`ResourceStorage`] - Key-based retrieval of raw resources (async)
//! - [`GroupDeserializer`] - Raw Group record to structured [`Group`](crate::types::Group)
//! - [`ReferenceResolver`] - Reference string to `(type, id)`
//!
//! The resolver takes no locks of its own. Implementations of these traits
//! must be safe to call concurrently from unrelated resolution trees, hence
//! the `Send + Sync` bounds.

pub mod group;
pub mod storage;

pub use group::{GroupDeserializer, ReferenceResolver};
pub use storage::ResourceStorage;
