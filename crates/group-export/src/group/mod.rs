//! Group membership resolution.
//!
//! [`GroupResolver`] expands a Group into the individuals that were members
//! at a snapshot instant, following nested groups depth-first and skipping
//! groups already expanded in the same resolution tree.
//!
//! The default collaborators read FHIR JSON: [`JsonGroupDeserializer`] for
//! `Group.member` and [`FhirReferenceParser`] for literal references.

mod deserializer;
mod reference;
mod resolver;

pub use deserializer::JsonGroupDeserializer;
pub use reference::FhirReferenceParser;
pub use resolver::GroupResolver;
