//! Domain services and ports.
//!
//! Purpose: orchestrate project publication against the `ProjectService`
//! port without knowing how the service is reached. Document rules live in
//! the `project-document` crate; this layer only sequences them.
//!
//! Public surface:
//! - TreePublicationService — create, fetch, attach, replace.
//! - PublicationError — transport failures kept apart from document failures.

pub mod ports;
mod tree_publication;

pub use self::tree_publication::{
    PublicationError, PublicationOutcome, PublicationRequest, PublicationStep,
    TreePublicationService,
};
