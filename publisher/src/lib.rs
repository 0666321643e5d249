//! Publish a phylogenetic tree into a new Microreact project.
//!
//! The crate wires the `project-document` model to the Microreact REST API:
//! - [`domain`] sequences create, fetch, attach and replace behind the
//!   [`domain::ports::ProjectService`] port;
//! - [`outbound::microreact`] implements the port with `reqwest`;
//! - [`config`] loads connection settings through OrthoConfig;
//! - [`tree_source`] reads user-supplied Newick files.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod tree_source;
