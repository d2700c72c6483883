//! docmerge: deep-merge YAML and JSON documents
//!
//! Later documents take priority over earlier ones. Mappings are merged key by
//! key, sequences and scalars are replaced, and an explicit `null` erases the
//! value it lands on.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{merge_documents, ApplicationError, MergeOptions, OutputFormat};
pub use domain::{merge, merge_all, DomainError, Kind, Mapping, Node, Scalar};
