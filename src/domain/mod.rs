//! Domain layer: document tree and merge engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod merge;
pub mod node;

pub use error::{DomainError, DomainResult};
pub use merge::{merge, merge_all};
pub use node::{Kind, Mapping, Node, Scalar};
