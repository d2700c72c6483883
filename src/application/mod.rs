//! Application layer: document codec and merge pipeline
//!
//! This layer orchestrates the merge engine and depends on I/O boundary traits.

pub mod codec;
pub mod error;
pub mod error_ext;
pub mod pipeline;

pub use codec::{CodecError, OutputFormat};
pub use error::{Access, ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use pipeline::{merge_documents, DocumentPipeline, MergeOptions};
