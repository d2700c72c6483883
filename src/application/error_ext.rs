//! Extension traits for attaching file context to I/O results

use std::io;
use std::path::Path;

use crate::application::error::{Access, ApplicationError, ApplicationResult};

pub trait IoResultExt<T> {
    /// Turn an I/O failure into an [`ApplicationError::Open`] naming `path`.
    fn with_path_context(self, access: Access, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, access: Access, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Open {
            path: path.to_path_buf(),
            access,
            source,
        })
    }
}
