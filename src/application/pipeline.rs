//! Document pipeline
//!
//! Decodes sources in order, folds them through the merge engine and
//! serializes the result.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::codec::{self, OutputFormat, DEFAULT_JSON_INDENT};
use crate::application::{Access, ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{merge, Node};
use crate::infrastructure::traits::FileSystem;

/// How documents are merged and written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Fail on kind mismatches instead of letting the later document win
    pub strict: bool,
    pub format: OutputFormat,
    /// Spaces per level for JSON output
    pub json_indent: usize,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            strict: false,
            format: OutputFormat::Yaml,
            json_indent: DEFAULT_JSON_INDENT,
        }
    }
}

/// Deep-merge any number of YAML/JSON sources, later sources taking priority.
///
/// Sources without content (empty or comment-only) are skipped. When no source
/// has content the result is an empty buffer rather than a serialized `null`.
///
/// # Errors
/// Stops at the first failure: an unreadable or undecodable source (with its
/// 0-based index), a strict-mode kind mismatch, or a serialization error.
#[instrument(level = "debug", skip(sources))]
pub fn merge_documents<I, R>(options: &MergeOptions, sources: I) -> ApplicationResult<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: Read,
{
    let mut merged: Option<Node> = None;
    let mut has_content = false;

    for (index, mut source) in sources.into_iter().enumerate() {
        let mut bytes = Vec::new();
        source
            .read_to_end(&mut bytes)
            .map_err(|source| ApplicationError::Read { index, source })?;

        let Some(document) = codec::decode(&bytes).map_err(|e| ApplicationError::Decode {
            index,
            message: e.to_string(),
        })?
        else {
            debug!(index, "source has no content, skipping");
            continue;
        };

        has_content = true;
        merged = merge(merged, Some(document), options.strict)?;
        debug!(index, "merged source");
    }

    if !has_content {
        debug!("no source had content");
        return Ok(Vec::new());
    }

    let merged = merged.unwrap_or_else(Node::null);
    codec::encode(&merged, options.format, options.json_indent).map_err(|e| {
        ApplicationError::Serialize {
            message: e.to_string(),
        }
    })
}

/// Merges documents stored on a filesystem.
pub struct DocumentPipeline {
    fs: Arc<dyn FileSystem>,
}

impl DocumentPipeline {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Open every path, then merge them in the given order.
    ///
    /// All files are opened before any is decoded, so a missing file is
    /// reported before any merge error. Handles are closed on return.
    #[instrument(level = "debug", skip(self))]
    pub fn merge_files(
        &self,
        paths: &[PathBuf],
        options: &MergeOptions,
    ) -> ApplicationResult<Vec<u8>> {
        let sources = self.open_sources(paths, |_, _| {})?;
        merge_documents(options, sources)
    }

    /// Open every path for reading, calling `on_open` with the 0-based index
    /// and path of each file right after it opened.
    ///
    /// Stops at the first file that cannot be opened.
    pub fn open_sources(
        &self,
        paths: &[PathBuf],
        mut on_open: impl FnMut(usize, &Path),
    ) -> ApplicationResult<Vec<Box<dyn Read>>> {
        let mut sources = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            let source = self
                .fs
                .open_read(path)
                .with_path_context(Access::Reading, path)?;
            on_open(index, path);
            sources.push(source);
        }
        debug!("opened {} sources", sources.len());
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing;

    fn run(strict: bool, format: OutputFormat, inputs: &[&str]) -> ApplicationResult<String> {
        testing::init_test_setup();
        let options = MergeOptions {
            strict,
            format,
            ..MergeOptions::default()
        };
        let out = merge_documents(&options, inputs.iter().map(|s| s.as_bytes()))?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn given_only_empty_sources_when_merging_then_output_is_empty() {
        assert_eq!(run(false, OutputFormat::Yaml, &["", "# comment"]).unwrap(), "");
    }

    #[test]
    fn given_no_sources_when_merging_then_output_is_empty() {
        assert_eq!(run(true, OutputFormat::Json, &[]).unwrap(), "");
    }

    #[test]
    fn given_explicit_null_last_when_merging_then_erases_everything() {
        assert_eq!(run(true, OutputFormat::Yaml, &["a: 1", "null"]).unwrap(), "null\n");
    }

    #[test]
    fn given_empty_source_last_when_merging_then_keeps_previous() {
        assert_eq!(run(false, OutputFormat::Yaml, &["a: 1", ""]).unwrap(), "a: 1\n");
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "device went away"))
        }
    }

    #[test]
    fn given_unreadable_second_source_when_merging_then_read_error_with_index() {
        testing::init_test_setup();
        let sources: Vec<Box<dyn Read>> = vec![Box::new("a: 1".as_bytes()), Box::new(FailingReader)];

        let err = merge_documents(&MergeOptions::default(), sources).unwrap_err();

        assert!(matches!(err, ApplicationError::Read { index: 1, .. }));
        assert_eq!(
            err.to_string(),
            "couldn't read source (input file #1): device went away"
        );
        assert!(err.is_merge_failure());
    }

    #[test]
    fn given_malformed_second_source_when_merging_then_reports_index() {
        let err = run(false, OutputFormat::Yaml, &["a: 1", "{\"a\": 1"]).unwrap_err();
        assert!(matches!(err, ApplicationError::Decode { index: 1, .. }));
        assert!(err
            .to_string()
            .starts_with("couldn't decode source (input file #1): "));
    }

    #[test]
    fn given_strict_mismatch_when_merging_then_domain_error_verbatim() {
        let err = run(true, OutputFormat::Yaml, &["a: 1", "a: [1]"]).unwrap_err();
        assert_eq!(err.to_string(), "can't merge a sequence into a scalar");
        assert!(err.is_merge_failure());
    }

    #[test]
    fn given_json_format_when_merging_then_emits_indented_json() {
        let out = run(false, OutputFormat::Json, &["{\"a\": 1}", "{\"b\": 2}"]).unwrap();
        assert_eq!(out, "{\n    \"a\": 1,\n    \"b\": 2\n}\n");
    }
}
