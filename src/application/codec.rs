//! Decoding sources into document trees and encoding the merged tree
//!
//! JSON is accepted as YAML flow syntax, so a single YAML decoder handles both.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

use crate::domain::{Node, Scalar};

/// Default number of spaces per JSON indentation level.
pub const DEFAULT_JSON_INDENT: usize = 4;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("json: unsupported value: {0}")]
    UnsupportedValue(String),
}

/// Serialization format of the merged document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    /// Format implied by an output file name: `.json` (any case) selects JSON.
    pub fn for_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.eq_ignore_ascii_case("json"))
            .map(|_| OutputFormat::Json)
    }
}

/// Decode the first document of a YAML or JSON byte stream.
///
/// Returns `Ok(None)` for input without any document (empty or comments only),
/// which is different from a document holding an explicit `null`.
pub fn decode(bytes: &[u8]) -> Result<Option<Node>, CodecError> {
    if !has_document(&String::from_utf8_lossy(bytes)) {
        return Ok(None);
    }
    match serde_yaml::Deserializer::from_slice(bytes).next() {
        None => Ok(None),
        Some(document) => Ok(Some(Node::deserialize(document)?)),
    }
}

/// Records whether the event stream opened a document.
#[derive(Default)]
struct DocumentDetector {
    found: bool,
}

impl MarkedEventReceiver for DocumentDetector {
    fn on_event(&mut self, ev: Event, _marker: Marker) {
        if let Event::DocumentStart = ev {
            self.found = true;
        }
    }
}

/// Whether the stream holds at least one document, explicit (`---`) or implicit.
///
/// Syntax errors count as content; the decoder reports them.
fn has_document(text: &str) -> bool {
    let mut detector = DocumentDetector::default();
    match Parser::new_from_str(text).load(&mut detector, false) {
        Ok(()) => detector.found,
        Err(_) => true,
    }
}

/// Encode a document tree.
///
/// JSON output is indented with `json_indent` spaces and ends with a newline.
pub fn encode(node: &Node, format: OutputFormat, json_indent: usize) -> Result<Vec<u8>, CodecError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(node)?.into_bytes()),
        OutputFormat::Json => encode_json(node, json_indent),
    }
}

fn encode_json(node: &Node, json_indent: usize) -> Result<Vec<u8>, CodecError> {
    ensure_json_representable(node)?;

    let indent = vec![b' '; json_indent];
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    node.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// JSON has no spelling for NaN or infinities; refuse them instead of writing `null`.
fn ensure_json_representable(node: &Node) -> Result<(), CodecError> {
    let mut unsupported = None;
    node.walk(&mut |n| {
        if let Node::Scalar(Scalar::Float(x)) = n {
            if !x.is_finite() && unsupported.is_none() {
                unsupported = Some(*x);
            }
        }
    });
    match unsupported {
        Some(x) => Err(CodecError::UnsupportedValue(x.to_string())),
        None => Ok(()),
    }
}
