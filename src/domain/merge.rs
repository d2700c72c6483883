//! Merge engine
//!
//! Merge semantics, `into` has lower priority than `from`:
//! - Mappings: deep-merged by key, key set is the union of both sides
//! - Sequences: replaced, never concatenated
//! - Scalars: replaced
//! - Null in `from`: erases whatever `into` held, in any mode
//! - Kind mismatch: `from` wins, or an error in strict mode

use crate::domain::{DomainError, DomainResult, Mapping, Node};

/// Merge `from` into `into`.
///
/// `None` stands for "no node yet". An absent or null `into` yields `from`
/// unchanged. An absent `from` against a present `into` yields an explicit null.
///
/// # Errors
/// In strict mode, returns [`DomainError::KindMismatch`] for the first pair of
/// nodes of different kinds found at the same path.
pub fn merge(into: Option<Node>, from: Option<Node>, strict: bool) -> DomainResult<Option<Node>> {
    match from {
        Some(from) => merge_node(into, from, strict).map(Some),
        None => Ok(match into {
            Some(into) if !into.is_null() => Some(Node::null()),
            _ => None,
        }),
    }
}

/// Fold documents left to right, later documents taking priority.
///
/// Returns `None` when `docs` is empty.
pub fn merge_all<I>(docs: I, strict: bool) -> DomainResult<Option<Node>>
where
    I: IntoIterator<Item = Node>,
{
    docs.into_iter()
        .try_fold(None, |merged, doc| merge(merged, Some(doc), strict))
}

fn merge_node(into: Option<Node>, from: Node, strict: bool) -> DomainResult<Node> {
    let into = match into {
        Some(into) if !into.is_null() => into,
        _ => return Ok(from),
    };
    if from.is_null() {
        return Ok(from);
    }

    match (into, from) {
        (Node::Scalar(_), from @ Node::Scalar(_)) => Ok(from),
        (Node::Sequence(_), from @ Node::Sequence(_)) => Ok(from),
        (Node::Mapping(into), Node::Mapping(from)) => {
            merge_mapping(into, from, strict).map(Node::Mapping)
        }
        (into, from) if strict => Err(DomainError::KindMismatch {
            from: from.kind(),
            into: into.kind(),
        }),
        // Non-strict: kinds differ, the higher-priority value is kept as is.
        (_, from) => Ok(from),
    }
}

/// Overlay every key of `from` onto `into`; keys only in `into` pass through.
fn merge_mapping(mut merged: Mapping, from: Mapping, strict: bool) -> DomainResult<Mapping> {
    for (key, value) in from {
        let existing = merged.remove(&key);
        let value = merge_node(existing, value, strict)?;
        merged.insert(key, value);
    }
    Ok(merged)
}
