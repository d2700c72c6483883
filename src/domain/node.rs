//! Document node model
//!
//! A parsed YAML or JSON document is a tree of three structural kinds:
//! mappings, sequences and scalars. The kind is fixed when the tree is
//! decoded and is read back as an enum discriminant.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::ser::{Serialize, Serializer};

/// Key/value pairs of a mapping node. Keys are kept sorted so that output is deterministic.
pub type Mapping = BTreeMap<String, Node>;

/// Leaf value of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::UInt(u) => write!(f, "{}", u),
            // Integral floats keep their fraction so `1.0` stays apart from `1`.
            Scalar::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Scalar => "scalar",
            Kind::Sequence => "sequence",
            Kind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

/// A document tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Sequence(Vec<Node>),
    Mapping(Mapping),
}

impl Node {
    /// An explicit null scalar.
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Node::Scalar(_) => Kind::Scalar,
            Node::Sequence(_) => Kind::Sequence,
            Node::Mapping(_) => Kind::Mapping,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    /// Look up a key if this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(mapping) => mapping.get(key),
            _ => None,
        }
    }

    /// Visit every node of the tree, parents before children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        match self {
            Node::Scalar(_) => {}
            Node::Sequence(items) => items.iter().for_each(|item| item.walk(visit)),
            Node::Mapping(mapping) => mapping.values().for_each(|value| value.walk(visit)),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Node::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Scalar(Scalar::Int(i))
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Node::Scalar(Scalar::Float(x))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Node::Mapping(mapping)
    }
}

/// Turn a decoded mapping key into its string form.
///
/// Scalar keys of any type are accepted (`1: a` has key `"1"`); collections are not.
fn mapping_key(key: Node) -> Result<String, String> {
    match key {
        Node::Scalar(Scalar::String(s)) => Ok(s),
        Node::Scalar(scalar) => Ok(scalar.to_string()),
        other => Err(format!("mapping key must be a scalar, found a {}", other.kind())),
    }
}

/// YAML merge key: `<<: *base` pulls the entries of `base` into the enclosing mapping.
const MERGE_KEY: &str = "<<";

fn duplicate_key<E: de::Error>(key: &str) -> E {
    de::Error::custom(format!("mapping key {:?} already defined", key))
}

/// Mappings named by a merge key, either one mapping or a sequence of them.
fn merge_key_sources(value: Node) -> Result<Vec<Mapping>, String> {
    let invalid = || "map merge requires map or sequence of maps as the value".to_string();
    match value {
        Node::Mapping(mapping) => Ok(vec![mapping]),
        Node::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Node::Mapping(mapping) => Ok(mapping),
                _ => Err(invalid()),
            })
            .collect(),
        Node::Scalar(_) => Err(invalid()),
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a YAML or JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::Scalar(Scalar::Bool(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::Scalar(Scalar::Int(v)))
    }

    // Decoders report non-negative integers as u64; keep them signed when they fit.
    fn visit_u64<E>(self, v: u64) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(match i64::try_from(v) {
            Ok(i) => Node::Scalar(Scalar::Int(i)),
            Err(_) => Node::Scalar(Scalar::UInt(v)),
        })
    }

    fn visit_i128<E>(self, v: i128) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(match i64::try_from(v) {
            Ok(i) => Node::Scalar(Scalar::Int(i)),
            Err(_) => Node::Scalar(Scalar::Float(v as f64)),
        })
    }

    fn visit_u128<E>(self, v: u128) -> Result<Node, E>
    where
        E: de::Error,
    {
        match u64::try_from(v) {
            Ok(u) => self.visit_u64(u),
            Err(_) => Ok(Node::Scalar(Scalar::Float(v as f64))),
        }
    }

    fn visit_f64<E>(self, v: f64) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::Scalar(Scalar::Float(v)))
    }

    fn visit_str<E>(self, v: &str) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::Scalar(Scalar::String(v.to_string())))
    }

    fn visit_string<E>(self, v: String) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::Scalar(Scalar::String(v)))
    }

    fn visit_unit<E>(self) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::null())
    }

    fn visit_none<E>(self) -> Result<Node, E>
    where
        E: de::Error,
    {
        Ok(Node::null())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        let mut merged: Option<Vec<Mapping>> = None;
        while let Some(key) = map.next_key::<Node>()? {
            let key = mapping_key(key).map_err(de::Error::custom)?;
            let value: Node = map.next_value()?;
            if key == MERGE_KEY {
                if merged.is_some() {
                    return Err(duplicate_key(&key));
                }
                merged = Some(merge_key_sources(value).map_err(de::Error::custom)?);
                continue;
            }
            if mapping.contains_key(&key) {
                return Err(duplicate_key(&key));
            }
            mapping.insert(key, value);
        }

        // Explicit keys win over merged ones; earlier merged mappings win over later ones.
        for source in merged.into_iter().flatten() {
            for (key, value) in source {
                mapping.entry(key).or_insert(value);
            }
        }
        Ok(Node::Mapping(mapping))
    }

    // Tagged YAML values (`!custom value`) keep their content, the tag is dropped.
    fn visit_enum<A>(self, data: A) -> Result<Node, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (_tag, content): (String, _) = data.variant()?;
        content.newtype_variant()
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::UInt(u) => serializer.serialize_u64(*u),
            Scalar::Float(x) => serializer.serialize_f64(*x),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Sequence(items) => serializer.collect_seq(items),
            Node::Mapping(mapping) => serializer.collect_map(mapping),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Result<Node, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    #[test]
    fn given_each_variant_when_kind_then_returns_matching_discriminant() {
        assert_eq!(Node::from(1).kind(), Kind::Scalar);
        assert_eq!(Node::null().kind(), Kind::Scalar);
        assert_eq!(Node::from(vec![Node::from(1)]).kind(), Kind::Sequence);
        assert_eq!(Node::from(Mapping::new()).kind(), Kind::Mapping);
    }

    #[test]
    fn given_kinds_when_displayed_then_uses_yaml_names() {
        assert_eq!(Kind::Scalar.to_string(), "scalar");
        assert_eq!(Kind::Sequence.to_string(), "sequence");
        assert_eq!(Kind::Mapping.to_string(), "mapping");
    }

    #[test]
    fn given_bare_n_when_decoding_then_stays_a_string() {
        let node = yaml("marker: n").unwrap();
        assert_eq!(node.get("marker"), Some(&Node::from("n")));
    }

    #[test]
    fn given_json_flow_mapping_when_decoding_then_builds_mapping() {
        let node = yaml(r#"{"one": 1, "list": [true, null, 1.5]}"#).unwrap();
        assert_eq!(node.get("one"), Some(&Node::from(1)));
        assert_eq!(
            node.get("list"),
            Some(&Node::from(vec![Node::from(true), Node::null(), Node::from(1.5)]))
        );
    }

    #[test]
    fn given_duplicate_key_when_decoding_then_reports_already_defined() {
        let err = yaml(r#"{"one": 1, "two": 2, "one": 99}"#).unwrap_err();
        assert!(err.to_string().contains("already defined"), "{}", err);
    }

    #[test]
    fn given_duplicate_key_in_nested_mapping_when_decoding_then_fails() {
        let err = yaml("outer:\n  a: 1\n  a: 2\n").unwrap_err();
        assert!(err.to_string().contains("mapping key \"a\" already defined"), "{}", err);
    }

    #[test]
    fn given_same_key_in_sibling_mappings_when_decoding_then_succeeds() {
        let node = yaml("a:\n  x: 1\nb:\n  x: 2\n").unwrap();
        assert_eq!(node.get("a").and_then(|a| a.get("x")), Some(&Node::from(1)));
        assert_eq!(node.get("b").and_then(|b| b.get("x")), Some(&Node::from(2)));
    }

    #[test]
    fn given_non_string_scalar_keys_when_decoding_then_keys_are_stringified() {
        let node = yaml("1: one\ntrue: yes\n").unwrap();
        assert_eq!(node.get("1"), Some(&Node::from("one")));
        assert_eq!(node.get("true"), Some(&Node::from("yes")));
    }

    #[test]
    fn given_integer_and_float_keys_when_decoding_then_keys_stay_distinct() {
        let node = yaml("1: int\n1.0: float\n2.5: fraction\n").unwrap();
        assert_eq!(node.get("1"), Some(&Node::from("int")));
        assert_eq!(node.get("1.0"), Some(&Node::from("float")));
        assert_eq!(node.get("2.5"), Some(&Node::from("fraction")));
    }

    #[test]
    fn given_integral_float_when_displayed_then_keeps_fraction() {
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float(-3.0).to_string(), "-3.0");
        assert_eq!(Scalar::Float(0.25).to_string(), "0.25");
        assert_eq!(Scalar::Float(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn given_merge_key_when_decoding_then_pulls_in_anchored_entries() {
        let node = yaml("base: &b\n  a: 1\n  c: 0\nderived:\n  <<: *b\n  c: 2\n").unwrap();
        let derived = node.get("derived").unwrap();
        assert_eq!(derived.get("a"), Some(&Node::from(1)));
        assert_eq!(derived.get("c"), Some(&Node::from(2)), "explicit key wins");
        assert_eq!(derived.get("<<"), None);
    }

    #[test]
    fn given_merge_key_sequence_when_decoding_then_earlier_mapping_wins() {
        let node = yaml("x: &x {a: 1}\ny: &y {a: 2, b: 2}\nz:\n  <<: [*x, *y]\n").unwrap();
        let z = node.get("z").unwrap();
        assert_eq!(z.get("a"), Some(&Node::from(1)));
        assert_eq!(z.get("b"), Some(&Node::from(2)));
    }

    #[test]
    fn given_merge_key_on_scalar_when_decoding_then_fails() {
        let err = yaml("a:\n  <<: 1\n").unwrap_err();
        assert!(err.to_string().contains("map merge requires map"), "{}", err);
    }

    #[test]
    fn given_tagged_value_when_decoding_then_keeps_content() {
        let node = yaml("secret: !vault abc\n").unwrap();
        assert_eq!(node.get("secret"), Some(&Node::from("abc")));
    }

    #[test]
    fn given_integers_when_decoding_then_signed_unless_too_large() {
        let node = yaml("small: 7\nnegative: -7\nhuge: 18446744073709551615\n").unwrap();
        assert_eq!(node.get("small"), Some(&Node::Scalar(Scalar::Int(7))));
        assert_eq!(node.get("negative"), Some(&Node::Scalar(Scalar::Int(-7))));
        assert_eq!(node.get("huge"), Some(&Node::Scalar(Scalar::UInt(u64::MAX))));
    }

    #[test]
    fn given_tree_when_walking_then_visits_every_node() {
        let node = yaml("a: [1, 2]\nb: {c: 3}\n").unwrap();
        let mut count = 0;
        node.walk(&mut |_| count += 1);
        // root, a, 1, 2, b, c
        assert_eq!(count, 6);
    }

    #[test]
    fn given_mapping_when_serialized_to_json_then_keys_are_sorted() {
        let node = yaml("b: 2\na: 1\n").unwrap();
        assert_eq!(serde_json::to_string(&node).unwrap(), r#"{"a":1,"b":2}"#);
    }
}
