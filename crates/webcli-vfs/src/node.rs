//! Tree node model.

use std::fmt;
use std::ops::Index;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Entries of a directory, in insertion order.
///
/// Serialized as a JSON object whose key order is the listing order.
/// Directories are small, so lookups scan linearly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    items: Vec<(String, VNode)>,
}

impl Entries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|(n, _)| n == name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&VNode> {
        self.position(name).map(|i| &self.items[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut VNode> {
        self.position(name).map(|i| &mut self.items[i].1)
    }

    /// Insert or replace. A replaced entry keeps its position; a new one
    /// goes last. Returns the previous node.
    pub fn insert(&mut self, name: String, node: VNode) -> Option<VNode> {
        match self.position(&name) {
            Some(i) => Some(std::mem::replace(&mut self.items[i].1, node)),
            None => {
                self.items.push((name, node));
                None
            },
        }
    }

    /// Remove an entry, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<VNode> {
        self.position(name).map(|i| self.items.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &VNode)> {
        self.items.iter().map(|(n, v)| (n, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.items.iter().map(|(n, _)| n)
    }

    pub fn values(&self) -> impl Iterator<Item = &VNode> {
        self.items.iter().map(|(_, v)| v)
    }
}

impl Index<&str> for Entries {
    type Output = VNode;

    fn index(&self, name: &str) -> &VNode {
        match self.get(name) {
            Some(node) => node,
            None => panic!("no entry named {name:?}"),
        }
    }
}

impl FromIterator<(String, VNode)> for Entries {
    fn from_iter<I: IntoIterator<Item = (String, VNode)>>(iter: I) -> Self {
        let mut entries = Self::new();
        for (name, node) in iter {
            entries.insert(name, node);
        }
        entries
    }
}

impl Serialize for Entries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for (name, node) in &self.items {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Entries;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of entry names to nodes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Entries, A::Error> {
        let mut entries = Entries::new();
        while let Some((name, node)) = access.next_entry::<String, VNode>()? {
            entries.insert(name, node);
        }
        Ok(entries)
    }
}

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Size reported for directories by `ls -l`.
pub const DIR_SIZE: usize = 4096;

/// A node in the virtual filesystem.
///
/// Serialized with a `type` discriminator (`"directory"` / `"file"`) and
/// `contents` / `content` payloads, matching the JSON shape of fixture
/// files. Missing payloads deserialize as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VNode {
    Directory {
        #[serde(rename = "contents", default)]
        entries: Entries,
    },
    File {
        #[serde(default)]
        content: String,
    },
}

impl VNode {
    /// An empty directory.
    pub fn empty_dir() -> Self {
        Self::Directory {
            entries: Entries::new(),
        }
    }

    /// A file with the given content.
    pub fn file(content: impl Into<String>) -> Self {
        Self::File {
            content: content.into(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Directory entries, or `None` for a file.
    pub fn entries(&self) -> Option<&Entries> {
        match self {
            Self::Directory { entries } => Some(entries),
            Self::File { .. } => None,
        }
    }

    pub fn entries_mut(&mut self) -> Option<&mut Entries> {
        match self {
            Self::Directory { entries } => Some(entries),
            Self::File { .. } => None,
        }
    }

    /// File content, or `None` for a directory.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::File { content } => Some(content),
            Self::Directory { .. } => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::File { content } => Some(content),
            Self::Directory { .. } => None,
        }
    }

    /// Content length in UTF-16 code units for files, [`DIR_SIZE`] for
    /// directories. Characters outside the BMP count twice.
    pub fn size(&self) -> usize {
        match self {
            Self::File { content } => content.encode_utf16().count(),
            Self::Directory { .. } => DIR_SIZE,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        match self {
            Self::File { .. } => 1,
            Self::Directory { entries } => 1 + entries.values().map(Self::node_count).sum::<usize>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_defaults_to_empty_content() {
        let node: VNode = serde_json::from_str(r#"{"type":"file"}"#).unwrap();
        assert_eq!(node.content(), Some(""));
    }

    #[test]
    fn directory_defaults_to_empty_entries() {
        let node: VNode = serde_json::from_str(r#"{"type":"directory"}"#).unwrap();
        assert!(node.entries().unwrap().is_empty());
    }

    #[test]
    fn unknown_type_rejected() {
        let res = serde_json::from_str::<VNode>(r#"{"type":"symlink"}"#);
        assert!(res.is_err());
    }

    #[test]
    fn json_keeps_insertion_order() {
        let json = r#"{"type":"directory","contents":{
            "zeta":{"type":"file","content":"z"},
            "alpha":{"type":"directory","contents":{}},
            "mid":{"type":"file","content":""}}}"#;
        let node: VNode = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = node.entries().unwrap().keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn serializes_with_type_tag() {
        let v = serde_json::to_value(VNode::file("hi")).unwrap();
        assert_eq!(v["type"], "file");
        assert_eq!(v["content"], "hi");
        let v = serde_json::to_value(VNode::empty_dir()).unwrap();
        assert_eq!(v["type"], "directory");
        assert!(v["contents"].as_object().unwrap().is_empty());
    }

    #[test]
    fn replacing_keeps_position() {
        let mut e = Entries::new();
        e.insert("a".into(), VNode::file("1"));
        e.insert("b".into(), VNode::file("2"));
        let old = e.insert("a".into(), VNode::file("3"));
        assert_eq!(old, Some(VNode::file("1")));
        assert_eq!(e.keys().map(String::as_str).collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(e.remove("a"), Some(VNode::file("3")));
        assert!(!e.contains_key("a"));
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn sizes() {
        assert_eq!(VNode::file("abc").size(), 3);
        assert_eq!(VNode::file("h\u{e9}").size(), 2);
        assert_eq!(VNode::file("a\u{1f409}").size(), 3);
        assert_eq!(VNode::empty_dir().size(), DIR_SIZE);
    }

    #[test]
    fn clone_is_deep() {
        let mut original = VNode::empty_dir();
        original
            .entries_mut()
            .unwrap()
            .insert("f".into(), VNode::file("one"));
        let mut copy = original.clone();
        if let Some(VNode::File { content }) = copy.entries_mut().unwrap().get_mut("f") {
            content.push_str(" two");
        }
        assert_eq!(original.entries().unwrap()["f"].content(), Some("one"));
        assert_eq!(copy.entries().unwrap()["f"].content(), Some("one two"));
    }

    #[test]
    fn node_count_counts_subtree() {
        let mut d = VNode::empty_dir();
        let e = d.entries_mut().unwrap();
        e.insert("a".into(), VNode::file(""));
        e.insert("b".into(), VNode::empty_dir());
        assert_eq!(d.node_count(), 3);
    }
}
