//! The owned filesystem tree and resolver.

use std::path::Path;

use serde::Deserialize;
use webcli_types::error::{Result, WebCliError};

use crate::node::{Entries, VNode};
use crate::path;

/// The filesystem: a single directory node representing `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTree {
    root: VNode,
}

/// Fixture documents may wrap the root in a `"/"` key or be the root node.
#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureDoc {
    Wrapped {
        #[serde(rename = "/")]
        root: VNode,
    },
    Bare(VNode),
}

impl FileTree {
    /// Wrap a root node. The root must be a directory.
    pub fn new(root: VNode) -> Result<Self> {
        if !root.is_dir() {
            return Err(WebCliError::Config("tree root must be a directory".into()));
        }
        Ok(Self { root })
    }

    /// The built-in sample tree.
    pub fn seeded() -> Self {
        Self {
            root: crate::seed(),
        }
    }

    /// Parse a JSON fixture.
    pub fn from_json(json: &str) -> Result<Self> {
        let root = match serde_json::from_str::<FixtureDoc>(json)? {
            FixtureDoc::Wrapped { root } | FixtureDoc::Bare(root) => root,
        };
        Self::new(root)
    }

    /// Read a JSON fixture from disk.
    pub fn load(file: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(file)?;
        let tree = Self::from_json(&text)?;
        log::info!(
            "loaded fixture {} ({} nodes)",
            file.display(),
            tree.root.node_count()
        );
        Ok(tree)
    }

    /// Serialize as a `{"/": ...}` document.
    pub fn to_json(&self) -> Result<String> {
        let mut doc = serde_json::Map::new();
        doc.insert("/".to_string(), serde_json::to_value(&self.root)?);
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    pub fn root(&self) -> &VNode {
        &self.root
    }

    /// Look up `input` relative to `cwd`.
    ///
    /// Every segment after normalization must name an entry of a
    /// directory; otherwise `None`. Never creates nodes.
    pub fn resolve(&self, cwd: &str, input: &str) -> Option<&VNode> {
        self.lookup(&path::absolute(cwd, input))
    }

    pub fn resolve_mut(&mut self, cwd: &str, input: &str) -> Option<&mut VNode> {
        self.lookup_mut(&path::absolute(cwd, input))
    }

    /// Look up an absolute path, walking segment by segment.
    pub fn lookup(&self, abs: &str) -> Option<&VNode> {
        path::segments(abs).try_fold(&self.root, |node, seg| node.entries()?.get(seg))
    }

    pub fn lookup_mut(&mut self, abs: &str) -> Option<&mut VNode> {
        path::segments(abs).try_fold(&mut self.root, |node, seg| {
            node.entries_mut()?.get_mut(seg)
        })
    }

    /// Entries of the directory at `abs`, or `None` if it is missing or a file.
    pub fn dir(&self, abs: &str) -> Option<&Entries> {
        self.lookup(abs)?.entries()
    }

    pub fn dir_mut(&mut self, abs: &str) -> Option<&mut Entries> {
        self.lookup_mut(abs)?.entries_mut()
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self {
            root: VNode::empty_dir(),
        }
    }
}
