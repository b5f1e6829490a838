//! Virtual filesystem for the web CLI.
//!
//! The whole filesystem is one owned tree of [`VNode`]s rooted at `/`.
//! Directory entries keep insertion order so listings come out the way
//! the entries were created. Paths are resolved syntactically by
//! [`path::normalize`] and then walked through the tree by [`FileTree`].

mod fixture;
mod node;
pub mod path;
mod tree;

pub use fixture::seed;
pub use node::{DIR_SIZE, Entries, VNode};
pub use tree::FileTree;
