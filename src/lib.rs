//! This library creates temporary trees of files and directories for tests.
//! A tree is described with a small indentation language, built in code, or read
//! from YAML or JSON. It is created in a fresh sandbox directory, used by the test,
//! and removed in one call once the work is done.
//!
//! ```rust
//! use temptree::EphemeralTree;
//!
//! let tree = EphemeralTree::from_descriptor(
//!     "
//!     + root
//!       + bar
//!         - a
//!       - b
//!     ",
//! )
//! .unwrap();
//!
//! assert!(tree.path().join("root/bar/a").is_file());
//! tree.remove().unwrap();
//! ```

pub mod temptree;

pub use temptree::config::{parse_config, Configuration};
pub use temptree::descriptor::{parse, render, DescriptorStyle};
pub use temptree::ephemeral_tree::{EphemeralTree, EphemeralTreeBuilder};
pub use temptree::error::{Result, TreeError};
pub use temptree::node::{dir, empty_dir, file, Node};
pub use temptree::scan::{describe, scan};

pub use temptree_macro::temptree_test;
