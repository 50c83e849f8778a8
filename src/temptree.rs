//! The `temptree` module describes trees of files and directories, builds them
//! in a temporary sandbox on disk and removes them again.

pub mod config;
pub mod descriptor;
pub mod ephemeral_tree;
pub mod error;
pub mod node;
pub mod scan;
