//! Reads an existing directory back into a [`Node`] tree.

use std::path::Path;
use walkdir::WalkDir;

use super::descriptor::{render, DescriptorStyle};
use super::error::Result;
use super::node::Node;

/// Builds the tree found at `path`. Children are sorted by name and
/// symbolic links are not followed, they are reported as files.
pub fn scan(path: impl AsRef<Path>) -> Result<Node> {
    // (name, content) of each directory on the way down
    let mut open: Vec<(String, Vec<Node>)> = Vec::new();

    for entry in WalkDir::new(path.as_ref()).sort_by_file_name() {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();

        while open.len() > entry.depth() {
            close_innermost(&mut open);
        }

        if entry.file_type().is_dir() {
            open.push((name, Vec::new()));
        } else if let Some((_, content)) = open.last_mut() {
            content.push(Node::File { name });
        } else {
            return Ok(Node::File { name });
        }
    }

    while open.len() > 1 {
        close_innermost(&mut open);
    }
    Ok(open
        .pop()
        .map(|(name, content)| Node::Directory { name, content })
        .unwrap_or_else(|| Node::Directory {
            name: path.as_ref().to_string_lossy().into_owned(),
            content: Vec::new(),
        }))
}

fn close_innermost(open: &mut Vec<(String, Vec<Node>)>) {
    if open.len() < 2 {
        return;
    }
    if let Some((name, content)) = open.pop() {
        if let Some((_, parent)) = open.last_mut() {
            parent.push(Node::Directory { name, content });
        }
    }
}

/// Descriptor text of the tree at `path`.
pub fn describe(path: impl AsRef<Path>, style: &DescriptorStyle) -> Result<String> {
    Ok(render(&scan(path)?, style))
}
