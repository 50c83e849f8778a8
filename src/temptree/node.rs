use serde::{Deserialize, Serialize};
use std::fmt;

/// A file or a directory of a temporary tree.
///
/// A file never has content; a directory with no content is an empty directory.
/// Serialized with the same tags as the sandbox configuration:
///
/// ## yaml:
///
/// ```yaml
/// ---
///   - !directory
///       name: root
///       content:
///         - !file
///             name: a
///         - !directory
///             name: empty
/// ```
///
/// ## json:
///
/// ```json
/// [
///     {
///         "directory": {
///             "name": "root",
///             "content": [
///                 { "file": { "name": "a" } },
///                 { "directory": { "name": "empty", "content": [] } }
///             ]
///         }
///     }
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    File {
        name: String,
    },
    Directory {
        name: String,
        #[serde(default)]
        content: Vec<Node>,
    },
}

/// Creates a file node.
pub fn file(name: impl Into<String>) -> Node {
    Node::File { name: name.into() }
}

/// Creates a directory node with the given children.
/// No children means an empty directory, never a file.
pub fn dir<I>(name: impl Into<String>, children: I) -> Node
where
    I: IntoIterator<Item = Node>,
{
    Node::Directory {
        name: name.into(),
        content: children.into_iter().collect(),
    }
}

/// Creates a directory node without children.
pub fn empty_dir(name: impl Into<String>) -> Node {
    dir(name, Vec::<Node>::new())
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File { name } | Node::Directory { name, .. } => name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File { .. })
    }

    /// Children of a directory. Files have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::File { .. } => &[],
            Node::Directory { content, .. } => content,
        }
    }

    /// Renders the node the way it would be written with the builder functions,
    /// e.g. `D("root", F("a"), D("empty"))`.
    pub fn builder_expr(&self) -> String {
        match self {
            Node::File { name } => format!("F({:?})", name),
            Node::Directory { name, content } => {
                let mut expr = format!("D({:?}", name);
                for child in content {
                    expr.push_str(", ");
                    expr.push_str(&child.builder_expr());
                }
                expr.push(')');
                expr
            }
        }
    }

    /// One line per node, `(d)` or `(f)` before the name, two spaces per level:
    ///
    /// ```text
    /// (d) root
    ///   (f) f1
    ///   (d) d2
    ///     (f) f3
    /// ```
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, "");
        out
    }

    fn write_outline(&self, out: &mut String, indent: &str) {
        let kind = if self.is_dir() { "(d)" } else { "(f)" };
        out.push_str(&format!("{}{} {}\n", indent, kind, self.name()));

        let child_indent = format!("{}  ", indent);
        for child in self.children() {
            child.write_outline(out, &child_indent);
        }
    }
}

/// Compact form: a file is its bare name, a directory is `name[child child]`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::File { name } => write!(f, "{}", name),
            Node::Directory { name, content } => {
                write!(f, "{}[", name)?;
                for (i, child) in content.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, "]")
            }
        }
    }
}
