//! The descriptor is a small indentation language for trees:
//!
//! ```text
//! + root-name
//!   + subdir-name
//!     - file-name
//!   - another-file
//! ```
//!
//! The leftmost `+` (directory) or `-` (file) of a line is its marker.
//! The column of the marker is the depth of the entry; the name follows the marker
//! and one delimiter character. Blank lines are ignored.

use std::collections::BTreeMap;

use super::error::{Result, TreeError};
use super::node::Node;

const DIR_MARKER: char = '+';
const FILE_MARKER: char = '-';

/// A single non-blank line of a descriptor.
#[derive(Debug, PartialEq, Eq)]
struct Entry<'a> {
    name: &'a str,
    is_dir: bool,
    depth: usize,
}

fn parse_line(line: &str) -> Result<Entry<'_>> {
    let (depth, (offset, marker)) = line
        .char_indices()
        .enumerate()
        .find(|(_, (_, c))| *c == DIR_MARKER || *c == FILE_MARKER)
        .ok_or_else(|| TreeError::malformed_line(line))?;

    // skip the marker and one delimiter
    let mut rest = line[offset + marker.len_utf8()..].chars();
    rest.next();
    let name = rest.as_str().trim();
    if name.is_empty() {
        return Err(TreeError::malformed_line(line));
    }

    Ok(Entry {
        name,
        is_dir: marker == DIR_MARKER,
        depth,
    })
}

/// A directory seen so far. Children point back into the list of directories.
struct DirSlot {
    name: String,
    /// Depth of the first child; every later child must share it.
    child_depth: Option<usize>,
    children: Vec<Slot>,
}

enum Slot {
    File(String),
    Dir(usize),
}

impl DirSlot {
    fn new(name: &str) -> Self {
        DirSlot {
            name: name.to_string(),
            child_depth: None,
            children: Vec::new(),
        }
    }
}

fn assemble(dirs: &mut [DirSlot], index: usize) -> Node {
    let name = std::mem::take(&mut dirs[index].name);
    let children = std::mem::take(&mut dirs[index].children);
    let content = children
        .into_iter()
        .map(|slot| match slot {
            Slot::File(name) => Node::File { name },
            Slot::Dir(child) => assemble(dirs, child),
        })
        .collect();

    Node::Directory { name, content }
}

/// Parses a descriptor into its root directory.
///
/// The parent of an entry is the most recently seen directory at the closest
/// shallower depth any directory was seen at. With one column per level this is
/// the directory at depth `d - 1`. All children of one directory share one depth;
/// an entry with no directory above it, or deeper or shallower than the
/// children already placed in its parent, is malformed.
///
/// ```rust
/// # use temptree::{parse, dir, file};
/// let root = parse(
///     "
///     + foo
///       + d1
///         - f2
///       + d3
///         - f4
///     ",
/// )
/// .unwrap();
/// assert_eq!(root, dir("foo", [dir("d1", [file("f2")]), dir("d3", [file("f4")])]));
/// assert_eq!(root.to_string(), "foo[d1[f2] d3[f4]]");
/// ```
pub fn parse(text: &str) -> Result<Node> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let first = lines.next().ok_or_else(TreeError::empty_tree)?;
    let root = parse_line(first)?;
    if !root.is_dir {
        return Err(TreeError::root_must_be_directory(first));
    }

    let mut dirs = vec![DirSlot::new(root.name)];
    // depth -> most recently seen directory at that depth
    let mut latest: BTreeMap<usize, usize> = BTreeMap::new();
    latest.insert(root.depth, 0);

    for line in lines {
        let entry = parse_line(line)?;

        let parent = match latest.range(..entry.depth).next_back() {
            Some((_, &index)) => index,
            None => return Err(TreeError::malformed_indentation(line, entry.depth)),
        };
        let slot = &mut dirs[parent];
        match slot.child_depth {
            None => slot.child_depth = Some(entry.depth),
            Some(depth) if depth == entry.depth => {}
            Some(_) => return Err(TreeError::malformed_indentation(line, entry.depth)),
        }

        if entry.is_dir {
            let index = dirs.len();
            dirs.push(DirSlot::new(entry.name));
            dirs[parent].children.push(Slot::Dir(index));
            latest.insert(entry.depth, index);
        } else {
            dirs[parent]
                .children
                .push(Slot::File(entry.name.to_string()));
        }
    }

    Ok(assemble(&mut dirs, 0))
}

/// How [`render`] writes each line: `prefix`, `indent` once per level, the marker, the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorStyle {
    pub prefix: String,
    pub indent: String,
    pub dir_marker: String,
    pub file_marker: String,
}

impl Default for DescriptorStyle {
    fn default() -> Self {
        DescriptorStyle {
            prefix: String::new(),
            indent: String::from("  "),
            dir_marker: String::from("+ "),
            file_marker: String::from("- "),
        }
    }
}

/// Writes `node` as a descriptor, one line per entry in pre-order.
pub fn render(node: &Node, style: &DescriptorStyle) -> String {
    let mut out = String::new();
    render_into(&mut out, node, style, 0);
    out
}

fn render_into(out: &mut String, node: &Node, style: &DescriptorStyle, level: usize) {
    let marker = if node.is_dir() {
        &style.dir_marker
    } else {
        &style.file_marker
    };
    out.push_str(&style.prefix);
    out.push_str(&style.indent.repeat(level));
    out.push_str(marker);
    out.push_str(node.name());
    out.push('\n');

    for child in node.children() {
        render_into(out, child, style, level + 1);
    }
}

impl Node {
    /// Descriptor text of this node in the default style, readable by [`parse`].
    pub fn to_descriptor(&self) -> String {
        render(self, &DescriptorStyle::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temptree::node::{dir, empty_dir, file};
    use rstest::rstest;

    #[rstest]
    #[case("+ foo", dir("foo", Vec::<Node>::new()))]
    #[case(
        "
        \t\t\t\t+ bar
        \t\t\t\t\t+ d1
        \t\t\t\t\t\t- f2
        \t\t\t\t\t+ d3
        \t\t\t\t\t\t- f4
        ",
        dir("bar", [dir("d1", [file("f2")]), dir("d3", [file("f4")])])
    )]
    #[case(
        "
        + baz
          + d1
            - f2
            - f3
          + d4
            + d5
              + d6
            - f7
          - f8
        ",
        dir(
            "baz",
            [
                dir("d1", [file("f2"), file("f3")]),
                dir("d4", [dir("d5", [empty_dir("d6")]), file("f7")]),
                file("f8"),
            ]
        )
    )]
    #[case(
        "+ r\n\t+ a\n\t- x\n\t\t- y\n",
        dir("r", [dir("a", [file("y")]), file("x")])
    )]
    #[case(
        "+ r\n + a\n  + b\n + c\n   - z\n",
        dir("r", [dir("a", [dir("b", [file("z")])]), empty_dir("c")])
    )]
    fn parses_nested_descriptors(#[case] text: &str, #[case] expected: Node) {
        assert_eq!(parse(text).unwrap(), expected);
    }

    #[test]
    fn siblings_at_same_depth_are_not_nested() {
        let root = parse("+ foo\n  + d1\n    - f2\n  + d3\n    - f4\n").unwrap();
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.children()[0], dir("d1", [file("f2")]));
        assert_eq!(root.children()[1], dir("d3", [file("f4")]));
    }

    #[test]
    fn blank_lines_are_ignored() {
        let root = parse("\n+ r\n\n   \n  - a\n\t\n  - b\n").unwrap();
        assert_eq!(root, dir("r", [file("a"), file("b")]));
    }

    #[test]
    fn parse_is_deterministic() {
        let text = "+ r\n  + d\n    - x\n  - y\n";
        assert_eq!(parse(text).unwrap(), parse(text).unwrap());
    }

    #[rstest]
    #[case("")]
    #[case("   \n\n")]
    fn empty_descriptor_fails(#[case] text: &str) {
        assert!(parse(text).unwrap_err().is_empty_tree());
    }

    #[test]
    fn file_root_fails_with_raw_line() {
        match parse("- root") {
            Err(TreeError::RootMustBeDirectory { line }) => assert_eq!(line, "- root"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn leftmost_marker_wins() {
        let root = parse("+ a-b\n  - c+d\n").unwrap();
        assert_eq!(root, dir("a-b", [file("c+d")]));

        assert!(parse("- a+b").unwrap_err().is_root_must_be_directory());
    }

    #[test]
    fn exactly_one_delimiter_is_skipped() {
        assert_eq!(parse("+   spaced  ").unwrap().name(), "spaced");
        assert_eq!(parse("+_name").unwrap().name(), "name");
    }

    #[rstest]
    #[case("no marker here")]
    #[case("+")]
    #[case("+ ")]
    fn malformed_lines_fail(#[case] text: &str) {
        assert!(parse(text).unwrap_err().is_malformed_line());
    }

    #[rstest]
    #[case::second_root("+ r\n+ other\n")]
    #[case::shallower_than_root("  + r\n- f\n")]
    #[case::deeper_than_any_directory("+ r\n  - f\n      - g\n")]
    #[case::unknown_dedent("+ r\n    + d\n        - f\n  - g\n")]
    fn malformed_indentation_fails(#[case] text: &str) {
        assert!(parse(text).unwrap_err().is_malformed_indentation());
    }

    #[test]
    fn root_depth_is_the_baseline() {
        let root = parse("      + r\n        - f\n").unwrap();
        assert_eq!(root, dir("r", [file("f")]));
    }

    #[test]
    fn render_uses_style() {
        let node = dir("root", [file("a"), dir("bar", [file("b")])]);
        assert_eq!(node.to_descriptor(), "+ root\n  - a\n  + bar\n    - b\n");

        let style = DescriptorStyle {
            prefix: String::from("> "),
            indent: String::from("\t"),
            dir_marker: String::from("[d] "),
            file_marker: String::from("[f] "),
        };
        assert_eq!(
            render(&node, &style),
            "> [d] root\n> \t[f] a\n> \t[d] bar\n> \t\t[f] b\n"
        );
    }

    #[test]
    fn rendered_descriptor_parses_back() {
        let node = dir(
            "root",
            [file("a"), dir("bar", [file("a"), file("b")]), empty_dir("e")],
        );
        let parsed = parse(&node.to_descriptor()).unwrap();
        assert_eq!(parsed, node);
        assert_eq!(parsed.to_string(), node.to_string());
    }
}
