//! The `config` module reads a list of top-level nodes from YAML or JSON.

use serde::{Deserialize, Serialize};

use super::error::{Result, TreeError};
use super::node::Node;

/// Top-level nodes of a temporary tree, in creation order.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Configuration(pub Vec<Node>);

impl Configuration {
    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.0
    }
}

impl From<Vec<Node>> for Configuration {
    fn from(nodes: Vec<Node>) -> Self {
        Configuration(nodes)
    }
}

/// The configuration parser
/// The configuration can be in the form of a string in YAML or JSON format:
///
/// # YAML Example
///
/// ```rust
/// # use temptree::{parse_config, dir, file, Configuration};
/// let conf_str = "---
///   - !directory
///       name: root
///       content:
///         - !file
///             name: a
///         - !directory
///             name: bar
///             content:
///               - !file
///                   name: b
/// ";
/// let expected = Configuration(vec![dir("root", [file("a"), dir("bar", [file("b")])])]);
/// assert_eq!(expected, parse_config(conf_str).unwrap());
/// ```
///
/// ## JSON Example
///
/// ```rust
/// # use temptree::{parse_config, file, Configuration};
/// let conf_str = "[{\"file\":{\"name\":\"a\"}}]";
/// assert_eq!(Configuration(vec![file("a")]), parse_config(conf_str).unwrap());
/// ```
pub fn parse_config(config_str: &str) -> Result<Configuration> {
    // detect format, parse and return config instance
    match config_str.trim_start().chars().next() {
        Some('{') | Some('[') => Ok(serde_json::from_str(config_str)?),
        Some(_) => Ok(serde_yaml::from_str(config_str)?),
        None => Err(TreeError::empty_tree()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temptree::node::{dir, empty_dir, file};

    #[test]
    fn empty_config_fails() {
        assert!(parse_config("").unwrap_err().is_empty_tree());
        assert!(parse_config(" \n\t").unwrap_err().is_empty_tree());
    }

    #[test]
    fn parser_should_accept_json_correct_simple_config() {
        assert_eq!(
            parse_config("[{\"directory\":{\"name\": \".\",\"content\": []}}]").unwrap(),
            Configuration(vec![empty_dir(".")]),
        );
    }

    #[test]
    fn parser_should_accept_yaml_with_several_top_level_nodes() {
        let conf_str = "
    - !file
        name: f1
    - !directory
        name: d2
        content:
          - !file
              name: f3
          - !directory
              name: d4
    ";
        assert_eq!(
            parse_config(conf_str).unwrap(),
            Configuration(vec![file("f1"), dir("d2", [file("f3"), empty_dir("d4")])]),
        );
    }

    #[test]
    fn parser_should_accept_yaml_indented_from_the_first_line() {
        let conf_str = "  - !file\n      name: f1\n  - !file\n      name: f2\n";
        assert_eq!(
            parse_config(conf_str).unwrap(),
            Configuration(vec![file("f1"), file("f2")]),
        );
    }

    #[test]
    fn parser_should_accept_json_after_leading_whitespace() {
        assert_eq!(
            parse_config("\n   [{\"file\":{\"name\":\"a\"}}]").unwrap(),
            Configuration(vec![file("a")]),
        );
    }

    #[test]
    fn serialization_for_simple_yaml_config() {
        let conf = Configuration(vec![empty_dir(".")]);

        assert_eq!(
            String::from("- !directory\n  name: .\n  content: []\n"),
            serde_yaml::to_string(&conf).unwrap(),
        );
    }

    #[test]
    fn broken_yaml_is_reported() {
        let res = parse_config("- !link\n    name: x\n");
        assert!(matches!(res, Err(TreeError::ParseYaml(_))));
    }

    #[test]
    fn broken_json_is_reported() {
        let res = parse_config("[{\"file\":");
        assert!(matches!(res, Err(TreeError::ParseJson(_))));
    }
}
