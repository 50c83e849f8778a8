//! TreeError is used to report failures while describing, building, or removing a temporary tree.
use std::{fmt, io, path::PathBuf};

/// Shortcut for results returned by this crate.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Tree description and sandbox error
#[derive(Debug)]
pub enum TreeError {
    /// The description has no non-blank lines.
    EmptyTree,
    /// The first described entry is a file.
    RootMustBeDirectory { line: String },
    /// A non-blank line without a `+`/`-` marker or without a name.
    MalformedLine { line: String },
    /// A line whose indentation does not match any open directory.
    MalformedIndentation { line: String, depth: usize },
    /// The configured base directory does not exist.
    BaseDirNotFound { path: PathBuf },
    Io(io::Error),
    ParseYaml(serde_yaml::Error),
    ParseJson(serde_json::Error),
}

impl TreeError {
    pub fn empty_tree() -> Self {
        TreeError::EmptyTree
    }

    pub fn root_must_be_directory(line: &str) -> Self {
        TreeError::RootMustBeDirectory {
            line: line.to_string(),
        }
    }

    pub fn malformed_line(line: &str) -> Self {
        TreeError::MalformedLine {
            line: line.to_string(),
        }
    }

    pub fn malformed_indentation(line: &str, depth: usize) -> Self {
        TreeError::MalformedIndentation {
            line: line.to_string(),
            depth,
        }
    }

    pub fn is_empty_tree(&self) -> bool {
        matches!(self, TreeError::EmptyTree)
    }

    pub fn is_root_must_be_directory(&self) -> bool {
        matches!(self, TreeError::RootMustBeDirectory { .. })
    }

    pub fn is_malformed_line(&self) -> bool {
        matches!(self, TreeError::MalformedLine { .. })
    }

    pub fn is_malformed_indentation(&self) -> bool {
        matches!(self, TreeError::MalformedIndentation { .. })
    }

    pub fn is_base_dir_not_found(&self) -> bool {
        matches!(self, TreeError::BaseDirNotFound { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, TreeError::Io(_))
    }

    /// Kind of the wrapped io error, if any.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            TreeError::Io(err) => Some(err.kind()),
            _ => None,
        }
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TreeError::EmptyTree => write!(f, "The tree description is empty."),
            TreeError::RootMustBeDirectory { line } => {
                write!(f, "The root {:?} must be a directory.", line)
            }
            TreeError::MalformedLine { line } => {
                write!(f, "The line {:?} does not describe a file or directory.", line)
            }
            TreeError::MalformedIndentation { line, depth } => write!(
                f,
                "The line {:?} at depth {} does not match the indentation of any open directory.",
                line, depth
            ),
            TreeError::BaseDirNotFound { path } => {
                write!(f, "Base directory {} not found!", path.display())
            }
            TreeError::Io(err) => write!(f, "{}", err),
            TreeError::ParseYaml(err) => write!(f, "{}", err),
            TreeError::ParseJson(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Io(err) => Some(err),
            TreeError::ParseYaml(err) => Some(err),
            TreeError::ParseJson(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TreeError {
    fn from(err: io::Error) -> TreeError {
        TreeError::Io(err)
    }
}

impl From<walkdir::Error> for TreeError {
    fn from(err: walkdir::Error) -> TreeError {
        TreeError::Io(err.into())
    }
}

impl From<serde_yaml::Error> for TreeError {
    fn from(err: serde_yaml::Error) -> TreeError {
        TreeError::ParseYaml(err)
    }
}

impl From<serde_json::Error> for TreeError {
    /// Io failures inside the json reader stay io errors.
    fn from(err: serde_json::Error) -> TreeError {
        use serde_json::error::Category;

        match err.classify() {
            Category::Io => TreeError::Io(err.into()),
            Category::Syntax | Category::Data | Category::Eof => TreeError::ParseJson(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_error_reports_raw_line() {
        let err = TreeError::root_must_be_directory("  - root");
        assert!(err.is_root_must_be_directory());
        assert_eq!(err.to_string(), "The root \"  - root\" must be a directory.");
    }

    #[test]
    fn io_error_keeps_its_kind_and_source() {
        let err: TreeError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert!(err.is_io());
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn json_syntax_error_is_parse_json() {
        let err: TreeError = serde_json::from_str::<Vec<u8>>("[1,").unwrap_err().into();
        assert!(matches!(err, TreeError::ParseJson(_)));
    }
}
