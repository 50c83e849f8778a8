use futures::future::BoxFuture;
use futures::FutureExt;
use rand::Rng;
use std::env;
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs::{self, File};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use super::config::parse_config;
use super::descriptor::parse;
use super::error::{Result, TreeError};
use super::node::Node;

const BASE_DIR_VAR_NAME: &str = "TEMPTREE_BASE_DIR";
const DEFAULT_PREFIX: &str = "temptree_";
const MAX_ALLOCATION_ATTEMPTS: u32 = 16;

/// Settings for the sandbox directory an [`EphemeralTree`] is created in.
///
/// The base directory is taken from [`base_dir`](Self::base_dir), then from the
/// `TEMPTREE_BASE_DIR` environment variable, then from [`std::env::temp_dir`].
#[derive(Debug, Clone)]
pub struct EphemeralTreeBuilder {
    base_dir: Option<PathBuf>,
    prefix: String,
}

impl Default for EphemeralTreeBuilder {
    fn default() -> Self {
        EphemeralTreeBuilder {
            base_dir: None,
            prefix: String::from(DEFAULT_PREFIX),
        }
    }
}

impl EphemeralTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory the sandbox is created in. It must already exist.
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Start of the sandbox directory name; a random suffix follows it.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn resolve_base_dir(&self) -> Result<PathBuf> {
        let base_dir = match &self.base_dir {
            Some(base_dir) => base_dir.clone(),
            None => env::var_os(BASE_DIR_VAR_NAME)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
        };

        if !base_dir.is_dir() {
            return Err(TreeError::BaseDirNotFound { path: base_dir });
        }
        Ok(std::fs::canonicalize(&base_dir)?)
    }

    /// Allocates a fresh sandbox directory and creates `nodes` beneath it.
    ///
    /// The first failing creation stops the walk and its error is returned.
    /// Entries already created are not rolled back one by one, with one
    /// exception: no handle is returned to tear a failed build down with, so
    /// the whole sandbox root is deleted here before returning. A failure of
    /// that cleanup is only logged.
    pub fn materialize(self, nodes: Vec<Node>) -> Result<EphemeralTree> {
        let base_dir = self.resolve_base_dir()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let root = runtime.block_on(allocate_root(&base_dir, &self.prefix))?;
        debug!(root = %root.display(), "allocated sandbox root");

        if let Err(error) = runtime.block_on(build_nodes(&nodes, &root)) {
            if let Err(cleanup_error) = remove_root(&root) {
                warn!(
                    root = %root.display(),
                    error = %cleanup_error,
                    "failed to delete half-built sandbox"
                );
            }
            return Err(error);
        }

        Ok(EphemeralTree {
            nodes,
            root,
            armed: true,
        })
    }

    /// Parses a descriptor and materializes its root.
    pub fn materialize_descriptor(self, descriptor: &str) -> Result<EphemeralTree> {
        let root = parse(descriptor)?;
        self.materialize(vec![root])
    }

    /// Reads a YAML or JSON configuration and materializes its nodes.
    pub fn materialize_config(self, config_str: &str) -> Result<EphemeralTree> {
        let config = parse_config(config_str)?;
        self.materialize(config.into_nodes())
    }
}

fn random_code() -> u64 {
    rand::rng().random::<u64>()
}

async fn allocate_root(base_dir: &Path, prefix: &str) -> Result<PathBuf> {
    for _ in 0..MAX_ALLOCATION_ATTEMPTS {
        let candidate = base_dir.join(format!("{}{:016x}", prefix, random_code()));
        // create_dir, not create_dir_all: an existing directory must never be reused
        match fs::create_dir(&candidate).await {
            Ok(()) => return Ok(candidate),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "no unused sandbox name found in {} after {} attempts",
            base_dir.display(),
            MAX_ALLOCATION_ATTEMPTS
        ),
    )
    .into())
}

async fn build_nodes(nodes: &[Node], parent_path: &Path) -> Result<()> {
    for node in nodes {
        build_node(node, parent_path).await?;
    }
    Ok(())
}

async fn build_node(node: &Node, parent_path: &Path) -> Result<()> {
    let path = parent_path.join(node.name());

    match node {
        Node::File { .. } => {
            File::create(&path).await?;
            trace!(path = %path.display(), "created file");
        }
        Node::Directory { content, .. } => {
            fs::create_dir(&path).await?;
            trace!(path = %path.display(), "created directory");
            for child in content {
                build_node_boxed(child, &path).await?;
            }
        }
    }
    Ok(())
}

fn build_node_boxed<'a>(node: &'a Node, parent_path: &'a Path) -> BoxFuture<'a, Result<()>> {
    async move { build_node(node, parent_path).await }.boxed()
}

/// Deletes the sandbox root recursively. A root which is already gone is not an error.
fn remove_root(root: &Path) -> Result<()> {
    match std::fs::remove_dir_all(root) {
        Ok(()) => {
            debug!(root = %root.display(), "removed sandbox root");
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!(root = %root.display(), "sandbox root already removed");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// A temporary tree of files and directories on disk.
///
/// The tree lives in a freshly allocated sandbox directory with a random name.
/// [`remove`](Self::remove) deletes the sandbox; a tree which is dropped without
/// being removed deletes it on drop and only logs a failure.
///
/// # Example of use in tests
///
/// ```rust
/// use temptree::{dir, file, EphemeralTree, TreeError};
///
/// fn check_layout() -> Result<(), TreeError> {
///     let tree = EphemeralTree::new(vec![dir("root", [file("a"), dir("bar", [file("b")])])])?;
///
///     tree.run(|sandbox| {
///         let meta = std::fs::metadata(sandbox.join("root/bar/b"))?;
///         assert_eq!(meta.len(), 0);
///         Ok(())
///     });
///
///     tree.remove()
/// }
/// # check_layout().unwrap();
/// ```
#[derive(Debug)]
pub struct EphemeralTree {
    nodes: Vec<Node>,
    root: PathBuf,
    armed: bool,
}

impl EphemeralTree {
    pub fn builder() -> EphemeralTreeBuilder {
        EphemeralTreeBuilder::new()
    }

    /// Creates `nodes` in a new sandbox under the default base directory.
    pub fn new(nodes: Vec<Node>) -> Result<EphemeralTree> {
        Self::builder().materialize(nodes)
    }

    pub fn from_descriptor(descriptor: &str) -> Result<EphemeralTree> {
        Self::builder().materialize_descriptor(descriptor)
    }

    pub fn from_config(config_str: &str) -> Result<EphemeralTree> {
        Self::builder().materialize_config(config_str)
    }

    /// Absolute path of the sandbox root. The top-level nodes are its children.
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The builder call which would produce this tree, e.g. `NewTree(F("f1"), D("d2"))`.
    pub fn builder_expr(&self) -> String {
        let nodes: Vec<String> = self.nodes.iter().map(Node::builder_expr).collect();
        format!("NewTree({})", nodes.join(", "))
    }

    /// Every path below the sandbox root, relative to it, sorted by name.
    pub fn entries(&self) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                entries.push(relative.to_path_buf());
            }
        }
        Ok(entries)
    }

    /// Runs a test against the sandbox root and panics if it returns an error.
    pub fn run<F>(&self, test_proc: F)
    where
        F: FnOnce(&Path) -> io::Result<()>,
    {
        if let Err(e) = test_proc(&self.root) {
            panic!("inner test has error: {}", e)
        }
    }

    /// Deletes the sandbox and everything in it.
    ///
    /// Succeeds when the sandbox has already been deleted by someone else.
    /// Other failures, such as missing permissions, are returned and the
    /// sandbox is left as it is.
    pub fn remove(mut self) -> Result<()> {
        self.armed = false;
        remove_root(&self.root)
    }
}

impl Drop for EphemeralTree {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = remove_root(&self.root) {
            warn!(root = %self.root.display(), error = %e, "failed to delete sandbox");
        }
    }
}
