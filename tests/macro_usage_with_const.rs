use std::path::Path;

use temptree::temptree_test;

const TREE: &str = r#"
    + test
      + nested
        - deep.txt
    "#;

#[temptree_test(tree = TREE, base_dir = ".")]
fn tree_in_const_under_current_dir(sandbox: &Path) -> std::io::Result<()> {
    assert!(sandbox.starts_with(std::env::current_dir()?.canonicalize()?));
    assert!(sandbox.join("test/nested/deep.txt").is_file());
    Ok(())
}
