use std::path::Path;

use zktree_format::{NodePath, NodeTree, ZNode};

use crate::error::{Error, Result};

pub fn parse_node_path(path: &str) -> Result<NodePath> {
    NodePath::new(path).map_err(|source| Error::InvalidNodePath {
        path: path.to_string(),
        source,
    })
}

/// Load a snapshot and flatten it below `znode`.
pub fn load_tree(snapshot: &Path, znode: &NodePath) -> Result<NodeTree> {
    let root = zktree_format::load_snapshot(snapshot).map_err(|source| Error::LoadSnapshot {
        path: snapshot.to_path_buf(),
        source,
    })?;

    match NodeTree::from_snapshot(&root, znode) {
        Ok(tree) => Ok(tree),
        Err(zktree_format::SnapshotError::NotFound(_)) => Err(Error::NodeNotFound {
            path: znode.to_string(),
        }),
        Err(source) => Err(Error::LoadSnapshot {
            path: snapshot.to_path_buf(),
            source,
        }),
    }
}

/// Format file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    use humansize::{BINARY, FormatSize};
    bytes.format_size(BINARY)
}

/// Short flag column: `d` has children, `e` ephemeral.
pub fn format_flags(node: &ZNode) -> String {
    let mut s = String::with_capacity(2);
    s.push(if node.has_children() { 'd' } else { '-' });
    s.push(if node.is_ephemeral() { 'e' } else { '-' });
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use zktree_format::Stat;

    #[test]
    fn flags() {
        let node = ZNode::new(
            NodePath::new("/a").unwrap(),
            &[],
            Stat {
                ephemeral_owner: 3,
                ..Stat::default()
            },
            vec![],
            true,
        );
        assert_eq!(format_flags(&node), "de");
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1024), "1 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3 MiB");
    }

    #[test]
    fn bad_node_path() {
        assert!(matches!(
            parse_node_path("relative/path"),
            Err(Error::InvalidNodePath { .. })
        ));
    }
}
