//! JSON snapshots of a node tree.
//!
//! A snapshot is the root node as a JSON object. Every node may carry a text
//! payload (`data`) or a binary one (`dataHex`), a `stat` object, an `acl` list and a
//! `children` object keyed by node name:
//!
//! ```json
//! {
//!   "children": {
//!     "app": {
//!       "data": "v1",
//!       "stat": { "czxid": 2, "ephemeralOwner": 0 },
//!       "children": { "lock": { "dataHex": "00ff", "stat": { "ephemeralOwner": 7 } } }
//!     }
//!   }
//! }
//! ```
//!
//! When `stat` is missing, `dataLength` and `numChildren` are derived from the node
//! itself, capped at `i32::MAX`. When `acl` is missing the node is open to `world:anyone`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::node::ZNode;
use crate::path::{IntoNodePathError, NodePath};
use crate::record::{Acl, Stat};
use crate::tree::NodeTree;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Reading snapshot failed. Path: '{}'", .1.display())]
    Read(#[source] std::io::Error, PathBuf),

    #[error("Parsing snapshot failed")]
    Parse(#[source] serde_json::Error),

    #[error("Invalid node name. Name: '{}'", .1)]
    InvalidName(#[source] IntoNodePathError, String),

    #[error("Invalid hex payload. Node: '{}'", .1)]
    InvalidHex(#[source] hex::FromHexError, NodePath),

    #[error("Node not found in snapshot. Node: '{}'", .0)]
    NotFound(NodePath),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stat: Option<Stat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acl: Option<Vec<Acl>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, SnapshotNode>,
}

fn saturating_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

impl SnapshotNode {
    fn payload(&self, path: &NodePath) -> Result<Vec<u8>, SnapshotError> {
        match (&self.data_hex, &self.data) {
            (Some(encoded), _) => {
                hex::decode(encoded).map_err(|e| SnapshotError::InvalidHex(e, path.clone()))
            }
            (None, Some(text)) => Ok(text.as_bytes().to_vec()),
            (None, None) => Ok(vec![]),
        }
    }

    fn to_node(&self, path: NodePath) -> Result<ZNode, SnapshotError> {
        let data = self.payload(&path)?;
        let stat = match &self.stat {
            Some(stat) => stat.clone(),
            None => Stat {
                data_length: saturating_len(data.len()),
                num_children: saturating_len(self.children.len()),
                ..Stat::default()
            },
        };
        let acl = self
            .acl
            .clone()
            .unwrap_or_else(|| vec![Acl::open_unsafe()]);

        Ok(ZNode::new(path, &data, stat, acl, !self.children.is_empty()))
    }

    fn find(&self, path: &NodePath) -> Option<&SnapshotNode> {
        path.iter()
            .try_fold(self, |node, name| node.children.get(name))
    }
}

pub fn from_json(json: &str) -> Result<SnapshotNode, SnapshotError> {
    serde_json::from_str(json).map_err(SnapshotError::Parse)
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<SnapshotNode, SnapshotError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| SnapshotError::Read(e, path.to_path_buf()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "read snapshot");
    serde_json::from_slice(&bytes).map_err(SnapshotError::Parse)
}

impl NodeTree {
    /// Flatten the snapshot below (and including) `start` into walk order.
    pub fn from_snapshot(root: &SnapshotNode, start: &NodePath) -> Result<NodeTree, SnapshotError> {
        let top = root
            .find(start)
            .ok_or_else(|| SnapshotError::NotFound(start.clone()))?;

        let mut nodes = vec![];
        let mut pending = vec![(start.clone(), top)];

        while let Some((path, snapshot)) = pending.pop() {
            for (name, child) in snapshot.children.iter().rev() {
                let child_path = path
                    .join(name)
                    .map_err(|e| SnapshotError::InvalidName(e, name.clone()))?;
                pending.push((child_path, child));
            }
            nodes.push(snapshot.to_node(path)?);
        }

        Ok(NodeTree::from_nodes(nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "data": "root",
        "children": {
            "app": {
                "data": "v1",
                "stat": { "czxid": 2, "numChildren": 2 },
                "children": {
                    "lock": { "dataHex": "00ff", "stat": { "ephemeralOwner": 7 } },
                    "config": { "data": "{\"port\": 80}" }
                }
            },
            "zookeeper": {}
        }
    }"#;

    #[test]
    fn flattens_in_walk_order() {
        let root = from_json(SNAPSHOT).unwrap();
        let tree = NodeTree::from_snapshot(&root, &NodePath::root()).unwrap();
        let paths: Vec<_> = tree.iter().map(|n| n.path().as_str()).collect();
        assert_eq!(
            paths,
            ["/", "/app", "/app/config", "/app/lock", "/zookeeper"]
        );

        let root_node = &tree.as_slice()[0];
        assert!(root_node.has_children());
        assert_eq!(root_node.data(), b"root");
        assert_eq!(root_node.stat().num_children, 2);
        assert_eq!(root_node.stat().data_length, 4);
        assert_eq!(root_node.acl(), [Acl::open_unsafe()]);

        let lock = tree.get(&NodePath::new("/app/lock").unwrap()).unwrap();
        assert_eq!(lock.data(), [0x00, 0xff]);
        assert!(lock.is_ephemeral());
        assert!(!lock.has_children());
    }

    #[test]
    fn start_below_root() {
        let root = from_json(SNAPSHOT).unwrap();
        let start = NodePath::new("/app").unwrap();
        let tree = NodeTree::from_snapshot(&root, &start).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.as_slice()[0].stat().czxid, 2);

        let missing = NodePath::new("/nope").unwrap();
        assert!(matches!(
            NodeTree::from_snapshot(&root, &missing),
            Err(SnapshotError::NotFound(_))
        ));
    }

    #[test]
    fn rejects_traversal_names() {
        let root = from_json(r#"{ "children": { "..": { "data": "x" } } }"#).unwrap();
        assert!(matches!(
            NodeTree::from_snapshot(&root, &NodePath::root()),
            Err(SnapshotError::InvalidName(IntoNodePathError::Reserved, _))
        ));
    }

    #[test]
    fn rejects_bad_hex() {
        let root = from_json(r#"{ "dataHex": "zz" }"#).unwrap();
        assert!(matches!(
            NodeTree::from_snapshot(&root, &NodePath::root()),
            Err(SnapshotError::InvalidHex(..))
        ));
    }

    #[test]
    fn derived_lengths_saturate() {
        assert_eq!(saturating_len(0), 0);
        assert_eq!(saturating_len(i32::MAX as usize), i32::MAX);
        assert_eq!(saturating_len(i32::MAX as usize + 1), i32::MAX);
        assert_eq!(saturating_len(usize::MAX), i32::MAX);
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(from_json("{"), Err(SnapshotError::Parse(_))));
    }
}
