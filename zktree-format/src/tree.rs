use crate::node::ZNode;
use crate::path::NodePath;

/// An ordered set of nodes, parents before children and siblings by name.
///
/// This is the order the export walks in, so a directory always exists before
/// anything is written inside it.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<ZNode>,
}

impl NodeTree {
    pub fn from_nodes(mut nodes: Vec<ZNode>) -> NodeTree {
        nodes.sort_by(|a, b| a.path().iter().cmp(b.path().iter()));
        nodes.dedup_by(|a, b| a.path() == b.path());
        NodeTree { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ZNode> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[ZNode] {
        &self.nodes
    }

    pub fn get(&self, path: &NodePath) -> Option<&ZNode> {
        self.nodes
            .binary_search_by(|n| n.path().iter().cmp(path.iter()))
            .ok()
            .map(|idx| &self.nodes[idx])
    }

    /// The node at `path` and everything below it, in walk order.
    pub fn subtree<'a>(&'a self, path: &'a NodePath) -> impl Iterator<Item = &'a ZNode> + 'a {
        self.nodes.iter().filter(move |n| n.path().starts_with(path))
    }

    pub fn children<'a>(&'a self, path: &'a NodePath) -> impl Iterator<Item = &'a ZNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.path().parent().as_ref() == Some(path))
    }
}

impl<'a> IntoIterator for &'a NodeTree {
    type Item = &'a ZNode;
    type IntoIter = std::slice::Iter<'a, ZNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
