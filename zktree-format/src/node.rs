use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::path::NodePath;
use crate::record::{Acl, Stat};

/// File name that holds the payload of a node which also has children.
pub const PAYLOAD_FILE_NAME: &str = "_znode";

/// Suffix appended to a node's path for its metadata document.
pub const METADATA_SUFFIX: &str = ".metadata.xml";

/// Suffix appended to a node's path for its ACL document.
pub const ACL_SUFFIX: &str = ".acl.xml";

/// One entry of the tree: a name, its payload and the service's metadata for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZNode {
    path: NodePath,
    data: Vec<u8>,
    stat: Stat,
    acl: Vec<Acl>,
    has_children: bool,
}

impl ZNode {
    /// The payload is copied; the node never aliases the caller's buffer.
    pub fn new(path: NodePath, data: &[u8], stat: Stat, acl: Vec<Acl>, has_children: bool) -> ZNode {
        ZNode {
            path,
            data: data.to_vec(),
            stat,
            acl,
            has_children,
        }
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Payload as text, replacing invalid UTF-8.
    pub fn read_data(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    pub fn stat(&self) -> &Stat {
        &self.stat
    }

    pub fn acl(&self) -> &[Acl] {
        &self.acl
    }

    pub fn has_children(&self) -> bool {
        self.has_children
    }

    pub fn is_ephemeral(&self) -> bool {
        self.stat.is_ephemeral()
    }

    /// Directory this node maps to, if it has children.
    pub fn dir_path(&self, base: &Path) -> Option<PathBuf> {
        if self.has_children {
            Some(self.path.resolve_in(base))
        } else {
            None
        }
    }

    /// Where the payload goes: the node's own path, or `_znode` inside its
    /// directory when it has children. The root always uses `_znode`.
    pub fn payload_path(&self, base: &Path) -> PathBuf {
        if self.has_children || self.path.is_root() {
            self.path.resolve_in(base).join(PAYLOAD_FILE_NAME)
        } else {
            self.path.resolve_in(base)
        }
    }

    pub fn metadata_path(&self, base: &Path) -> PathBuf {
        self.sibling_path(base, METADATA_SUFFIX)
    }

    pub fn acl_path(&self, base: &Path) -> PathBuf {
        self.sibling_path(base, ACL_SUFFIX)
    }

    fn sibling_path(&self, base: &Path, suffix: &str) -> PathBuf {
        if self.path.is_root() {
            return base.join(format!("{}{}", PAYLOAD_FILE_NAME, suffix));
        }
        let target = self.path.resolve_in(base);
        let mut name = target.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        target.with_file_name(name)
    }
}
