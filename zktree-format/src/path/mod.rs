use std::{
    fmt,
    path::{Path, PathBuf},
};

mod error;

pub use self::error::IntoNodePathError;

/// Separator between node names in a [`NodePath`].
pub const NODE_PATH_SEP: &str = "/";

/// An absolute, validated path into the node tree, e.g. `/services/web`.
///
/// Every component is safe to use as a single filesystem name: no empty names, no
/// `.` or `..`, no control or separator characters and no backslashes.
#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct NodePath(String);

fn validate_name(name: &str) -> Result<(), IntoNodePathError> {
    use unic_ucd::GeneralCategory;

    if name.is_empty() {
        return Err(IntoNodePathError::EmptyComponent);
    }
    if name == "." || name == ".." {
        return Err(IntoNodePathError::Reserved);
    }
    let bad_char = name.chars().any(|c| {
        let cat = GeneralCategory::of(c);
        c == '\\' || cat == GeneralCategory::Control || (cat.is_separator() && c != ' ')
    });
    if bad_char {
        return Err(IntoNodePathError::UnrepresentableStr);
    }
    Ok(())
}

impl NodePath {
    pub fn new<S: AsRef<str>>(path: S) -> Result<NodePath, IntoNodePathError> {
        let path = path.as_ref();
        let rest = path
            .strip_prefix(NODE_PATH_SEP)
            .ok_or(IntoNodePathError::Relative)?;

        if rest.is_empty() {
            return Ok(NodePath::root());
        }

        for name in rest.split(NODE_PATH_SEP) {
            validate_name(name)?;
        }

        Ok(NodePath(path.to_string()))
    }

    pub fn root() -> NodePath {
        NodePath(NODE_PATH_SEP.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == NODE_PATH_SEP
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last component; empty for the root.
    pub fn name(&self) -> &str {
        self.iter().last().unwrap_or("")
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.is_root() {
            return None;
        }
        match self.0.rfind(NODE_PATH_SEP) {
            Some(0) => Some(NodePath::root()),
            Some(idx) => Some(NodePath(self.0[..idx].to_string())),
            None => None,
        }
    }

    pub fn join(&self, name: &str) -> Result<NodePath, IntoNodePathError> {
        validate_name(name)?;
        if self.is_root() {
            Ok(NodePath(format!("{}{}", NODE_PATH_SEP, name)))
        } else {
            Ok(NodePath(format!("{}{}{}", self.0, NODE_PATH_SEP, name)))
        }
    }

    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    pub fn starts_with(&self, other: &NodePath) -> bool {
        other.is_root()
            || self.0 == other.0
            || (self.0.starts_with(&other.0) && self.0[other.0.len()..].starts_with(NODE_PATH_SEP))
    }

    /// Components from the root down; empty for the root itself.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.split(NODE_PATH_SEP).filter(|x| !x.is_empty())
    }

    /// Relative filesystem path mirroring this node; empty for the root.
    pub fn to_relative_path(&self) -> PathBuf {
        self.iter().collect()
    }

    pub fn resolve_in<P: AsRef<Path>>(&self, base: P) -> PathBuf {
        base.as_ref().join(self.to_relative_path())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
