use std::path::PathBuf;

use miette::Diagnostic;
use zktree_format::path::IntoNodePathError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum Error {
    #[error("Cannot handle node path `{path}`")]
    #[diagnostic(help("Node paths are absolute, e.g. /services/web"))]
    InvalidNodePath {
        path: String,
        #[source]
        source: IntoNodePathError,
    },

    #[error("Cannot load snapshot `{}`", .path.display())]
    #[diagnostic(help("Is this a valid JSON tree snapshot?"))]
    LoadSnapshot {
        path: PathBuf,
        #[source]
        source: zktree_format::SnapshotError,
    },

    #[error("Node `{path}` not found")]
    NodeNotFound { path: String },

    #[error("Cannot export tree to `{}`", .path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: zktree_format::ExportError,
    },

    #[error("Cannot determine the current directory")]
    CurrentDir {
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write document for `{path}`")]
    WriteDocument {
        path: String,
        #[source]
        source: zktree_format::ArchiveError,
    },

    #[error("{failures} file(s) could not be written")]
    #[diagnostic(help("Run with RUST_LOG=zktree_format=error to see each failure"))]
    PartialExport { failures: u64 },
}
