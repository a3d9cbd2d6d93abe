//! Exporting coordination-service node trees to the filesystem.
//!
//! The interesting part is [`archive`]: a write-only, tagged-text archive that
//! [`Record`] values serialize themselves into. [`export`] walks a [`NodeTree`] and
//! writes each node's payload as a file and its metadata through an archive.

pub mod archive;
pub mod encode;
pub mod export;
pub mod node;
pub mod path;
mod record;
pub mod snapshot;
mod tree;

pub use archive::{ArchiveError, CompoundKind, OutputArchive, XmlOutputArchive};
pub use encode::EncodeError;
pub use export::{
    ExportError, ExportOptions, ExportStats, export_all, export_all_parallel, write_document,
    write_document_file,
};
pub use node::ZNode;
pub use path::NodePath;
pub use record::{Acl, Id, Record, Stat, perms};
pub use snapshot::{SnapshotError, SnapshotNode, load_snapshot};
pub use tree::NodeTree;
