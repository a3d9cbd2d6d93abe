//! Writing a [`NodeTree`] out to the filesystem.
//!
//! Each node becomes a file holding its raw payload. A node with children also
//! becomes a directory, and its payload goes to `_znode` inside it. Metadata and ACL
//! documents are written next to the node as `<name>.metadata.xml` and
//! `<name>.acl.xml`, one archive per document.
//!
//! The walk is best-effort: a file that cannot be written is logged and counted in
//! [`ExportStats::failures`], and the walk carries on with the next one.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use crate::archive::{ArchiveError, OutputArchive, XmlOutputArchive};
use crate::node::ZNode;
use crate::record::Record;
use crate::tree::NodeTree;

/// Tag of the root element in a metadata document.
pub const METADATA_TAG: &str = "metadata";

/// Tag of the root element in an ACL document.
pub const ACL_TAG: &str = "acl";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Creating directory failed. Path: '{}'", .1.display())]
    CreateDirFailed(#[source] std::io::Error, PathBuf),

    #[error("Creating file failed. Path: '{}'", .1.display())]
    CreateFileFailed(#[source] std::io::Error, PathBuf),

    #[error("Writing file failed. Path: '{}'", .1.display())]
    WriteFileFailed(#[source] std::io::Error, PathBuf),

    #[error("Serializing record failed. Path: '{}'", .1.display())]
    SerializeFailed(#[source] ArchiveError, PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Write metadata for every node, not only ephemeral ones.
    pub all_metadata: bool,
    /// Write an ACL document for every node.
    pub acl: bool,
}

impl ExportOptions {
    fn wants_metadata(&self, node: &ZNode) -> bool {
        self.all_metadata || node.is_ephemeral()
    }
}

/// Statistics from exporting a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub nodes: u64,
    pub directories_created: u64,
    pub payloads_written: u64,
    pub metadata_written: u64,
    pub acl_written: u64,
    pub failures: u64,
}

impl AddAssign for ExportStats {
    fn add_assign(&mut self, other: Self) {
        self.nodes += other.nodes;
        self.directories_created += other.directories_created;
        self.payloads_written += other.payloads_written;
        self.metadata_written += other.metadata_written;
        self.acl_written += other.acl_written;
        self.failures += other.failures;
    }
}

/// Serialize one record as a complete document into `sink`.
///
/// The archive lives only for this call. On success every opened scope has been
/// closed and the sink flushed; on failure the sink holds partial output that the
/// caller must discard.
pub fn write_document<W: Write, R: Record + ?Sized>(
    sink: W,
    record: &R,
    tag: &str,
) -> Result<W, ArchiveError> {
    let mut archive = XmlOutputArchive::new(sink);
    archive.write_record(record, tag)?;
    archive.finish()
}

/// Serialize a record into a new file at `path`, removing the file if it fails.
pub fn write_document_file<R: Record + ?Sized>(
    path: &Path,
    record: &R,
    tag: &str,
) -> Result<(), ExportError> {
    let file =
        File::create(path).map_err(|e| ExportError::CreateFileFailed(e, path.to_path_buf()))?;
    let mut writer = BufWriter::new(file);

    if let Err(e) = write_document(&mut writer, record, tag) {
        drop(writer);
        if let Err(remove_err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %remove_err, "could not remove partial document");
        }
        return Err(ExportError::SerializeFailed(e, path.to_path_buf()));
    }

    Ok(())
}

fn create_directory(node: &ZNode, base: &Path) -> Result<bool, ExportError> {
    match node.dir_path(base) {
        Some(dir) => {
            fs::create_dir_all(&dir).map_err(|e| ExportError::CreateDirFailed(e, dir.clone()))?;
            tracing::debug!(path = %dir.display(), "created directory");
            Ok(true)
        }
        None => Ok(false),
    }
}

fn write_payload(node: &ZNode, base: &Path) -> Result<(), ExportError> {
    let path = node.payload_path(base);
    let mut file =
        File::create(&path).map_err(|e| ExportError::CreateFileFailed(e, path.clone()))?;
    file.write_all(node.data())
        .map_err(|e| ExportError::WriteFileFailed(e, path.clone()))?;
    tracing::debug!(path = %path.display(), bytes = node.data().len(), "wrote payload");
    Ok(())
}

fn write_metadata(node: &ZNode, base: &Path) -> Result<(), ExportError> {
    let path = node.metadata_path(base);
    write_document_file(&path, node.stat(), METADATA_TAG)?;
    tracing::debug!(path = %path.display(), "wrote metadata");
    Ok(())
}

fn write_acl(node: &ZNode, base: &Path) -> Result<(), ExportError> {
    let path = node.acl_path(base);
    write_document_file(&path, node.acl(), ACL_TAG)?;
    tracing::debug!(path = %path.display(), entries = node.acl().len(), "wrote acl");
    Ok(())
}

/// Count a step's outcome, logging failures against the node they belong to.
fn tally(node: &ZNode, result: Result<(), ExportError>, counter: &mut u64, failures: &mut u64) {
    match result {
        Ok(()) => *counter += 1,
        Err(e) => {
            tracing::error!(node = %node.path(), error = ?e, "{}", e);
            *failures += 1;
        }
    }
}

fn directory_stats(node: &ZNode, base: &Path) -> ExportStats {
    let mut stats = ExportStats::default();
    match create_directory(node, base) {
        Ok(created) => stats.directories_created += created as u64,
        Err(e) => {
            tracing::error!(node = %node.path(), error = ?e, "{}", e);
            stats.failures += 1;
        }
    }
    stats
}

/// Write every file belonging to one node. Its directory must already exist.
fn export_files(node: &ZNode, base: &Path, options: &ExportOptions) -> ExportStats {
    let mut stats = ExportStats {
        nodes: 1,
        ..ExportStats::default()
    };

    tally(
        node,
        write_payload(node, base),
        &mut stats.payloads_written,
        &mut stats.failures,
    );

    if options.wants_metadata(node) {
        tally(
            node,
            write_metadata(node, base),
            &mut stats.metadata_written,
            &mut stats.failures,
        );
    }

    if options.acl {
        tally(
            node,
            write_acl(node, base),
            &mut stats.acl_written,
            &mut stats.failures,
        );
    }

    stats
}

/// Create the directory the first node's files land in.
///
/// A tree that starts below the root writes its top node inside the directories of
/// its ancestors, which no node in the tree creates.
fn prepare_base(tree: &NodeTree, base: &Path) -> Result<(), ExportError> {
    let dir = match tree.iter().next().and_then(|node| node.path().parent()) {
        Some(parent) => parent.resolve_in(base),
        None => base.to_path_buf(),
    };
    fs::create_dir_all(&dir).map_err(|e| ExportError::CreateDirFailed(e, dir.clone()))
}

/// Export the whole tree, one node at a time in walk order.
pub fn export_all<P: AsRef<Path>>(
    tree: &NodeTree,
    output_path: P,
    options: &ExportOptions,
) -> Result<ExportStats, ExportError> {
    let base = output_path.as_ref();
    prepare_base(tree, base)?;

    tracing::info!(path = %base.display(), nodes = tree.len(), "begin writing tree");
    let start = Instant::now();

    let mut stats = ExportStats::default();
    for node in tree.iter() {
        stats += directory_stats(node, base);
        stats += export_files(node, base, options);
    }

    tracing::info!(
        path = %base.display(),
        failures = stats.failures,
        elapsed = ?start.elapsed(),
        "end writing tree"
    );
    Ok(stats)
}

/// Export the tree with node files written across `concurrency` threads.
///
/// Directories are created first, in walk order; then every node's files are written
/// independently, each document through its own archive.
pub fn export_all_parallel<P: AsRef<Path>>(
    tree: &NodeTree,
    output_path: P,
    options: &ExportOptions,
    concurrency: usize,
) -> Result<ExportStats, ExportError> {
    let base = output_path.as_ref();
    prepare_base(tree, base)?;

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency.max(1))
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "could not start worker pool; exporting serially");
            return export_all(tree, base, options);
        }
    };

    tracing::info!(
        path = %base.display(),
        nodes = tree.len(),
        concurrency,
        "begin writing tree"
    );
    let start = Instant::now();

    let mut stats = ExportStats::default();
    for node in tree.iter() {
        stats += directory_stats(node, base);
    }

    stats += pool.install(|| {
        tree.as_slice()
            .par_iter()
            .map(|node| export_files(node, base, options))
            .reduce(ExportStats::default, |mut acc, s| {
                acc += s;
                acc
            })
    });

    tracing::info!(
        path = %base.display(),
        failures = stats.failures,
        elapsed = ?start.elapsed(),
        "end writing tree"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Stat;

    #[test]
    fn document_is_complete() {
        let stat = Stat {
            czxid: 10,
            ephemeral_owner: 5,
            ..Stat::default()
        };
        let out = write_document(Vec::new(), &stat, METADATA_TAG).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("<metadata><czxid>10</czxid>"));
        assert!(text.ends_with("<pzxid>0</pzxid></metadata>\n"));
    }

    struct Unbalanced;

    impl Record for Unbalanced {
        fn serialize<A: OutputArchive + ?Sized>(
            &self,
            archive: &mut A,
            tag: &str,
        ) -> crate::archive::Result<()> {
            archive.start_record(tag)?;
            archive.write_int(1, "x")
        }
    }

    #[test]
    fn unbalanced_record_is_rejected() {
        assert!(matches!(
            write_document(Vec::new(), &Unbalanced, "r"),
            Err(ArchiveError::Unclosed { depth: 1 })
        ));
    }

    #[test]
    fn failed_document_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        let err = write_document_file(&path, &Unbalanced, "r").unwrap_err();
        assert!(matches!(err, ExportError::SerializeFailed(..)));
        assert!(!path.exists());
    }

    #[test]
    fn stats_add() {
        let mut a = ExportStats {
            nodes: 1,
            payloads_written: 1,
            ..ExportStats::default()
        };
        a += ExportStats {
            nodes: 2,
            failures: 1,
            ..ExportStats::default()
        };
        assert_eq!(a.nodes, 3);
        assert_eq!(a.payloads_written, 1);
        assert_eq!(a.failures, 1);
    }
}
