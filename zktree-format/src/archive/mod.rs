//! Write-only structured archives.
//!
//! An [`OutputArchive`] turns a sequence of scalar writes and start/end pairs into a
//! document. Implementations keep a stack of open [`CompoundKind`]s and refuse an
//! `end_*` call that does not close the innermost open scope.

use std::fmt;

use crate::encode::EncodeError;
use crate::record::Record;

mod xml;

pub use xml::XmlOutputArchive;

pub type Result<T> = std::result::Result<T, ArchiveError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompoundKind {
    Vector,
    Map,
    Record,
}

impl CompoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundKind::Vector => "vector",
            CompoundKind::Map => "map",
            CompoundKind::Record => "record",
        }
    }
}

impl fmt::Display for CompoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error(
        "Cannot close {expected} `{tag}`: innermost open scope is {}",
        .found.map(|k| k.as_str()).unwrap_or("none")
    )]
    NestingMismatch {
        tag: String,
        expected: CompoundKind,
        found: Option<CompoundKind>,
    },

    #[error("Archive finished with {depth} scope(s) still open")]
    Unclosed { depth: usize },

    #[error("Writing to archive sink failed")]
    Io(#[from] std::io::Error),

    #[error("Encoding scalar value failed")]
    Encoding(#[from] EncodeError),
}

/// A format that scalars and compounds can be written into.
///
/// Tags are written verbatim; keeping them well-formed is up to the caller.
pub trait OutputArchive {
    fn write_byte(&mut self, value: i8, tag: &str) -> Result<()>;
    fn write_bool(&mut self, value: bool, tag: &str) -> Result<()>;
    fn write_int(&mut self, value: i32, tag: &str) -> Result<()>;
    fn write_long(&mut self, value: i64, tag: &str) -> Result<()>;
    fn write_float(&mut self, value: f32, tag: &str) -> Result<()>;
    fn write_double(&mut self, value: f64, tag: &str) -> Result<()>;
    fn write_string(&mut self, value: &str, tag: &str) -> Result<()>;
    fn write_buffer(&mut self, value: &[u8], tag: &str) -> Result<()>;

    fn start_record(&mut self, tag: &str) -> Result<()>;
    fn end_record(&mut self, tag: &str) -> Result<()>;
    fn start_vector(&mut self, tag: &str) -> Result<()>;
    fn end_vector(&mut self, tag: &str) -> Result<()>;

    /// Map entries are expected in ascending key order.
    fn start_map(&mut self, tag: &str) -> Result<()>;
    fn end_map(&mut self, tag: &str) -> Result<()>;

    fn write_record<R: Record + ?Sized>(&mut self, record: &R, tag: &str) -> Result<()> {
        record.serialize(self, tag)
    }
}
