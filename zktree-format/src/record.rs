use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::archive::{OutputArchive, Result};

/// A value that knows how to write itself into any archive.
///
/// Implementations normally bracket their fields with `start_record(tag)` and
/// `end_record(tag)`, delegating nested values to their own `serialize`.
pub trait Record {
    fn serialize<A: OutputArchive + ?Sized>(&self, archive: &mut A, tag: &str) -> Result<()>;
}

impl<T: Record> Record for [T] {
    fn serialize<A: OutputArchive + ?Sized>(&self, archive: &mut A, tag: &str) -> Result<()> {
        archive.start_vector(tag)?;
        for item in self.iter() {
            archive.write_record(item, "entry")?;
        }
        archive.end_vector(tag)
    }
}

impl<T: Record> Record for Vec<T> {
    fn serialize<A: OutputArchive + ?Sized>(&self, archive: &mut A, tag: &str) -> Result<()> {
        self.as_slice().serialize(archive, tag)
    }
}

impl<V: Record> Record for BTreeMap<String, V> {
    fn serialize<A: OutputArchive + ?Sized>(&self, archive: &mut A, tag: &str) -> Result<()> {
        archive.start_map(tag)?;
        for (key, value) in self.iter() {
            archive.write_string(key, "key")?;
            archive.write_record(value, "value")?;
        }
        archive.end_map(tag)
    }
}

/// Per-node metadata kept by the coordination service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stat {
    /// Transaction id that created the node.
    pub czxid: i64,
    /// Transaction id that last modified the node.
    pub mzxid: i64,
    /// Creation time, milliseconds since the Unix epoch.
    pub ctime: i64,
    /// Last modification time, milliseconds since the Unix epoch.
    pub mtime: i64,
    pub version: i32,
    pub cversion: i32,
    pub aversion: i32,
    /// Session id of the owner if the node is ephemeral, otherwise 0.
    pub ephemeral_owner: i64,
    pub data_length: i32,
    pub num_children: i32,
    /// Transaction id that last modified the node's children.
    pub pzxid: i64,
}

impl Stat {
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral_owner != 0
    }
}

impl Record for Stat {
    fn serialize<A: OutputArchive + ?Sized>(&self, archive: &mut A, tag: &str) -> Result<()> {
        archive.start_record(tag)?;
        archive.write_long(self.czxid, "czxid")?;
        archive.write_long(self.mzxid, "mzxid")?;
        archive.write_long(self.ctime, "ctime")?;
        archive.write_long(self.mtime, "mtime")?;
        archive.write_int(self.version, "version")?;
        archive.write_int(self.cversion, "cversion")?;
        archive.write_int(self.aversion, "aversion")?;
        archive.write_long(self.ephemeral_owner, "ephemeralOwner")?;
        archive.write_int(self.data_length, "dataLength")?;
        archive.write_int(self.num_children, "numChildren")?;
        archive.write_long(self.pzxid, "pzxid")?;
        archive.end_record(tag)
    }
}

pub mod perms {
    pub const READ: i32 = 1 << 0;
    pub const WRITE: i32 = 1 << 1;
    pub const CREATE: i32 = 1 << 2;
    pub const DELETE: i32 = 1 << 3;
    pub const ADMIN: i32 = 1 << 4;
    pub const ALL: i32 = READ | WRITE | CREATE | DELETE | ADMIN;
}

/// An authentication identity, e.g. `world:anyone` or `digest:user:hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Id {
    pub scheme: String,
    pub id: String,
}

impl Id {
    pub fn anyone() -> Id {
        Id {
            scheme: "world".into(),
            id: "anyone".into(),
        }
    }
}

impl Record for Id {
    fn serialize<A: OutputArchive + ?Sized>(&self, archive: &mut A, tag: &str) -> Result<()> {
        archive.start_record(tag)?;
        archive.write_string(&self.scheme, "scheme")?;
        archive.write_string(&self.id, "id")?;
        archive.end_record(tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    pub perms: i32,
    pub id: Id,
}

impl Acl {
    pub fn open_unsafe() -> Acl {
        Acl {
            perms: perms::ALL,
            id: Id::anyone(),
        }
    }
}

impl Record for Acl {
    fn serialize<A: OutputArchive + ?Sized>(&self, archive: &mut A, tag: &str) -> Result<()> {
        archive.start_record(tag)?;
        archive.write_int(self.perms, "perms")?;
        archive.write_record(&self.id, "id")?;
        archive.end_record(tag)
    }
}
