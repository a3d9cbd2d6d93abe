//! End-to-end export of snapshot trees onto a temporary directory.

use std::fs;

use tempfile::TempDir;
use zktree_format::snapshot::from_json;
use zktree_format::{
    ExportOptions, NodePath, NodeTree, Stat, ZNode, export_all, export_all_parallel,
};

const SNAPSHOT: &str = r#"{
    "data": "",
    "children": {
        "app": {
            "data": "app-root",
            "stat": { "czxid": 2, "mzxid": 3, "numChildren": 2, "dataLength": 8 },
            "children": {
                "config": { "data": "{\"port\": 8080}" },
                "leader": {
                    "dataHex": "00ff10",
                    "stat": { "czxid": 9, "ephemeralOwner": 72057594037927936, "dataLength": 3 },
                    "acl": [{ "perms": 1, "id": { "scheme": "digest", "id": "svc:abc<d>" } }]
                }
            }
        },
        "zookeeper": { "children": { "quota": {} } }
    }
}"#;

fn tree() -> NodeTree {
    let root = from_json(SNAPSHOT).unwrap();
    NodeTree::from_snapshot(&root, &NodePath::root()).unwrap()
}

fn read(dir: &TempDir, rel: &str) -> String {
    fs::read_to_string(dir.path().join(rel)).unwrap()
}

#[test]
fn export_layout() {
    let out = TempDir::new().unwrap();
    let stats = export_all(&tree(), out.path(), &ExportOptions::default()).unwrap();

    assert_eq!(stats.nodes, 6);
    assert_eq!(stats.failures, 0);
    assert_eq!(stats.payloads_written, 6);
    assert_eq!(stats.directories_created, 3);
    assert_eq!(stats.metadata_written, 1);
    assert_eq!(stats.acl_written, 0);

    assert_eq!(read(&out, "_znode"), "");
    assert_eq!(read(&out, "app/_znode"), "app-root");
    assert_eq!(read(&out, "app/config"), "{\"port\": 8080}");
    assert_eq!(fs::read(out.path().join("app/leader")).unwrap(), [0x00, 0xff, 0x10]);
    assert!(out.path().join("zookeeper").is_dir());
    assert_eq!(read(&out, "zookeeper/quota"), "");

    // Only the ephemeral node gets a metadata document.
    assert!(!out.path().join("app.metadata.xml").exists());
    assert!(!out.path().join("app/config.metadata.xml").exists());
    assert_eq!(
        read(&out, "app/leader.metadata.xml"),
        "<metadata><czxid>9</czxid><mzxid>0</mzxid><ctime>0</ctime><mtime>0</mtime>\
         <version>0</version><cversion>0</cversion><aversion>0</aversion>\
         <ephemeralOwner>72057594037927936</ephemeralOwner><dataLength>3</dataLength>\
         <numChildren>0</numChildren><pzxid>0</pzxid></metadata>\n"
    );
}

#[test]
fn export_all_metadata_and_acl() {
    let out = TempDir::new().unwrap();
    let options = ExportOptions {
        all_metadata: true,
        acl: true,
    };
    let stats = export_all(&tree(), out.path(), &options).unwrap();

    assert_eq!(stats.failures, 0);
    assert_eq!(stats.metadata_written, 6);
    assert_eq!(stats.acl_written, 6);

    assert!(read(&out, "app.metadata.xml").starts_with("<metadata><czxid>2</czxid><mzxid>3</mzxid>"));
    assert!(out.path().join("_znode.metadata.xml").exists());
    assert_eq!(
        read(&out, "app/leader.acl.xml"),
        "<acl><array>\n  \
         <entry><perms>1</perms><id><scheme>digest</scheme><id>svc:abc&lt;d&gt;</id></id>\n  \
         </entry>\n\
         </array></acl>\n"
    );
    assert!(read(&out, "app/config.acl.xml").contains("<scheme>world</scheme><id>anyone</id>"));
}

#[test]
fn parallel_matches_serial() {
    let serial = TempDir::new().unwrap();
    let parallel = TempDir::new().unwrap();
    let options = ExportOptions {
        all_metadata: true,
        acl: true,
    };

    let a = export_all(&tree(), serial.path(), &options).unwrap();
    let b = export_all_parallel(&tree(), parallel.path(), &options, 4).unwrap();
    assert_eq!(a, b);

    for node in tree().iter() {
        for path in [
            node.payload_path(serial.path()),
            node.metadata_path(serial.path()),
            node.acl_path(serial.path()),
        ] {
            let rel = path.strip_prefix(serial.path()).unwrap();
            assert_eq!(
                fs::read(&path).unwrap(),
                fs::read(parallel.path().join(rel)).unwrap(),
                "{}",
                rel.display()
            );
        }
    }
}

#[test]
fn failures_do_not_stop_the_walk() {
    let out = TempDir::new().unwrap();

    // A plain file where the `/app` directory should go.
    fs::write(out.path().join("app"), b"in the way").unwrap();

    let stats = export_all(&tree(), out.path(), &ExportOptions::default()).unwrap();
    assert!(stats.failures > 0);
    assert_eq!(read(&out, "_znode"), "");
    assert_eq!(read(&out, "zookeeper/quota"), "");
}

#[test]
fn unrepresentable_metadata_is_discarded() {
    use zktree_format::{Acl, Id};

    let out = TempDir::new().unwrap();
    let node = ZNode::new(
        NodePath::new("/bad").unwrap(),
        b"payload",
        Stat {
            ephemeral_owner: 1,
            ..Stat::default()
        },
        vec![Acl {
            perms: 1,
            id: Id {
                scheme: "digest".into(),
                id: "nul\0".into(),
            },
        }],
        false,
    );
    let tree = NodeTree::from_nodes(vec![node]);
    let options = ExportOptions {
        all_metadata: false,
        acl: true,
    };

    let stats = export_all(&tree, out.path(), &options).unwrap();
    assert_eq!(stats.failures, 1);
    assert_eq!(stats.metadata_written, 1);
    assert_eq!(read(&out, "bad"), "payload");
    assert!(out.path().join("bad.metadata.xml").exists());
    assert!(!out.path().join("bad.acl.xml").exists());
}

#[test]
fn export_subtree() {
    let out = TempDir::new().unwrap();
    let root = from_json(SNAPSHOT).unwrap();
    let tree = NodeTree::from_snapshot(&root, &NodePath::new("/app").unwrap()).unwrap();

    let stats = export_all(&tree, out.path(), &ExportOptions::default()).unwrap();
    assert_eq!(stats.nodes, 3);
    assert_eq!(read(&out, "app/_znode"), "app-root");
    assert!(!out.path().join("zookeeper").exists());
}

#[test]
fn export_leaf_subtree() {
    let out = TempDir::new().unwrap();
    let root = from_json(SNAPSHOT).unwrap();
    let tree = NodeTree::from_snapshot(&root, &NodePath::new("/app/config").unwrap()).unwrap();
    let options = ExportOptions {
        all_metadata: true,
        acl: false,
    };

    let stats = export_all(&tree, out.path(), &options).unwrap();
    assert_eq!(stats.nodes, 1);
    assert_eq!(stats.failures, 0);
    assert_eq!(stats.payloads_written, 1);
    assert_eq!(stats.metadata_written, 1);
    assert_eq!(read(&out, "app/config"), "{\"port\": 8080}");
    assert!(out.path().join("app/config.metadata.xml").exists());

    let parallel = TempDir::new().unwrap();
    let stats = export_all_parallel(&tree, parallel.path(), &options, 2).unwrap();
    assert_eq!(stats.failures, 0);
    assert_eq!(read(&parallel, "app/config"), "{\"port\": 8080}");
}
