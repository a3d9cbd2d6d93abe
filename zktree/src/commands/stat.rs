use zktree_format::export::{ACL_TAG, METADATA_TAG};

use crate::cli::StatArgs;
use crate::error::{Error, Result};
use crate::util::{load_tree, parse_node_path};

pub fn run(args: StatArgs) -> Result<()> {
    let znode = parse_node_path(&args.znode)?;
    let tree = load_tree(&args.snapshot, &znode)?;
    let node = tree.get(&znode).ok_or_else(|| Error::NodeNotFound {
        path: znode.to_string(),
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = if args.acl {
        zktree_format::write_document(&mut out, node.acl(), ACL_TAG)
    } else {
        zktree_format::write_document(&mut out, node.stat(), METADATA_TAG)
    };

    result.map_err(|source| Error::WriteDocument {
        path: znode.to_string(),
        source,
    })?;

    Ok(())
}
