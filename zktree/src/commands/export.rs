use zktree_format::{ExportOptions, ExportStats};

use crate::cli::ExportArgs;
use crate::error::{Error, Result};
use crate::util::{load_tree, parse_node_path};

pub fn run(args: ExportArgs) -> Result<()> {
    let znode = parse_node_path(&args.znode)?;
    let tree = load_tree(&args.snapshot, &znode)?;
    tracing::debug!(znode = %znode, nodes = tree.len(), "loaded tree");

    let output_path = match args.output {
        Some(path) => path,
        None => std::env::current_dir().map_err(|source| Error::CurrentDir { source })?,
    };

    let options = ExportOptions {
        all_metadata: args.all_metadata,
        acl: args.acl,
    };

    let result = if args.serial {
        zktree_format::export_all(&tree, &output_path, &options)
    } else {
        let concurrency = args.jobs.unwrap_or_else(num_cpus::get);
        zktree_format::export_all_parallel(&tree, &output_path, &options, concurrency)
    };

    let stats: ExportStats = result.map_err(|source| Error::Export {
        path: output_path.clone(),
        source,
    })?;

    if !args.quiet {
        println!(
            "Exported {} nodes to {} ({} payloads, {} metadata, {} acl)",
            stats.nodes,
            output_path.display(),
            stats.payloads_written,
            stats.metadata_written,
            stats.acl_written,
        );
    }

    if stats.failures > 0 {
        return Err(Error::PartialExport {
            failures: stats.failures,
        });
    }

    Ok(())
}
