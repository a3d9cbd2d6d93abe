use crate::cli::ListArgs;
use crate::error::Result;
use crate::util::{format_flags, format_size, load_tree, parse_node_path};

pub fn run(args: ListArgs) -> Result<()> {
    let znode = parse_node_path(&args.znode)?;
    let tree = load_tree(&args.snapshot, &znode)?;

    println!("Flags  Size        Children  Path");
    println!("-----  ----------  --------  --------");
    for node in tree.iter() {
        println!(
            "{:<5}  {:>10}  {:>8}  {}",
            format_flags(node),
            format_size(node.data().len() as u64),
            node.stat().num_children,
            node.path(),
        );
    }

    Ok(())
}
