use clap::Parser;
use syntenymap::prelude::*;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the gene annotation file
    #[clap(long, value_parser)]
    gff: String,

    /// Path to the MCScanX collinearity file
    #[clap(value_parser)]
    collinearity: String,
}

fn main() -> Result<(), SyntenyMapError> {
    let args = Args::parse();
    let map = SyntenyMap::from_files(&args.gff, &args.collinearity)?;

    for (tag, members) in map.partitions.iter() {
        let blocks = map
            .blocks
            .values()
            .filter(|block| {
                partition_tag(&block.source_chromosome) == *tag
                    || partition_tag(&block.target_chromosome) == *tag
            })
            .count();
        println!("{}\t{}\t{}", tag, members.len(), blocks);
    }

    Ok(())
}
