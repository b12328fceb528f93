use clap::{Args, Parser, Subcommand};
use std::io;
use std::io::Write;

use syntenymap::file::OutputFile;
use syntenymap::palette::{to_hex, ColorMode, Palette};
use syntenymap::prelude::*;

const INFO: &str = "\
syntenymap: read and explore genome synteny maps
usage: syntenymap [--help] <subcommand>

Subcommands:

  chords:  derive the visible syntenic chords for a view.
  layout:  derive the visible chromosome arcs for a view.
  pairs:   report the blocks connecting one chromosome to its partners.
  summary: summarize a synteny dataset.

";

#[derive(Parser)]
#[clap(name = "syntenymap")]
#[clap(about = INFO)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Arguments shared by the view-deriving subcommands.
#[derive(Args)]
struct ViewArgs {
    /// the gene annotation, simplified (chrom/gene/start/end) or GFF3
    #[arg(long, required = true)]
    gff: String,
    /// the MCScanX collinearity file
    #[arg(long, required = true)]
    collinearity: String,
    /// comma-separated chromosomes to select
    #[arg(long)]
    select: Option<String>,
    /// comma-separated chromosomes to draw reversed
    #[arg(long)]
    flip: Option<String>,
    /// hide chromosomes outside the selection instead of showing all
    #[arg(long, default_value_t = false)]
    hide_unselected: bool,
}

#[derive(Args)]
struct ChordsArgs {
    #[command(flatten)]
    view: ViewArgs,
    /// keep only blocks with at least this many gene-pair connections
    #[arg(long, conflicts_with = "at_most")]
    at_least: Option<usize>,
    /// keep only blocks with at most this many gene-pair connections
    #[arg(long)]
    at_most: Option<usize>,
    /// chord output order: input, block, or length
    #[arg(long, default_value = "input")]
    order_by: String,
    /// emit chords in descending order
    #[arg(long, default_value_t = false)]
    descending: bool,
    /// hide chords joining a chromosome to itself
    #[arg(long, default_value_t = false)]
    no_self: bool,
    /// hide chords joining two chromosomes of the same genome
    #[arg(long, default_value_t = false)]
    no_self_genome: bool,
    /// the output file path (if not set, uses standard out)
    #[arg(long)]
    output: Option<String>,
    /// Include a header
    #[arg(long, default_value_t = false)]
    header: bool,
}

#[derive(Args)]
struct LayoutArgs {
    #[command(flatten)]
    view: ViewArgs,
    /// palette: light1, light2, dark1, or dark2
    #[arg(long, default_value = "light1")]
    palette: String,
    /// color assignment: chromosome, genome, or flip
    #[arg(long, default_value = "chromosome")]
    color_by: String,
    /// the output file path (if not set, uses standard out)
    #[arg(long)]
    output: Option<String>,
    /// Include a header
    #[arg(long, default_value_t = false)]
    header: bool,
}

#[derive(Args)]
struct PairsArgs {
    /// the gene annotation, simplified (chrom/gene/start/end) or GFF3
    #[arg(long, required = true)]
    gff: String,
    /// the MCScanX collinearity file
    #[arg(long, required = true)]
    collinearity: String,
    /// the chromosome to report pair connections for
    #[arg(required = true)]
    chromosome: String,
    /// the output file path (if not set, uses standard out)
    #[arg(long)]
    output: Option<String>,
    /// Include a header
    #[arg(long, default_value_t = false)]
    header: bool,
}

#[derive(Args)]
struct SummaryArgs {
    /// the gene annotation, simplified (chrom/gene/start/end) or GFF3
    #[arg(long, required = true)]
    gff: String,
    /// the MCScanX collinearity file
    #[arg(long, required = true)]
    collinearity: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the visible syntenic chords for a view of the dataset.
    ///
    /// This will output a TSV with the following columns:
    ///
    ///  - block identifier
    ///  - source chromosome, start, end     (flip-adjusted)
    ///  - target chromosome, start, end     (flip-adjusted)
    ///  - number of gene-pair connections
    ///  - block orientation flag
    ///
    /// Example:
    ///
    ///  $ syntenymap chords --gff genes.gff --collinearity genome.collinearity \
    ///      --select at1 --at-least 5 --output chords.tsv --header
    Chords(ChordsArgs),
    /// Derive the ordered visible chromosome arcs for a view.
    ///
    /// This will output a TSV of chromosome, arc length, assigned color,
    /// genome tag, and flip state, in display order.
    ///
    /// Example:
    ///
    ///  $ syntenymap layout --gff genes.gff --collinearity genome.collinearity \
    ///      --palette dark1 --color-by genome
    Layout(LayoutArgs),
    /// Report the chromosome-pair connections for one chromosome.
    ///
    /// This will output a TSV of the chromosome, each partner chromosome,
    /// the number of distinct blocks joining the pair, and the block
    /// identifiers.
    Pairs(PairsArgs),
    /// Summarize a synteny dataset: chromosome, genome, gene, block, and
    /// connection counts.
    Summary(SummaryArgs),
}

fn split_names(arg: Option<&str>) -> Vec<String> {
    arg.map(|list| {
        list.split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn parse_palette(name: &str) -> Result<Palette, SyntenyMapError> {
    match name {
        "light1" => Ok(Palette::Light1),
        "light2" => Ok(Palette::Light2),
        "dark1" => Ok(Palette::Dark1),
        "dark2" => Ok(Palette::Dark2),
        _ => Err(SyntenyMapError::ParseError(format!(
            "Unknown palette '{}' (expected light1, light2, dark1, or dark2)",
            name
        ))),
    }
}

fn parse_color_mode(color_by: &str, palette: Palette) -> Result<ColorMode, SyntenyMapError> {
    match color_by {
        "chromosome" => Ok(ColorMode::PerChromosome(palette)),
        "genome" => Ok(ColorMode::PerGenome(palette)),
        "flip" => Ok(ColorMode::FlipState),
        _ => Err(SyntenyMapError::ParseError(format!(
            "Unknown color mode '{}' (expected chromosome, genome, or flip)",
            color_by
        ))),
    }
}

fn parse_chord_order(order_by: &str) -> Result<ChordOrder, SyntenyMapError> {
    match order_by {
        "input" => Ok(ChordOrder::InputOrder),
        "block" => Ok(ChordOrder::BlockId),
        "length" => Ok(ChordOrder::BlockLength),
        _ => Err(SyntenyMapError::ParseError(format!(
            "Unknown chord order '{}' (expected input, block, or length)",
            order_by
        ))),
    }
}

// open writer, possibly to stdout
fn open_writer(output: Option<&str>) -> Result<Box<dyn Write>, SyntenyMapError> {
    match output {
        Some(path) => {
            let file = OutputFile::new(path, None);
            Ok(file.writer()?)
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn build_view(map: &SyntenyMap, args: &ViewArgs) -> Result<ViewState, SyntenyMapError> {
    let mut view = ViewState::new(map);
    for name in split_names(args.select.as_deref()) {
        view.apply(map, Action::SelectChromosome(name))?;
    }
    for name in split_names(args.flip.as_deref()) {
        view.apply(map, Action::ToggleFlip(name))?;
    }
    if args.hide_unselected {
        view.apply(map, Action::SetShowAll(false))?;
    }
    Ok(view)
}

fn derive_chords(args: &ChordsArgs) -> Result<(), SyntenyMapError> {
    let map = SyntenyMap::from_files(&args.view.gff, &args.view.collinearity)?;
    let mut view = build_view(&map, &args.view)?;

    if let Some(threshold) = args.at_least {
        view.apply(
            &map,
            Action::SetFilter(BlockFilter {
                threshold,
                mode: FilterMode::AtLeast,
            }),
        )?;
    }
    if let Some(threshold) = args.at_most {
        view.apply(
            &map,
            Action::SetFilter(BlockFilter {
                threshold,
                mode: FilterMode::AtMost,
            }),
        )?;
    }
    view.apply(
        &map,
        Action::SetChordOrder {
            order: parse_chord_order(&args.order_by)?,
            descending: args.descending,
        },
    )?;
    if args.no_self {
        view.apply(&map, Action::SetShowSelfChr(false))?;
    }
    if args.no_self_genome {
        view.apply(&map, Action::SetShowSelfGenome(false))?;
    }

    let mut writer = open_writer(args.output.as_deref())?;
    if args.header {
        writeln!(writer, "block\tsource\tsource_start\tsource_end\ttarget\ttarget_start\ttarget_end\tconnections\tflipped")?;
    }

    for chord in view.chords(&map).chords {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            chord.block,
            chord.source.id,
            chord.source.start,
            chord.source.end,
            chord.target.id,
            chord.target.start,
            chord.target.end,
            chord.length,
            chord.flipped
        )?;
    }
    Ok(())
}

fn derive_layout(args: &LayoutArgs) -> Result<(), SyntenyMapError> {
    let mut map = SyntenyMap::from_files(&args.view.gff, &args.view.collinearity)?;
    let view = build_view(&map, &args.view)?;

    let palette = parse_palette(&args.palette)?;
    map.recolor(parse_color_mode(&args.color_by, palette)?, &view.flipped);

    let mut writer = open_writer(args.output.as_deref())?;
    if args.header {
        writeln!(writer, "chrom\tlength\tcolor\tgenome\tflipped")?;
    }

    for arc in view.layout(&map) {
        let tag = &map.chromosome(&arc.id)?.tag;
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            arc.id,
            arc.len,
            to_hex(arc.color),
            tag,
            arc.flipped
        )?;
    }
    Ok(())
}

fn report_pairs(args: &PairsArgs) -> Result<(), SyntenyMapError> {
    let map = SyntenyMap::from_files(&args.gff, &args.collinearity)?;
    let links = map.pair_links(&args.chromosome)?;

    let mut writer = open_writer(args.output.as_deref())?;
    if args.header {
        writeln!(writer, "chrom\tpartner\tblocks\tblock_ids")?;
    }

    for link in links {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            args.chromosome,
            link.partner,
            link.block_count,
            link.block_ids.join(",")
        )?;
    }
    Ok(())
}

fn summarize(args: &SummaryArgs) -> Result<(), SyntenyMapError> {
    let map = SyntenyMap::from_files(&args.gff, &args.collinearity)?;
    let view = ViewState::new(&map);
    let connections: usize = map
        .blocks
        .values()
        .map(|block| block.connections.len())
        .sum();

    println!("chromosomes: {}", map.len());
    println!("genomes: {}", map.partitions.len());
    println!("genes: {}", map.genes.len());
    println!("blocks: {}", map.blocks.len());
    println!("connections: {}", connections);
    println!("max block size: {}", map.max_block_size);
    println!("default chords: {}", view.chords(&map).chords.len());
    Ok(())
}

fn run() -> Result<(), SyntenyMapError> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.debug {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match &cli.command {
        Some(Commands::Chords(args)) => derive_chords(args),
        Some(Commands::Layout(args)) => derive_layout(args),
        Some(Commands::Pairs(args)) => report_pairs(args),
        Some(Commands::Summary(args)) => summarize(args),
        None => {
            println!("{}\n", INFO);
            std::process::exit(1);
        }
    }
}

fn main() {
    match run() {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
