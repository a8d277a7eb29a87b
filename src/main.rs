use clap::Parser;
use mzstem::annotate::annotate;
use mzstem::render::render_annotation;
use mzstem::residue::Peptide;
use mzstem::{MzXmlFile, ScanSourceError};
use std::path::Path;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input mzXML file, optionally gzip-compressed
    file: String,
    /// Scan number to annotate
    scan: u32,
    /// Peptide sequence to fragment
    peptide: String,
    /// Half-width of the match window in m/z units
    #[arg(long, default_value_t = mzstem::matching::DEFAULT_TOLERANCE)]
    tolerance: f64,
    /// Output SVG path
    #[arg(long, default_value_t = String::from("annotated.svg"))]
    output: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    let source = MzXmlFile::open(&args.file)?;
    info!("parsed {} scans from {}", source.scans().count(), args.file);

    let scan = source
        .scan(args.scan)
        .ok_or(ScanSourceError::ScanNotFound { num: args.scan })?;
    if let Some(rt) = scan.rt() {
        info!(
            "scan {} retention time: {}",
            args.scan,
            rt.into_format_args(uom::si::time::second, uom::fmt::DisplayStyle::Abbreviation)
        );
    }
    let observed = scan.peaks()?;
    info!("scan {} holds {} peaks", args.scan, observed.len());

    let peptide = Peptide::new(&args.peptide)?;
    let annotation = annotate(&peptide, &observed, args.tolerance)?;
    info!(
        "matched {} ion labels out of {} theoretical ions",
        annotation.labels.len(),
        peptide.len() * 2
    );

    let title = format!("{}  {}", args.scan, peptide);
    render_annotation(&annotation, &title, Path::new(&args.output))?;
    info!("wrote {}", args.output);
    Ok(())
}
