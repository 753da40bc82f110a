use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;
use vertexgen::geometry::SurfaceFilter;
use vertexgen::polycone::PolyconeDetector;
use vertexgen::sampler::eligible_area;
use vertexgen::source::{MultiSurfaceSource, SurfaceSource, VertexSource};

mod config;
mod output;
mod provenance;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "vertexgen")]
#[command(about = "Area-weighted surface vertices for HPGe detectors")]
struct Cmd {
    /// Increase the program verbosity
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate vertices on detector surfaces and write them in chunks
    Surface {
        /// Detector JSON config; repeat to weight several detectors by area
        #[arg(long = "detector", required = true)]
        detectors: Vec<PathBuf>,
        /// all, nplus, pplus or passive
        #[arg(long, default_value = "all")]
        surface: SurfaceFilter,
        /// Number of vertices
        #[arg(short = 'n', long)]
        n_vertex: usize,
        /// Seed of the first chunk; chunk i uses seed + i
        #[arg(long)]
        seed: Option<u64>,
        /// Vertices per chunk
        #[arg(long, default_value_t = 1_000_000)]
        buffer: usize,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Parquet)]
        format: OutputFormat,
    },
    /// Print eligible surface area and expected vertex share per detector
    Areas {
        #[arg(long = "detector", required = true)]
        detectors: Vec<PathBuf>,
        #[arg(long, default_value = "all")]
        surface: SurfaceFilter,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Surface {
            detectors,
            surface,
            n_vertex,
            seed,
            buffer,
            out,
            format,
        } => surface_cmd(detectors, surface, n_vertex, seed, buffer, out, format),
        Action::Areas { detectors, surface } => areas(detectors, surface),
    }
}

fn load_all(paths: &[PathBuf]) -> Result<Vec<PolyconeDetector>> {
    paths.iter().map(config::load_detector).collect()
}

fn surface_cmd(
    paths: Vec<PathBuf>,
    surface: SurfaceFilter,
    n_vertex: usize,
    seed: Option<u64>,
    buffer: usize,
    out: PathBuf,
    format: OutputFormat,
) -> Result<()> {
    let mut detectors = load_all(&paths)?;
    let names: Vec<String> = detectors.iter().map(|d| d.name().to_string()).collect();
    tracing::info!(detectors = ?names, %surface, n_vertex, seed = ?seed, "surface");

    let source: Box<dyn VertexSource> = if detectors.len() == 1 {
        match detectors.pop() {
            Some(det) => Box::new(SurfaceSource::new(det, surface)),
            None => bail!("no detector given"),
        }
    } else {
        Box::new(MultiSurfaceSource::new(detectors, surface))
    };
    let rows = output::write_vertices(&out, n_vertex, source.as_ref(), seed, buffer, format)?;

    let record = provenance::RunRecord::new(
        serde_json::json!({
            "command": "surface",
            "detectors": paths,
            "detector_names": names,
            "surface": surface.to_string(),
            "n_vertex": n_vertex,
            "seed": seed,
            "buffer": buffer,
            "format": format,
        }),
        &out,
    );
    provenance::write_sidecar(&out, &record)?;
    tracing::info!(rows, out = %out.display(), "done");
    Ok(())
}

fn areas(paths: Vec<PathBuf>, surface: SurfaceFilter) -> Result<()> {
    let detectors = load_all(&paths)?;
    let areas = detectors
        .iter()
        .map(|d| eligible_area(d, surface))
        .collect::<Result<Vec<f64>, _>>()?;
    let total: f64 = areas.iter().sum();
    if total <= 0.0 {
        bail!("no detector has eligible `{surface}` surface area");
    }
    let rows: Vec<_> = detectors
        .iter()
        .zip(&areas)
        .map(|(d, a)| {
            serde_json::json!({
                "name": d.name(),
                "area": a,
                "share": a / total,
            })
        })
        .collect();
    let doc = serde_json::json!({
        "surface": surface.to_string(),
        "total_area": total,
        "detectors": rows,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
