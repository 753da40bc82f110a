//! Buffered vertex output.
//!
//! A run is generated chunk by chunk (see `vertexgen::chunks`) and every chunk
//! is written as `xpos`, `ypos`, `zpos` float columns, so memory stays bounded
//! by the buffer size. The output file is truncated at the start of a run.

use anyhow::{Context, Result};
use clap::ValueEnum;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use vertexgen::chunks::{Chunk, ChunkPlan};
use vertexgen::source::VertexSource;
use vertexgen::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One row group per chunk.
    Parquet,
    /// Header once, then rows appended per chunk.
    Csv,
}

/// Columnar frame of vertex positions.
pub fn vertex_frame(points: &[Vec3<f64>]) -> PolarsResult<DataFrame> {
    let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
    let zs: Vec<f64> = points.iter().map(|p| p.z).collect();
    df!("xpos" => xs, "ypos" => ys, "zpos" => zs)
}

/// Generate `n_vertex` points from `source` and write them to `path`. Returns the row count.
pub fn write_vertices(
    path: &Path,
    n_vertex: usize,
    source: &dyn VertexSource,
    first_seed: Option<u64>,
    buffer: usize,
    format: OutputFormat,
) -> Result<usize> {
    let plan = ChunkPlan::new(n_vertex, buffer, first_seed)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    tracing::info!(
        out = %path.display(),
        n_vertex,
        buffer,
        chunks = plan.chunk_count(),
        ?format,
        "writing vertices"
    );
    let rows = match format {
        OutputFormat::Parquet => write_parquet(file, plan, source),
        OutputFormat::Csv => write_csv(file, plan, source),
    }
    .with_context(|| format!("writing {}", path.display()))?;
    Ok(rows)
}

fn generate_chunk(source: &dyn VertexSource, chunk: Chunk, total: usize) -> Result<DataFrame> {
    let points = source
        .generate(chunk.count, chunk.seed)
        .with_context(|| format!("generating chunk {}", chunk.index))?;
    anyhow::ensure!(
        points.len() == chunk.count,
        "source returned {} vertices for a chunk of {}",
        points.len(),
        chunk.count
    );
    tracing::info!(
        chunk = chunk.index + 1,
        of = total,
        count = chunk.count,
        seed = ?chunk.seed,
        "chunk"
    );
    Ok(vertex_frame(&points)?)
}

fn write_parquet(file: File, plan: ChunkPlan, source: &dyn VertexSource) -> Result<usize> {
    let total = plan.chunk_count();
    let schema = vertex_frame(&[])?.schema();
    let mut writer = ParquetWriter::new(file).batched(&schema)?;
    let mut rows = 0;
    for chunk in plan {
        let df = generate_chunk(source, chunk, total)?;
        if df.height() > 0 {
            writer.write_batch(&df)?;
        }
        rows += df.height();
    }
    writer.finish()?;
    Ok(rows)
}

fn write_csv(mut file: File, plan: ChunkPlan, source: &dyn VertexSource) -> Result<usize> {
    let total = plan.chunk_count();
    let mut rows = 0;
    for chunk in plan {
        let mut df = generate_chunk(source, chunk, total)?;
        CsvWriter::new(&mut file)
            .include_header(chunk.index == 0)
            .finish(&mut df)?;
        rows += df.height();
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use tempfile::tempdir;
    use vertexgen::prelude::{
        PolyconeDetector, SamplingError, SurfaceFilter, SurfaceLabel, SurfaceSource,
    };

    /// Uniform points in a box, seeded per chunk.
    fn boxed(count: usize, seed: Option<u64>) -> Result<Vec<Vec3<f64>>, SamplingError> {
        let mut rng = StdRng::seed_from_u64(seed.unwrap_or(0));
        Ok((0..count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-50.0..50.0),
                    rng.gen_range(-50.0..50.0),
                )
            })
            .collect())
    }

    fn read_parquet(path: &Path) -> DataFrame {
        ParquetReader::new(File::open(path).unwrap())
            .finish()
            .unwrap()
    }

    #[test]
    fn parquet_holds_every_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.parquet");
        let rows = write_vertices(&path, 10_000, &boxed, Some(1), 100, OutputFormat::Parquet)
            .unwrap();
        assert_eq!(rows, 10_000);
        assert_eq!(read_parquet(&path).height(), 10_000);

        // Total not divisible by the buffer; the file is overwritten.
        let rows = write_vertices(&path, 10_300, &boxed, Some(1), 1_000, OutputFormat::Parquet)
            .unwrap();
        assert_eq!(rows, 10_300);
        let df = read_parquet(&path);
        assert_eq!(df.height(), 10_300);
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
            vec!["xpos", "ypos", "zpos"]
        );
    }

    #[test]
    fn csv_appends_chunks_under_one_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("test.csv");
        let rows =
            write_vertices(&path, 10_300, &boxed, Some(1), 100, OutputFormat::Csv).unwrap();
        assert_eq!(rows, 10_300);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 10_301);
        assert_eq!(text.lines().next(), Some("xpos,ypos,zpos"));
        let df = LazyCsvReader::new(&path).finish().unwrap().collect().unwrap();
        assert_eq!(df.height(), 10_300);
    }

    #[test]
    fn seeded_runs_repeat_and_empty_runs_still_write() {
        let dir = tempdir().unwrap();
        let det = PolyconeDetector::cylinder("cyl", 40.0, 30.0).unwrap();
        let source = SurfaceSource::new(det, SurfaceFilter::Label(SurfaceLabel::NPlus));
        let a = dir.path().join("a.parquet");
        let b = dir.path().join("b.parquet");
        write_vertices(&a, 2_500, &source, Some(5), 1_000, OutputFormat::Parquet).unwrap();
        write_vertices(&b, 2_500, &source, Some(5), 1_000, OutputFormat::Parquet).unwrap();
        assert!(read_parquet(&a).equals(&read_parquet(&b)));

        let empty = dir.path().join("empty.parquet");
        let rows = write_vertices(&empty, 0, &source, None, 1_000, OutputFormat::Parquet).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(read_parquet(&empty).height(), 0);
    }

    #[test]
    fn sampling_errors_surface_with_context() {
        let dir = tempdir().unwrap();
        let det = PolyconeDetector::cylinder("cyl", 40.0, 30.0).unwrap();
        let source = SurfaceSource::new(det, SurfaceFilter::Label(SurfaceLabel::Passive));
        let err = write_vertices(
            &dir.path().join("x.csv"),
            10,
            &source,
            Some(1),
            5,
            OutputFormat::Csv,
        )
        .unwrap_err();
        assert!(err.chain().any(|e| e.to_string().contains("domain error")));
        assert!(write_vertices(
            &dir.path().join("y.csv"),
            10,
            &source,
            Some(1),
            0,
            OutputFormat::Csv
        )
        .is_err());
    }
}
