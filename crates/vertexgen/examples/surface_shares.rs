//! Print how a vertex budget splits across a few cylindrical detectors.
//!
//! Usage:
//!   cargo run -p vertexgen --example surface_shares -- [all|nplus|pplus|passive]
//!
//! For each detector prints its eligible area, expected share and the share
//! actually drawn by `sample_many` for 100k vertices.

use vertexgen::prelude::*;

fn main() {
    let arg = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());
    let filter: SurfaceFilter = match arg.parse() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let dets = [
        PolyconeDetector::cylinder("small", 30.0, 25.0),
        PolyconeDetector::cylinder("medium", 38.0, 32.0),
        PolyconeDetector::cylinder("large", 45.0, 80.0),
    ]
    .into_iter()
    .collect::<Result<Vec<_>, _>>();
    let dets = match dets {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let n = 100_000usize;
    let out = match sample_many(n, &dets, filter, Some(2025)) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let areas: Vec<f64> = dets
        .iter()
        .map(|d| eligible_area(d, filter).unwrap_or(0.0))
        .collect();
    let total: f64 = areas.iter().sum();
    println!("surface={filter} n={n}");
    for (idx, (det, area)) in dets.iter().zip(&areas).enumerate() {
        let drawn = out.detector_ids.iter().filter(|&&id| id == idx).count();
        println!(
            "  {:<8} area={:>10.1} expected={:.4} drawn={:.4}",
            det.name(),
            area,
            area / total,
            drawn as f64 / n as f64
        );
    }
}
